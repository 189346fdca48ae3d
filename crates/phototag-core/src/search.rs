//! Tag queries
//!
//! Every query is a case-insensitive prefix match on a tag value of a given
//! kind. Up to two queries can be combined with AND or OR.

use std::fmt;

use crate::models::{Album, Photo, TagKind};

/// One "kind + value prefix" condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    pub kind: TagKind,
    pub prefix: String,
}

impl TagQuery {
    /// Build a query from user input; surrounding whitespace is dropped
    pub fn new(kind: TagKind, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        let trimmed = prefix.trim();
        if trimmed.len() != prefix.len() {
            prefix = trimmed.to_string();
        }
        Self { kind, prefix }
    }

    /// True if any tag on `photo` satisfies this query
    pub fn matches(&self, photo: &Photo) -> bool {
        photo.has_tag_with_prefix(self.kind, &self.prefix)
    }
}

impl fmt::Display for TagQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}*", self.kind, self.prefix)
    }
}

/// How two queries are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

/// A search as issued from a search form: one query, optionally a second
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub primary: TagQuery,
    pub secondary: Option<(Combinator, TagQuery)>,
}

impl SearchRequest {
    pub fn single(query: TagQuery) -> Self {
        Self {
            primary: query,
            secondary: None,
        }
    }

    pub fn and(first: TagQuery, second: TagQuery) -> Self {
        Self {
            primary: first,
            secondary: Some((Combinator::And, second)),
        }
    }

    pub fn or(first: TagQuery, second: TagQuery) -> Self {
        Self {
            primary: first,
            secondary: Some((Combinator::Or, second)),
        }
    }
}

/// A matching photo together with the album that owns it
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub photo: &'a Photo,
    pub album: &'a Album,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;

    #[test]
    fn test_query_matches_photo() {
        let mut photo = Photo::new("img.jpg");
        photo.add_tag(Tag::person("Jonathan"));

        assert!(TagQuery::new(TagKind::Person, "JON").matches(&photo));
        assert!(TagQuery::new(TagKind::Person, "").matches(&photo));
        assert!(!TagQuery::new(TagKind::Location, "").matches(&photo));
        assert!(!TagQuery::new(TagKind::Person, "than").matches(&photo));
    }

    #[test]
    fn test_query_prefix_is_trimmed() {
        let mut photo = Photo::new("img.jpg");
        photo.add_tag(Tag::person("Jon"));

        let padded = TagQuery::new(TagKind::Person, "  jo ");
        assert_eq!(padded.prefix, "jo");
        assert!(padded.matches(&photo));
        assert_eq!(TagQuery::new(TagKind::Person, " \t").prefix, "");
    }

    #[test]
    fn test_request_constructors() {
        let a = TagQuery::new(TagKind::Person, "jo");
        let b = TagQuery::new(TagKind::Location, "pa");

        assert!(SearchRequest::single(a.clone()).secondary.is_none());
        assert_eq!(
            SearchRequest::or(a.clone(), b.clone()).secondary,
            Some((Combinator::Or, b.clone()))
        );
        assert_eq!(SearchRequest::and(a, b.clone()).secondary.unwrap().0, Combinator::And);
        assert_eq!(b.to_string(), "location=pa*");
    }
}
