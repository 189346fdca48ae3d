//! Search command handler

use anyhow::{Context, Result};

use phototag_core::{Catalog, SearchRequest, TagKind, TagQuery};

use crate::output::Output;

/// Search photos by tag prefix, optionally combined with a second query
pub fn run(
    catalog: &Catalog,
    kind: TagKind,
    prefix: String,
    and: Option<Vec<String>>,
    or: Option<Vec<String>>,
    output: &Output,
) -> Result<()> {
    let request = build_request(TagQuery::new(kind, prefix.trim()), and, or)?;
    let hits = catalog.search(&request);
    output.print_hits(&hits);
    Ok(())
}

fn build_request(
    primary: TagQuery,
    and: Option<Vec<String>>,
    or: Option<Vec<String>>,
) -> Result<SearchRequest> {
    let request = match (and, or) {
        (Some(args), _) => SearchRequest::and(primary, parse_query(&args)?),
        (None, Some(args)) => SearchRequest::or(primary, parse_query(&args)?),
        (None, None) => SearchRequest::single(primary),
    };
    Ok(request)
}

/// Parse a `KIND PREFIX` pair given to --and / --or
fn parse_query(args: &[String]) -> Result<TagQuery> {
    let [kind, prefix] = args else {
        anyhow::bail!("Expected a tag kind and a prefix");
    };
    let kind: TagKind = kind.parse().context("Invalid second query")?;
    Ok(TagQuery::new(kind, prefix.trim()))
}
