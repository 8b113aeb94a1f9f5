//! Search command implementation

use super::{print_books, spinner, Context};
use anyhow::{Context as _, Result};
use libris_core::{SearchFilters, SourceGateway};

/// Search the catalogue
pub async fn search(ctx: &Context, filters: &SearchFilters, json: bool) -> Result<()> {
    let gateway = ctx.gateway()?;

    let pb = spinner(format!("Searching for '{}'...", filters.query))?;
    let result = gateway.search(filters).await;
    pb.finish_and_clear();
    let books = result.context("Search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
    } else if books.is_empty() {
        println!("No books found");
    } else {
        println!("{} book(s)", books.len());
        print_books(&books, "");
    }

    Ok(())
}
