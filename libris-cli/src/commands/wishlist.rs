//! Wishlist command implementations

use super::{print_books, Context};
use anyhow::{Context as _, Result};
use libris_core::{BookSummary, WishlistService};

pub async fn wishlist_add(ctx: &Context, barcode: &str) -> Result<()> {
    let message = ctx
        .gateway()?
        .add(barcode)
        .await
        .with_context(|| format!("Failed to add {} to the wishlist", barcode))?;
    println!("{}", message);
    Ok(())
}

pub async fn wishlist_remove(ctx: &Context, barcode: &str) -> Result<()> {
    let message = ctx
        .gateway()?
        .remove(barcode)
        .await
        .with_context(|| format!("Failed to remove {} from the wishlist", barcode))?;
    println!("{}", message);
    Ok(())
}

pub async fn wishlist_list(ctx: &Context, json: bool) -> Result<()> {
    let items = ctx
        .gateway()?
        .list()
        .await
        .context("Failed to load the wishlist")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("Your wishlist is empty");
    } else {
        let books: Vec<BookSummary> = items.into_iter().map(|item| item.book).collect();
        print_books(&books, "");
    }

    Ok(())
}
