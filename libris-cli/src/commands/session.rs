//! Session command implementations

use super::Context;
use anyhow::{Context as _, Result};

/// List cached feeds
pub fn session_list(ctx: &Context) -> Result<()> {
    let entries = ctx.cache().entries();
    if entries.is_empty() {
        println!("No cached feeds");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{:<20} {:>3} books  {}",
            entry.feed_name,
            entry.payload.total_books(),
            entry.written_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

/// Drop every cached feed
pub fn session_end(ctx: &Context) -> Result<()> {
    ctx.cache()
        .end_session()
        .context("Failed to clear the session cache")?;
    tracing::info!("Session ended");
    println!("Session ended");
    Ok(())
}
