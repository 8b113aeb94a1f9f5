//! Feed command implementation

use super::{print_books, spinner, Context};
use anyhow::Result;
use libris_core::{CacheEntry, FeedLimits, FeedPayload, FeedResolution};
use serde::Serialize;

/// JSON output: what was on screen first, then what replaced it
#[derive(Serialize)]
struct FeedOutput {
    cached: Option<CacheEntry>,
    resolved: FeedResolution,
}

/// Show the cached copy of a feed, then refresh it
///
/// Upstream failures are reported as a warning; the command still succeeds
/// with whatever payload could be assembled.
pub async fn feed(
    ctx: &Context,
    name: &str,
    desired_min: Option<usize>,
    cap: Option<usize>,
    json: bool,
) -> Result<()> {
    let aggregator = ctx.aggregator()?;
    let defaults = ctx.feeds().limits;
    let limits = FeedLimits {
        desired_min: desired_min.unwrap_or(defaults.desired_min),
        cap: cap.unwrap_or(defaults.cap),
    };

    let cached = aggregator.cache().read_entry(name);
    if !json {
        if let Some(entry) = &cached {
            println!(
                "Cached {} ({})",
                name,
                entry.written_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            print_payload(&entry.payload);
            println!();
        }
    }

    let pb = spinner(format!("Refreshing {}...", name))?;
    let resolved = aggregator.resolve_feed_with(name, limits).await;
    pb.finish_and_clear();

    tracing::debug!(feed = name, source = ?resolved.source, "Feed refreshed");
    if let Some(soft_error) = &resolved.soft_error {
        eprintln!("Warning: {}", soft_error.advisory());
    }

    if json {
        let output = FeedOutput { cached, resolved };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", name);
        print_payload(&resolved.payload);
    }

    Ok(())
}

pub(super) fn print_payload(payload: &FeedPayload) {
    for section in payload.sections() {
        println!("{} ({})", section.name, section.len());
        if section.is_empty() {
            println!("   (nothing to show)");
        }
        print_books(&section.books, " ");
    }
}
