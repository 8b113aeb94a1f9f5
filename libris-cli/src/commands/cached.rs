//! Cached command implementation

use super::feed::print_payload;
use super::Context;
use anyhow::Result;

/// Show the cached copy of a feed without touching the network
pub fn cached(ctx: &Context, name: &str, json: bool) -> Result<()> {
    let Some(entry) = ctx.cache().read_entry(name) else {
        anyhow::bail!("No cached copy of '{}' in this session", name);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!(
            "Cached {} ({})",
            entry.feed_name,
            entry.written_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        print_payload(&entry.payload);
    }

    Ok(())
}
