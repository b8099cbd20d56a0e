use serde_json::json;

use crate::commands::{load_dataset, CommandResult};

pub fn run() -> CommandResult {
    let (config, dataset) = match load_dataset("stats") {
        Ok(loaded) => loaded,
        Err(result) => return result,
    };

    let stats = dataset.stats();
    CommandResult::success_with_data(
        "stats",
        format!(
            "indexed {} quotes by {} authors across {} topics from `{}`",
            stats.quotes,
            stats.authors,
            stats.topics,
            config.dataset.path.display()
        ),
        Some(json!({
            "quotes": stats.quotes,
            "authors": stats.authors,
            "topics": stats.topics,
            "bios": stats.bios,
        })),
    )
}
