use anyhow::Result;

use crate::cache::CacheStore;
use crate::cli::CacheCommand;
use crate::status;
use crate::ui::Style;

pub fn run_cache(command: &CacheCommand) -> Result<()> {
    let store = CacheStore::new()?;

    match command {
        CacheCommand::Clear => {
            let removed = store.clear()?;
            status!(
                "{} Removed {removed} cached translation{}",
                Style::success("✓"),
                if removed == 1 { "" } else { "s" }
            );
        }
        CacheCommand::Stats => {
            println!("{} {}", Style::label("path   "), store.db_path().display());
            println!("{} {}", Style::label("entries"), store.count()?);
        }
    }

    Ok(())
}
