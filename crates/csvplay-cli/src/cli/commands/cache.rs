//! `csvplay cache dir|list|open|clear` – cache maintenance.

use anyhow::Result;
use csvplay_core::config::PlayerConfig;
use csvplay_core::fetch;
use csvplay_core::resolver::MediaResolver;

use crate::cli::CacheAction;

pub fn run_cache(cfg: &PlayerConfig, action: CacheAction) -> Result<()> {
    let mut resolver = MediaResolver::from_config(cfg);
    match action {
        CacheAction::Dir => println!("{}", resolver.cache().dir().display()),
        CacheAction::List => {
            let cache = resolver.cache();
            if cache.is_empty() {
                println!("Cache is empty ({}).", cache.dir().display());
            }
            for (url, path) in cache.entries() {
                let marker = if path.is_file() { "" } else { "  (missing)" };
                println!("{url}\n  -> {}{marker}", path.display());
            }
            if fetch::has_partial_files(cache.dir()) {
                println!("Unfinished downloads are left over; `csvplay cache clear` removes them.");
            }
        }
        CacheAction::Open => resolver.open_cache_dir()?,
        CacheAction::Clear => {
            let count = resolver.cache().len();
            resolver.clear_cache(&mut [])?;
            println!("Removed {count} cached entr{}.", if count == 1 { "y" } else { "ies" });
        }
    }
    Ok(())
}
