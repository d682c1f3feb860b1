//! CLI command handlers, one file per command.

mod cache;
mod columns;
mod download;
mod list;
mod play;
mod reveal;
mod show;

pub use cache::run_cache;
pub use columns::run_columns;
pub use download::run_download;
pub use list::run_list;
pub use play::{run_open, run_play};
pub use reveal::run_reveal;
pub use show::run_show;

use csvplay_core::fetch::FetchProgress;
use csvplay_core::resolver::Resolution;

/// One line summarizing how an entry ended up.
fn describe(title: &str, resolution: &Resolution) -> String {
    match resolution {
        Resolution::BrowserOpened => format!("{title}: opened in browser"),
        Resolution::Cached { path, launched: true } => {
            format!("{title}: playing {}", path.display())
        }
        Resolution::Cached { path, launched: false } => {
            format!("{title}: cached at {}", path.display())
        }
        Resolution::Failed {
            reason,
            browser_fallback: true,
        } => format!("{title}: {reason}; opened in browser instead"),
        Resolution::Failed {
            reason,
            browser_fallback: false,
        } => format!("{title}: {reason}"),
    }
}

fn progress_line(p: &FetchProgress) -> String {
    let done_mib = p.received as f64 / 1_048_576.0;
    match (p.total, p.fraction()) {
        (Some(total), Some(frac)) => format!(
            "{:.1} / {:.1} MiB ({:.1}%)",
            done_mib,
            total as f64 / 1_048_576.0,
            frac * 100.0
        ),
        _ => format!("{:.1} MiB", done_mib),
    }
}
