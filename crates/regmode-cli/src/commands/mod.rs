//! CLI command implementations.

pub mod import;
pub mod read;
pub mod update;

use owo_colors::OwoColorize;

/// Renders an enabled flag for text output.
pub(crate) fn format_enabled(enabled: bool) -> String {
    if enabled {
        "enabled".green().to_string()
    } else {
        "disabled".yellow().to_string()
    }
}
