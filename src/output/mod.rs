mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::PhaseProgress;
pub use summary::print_summary;

use styling::{dim, magenta_bold};

/// Prints the `glbackup` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("📦 glbackup"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitLab Activity Backup")
    );
}
