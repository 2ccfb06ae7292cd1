//! CLI command handlers, one file per command.

mod codes;
mod completions;
mod config;
mod fetch;
mod normalize;
mod run;

pub use codes::run_codes;
pub use completions::run_completions;
pub use config::show_config;
pub use fetch::run_fetch;
pub use normalize::run_normalize;
pub use run::{run_pipeline, RunStatus};
