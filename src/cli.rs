//! CLI domain: parse, route and output only.
//! The engine itself knows nothing about arguments, prompts or the periodic loop.

mod output;
mod parse;
mod route;

pub use output::{format_report, map_error};
pub use parse::Cli;
pub use route::{apply_cli_overrides, prepare_roots, prompt_create_replica, RunContext};
