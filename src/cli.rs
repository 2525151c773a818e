//! CLI domain: parse, route, and output only.
//! No tree semantics; a single route table dispatches to the namespace service.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::RunContext;
