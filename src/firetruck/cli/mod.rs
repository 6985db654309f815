//! # CLI Behavior
//!
//! This is **one possible UI client** for firetruck, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! ## Services
//!
//! Every command talks to the service given by `--service`, `FT_SERVICE` or the
//! `service-url` config key, in that order of precedence. Migrations write to the
//! target service (`--target-service`, `FT_SERVICE_TARGET`, `target-service-url`),
//! which falls back to the source service when unset.
//!
//! ## Naked Execution (`ft`)
//!
//! Running `ft` with no arguments lists contract ids, like `ft list`.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call API and format output
//! - `print`: Output formatting (listings, contract details, messages)
//! - `repl`: Line-by-line report evaluation
//! - `setup`: Argument parsing via clap

mod commands;
mod print;
mod repl;
pub mod setup;

pub use commands::run;
