//! # ft
//!
//! The `ft` binary is a thin shell around the `firetruck` library: the CLI lives in
//! `cli/`, and this file only invokes `cli::run()` and turns a failure into an exit
//! code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (src/firetruck/cli/)                             │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring and dispatch (commands.rs)                │
//! │  - Terminal output (print.rs) and the report REPL (repl.rs) │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!              firetruck::api::FiretruckApi<HttpService>
//! ```
//!
//! Errors reach `main` as `FiretruckError`, are printed to stderr and end the process
//! with exit code 1. Diagnostics go through `tracing` to stderr as well, so stdout
//! only ever carries command output.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
