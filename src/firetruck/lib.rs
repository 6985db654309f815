//! # Firetruck Architecture
//!
//! Firetruck is a client for a remote contract service: it lists, inspects, queries and
//! migrates contracts over HTTP. The library does the work; the `ft` binary is one
//! client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints results, runs the report REPL   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses user input (qualified names, JSON values)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Listing, sorting, reports, migration                     │
//! │  - Returns `Result<CmdResult>`, never prints                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Remote Layer (remote/)                                     │
//! │  - ContractService trait                                    │
//! │  - HttpService (production), InMemoryService (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values coming back from the service are modelled in [`value`], turned into text by
//! [`render`] and ordered by [`compare`].
//!
//! ## Errors
//!
//! Everything below the CLI returns [`error::Result`]. Failures propagate untouched;
//! the one exception is the per-contract fan-out of the listing commands, where a
//! contract whose report fails is listed without a value instead of aborting the list.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): unit tests against `InMemoryService`.
//! 2. **Rendering and ordering** (`render.rs`, `compare.rs`): exact-output tests.
//! 3. **CLI** (`tests/`): argument handling and output of the `ft` binary.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each command
//! - [`remote`]: Service abstraction and implementations
//! - [`value`]: Runtime value model
//! - [`render`]: Value pretty-printing
//! - [`compare`]: Orderings used by sorted listings
//! - [`model`]: Contracts, declarations and request/response bodies
//! - [`config`]: Configuration file and environment
//! - [`init`]: Builds a ready-to-use API from configuration
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod compare;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod remote;
pub mod render;
pub mod value;
