//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! operation, whatever the UI.
//!
//! The facade dispatches to `commands/*.rs`, turns user input into typed arguments
//! (qualified names, JSON-encoded values) and returns `Result<CmdResult>`. It does no
//! printing and holds no business logic.
//!
//! ## Two services
//!
//! `FiretruckApi<S: ContractService>` holds a *source* service, used by every command,
//! and a *target* service, used only as the destination of a migration. Both are
//! usually configured with the same base URL.
//!
//! - Production: `FiretruckApi<HttpService>`
//! - Testing: `FiretruckApi<InMemoryService>`

use crate::commands;
use crate::commands::migrate::{add_empty_key_location, identity, EventTransform};
use crate::error::Result;
use crate::model::InstantiationRequest;
use crate::remote::ContractService;
use crate::value::{QualifiedName, Value};
use std::path::{Path, PathBuf};

pub struct FiretruckApi<S: ContractService> {
    source: S,
    target: S,
    config_dir: PathBuf,
    concurrency: usize,
}

impl<S: ContractService> FiretruckApi<S> {
    pub fn new(source: S, target: S, config_dir: PathBuf) -> Self {
        Self {
            source,
            target,
            config_dir,
            concurrency: 1,
        }
    }

    /// Maximum number of reports evaluated at once by the listing commands.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn target(&self) -> &S {
        &self.target
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn list_contracts(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.source)
    }

    pub fn count_contracts(&self) -> Result<commands::CmdResult> {
        commands::list::count(&self.source)
    }

    pub fn list_by_event_count(&self) -> Result<commands::CmdResult> {
        commands::list::by_event_count(&self.source, self.concurrency)
    }

    pub fn list_by_latest_timestamp(&self) -> Result<commands::CmdResult> {
        commands::list::by_latest_timestamp(&self.source, self.concurrency)
    }

    pub fn contract_info(&self, id: &str) -> Result<commands::CmdResult> {
        commands::contract::run(&self.source, id)
    }

    pub fn residual(&self, id: &str, simplify: bool) -> Result<commands::CmdResult> {
        commands::residual::run(&self.source, id, simplify)
    }

    pub fn report<V: AsRef<str>>(
        &self,
        expression: &str,
        contract_id: Option<&str>,
        values: &[V],
    ) -> Result<commands::CmdResult> {
        let values = parse_values(values)?;
        commands::report::run(&self.source, contract_id, expression, &values)
    }

    pub fn declaration(&self, declaration_id: &str) -> Result<commands::CmdResult> {
        commands::declaration::run(&self.source, declaration_id)
    }

    pub fn instantiate<V: AsRef<str>>(
        &self,
        declaration_id: &str,
        name: &str,
        entry_point: &str,
        arguments: &[V],
        peers: Vec<String>,
    ) -> Result<commands::CmdResult> {
        let request = InstantiationRequest {
            declaration_id: declaration_id.to_string(),
            name: name.to_string(),
            declaration_expression_arguments: parse_values(arguments)?,
            entry_point: entry_point.parse::<QualifiedName>()?,
            peers,
        };
        commands::instantiate::run(&self.source, &request)
    }

    pub fn migrate(
        &self,
        source_id: &str,
        target_id: &str,
        events_expression: &str,
        migration: Migration,
    ) -> Result<commands::CmdResult> {
        commands::migrate::run(
            &self.source,
            &self.target,
            source_id,
            target_id,
            events_expression,
            migration.transform(),
        )
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }
}

/// Which rewrite a migration applies to the events it copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// Events are copied unchanged.
    Plain,
    /// `AcceptCarShare` events get an empty `keyLocation` when missing.
    AddEmptyKeyLocation,
}

impl Migration {
    pub fn transform(self) -> EventTransform {
        match self {
            Migration::Plain => identity,
            Migration::AddEmptyKeyLocation => add_empty_key_location,
        }
    }
}

fn parse_values<V: AsRef<str>>(inputs: &[V]) -> Result<Vec<Value>> {
    inputs.iter().map(|s| Value::from_json(s.as_ref())).collect()
}

pub use crate::commands::config::ConfigAction;
pub use commands::migrate::{MigrationReport, ReplayState};
pub use commands::{CmdMessage, CmdResult, Listing, MessageLevel, ReportRow};
