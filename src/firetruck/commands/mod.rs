use crate::config::FiretruckConfig;
use crate::model::Contract;
use crate::value::Value;

pub mod config;
pub mod contract;
pub mod declaration;
pub mod instantiate;
pub mod list;
pub mod migrate;
pub mod report;
pub mod residual;

/// All events applied to a contract, in application order.
pub const EVENTS_EXPRESSION: &str = "events";

pub const EVENT_COUNT_EXPRESSION: &str = "List::length events";

/// Timestamp of the most recently applied event; fails on a contract without events.
pub const LAST_TIMESTAMP_EXPRESSION: &str =
    "let val lastEvent = (\\Some x -> x) (List::last (const True) events) in lastEvent.timestamp";

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A report result for one contract; `None` when evaluation failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub id: String,
    pub value: Option<Value>,
}

/// Contracts sorted by a report, with the wording used to print them.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub label: &'static str,
    /// Printed in place of a failed report.
    pub missing: &'static str,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub contract_ids: Vec<String>,
    pub contract: Option<Contract>,
    pub contract_count: Option<usize>,
    pub event_count: Option<i64>,
    pub value: Option<Value>,
    pub source: Option<String>,
    pub listing: Option<Listing>,
    pub migration: Option<migrate::MigrationReport>,
    pub config: Option<FiretruckConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_contract_ids(mut self, ids: Vec<String>) -> Self {
        self.contract_ids = ids;
        self
    }

    pub fn with_contract(mut self, contract: Contract) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn with_contract_count(mut self, count: usize) -> Self {
        self.contract_count = Some(count);
        self
    }

    pub fn with_event_count(mut self, count: i64) -> Self {
        self.event_count = Some(count);
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_listing(mut self, listing: Listing) -> Self {
        self.listing = Some(listing);
        self
    }

    pub fn with_migration(mut self, report: migrate::MigrationReport) -> Self {
        self.migration = Some(report);
        self
    }

    pub fn with_config(mut self, config: FiretruckConfig) -> Self {
        self.config = Some(config);
        self
    }
}
