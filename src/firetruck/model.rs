use crate::value::{QualifiedName, Value};
use serde::{Deserialize, Serialize};

/// A contract instance as described by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<QualifiedName>,
    #[serde(default)]
    pub peers: Vec<String>,
}

impl Contract {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            declaration_id: None,
            entry_point: None,
            peers: Vec::new(),
        }
    }
}

/// Remaining obligations of a contract, as source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualSource {
    pub csl: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub csl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantiationRequest {
    pub declaration_id: String,
    pub name: String,
    pub declaration_expression_arguments: Vec<Value>,
    pub entry_point: QualifiedName,
    pub peers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantiationResponse {
    pub contract_id: String,
}

/// Body of a report request: the expression plus the values it is applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub csl: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// What the service said about a single applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    /// The service refused the event; carries its raw response.
    Rejected(String),
}

/// The ordered event history of a contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractState {
    pub events: Vec<Value>,
}

impl ContractState {
    pub fn new(events: Vec<Value>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Applies `transform` to every event, keeping their order.
    pub fn map_events(self, transform: impl Fn(Value) -> Value) -> Self {
        Self {
            events: self.events.into_iter().map(transform).collect(),
        }
    }
}
