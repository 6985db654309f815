//! # Remote Access Layer
//!
//! The [`ContractService`] trait is the only way the rest of the crate talks to the
//! contract service. Every method is one round trip that can fail.
//!
//! ## Implementations
//!
//! - [`http::HttpService`]: production client, JSON over HTTP
//!   - configured explicitly with a base URL and timeout; there is no global client
//!   - one instance per service, so migration can read from one and write to another
//!
//! - [`memory::InMemoryService`]: in-process fake for testing
//!   - understands the handful of report expressions the commands issue
//!   - can be told to reject a given event or fail reports
//!
//! ## Failure normalization
//!
//! Implementations map responses onto the crate's error taxonomy:
//! - unknown contract or declaration id → `FiretruckError::NotFound`
//! - a report the service could not evaluate → `FiretruckError::Evaluation`
//! - anything else unexpected → `FiretruckError::Transport`
//!
//! A rejected event is not an error at this level; it is reported as
//! [`EventOutcome::Rejected`] so that the migration engine can decide what to do.
//!
//! Methods take `&self` and implementations are `Sync`, so listing commands can share
//! one service across a bounded group of worker threads.

use crate::error::Result;
use crate::model::{
    Contract, Declaration, EventOutcome, InstantiationRequest, InstantiationResponse,
    ResidualSource,
};
use crate::value::Value;

pub mod http;
pub mod memory;

pub trait ContractService: Sync {
    /// All instantiated contracts.
    fn list_contracts(&self) -> Result<Vec<Contract>>;

    fn get_contract(&self, id: &str) -> Result<Contract>;

    /// Evaluates `expression` on the contract `contract_id`, or globally when `None`.
    fn evaluate_report(
        &self,
        contract_id: Option<&str>,
        expression: &str,
        values: &[Value],
    ) -> Result<Value>;

    fn residual_source(&self, id: &str, simplify: bool) -> Result<ResidualSource>;

    fn apply_event(&self, contract_id: &str, record: &Value) -> Result<EventOutcome>;

    fn instantiate(&self, request: &InstantiationRequest) -> Result<InstantiationResponse>;

    fn get_declaration(&self, declaration_id: &str) -> Result<Declaration>;
}
