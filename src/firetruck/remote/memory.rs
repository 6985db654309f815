use super::ContractService;
use crate::commands::{EVENTS_EXPRESSION, EVENT_COUNT_EXPRESSION, LAST_TIMESTAMP_EXPRESSION};
use crate::error::{FiretruckError, Result};
use crate::model::{
    Contract, Declaration, EventOutcome, InstantiationRequest, InstantiationResponse,
    ResidualSource,
};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct StoredContract {
    contract: Contract,
    events: Vec<Value>,
    residual: String,
}

#[derive(Default)]
struct State {
    contracts: BTreeMap<String, StoredContract>,
    declarations: HashMap<String, Declaration>,
    global_reports: HashMap<String, Value>,
    /// contract id → zero-based index of the apply call that gets rejected
    reject_apply_at: HashMap<String, usize>,
    apply_calls: HashMap<String, usize>,
    failing_reports: HashSet<String>,
    next_id: usize,
}

/// In-memory contract service for testing and development.
///
/// Only understands the report expressions the commands themselves issue (the event
/// list, the event count and the last event's timestamp) plus global reports
/// registered up front. Anything else fails to evaluate.
#[derive(Default)]
pub struct InMemoryService {
    state: Mutex<State>,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // poisoning is ignored: the state is plain data
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_contract(&self, id: &str, events: Vec<Value>) {
        self.lock().contracts.insert(
            id.to_string(),
            StoredContract {
                contract: Contract::new(id, format!("contract {}", id)),
                events,
                residual: format!("residual of {}", id),
            },
        );
    }

    pub fn add_declaration(&self, declaration: Declaration) {
        self.lock()
            .declarations
            .insert(declaration.id.clone(), declaration);
    }

    pub fn set_global_report(&self, expression: &str, value: Value) {
        self.lock()
            .global_reports
            .insert(expression.to_string(), value);
    }

    /// Rejects the `call`-th (zero-based) event applied to `id`.
    pub fn reject_apply_at(&self, id: &str, call: usize) {
        self.lock().reject_apply_at.insert(id.to_string(), call);
    }

    /// Makes every report on `id` fail to evaluate.
    pub fn fail_reports(&self, id: &str) {
        self.lock().failing_reports.insert(id.to_string());
    }

    pub fn events(&self, id: &str) -> Vec<Value> {
        self.lock()
            .contracts
            .get(id)
            .map(|c| c.events.clone())
            .unwrap_or_default()
    }

    /// Number of apply requests received for `id`, including rejected ones.
    pub fn apply_calls(&self, id: &str) -> usize {
        self.lock().apply_calls.get(id).copied().unwrap_or(0)
    }
}

fn evaluate(events: &[Value], expression: &str) -> Result<Value> {
    match expression {
        EVENTS_EXPRESSION => Ok(Value::list(events.to_vec())),
        EVENT_COUNT_EXPRESSION => Ok(Value::int(events.len() as i64)),
        LAST_TIMESTAMP_EXPRESSION => events
            .last()
            .and_then(|event| event.field("timestamp"))
            .cloned()
            .ok_or_else(|| FiretruckError::Evaluation("Pattern match failure".into())),
        other => Err(FiretruckError::Evaluation(format!(
            "Cannot evaluate expression: {}",
            other
        ))),
    }
}

impl ContractService for InMemoryService {
    fn list_contracts(&self) -> Result<Vec<Contract>> {
        Ok(self
            .lock()
            .contracts
            .values()
            .map(|c| c.contract.clone())
            .collect())
    }

    fn get_contract(&self, id: &str) -> Result<Contract> {
        self.lock()
            .contracts
            .get(id)
            .map(|c| c.contract.clone())
            .ok_or_else(|| FiretruckError::contract_not_found(id))
    }

    fn evaluate_report(
        &self,
        contract_id: Option<&str>,
        expression: &str,
        _values: &[Value],
    ) -> Result<Value> {
        let state = self.lock();
        match contract_id {
            Some(id) => {
                let stored = state
                    .contracts
                    .get(id)
                    .ok_or_else(|| FiretruckError::contract_not_found(id))?;
                if state.failing_reports.contains(id) {
                    return Err(FiretruckError::Evaluation(format!(
                        "Evaluation failed on contract {}",
                        id
                    )));
                }
                evaluate(&stored.events, expression)
            }
            None => state.global_reports.get(expression).cloned().ok_or_else(|| {
                FiretruckError::Evaluation(format!("Cannot evaluate expression: {}", expression))
            }),
        }
    }

    fn residual_source(&self, id: &str, _simplify: bool) -> Result<ResidualSource> {
        self.lock()
            .contracts
            .get(id)
            .map(|c| ResidualSource {
                csl: c.residual.clone(),
            })
            .ok_or_else(|| FiretruckError::contract_not_found(id))
    }

    fn apply_event(&self, contract_id: &str, record: &Value) -> Result<EventOutcome> {
        let mut state = self.lock();
        if !state.contracts.contains_key(contract_id) {
            return Err(FiretruckError::contract_not_found(contract_id));
        }
        let call = {
            let calls = state.apply_calls.entry(contract_id.to_string()).or_insert(0);
            *calls += 1;
            *calls - 1
        };
        if state.reject_apply_at.get(contract_id) == Some(&call) {
            return Ok(EventOutcome::Rejected(format!(
                "status 400: event {} rejected",
                call
            )));
        }
        if !matches!(record, Value::Record { .. }) {
            return Ok(EventOutcome::Rejected(format!(
                "status 400: expected a record, got {}",
                record.class()
            )));
        }
        if let Some(stored) = state.contracts.get_mut(contract_id) {
            stored.events.push(record.clone());
        }
        Ok(EventOutcome::Applied)
    }

    fn instantiate(&self, request: &InstantiationRequest) -> Result<InstantiationResponse> {
        let mut state = self.lock();
        if !state.declarations.contains_key(&request.declaration_id) {
            return Err(FiretruckError::declaration_not_found(&request.declaration_id));
        }
        state.next_id += 1;
        let id = format!("contract-{}", state.next_id);
        let mut contract = Contract::new(&id, &request.name);
        contract.declaration_id = Some(request.declaration_id.clone());
        contract.entry_point = Some(request.entry_point.clone());
        contract.peers = request.peers.clone();
        state.contracts.insert(
            id.clone(),
            StoredContract {
                contract,
                events: Vec::new(),
                residual: String::new(),
            },
        );
        Ok(InstantiationResponse { contract_id: id })
    }

    fn get_declaration(&self, declaration_id: &str) -> Result<Declaration> {
        self.lock()
            .declarations
            .get(declaration_id)
            .cloned()
            .ok_or_else(|| FiretruckError::declaration_not_found(declaration_id))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::value::{QualifiedName, Value};

    /// A record event tagged `tag` with a sequence number and timestamp.
    pub fn event(tag: &str, seq: i64, timestamp: &str) -> Value {
        Value::record(
            QualifiedName::unqualified(tag),
            [
                ("seq", Value::int(seq)),
                ("timestamp", Value::instant(timestamp)),
            ],
        )
    }

    /// `count` events, one per minute from 2020-01-01T00:00:00Z.
    pub fn events(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                event(
                    "Tick",
                    i as i64,
                    &format!("2020-01-01T00:{:02}:00Z", i % 60),
                )
            })
            .collect()
    }
}
