//! # Contract Migration
//!
//! Moves the full event history of one contract onto a freshly instantiated one,
//! optionally rewriting each event on the way.
//!
//! ```text
//! source ──get_state──▶ [E1, E2, .., En] ──transform──▶ [E1', .., En'] ──load_state──▶ target
//! ```
//!
//! ## Replay
//!
//! The target must have zero events before anything is applied. Events are then sent
//! one request at a time, in order, each one acknowledged before the next is sent:
//! events do not commute, so the target has to see exactly the source's history.
//!
//! The target goes through these states:
//!
//! ```text
//! Initial ──▶ Replaying(k) ──▶ Migrated(n)
//!                  │
//!                  └──▶ Failed(k)
//! ```
//!
//! There is no rollback. A failed replay leaves `k` events on the target, which then
//! fails the zero-event precondition forever: retry against a new contract.
//!
//! The precondition is checked once, before replay, and nothing stops another client
//! from applying events to the target in between.

use crate::commands::report::number_of_events;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FiretruckError, Result};
use crate::model::{ContractState, EventOutcome};
use crate::remote::ContractService;
use crate::value::{QualifiedName, Value};

/// A pure rewrite applied to every event before replay.
pub type EventTransform = fn(Value) -> Value;

pub const KEY_LOCATION_TAG: &str = "AcceptCarShare";
pub const KEY_LOCATION_FIELD: &str = "keyLocation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    Initial,
    Replaying { applied: usize },
    Migrated { applied: usize },
    Failed { applied: usize },
}

impl ReplayState {
    pub fn applied(&self) -> usize {
        match *self {
            ReplayState::Initial => 0,
            ReplayState::Replaying { applied }
            | ReplayState::Migrated { applied }
            | ReplayState::Failed { applied } => applied,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReplayState::Migrated { .. } | ReplayState::Failed { .. })
    }

    fn event_applied(self) -> Self {
        match self {
            ReplayState::Initial => ReplayState::Replaying { applied: 1 },
            ReplayState::Replaying { applied } => ReplayState::Replaying {
                applied: applied + 1,
            },
            terminal => terminal,
        }
    }

    fn finish(self) -> Self {
        if self.is_terminal() {
            return self;
        }
        ReplayState::Migrated {
            applied: self.applied(),
        }
    }

    fn fail(self) -> Self {
        if self.is_terminal() {
            return self;
        }
        ReplayState::Failed {
            applied: self.applied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub target: String,
    pub state: ReplayState,
}

/// Reads the ordered event history of `id` by evaluating `expression` on it.
pub fn get_state<S: ContractService>(
    service: &S,
    id: &str,
    expression: &str,
) -> Result<ContractState> {
    match service.evaluate_report(Some(id), expression, &[])? {
        Value::List { elements } => Ok(ContractState::new(elements)),
        other => Err(FiretruckError::Evaluation(format!(
            "expected a list of events from {:?} on contract {}, got {}",
            expression,
            id,
            other.class()
        ))),
    }
}

/// Fails unless `id` has no events applied.
pub fn ensure_initial<S: ContractService>(service: &S, id: &str) -> Result<()> {
    let event_count = number_of_events(service, id)?;
    if event_count != 0 {
        return Err(FiretruckError::NotInitialState {
            id: id.to_string(),
            event_count,
        });
    }
    Ok(())
}

/// Replays `state` onto `id`, which must be in its initial state.
pub fn load_state<S: ContractService>(
    service: &S,
    id: &str,
    state: &ContractState,
) -> Result<MigrationReport> {
    ensure_initial(service, id)?;

    let total = state.len();
    let mut replay = ReplayState::Initial;
    for (index, event) in state.events.iter().enumerate() {
        let response = match service.apply_event(id, event) {
            Ok(EventOutcome::Applied) => {
                replay = replay.event_applied();
                tracing::debug!(contract = id, index, total, "event applied");
                continue;
            }
            Ok(EventOutcome::Rejected(response)) => response,
            Err(e) => e.to_string(),
        };

        replay = replay.fail();
        tracing::error!(contract = id, index, applied = replay.applied(), "event rejected");
        return Err(FiretruckError::Apply {
            index,
            applied: replay.applied(),
            event: serde_json::to_string_pretty(event)?,
            response,
        });
    }

    let replay = replay.finish();
    tracing::info!(contract = id, applied = replay.applied(), "replay finished");
    Ok(MigrationReport {
        target: id.to_string(),
        state: replay,
    })
}

/// Copies the history of `source_id` on `source` onto `target_id` on `target`.
pub fn run<S: ContractService, T: ContractService>(
    source: &S,
    target: &T,
    source_id: &str,
    target_id: &str,
    expression: &str,
    transform: EventTransform,
) -> Result<CmdResult> {
    let state = get_state(source, source_id, expression)?.map_events(transform);
    tracing::info!(
        source = source_id,
        target = target_id,
        events = state.len(),
        "migrating contract"
    );
    let report = load_state(target, target_id, &state)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Migrated {} events from {} to {}",
        report.state.applied(),
        source_id,
        target_id
    )));
    Ok(result.with_migration(report))
}

pub fn identity(event: Value) -> Value {
    event
}

/// Gives `AcceptCarShare` events an empty `keyLocation` when they have none.
pub fn add_empty_key_location(event: Value) -> Value {
    match event {
        Value::Record {
            record_tag,
            mut fields,
        } if record_tag == QualifiedName::unqualified(KEY_LOCATION_TAG) => {
            fields
                .entry(KEY_LOCATION_FIELD.to_string())
                .or_insert_with(|| Value::string(""));
            Value::Record { record_tag, fields }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::EVENTS_EXPRESSION;
    use crate::remote::memory::{fixtures, InMemoryService};
    use crate::render::render_value;

    fn three_events() -> Vec<Value> {
        vec![
            fixtures::event("Start", 1, "2020-01-01T00:00:00Z"),
            fixtures::event("Pay", 2, "2020-01-02T00:00:00Z"),
            fixtures::event("End", 3, "2020-01-03T00:00:00Z"),
        ]
    }

    fn car_share(key_location: Option<&str>) -> Value {
        let mut fields = vec![("car", Value::string("AB 123"))];
        if let Some(location) = key_location {
            fields.push((KEY_LOCATION_FIELD, Value::string(location)));
        }
        Value::record(QualifiedName::unqualified(KEY_LOCATION_TAG), fields)
    }

    #[test]
    fn get_state_returns_events_in_order() {
        let service = InMemoryService::new();
        service.add_contract("src", three_events());

        let state = get_state(&service, "src", EVENTS_EXPRESSION).unwrap();
        assert_eq!(state.events, three_events());
    }

    #[test]
    fn get_state_unknown_contract() {
        let service = InMemoryService::new();
        let err = get_state(&service, "ghost", EVENTS_EXPRESSION).unwrap_err();
        assert!(matches!(err, FiretruckError::NotFound { .. }));
    }

    #[test]
    fn get_state_rejects_non_list() {
        let service = InMemoryService::new();
        service.add_contract("src", three_events());
        let err = get_state(&service, "src", crate::commands::EVENT_COUNT_EXPRESSION)
            .unwrap_err();
        assert!(matches!(err, FiretruckError::Evaluation(_)));
    }

    #[test]
    fn migrates_all_events_in_order() {
        let service = InMemoryService::new();
        service.add_contract("src", three_events());
        service.add_contract("dst", vec![]);

        let result = run(&service, &service, "src", "dst", EVENTS_EXPRESSION, identity).unwrap();

        assert_eq!(service.events("dst"), three_events());
        let report = result.migration.unwrap();
        assert_eq!(report.state, ReplayState::Migrated { applied: 3 });
    }

    #[test]
    fn migrates_between_services() {
        let source = InMemoryService::new();
        let target = InMemoryService::new();
        source.add_contract("c1", three_events());
        target.add_contract("c1", vec![]);

        run(&source, &target, "c1", "c1", EVENTS_EXPRESSION, identity).unwrap();

        assert_eq!(target.events("c1"), three_events());
        assert_eq!(source.apply_calls("c1"), 0);
    }

    #[test]
    fn empty_history_migrates_nothing() {
        let service = InMemoryService::new();
        service.add_contract("src", vec![]);
        service.add_contract("dst", vec![]);

        let result = run(&service, &service, "src", "dst", EVENTS_EXPRESSION, identity).unwrap();
        assert_eq!(
            result.migration.unwrap().state,
            ReplayState::Migrated { applied: 0 }
        );
    }

    #[test]
    fn refuses_target_with_events() {
        let service = InMemoryService::new();
        service.add_contract("src", three_events());
        service.add_contract("dst", fixtures::events(1));

        let err = run(&service, &service, "src", "dst", EVENTS_EXPRESSION, identity).unwrap_err();

        assert!(matches!(
            err,
            FiretruckError::NotInitialState { ref id, event_count: 1 } if id == "dst"
        ));
        assert_eq!(service.apply_calls("dst"), 0);
        assert_eq!(service.events("dst").len(), 1);
    }

    #[test]
    fn stops_at_first_rejected_event() {
        let service = InMemoryService::new();
        service.add_contract("src", three_events());
        service.add_contract("dst", vec![]);
        service.reject_apply_at("dst", 1);

        let err = run(&service, &service, "src", "dst", EVENTS_EXPRESSION, identity).unwrap_err();

        assert_eq!(service.events("dst"), vec![three_events()[0].clone()]);
        assert_eq!(service.apply_calls("dst"), 2);
        match err {
            FiretruckError::Apply {
                index,
                applied,
                event,
                response,
            } => {
                assert_eq!(index, 1);
                assert_eq!(applied, 1);
                assert!(event.contains("\"Pay\""));
                assert!(response.contains("rejected"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn partially_migrated_target_cannot_be_reused() {
        let service = InMemoryService::new();
        service.add_contract("src", three_events());
        service.add_contract("dst", vec![]);
        service.reject_apply_at("dst", 2);

        assert!(run(&service, &service, "src", "dst", EVENTS_EXPRESSION, identity).is_err());
        let retry = run(&service, &service, "src", "dst", EVENTS_EXPRESSION, identity);
        assert!(matches!(
            retry,
            Err(FiretruckError::NotInitialState { event_count: 2, .. })
        ));
    }

    #[test]
    fn applies_transformation_before_replay() {
        let service = InMemoryService::new();
        service.add_contract(
            "src",
            vec![car_share(None), fixtures::event("Other", 1, "2020-01-01T00:00:00Z")],
        );
        service.add_contract("dst", vec![]);

        run(
            &service,
            &service,
            "src",
            "dst",
            EVENTS_EXPRESSION,
            add_empty_key_location,
        )
        .unwrap();

        let events = service.events("dst");
        assert_eq!(events[0], car_share(Some("")));
        assert_eq!(
            events[1],
            fixtures::event("Other", 1, "2020-01-01T00:00:00Z")
        );
        // source is untouched
        assert_eq!(service.events("src")[0], car_share(None));
    }

    #[test]
    fn key_location_is_never_overwritten() {
        assert_eq!(
            add_empty_key_location(car_share(Some("garage"))),
            car_share(Some("garage"))
        );
    }

    #[test]
    fn key_location_fill_is_idempotent() {
        let once = add_empty_key_location(car_share(None));
        let twice = add_empty_key_location(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, car_share(Some("")));
    }

    #[test]
    fn key_location_is_appended_after_existing_fields() {
        let event = Value::record(
            QualifiedName::unqualified(KEY_LOCATION_TAG),
            [("zone", Value::int(3)), ("car", Value::string("AB 123"))],
        );
        assert_eq!(
            render_value(&add_empty_key_location(event)),
            "AcceptCarShare { zone = 3, car = \"AB 123\", keyLocation = \"\" }"
        );
    }

    #[test]
    fn key_location_ignores_other_tags() {
        let qualified = Value::record(
            QualifiedName::new(["Other"], KEY_LOCATION_TAG),
            [("car", Value::string("AB 123"))],
        );
        assert_eq!(add_empty_key_location(qualified.clone()), qualified);
        assert_eq!(add_empty_key_location(Value::int(1)), Value::int(1));
    }

    #[test]
    fn replay_state_transitions() {
        let state = ReplayState::Initial.event_applied().event_applied();
        assert_eq!(state, ReplayState::Replaying { applied: 2 });
        assert_eq!(state.fail(), ReplayState::Failed { applied: 2 });
        assert_eq!(state.finish(), ReplayState::Migrated { applied: 2 });
        assert_eq!(
            ReplayState::Initial.finish(),
            ReplayState::Migrated { applied: 0 }
        );

        let failed = state.fail();
        assert_eq!(failed.event_applied(), failed);
        assert_eq!(failed.finish(), failed);
    }
}
