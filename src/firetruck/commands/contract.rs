use crate::commands::report::number_of_events;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::remote::ContractService;

/// Contract details plus the number of events applied to it.
pub fn run<S: ContractService>(service: &S, id: &str) -> Result<CmdResult> {
    let contract = service.get_contract(id)?;
    let events = number_of_events(service, id)?;
    Ok(CmdResult::default()
        .with_contract(contract)
        .with_event_count(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FiretruckError;
    use crate::remote::memory::{fixtures, InMemoryService};

    #[test]
    fn shows_contract_and_event_count() {
        let service = InMemoryService::new();
        service.add_contract("c1", fixtures::events(3));

        let result = run(&service, "c1").unwrap();
        assert_eq!(result.contract.map(|c| c.id), Some("c1".to_string()));
        assert_eq!(result.event_count, Some(3));
    }

    #[test]
    fn unknown_contract() {
        let service = InMemoryService::new();
        let err = run(&service, "ghost").unwrap_err();
        assert_eq!(err.to_string(), "Could not find contract with id: ghost");
        assert!(matches!(err, FiretruckError::NotFound { .. }));
    }
}
