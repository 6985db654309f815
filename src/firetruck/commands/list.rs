use crate::commands::report::sort_by_report;
use crate::commands::{
    CmdResult, Listing, EVENT_COUNT_EXPRESSION, LAST_TIMESTAMP_EXPRESSION,
};
use crate::compare::{instant_value_comparer, int_value_comparer};
use crate::error::Result;
use crate::remote::ContractService;

pub fn contract_ids<S: ContractService>(service: &S) -> Result<Vec<String>> {
    Ok(service
        .list_contracts()?
        .into_iter()
        .map(|c| c.id)
        .collect())
}

pub fn run<S: ContractService>(service: &S) -> Result<CmdResult> {
    Ok(CmdResult::default().with_contract_ids(contract_ids(service)?))
}

pub fn count<S: ContractService>(service: &S) -> Result<CmdResult> {
    let count = service.list_contracts()?.len();
    Ok(CmdResult::default().with_contract_count(count))
}

pub fn by_event_count<S: ContractService>(service: &S, concurrency: usize) -> Result<CmdResult> {
    let ids = contract_ids(service)?;
    let rows = sort_by_report(
        service,
        &ids,
        EVENT_COUNT_EXPRESSION,
        int_value_comparer,
        concurrency,
    );
    Ok(CmdResult::default().with_listing(Listing {
        label: "event count",
        missing: "null",
        rows,
    }))
}

pub fn by_latest_timestamp<S: ContractService>(
    service: &S,
    concurrency: usize,
) -> Result<CmdResult> {
    let ids = contract_ids(service)?;
    let rows = sort_by_report(
        service,
        &ids,
        LAST_TIMESTAMP_EXPRESSION,
        instant_value_comparer,
        concurrency,
    );
    Ok(CmdResult::default().with_listing(Listing {
        label: "last timestamp",
        missing: "N/A",
        rows,
    }))
}
