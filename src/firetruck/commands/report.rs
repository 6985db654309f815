use crate::commands::{CmdResult, ReportRow, EVENT_COUNT_EXPRESSION};
use crate::error::{FiretruckError, Result};
use crate::remote::ContractService;
use crate::value::Value;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::thread;

/// Orders two report results; see [`crate::compare`].
pub type ValueComparer = fn(Option<&Value>, Option<&Value>) -> Ordering;

pub fn run<S: ContractService>(
    service: &S,
    contract_id: Option<&str>,
    expression: &str,
    values: &[Value],
) -> Result<CmdResult> {
    let value = service.evaluate_report(contract_id, expression, values)?;
    Ok(CmdResult::default().with_value(value))
}

/// Evaluates a report on one contract, treating any failure as "no value".
pub fn report_maybe<S: ContractService>(service: &S, id: &str, expression: &str) -> Option<Value> {
    match service.evaluate_report(Some(id), expression, &[]) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(contract = id, error = %e, "report failed, treating as absent");
            None
        }
    }
}

/// Evaluates `expression` on every contract in `ids`, at most `concurrency` at a time.
///
/// Rows come back in the order of `ids`, whatever order the evaluations finish in.
pub fn map_report<S: ContractService>(
    service: &S,
    ids: &[String],
    expression: &str,
    concurrency: usize,
) -> Vec<ReportRow> {
    let workers = concurrency.max(1).min(ids.len());
    if workers <= 1 {
        return ids
            .iter()
            .map(|id| ReportRow {
                id: id.clone(),
                value: report_maybe(service, id, expression),
            })
            .collect();
    }

    let next = AtomicUsize::new(0);
    let next = &next;
    let mut values: Vec<Option<Value>> = vec![None; ids.len()];
    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let index = next.fetch_add(1, AtomicOrdering::Relaxed);
                        let Some(id) = ids.get(index) else {
                            break;
                        };
                        done.push((index, report_maybe(service, id, expression)));
                    }
                    done
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(done) => {
                    for (index, value) in done {
                        values[index] = value;
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });

    ids.iter()
        .cloned()
        .zip(values)
        .map(|(id, value)| ReportRow { id, value })
        .collect()
}

/// Evaluates a report on every contract and sorts the rows with `comparer`.
///
/// The sort is stable, so rows the comparer considers equal keep the order of `ids`.
pub fn sort_by_report<S: ContractService>(
    service: &S,
    ids: &[String],
    expression: &str,
    comparer: ValueComparer,
    concurrency: usize,
) -> Vec<ReportRow> {
    let mut rows = map_report(service, ids, expression, concurrency);
    rows.sort_by(|a, b| comparer(a.value.as_ref(), b.value.as_ref()));
    rows
}

pub fn number_of_events<S: ContractService>(service: &S, id: &str) -> Result<i64> {
    let value = service.evaluate_report(Some(id), EVENT_COUNT_EXPRESSION, &[])?;
    value.as_int().ok_or_else(|| {
        FiretruckError::Transport(format!(
            "expected an integer event count for contract {}, got {}",
            id,
            value.class()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::int_value_comparer;
    use crate::remote::memory::{fixtures, InMemoryService};

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn evaluates_on_contract() {
        let service = InMemoryService::new();
        service.add_contract("c1", fixtures::events(3));

        let result = run(&service, Some("c1"), EVENT_COUNT_EXPRESSION, &[]).unwrap();
        assert_eq!(result.value, Some(Value::int(3)));
    }

    #[test]
    fn evaluates_globally() {
        let service = InMemoryService::new();
        service.set_global_report("1 + 1", Value::int(2));

        let result = run(&service, None, "1 + 1", &[]).unwrap();
        assert_eq!(result.value, Some(Value::int(2)));
    }

    #[test]
    fn unknown_contract_is_not_found() {
        let service = InMemoryService::new();
        let err = run(&service, Some("nope"), EVENT_COUNT_EXPRESSION, &[]).unwrap_err();
        assert!(matches!(err, FiretruckError::NotFound { .. }));
    }

    #[test]
    fn failing_expression_is_evaluation_error() {
        let service = InMemoryService::new();
        service.add_contract("c1", vec![]);
        let err = run(&service, Some("c1"), "bogus", &[]).unwrap_err();
        assert!(matches!(err, FiretruckError::Evaluation(_)));
    }

    #[test]
    fn report_maybe_swallows_failures() {
        let service = InMemoryService::new();
        service.add_contract("c1", vec![]);
        service.fail_reports("c1");

        assert_eq!(report_maybe(&service, "c1", EVENT_COUNT_EXPRESSION), None);
        assert_eq!(report_maybe(&service, "missing", EVENT_COUNT_EXPRESSION), None);
    }

    #[test]
    fn map_report_keeps_input_order() {
        let service = InMemoryService::new();
        for (id, count) in [("a", 4), ("b", 1), ("c", 0), ("d", 2), ("e", 7)] {
            service.add_contract(id, fixtures::events(count));
        }
        let all = ids(&["e", "a", "c", "b", "d"]);

        let rows = map_report(&service, &all, EVENT_COUNT_EXPRESSION, 3);
        let got: Vec<_> = rows.iter().map(|r| (r.id.as_str(), r.value.clone())).collect();
        assert_eq!(
            got,
            vec![
                ("e", Some(Value::int(7))),
                ("a", Some(Value::int(4))),
                ("c", Some(Value::int(0))),
                ("b", Some(Value::int(1))),
                ("d", Some(Value::int(2))),
            ]
        );
    }

    #[test]
    fn sort_by_report_puts_failures_first() {
        let service = InMemoryService::new();
        service.add_contract("five", fixtures::events(5));
        service.add_contract("broken", fixtures::events(1));
        service.add_contract("two", fixtures::events(2));
        service.fail_reports("broken");

        let rows = sort_by_report(
            &service,
            &ids(&["five", "broken", "two"]),
            EVENT_COUNT_EXPRESSION,
            int_value_comparer,
            4,
        );
        let order: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["broken", "two", "five"]);
        assert_eq!(rows[0].value, None);
    }

    #[test]
    fn counts_events() {
        let service = InMemoryService::new();
        service.add_contract("c1", fixtures::events(2));
        assert_eq!(number_of_events(&service, "c1").unwrap(), 2);
    }
}
