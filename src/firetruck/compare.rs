//! Orderings over report results that may be missing or of an unexpected kind.
//!
//! A report evaluated across many contracts can fail for some of them. Those results
//! still have to take part in a total order, so both comparers put absent and
//! ill-typed values first and treat them as equal to each other. Combined with a stable
//! sort this keeps failed results in encounter order.

use crate::value::Value;
use chrono::DateTime;
use std::cmp::Ordering;

pub fn int_value_comparer(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    compare_by(a.and_then(Value::as_int), b.and_then(Value::as_int), |x, y| {
        x.cmp(&y)
    })
}

pub fn instant_value_comparer(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    compare_by(
        a.and_then(Value::as_instant),
        b.and_then(Value::as_instant),
        compare_instants,
    )
}

fn compare_by<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => cmp(x, y),
    }
}

/// Order of two serialized instants.
///
/// Instants that are not RFC 3339 come before all others and are ordered by their
/// text among themselves; RFC 3339 instants are ordered chronologically.
pub fn compare_instants(a: &str, b: &str) -> Ordering {
    match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Err(_), Err(_)) => a.cmp(b),
        (Err(_), Ok(_)) => Ordering::Less,
        (Ok(_), Err(_)) => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_sort_numerically_with_absent_first() {
        let mut values = vec![Some(Value::int(5)), None, Some(Value::int(2))];
        values.sort_by(|a, b| int_value_comparer(a.as_ref(), b.as_ref()));
        assert_eq!(values, vec![None, Some(Value::int(2)), Some(Value::int(5))]);
    }

    #[test]
    fn wrong_kind_sorts_with_absent() {
        let string = Value::string("oops");
        assert_eq!(
            int_value_comparer(Some(&string), Some(&Value::int(-100))),
            Ordering::Less
        );
        assert_eq!(int_value_comparer(Some(&string), None), Ordering::Equal);
    }

    #[test]
    fn absent_values_keep_encounter_order() {
        let mut rows = vec![
            ("c1", Some(Value::int(3))),
            ("c2", None),
            ("c3", Some(Value::boolean(true))),
            ("c4", None),
        ];
        rows.sort_by(|a, b| int_value_comparer(a.1.as_ref(), b.1.as_ref()));
        let ids: Vec<_> = rows.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["c2", "c3", "c4", "c1"]);
    }

    #[test]
    fn instants_sort_chronologically() {
        let earlier = Value::instant("2020-01-01T10:00:00+02:00");
        let later = Value::instant("2020-01-01T09:00:00Z");
        // lexically "...10:00" > "...09:00", chronologically it is earlier
        assert_eq!(
            instant_value_comparer(Some(&earlier), Some(&later)),
            Ordering::Less
        );
        assert_eq!(
            instant_value_comparer(Some(&later), Some(&earlier)),
            Ordering::Greater
        );
        assert_eq!(
            instant_value_comparer(Some(&later), Some(&later.clone())),
            Ordering::Equal
        );
    }

    #[test]
    fn instants_put_absent_first() {
        let instant = Value::instant("2020-01-01T00:00:00Z");
        assert_eq!(instant_value_comparer(None, Some(&instant)), Ordering::Less);
        assert_eq!(
            instant_value_comparer(Some(&instant), Some(&Value::int(1))),
            Ordering::Greater
        );
    }

    #[test]
    fn unparsable_instants_come_first_in_text_order() {
        assert_eq!(compare_instants("a", "b"), Ordering::Less);
        assert_eq!(
            compare_instants("2020-01-01T00:00:00Z", "not a date"),
            Ordering::Greater
        );
        assert_eq!(
            compare_instants("not a date", "2020-01-01T00:00:00Z"),
            Ordering::Less
        );
    }

    #[test]
    fn mixed_instants_order_is_transitive() {
        let a = "2020-01-01T10:00:00+02:00";
        let b = "2020-01-01T09:00:00Z";
        let c = "2020-01-01T09:30:00";

        assert_eq!(compare_instants(a, b), Ordering::Less);
        assert_eq!(compare_instants(c, a), Ordering::Less);
        assert_eq!(compare_instants(c, b), Ordering::Less);

        let permutations = [[a, b, c], [a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]];
        for mut instants in permutations {
            instants.sort_by(|x, y| compare_instants(x, y));
            assert_eq!(instants, [c, a, b]);
        }
    }
}
