//! Property-based tests for query construction, threshold classification
//! and the statistical tests.
//!
//! ## Test Categories
//!
//! ### 1. Sample queries
//! - `LIMIT` appears exactly when a positive limit is given
//! - `WHERE` appears exactly when a non-blank filter is given
//!
//! ### 2. Thresholds
//! - Fail takes precedence over warn
//! - A split zone is the complement of the matching range
//!
//! ### 3. Statistics
//! - Statistics and p-values stay within their ranges

use proptest::prelude::*;
use std::collections::BTreeMap;
use term_drift::core::{
    CheckLocation, CheckOutcome, CheckValue, ScanContext, ThresholdEvaluator, ThresholdPredicate,
};
use term_drift::distribution::{chi_square_goodness_of_fit, ks_two_sample};
use term_drift::query::{QueryBuilder, VariableResolver};

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}".prop_filter("reserved words", |s| {
        !["select", "from", "where", "limit"].contains(&s.as_str())
    })
}

fn bound() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(-100.0f64..100.0)
}

fn predicate() -> impl Strategy<Value = ThresholdPredicate> {
    (bound(), bound(), bound(), bound()).prop_map(|(lt, lte, gt, gte)| ThresholdPredicate {
        lt,
        lte,
        gt,
        gte,
    })
}

proptest! {
    #[test]
    fn prop_values_query_shape(
        column in identifier(),
        table in identifier(),
        filter in prop::option::of("[a-z]{1,8} = [0-9]{1,4}"),
        limit in prop::option::of(0u64..10_000),
    ) {
        let ctx = ScanContext::new();
        let sql = QueryBuilder::new(&VariableResolver, &ctx)
            .build_values_query(&column, &table, filter.as_deref(), limit)
            .unwrap();

        let expected_prefix = format!("SELECT \n  {column} \nFROM {table}");
        prop_assert!(sql.starts_with(&expected_prefix));

        match limit {
            Some(n) if n > 0 => {
                let expected_suffix = format!("\n LIMIT {n}");
                prop_assert!(sql.ends_with(&expected_suffix));
            }
            _ => prop_assert!(!sql.contains("LIMIT")),
        }

        match &filter {
            Some(f) => {
                let expected_where = format!("\nWHERE {f}");
                prop_assert!(sql.contains(&expected_where));
            }
            None => prop_assert!(!sql.contains("WHERE")),
        }
    }

    #[test]
    fn prop_fail_takes_precedence(
        warn in prop::option::of(predicate()),
        fail in prop::option::of(predicate()),
        value in -150.0f64..150.0,
    ) {
        let location = CheckLocation::unknown();
        let outcome = ThresholdEvaluator::evaluate(
            Some(&CheckValue::Number(value)),
            warn.as_ref(),
            fail.as_ref(),
            &location,
        );

        if warn.is_none() && fail.is_none() {
            prop_assert_eq!(outcome, None);
        } else if fail.as_ref().is_some_and(|f| f.is_bad(value)) {
            prop_assert_eq!(outcome, Some(CheckOutcome::Fail));
        } else if warn.as_ref().is_some_and(|w| w.is_bad(value)) {
            prop_assert_eq!(outcome, Some(CheckOutcome::Warn));
        } else {
            prop_assert_eq!(outcome, Some(CheckOutcome::Pass));
        }
    }

    #[test]
    fn prop_identical_warn_and_fail_never_warns(
        threshold in predicate(),
        value in -150.0f64..150.0,
    ) {
        let outcome = ThresholdEvaluator::evaluate(
            Some(&CheckValue::Number(value)),
            Some(&threshold),
            Some(&threshold),
            &CheckLocation::unknown(),
        );
        prop_assert_ne!(outcome, Some(CheckOutcome::Warn));
    }

    #[test]
    fn prop_split_zone_is_complement_of_range(
        a in -100.0f64..100.0,
        width in 0.001f64..100.0,
        value in -250.0f64..250.0,
    ) {
        let b = a + width;
        let inside = ThresholdPredicate::between(a, b);
        let outside = ThresholdPredicate::not_between(a, b);

        prop_assert!(outside.is_split_zone());
        prop_assert!(!inside.is_split_zone());
        prop_assert_eq!(outside.is_bad(value), !inside.is_bad(value));
    }

    #[test]
    fn prop_empty_predicate_never_bad(value in prop::num::f64::NORMAL) {
        prop_assert!(!ThresholdPredicate::new().is_bad(value));
    }

    #[test]
    fn prop_ks_ranges(
        sample in prop::collection::vec(-1e6f64..1e6, 1..60),
        reference in prop::collection::vec(-1e6f64..1e6, 1..60),
    ) {
        let (statistic, p_value) = ks_two_sample(&sample, &reference);
        prop_assert!((0.0..=1.0).contains(&statistic));
        prop_assert!((0.0..=1.0).contains(&p_value));

        let (self_statistic, self_p) = ks_two_sample(&sample, &sample);
        prop_assert_eq!(self_statistic, 0.0);
        prop_assert_eq!(self_p, 1.0);
    }

    #[test]
    fn prop_chi_square_ranges(
        labels in prop::collection::vec(0usize..4, 1..200),
        weights in prop::collection::vec(0.1f64..10.0, 4),
    ) {
        let observed: Vec<String> = labels.iter().map(|l| format!("c{l}")).collect();
        let reference: BTreeMap<String, f64> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| (format!("c{i}"), *w))
            .collect();

        let (statistic, p_value) = chi_square_goodness_of_fit(&observed, &reference);
        prop_assert!(statistic >= 0.0);
        prop_assert!((0.0..=1.0).contains(&p_value));
    }
}
