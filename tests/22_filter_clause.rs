mod common;

use jobly_api_rust::clause::{build_filter_clause, filters_from_query, ClauseError, CompareOp};
use jobly_api_rust::database::models::{CompanyFilter, JobFilter};
use serde_json::json;

use common::{payload, placeholder_count};

#[test]
fn empty_filter_yields_empty_clause() {
    let empty = payload(json!({}));
    let companies = build_filter_clause::<CompanyFilter>(&empty).unwrap();
    assert_eq!(companies.clause_text, "");
    assert!(companies.values.is_empty());

    let jobs = build_filter_clause::<JobFilter>(&empty).unwrap();
    assert_eq!(jobs.clause_text, "");
    assert!(jobs.values.is_empty());
}

#[test]
fn company_filters_use_pattern_and_inclusive_range() {
    let filters = payload(json!({ "name": "C1", "minEmployees": 0, "maxEmployees": 2 }));
    let clause = build_filter_clause::<CompanyFilter>(&filters).unwrap();
    assert_eq!(
        clause.clause_text,
        "\"name\" ILIKE $1 AND \"num_employees\">=$2 AND \"num_employees\"<=$3"
    );
    assert_eq!(clause.values, vec![json!("%C1%"), json!(0), json!(2)]);
    assert_eq!(placeholder_count(&clause.clause_text), clause.values.len());
}

#[test]
fn pattern_match_wraps_value() {
    let filters = payload(json!({ "name": "Acme" }));
    let clause = build_filter_clause::<CompanyFilter>(&filters).unwrap();
    assert_eq!(clause.terms()[0].operator, CompareOp::ILike);
    assert_eq!(clause.values, vec![json!("%Acme%")]);
}

#[test]
fn unknown_filter_is_rejected_regardless_of_other_keys() {
    let filters = payload(json!({ "name": "Acme", "handle": "c1" }));
    assert_eq!(
        build_filter_clause::<CompanyFilter>(&filters).unwrap_err(),
        ClauseError::UnsupportedFilterField("handle".to_string())
    );

    let filters = payload(json!({ "minSalary": 10, "salary": 5 }));
    assert_eq!(
        build_filter_clause::<JobFilter>(&filters).unwrap_err(),
        ClauseError::UnsupportedFilterField("salary".to_string())
    );
}

#[test]
fn min_above_max_is_invalid_range() {
    let filters = payload(json!({ "minEmployees": 10, "maxEmployees": 5 }));
    assert_eq!(
        build_filter_clause::<CompanyFilter>(&filters).unwrap_err(),
        ClauseError::InvalidRange { min_field: "minEmployees", max_field: "maxEmployees" }
    );
}

#[test]
fn string_range_values_are_coerced_before_the_range_check() {
    let filters = payload(json!({ "minEmployees": "10", "maxEmployees": "5" }));
    assert_eq!(
        build_filter_clause::<CompanyFilter>(&filters).unwrap_err(),
        ClauseError::InvalidRange { min_field: "minEmployees", max_field: "maxEmployees" }
    );

    let filters = payload(json!({ "minEmployees": "5", "maxEmployees": 10 }));
    let clause = build_filter_clause::<CompanyFilter>(&filters).unwrap();
    assert_eq!(clause.values, vec![json!(5), json!(10)]);
}

#[test]
fn non_numeric_range_values_are_rejected() {
    let filters = payload(json!({ "minEmployees": "many", "maxEmployees": 5 }));
    assert_eq!(
        build_filter_clause::<CompanyFilter>(&filters).unwrap_err(),
        ClauseError::InvalidFilterValue { field: "minEmployees", value: "many".to_string() }
    );

    let filters = payload(json!({ "minSalary": true }));
    assert_eq!(
        build_filter_clause::<JobFilter>(&filters).unwrap_err(),
        ClauseError::InvalidFilterValue { field: "minSalary", value: "true".to_string() }
    );
}

#[test]
fn has_equity_false_drops_the_filter() {
    let filters = payload(json!({ "hasEquity": false }));
    let clause = build_filter_clause::<JobFilter>(&filters).unwrap();
    assert_eq!(clause.clause_text, "");
    assert!(clause.values.is_empty());
    assert_eq!(clause.where_sql(), "");
}

#[test]
fn has_equity_true_compares_against_zero() {
    let filters = payload(json!({ "title": "jobtitle", "minSalary": 10000, "hasEquity": true }));
    let clause = build_filter_clause::<JobFilter>(&filters).unwrap();
    assert_eq!(
        clause.clause_text,
        "\"title\" ILIKE $1 AND \"salary\">=$2 AND \"equity\">$3"
    );
    assert_eq!(clause.values, vec![json!("%jobtitle%"), json!(10000), json!(0)]);
}

#[test]
fn dropped_filter_in_the_middle_keeps_positions_contiguous() {
    let filters = payload(json!({ "title": "dev", "hasEquity": false, "minSalary": 5 }));
    let clause = build_filter_clause::<JobFilter>(&filters).unwrap();
    assert_eq!(clause.clause_text, "\"title\" ILIKE $1 AND \"salary\">=$2");
    assert_eq!(clause.values, vec![json!("%dev%"), json!(5)]);
}

#[test]
fn caller_payload_is_untouched_and_output_repeatable() {
    let filters = payload(json!({ "title": "dev", "hasEquity": true }));
    let first = build_filter_clause::<JobFilter>(&filters).unwrap();
    let second = build_filter_clause::<JobFilter>(&filters).unwrap();
    assert_eq!(first, second);
    assert_eq!(filters, payload(json!({ "title": "dev", "hasEquity": true })));
}

#[test]
fn query_string_feeds_the_builder() {
    let filters = filters_from_query::<CompanyFilter>("name=net&minEmployees=100&maxEmployees=500").unwrap();
    let clause = build_filter_clause::<CompanyFilter>(&filters).unwrap();
    assert_eq!(clause.values, vec![json!("%net%"), json!(100), json!(500)]);

    let filters = filters_from_query::<JobFilter>("hasEquity=false&minSalary=20").unwrap();
    let clause = build_filter_clause::<JobFilter>(&filters).unwrap();
    assert_eq!(clause.clause_text, "\"salary\">=$1");

    assert_eq!(
        filters_from_query::<JobFilter>("hasEquity=maybe").unwrap_err(),
        ClauseError::InvalidFilterValue { field: "hasEquity", value: "maybe".to_string() }
    );
}
