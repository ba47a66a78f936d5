// Unit tests for Crime Stats

use crime_stats::auth::{AuthError, TokenService};
use crime_stats::core::{
    flatten_records, frequency_table, normalize_label, to_csv, Breakdown, MonthError,
    RecordLimit, SelectionError, YearMonth,
};
use crime_stats::services::crime_api::decode_outcomes;
use serde_json::json;

fn outcome(code: &str, category: &str, subtype: &str) -> serde_json::Value {
    json!({
        "category": { "code": code, "name": code },
        "date": "2023-01",
        "person_id": null,
        "crime": {
            "category": category,
            "location_type": "Force",
            "location": {
                "latitude": "51.509865",
                "longitude": "-0.118092",
                "street": { "id": 1, "name": "On or near Strand" }
            },
            "context": "",
            "persistent_id": "abc",
            "id": 42,
            "location_subtype": subtype,
            "month": "2023-01"
        }
    })
}

#[test]
fn test_counts_sum_to_input_length() {
    let labels = ["a", "b", "c", "a", "b", "a", "d", "e", "e"];
    let rows = frequency_table(labels);

    let total: u64 = rows.iter().map(|r| r.count).sum();
    assert_eq!(total, labels.len() as u64);

    let share: f64 = rows.iter().map(|r| r.share).sum();
    assert!((share - 1.0).abs() < 1e-9);
}

#[test]
fn test_rows_ascending_and_ties_keep_first_seen_order() {
    let rows = frequency_table(["x", "y", "z", "y", "x", "x"]);
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["z", "y", "x"]);

    for pair in rows.windows(2) {
        assert!(pair[0].count <= pair[1].count);
    }

    let tied = frequency_table(["q", "p", "q", "p"]);
    assert_eq!(tied[0].label, "q");
    assert_eq!(tied[1].label, "p");
}

#[test]
fn test_two_to_one_split() {
    let rows = frequency_table(["a", "b", "a"]);
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].label.as_str(), rows[0].count), ("b", 1));
    assert_eq!((rows[1].label.as_str(), rows[1].count), ("a", 2));
    assert!((rows[0].share - 1.0 / 3.0).abs() < 1e-9);
    assert!((rows[1].share - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_empty_input_gives_empty_table() {
    let rows = frequency_table(Vec::<String>::new());
    assert!(rows.is_empty());
}

#[test]
fn test_normalized_labels_merge() {
    assert_eq!(normalize_label("Violence  (with injury)"), "violence_with_injury");

    let rows = frequency_table(["Local resolution", "local  resolution", "LOCAL RESOLUTION"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, "local_resolution");
    assert_eq!(rows[0].count, 3);
}

#[test]
fn test_month_parsing() {
    let month = YearMonth::parse_compact("20231").unwrap();
    assert_eq!(month.to_string(), "2023-01");
    assert_eq!(YearMonth::parse_compact("202312").unwrap().to_string(), "2023-12");
    assert_eq!(YearMonth::parse_compact("2023-07").unwrap().to_string(), "2023-07");

    assert!(matches!(YearMonth::parse_compact("2023"), Err(MonthError::InvalidLength(_))));
    assert!(matches!(YearMonth::parse_compact("2023ab"), Err(MonthError::NonNumeric(_))));
    assert!(matches!(YearMonth::parse_compact("202313"), Err(MonthError::MonthOutOfRange(_))));
    assert!(matches!(YearMonth::parse_compact("20230"), Err(MonthError::MonthOutOfRange(_))));
}

#[test]
fn test_token_valid_just_before_expiry() {
    let tokens = TokenService::new("unit-test-secret", 600);
    let token = tokens.issue_at(7, 1_000_000).unwrap();

    let claims = tokens.verify_at(&token, 1_000_000 + 599).unwrap();
    assert_eq!(claims.id, 7);

    assert!(matches!(
        tokens.verify_at(&token, 1_000_000 + 600),
        Err(AuthError::TokenExpired)
    ));
}

#[test]
fn test_token_signed_with_other_key_rejected() {
    let ours = TokenService::new("one", 600);
    let theirs = TokenService::new("two", 600);
    let token = theirs.issue(1).unwrap();

    assert!(matches!(ours.verify(&token), Err(AuthError::InvalidToken(_))));
}

#[test]
fn test_breakdowns_over_decoded_batch() {
    let batch = decode_outcomes(vec![
        outcome("burglary", "burglary", "ROAD"),
        outcome("theft", "other-theft", "ROAD"),
        outcome("burglary", "burglary", "STATION"),
        json!("not a record"),
    ]);
    assert_eq!(batch.records.len(), 3);
    assert_eq!(batch.skipped, 1);

    let outcomes = Breakdown::Outcome.tabulate(&batch.records);
    assert_eq!(outcomes.last().unwrap().label, "burglary");
    assert_eq!(outcomes.last().unwrap().count, 2);

    let categories = Breakdown::Category.tabulate(&batch.records);
    assert_eq!(categories[0].label, "othertheft");

    let locations = Breakdown::Location.tabulate(&batch.records);
    assert_eq!(locations.last().unwrap().label, "road");
}

#[test]
fn test_flatten_and_export() {
    let batch = decode_outcomes(vec![
        outcome("burglary", "burglary", "ROAD"),
        outcome("theft", "other-theft", "ROAD"),
    ]);

    let first = flatten_records(&batch.records, RecordLimit::First(1)).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].code.as_deref(), Some("burglary"));
    assert_eq!(first[0].street_name.as_deref(), Some("On or near Strand"));

    let all = flatten_records(&batch.records, RecordLimit::All).unwrap();
    assert_eq!(all.len(), 2);

    assert!(matches!(
        flatten_records(&batch.records, RecordLimit::First(3)),
        Err(SelectionError::LimitExceeded { requested: 3, available: 2 })
    ));

    let csv = String::from_utf8(to_csv(&all).unwrap()).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().next().unwrap().starts_with("code,"));
}
