mod common;

use wbupload_core::{CellIssue, ParseFailures, PicklistAddition, UploadResult, Uploaded};

use common::{full_tree, info, matched, no_match, null_record, rejected, uploaded};

fn uploaded_with_pick(table: &str, id: i64, value: &str) -> UploadResult {
    UploadResult::leaf(Uploaded {
        id,
        info: info(table, &[table]),
        picklist_additions: vec![PicklistAddition {
            name: "Values".to_string(),
            value: value.to_string(),
            caption: table.to_string(),
            id: id * 100,
        }],
    })
}

#[test]
fn new_rows_follow_root_to_one_to_many_order() {
    let root = uploaded_with_pick("root", 1, "r")
        .with_to_one("a", uploaded_with_pick("a", 2, "a"))
        .with_to_one("b", uploaded_with_pick("b", 3, "b"))
        .with_to_many(
            "c",
            vec![
                uploaded_with_pick("c", 4, "c0"),
                uploaded_with_pick("c", 5, "c1"),
            ],
        );

    let report = root.validation_info();
    let ids: Vec<i64> = report.new_rows.iter().map(|row| row.id).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);
    let values: Vec<&str> = report
        .picklist_additions
        .iter()
        .map(|item| item.value.as_str())
        .collect();
    assert_eq!(values, ["r", "a", "b", "c0", "c1"]);
}

#[test]
fn table_issues_follow_root_to_one_to_many_order() {
    let root = rejected("root", "root")
        .with_to_one("a", rejected("a", "a"))
        .with_to_one("b", rejected("b", "b"))
        .with_to_many("c", vec![rejected("c", "c0"), rejected("c", "c1")]);

    let issues: Vec<String> = root
        .validation_info()
        .table_issues
        .into_iter()
        .map(|issue| issue.issue)
        .collect();
    assert_eq!(issues, ["root", "a", "b", "c0", "c1"]);
}

fn unparsable(column: &str) -> UploadResult {
    UploadResult::leaf(ParseFailures {
        failures: vec![CellIssue::new(column, format!("{column} is invalid"))],
    })
}

#[test]
fn cell_issues_follow_root_to_one_to_many_order() {
    let root = unparsable("root")
        .with_to_one("a", unparsable("a"))
        .with_to_one("b", unparsable("b"))
        .with_to_many("c", vec![unparsable("c0"), unparsable("c1")]);

    let columns: Vec<String> = root
        .validation_info()
        .cell_issues
        .into_iter()
        .map(|issue| issue.column)
        .collect();
    assert_eq!(columns, ["root", "a", "b", "c0", "c1"]);
}

#[test]
fn children_contribute_their_full_subtree_before_siblings() {
    let root = rejected("root", "root")
        .with_to_one(
            "a",
            rejected("a", "a").with_to_many("a_items", vec![rejected("a_item", "a.0")]),
        )
        .with_to_one("b", rejected("b", "b"));

    let issues: Vec<String> = root
        .validation_info()
        .table_issues
        .into_iter()
        .map(|issue| issue.issue)
        .collect();
    assert_eq!(issues, ["root", "a", "a.0", "b"]);
}

#[test]
fn parse_failures_are_reemitted_verbatim() {
    let failures = vec![
        CellIssue::new("Count", "value must be an integer"),
        CellIssue::new("Start Date", "bad date"),
    ];
    let tree = matched("collectionobject", 1).with_to_many(
        "preparations",
        vec![UploadResult::leaf(ParseFailures {
            failures: failures.clone(),
        })],
    );
    let report = tree.validation_info();
    assert_eq!(report.cell_issues, failures);
    assert!(report.table_issues.is_empty());
    assert!(report.new_rows.is_empty());
}

#[test]
fn failure_deep_in_to_many_grandchild_is_detected() {
    let grandchild_parent = matched("preparation", 2)
        .with_to_many("loans", vec![matched("loan", 3), no_match("loan")]);
    let root = matched("collectionobject", 1)
        .with_to_one("cataloger", matched("agent", 4))
        .with_to_many("preparations", vec![matched("preparation", 5), grandchild_parent]);

    assert!(root.contains_failure());
    assert!(!root.record_result.is_failure());
    assert!(!root.to_one["cataloger"].contains_failure());
    assert!(!root.to_many["preparations"][0].contains_failure());
}

#[test]
fn successful_tree_has_no_failure() {
    let root = uploaded("collectionobject", 1)
        .with_to_one("cataloger", matched("agent", 2))
        .with_to_many("preparations", vec![null_record("preparation")]);
    assert!(!root.contains_failure());
    assert!(root.validation_info().is_ok());
}

#[test]
fn full_tree_report_counts() {
    let report = full_tree().validation_info();
    assert_eq!(report.new_rows.len(), 2);
    assert_eq!(report.picklist_additions.len(), 1);
    assert_eq!(report.cell_issues.len(), 2);
    let issues: Vec<&str> = report
        .table_issues
        .iter()
        .map(|issue| issue.issue.as_str())
        .collect();
    assert_eq!(
        issues,
        [
            "start date after end date",
            "Multiple records matched.",
            "No matching record for must-match table.",
        ]
    );
}
