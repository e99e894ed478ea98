#![allow(dead_code)]

use wbupload_core::{
    CellIssue, FailedBusinessRule, Matched, MatchedMultiple, NoMatch, NullRecord, ParseFailures,
    PicklistAddition, ReportInfo, UploadResult, Uploaded,
};

pub fn info(table: &str, columns: &[&str]) -> ReportInfo {
    ReportInfo::new(table, columns.iter().copied())
}

pub fn uploaded(table: &str, id: i64) -> UploadResult {
    UploadResult::leaf(Uploaded {
        id,
        info: info(table, &[table]),
        picklist_additions: Vec::new(),
    })
}

pub fn matched(table: &str, id: i64) -> UploadResult {
    UploadResult::leaf(Matched {
        id,
        info: info(table, &[table]),
    })
}

pub fn null_record(table: &str) -> UploadResult {
    UploadResult::leaf(NullRecord {
        info: info(table, &[]),
    })
}

pub fn rejected(table: &str, message: &str) -> UploadResult {
    UploadResult::leaf(FailedBusinessRule {
        message: message.to_string(),
        info: info(table, &[table]),
    })
}

pub fn no_match(table: &str) -> UploadResult {
    UploadResult::leaf(NoMatch {
        info: info(table, &[table]),
    })
}

/// A tree using every record result variant, nested three levels deep.
pub fn full_tree() -> UploadResult {
    let multiple = MatchedMultiple::new(vec![11, 4, 30], info("taxon", &["Genus", "Species"]))
        .expect("three ids");

    let preparation = UploadResult::leaf(Uploaded {
        id: 501,
        info: info("preparation", &["Prep Type", "Count"]),
        picklist_additions: vec![PicklistAddition {
            name: "PrepType".to_string(),
            value: "Skeleton".to_string(),
            caption: "Prep Type".to_string(),
            id: 9001,
        }],
    })
    .with_to_one("storage", null_record("storage"));

    let determination = matched("determination", 77)
        .with_to_one("taxon", UploadResult::leaf(multiple))
        .with_to_one("determiner", no_match("agent"));

    let parse_failures = UploadResult::leaf(ParseFailures {
        failures: vec![
            CellIssue::new("Count", "value must be an integer"),
            CellIssue::new("Prep Type", "value is not in the picklist"),
        ],
    });

    uploaded("collectionobject", 1000)
        .with_to_one("cataloger", matched("agent", 5))
        .with_to_one("collectingevent", rejected("collectingevent", "start date after end date"))
        .with_to_many("determinations", vec![determination, null_record("determination")])
        .with_to_many("preparations", vec![preparation, parse_failures])
        .with_to_many("collectors", Vec::new())
}
