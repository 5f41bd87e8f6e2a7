//! # Models Module Unit Tests / Models 模块单元测试
//!
//! This module contains unit tests for the `models.rs` module, covering how
//! the two JSON views decode and how result counts behave.
//!
//! 此模块包含 `models.rs` 模块的单元测试，
//! 覆盖两个 JSON 视图的解码方式以及结果计数的行为。

use test_report_generator::core::models::{
    NodeKind, NodeRole, ResultCounts, TestNode, TestOutcome, TestSummary, TestTree,
};

#[cfg(test)]
mod node_kind_tests {
    use super::*;

    #[test]
    fn test_known_node_types_decode() {
        let cases = [
            ("Test Plan", NodeKind::Plan),
            ("Unit test bundle", NodeKind::Bundle),
            ("UI test bundle", NodeKind::Bundle),
            ("Test Suite", NodeKind::Suite),
            ("Test Case", NodeKind::Case),
            ("Test Case Run", NodeKind::CaseRun),
            ("Failure Message", NodeKind::FailureMessage),
        ];
        for (raw, expected) in cases {
            assert_eq!(NodeKind::from(raw.to_string()), expected, "node type {raw}");
        }
    }

    #[test]
    fn test_bundle_spellings_share_one_label() {
        let nodes: Vec<TestNode> = serde_json::from_str(
            r#"[{"nodeType": "Unit test bundle"}, {"nodeType": "UI test bundle"}]"#,
        )
        .unwrap();
        for node in &nodes {
            assert_eq!(node.kind, NodeKind::Bundle);
            assert_eq!(node.kind.as_str(), "Test Bundle");
        }
    }

    #[test]
    fn test_unknown_node_type_is_kept_verbatim() {
        let kind = NodeKind::from("Device".to_string());
        assert_eq!(kind, NodeKind::Other("Device".to_string()));
        assert_eq!(kind.as_str(), "Device");
    }

    #[test]
    fn test_roles() {
        assert_eq!(NodeKind::Plan.role(), NodeRole::Hidden);
        assert_eq!(NodeKind::Bundle.role(), NodeRole::GroupHeader);
        assert_eq!(NodeKind::Suite.role(), NodeRole::GroupHeader);
        assert_eq!(NodeKind::Case.role(), NodeRole::Countable);
        assert_eq!(NodeKind::CaseRun.role(), NodeRole::Countable);
        assert_eq!(NodeKind::FailureMessage.role(), NodeRole::Hidden);
        assert_eq!(NodeKind::Other(String::new()).role(), NodeRole::Hidden);
    }

    #[test]
    fn test_only_cases_and_runs_are_countable() {
        assert!(NodeKind::Case.is_countable());
        assert!(NodeKind::CaseRun.is_countable());
        assert!(!NodeKind::Suite.is_countable());
        assert!(!NodeKind::Bundle.is_countable());
    }
}

#[cfg(test)]
mod outcome_tests {
    use super::*;

    #[test]
    fn test_outcome_decoding() {
        assert_eq!(TestOutcome::from("Passed".to_string()), TestOutcome::Passed);
        assert_eq!(TestOutcome::from("Failed".to_string()), TestOutcome::Failed);
        assert_eq!(TestOutcome::from("Skipped".to_string()), TestOutcome::Skipped);
        assert_eq!(
            TestOutcome::from("Expected Failure".to_string()),
            TestOutcome::ExpectedFailure
        );
        assert_eq!(
            TestOutcome::from("Mixed".to_string()),
            TestOutcome::Unknown("Mixed".to_string())
        );
    }

    #[test]
    fn test_expected_failure_shares_skipped_bucket() {
        assert_eq!(TestOutcome::Passed.display_bucket(), "passed");
        assert_eq!(TestOutcome::Failed.display_bucket(), "failed");
        assert_eq!(TestOutcome::Skipped.display_bucket(), "skipped");
        assert_eq!(TestOutcome::ExpectedFailure.display_bucket(), "skipped");
        assert_eq!(TestOutcome::default().display_bucket(), "unknown");
    }

    #[test]
    fn test_display_uses_tool_spelling() {
        assert_eq!(TestOutcome::ExpectedFailure.to_string(), "Expected Failure");
    }
}

#[cfg(test)]
mod decoding_tests {
    use super::*;

    #[test]
    fn test_node_missing_fields_get_defaults() {
        let node: TestNode = serde_json::from_str("{}").unwrap();
        assert_eq!(node.name, "Unknown");
        assert_eq!(node.kind, NodeKind::Other(String::new()));
        assert_eq!(node.result, TestOutcome::Unknown(String::new()));
        assert_eq!(node.duration, "");
        assert_eq!(node.duration_in_seconds, 0.0);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_tree_view_decodes() {
        let json = r#"{
            "testNodes": [{
                "name": "Suite",
                "nodeType": "Test Suite",
                "children": [{
                    "nodeIdentifier": "Suite/testA()",
                    "name": "testA()",
                    "nodeType": "Test Case",
                    "result": "Passed",
                    "duration": "0.1s",
                    "durationInSeconds": 0.1
                }]
            }],
            "devices": [{"deviceName": "iPhone", "osVersion": "17.0"}]
        }"#;
        let tree: TestTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.test_nodes.len(), 1);
        let case = &tree.test_nodes[0].children[0];
        assert_eq!(case.identifier, "Suite/testA()");
        assert_eq!(case.kind, NodeKind::Case);
        assert_eq!(case.duration_in_seconds, 0.1);
        assert_eq!(tree.devices[0].device_name, "iPhone");
        assert!(tree.test_plan_configurations.is_empty());
    }

    #[test]
    fn test_summary_end_prefers_end_time() {
        let summary: TestSummary =
            serde_json::from_str(r#"{"endTime": 20.0, "finishTime": 30.0}"#).unwrap();
        assert_eq!(summary.end(), Some(20.0));

        let summary: TestSummary = serde_json::from_str(r#"{"finishTime": 30.0}"#).unwrap();
        assert_eq!(summary.end(), Some(30.0));

        let summary: TestSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary.end(), None);
    }

    #[test]
    fn test_summary_counts_absorb_unexplained_tests() {
        let summary: TestSummary = serde_json::from_str(
            r#"{"totalTestCount": 10, "passedTests": 6, "failedTests": 1,
                "skippedTests": 1, "expectedFailures": 1}"#,
        )
        .unwrap();
        let counts = summary.counts();
        assert_eq!(counts.total, 10);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.skipped_display(), 2);
    }
}

#[cfg(test)]
mod counts_tests {
    use super::*;

    #[test]
    fn test_single_counts_one_unit() {
        let counts = ResultCounts::single(&TestOutcome::ExpectedFailure);
        assert_eq!(counts.total, 1);
        assert_eq!(counts.expected_failure, 1);
        assert_eq!(counts.skipped, 0);
    }

    #[test]
    fn test_rates_are_zero_for_empty_counts() {
        let counts = ResultCounts::default();
        assert!(counts.is_empty());
        assert_eq!(counts.pass_rate(), 0.0);
        assert_eq!(counts.fail_rate(), 0.0);
        assert_eq!(counts.skip_rate(), 0.0);
    }

    #[test]
    fn test_rates() {
        let counts: ResultCounts = [
            TestOutcome::Passed,
            TestOutcome::Passed,
            TestOutcome::Failed,
            TestOutcome::Skipped,
        ]
        .iter()
        .map(ResultCounts::single)
        .sum();
        assert_eq!(counts.total, 4);
        assert_eq!(counts.pass_rate(), 50.0);
        assert_eq!(counts.fail_rate(), 25.0);
        assert_eq!(counts.skip_rate(), 25.0);
    }

    #[test]
    fn test_aggregate_outcome() {
        let passed = ResultCounts::single(&TestOutcome::Passed);
        let failed = ResultCounts::single(&TestOutcome::Failed);
        assert_eq!(passed.aggregate_outcome(), TestOutcome::Passed);
        assert_eq!((passed + failed).aggregate_outcome(), TestOutcome::Failed);
        assert_eq!(
            (passed + ResultCounts::single(&TestOutcome::Skipped)).aggregate_outcome(),
            TestOutcome::Passed
        );
        assert_eq!(
            ResultCounts::default().aggregate_outcome(),
            TestOutcome::default()
        );
    }

    #[test]
    fn test_aggregate_outcome_without_passes_is_skipped() {
        let skipped = ResultCounts::single(&TestOutcome::Skipped);
        let expected = ResultCounts::single(&TestOutcome::ExpectedFailure);
        assert_eq!(skipped.aggregate_outcome(), TestOutcome::Skipped);
        assert_eq!((skipped + expected).aggregate_outcome(), TestOutcome::Skipped);
    }
}
