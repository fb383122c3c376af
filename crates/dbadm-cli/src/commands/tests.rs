use super::*;
use dbadm_monitor::{ApplyServerInfo, JobInfo};
use dbadm_objects::TriggerPolicy;
use indoc::indoc;

const TRIGGERS: &str = indoc! {r#"
    [
        {
            "name": "zz_cleanup",
            "condition_time": "DEFERRED",
            "event_type": "COMMIT",
            "action_time": "AFTER",
            "action": "DELETE FROM audit_log"
        },
        {
            "name": "audit_orders",
            "status": "ACTIVE",
            "priority": "5",
            "condition_time": "BEFORE",
            "event_type": "UPDATE",
            "target_class": "orders",
            "target_attribute": "amount",
            "condition": "  if new.amount > 100",
            "action_time": "AFTER",
            "action": "REJECT"
        }
    ]
"#};

mod definition_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_sorts_and_normalizes() {
        let triggers = parse_definitions(TRIGGERS).unwrap();
        let names: Vec<_> = triggers.iter().map(|t| t.name().unwrap()).collect();
        assert_eq!(names, vec!["audit_orders", "zz_cleanup"]);
        assert_eq!(triggers[0].priority(), Some("05.00"));
        assert_eq!(triggers[0].condition(), Some("new.amount > 100"));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_definitions(r#"{"name":"t1"}"#).is_err());
    }

    #[test]
    fn test_render_json_is_canonical() {
        let triggers = parse_definitions(TRIGGERS).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_json(&triggers).unwrap()).unwrap();
        assert_eq!(json[0]["priority"], "05.00");
        assert_eq!(json[0]["condition"], "if new.amount > 100");
        assert_eq!(json[1]["action"], "DELETE FROM audit_log");
    }

    #[test]
    fn test_render_table_lists_each_trigger() {
        let triggers = parse_definitions(TRIGGERS).unwrap();
        let table = render_table(&triggers);
        assert!(table.contains("audit_orders"));
        assert!(table.contains("orders(amount)"));
        assert!(table.contains("zz_cleanup"));
    }
}

mod validate_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_definitions_have_no_findings() {
        let triggers = parse_definitions(TRIGGERS).unwrap();
        let validator = TriggerValidator::new(TriggerPolicy::default());
        assert!(validate_definitions(&validator, &triggers).is_empty());
    }

    #[test]
    fn test_findings_name_unnamed_triggers_by_position() {
        let triggers = parse_definitions(r#"[{"event_type": "INSERT"}]"#).unwrap();
        let validator = TriggerValidator::new(TriggerPolicy::lenient());
        let findings = validate_definitions(&validator, &triggers);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].0, "<unnamed #1>");
        assert!(findings[0].1.contains(&ValidationError::MissingName));
    }

    #[test]
    fn test_render_findings() {
        let findings = vec![(
            "t1".to_string(),
            vec![ValidationError::MissingName, ValidationError::MissingAction],
        )];
        assert_eq!(
            render_findings(&findings),
            "t1:\n  - Trigger name is required\n  - Trigger action is required\n"
        );
    }
}

mod ddl_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_ddl() {
        let triggers = parse_definitions(TRIGGERS).unwrap();
        let sql = render_ddl(&TriggerDdl::default(), &triggers[..1]).unwrap();
        assert_eq!(
            sql,
            indoc! {"
                CREATE TRIGGER audit_orders
                STATUS ACTIVE
                PRIORITY 05.00
                BEFORE UPDATE ON orders(amount)
                IF new.amount > 100
                EXECUTE AFTER REJECT;"}
        );
    }

    #[test]
    fn test_render_ddl_separates_statements() {
        let triggers = parse_definitions(TRIGGERS).unwrap();
        let sql = render_ddl(&TriggerDdl::default(), &triggers).unwrap();
        assert_eq!(sql.matches("CREATE TRIGGER").count(), 2);
        assert!(sql.contains(";\n\nCREATE TRIGGER zz_cleanup"));
    }

    #[test]
    fn test_render_ddl_reports_failing_trigger() {
        let triggers = parse_definitions(r#"[{"name": "broken", "event_type": "INSERT"}]"#).unwrap();
        let error = render_ddl(&TriggerDdl::default(), &triggers).unwrap_err();
        assert!(error.to_string().contains("broken"));
    }
}

mod broker_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn status() -> BrokerStatus {
        let mut editor = BrokerStatus::named("query_editor");
        editor.add_apply_server(ApplyServerInfo::new("1").with_status("BUSY").with_counts("10", "2"));
        editor.add_job(JobInfo::new("1", "SELECT 1"));
        let mut root = BrokerStatus::new();
        root.add_broker(editor);
        root.add_broker(BrokerStatus::named("broker1"));
        root
    }

    #[test]
    fn test_summary_lists_children() {
        let summary = render_broker_summary(&status(), None).unwrap();
        assert!(summary.contains("query_editor"));
        assert!(summary.contains("broker1"));
        assert!(summary.contains("retrieved at"));
    }

    #[test]
    fn test_summary_single_broker() {
        let summary = render_broker_summary(&status(), Some("broker1")).unwrap();
        assert!(summary.contains("broker1"));
        assert!(!summary.contains("query_editor"));
    }

    #[test]
    fn test_summary_unknown_broker() {
        assert!(render_broker_summary(&status(), Some("missing")).is_err());
    }

    #[test]
    fn test_summary_of_hand_written_reply() {
        let status: BrokerStatus = serde_json::from_str(
            r#"{"sub_brokers":[{"name":"b1","apply_servers":[{"id":"1","num_query":"12"}]}]}"#,
        )
        .unwrap();
        let summary = render_broker_summary(&status, Some("b1")).unwrap();
        assert!(summary.contains("b1"));
        assert!(summary.contains("12"));
    }

    #[test]
    fn test_status_json_round_trip() {
        let json = serde_json::to_string(&status()).unwrap();
        let parsed: BrokerStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.totals(), status().totals());
    }
}
