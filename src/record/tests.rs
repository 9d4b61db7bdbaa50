// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════
mod record_tests {
    use crate::cast::CastConfig;
    use crate::error::RecordError;
    use crate::metadata::{FieldDefinition, FieldRegistry, FieldResult, PortalRegistry};
    use crate::node::{FieldNode, RecordNode, RelatedSetNode};
    use crate::record::{Record, Schema};
    use crate::value::FmValue;
    use chrono::{NaiveDate, NaiveTime};
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    struct Fixture {
        fields: FieldRegistry,
        portals: PortalRegistry,
        config: CastConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let fields = FieldRegistry::new()
                .with(FieldDefinition::new("name", FieldResult::Text))
                .with(FieldDefinition::new("Ca Id", FieldResult::Text))
                .with(FieldDefinition::new("salary", FieldResult::Number))
                .with(FieldDefinition::new("bonus", FieldResult::Number).with_max_repeat(3))
                .with(FieldDefinition::new("created_at", FieldResult::Date))
                .with(FieldDefinition::new("time_in", FieldResult::Time))
                .with(FieldDefinition::new("photo", FieldResult::Container))
                // same spelling as a portal field, different type
                .with(FieldDefinition::new("qty", FieldResult::Text));

            let mut portals = PortalRegistry::new();
            portals.insert(
                "line_items",
                FieldRegistry::new()
                    .with(FieldDefinition::new("qty", FieldResult::Number))
                    .with(FieldDefinition::new("sku", FieldResult::Text)),
            );

            Self {
                fields,
                portals,
                config: CastConfig::default(),
            }
        }

        fn schema(&self) -> Schema<'_> {
            Schema::new(&self.fields, &self.portals, &self.config)
        }

        fn build(&self, node: &RecordNode) -> Record {
            Record::from_node(node, &self.schema(), None).unwrap()
        }
    }

    fn field(name: &str, data: &[&str]) -> FieldNode {
        data.iter()
            .fold(FieldNode::new(name), |f, d| f.with_data(*d))
    }

    fn candidate_node() -> RecordNode {
        RecordNode::new()
            .with_ids("5", "42")
            .with_field(field("name", &["Bob"]))
            .with_field(field("Ca Id", &["CA123"]))
            .with_field(field("salary", &["100"]))
            .with_field(field("created_at", &["04/12/2014"]))
            .with_field(field("time_in", &["09:15:00"]))
            .with_field(field("photo", &["/fmi/xml/cnt/photo.jpg"]))
    }

    fn line_item(qty: &str, sku: &str) -> RecordNode {
        RecordNode::new()
            .with_field(field("qty", &[qty]))
            .with_field(field("sku", &[sku]))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Construction
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_ids_and_typed_values() {
        let fx = Fixture::new();
        let record = fx.build(&candidate_node());

        assert_eq!(record.mod_id(), Some("5"));
        assert_eq!(record.record_id(), Some("42"));
        assert_eq!(record.get("name").unwrap(), &FmValue::from("Bob"));
        assert_eq!(record.get_decimal("salary").unwrap(), Some(&BigDecimal::from(100)));
        assert_eq!(
            record.get_date("created_at").unwrap(),
            NaiveDate::from_ymd_opt(2014, 4, 12)
        );
        assert_eq!(
            record.get_time("time_in").unwrap(),
            NaiveTime::from_hms_opt(9, 15, 0)
        );
        assert_eq!(
            record.get("photo").unwrap(),
            &FmValue::Container("/fmi/xml/cnt/photo.jpg".into())
        );
    }

    #[test]
    fn test_missing_ids_are_none() {
        let fx = Fixture::new();
        let record = fx.build(&RecordNode::new().with_field(field("name", &["x"])));
        assert!(record.mod_id().is_none());
        assert!(record.record_id().is_none());
    }

    #[test]
    fn test_fields_stored_under_declared_name() {
        let fx = Fixture::new();
        let node = RecordNode::new().with_field(field("CA_ID", &["CA9"]));
        let record = fx.build(&node);

        let names: Vec<&str> = record.field_names().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["Ca Id"]);
    }

    #[test]
    fn test_field_order_follows_node() {
        let fx = Fixture::new();
        let record = fx.build(&candidate_node());
        let names: Vec<&str> = record.field_names().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["name", "Ca Id", "salary", "created_at", "time_in", "photo"]
        );
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Repetition collapsing
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_repeating_zero_occurrences_is_null() {
        let fx = Fixture::new();
        let record = fx.build(&RecordNode::new().with_field(field("bonus", &[])));
        assert_eq!(record.get("bonus").unwrap(), &FmValue::Null);
    }

    #[test]
    fn test_repeating_one_occurrence_is_scalar() {
        let fx = Fixture::new();
        let record = fx.build(&RecordNode::new().with_field(field("bonus", &["7.5"])));
        assert_eq!(
            record.get("bonus").unwrap(),
            &FmValue::Number(BigDecimal::from_str("7.5").unwrap())
        );
        assert!(record.get("bonus").unwrap().as_list().is_none());
    }

    #[test]
    fn test_repeating_many_occurrences_is_ordered_list() {
        let fx = Fixture::new();
        let record = fx.build(&RecordNode::new().with_field(field("bonus", &["3", "1", "2"])));
        let list = record.get("bonus").unwrap().as_list().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(
            list,
            &[FmValue::from(3i64), FmValue::from(1i64), FmValue::from(2i64)]
        );
    }

    #[test]
    fn test_non_repeating_field_with_many_data_still_collapses() {
        let fx = Fixture::new();
        let record = fx.build(&RecordNode::new().with_field(field("name", &["a", "b"])));
        assert_eq!(
            record.get("name").unwrap(),
            &FmValue::List(vec![FmValue::from("a"), FmValue::from("b")])
        );
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Construction failures
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_unknown_field_fails_construction() {
        let fx = Fixture::new();
        let node = RecordNode::new().with_field(field("nickname", &["Bobby"]));
        let err = Record::from_node(&node, &fx.schema(), None).unwrap_err();
        assert!(matches!(err, RecordError::UnknownField(ref n) if n == "nickname"));
    }

    #[test]
    fn test_cast_error_carries_field_and_raw() {
        let fx = Fixture::new();
        let node = RecordNode::new().with_field(field("created_at", &["yesterday"]));
        match Record::from_node(&node, &fx.schema(), None).unwrap_err() {
            RecordError::Cast { field, raw, expected } => {
                assert_eq!(field, "created_at");
                assert_eq!(raw, "yesterday");
                assert_eq!(expected, FieldResult::Date);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_portal_without_registry_fails() {
        let fx = Fixture::new();
        let node = RecordNode::new()
            .with_related_set(RelatedSetNode::new("invoices").with_record(RecordNode::new()));
        let err = Record::from_node(&node, &fx.schema(), None).unwrap_err();
        assert!(matches!(err, RecordError::UnknownPortal(ref t) if t == "invoices"));
    }

    #[test]
    fn test_failure_inside_portal_row_propagates() {
        let fx = Fixture::new();
        let node = RecordNode::new().with_related_set(
            RelatedSetNode::new("line_items").with_record(line_item("many", "A1")),
        );
        let err = Record::from_node(&node, &fx.schema(), None).unwrap_err();
        assert!(matches!(err, RecordError::Cast { ref field, .. } if field == "qty"));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Portals
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_no_related_sets_means_empty_portals() {
        let fx = Fixture::new();
        let record = fx.build(&candidate_node());
        assert!(record.portals().is_empty());
        assert!(record.portal("line_items").is_none());
    }

    #[test]
    fn test_two_related_sets_for_one_table_accumulate() {
        let fx = Fixture::new();
        let node = candidate_node()
            .with_related_set(RelatedSetNode::new("line_items").with_record(line_item("2", "A1")))
            .with_related_set(RelatedSetNode::new("line_items").with_record(line_item("5", "B2")));
        let record = fx.build(&node);

        let rows = record.portal("line_items").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_str("sku").unwrap(), Some("A1"));
        assert_eq!(rows[1].get_str("sku").unwrap(), Some("B2"));
    }

    #[test]
    fn test_portal_rows_use_their_own_registry() {
        let fx = Fixture::new();
        let node = RecordNode::new()
            .with_field(field("qty", &["a dozen"]))
            .with_related_set(RelatedSetNode::new("line_items").with_record(line_item("12", "C3")));
        let record = fx.build(&node);

        // top level: qty is text
        assert_eq!(record.get("qty").unwrap(), &FmValue::from("a dozen"));
        // portal row: qty is a number
        let row = &record.portal("line_items").unwrap()[0];
        assert_eq!(row.get_decimal("qty").unwrap(), Some(&BigDecimal::from(12)));
        // parent-only fields are not reachable through the child
        assert!(matches!(row.get("salary"), Err(RecordError::InvalidField(_))));
    }

    #[test]
    fn test_empty_related_set_still_registers_table() {
        let fx = Fixture::new();
        let node = RecordNode::new().with_related_set(RelatedSetNode::new("line_items"));
        let record = fx.build(&node);
        assert_eq!(record.portal("line_items").map(<[Record]>::len), Some(0));
    }

    #[test]
    fn test_portal_lookup_is_indifferent() {
        let fx = Fixture::new();
        let node = RecordNode::new()
            .with_related_set(RelatedSetNode::new("line_items").with_record(line_item("1", "X")));
        let record = fx.build(&node);
        assert!(record.portal("LINE_ITEMS").is_some());
        assert!(record.portal(":line_items").is_some());
        assert!(record.portal("Line Items").is_some());
    }

    #[test]
    fn test_portal_rows_have_independent_dirty_state() {
        let fx = Fixture::new();
        let node = RecordNode::new()
            .with_related_set(RelatedSetNode::new("line_items").with_record(line_item("1", "X")));
        let mut record = fx.build(&node);

        record.portal_mut("Line Items").unwrap()[0]
            .set("qty", 3i64)
            .unwrap();
        assert!(!record.is_changed());
        assert!(record.portal("line_items").unwrap()[0].is_changed());
        assert!(record.portal_mut("missing").is_none());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Indifferent access
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_key_forms_resolve_to_same_value() {
        let fx = Fixture::new();
        let record = fx.build(&candidate_node());
        let expected = FmValue::from("CA123");
        for key in ["Ca Id", "ca_id", "CA ID", ":ca_id"] {
            assert_eq!(record.get(key).unwrap(), &expected, "key {key:?}");
        }
        assert_eq!(record.field_name(":CA_ID").map(|n| n.as_str()), Some("Ca Id"));
    }

    #[test]
    fn test_unknown_name_fails_read_and_write_in_every_form() {
        let fx = Fixture::new();
        let mut record = fx.build(&candidate_node());
        for key in ["email", "EMAIL", ":email"] {
            assert!(matches!(record.get(key), Err(RecordError::InvalidField(_))));
            assert!(matches!(record.set(key, "x"), Err(RecordError::InvalidField(_))));
            assert!(!record.contains_field(key));
        }
        assert!(record.dirty().is_empty());
    }

    #[test]
    fn test_declared_but_absent_field_is_invalid() {
        let fx = Fixture::new();
        // bonus is in the registry but not in this node
        let mut record = fx.build(&candidate_node());
        assert!(matches!(record.get("bonus"), Err(RecordError::InvalidField(_))));
        assert!(matches!(record.set("bonus", 1i64), Err(RecordError::InvalidField(_))));
    }

    #[test]
    #[should_panic(expected = "Invalid field: email")]
    fn test_index_panics_on_invalid_field() {
        let fx = Fixture::new();
        let record = fx.build(&candidate_node());
        let _ = &record["email"];
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Dirty tracking
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_dirty_empty_after_construction() {
        let fx = Fixture::new();
        let record = fx.build(&candidate_node());
        assert!(record.dirty().is_empty());
        assert!(!record.is_changed());
        assert!(record.changed().is_empty());
    }

    #[test]
    fn test_salary_scenario() {
        let fx = Fixture::new();
        let mut record = fx.build(&candidate_node());
        assert_eq!(record["salary"], FmValue::Number(BigDecimal::from(100)));

        record.set("salary", 150i64).unwrap();

        assert_eq!(record["salary"], FmValue::Number(BigDecimal::from(100)));
        assert_eq!(record.dirty().len(), 1);
        assert_eq!(record.dirty()["salary"], FmValue::Number(BigDecimal::from(150)));
    }

    #[test]
    fn test_dirty_keyed_by_declared_name() {
        let fx = Fixture::new();
        let mut record = fx.build(&candidate_node());
        record.set(":ca_id", "CA999").unwrap();

        let changed: Vec<&str> = record.changed().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(changed, vec!["Ca Id"]);
        assert_eq!(record.dirty_value("CA ID"), Some(&FmValue::from("CA999")));
        assert_eq!(record.get("ca_id").unwrap(), &FmValue::from("CA123"));
    }

    #[test]
    fn test_reassignment_overwrites_dirty_entry() {
        let fx = Fixture::new();
        let mut record = fx.build(&candidate_node());
        record.set("name", "Robert").unwrap();
        record.set("salary", 1i64).unwrap();
        record.set("NAME", "Rob").unwrap();

        let changed: Vec<&str> = record.changed().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(changed, vec!["name", "salary"]);
        assert_eq!(record.dirty_value("name"), Some(&FmValue::from("Rob")));
    }

    #[test]
    fn test_assign_null_is_tracked() {
        let fx = Fixture::new();
        let mut record = fx.build(&candidate_node());
        record.set("photo", FmValue::Null).unwrap();
        assert!(record.is_changed());
        assert_eq!(record.dirty_value("photo"), Some(&FmValue::Null));
    }

    #[test]
    fn test_clone_carries_dirty_state() {
        let fx = Fixture::new();
        let mut record = fx.build(&candidate_node());
        record.set("name", "Rob").unwrap();
        let copy = record.clone();
        assert_eq!(copy, record);
        assert!(copy.is_changed());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Serialization
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_serialize_record() {
        let fx = Fixture::new();
        let node = RecordNode::new()
            .with_ids("1", "2")
            .with_field(field("salary", &["10.50"]))
            .with_related_set(RelatedSetNode::new("line_items").with_record(line_item("1", "X")));
        let mut record = fx.build(&node);
        record.set("salary", 11i64).unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "mod_id": "1",
                "record_id": "2",
                "fields": { "salary": "10.50" },
                "portals": {
                    "line_items": [{
                        "mod_id": null,
                        "record_id": null,
                        "fields": { "qty": "1", "sku": "X" }
                    }]
                },
                "dirty": { "salary": "11" }
            })
        );
    }
}
