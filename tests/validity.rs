//! Edge validity, value type compatibility and draft edges.
mod common;
use common::*;
use nodeloom::context::SlotRegistration;
use nodeloom::prelude::*;

/// Accepts any output as long as it carries a value.
struct AcceptsAnything;

impl ValueType for AcceptsAnything {
    fn id(&self) -> &str {
        "anything"
    }

    fn name(&self) -> &str {
        "Anything"
    }

    fn color(&self) -> &str {
        "grey"
    }

    fn is_compatible(&self, output: &SlotContext<'_>, _input: &SlotContext<'_>) -> bool {
        output.value().is_some()
    }
}

#[cfg(test)]
mod validity_tests {
    use super::*;

    fn edge(from: &str, from_slot: &str, to: &str, to_slot: &str) -> Edge {
        Edge::between(from, from_slot, to, to_slot)
    }

    fn mixed_context() -> GraphContext {
        let mut context = typed_context();
        context.register_value_type(AcceptsAnything);
        seed(
            &mut context,
            vec![
                typed_node("int", &[], &[("out", "integer")]),
                typed_node("num", &[("in", "number")], &[("out", "number")]),
                typed_node("int_in", &[("in", "integer")], &[]),
                typed_node("text", &[("in", "text")], &[("out", "text")]),
                typed_node("plain", &[("in", "")], &[("out", "")]),
                typed_node("mystery", &[("in", "mystery")], &[("out", "mystery")]),
                typed_node("any", &[("in", "anything")], &[]),
                Node::new("r1").with_slot(Slot::passthrough("p")),
                Node::new("r2").with_slot(Slot::passthrough("p")),
            ],
            Vec::new(),
        );
        context
    }

    #[test]
    fn test_direction_rules() {
        let context = mixed_context();
        assert!(!context.is_valid(&edge("num", "out", "text", "in")));
        assert!(context.is_valid_with(&edge("num", "out", "text", "in"), false));
        assert!(!context.is_valid_with(&edge("num", "in", "int_in", "in"), false));
        assert!(!context.is_valid_with(&edge("int", "out", "num", "out"), false));
        assert!(context.is_valid(&edge("r1", "p", "r2", "p")));
        assert!(!context.is_valid(&edge("num", "out", "ghost", "in")));
    }

    #[test]
    fn test_hierarchy() {
        let context = mixed_context();
        assert!(context.is_valid(&edge("int", "out", "num", "in")));
        assert!(context.is_valid(&edge("num", "out", "num", "in")));
        assert!(!context.is_valid(&edge("num", "out", "int_in", "in")));
        assert!(!context.is_valid(&edge("text", "out", "num", "in")));
    }

    #[test]
    fn test_typed_and_untyped_never_mix() {
        let context = mixed_context();
        assert!(context.is_valid(&edge("plain", "out", "plain", "in")));
        assert!(!context.is_valid(&edge("num", "out", "plain", "in")));
        assert!(!context.is_valid(&edge("plain", "out", "num", "in")));
    }

    #[test]
    fn test_unregistered_type_counts_as_untyped() {
        let context = mixed_context();
        assert!(context.is_valid(&edge("mystery", "out", "plain", "in")));
        assert!(!context.is_valid(&edge("mystery", "out", "num", "in")));
        assert_eq!(
            context.check_value_types(),
            Err(GraphError::UnknownValueType("mystery".to_string()))
        );
    }

    #[test]
    fn test_either_type_may_approve() {
        let context = mixed_context();
        assert!(context.is_valid(&edge("text", "out", "any", "in")));
        assert!(context.is_valid(&edge("int", "out", "any", "in")));
    }

    #[test]
    fn test_values_compatible() {
        let context = mixed_context();
        let number = Value::of("number");
        let integer = Value::of("integer");

        assert_eq!(context.values_compatible(None, None), Ok(true));
        assert_eq!(context.values_compatible(Some(&number), None), Ok(false));
        assert_eq!(context.values_compatible(Some(&integer), Some(&number)), Ok(true));
        assert_eq!(context.values_compatible(Some(&number), Some(&integer)), Ok(false));
        assert_eq!(
            context.values_compatible(Some(&Value::of("mystery")), Some(&number)),
            Err(GraphError::UnknownValueType("mystery".to_string()))
        );
    }

    #[test]
    fn test_view_validator_has_last_word() {
        let mut context = mixed_context();
        assert!(context.is_valid(&edge("int", "out", "num", "in")));

        context
            .node_mut("num")
            .expect("node exists")
            .register_slot("in", SlotRegistration::with_validator(|e| e.from_node_id != "int"));
        assert!(!context.is_valid(&edge("int", "out", "num", "in")));
        assert!(context.is_valid(&edge("num", "out", "num", "in")));

        assert!(context.node_mut("num").expect("node exists").deregister_slot("in"));
        assert!(context.is_valid(&edge("int", "out", "num", "in")));
    }

    fn wildcard_context() -> GraphContext {
        let mut context = typed_context();
        let pass = Node::new("pass")
            .with_slot(Slot::input("in").with_value(WildcardType::named("T")))
            .with_slot(Slot::output("out").with_value(WildcardType::named("T")));
        let idle = Node::new("idle")
            .with_slot(Slot::input("in").with_value(WildcardType::named("T")))
            .with_slot(Slot::output("out").with_value(WildcardType::named("T")));
        seed(
            &mut context,
            vec![
                typed_node("source", &[], &[("out", "number")]),
                pass,
                idle,
                typed_node("num", &[("in", "number")], &[]),
                typed_node("text", &[("in", "text")], &[]),
            ],
            vec![edge("source", "out", "pass", "in")],
        );
        context
    }

    #[test]
    fn test_wildcard_binds_through_siblings() {
        let context = wildcard_context();
        let out = context.slot("pass", "out").expect("slot exists");
        assert_eq!(WildcardType::resolve_slot_type(&out), Some(Value::of("number")));

        assert!(context.is_valid(&edge("pass", "out", "num", "in")));
        assert!(!context.is_valid(&edge("pass", "out", "text", "in")));
    }

    #[test]
    fn test_unbound_wildcard_accepts_anything() {
        let context = wildcard_context();
        let out = context.slot("idle", "out").expect("slot exists");
        assert_eq!(WildcardType::resolve_slot_type(&out), None);

        assert!(context.is_valid(&edge("idle", "out", "text", "in")));
        assert!(context.is_valid(&edge("idle", "out", "num", "in")));
        assert!(context.is_valid(&edge("source", "out", "idle", "in")));
    }

    fn wildcard_loop(bound: bool) -> GraphContext {
        let mut context = typed_context();
        let mut a = Node::new("a")
            .with_slot(Slot::input("in").with_value(WildcardType::named("T")))
            .with_slot(Slot::output("out").with_value(WildcardType::named("T")));
        if bound {
            a = a.with_slot(Slot::input("extra").with_value(WildcardType::named("T")));
        }
        let b = Node::new("b")
            .with_slot(Slot::input("in").with_value(WildcardType::named("T")))
            .with_slot(Slot::output("out").with_value(WildcardType::named("T")));

        let mut edges = vec![edge("a", "out", "b", "in"), edge("b", "out", "a", "in")];
        if bound {
            edges.push(edge("source", "out", "a", "extra"));
        }
        seed(
            &mut context,
            vec![typed_node("source", &[], &[("out", "number")]), a, b],
            edges,
        );
        context
    }

    #[test]
    fn test_wildcard_loop_terminates_unbound() {
        let context = wildcard_loop(false);
        for (node, slot) in [("a", "in"), ("a", "out"), ("b", "in"), ("b", "out")] {
            let slot = context.slot(node, slot).expect("slot exists");
            assert_eq!(WildcardType::resolve_slot_type(&slot), None);
        }
    }

    #[test]
    fn test_binding_spreads_around_loop() {
        let context = wildcard_loop(true);
        for (node, slot) in [("a", "in"), ("a", "out"), ("b", "in"), ("b", "out")] {
            let slot = context.slot(node, slot).expect("slot exists");
            assert_eq!(WildcardType::resolve_slot_type(&slot), Some(Value::of("number")));
        }
    }

    #[test]
    fn test_edge_to_replace() {
        let mut context = typed_context();
        seed(
            &mut context,
            vec![
                typed_node("a", &[], &[("out", "number")]),
                typed_node("b", &[], &[("out", "number")]),
                typed_node("x", &[("in", "number")], &[]),
                typed_node("y", &[("in", "number")], &[]),
            ],
            vec![edge("a", "out", "x", "in")],
        );

        // Occupied destination.
        assert_eq!(
            context.find_edge_to_replace(&edge("b", "out", "x", "in")),
            Some(edge("a", "out", "x", "in"))
        );
        // Occupied, non-splittable source.
        assert_eq!(
            context.find_edge_to_replace(&edge("a", "out", "y", "in")),
            Some(edge("a", "out", "x", "in"))
        );
        assert_eq!(context.find_edge_to_replace(&edge("b", "out", "y", "in")), None);
    }

    #[test]
    fn test_splittable_and_mergeable_types_keep_edges() {
        let mut context = GraphContext::builder()
            .with_value_type(
                DeclaredValueType::new("signal", "Signal", "#fff")
                    .with_splittable(true)
                    .with_mergeable(true),
            )
            .build();
        seed(
            &mut context,
            vec![
                typed_node("a", &[], &[("out", "signal")]),
                typed_node("b", &[], &[("out", "signal")]),
                typed_node("x", &[("in", "signal")], &[]),
                typed_node("y", &[("in", "signal")], &[]),
            ],
            vec![edge("a", "out", "x", "in")],
        );

        assert_eq!(context.find_edge_to_replace(&edge("b", "out", "x", "in")), None);
        assert_eq!(context.find_edge_to_replace(&edge("a", "out", "y", "in")), None);
    }

    #[test]
    fn test_identical_edge_ignores_annotations() {
        let context = {
            let mut context = source_and_sink();
            let mut existing = edge("source", "out", "sink", "in");
            existing.valid = Some(true);
            context
                .execute("Add edge", Command::AddEdge(existing))
                .expect("edit should run");
            context
        };

        let mut probe = edge("source", "out", "sink", "in");
        probe.active = Some(true);
        assert!(context.find_identical_edge(&probe).is_some());
        assert!(GraphContext::edges_are_equal(&probe, &context.graph().edges[0]));
    }
}

#[cfg(test)]
mod draft_tests {
    use super::*;

    fn edge(from: &str, from_slot: &str, to: &str, to_slot: &str) -> Edge {
        Edge::between(from, from_slot, to, to_slot)
    }

    #[test]
    fn test_drag_from_output_commits() {
        let mut context = source_and_sink();
        assert!(context.start_edge("source", "out"));
        assert_eq!(
            context.draft_edge(),
            Some(&PartialEdge::from_slot(SlotRef::new("source", "out")))
        );

        assert!(context.draft_edge_snap("sink", "in"));
        let draft = context.draft_edge().expect("draft exists");
        assert!(draft.is_complete());
        assert!(draft.valid);

        let outcome = context.release_edge().expect("edit should run");
        assert!(outcome.is_committed());
        assert_eq!(context.graph().edges, vec![edge("source", "out", "sink", "in")]);
        assert_eq!(context.undo_entries()[0].cause, "Add edge");
        assert!(context.draft_edge().is_none());
    }

    #[test]
    fn test_drag_from_input_fills_source() {
        let mut context = source_and_sink();
        assert!(context.start_edge("sink", "in"));
        assert!(context.draft_edge_snap("source", "out"));

        context.release_edge().expect("edit should run");
        assert_eq!(context.graph().edges, vec![edge("source", "out", "sink", "in")]);
    }

    #[test]
    fn test_snap_refuses_same_node_and_wrong_direction() {
        let mut context = typed_context();
        seed(
            &mut context,
            vec![
                typed_node("a", &[("in", "number")], &[("out", "number")]),
                typed_node("b", &[], &[("out", "number")]),
            ],
            Vec::new(),
        );

        context.start_edge("a", "out");
        assert!(!context.draft_edge_snap("a", "in"));
        assert!(!context.draft_edge_snap("b", "out"));
        assert!(!context.draft_edge().expect("draft exists").is_complete());
    }

    #[test]
    fn test_unsnap_restores_open_draft() {
        let mut context = source_and_sink();
        context.start_edge("source", "out");
        context.draft_edge_snap("sink", "in");
        context.draft_edge_unsnap();

        assert_eq!(
            context.draft_edge(),
            Some(&PartialEdge::from_slot(SlotRef::new("source", "out")))
        );
    }

    #[test]
    fn test_type_mismatch_snaps_but_is_cancelled_on_release() {
        let mut context = typed_context();
        seed(
            &mut context,
            vec![
                typed_node("source", &[], &[("out", "number")]),
                typed_node("text", &[("in", "text")], &[]),
            ],
            Vec::new(),
        );
        let events = record_events(&mut context);

        context.start_edge("source", "out");
        assert!(context.draft_edge_snap("text", "in"));
        assert!(!context.draft_edge().expect("draft exists").valid);

        assert_eq!(context.release_edge().expect("release runs"), EditOutcome::Aborted);
        assert!(context.graph().edges.is_empty());
        assert!(context.draft_edge().is_none());

        let buffered = context.buffered_edge().expect("cancelled draft is buffered").clone();
        assert_eq!(buffered.from, Some(SlotRef::new("source", "out")));
        assert!(
            events
                .lock()
                .expect("event log")
                .iter()
                .any(|e| *e == ContextEvent::EdgeCancelled(buffered.clone()))
        );
    }

    #[test]
    fn test_replacing_incoming_edge() {
        let mut context = typed_context();
        seed(
            &mut context,
            vec![
                typed_node("a", &[], &[("out", "number")]),
                typed_node("b", &[], &[("out", "number")]),
                typed_node("x", &[("in", "number")], &[]),
            ],
            vec![edge("a", "out", "x", "in")],
        );

        context.start_edge("b", "out");
        assert!(context.draft_edge_snap("x", "in"));
        assert_eq!(context.edge_being_replaced(), Some(&edge("a", "out", "x", "in")));

        let outcome = context.release_edge().expect("edit should run");
        assert!(outcome.is_committed());
        assert_eq!(context.graph().edges, vec![edge("b", "out", "x", "in")]);
        assert!(context.edge_being_replaced().is_none());

        context.undo();
        assert_eq!(context.graph().edges, vec![edge("a", "out", "x", "in")]);
    }

    #[test]
    fn test_existing_edge_is_not_duplicated() {
        let mut context = source_and_sink();
        context
            .execute("Add edge", Command::AddEdge(edge("source", "out", "sink", "in")))
            .expect("edit should run");

        context.start_edge("source", "out");
        context.draft_edge_snap("sink", "in");
        assert_eq!(context.release_edge().expect("release runs"), EditOutcome::Aborted);
        assert_eq!(context.graph().edges.len(), 1);
    }

    #[test]
    fn test_readonly_blocks_drafts() {
        let mut context = source_and_sink();
        context.set_readonly(true);
        assert!(!context.start_edge("source", "out"));
        assert!(context.draft_edge().is_none());
    }

    #[test]
    fn test_readonly_node_blocks_release() {
        let mut context = source_and_sink();
        context
            .node_mut("sink")
            .expect("node exists")
            .edit_node("Lock", |node| {
                node.readonly = true;
                Ok(())
            })
            .expect("edit should run");

        context.start_edge("source", "out");
        context.draft_edge_snap("sink", "in");
        assert_eq!(context.release_edge().expect("release runs"), EditOutcome::Aborted);
        assert!(context.graph().edges.is_empty());
    }
}
