//! Transactions, undo and redo.
mod common;
use common::*;
use nodeloom::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[cfg(test)]
mod history_tests {
    use super::*;

    fn add(context: &mut GraphContext, id: &str) -> EditOutcome {
        context
            .execute("Add node", Command::AddNode(Node::new(id)))
            .expect("edit should run")
    }

    #[test]
    fn test_commit_records_undo_entry() {
        let mut context = GraphContext::new();
        assert_eq!(add(&mut context, "a"), EditOutcome::Committed);

        assert_eq!(node_ids(context.graph()), vec!["a"]);
        assert!(context.can_undo());
        assert!(!context.can_redo());
        assert_eq!(context.undo_entries()[0].cause, "Add node");
        assert!(context.undo_entries()[0].graph_before.nodes.is_empty());
    }

    #[test]
    fn test_undo_and_redo_round_trip() {
        let mut context = GraphContext::new();
        add(&mut context, "a");
        add(&mut context, "b");

        assert!(context.undo());
        assert_eq!(node_ids(context.graph()), vec!["a"]);
        assert!(context.undo());
        assert!(context.graph().nodes.is_empty());
        assert!(!context.undo());

        assert!(context.redo().expect("redo should run"));
        assert!(context.redo().expect("redo should run"));
        assert_eq!(node_ids(context.graph()), vec!["a", "b"]);
        assert!(!context.redo().expect("redo should run"));
    }

    #[test]
    fn test_redo_keeps_remaining_redo_entries() {
        let mut context = GraphContext::new();
        for id in ["a", "b", "c"] {
            add(&mut context, id);
        }
        for _ in 0..3 {
            context.undo();
        }
        assert_eq!(context.redo_entries().len(), 3);

        context.redo().expect("redo should run");
        assert_eq!(node_ids(context.graph()), vec!["a"]);
        assert_eq!(context.redo_entries().len(), 2);

        context.redo().expect("redo should run");
        assert_eq!(node_ids(context.graph()), vec!["a", "b"]);
        assert_eq!(context.redo_entries().len(), 1);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut context = GraphContext::new();
        add(&mut context, "a");
        context.undo();
        assert!(context.can_redo());

        add(&mut context, "b");
        assert!(!context.can_redo());
    }

    #[test]
    fn test_abort_discards_working_copy() {
        let mut context = GraphContext::new();
        let outcome = context
            .edit("Try", |editor| {
                editor.graph_mut().nodes.push(Node::new("x"));
                editor.abort(true)
            })
            .expect("edit should run");

        assert_eq!(outcome, EditOutcome::Aborted);
        assert!(context.graph().nodes.is_empty());
        assert!(!context.can_undo());
    }

    #[test]
    fn test_rejected_edit_reports_error() {
        let mut context = GraphContext::new();
        add(&mut context, "a");

        let outcome = context
            .execute("Add node", Command::AddNode(Node::new("a")))
            .expect("edit should run");
        assert_eq!(
            outcome,
            EditOutcome::Rejected(GraphError::DuplicateNodeId("a".to_string()))
        );

        let outcome = context
            .execute(
                "Moved node",
                Command::MoveNode {
                    id: "ghost".to_string(),
                    dx: 1.0,
                    dy: 1.0,
                },
            )
            .expect("edit should run");
        assert_eq!(
            outcome,
            EditOutcome::Rejected(GraphError::NodeNotFound("ghost".to_string()))
        );
        assert_eq!(context.undo_entries().len(), 1);
    }

    #[test]
    fn test_unclonable_graph_fails_the_edit() {
        let mut context = GraphContext::new();
        let result = context.execute("Add node", Command::AddNode(Node::new("bad").at(f64::NAN, 0.0)));

        match result {
            Err(GraphError::Clone { field, .. }) => assert_eq!(field, "nodes[0].x"),
            other => panic!("expected clone error, got {:?}", other),
        }
        assert!(context.graph().nodes.is_empty());
        assert!(!context.can_undo());
    }

    #[test]
    fn test_commit_drops_dangling_edges() {
        let mut context = source_and_sink();
        let outcome = context
            .edit("Wire", |editor| {
                editor.add_edge(Edge::between("source", "out", "sink", "in"));
                editor.add_edge(Edge::between("source", "out", "nowhere", "in"));
                Ok(())
            })
            .expect("edit should run");

        assert!(outcome.is_committed());
        assert_eq!(
            context.graph().edges,
            vec![Edge::between("source", "out", "sink", "in")]
        );
    }

    #[test]
    fn test_remove_node_takes_its_edges_and_undo_restores_them() {
        let mut context = source_and_sink();
        context
            .execute("Add edge", Command::AddEdge(Edge::between("source", "out", "sink", "in")))
            .expect("edit should run");

        let outcome = context.remove_node("sink").expect("edit should run");
        assert!(outcome.is_committed());
        assert_eq!(node_ids(context.graph()), vec!["source"]);
        assert!(context.graph().edges.is_empty());

        context.undo();
        assert_eq!(node_ids(context.graph()), vec!["source", "sink"]);
        assert_eq!(context.graph().edges.len(), 1);
    }

    #[test]
    fn test_slot_removed_when_last_edge_goes() {
        let mut context = typed_context();
        seed(
            &mut context,
            vec![
                typed_node("source", &[], &[("out", "number")]),
                Node::new("sink").with_slot(
                    Slot::input("extra")
                        .with_value(Value::of("number"))
                        .remove_when_empty(),
                ),
            ],
            vec![Edge::between("source", "out", "sink", "extra")],
        );

        context
            .remove_edge(&Edge::between("source", "out", "sink", "extra"))
            .expect("edit should run");
        let sink = context.node("sink").expect("sink exists");
        assert!(sink.slot("extra").is_none());
        assert!(sink.node().slots.is_empty());
    }

    #[test]
    fn test_remove_edges_for_node_is_one_edit() {
        let mut context = typed_context();
        seed(
            &mut context,
            vec![
                typed_node("a", &[], &[("out", "number")]),
                typed_node("b", &[("in", "number")], &[("out", "number")]),
                typed_node("c", &[("in", "number")], &[]),
            ],
            vec![
                Edge::between("a", "out", "b", "in"),
                Edge::between("b", "out", "c", "in"),
            ],
        );

        let outcome = context.remove_edges_for_node("b").expect("edit should run");
        assert!(outcome.is_committed());
        assert!(context.graph().edges.is_empty());
        assert_eq!(context.undo_entries().len(), 1);
        assert_eq!(context.undo_entries()[0].cause, "Remove edges");

        let outcome = context.remove_edges_for_node("b").expect("edit should run");
        assert_eq!(outcome, EditOutcome::Aborted);
    }

    #[test]
    fn test_rollbacks_run_on_undo() {
        let undone = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&undone);

        let mut context = GraphContext::new();
        context
            .edit("Add node", move |editor| {
                let counter = Arc::clone(&counter);
                editor.when_undone(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
                editor.add_node(Node::new("a"))?;
                Ok(())
            })
            .expect("edit should run");
        assert_eq!(undone.load(Ordering::SeqCst), 0);

        context.undo();
        assert_eq!(undone.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_events_and_notifications() {
        let mut context = GraphContext::new();
        let events = record_events(&mut context);

        add(&mut context, "a");
        context.undo();
        context.redo().expect("redo should run");

        let events = events.lock().expect("event log");
        let notifications: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                ContextEvent::Notification(message) => Some(message.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(notifications, vec!["Undo: Add node", "Redo: Add node"]);

        let graph_changes = events
            .iter()
            .filter(|e| matches!(e, ContextEvent::GraphChanged(_)))
            .count();
        assert_eq!(graph_changes, 3);
        assert!(matches!(
            events.first(),
            Some(ContextEvent::GraphChanged(graph)) if node_ids(graph) == vec!["a"]
        ));
    }

    #[test]
    fn test_load_graph_resets_history() {
        let mut context = GraphContext::new();
        add(&mut context, "a");
        context.load_graph(Graph::new());

        assert!(!context.can_undo());
        assert!(context.graph().nodes.is_empty());
    }

    #[test]
    fn test_nested_edit_is_refused() {
        let shared = SharedContext::new(GraphContext::new());
        let inner = shared.clone();
        let nested = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&nested);

        let outcome = shared
            .edit("Outer", move |editor| {
                let result = inner.execute("Inner", Command::AddNode(Node::new("inner")));
                *seen.lock().expect("result slot") = Some(result);
                editor.add_node(Node::new("outer"))?;
                Ok(())
            })
            .expect("outer edit should run");

        assert!(outcome.is_committed());
        assert_eq!(
            *nested.lock().expect("result slot"),
            Some(Err(GraphError::EditInProgress))
        );
        let ids = shared
            .with(|context| node_ids(context.graph()))
            .expect("context is free");
        assert_eq!(ids, vec!["outer"]);

        assert!(shared.undo().expect("context is free"));
        assert!(shared.redo().expect("context is free"));
    }
}
