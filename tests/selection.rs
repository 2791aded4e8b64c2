//! Selection, selection boxes and the viewport transform.
mod common;
use common::*;
use nodeloom::context::NodeRegistration;
use nodeloom::prelude::*;

#[cfg(test)]
mod selection_tests {
    use super::*;

    fn spread_out() -> GraphContext {
        let mut context = typed_context();
        seed(
            &mut context,
            vec![
                typed_node("a", &[], &[("out", "number")]).at(0.0, 0.0),
                typed_node("b", &[("in", "number")], &[]).at(100.0, 100.0),
                Node::new("c").at(300.0, 300.0),
            ],
            vec![Edge::between("a", "out", "b", "in")],
        );
        context
    }

    #[test]
    fn test_select_and_extend() {
        let mut context = spread_out();
        context.select_node("a");
        context.add_to_selection("b");
        context.add_to_selection("b");
        assert_eq!(context.selected_node_ids(), ["a", "b"]);

        context.select_node("c");
        assert_eq!(context.selected_node_ids(), ["c"]);
        assert!(context.remove_from_selection("c"));
        assert!(!context.remove_from_selection("c"));

        context.select_all();
        assert_eq!(context.selected_nodes().len(), 3);
        assert!(context.node("b").expect("node exists").selected());
        context.unselect_all();
        assert!(context.selected_node_ids().is_empty());
    }

    #[test]
    fn test_box_toggles_touched_nodes() {
        let mut context = spread_out();

        context.start_selection_at(Point::new(-10.0, -10.0), false);
        context.set_selection_box_end(Point::new(150.0, 150.0));
        let swept = context.selection_box().expect("box is open").nodes.clone();
        assert_eq!(swept, vec!["a", "b"]);
        assert!(context.is_node_selected("a"));
        assert!(!context.is_node_selected("c"));

        context.commit_selection_box();
        assert!(context.selection_box().is_none());
        assert_eq!(context.selected_node_ids(), ["a", "b"]);

        // A second, additive sweep over "b" deselects it.
        context.start_selection_at(Point::new(90.0, 90.0), true);
        context.set_selection_box_end(Point::new(110.0, 110.0));
        assert!(!context.is_node_selected("b"));
        assert!(context.is_node_selected("a"));
        context.commit_selection_box();
        assert_eq!(context.selected_node_ids(), ["a"]);
    }

    #[test]
    fn test_empty_box_clears_selection() {
        let mut context = spread_out();
        context.select_all();

        context.start_selection_at(Point::new(1000.0, 1000.0), true);
        context.set_selection_box_end(Point::new(1010.0, 1010.0));
        context.commit_selection_box();
        assert!(context.selected_node_ids().is_empty());
    }

    #[test]
    fn test_box_uses_registered_size() {
        let mut context = spread_out();
        let inside_c = (Point::new(320.0, 320.0), Point::new(330.0, 330.0));

        context.start_selection_at(inside_c.0, false);
        context.set_selection_box_end(inside_c.1);
        assert!(context.selection_box().expect("box is open").nodes.is_empty());
        context.clear_selection_box();

        context.register_node(
            "c",
            NodeRegistration {
                size: Some(Size::new(50.0, 50.0)),
                ..Default::default()
            },
        );
        context.start_selection_at(inside_c.0, false);
        context.set_selection_box_end(inside_c.1);
        assert_eq!(context.selection_box().expect("box is open").nodes, vec!["c"]);
    }

    #[test]
    fn test_box_corners_are_screen_space() {
        let mut context = spread_out();
        context.set_zoom(2.0);

        context.start_selection_at(Point::new(0.0, 0.0), false);
        context.set_selection_box_end(Point::new(150.0, 150.0));
        assert_eq!(context.selection_box().expect("box is open").nodes, vec!["a"]);

        context.set_selection_box_end(Point::new(220.0, 220.0));
        assert_eq!(context.selection_box().expect("box is open").nodes, vec!["a", "b"]);
    }

    #[test]
    fn test_removed_nodes_leave_selection() {
        let mut context = spread_out();
        context.select_all();

        context.remove_node("a").expect("edit should run");
        assert_eq!(context.selected_node_ids(), ["b", "c"]);

        context
            .execute("Remove node", Command::RemoveNode("b".to_string()))
            .expect("edit should run");
        assert_eq!(context.selected_node_ids(), ["c"]);
    }

    #[test]
    fn test_delete_selected_nodes() {
        let mut context = spread_out();
        context.select_node("a");
        context.add_to_selection("b");

        let outcome = context.remove_selected_nodes().expect("edit should run");
        assert!(outcome.is_committed());
        assert_eq!(node_ids(context.graph()), vec!["c"]);
        assert!(context.graph().edges.is_empty());
        assert!(context.selected_node_ids().is_empty());
        assert_eq!(context.undo_entries().len(), 1);
        assert_eq!(context.undo_entries()[0].cause, "Delete nodes");

        context.undo();
        assert_eq!(context.graph().nodes.len(), 3);
        assert_eq!(context.graph().edges.len(), 1);
    }

    #[test]
    fn test_failed_delete_keeps_selection() {
        let mut context = typed_context();
        seed(
            &mut context,
            vec![Node::new("a"), Node::new("broken").at(f64::NAN, 0.0)],
            Vec::new(),
        );
        context.select_node("a");

        assert!(matches!(
            context.remove_selected_nodes(),
            Err(GraphError::Clone { .. })
        ));
        assert_eq!(context.graph().nodes.len(), 2);
        assert_eq!(context.selected_node_ids(), ["a"]);
    }

    #[test]
    fn test_delete_refused_when_readonly() {
        let mut context = spread_out();
        context.select_all();
        context.set_readonly(true);

        assert_eq!(
            context.remove_selected_nodes().expect("edit should run"),
            EditOutcome::Aborted
        );
        assert_eq!(context.graph().nodes.len(), 3);
    }

    #[test]
    fn test_selection_events() {
        let mut context = spread_out();
        let events = record_events(&mut context);

        context.select_node("a");
        context.add_to_selection("c");

        let events = events.lock().expect("event log");
        assert_eq!(
            events.last(),
            Some(&ContextEvent::SelectionChanged(vec![
                "a".to_string(),
                "c".to_string()
            ]))
        );
    }
}

#[cfg(test)]
mod viewport_tests {
    use super::*;

    #[test]
    fn test_zoom_is_clamped_to_range() {
        let mut context = GraphContext::builder().zoom_range(0.5, 3.0).build();
        assert_eq!(context.zoom(), 1.0);
        assert_eq!(context.set_zoom(10.0), 3.0);
        assert_eq!(context.set_zoom(0.1), 0.5);
        assert_eq!(context.clamp_zoom(1.5), 1.5);
    }

    #[test]
    fn test_screen_and_graph_coordinates() {
        let mut context = GraphContext::new();
        context.set_zoom(2.0);
        context.set_pan(100.0, 0.0);

        let graph_point = context.screen_to_graph(Point::new(300.0, 100.0));
        assert_eq!(graph_point, Point::new(100.0, 50.0));
        assert_eq!(context.graph_to_screen(graph_point), Point::new(300.0, 100.0));
    }

    #[test]
    fn test_zoom_at_keeps_anchor_in_place() {
        let mut context = GraphContext::new();
        let anchor = Point::new(100.0, 100.0);
        let before = context.screen_to_graph(anchor);

        assert_eq!(context.zoom_at(anchor, 2.0), 2.0);
        assert_eq!(context.screen_to_graph(anchor), before);
        assert_eq!(context.pan(), Point::new(-100.0, -100.0));
    }

    #[test]
    fn test_viewport_events() {
        let mut context = GraphContext::new();
        let events = record_events(&mut context);

        context.set_zoom(1.5);
        context.set_pan(10.0, 20.0);

        let events = events.lock().expect("event log");
        assert_eq!(
            *events,
            vec![
                ContextEvent::ZoomChanged(1.5),
                ContextEvent::PanChanged(Point::new(10.0, 20.0)),
            ]
        );
    }
}
