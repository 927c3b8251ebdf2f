mod common;

use common::{TestResult, parse_city_gallery};
use htmlpath::{Navigator, Node, NodeKind, NodeNavigator};

#[test]
fn test_child_then_parent_restores_the_position() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let mut nav = NodeNavigator::new(&doc, doc.root());
    let origin = nav;

    assert!(nav.move_to_first_child());
    assert!(nav.move_to_parent());
    assert_eq!(nav, origin);
    Ok(())
}

#[test]
fn test_attribute_then_parent_restores_the_owner() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let mut nav = NodeNavigator::new(&doc, doc.root());

    // Walk down to <html lang="en-US">.
    assert!(nav.move_to_first_child());
    assert!(nav.move_to_next_sibling());
    assert_eq!(nav.local_name(), "html");
    let owner = nav;

    assert!(nav.move_to_next_attribute());
    assert_eq!(nav.node_kind(), NodeKind::Attribute);
    assert_eq!(nav.local_name(), "lang");
    assert_eq!(nav.value(), "en-US");

    assert!(nav.move_to_parent());
    assert_eq!(nav, owner);
    Ok(())
}

#[test]
fn test_failed_moves_leave_the_cursor_in_place() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let mut nav = NodeNavigator::new(&doc, doc.root());

    // The document node has no parent and no siblings.
    let origin = nav;
    assert!(!nav.move_to_parent());
    assert!(!nav.move_to_next_sibling());
    assert!(!nav.move_to_previous_sibling());
    assert!(!nav.move_to_first_sibling());
    assert!(!nav.move_to_next_attribute());
    assert_eq!(nav, origin);
    Ok(())
}

#[test]
fn test_first_sibling_reaches_the_doctype() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let mut nav = NodeNavigator::new(&doc, doc.root());

    assert!(nav.move_to_first_child());
    assert_eq!(nav.node_kind(), NodeKind::Doctype);
    assert!(nav.move_to_next_sibling());
    assert_eq!(nav.local_name(), "html");

    assert!(nav.move_to_first_sibling());
    assert_eq!(nav.node_kind(), NodeKind::Doctype);
    Ok(())
}

#[test]
fn test_copies_fork_independently() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let mut nav = NodeNavigator::new(&doc, doc.root());
    assert!(nav.move_to_first_child());

    let mut fork = nav;
    assert!(fork.move_to_next_sibling());
    assert_ne!(nav, fork);
    assert_eq!(nav.node_kind(), NodeKind::Doctype);
    assert_eq!(fork.local_name(), "html");
    Ok(())
}

#[test]
fn test_move_to_root_clears_an_attribute_position() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let mut nav = NodeNavigator::new(&doc, doc.root());
    assert!(nav.move_to_first_child());
    assert!(nav.move_to_next_sibling());
    assert!(nav.move_to_next_attribute());
    assert!(nav.is_on_attribute());

    nav.move_to_root();
    assert!(!nav.is_on_attribute());
    assert_eq!(nav.node_kind(), NodeKind::Root);
    assert_eq!(nav.current_id(), doc.root());
    Ok(())
}

#[test]
fn test_materialized_positions_compare_like_their_nodes() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let mut nav = NodeNavigator::new(&doc, doc.root());
    assert!(nav.move_to_first_child());
    assert!(nav.move_to_next_sibling());

    let html = nav.current_node();
    assert_eq!(html.tag_name()?, "html");

    assert!(nav.move_to_next_attribute());
    let lang = nav.current_node();
    assert!(matches!(lang, Node::Synthetic { .. }));
    assert_eq!(lang.inner_text(), "en-US");
    assert_ne!(lang, html);

    assert!(nav.move_to_parent());
    assert_eq!(nav.current_node(), html);
    Ok(())
}
