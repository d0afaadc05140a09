//! Integration tests for min-content / max-content widths and
//! shrink-to-fit sizing.
//!
//! [§ 5.1 Intrinsic Sizes](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)

use koala_layout::document::from_json;
use koala_layout::{
    ApproximateTextMeasurer, BoxTree, IntrinsicWidthConstraints, LayoutConfig, LayoutState, layout_tree,
};

const CHAR: f32 = 9.6;

fn tree(json: &str) -> BoxTree {
    from_json(json).expect("document should be valid")
}

fn assert_constraints_close(actual: IntrinsicWidthConstraints, minimum: f32, maximum: f32) {
    assert!(
        (actual.minimum - minimum).abs() < 1e-3 && (actual.maximum - maximum).abs() < 1e-3,
        "expected ({minimum}, {maximum}), got {actual:?}"
    );
}

#[test]
fn test_longest_word_and_whole_line() {
    let tree = tree(r#"{ "type": "container", "children": [ { "type": "text", "text": "abc defgh" } ] }"#);
    let measurer = ApproximateTextMeasurer::default();
    let mut state = LayoutState::new(&tree, &measurer);

    let constraints = state.intrinsic_width_constraints(tree.root());
    assert_constraints_close(constraints, 5.0 * CHAR, 9.0 * CHAR);
}

#[test]
fn test_empty_root_has_zero_widths() {
    let tree = tree(r#"{ "type": "container" }"#);
    let measurer = ApproximateTextMeasurer::default();
    let mut state = LayoutState::new(&tree, &measurer);

    assert_eq!(state.intrinsic_width_constraints(tree.root()), IntrinsicWidthConstraints::default());
}

#[test]
fn test_forced_break_limits_max_content() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "text", "text": "ab cd" },
            { "type": "line-break" },
            { "type": "text", "text": "e" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let mut state = LayoutState::new(&tree, &measurer);

    assert_constraints_close(state.intrinsic_width_constraints(tree.root()), 2.0 * CHAR, 5.0 * CHAR);
}

#[test]
fn test_min_width_raises_both_bounds() {
    let tree = tree(
        r#"{ "type": "container", "style": { "min-width": 100 }, "children": [
            { "type": "text", "text": "abc" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let mut state = LayoutState::new(&tree, &measurer);

    assert_constraints_close(state.intrinsic_width_constraints(tree.root()), 100.0, 100.0);
}

#[test]
fn test_inline_block_contributes_its_margin_box() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "container", "style": { "display": "inline-block", "padding": { "left": 5, "right": 5 } }, "children": [
                { "type": "text", "text": "ab cd" }
            ] }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let mut state = LayoutState::new(&tree, &measurer);

    assert_constraints_close(state.intrinsic_width_constraints(tree.root()), 2.0 * CHAR + 10.0, 5.0 * CHAR + 10.0);
    let inline_block = tree.children(tree.root())[0];
    assert_constraints_close(state.intrinsic_width_constraints(inline_block), 2.0 * CHAR, 5.0 * CHAR);
}

#[test]
fn test_floats_add_to_the_line_they_are_met_on() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "container", "style": { "float": "left", "width": 30, "height": 10 } },
            { "type": "text", "text": "abc" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let mut state = LayoutState::new(&tree, &measurer);

    assert_constraints_close(state.intrinsic_width_constraints(tree.root()), 30.0, 30.0 + 3.0 * CHAR);
}

#[test]
fn test_querying_after_layout_keeps_geometry() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "text", "text": "a " },
            { "type": "container", "style": { "display": "inline-block" }, "children": [
                { "type": "text", "text": "xy zw" }
            ] }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let mut state = layout_tree(&tree, &measurer, &LayoutConfig::default());
    let inline_block = tree.children(tree.root())[1];
    let before = *state.display_box(inline_block).expect("inline-block");
    let lines_before = state.lines(tree.root()).to_vec();

    let constraints = state.intrinsic_width_constraints(tree.root());
    assert_constraints_close(constraints, 2.0 * CHAR, 7.0 * CHAR);
    assert_eq!(state.display_box(inline_block), Some(&before));
    assert_eq!(state.lines(tree.root()), lines_before.as_slice());
}

// ---------------------------------------------------------------------------
// Shrink-to-fit
//
// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
//
// "the shrink-to-fit width is: min(max(preferred minimum width, available
// width), preferred width)."
// ---------------------------------------------------------------------------

#[test]
fn test_auto_width_float_takes_its_preferred_width() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "container", "style": { "float": "left" }, "children": [
                { "type": "text", "text": "aaa bbb" }
            ] }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout_tree(&tree, &measurer, &LayoutConfig::default());

    let float = state.display_box(tree.children(tree.root())[0]).expect("float");
    assert!((float.content_width - 7.0 * CHAR).abs() < 1e-3);
    assert!((float.content_height - 19.2).abs() < 1e-3);
}

#[test]
fn test_auto_width_float_shrinks_to_available_width() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 50 }, "children": [
            { "type": "container", "style": { "float": "left" }, "children": [
                { "type": "text", "text": "aaa bbb" }
            ] }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout_tree(&tree, &measurer, &LayoutConfig::default());

    let float_id = tree.children(tree.root())[0];
    let float = state.display_box(float_id).expect("float");
    assert_eq!(float.content_width, 50.0);
    // Two lines of nested content.
    assert_eq!(state.lines(float_id).len(), 2);
    assert!((float.content_height - 2.0 * 19.2).abs() < 1e-3);
}
