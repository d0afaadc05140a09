//! Integration tests for inline formatting contexts: lines, runs, floats and
//! nested inline-blocks.
//!
//! Every document uses the default 16px font with the approximate
//! measurer: glyphs are 9.6px wide, lines are 19.2px tall and the baseline
//! sits 14.4px below the line top.

use koala_layout::document::from_json;
use koala_layout::{
    ApproximateTextMeasurer, BoxId, BoxTree, FormattingContext, LayoutConfig, LayoutState, Rect, RunKind, TextRange,
    create_formatting_context, layout_tree,
};

const CHAR: f32 = 9.6;
const LINE_HEIGHT: f32 = 19.2;

/// Helper: build a tree from a JSON document.
fn tree(json: &str) -> BoxTree {
    from_json(json).expect("document should be valid")
}

fn layout<'t>(tree: &'t BoxTree, measurer: &'t ApproximateTextMeasurer) -> LayoutState<'t> {
    layout_tree(tree, measurer, &LayoutConfig::default())
}

fn assert_close(actual: f32, expected: f32) {
    assert!((actual - expected).abs() < 1e-3, "expected {expected}, got {actual}");
}

fn assert_rect_close(actual: Rect, expected: Rect) {
    assert_close(actual.x, expected.x);
    assert_close(actual.y, expected.y);
    assert_close(actual.width, expected.width);
    assert_close(actual.height, expected.height);
}

/// Helper: the text each run of `root` paints, in order.
fn run_texts(state: &LayoutState<'_>, root: BoxId) -> Vec<String> {
    state
        .runs(root)
        .iter()
        .filter_map(|run| {
            let range = run.text?;
            let text = state.tree().text(run.layout_box)?;
            Some(text[range.start..range.end].to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Basic line construction
// ---------------------------------------------------------------------------

#[test]
fn test_empty_root_produces_no_lines() {
    let tree = tree(r#"{ "type": "container" }"#);
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);

    assert!(state.lines(tree.root()).is_empty());
    assert!(state.runs(tree.root()).is_empty());
    let root = state.display_box(tree.root()).expect("root has geometry");
    assert_eq!(root.content_width, 800.0);
    assert_eq!(root.content_height, 0.0);
}

#[test]
fn test_empty_inline_block_has_no_lines() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "container", "style": { "display": "inline-block", "width": 30, "height": 10 } }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);

    let inline_block = tree.children(tree.root())[0];
    assert!(state.lines(inline_block).is_empty());
    let display_box = state.display_box(inline_block).expect("inline-block is sized");
    assert_eq!(display_box.content_width, 30.0);
    assert_eq!(display_box.content_height, 10.0);
}

#[test]
fn test_short_text_fits_on_one_line() {
    let tree = tree(r#"{ "type": "container", "children": [ { "type": "text", "text": "abc def" } ] }"#);
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let lines = state.lines(root);
    assert_eq!(lines.len(), 1);
    assert_rect_close(lines[0].rect, Rect::new(0.0, 0.0, 800.0, LINE_HEIGHT));
    assert_close(lines[0].baseline, 14.4);
    assert_eq!(run_texts(&state, root), vec!["abc", " ", "def"]);

    let runs = state.runs(root);
    assert!(runs.iter().all(|run| run.kind == RunKind::Text && run.line_index == 0));
    assert_rect_close(runs[2].rect, Rect::new(4.0 * CHAR, 0.0, 3.0 * CHAR, LINE_HEIGHT));

    let text = tree.children(root)[0];
    let text_box = state.display_box(text).expect("text has geometry");
    assert_rect_close(text_box.border_box(), Rect::new(0.0, 0.0, 7.0 * CHAR, LINE_HEIGHT));
    assert_close(state.display_box(root).expect("root").content_height, LINE_HEIGHT);
}

#[test]
fn test_text_wraps_at_spaces() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 40 }, "children": [
            { "type": "text", "text": "aaa bbb" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let lines = state.lines(root);
    assert_eq!(lines.len(), 2);
    assert_close(lines[1].rect.y, LINE_HEIGHT);
    assert_eq!(run_texts(&state, root), vec!["aaa", " ", "bbb"]);
    let line_indices: Vec<usize> = state.runs(root).iter().map(|run| run.line_index).collect();
    assert_eq!(line_indices, vec![0, 0, 1]);
    // The space hangs at the end of the first line without advancing.
    assert_close(state.runs(root)[1].rect.width, 0.0);
}

#[test]
fn test_split_text_resumes_on_next_line() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 97 }, "children": [
            { "type": "text", "text": "abcdefghijkl", "style": { "word-break": "break-all" } }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    assert_eq!(state.lines(root).len(), 2);
    let runs = state.runs(root);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text, Some(TextRange::new(0, 10)));
    assert_eq!(runs[1].text, Some(TextRange::new(10, 12)));
    assert_eq!(runs[1].line_index, 1);
    assert_eq!(state.line_for_run(root, &runs[1]), state.lines(root).get(1));

    // Multi-line text boxes cover every fragment.
    let text_box = state.display_box(tree.children(root)[0]).expect("text");
    assert_rect_close(text_box.border_box(), Rect::new(0.0, 0.0, 10.0 * CHAR, 2.0 * LINE_HEIGHT));
}

#[test]
fn test_overlong_word_overflows_instead_of_looping() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 20 }, "children": [
            { "type": "text", "text": "unbreakable" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    assert_eq!(state.lines(root).len(), 1);
    let line = state.lines(root)[0];
    assert_close(line.scrollable_overflow.width, 11.0 * CHAR);
    assert_close(line.rect.width, 20.0);
}

#[test]
fn test_forced_break_starts_new_line() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "text", "text": "ab" },
            { "type": "line-break" },
            { "type": "text", "text": "cd" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    assert_eq!(state.lines(root).len(), 2);
    let kinds: Vec<RunKind> = state.runs(root).iter().map(|run| run.kind).collect();
    assert_eq!(kinds, vec![RunKind::Text, RunKind::LineBreak, RunKind::Text]);
    let last = state.runs(root)[2];
    assert_eq!(last.line_index, 1);
    assert_close(last.rect.x, 0.0);
    assert_close(last.rect.y, LINE_HEIGHT);
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

#[test]
fn test_text_align_center_and_right() {
    let document = |align: &str| {
        format!(
            r#"{{ "type": "container", "style": {{ "width": 100, "text-align": "{align}" }}, "children": [
                {{ "type": "text", "text": "ab" }}
            ] }}"#
        )
    };
    let measurer = ApproximateTextMeasurer::default();

    let centered = tree(&document("center"));
    let state = layout(&centered, &measurer);
    assert_close(state.runs(centered.root())[0].rect.x, (100.0 - 2.0 * CHAR) / 2.0);

    let right = tree(&document("right"));
    let state = layout(&right, &measurer);
    assert_close(state.runs(right.root())[0].rect.x, 100.0 - 2.0 * CHAR);
}

#[test]
fn test_justify_skips_last_line() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 80, "text-align": "justify" }, "children": [
            { "type": "text", "text": "aa bb cc dd" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    // "aa bb cc" fills 76.8px of the first line; "dd" wraps.
    let runs = state.runs(root);
    let first_line_end = runs
        .iter()
        .filter(|run| run.line_index == 0 && run.rect.width > 0.0)
        .map(|run| run.rect.right())
        .fold(0.0, f32::max);
    assert_close(first_line_end, 80.0);

    let last_line_end = runs
        .iter()
        .filter(|run| run.line_index == 1)
        .map(|run| run.rect.right())
        .fold(0.0, f32::max);
    assert_close(last_line_end, 2.0 * CHAR);
}

// ---------------------------------------------------------------------------
// Inline containers
// ---------------------------------------------------------------------------

#[test]
fn test_relative_span_offsets_its_runs() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "text", "text": "ab" },
            { "type": "container", "style": { "position": "relative", "inset": { "left": 5, "top": 2 } }, "children": [
                { "type": "text", "text": "cd" }
            ] }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let span = tree.children(root)[1];
    let inner = tree.children(span)[0];
    let inner_run = state.runs_for_box(inner).next().expect("inner text has a run");
    assert_rect_close(inner_run.rect, Rect::new(2.0 * CHAR + 5.0, 2.0, 2.0 * CHAR, LINE_HEIGHT));

    let span_box = state.display_box(span).expect("span");
    assert_close(span_box.left(), 2.0 * CHAR + 5.0);
    assert_close(span_box.border_box_width(), 2.0 * CHAR);
}

#[test]
fn test_span_across_lines_covers_both_fragments() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 40 }, "children": [
            { "type": "container", "children": [ { "type": "text", "text": "aaa bbb" } ] }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);

    let span = tree.children(tree.root())[0];
    let span_box = state.display_box(span).expect("span");
    // Content area of a 16px font is 16px tall, centered in the 19.2px line.
    assert_rect_close(span_box.border_box(), Rect::new(0.0, 1.6, 3.0 * CHAR, LINE_HEIGHT + 16.0));
}

#[test]
fn test_span_padding_takes_room_on_the_line() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "container", "style": { "padding": { "left": 4, "right": 6 }, "margin": { "left": 3 } }, "children": [
                { "type": "text", "text": "ab" }
            ] },
            { "type": "text", "text": "c" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let texts: Vec<f32> = state
        .runs(root)
        .iter()
        .filter(|run| run.kind == RunKind::Text)
        .map(|run| run.rect.x)
        .collect();
    assert_close(texts[0], 3.0 + 4.0);
    assert_close(texts[1], 3.0 + 4.0 + 2.0 * CHAR + 6.0);

    let span_box = state.display_box(tree.children(root)[0]).expect("span");
    assert_close(span_box.left(), 3.0);
    assert_close(span_box.border_box_width(), 4.0 + 2.0 * CHAR + 6.0);
}

// ---------------------------------------------------------------------------
// Floats
// ---------------------------------------------------------------------------

#[test]
fn test_full_width_float_pushes_text_below() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 100 }, "children": [
            { "type": "container", "style": { "float": "left", "width": 100, "height": 50 } },
            { "type": "text", "text": "abc" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let float = tree.children(root)[0];
    let float_box = state.display_box(float).expect("float");
    assert_rect_close(float_box.margin_box(), Rect::new(0.0, 0.0, 100.0, 50.0));

    let lines = state.lines(root);
    assert_eq!(lines.len(), 2);
    // The float is consumed by a line that holds no runs.
    assert_close(lines[0].rect.height, 0.0);
    assert!(state.runs(root).iter().all(|run| run.line_index == 1));
    assert_close(lines[1].rect.y, 50.0);

    let text = state.runs(root)[0];
    assert_rect_close(text.rect, Rect::new(0.0, 50.0, 3.0 * CHAR, LINE_HEIGHT));
    assert_close(state.display_box(root).expect("root").content_height, 50.0 + LINE_HEIGHT);
}

#[test]
fn test_right_float_shortens_line() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 200 }, "children": [
            { "type": "container", "style": { "float": "right", "width": 50, "height": 30 } },
            { "type": "text", "text": "abc def" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let float_box = state.display_box(tree.children(root)[0]).expect("float");
    assert_close(float_box.left(), 150.0);
    assert_close(float_box.top(), 0.0);
    let line = state.lines(root)[0];
    assert_close(line.rect.x, 0.0);
    assert_close(line.rect.width, 150.0);
    assert_eq!(state.formatting_state(root).expect("state").floating_state.floats().len(), 1);
    // The float is taller than the line.
    assert_close(state.display_box(root).expect("root").content_height, 30.0);
}

#[test]
fn test_left_float_indents_following_lines_until_its_bottom() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 100 }, "children": [
            { "type": "container", "style": { "float": "left", "width": 30, "height": 25 } },
            { "type": "text", "text": "aaaa bbbb cccc" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let lines = state.lines(root);
    assert_eq!(lines.len(), 3);
    // Lines 0 and 1 start within the float's vertical extent.
    assert_close(lines[0].rect.x, 30.0);
    assert_close(lines[1].rect.x, 30.0);
    assert_close(lines[2].rect.x, 0.0);
    assert_eq!(run_texts(&state, root), vec!["aaaa", " ", "bbbb", " ", "cccc"]);
}

// ---------------------------------------------------------------------------
// Floats met in the middle of a line
//
// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
//
// "If there is a line box, the outer top of the floated box is aligned
// with the top of the current line box." A float too wide for what is left
// of a non-empty line goes below it instead.
// ---------------------------------------------------------------------------

#[test]
fn test_float_too_wide_for_started_line_goes_below_it() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 100 }, "children": [
            { "type": "text", "text": "aaaa" },
            { "type": "container", "style": { "float": "left", "width": 90, "height": 10 } }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let lines = state.lines(root);
    assert_eq!(lines.len(), 1);
    assert_rect_close(lines[0].rect, Rect::new(0.0, 0.0, 100.0, LINE_HEIGHT));
    assert_close(state.runs(root)[0].rect.x, 0.0);

    let float_box = state.display_box(tree.children(root)[1]).expect("float");
    assert_close(float_box.left(), 0.0);
    assert_close(float_box.top(), LINE_HEIGHT);
    assert_close(state.display_box(root).expect("root").content_height, LINE_HEIGHT + 10.0);
}

#[test]
fn test_left_float_after_text_shifts_the_current_line() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 100 }, "children": [
            { "type": "text", "text": "aa " },
            { "type": "container", "style": { "float": "left", "width": 30, "height": 10 } },
            { "type": "text", "text": "bb" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let lines = state.lines(root);
    assert_eq!(lines.len(), 1);
    assert_close(lines[0].rect.x, 30.0);
    assert_close(lines[0].rect.width, 70.0);
    assert_eq!(run_texts(&state, root), vec!["aa", " ", "bb"]);
    // Text committed before the float moves along with the line.
    let first = state.runs_for_box(tree.children(root)[0]).next().expect("text run");
    assert_close(first.rect.x, 30.0);

    let float_box = state.display_box(tree.children(root)[1]).expect("float");
    assert_rect_close(float_box.margin_box(), Rect::new(0.0, 0.0, 30.0, 10.0));
}

// ---------------------------------------------------------------------------
// Atomic inline boxes
// ---------------------------------------------------------------------------

#[test]
fn test_inline_block_is_one_atomic_run() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "text", "text": "a " },
            { "type": "container", "style": { "display": "inline-block" }, "children": [
                { "type": "text", "text": "xy" }
            ] },
            { "type": "text", "text": " b" }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();
    let inline_block = tree.children(root)[1];

    let box_runs: Vec<_> = state.runs_for_box(inline_block).collect();
    assert_eq!(box_runs.len(), 1);
    assert_eq!(box_runs[0].kind, RunKind::Box);
    assert_eq!(box_runs[0].text, None);
    assert_rect_close(box_runs[0].rect, Rect::new(2.0 * CHAR, 0.0, 2.0 * CHAR, LINE_HEIGHT));

    let display_box = state.display_box(inline_block).expect("inline-block");
    assert_close(display_box.content_width, 2.0 * CHAR);
    assert_close(display_box.content_height, LINE_HEIGHT);
    assert_close(state.border_box_origin(inline_block).x, 2.0 * CHAR);

    // The nested content was laid out in its own formatting context.
    assert_eq!(state.lines(inline_block).len(), 1);
    assert_eq!(state.runs(inline_block)[0].text, Some(TextRange::new(0, 2)));
    assert_eq!(state.lines(root).len(), 1);
}

#[test]
fn test_replaced_box_sits_on_the_baseline() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "text", "text": "a" },
            { "type": "replaced", "intrinsic-width": 40, "intrinsic-height": 30 }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);
    let root = tree.root();

    let line = state.lines(root)[0];
    // The image's bottom edge is the baseline.
    assert_close(line.baseline, 30.0);
    assert_close(line.rect.height, 30.0 + 4.8);
    let image = state.runs(root)[1];
    assert_rect_close(image.rect, Rect::new(CHAR, 0.0, 40.0, 30.0));
    let text = state.runs(root)[0];
    assert_close(text.rect.y, 30.0 - 14.4);
}

#[test]
fn test_replaced_keeps_aspect_ratio() {
    let tree = tree(
        r#"{ "type": "container", "children": [
            { "type": "replaced", "intrinsic-width": 40, "intrinsic-height": 20, "style": { "width": 80 } }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let state = layout(&tree, &measurer);

    let image = state.display_box(tree.children(tree.root())[0]).expect("image");
    assert_eq!(image.content_width, 80.0);
    assert_eq!(image.content_height, 40.0);
}

// ---------------------------------------------------------------------------
// Re-layout
// ---------------------------------------------------------------------------

#[test]
fn test_relayout_reproduces_identical_output() {
    let tree = tree(
        r#"{ "type": "container", "style": { "width": 120 }, "children": [
            { "type": "container", "style": { "float": "left", "width": 30, "height": 40 } },
            { "type": "text", "text": "lorem ipsum dolor sit amet" },
            { "type": "container", "style": { "display": "inline-block", "padding": { "left": 2 } }, "children": [
                { "type": "text", "text": "nested words" }
            ] }
        ] }"#,
    );
    let measurer = ApproximateTextMeasurer::default();
    let mut state = layout(&tree, &measurer);
    let root = tree.root();
    let snapshot = state.formatting_state(root).cloned().expect("root state");

    let formatting_context = create_formatting_context(&state, root);
    formatting_context.invalidate_formatting_state(&mut state);
    assert!(state.lines(root).is_empty());
    formatting_context.layout_in_flow_content(&mut state);

    let again = state.formatting_state(root).expect("root state");
    assert_eq!(again.lines, snapshot.lines);
    assert_eq!(again.runs, snapshot.runs);
    assert_eq!(again.display_boxes, snapshot.display_boxes);
    assert_eq!(again.floating_state, snapshot.floating_state);
}
