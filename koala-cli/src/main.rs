//! Koala layout CLI
//!
//! Lays out a JSON box-tree document and prints the display tree.
//!
//! ```text
//! koala-layout page.json                  # human readable dump
//! koala-layout page.json --width 320      # narrower viewport
//! koala-layout page.json --json           # machine readable geometry
//! koala-layout page.json --intrinsic -vv  # min/max-content widths, debug log
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use koala_common::warning::clear_warnings;
use koala_layout::document::from_json;
use koala_layout::{
    ApproximateTextMeasurer, BoxId, BoxKind, BoxTree, EdgeSizes, LayoutConfig, LayoutState, Rect, layout_tree,
};
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tracing::Level;

/// Lay out a box-tree document with the Koala inline layout engine
#[derive(Parser, Debug)]
#[command(name = "koala-layout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON box-tree document
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Viewport width in pixels (overrides the configuration file)
    #[arg(long, value_name = "PX")]
    width: Option<f32>,

    /// JSON layout configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print geometry as JSON instead of a tree
    #[arg(long)]
    json: bool,

    /// Also report the root's min-content and max-content widths
    #[arg(long)]
    intrinsic: bool,

    /// Log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.width)?;
    let source = fs::read_to_string(&cli.path).with_context(|| format!("failed to read {}", cli.path.display()))?;
    let tree = from_json(&source).with_context(|| format!("invalid box tree in {}", cli.path.display()))?;

    clear_warnings();
    let measurer = ApproximateTextMeasurer::new(&config);
    let mut layout_state = layout_tree(&tree, &measurer, &config);

    if cli.json {
        let mut output = layout_json(&tree, &layout_state);
        if cli.intrinsic {
            let constraints = layout_state.intrinsic_width_constraints(tree.root());
            output["intrinsic"] = serde_json::to_value(constraints)?;
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("=== Layout (viewport width: {}) ===\n", config.viewport_width);
    print_box(&tree, &layout_state, tree.root(), 0);

    if cli.intrinsic {
        let constraints = layout_state.intrinsic_width_constraints(tree.root());
        println!(
            "\n{} min-content={:.1} max-content={:.1}",
            "intrinsic:".bold(),
            constraints.minimum,
            constraints.maximum
        );
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then the configuration file, then `--width`.
fn load_config(path: Option<&Path>, width: Option<f32>) -> anyhow::Result<LayoutConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            LayoutConfig::from_json(&json).with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };
    if let Some(width) = width {
        anyhow::ensure!(width.is_finite() && width >= 0.0, "--width must be a non-negative number");
        config = config.with_viewport_width(width);
    }
    Ok(config)
}

fn describe(tree: &BoxTree, layout_box: BoxId) -> String {
    match tree.kind(layout_box) {
        BoxKind::Text(text) => {
            let preview: String = text.chars().take(30).collect();
            let suffix = if text.chars().count() > 30 { "..." } else { "" };
            format!("Text(\"{}{suffix}\")", preview.replace('\n', "\\n"))
        }
        BoxKind::Replaced(_) => "Replaced".to_string(),
        BoxKind::LineBreak => "LineBreak".to_string(),
        BoxKind::Container => format!("Container {}", tree.style(layout_box).display),
    }
}

fn format_rect(rect: Rect) -> String {
    format!("x={:.1} y={:.1} w={:.1} h={:.1}", rect.x, rect.y, rect.width, rect.height)
}

/// Recursively print a box with its geometry, runs and lines.
fn print_box(tree: &BoxTree, layout_state: &LayoutState<'_>, layout_box: BoxId, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}[{}] {}", layout_box.cyan(), describe(tree, layout_box).bold());

    if let Some(display_box) = layout_state.display_box(layout_box) {
        println!("{indent}  border box: {}", format_rect(display_box.border_box()));
        println!("{indent}  content box: {}", format_rect(display_box.content_box()));
        let margin = display_box.margin;
        if margin != EdgeSizes::default() {
            println!(
                "{indent}  margin: t={:.1} r={:.1} b={:.1} l={:.1}",
                margin.top, margin.right, margin.bottom, margin.left
            );
        }
    }

    for run in layout_state.runs_for_box(layout_box) {
        let text = match (run.text, tree.text(layout_box)) {
            (Some(range), Some(content)) => format!(" {:?}", content.get(range.start..range.end).unwrap_or_default()),
            _ => String::new(),
        };
        println!(
            "{indent}  {} line {}: {}{}",
            run.kind.to_string().green(),
            run.line_index,
            format_rect(run.rect),
            text.dimmed()
        );
    }

    for (index, line) in layout_state.lines(layout_box).iter().enumerate() {
        println!(
            "{indent}  {} {index}: {} baseline={:.1}",
            "line".yellow(),
            format_rect(line.rect),
            line.baseline
        );
    }

    for &child in tree.children(layout_box) {
        print_box(tree, layout_state, child, depth + 1);
    }
}

/// Geometry of every box in tree order, plus the lines of every formatting context.
fn layout_json(tree: &BoxTree, layout_state: &LayoutState<'_>) -> Value {
    let boxes: Vec<Value> = tree
        .pre_order()
        .map(|layout_box| {
            json!({
                "id": layout_box.0,
                "kind": tree.kind(layout_box),
                "parent": tree.parent(layout_box).map(|parent| parent.0),
                "display-box": layout_state.display_box(layout_box),
                "runs": layout_state.runs_for_box(layout_box).collect::<Vec<_>>(),
            })
        })
        .collect();
    let formatting_contexts: Vec<Value> = layout_state
        .formatting_roots()
        .map(|root| {
            json!({
                "root": root.0,
                "origin": layout_state.border_box_origin(root),
                "lines": layout_state.lines(root),
            })
        })
        .collect();
    json!({
        "boxes": boxes,
        "formatting-contexts": formatting_contexts,
    })
}
