// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored console output

use crate::models::SectionNode;
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber. `RUST_LOG` wins over `verbose` when set.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    colored::control::set_override(colored_output);

    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

/// Indented table of contents, one heading per line with its anchor.
pub fn format_outline(forest: &[SectionNode]) -> String {
    let mut out = String::new();
    for node in forest {
        write_node(&mut out, node, 0);
    }
    out
}

fn write_node(out: &mut String, node: &SectionNode, depth: usize) {
    out.push_str(&format!(
        "{}{} {}\n",
        "  ".repeat(depth),
        node.title.bold(),
        format!("#{}", node.id).dimmed()
    ));
    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}
