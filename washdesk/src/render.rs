//! Text rendering for the console.

use std::fmt::Write;

use deskkit::shell::{Content, Outline, ShellError, Trigger};
use deskkit::table::{Alignment, HeaderView, SortDirection, TableController, TableRow};

/// Pixels per character cell when mapping column sizes to text widths.
const PX_PER_CELL: u16 = 8;
const DEFAULT_WIDTH: usize = 12;
const MIN_WIDTH: usize = 3;

fn width_of(header: &HeaderView) -> usize {
    header
        .size
        .map(|px| usize::from(px / PX_PER_CELL))
        .unwrap_or(DEFAULT_WIDTH)
        .max(MIN_WIDTH)
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    let text: String = if text.chars().count() > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    } else {
        text.to_string()
    };
    match align {
        Alignment::Left => format!("{:<width$}", text),
        Alignment::Center => format!("{:^width$}", text),
        Alignment::Right => format!("{:>width$}", text),
    }
}

fn header_label(header: &HeaderView) -> String {
    let mut label = header.label.clone();
    if let Some(direction) = header.sort {
        label.push(match direction {
            SortDirection::Asc => '^',
            SortDirection::Desc => 'v',
        });
    }
    if header.filter.is_some() {
        label.push('*');
    }
    label
}

/// The visible page as a text grid with a pagination footer.
pub fn table<R: TableRow>(table: &TableController<R>) -> String {
    let headers = table.headers();
    let mut out = String::new();

    let mut line = String::from("   ");
    for header in &headers {
        line.push_str(&pad(&header_label(header), width_of(header), header.align));
        line.push(' ');
    }
    let _ = writeln!(out, "{}", line.trim_end());
    let rule: usize = headers.iter().map(|h| width_of(h) + 1).sum();
    let _ = writeln!(out, "   {}", "-".repeat(rule.saturating_sub(1)));

    let rows = table.row_views();
    if rows.is_empty() {
        let _ = writeln!(out, "   (no rows)");
    }
    for row in &rows {
        let mut line = String::from(if row.selected { "[x]" } else { "[ ]" });
        for (header, cell) in headers.iter().zip(&row.cells) {
            line.push(' ');
            line.push_str(&pad(cell, width_of(header), header.align));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    out.push_str(&footer(table));
    out
}

/// One-line pagination and selection summary.
pub fn footer<R: TableRow>(table: &TableController<R>) -> String {
    let pages = table
        .page_count()
        .map(|count| count.to_string())
        .unwrap_or_else(|| "?".to_string());
    let mut line = format!(
        "page {} of {} | {} per page | {} selected",
        table.page(),
        pages,
        table.per_page(),
        table.selected_row_ids().len()
    );
    if table.is_loading() {
        line.push_str(" | loading");
    }
    if table.has_pending_filters() {
        line.push_str(" | filter pending");
    }
    line
}

/// State summary for the `status` command.
pub fn status<R: TableRow>(table: &TableController<R>) -> String {
    let intent = table.intent();
    let mut out = String::new();
    let _ = writeln!(out, "query    {}", intent.to_query_string());
    let _ = writeln!(out, "params   {}", intent.to_json());
    if let Some(seq) = table.latest_request() {
        let _ = writeln!(out, "request  {}", seq);
    }
    let layout = &table.state().layout;
    let _ = writeln!(out, "order    {}", layout.order.join(", "));
    let hidden: Vec<&str> = layout
        .order
        .iter()
        .map(String::as_str)
        .filter(|id| !layout.is_visible(id))
        .collect();
    if !hidden.is_empty() {
        let _ = writeln!(out, "hidden   {}", hidden.join(", "));
    }
    for column in table.columns().iter().filter(|c| c.filterable) {
        if let Some(pending) = table.pending_filter(&column.id) {
            let _ = writeln!(out, "filter   {} = {}", column.id, pending);
        }
    }
    out.push_str(&footer(table));
    out
}

/// A shell's trigger and, while open, its content.
pub fn shell(trigger: &Trigger, content: &Content) -> Result<String, ShellError> {
    let mut out = String::new();
    match trigger.render(&Outline)? {
        Some(node) => {
            let _ = writeln!(out, "{}", node);
        }
        None => {
            let _ = writeln!(out, "(nothing to show)");
        }
    }
    if let Some(node) = content.render(&Outline)? {
        let _ = writeln!(out, "{}", node);
    }
    Ok(out.trim_end().to_string())
}
