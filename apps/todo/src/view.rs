//! Plain-text rendering of the todo list.
//!
//! Rows are numbered from 1 on screen; row `n` is position `n - 1` in its view.

use crate::types::{Todo, TodoState, View};
use std::fmt::Write as _;

const HEADERS: [&str; 5] = ["#", "ID", "Name", "E-mail", "Actions"];

/// Renders the input fields, the active table and (when non-empty) the archived table
#[must_use]
pub fn render(state: &TodoState) -> String {
    let mut out = String::new();

    out.push_str(&render_inputs(state));
    out.push('\n');
    out.push_str("Todos\n");
    out.push_str(&render_table(&state.active_view(), View::Active));

    let archived = state.archived_view();
    if !archived.is_empty() {
        out.push('\n');
        out.push_str("Archived todos\n");
        out.push_str(&render_table(&archived, View::Archived));
    }

    out
}

/// Renders the shared input pair and the controls available for it
#[must_use]
pub fn render_inputs(state: &TodoState) -> String {
    let controls = if state.is_editing() {
        "[submit: update] [cancel]"
    } else {
        "[submit: add]"
    };

    format!(
        "Name:   {}\nE-mail: {}\n{controls}\n",
        state.draft.name, state.draft.email
    )
}

/// Controls offered for a row
///
/// Validated active rows lose their validate control; archived rows only
/// offer unarchive.
#[must_use]
pub fn row_actions(todo: &Todo, view: View) -> &'static str {
    match (view, todo.validated) {
        (View::Active, false) => "edit delete archive validate",
        (View::Active, true) => "edit delete archive",
        (View::Archived, _) => "unarchive",
    }
}

/// Renders one view as an aligned table
///
/// Validated active rows are highlighted with a leading `*`.
#[must_use]
pub fn render_table(todos: &[&Todo], view: View) -> String {
    let rows: Vec<[String; 5]> = todos
        .iter()
        .enumerate()
        .map(|(index, todo)| {
            let highlight = if view == View::Active && todo.validated {
                "*"
            } else {
                " "
            };
            [
                format!("{highlight}{}", index + 1),
                todo.id.to_string(),
                todo.name.clone(),
                todo.email.clone(),
                row_actions(todo, view).to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    if rows.is_empty() {
        out.push_str("(empty)\n");
    }
    for row in &rows {
        write_row(&mut out, row, &widths);
    }

    out
}

fn write_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
