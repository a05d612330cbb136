//! Plain-text rendering of a form view for the terminal.

use std::fmt::Write;

use shared::view::FormView;

pub fn view_text(view: &FormView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{notice}");
    }
    out.push('\n');

    if view.table.is_empty() {
        out.push_str("(no entries)\n");
    } else {
        let mut header = vec!["#".to_string()];
        header.extend(view.table.columns.iter().cloned());
        header.push("Id".to_string());

        let rows: Vec<Vec<String>> = view
            .table
            .rows
            .iter()
            .map(|row| {
                let mut line = vec![row.position.to_string()];
                line.extend(row.cells.iter().cloned());
                line.push(row.id.to_string());
                line
            })
            .collect();

        let widths = column_widths(&header, &rows);
        push_line(&mut out, &header, &widths);
        for row in &rows {
            push_line(&mut out, row, &widths);
        }
    }

    let _ = writeln!(out, "\n{}", view.aggregate);
    out
}

fn column_widths(header: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
