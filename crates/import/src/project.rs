use std::collections::HashSet;

use cuadre_core::roles::{self, ColumnRole, DOCUMENT_COLUMN};
use cuadre_core::{Cell, Row, Template};

/// Decide the final column set for one file and rebuild its rows to match.
///
/// Two independent decisions per column: document identifiers are
/// consolidated into a synthetic document column, and noise columns are
/// eliminated (discount columns unconditionally, template-configured
/// columns unless financially protected). Surviving columns keep their
/// original relative order; the synthetic column, when created, goes first.
pub fn project(
    columns: &[String],
    rows: &[Row],
    template: Option<&Template>,
) -> (Vec<String>, Vec<Row>) {
    let suppress = template.is_some_and(|t| t.suppress_document);

    let mut dropped: HashSet<String> = HashSet::new();
    let mut document_sources: Vec<String> = Vec::new();

    for column in columns {
        if column == DOCUMENT_COLUMN {
            if suppress {
                dropped.insert(column.clone());
            }
            continue;
        }
        match roles::classify(column) {
            ColumnRole::Document => {
                document_sources.push(column.clone());
                dropped.insert(column.clone());
            }
            ColumnRole::Excluded => {
                dropped.insert(column.clone());
            }
            _ => {}
        }
    }

    if let Some(template) = template {
        for configured in &template.dropped_columns {
            let needle = roles::normalize_name(configured);
            for column in columns {
                // Protection beats template configuration.
                if roles::normalize_name(column) == needle && !roles::is_protected(column) {
                    dropped.insert(column.clone());
                }
            }
        }
    }

    let has_existing = !suppress && columns.iter().any(|c| c == DOCUMENT_COLUMN);
    let synthesize = !suppress && !document_sources.is_empty();

    let mut out_columns: Vec<String> = Vec::new();
    if synthesize && !has_existing {
        out_columns.push(DOCUMENT_COLUMN.to_string());
    }
    out_columns.extend(
        columns
            .iter()
            .filter(|c| !dropped.contains(c.as_str()))
            .cloned(),
    );

    let out_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            out.cells
                .retain(|name, _| out_columns.iter().any(|c| c == name));
            if synthesize {
                let value = document_value(row, has_existing, &document_sources);
                out.cells.insert(DOCUMENT_COLUMN.to_string(), value);
            }
            out
        })
        .collect();

    (out_columns, out_rows)
}

/// An already-present document column keeps its value; otherwise the first
/// non-empty source in column order feeds the synthetic column.
fn document_value(row: &Row, has_existing: bool, sources: &[String]) -> Cell {
    if has_existing {
        if let Some(cell) = row.cells.get(DOCUMENT_COLUMN) {
            if !cell.is_blank() {
                return cell.clone();
            }
        }
    }
    for source in sources {
        if let Some(cell) = row.cells.get(source) {
            if !cell.is_blank() {
                return cell.clone();
            }
        }
    }
    Cell::Empty
}
