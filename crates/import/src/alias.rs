use cuadre_core::{Cell, Row, StoreAlias, StoreRef};

/// Rewrite every alias occurrence to its canonical store name and attach
/// the store identity to each row.
///
/// Provider files often repeat the store in more than one column (a short
/// code next to the full name). Two tie-breaks apply: within a cell, the
/// first alias in registry order wins; within a row, the last matching
/// cell in column order assigns the store. Pure transform: the input rows
/// are left untouched.
pub fn resolve_aliases(columns: &[String], rows: &[Row], aliases: &[&StoreAlias]) -> Vec<Row> {
    let lowered: Vec<(String, &StoreAlias)> = aliases
        .iter()
        .map(|alias| (alias.text.to_lowercase(), *alias))
        .collect();
    rows.iter()
        .map(|row| resolve_row(columns, row, &lowered))
        .collect()
}

fn resolve_row(columns: &[String], row: &Row, aliases: &[(String, &StoreAlias)]) -> Row {
    let mut out = row.clone();
    let mut resolved: Option<StoreRef> = None;
    for column in columns {
        let text = match out.cells.get(column) {
            Some(Cell::Text(t)) => t.to_lowercase(),
            _ => continue,
        };
        let Some((_, alias)) = aliases
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
        else {
            continue;
        };
        out.cells
            .insert(column.clone(), Cell::Text(alias.name.clone()));
        resolved = Some(StoreRef {
            name: alias.name.clone(),
            code: alias.code,
        });
    }
    out.store = resolved;
    out
}
