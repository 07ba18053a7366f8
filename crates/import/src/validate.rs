use std::collections::BTreeSet;

use serde::Serialize;

use cuadre_core::Row;

/// Per-file mapping statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingStats {
    pub total_rows: usize,
    pub mapped_rows: usize,
    pub percent_mapped: f64,
    pub stores_found: BTreeSet<String>,
}

/// Advisory per-file diagnostics for the operator. Grouping proceeds
/// regardless: unmapped rows simply land in the unassigned bucket.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub file_name: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: MappingStats,
}

/// Measure how well a normalized file was understood.
///
/// A file where nothing mapped (but rows exist) is an error: almost
/// certainly the wrong template matched. A file with zero rows is clean,
/// not an error, and never a division problem.
pub fn validate(file_name: &str, rows: &[Row]) -> ValidationResult {
    let total = rows.len();
    let mapped = rows.iter().filter(|r| r.store.is_some()).count();
    let stores_found: BTreeSet<String> = rows
        .iter()
        .filter_map(|r| r.store.as_ref().map(|s| s.name.clone()))
        .collect();
    let percent = if total == 0 {
        0.0
    } else {
        mapped as f64 * 100.0 / total as f64
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    if total > 0 && mapped == 0 {
        errors.push(
            "ninguna fila pudo asociarse a una tienda; revisar la plantilla asignada".to_string(),
        );
    } else if mapped < total {
        warnings.push(format!("{} filas sin tienda", total - mapped));
    }

    ValidationResult {
        file_name: file_name.to_string(),
        errors,
        warnings,
        stats: MappingStats {
            total_rows: total,
            mapped_rows: mapped,
            percent_mapped: percent,
            stores_found,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cuadre_core::StoreRef;

    use super::*;

    fn mapped_row(store: &str, code: i64) -> Row {
        let mut row = Row::new(HashMap::new());
        row.store = Some(StoreRef { name: store.to_string(), code });
        row
    }

    fn unmapped_row() -> Row {
        Row::new(HashMap::new())
    }

    #[test]
    fn partial_mapping_warns_with_row_count() {
        let mut rows: Vec<Row> = (0..7).map(|_| mapped_row("CALLE 80", 12)).collect();
        rows.extend((0..3).map(|_| unmapped_row()));

        let result = validate("addi.csv", &rows);
        assert_eq!(result.stats.total_rows, 10);
        assert_eq!(result.stats.mapped_rows, 7);
        assert_eq!(result.stats.percent_mapped, 70.0);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings, vec!["3 filas sin tienda"]);
    }

    #[test]
    fn full_mapping_is_silent() {
        let rows = vec![mapped_row("CALLE 80", 12), mapped_row("CHAPINERO", 3)];
        let result = validate("addi.csv", &rows);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats.percent_mapped, 100.0);
        assert_eq!(result.stats.stores_found.len(), 2);
    }

    #[test]
    fn zero_mapped_with_rows_is_an_error_not_a_warning() {
        let rows = vec![unmapped_row(), unmapped_row()];
        let result = validate("addi.csv", &rows);
        assert_eq!(result.errors.len(), 1);
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats.percent_mapped, 0.0);
    }

    #[test]
    fn empty_file_is_clean() {
        let result = validate("vacio.csv", &[]);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats.total_rows, 0);
        assert_eq!(result.stats.percent_mapped, 0.0);
        assert!(result.stats.percent_mapped.is_finite());
    }

    #[test]
    fn distinct_stores_deduplicate() {
        let rows = vec![
            mapped_row("CALLE 80", 12),
            mapped_row("CALLE 80", 12),
            mapped_row("CHAPINERO", 3),
        ];
        let result = validate("addi.csv", &rows);
        let found: Vec<&str> = result.stats.stores_found.iter().map(String::as_str).collect();
        assert_eq!(found, vec!["CALLE 80", "CHAPINERO"]);
    }
}
