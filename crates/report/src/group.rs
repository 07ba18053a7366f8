use std::cmp::Ordering;

use cuadre_core::cell::parse_amount;
use cuadre_core::roles::normalize_name;
use cuadre_core::{Cell, NormalizedFile, Row};

use crate::source::source_label;

/// Store bucket for rows that resolved to no store.
pub const UNASSIGNED: &str = "UNASSIGNED";

/// Ordered business-code predicates. The first predicate satisfied by any
/// column of a bucket selects that bucket's sort key.
const CODE_PREDICATES: &[(&str, &[&str])] = &[
    ("code", &["codigo"]),
    ("terminal", &["terminal"]),
    ("reference", &["referencia"]),
    ("invoice", &["factura"]),
    ("transaction", &["transaccion"]),
    ("document", &["documento"]),
];

#[derive(Debug, Clone)]
pub struct SourceBucket {
    pub label: String,
    /// First-seen union of the projected columns of contributing files.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone)]
pub struct StoreGroup {
    pub name: String,
    pub code: Option<i64>,
    pub sources: Vec<SourceBucket>,
}

/// All normalized rows, partitioned by (store, source). Vectors, not maps:
/// iteration order is the ordering contract.
#[derive(Debug, Clone, Default)]
pub struct GroupedDataset {
    pub stores: Vec<StoreGroup>,
}

impl GroupedDataset {
    pub fn total_rows(&self) -> usize {
        self.stores
            .iter()
            .flat_map(|s| &s.sources)
            .map(|b| b.rows.len())
            .sum()
    }
}

/// Partition every row into its (store, source) bucket, order rows within
/// each bucket by the best-effort business code, and order stores by
/// canonical numeric code. Rebuilt from scratch on every call.
pub fn group(files: &[NormalizedFile]) -> GroupedDataset {
    let mut stores: Vec<StoreGroup> = Vec::new();

    for file in files {
        let label = source_label(&file.file_name, file.template_id());
        for row in &file.rows {
            let (store_name, code) = match &row.store {
                Some(s) => (s.name.trim().to_uppercase(), Some(s.code)),
                None => (UNASSIGNED.to_string(), None),
            };

            let store_idx = match stores.iter().position(|s| s.name == store_name) {
                Some(i) => i,
                None => {
                    stores.push(StoreGroup {
                        name: store_name,
                        code: None,
                        sources: Vec::new(),
                    });
                    stores.len() - 1
                }
            };
            let store = &mut stores[store_idx];
            if store.code.is_none() {
                store.code = code;
            }

            let bucket_idx = match store.sources.iter().position(|b| b.label == label) {
                Some(i) => i,
                None => {
                    store.sources.push(SourceBucket {
                        label: label.clone(),
                        columns: Vec::new(),
                        rows: Vec::new(),
                    });
                    store.sources.len() - 1
                }
            };
            let bucket = &mut store.sources[bucket_idx];
            for column in &file.columns {
                if !bucket.columns.contains(column) {
                    bucket.columns.push(column.clone());
                }
            }
            bucket.rows.push(row.clone());
        }
    }

    for store in &mut stores {
        for bucket in &mut store.sources {
            sort_bucket(bucket);
        }
    }

    // Coded stores ascending, uncoded after them in name order.
    stores.sort_by(|a, b| match (a.code, b.code) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    });

    GroupedDataset { stores }
}

/// Locate the bucket's business-code column, if any.
fn sort_key_column(columns: &[String]) -> Option<String> {
    for (_, keywords) in CODE_PREDICATES {
        let hit = columns.iter().find(|column| {
            let n = normalize_name(column);
            keywords.iter().any(|k| n.contains(k))
        });
        if let Some(column) = hit {
            return Some(column.clone());
        }
    }
    None
}

fn sort_bucket(bucket: &mut SourceBucket) {
    // No code-ish column anywhere: original order is the order.
    let Some(key) = sort_key_column(&bucket.columns) else {
        return;
    };
    bucket
        .rows
        .sort_by(|a, b| compare_code_cells(a.cell(&key), b.cell(&key)));
}

/// Blank sorts last; two numbers compare numerically; anything else falls
/// back to a natural-order, case-insensitive string compare.
fn compare_code_cells(a: Option<&Cell>, b: Option<&Cell>) -> Ordering {
    let a = a.filter(|c| !c.is_blank());
    let b = b.filter(|c| !c.is_blank());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let (xs, ys) = (x.to_plain_string(), y.to_plain_string());
            match (parse_amount(&xs), parse_amount(&ys)) {
                (Some(nx), Some(ny)) => nx.cmp(&ny),
                _ => natural_cmp(&xs, &ys),
            }
        }
    }
}

/// Case-insensitive natural order: digit runs compare by numeric value, so
/// `T2` sorts before `T10`.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let ni = digit_run_end(&a, i);
            let nj = digit_run_end(&b, j);
            match compare_digit_runs(&a[i..ni], &b[j..nj]) {
                Ordering::Equal => {
                    i = ni;
                    j = nj;
                }
                other => return other,
            }
        } else {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                other => return other,
            }
        }
    }
    (a.len() - i).cmp(&(b.len() - j))
}

fn digit_run_end(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    i
}

fn compare_digit_runs(a: &[char], b: &[char]) -> Ordering {
    let a = trim_leading_zeros(a);
    let b = trim_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn trim_leading_zeros(run: &[char]) -> &[char] {
    let start = run.iter().take_while(|c| **c == '0').count();
    // All zeros: keep one digit so the value still compares as zero.
    &run[start.min(run.len().saturating_sub(1))..]
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cuadre_core::StoreRef;

    use super::*;

    fn file(name: &str, columns: &[&str], rows: Vec<Row>) -> NormalizedFile {
        NormalizedFile {
            file_name: name.to_string(),
            template: None,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    fn row(store: Option<(&str, i64)>, pairs: &[(&str, &str)]) -> Row {
        let cells: HashMap<String, Cell> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Cell::Text(v.to_string())))
            .collect();
        let mut row = Row::new(cells);
        row.store = store.map(|(name, code)| StoreRef {
            name: name.to_string(),
            code,
        });
        row
    }

    #[test]
    fn grouping_is_a_partition() {
        let files = vec![
            file(
                "addi_01.csv",
                &["Factura", "Valor"],
                vec![
                    row(Some(("CALLE 80", 12)), &[("Factura", "FV-2"), ("Valor", "100")]),
                    row(Some(("CHAPINERO", 3)), &[("Factura", "FV-1"), ("Valor", "200")]),
                    row(None, &[("Factura", "FV-9"), ("Valor", "50")]),
                ],
            ),
            file(
                "redeban_01.csv",
                &["Factura", "Valor"],
                vec![row(Some(("CALLE 80", 12)), &[("Factura", "FV-3"), ("Valor", "300")])],
            ),
        ];

        let dataset = group(&files);
        assert_eq!(dataset.total_rows(), 4);

        let names: Vec<&str> = dataset.stores.iter().map(|s| s.name.as_str()).collect();
        // Coded stores by code (CHAPINERO=3 < CALLE 80=12), sentinel last.
        assert_eq!(names, vec!["CHAPINERO", "CALLE 80", UNASSIGNED]);
    }

    #[test]
    fn store_names_are_trimmed_and_uppercased() {
        let files = vec![file(
            "addi_01.csv",
            &["Valor"],
            vec![
                row(Some((" Calle 80 ", 12)), &[("Valor", "1")]),
                row(Some(("CALLE 80", 12)), &[("Valor", "2")]),
            ],
        )];

        let dataset = group(&files);
        assert_eq!(dataset.stores.len(), 1);
        assert_eq!(dataset.stores[0].name, "CALLE 80");
        assert_eq!(dataset.stores[0].code, Some(12));
    }

    #[test]
    fn sources_keep_first_encounter_order_within_store() {
        let files = vec![
            file(
                "redeban_01.csv",
                &["Valor"],
                vec![row(Some(("CALLE 80", 12)), &[("Valor", "1")])],
            ),
            file(
                "addi_01.csv",
                &["Valor"],
                vec![row(Some(("CALLE 80", 12)), &[("Valor", "2")])],
            ),
        ];

        let dataset = group(&files);
        let labels: Vec<&str> = dataset.stores[0]
            .sources
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["REDEBAN", "ADDI"]);
    }

    #[test]
    fn bucket_columns_are_first_seen_union() {
        let files = vec![
            file(
                "transferencia_01.csv",
                &["Fecha", "Valor"],
                vec![row(Some(("CALLE 80", 12)), &[("Fecha", "2025-01-01"), ("Valor", "1")])],
            ),
            file(
                "transferencia_02.csv",
                &["Fecha", "Referencia", "Valor"],
                vec![row(Some(("CALLE 80", 12)), &[("Fecha", "2025-01-02"), ("Referencia", "R1"), ("Valor", "2")])],
            ),
        ];

        let dataset = group(&files);
        let bucket = &dataset.stores[0].sources[0];
        assert_eq!(bucket.label, "TRANSFERENCIAS");
        assert_eq!(bucket.columns, vec!["Fecha", "Valor", "Referencia"]);
    }

    #[test]
    fn rows_sort_numerically_on_the_code_column() {
        let files = vec![file(
            "addi_01.csv",
            &["Código Terminal", "Valor"],
            vec![
                row(Some(("CALLE 80", 12)), &[("Código Terminal", "30"), ("Valor", "a")]),
                row(Some(("CALLE 80", 12)), &[("Código Terminal", "4"), ("Valor", "b")]),
                row(Some(("CALLE 80", 12)), &[("Código Terminal", "200"), ("Valor", "c")]),
            ],
        )];

        let dataset = group(&files);
        let codes: Vec<String> = dataset.stores[0].sources[0]
            .rows
            .iter()
            .map(|r| r.cell("Código Terminal").unwrap().to_plain_string())
            .collect();
        assert_eq!(codes, vec!["4", "30", "200"]);
    }

    #[test]
    fn blank_codes_sort_last() {
        let files = vec![file(
            "addi_01.csv",
            &["Referencia", "Valor"],
            vec![
                row(Some(("CALLE 80", 12)), &[("Referencia", ""), ("Valor", "a")]),
                row(Some(("CALLE 80", 12)), &[("Referencia", "R2"), ("Valor", "b")]),
                row(Some(("CALLE 80", 12)), &[("Referencia", "R1"), ("Valor", "c")]),
            ],
        )];

        let dataset = group(&files);
        let refs: Vec<String> = dataset.stores[0].sources[0]
            .rows
            .iter()
            .map(|r| r.cell("Referencia").unwrap().to_plain_string())
            .collect();
        assert_eq!(refs, vec!["R1", "R2", ""]);
    }

    #[test]
    fn mixed_codes_use_natural_order() {
        let files = vec![file(
            "addi_01.csv",
            &["Referencia"],
            vec![
                row(Some(("CALLE 80", 12)), &[("Referencia", "t10")]),
                row(Some(("CALLE 80", 12)), &[("Referencia", "T2")]),
                row(Some(("CALLE 80", 12)), &[("Referencia", "t1")]),
            ],
        )];

        let dataset = group(&files);
        let refs: Vec<String> = dataset.stores[0].sources[0]
            .rows
            .iter()
            .map(|r| r.cell("Referencia").unwrap().to_plain_string())
            .collect();
        assert_eq!(refs, vec!["t1", "T2", "t10"]);
    }

    #[test]
    fn predicate_priority_prefers_codigo_over_documento() {
        let files = vec![file(
            "addi_01.csv",
            &["Documento", "Código"],
            vec![
                row(Some(("CALLE 80", 12)), &[("Documento", "1"), ("Código", "9")]),
                row(Some(("CALLE 80", 12)), &[("Documento", "2"), ("Código", "3")]),
            ],
        )];

        let dataset = group(&files);
        let codes: Vec<String> = dataset.stores[0].sources[0]
            .rows
            .iter()
            .map(|r| r.cell("Código").unwrap().to_plain_string())
            .collect();
        assert_eq!(codes, vec!["3", "9"]);
    }

    #[test]
    fn no_code_column_preserves_original_order() {
        let files = vec![file(
            "addi_01.csv",
            &["Tienda", "Valor"],
            vec![
                row(Some(("CALLE 80", 12)), &[("Tienda", "z"), ("Valor", "3")]),
                row(Some(("CALLE 80", 12)), &[("Tienda", "a"), ("Valor", "1")]),
            ],
        )];

        let dataset = group(&files);
        let stores: Vec<String> = dataset.stores[0].sources[0]
            .rows
            .iter()
            .map(|r| r.cell("Tienda").unwrap().to_plain_string())
            .collect();
        assert_eq!(stores, vec!["z", "a"]);
    }

    #[test]
    fn uncoded_stores_sort_after_coded_alphabetically() {
        let files = vec![file(
            "x.csv",
            &["Valor"],
            vec![
                row(None, &[("Valor", "1")]),
                row(Some(("ZETA", 5)), &[("Valor", "2")]),
                row(Some(("ALFA", 40)), &[("Valor", "3")]),
            ],
        )];

        let dataset = group(&files);
        let names: Vec<&str> = dataset.stores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ZETA", "ALFA", UNASSIGNED]);
    }

    #[test]
    fn natural_cmp_basics() {
        assert_eq!(natural_cmp("t2", "t10"), Ordering::Less);
        assert_eq!(natural_cmp("T2", "t2"), Ordering::Equal);
        assert_eq!(natural_cmp("abc", "abd"), Ordering::Less);
        assert_eq!(natural_cmp("a1b2", "a1b10"), Ordering::Less);
        assert_eq!(natural_cmp("007", "7"), Ordering::Equal);
        assert_eq!(natural_cmp("a", "ab"), Ordering::Less);
    }
}
