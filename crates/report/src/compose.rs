use rust_decimal::Decimal;

use cuadre_core::cell::{format_money, parse_amount};
use cuadre_core::dates::{coerce_date, format_date};
use cuadre_core::roles::{classify, ColumnRole};
use cuadre_core::Cell;

use crate::group::{GroupedDataset, SourceBucket};

/// One laid-out report cell. `Money` keeps the numeric value so a writer
/// can apply its own currency format; `display()` gives the default one.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell {
    Empty,
    Text(String),
    Money(Decimal),
}

impl ReportCell {
    pub fn display(&self) -> String {
        match self {
            ReportCell::Empty => String::new(),
            ReportCell::Text(t) => t.clone(),
            ReportCell::Money(v) => format_money(*v),
        }
    }
}

/// Label written into the placeholder cell left of the first subtotal.
const TOTAL_LABEL: &str = "TOTAL";

#[derive(Debug, Clone)]
pub struct SourceSection {
    pub label: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
    pub totals: Vec<ReportCell>,
}

#[derive(Debug, Clone)]
pub struct StoreSection {
    pub store: String,
    pub sources: Vec<SourceSection>,
}

/// The consolidated report, laid out but not serialized. Stores appear in
/// dataset order; sources in first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct ReportModel {
    pub stores: Vec<StoreSection>,
}

pub fn compose(dataset: &GroupedDataset) -> ReportModel {
    ReportModel {
        stores: dataset
            .stores
            .iter()
            .map(|store| StoreSection {
                store: store.name.clone(),
                sources: store.sources.iter().map(compose_source).collect(),
            })
            .collect(),
    }
}

fn compose_source(bucket: &SourceBucket) -> SourceSection {
    let roles: Vec<ColumnRole> = bucket.columns.iter().map(|c| classify(c)).collect();

    let rows = bucket
        .rows
        .iter()
        .map(|row| {
            bucket
                .columns
                .iter()
                .zip(&roles)
                .map(|(column, role)| format_cell(row.cell(column), *role))
                .collect()
        })
        .collect();

    SourceSection {
        label: bucket.label.clone(),
        columns: bucket.columns.clone(),
        rows,
        totals: totals_row(bucket, &roles),
    }
}

/// Per-type, per-role value formatting. Coercion failures degrade to the
/// raw text; they never raise.
fn format_cell(cell: Option<&Cell>, role: ColumnRole) -> ReportCell {
    let Some(cell) = cell else {
        return ReportCell::Empty;
    };
    match cell {
        Cell::Empty => ReportCell::Empty,
        Cell::Date(d) => ReportCell::Text(format_date(*d)),
        Cell::Number(n) => match role {
            // Identity values stay text even when numeric: leading zeros
            // matter and a document number is not an amount.
            ColumnRole::Identity | ColumnRole::Document => ReportCell::Text(n.to_string()),
            ColumnRole::Monetary | ColumnRole::Other => ReportCell::Money(*n),
            ColumnRole::Date | ColumnRole::Excluded => ReportCell::Text(n.to_string()),
        },
        Cell::Text(t) => match role {
            ColumnRole::Identity | ColumnRole::Document | ColumnRole::Excluded => {
                ReportCell::Text(t.clone())
            }
            ColumnRole::Date => match coerce_date(t) {
                Some(d) => ReportCell::Text(format_date(d)),
                None => ReportCell::Text(t.clone()),
            },
            ColumnRole::Monetary | ColumnRole::Other => match parse_amount(t) {
                Some(v) => ReportCell::Money(v),
                None => ReportCell::Text(t.clone()),
            },
        },
    }
}

fn totals_row(bucket: &SourceBucket, roles: &[ColumnRole]) -> Vec<ReportCell> {
    let mut totals = vec![ReportCell::Empty; bucket.columns.len()];
    let mut first_sum: Option<usize> = None;

    for (i, (column, role)) in bucket.columns.iter().zip(roles).enumerate() {
        if *role != ColumnRole::Monetary {
            continue;
        }
        let sum = bucket
            .rows
            .iter()
            .filter_map(|row| row.cell(column))
            .filter_map(Cell::as_number)
            .fold(Decimal::ZERO, |acc, v| acc + v);
        totals[i] = ReportCell::Money(sum);
        if first_sum.is_none() {
            first_sum = Some(i);
        }
    }

    // No placeholder exists when the first monetary column is column 0.
    if let Some(i) = first_sum {
        if i > 0 {
            totals[i - 1] = ReportCell::Text(TOTAL_LABEL.to_string());
        }
    }
    totals
}
