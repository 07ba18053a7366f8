use std::collections::HashMap;

use crate::cell::Cell;
use crate::registry::Template;

/// Canonical store identity attached to a row by alias resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRef {
    pub name: String,
    pub code: i64,
}

/// One input row: named cells plus the resolved store, if any.
///
/// Cell iteration order is not meaningful here; the owning file's `columns`
/// vector is the order contract.
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: HashMap<String, Cell>,
    pub store: Option<StoreRef>,
}

impl Row {
    pub fn new(cells: HashMap<String, Cell>) -> Self {
        Row { cells, store: None }
    }

    pub fn cell(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }
}

/// One ingested export, exactly as the decoder boundary delivered it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// The pure output of the per-file pipeline. The input `UploadedFile` is
/// never touched, so a batch can be abandoned mid-way without corrupting
/// anything already produced.
#[derive(Debug, Clone)]
pub struct NormalizedFile {
    pub file_name: String,
    pub template: Option<Template>,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl NormalizedFile {
    pub fn template_id(&self) -> Option<&str> {
        self.template.as_ref().map(|t| t.id.as_str())
    }
}
