//! Cross-file aggregation and report composition: source labeling,
//! (store, source) bucketing with deterministic ordering, and layout of
//! the consolidated report model. Pure data in, pure data out; writing a
//! workbook is the embedding application's job.

pub mod compose;
pub mod group;
pub mod render;
pub mod source;

pub use compose::{compose, ReportCell, ReportModel, SourceSection, StoreSection};
pub use group::{group, GroupedDataset, SourceBucket, StoreGroup, UNASSIGNED};
pub use render::{render_csv, RenderError};
pub use source::source_label;
