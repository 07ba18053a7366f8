pub mod alias;
pub mod csv;
pub mod pipeline;
pub mod project;
pub mod template;
pub mod validate;

pub use csv::{decode_csv, DecodeError};
pub use pipeline::{normalize_file, run_batch, BatchResult, FailedFile, FileSource, ProcessedFile};
pub use template::{match_template, TemplateMatch, MATCH_THRESHOLD};
pub use validate::{validate, MappingStats, ValidationResult};
