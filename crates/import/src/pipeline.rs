use cuadre_core::{NormalizedFile, Registry, UploadedFile};

use crate::alias::resolve_aliases;
use crate::csv::decode_csv;
use crate::project::project;
use crate::template::match_template;
use crate::validate::{validate, ValidationResult};

/// Raw bytes of one uploaded export, before decoding.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One fully normalized file plus its advisory diagnostics.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub normalized: NormalizedFile,
    pub validation: ValidationResult,
}

/// A file the decoder could not read. Other files are unaffected.
#[derive(Debug, Clone)]
pub struct FailedFile {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BatchResult {
    pub files: Vec<ProcessedFile>,
    pub failures: Vec<FailedFile>,
}

/// Run the per-file pipeline: template match, alias resolution, projection,
/// validation. Pure with respect to the input file; the stages themselves
/// never fail, they only degrade (unrecognized template, unmapped rows).
pub fn normalize_file(file: &UploadedFile, registry: &Registry) -> ProcessedFile {
    let template = match_template(&file.file_name, registry).map(|m| m.template);
    let aliases = template
        .as_ref()
        .map(|t| registry.aliases_for(&t.id))
        .unwrap_or_default();

    let rows = resolve_aliases(&file.columns, &file.rows, &aliases);
    let (columns, rows) = project(&file.columns, &rows, template.as_ref());
    let validation = validate(&file.file_name, &rows);

    ProcessedFile {
        normalized: NormalizedFile {
            file_name: file.file_name.clone(),
            template,
            columns,
            rows,
        },
        validation,
    }
}

/// Decode and normalize a batch of exports. One file's decode failure never
/// aborts the rest: callers get every processed file plus the failures.
pub fn run_batch(sources: &[FileSource], registry: &Registry) -> BatchResult {
    let mut result = BatchResult::default();
    for source in sources {
        match decode_csv(&source.name, source.bytes.as_slice()) {
            Ok(uploaded) => result.files.push(normalize_file(&uploaded, registry)),
            Err(err) => result.failures.push(FailedFile {
                name: source.name.clone(),
                reason: err.to_string(),
            }),
        }
    }
    result
}
