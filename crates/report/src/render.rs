use thiserror::Error;

use crate::compose::{ReportModel, SourceSection};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Report output was not valid UTF-8")]
    Utf8,
}

/// Render the report model as one CSV sheet: per store a header line, then
/// per source its label, column header, data rows and totals. Store
/// sections are separated by a blank line.
pub fn render_csv(model: &ReportModel) -> Result<String, RenderError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for store in &model.stores {
        writer.write_record([store.store.as_str()])?;
        for source in &store.sources {
            write_source(&mut writer, source)?;
        }
        writer.write_record([""])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RenderError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;
    String::from_utf8(bytes).map_err(|_| RenderError::Utf8)
}

fn write_source(
    writer: &mut csv::Writer<Vec<u8>>,
    source: &SourceSection,
) -> Result<(), RenderError> {
    writer.write_record([source.label.as_str()])?;
    writer.write_record(&source.columns)?;
    for row in &source.rows {
        writer.write_record(row.iter().map(|cell| cell.display()))?;
    }
    writer.write_record(source.totals.iter().map(|cell| cell.display()))?;
    Ok(())
}
