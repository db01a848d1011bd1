//! Append formatted rows to a local TSV sheet, for the batch CLI workflow.
//! The writer uses a tab delimiter with quoting disabled so the bytes on
//! disk are exactly the clipboard rows, one per line.

use std::fs::OpenOptions;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::review::domain::KycRecord;
use crate::review::rows;

/// Which of the three sheets a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SheetKind {
    FailedKyc,
    AccountStatus,
    ManualFreeze,
}

impl SheetKind {
    fn columns(self, record: &KycRecord) -> Vec<String> {
        match self {
            SheetKind::FailedKyc => rows::failed_kyc_columns(record),
            SheetKind::AccountStatus => rows::account_status_columns(record),
            SheetKind::ManualFreeze => rows::manual_freeze_columns(record),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("failed to open sheet file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write sheet row: {0}")]
    Csv(#[from] csv::Error),
}

/// Append one row per record to the sheet at `path`, creating it if needed.
pub fn append_records<P: AsRef<Path>>(
    path: P,
    kind: SheetKind,
    records: &[KycRecord],
) -> Result<(), SheetError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_writer(file);

    for record in records {
        writer.write_record(kind.columns(record))?;
    }
    writer.flush()?;
    Ok(())
}
