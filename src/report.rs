//! Timestamped CSV/XLSX report files.
//!
//! Every command that mutates or audits remote state leaves a report
//! behind; filenames start with a `YYYY-MM-DD-HHMM` stamp so repeated runs
//! never clobber each other.

use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Local-time stamp used in report filenames, e.g. `2025-08-28-1412`.
pub fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d-%H%M").to_string()
}

/// Seconds-resolution stamp for commands that may run twice a minute.
pub fn now_stamp_precise() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Ensure the reports directory exists and return it.
pub fn reports_dir(dir: &str) -> Result<PathBuf> {
    let path = PathBuf::from(dir);
    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create reports directory: {:?}", path))?;
    Ok(path)
}

/// `<reports_dir>/<stamp>_<name>.csv`
pub fn csv_path(dir: &Path, stamp: &str, name: &str) -> PathBuf {
    dir.join(format!("{}_{}.csv", stamp, name))
}

/// Write one CSV report. Returns the path for console feedback.
pub fn write_csv<P, R, F>(path: P, headers: &[&str], rows: R) -> Result<PathBuf>
where
    P: AsRef<Path>,
    R: IntoIterator<Item = F>,
    F: IntoIterator<Item = String>,
{
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create report: {:?}", path))?;

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!("Wrote report {:?}", path);
    Ok(path.to_path_buf())
}

/// Write a single-sheet XLSX report.
pub fn write_xlsx<P>(path: P, headers: &[&str], rows: &[Vec<String>]) -> Result<PathBuf>
where
    P: AsRef<Path>,
{
    use rust_xlsxwriter::{Format, Workbook};

    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col as u16, cell.as_str())?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook: {:?}", path))?;
    info!("Wrote workbook {:?}", path);
    Ok(path.to_path_buf())
}

/// Append-style CSV error log shared by worker pools. Created with a
/// header up front; rows are whole lines so concurrent workers can send
/// them through a channel without interleaving.
pub struct ErrorLog {
    writer: csv::Writer<fs::File>,
    pub path: PathBuf,
    pub count: usize,
}

impl ErrorLog {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create error log: {:?}", path))?;
        writer.write_record(["timestamp", "entry_id", "stage", "error"])?;
        writer.flush()?;
        Ok(Self {
            writer,
            path,
            count: 0,
        })
    }

    pub fn append(&mut self, entry_id: &str, stage: &str, error: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.writer
            .write_record([timestamp.as_str(), entry_id, stage, error])?;
        self.writer.flush()?;
        self.count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_back_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = csv_path(dir.path(), "2025-01-01-0000", "deleted_entries_PREVIEW");

        write_csv(
            &path,
            &["entry_id", "status"],
            vec![
                vec!["0_a".to_string(), "FOUND".to_string()],
                vec!["0_b".to_string(), "NOT FOUND".to_string()],
            ],
        )
        .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][1], "NOT FOUND");
        assert!(path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("2025-01-01-0000_"));
    }

    #[test]
    fn test_error_log_counts() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ErrorLog::create(dir.path().join("errors.csv")).unwrap();
        log.append("0_a", "media.get", "timeout").unwrap();
        log.append("0_b", "flavorAsset.list", "dns").unwrap();
        assert_eq!(log.count, 2);

        let mut reader = csv::Reader::from_path(&log.path).unwrap();
        assert_eq!(reader.records().count(), 2);
    }
}
