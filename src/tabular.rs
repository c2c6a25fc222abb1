//! Header-keyed table input, CSV or XLSX.
//!
//! Operators hand these tools whatever their spreadsheet program saved;
//! both formats normalize to a header row plus string cells.

use anyhow::{Context, Result};
use std::path::Path;

use crate::select::normalize_header;

/// Read the first sheet (or the whole CSV) as headers + string rows.
pub fn read_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);

    if is_xlsx {
        read_xlsx(path)
    } else {
        read_csv(path)
    }
}

fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to open {:?}", path))?;
    let headers = reader
        .headers()
        .context("Input file has no header row")?
        .iter()
        .map(normalize_header)
        .collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(|cell| cell.trim().to_string()).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;
    Ok((headers, rows))
}

fn read_xlsx(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    use calamine::{open_workbook, Data, Reader, Xlsx};

    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Failed to open {:?}", path))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("Workbook has no sheets")??;

    let mut rows = range.rows().map(|row| {
        row.iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                Data::String(s) => s.trim().to_string(),
                // Integer-valued floats are IDs or counts, not decimals
                Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
                other => other.to_string().trim().to_string(),
            })
            .collect::<Vec<String>>()
    });

    let headers = rows
        .next()
        .context("Input sheet is empty")?
        .iter()
        .map(|h| normalize_header(h))
        .collect();
    Ok((headers, rows.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_csv_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "\u{feff}channelName, owner ,privacy").unwrap();
        writeln!(file, "Physics, prof ,3").unwrap();
        drop(file);

        let (headers, rows) = read_table(&path).unwrap();
        assert_eq!(headers, vec!["channelName", "owner", "privacy"]);
        assert_eq!(rows, vec![vec!["Physics", "prof", "3"]]);
    }
}
