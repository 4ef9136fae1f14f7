//! CSV rendering of the assembled transaction rows.

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::consts::REPORT_STAMP_FORMAT;
use crate::types::{HEADERS, Row};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `rows` to `path` with the report header line. Each record is
/// prefixed with its positional index.
pub fn write_report(path: &Path, rows: &[Row]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![""];
    header.extend(HEADERS);
    writer.write_record(&header)?;

    for (index, row) in rows.iter().enumerate() {
        writer.write_record(row.record(index))?;
    }

    writer.flush()?;
    Ok(())
}

/// Report file path: `<NET> <HH:MM dd.mm.yy> <head>...<tail> (<from>:<to>].csv`
/// where `to` is the height of the newest row.
pub fn report_path(
    output_dir: &Path,
    network_tag: &str,
    address: &str,
    from_height: u64,
    rows: &[Row],
) -> PathBuf {
    let to_height = rows.first().map(|row| row.height.as_str()).unwrap_or("0");
    let stamp = Local::now().format(REPORT_STAMP_FORMAT);
    let name = format!(
        "{} {} {}...{} ({}:{}].csv",
        network_tag,
        stamp,
        head(address),
        tail(address),
        from_height,
        to_height
    );
    output_dir.join(name)
}

/// Merge per-chain row sets into one report ordered by timestamp,
/// newest first. The sort is stable, so rows of one event keep their
/// leg order.
pub fn merge(mut rows: Vec<Row>, mut other: Vec<Row>) -> Vec<Row> {
    rows.append(&mut other);
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    rows
}

fn head(address: &str) -> &str {
    address.get(..4).unwrap_or(address)
}

fn tail(address: &str) -> &str {
    address
        .len()
        .checked_sub(4)
        .and_then(|start| address.get(start..))
        .unwrap_or(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(timestamp: u64, tx_hash: &str, line: u32) -> Row {
        Row {
            timestamp,
            tx_hash: tx_hash.to_string(),
            height: timestamp.to_string(),
            line,
            ..Row::default()
        }
    }

    #[test]
    fn test_written_report_has_header_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_report(&path, &[row(10, "0xa", 1), row(9, "0xb", 1)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(",Scan Tool,Data Source,"));
        assert!(lines[1].starts_with("0,"));
        assert!(lines[2].starts_with("1,"));
        assert_eq!(lines[0].split(',').count(), HEADERS.len() + 1);
    }

    #[test]
    fn test_empty_report_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_report(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_merge_orders_newest_first() {
        let merged = merge(
            vec![row(10, "0xa", 1), row(5, "0xb", 1)],
            vec![row(7, "0xc", 1), row(12, "0xd", 1)],
        );
        let stamps: Vec<u64> = merged.iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![12, 10, 7, 5]);
    }

    #[test]
    fn test_merge_is_stable_within_an_event() {
        let merged = merge(
            vec![row(10, "0xa", 1), row(10, "0xa", 2)],
            vec![],
        );
        assert_eq!(merged[0].line, 1);
        assert_eq!(merged[1].line, 2);
    }

    #[test]
    fn test_report_path_shape() {
        let rows = vec![row(99, "0xa", 1)];
        let path = report_path(
            Path::new("/tmp/out"),
            "SORA",
            "cnVkoGs3rEMqLqY27c2nfVXJRGdzNJk2ns78DcqtppaSRe8qm",
            0,
            &rows,
        );
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("SORA "));
        assert!(name.contains("cnVk...e8qm"));
        assert!(name.ends_with("(0:99].csv"));
    }

    #[test]
    fn test_report_path_short_address() {
        let path = report_path(Path::new("."), "ETH", "abc", 0, &[]);
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.contains("abc...abc"));
        assert!(name.ends_with("(0:0].csv"));
    }
}
