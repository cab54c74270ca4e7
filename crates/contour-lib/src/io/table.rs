use crate::signal::{Interval, Point};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Read an interval table with headers `group_id,interval_index,label,start_time,end_time`.
pub fn read_intervals(path: &Path) -> Result<Vec<Interval>> {
    let file = File::open(path).with_context(|| format!("opening intervals {}", path.display()))?;
    read_intervals_from_reader(file).with_context(|| format!("reading {}", path.display()))
}

pub fn read_intervals_from_reader<R: Read>(reader: R) -> Result<Vec<Interval>> {
    read_rows(reader, "interval")
}

/// Read a point table with headers `group_id,timestamp,value`.
pub fn read_points(path: &Path) -> Result<Vec<Point>> {
    let file = File::open(path).with_context(|| format!("opening points {}", path.display()))?;
    read_points_from_reader(file).with_context(|| format!("reading {}", path.display()))
}

pub fn read_points_from_reader<R: Read>(reader: R) -> Result<Vec<Point>> {
    read_rows(reader, "point")
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R, kind: &str) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (idx, row) in reader.deserialize::<T>().enumerate() {
        let row = row.with_context(|| format!("parsing {} row {}", kind, idx + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write records as CSV, one header row taken from the record's field names.
pub fn write_records_to<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_records_to(file, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::ResampledPoint;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn sample_path(relative: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .and_then(|p| p.parent())
            .expect("workspace root")
            .join(relative)
    }

    #[test]
    fn reads_interval_fixture() {
        let intervals = read_intervals(&sample_path("test_data/intervals.csv")).expect("read intervals");
        assert_eq!(intervals.len(), 5);
        assert_eq!(intervals[0], Interval::new("f01", 1, "a", 0.0, 1.0));
        assert_eq!(intervals[4].group_id, "f02");
    }

    #[test]
    fn reads_point_fixture() {
        let points = read_points(&sample_path("test_data/points.csv")).expect("read points");
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], Point::new("f01", 0.0, 90.0));
    }

    #[test]
    fn trims_fields_and_reports_bad_rows() {
        let text = "group_id, timestamp, value\n rec , 0.5 , 100\nrec,abc,1\n";
        let err = read_points_from_reader(text.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("point row 2"));
        let ok = read_points_from_reader("group_id,timestamp,value\n rec , 0.5 , 100\n".as_bytes())
            .unwrap();
        assert_eq!(ok[0], Point::new("rec", 0.5, 100.0));
    }

    #[test]
    fn writes_and_reads_resampled_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pulses.csv");
        let rows = vec![ResampledPoint {
            group_id: "rec".into(),
            interval_index: 1,
            label: "a".into(),
            position: 0.5,
            timestamp: 0.5,
            value: 100.0,
        }];
        write_records(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("group_id,interval_index,label,position,timestamp,value"));
        let back: Vec<ResampledPoint> = read_rows(File::open(&path).unwrap(), "pulse").unwrap();
        assert_eq!(back, rows);
    }
}
