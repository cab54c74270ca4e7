use assert_cmd::cargo::cargo_bin_cmd;
use contour_lib::{resample::PartitionSummary, signal::ResampledPoint};
use std::{collections::HashSet, error::Error, fs, path::PathBuf};
use tempfile::tempdir;

#[test]
fn pipeline_config_resolves_boundaries() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("contour");
    cmd.args([
        "pipeline",
        "--points",
        &sample_path("test_data/points.csv"),
        "--intervals",
        &sample_path("test_data/intervals.csv"),
        "--config",
        &sample_path("test_data/pipeline.toml"),
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let mut pulses = Vec::new();
    for line in output.split(|b| *b == b'\n').filter(|line| !line.is_empty()) {
        let pulse: ResampledPoint = serde_json::from_slice(line)?;
        pulses.push(pulse);
    }
    assert_eq!(pulses.len(), 15 + 14 + 14 + 15 + 14);

    let mut seen = HashSet::new();
    for pulse in &pulses {
        assert!(seen.insert((pulse.group_id.clone(), pulse.timestamp.to_bits())));
    }
    let groups: Vec<&str> = pulses.iter().map(|p| p.group_id.as_str()).collect();
    assert!(groups.windows(2).all(|w| w[0] <= w[1]), "grouped output");
    assert_close(pulses[0].value, 90.0, 1e-12);
    Ok(())
}

#[test]
fn summarize_reports_per_interval_counts() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("contour");
    cmd.args([
        "summarize",
        "--points",
        &sample_path("test_data/points.csv"),
        "--intervals",
        &sample_path("test_data/intervals.csv"),
        "--boundary-policy",
        "closed",
        "--pulses",
        "15",
        "--keep",
        "left",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let mut counts = Vec::new();
    for line in output.split(|b| *b == b'\n').filter(|line| !line.is_empty()) {
        let summary: PartitionSummary = serde_json::from_slice(line)?;
        counts.push((summary.group_id, summary.label, summary.count));
    }
    let expected = [
        ("f01", "a", 15),
        ("f01", "b", 14),
        ("f01", "c", 14),
        ("f02", "x", 15),
        ("f02", "y", 14),
    ];
    assert_eq!(counts.len(), expected.len());
    for ((group, label, count), (eg, el, ec)) in counts.iter().zip(expected) {
        assert_eq!((group.as_str(), label.as_str(), *count), (eg, el, ec));
    }
    Ok(())
}

#[test]
fn resample_writes_csv_with_adjusted_counts() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let out = temp.path().join("pulses.csv");
    let mut cmd = cargo_bin_cmd!("contour");
    cmd.args([
        "resample",
        "--points",
        &sample_path("test_data/points.csv"),
        "--intervals",
        &sample_path("test_data/intervals.csv"),
        "--boundary-policy",
        "closed",
        "--pulses-per-interval",
        "1=15,2=16,3=16",
        "--keep",
        "left",
        "--out",
        out.to_str().expect("utf8 path"),
    ]);
    cmd.assert().success();
    let contents = fs::read_to_string(&out)?;
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("group_id,interval_index,label,position,timestamp,value")
    );
    // f01: 15 + 15 + 15, f02: 15 + 15
    assert_eq!(lines.count(), 75);
    Ok(())
}

#[test]
fn resample_fails_on_single_point_intervals() {
    let mut cmd = cargo_bin_cmd!("contour");
    cmd.args([
        "resample",
        "--points",
        &sample_path("test_data/points.csv"),
        "--intervals",
        &sample_path("test_data/intervals.csv"),
        "--pulses",
        "3",
    ]);
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("at least 2"), "unexpected stderr: {stderr}");
}

fn assert_close(a: f64, b: f64, tol: f64) {
    let diff = (a - b).abs();
    assert!(
        diff <= tol,
        "diff {} exceeded tol {} ({} vs {})",
        diff,
        tol,
        a,
        b
    );
}

fn sample_path(relative: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join(relative);
    root.to_string_lossy().to_string()
}
