use std::fs::OpenOptions;
use std::path::Path;

use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use tracing as trc;

/// One recorded measurement sample from a capture
///
/// Snapshots coming out of the in-game profiler are not guaranteed to carry
/// every field, so everything here is optional and extraction decides what
/// to keep.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Snapshot {
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub entries: Vec<MetricEntry>,
}

/// A labeled metric entry inside a snapshot, e.g. `Frame time` / `"18.60 ms"`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MetricEntry {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// The two parallel series extracted from one capture
///
/// Each accepted snapshot contributes exactly one value to each series, so
/// the two vectors are always the same length.
#[derive(Clone, Debug, Default)]
pub struct RunSeries {
    pub fps: Vec<f64>,
    pub frame_time_ms: Vec<f64>,
}

/// Load a capture file and parse it as a JSON array of snapshots
pub fn load_snapshots(path: &Path) -> eyre::Result<Vec<Snapshot>> {
    if !path.exists() {
        return Err(eyre::format_err!("Log file not found: {}", path.display()));
    }

    let file = OpenOptions::new().read(true).open(path)?;
    let snapshots = serde_json::from_reader(file)
        .wrap_err_with(|| format!("Could not parse metrics in {}", path.display()))?;

    Ok(snapshots)
}

/// Pull the FPS and frame-time series out of a capture
///
/// A snapshot is only accepted if it has an `fps` value and an entry labeled
/// `Frame time` whose value parses as milliseconds; anything else is skipped.
pub fn extract_metrics(snapshots: &[Snapshot]) -> RunSeries {
    let mut series = RunSeries::default();

    for snap in snapshots {
        let frame_entry = snap
            .entries
            .iter()
            .find(|e| e.label.as_deref() == Some("Frame time"));

        let (fps, frame_entry) = match (snap.fps, frame_entry) {
            (Some(fps), Some(entry)) => (fps, entry),
            _ => {
                trc::debug!("Skipping snapshot without fps or frame time entry");
                continue;
            }
        };

        let frame_ms = match frame_entry.value.as_deref().and_then(parse_frame_time) {
            Some(ms) => ms,
            None => {
                trc::debug!("Skipping snapshot with unparsable frame time");
                continue;
            }
        };

        series.fps.push(fps);
        series.frame_time_ms.push(frame_ms);
    }

    series
}

/// Parse a frame time value like `"18.60 ms"` into milliseconds
fn parse_frame_time(value: &str) -> Option<f64> {
    value.replace(" ms", "").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(fps: Option<f64>, entries: &[(&str, &str)]) -> Snapshot {
        Snapshot {
            fps,
            entries: entries
                .iter()
                .map(|(label, value)| MetricEntry {
                    label: Some(label.to_string()),
                    value: Some(value.to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn parses_frame_time_values() {
        assert_eq!(parse_frame_time("18.60 ms"), Some(18.6));
        assert_eq!(parse_frame_time("  7.25 ms "), Some(7.25));
        assert_eq!(parse_frame_time("33"), Some(33.0));
        assert_eq!(parse_frame_time("fast"), None);
        assert_eq!(parse_frame_time(""), None);
    }

    #[test]
    fn series_are_parallel() {
        let snapshots = vec![
            snapshot(Some(60.0), &[("Frame time", "16.67 ms")]),
            snapshot(None, &[("Frame time", "20.00 ms")]),
            snapshot(Some(55.0), &[("Draw calls", "120")]),
            snapshot(Some(58.0), &[("Frame time", "17.24 ms")]),
        ];

        let series = extract_metrics(&snapshots);

        assert_eq!(series.fps.len(), series.frame_time_ms.len());
        assert_eq!(series.fps, vec![60.0, 58.0]);
        assert_eq!(series.frame_time_ms, vec![16.67, 17.24]);
    }

    #[test]
    fn skips_unparsable_frame_time() {
        let snapshots = vec![
            snapshot(Some(60.0), &[("Frame time", "not a number")]),
            snapshot(Some(30.0), &[("Frame time", "33.33 ms")]),
        ];

        let series = extract_metrics(&snapshots);

        assert_eq!(series.fps, vec![30.0]);
        assert_eq!(series.frame_time_ms, vec![33.33]);
    }

    #[test]
    fn uses_first_matching_entry() {
        let snapshots = vec![snapshot(
            Some(60.0),
            &[("Frame time", "16.00 ms"), ("Frame time", "99.00 ms")],
        )];

        let series = extract_metrics(&snapshots);

        assert_eq!(series.frame_time_ms, vec![16.0]);
    }

    #[test]
    fn snapshot_without_entries_deserializes_and_is_skipped() {
        let snapshots: Vec<Snapshot> =
            serde_json::from_str(r#"[{"fps": 42.0}, {"entries": []}]"#).unwrap();

        let series = extract_metrics(&snapshots);

        assert!(series.fps.is_empty());
        assert!(series.frame_time_ms.is_empty());
    }

    #[test]
    fn entry_without_value_is_skipped() {
        let snapshots: Vec<Snapshot> =
            serde_json::from_str(r#"[{"fps": 42.0, "entries": [{"label": "Frame time"}]}]"#)
                .unwrap();

        let series = extract_metrics(&snapshots);

        assert!(series.fps.is_empty());
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let err = load_snapshots(Path::new("/no/such/capture.json")).unwrap_err();

        assert!(err.to_string().contains("/no/such/capture.json"));
        assert!(err.to_string().contains("not found"));
    }
}
