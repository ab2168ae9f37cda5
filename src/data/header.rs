use std::path::Path;

use super::error::{DatasetError, Result};

/// The parts of a WFDB `.hea` file this crate uses.
///
/// ```text
/// 13918_AV 1 4000 57036
/// 13918_AV.wav 16+44 1 16 0 0 0 0 AV
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecordHeader {
    pub record_name: String,
    pub num_signals: usize,
    /// Samples per second per signal.
    pub sample_rate: f64,
    pub num_samples: Option<u64>,
    /// File name of each signal line, in order.
    pub signal_files: Vec<String>,
}

pub fn read_header(path: &Path) -> Result<RecordHeader> {
    let text = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    parse_header(&text).map_err(|reason| DatasetError::Header {
        path: path.to_path_buf(),
        reason,
    })
}

fn parse_header(text: &str) -> std::result::Result<RecordHeader, String> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'));

    let record_line = lines.next().ok_or("empty header")?;
    let mut fields = record_line.split_whitespace();

    // Multi-segment records carry a "/<segments>" suffix on the name.
    let record_name = fields
        .next()
        .ok_or("missing record name")?
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string();

    let num_signals = fields
        .next()
        .ok_or("missing signal count")?
        .parse::<usize>()
        .map_err(|e| format!("bad signal count: {e}"))?;

    // "<freq>[/<counter freq>[(<base>)]]"; only the leading frequency matters.
    let sample_rate = match fields.next() {
        Some(raw) => {
            let freq = raw.split(['/', '(']).next().unwrap_or_default();
            freq.parse::<f64>()
                .map_err(|e| format!("bad sampling frequency '{raw}': {e}"))?
        }
        None => return Err("missing sampling frequency".into()),
    };
    if sample_rate <= 0.0 {
        return Err(format!("sampling frequency must be positive, got {sample_rate}"));
    }

    let num_samples = fields
        .next()
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| format!("bad sample count '{raw}': {e}"))
        })
        .transpose()?;

    let signal_files: Vec<String> = lines
        .take(num_signals)
        .filter_map(|l| l.split_whitespace().next())
        .map(str::to_string)
        .collect();
    if signal_files.len() != num_signals {
        return Err(format!(
            "expected {num_signals} signal lines, found {}",
            signal_files.len()
        ));
    }

    Ok(RecordHeader {
        record_name,
        num_signals,
        sample_rate,
        num_samples,
        signal_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_circor_header() {
        let text = "13918_AV 1 4000 57036\n13918_AV.wav 16+44 1 16 0 0 0 0 AV\n";
        let header = parse_header(text).unwrap();
        assert_eq!(
            header,
            RecordHeader {
                record_name: "13918_AV".into(),
                num_signals: 1,
                sample_rate: 4000.0,
                num_samples: Some(57036),
                signal_files: vec!["13918_AV.wav".into()],
            }
        );
    }

    #[test]
    fn skips_comments_and_optional_fields() {
        let text = "# comment\nrec/2 2 360/1(0)\n\na.dat 212\nb.dat 212\n#Age: 40\n";
        let header = parse_header(text).unwrap();
        assert_eq!(header.record_name, "rec");
        assert_eq!(header.sample_rate, 360.0);
        assert_eq!(header.num_samples, None);
        assert_eq!(header.signal_files, vec!["a.dat", "b.dat"]);
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(parse_header("").is_err());
        assert!(parse_header("rec x 4000").is_err());
        assert!(parse_header("rec 1 fast").is_err());
        assert!(parse_header("rec 1 0").is_err());
        assert!(parse_header("rec 2 4000 10\nonly_one.wav").is_err());
    }

    #[test]
    fn read_header_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1_AV.hea");
        std::fs::write(&path, "1_AV 1 zero\n").unwrap();

        let err = read_header(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Header { .. }));
        assert!(err.to_string().contains("1_AV.hea"));
    }
}
