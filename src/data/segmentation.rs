use std::fmt;
use std::path::Path;

use serde::Deserialize;

use super::error::{DatasetError, Result};

/// Heart-cycle state labels used in `.tsv` segmentation files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartState {
    Unannotated,
    S1,
    Systole,
    S2,
    Diastole,
}

impl HeartState {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(HeartState::Unannotated),
            1 => Some(HeartState::S1),
            2 => Some(HeartState::Systole),
            3 => Some(HeartState::S2),
            4 => Some(HeartState::Diastole),
            _ => None,
        }
    }
}

impl fmt::Display for HeartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HeartState::Unannotated => "unannotated",
            HeartState::S1 => "S1",
            HeartState::Systole => "systole",
            HeartState::S2 => "S2",
            HeartState::Diastole => "diastole",
        };
        f.write_str(label)
    }
}

/// One labelled interval, in seconds from the start of the recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub state: HeartState,
}

#[derive(Deserialize)]
struct Row(f64, f64, u8);

/// Read a headerless `start<TAB>end<TAB>state` file.
pub fn read_segmentation(path: &Path) -> Result<Vec<Segment>> {
    let seg_err = |reason: String| DatasetError::Segmentation {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| seg_err(e.to_string()))?;

    let mut segments = Vec::new();
    for (line, result) in reader.deserialize::<Row>().enumerate() {
        let Row(start, end, code) =
            result.map_err(|e| seg_err(format!("line {}: {e}", line + 1)))?;
        let state = HeartState::from_code(code)
            .ok_or_else(|| seg_err(format!("line {}: unknown state {code}", line + 1)))?;
        if end < start {
            return Err(seg_err(format!(
                "line {}: segment ends ({end}) before it starts ({start})",
                line + 1
            )));
        }
        segments.push(Segment { start, end, state });
    }
    Ok(segments)
}
