use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`DatasetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dataset (or a patient record) could not be built from disk.
    Construction,
    /// A requested patient, metadata row or recording does not exist.
    Lookup,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected file type: {name}")]
    UnexpectedFile { name: String },

    #[error("malformed recording file name: {name} (expected <patient>_<valve>[_<id>])")]
    MalformedName { name: String },

    #[error("duplicate file for patient {patient}: {name}")]
    DuplicateFile { patient: String, name: String },

    #[error("metadata table {}: {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("metadata table is missing column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("metadata table has unexpected column '{column}'")]
    UnexpectedColumn { column: String },

    #[error("metadata table has more than one row for patient {id}")]
    DuplicateRow { id: u32 },

    #[error("unknown patient: {id}")]
    UnknownPatient { id: String },

    #[error("patient ID '{id}' is not an integer")]
    InvalidPatientId { id: String },

    #[error("no metadata row for patient {id}")]
    MissingMetadata { id: String },

    #[error("patient {patient} has no annotation file")]
    MissingAnnotation { patient: String },

    #[error("patient {patient}: recording {valve}/{index} has no waveform file")]
    MissingWaveform {
        patient: String,
        valve: String,
        index: String,
    },

    #[error("decoding waveform {}: {source}", .path.display())]
    Waveform {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("waveform {} has a sample rate of zero", .path.display())]
    InvalidSampleRate { path: PathBuf },

    #[error("header {}: {reason}", .path.display())]
    Header { path: PathBuf, reason: String },

    #[error("segmentation {}: {reason}", .path.display())]
    Segmentation { path: PathBuf, reason: String },

    #[error("patient {patient} has no recording {valve}/{index}")]
    UnknownRecording {
        patient: String,
        valve: String,
        index: String,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from building data or from asking for data
    /// that is not there.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DatasetError::UnknownPatient { .. }
            | DatasetError::InvalidPatientId { .. }
            | DatasetError::MissingMetadata { .. }
            | DatasetError::UnknownRecording { .. } => ErrorKind::Lookup,
            _ => ErrorKind::Construction,
        }
    }
}

pub type Result<T, E = DatasetError> = std::result::Result<T, E>;
