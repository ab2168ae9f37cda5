use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;

use super::error::{DatasetError, Result};
use super::header::{read_header, RecordHeader};
use super::index::{PatientFiles, RecordingFiles, RecordingTree};
use super::segmentation::{read_segmentation, Segment};
use super::table::PatientMetadata;
use super::trace::Trace;
use super::waveform::read_wav;

// ---------------------------------------------------------------------------
// MetadataValue – a single metadata cell, for display
// ---------------------------------------------------------------------------

/// A dynamically-typed view of one metadata field.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Recording – one decoded heart-sound file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples at their stored amplitude.
    pub samples: Vec<f64>,
    pub header: Option<RecordHeader>,
    pub segments: Vec<Segment>,
}

impl Recording {
    /// Decode the waveform and read the optional header and segmentation.
    pub fn load(files: &RecordingFiles, patient: &str, valve: &str, index: &str) -> Result<Self> {
        let Some(wav) = &files.waveform else {
            return Err(DatasetError::MissingWaveform {
                patient: patient.to_string(),
                valve: valve.to_string(),
                index: index.to_string(),
            });
        };
        let wave = read_wav(wav)?;

        let header = files.header.as_deref().map(read_header).transpose()?;
        if let Some(h) = &header {
            if (h.sample_rate - f64::from(wave.sample_rate)).abs() > f64::EPSILON {
                log::warn!(
                    "{}: header says {} Hz, waveform is {} Hz",
                    wav.display(),
                    h.sample_rate,
                    wave.sample_rate
                );
            }
        }

        let segments = match files.segmentation.as_deref() {
            Some(path) => read_segmentation(path)?,
            None => Vec::new(),
        };

        Ok(Recording {
            sample_rate: wave.sample_rate,
            channels: wave.channels,
            samples: wave.samples,
            header,
            segments,
        })
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// The samples of one channel, de-interleaved.
    pub fn channel(&self, channel: u16) -> impl Iterator<Item = f64> + '_ {
        let stride = usize::from(self.channels.max(1));
        self.samples
            .iter()
            .skip(usize::from(channel))
            .step_by(stride)
            .copied()
    }
}

// ---------------------------------------------------------------------------
// Patient – one fully loaded record
// ---------------------------------------------------------------------------

/// Everything known about one patient, loaded eagerly.
#[derive(Debug, Clone)]
pub struct Patient {
    pub id: String,
    pub metadata: PatientMetadata,
    /// Lines of the `.txt` annotation, without line terminators.
    pub annotation: Vec<String>,
    pub recordings: RecordingTree<Recording>,
}

impl Patient {
    /// Build a record from the indexed files and the patient's table row.
    ///
    /// Fails on the first missing or unreadable file; no partial record is
    /// returned.
    pub fn load(id: &str, files: &PatientFiles, metadata: &PatientMetadata) -> Result<Self> {
        let annotation_path = files
            .annotation
            .as_deref()
            .ok_or_else(|| DatasetError::MissingAnnotation {
                patient: id.to_string(),
            })?;
        let file = std::fs::File::open(annotation_path)
            .map_err(|e| DatasetError::io(annotation_path, e))?;
        let annotation = std::io::BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| DatasetError::io(annotation_path, e))?;

        let mut recordings: RecordingTree<Recording> = BTreeMap::new();
        for (valve, by_index) in &files.recordings {
            let mut loaded = BTreeMap::new();
            for (index, recording_files) in by_index {
                let recording = Recording::load(recording_files, id, valve, index)?;
                loaded.insert(index.clone(), recording);
            }
            recordings.insert(valve.clone(), loaded);
        }

        for valve in metadata.valves() {
            if !recordings.contains_key(valve) {
                log::warn!("Patient {id}: {valve} is listed in the table but has no recording");
            }
        }

        log::info!(
            "Loaded patient {id}: {} annotation lines, {} recordings",
            annotation.len(),
            recordings.values().map(BTreeMap::len).sum::<usize>()
        );

        Ok(Patient {
            id: id.to_string(),
            metadata: metadata.clone(),
            annotation,
            recordings,
        })
    }

    pub fn recording(&self, valve: &str, index: &str) -> Result<&Recording> {
        self.recordings
            .get(valve)
            .and_then(|by_index| by_index.get(index))
            .ok_or_else(|| DatasetError::UnknownRecording {
                patient: self.id.clone(),
                valve: valve.to_string(),
                index: index.to_string(),
            })
    }

    /// `(valve, index)` pairs in display order.
    pub fn recording_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.recordings.iter().flat_map(|(valve, by_index)| {
            by_index
                .keys()
                .map(move |index| (valve.as_str(), index.as_str()))
        })
    }

    /// Time-domain trace of one recording, ready to plot.
    pub fn trace(&self, valve: &str, index: &str) -> Result<Trace> {
        let recording = self.recording(valve, index)?;
        Ok(Trace::new(&self.id, valve, index, recording))
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patient {}", self.id)?;
        for (column, value) in self.metadata.fields() {
            writeln!(f, "  {column}: {value}")?;
        }
        writeln!(f, "  annotation: {} lines", self.annotation.len())?;
        for (valve, index) in self.recording_keys() {
            if let Ok(r) = self.recording(valve, index) {
                writeln!(
                    f,
                    "  {valve}/{index}: {} Hz, {} samples, {:.2} s, {} segments",
                    r.sample_rate,
                    r.frames(),
                    r.duration(),
                    r.segments.len()
                )?;
            }
        }
        Ok(())
    }
}
