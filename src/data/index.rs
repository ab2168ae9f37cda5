use std::collections::{btree_map, BTreeMap};
use std::path::{Path, PathBuf};

use super::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// File classification
// ---------------------------------------------------------------------------

/// Recording index assigned when the file name carries none.
pub const DEFAULT_RECORDING_INDEX: &str = "0";

/// The per-recording file kinds found next to each other in `training_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingFileKind {
    /// `.wav` – the audio samples.
    Waveform,
    /// `.hea` – WFDB header.
    Header,
    /// `.tsv` – heart-state segmentation.
    Segmentation,
}

impl RecordingFileKind {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "wav" => Some(RecordingFileKind::Waveform),
            "hea" => Some(RecordingFileKind::Header),
            "tsv" => Some(RecordingFileKind::Segmentation),
            _ => None,
        }
    }
}

/// What a single directory entry turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRole {
    /// `<patient>.txt`
    Annotation { patient: String },
    /// `<patient>_<valve>[_<index>].<ext>`
    Recording {
        patient: String,
        valve: String,
        index: String,
        kind: RecordingFileKind,
    },
}

/// Classify a file by its name alone.
///
/// * `.txt` → annotation; the stem is the patient ID.
/// * `.wav` / `.hea` / `.tsv` → the stem is split on `_`: two parts give
///   `(patient, valve)` with index `"0"`, three parts give
///   `(patient, valve, index)` with the index kept verbatim.
/// * Anything else is an error naming the entry.
pub fn classify(path: &Path) -> Result<FileRole> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path.file_stem().and_then(|s| s.to_str());
    let ext = path.extension().and_then(|e| e.to_str());

    let (Some(stem), Some(ext)) = (stem, ext) else {
        return Err(DatasetError::UnexpectedFile { name });
    };

    if ext == "txt" {
        return Ok(FileRole::Annotation {
            patient: stem.to_string(),
        });
    }

    let Some(kind) = RecordingFileKind::from_extension(ext) else {
        return Err(DatasetError::UnexpectedFile { name });
    };

    let parts: Vec<&str> = stem.split('_').collect();
    let (patient, valve, index) = match parts.as_slice() {
        [patient, valve] => (*patient, *valve, DEFAULT_RECORDING_INDEX),
        [patient, valve, index] => (*patient, *valve, *index),
        _ => return Err(DatasetError::MalformedName { name }),
    };

    Ok(FileRole::Recording {
        patient: patient.to_string(),
        valve: valve.to_string(),
        index: index.to_string(),
        kind,
    })
}

// ---------------------------------------------------------------------------
// Index structure
// ---------------------------------------------------------------------------

/// The files making up one recording. Any of them may be absent on disk;
/// a missing waveform is only reported when the recording is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingFiles {
    pub waveform: Option<PathBuf>,
    pub header: Option<PathBuf>,
    pub segmentation: Option<PathBuf>,
}

impl RecordingFiles {
    fn slot(&mut self, kind: RecordingFileKind) -> &mut Option<PathBuf> {
        match kind {
            RecordingFileKind::Waveform => &mut self.waveform,
            RecordingFileKind::Header => &mut self.header,
            RecordingFileKind::Segmentation => &mut self.segmentation,
        }
    }
}

/// Valve name → recording index → files.
pub type RecordingTree<T> = BTreeMap<String, BTreeMap<String, T>>;

/// Everything indexed for one patient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFiles {
    pub annotation: Option<PathBuf>,
    pub recordings: RecordingTree<RecordingFiles>,
}

/// Patient ID → files, ordered by ID.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    patients: BTreeMap<String, PatientFiles>,
}

impl FileIndex {
    /// Scan one directory (non-recursively) and classify every entry whose
    /// name does not start with `.`.
    ///
    /// Fails on the first entry that does not classify.
    pub fn scan(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
            if entry.file_name().to_string_lossy().starts_with('.') {
                log::debug!("Skipping hidden entry {}", entry.path().display());
                continue;
            }
            paths.push(entry.path());
        }
        // Stable order so the first reported error does not depend on the OS.
        paths.sort();

        let mut index = FileIndex::default();
        for path in paths {
            let role = classify(&path)?;
            log::debug!("{} → {role:?}", path.display());
            index.insert(role, path)?;
        }

        log::info!(
            "Indexed {} patients from {}",
            index.patients.len(),
            dir.display()
        );
        Ok(index)
    }

    /// Place one classified file. Two files for the same slot are rejected.
    pub fn insert(&mut self, role: FileRole, path: PathBuf) -> Result<()> {
        let duplicate = |patient: &str, path: &Path| DatasetError::DuplicateFile {
            patient: patient.to_string(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        match role {
            FileRole::Annotation { patient } => {
                let files = self.patients.entry(patient.clone()).or_default();
                if files.annotation.is_some() {
                    return Err(duplicate(&patient, &path));
                }
                files.annotation = Some(path);
            }
            FileRole::Recording {
                patient,
                valve,
                index,
                kind,
            } => {
                let slot = self
                    .patients
                    .entry(patient.clone())
                    .or_default()
                    .recordings
                    .entry(valve)
                    .or_default()
                    .entry(index)
                    .or_default()
                    .slot(kind);
                if slot.is_some() {
                    return Err(duplicate(&patient, &path));
                }
                *slot = Some(path);
            }
        }
        Ok(())
    }

    pub fn get(&self, patient: &str) -> Option<&PatientFiles> {
        self.patients.get(patient)
    }

    /// `(patient ID, files)` in ascending lexicographic ID order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PatientFiles> {
        self.patients.iter()
    }

    /// Patient IDs in ascending lexicographic order.
    pub fn patient_ids(&self) -> impl Iterator<Item = &str> {
        self.patients.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn recording(patient: &str, valve: &str, index: &str, kind: RecordingFileKind) -> FileRole {
        FileRole::Recording {
            patient: patient.into(),
            valve: valve.into(),
            index: index.into(),
            kind,
        }
    }

    #[test]
    fn two_part_names_get_index_zero() {
        for (name, kind) in [
            ("13918_AV.wav", RecordingFileKind::Waveform),
            ("13918_AV.hea", RecordingFileKind::Header),
            ("13918_AV.tsv", RecordingFileKind::Segmentation),
        ] {
            let role = classify(Path::new(name)).unwrap();
            assert_eq!(role, recording("13918", "AV", "0", kind));
        }
    }

    #[test]
    fn three_part_names_keep_index_verbatim() {
        let role = classify(Path::new("/data/50782_MV_02.wav")).unwrap();
        assert_eq!(role, recording("50782", "MV", "02", RecordingFileKind::Waveform));
    }

    #[test]
    fn txt_names_an_annotation() {
        let role = classify(Path::new("training_data/13918.txt")).unwrap();
        assert_eq!(
            role,
            FileRole::Annotation {
                patient: "13918".into()
            }
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = classify(Path::new("patient1_AV.bin")).unwrap_err();
        assert!(matches!(err, DatasetError::UnexpectedFile { ref name } if name == "patient1_AV.bin"));

        let err = classify(Path::new("README")).unwrap_err();
        assert!(matches!(err, DatasetError::UnexpectedFile { .. }));
    }

    #[test]
    fn wrong_part_count_is_rejected() {
        for name in ["13918.wav", "13918_AV_1_2.wav"] {
            let err = classify(Path::new(name)).unwrap_err();
            assert!(matches!(err, DatasetError::MalformedName { .. }), "{name}");
        }
    }

    #[test]
    fn scan_groups_files_by_patient_valve_and_index() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "2530.txt",
            "2530_AV.wav",
            "2530_AV.hea",
            "2530_AV.tsv",
            "2530_MV_1.wav",
            "2530_MV_2.wav",
            "9979.txt",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let index = FileIndex::scan(dir.path()).unwrap();
        assert_eq!(index.patient_ids().collect::<Vec<_>>(), vec!["2530", "9979"]);

        let files = index.get("2530").unwrap();
        assert_eq!(files.annotation, Some(dir.path().join("2530.txt")));
        let av = &files.recordings["AV"]["0"];
        assert_eq!(av.waveform, Some(dir.path().join("2530_AV.wav")));
        assert_eq!(av.header, Some(dir.path().join("2530_AV.hea")));
        assert_eq!(av.segmentation, Some(dir.path().join("2530_AV.tsv")));
        assert_eq!(
            files.recordings["MV"].keys().collect::<Vec<_>>(),
            vec!["1", "2"]
        );

        let lone = index.get("9979").unwrap();
        assert!(lone.recordings.is_empty());
        assert!(index.get("0000").is_none());
    }

    #[test]
    fn scan_skips_hidden_entries() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["1.txt", "1_AV.wav", ".DS_Store", "._1_AV.wav", ".gitkeep"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join(".cache")).unwrap();

        let index = FileIndex::scan(dir.path()).unwrap();
        assert_eq!(index.patient_ids().collect::<Vec<_>>(), vec!["1"]);
        let files = index.get("1").unwrap();
        assert_eq!(
            files.recordings["AV"]["0"].waveform,
            Some(dir.path().join("1_AV.wav"))
        );
    }

    #[test]
    fn scan_fails_on_unexpected_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.txt"), b"").unwrap();
        fs::write(dir.path().join("patient1_AV.bin"), b"").unwrap();

        let err = FileIndex::scan(dir.path()).unwrap_err();
        assert!(err.to_string().contains("patient1_AV.bin"));
    }

    #[test]
    fn duplicate_slot_is_rejected() {
        let mut index = FileIndex::default();
        index
            .insert(
                recording("1", "AV", "0", RecordingFileKind::Waveform),
                PathBuf::from("1_AV.wav"),
            )
            .unwrap();
        let err = index
            .insert(
                recording("1", "AV", "0", RecordingFileKind::Waveform),
                PathBuf::from("1_AV_0.wav"),
            )
            .unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateFile { .. }));
    }
}
