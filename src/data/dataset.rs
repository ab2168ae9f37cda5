use std::collections::btree_map;
use std::path::{Path, PathBuf};

use super::error::{DatasetError, Result};
use super::index::{FileIndex, PatientFiles};
use super::model::Patient;
use super::table::MetadataTable;

/// Subdirectory holding the per-patient files.
pub const RECORDINGS_DIR: &str = "training_data";
/// Metadata table next to [`RECORDINGS_DIR`].
pub const TABLE_FILE: &str = "training_data.csv";

/// The file index and metadata table of one dataset root.
///
/// Nothing but the directory listing and the table is read up front;
/// recordings are decoded when a [`Patient`] is requested.
#[derive(Debug, Clone)]
pub struct Dataset {
    root: PathBuf,
    index: FileIndex,
    metadata: MetadataTable,
}

impl Dataset {
    /// Index `<root>/training_data` and load `<root>/training_data.csv`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let index = FileIndex::scan(&root.join(RECORDINGS_DIR))?;
        let metadata = MetadataTable::load(&root.join(TABLE_FILE))?;
        if index.is_empty() {
            log::warn!("No patient files under {}", root.join(RECORDINGS_DIR).display());
        }
        if metadata.is_empty() {
            log::warn!("Metadata table {} has no rows", root.join(TABLE_FILE).display());
        }

        log::info!(
            "Opened dataset {}: {} patients indexed, {} metadata rows",
            root.display(),
            index.len(),
            metadata.len()
        );
        Ok(Dataset {
            root,
            index,
            metadata,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Indexed patient IDs, ascending lexicographically.
    pub fn patient_ids(&self) -> impl Iterator<Item = &str> {
        self.index.patient_ids()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Load one patient, decoding all of its recordings.
    pub fn get_patient(&self, id: &str) -> Result<Patient> {
        let files = self
            .index
            .get(id)
            .ok_or_else(|| DatasetError::UnknownPatient { id: id.to_string() })?;
        self.build(id, files)
    }

    /// Every indexed patient in ID order. Each call starts over and reads
    /// from disk again.
    pub fn iter(&self) -> Patients<'_> {
        Patients {
            dataset: self,
            ids: self.index.iter(),
        }
    }

    fn build(&self, id: &str, files: &PatientFiles) -> Result<Patient> {
        let key: u32 = id
            .parse()
            .map_err(|_| DatasetError::InvalidPatientId { id: id.to_string() })?;
        let metadata = self
            .metadata
            .get(key)
            .ok_or_else(|| DatasetError::MissingMetadata { id: id.to_string() })?;
        Patient::load(id, files, metadata)
    }
}

/// Lazy iterator over the patients of a [`Dataset`].
pub struct Patients<'a> {
    dataset: &'a Dataset,
    ids: btree_map::Iter<'a, String, PatientFiles>,
}

impl Iterator for Patients<'_> {
    type Item = Result<Patient>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, files) = self.ids.next()?;
        Some(self.dataset.build(id, files))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = Result<Patient>;
    type IntoIter = Patients<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
