use std::path::Path;

use anyhow::Context;

use crate::color::ColorMap;
use crate::data::dataset::Dataset;
use crate::data::error::{DatasetError, ErrorKind};
use crate::data::model::Patient;
use crate::data::trace::Trace;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Opened dataset (None until the user picks a root folder).
    pub dataset: Option<Dataset>,

    /// Indexed patient IDs, cached for the selector.
    pub patient_ids: Vec<String>,

    /// Currently loaded patient.
    pub patient: Option<Patient>,

    /// Selected `(valve, recording index)` of `patient`.
    pub selection: Option<(String, String)>,

    /// Trace of the selected recording.
    pub trace: Option<Trace>,

    /// Per-valve colours of the loaded patient.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Open a dataset root, replacing whatever was loaded before.
    pub fn open_dataset(&mut self, root: &Path) {
        match Dataset::open(root).with_context(|| format!("opening dataset {}", root.display())) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.report(e),
        }
    }

    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.patient_ids = dataset.patient_ids().map(str::to_string).collect();
        self.dataset = Some(dataset);
        self.clear_patient();
        self.status_message = None;
    }

    /// Forget the loaded patient and everything derived from it.
    fn clear_patient(&mut self) {
        self.patient = None;
        self.selection = None;
        self.trace = None;
        self.color_map = None;
    }

    /// Load a patient and show its first recording.
    pub fn select_patient(&mut self, id: &str) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match dataset
            .get_patient(id)
            .with_context(|| format!("loading patient {id}"))
        {
            Ok(patient) => {
                self.color_map = Some(ColorMap::new(patient.recordings.keys().map(String::as_str)));
                let first = patient
                    .recording_keys()
                    .next()
                    .map(|(v, i)| (v.to_string(), i.to_string()));
                self.patient = Some(patient);
                self.selection = None;
                self.trace = None;
                self.status_message = None;
                if let Some((valve, index)) = first {
                    self.select_recording(&valve, &index);
                }
            }
            Err(e) => {
                self.clear_patient();
                self.report(e);
            }
        }
    }

    /// Switch the plotted recording of the loaded patient.
    pub fn select_recording(&mut self, valve: &str, index: &str) {
        let Some(patient) = &self.patient else {
            return;
        };
        match patient.trace(valve, index) {
            Ok(trace) => {
                self.trace = Some(trace);
                self.selection = Some((valve.to_string(), index.to_string()));
            }
            Err(e) => self.report(e.into()),
        }
    }

    pub fn is_selected(&self, valve: &str, index: &str) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|(v, i)| v == valve && i == index)
    }

    fn report(&mut self, err: anyhow::Error) {
        let prefix = match err.downcast_ref::<DatasetError>().map(DatasetError::kind) {
            Some(ErrorKind::Lookup) => "Lookup failed",
            _ => "Construction failed",
        };
        log::error!("{prefix}: {err:#}");
        self.status_message = Some(format!("{prefix}: {err:#}"));
    }
}
