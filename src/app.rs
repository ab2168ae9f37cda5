use std::path::PathBuf;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

/// What to show right after start-up.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub root: Option<PathBuf>,
    pub patient: Option<String>,
    /// `(valve, recording index)`; the first recording when absent.
    pub recording: Option<(String, String)>,
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustyMurmurApp {
    pub state: AppState,
}

impl RustyMurmurApp {
    pub fn new(launch: LaunchOptions) -> Self {
        let mut state = AppState::default();
        if let Some(root) = &launch.root {
            state.open_dataset(root);
        }
        if let Some(id) = &launch.patient {
            state.select_patient(id);
        }
        if let Some((valve, index)) = &launch.recording {
            state.select_recording(valve, index);
        }
        Self { state }
    }
}

impl eframe::App for RustyMurmurApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: patient details ----
        egui::SidePanel::left("patient_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::trace_plot(ui, &self.state);
        });
    }
}
