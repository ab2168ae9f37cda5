use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – patient details
// ---------------------------------------------------------------------------

/// Render the left panel: recordings, metadata and annotation of the
/// loaded patient.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Patient");
    ui.separator();

    let Some(patient) = &state.patient else {
        ui.label(if state.dataset.is_some() {
            "No patient selected."
        } else {
            "No dataset loaded."
        });
        return;
    };

    // Collect what we need so we can mutate state after the borrow ends.
    let keys: Vec<(String, String)> = patient
        .recording_keys()
        .map(|(v, i)| (v.to_string(), i.to_string()))
        .collect();
    let fields = patient.metadata.fields();
    let annotation = patient.annotation.clone();
    let mut clicked: Option<(String, String)> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Recordings ----
            egui::CollapsingHeader::new(RichText::new(format!("Recordings  ({})", keys.len())).strong())
                .id_salt("recordings")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for (valve, index) in &keys {
                        let mut text = RichText::new(format!("{valve} / {index}"));
                        if let Some(cm) = &state.color_map {
                            text = text.color(cm.color_for(valve));
                        }
                        if ui
                            .selectable_label(state.is_selected(valve, index), text)
                            .clicked()
                        {
                            clicked = Some((valve.clone(), index.clone()));
                        }
                    }
                });

            // ---- Metadata ----
            egui::CollapsingHeader::new(RichText::new("Metadata").strong())
                .id_salt("metadata")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    TableBuilder::new(ui)
                        .striped(true)
                        .vscroll(false)
                        .column(Column::auto())
                        .column(Column::remainder())
                        .header(18.0, |mut header| {
                            header.col(|ui| {
                                ui.strong("Field");
                            });
                            header.col(|ui| {
                                ui.strong("Value");
                            });
                        })
                        .body(|mut body| {
                            for (column, value) in &fields {
                                body.row(18.0, |mut row| {
                                    row.col(|ui| {
                                        ui.label(*column);
                                    });
                                    row.col(|ui| {
                                        ui.label(value.to_string());
                                    });
                                });
                            }
                        });
                });

            // ---- Annotation ----
            egui::CollapsingHeader::new(RichText::new(format!("Annotation  ({} lines)", annotation.len())).strong())
                .id_salt("annotation")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for line in &annotation {
                        ui.monospace(line);
                    }
                });
        });

    if let Some((valve, index)) = clicked {
        state.select_recording(&valve, &index);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} patients in {}", ds.len(), ds.root().display()));
            ui.separator();

            let current = state
                .patient
                .as_ref()
                .map(|p| p.id.clone())
                .unwrap_or_default();
            let mut picked: Option<String> = None;
            egui::ComboBox::from_id_salt("patient")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for id in &state.patient_ids {
                        if ui.selectable_label(current == *id, id).clicked() {
                            picked = Some(id.clone());
                        }
                    }
                });
            if let Some(id) = picked {
                state.select_patient(&id);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open heart-sound dataset (folder with training_data/)")
        .pick_folder();

    if let Some(root) = folder {
        state.open_dataset(&root);
        if let Some(ds) = &state.dataset {
            log::info!("Opened {} with {} patients", root.display(), ds.len());
        }
    }
}
