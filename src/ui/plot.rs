use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trace plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected heart-sound trace in the central panel.
pub fn trace_plot(ui: &mut Ui, state: &AppState) {
    let trace = match &state.trace {
        Some(trace) => trace,
        None => {
            let hint = if state.dataset.is_none() {
                "Open a dataset to view traces  (File → Open dataset…)"
            } else {
                "Select a patient and a recording"
            };
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(hint);
            });
            return;
        }
    };

    let color = state
        .color_map
        .as_ref()
        .map(|cm| cm.color_for(&trace.valve))
        .unwrap_or(Color32::LIGHT_BLUE);

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&trace.title);
    });

    Plot::new("trace_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(trace.x_label)
        .y_axis_label(trace.y_label)
        .show_grid(true)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let points = PlotPoints::new(trace.points.clone());
            let line = Line::new(points)
                .name(&trace.name)
                .color(color)
                .width(1.0);
            plot_ui.line(line);
        });
}
