use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::{pick_data_dir, pick_manifest, pick_output};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – scan positions
// ---------------------------------------------------------------------------

/// Render the position list with step heights.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Positions");
    ui.separator();

    let Some(outcome) = &state.outcome else {
        ui.label("No run loaded.");
        return;
    };

    // Legend for the height colours.
    if let Some(cm) = &state.color_map {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (label, color) in cm.legend_entries(5) {
                ui.label(RichText::new(label).color(color).monospace());
            }
        });
        ui.separator();
    }

    let mut clicked = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, pos) in outcome.positions.iter().enumerate() {
                let text = match &pos.result {
                    Ok((_, height)) => {
                        let color = state
                            .color_map
                            .map(|cm| cm.color_for(*height))
                            .unwrap_or(Color32::LIGHT_BLUE);
                        RichText::new(format!("{}  {height:.4}", pos.position)).color(color)
                    }
                    Err(_) => RichText::new(format!("{}  failed", pos.position)).color(Color32::RED),
                };

                let response = ui.selectable_label(state.selected == Some(i), text);
                let response = match &pos.result {
                    Err(e) => response.on_hover_text(e.to_string()),
                    Ok(_) => response,
                };
                if response.clicked() {
                    clicked = Some(i);
                }
            }
        });

    if let Some(i) = clicked {
        state.select(i);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Run analysis…").clicked() {
                run_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save grid…").clicked() {
                save_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(outcome) = &state.outcome {
            let (rows, cols) = outcome.grid.shape();
            ui.label(format!(
                "{} positions, {} failed, grid {rows}x{cols}",
                outcome.positions.len(),
                outcome.failure_count()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_histogram_peaks, "Histogram peaks")
            .clicked()
        {
            state.show_histogram_peaks = !state.show_histogram_peaks;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn run_dialog(state: &mut AppState) {
    let picked = pick_manifest(None).and_then(|manifest| {
        let data_dir = pick_data_dir(manifest.parent())?;
        Ok((manifest, data_dir))
    });

    match picked {
        Ok((manifest, data_dir)) => {
            log::info!(
                "Running {} against {}",
                manifest.display(),
                data_dir.display()
            );
            state.run(&manifest, &data_dir);
        }
        Err(e) => log::info!("Run cancelled: {e:#}"),
    }
}

pub fn save_dialog(state: &mut AppState) {
    let Ok(path) = pick_output(None) else {
        return;
    };
    match state.save_grid(&path) {
        Ok(()) => state.status_message = Some(format!("Saved {}", path.display())),
        Err(e) => {
            log::error!("Failed to save grid: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
