use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoints, VLine};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Peak inspection plot (central panel)
// ---------------------------------------------------------------------------

/// Histogram of the selected scan with its smoothed density and peaks.
pub fn peak_plot(ui: &mut Ui, state: &AppState) {
    let Some(pos) = state.selected_position() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Run an analysis to inspect scans  (File → Run analysis…)");
        });
        return;
    };

    let Some(analysis) = &pos.analysis else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let reason = match &pos.result {
                Err(e) => e.to_string(),
                Ok(_) => String::new(),
            };
            ui.heading(format!("{}: no data\n{reason}", pos.file_name));
        });
        return;
    };

    let hist = &analysis.histogram;
    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .midpoints()
        .into_iter()
        .zip(hist.counts())
        .map(|(x, &count)| Bar::new(x, count as f64).width(width))
        .collect();

    Plot::new("peak_plot")
        .legend(Legend::default())
        .x_axis_label("Height")
        .y_axis_label("Count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(&pos.file_name)
                    .color(Color32::from_rgb(70, 110, 200)),
            );

            if let Some(kde) = &analysis.density {
                let points: PlotPoints = kde
                    .positions()
                    .iter()
                    .zip(kde.values())
                    .map(|(&x, &y)| [x, y])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name("Smoothed KDE")
                        .color(Color32::RED)
                        .width(2.0),
                );
            }

            if state.show_histogram_peaks {
                for &x in analysis.coarse_peaks.positions() {
                    plot_ui.vline(
                        VLine::new(x)
                            .name("Simple Peak")
                            .color(Color32::LIGHT_BLUE)
                            .style(LineStyle::dashed_loose()),
                    );
                }
            }

            for &x in analysis.peaks.positions() {
                plot_ui.vline(
                    VLine::new(x)
                        .name("Peak Position")
                        .color(Color32::RED)
                        .style(LineStyle::dashed_dense()),
                );
            }
        });
}
