use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text};

use pemetaan::analysis::stats::HistogramBin;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Category bar chart
// ---------------------------------------------------------------------------

/// One bar of a category chart. `caption` is drawn on top of the bar.
pub struct LabeledBar {
    pub label: String,
    pub value: f64,
    pub color: Color32,
    pub caption: String,
}

/// Render bars left to right with the category under each bar.
pub fn bar_chart(ui: &mut Ui, id: &str, y_label: &str, bars: &[LabeledBar]) {
    if bars.is_empty() {
        no_data(ui);
        return;
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .show_axes([false, true])
        .include_y(0.0)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            let chart: Vec<Bar> = bars
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    Bar::new(i as f64, b.value)
                        .name(&b.label)
                        .fill(b.color)
                        .width(0.7)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(chart));

            for (i, b) in bars.iter().enumerate() {
                let x = i as f64;
                plot_ui.text(
                    Text::new(PlotPoint::new(x, 0.0), b.label.clone()).anchor(Align2::CENTER_TOP),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(x, b.value), b.caption.clone())
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Render histogram bins on a numeric x axis.
pub fn histogram_chart(ui: &mut Ui, id: &str, x_label: &str, bins: &[HistogramBin]) {
    if bins.is_empty() {
        no_data(ui);
        return;
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Count")
        .include_y(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let chart: Vec<Bar> = bins
                .iter()
                .map(|bin| {
                    let width = (bin.end - bin.start).max(1.0);
                    Bar::new(bin.start + width / 2.0, bin.count as f64)
                        .width(width)
                        .name(format!("{:.0} – {:.0}", bin.start, bin.end))
                        .fill(Color32::LIGHT_BLUE)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(chart));
        });
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No data for the current filters.").italics());
}
