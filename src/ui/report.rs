use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as GridColumn, TableBuilder};

use pemetaan::analysis::aggregate::CategoryCount;
use pemetaan::analysis::bracket::IncomeBracket;
use pemetaan::analysis::stats::{Mode, StatisticsSummary};
use pemetaan::analysis::tier::Tier;
use pemetaan::analysis::view::{Conclusion, IncomeSummary, Section, ViewModel};
use pemetaan::data::model::{CellValue, Column, Table};

use crate::color::{generate_palette, ColorScale};
use crate::state::AppState;
use crate::ui::plot::{bar_chart, histogram_chart, LabeledBar};

const WARNING: Color32 = Color32::from_rgb(210, 160, 30);

// ---------------------------------------------------------------------------
// Central panel – the report
// ---------------------------------------------------------------------------

/// Render every section of the current view model.
pub fn report(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a student data file to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Student & Parent Mapping");
            ui.label(format!("Detected columns: {}", view.columns.join(", ")));

            ui.add_space(8.0);
            ui.strong("Data preview");
            data_grid(ui, "preview_grid", &view.preview, 160.0);

            if let Some(full) = &view.full_data {
                heading(ui, "Full data");
                ui.label(format!("{} row(s)", full.len()));
                data_grid(ui, "full_grid", full, 320.0);
            }

            if let Some(counts) = &view.city_distribution {
                heading(ui, "Students per city");
                bar_chart(ui, "city_chart", "Students", &count_bars(counts, ColorScale::VIRIDIS));
            }

            if let Some(income) = &view.income {
                income_section(ui, income);
            }

            if let Some(counts) = &view.level_distribution {
                heading(ui, "Students per level");
                bar_chart(ui, "level_chart", "Students", &count_bars(counts, ColorScale::PLASMA));
            }

            if let Some(counts) = &view.class_distribution {
                heading(ui, "Students per class");
                bar_chart(ui, "class_chart", "Students", &count_bars(counts, ColorScale::CIVIDIS));
            }

            optional_section(ui, "Average income per city", &view.income_by_city, |ui, means| {
                let bars = mean_bars(
                    means.iter().map(|m| (m.group.to_string(), m.mean)),
                    ColorScale::PLASMA,
                );
                bar_chart(ui, "income_city_chart", "Income (Rp)", &bars);
            });

            optional_section(ui, "Income distribution", &view.income_histogram, |ui, bins| {
                histogram_chart(ui, "income_histogram", "Income (Rp)", bins);
            });

            optional_section(
                ui,
                "Average income per bracket",
                &view.income_by_bracket,
                |ui, means| {
                    let bars = mean_bars(
                        means.iter().map(|m| (m.group.to_string(), m.mean)),
                        ColorScale::YELLOW_GREEN,
                    );
                    bar_chart(ui, "income_bracket_chart", "Income (Rp)", &bars);
                },
            );

            heading(ui, "Conclusion");
            conclusion(ui, view);
        });
}

fn heading(ui: &mut Ui, text: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.heading(text);
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn income_section(ui: &mut Ui, income: &IncomeSummary) {
    heading(ui, "Parental income");

    ui.strong("Income brackets");
    let total: usize = income.brackets.iter().map(|c| c.count).sum();
    let palette = generate_palette(IncomeBracket::ALL.len());
    let bars: Vec<LabeledBar> = income
        .brackets
        .iter()
        .map(|c| LabeledBar {
            label: c.category.to_string(),
            value: c.count as f64,
            color: palette[c.category as usize],
            caption: format!("{} ({:.1}%)", c.count, percent(c.count, total)),
        })
        .collect();
    bar_chart(ui, "bracket_chart", "Students", &bars);

    ui.add_space(8.0);
    ui.strong("Descriptive statistics");
    match &income.statistics {
        Some(stats) => statistics(ui, stats),
        None => {
            ui.label(RichText::new("No income values in the current selection.").italics());
        }
    }
}

fn statistics(ui: &mut Ui, stats: &StatisticsSummary) {
    ui.label(format!("• Mean: {}", format_rupiah(stats.mean)));
    ui.label(format!("• Median: {}", format_rupiah(stats.median)));
    let mode = match stats.mode {
        Mode::Unique(v) => format_rupiah(v),
        Mode::NonUnique => "not unique".to_string(),
    };
    ui.label(format!("• Mode: {mode}"));
    let std_dev = stats
        .standard_deviation
        .map(format_rupiah)
        .unwrap_or_else(|| "undefined (single value)".to_string());
    ui.label(format!("• Standard deviation: {std_dev}"));

    let bars: Vec<LabeledBar> = stats
        .chart_bars()
        .into_iter()
        .map(|b| LabeledBar {
            label: b.label.to_string(),
            value: b.value,
            color: Color32::from_rgb(75, 0, 130),
            caption: match b.note {
                Some(note) => note.to_string(),
                None => format_rupiah(b.value),
            },
        })
        .collect();
    bar_chart(ui, "stats_chart", "Value (Rp)", &bars);
}

fn optional_section<T>(
    ui: &mut Ui,
    title: &str,
    section: &Section<T>,
    render: impl FnOnce(&mut Ui, &T),
) {
    match section {
        Section::Off => {}
        Section::Unavailable { missing } => {
            heading(ui, title);
            let names: Vec<&str> = missing.iter().map(|c| c.name()).collect();
            ui.colored_label(
                WARNING,
                format!("Not available: column(s) {} missing.", names.join(", ")),
            );
        }
        Section::Ready(data) => {
            heading(ui, title);
            render(ui, data);
        }
    }
}

fn conclusion(ui: &mut Ui, view: &ViewModel) {
    match &view.conclusion {
        Conclusion::Classified { tier, mean } => {
            let (color, text) = match tier {
                Tier::High => (Color32::from_rgb(40, 160, 70), "Average parental income is high."),
                Tier::Low => (Color32::from_rgb(200, 50, 50), "Average parental income is low."),
                Tier::Medium => (
                    Color32::from_rgb(60, 120, 200),
                    "Average parental income is in the middle range.",
                ),
            };
            ui.colored_label(color, RichText::new(text).strong());
            ui.label(format!("Mean income: {}", format_rupiah(*mean)));
            ui.label("• The bracket distribution shows the economic situation of parents.");
            ui.label(format!(
                "• Spread by {} and {} helps target education planning.",
                Column::City,
                Column::Level
            ));
            ui.label("• Use the filters in the side panel to narrow the analysis.");
        }
        Conclusion::NotApplicable => {
            ui.label("No income values in the current selection; nothing to conclude.");
        }
        Conclusion::NoIncomeData => {
            ui.label("Income data is not available for a conclusion.");
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn count_bars(counts: &[CategoryCount<CellValue>], scale: ColorScale) -> Vec<LabeledBar> {
    let values: Vec<f64> = counts.iter().map(|c| c.count as f64).collect();
    counts
        .iter()
        .zip(scale.colors_for(&values))
        .map(|(c, color)| LabeledBar {
            label: c.category.to_string(),
            value: c.count as f64,
            color,
            caption: c.count.to_string(),
        })
        .collect()
}

/// Groups without a mean are drawn as zero-height bars captioned "no data".
fn mean_bars(
    means: impl Iterator<Item = (String, Option<f64>)>,
    scale: ColorScale,
) -> Vec<LabeledBar> {
    let means: Vec<(String, Option<f64>)> = means.collect();
    let values: Vec<f64> = means.iter().map(|(_, m)| m.unwrap_or(0.0)).collect();
    means
        .into_iter()
        .zip(scale.colors_for(&values))
        .map(|((label, mean), color)| LabeledBar {
            label,
            value: mean.unwrap_or(0.0),
            color: if mean.is_some() { color } else { Color32::GRAY },
            caption: mean.map(format_rupiah).unwrap_or_else(|| "no data".to_string()),
        })
        .collect()
}

fn data_grid(ui: &mut Ui, id: &str, table: &Table, max_height: f32) {
    if table.columns.is_empty() {
        ui.label(RichText::new("No columns.").italics());
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(max_height)
            .columns(GridColumn::auto().at_least(60.0), table.columns.len())
            .header(20.0, |mut header| {
                for name in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.len(), |mut row| {
                    let cells = &table.rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell_text(cell));
                        });
                    }
                });
            });
    });
}

fn cell_text(cell: &CellValue) -> RichText {
    match cell {
        CellValue::Null => RichText::new("—").weak(),
        other => RichText::new(other.to_string()),
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Format an amount as Indonesian Rupiah: `Rp 1.500.000`.
pub fn format_rupiah(amount: f64) -> String {
    if !amount.is_finite() {
        return "Rp -".to_string();
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("Rp {sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah_groups_thousands() {
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(999.0), "Rp 999");
        assert_eq!(format_rupiah(1_500_000.0), "Rp 1.500.000");
        assert_eq!(format_rupiah(3_125_000.4), "Rp 3.125.000");
        assert_eq!(format_rupiah(-12_345.6), "Rp -12.346");
        assert_eq!(format_rupiah(f64::NAN), "Rp -");
    }

    #[test]
    fn test_mean_bars_mark_groups_without_values() {
        let bars = mean_bars(
            vec![("Medan".to_string(), Some(2_000_000.0)), ("Solo".to_string(), None)]
                .into_iter(),
            ColorScale::PLASMA,
        );
        assert_eq!(bars[1].value, 0.0);
        assert_eq!(bars[1].caption, "no data");
        assert_eq!(bars[1].color, Color32::GRAY);
        assert_eq!(bars[0].caption, "Rp 2.000.000");
    }

    #[test]
    fn test_percent_of_empty_total() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
