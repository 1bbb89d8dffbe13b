use serde::Serialize;

use super::aggregate::{
    count_brackets, count_by, mean_by, mean_by_bracket, CategoryCount, GroupMean,
};
use super::bracket::IncomeBracket;
use super::stats::{histogram, summarize, HistogramBin, StatisticsSummary};
use super::tier::{classify, Tier};
use crate::data::filter::{apply_filters, filter_options, FilterOptions, FilterSelection};
use crate::data::model::{CellValue, Column, Dataset, Table};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Optional report sections, all off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Toggles {
    pub show_full_data: bool,
    pub income_by_city: bool,
    pub income_distribution: bool,
    pub income_by_bracket: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewOptions {
    pub toggles: Toggles,
    /// Rows shown in the data preview.
    pub preview_rows: usize,
    /// Bins of the income histogram.
    pub histogram_bins: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            toggles: Toggles::default(),
            preview_rows: 5,
            histogram_bins: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// A section switched on by a toggle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    /// Toggle is off.
    Off,
    /// Toggle is on but required columns are absent.
    Unavailable { missing: Vec<Column> },
    Ready(T),
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeSummary {
    pub brackets: Vec<CategoryCount<IncomeBracket>>,
    /// `None` when no row has an income.
    pub statistics: Option<StatisticsSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Conclusion {
    Classified { tier: Tier, mean: f64 },
    /// The income column exists but the filtered rows hold no income.
    NotApplicable,
    /// No income column.
    NoIncomeData,
}

/// Everything the report renders for one selection. Sections whose
/// columns are absent are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub columns: Vec<String>,
    pub total_rows: usize,
    /// First rows of the normalized table, before filtering.
    pub preview: Table,
    pub options: FilterOptions,
    pub filtered_rows: usize,
    pub full_data: Option<Table>,
    pub city_distribution: Option<Vec<CategoryCount<CellValue>>>,
    pub income: Option<IncomeSummary>,
    /// Hidden while the user has picked levels.
    pub level_distribution: Option<Vec<CategoryCount<CellValue>>>,
    /// Hidden while the user has picked classes.
    pub class_distribution: Option<Vec<CategoryCount<CellValue>>>,
    pub income_by_city: Section<Vec<GroupMean<CellValue>>>,
    pub income_histogram: Section<Vec<HistogramBin>>,
    pub income_by_bracket: Section<Vec<GroupMean<IncomeBracket>>>,
    pub conclusion: Conclusion,
}

fn section<T>(
    on: bool,
    dataset: &Dataset,
    required: &[Column],
    build: impl FnOnce() -> T,
) -> Section<T> {
    if !on {
        return Section::Off;
    }
    let missing = dataset.capabilities().missing(required);
    if missing.is_empty() {
        Section::Ready(build())
    } else {
        Section::Unavailable { missing }
    }
}

/// Run the whole pipeline for one interaction: filter, aggregate,
/// summarize and classify.
pub fn compute(dataset: &Dataset, selection: &FilterSelection, options: &ViewOptions) -> ViewModel {
    let toggles = options.toggles;
    let filtered = apply_filters(dataset, selection);
    let table = filtered.table();
    log::debug!(
        "compute: {} of {} rows after filters {:?}",
        filtered.len(),
        dataset.len(),
        selection
    );

    let distribution = |column: Column, picked: bool| {
        (dataset.has(column) && !picked).then(|| count_by(table, column.name()))
    };

    let incomes = table.numeric_values(Column::Income.name());
    let statistics = summarize(&incomes);
    let income = dataset.has(Column::Income).then(|| IncomeSummary {
        brackets: count_brackets(table),
        statistics: statistics.clone(),
    });

    let conclusion = match (&income, &statistics) {
        (None, _) => Conclusion::NoIncomeData,
        (Some(_), stats) => stats
            .as_ref()
            .and_then(|s| classify(s.mean).map(|tier| (tier, s.mean)))
            .map_or(Conclusion::NotApplicable, |(tier, mean)| {
                Conclusion::Classified { tier, mean }
            }),
    };

    ViewModel {
        columns: dataset.table().columns.clone(),
        total_rows: dataset.len(),
        preview: dataset.table().head(options.preview_rows),
        options: filter_options(dataset, selection),
        filtered_rows: filtered.len(),
        full_data: toggles.show_full_data.then(|| table.clone()),
        city_distribution: distribution(Column::City, false),
        income,
        level_distribution: distribution(Column::Level, !selection.levels.is_empty()),
        class_distribution: distribution(Column::Class, !selection.classes.is_empty()),
        income_by_city: section(
            toggles.income_by_city,
            dataset,
            &[Column::City, Column::Income],
            || mean_by(table, Column::City.name(), Column::Income.name()),
        ),
        income_histogram: section(
            toggles.income_distribution,
            dataset,
            &[Column::Income],
            || histogram(&incomes, options.histogram_bins),
        ),
        income_by_bracket: section(
            toggles.income_by_bracket,
            dataset,
            &[Column::Income],
            || mean_by_bracket(table),
        ),
        conclusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats::Mode;

    fn s(v: &str) -> CellValue {
        CellValue::from(v)
    }

    fn dataset() -> Dataset {
        let row = |year: i64, city: &str, level: &str, income: CellValue| {
            vec![CellValue::Integer(year), s(city), s(level), income]
        };
        Dataset::new(Table::new(
            vec!["Tahun".into(), "Kota".into(), "Jenjang".into(), "Penghasilan".into()],
            vec![
                row(2024, "Medan", "SD", "500000".into()),
                row(2024, "Solo", "SMP", CellValue::Integer(1_500_000)),
                row(2024, "Medan", "SMP", CellValue::Float(1_500_000.0)),
                row(2024, "Bandung", "SMA", CellValue::Integer(9_000_000)),
                row(2024, "Solo", "SD", "tidak tahu".into()),
                row(2023, "Medan", "SD", CellValue::Integer(12_000_000)),
            ],
        ))
    }

    fn year(y: i64) -> FilterSelection {
        FilterSelection {
            year: Some(CellValue::Integer(y)),
            ..Default::default()
        }
    }

    #[test]
    fn test_income_scenario_for_one_year() {
        let vm = compute(&dataset(), &year(2024), &ViewOptions::default());
        assert_eq!(vm.total_rows, 6);
        assert_eq!(vm.filtered_rows, 5);

        let income = vm.income.expect("income section");
        let stats = income.statistics.expect("statistics");
        assert_eq!(stats.mean, 3_125_000.0);
        assert_eq!(stats.median, 1_500_000.0);
        assert_eq!(stats.mode, Mode::Unique(1_500_000.0));

        let brackets: Vec<_> = income
            .brackets
            .iter()
            .map(|c| (c.category.label(), c.count))
            .collect();
        assert_eq!(brackets, vec![("<1jt", 1), ("1-3jt", 2), ("5-10jt", 1)]);

        assert_eq!(
            vm.conclusion,
            Conclusion::Classified {
                tier: Tier::Medium,
                mean: 3_125_000.0
            }
        );
    }

    #[test]
    fn test_preview_is_taken_before_filtering() {
        let vm = compute(&dataset(), &year(2023), &ViewOptions::default());
        assert_eq!(vm.preview.len(), 5);
        assert_eq!(vm.filtered_rows, 1);
        assert_eq!(vm.columns, vec!["TAHUN", "KOTA", "JENJANG", "PENGHASILAN"]);
        assert!(vm.full_data.is_none());
    }

    #[test]
    fn test_missing_city_column_drops_city_sections() {
        let ds = Dataset::new(Table::new(
            vec!["PENGHASILAN".into()],
            vec![vec![CellValue::Integer(1_000_000)]],
        ));
        let options = ViewOptions {
            toggles: Toggles {
                income_by_city: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let vm = compute(&ds, &FilterSelection::default(), &options);
        assert!(vm.city_distribution.is_none());
        assert!(vm.options.cities.is_none());
        assert_eq!(
            vm.income_by_city,
            Section::Unavailable {
                missing: vec![Column::City]
            }
        );
    }

    #[test]
    fn test_empty_city_choice_does_not_filter() {
        let ds = dataset();
        let all = compute(&ds, &FilterSelection::default(), &ViewOptions::default());
        assert_eq!(all.filtered_rows, 6);
        let medan = compute(
            &ds,
            &FilterSelection {
                cities: [s("Medan")].into_iter().collect(),
                ..Default::default()
            },
            &ViewOptions::default(),
        );
        assert_eq!(medan.filtered_rows, 3);
    }

    #[test]
    fn test_empty_result_is_not_applicable() {
        let selection = FilterSelection {
            year: Some(CellValue::Integer(2023)),
            cities: [s("Solo")].into_iter().collect(),
            ..Default::default()
        };
        let options = ViewOptions {
            toggles: Toggles {
                show_full_data: true,
                income_by_city: true,
                income_distribution: true,
                income_by_bracket: true,
            },
            ..Default::default()
        };
        let vm = compute(&dataset(), &selection, &options);
        assert_eq!(vm.filtered_rows, 0);
        assert_eq!(vm.conclusion, Conclusion::NotApplicable);
        let income = vm.income.expect("income column present");
        assert!(income.brackets.is_empty());
        assert!(income.statistics.is_none());
        assert_eq!(vm.city_distribution, Some(vec![]));
        assert_eq!(vm.income_by_city, Section::Ready(vec![]));
        assert_eq!(vm.income_histogram, Section::Ready(vec![]));
        assert_eq!(vm.full_data.map(|t| t.len()), Some(0));
        let bracket_means = vm.income_by_bracket.ready().expect("ready");
        assert!(bracket_means.iter().all(|m| m.mean.is_none()));
    }

    #[test]
    fn test_level_chart_hidden_while_levels_are_picked() {
        let ds = dataset();
        let vm = compute(&ds, &FilterSelection::default(), &ViewOptions::default());
        assert!(vm.level_distribution.is_some());
        assert!(vm.class_distribution.is_none());

        let picked = FilterSelection {
            levels: [s("SD")].into_iter().collect(),
            ..Default::default()
        };
        let vm = compute(&ds, &picked, &ViewOptions::default());
        assert!(vm.level_distribution.is_none());
        assert!(vm.city_distribution.is_some());
    }

    #[test]
    fn test_no_income_column_has_no_conclusion() {
        let ds = Dataset::new(Table::new(vec!["KOTA".into()], vec![vec![s("Medan")]]));
        let vm = compute(&ds, &FilterSelection::default(), &ViewOptions::default());
        assert!(vm.income.is_none());
        assert_eq!(vm.conclusion, Conclusion::NoIncomeData);
        assert_eq!(vm.income_histogram, Section::Off);
    }

    #[test]
    fn test_view_model_serializes_to_json() {
        let vm = compute(&dataset(), &year(2024), &ViewOptions::default());
        let json = serde_json::to_value(&vm).unwrap();
        assert_eq!(json["conclusion"]["status"], "classified");
        assert_eq!(json["conclusion"]["tier"], "medium");
        assert_eq!(json["income"]["brackets"][0]["category"], "<1jt");
        assert_eq!(json["income_by_city"]["status"], "off");
        assert_eq!(json["income"]["statistics"]["mode"]["kind"], "unique");
    }
}
