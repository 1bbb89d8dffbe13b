use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{CellValue, Column, Dataset, Table};

// ---------------------------------------------------------------------------
// Filter selection: what the user picked per column
// ---------------------------------------------------------------------------

/// User choices for the cascading filters.
///
/// * `year` is a single choice; `None` applies no year filter.
/// * The sets are multi-choices; an empty set means "all values pass",
///   not "nothing selected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub year: Option<CellValue>,
    pub cities: BTreeSet<CellValue>,
    pub levels: BTreeSet<CellValue>,
    pub classes: BTreeSet<CellValue>,
}

impl FilterSelection {
    /// The multi-choice set for a column (`None` for the year column).
    pub fn set_for(&self, column: Column) -> Option<&BTreeSet<CellValue>> {
        match column {
            Column::City => Some(&self.cities),
            Column::Level => Some(&self.levels),
            Column::Class => Some(&self.classes),
            Column::Year | Column::Income => None,
        }
    }

    pub fn set_for_mut(&mut self, column: Column) -> Option<&mut BTreeSet<CellValue>> {
        match column {
            Column::City => Some(&mut self.cities),
            Column::Level => Some(&mut self.levels),
            Column::Class => Some(&mut self.classes),
            Column::Year | Column::Income => None,
        }
    }

    /// Drop choices that are no longer offered, and default the year to
    /// the first available option when it is unset or stale.
    ///
    /// When the year has to change the multi-choices are left untouched:
    /// `options` describe the old year, so call again with fresh options
    /// (see [`reconcile`]).
    pub fn retain_available(&mut self, options: &FilterOptions) {
        let year = match &options.years {
            Some(years) if !years.is_empty() => match &self.year {
                Some(y) if years.contains(y) => Some(y.clone()),
                _ => years.first().cloned(),
            },
            _ => None,
        };
        if year != self.year {
            self.year = year;
            return;
        }
        for column in MULTI_COLUMNS {
            let offered = options.for_column(column);
            if let Some(set) = self.set_for_mut(column) {
                match offered {
                    Some(values) => set.retain(|v| values.contains(v)),
                    None => set.clear(),
                }
            }
        }
    }
}

/// Multi-choice columns, in application order.
const MULTI_COLUMNS: [Column; 3] = [Column::City, Column::Level, Column::Class];

// ---------------------------------------------------------------------------
// Filter options: what the user can pick
// ---------------------------------------------------------------------------

/// Sorted distinct values offered per filter column.
/// `None` means the column is absent; an empty vector means it has no
/// non-missing values in the rows left by the preceding filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Option<Vec<CellValue>>,
    pub cities: Option<Vec<CellValue>>,
    pub levels: Option<Vec<CellValue>>,
    pub classes: Option<Vec<CellValue>>,
}

impl FilterOptions {
    pub fn for_column(&self, column: Column) -> Option<&Vec<CellValue>> {
        match column {
            Column::Year => self.years.as_ref(),
            Column::City => self.cities.as_ref(),
            Column::Level => self.levels.as_ref(),
            Column::Class => self.classes.as_ref(),
            Column::Income => None,
        }
    }

    fn slot(&mut self, column: Column) -> Option<&mut Option<Vec<CellValue>>> {
        match column {
            Column::Year => Some(&mut self.years),
            Column::City => Some(&mut self.cities),
            Column::Level => Some(&mut self.levels),
            Column::Class => Some(&mut self.classes),
            Column::Income => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cascading filter engine
// ---------------------------------------------------------------------------

/// One stage of the cascade.
enum Predicate<'a> {
    Equals(&'a CellValue),
    OneOf(&'a BTreeSet<CellValue>),
}

impl Predicate<'_> {
    fn matches(&self, value: &CellValue) -> bool {
        if value.is_null() {
            return false;
        }
        match self {
            Predicate::Equals(wanted) => value == *wanted,
            Predicate::OneOf(set) => set.contains(value),
        }
    }
}

/// Stage order: year first, then city, level, class.
const STAGES: [Column; 4] = [Column::Year, Column::City, Column::Level, Column::Class];

fn predicate_for<'a>(column: Column, selection: &'a FilterSelection) -> Option<Predicate<'a>> {
    match column {
        Column::Year => selection.year.as_ref().map(Predicate::Equals),
        other => selection
            .set_for(other)
            .filter(|set| !set.is_empty())
            .map(Predicate::OneOf),
    }
}

/// Runs the stages over a working set of row indices. `on_stage` sees the
/// rows entering each present stage, before it narrows them.
fn cascade<F>(dataset: &Dataset, selection: &FilterSelection, on_stage: F) -> Vec<usize>
where
    F: FnMut(Column, usize, &[usize]),
{
    run_stages(dataset, selection, &STAGES, on_stage)
}

/// Each stage only depends on the dataset and the selection, never on the
/// rows left by earlier stages, so any `order` keeps the same rows.
fn run_stages<F>(
    dataset: &Dataset,
    selection: &FilterSelection,
    order: &[Column],
    mut on_stage: F,
) -> Vec<usize>
where
    F: FnMut(Column, usize, &[usize]),
{
    let table = dataset.table();
    let mut rows: Vec<usize> = (0..table.len()).collect();

    for &column in order {
        if !dataset.has(column) {
            continue;
        }
        let Some(idx) = table.index_of(column.name()) else {
            continue;
        };
        on_stage(column, idx, &rows);

        let Some(predicate) = predicate_for(column, selection) else {
            continue;
        };
        // A column without a single value anywhere has nothing to filter on.
        if table.rows.iter().all(|r| r[idx].is_null()) {
            continue;
        }
        rows.retain(|&r| predicate.matches(&table.rows[r][idx]));
        log::debug!("filter {column}: {} row(s) remain", rows.len());
    }
    rows
}

/// Indices of the rows that pass every active filter, in table order.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    cascade(dataset, selection, |_, _, _| {})
}

/// Apply the cascading filters and return the narrowed dataset.
///
/// An empty result is valid. Applying the same selection twice gives the
/// same rows as applying it once.
pub fn apply_filters(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    let rows = filtered_indices(dataset, selection);
    dataset.with_rows(&rows)
}

/// Options for every present filter column, each drawn from the rows that
/// survive the filters before it.
pub fn filter_options(dataset: &Dataset, selection: &FilterSelection) -> FilterOptions {
    let table: &Table = dataset.table();
    let mut options = FilterOptions::default();
    cascade(dataset, selection, |column, idx, rows| {
        let distinct: BTreeSet<&CellValue> = rows
            .iter()
            .map(|&r| &table.rows[r][idx])
            .filter(|v| !v.is_null())
            .collect();
        if let Some(slot) = options.slot(column) {
            *slot = Some(distinct.into_iter().cloned().collect());
        }
    });
    options
}

/// Prune `selection` against the cascading options until nothing changes,
/// returning the options that match the final selection.
pub fn reconcile(dataset: &Dataset, selection: &mut FilterSelection) -> FilterOptions {
    loop {
        let options = filter_options(dataset, selection);
        let before = selection.clone();
        selection.retain_available(&options);
        if *selection == before {
            return options;
        }
    }
}
