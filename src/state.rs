use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pemetaan::analysis::view::{compute, ViewModel, ViewOptions};
use pemetaan::data::filter::{reconcile, FilterSelection};
use pemetaan::data::model::{CellValue, Column, Dataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded, normalized dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Where the dataset came from.
    pub source: Option<PathBuf>,

    /// Current filter choices.
    pub selection: FilterSelection,

    /// Section toggles and report sizes.
    pub view_options: ViewOptions,

    /// Result of the last pipeline run (cached until the next interaction).
    pub view: Option<ViewModel>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    /// Ingest a newly loaded dataset, reset filters and run the pipeline.
    pub fn set_dataset(&mut self, dataset: Dataset, source: PathBuf) {
        self.dataset = Some(dataset);
        self.source = Some(source);
        self.selection = FilterSelection::default();
        self.status_message = None;
        self.loading = false;
        self.recompute();
    }

    /// Re-run the whole pipeline after any widget change.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.view = None;
            return;
        };
        reconcile(ds, &mut self.selection);
        self.view = Some(compute(ds, &self.selection, &self.view_options));
    }

    pub fn select_year(&mut self, year: CellValue) {
        self.selection.year = Some(year);
        self.recompute();
    }

    /// Toggle a single value in a column's multi-choice filter.
    pub fn toggle_filter_value(&mut self, column: Column, value: &CellValue) {
        if let Some(selected) = self.selection.set_for_mut(column) {
            if !selected.remove(value) {
                selected.insert(value.clone());
            }
            self.recompute();
        }
    }

    /// Clear a column's multi-choice filter, letting every value through.
    pub fn clear_filter(&mut self, column: Column) {
        if let Some(selected) = self.selection.set_for_mut(column) {
            selected.clear();
            self.recompute();
        }
    }

    /// Write the current view model as pretty JSON.
    pub fn export_summary(&self, path: &Path) -> Result<()> {
        let view = self.view.as_ref().context("no dataset loaded")?;
        let json = serde_json::to_string_pretty(view).context("serializing summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use pemetaan::data::model::Table;

    fn state() -> AppState {
        let s = |v: &str| CellValue::from(v);
        let raw = Table::new(
            vec!["tahun".into(), "kota".into(), "penghasilan".into()],
            vec![
                vec![CellValue::Integer(2023), s("Medan"), CellValue::Integer(1_000_000)],
                vec![CellValue::Integer(2024), s("Solo"), CellValue::Integer(8_000_000)],
                vec![CellValue::Integer(2024), s("Medan"), CellValue::Integer(9_000_000)],
            ],
        );
        let mut state = AppState::default();
        state.set_dataset(Dataset::new(raw), PathBuf::from("siswa.xlsx"));
        state
    }

    #[test]
    fn test_loading_preselects_first_year() {
        let state = state();
        assert_eq!(state.selection.year, Some(CellValue::Integer(2023)));
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.filtered_rows, 1);
    }

    #[test]
    fn test_city_choices_follow_the_year() {
        let mut state = state();
        state.select_year(CellValue::Integer(2024));
        state.toggle_filter_value(Column::City, &CellValue::from("Solo"));
        state.toggle_filter_value(Column::City, &CellValue::from("Medan"));
        assert_eq!(state.view.as_ref().unwrap().filtered_rows, 2);

        // Solo has no rows in 2023, so it is no longer a valid choice.
        state.select_year(CellValue::Integer(2023));
        let medan: BTreeSet<_> = [CellValue::from("Medan")].into_iter().collect();
        assert_eq!(state.selection.cities, medan);
        assert_eq!(state.view.as_ref().unwrap().filtered_rows, 1);

        state.clear_filter(Column::City);
        assert!(state.selection.cities.is_empty());
    }

    #[test]
    fn test_export_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        state().export_summary(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["filtered_rows"], 1);
    }
}
