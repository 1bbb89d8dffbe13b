use std::collections::BTreeMap;

use serde::Serialize;

use super::bracket::{bin_income, IncomeBracket};
use crate::data::model::{CellValue, Column, Table};

/// Number of rows per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount<K> {
    pub category: K,
    pub count: usize,
}

/// Mean of a value column per group; `mean` is `None` when the group has
/// no non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub group: K,
    pub mean: Option<f64>,
}

/// Count rows per distinct non-missing value of `column`.
///
/// Ordered by count (highest first), ties by ascending category.
/// An absent column or an empty table yields an empty vector.
pub fn count_by(table: &Table, column: &str) -> Vec<CategoryCount<CellValue>> {
    let Some(idx) = table.index_of(column) else {
        return Vec::new();
    };
    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for row in &table.rows {
        let value = &row[idx];
        if !value.is_null() {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut out: Vec<CategoryCount<CellValue>> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.clone(),
            count,
        })
        .collect();
    // Stable sort keeps the ascending key order among equal counts.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Mean of `value_column` per distinct non-missing `group_column` value,
/// groups in ascending order.
pub fn mean_by(table: &Table, group_column: &str, value_column: &str) -> Vec<GroupMean<CellValue>> {
    let (Some(g), Some(v)) = (table.index_of(group_column), table.index_of(value_column)) else {
        return Vec::new();
    };
    let mut sums: BTreeMap<&CellValue, (f64, usize)> = BTreeMap::new();
    for row in &table.rows {
        let group = &row[g];
        if group.is_null() {
            continue;
        }
        let acc = sums.entry(group).or_insert((0.0, 0));
        if let Some(x) = row[v].as_f64() {
            acc.0 += x;
            acc.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(group, (sum, n))| GroupMean {
            group: group.clone(),
            mean: (n > 0).then(|| sum / n as f64),
        })
        .collect()
}

/// Bracket of every row's income, in row order (`None` for missing income).
fn row_brackets(table: &Table) -> Vec<(Option<IncomeBracket>, Option<f64>)> {
    let Some(idx) = table.index_of(Column::Income.name()) else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .map(|row| {
            let income = row[idx].as_f64();
            (bin_income(income), income)
        })
        .collect()
}

/// Rows per income bracket, in bracket order; empty brackets are omitted.
pub fn count_brackets(table: &Table) -> Vec<CategoryCount<IncomeBracket>> {
    let mut counts = [0usize; 5];
    for (bracket, _) in row_brackets(table) {
        if let Some(b) = bracket {
            counts[b as usize] += 1;
        }
    }
    IncomeBracket::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(&category, count)| CategoryCount { category, count })
        .collect()
}

/// Mean income per bracket, all five brackets in order.
pub fn mean_by_bracket(table: &Table) -> Vec<GroupMean<IncomeBracket>> {
    let mut sums = [(0.0f64, 0usize); 5];
    for (bracket, income) in row_brackets(table) {
        if let (Some(b), Some(x)) = (bracket, income) {
            sums[b as usize].0 += x;
            sums[b as usize].1 += 1;
        }
    }
    IncomeBracket::ALL
        .iter()
        .zip(sums)
        .map(|(&group, (sum, n))| GroupMean {
            group,
            mean: (n > 0).then(|| sum / n as f64),
        })
        .collect()
}
