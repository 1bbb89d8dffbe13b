use super::model::{CellValue, Column, Table};

// ---------------------------------------------------------------------------
// Schema normalization
// ---------------------------------------------------------------------------

/// Uppercase + trim every header, then coerce the income column to numbers.
///
/// Never fails: a cell that cannot be read as a number becomes `Null`.
/// Normalizing an already normalized table returns an identical table.
pub fn normalize_table(raw: &Table) -> Table {
    let columns: Vec<String> = raw
        .columns
        .iter()
        .map(|c| c.trim().to_uppercase())
        .collect();

    let mut table = Table {
        columns,
        rows: raw.rows.clone(),
    };

    if let Some(idx) = table.index_of(Column::Income.name()) {
        let mut coerced = 0usize;
        for row in &mut table.rows {
            let cell = &mut row[idx];
            let value = coerce_numeric(cell);
            if value.is_null() && !cell.is_null() {
                coerced += 1;
            }
            *cell = value;
        }
        if coerced > 0 {
            log::warn!(
                "{coerced} {} value(s) could not be read as numbers and are treated as missing",
                Column::Income
            );
        }
    }

    table
}

/// Numeric coercion for a single cell; anything unreadable becomes `Null`.
pub fn coerce_numeric(cell: &CellValue) -> CellValue {
    let number = match cell {
        CellValue::Float(v) => Some(*v),
        CellValue::Integer(i) => Some(*i as f64),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::String(s) => s.trim().parse::<f64>().ok(),
        CellValue::Date(_) | CellValue::Null => None,
    };
    match number {
        Some(v) if v.is_finite() => CellValue::Float(v),
        _ => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table() -> Table {
        Table::new(
            vec!["  tahun".into(), "Kota ".into(), " penghasilan ".into()],
            vec![
                vec![2023i64.into(), "Medan".into(), "1500000".into()],
                vec![2023i64.into(), "Bandung".into(), "n/a".into()],
                vec![2024i64.into(), "Medan".into(), 2_500_000i64.into()],
                vec![2024i64.into(), CellValue::Null, CellValue::Null],
                vec![2024i64.into(), "Solo".into(), CellValue::Bool(true)],
            ],
        )
    }

    #[test]
    fn test_headers_are_uppercased_and_trimmed() {
        let table = normalize_table(&raw_table());
        assert_eq!(table.columns, vec!["TAHUN", "KOTA", "PENGHASILAN"]);
    }

    #[test]
    fn test_income_is_coerced_to_float_or_missing() {
        let table = normalize_table(&raw_table());
        let income: Vec<_> = (0..table.len())
            .map(|r| table.value(r, "PENGHASILAN").cloned())
            .collect();
        assert_eq!(
            income,
            vec![
                Some(CellValue::Float(1_500_000.0)),
                Some(CellValue::Null),
                Some(CellValue::Float(2_500_000.0)),
                Some(CellValue::Null),
                Some(CellValue::Float(1.0)),
            ]
        );
        // Other columns keep their original types.
        assert_eq!(table.value(0, "TAHUN"), Some(&CellValue::Integer(2023)));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_table(&raw_table());
        let twice = normalize_table(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_table_without_income_is_left_alone() {
        let raw = Table::new(vec!["kelas".into()], vec![vec!["7A".into()]]);
        let table = normalize_table(&raw);
        assert_eq!(table.columns, vec!["KELAS"]);
        assert_eq!(table.rows, raw.rows);
    }

    #[test]
    fn test_coerce_numeric_rejects_non_finite_and_dates() {
        assert_eq!(coerce_numeric(&"inf".into()), CellValue::Null);
        assert_eq!(coerce_numeric(&CellValue::Float(f64::NAN)), CellValue::Null);
        assert_eq!(
            coerce_numeric(&CellValue::Date("2024-01-01".into())),
            CellValue::Null
        );
        assert_eq!(coerce_numeric(&" 42 ".into()), CellValue::Float(42.0));
    }

    use proptest::prelude::*;

    fn arb_income() -> impl Strategy<Value = CellValue> {
        prop_oneof![
            Just(CellValue::Null),
            any::<i64>().prop_map(CellValue::Integer),
            any::<f64>().prop_map(CellValue::Float),
            any::<bool>().prop_map(CellValue::Bool),
            "[ 0-9.e+-]{0,10}".prop_map(|s| CellValue::String(s)),
            "[a-z/ ]{0,6}".prop_map(|s| CellValue::String(s)),
        ]
    }

    fn arb_raw_table() -> impl Strategy<Value = Table> {
        let header = prop_oneof![
            Just(" penghasilan ".to_string()),
            Just("Kota".to_string()),
            "[ a-zA-Z]{0,8}",
        ];
        let row = (arb_income(), "[A-Za-z]{0,5}", any::<i64>());
        (
            header,
            prop::collection::vec(row, 0..16),
        )
            .prop_map(|(name, rows)| {
                Table::new(
                    vec!["Penghasilan".into(), name, "tahun".into()],
                    rows.into_iter()
                        .map(|(income, text, year)| {
                            vec![income, CellValue::String(text), CellValue::Integer(year)]
                        })
                        .collect(),
                )
            })
    }

    proptest! {
        #[test]
        fn prop_normalizing_twice_equals_once(raw in arb_raw_table()) {
            let once = normalize_table(&raw);
            let twice = normalize_table(&once);
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn prop_income_is_finite_or_missing(raw in arb_raw_table()) {
            let table = normalize_table(&raw);
            for row in &table.rows {
                match &row[0] {
                    CellValue::Null => {}
                    CellValue::Float(v) => prop_assert!(v.is_finite()),
                    other => prop_assert!(false, "unexpected income cell {:?}", other),
                }
            }
        }
    }
}

