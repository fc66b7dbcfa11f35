//! Property Tests
//!
//! 記述子の抽出と行変換の性質をproptestで検証します。

use proptest::prelude::*;
use xlsxprice::{aggregate, classify, convert_rows, extract, CellValue, MatchMode, RawRow};

fn row(descriptor: &str, quantity: f64) -> RawRow {
    RawRow::from(vec![CellValue::from(descriptor), CellValue::from(quantity)])
}

fn match_mode() -> impl Strategy<Value = MatchMode> {
    prop_oneof![Just(MatchMode::Trimmed), Just(MatchMode::Legacy)]
}

fn any_row() -> impl Strategy<Value = RawRow> {
    let cell = prop_oneof![
        any::<String>().prop_map(CellValue::from),
        any::<f64>().prop_map(CellValue::from),
        any::<bool>().prop_map(CellValue::from),
    ];
    prop::collection::vec(cell, 0..4).prop_map(RawRow::from)
}

proptest! {
    /// 数字を含まない記述子は認識されない
    #[test]
    fn no_digits_never_matches(descriptor in "[a-zA-Z $€¥£-]{0,24}", mode in match_mode()) {
        prop_assert!(extract(&row(&descriptor, 1.0), mode).is_none());
    }

    /// "名前 価格 単位" は前後の空白を除いてそのまま分解される
    #[test]
    fn trimmed_splits_descriptor(
        name in "[a-z]{1,8}( [a-z]{1,8})?",
        price in 0u64..10_000_000_000,
        unit in "[$€¥£]?",
        quantity in -1e6f64..1e6,
    ) {
        let descriptor = format!("  {} {} {} ", name, price, unit);
        let item = extract(&row(&descriptor, quantity), MatchMode::Trimmed).unwrap();

        prop_assert_eq!(&item.name, &name);
        prop_assert_eq!(item.price.to_u64(), Some(price));
        prop_assert_eq!(&item.unit, &unit);
        prop_assert_eq!(item.quantity, quantity);

        let expected = format!("{} {} {}", name, price, classify(&unit).label());
        prop_assert_eq!(aggregate(&item), expected);
    }

    /// 任意の行で変換はパニックせず、入力より多くの行を出力しない
    #[test]
    fn convert_rows_is_total(rows in prop::collection::vec(any_row(), 0..16), mode in match_mode()) {
        let records = convert_rows(&rows, mode);
        prop_assert!(records.len() <= rows.len());
    }

    /// 同じ入力からは同じ出力
    #[test]
    fn convert_rows_is_deterministic(rows in prop::collection::vec(any_row(), 0..16), mode in match_mode()) {
        prop_assert_eq!(convert_rows(&rows, mode), convert_rows(&rows, mode));
    }

    /// 出力は認識できた行だけを入力順に並べたもの
    #[test]
    fn convert_rows_keeps_recognized_in_order(rows in prop::collection::vec(any_row(), 0..16)) {
        let expected: Vec<String> = rows
            .iter()
            .filter_map(|r| extract(r, MatchMode::Trimmed))
            .map(|item| aggregate(&item))
            .collect();
        let actual: Vec<String> = convert_rows(&rows, MatchMode::Trimmed)
            .into_iter()
            .map(|record| record.name)
            .collect();
        prop_assert_eq!(actual, expected);
    }
}
