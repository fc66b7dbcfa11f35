//! Pipeline Module
//!
//! 行の抽出 → 解析不能行の除外 → 行の整形 → レコード化を順に適用する。

use tracing::debug;

use crate::aggregate::aggregate;
use crate::api::MatchMode;
use crate::extract::{extract, is_recognized};
use crate::types::{OutputRecord, RawRow};

/// プレビューで表示する既定の行数
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// 行の列を変換レコードの列に変換する
///
/// 入力順を保持し、重複排除や並べ替えは行いません。
/// 解析不能な行は黙って除外されます。
pub fn convert_rows(rows: &[RawRow], mode: MatchMode) -> Vec<OutputRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let item = extract(row, mode);
            if item.is_none() {
                debug!(row = idx, "skipping unparsable row");
            }
            item
        })
        .map(|item| OutputRecord::new(aggregate(&item)))
        .collect()
}

/// 抽出可能な行の数を数える
pub fn count_recognized(rows: &[RawRow], mode: MatchMode) -> usize {
    rows.iter().filter(|row| is_recognized(row, mode)).count()
}

/// 先頭`max`行を返す
pub fn preview_rows(rows: &[RawRow], max: usize) -> &[RawRow] {
    &rows[..rows.len().min(max)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn row(descriptor: &str, quantity: f64) -> RawRow {
        RawRow::from(vec![CellValue::from(descriptor), CellValue::Number(quantity)])
    }

    #[test]
    fn test_convert_empty() {
        assert!(convert_rows(&[], MatchMode::Trimmed).is_empty());
        assert_eq!(count_recognized(&[], MatchMode::Trimmed), 0);
    }

    #[test]
    fn test_convert_end_to_end() {
        let rows = vec![row("product 123 $", 10.0), row("widget 99 €", 2.0)];
        let records = convert_rows(&rows, MatchMode::Trimmed);

        assert_eq!(
            records,
            vec![
                OutputRecord::new("product 123 امریکا".to_string()),
                OutputRecord::new("widget 99 اروپا".to_string()),
            ]
        );
    }

    #[test]
    fn test_convert_end_to_end_legacy() {
        let rows = vec![row("product 123 $", 10.0), row("widget 99€", 2.0)];
        let records = convert_rows(&rows, MatchMode::Legacy);

        assert_eq!(records[0].name, "product 123 Unknown");
        assert_eq!(records[1].name, "widget 99 اروپا");
    }

    #[test]
    fn test_unparsable_row_dropped() {
        let rows = vec![row("no-digits-here", 5.0), row("tea 40 ¥", 1.0)];
        let records = convert_rows(&rows, MatchMode::Trimmed);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "tea 40 ژاپن");
        assert_eq!(count_recognized(&rows, MatchMode::Trimmed), 1);
    }

    #[test]
    fn test_short_rows_do_not_panic() {
        let rows = vec![
            RawRow::default(),
            RawRow::from(vec![CellValue::from("pen 3 $")]),
            row("pen 3 $", 1.0),
        ];
        let records = convert_rows(&rows, MatchMode::Trimmed);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_order_preserved_and_duplicates_kept() {
        let rows = vec![row("b 2 $", 1.0), row("a 1 $", 1.0), row("b 2 $", 1.0)];
        let names: Vec<String> = convert_rows(&rows, MatchMode::Trimmed)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["b 2 امریکا", "a 1 امریکا", "b 2 امریکا"]);
    }

    #[test]
    fn test_convert_is_idempotent() {
        let rows = vec![row("product 123 $", 10.0), row("x", 1.0), row("scarf 15 £", 3.0)];
        assert_eq!(
            convert_rows(&rows, MatchMode::Trimmed),
            convert_rows(&rows, MatchMode::Trimmed)
        );
    }

    #[test]
    fn test_preview_rows() {
        let rows: Vec<RawRow> = (0..8).map(|i| row(&format!("item {} $", i), 1.0)).collect();
        assert_eq!(preview_rows(&rows, DEFAULT_PREVIEW_ROWS).len(), 5);
        assert_eq!(preview_rows(&rows[..3], DEFAULT_PREVIEW_ROWS).len(), 3);
        assert!(preview_rows(&rows, 0).is_empty());
    }
}
