//! Preview Module
//!
//! 先頭数行をテキストの表として表示する。
//! 列幅は表示幅（全角文字は2）で計算する。

use std::io::Write;
use unicode_width::UnicodeWidthStr;

use crate::error::XlsxPriceError;
use crate::types::{OutputRecord, RawRow};

/// 最小列幅
const MIN_COL_WIDTH: usize = 3;

/// 行を表として出力する
///
/// 見出しは`Col 1`, `Col 2`, ...で、列数は最も長い行に合わせます。
/// 行が1つもない場合は`No preview`を出力します。
pub fn render_rows<W: Write>(rows: &[RawRow], writer: &mut W) -> Result<(), XlsxPriceError> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.cells().iter().map(|cell| cell.as_text()).collect())
        .collect();
    render_table(&cells, writer)
}

/// 変換結果を1列の表として出力する
pub fn render_records<W: Write>(
    records: &[OutputRecord],
    writer: &mut W,
) -> Result<(), XlsxPriceError> {
    let cells: Vec<Vec<String>> = records.iter().map(|r| vec![r.name.clone()]).collect();
    render_table(&cells, writer)
}

fn render_table<W: Write>(cells: &[Vec<String>], writer: &mut W) -> Result<(), XlsxPriceError> {
    let cols = cells.iter().map(Vec::len).max().unwrap_or(0);
    if cols == 0 {
        writeln!(writer, "No preview")?;
        return Ok(());
    }

    let headers: Vec<String> = (1..=cols).map(|i| format!("Col {}", i)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width().max(MIN_COL_WIDTH)).collect();
    for row in cells {
        for (col_idx, cell) in row.iter().enumerate() {
            widths[col_idx] = widths[col_idx].max(cell_text(cell).width());
        }
    }

    write_row(writer, &headers, &widths)?;
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(writer, &separator, &widths)?;
    for row in cells {
        write_row(writer, row, &widths)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_row<W: Write>(
    writer: &mut W,
    row: &[String],
    widths: &[usize],
) -> Result<(), XlsxPriceError> {
    write!(writer, "|")?;
    for (col_idx, width) in widths.iter().enumerate() {
        let content = row.get(col_idx).map(|c| cell_text(c)).unwrap_or("");
        let padding = width.saturating_sub(content.width());
        write!(writer, " {}{} |", content, " ".repeat(padding))?;
    }
    writeln!(writer)?;
    Ok(())
}

/// セル内の改行は表を崩すので、最初の行だけを表示する
fn cell_text(cell: &str) -> &str {
    cell.lines().next().unwrap_or("").trim()
}

/// バイト数を読みやすい単位に変換する（例: `1536` -> `1.5 KB`）
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn render(rows: &[RawRow]) -> String {
        let mut output = Vec::new();
        render_rows(rows, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "No preview\n");
    }

    #[test]
    fn test_render_rows_aligned() {
        let rows = vec![
            RawRow::from(vec![CellValue::from("product 123 $"), CellValue::Number(10.0)]),
            RawRow::from(vec![CellValue::from("pen 3 €")]),
        ];
        let table = render(&rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Col 1         | Col 2 |");
        assert_eq!(lines[1], "| ------------- | ----- |");
        assert_eq!(lines[2], "| product 123 $ | 10    |");
        assert_eq!(lines[3], "| pen 3 €       |       |");
    }

    #[test]
    fn test_render_wide_characters() {
        let rows = vec![RawRow::from(vec![CellValue::from("日本茶 40 ¥")])];
        let table = render(&rows);
        let lines: Vec<&str> = table.lines().collect();

        // "日本茶 40 ¥" は表示幅11
        assert_eq!(lines[1], "| ----------- |");
        assert_eq!(lines[0].width(), lines[2].width());
    }

    #[test]
    fn test_render_records() {
        let mut output = Vec::new();
        render_records(&[OutputRecord::new("tea 40 Unknown".to_string())], &mut output).unwrap();
        let table = String::from_utf8(output).unwrap();
        assert!(table.contains("| tea 40 Unknown |"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
