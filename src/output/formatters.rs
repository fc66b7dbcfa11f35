//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use rust_xlsxwriter::Workbook;
use std::io::Write;

use crate::error::XlsxPriceError;
use crate::types::OutputRecord;

/// XLSX形式のフォーマッター
pub struct XlsxFormatter;

impl XlsxFormatter {
    /// 見出しなしの1列としてレコードを書き出す
    pub fn render<W: Write>(
        &self,
        records: &[OutputRecord],
        sheet_name: &str,
        writer: &mut W,
    ) -> Result<(), XlsxPriceError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (row_idx, record) in records.iter().enumerate() {
            let row = u32::try_from(row_idx).map_err(|_| {
                XlsxPriceError::Config(format!("Too many rows for a worksheet: {}", records.len()))
            })?;
            worksheet.write_string(row, 0, &record.name)?;
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        writer.flush()?;

        Ok(())
    }
}

/// CSV形式のフォーマッター
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(
        &self,
        records: &[OutputRecord],
        writer: &mut W,
    ) -> Result<(), XlsxPriceError> {
        for record in records {
            writeln!(writer, "{}", escape_csv(&record.name))?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// CSV文字列をエスケープ
///
/// ダブルクォート、改行、カンマを含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
