//! Workbook Reader
//!
//! calamineを使用して、先頭シートの行を`RawRow`の列として取り出します。

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::{Cursor, Read};
use tracing::debug;

use crate::error::XlsxPriceError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, RawRow};

/// ワークブックリーダー
///
/// calamineのラッパーとして、形式を自動判定して開いたワークブックを保持します
/// （xlsx, xlsm, xlsb, xls, ods）。
pub(crate) struct WorkbookReader {
    sheets: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookReader {
    /// ワークブックを開く
    ///
    /// # 引数
    ///
    /// * `reader` - スプレッドシートを読み込むためのリーダー
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookReader)` - ワークブックの読み込みに成功した場合
    /// * `Err(XlsxPriceError::SecurityViolation)` - 入力サイズが上限を超えた場合
    /// * `Err(XlsxPriceError::Parse)` - スプレッドシートとして解析できない場合
    pub fn open<R: Read>(mut reader: R) -> Result<Self, XlsxPriceError> {
        let security_config = SecurityConfig::default();

        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;
        security_config.check_input_size(bytes_read as u64)?;

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { sheets })
    }

    /// 先頭シートの行を取得
    ///
    /// 空セルは詰めて、すべて空の行は読み飛ばします。
    /// `skip_header`が`true`の場合、最初の空でない行は見出しとして扱い出力しません。
    /// シートが1つもない場合は空の列を返します。
    pub fn first_sheet_rows(&mut self, skip_header: bool) -> Result<Vec<RawRow>, XlsxPriceError> {
        let range = match self.sheets.worksheet_range_at(0).transpose()? {
            Some(range) => range,
            None => {
                debug!("workbook has no sheets");
                return Ok(Vec::new());
            }
        };

        let rows: Vec<RawRow> = range
            .rows()
            .filter_map(compact_row)
            .skip(usize::from(skip_header))
            .collect();

        let sheet = self.sheets.sheet_names().into_iter().next().unwrap_or_default();
        debug!(sheet = %sheet, rows = rows.len(), skip_header, "read first sheet");
        Ok(rows)
    }
}

/// 空セルを除いた行を生成（すべて空なら`None`）
fn compact_row(cells: &[Data]) -> Option<RawRow> {
    let row: RawRow = cells
        .iter()
        .map(convert_cell)
        .filter(|value| !value.is_empty())
        .collect();

    if row.is_empty() {
        None
    } else {
        Some(row)
    }
}

/// calamineのセル値を`CellValue`に変換
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        _ => CellValue::Empty,
    }
}
