//! Output Format Module
//!
//! 出力フォーマットの抽象化と、ZIPバンドルを提供するモジュール。

mod bundle;
mod formatters;

use crate::api::OutputFormat;
use crate::error::XlsxPriceError;
use crate::types::OutputRecord;
use std::io::Write;

pub use bundle::{bundle_to_vec, write_bundle, BUNDLE_FILE_NAME};
pub use formatters::*;

/// 出力フォーマッター
#[derive(Debug, Clone, Copy)]
pub enum OutputFormatter {
    Xlsx,
    Csv,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xlsx => OutputFormatter::Xlsx,
            OutputFormat::Csv => OutputFormatter::Csv,
        }
    }

    /// レコードを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `records` - 出力するレコード
    /// * `sheet_name` - 出力シート名（XLSX形式で使用）
    /// * `writer` - 出力先のライター
    pub fn render<W: Write>(
        &self,
        records: &[OutputRecord],
        sheet_name: &str,
        writer: &mut W,
    ) -> Result<(), XlsxPriceError> {
        match self {
            OutputFormatter::Xlsx => XlsxFormatter.render(records, sheet_name, writer),
            OutputFormatter::Csv => CsvFormatter.render(records, writer),
        }
    }
}
