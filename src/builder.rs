//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

use crate::api::{MatchMode, OutputFormat};
use crate::error::XlsxPriceError;
use crate::output::OutputFormatter;
use crate::parser::WorkbookReader;
use crate::pipeline;
use crate::types::{OutputRecord, RawRow};

/// 出力シートの既定名
pub const DEFAULT_SHEET_NAME: &str = "finalized";

/// Excelのシート名の最大長
const MAX_SHEET_NAME_LEN: usize = 31;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 記述子の照合方式
    pub match_mode: MatchMode,

    /// 先頭行を見出しとして読み飛ばすか
    pub skip_header: bool,

    /// 出力フォーマット
    pub output_format: OutputFormat,

    /// 出力シート名（XLSX形式）
    pub sheet_name: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Trimmed,
            skip_header: true,
            output_format: OutputFormat::Xlsx,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxprice::{ConverterBuilder, MatchMode, OutputFormat};
///
/// # fn main() -> Result<(), xlsxprice::XlsxPriceError> {
/// let converter = ConverterBuilder::new()
///     .with_match_mode(MatchMode::Legacy)
///     .with_output_format(OutputFormat::Csv)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 照合方式: `MatchMode::Trimmed`
    /// - 先頭行: 見出しとして読み飛ばす
    /// - 出力フォーマット: XLSX
    /// - 出力シート名: `finalized`
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 記述子の照合方式を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxprice::{ConverterBuilder, MatchMode};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_match_mode(MatchMode::Legacy);
    /// ```
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.config.match_mode = mode;
        self
    }

    /// 先頭行を見出しとして読み飛ばすかを指定する
    ///
    /// # 引数
    ///
    /// * `skip: bool`:
    ///   * `true`: 最初の空でない行を見出しとして扱い、変換対象から外す（デフォルト）
    ///   * `false`: すべての行を変換対象にする
    pub fn with_skip_header(mut self, skip: bool) -> Self {
        self.config.skip_header = skip;
        self
    }

    /// 出力フォーマットを指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxprice::{ConverterBuilder, OutputFormat};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_output_format(OutputFormat::Csv);
    /// ```
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 出力シート名を指定する（XLSX形式）
    ///
    /// # 制約
    ///
    /// * 1〜31文字
    /// * `[ ] : * ? / \` を含まない
    /// * 先頭・末尾がアポストロフィでない
    /// * 制約違反の場合、`build()`時に`XlsxPriceError::Config`を返す
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.sheet_name = name.into();
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合
    /// * `Err(XlsxPriceError::Config)`: 出力シート名が不正な場合
    pub fn build(self) -> Result<Converter, XlsxPriceError> {
        validate_sheet_name(&self.config.sheet_name)?;
        Ok(Converter::new(self.config))
    }
}

fn validate_sheet_name(name: &str) -> Result<(), XlsxPriceError> {
    if name.is_empty() {
        return Err(XlsxPriceError::Config("Sheet name is empty".to_string()));
    }

    let len = name.chars().count();
    if len > MAX_SHEET_NAME_LEN {
        return Err(XlsxPriceError::Config(format!(
            "Sheet name '{}' is longer than {} characters ({})",
            name, MAX_SHEET_NAME_LEN, len
        )));
    }

    if let Some(c) = name.chars().find(|c| "[]:*?/\\".contains(*c)) {
        return Err(XlsxPriceError::Config(format!(
            "Sheet name '{}' contains invalid character '{}'",
            name, c
        )));
    }

    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(XlsxPriceError::Config(format!(
            "Sheet name '{}' must not start or end with an apostrophe",
            name
        )));
    }

    Ok(())
}

/// 1ファイル分の変換結果の集計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConversionSummary {
    /// 読み込んだ行数
    pub total_rows: usize,
    /// 出力した行数（認識できた行数）
    pub converted_rows: usize,
}

/// 変換済みファイル
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    /// 出力ファイル名（入力ファイル名の拡張子を出力形式のものに置き換えた名前）
    pub file_name: String,
    /// 出力内容
    pub bytes: Vec<u8>,
    pub summary: ConversionSummary,
}

/// 変換処理のファサード
///
/// 読み込み（先頭シート）→ 行変換 → 書き出しを設定に従って実行します。
/// 設定は`build()`後に変更されません。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxprice::ConverterBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), xlsxprice::XlsxPriceError> {
/// let converter = ConverterBuilder::new().build()?;
/// let input = File::open("prices.xlsx")?;
/// let output = File::create("prices_converted.xlsx")?;
/// let summary = converter.convert(input, output)?;
/// println!("{}/{} rows converted", summary.converted_rows, summary.total_rows);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn match_mode(&self) -> MatchMode {
        self.config.match_mode
    }

    pub fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    /// スプレッドシートの先頭シートから行を読み込む
    ///
    /// シートが1つもないワークブックは空の列になります（エラーではありません）。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<RawRow>)` - 読み込んだ行
    /// * `Err(XlsxPriceError)` - 読み込み・解析に失敗した場合
    pub fn read_rows<R: Read>(&self, input: R) -> Result<Vec<RawRow>, XlsxPriceError> {
        let mut reader = WorkbookReader::open(input)?;
        reader.first_sheet_rows(self.config.skip_header)
    }

    /// 行をレコードに変換する（解析不能な行は除外）
    pub fn convert_rows(&self, rows: &[RawRow]) -> Vec<OutputRecord> {
        pipeline::convert_rows(rows, self.config.match_mode)
    }

    /// 認識できる行の数
    pub fn count_recognized(&self, rows: &[RawRow]) -> usize {
        pipeline::count_recognized(rows, self.config.match_mode)
    }

    /// レコードを設定された出力形式で書き出す
    pub fn write_records<W: Write>(
        &self,
        records: &[OutputRecord],
        mut output: W,
    ) -> Result<(), XlsxPriceError> {
        let formatter = OutputFormatter::from_format(self.config.output_format);
        formatter.render(records, &self.config.sheet_name, &mut output)
    }

    /// 読み込み済みの行を変換し、出力内容をバイト列として返す
    pub fn render_rows(
        &self,
        rows: &[RawRow],
    ) -> Result<(Vec<u8>, ConversionSummary), XlsxPriceError> {
        let records = self.convert_rows(rows);
        let mut bytes = Vec::new();
        self.write_records(&records, &mut bytes)?;

        let summary = ConversionSummary {
            total_rows: rows.len(),
            converted_rows: records.len(),
        };
        Ok((bytes, summary))
    }

    /// スプレッドシートを変換する
    ///
    /// # 処理フロー
    ///
    /// 1. 先頭シートの読み込み
    /// 2. 行の変換（解析不能な行は除外）
    /// 3. 出力形式に応じた書き出し
    ///
    /// 読み込みに失敗した場合、出力には何も書き込まれません。
    pub fn convert<R: Read, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<ConversionSummary, XlsxPriceError> {
        let rows = self.read_rows(input)?;
        let (bytes, summary) = self.render_rows(&rows)?;
        output.write_all(&bytes)?;
        output.flush()?;
        Ok(summary)
    }

    /// 入力ファイル名から出力ファイル名を求める
    ///
    /// 最後の拡張子を取り除き、出力形式の拡張子を付けます
    /// （`prices.xls` → `prices.xlsx`）。
    pub fn output_file_name(&self, input_name: &str) -> String {
        format!(
            "{}.{}",
            base_name(input_name),
            self.config.output_format.extension()
        )
    }

    /// 入力パスから出力ファイル名を求める
    pub fn output_path_name(&self, input_path: &Path) -> String {
        let input_name = input_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_file_name(&input_name)
    }

    /// ファイルを読み込んで変換する
    pub fn convert_path(&self, input_path: &Path) -> Result<ConvertedFile, XlsxPriceError> {
        let input = std::fs::File::open(input_path)?;
        let rows = self.read_rows(input)?;
        let (bytes, summary) = self.render_rows(&rows)?;

        let file_name = self.output_path_name(input_path);

        info!(
            input = %input_path.display(),
            output = %file_name,
            total = summary.total_rows,
            converted = summary.converted_rows,
            "converted file"
        );

        Ok(ConvertedFile {
            file_name,
            bytes,
            summary,
        })
    }
}

/// パスを除いたファイル名から最後の拡張子を取り除く
pub(crate) fn base_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
