//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxpriceクレート全体で使用するエラー型
///
/// 行単位の解析失敗はエラーではありません（出力から除外されるだけです）。
/// このエラー型が表すのは、ファイル単位の失敗と設定の不備です。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Parse`: スプレッドシートの解析中に発生したエラー（calamine由来）
/// - `Write`: 変換結果のXLSX書き出しに失敗したエラー（rust_xlsxwriter由来）
/// - `Zip`: 変換結果のZIPバンドル作成に失敗したエラー
/// - `Json`: レポートのシリアライズに失敗したエラー
/// - `Config`: 設定の検証に失敗したエラー
/// - `UnknownItem`: セッションに存在しないアイテムIDが指定されたエラー
/// - `SecurityViolation`: 入力サイズ上限などの制限違反
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxprice::XlsxPriceError;
/// use std::fs::File;
///
/// fn open_listing(path: &str) -> Result<(), XlsxPriceError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxPriceError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイル、サポートされていない形式などが
    /// 原因となります。
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// 変換結果のXLSX書き出しエラー
    #[error("Failed to write spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// ZIPアーカイブの作成エラー
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSONシリアライズエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、出力シート名がExcelの命名規則に違反している場合です。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsxprice::{ConverterBuilder, XlsxPriceError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_sheet_name("bad/name")
    ///     .build();
    ///
    /// match result {
    ///     Err(XlsxPriceError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セッション内に存在しないアイテム
    #[error("Unknown item id: {0}")]
    UnknownItem(u64),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限超過や、ZIPバンドルのメンバー名が
    /// 安全でない場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
