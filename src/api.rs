//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 商品記述子の照合方式
///
/// 記述子（例: `"product 123 $"`）から商品名・価格・通貨記号を取り出す際の
/// パターンを指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum MatchMode {
    /// 最初の数字列全体を価格とし、前後の文字列をtrimして商品名・通貨記号とする（デフォルト）
    ///
    /// # 出力例
    ///
    /// `"product 123 $"` → 商品名 `product`、価格 `123`、通貨記号 `$`
    #[default]
    Trimmed,

    /// 従来のパターン `(.+?)\s*?(\d+)\s*?(.+?)` をそのまま適用する
    ///
    /// 最短一致の量指定子のため、通貨記号は常に1文字になり、
    /// 数字列の直後が空白なら空白が通貨記号として扱われます。
    /// 記述子の末尾が数字の場合、価格は最後の1桁を除いた数字列になります。
    ///
    /// # 出力例
    ///
    /// - `"product 123$"` → 商品名 `product`、価格 `123`、通貨記号 `$`
    /// - `"product 123 $"` → 商品名 `product`、価格 `123`、通貨記号 `" "`
    /// - `"widget 99"` → 商品名 `widget`、価格 `9`、通貨記号 `9`
    Legacy,
}

/// 変換結果の出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// XLSX形式（デフォルト）
    ///
    /// 見出しなしの1列だけを持つワークシートを出力します。
    #[default]
    Xlsx,

    /// CSV形式
    ///
    /// 1レコード1行で出力します。カンマ・改行・ダブルクォートを含む値は
    /// ダブルクォートで囲みます。
    Csv,
}

impl OutputFormat {
    /// 出力ファイルの拡張子（ドットなし）
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}
