//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::Serialize;
use std::fmt;

/// セルの値を表す列挙型
///
/// 日付セルはシリアル値（`Number`）として保持します。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 値を文字列として取得
    ///
    /// 整数値の数値は小数部なしで出力します（`123.0` -> `"123"`）。
    /// 非常に大きい・小さい数値は指数表記になります（`1e21` -> `"1e+21"`）。
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => number_to_text(*n),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }

    /// 値を数値として取得
    ///
    /// 文字列は前後の空白を除いてから解析し、空文字列は0、解析不能は`NaN`になります。
    pub fn as_number(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Error(_) => f64::NAN,
            CellValue::Empty => 0.0,
        }
    }
}

/// 数値を表示文字列に変換する
///
/// 桁は往復可能な最短表記、指数表記への切り替えは10進指数が21以上または-7以下の場合
/// （`1e21` -> `"1e+21"`、`1e-7` -> `"1e-7"`、`1e20` -> `"100000000000000000000"`）。
fn number_to_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n < 0.0 {
        return format!("-{}", number_to_text(-n));
    }

    // `{:e}`は最短表記の仮数部と指数を返す（例: "1.2345e3"）
    let sci = format!("{:e}", n);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // 小数点の位置（先頭桁の前からの桁数）
    let point = exponent + 1;

    if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int_part, frac_part) = digits.split_at(point as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let sign = if point - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, (point - 1).abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, (point - 1).abs())
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// スプレッドシートの1行
///
/// 位置0が商品記述子（"name price unit"）、位置1が数量です。
/// 空セルは読み込み時に詰められるため、位置は空でない値の順序を表します。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow(Vec<CellValue>);

impl RawRow {
    /// 新しい行を生成
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self(cells)
    }

    /// セル値のスライス
    pub fn cells(&self) -> &[CellValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 商品記述子（位置0）
    pub fn descriptor(&self) -> Option<&CellValue> {
        self.0.first()
    }

    /// 数量（位置1）
    pub fn quantity(&self) -> Option<&CellValue> {
        self.0.get(1)
    }
}

impl From<Vec<CellValue>> for RawRow {
    fn from(cells: Vec<CellValue>) -> Self {
        Self(cells)
    }
}

impl FromIterator<CellValue> for RawRow {
    fn from_iter<I: IntoIterator<Item = CellValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 記述子から抽出された商品データ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedItem {
    /// 商品名
    pub name: String,
    /// 価格（記述子中の数字列）
    pub price: Price,
    /// 通貨記号
    pub unit: String,
    /// 数量（数値に変換できない場合は`NaN`）
    pub quantity: f64,
}

/// 記述子中の数字列から得た価格
///
/// 桁数に上限はなく、先頭のゼロを除いた10進表記で保持します（`"007"` -> `7`）。
/// `u64`に収まらない価格も、行を捨てずにそのまま出力できます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    /// ASCII数字の列から価格を生成する（数字以外を含む場合は`None`）
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        Some(Price(if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `u64`に収まる場合はその値
    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Price(value.to_string())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 通貨記号から判定される国・地域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Country {
    /// 円記号（¥）
    Japan,
    /// ドル記号（$）
    Usa,
    /// ユーロ記号（€）
    Europe,
    /// 上記以外
    Unknown,
}

impl Country {
    /// 出力行に埋め込むラベル
    pub fn label(&self) -> &'static str {
        match self {
            Country::Japan => "ژاپن",
            Country::Usa => "امریکا",
            Country::Europe => "اروپا",
            Country::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 変換結果の1行
///
/// `name`フィールドには整形済みの行全体（"name price country"）が入ります。
/// 出力シートでは見出しのない1列として書き出されます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub name: String,
}

impl OutputRecord {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}
