//! Row Extractor Module
//!
//! 商品記述子（"name price unit"）を商品名・価格・通貨記号に分解するモジュール。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::MatchMode;
use crate::types::{CellValue, ParsedItem, Price, RawRow};

/// 最初の数字列全体を価格として取り出すパターン
static TRIMMED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.*?)\s*([0-9]+)\s*(.*)$").expect("valid trimmed pattern"));

/// 従来パターン。`.`は改行類（\n, \r, U+2028, U+2029）以外の1文字。
static LEGACY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([^\n\r\x{2028}\x{2029}]+?)\s*?([0-9]+)\s*?([^\n\r\x{2028}\x{2029}]+?)")
        .expect("valid legacy pattern")
});

/// 記述子から取り出した3つの部分文字列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DescriptorFields<'a> {
    pub name: &'a str,
    pub digits: &'a str,
    pub unit: &'a str,
}

/// 記述子をパターンに照合する
///
/// 照合に失敗した場合、または3つのグループがすべて空の場合は`None`を返します。
pub(crate) fn match_descriptor(descriptor: &str, mode: MatchMode) -> Option<DescriptorFields<'_>> {
    let fields = match mode {
        MatchMode::Trimmed => {
            let caps = TRIMMED_PATTERN.captures(descriptor)?;
            DescriptorFields {
                name: caps.get(1).map_or("", |m| m.as_str()).trim(),
                digits: caps.get(2).map_or("", |m| m.as_str()),
                unit: caps.get(3).map_or("", |m| m.as_str()).trim(),
            }
        }
        MatchMode::Legacy => {
            let caps = LEGACY_PATTERN.captures(descriptor)?;
            DescriptorFields {
                name: caps.get(1).map_or("", |m| m.as_str()),
                digits: caps.get(2).map_or("", |m| m.as_str()),
                unit: caps.get(3).map_or("", |m| m.as_str()),
            }
        }
    };

    if fields.name.is_empty() && fields.digits.is_empty() && fields.unit.is_empty() {
        return None;
    }
    Some(fields)
}

/// 行から商品データを抽出する
///
/// # 引数
///
/// * `row` - 位置0に記述子、位置1に数量を持つ行
/// * `mode` - 記述子の照合方式
///
/// # 戻り値
///
/// * `Some(ParsedItem)` - 抽出に成功した場合
/// * `None` - 解析不能な行（2要素未満、パターン不一致）
///
/// 価格の桁数に上限はなく、照合に成功した行は捨てません。
pub fn extract(row: &RawRow, mode: MatchMode) -> Option<ParsedItem> {
    if row.len() < 2 {
        return None;
    }

    let descriptor = row.descriptor()?.as_text();
    let fields = match_descriptor(&descriptor, mode)?;

    let price = Price::from_digits(fields.digits)?;

    let quantity = row.quantity().map_or(f64::NAN, CellValue::as_number);

    Some(ParsedItem {
        name: fields.name.to_string(),
        price,
        unit: fields.unit.to_string(),
        quantity,
    })
}

/// 行が抽出可能かどうかを判定する（認識済み行数の集計用）
pub fn is_recognized(row: &RawRow, mode: MatchMode) -> bool {
    extract(row, mode).is_some()
}
