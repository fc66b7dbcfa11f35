//! Line Aggregator Module
//!
//! 抽出済みの商品データを1行の表示文字列にまとめる。

use crate::classify::classify;
use crate::types::ParsedItem;

/// `"{name} {price} {country}"`形式の行を生成する
pub fn aggregate(item: &ParsedItem) -> String {
    let country = classify(&item.unit);
    format!("{} {} {}", item.name, item.price, country.label())
}
