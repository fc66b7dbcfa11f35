//! Session Module
//!
//! アップロード → 変換 → ダウンロードの対話的な流れを、UIに依存しない形で表現する。
//! 各アイテムの状態は`ItemStatus`で管理し、変換の開始と結果によってのみ遷移する。

use serde::Serialize;
use tracing::{info, warn};

use crate::builder::{base_name, ConvertedFile, Converter};
use crate::error::XlsxPriceError;
use crate::output::bundle_to_vec;
use crate::pipeline::{preview_rows, DEFAULT_PREVIEW_ROWS};
use crate::types::{OutputRecord, RawRow};

/// セッション内のアイテムID
pub type ItemId = u64;

/// アイテムの変換状態
///
/// ```text
/// Ready ──▶ Converting ──▶ Done
///              │  ▲          │
///              ▼  └──────────┘ (再変換)
///            Error ──▶ Converting
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Ready,
    Converting,
    Done,
    Error,
}

impl ItemStatus {
    /// 変換を開始できる状態か
    pub fn can_convert(&self) -> bool {
        !matches!(self, ItemStatus::Converting)
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Ready => "Ready",
            ItemStatus::Converting => "Converting…",
            ItemStatus::Done => "Converted",
            ItemStatus::Error => "Error",
        }
    }
}

/// アップロードされた1ファイル
#[derive(Debug, Clone)]
pub struct SessionItem {
    pub id: ItemId,
    /// アップロード時のファイル名
    pub file_name: String,
    /// 拡張子を除いた名前
    pub name: String,
    /// 入力のバイト数
    pub size: usize,
    pub rows: Vec<RawRow>,
    pub status: ItemStatus,
    /// 認識できる行の数
    pub recognized: usize,
    pub result: Option<ConvertedFile>,
}

impl SessionItem {
    /// 元データのプレビュー（先頭5行）
    pub fn preview(&self) -> &[RawRow] {
        preview_rows(&self.rows, DEFAULT_PREVIEW_ROWS)
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }
}

/// 変換セッション
#[derive(Debug)]
pub struct Session {
    converter: Converter,
    items: Vec<SessionItem>,
    next_id: ItemId,
}

impl Session {
    pub fn new(converter: Converter) -> Self {
        Self {
            converter,
            items: Vec::new(),
            next_id: 1,
        }
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn items(&self) -> &[SessionItem] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&SessionItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// ファイルを追加する
    ///
    /// スプレッドシートとして読み込めない場合はエラーを返し、アイテムは追加されません。
    pub fn add_file(
        &mut self,
        file_name: impl Into<String>,
        bytes: &[u8],
    ) -> Result<ItemId, XlsxPriceError> {
        let file_name = file_name.into();
        let rows = self.converter.read_rows(bytes)?;
        let recognized = self.converter.count_recognized(&rows);

        let id = self.next_id;
        self.next_id += 1;

        info!(
            id,
            file = %file_name,
            recognized,
            total = rows.len(),
            "added file"
        );

        self.items.push(SessionItem {
            id,
            name: base_name(&file_name),
            file_name,
            size: bytes.len(),
            rows,
            status: ItemStatus::Ready,
            recognized,
            result: None,
        });
        Ok(id)
    }

    /// 1アイテムを変換する
    ///
    /// 変換に失敗したアイテムは`Error`になり、変換結果は保持されません。
    /// 失敗は他のアイテムに影響しません。
    pub fn convert_one(&mut self, id: ItemId) -> Result<ItemStatus, XlsxPriceError> {
        let converter = &self.converter;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(XlsxPriceError::UnknownItem(id))?;

        if !item.status.can_convert() {
            return Ok(item.status);
        }
        item.status = ItemStatus::Converting;

        match converter.render_rows(&item.rows) {
            Ok((bytes, summary)) => {
                item.result = Some(ConvertedFile {
                    file_name: converter.output_file_name(&item.file_name),
                    bytes,
                    summary,
                });
                item.status = ItemStatus::Done;
                info!(id, name = %item.name, converted = summary.converted_rows, "converted item");
            }
            Err(e) => {
                item.result = None;
                item.status = ItemStatus::Error;
                warn!(id, name = %item.name, error = %e, "failed to convert item");
            }
        }

        Ok(item.status)
    }

    /// 未変換のアイテムをすべて変換する（`Done`のアイテムは飛ばす）
    ///
    /// 戻り値は変換に成功したアイテム数です。
    pub fn convert_all(&mut self) -> usize {
        let pending: Vec<ItemId> = self
            .items
            .iter()
            .filter(|item| item.status != ItemStatus::Done)
            .map(|item| item.id)
            .collect();

        pending
            .into_iter()
            .filter(|id| matches!(self.convert_one(*id), Ok(ItemStatus::Done)))
            .count()
    }

    /// 変換済みアイテムの変換結果プレビュー（先頭5行）
    pub fn converted_preview(&self, id: ItemId) -> Option<Vec<OutputRecord>> {
        let item = self.get(id)?;
        item.result.as_ref()?;
        let mut records = self.converter.convert_rows(&item.rows);
        records.truncate(DEFAULT_PREVIEW_ROWS);
        Some(records)
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn converted_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == ItemStatus::Done)
            .count()
    }

    /// 変換済みアイテムの割合（0〜100）
    pub fn progress(&self) -> u8 {
        if self.items.is_empty() {
            return 0;
        }
        let percent = (self.converted_count() as f64 / self.items.len() as f64) * 100.0;
        percent.round() as u8
    }

    /// 変換結果を持つアイテムのファイル
    pub fn results(&self) -> impl Iterator<Item = &ConvertedFile> {
        self.items.iter().filter_map(|item| item.result.as_ref())
    }

    /// 変換結果をZIPにまとめる（結果が1つもない場合は`None`）
    pub fn bundle(&self) -> Result<Option<Vec<u8>>, XlsxPriceError> {
        let entries: Vec<(&str, &[u8])> = self
            .results()
            .map(|file| (file.file_name.as_str(), file.bytes.as_slice()))
            .collect();

        if entries.is_empty() {
            return Ok(None);
        }
        bundle_to_vec(&entries).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ConverterBuilder;

    #[test]
    fn test_status_transitions_allowed() {
        assert!(ItemStatus::Ready.can_convert());
        assert!(ItemStatus::Done.can_convert());
        assert!(ItemStatus::Error.can_convert());
        assert!(!ItemStatus::Converting.can_convert());
    }

    #[test]
    fn test_status_labels_and_serialization() {
        assert_eq!(ItemStatus::Done.label(), "Converted");
        assert_eq!(
            serde_json::to_string(&ItemStatus::Converting).unwrap(),
            "\"converting\""
        );
    }

    #[test]
    fn test_empty_session() {
        let session = Session::new(ConverterBuilder::new().build().unwrap());
        assert_eq!(session.progress(), 0);
        assert_eq!(session.converted_count(), 0);
        assert!(session.bundle().unwrap().is_none());
    }

    #[test]
    fn test_add_unreadable_file_is_rejected() {
        let mut session = Session::new(ConverterBuilder::new().build().unwrap());
        let result = session.add_file("broken.xlsx", b"garbage");
        assert!(result.is_err());
        assert!(session.items().is_empty());
    }

    #[test]
    fn test_unknown_item() {
        let mut session = Session::new(ConverterBuilder::new().build().unwrap());
        assert!(matches!(
            session.convert_one(7),
            Err(XlsxPriceError::UnknownItem(7))
        ));
        assert!(!session.remove(7));
        assert!(session.converted_preview(7).is_none());
    }
}
