//! ZIP Bundle
//!
//! 複数の変換結果を1つのZIPアーカイブにまとめる。

use std::collections::HashMap;
use std::io::{Cursor, Seek, Write};
use tracing::warn;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::XlsxPriceError;
use crate::security::{validate_zip_path, SecurityConfig};

/// 一括ダウンロード用アーカイブの既定ファイル名
pub const BUNDLE_FILE_NAME: &str = "converted_files.zip";

/// エントリをZIPアーカイブとして書き出す
///
/// メンバー名は各出力ファイル名そのものです。同名のエントリが複数ある場合は
/// 最後のものが残ります。
///
/// # 戻り値
///
/// * `Ok(W)` - 書き込みを終えたライター
/// * `Err(XlsxPriceError::SecurityViolation)` - メンバー名が安全でない、またはエントリ数が上限を超えた場合
pub fn write_bundle<W, N, B>(entries: &[(N, B)], writer: W) -> Result<W, XlsxPriceError>
where
    W: Write + Seek,
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let security_config = SecurityConfig::default();
    security_config.check_bundle_entries(entries.len())?;

    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (idx, (name, _)) in entries.iter().enumerate() {
        let name = name.as_ref();
        validate_zip_path(name).map_err(XlsxPriceError::SecurityViolation)?;
        if last_index.insert(name, idx).is_some() {
            warn!(name, "duplicate bundle entry, keeping the last one");
        }
    }

    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    for (idx, (name, bytes)) in entries.iter().enumerate() {
        let name = name.as_ref();
        if last_index.get(name) != Some(&idx) {
            continue;
        }
        zip.start_file(name, options)?;
        zip.write_all(bytes.as_ref())?;
    }

    Ok(zip.finish()?)
}

/// エントリをメモリ上のZIPアーカイブにまとめる
pub fn bundle_to_vec<N, B>(entries: &[(N, B)]) -> Result<Vec<u8>, XlsxPriceError>
where
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let cursor = write_bundle(entries, Cursor::new(Vec::new()))?;
    Ok(cursor.into_inner())
}
