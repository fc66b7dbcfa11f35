//! Security Module
//!
//! 入力サイズの上限と、ZIPバンドルに書き込むメンバー名の検証を提供します。

use std::path::{Component, Path};

use crate::error::XlsxPriceError;

/// セキュリティ設定
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
    /// ZIPバンドル内の最大ファイル数
    /// デフォルト: 10000
    pub max_bundle_entries: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 2_147_483_648, // 2GB
            max_bundle_entries: 10_000,
        }
    }
}

impl SecurityConfig {
    /// 入力サイズが上限以下であることを確認
    pub fn check_input_size(&self, bytes: u64) -> Result<(), XlsxPriceError> {
        if bytes > self.max_input_file_size {
            return Err(XlsxPriceError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes, self.max_input_file_size
            )));
        }
        Ok(())
    }

    /// バンドルのエントリ数が上限以下であることを確認
    pub fn check_bundle_entries(&self, count: usize) -> Result<(), XlsxPriceError> {
        if count > self.max_bundle_entries {
            return Err(XlsxPriceError::SecurityViolation(format!(
                "Bundle has too many files: {} (max: {})",
                count, self.max_bundle_entries
            )));
        }
        Ok(())
    }
}

/// ZIPメンバー名の検証
///
/// パストラバーサルを防ぐため、メンバー名を検証します。
/// `..`は独立したパス要素の場合のみ拒否し、`v1..2.xlsx`のような名前は許可します。
///
/// # 戻り値
///
/// * `Ok(())` - 名前が安全な場合
/// * `Err(String)` - 名前が危険な場合（空、`..`要素、絶対パス、バックスラッシュを含む）
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    // Unix形式の`/`やWindows形式の`C:`で始まるパス
    if path.starts_with('/') || has_drive_prefix(path) {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if Path::new(path)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(format!("Path traversal detected: {}", path));
    }

    Ok(())
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_zip_path_valid() {
        assert!(validate_zip_path("prices.xlsx").is_ok());
        assert!(validate_zip_path("لیست قیمت.xlsx").is_ok());
    }

    #[test]
    fn test_validate_zip_path_empty() {
        assert!(validate_zip_path("").is_err());
    }

    #[test]
    fn test_validate_zip_path_absolute() {
        assert!(validate_zip_path("/etc/passwd").is_err());
        assert!(validate_zip_path("C:\\Windows\\system32").is_err());
        assert!(validate_zip_path("c:\\out.xlsx").is_err());
        assert!(validate_zip_path("D:out.xlsx").is_err());
    }

    #[test]
    fn test_validate_zip_path_traversal() {
        assert!(validate_zip_path("../out.xlsx").is_err());
        assert!(validate_zip_path("..").is_err());
        assert!(validate_zip_path("out/../../x.xlsx").is_err());
    }

    #[test]
    fn test_validate_zip_path_dots_inside_name() {
        assert!(validate_zip_path("prices v1..2.xlsx").is_ok());
        assert!(validate_zip_path("a..b.xlsx").is_ok());
        assert!(validate_zip_path("..prices.xlsx").is_ok());
    }

    #[test]
    fn test_validate_zip_path_backslash() {
        assert!(validate_zip_path("dir\\out.xlsx").is_err());
    }

    #[test]
    fn test_input_size_limit() {
        let config = SecurityConfig {
            max_input_file_size: 10,
            ..SecurityConfig::default()
        };
        assert!(config.check_input_size(10).is_ok());
        assert!(matches!(
            config.check_input_size(11),
            Err(XlsxPriceError::SecurityViolation(_))
        ));
    }

    #[test]
    fn test_bundle_entry_limit() {
        let config = SecurityConfig {
            max_bundle_entries: 2,
            ..SecurityConfig::default()
        };
        assert!(config.check_bundle_entries(2).is_ok());
        assert!(config.check_bundle_entries(3).is_err());
    }
}
