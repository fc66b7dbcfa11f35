//! Security Tests
//!
//! 不正な入力とバンドルのメンバー名に対する対策を検証します。

use std::io::{Cursor, Read, Write};
use xlsxprice::{bundle_to_vec, ConverterBuilder, XlsxPriceError};
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

/// パストラバーサル: 親ディレクトリを指すメンバー名
#[test]
fn test_bundle_rejects_parent_traversal() {
    let entries = [("../evil.xlsx", b"data".to_vec())];
    let result = bundle_to_vec(&entries);
    assert!(matches!(result, Err(XlsxPriceError::SecurityViolation(_))));
}

/// 絶対パスのメンバー名
#[test]
fn test_bundle_rejects_absolute_path() {
    let entries = [("/etc/passwd", b"data".to_vec())];
    assert!(matches!(
        bundle_to_vec(&entries),
        Err(XlsxPriceError::SecurityViolation(_))
    ));
}

/// Windows形式の区切り文字
#[test]
fn test_bundle_rejects_backslash() {
    let entries = [("..\\evil.xlsx", b"data".to_vec())];
    assert!(matches!(
        bundle_to_vec(&entries),
        Err(XlsxPriceError::SecurityViolation(_))
    ));
}

/// エントリ数の上限
#[test]
fn test_bundle_rejects_too_many_entries() {
    let entries: Vec<(String, Vec<u8>)> = (0..10_001)
        .map(|i| (format!("file{}.xlsx", i), Vec::new()))
        .collect();

    match bundle_to_vec(&entries) {
        Err(XlsxPriceError::SecurityViolation(msg)) => assert!(msg.contains("10001")),
        other => panic!("Unexpected result: {:?}", other.map(|b| b.len())),
    }
}

/// 同名エントリは最後のものが残る
#[test]
fn test_bundle_duplicate_names_keep_last() {
    let entries = [
        ("prices.xlsx", b"first".to_vec()),
        ("other.xlsx", b"other".to_vec()),
        ("prices.xlsx", b"second".to_vec()),
    ];
    let bytes = bundle_to_vec(&entries).unwrap();

    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut content = String::new();
    archive
        .by_name("prices.xlsx")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "second");
}

/// スプレッドシートではないZIPアーカイブ
#[test]
fn test_non_spreadsheet_zip_is_rejected() {
    let mut zip_data = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut zip_data));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("readme.txt", options).unwrap();
        zip.write_all(b"hello").unwrap();
        zip.finish().unwrap();
    }

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert(Cursor::new(zip_data), &mut Vec::new());
    assert!(result.is_err());
}

/// ランダムなバイト列
#[test]
fn test_garbage_input_is_rejected() {
    let converter = ConverterBuilder::new().build().unwrap();
    let garbage: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();

    let mut output = Vec::new();
    let result = converter.convert(Cursor::new(garbage), &mut output);
    assert!(matches!(result, Err(XlsxPriceError::Parse(_))));
    assert!(output.is_empty());
}

/// 不正なシート名は変換前に拒否される
#[test]
fn test_invalid_sheet_name_is_rejected() {
    let too_long = "x".repeat(32);
    for name in ["", "a/b", "[x]", "'quoted'", too_long.as_str()] {
        let result = ConverterBuilder::new().with_sheet_name(name).build();
        assert!(
            matches!(result, Err(XlsxPriceError::Config(_))),
            "sheet name {:?} should be rejected",
            name
        );
    }
}

/// 名前の途中の`..`はパス要素ではないので許可される
#[test]
fn test_bundle_accepts_dots_inside_name() {
    let entries = [
        ("a..b.xlsx", b"first".to_vec()),
        ("prices v1..2.xlsx", b"second".to_vec()),
    ];
    let bytes = bundle_to_vec(&entries).unwrap();

    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["a..b.xlsx", "prices v1..2.xlsx"]);
}

/// 途中に`..`要素を含むメンバー名
#[test]
fn test_bundle_rejects_nested_traversal() {
    let entries = [("out/../../evil.xlsx", b"data".to_vec())];
    assert!(matches!(
        bundle_to_vec(&entries),
        Err(XlsxPriceError::SecurityViolation(_))
    ));
}
