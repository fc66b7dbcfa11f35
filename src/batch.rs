//! Batch Module
//!
//! 入力ディレクトリ内のすべてのファイルを変換し、出力ディレクトリに書き出す。
//! ファイルごとの失敗は隔離され、他のファイルの変換は続行される。

use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::builder::{ConversionSummary, ConvertedFile, Converter};
use crate::error::XlsxPriceError;
use crate::output::bundle_to_vec;
use crate::session::ItemStatus;

/// バッチ変換のオプション
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// 変換結果をまとめるZIPのファイル名（`None`ならまとめない）
    pub bundle_name: Option<String>,
}

/// 1ファイル分の結果
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// `Done`または`Error`
    pub status: ItemStatus,
    pub summary: Option<ConversionSummary>,
    pub error: Option<String>,
}

/// バッチ変換の結果
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// ファイル名順
    pub files: Vec<FileReport>,
    pub bundle: Option<PathBuf>,
    /// バンドルの書き出しに失敗した場合のエラー
    pub bundle_error: Option<String>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == ItemStatus::Done)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    /// すべてのファイルの変換と、バンドルの書き出しに成功したか
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.bundle_error.is_none()
    }

    pub fn to_json(&self) -> Result<String, XlsxPriceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// ディレクトリ内のファイルを一括変換する
///
/// # 引数
///
/// * `converter` - 変換設定
/// * `input_dir` - 入力ディレクトリ（直下の通常ファイルのみ対象）
/// * `output_dir` - 出力ディレクトリ（存在しなければ作成）
/// * `options` - バンドル等のオプション
///
/// # 戻り値
///
/// * `Ok(BatchReport)` - 個々のファイルやバンドルが失敗していても、ディレクトリ操作に成功すれば`Ok`
/// * `Err(XlsxPriceError)` - 入力ディレクトリの列挙、出力ディレクトリの作成に失敗した場合
///
/// 出力ファイル名が重なる入力は、ファイル名順で最後のものだけを変換し、
/// それ以前のものは失敗として報告します。
pub fn convert_directory(
    converter: &Converter,
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<BatchReport, XlsxPriceError> {
    let inputs = list_input_files(input_dir)?;
    fs::create_dir_all(output_dir)?;

    info!(
        input_dir = %input_dir.display(),
        output_dir = %output_dir.display(),
        files = inputs.len(),
        "starting batch conversion"
    );

    let owners = output_owners(converter, &inputs);
    let keep_bytes = options.bundle_name.is_some();
    let results: Vec<(FileReport, Option<ConvertedFile>)> = inputs
        .par_iter()
        .enumerate()
        .map(|(idx, input)| {
            let output_name = converter.output_path_name(input);
            match owners.get(output_name.as_str()) {
                Some(&owner) if owner != idx => {
                    (superseded(input, &inputs[owner], &output_name), None)
                }
                _ => convert_one(converter, input, output_dir, keep_bytes),
            }
        })
        .collect();

    let mut files = Vec::with_capacity(results.len());
    let mut converted = Vec::new();
    for (report, file) in results {
        files.push(report);
        if let Some(file) = file {
            converted.push((file.file_name, file.bytes));
        }
    }

    let (bundle, bundle_error) = match &options.bundle_name {
        Some(name) => match write_bundle_file(output_dir, name, &converted) {
            Ok(path) => (Some(path), None),
            Err(e) => {
                warn!(bundle = %name, error = %e, "failed to write bundle");
                (None, Some(e.to_string()))
            }
        },
        None => (None, None),
    };

    let report = BatchReport {
        input_dir: input_dir.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        files,
        bundle,
        bundle_error,
    };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "batch conversion finished"
    );
    Ok(report)
}

/// 入力ディレクトリ直下の通常ファイルをファイル名順に列挙
fn list_input_files(input_dir: &Path) -> Result<Vec<PathBuf>, XlsxPriceError> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            inputs.push(entry.path());
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// 出力ファイル名ごとに、それを書き出す入力（ファイル名順で最後のもの）の位置
fn output_owners(converter: &Converter, inputs: &[PathBuf]) -> HashMap<String, usize> {
    inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| (converter.output_path_name(input), idx))
        .collect()
}

/// 出力名が後続の入力と重なるため変換しなかったファイル
fn superseded(input: &Path, owner: &Path, output_name: &str) -> FileReport {
    warn!(
        input = %input.display(),
        owner = %owner.display(),
        output = output_name,
        "output name collides with a later input"
    );
    FileReport {
        input: input.to_path_buf(),
        output: None,
        status: ItemStatus::Error,
        summary: None,
        error: Some(format!(
            "Output name {} is also produced by {}",
            output_name,
            owner.display()
        )),
    }
}

fn write_bundle_file(
    output_dir: &Path,
    name: &str,
    entries: &[(String, Vec<u8>)],
) -> Result<PathBuf, XlsxPriceError> {
    let bytes = bundle_to_vec(entries)?;
    let path = output_dir.join(name);
    fs::write(&path, bytes)?;
    info!(bundle = %path.display(), entries = entries.len(), "wrote bundle");
    Ok(path)
}

fn convert_one(
    converter: &Converter,
    input: &Path,
    output_dir: &Path,
    keep_bytes: bool,
) -> (FileReport, Option<ConvertedFile>) {
    let result = converter.convert_path(input).and_then(|file| {
        let output = output_dir.join(&file.file_name);
        fs::write(&output, &file.bytes)?;
        Ok((output, file))
    });

    match result {
        Ok((output, file)) => {
            let report = FileReport {
                input: input.to_path_buf(),
                output: Some(output),
                status: ItemStatus::Done,
                summary: Some(file.summary),
                error: None,
            };
            (report, keep_bytes.then_some(file))
        }
        Err(e) => {
            warn!(input = %input.display(), error = %e, "failed to convert file");
            let report = FileReport {
                input: input.to_path_buf(),
                output: None,
                status: ItemStatus::Error,
                summary: None,
                error: Some(e.to_string()),
            };
            (report, None)
        }
    }
}
