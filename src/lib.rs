//! xlsxprice - Excel product-listing converter
//!
//! This crate reads product listings from spreadsheets (first sheet only), where
//! each row holds a composite descriptor such as `"product 123 $"` and a quantity,
//! and converts every recognizable row into a single line of the form
//! `"{name} {price} {country}"`. The trailing currency symbol decides the country
//! label (`¥` → ژاپن, `$` → امریکا, `€` → اروپا, anything else → `Unknown`).
//! Rows that do not match are dropped. The result is written back as a
//! one-column spreadsheet (or CSV), individually or bundled into a ZIP archive.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxprice::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     let input = File::open("prices.xlsx")?;
//!     let output = File::create("prices_converted.xlsx")?;
//!
//!     let summary = converter.convert(input, output)?;
//!     println!("{} of {} rows converted", summary.converted_rows, summary.total_rows);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Converting Rows Directly
//!
//! ```rust
//! use xlsxprice::{convert_rows, CellValue, MatchMode, RawRow};
//!
//! let rows = vec![
//!     RawRow::from(vec![CellValue::from("product 123 $"), CellValue::from(10.0)]),
//!     RawRow::from(vec![CellValue::from("no-digits-here"), CellValue::from(5.0)]),
//! ];
//!
//! let records = convert_rows(&rows, MatchMode::Trimmed);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].name, "product 123 امریکا");
//! ```
//!
//! # Batch Conversion
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxprice::{convert_directory, BatchOptions, ConverterBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let report = convert_directory(
//!         &converter,
//!         Path::new("before"),
//!         Path::new("after"),
//!         &BatchOptions::default(),
//!     )?;
//!     println!("{}", report.to_json()?);
//!     Ok(())
//! }
//! ```

mod aggregate;
mod api;
mod batch;
mod builder;
mod classify;
mod error;
mod extract;
mod output;
mod parser;
mod pipeline;
pub mod preview;
mod security;
mod session;
mod types;

// 公開API
pub use aggregate::aggregate;
pub use api::{MatchMode, OutputFormat};
pub use batch::{convert_directory, BatchOptions, BatchReport, FileReport};
pub use builder::{ConversionSummary, ConvertedFile, Converter, ConverterBuilder, DEFAULT_SHEET_NAME};
pub use classify::classify;
pub use error::XlsxPriceError;
pub use extract::{extract, is_recognized};
pub use output::{bundle_to_vec, write_bundle, BUNDLE_FILE_NAME};
pub use pipeline::{convert_rows, count_recognized, preview_rows, DEFAULT_PREVIEW_ROWS};
pub use session::{ItemId, ItemStatus, Session, SessionItem};
pub use types::{CellValue, Country, OutputRecord, ParsedItem, Price, RawRow};
