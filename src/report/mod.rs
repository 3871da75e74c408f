//! 貢献統計CSVをExcelワークブックへ変換・統合する中核モジュール
//!
//! 2つの独立した処理を提供します：
//!
//! 1. 変換（`convert`）: 1つまたは2つのCSVを1つのワークブックに書き出す
//! 2. 統合（`merge`）: 期間ごとのCSVを開発者単位で合計し、期間ごとにワークブックを書き出す
//!
//! # 主要なコンポーネント
//!
//! - `Table`: CSVから読み込んだ型推論済みの表
//! - `ContributionFile`: ファイル名から解析した期間・リポジトリ情報
//! - `ContributorTotals`: 開発者ごとに合計したメトリクス
//! - `MergeReport`: 期間ごとの統合結果

pub mod contribution;
pub mod convert;
pub mod discovery;
mod error;
pub mod merge;
pub mod period;
pub mod table;
pub mod workbook;

pub use contribution::{aggregate, ContributionMetrics, ContributionRecord, ContributorTotals};
pub use convert::{convert, Conversion, ConversionInput};
pub use error::ReportError;
pub use merge::{
    cleanup_csv_files, merge_by_period, CleanupReport, MergeOptions, MergeReport, MergeRun,
    PeriodOutcome,
};
pub use period::{ContributionFile, PeriodKey};
pub use table::{Cell, Table};
pub use workbook::{column_widths, write_workbook, Sheet, MAX_COLUMN_WIDTH};
