//! Git貢献統計の後処理ツール
//!
//! このクレートは、統計エクスポーターが出力したCSVファイルを
//! Excelワークブックに変換・統合するための機能を提供します。
//!
//! # 主な機能
//!
//! - 1つまたは2つのCSVファイルのワークブックへの変換
//! - ファイル名に埋め込まれた集計期間によるCSVファイルのグループ化
//! - 開発者ごとの貢献メトリクスの合計と名前順の並べ替え
//! - 列幅の自動調整
//!
//! # 使用例
//!
//! ```no_run
//! use contribution_sheets::report::{convert, ConversionInput, MergeOptions};
//!
//! let conversion = convert(
//!     &ConversionInput::Single("summary.csv".into()),
//!     "summary.xlsx",
//! ).unwrap();
//!
//! let run = contribution_sheets::report::merge::run(&MergeOptions {
//!     input_dir: "stats".into(),
//!     keep_csv: true,
//!     ..MergeOptions::default()
//! }).unwrap();
//! ```

pub mod logging;
pub mod report;
pub use report::ReportError;
