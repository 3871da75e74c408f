//! CSVファイルをExcelワークブックに変換するモジュール

use super::error::ReportError;
use super::table::Table;
use super::workbook::{write_workbook, Sheet};
use std::path::{Path, PathBuf};
use tracing::info;

/// 詳細データのシート名
pub const DETAIL_SHEET_NAME: &str = "详细贡献数据";
/// 集計データのシート名
pub const SUMMARY_SHEET_NAME: &str = "汇总贡献统计";
/// 単一CSV変換時のシート名
pub const SINGLE_SHEET_NAME: &str = "贡献统计";

/// 変換の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionInput {
    /// 1つのCSVを1シートに変換
    Single(PathBuf),
    /// 詳細CSVと集計CSVを2シートに変換
    DetailAndSummary { detail: PathBuf, summary: PathBuf },
}

impl ConversionInput {
    fn sheets(&self) -> Vec<(&'static str, &Path)> {
        match self {
            ConversionInput::Single(input) => vec![(SINGLE_SHEET_NAME, input.as_path())],
            ConversionInput::DetailAndSummary { detail, summary } => vec![
                (DETAIL_SHEET_NAME, detail.as_path()),
                (SUMMARY_SHEET_NAME, summary.as_path()),
            ],
        }
    }
}

/// 変換結果
///
/// # フィールド
///
/// - `output`: 書き出したワークブックのパス
/// - `sheets`: シート名とデータ行数の組（シート順）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: PathBuf,
    pub sheets: Vec<(String, usize)>,
}

impl Conversion {
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// CSVファイルを読み込み、ワークブックとして書き出します
///
/// すべての入力ファイルの存在を確認してから読み込みを始めるため、
/// 入力が欠けている場合は出力ファイルに一切触れません。
///
/// # エラー
///
/// 以下の場合にエラーを返します：
/// - 入力ファイルが存在しない（`MissingInputFile`）
/// - CSVの読み込みに失敗
/// - ワークブックの書き出しに失敗
pub fn convert(
    input: &ConversionInput,
    output: impl AsRef<Path>,
) -> Result<Conversion, ReportError> {
    let output = output.as_ref();
    let inputs = input.sheets();

    if let Some((_, missing)) = inputs.iter().find(|(_, path)| !path.exists()) {
        return Err(ReportError::MissingInputFile(missing.to_path_buf()));
    }

    let mut tables = Vec::with_capacity(inputs.len());
    for (name, path) in &inputs {
        let table = Table::read_csv(path)?;
        info!(
            file = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "read CSV"
        );
        tables.push((*name, table));
    }

    let sheets: Vec<Sheet<'_>> = tables
        .iter()
        .map(|(name, table)| Sheet::new(*name, table))
        .collect();
    write_workbook(output, &sheets)?;

    Ok(Conversion {
        output: output.to_path_buf(),
        sheets: tables
            .iter()
            .map(|(name, table)| (name.to_string(), table.row_count()))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_convert_single() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "name,lines\nalice,10\nbob,5\n").unwrap();
        let output = dir.path().join("out.xlsx");

        let conversion = convert(&ConversionInput::Single(input), &output).unwrap();

        assert_eq!(conversion.sheet_names(), vec![SINGLE_SHEET_NAME]);
        assert_eq!(conversion.sheets[0].1, 2);
        assert!(output.exists());
    }

    #[test]
    fn test_convert_detail_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let detail = dir.path().join("detail.csv");
        let summary = dir.path().join("summary.csv");
        fs::write(&detail, "repo,name,lines\nweb,alice,10\napi,alice,3\n").unwrap();
        fs::write(&summary, "name,lines\nalice,13\n").unwrap();
        let output = dir.path().join("out.xlsx");

        let conversion =
            convert(&ConversionInput::DetailAndSummary { detail, summary }, &output).unwrap();

        assert_eq!(
            conversion.sheets,
            vec![
                (DETAIL_SHEET_NAME.to_string(), 2),
                (SUMMARY_SHEET_NAME.to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_convert_missing_input_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let detail = dir.path().join("detail.csv");
        fs::write(&detail, "name\nalice\n").unwrap();
        let summary = dir.path().join("missing.csv");
        let output = dir.path().join("out.xlsx");
        fs::write(&output, "previous").unwrap();

        let err = convert(
            &ConversionInput::DetailAndSummary {
                detail,
                summary: summary.clone(),
            },
            &output,
        )
        .unwrap_err();

        assert!(matches!(err, ReportError::MissingInputFile(path) if path == summary));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn test_convert_unreadable_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "a,b\n1,2,3\n").unwrap();
        let output = dir.path().join("out.xlsx");

        let err = convert(&ConversionInput::Single(input), &output).unwrap_err();

        assert!(matches!(err, ReportError::ReadFailure { .. }));
        assert!(!output.exists());
    }
}
