//! 期間ごとの統計CSVを1つのワークブックにまとめるモジュール
//!
//! 処理は次の流れで行われます：
//!
//! 1. ファイル名から集計期間を解析してグループ化
//! 2. 期間ごとに全ファイルを読み込み、行を連結
//! 3. 開発者ごとにメトリクスを合計して名前順に並べ替え
//! 4. `contributions_merged_<since>_<until>.xlsx`として書き出し
//!
//! 各段階の結果は`MergeReport`・`CleanupReport`として呼び出し元に返します。

use super::contribution::{aggregate, totals_table, ContributionRecord};
use super::discovery::find_matching_files;
use super::error::ReportError;
use super::period::{group_by_period, ContributionFile, PeriodKey};
use super::table::{open_csv, read_failure};
use super::workbook::{write_workbook, Sheet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 統合ワークブックのシート名
pub const MERGED_SHEET_NAME: &str = "贡献统计";

/// 入力ファイル名のデフォルトパターン
pub const DEFAULT_PATTERN: &str = "contributions_*_*_????-??-??_????-??-??.csv";

/// 1期間分の処理結果
#[derive(Debug)]
pub enum PeriodOutcome {
    /// ワークブックを書き出した
    Merged {
        period: PeriodKey,
        output: PathBuf,
        contributors: usize,
        files_read: usize,
        skipped: Vec<SkippedFile>,
    },
    /// 読み込めたファイルが1つもなかった
    Skipped {
        period: PeriodKey,
        skipped: Vec<SkippedFile>,
    },
    /// ワークブックの書き出しに失敗した
    WriteFailed {
        period: PeriodKey,
        error: ReportError,
    },
}

impl PeriodOutcome {
    pub fn period(&self) -> PeriodKey {
        match self {
            PeriodOutcome::Merged { period, .. }
            | PeriodOutcome::Skipped { period, .. }
            | PeriodOutcome::WriteFailed { period, .. } => *period,
        }
    }

    pub fn output(&self) -> Option<&Path> {
        match self {
            PeriodOutcome::Merged { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// 読み込みに失敗して集計から外したファイル
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: ReportError,
}

/// 全期間の処理結果
#[derive(Debug, Default)]
pub struct MergeReport {
    pub periods: Vec<PeriodOutcome>,
}

impl MergeReport {
    /// 書き出したワークブックのパス
    pub fn outputs(&self) -> Vec<&Path> {
        self.periods.iter().filter_map(PeriodOutcome::output).collect()
    }
}

/// 削除処理の結果
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, std::io::Error)>,
}

/// 統合処理のオプション
///
/// # フィールド
///
/// - `input_dir`: CSVファイルを探すディレクトリ
/// - `output_dir`: ワークブックの出力先（存在しなければ作成）
/// - `pattern`: 入力ファイル名のglobパターン
/// - `keep_csv`: 統合後も元のCSVファイルを残すかどうか
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub pattern: String,
    pub keep_csv: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            pattern: DEFAULT_PATTERN.to_string(),
            keep_csv: false,
        }
    }
}

/// `run`の結果
#[derive(Debug)]
pub struct MergeRun {
    pub discovered: Vec<PathBuf>,
    pub report: MergeReport,
    /// `keep_csv`が指定された場合は`None`
    pub cleanup: Option<CleanupReport>,
}

/// 探索・統合・削除の一連の処理を実行します
///
/// # エラー
///
/// 以下の場合にエラーを返します：
/// - 出力ディレクトリの作成、または入力ディレクトリの読み込みに失敗
/// - パターンに一致するファイルがない（`NoMatchingFiles`）
/// - ワークブックが1つも生成されなかった（`NoOutputsProduced`）
pub fn run(options: &MergeOptions) -> Result<MergeRun, ReportError> {
    fs::create_dir_all(&options.output_dir)?;

    let discovered = find_matching_files(&options.input_dir, &options.pattern)?;
    if discovered.is_empty() {
        return Err(ReportError::NoMatchingFiles {
            dir: options.input_dir.clone(),
            pattern: options.pattern.clone(),
        });
    }
    info!(count = discovered.len(), "found CSV files");

    let report = merge_by_period(&discovered, &options.output_dir);
    if report.outputs().is_empty() {
        return Err(ReportError::NoOutputsProduced);
    }

    let cleanup = if options.keep_csv {
        info!("keeping source CSV files");
        None
    } else {
        Some(cleanup_csv_files(&discovered))
    };

    Ok(MergeRun {
        discovered,
        report,
        cleanup,
    })
}

/// ファイルを期間ごとにまとめ、期間ごとに1つのワークブックを書き出します
///
/// 個々のファイルの読み込み失敗や期間ごとの書き込み失敗は`MergeReport`に記録され、
/// 残りの期間の処理は続行されます。
pub fn merge_by_period<P: AsRef<Path>>(paths: &[P], output_dir: impl AsRef<Path>) -> MergeReport {
    let output_dir = output_dir.as_ref();
    let mut report = MergeReport::default();

    for (period, files) in group_by_period(paths) {
        info!(since = %period.since, until = %period.until, "merging period");
        report.periods.push(merge_period(period, &files, output_dir));
    }

    report
}

fn merge_period(period: PeriodKey, files: &[ContributionFile], output_dir: &Path) -> PeriodOutcome {
    let mut records = Vec::new();
    let mut files_read = 0;
    let mut skipped = Vec::new();

    for file in files {
        match read_records(&file.path) {
            Ok(mut file_records) => {
                info!(
                    file = %file.path.display(),
                    repo = %file.repo,
                    branch = %file.branch,
                    rows = file_records.len(),
                    "read file"
                );
                records.append(&mut file_records);
                files_read += 1;
            }
            Err(error) => {
                warn!(file = %file.path.display(), %error, "could not read file; skipping");
                skipped.push(SkippedFile {
                    path: file.path.clone(),
                    error,
                });
            }
        }
    }

    if files_read == 0 {
        warn!(%period, "no readable data files for period; skipping");
        return PeriodOutcome::Skipped { period, skipped };
    }

    let totals = aggregate(records);
    let table = totals_table(&totals);
    let output = output_dir.join(period.merged_file_name());

    if let Err(error) = write_workbook(&output, &[Sheet::new(MERGED_SHEET_NAME, &table)]) {
        error!(output = %output.display(), %error, "could not write merged workbook");
        return PeriodOutcome::WriteFailed { period, error };
    }

    info!(
        output = %output.display(),
        contributors = totals.len(),
        "wrote merged workbook"
    );

    PeriodOutcome::Merged {
        period,
        output,
        contributors: totals.len(),
        files_read,
        skipped,
    }
}

fn read_records(path: &Path) -> Result<Vec<ContributionRecord>, ReportError> {
    open_csv(path)?
        .deserialize()
        .collect::<Result<Vec<ContributionRecord>, _>>()
        .map_err(|source| read_failure(path, source))
}

/// 元のCSVファイルを削除します
///
/// 削除に失敗したファイルは警告を出して`CleanupReport::failed`に記録します。
pub fn cleanup_csv_files<P: AsRef<Path>>(paths: &[P]) -> CleanupReport {
    let mut report = CleanupReport::default();

    for path in paths {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => {
                info!(file = %path.display(), "deleted source CSV");
                report.deleted.push(path.to_path_buf());
            }
            Err(error) => {
                warn!(file = %path.display(), %error, "could not delete source CSV");
                report.failed.push((path.to_path_buf(), error));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::contribution::{CONTRIBUTOR_COLUMN, METRIC_COLUMNS};

    fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let mut content = format!("{},{}\n", CONTRIBUTOR_COLUMN, METRIC_COLUMNS.join(","));
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_merge_by_period_one_output_per_period() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_csv(
                dir.path(),
                "contributions_web_main_2024-01-01_2024-01-31.csv",
                &["alice,10,2,12,3,0,0,0,0"],
            ),
            write_csv(
                dir.path(),
                "contributions_api_dev_2024-01-01_2024-01-31.csv",
                &["alice,5,1,6,1,0,0,0,0", "bob,1,1,2,1,0,0,0,0"],
            ),
            write_csv(
                dir.path(),
                "contributions_web_main_2024-02-01_2024-02-29.csv",
                &["carol,1,0,1,1,0,0,0,0"],
            ),
        ];

        let report = merge_by_period(&paths, dir.path());

        assert_eq!(report.periods.len(), 2);
        assert_eq!(report.outputs().len(), 2);
        assert!(dir
            .path()
            .join("contributions_merged_2024-01-01_2024-01-31.xlsx")
            .exists());
        assert!(dir
            .path()
            .join("contributions_merged_2024-02-01_2024-02-29.xlsx")
            .exists());

        match &report.periods[0] {
            PeriodOutcome::Merged {
                contributors,
                files_read,
                skipped,
                ..
            } => {
                assert_eq!(*contributors, 2);
                assert_eq!(*files_read, 2);
                assert!(skipped.is_empty());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_merge_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_csv(
            dir.path(),
            "contributions_web_main_2024-01-01_2024-01-31.csv",
            &["alice,10,2,12,3,0,0,0,0"],
        );
        let bad = dir.path().join("contributions_api_dev_2024-01-01_2024-01-31.csv");
        fs::write(&bad, "用户名,other\nalice,1\n").unwrap();

        let report = merge_by_period(&[good, bad.clone()], dir.path());

        match &report.periods[0] {
            PeriodOutcome::Merged {
                files_read,
                skipped,
                ..
            } => {
                assert_eq!(*files_read, 1);
                assert_eq!(skipped.len(), 1);
                assert_eq!(skipped[0].path, bad);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_merge_skips_period_without_readable_files() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("contributions_web_main_2024-01-01_2024-01-31.csv");
        fs::write(&bad, "").unwrap();

        let report = merge_by_period(&[bad], dir.path());

        assert_eq!(report.periods.len(), 1);
        assert!(matches!(report.periods[0], PeriodOutcome::Skipped { .. }));
        assert!(report.outputs().is_empty());
    }

    #[test]
    fn test_run_without_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = MergeOptions {
            input_dir: dir.path().to_path_buf(),
            output_dir: dir.path().to_path_buf(),
            ..MergeOptions::default()
        };

        let err = run(&options).unwrap_err();

        assert!(matches!(err, ReportError::NoMatchingFiles { .. }));
    }

    #[test]
    fn test_run_deletes_sources_unless_kept() {
        for keep_csv in [false, true] {
            let dir = tempfile::tempdir().unwrap();
            let source = write_csv(
                dir.path(),
                "contributions_web_main_2024-01-01_2024-01-31.csv",
                &["alice,10,2,12,3,0,0,0,0"],
            );
            let options = MergeOptions {
                input_dir: dir.path().to_path_buf(),
                output_dir: dir.path().join("out"),
                keep_csv,
                ..MergeOptions::default()
            };

            let result = run(&options).unwrap();

            assert_eq!(result.discovered, vec![source.clone()]);
            assert_eq!(source.exists(), keep_csv);
            assert_eq!(result.cleanup.is_none(), keep_csv);
            assert!(dir
                .path()
                .join("out/contributions_merged_2024-01-01_2024-01-31.xlsx")
                .exists());
        }
    }

    #[test]
    fn test_cleanup_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.csv");
        fs::write(&present, "x").unwrap();
        let missing = dir.path().join("missing.csv");

        let report = cleanup_csv_files(&[present.clone(), missing.clone()]);

        assert_eq!(report.deleted, vec![present]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, missing);
    }
}
