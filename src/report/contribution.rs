//! 開発者ごとの貢献メトリクスの表現と集計を担当するモジュール
//!
//! 入力CSVの列名は統計エクスポーターが出力するものに合わせています。

use super::table::{Cell, Table};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

/// 開発者名の列
pub const CONTRIBUTOR_COLUMN: &str = "用户名";

/// 集計対象となる8つのメトリクス列（出力順）
pub const METRIC_COLUMNS: [&str; 8] = [
    "新增代码行数",
    "删除代码行数",
    "贡献代码总行数",
    "代码提交次数",
    "超大提交代码行数(>1800行/commit)",
    "超大提交新增代码行数(>1800行/commit)",
    "超大提交删除代码行数(>1800行/commit)",
    "超大提交次数(>1800行/commit)",
];

/// 1ファイル中の1行分の貢献レコード
///
/// # フィールド
///
/// - `contributor`: 開発者名
/// - `metrics`: 8つのメトリクス値
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ContributionRow")]
pub struct ContributionRecord {
    pub contributor: String,
    pub metrics: ContributionMetrics,
}

/// 貢献メトリクス
///
/// # フィールド
///
/// - `lines_added`: 新規追加行数
/// - `lines_removed`: 削除行数
/// - `total_lines`: 貢献行数の合計
/// - `commits`: コミット回数
/// - `oversized_lines`: 超大コミット（1800行超）の行数合計
/// - `oversized_lines_added`: 超大コミットの追加行数
/// - `oversized_lines_removed`: 超大コミットの削除行数
/// - `oversized_commits`: 超大コミットの回数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributionMetrics {
    pub lines_added: u64,
    pub lines_removed: u64,
    pub total_lines: u64,
    pub commits: u64,
    pub oversized_lines: u64,
    pub oversized_lines_added: u64,
    pub oversized_lines_removed: u64,
    pub oversized_commits: u64,
}

/// CSVの1行をそのまま受け取るための平坦な構造体
#[derive(Deserialize)]
struct ContributionRow {
    #[serde(rename = "用户名")]
    contributor: String,
    #[serde(rename = "新增代码行数", deserialize_with = "deserialize_count")]
    lines_added: u64,
    #[serde(rename = "删除代码行数", deserialize_with = "deserialize_count")]
    lines_removed: u64,
    #[serde(rename = "贡献代码总行数", deserialize_with = "deserialize_count")]
    total_lines: u64,
    #[serde(rename = "代码提交次数", deserialize_with = "deserialize_count")]
    commits: u64,
    #[serde(
        rename = "超大提交代码行数(>1800行/commit)",
        deserialize_with = "deserialize_count"
    )]
    oversized_lines: u64,
    #[serde(
        rename = "超大提交新增代码行数(>1800行/commit)",
        deserialize_with = "deserialize_count"
    )]
    oversized_lines_added: u64,
    #[serde(
        rename = "超大提交删除代码行数(>1800行/commit)",
        deserialize_with = "deserialize_count"
    )]
    oversized_lines_removed: u64,
    #[serde(
        rename = "超大提交次数(>1800行/commit)",
        deserialize_with = "deserialize_count"
    )]
    oversized_commits: u64,
}

impl From<ContributionRow> for ContributionRecord {
    fn from(row: ContributionRow) -> Self {
        Self {
            contributor: row.contributor,
            metrics: ContributionMetrics {
                lines_added: row.lines_added,
                lines_removed: row.lines_removed,
                total_lines: row.total_lines,
                commits: row.commits,
                oversized_lines: row.oversized_lines,
                oversized_lines_added: row.oversized_lines_added,
                oversized_lines_removed: row.oversized_lines_removed,
                oversized_commits: row.oversized_commits,
            },
        }
    }
}

impl ContributionMetrics {
    /// `METRIC_COLUMNS`と同じ順序で値を返します
    pub fn values(&self) -> [u64; 8] {
        [
            self.lines_added,
            self.lines_removed,
            self.total_lines,
            self.commits,
            self.oversized_lines,
            self.oversized_lines_added,
            self.oversized_lines_removed,
            self.oversized_commits,
        ]
    }

    /// 別のメトリクスを各列ごとに足し込みます
    ///
    /// `u64`の上限を超える列は上限で止め、その場合は`false`を返します。
    pub fn accumulate(&mut self, other: &ContributionMetrics) -> bool {
        let mut exact = true;
        let mut add = |total: &mut u64, value: u64| {
            *total = total.checked_add(value).unwrap_or_else(|| {
                exact = false;
                u64::MAX
            });
        };

        add(&mut self.lines_added, other.lines_added);
        add(&mut self.lines_removed, other.lines_removed);
        add(&mut self.total_lines, other.total_lines);
        add(&mut self.commits, other.commits);
        add(&mut self.oversized_lines, other.oversized_lines);
        add(&mut self.oversized_lines_added, other.oversized_lines_added);
        add(&mut self.oversized_lines_removed, other.oversized_lines_removed);
        add(&mut self.oversized_commits, other.oversized_commits);
        exact
    }
}

/// 空欄を0として扱うカウント値のデシリアライズ補助関数
///
/// `12.0`のような整数値の浮動小数点表記も受け付けます。
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    if let Ok(value) = trimmed.parse::<u64>() {
        return Ok(value);
    }

    match trimmed.parse::<f64>() {
        // u64::MAX as f64 は 2^64 に丸められるため、それ未満のみ受け付ける
        Ok(value)
            if value.is_finite()
                && value >= 0.0
                && value < u64::MAX as f64
                && value.fract() == 0.0 =>
        {
            Ok(value as u64)
        }
        _ => Err(serde::de::Error::custom(format!(
            "invalid count value: {:?}",
            raw
        ))),
    }
}

/// 開発者ごとに集計済みのメトリクス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorTotals {
    pub contributor: String,
    pub metrics: ContributionMetrics,
}

/// レコードを開発者名でグループ化し、各メトリクスを合計します
///
/// 戻り値は開発者名の大文字小文字を区別しない昇順に並びます。
/// 大文字小文字だけが異なる名前同士は名前そのものの順序で並べます。
/// 開発者名が空欄の行は集計に含めません。
pub fn aggregate<I>(records: I) -> Vec<ContributorTotals>
where
    I: IntoIterator<Item = ContributionRecord>,
{
    let mut totals: IndexMap<String, ContributionMetrics> = IndexMap::new();
    for record in records {
        if record.contributor.trim().is_empty() {
            debug!(metrics = ?record.metrics, "row without contributor name; ignoring");
            continue;
        }

        let total = totals.entry(record.contributor.clone()).or_default();
        if !total.accumulate(&record.metrics) {
            warn!(
                contributor = %record.contributor,
                "metric total exceeds the supported maximum; clamped"
            );
        }
    }

    let mut totals: Vec<ContributorTotals> = totals
        .into_iter()
        .map(|(contributor, metrics)| ContributorTotals {
            contributor,
            metrics,
        })
        .collect();

    totals.sort_by_cached_key(|t| (t.contributor.to_lowercase(), t.contributor.clone()));
    totals
}

/// 集計結果をワークブック出力用の表に変換します
///
/// 開発者名は数字だけの名前であっても文字列として書き出します。
pub fn totals_table(totals: &[ContributorTotals]) -> Table {
    let mut headers = vec![CONTRIBUTOR_COLUMN.to_string()];
    headers.extend(METRIC_COLUMNS.iter().map(|column| column.to_string()));

    let mut table = Table::new(headers);
    for total in totals {
        let mut row = vec![Cell::Text(total.contributor.clone())];
        row.extend(
            total
                .metrics
                .values()
                .iter()
                .map(|value| Cell::Number(*value as f64)),
        );
        table.rows.push(row);
    }

    table
}
