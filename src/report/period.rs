//! ファイル名に埋め込まれた集計期間を解析するモジュール
//!
//! 対象となるファイル名は`contributions_<repo>_<branch>_<since>_<until>.csv`の形式です。
//! 解析結果は`ContributionFile`として保持し、以降の処理で文字列から再解析することはありません。

use chrono::NaiveDate;
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 集計期間 `(since, until)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl PeriodKey {
    /// 期間ごとの出力ファイル名
    pub fn merged_file_name(&self) -> String {
        format!("contributions_merged_{}.xlsx", self)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}",
            self.since.format(DATE_FORMAT),
            self.until.format(DATE_FORMAT)
        )
    }
}

/// ファイル名から解析した統計CSVファイルの情報
///
/// # フィールド
///
/// - `path`: ファイルのパス
/// - `repo`: リポジトリ名
/// - `branch`: ブランチ名
/// - `period`: 集計期間
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionFile {
    pub path: PathBuf,
    pub repo: String,
    pub branch: String,
    pub period: PeriodKey,
}

impl ContributionFile {
    /// パスのファイル名部分を解析します
    ///
    /// 命名規則に合わないファイルや、実在しない日付を含むファイルには`None`を返します。
    pub fn parse(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let file_name = path.file_name()?.to_str()?;
        let captures = file_name_regex().captures(file_name)?;

        let since = NaiveDate::parse_from_str(&captures[3], DATE_FORMAT).ok()?;
        let until = NaiveDate::parse_from_str(&captures[4], DATE_FORMAT).ok()?;

        Some(Self {
            path: path.to_path_buf(),
            repo: captures[1].to_string(),
            branch: captures[2].to_string(),
            period: PeriodKey { since, until },
        })
    }
}

fn file_name_regex() -> &'static Regex {
    static FILE_NAME: OnceLock<Regex> = OnceLock::new();
    FILE_NAME.get_or_init(|| {
        Regex::new(r"^contributions_([^_]+)_([^_]+)_(\d{4}-\d{2}-\d{2})_(\d{4}-\d{2}-\d{2})\.csv$")
            .expect("file name pattern is valid")
    })
}

/// ファイルを集計期間ごとにグループ化します
///
/// リポジトリ名やブランチ名に関係なく、同じ期間のファイルは同じグループに入ります。
/// グループの順序は各期間が最初に現れた順序です。命名規則に合わないファイルは除外されます。
pub fn group_by_period<P: AsRef<Path>>(paths: &[P]) -> IndexMap<PeriodKey, Vec<ContributionFile>> {
    let mut groups: IndexMap<PeriodKey, Vec<ContributionFile>> = IndexMap::new();

    for path in paths {
        match ContributionFile::parse(path) {
            Some(file) => groups.entry(file.period).or_default().push(file),
            None => tracing::debug!(
                path = %path.as_ref().display(),
                "file name does not follow the contributions naming convention; ignoring"
            ),
        }
    }

    groups
}
