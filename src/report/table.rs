//! CSVから読み込んだ表データを保持するモジュール
//!
//! 各セルはデータフレームと同じ感覚で型推論され、
//! 数値は数値として、空欄は空欄としてワークブックに書き出されます。

use super::error::ReportError;
use std::fs::File;
use std::path::Path;

/// 型推論済みのセル
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Blank,
    Number(f64),
    Text(String),
}

impl Cell {
    /// CSVの生の文字列からセルを推論します
    ///
    /// 有限の10進数として解釈できる文字列は`Number`、空文字列は`Blank`、
    /// それ以外は`Text`になります。`inf`や`NaN`のような綴りは数値として扱いません。
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Blank;
        }

        if looks_numeric(trimmed) {
            if let Ok(value) = trimmed.parse::<f64>() {
                if value.is_finite() {
                    return Cell::Number(value);
                }
            }
        }

        Cell::Text(raw.to_string())
    }

    /// 列幅計算に使う表示上の文字数
    pub fn display_len(&self) -> usize {
        match self {
            Cell::Blank => 0,
            Cell::Number(value) => value.to_string().chars().count(),
            Cell::Text(text) => text.chars().count(),
        }
    }
}

fn looks_numeric(s: &str) -> bool {
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
}

/// ヘッダー行とデータ行からなる表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// UTF-8のCSVファイルを読み込みます
    ///
    /// # エラー
    ///
    /// 以下の場合にエラーを返します：
    /// - ファイルのオープンまたはデコードに失敗（不正なUTF-8を含む）
    /// - 行ごとの列数が揃っていない
    /// - ヘッダー行が存在しない
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let mut reader = open_csv(path)?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| read_failure(path, source))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut table = Table::new(headers);
        for record in reader.records() {
            let record = record.map_err(|source| read_failure(path, source))?;
            table.rows.push(record.iter().map(Cell::infer).collect());
        }

        Ok(table)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// ヘッダー行の存在を確認したうえでCSVリーダーを開きます
pub(crate) fn open_csv(path: &Path) -> Result<csv::Reader<File>, ReportError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| read_failure(path, source))?;
    if reader
        .headers()
        .map_err(|source| read_failure(path, source))?
        .is_empty()
    {
        return Err(ReportError::EmptyCsv(path.to_path_buf()));
    }

    Ok(reader)
}

pub(crate) fn read_failure(path: &Path, source: csv::Error) -> ReportError {
    ReportError::ReadFailure {
        path: path.to_path_buf(),
        source,
    }
}
