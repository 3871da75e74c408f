//! 入力ディレクトリから統計CSVファイルを探すモジュール
//!
//! globパターンは正規表現に変換してから、ディレクトリ直下のファイル名と照合します。

use super::error::ReportError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// `dir`直下でパターンに一致する通常ファイルを、パス順に並べて返します
///
/// # エラー
///
/// 以下の場合にエラーを返します：
/// - パターンを正規表現に変換できない
/// - ディレクトリの読み込みに失敗
pub fn find_matching_files(
    dir: impl AsRef<Path>,
    pattern: &str,
) -> Result<Vec<PathBuf>, ReportError> {
    let dir = dir.as_ref();
    let matcher = Regex::new(&glob_to_regex(pattern))
        .map_err(|e| ReportError::InvalidPattern(e.to_string()))?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| matcher.is_match(name));
        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::new();
    regex.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '[' => {
                // 閉じ括弧がなければ'['そのものとして扱う
                let class: String = chars.clone().take_while(|&c| c != ']').collect();
                let closed = chars.clone().nth(class.chars().count()) == Some(']');
                if !closed || class.is_empty() {
                    regex.push_str(r"\[");
                    continue;
                }

                for _ in 0..=class.chars().count() {
                    chars.next();
                }

                regex.push('[');
                let body = match class.strip_prefix('!') {
                    Some(negated) => {
                        regex.push('^');
                        negated
                    }
                    None => class.as_str(),
                };
                for c in body.chars() {
                    match c {
                        '\\' | '[' | '^' | '&' | '~' => {
                            regex.push('\\');
                            regex.push(c);
                        }
                        _ => regex.push(c),
                    }
                }
                regex.push(']');
            }
            c if c.is_alphanumeric() => regex.push(c),
            _ => regex.push_str(&regex::escape(&c.to_string())),
        }
    }

    regex.push('$');
    regex
}
