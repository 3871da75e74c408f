//! ワークブックの書き出しと列幅の自動調整を担当するモジュール

use super::error::ReportError;
use super::table::{Cell, Table};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::Path;

/// 列幅の上限
pub const MAX_COLUMN_WIDTH: f64 = 50.0;

const WIDTH_PADDING: usize = 2;
const WIDTH_SCALE: f64 = 1.2;

/// ワークブック内の1シート分の定義
#[derive(Debug, Clone, Copy)]
pub struct Sheet<'a> {
    pub name: &'a str,
    pub table: &'a Table,
}

impl<'a> Sheet<'a> {
    pub fn new(name: &'a str, table: &'a Table) -> Self {
        Self { name, table }
    }
}

/// 表の各列の幅を計算します
///
/// ヘッダーと全セルの表示文字数の最大値に余白を足して1.2倍し、
/// `MAX_COLUMN_WIDTH`で頭打ちにします。
pub fn column_widths(table: &Table) -> Vec<f64> {
    let mut max_lengths: Vec<usize> = table
        .headers
        .iter()
        .map(|header| header.chars().count())
        .collect();

    for row in &table.rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(max_length) = max_lengths.get_mut(index) {
                *max_length = (*max_length).max(cell.display_len());
            }
        }
    }

    max_lengths
        .into_iter()
        .map(|length| ((length + WIDTH_PADDING) as f64 * WIDTH_SCALE).min(MAX_COLUMN_WIDTH))
        .collect()
}

/// シートを順番に並べたワークブックを書き出します
///
/// 既存のファイルは上書きされます。
///
/// # エラー
///
/// シート名が不正な場合やファイルの保存に失敗した場合に`WriteFailure`を返します。
pub fn write_workbook(path: impl AsRef<Path>, sheets: &[Sheet<'_>]) -> Result<(), ReportError> {
    let path = path.as_ref();
    build_workbook(sheets)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|source| ReportError::WriteFailure {
            path: path.to_path_buf(),
            source,
        })
}

fn build_workbook(sheets: &[Sheet<'_>]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;
        fill_worksheet(worksheet, sheet.table, &header_format)?;
    }

    Ok(workbook)
}

fn fill_worksheet(
    worksheet: &mut Worksheet,
    table: &Table,
    header_format: &Format,
) -> Result<(), XlsxError> {
    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, header, header_format)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, cell) in row.iter().enumerate() {
            let col = column_index(col)?;
            match cell {
                Cell::Blank => {}
                Cell::Number(value) => {
                    worksheet.write_number(row_number, col, *value)?;
                }
                Cell::Text(text) => {
                    worksheet.write_string(row_number, col, text)?;
                }
            }
        }
    }

    for (col, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(column_index(col)?, width)?;
    }

    Ok(())
}

fn column_index(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
