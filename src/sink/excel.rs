//! Excelログ
//!
//! xlsxは追記できないため、既存の行をcalamineで読み戻し、
//! 新しい行を末尾に加えてブック全体を書き直す。
//! 他のシートは値のみ元の位置のまま引き継ぐ。

use super::{RecordSink, HEADER};
use crate::error::{InterlockError, Result};
use calamine::{open_workbook, Reader, Xlsx};
use interlock_common::LogRow;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};

const COLUMN_WIDTHS: [f64; 3] = [20.0, 24.0, 80.0];

pub struct XlsxSink {
    path: PathBuf,
    sheet_name: String,
}

impl XlsxSink {
    pub fn new(path: &Path, sheet_name: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            sheet_name: sheet_name.to_string(),
        }
    }
}

impl RecordSink for XlsxSink {
    fn append(&mut self, row: &LogRow) -> Result<()> {
        let mut sheets = if self.path.exists() {
            read_sheets(&self.path)?
        } else {
            Vec::new()
        };

        match sheets.iter_mut().find(|sheet| sheet.name == self.sheet_name) {
            Some(sheet) => {
                if sheet.cells.is_empty() {
                    sheet.cells.push(HEADER.iter().map(|h| h.to_string()).collect());
                }
                sheet.cells.push(row.columns().iter().map(|c| c.to_string()).collect());
            }
            None => sheets.push(SheetCells {
                name: self.sheet_name.clone(),
                origin: (0, 0),
                cells: vec![
                    HEADER.iter().map(|h| h.to_string()).collect(),
                    row.columns().iter().map(|c| c.to_string()).collect(),
                ],
            }),
        }

        write_sheets(&self.path, &sheets, &self.sheet_name)
    }
}

/// 1シート分のセル値
///
/// calamineの範囲は最初の使用セルから始まるため、
/// `origin` にその `(row, col)` を保持して元の位置に書き戻す。
struct SheetCells {
    name: String,
    origin: (u32, u32),
    cells: Vec<Vec<String>>,
}

fn read_sheets(path: &Path) -> Result<Vec<SheetCells>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| InterlockError::Sink(format!("cannot open {}: {}", path.display(), e)))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| InterlockError::Sink(format!("cannot read sheet {}: {}", name, e)))?;
        let cells = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        sheets.push(SheetCells {
            name,
            origin: range.start().unwrap_or((0, 0)),
            cells,
        });
    }
    Ok(sheets)
}

fn build_workbook(sheets: &[SheetCells], log_sheet: &str) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        let is_log = sheet.name == log_sheet;
        let (first_row, first_col) = sheet.origin;
        if is_log {
            for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
                worksheet.set_column_width(col as u16, *width)?;
            }
        }

        for (row_idx, row) in sheet.cells.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let cell_row = first_row + row_idx as u32;
                let cell_col = (first_col + col_idx as u32) as u16;
                if is_log && row_idx == 0 {
                    worksheet.write_string_with_format(cell_row, cell_col, value, &header_format)?;
                } else {
                    worksheet.write_string(cell_row, cell_col, value)?;
                }
            }
        }
    }

    Ok(workbook)
}

fn write_sheets(path: &Path, sheets: &[SheetCells], log_sheet: &str) -> Result<()> {
    let sink_error = |e: XlsxError| InterlockError::Sink(format!("{}: {}", path.display(), e));

    let mut workbook = build_workbook(sheets, log_sheet).map_err(sink_error)?;

    // 一時ファイルに保存してから置き換える（失敗しても元のログは残る）
    let temp_path = path.with_extension("xlsx.tmp");
    workbook.save(&temp_path).map_err(sink_error)?;
    std::fs::rename(&temp_path, path)?;
    Ok(())
}

/// `sheet_name` のログ行（ヘッダ除く）
pub fn read_rows(path: &Path, sheet_name: &str) -> Result<Vec<LogRow>> {
    let sheets = read_sheets(path)?;
    let Some(sheet) = sheets.into_iter().find(|sheet| sheet.name == sheet_name) else {
        return Ok(Vec::new());
    };

    let rows = sheet
        .cells
        .into_iter()
        .filter(|row| row.first().map(String::as_str) != Some(HEADER[0]))
        .map(|row| {
            let mut columns = row.into_iter();
            LogRow {
                timestamp: columns.next().unwrap_or_default(),
                name: columns.next().unwrap_or_default(),
                description: columns.next().unwrap_or_default(),
            }
        })
        .collect();
    Ok(rows)
}
