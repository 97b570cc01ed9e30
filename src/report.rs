//! Renders comment-response workbooks from review-comment CSV exports.
//!
//! The template workbook carries a title row and a header row; data rows
//! start at row 3. Columns: "No.", "Rev.", "Page.", "OE/Owner Comment".
//! Rows carried over from a previous revision come first and are renumbered,
//! then the new comment rows follow with a continuous running number.

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::protocol::ReportRequest;

/// First data row. Row 1 is the sheet title, row 2 the column headers.
const DATA_START_ROW: u32 = 3;
const COL_NO: u32 = 1;
const COL_REV: u32 = 2;
const COL_PAGE: u32 = 3;
const COL_COMMENT: u32 = 4;

/// Status markers that appear alone in the Text column and carry no comment
/// worth responding to.
const SKIP_TEXT_VALUES: [&str; 4] = ["closed", "close", "open", "opened"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{0}` is not UTF-8 encoded; re-export the CSV as UTF-8")]
    InvalidEncoding(PathBuf),
    #[error("CSV must have columns `Page` and `Text`; got {0:?}")]
    MissingColumns(Vec<String>),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("template not found: {0}")]
    TemplateMissing(PathBuf),
    #[error("failed to read workbook: {0}")]
    WorkbookRead(String),
    #[error("failed to write workbook: {0}")]
    WorkbookWrite(String),
}

/// One comment parsed from the CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub page: String,
    pub text: String,
}

/// Render the response workbook for `request`, returning the data row count.
pub fn render(request: &ReportRequest, template_path: &Path) -> Result<usize, ReportError> {
    if !template_path.exists() {
        return Err(ReportError::TemplateMissing(template_path.to_path_buf()));
    }
    let mut book = umya_spreadsheet::reader::xlsx::read(template_path)
        .map_err(|e| ReportError::WorkbookRead(format!("{:?}", e)))?;

    let previous_rows = match &request.previous {
        Some(path) => read_previous_rows(path)?,
        None => Vec::new(),
    };
    let comments = parse_comments(&request.source)?;
    let rows = fill_workbook(&mut book, &previous_rows, &comments, request.revision.as_deref());

    if let Some(parent) = request.output.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    umya_spreadsheet::writer::xlsx::write(&book, &request.output)
        .map_err(|e| ReportError::WorkbookWrite(format!("{:?}", e)))?;
    Ok(rows)
}

/// Parse the comment CSV on disk, dropping rows with no actionable text.
pub fn parse_comments(path: &Path) -> Result<Vec<CommentRow>, ReportError> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text =
        String::from_utf8(bytes).map_err(|_| ReportError::InvalidEncoding(path.to_path_buf()))?;
    parse_comments_str(&text)
}

/// Parse CSV text with `Page` and `Text` columns. A UTF-8 BOM before the
/// first header is tolerated, as some spreadsheet exports prepend one.
pub fn parse_comments_str(text: &str) -> Result<Vec<CommentRow>, ReportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let page_column = headers.iter().position(|header| header.trim() == "Page");
    let text_column = headers.iter().position(|header| header.trim() == "Text");
    let (Some(page_column), Some(text_column)) = (page_column, text_column) else {
        return Err(ReportError::MissingColumns(
            headers.iter().map(str::to_string).collect(),
        ));
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let text_value = record.get(text_column).unwrap_or("");
        let trimmed = text_value.trim();
        if trimmed.is_empty() || SKIP_TEXT_VALUES.contains(&trimmed.to_lowercase().as_str()) {
            continue;
        }
        rows.push(CommentRow {
            page: record.get(page_column).unwrap_or("").to_string(),
            text: text_value.to_string(),
        });
    }
    debug!("Parsed {} comment rows", rows.len());
    Ok(rows)
}

/// Read all data rows of a previous-revision workbook, every column preserved.
pub fn read_previous_rows(path: &Path) -> Result<Vec<Vec<String>>, ReportError> {
    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| ReportError::WorkbookRead(format!("{:?}", e)))?;
    Ok(carried_rows(book.get_active_sheet()))
}

/// Data rows of a response sheet, from the first data row until the "No.",
/// "Page." and comment cells are all empty.
fn carried_rows(sheet: &Worksheet) -> Vec<Vec<String>> {
    let max_column = sheet.get_highest_column();
    let mut rows = Vec::new();
    let mut row = DATA_START_ROW;
    loop {
        let no = sheet.get_value((COL_NO, row));
        let page = sheet.get_value((COL_PAGE, row));
        let comment = sheet.get_value((COL_COMMENT, row));
        if no.is_empty() && page.is_empty() && comment.is_empty() {
            break;
        }
        rows.push(
            (1..=max_column)
                .map(|column| sheet.get_value((column, row)))
                .collect(),
        );
        row += 1;
    }
    rows
}

/// Fill a template workbook with carried-over and new comment rows.
/// Returns the number of data rows written.
pub fn fill_workbook(
    book: &mut Spreadsheet,
    previous_rows: &[Vec<String>],
    comments: &[CommentRow],
    revision: Option<&str>,
) -> usize {
    let sheet = book.get_active_sheet_mut();
    let mut index: u32 = 0;

    for cells in previous_rows {
        let row = DATA_START_ROW + index;
        index += 1;
        for (offset, value) in cells.iter().enumerate() {
            let column = offset as u32 + 1;
            if column == COL_NO {
                // Carried rows are renumbered; every other column is kept.
                sheet.get_cell_mut((column, row)).set_value_number(index);
            } else if !value.is_empty() {
                sheet.get_cell_mut((column, row)).set_value(value.as_str());
            }
        }
    }

    for comment in comments {
        let row = DATA_START_ROW + index;
        index += 1;
        sheet.get_cell_mut((COL_NO, row)).set_value_number(index);
        if let Some(revision) = revision {
            sheet.get_cell_mut((COL_REV, row)).set_value(revision);
        }
        sheet.get_cell_mut((COL_PAGE, row)).set_value(comment.page.as_str());
        sheet
            .get_cell_mut((COL_COMMENT, row))
            .set_value(comment.text.as_str());
    }

    index as usize
}

/// Output workbook name for a source CSV: same base name, `.xlsx` extension.
pub fn output_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    format!("{}.xlsx", stem)
}
