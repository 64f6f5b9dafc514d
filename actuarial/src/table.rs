use crate::errors::AnalysisError;
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// A worksheet split into a header row and the records below it.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    /// (1-based spreadsheet row, cells)
    records: Vec<(usize, Vec<Data>)>,
}

impl Table {
    /// Reads the first worksheet of the workbook at `path`.
    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        if !path.is_file() {
            return Err(AnalysisError::NotFound);
        }

        let workbook =
            open_workbook_auto(path).map_err(|e| AnalysisError::Parse(e.to_string()))?;
        Self::from_first_sheet(workbook)
    }

    /// Reads the first worksheet of an in-memory workbook.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AnalysisError> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;
        Self::from_first_sheet(workbook)
    }

    fn from_first_sheet<RS: Read + Seek>(mut workbook: Sheets<RS>) -> Result<Self, AnalysisError> {
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AnalysisError::Parse("workbook contains no sheets".into()))?
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;

        Ok(Self::from_range(&range))
    }

    /// The first row of the used range is the header; fully empty rows are skipped.
    pub fn from_range(range: &Range<Data>) -> Self {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows = range.rows().enumerate();

        let headers = match rows.next() {
            Some((_, header)) => header.iter().map(|cell| cell.to_string()).collect(),
            None => Vec::new(),
        };

        let records = rows
            .filter(|(_, row)| !row.iter().all(is_blank))
            .map(|(index, row)| (first_row + index + 1, row.to_vec()))
            .collect();

        Table { headers, records }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Sums a numeric column. Empty cells count as zero.
    pub fn sum_column(&self, name: &str) -> Result<f64, AnalysisError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| AnalysisError::MissingColumns(vec![name.to_string()]))?;

        let mut total = 0.0;
        for (row_number, row) in &self.records {
            let cell = row.get(index).unwrap_or(&Data::Empty);
            let value = numeric_value(cell).ok_or_else(|| {
                AnalysisError::Parse(format!(
                    "non-numeric value '{cell}' in column {name} at row {row_number}"
                ))
            })?;
            total += value;
        }

        Ok(total)
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn numeric_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(value) => Some(*value),
        Data::Int(value) => Some(*value as f64),
        Data::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
        Data::Empty => Some(0.0),
        Data::String(s) if s.trim().is_empty() => Some(0.0),
        Data::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
