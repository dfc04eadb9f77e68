//! Monitoring spreadsheet ingestion.
//!
//! The first worksheet is read, its first row is the header row and every
//! following row maps positionally onto a [`NewMonitoringRecord`]:
//! state, district, factory, BOD, COD, pH, nitrate, DO, TDS, zone.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDateTime;
use log::debug;

use crate::models::NewMonitoringRecord;
use crate::web::errors::{ServiceError, ServiceResult};

/// Columns past this index are ignored
pub const MONITORING_COLUMNS: usize = 10;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text form of a cell, `None` for blanks.
///
/// Whole floats print without a fraction since spreadsheets store every
/// number as a float.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(x) if dt.is_datetime() => Some(format_date(&x)),
            _ => Some(format!("{}", dt)),
        },
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(format!("{}", e)),
    }
}

fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Maps a row onto the monitoring columns, `first_column` is the sheet column
/// of `row[0]` (calamine ranges start at the first used column).
pub fn record_from_row(row: &[Data], first_column: usize) -> NewMonitoringRecord {
    let mut cells = std::iter::repeat(None)
        .take(first_column)
        .chain(row.iter().map(cell_text))
        .take(MONITORING_COLUMNS)
        .chain(std::iter::repeat(None));
    let mut next = || cells.next().unwrap_or(None);

    NewMonitoringRecord {
        state_name: next(),
        district_name: next(),
        factory_name: next(),
        bod: next(),
        cod: next(),
        ph: next(),
        nitrate: next(),
        dissolved_oxygen: next(),
        tds: next(),
        zone: next(),
    }
}

/// Skips the header row and completely blank rows.
pub fn records_from_rows<'a, I>(rows: I, first_column: usize) -> Vec<NewMonitoringRecord>
    where I: IntoIterator<Item = &'a [Data]>
{
    rows.into_iter()
        .skip(1)
        .filter(|row| row.iter().any(|cell| cell_text(cell).is_some()))
        .map(|row| record_from_row(row, first_column))
        .collect()
}

/// Parses an uploaded workbook, the format is detected from its content.
pub fn read_monitoring_records(data: Vec<u8>) -> ServiceResult<Vec<NewMonitoringRecord>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
    let range = workbook.worksheet_range_at(0)
        .ok_or_else(|| ServiceError::InternalServerError("Workbook has no worksheets".to_string()))??;

    let first_column = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let records = records_from_rows(range.rows(), first_column);
    debug!("Parsed {} monitoring rows", records.len());
    Ok(records)
}
