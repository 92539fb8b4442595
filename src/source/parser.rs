//! Parsing of the master and offer details sheets.
//!
//! Both sheets are read positionally; the first row is a header and is
//! skipped. Cells are trimmed before use.

use crate::models::{Choice, Gender, OfferRecord, OfferType, Status, StudentRecord};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading sheet CSV text.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("CSV parse error at row {row}: {message}")]
    Csv { row: usize, message: String },

    #[error("No student records found in the spreadsheet.")]
    NoStudents,

    #[error("No valid student records found after parsing.")]
    NoValidStudents,
}

/// Master sheet columns: serial/roll, reg no, name, gender, class,
/// section, choice, status, companies.
const MASTER_MIN_CELLS: usize = 7;

/// Offer sheet columns: roll no, name, company, CTC, offer type, date.
const OFFER_MIN_CELLS: usize = 5;

/// Read every row (header included) as a vector of trimmed cells.
fn read_rows(text: &str) -> Result<Vec<Vec<String>>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ParseError::Csv {
            row: e.position().map(|p| p.line() as usize).unwrap_or(index + 1),
            message: e.to_string(),
        })?;

        let cells: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(cells);
    }
    Ok(rows)
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Split a comma separated company cell into trimmed, non-empty names.
pub fn split_companies(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a CTC cell such as `"12,00,000"`; anything unreadable is 0.
pub fn parse_ctc(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Parse the master sheet into student records.
pub fn parse_master_sheet(text: &str) -> Result<Vec<StudentRecord>, ParseError> {
    let rows = read_rows(text)?;
    if rows.len() < 2 {
        return Err(ParseError::NoStudents);
    }

    let mut records = Vec::new();
    for row in rows.iter().skip(1) {
        if row.len() < MASTER_MIN_CELLS {
            continue;
        }

        let reg_no = cell(row, 1);
        let name = cell(row, 2);
        if reg_no.is_empty() && name.is_empty() {
            continue;
        }

        records.push(StudentRecord {
            reg_no: reg_no.to_string(),
            roll_no: cell(row, 0).to_string(),
            name: name.to_string(),
            gender: Gender::from(cell(row, 3)),
            cls: cell(row, 4).to_string(),
            section: cell(row, 5).to_string(),
            choice: Choice::from(cell(row, 6)),
            status: Status::from(cell(row, 7)),
            companies: split_companies(cell(row, 8)),
        });
    }

    if records.is_empty() {
        return Err(ParseError::NoValidStudents);
    }

    debug!("Parsed {} student records", records.len());
    Ok(records)
}

/// Parse the offer details sheet into offer records.
///
/// Unrecognized offer types are read as `Regular`.
pub fn parse_offer_details(text: &str) -> Result<Vec<OfferRecord>, ParseError> {
    let rows = read_rows(text)?;

    let mut records = Vec::new();
    for row in rows.iter().skip(1) {
        if row.len() < OFFER_MIN_CELLS {
            continue;
        }

        let roll_no = cell(row, 0);
        let name = cell(row, 1);
        let company = cell(row, 2);
        if roll_no.is_empty() && name.is_empty() {
            continue;
        }
        if company.is_empty() {
            continue;
        }

        records.push(OfferRecord {
            roll_no: roll_no.to_string(),
            name: name.to_string(),
            company: company.to_string(),
            ctc: parse_ctc(cell(row, 3)),
            offer_type: OfferType::parse(cell(row, 4)).unwrap_or(OfferType::Regular),
            offer_date: cell(row, 5).to_string(),
        });
    }

    debug!("Parsed {} offer records", records.len());
    Ok(records)
}
