//! CSV intake for the divisions and cost codes spreadsheet tabs.
//!
//! Headers are matched case-insensitively, with spaces and dashes read as
//! underscores, so `Division Number`, `division-number` and
//! `DIVISION_NUMBER` all land in the same field. Unknown columns are ignored.
//! Cell-level problems (a non-numeric order, say) are left for row
//! validation; only a structurally broken file is an error here.

use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;

use crate::errors::ValidationError;
use crate::Result;

use super::import_model::parse_flag;
use super::{CostCodeImportRow, DivisionImportRow, OrderValue};

/// Normalizes a header cell to its snake_case field name.
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Header name -> column index, resolving aliases to canonical field names.
struct HeaderMap {
    columns: HashMap<String, usize>,
}

impl HeaderMap {
    fn new(headers: &StringRecord, aliases: &[(&str, &str)]) -> Self {
        let mut columns = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            let name = normalize_header(header);
            let canonical = aliases
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, field)| field.to_string())
                .unwrap_or(name);
            columns.entry(canonical).or_insert(index);
        }
        Self { columns }
    }

    fn require(&self, fields: &[&str]) -> Result<()> {
        let missing: Vec<&str> = fields
            .iter()
            .copied()
            .filter(|f| !self.columns.contains_key(*f))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::CsvParse(format!(
                "missing column(s): {}",
                missing.join(", ")
            ))
            .into())
        }
    }

    fn text(&self, record: &StringRecord, field: &str) -> Option<String> {
        self.columns
            .get(field)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn order(&self, record: &StringRecord, field: &str) -> Option<OrderValue> {
        self.text(record, field)
            .and_then(|text| OrderValue::parse(&text))
    }

    fn flag(&self, record: &StringRecord, field: &str) -> Option<bool> {
        self.text(record, field).and_then(|text| parse_flag(&text))
    }
}

const DIVISION_ALIASES: &[(&str, &str)] = &[
    ("number", "division_number"),
    ("division_no", "division_number"),
    ("name", "division_name"),
    ("order", "division_order"),
    ("active", "is_active"),
];

const COST_CODE_ALIASES: &[(&str, &str)] = &[
    ("cost_code", "cost_code_number"),
    ("number", "cost_code_number"),
    ("name", "cost_code_name"),
    ("division", "division_number"),
    ("parent", "parent_cost_code_number"),
    ("parent_cost_code", "parent_cost_code_number"),
    ("parent_number", "parent_cost_code_number"),
    ("order_number", "order"),
    ("active", "is_active"),
];

/// Reads all non-empty records of a sheet, returning the header map built
/// with `aliases`.
fn read_sheet(content: &str, aliases: &[(&str, &str)]) -> Result<(HeaderMap, Vec<StringRecord>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = HeaderMap::new(reader.headers()?, aliases);
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok((headers, records))
}

/// Parses the divisions tab.
pub fn parse_division_csv(content: &str) -> Result<Vec<DivisionImportRow>> {
    let (headers, records) = read_sheet(content, DIVISION_ALIASES)?;
    headers.require(&["division_number", "division_name"])?;

    let rows: Vec<DivisionImportRow> = records
        .iter()
        .map(|record| DivisionImportRow {
            division_number: headers.text(record, "division_number"),
            division_name: headers.text(record, "division_name"),
            division_order: headers.order(record, "division_order"),
            description: headers.text(record, "description"),
            is_active: headers.flag(record, "is_active"),
            invalid_cells: Vec::new(),
        })
        .collect();
    debug!("Parsed {} division rows from CSV", rows.len());
    Ok(rows)
}

/// Parses the cost codes tab.
pub fn parse_cost_code_csv(content: &str) -> Result<Vec<CostCodeImportRow>> {
    let (headers, records) = read_sheet(content, COST_CODE_ALIASES)?;
    headers.require(&["cost_code_number", "cost_code_name"])?;

    let rows: Vec<CostCodeImportRow> = records
        .iter()
        .map(|record| CostCodeImportRow {
            cost_code_number: headers.text(record, "cost_code_number"),
            cost_code_name: headers.text(record, "cost_code_name"),
            division_number: headers.text(record, "division_number"),
            parent_cost_code_number: headers.text(record, "parent_cost_code_number"),
            order: headers.order(record, "order"),
            description: headers.text(record, "description"),
            is_active: headers.flag(record, "is_active"),
            invalid_cells: Vec::new(),
        })
        .collect();
    debug!("Parsed {} cost code rows from CSV", rows.len());
    Ok(rows)
}
