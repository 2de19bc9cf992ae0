//! Row-level validation for imported divisions and cost codes.
//!
//! Validation never fails the import: a rejected row yields exactly one
//! human-readable message which the caller appends to the category's error
//! list.

use std::ops::RangeInclusive;

use crate::constants::{COST_CODE_ORDER_RANGE, DIVISION_ORDER_RANGE};

use super::import_model::non_blank;
use super::{CostCodeImportRow, DivisionImportRow, OrderValue};

/// A division row that passed validation, with trimmed fields
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDivisionRow {
    pub division_number: String,
    pub division_name: String,
    pub division_order: i32,
    pub description: Option<String>,
    pub is_active: bool,
}

/// A cost code row that passed validation, with trimmed fields
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCostCodeRow {
    pub cost_code_number: String,
    pub cost_code_name: String,
    pub division_number: Option<String>,
    pub parent_cost_code_number: Option<String>,
    pub order_number: Option<i32>,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Label used to prefix row errors: the natural key when present, otherwise
/// the 1-based row position.
pub fn row_label(number: Option<&str>, index: usize) -> String {
    match non_blank(number) {
        Some(n) => n.to_string(),
        None => format!("row {}", index + 1),
    }
}

/// Checks that `value` lies in `range`. Shared with the CRUD service so both
/// paths report the same message.
pub fn check_order(value: i64, range: &RangeInclusive<i64>) -> Result<i32, String> {
    if range.contains(&value) {
        Ok(value as i32)
    } else {
        Err(format!(
            "Order must be between {} and {}",
            range.start(),
            range.end()
        ))
    }
}

fn order_number(value: &OrderValue, range: &RangeInclusive<i64>) -> Result<i32, String> {
    match value {
        OrderValue::Number(n) => check_order(*n, range),
        OrderValue::Invalid(text) => Err(format!("Order must be a whole number, got '{}'", text)),
    }
}

fn check_cells(invalid_cells: &[String]) -> Result<(), String> {
    if invalid_cells.is_empty() {
        Ok(())
    } else {
        Err(format!("Expected text for field(s): {}", invalid_cells.join(", ")))
    }
}

fn missing_fields(fields: &[(&str, bool)]) -> String {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    format!("Missing required field(s): {}", missing.join(", "))
}

/// Validates one division row: number, name and order are required and the
/// order must lie in 1..=100. Order collisions with other rows are allowed.
pub fn validate_division_row(row: &DivisionImportRow) -> Result<ValidDivisionRow, String> {
    check_cells(&row.invalid_cells)?;
    let number = non_blank(row.division_number.as_deref());
    let name = non_blank(row.division_name.as_deref());

    let (number, name, order) = match (number, name, row.division_order.as_ref()) {
        (Some(number), Some(name), Some(order)) => (number, name, order),
        _ => {
            return Err(missing_fields(&[
                ("division_number", number.is_some()),
                ("division_name", name.is_some()),
                ("division_order", row.division_order.is_some()),
            ]))
        }
    };

    Ok(ValidDivisionRow {
        division_number: number.to_string(),
        division_name: name.to_string(),
        division_order: order_number(order, &DIVISION_ORDER_RANGE)?,
        description: non_blank(row.description.as_deref()).map(str::to_string),
        is_active: row.is_active.unwrap_or(true),
    })
}

/// Validates one cost code row: number and name are required, a provided
/// order must lie in 1..=200.
pub fn validate_cost_code_row(row: &CostCodeImportRow) -> Result<ValidCostCodeRow, String> {
    check_cells(&row.invalid_cells)?;
    let number = row.number();
    let name = non_blank(row.cost_code_name.as_deref());

    let (number, name) = match (number, name) {
        (Some(number), Some(name)) => (number, name),
        _ => {
            return Err(missing_fields(&[
                ("cost_code_number", number.is_some()),
                ("cost_code_name", name.is_some()),
            ]))
        }
    };

    let order_number = row
        .order
        .as_ref()
        .map(|order| order_number(order, &COST_CODE_ORDER_RANGE))
        .transpose()?;

    Ok(ValidCostCodeRow {
        cost_code_number: number.to_string(),
        cost_code_name: name.to_string(),
        division_number: non_blank(row.division_number.as_deref()).map(str::to_string),
        parent_cost_code_number: row.parent_number().map(str::to_string),
        order_number,
        description: non_blank(row.description.as_deref()).map(str::to_string),
        is_active: row.is_active.unwrap_or(true),
    })
}
