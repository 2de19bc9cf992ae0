//! Request and response shapes for the bulk cost-code import.
//!
//! Row fields mirror the spreadsheet columns, so they are snake_case on the
//! wire and every field is optional: a missing value is a row-level
//! validation error, never a rejection of the whole request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A numeric spreadsheet cell. Cells that do not hold a whole number are kept
/// as text so validation can report them per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrderValue {
    Number(i64),
    Invalid(String),
}

impl OrderValue {
    /// Parses a cell's text. Blank cells are absent.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(n) = text.parse::<i64>() {
            return Some(OrderValue::Number(n));
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(OrderValue::Number(f as i64))
            }
            _ => Some(OrderValue::Invalid(text.to_string())),
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            OrderValue::Number(n) => Some(*n),
            OrderValue::Invalid(_) => None,
        }
    }
}

fn order_cell(value: Option<Value>) -> Option<OrderValue> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => OrderValue::parse(&s),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Some(OrderValue::Number(i)),
            None => OrderValue::parse(&n.to_string()),
        },
        Some(other) => Some(OrderValue::Invalid(other.to_string())),
    }
}

/// Reads spreadsheet booleans: `true`/`false`, `yes`/`no`, `y`/`n`, `1`/`0`,
/// `active`/`inactive`. Anything else is absent.
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "active" => Some(true),
        "false" | "no" | "n" | "0" | "inactive" => Some(false),
        _ => None,
    }
}

fn flag_cell(value: Option<Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => parse_flag(&s),
        Some(Value::Number(n)) => parse_flag(&n.to_string()),
        _ => None,
    }
}

/// Collects text cells of one row. Text may arrive as a number when the sheet
/// was typed loosely (`"division_number": 3`); blank text is absent. Lists and
/// objects are recorded by field name so validation rejects only this row.
#[derive(Default)]
struct TextCells {
    invalid: Vec<String>,
}

impl TextCells {
    fn read(&mut self, field: &str, value: Option<Value>) -> Option<String> {
        let text = match value {
            None | Some(Value::Null) => return None,
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(_) => {
                self.invalid.push(field.to_string());
                return None;
            }
        };
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Wire shape of a divisions sheet row before cell coercion
#[derive(Deserialize)]
struct RawDivisionRow {
    #[serde(default)]
    division_number: Option<Value>,
    #[serde(default)]
    division_name: Option<Value>,
    #[serde(default)]
    division_order: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    is_active: Option<Value>,
}

/// Wire shape of a cost codes sheet row before cell coercion
#[derive(Deserialize)]
struct RawCostCodeRow {
    #[serde(default)]
    cost_code_number: Option<Value>,
    #[serde(default)]
    cost_code_name: Option<Value>,
    #[serde(default)]
    division_number: Option<Value>,
    #[serde(default)]
    parent_cost_code_number: Option<Value>,
    #[serde(default)]
    order: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    is_active: Option<Value>,
}

/// One row of the divisions sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawDivisionRow")]
pub struct DivisionImportRow {
    pub division_number: Option<String>,
    pub division_name: Option<String>,
    pub division_order: Option<OrderValue>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    /// Fields whose cell held a list or object instead of text
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_cells: Vec<String>,
}

impl From<RawDivisionRow> for DivisionImportRow {
    fn from(raw: RawDivisionRow) -> Self {
        let mut cells = TextCells::default();
        Self {
            division_number: cells.read("division_number", raw.division_number),
            division_name: cells.read("division_name", raw.division_name),
            division_order: order_cell(raw.division_order),
            description: cells.read("description", raw.description),
            is_active: flag_cell(raw.is_active),
            invalid_cells: cells.invalid,
        }
    }
}

/// One row of the cost codes sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawCostCodeRow")]
pub struct CostCodeImportRow {
    pub cost_code_number: Option<String>,
    pub cost_code_name: Option<String>,
    /// Natural key of the division this cost code belongs to
    pub division_number: Option<String>,
    /// Natural key of the parent cost code
    pub parent_cost_code_number: Option<String>,
    pub order: Option<OrderValue>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    /// Fields whose cell held a list or object instead of text
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_cells: Vec<String>,
}

impl From<RawCostCodeRow> for CostCodeImportRow {
    fn from(raw: RawCostCodeRow) -> Self {
        let mut cells = TextCells::default();
        Self {
            cost_code_number: cells.read("cost_code_number", raw.cost_code_number),
            cost_code_name: cells.read("cost_code_name", raw.cost_code_name),
            division_number: cells.read("division_number", raw.division_number),
            parent_cost_code_number: cells
                .read("parent_cost_code_number", raw.parent_cost_code_number),
            order: order_cell(raw.order),
            description: cells.read("description", raw.description),
            is_active: flag_cell(raw.is_active),
            invalid_cells: cells.invalid,
        }
    }
}

impl DivisionImportRow {
    /// Trimmed division number, `None` when blank.
    pub fn number(&self) -> Option<&str> {
        non_blank(self.division_number.as_deref())
    }
}

impl CostCodeImportRow {
    /// Trimmed cost code number, `None` when blank.
    pub fn number(&self) -> Option<&str> {
        non_blank(self.cost_code_number.as_deref())
    }

    /// Trimmed parent reference, `None` when blank.
    pub fn parent_number(&self) -> Option<&str> {
        non_blank(self.parent_cost_code_number.as_deref())
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Bulk import request. `divisions` and `configurations` must both be present
/// as arrays; a request without them is rejected before anything is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCodeImportRequest {
    #[serde(default, alias = "corporationUuid")]
    pub corporation_uuid: Option<String>,
    pub divisions: Vec<DivisionImportRow>,
    pub configurations: Vec<CostCodeImportRow>,
}

/// Bulk import from the two spreadsheet tabs exported as CSV text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCodeCsvImportRequest {
    #[serde(default, alias = "corporation_uuid")]
    pub corporation_uuid: Option<String>,
    #[serde(default, alias = "divisions_csv")]
    pub divisions_csv: Option<String>,
    #[serde(default, alias = "configurations_csv")]
    pub configurations_csv: Option<String>,
}

/// Per-category tallies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportCategoryResult {
    #[serde(rename = "new")]
    pub new_count: usize,
    pub duplicates: usize,
    pub total: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostCodeImportData {
    pub divisions: ImportCategoryResult,
    pub configurations: ImportCategoryResult,
}

/// Aggregated result returned once the whole batch has been processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCodeImportResponse {
    pub success: bool,
    pub message: String,
    pub data: CostCodeImportData,
}
