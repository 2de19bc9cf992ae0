//! Domain models for divisions, cost codes and GL accounts.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A division groups cost codes (e.g. "03 - Concrete") within a corporation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub id: String,
    pub corporation_uuid: String,
    pub division_number: String,
    pub division_name: String,
    pub division_order: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data for creating a new division
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDivision {
    pub id: Option<String>,
    pub corporation_uuid: String,
    pub division_number: String,
    pub division_name: String,
    pub division_order: i32,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// A cost code configuration. Cost codes nest through `parent_cost_code_id`,
/// at most three levels deep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostCodeConfiguration {
    pub id: String,
    pub corporation_uuid: String,
    pub cost_code_number: String,
    pub cost_code_name: String,
    pub division_id: Option<String>,
    pub parent_cost_code_id: Option<String>,
    pub gl_account_id: Option<String>,
    pub order_number: Option<i32>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data for creating a new cost code configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCostCodeConfiguration {
    pub id: Option<String>,
    pub corporation_uuid: String,
    pub cost_code_number: String,
    pub cost_code_name: String,
    pub division_id: Option<String>,
    pub parent_cost_code_id: Option<String>,
    pub gl_account_id: Option<String>,
    pub order_number: Option<i32>,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// General-ledger account that cost codes post to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlAccount {
    pub id: String,
    pub corporation_uuid: String,
    pub account_number: String,
    pub account_name: String,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data for creating a new GL account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGlAccount {
    pub id: Option<String>,
    pub corporation_uuid: String,
    pub account_number: String,
    pub account_name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// A cost code with its nested children (tree view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCodeNode {
    pub configuration: CostCodeConfiguration,
    pub children: Vec<CostCodeNode>,
}

/// Root cost codes grouped under their division. `division` is `None` for
/// cost codes that are not assigned to any division.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionCostCodes {
    pub division: Option<Division>,
    pub cost_codes: Vec<CostCodeNode>,
}

fn default_active() -> bool {
    true
}
