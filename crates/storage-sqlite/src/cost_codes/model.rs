//! Database models for divisions, cost codes and GL accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use sitebook_core::cost_codes::{
    CostCodeConfiguration, Division, GlAccount, NewCostCodeConfiguration, NewDivision,
    NewGlAccount,
};

/// Helper to parse RFC3339 string to NaiveDateTime
fn text_to_datetime(s: &str) -> NaiveDateTime {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .unwrap_or_else(|e| {
            error!("Failed to parse datetime '{}': {}", s, e);
            chrono::Utc::now().naive_utc()
        })
}

/// Database model for divisions
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::divisions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DivisionDB {
    pub id: String,
    pub corporation_uuid: String,
    pub division_number: String,
    pub division_name: String,
    pub division_order: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String, // Schema uses Text
    pub updated_at: String, // Schema uses Text
}

/// Database model for creating a new division
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::divisions)]
#[serde(rename_all = "camelCase")]
pub struct NewDivisionDB {
    pub id: Option<String>,
    pub corporation_uuid: String,
    pub division_number: String,
    pub division_name: String,
    pub division_order: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Columns written when a division is updated. `created_at` is never part of
/// an update.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::divisions)]
#[diesel(treat_none_as_null = true)]
pub struct DivisionChangesetDB {
    pub division_number: String,
    pub division_name: String,
    pub division_order: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub updated_at: String,
}

/// Database model for cost code configurations
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::cost_code_configurations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CostCodeConfigurationDB {
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
    pub created_at: String,
    pub updated_at: String,
}

/// Database model for creating a new cost code configuration
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::cost_code_configurations)]
#[serde(rename_all = "camelCase")]
pub struct NewCostCodeConfigurationDB {
    pub id: Option<String>,
    pub corporation_uuid: String,
    pub cost_code_number: String,
    pub cost_code_name: String,
    pub division_id: Option<String>,
    pub parent_cost_code_id: Option<String>,
    pub gl_account_id: Option<String>,
    pub order_number: Option<i32>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Columns written when a cost code configuration is updated
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::cost_code_configurations)]
#[diesel(treat_none_as_null = true)]
pub struct CostCodeConfigurationChangesetDB {
    pub cost_code_number: String,
    pub cost_code_name: String,
    pub division_id: Option<String>,
    pub parent_cost_code_id: Option<String>,
    pub gl_account_id: Option<String>,
    pub order_number: Option<i32>,
    pub description: Option<String>,
    pub is_active: bool,
    pub updated_at: String,
}

/// Database model for GL accounts
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::gl_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GlAccountDB {
    pub id: String,
    pub corporation_uuid: String,
    pub account_number: String,
    pub account_name: String,
    pub is_default: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::gl_accounts)]
#[serde(rename_all = "camelCase")]
pub struct NewGlAccountDB {
    pub id: Option<String>,
    pub corporation_uuid: String,
    pub account_number: String,
    pub account_name: String,
    pub is_default: bool,
    pub created_at: String,
    pub updated_at: String,
}

// Conversion to domain models
impl From<DivisionDB> for Division {
    fn from(db: DivisionDB) -> Self {
        Self {
            id: db.id,
            corporation_uuid: db.corporation_uuid,
            division_number: db.division_number,
            division_name: db.division_name,
            division_order: db.division_order,
            description: db.description,
            is_active: db.is_active,
            created_at: text_to_datetime(&db.created_at),
            updated_at: text_to_datetime(&db.updated_at),
        }
    }
}

impl From<CostCodeConfigurationDB> for CostCodeConfiguration {
    fn from(db: CostCodeConfigurationDB) -> Self {
        Self {
            id: db.id,
            corporation_uuid: db.corporation_uuid,
            cost_code_number: db.cost_code_number,
            cost_code_name: db.cost_code_name,
            division_id: db.division_id,
            parent_cost_code_id: db.parent_cost_code_id,
            gl_account_id: db.gl_account_id,
            order_number: db.order_number,
            description: db.description,
            is_active: db.is_active,
            created_at: text_to_datetime(&db.created_at),
            updated_at: text_to_datetime(&db.updated_at),
        }
    }
}

impl From<GlAccountDB> for GlAccount {
    fn from(db: GlAccountDB) -> Self {
        Self {
            id: db.id,
            corporation_uuid: db.corporation_uuid,
            account_number: db.account_number,
            account_name: db.account_name,
            is_default: db.is_default,
            created_at: text_to_datetime(&db.created_at),
            updated_at: text_to_datetime(&db.updated_at),
        }
    }
}

// Conversion from domain models
impl From<NewDivision> for NewDivisionDB {
    fn from(domain: NewDivision) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: domain.id,
            corporation_uuid: domain.corporation_uuid,
            division_number: domain.division_number,
            division_name: domain.division_name,
            division_order: domain.division_order,
            description: domain.description,
            is_active: domain.is_active,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl From<&Division> for DivisionChangesetDB {
    fn from(domain: &Division) -> Self {
        Self {
            division_number: domain.division_number.clone(),
            division_name: domain.division_name.clone(),
            division_order: domain.division_order,
            description: domain.description.clone(),
            is_active: domain.is_active,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl From<NewCostCodeConfiguration> for NewCostCodeConfigurationDB {
    fn from(domain: NewCostCodeConfiguration) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: domain.id,
            corporation_uuid: domain.corporation_uuid,
            cost_code_number: domain.cost_code_number,
            cost_code_name: domain.cost_code_name,
            division_id: domain.division_id,
            parent_cost_code_id: domain.parent_cost_code_id,
            gl_account_id: domain.gl_account_id,
            order_number: domain.order_number,
            description: domain.description,
            is_active: domain.is_active,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl From<&CostCodeConfiguration> for CostCodeConfigurationChangesetDB {
    fn from(domain: &CostCodeConfiguration) -> Self {
        Self {
            cost_code_number: domain.cost_code_number.clone(),
            cost_code_name: domain.cost_code_name.clone(),
            division_id: domain.division_id.clone(),
            parent_cost_code_id: domain.parent_cost_code_id.clone(),
            gl_account_id: domain.gl_account_id.clone(),
            order_number: domain.order_number,
            description: domain.description.clone(),
            is_active: domain.is_active,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl From<NewGlAccount> for NewGlAccountDB {
    fn from(domain: NewGlAccount) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: domain.id,
            corporation_uuid: domain.corporation_uuid,
            account_number: domain.account_number,
            account_name: domain.account_name,
            is_default: domain.is_default,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
