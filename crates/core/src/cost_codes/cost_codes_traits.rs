//! Traits for cost-code repository and service.

use async_trait::async_trait;

use crate::Result;

use super::{
    CostCodeConfiguration, CostCodeCsvImportRequest, CostCodeImportRequest,
    CostCodeImportResponse, Division, DivisionCostCodes, GlAccount, NewCostCodeConfiguration,
    NewDivision, NewGlAccount,
};

/// Repository trait for cost-code persistence operations.
///
/// Every query is scoped by `corporation_uuid`; natural keys
/// (`division_number`, `cost_code_number`, `account_number`) are unique
/// within a corporation only.
#[async_trait]
pub trait CostCodeRepositoryTrait: Send + Sync {
    // Division operations
    fn get_divisions(&self, corporation_uuid: &str) -> Result<Vec<Division>>;
    fn get_division(&self, corporation_uuid: &str, id: &str) -> Result<Option<Division>>;
    fn find_division_by_number(
        &self,
        corporation_uuid: &str,
        division_number: &str,
    ) -> Result<Option<Division>>;
    async fn create_division(&self, division: NewDivision) -> Result<Division>;
    async fn update_division(&self, division: Division) -> Result<Division>;
    async fn delete_division(&self, corporation_uuid: &str, id: &str) -> Result<usize>;

    // Cost code operations
    fn get_configurations(&self, corporation_uuid: &str) -> Result<Vec<CostCodeConfiguration>>;
    fn get_configuration(
        &self,
        corporation_uuid: &str,
        id: &str,
    ) -> Result<Option<CostCodeConfiguration>>;
    fn find_configuration_by_number(
        &self,
        corporation_uuid: &str,
        cost_code_number: &str,
    ) -> Result<Option<CostCodeConfiguration>>;
    async fn create_configuration(
        &self,
        configuration: NewCostCodeConfiguration,
    ) -> Result<CostCodeConfiguration>;
    async fn update_configuration(
        &self,
        configuration: CostCodeConfiguration,
    ) -> Result<CostCodeConfiguration>;
    async fn delete_configuration(&self, corporation_uuid: &str, id: &str) -> Result<usize>;

    // GL account operations
    fn get_gl_accounts(&self, corporation_uuid: &str) -> Result<Vec<GlAccount>>;
    /// Creates an account. When the new account is the default, the flag is
    /// cleared on every other account of the corporation in the same write.
    async fn create_gl_account(&self, account: NewGlAccount) -> Result<GlAccount>;
}

/// Service trait for cost-code business logic.
#[async_trait]
pub trait CostCodeServiceTrait: Send + Sync {
    // Division operations
    fn get_divisions(&self, corporation_uuid: &str) -> Result<Vec<Division>>;
    async fn create_division(&self, division: NewDivision) -> Result<Division>;
    async fn update_division(&self, division: Division) -> Result<Division>;
    async fn delete_division(&self, corporation_uuid: &str, id: &str) -> Result<usize>;

    // Cost code operations
    fn get_configurations(&self, corporation_uuid: &str) -> Result<Vec<CostCodeConfiguration>>;
    fn get_configuration(&self, corporation_uuid: &str, id: &str)
        -> Result<CostCodeConfiguration>;
    fn get_cost_code_tree(&self, corporation_uuid: &str) -> Result<Vec<DivisionCostCodes>>;
    async fn create_configuration(
        &self,
        configuration: NewCostCodeConfiguration,
    ) -> Result<CostCodeConfiguration>;
    async fn update_configuration(
        &self,
        configuration: CostCodeConfiguration,
    ) -> Result<CostCodeConfiguration>;
    async fn delete_configuration(&self, corporation_uuid: &str, id: &str) -> Result<usize>;

    // GL account operations
    fn get_gl_accounts(&self, corporation_uuid: &str) -> Result<Vec<GlAccount>>;
    async fn create_gl_account(&self, account: NewGlAccount) -> Result<GlAccount>;

    // Bulk import
    async fn import_cost_codes(
        &self,
        request: CostCodeImportRequest,
    ) -> Result<CostCodeImportResponse>;
    async fn import_cost_codes_csv(
        &self,
        request: CostCodeCsvImportRequest,
    ) -> Result<CostCodeImportResponse>;
}
