//! Cost codes module - divisions, cost code configurations and GL accounts.
//!
//! Besides CRUD, provides the hierarchical bulk import of divisions and
//! cost codes from JSON rows or spreadsheet exports.

mod cost_codes_errors;
mod cost_codes_model;
mod cost_codes_service;
mod cost_codes_traits;
mod csv_parser;
mod import_model;
mod import_partition;
mod import_reconciler;
mod import_summary;
mod import_validation;

#[cfg(test)]
mod mock_repository;


#[cfg(test)]
mod import_reconciler_tests;

pub use cost_codes_errors::CostCodeError;
pub use cost_codes_model::{
    CostCodeConfiguration, CostCodeNode, Division, DivisionCostCodes, GlAccount,
    NewCostCodeConfiguration, NewDivision, NewGlAccount,
};
pub use cost_codes_service::CostCodeService;
pub use cost_codes_traits::{CostCodeRepositoryTrait, CostCodeServiceTrait};
pub use csv_parser::{parse_cost_code_csv, parse_division_csv};
pub use import_model::{
    parse_flag, CostCodeCsvImportRequest, CostCodeImportData, CostCodeImportRequest,
    CostCodeImportResponse, CostCodeImportRow, DivisionImportRow, ImportCategoryResult,
    OrderValue,
};
pub use import_partition::{
    partition_by_level, stored_levels, IndexedRow, PartitionRejection, PartitionedCostCodes,
};
pub use import_reconciler::{CostCodeImporter, ImportLookups, RowOutcome};
pub use import_summary::summarize;
pub use import_validation::{
    check_order, row_label, validate_cost_code_row, validate_division_row, ValidCostCodeRow,
    ValidDivisionRow,
};
