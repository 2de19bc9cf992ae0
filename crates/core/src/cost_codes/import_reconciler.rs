//! Hierarchical bulk import of divisions and cost codes.
//!
//! The import runs as an ordered pipeline over one corporation:
//!
//! 1. divisions, row by row. Afterwards the division map holds every
//!    persisted division of the corporation, including this call's inserts.
//! 2. cost codes, partitioned by level. The cost-code map starts from the
//!    read used for partitioning and is re-read from the store before each
//!    later level, so level N+1 sees every level N insertion.
//!
//! Rows are processed strictly one at a time. Every failure past request
//! validation is recorded against its row and the pipeline moves on; there
//! is no rollback of rows already written.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::Result;

use super::import_partition::{partition_by_level, stored_levels, IndexedRow, PartitionRejection};
use super::import_validation::{row_label, validate_cost_code_row, validate_division_row};
use super::{
    CostCodeConfiguration, CostCodeImportData, CostCodeImportRow, CostCodeRepositoryTrait,
    DivisionImportRow, ImportCategoryResult, NewCostCodeConfiguration, NewDivision,
};

/// Natural key to id maps owned by a single import call.
#[derive(Debug, Default, Clone)]
pub struct ImportLookups {
    /// `division_number` -> division id
    pub divisions: HashMap<String, String>,
    /// `cost_code_number` -> cost code id
    pub cost_codes: HashMap<String, String>,
}

/// Terminal state of one imported row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Invalid(String),
    Duplicate,
    Unresolved(String),
    Persisted,
    PersistenceFailed(String),
}

#[derive(Debug, Default)]
struct ImportTally {
    new_count: usize,
    duplicates: usize,
    errors: Vec<String>,
}

impl ImportTally {
    fn record(&mut self, subject: &str, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Persisted => self.new_count += 1,
            RowOutcome::Duplicate => {
                debug!("{} already exists, skipping", subject);
                self.duplicates += 1;
            }
            RowOutcome::Invalid(message)
            | RowOutcome::Unresolved(message)
            | RowOutcome::PersistenceFailed(message) => {
                warn!("{} rejected: {}", subject, message);
                self.errors.push(format!("{}: {}", subject, message));
            }
        }
    }

    fn into_result(self, total: usize) -> ImportCategoryResult {
        ImportCategoryResult {
            new_count: self.new_count,
            duplicates: self.duplicates,
            total,
            errors: self.errors,
        }
    }
}

/// Runs one bulk import against a repository, scoped to a corporation.
pub struct CostCodeImporter<'a> {
    repository: &'a dyn CostCodeRepositoryTrait,
    corporation_uuid: &'a str,
}

impl<'a> CostCodeImporter<'a> {
    pub fn new(repository: &'a dyn CostCodeRepositoryTrait, corporation_uuid: &'a str) -> Self {
        Self {
            repository,
            corporation_uuid,
        }
    }

    /// Imports divisions first, then cost codes level by level.
    ///
    /// Only failures to read the lookup maps abort the call; everything
    /// row-scoped ends up in the returned error lists.
    pub async fn run(
        &self,
        divisions: &[DivisionImportRow],
        configurations: &[CostCodeImportRow],
    ) -> Result<CostCodeImportData> {
        let mut lookups = ImportLookups {
            divisions: self.load_division_map()?,
            cost_codes: HashMap::new(),
        };

        let division_tally = self.import_divisions(divisions, &mut lookups).await;
        info!(
            "Divisions imported for {}: {} new, {} duplicates, {} errors",
            self.corporation_uuid,
            division_tally.new_count,
            division_tally.duplicates,
            division_tally.errors.len()
        );

        let persisted = self.repository.get_configurations(self.corporation_uuid)?;
        let partitioned = partition_by_level(configurations, &stored_levels(&persisted));
        lookups.cost_codes = cost_code_map(persisted);
        let gl_account_id = self.resolve_gl_account();

        let mut tally = ImportTally::default();
        for (level, bucket) in partitioned.levels.iter().enumerate() {
            if level > 0 {
                self.refresh_cost_code_map(&mut lookups)?;
            }
            debug!("Importing {} cost codes at level {}", bucket.len(), level);
            for entry in bucket {
                let outcome = self
                    .import_cost_code_row(entry.row, &lookups, gl_account_id.as_deref(), None)
                    .await;
                tally.record(&cost_code_subject(entry), outcome);
            }
        }
        for (entry, rejection) in &partitioned.rejected {
            let outcome = self
                .import_cost_code_row(entry.row, &lookups, gl_account_id.as_deref(), Some(rejection))
                .await;
            tally.record(&cost_code_subject(entry), outcome);
        }
        info!(
            "Cost codes imported for {}: {} new, {} duplicates, {} errors",
            self.corporation_uuid,
            tally.new_count,
            tally.duplicates,
            tally.errors.len()
        );

        Ok(CostCodeImportData {
            divisions: division_tally.into_result(divisions.len()),
            configurations: tally.into_result(configurations.len()),
        })
    }

    fn load_division_map(&self) -> Result<HashMap<String, String>> {
        Ok(self
            .repository
            .get_divisions(self.corporation_uuid)?
            .into_iter()
            .map(|d| (d.division_number, d.id))
            .collect())
    }

    /// Re-reads every persisted cost code of the corporation, not only the
    /// ones inserted by this call.
    fn refresh_cost_code_map(&self, lookups: &mut ImportLookups) -> Result<()> {
        lookups.cost_codes =
            cost_code_map(self.repository.get_configurations(self.corporation_uuid)?);
        Ok(())
    }

    /// Default account of the corporation, else any account, else none.
    fn resolve_gl_account(&self) -> Option<String> {
        match self.repository.get_gl_accounts(self.corporation_uuid) {
            Ok(accounts) => accounts
                .iter()
                .find(|a| a.is_default)
                .or_else(|| accounts.first())
                .map(|a| a.id.clone()),
            Err(e) => {
                warn!(
                    "Could not load GL accounts for {}, importing without one: {}",
                    self.corporation_uuid, e
                );
                None
            }
        }
    }

    async fn import_divisions(
        &self,
        rows: &[DivisionImportRow],
        lookups: &mut ImportLookups,
    ) -> ImportTally {
        let mut tally = ImportTally::default();
        for (index, row) in rows.iter().enumerate() {
            let subject = format!("Division {}", row_label(row.number(), index));
            let outcome = self.import_division_row(row, lookups).await;
            tally.record(&subject, outcome);
        }
        tally
    }

    async fn import_division_row(
        &self,
        row: &DivisionImportRow,
        lookups: &mut ImportLookups,
    ) -> RowOutcome {
        let valid = match validate_division_row(row) {
            Ok(valid) => valid,
            Err(message) => return RowOutcome::Invalid(message),
        };

        match self
            .repository
            .find_division_by_number(self.corporation_uuid, &valid.division_number)
        {
            Ok(Some(existing)) => {
                lookups
                    .divisions
                    .insert(existing.division_number, existing.id);
                return RowOutcome::Duplicate;
            }
            Ok(None) => {}
            Err(e) => return RowOutcome::PersistenceFailed(e.to_string()),
        }

        let new_division = NewDivision {
            id: None,
            corporation_uuid: self.corporation_uuid.to_string(),
            division_number: valid.division_number,
            division_name: valid.division_name,
            division_order: valid.division_order,
            description: valid.description,
            is_active: valid.is_active,
        };
        match self.repository.create_division(new_division).await {
            Ok(created) => {
                debug!("Created division {} ({})", created.division_number, created.id);
                lookups.divisions.insert(created.division_number, created.id);
                RowOutcome::Persisted
            }
            Err(e) => RowOutcome::PersistenceFailed(e.to_string()),
        }
    }

    async fn import_cost_code_row(
        &self,
        row: &CostCodeImportRow,
        lookups: &ImportLookups,
        gl_account_id: Option<&str>,
        rejection: Option<&PartitionRejection>,
    ) -> RowOutcome {
        let valid = match validate_cost_code_row(row) {
            Ok(valid) => valid,
            Err(message) => return RowOutcome::Invalid(message),
        };

        match self
            .repository
            .find_configuration_by_number(self.corporation_uuid, &valid.cost_code_number)
        {
            Ok(Some(_)) => return RowOutcome::Duplicate,
            Ok(None) => {}
            Err(e) => return RowOutcome::PersistenceFailed(e.to_string()),
        }

        if let Some(rejection) = rejection {
            return RowOutcome::Unresolved(rejection.to_string());
        }

        let division_id = match valid.division_number.as_deref() {
            Some(number) => match lookups.divisions.get(number) {
                Some(id) => Some(id.clone()),
                None => return RowOutcome::Unresolved(format!("Division '{}' not found", number)),
            },
            None => None,
        };
        let parent_cost_code_id = match valid.parent_cost_code_number.as_deref() {
            Some(number) => match lookups.cost_codes.get(number) {
                Some(id) => Some(id.clone()),
                None => {
                    return RowOutcome::Unresolved(format!(
                        "Parent cost code '{}' not found",
                        number
                    ))
                }
            },
            None => None,
        };

        let new_configuration = NewCostCodeConfiguration {
            id: None,
            corporation_uuid: self.corporation_uuid.to_string(),
            cost_code_number: valid.cost_code_number,
            cost_code_name: valid.cost_code_name,
            division_id,
            parent_cost_code_id,
            gl_account_id: gl_account_id.map(str::to_string),
            order_number: valid.order_number,
            description: valid.description,
            is_active: valid.is_active,
        };
        match self.repository.create_configuration(new_configuration).await {
            Ok(created) => {
                debug!(
                    "Created cost code {} ({})",
                    created.cost_code_number, created.id
                );
                RowOutcome::Persisted
            }
            Err(e) => RowOutcome::PersistenceFailed(e.to_string()),
        }
    }
}

fn cost_code_map(configurations: Vec<CostCodeConfiguration>) -> HashMap<String, String> {
    configurations
        .into_iter()
        .map(|c| (c.cost_code_number, c.id))
        .collect()
}

fn cost_code_subject(entry: &IndexedRow<'_>) -> String {
    format!("Cost code {}", row_label(entry.row.number(), entry.index))
}
