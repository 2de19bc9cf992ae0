//! In-memory repository used by the service and importer tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::errors::{DatabaseError, Error, Result};

use super::{
    CostCodeConfiguration, CostCodeRepositoryTrait, Division, GlAccount,
    NewCostCodeConfiguration, NewDivision, NewGlAccount,
};

#[derive(Clone, Default)]
pub struct MockCostCodeRepository {
    pub divisions: Arc<Mutex<Vec<Division>>>,
    pub configurations: Arc<Mutex<Vec<CostCodeConfiguration>>>,
    pub gl_accounts: Arc<Mutex<Vec<GlAccount>>>,
    /// Natural keys whose insert fails with a query error
    pub failing_numbers: Arc<Mutex<HashSet<String>>>,
    pub fail_gl_accounts: Arc<Mutex<bool>>,
    pub fail_divisions: Arc<Mutex<bool>>,
    /// Number of `get_configurations` calls
    pub configuration_reads: Arc<Mutex<usize>>,
    next_id: Arc<Mutex<u64>>,
}

impl MockCostCodeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{}-{}", prefix, *next)
    }

    pub fn fail_insert_of(&self, number: &str) {
        self.failing_numbers
            .lock()
            .unwrap()
            .insert(number.to_string());
    }

    pub fn division_by_number(&self, number: &str) -> Option<Division> {
        self.divisions
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.division_number == number)
            .cloned()
    }

    pub fn configuration_by_number(&self, number: &str) -> Option<CostCodeConfiguration> {
        self.configurations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.cost_code_number == number)
            .cloned()
    }

    pub fn insert_gl_account(&self, corporation_uuid: &str, number: &str, is_default: bool) {
        let now = Utc::now().naive_utc();
        self.gl_accounts.lock().unwrap().push(GlAccount {
            id: format!("gl-{}", number),
            corporation_uuid: corporation_uuid.to_string(),
            account_number: number.to_string(),
            account_name: format!("Account {}", number),
            is_default,
            created_at: now,
            updated_at: now,
        });
    }

    fn check_failure(&self, number: &str) -> Result<()> {
        if self.failing_numbers.lock().unwrap().contains(number) {
            return Err(DatabaseError::QueryFailed(format!("disk I/O error on {}", number)).into());
        }
        Ok(())
    }
}

#[async_trait]
impl CostCodeRepositoryTrait for MockCostCodeRepository {
    fn get_divisions(&self, corporation_uuid: &str) -> Result<Vec<Division>> {
        if *self.fail_divisions.lock().unwrap() {
            return Err(DatabaseError::ConnectionFailed("database is locked".to_string()).into());
        }
        Ok(self
            .divisions
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.corporation_uuid == corporation_uuid)
            .cloned()
            .collect())
    }

    fn get_division(&self, corporation_uuid: &str, id: &str) -> Result<Option<Division>> {
        Ok(self
            .get_divisions(corporation_uuid)?
            .into_iter()
            .find(|d| d.id == id))
    }

    fn find_division_by_number(
        &self,
        corporation_uuid: &str,
        division_number: &str,
    ) -> Result<Option<Division>> {
        Ok(self
            .get_divisions(corporation_uuid)?
            .into_iter()
            .find(|d| d.division_number == division_number))
    }

    async fn create_division(&self, division: NewDivision) -> Result<Division> {
        self.check_failure(&division.division_number)?;
        if self
            .find_division_by_number(&division.corporation_uuid, &division.division_number)?
            .is_some()
        {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                "UNIQUE constraint failed: divisions.corporation_uuid, divisions.division_number"
                    .to_string(),
            )));
        }
        let now = Utc::now().naive_utc();
        let created = Division {
            id: division.id.unwrap_or_else(|| self.next_id("div")),
            corporation_uuid: division.corporation_uuid,
            division_number: division.division_number,
            division_name: division.division_name,
            division_order: division.division_order,
            description: division.description,
            is_active: division.is_active,
            created_at: now,
            updated_at: now,
        };
        self.divisions.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_division(&self, division: Division) -> Result<Division> {
        let mut divisions = self.divisions.lock().unwrap();
        let existing = divisions
            .iter_mut()
            .find(|d| d.id == division.id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(division.id.clone())))?;
        *existing = division.clone();
        Ok(division)
    }

    async fn delete_division(&self, corporation_uuid: &str, id: &str) -> Result<usize> {
        let mut divisions = self.divisions.lock().unwrap();
        let before = divisions.len();
        divisions.retain(|d| !(d.corporation_uuid == corporation_uuid && d.id == id));
        Ok(before - divisions.len())
    }

    fn get_configurations(&self, corporation_uuid: &str) -> Result<Vec<CostCodeConfiguration>> {
        *self.configuration_reads.lock().unwrap() += 1;
        Ok(self
            .configurations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.corporation_uuid == corporation_uuid)
            .cloned()
            .collect())
    }

    fn get_configuration(
        &self,
        corporation_uuid: &str,
        id: &str,
    ) -> Result<Option<CostCodeConfiguration>> {
        Ok(self
            .configurations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.corporation_uuid == corporation_uuid && c.id == id)
            .cloned())
    }

    fn find_configuration_by_number(
        &self,
        corporation_uuid: &str,
        cost_code_number: &str,
    ) -> Result<Option<CostCodeConfiguration>> {
        Ok(self
            .configurations
            .lock()
            .unwrap()
            .iter()
            .find(|c| {
                c.corporation_uuid == corporation_uuid && c.cost_code_number == cost_code_number
            })
            .cloned())
    }

    async fn create_configuration(
        &self,
        configuration: NewCostCodeConfiguration,
    ) -> Result<CostCodeConfiguration> {
        self.check_failure(&configuration.cost_code_number)?;
        let now = Utc::now().naive_utc();
        let created = CostCodeConfiguration {
            id: configuration.id.unwrap_or_else(|| self.next_id("cc")),
            corporation_uuid: configuration.corporation_uuid,
            cost_code_number: configuration.cost_code_number,
            cost_code_name: configuration.cost_code_name,
            division_id: configuration.division_id,
            parent_cost_code_id: configuration.parent_cost_code_id,
            gl_account_id: configuration.gl_account_id,
            order_number: configuration.order_number,
            description: configuration.description,
            is_active: configuration.is_active,
            created_at: now,
            updated_at: now,
        };
        self.configurations.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_configuration(
        &self,
        configuration: CostCodeConfiguration,
    ) -> Result<CostCodeConfiguration> {
        let mut configurations = self.configurations.lock().unwrap();
        let existing = configurations
            .iter_mut()
            .find(|c| c.id == configuration.id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(configuration.id.clone())))?;
        *existing = configuration.clone();
        Ok(configuration)
    }

    async fn delete_configuration(&self, corporation_uuid: &str, id: &str) -> Result<usize> {
        let mut configurations = self.configurations.lock().unwrap();
        let before = configurations.len();
        configurations.retain(|c| !(c.corporation_uuid == corporation_uuid && c.id == id));
        Ok(before - configurations.len())
    }

    fn get_gl_accounts(&self, corporation_uuid: &str) -> Result<Vec<GlAccount>> {
        if *self.fail_gl_accounts.lock().unwrap() {
            return Err(DatabaseError::QueryFailed("no such table: gl_accounts".to_string()).into());
        }
        Ok(self
            .gl_accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.corporation_uuid == corporation_uuid)
            .cloned()
            .collect())
    }

    async fn create_gl_account(&self, account: NewGlAccount) -> Result<GlAccount> {
        let mut accounts = self.gl_accounts.lock().unwrap();
        if account.is_default {
            for existing in accounts
                .iter_mut()
                .filter(|a| a.corporation_uuid == account.corporation_uuid)
            {
                existing.is_default = false;
            }
        }
        let now = Utc::now().naive_utc();
        let created = GlAccount {
            id: account.id.unwrap_or_else(|| self.next_id("gl")),
            corporation_uuid: account.corporation_uuid,
            account_number: account.account_number,
            account_name: account.account_name,
            is_default: account.is_default,
            created_at: now,
            updated_at: now,
        };
        accounts.push(created.clone());
        Ok(created)
    }
}
