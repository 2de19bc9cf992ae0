//! Repository implementation for divisions, cost codes and GL accounts.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use sitebook_core::cost_codes::{
    CostCodeConfiguration, CostCodeRepositoryTrait, Division, GlAccount,
    NewCostCodeConfiguration, NewDivision, NewGlAccount,
};
use sitebook_core::Result;

use super::model::{
    CostCodeConfigurationChangesetDB, CostCodeConfigurationDB, DivisionChangesetDB, DivisionDB,
    GlAccountDB, NewCostCodeConfigurationDB, NewDivisionDB, NewGlAccountDB,
};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{cost_code_configurations, divisions, gl_accounts};

pub struct CostCodeRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CostCodeRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CostCodeRepositoryTrait for CostCodeRepository {
    fn get_divisions(&self, corporation_uuid: &str) -> Result<Vec<Division>> {
        let mut conn = get_connection(&self.pool)?;
        let results = divisions::table
            .filter(divisions::corporation_uuid.eq(corporation_uuid))
            .order((divisions::division_order.asc(), divisions::division_number.asc()))
            .load::<DivisionDB>(&mut conn)
            .into_core()?;
        Ok(results.into_iter().map(Division::from).collect())
    }

    fn get_division(&self, corporation_uuid: &str, id: &str) -> Result<Option<Division>> {
        let mut conn = get_connection(&self.pool)?;
        let result = divisions::table
            .filter(divisions::corporation_uuid.eq(corporation_uuid))
            .filter(divisions::id.eq(id))
            .first::<DivisionDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(result.map(Division::from))
    }

    fn find_division_by_number(
        &self,
        corporation_uuid: &str,
        division_number: &str,
    ) -> Result<Option<Division>> {
        let mut conn = get_connection(&self.pool)?;
        let result = divisions::table
            .filter(divisions::corporation_uuid.eq(corporation_uuid))
            .filter(divisions::division_number.eq(division_number))
            .first::<DivisionDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(result.map(Division::from))
    }

    async fn create_division(&self, division: NewDivision) -> Result<Division> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Division> {
                let mut db: NewDivisionDB = division.into();
                db.id = Some(db.id.unwrap_or_else(|| Uuid::new_v4().to_string()));

                let result = diesel::insert_into(divisions::table)
                    .values(&db)
                    .returning(DivisionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                Ok(Division::from(result))
            })
            .await
    }

    async fn update_division(&self, division: Division) -> Result<Division> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Division> {
                let changes = DivisionChangesetDB::from(&division);

                let result = diesel::update(
                    divisions::table
                        .filter(divisions::corporation_uuid.eq(&division.corporation_uuid))
                        .filter(divisions::id.eq(&division.id)),
                )
                .set(&changes)
                .returning(DivisionDB::as_returning())
                .get_result(conn)
                .map_err(StorageError::from)?;

                Ok(Division::from(result))
            })
            .await
    }

    async fn delete_division(&self, corporation_uuid: &str, id: &str) -> Result<usize> {
        let corporation_uuid = corporation_uuid.to_string();
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    divisions::table
                        .filter(divisions::corporation_uuid.eq(&corporation_uuid))
                        .filter(divisions::id.eq(&id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }

    fn get_configurations(&self, corporation_uuid: &str) -> Result<Vec<CostCodeConfiguration>> {
        let mut conn = get_connection(&self.pool)?;
        let results = cost_code_configurations::table
            .filter(cost_code_configurations::corporation_uuid.eq(corporation_uuid))
            .order(cost_code_configurations::cost_code_number.asc())
            .load::<CostCodeConfigurationDB>(&mut conn)
            .into_core()?;
        Ok(results
            .into_iter()
            .map(CostCodeConfiguration::from)
            .collect())
    }

    fn get_configuration(
        &self,
        corporation_uuid: &str,
        id: &str,
    ) -> Result<Option<CostCodeConfiguration>> {
        let mut conn = get_connection(&self.pool)?;
        let result = cost_code_configurations::table
            .filter(cost_code_configurations::corporation_uuid.eq(corporation_uuid))
            .filter(cost_code_configurations::id.eq(id))
            .first::<CostCodeConfigurationDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(result.map(CostCodeConfiguration::from))
    }

    fn find_configuration_by_number(
        &self,
        corporation_uuid: &str,
        cost_code_number: &str,
    ) -> Result<Option<CostCodeConfiguration>> {
        let mut conn = get_connection(&self.pool)?;
        let result = cost_code_configurations::table
            .filter(cost_code_configurations::corporation_uuid.eq(corporation_uuid))
            .filter(cost_code_configurations::cost_code_number.eq(cost_code_number))
            .first::<CostCodeConfigurationDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(result.map(CostCodeConfiguration::from))
    }

    async fn create_configuration(
        &self,
        configuration: NewCostCodeConfiguration,
    ) -> Result<CostCodeConfiguration> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<CostCodeConfiguration> {
                    let mut db: NewCostCodeConfigurationDB = configuration.into();
                    db.id = Some(db.id.unwrap_or_else(|| Uuid::new_v4().to_string()));

                    let result = diesel::insert_into(cost_code_configurations::table)
                        .values(&db)
                        .returning(CostCodeConfigurationDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?;

                    Ok(CostCodeConfiguration::from(result))
                },
            )
            .await
    }

    async fn update_configuration(
        &self,
        configuration: CostCodeConfiguration,
    ) -> Result<CostCodeConfiguration> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<CostCodeConfiguration> {
                    let changes = CostCodeConfigurationChangesetDB::from(&configuration);

                    let result = diesel::update(
                        cost_code_configurations::table
                            .filter(
                                cost_code_configurations::corporation_uuid
                                    .eq(&configuration.corporation_uuid),
                            )
                            .filter(cost_code_configurations::id.eq(&configuration.id)),
                    )
                    .set(&changes)
                    .returning(CostCodeConfigurationDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                    Ok(CostCodeConfiguration::from(result))
                },
            )
            .await
    }

    async fn delete_configuration(&self, corporation_uuid: &str, id: &str) -> Result<usize> {
        let corporation_uuid = corporation_uuid.to_string();
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    cost_code_configurations::table
                        .filter(cost_code_configurations::corporation_uuid.eq(&corporation_uuid))
                        .filter(cost_code_configurations::id.eq(&id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }

    fn get_gl_accounts(&self, corporation_uuid: &str) -> Result<Vec<GlAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let results = gl_accounts::table
            .filter(gl_accounts::corporation_uuid.eq(corporation_uuid))
            .order((gl_accounts::is_default.desc(), gl_accounts::account_number.asc()))
            .load::<GlAccountDB>(&mut conn)
            .into_core()?;
        Ok(results.into_iter().map(GlAccount::from).collect())
    }

    async fn create_gl_account(&self, account: NewGlAccount) -> Result<GlAccount> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GlAccount> {
                let mut db: NewGlAccountDB = account.into();
                db.id = Some(db.id.unwrap_or_else(|| Uuid::new_v4().to_string()));

                if db.is_default {
                    diesel::update(
                        gl_accounts::table
                            .filter(gl_accounts::corporation_uuid.eq(&db.corporation_uuid))
                            .filter(gl_accounts::is_default.eq(true)),
                    )
                    .set((
                        gl_accounts::is_default.eq(false),
                        gl_accounts::updated_at.eq(&db.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }

                let result = diesel::insert_into(gl_accounts::table)
                    .values(&db)
                    .returning(GlAccountDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                Ok(GlAccount::from(result))
            })
            .await
    }
}
