//! Cost-code service implementation.

use async_trait::async_trait;
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::{COST_CODE_ORDER_RANGE, DIVISION_ORDER_RANGE, MAX_COST_CODE_LEVELS};
use crate::errors::{Error, ValidationError};
use crate::Result;

use super::csv_parser::{parse_cost_code_csv, parse_division_csv};
use super::import_reconciler::CostCodeImporter;
use super::import_summary::summarize;
use super::import_validation::check_order;
use super::{
    CostCodeConfiguration, CostCodeCsvImportRequest, CostCodeError, CostCodeImportRequest,
    CostCodeImportResponse, CostCodeNode, CostCodeRepositoryTrait, CostCodeServiceTrait, Division,
    DivisionCostCodes, GlAccount, NewCostCodeConfiguration, NewDivision, NewGlAccount,
};

pub struct CostCodeService {
    repository: Arc<dyn CostCodeRepositoryTrait>,
}

fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(())
}

fn require_corporation(corporation_uuid: Option<&str>) -> Result<&str> {
    corporation_uuid
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::MissingField("corporation_uuid".to_string()).into())
}

fn out_of_range(message: String) -> Error {
    ValidationError::OutOfRange(message).into()
}

impl CostCodeService {
    pub fn new(repository: Arc<dyn CostCodeRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn validate_division_fields(
        corporation_uuid: &str,
        division_number: &str,
        division_name: &str,
        division_order: i32,
    ) -> Result<()> {
        require_text(corporation_uuid, "corporationUuid")?;
        require_text(division_number, "divisionNumber")?;
        require_text(division_name, "divisionName")?;
        check_order(division_order.into(), &DIVISION_ORDER_RANGE).map_err(out_of_range)?;
        Ok(())
    }

    /// Checks the references of a cost code that is about to be written.
    ///
    /// `self_id` is set for updates so the node cannot become its own
    /// ancestor and its existing subtree still fits under the new parent.
    #[allow(clippy::too_many_arguments)]
    fn validate_configuration_fields(
        &self,
        self_id: Option<&str>,
        corporation_uuid: &str,
        cost_code_number: &str,
        cost_code_name: &str,
        division_id: Option<&str>,
        parent_cost_code_id: Option<&str>,
        gl_account_id: Option<&str>,
        order_number: Option<i32>,
    ) -> Result<()> {
        require_text(corporation_uuid, "corporationUuid")?;
        require_text(cost_code_number, "costCodeNumber")?;
        require_text(cost_code_name, "costCodeName")?;
        if let Some(order) = order_number {
            check_order(order.into(), &COST_CODE_ORDER_RANGE).map_err(out_of_range)?;
        }

        if let Some(division_id) = division_id {
            if self
                .repository
                .get_division(corporation_uuid, division_id)?
                .is_none()
            {
                return Err(CostCodeError::DivisionNotFound(division_id.to_string()).into());
            }
        }

        if let Some(gl_account_id) = gl_account_id {
            let known = self
                .repository
                .get_gl_accounts(corporation_uuid)?
                .iter()
                .any(|a| a.id == gl_account_id);
            if !known {
                return Err(CostCodeError::GlAccountNotFound(gl_account_id.to_string()).into());
            }
        }

        if let Some(parent_id) = parent_cost_code_id {
            let configurations = self.repository.get_configurations(corporation_uuid)?;
            let by_id: HashMap<&str, &CostCodeConfiguration> = configurations
                .iter()
                .map(|c| (c.id.as_str(), c))
                .collect();

            if !by_id.contains_key(parent_id) {
                return Err(CostCodeError::CostCodeNotFound(parent_id.to_string()).into());
            }

            // Ancestors of the new parent, parent included.
            let mut chain = vec![parent_id];
            let mut current = by_id.get(parent_id).and_then(|c| c.parent_cost_code_id.as_deref());
            while let Some(id) = current {
                if chain.len() > configurations.len() {
                    break;
                }
                chain.push(id);
                current = by_id.get(id).and_then(|c| c.parent_cost_code_id.as_deref());
            }

            if let Some(self_id) = self_id {
                if chain.contains(&self_id) {
                    return Err(CostCodeError::InvalidHierarchy(
                        "a cost code cannot be placed under itself or its descendants".to_string(),
                    )
                    .into());
                }
            }

            let subtree_height = self_id
                .map(|id| Self::subtree_height(&configurations, id))
                .unwrap_or(0);
            if chain.len() + subtree_height >= MAX_COST_CODE_LEVELS {
                return Err(CostCodeError::InvalidHierarchy(format!(
                    "cost codes are limited to {} levels",
                    MAX_COST_CODE_LEVELS
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Number of levels below `id` (0 for a leaf).
    fn subtree_height(configurations: &[CostCodeConfiguration], id: &str) -> usize {
        let mut height = 0;
        let mut frontier = vec![id.to_string()];
        while !frontier.is_empty() && height <= configurations.len() {
            let next: Vec<String> = configurations
                .iter()
                .filter(|c| {
                    c.parent_cost_code_id
                        .as_ref()
                        .is_some_and(|p| frontier.contains(p))
                })
                .map(|c| c.id.clone())
                .collect();
            if next.is_empty() {
                break;
            }
            height += 1;
            frontier = next;
        }
        height
    }

    fn build_cost_code_tree(
        children_map: &HashMap<Option<&str>, Vec<&CostCodeConfiguration>>,
        parent_id: Option<&str>,
    ) -> Vec<CostCodeNode> {
        let Some(children) = children_map.get(&parent_id) else {
            return Vec::new();
        };

        children
            .iter()
            .map(|c| CostCodeNode {
                configuration: (*c).clone(),
                children: Self::build_cost_code_tree(children_map, Some(c.id.as_str())),
            })
            .collect()
    }
}

#[async_trait]
impl CostCodeServiceTrait for CostCodeService {
    fn get_divisions(&self, corporation_uuid: &str) -> Result<Vec<Division>> {
        self.repository.get_divisions(corporation_uuid)
    }

    async fn create_division(&self, division: NewDivision) -> Result<Division> {
        Self::validate_division_fields(
            &division.corporation_uuid,
            &division.division_number,
            &division.division_name,
            division.division_order,
        )?;
        let division = NewDivision {
            division_number: division.division_number.trim().to_string(),
            division_name: division.division_name.trim().to_string(),
            ..division
        };
        self.repository.create_division(division).await
    }

    async fn update_division(&self, division: Division) -> Result<Division> {
        Self::validate_division_fields(
            &division.corporation_uuid,
            &division.division_number,
            &division.division_name,
            division.division_order,
        )?;
        if self
            .repository
            .get_division(&division.corporation_uuid, &division.id)?
            .is_none()
        {
            return Err(CostCodeError::DivisionNotFound(division.id).into());
        }
        let division = Division {
            division_number: division.division_number.trim().to_string(),
            division_name: division.division_name.trim().to_string(),
            ..division
        };
        self.repository.update_division(division).await
    }

    async fn delete_division(&self, corporation_uuid: &str, id: &str) -> Result<usize> {
        let count = self
            .repository
            .get_configurations(corporation_uuid)?
            .iter()
            .filter(|c| c.division_id.as_deref() == Some(id))
            .count();
        if count > 0 {
            return Err(CostCodeError::DivisionInUse {
                division_id: id.to_string(),
                count,
            }
            .into());
        }
        self.repository.delete_division(corporation_uuid, id).await
    }

    fn get_configurations(&self, corporation_uuid: &str) -> Result<Vec<CostCodeConfiguration>> {
        self.repository.get_configurations(corporation_uuid)
    }

    fn get_configuration(
        &self,
        corporation_uuid: &str,
        id: &str,
    ) -> Result<CostCodeConfiguration> {
        self.repository
            .get_configuration(corporation_uuid, id)?
            .ok_or_else(|| CostCodeError::CostCodeNotFound(id.to_string()).into())
    }

    fn get_cost_code_tree(&self, corporation_uuid: &str) -> Result<Vec<DivisionCostCodes>> {
        let mut divisions = self.repository.get_divisions(corporation_uuid)?;
        divisions.sort_by(|a, b| {
            a.division_order
                .cmp(&b.division_order)
                .then_with(|| a.division_number.cmp(&b.division_number))
        });
        let mut configurations = self.repository.get_configurations(corporation_uuid)?;
        configurations.sort_by(|a, b| {
            a.order_number
                .unwrap_or(i32::MAX)
                .cmp(&b.order_number.unwrap_or(i32::MAX))
                .then_with(|| a.cost_code_number.cmp(&b.cost_code_number))
        });

        // Build a map of parent_id -> children
        let mut children_map: HashMap<Option<&str>, Vec<&CostCodeConfiguration>> =
            HashMap::new();
        for config in &configurations {
            children_map
                .entry(config.parent_cost_code_id.as_deref())
                .or_default()
                .push(config);
        }

        let mut tree: Vec<DivisionCostCodes> = divisions
            .into_iter()
            .map(|division| DivisionCostCodes {
                division: Some(division),
                cost_codes: Vec::new(),
            })
            .collect();
        let mut unassigned = Vec::new();
        for node in Self::build_cost_code_tree(&children_map, None) {
            let group = tree.iter_mut().find(|group| {
                group.division.as_ref().map(|d| d.id.as_str())
                    == node.configuration.division_id.as_deref()
            });
            match group {
                Some(group) => group.cost_codes.push(node),
                None => unassigned.push(node),
            }
        }

        if !unassigned.is_empty() {
            tree.push(DivisionCostCodes {
                division: None,
                cost_codes: unassigned,
            });
        }
        Ok(tree)
    }

    async fn create_configuration(
        &self,
        configuration: NewCostCodeConfiguration,
    ) -> Result<CostCodeConfiguration> {
        self.validate_configuration_fields(
            None,
            &configuration.corporation_uuid,
            &configuration.cost_code_number,
            &configuration.cost_code_name,
            configuration.division_id.as_deref(),
            configuration.parent_cost_code_id.as_deref(),
            configuration.gl_account_id.as_deref(),
            configuration.order_number,
        )?;
        let configuration = NewCostCodeConfiguration {
            cost_code_number: configuration.cost_code_number.trim().to_string(),
            cost_code_name: configuration.cost_code_name.trim().to_string(),
            ..configuration
        };
        self.repository.create_configuration(configuration).await
    }

    async fn update_configuration(
        &self,
        configuration: CostCodeConfiguration,
    ) -> Result<CostCodeConfiguration> {
        if self
            .repository
            .get_configuration(&configuration.corporation_uuid, &configuration.id)?
            .is_none()
        {
            return Err(CostCodeError::CostCodeNotFound(configuration.id).into());
        }
        self.validate_configuration_fields(
            Some(&configuration.id),
            &configuration.corporation_uuid,
            &configuration.cost_code_number,
            &configuration.cost_code_name,
            configuration.division_id.as_deref(),
            configuration.parent_cost_code_id.as_deref(),
            configuration.gl_account_id.as_deref(),
            configuration.order_number,
        )?;
        let configuration = CostCodeConfiguration {
            cost_code_number: configuration.cost_code_number.trim().to_string(),
            cost_code_name: configuration.cost_code_name.trim().to_string(),
            ..configuration
        };
        self.repository.update_configuration(configuration).await
    }

    async fn delete_configuration(&self, corporation_uuid: &str, id: &str) -> Result<usize> {
        let count = self
            .repository
            .get_configurations(corporation_uuid)?
            .iter()
            .filter(|c| c.parent_cost_code_id.as_deref() == Some(id))
            .count();
        if count > 0 {
            return Err(CostCodeError::HasChildren {
                cost_code_id: id.to_string(),
                count,
            }
            .into());
        }
        self.repository
            .delete_configuration(corporation_uuid, id)
            .await
    }

    fn get_gl_accounts(&self, corporation_uuid: &str) -> Result<Vec<GlAccount>> {
        self.repository.get_gl_accounts(corporation_uuid)
    }

    async fn create_gl_account(&self, account: NewGlAccount) -> Result<GlAccount> {
        require_text(&account.corporation_uuid, "corporationUuid")?;
        require_text(&account.account_number, "accountNumber")?;
        require_text(&account.account_name, "accountName")?;
        self.repository.create_gl_account(account).await
    }

    async fn import_cost_codes(
        &self,
        request: CostCodeImportRequest,
    ) -> Result<CostCodeImportResponse> {
        let corporation_uuid = require_corporation(request.corporation_uuid.as_deref())?;
        info!(
            "Importing {} divisions and {} cost codes for corporation {}",
            request.divisions.len(),
            request.configurations.len(),
            corporation_uuid
        );

        let data = CostCodeImporter::new(self.repository.as_ref(), corporation_uuid)
            .run(&request.divisions, &request.configurations)
            .await?;

        let response = summarize(data);
        info!("{}", response.message);
        Ok(response)
    }

    async fn import_cost_codes_csv(
        &self,
        request: CostCodeCsvImportRequest,
    ) -> Result<CostCodeImportResponse> {
        require_corporation(request.corporation_uuid.as_deref())?;
        if request.divisions_csv.is_none() && request.configurations_csv.is_none() {
            return Err(ValidationError::InvalidInput(
                "at least one of divisionsCsv or configurationsCsv is required".to_string(),
            )
            .into());
        }

        let divisions = match request.divisions_csv.as_deref() {
            Some(content) if !content.trim().is_empty() => parse_division_csv(content)?,
            _ => Vec::new(),
        };
        let configurations = match request.configurations_csv.as_deref() {
            Some(content) if !content.trim().is_empty() => parse_cost_code_csv(content)?,
            _ => Vec::new(),
        };

        self.import_cost_codes(CostCodeImportRequest {
            corporation_uuid: request.corporation_uuid,
            divisions,
            configurations,
        })
        .await
    }
}
