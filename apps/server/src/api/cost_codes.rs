use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use sitebook_core::cost_codes::{
    CostCodeConfiguration, CostCodeCsvImportRequest, CostCodeImportRequest,
    CostCodeImportResponse, Division, DivisionCostCodes, GlAccount, NewCostCodeConfiguration,
    NewDivision, NewGlAccount,
};
use tracing::{debug, info};

// ============================================================================
// Import Endpoints
// ============================================================================

async fn import_cost_codes(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CostCodeImportRequest>, JsonRejection>,
) -> ApiResult<Json<CostCodeImportResponse>> {
    let Json(request) = payload?;
    debug!(
        "Importing {} divisions and {} cost codes...",
        request.divisions.len(),
        request.configurations.len()
    );
    let response = state.cost_code_service.import_cost_codes(request).await?;
    info!("{}", response.message);
    Ok(Json(response))
}

async fn import_cost_codes_csv(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CostCodeCsvImportRequest>, JsonRejection>,
) -> ApiResult<Json<CostCodeImportResponse>> {
    let Json(request) = payload?;
    debug!("Importing cost codes from CSV...");
    let response = state
        .cost_code_service
        .import_cost_codes_csv(request)
        .await?;
    info!("{}", response.message);
    Ok(Json(response))
}

// ============================================================================
// Division Endpoints
// ============================================================================

async fn get_divisions(
    Path(corporation_uuid): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Division>>> {
    debug!("Fetching divisions for {}...", corporation_uuid);
    let divisions = state.cost_code_service.get_divisions(&corporation_uuid)?;
    Ok(Json(divisions))
}

async fn create_division(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewDivision>, JsonRejection>,
) -> ApiResult<Json<Division>> {
    let Json(division) = payload?;
    debug!("Creating division {}...", division.division_number);
    let created = state.cost_code_service.create_division(division).await?;
    Ok(Json(created))
}

async fn update_division(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Division>, JsonRejection>,
) -> ApiResult<Json<Division>> {
    let Json(division) = payload?;
    debug!("Updating division {}...", division.id);
    let updated = state.cost_code_service.update_division(division).await?;
    Ok(Json(updated))
}

async fn delete_division(
    Path((corporation_uuid, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    debug!("Deleting division {}...", id);
    let _ = state
        .cost_code_service
        .delete_division(&corporation_uuid, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Cost Code Endpoints
// ============================================================================

async fn get_configurations(
    Path(corporation_uuid): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CostCodeConfiguration>>> {
    debug!("Fetching cost codes for {}...", corporation_uuid);
    let configurations = state
        .cost_code_service
        .get_configurations(&corporation_uuid)?;
    Ok(Json(configurations))
}

async fn get_cost_code_tree(
    Path(corporation_uuid): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<DivisionCostCodes>>> {
    debug!("Building cost code tree for {}...", corporation_uuid);
    let tree = state
        .cost_code_service
        .get_cost_code_tree(&corporation_uuid)?;
    Ok(Json(tree))
}

async fn get_configuration(
    Path((corporation_uuid, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CostCodeConfiguration>> {
    debug!("Fetching cost code {}...", id);
    let configuration = state
        .cost_code_service
        .get_configuration(&corporation_uuid, &id)?;
    Ok(Json(configuration))
}

async fn create_configuration(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCostCodeConfiguration>, JsonRejection>,
) -> ApiResult<Json<CostCodeConfiguration>> {
    let Json(configuration) = payload?;
    debug!("Creating cost code {}...", configuration.cost_code_number);
    let created = state
        .cost_code_service
        .create_configuration(configuration)
        .await?;
    Ok(Json(created))
}

async fn update_configuration(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CostCodeConfiguration>, JsonRejection>,
) -> ApiResult<Json<CostCodeConfiguration>> {
    let Json(configuration) = payload?;
    debug!("Updating cost code {}...", configuration.id);
    let updated = state
        .cost_code_service
        .update_configuration(configuration)
        .await?;
    Ok(Json(updated))
}

async fn delete_configuration(
    Path((corporation_uuid, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    debug!("Deleting cost code {}...", id);
    let _ = state
        .cost_code_service
        .delete_configuration(&corporation_uuid, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// GL Account Endpoints
// ============================================================================

async fn get_gl_accounts(
    Path(corporation_uuid): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<GlAccount>>> {
    debug!("Fetching GL accounts for {}...", corporation_uuid);
    let accounts = state.cost_code_service.get_gl_accounts(&corporation_uuid)?;
    Ok(Json(accounts))
}

async fn create_gl_account(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewGlAccount>, JsonRejection>,
) -> ApiResult<Json<GlAccount>> {
    let Json(account) = payload?;
    debug!("Creating GL account {}...", account.account_number);
    let created = state.cost_code_service.create_gl_account(account).await?;
    Ok(Json(created))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Bulk import
        .route("/cost-codes/import", post(import_cost_codes))
        .route("/cost-codes/import/csv", post(import_cost_codes_csv))
        // Divisions
        .route("/divisions", post(create_division).put(update_division))
        .route(
            "/corporations/{corporationUuid}/divisions",
            get(get_divisions),
        )
        .route(
            "/corporations/{corporationUuid}/divisions/{id}",
            delete(delete_division),
        )
        // Cost codes
        .route(
            "/cost-codes",
            post(create_configuration).put(update_configuration),
        )
        .route(
            "/corporations/{corporationUuid}/cost-codes",
            get(get_configurations),
        )
        .route(
            "/corporations/{corporationUuid}/cost-codes/tree",
            get(get_cost_code_tree),
        )
        .route(
            "/corporations/{corporationUuid}/cost-codes/{id}",
            get(get_configuration).delete(delete_configuration),
        )
        // GL accounts
        .route(
            "/corporations/{corporationUuid}/gl-accounts",
            get(get_gl_accounts),
        )
        .route("/gl-accounts", post(create_gl_account))
}
