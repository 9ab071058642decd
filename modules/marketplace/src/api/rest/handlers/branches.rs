use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::rest::auth::{Auth, MaybeAuth};
use crate::api::rest::dto::{BranchDto, CreateBranchReq, UpdateBranchReq};
use crate::api::rest::error::ApiResult;
use crate::api::rest::AppState;
use crate::domain::model::{BranchPatch, NewBranch};

/// Create a branch under an approved, caller-owned vendor.
#[utoipa::path(post, path = "/vendors/{vendor_id}/branches", request_body = CreateBranchReq,
    responses((status = 200, body = BranchDto)))]
#[tracing::instrument(skip(state, req), fields(vendor_id = %vendor_id, user_id = %principal.user_id))]
pub(crate) async fn create_branch(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(vendor_id): Path<Uuid>,
    Json(req): Json<CreateBranchReq>,
) -> ApiResult<Json<BranchDto>> {
    let branch = state
        .services
        .branches
        .create(
            &principal,
            vendor_id,
            NewBranch {
                name: req.name,
                address: req.address,
                latitude: req.latitude,
                longitude: req.longitude,
            },
        )
        .await?;
    Ok(Json(branch.into()))
}

/// Public branch listing for a vendor.
#[utoipa::path(get, path = "/vendors/{vendor_id}/branches",
    responses((status = 200, body = [BranchDto])))]
#[tracing::instrument(skip(state, _principal), fields(vendor_id = %vendor_id))]
pub(crate) async fn list_branches(
    State(state): State<AppState>,
    MaybeAuth(_principal): MaybeAuth,
    Path(vendor_id): Path<Uuid>,
) -> ApiResult<Json<Vec<BranchDto>>> {
    let branches = state.services.branches.list_by_vendor(vendor_id).await?;
    Ok(Json(branches.into_iter().map(BranchDto::from).collect()))
}

#[utoipa::path(put, path = "/vendors/{vendor_id}/branches/{branch_id}", request_body = UpdateBranchReq,
    responses((status = 200, body = BranchDto)))]
#[tracing::instrument(skip(state, req), fields(vendor_id = %vendor_id, branch_id = %branch_id))]
pub(crate) async fn update_branch(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path((vendor_id, branch_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateBranchReq>,
) -> ApiResult<Json<BranchDto>> {
    let branch = state
        .services
        .branches
        .update(
            &principal,
            vendor_id,
            branch_id,
            BranchPatch {
                name: req.name,
                address: req.address,
                latitude: req.latitude,
                longitude: req.longitude,
            },
        )
        .await?;
    Ok(Json(branch.into()))
}

#[utoipa::path(delete, path = "/vendors/{vendor_id}/branches/{branch_id}",
    responses((status = 204)))]
#[tracing::instrument(skip(state), fields(vendor_id = %vendor_id, branch_id = %branch_id))]
pub(crate) async fn delete_branch(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path((vendor_id, branch_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .services
        .branches
        .delete(&principal, vendor_id, branch_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
