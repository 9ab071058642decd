use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::api::rest::auth::Auth;
use crate::api::rest::dto::{RegisterVendorReq, SetVendorStatusReq, VendorDto};
use crate::api::rest::error::ApiResult;
use crate::api::rest::AppState;
use crate::domain::model::NewVendor;

/// Register a vendor for the authenticated user (status starts pending).
#[utoipa::path(post, path = "/vendors/register", request_body = RegisterVendorReq,
    responses((status = 200, body = VendorDto)))]
#[tracing::instrument(skip(state, req), fields(user_id = %principal.user_id))]
pub(crate) async fn register_vendor(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(req): Json<RegisterVendorReq>,
) -> ApiResult<Json<VendorDto>> {
    let vendor = state
        .services
        .vendors
        .register(&principal, NewVendor { name: req.name })
        .await?;
    Ok(Json(vendor.into()))
}

/// The authenticated vendor's own record.
#[utoipa::path(get, path = "/vendors/me", responses((status = 200, body = VendorDto)))]
#[tracing::instrument(skip(state), fields(user_id = %principal.user_id))]
pub(crate) async fn my_vendor(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> ApiResult<Json<VendorDto>> {
    let vendor = state.services.vendors.my_vendor(&principal).await?;
    Ok(Json(vendor.into()))
}

/// Admin listing of all vendors.
#[utoipa::path(get, path = "/vendors", responses((status = 200, body = [VendorDto])))]
#[tracing::instrument(skip(state), fields(user_id = %principal.user_id))]
pub(crate) async fn list_vendors(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> ApiResult<Json<Vec<VendorDto>>> {
    let vendors = state.services.vendors.list(&principal).await?;
    Ok(Json(vendors.into_iter().map(VendorDto::from).collect()))
}

/// Admin status transition (approve / reject / suspend).
#[utoipa::path(put, path = "/vendors/{vendor_id}/approve", request_body = SetVendorStatusReq,
    responses((status = 200, body = VendorDto)))]
#[tracing::instrument(skip(state, req), fields(vendor_id = %vendor_id, admin_id = %principal.user_id))]
pub(crate) async fn set_vendor_status(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(vendor_id): Path<Uuid>,
    Json(req): Json<SetVendorStatusReq>,
) -> ApiResult<Json<VendorDto>> {
    let vendor = state
        .services
        .vendors
        .set_status(&principal, vendor_id, req.status.into())
        .await?;
    Ok(Json(vendor.into()))
}
