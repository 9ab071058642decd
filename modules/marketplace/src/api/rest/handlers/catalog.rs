use std::str::FromStr;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::api::rest::auth::{Auth, MaybeAuth};
use crate::api::rest::dto::{
    CreateOfferReq, MenuItemDto, MenuListQuery, OfferDto, UpdateMenuItemReq, UpdateOfferReq,
};
use crate::api::rest::error::{ApiError, ApiResult};
use crate::api::rest::AppState;
use crate::domain::model::{MenuFilter, MenuItemPatch, NewMenuItem, NewOffer, OfferPatch};

/// Create a menu item. Multipart: `name` and `price` fields are required,
/// `description` and an `image` part are optional.
#[utoipa::path(post, path = "/vendors/{vendor_id}/branches/{branch_id}/menu",
    responses((status = 200, body = MenuItemDto)))]
#[tracing::instrument(skip(state, multipart), fields(vendor_id = %vendor_id, branch_id = %branch_id))]
pub(crate) async fn create_menu_item(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path((vendor_id, branch_id)): Path<(Uuid, Uuid)>,
    mut multipart: Multipart,
) -> ApiResult<Json<MenuItemDto>> {
    let mut name = None;
    let mut price = None;
    let mut description = None;
    let mut image_path = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation("body", e.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_owned();
        match field_name.as_str() {
            "name" => {
                name = Some(read_text(&field_name, field).await?);
            }
            "price" => {
                let text = read_text(&field_name, field).await?;
                price = Some(
                    Decimal::from_str(text.trim())
                        .map_err(|_| ApiError::validation("price", "must be a decimal number"))?,
                );
            }
            "description" => {
                description = Some(read_text(&field_name, field).await?);
            }
            "image" => {
                let content_type = field.content_type().map(str::to_owned).unwrap_or_default();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation("image", e.to_string()))?;
                image_path = Some(state.images.save(&content_type, &bytes).await?);
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ApiError::validation("name", "is required"))?;
    let price = price.ok_or_else(|| ApiError::validation("price", "is required"))?;

    let item = state
        .services
        .catalog
        .create_menu_item(
            &principal,
            vendor_id,
            branch_id,
            NewMenuItem {
                name,
                price,
                description,
                image_path,
            },
        )
        .await?;
    Ok(Json(item.into()))
}

async fn read_text(name: &str, field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::validation(name, e.to_string()))
}

#[utoipa::path(put, path = "/vendors/{vendor_id}/branches/{branch_id}/menu/{item_id}",
    request_body = UpdateMenuItemReq, responses((status = 200, body = MenuItemDto)))]
#[tracing::instrument(skip(state, req), fields(branch_id = %branch_id, item_id = %item_id))]
pub(crate) async fn update_menu_item(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path((vendor_id, branch_id, item_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<UpdateMenuItemReq>,
) -> ApiResult<Json<MenuItemDto>> {
    let item = state
        .services
        .catalog
        .update_menu_item(
            &principal,
            vendor_id,
            branch_id,
            item_id,
            MenuItemPatch {
                name: req.name,
                price: req.price,
                description: req.description,
            },
        )
        .await?;
    Ok(Json(item.into()))
}

#[utoipa::path(delete, path = "/vendors/{vendor_id}/branches/{branch_id}/menu/{item_id}",
    responses((status = 204)))]
#[tracing::instrument(skip(state), fields(branch_id = %branch_id, item_id = %item_id))]
pub(crate) async fn delete_menu_item(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path((vendor_id, branch_id, item_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .services
        .catalog
        .delete_menu_item(&principal, vendor_id, branch_id, item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Public menu listing with `search` / `min_price` / `max_price` filters.
#[utoipa::path(get, path = "/branches/{branch_id}/menu", params(MenuListQuery),
    responses((status = 200, body = [MenuItemDto])))]
#[tracing::instrument(skip(state, query, _principal), fields(branch_id = %branch_id))]
pub(crate) async fn list_menu(
    State(state): State<AppState>,
    MaybeAuth(_principal): MaybeAuth,
    Path(branch_id): Path<Uuid>,
    Query(query): Query<MenuListQuery>,
) -> ApiResult<Json<Vec<MenuItemDto>>> {
    let items = state
        .services
        .catalog
        .list_menu(
            branch_id,
            MenuFilter {
                search: query.search,
                min_price: query.min_price,
                max_price: query.max_price,
            },
        )
        .await?;
    Ok(Json(items.into_iter().map(MenuItemDto::from).collect()))
}

#[utoipa::path(post, path = "/vendors/{vendor_id}/branches/{branch_id}/offers",
    request_body = CreateOfferReq, responses((status = 200, body = OfferDto)))]
#[tracing::instrument(skip(state, req), fields(vendor_id = %vendor_id, branch_id = %branch_id))]
pub(crate) async fn create_offer(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path((vendor_id, branch_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateOfferReq>,
) -> ApiResult<Json<OfferDto>> {
    let offer = state
        .services
        .catalog
        .create_offer(
            &principal,
            vendor_id,
            branch_id,
            NewOffer {
                title: req.title,
                discount: req.discount.into(),
                starts_at: req.starts_at,
                ends_at: req.ends_at,
            },
        )
        .await?;
    Ok(Json(offer.into()))
}

#[utoipa::path(put, path = "/vendors/{vendor_id}/branches/{branch_id}/offers/{offer_id}",
    request_body = UpdateOfferReq, responses((status = 200, body = OfferDto)))]
#[tracing::instrument(skip(state, req), fields(branch_id = %branch_id, offer_id = %offer_id))]
pub(crate) async fn update_offer(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path((vendor_id, branch_id, offer_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<UpdateOfferReq>,
) -> ApiResult<Json<OfferDto>> {
    let offer = state
        .services
        .catalog
        .update_offer(
            &principal,
            vendor_id,
            branch_id,
            offer_id,
            OfferPatch {
                title: req.title,
                discount: req.discount.map(Into::into),
                starts_at: req.starts_at,
                ends_at: req.ends_at,
            },
        )
        .await?;
    Ok(Json(offer.into()))
}

#[utoipa::path(delete, path = "/vendors/{vendor_id}/branches/{branch_id}/offers/{offer_id}",
    responses((status = 204)))]
#[tracing::instrument(skip(state), fields(branch_id = %branch_id, offer_id = %offer_id))]
pub(crate) async fn delete_offer(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path((vendor_id, branch_id, offer_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .services
        .catalog
        .delete_offer(&principal, vendor_id, branch_id, offer_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Public listing of currently-active offers (`ends_at > now`).
#[utoipa::path(get, path = "/branches/{branch_id}/offers",
    responses((status = 200, body = [OfferDto])))]
#[tracing::instrument(skip(state, _principal), fields(branch_id = %branch_id))]
pub(crate) async fn list_offers(
    State(state): State<AppState>,
    MaybeAuth(_principal): MaybeAuth,
    Path(branch_id): Path<Uuid>,
) -> ApiResult<Json<Vec<OfferDto>>> {
    let offers = state.services.catalog.list_active_offers(branch_id).await?;
    Ok(Json(offers.into_iter().map(OfferDto::from).collect()))
}
