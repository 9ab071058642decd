use axum::Json;
use utoipa::OpenApi;

pub(crate) mod branches;
pub(crate) mod catalog;
pub(crate) mod favorites;
pub(crate) mod reviews;
pub(crate) mod vendors;

use crate::api::rest::dto;
use crate::api::rest::error::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        description = "Food-delivery marketplace CRUD service"
    ),
    paths(
        vendors::register_vendor,
        vendors::my_vendor,
        vendors::list_vendors,
        vendors::set_vendor_status,
        branches::create_branch,
        branches::list_branches,
        branches::update_branch,
        branches::delete_branch,
        catalog::create_menu_item,
        catalog::update_menu_item,
        catalog::delete_menu_item,
        catalog::list_menu,
        catalog::create_offer,
        catalog::update_offer,
        catalog::delete_offer,
        catalog::list_offers,
        favorites::create_favorite,
        favorites::list_favorites,
        favorites::delete_favorite,
        reviews::create_review,
        reviews::list_reviews,
        reviews::update_review,
        reviews::delete_review,
        reviews::create_reply,
        reviews::list_replies,
        reviews::delete_reply,
        reviews::like_review,
    ),
    components(schemas(
        ErrorBody,
        dto::RegisterVendorReq,
        dto::SetVendorStatusReq,
        dto::VendorDto,
        dto::VendorStatusDto,
        dto::CreateBranchReq,
        dto::UpdateBranchReq,
        dto::BranchDto,
        dto::UpdateMenuItemReq,
        dto::MenuItemDto,
        dto::DiscountKindDto,
        dto::DiscountDto,
        dto::CreateOfferReq,
        dto::UpdateOfferReq,
        dto::OfferDto,
        dto::TargetTypeDto,
        dto::CreateFavoriteReq,
        dto::FavoriteDto,
        dto::CreateReviewReq,
        dto::UpdateReviewReq,
        dto::ReviewDto,
        dto::CreateReplyReq,
        dto::ReplyDto,
        dto::LikeReviewReq,
        dto::ReviewLikeDto,
    ))
)]
pub(crate) struct ApiDoc;

/// Liveness probe.
pub(crate) async fn health() -> &'static str {
    "ok"
}

/// Serve the OpenAPI document.
pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
