use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::rest::auth::Auth;
use crate::api::rest::dto::{CreateFavoriteReq, FavoriteDto};
use crate::api::rest::error::ApiResult;
use crate::api::rest::AppState;

/// Create a favorite with a polymorphic target reference.
#[utoipa::path(post, path = "/favorites", request_body = CreateFavoriteReq,
    responses((status = 200, body = FavoriteDto)))]
#[tracing::instrument(skip(state, req), fields(user_id = %principal.user_id))]
pub(crate) async fn create_favorite(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(req): Json<CreateFavoriteReq>,
) -> ApiResult<Json<FavoriteDto>> {
    let favorite = state
        .services
        .favorites
        .create(&principal, req.target_type.into(), req.target_fields())
        .await?;
    Ok(Json(favorite.into()))
}

/// The caller's favorites.
#[utoipa::path(get, path = "/favorites", responses((status = 200, body = [FavoriteDto])))]
#[tracing::instrument(skip(state), fields(user_id = %principal.user_id))]
pub(crate) async fn list_favorites(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> ApiResult<Json<Vec<FavoriteDto>>> {
    let favorites = state.services.favorites.list(&principal).await?;
    Ok(Json(favorites.into_iter().map(FavoriteDto::from).collect()))
}

#[utoipa::path(delete, path = "/favorites/{id}", responses((status = 204)))]
#[tracing::instrument(skip(state), fields(user_id = %principal.user_id, favorite_id = %id))]
pub(crate) async fn delete_favorite(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.favorites.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
