use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::rest::auth::{Auth, MaybeAuth};
use crate::api::rest::dto::{
    CreateReplyReq, CreateReviewReq, LikeReviewReq, ReplyDto, ReviewDto, ReviewLikeDto,
    ReviewListQuery, UpdateReviewReq,
};
use crate::api::rest::error::ApiResult;
use crate::api::rest::AppState;
use crate::domain::model::ReviewPatch;

/// Create a review with a polymorphic target reference.
#[utoipa::path(post, path = "/reviews", request_body = CreateReviewReq,
    responses((status = 200, body = ReviewDto)))]
#[tracing::instrument(skip(state, req), fields(user_id = %principal.user_id))]
pub(crate) async fn create_review(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(req): Json<CreateReviewReq>,
) -> ApiResult<Json<ReviewDto>> {
    let fields = req.target_fields();
    let review = state
        .services
        .reviews
        .create(
            &principal,
            req.target_type.into(),
            fields,
            req.rating,
            req.comment,
        )
        .await?;
    Ok(Json(review.into()))
}

/// Public review listing for one target.
#[utoipa::path(get, path = "/reviews", params(ReviewListQuery),
    responses((status = 200, body = [ReviewDto])))]
#[tracing::instrument(skip(state, _principal, query))]
pub(crate) async fn list_reviews(
    State(state): State<AppState>,
    MaybeAuth(_principal): MaybeAuth,
    Query(query): Query<ReviewListQuery>,
) -> ApiResult<Json<Vec<ReviewDto>>> {
    let reviews = state
        .services
        .reviews
        .list_by_target(query.target_type.into(), query.target_id)
        .await?;
    Ok(Json(reviews.into_iter().map(ReviewDto::from).collect()))
}

/// Edit the caller's own review.
#[utoipa::path(put, path = "/reviews/{id}", request_body = UpdateReviewReq,
    responses((status = 200, body = ReviewDto)))]
#[tracing::instrument(skip(state, req), fields(user_id = %principal.user_id, review_id = %id))]
pub(crate) async fn update_review(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReviewReq>,
) -> ApiResult<Json<ReviewDto>> {
    let review = state
        .services
        .reviews
        .update(
            &principal,
            id,
            ReviewPatch {
                rating: req.rating,
                comment: req.comment,
            },
        )
        .await?;
    Ok(Json(review.into()))
}

#[utoipa::path(delete, path = "/reviews/{id}", responses((status = 204)))]
#[tracing::instrument(skip(state), fields(user_id = %principal.user_id, review_id = %id))]
pub(crate) async fn delete_review(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.reviews.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reply to a review (review author, or vendor owning the reachable branch).
#[utoipa::path(post, path = "/reviews/{id}/replies", request_body = CreateReplyReq,
    responses((status = 200, body = ReplyDto)))]
#[tracing::instrument(skip(state, req), fields(user_id = %principal.user_id, review_id = %id))]
pub(crate) async fn create_reply(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateReplyReq>,
) -> ApiResult<Json<ReplyDto>> {
    let reply = state
        .services
        .reviews
        .create_reply(&principal, id, req.comment)
        .await?;
    Ok(Json(reply.into()))
}

/// Public reply listing for a review.
#[utoipa::path(get, path = "/reviews/{id}/replies",
    responses((status = 200, body = [ReplyDto])))]
#[tracing::instrument(skip(state, _principal), fields(review_id = %id))]
pub(crate) async fn list_replies(
    State(state): State<AppState>,
    MaybeAuth(_principal): MaybeAuth,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<ReplyDto>>> {
    let replies = state.services.reviews.list_replies(id).await?;
    Ok(Json(replies.into_iter().map(ReplyDto::from).collect()))
}

#[utoipa::path(delete, path = "/replies/{id}", responses((status = 204)))]
#[tracing::instrument(skip(state), fields(user_id = %principal.user_id, reply_id = %id))]
pub(crate) async fn delete_reply(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.reviews.delete_reply(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upsert the caller's like/dislike mark on a review.
#[utoipa::path(post, path = "/reviews/{id}/like", request_body = LikeReviewReq,
    responses((status = 200, body = ReviewLikeDto)))]
#[tracing::instrument(skip(state, req), fields(user_id = %principal.user_id, review_id = %id))]
pub(crate) async fn like_review(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
    Json(req): Json<LikeReviewReq>,
) -> ApiResult<Json<ReviewLikeDto>> {
    let like = state
        .services
        .reviews
        .like(&principal, id, req.is_liked)
        .await?;
    Ok(Json(like.into()))
}
