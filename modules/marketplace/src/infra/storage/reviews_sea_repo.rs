use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Review, ReviewLike, ReviewPatch, ReviewReply};
use crate::domain::repos::ReviewsRepository;
use crate::domain::target::TargetKind;

use super::entity::{review, review_like, review_reply};

/// ORM-based implementation of the `ReviewsRepository` trait (reviews,
/// replies, likes).
#[derive(Clone, Default)]
pub struct SeaReviewsRepository;

impl SeaReviewsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReviewsRepository for SeaReviewsRepository {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        r: Review,
    ) -> Result<Review, DomainError> {
        let fields = r.target.fields();
        let m = review::ActiveModel {
            id: Set(r.id),
            user_id: Set(r.user_id),
            target_type: Set(r.target.kind().as_str().to_owned()),
            branch_id: Set(fields.branch_id),
            menu_item_id: Set(fields.menu_item_id),
            offer_id: Set(fields.offer_id),
            rating: Set(r.rating),
            comment: Set(r.comment.clone()),
            created_at: Set(r.created_at),
            updated_at: Set(r.updated_at),
            deleted_at: Set(None),
        };
        review::Entity::insert(m)
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(r)
    }

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Review>, DomainError> {
        let found = review::Entity::find()
            .filter(review::Column::Id.eq(id))
            .filter(review::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(DomainError::from)?;
        found.map(Review::try_from).transpose()
    }

    async fn update_by_author<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
        patch: ReviewPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Review>, DomainError> {
        let mut m = review::ActiveModel {
            updated_at: Set(updated_at),
            ..Default::default()
        };
        if let Some(rating) = patch.rating {
            m.rating = Set(rating);
        }
        if let Some(comment) = patch.comment {
            m.comment = Set(Some(comment));
        }

        // The author filter rides on the UPDATE itself; no separate existence
        // check races against the mutation.
        let result = review::Entity::update_many()
            .set(m)
            .filter(review::Column::Id.eq(id))
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find(conn, id).await
    }

    async fn soft_delete_by_author<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let m = review::ActiveModel {
            deleted_at: Set(Some(deleted_at)),
            updated_at: Set(deleted_at),
            ..Default::default()
        };
        let result = review::Entity::update_many()
            .set(m)
            .filter(review::Column::Id.eq(id))
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_target<C: ConnectionTrait>(
        &self,
        conn: &C,
        kind: TargetKind,
        target_id: Uuid,
    ) -> Result<Vec<Review>, DomainError> {
        let reference_filter = match kind {
            TargetKind::Branch | TargetKind::Overall => review::Column::BranchId.eq(target_id),
            TargetKind::MenuItem => review::Column::MenuItemId.eq(target_id),
            TargetKind::Offer => review::Column::OfferId.eq(target_id),
        };

        let rows = review::Entity::find()
            .filter(review::Column::TargetType.eq(kind.as_str()))
            .filter(reference_filter)
            .filter(review::Column::DeletedAt.is_null())
            .order_by_desc(review::Column::CreatedAt)
            .order_by_desc(review::Column::Id)
            .all(conn)
            .await
            .map_err(DomainError::from)?;
        rows.into_iter().map(Review::try_from).collect()
    }

    async fn reply_insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        reply: ReviewReply,
    ) -> Result<ReviewReply, DomainError> {
        let m = review_reply::ActiveModel {
            id: Set(reply.id),
            review_id: Set(reply.review_id),
            user_id: Set(reply.user_id),
            comment: Set(reply.comment.clone()),
            from_vendor: Set(reply.from_vendor),
            created_at: Set(reply.created_at),
            deleted_at: Set(None),
        };
        review_reply::Entity::insert(m)
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(reply)
    }

    async fn reply_list<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: Uuid,
    ) -> Result<Vec<ReviewReply>, DomainError> {
        let rows = review_reply::Entity::find()
            .filter(review_reply::Column::ReviewId.eq(review_id))
            .filter(review_reply::Column::DeletedAt.is_null())
            .order_by_asc(review_reply::Column::CreatedAt)
            .order_by_asc(review_reply::Column::Id)
            .all(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(rows.into_iter().map(ReviewReply::from).collect())
    }

    async fn reply_find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<ReviewReply>, DomainError> {
        let found = review_reply::Entity::find()
            .filter(review_reply::Column::Id.eq(id))
            .filter(review_reply::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(found.map(ReviewReply::from))
    }

    async fn reply_delete_by_author<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let m = review_reply::ActiveModel {
            deleted_at: Set(Some(deleted_at)),
            ..Default::default()
        };
        let result = review_reply::Entity::update_many()
            .set(m)
            .filter(review_reply::Column::Id.eq(id))
            .filter(review_reply::Column::UserId.eq(user_id))
            .filter(review_reply::Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(result.rows_affected > 0)
    }

    async fn like_upsert<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: Uuid,
        user_id: Uuid,
        is_liked: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<ReviewLike, DomainError> {
        let m = review_like::ActiveModel {
            id: Set(Uuid::now_v7()),
            review_id: Set(review_id),
            user_id: Set(user_id),
            is_liked: Set(is_liked),
            updated_at: Set(updated_at),
        };

        review_like::Entity::insert(m)
            .on_conflict(
                OnConflict::columns([
                    review_like::Column::ReviewId,
                    review_like::Column::UserId,
                ])
                .update_columns([review_like::Column::IsLiked, review_like::Column::UpdatedAt])
                .to_owned(),
            )
            .exec(conn)
            .await
            .map_err(DomainError::from)?;

        let row = self
            .like_find(conn, review_id, user_id)
            .await?
            .ok_or_else(|| DomainError::database("review_likes upsert did not persist"))?;
        Ok(row)
    }

    async fn like_find<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ReviewLike>, DomainError> {
        let found = review_like::Entity::find()
            .filter(review_like::Column::ReviewId.eq(review_id))
            .filter(review_like::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(DomainError::from)?;
        Ok(found.map(ReviewLike::from))
    }
}
