use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{
    Principal, Review, ReviewLike, ReviewPatch, ReviewReply, Role,
};
use crate::domain::ownership::OwnershipResolver;
use crate::domain::ports::{ChangeEvent, EventKind, Notifier};
use crate::domain::repos::{
    BranchesRepository, CatalogRepository, ReviewsRepository, VendorsRepository,
};
use crate::domain::service::ServiceConfig;
use crate::domain::target::{ReviewTarget, TargetFields, TargetKind};

/// Reviews, vendor/customer replies and like/dislike marks.
pub struct ReviewsService<VR, BR, CR, RR>
where
    VR: VendorsRepository,
    BR: BranchesRepository,
    CR: CatalogRepository,
    RR: ReviewsRepository,
{
    db: DatabaseConnection,
    repo: Arc<RR>,
    ownership: Arc<OwnershipResolver<VR, BR, CR, RR>>,
    notifier: Arc<dyn Notifier>,
    config: ServiceConfig,
}

/// Flattened event payload for a review; the sum-type target is spread back
/// into discriminant plus reference fields for subscribers.
fn review_event_data(review: &Review) -> serde_json::Value {
    let fields = review.target.fields();
    json!({
        "id": review.id,
        "user_id": review.user_id,
        "type": review.target.kind().as_str(),
        "branch_id": fields.branch_id,
        "menu_item_id": fields.menu_item_id,
        "offer_id": fields.offer_id,
        "rating": review.rating,
        "comment": review.comment,
    })
}

impl<VR, BR, CR, RR> ReviewsService<VR, BR, CR, RR>
where
    VR: VendorsRepository,
    BR: BranchesRepository,
    CR: CatalogRepository,
    RR: ReviewsRepository,
{
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<RR>,
        ownership: Arc<OwnershipResolver<VR, BR, CR, RR>>,
        notifier: Arc<dyn Notifier>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            db,
            repo,
            ownership,
            notifier,
            config,
        }
    }

    #[instrument(skip(self, principal, fields, comment), fields(user_id = %principal.user_id, kind = kind.as_str()))]
    pub async fn create(
        &self,
        principal: &Principal,
        kind: TargetKind,
        fields: TargetFields,
        rating: i16,
        comment: Option<String>,
    ) -> Result<Review, DomainError> {
        principal.require_role(&[Role::Customer])?;

        let target = ReviewTarget::from_parts(kind, fields)?;
        Self::validate_rating(rating)?;
        self.validate_comment(comment.as_deref())?;

        let now = Utc::now();
        let review = Review {
            id: Uuid::now_v7(),
            user_id: principal.user_id,
            target,
            rating,
            comment,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.insert(&self.db, review).await?;

        self.notifier.publish(ChangeEvent {
            kind: EventKind::ReviewCreated,
            data: review_event_data(&created),
        });

        tracing::info!(review_id = %created.id, "Successfully created review");
        Ok(created)
    }

    /// Edit the caller's own review. The update statement carries the author
    /// filter, so a non-author can never win a race against it.
    #[instrument(skip(self, principal, patch), fields(user_id = %principal.user_id, review_id = %id))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Review, DomainError> {
        principal.require_role(&[Role::Customer])?;

        if let Some(rating) = patch.rating {
            Self::validate_rating(rating)?;
        }
        self.validate_comment(patch.comment.as_deref())?;

        let updated = self
            .repo
            .update_by_author(&self.db, id, principal.user_id, patch, Utc::now())
            .await?;

        match updated {
            Some(review) => {
                self.notifier.publish(ChangeEvent {
                    kind: EventKind::ReviewUpdated,
                    data: review_event_data(&review),
                });
                tracing::info!("Successfully updated review");
                Ok(review)
            }
            None => Err(self.missing_review_error(id).await?),
        }
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.user_id, review_id = %id))]
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), DomainError> {
        principal.require_role(&[Role::Customer])?;

        let deleted = self
            .repo
            .soft_delete_by_author(&self.db, id, principal.user_id, Utc::now())
            .await?;
        if deleted {
            tracing::info!("Successfully deleted review");
            return Ok(());
        }
        Err(self.missing_review_error(id).await?)
    }

    /// Public listing of reviews for one target.
    #[instrument(skip(self), fields(kind = kind.as_str(), target_id = %target_id))]
    pub async fn list_by_target(
        &self,
        kind: TargetKind,
        target_id: Uuid,
    ) -> Result<Vec<Review>, DomainError> {
        self.repo.list_by_target(&self.db, kind, target_id).await
    }

    /// Reply to a review. Customers may reply to their own reviews; vendors
    /// may reply when the review traces to a branch they own.
    #[instrument(skip(self, principal, comment), fields(user_id = %principal.user_id, review_id = %review_id))]
    pub async fn create_reply(
        &self,
        principal: &Principal,
        review_id: Uuid,
        comment: String,
    ) -> Result<ReviewReply, DomainError> {
        principal.require_role(&[Role::Vendor, Role::Customer])?;

        if comment.trim().is_empty() {
            return Err(DomainError::validation("comment", "cannot be empty"));
        }
        self.validate_comment(Some(&comment))?;

        let from_vendor = match principal.role {
            Role::Vendor => {
                self.ownership
                    .review_reachable_by_vendor(&self.db, review_id, principal.user_id)
                    .await?;
                true
            }
            _ => {
                let review = self
                    .repo
                    .find(&self.db, review_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("review", review_id))?;
                if review.user_id != principal.user_id {
                    return Err(DomainError::Forbidden);
                }
                false
            }
        };

        let reply = ReviewReply {
            id: Uuid::now_v7(),
            review_id,
            user_id: principal.user_id,
            comment,
            from_vendor,
            created_at: Utc::now(),
        };

        let created = self.repo.reply_insert(&self.db, reply).await?;

        self.notifier
            .publish(ChangeEvent::new(EventKind::ReplyCreated, &created));

        tracing::info!(reply_id = %created.id, "Successfully created reply");
        Ok(created)
    }

    /// Public reply listing for a review.
    #[instrument(skip(self), fields(review_id = %review_id))]
    pub async fn list_replies(&self, review_id: Uuid) -> Result<Vec<ReviewReply>, DomainError> {
        if self.repo.find(&self.db, review_id).await?.is_none() {
            return Err(DomainError::not_found("review", review_id));
        }
        self.repo.reply_list(&self.db, review_id).await
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.user_id, reply_id = %id))]
    pub async fn delete_reply(&self, principal: &Principal, id: Uuid) -> Result<(), DomainError> {
        principal.require_role(&[Role::Vendor, Role::Customer])?;

        let deleted = self
            .repo
            .reply_delete_by_author(&self.db, id, principal.user_id, Utc::now())
            .await?;
        if deleted {
            tracing::info!("Successfully deleted reply");
            return Ok(());
        }

        if self.repo.reply_find(&self.db, id).await?.is_some() {
            Err(DomainError::Forbidden)
        } else {
            Err(DomainError::not_found("reply", id))
        }
    }

    /// Upsert the caller's like/dislike mark. A repeated call overwrites the
    /// boolean; exactly one row per (review, user) ever exists.
    #[instrument(skip(self, principal), fields(user_id = %principal.user_id, review_id = %review_id, is_liked))]
    pub async fn like(
        &self,
        principal: &Principal,
        review_id: Uuid,
        is_liked: bool,
    ) -> Result<ReviewLike, DomainError> {
        principal.require_role(&[Role::Customer])?;

        if self.repo.find(&self.db, review_id).await?.is_none() {
            return Err(DomainError::not_found("review", review_id));
        }

        self.repo
            .like_upsert(&self.db, review_id, principal.user_id, is_liked, Utc::now())
            .await
    }

    /// After a zero-row author-scoped mutation: absent review → NotFound,
    /// present review → Forbidden.
    async fn missing_review_error(&self, id: Uuid) -> Result<DomainError, DomainError> {
        if self.repo.find(&self.db, id).await?.is_some() {
            Ok(DomainError::Forbidden)
        } else {
            Ok(DomainError::not_found("review", id))
        }
    }

    fn validate_rating(rating: i16) -> Result<(), DomainError> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::validation(
                "rating",
                "must be between 1 and 5",
            ));
        }
        Ok(())
    }

    fn validate_comment(&self, comment: Option<&str>) -> Result<(), DomainError> {
        if let Some(comment) = comment {
            if comment.len() > self.config.max_comment_length {
                return Err(DomainError::validation(
                    "comment",
                    format!(
                        "exceeds maximum length of {}",
                        self.config.max_comment_length
                    ),
                ));
            }
        }
        Ok(())
    }
}
