use sea_orm::entity::prelude::*;

/// Flat storage row for a polymorphic review. `target_type = 'overall'`
/// stores its reference in `branch_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_type: String,
    pub branch_id: Option<Uuid>,
    pub menu_item_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branch::Entity",
        from = "Column::BranchId",
        to = "super::branch::Column::Id"
    )]
    Branch,
    #[sea_orm(
        belongs_to = "super::menu_item::Entity",
        from = "Column::MenuItemId",
        to = "super::menu_item::Column::Id"
    )]
    MenuItem,
    #[sea_orm(
        belongs_to = "super::offer::Entity",
        from = "Column::OfferId",
        to = "super::offer::Column::Id"
    )]
    Offer,
    #[sea_orm(has_many = "super::review_reply::Entity")]
    ReviewReply,
    #[sea_orm(has_many = "super::review_like::Entity")]
    ReviewLike,
}

impl Related<super::review_reply::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewReply.def()
    }
}

impl Related<super::review_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewLike.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
