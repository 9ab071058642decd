use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vendors::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vendors::UserId).uuid().not_null())
                    .col(ColumnDef::new(Vendors::Name).string().not_null())
                    .col(
                        ColumnDef::new(Vendors::Status)
                            .string()
                            .not_null()
                            .check(Expr::cust(
                                "status IN ('pending','approved','rejected','suspended')",
                            )),
                    )
                    .col(
                        ColumnDef::new(Vendors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vendors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Vendors::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_vendors_user")
                    .table(Vendors::Table)
                    .col(Vendors::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Branches::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Branches::VendorId).uuid().not_null())
                    .col(ColumnDef::new(Branches::Name).string().not_null())
                    .col(ColumnDef::new(Branches::Address).string().not_null())
                    .col(ColumnDef::new(Branches::Latitude).double().not_null())
                    .col(ColumnDef::new(Branches::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(Branches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Branches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Branches::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_branches_vendor")
                            .from(Branches::Table, Branches::VendorId)
                            .to(Vendors::Table, Vendors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_branches_vendor")
                    .table(Branches::Table)
                    .col(Branches::VendorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MenuItems::BranchId).uuid().not_null())
                    .col(ColumnDef::new(MenuItems::Name).string().not_null())
                    .col(
                        ColumnDef::new(MenuItems::Price)
                            .decimal_len(12, 2)
                            .not_null()
                            .check(Expr::cust("price > 0")),
                    )
                    .col(ColumnDef::new(MenuItems::Description).string())
                    .col(ColumnDef::new(MenuItems::ImagePath).string())
                    .col(
                        ColumnDef::new(MenuItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MenuItems::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_items_branch")
                            .from(MenuItems::Table, MenuItems::BranchId)
                            .to(Branches::Table, Branches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_menu_items_branch")
                    .table(MenuItems::Table)
                    .col(MenuItems::BranchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Offers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Offers::BranchId).uuid().not_null())
                    .col(ColumnDef::new(Offers::Title).string().not_null())
                    .col(
                        ColumnDef::new(Offers::DiscountKind)
                            .string()
                            .not_null()
                            .check(Expr::cust("discount_kind IN ('percentage','flat')")),
                    )
                    .col(
                        ColumnDef::new(Offers::DiscountValue)
                            .decimal_len(12, 2)
                            .not_null()
                            .check(Expr::cust("discount_value > 0")),
                    )
                    .col(ColumnDef::new(Offers::DiscountCap).decimal_len(12, 2))
                    .col(
                        ColumnDef::new(Offers::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Offers::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .check(Expr::cust("starts_at < ends_at")),
                    )
                    .col(
                        ColumnDef::new(Offers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Offers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Offers::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_branch")
                            .from(Offers::Table, Offers::BranchId)
                            .to(Branches::Table, Branches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_offers_branch")
                    .table(Offers::Table)
                    .col(Offers::BranchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Favorites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Favorites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Favorites::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Favorites::TargetType)
                            .string()
                            .not_null()
                            // Exactly one reference, consistent with the discriminant.
                            .check(Expr::cust(
                                "(target_type = 'branch' AND branch_id IS NOT NULL AND menu_item_id IS NULL AND offer_id IS NULL) \
                                 OR (target_type = 'menu_item' AND menu_item_id IS NOT NULL AND branch_id IS NULL AND offer_id IS NULL) \
                                 OR (target_type = 'offer' AND offer_id IS NOT NULL AND branch_id IS NULL AND menu_item_id IS NULL)",
                            )),
                    )
                    .col(ColumnDef::new(Favorites::BranchId).uuid())
                    .col(ColumnDef::new(Favorites::MenuItemId).uuid())
                    .col(ColumnDef::new(Favorites::OfferId).uuid())
                    .col(
                        ColumnDef::new(Favorites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_branch")
                            .from(Favorites::Table, Favorites::BranchId)
                            .to(Branches::Table, Branches::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_menu_item")
                            .from(Favorites::Table, Favorites::MenuItemId)
                            .to(MenuItems::Table, MenuItems::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_offer")
                            .from(Favorites::Table, Favorites::OfferId)
                            .to(Offers::Table, Offers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Partial unique indexes: one favorite per (user, target). A plain
        // composite unique would not fire across NULLs.
        let conn = manager.get_connection();
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX ux_favorites_user_branch ON favorites (user_id, branch_id) WHERE branch_id IS NOT NULL",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX ux_favorites_user_menu_item ON favorites (user_id, menu_item_id) WHERE menu_item_id IS NOT NULL",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX ux_favorites_user_offer ON favorites (user_id, offer_id) WHERE offer_id IS NOT NULL",
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reviews::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Reviews::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Reviews::TargetType)
                            .string()
                            .not_null()
                            // Same invariant as favorites; 'overall' rides on branch_id.
                            .check(Expr::cust(
                                "(target_type IN ('branch','overall') AND branch_id IS NOT NULL AND menu_item_id IS NULL AND offer_id IS NULL) \
                                 OR (target_type = 'menu_item' AND menu_item_id IS NOT NULL AND branch_id IS NULL AND offer_id IS NULL) \
                                 OR (target_type = 'offer' AND offer_id IS NOT NULL AND branch_id IS NULL AND menu_item_id IS NULL)",
                            )),
                    )
                    .col(ColumnDef::new(Reviews::BranchId).uuid())
                    .col(ColumnDef::new(Reviews::MenuItemId).uuid())
                    .col(ColumnDef::new(Reviews::OfferId).uuid())
                    .col(
                        ColumnDef::new(Reviews::Rating)
                            .small_integer()
                            .not_null()
                            .check(Expr::cust("rating BETWEEN 1 AND 5")),
                    )
                    .col(ColumnDef::new(Reviews::Comment).string())
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reviews::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_branch")
                            .from(Reviews::Table, Reviews::BranchId)
                            .to(Branches::Table, Branches::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_menu_item")
                            .from(Reviews::Table, Reviews::MenuItemId)
                            .to(MenuItems::Table, MenuItems::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_offer")
                            .from(Reviews::Table, Reviews::OfferId)
                            .to(Offers::Table, Offers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_reviews_user")
                    .table(Reviews::Table)
                    .col(Reviews::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReviewReplies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewReplies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewReplies::ReviewId).uuid().not_null())
                    .col(ColumnDef::new(ReviewReplies::UserId).uuid().not_null())
                    .col(ColumnDef::new(ReviewReplies::Comment).string().not_null())
                    .col(
                        ColumnDef::new(ReviewReplies::FromVendor)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReviewReplies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReviewReplies::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_replies_review")
                            .from(ReviewReplies::Table, ReviewReplies::ReviewId)
                            .to(Reviews::Table, Reviews::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_review_replies_review")
                    .table(ReviewReplies::Table)
                    .col(ReviewReplies::ReviewId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReviewLikes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewLikes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewLikes::ReviewId).uuid().not_null())
                    .col(ColumnDef::new(ReviewLikes::UserId).uuid().not_null())
                    .col(ColumnDef::new(ReviewLikes::IsLiked).boolean().not_null())
                    .col(
                        ColumnDef::new(ReviewLikes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_likes_review")
                            .from(ReviewLikes::Table, ReviewLikes::ReviewId)
                            .to(Reviews::Table, Reviews::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Conflict target for the like upsert.
        manager
            .create_index(
                Index::create()
                    .name("ux_review_likes_review_user")
                    .table(ReviewLikes::Table)
                    .col(ReviewLikes::ReviewId)
                    .col(ReviewLikes::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "review_likes",
            "review_replies",
            "reviews",
            "favorites",
            "offers",
            "menu_items",
            "branches",
            "vendors",
        ] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Vendors {
    Table,
    Id,
    UserId,
    Name,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Branches {
    Table,
    Id,
    VendorId,
    Name,
    Address,
    Latitude,
    Longitude,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum MenuItems {
    Table,
    Id,
    BranchId,
    Name,
    Price,
    Description,
    ImagePath,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Offers {
    Table,
    Id,
    BranchId,
    Title,
    DiscountKind,
    DiscountValue,
    DiscountCap,
    StartsAt,
    EndsAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Favorites {
    Table,
    Id,
    UserId,
    TargetType,
    BranchId,
    MenuItemId,
    OfferId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    UserId,
    TargetType,
    BranchId,
    MenuItemId,
    OfferId,
    Rating,
    Comment,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum ReviewReplies {
    Table,
    Id,
    ReviewId,
    UserId,
    Comment,
    FromVendor,
    CreatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum ReviewLikes {
    Table,
    Id,
    ReviewId,
    UserId,
    IsLiked,
    UpdatedAt,
}
