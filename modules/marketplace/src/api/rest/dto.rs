//! REST DTOs. The polymorphic target travels flat on the wire (a `type`
//! discriminant plus three nullable ids); conversion to the domain sum type
//! happens in the handlers via the validating constructors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::model::{
    Branch, Discount, DiscountKind, Favorite, MenuItem, Offer, RegistrationStatus, Review,
    ReviewLike, ReviewReply, Vendor,
};
use crate::domain::target::{TargetFields, TargetKind};

// ==================== Vendors ====================

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterVendorReq {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatusDto {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl From<RegistrationStatus> for VendorStatusDto {
    fn from(s: RegistrationStatus) -> Self {
        match s {
            RegistrationStatus::Pending => VendorStatusDto::Pending,
            RegistrationStatus::Approved => VendorStatusDto::Approved,
            RegistrationStatus::Rejected => VendorStatusDto::Rejected,
            RegistrationStatus::Suspended => VendorStatusDto::Suspended,
        }
    }
}

impl From<VendorStatusDto> for RegistrationStatus {
    fn from(s: VendorStatusDto) -> Self {
        match s {
            VendorStatusDto::Pending => RegistrationStatus::Pending,
            VendorStatusDto::Approved => RegistrationStatus::Approved,
            VendorStatusDto::Rejected => RegistrationStatus::Rejected,
            VendorStatusDto::Suspended => RegistrationStatus::Suspended,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetVendorStatusReq {
    pub status: VendorStatusDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub status: VendorStatusDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vendor> for VendorDto {
    fn from(v: Vendor) -> Self {
        VendorDto {
            id: v.id,
            user_id: v.user_id,
            name: v.name,
            status: v.status.into(),
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

// ==================== Branches ====================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBranchReq {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBranchReq {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BranchDto {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Branch> for BranchDto {
    fn from(b: Branch) -> Self {
        BranchDto {
            id: b.id,
            vendor_id: b.vendor_id,
            name: b.name,
            address: b.address,
            latitude: b.latitude,
            longitude: b.longitude,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

// ==================== Menu items ====================

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMenuItemReq {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MenuListQuery {
    /// Case-insensitive substring match over name and description.
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemDto {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuItem> for MenuItemDto {
    fn from(i: MenuItem) -> Self {
        MenuItemDto {
            id: i.id,
            branch_id: i.branch_id,
            name: i.name,
            price: i.price,
            description: i.description,
            image_path: i.image_path,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

// ==================== Offers ====================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKindDto {
    Percentage,
    Flat,
}

impl From<DiscountKind> for DiscountKindDto {
    fn from(k: DiscountKind) -> Self {
        match k {
            DiscountKind::Percentage => DiscountKindDto::Percentage,
            DiscountKind::Flat => DiscountKindDto::Flat,
        }
    }
}

impl From<DiscountKindDto> for DiscountKind {
    fn from(k: DiscountKindDto) -> Self {
        match k {
            DiscountKindDto::Percentage => DiscountKind::Percentage,
            DiscountKindDto::Flat => DiscountKind::Flat,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiscountDto {
    pub kind: DiscountKindDto,
    pub value: Decimal,
    pub cap: Option<Decimal>,
}

impl From<Discount> for DiscountDto {
    fn from(d: Discount) -> Self {
        DiscountDto {
            kind: d.kind.into(),
            value: d.value,
            cap: d.cap,
        }
    }
}

impl From<DiscountDto> for Discount {
    fn from(d: DiscountDto) -> Self {
        Discount {
            kind: d.kind.into(),
            value: d.value,
            cap: d.cap,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOfferReq {
    pub title: String,
    pub discount: DiscountDto,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOfferReq {
    pub title: Option<String>,
    pub discount: Option<DiscountDto>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OfferDto {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub title: String,
    pub discount: DiscountDto,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Offer> for OfferDto {
    fn from(o: Offer) -> Self {
        OfferDto {
            id: o.id,
            branch_id: o.branch_id,
            title: o.title,
            discount: o.discount.into(),
            starts_at: o.starts_at,
            ends_at: o.ends_at,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

// ==================== Polymorphic targets ====================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TargetTypeDto {
    Branch,
    MenuItem,
    Offer,
    /// Review-only; maps to the branch reference.
    Overall,
}

impl From<TargetTypeDto> for TargetKind {
    fn from(t: TargetTypeDto) -> Self {
        match t {
            TargetTypeDto::Branch => TargetKind::Branch,
            TargetTypeDto::MenuItem => TargetKind::MenuItem,
            TargetTypeDto::Offer => TargetKind::Offer,
            TargetTypeDto::Overall => TargetKind::Overall,
        }
    }
}

impl From<TargetKind> for TargetTypeDto {
    fn from(t: TargetKind) -> Self {
        match t {
            TargetKind::Branch => TargetTypeDto::Branch,
            TargetKind::MenuItem => TargetTypeDto::MenuItem,
            TargetKind::Offer => TargetTypeDto::Offer,
            TargetKind::Overall => TargetTypeDto::Overall,
        }
    }
}

// ==================== Favorites ====================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFavoriteReq {
    #[serde(rename = "type")]
    pub target_type: TargetTypeDto,
    pub branch_id: Option<Uuid>,
    pub menu_item_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
}

impl CreateFavoriteReq {
    #[must_use]
    pub fn target_fields(&self) -> TargetFields {
        TargetFields {
            branch_id: self.branch_id,
            menu_item_id: self.menu_item_id,
            offer_id: self.offer_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteDto {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub target_type: TargetTypeDto,
    pub branch_id: Option<Uuid>,
    pub menu_item_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Favorite> for FavoriteDto {
    fn from(f: Favorite) -> Self {
        let fields = f.target.fields();
        FavoriteDto {
            id: f.id,
            user_id: f.user_id,
            target_type: f.target.kind().into(),
            branch_id: fields.branch_id,
            menu_item_id: fields.menu_item_id,
            offer_id: fields.offer_id,
            created_at: f.created_at,
        }
    }
}

// ==================== Reviews ====================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewReq {
    #[serde(rename = "type")]
    pub target_type: TargetTypeDto,
    pub branch_id: Option<Uuid>,
    pub menu_item_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
}

impl CreateReviewReq {
    #[must_use]
    pub fn target_fields(&self) -> TargetFields {
        TargetFields {
            branch_id: self.branch_id,
            menu_item_id: self.menu_item_id,
            offer_id: self.offer_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReviewReq {
    pub rating: Option<i16>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReviewListQuery {
    #[serde(rename = "type")]
    pub target_type: TargetTypeDto,
    pub target_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDto {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub target_type: TargetTypeDto,
    pub branch_id: Option<Uuid>,
    pub menu_item_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
    fn from(r: Review) -> Self {
        let fields = r.target.fields();
        ReviewDto {
            id: r.id,
            user_id: r.user_id,
            target_type: r.target.kind().into(),
            branch_id: fields.branch_id,
            menu_item_id: fields.menu_item_id,
            offer_id: fields.offer_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReplyReq {
    pub comment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplyDto {
    pub id: Uuid,
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub from_vendor: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewReply> for ReplyDto {
    fn from(r: ReviewReply) -> Self {
        ReplyDto {
            id: r.id,
            review_id: r.review_id,
            user_id: r.user_id,
            comment: r.comment,
            from_vendor: r.from_vendor,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LikeReviewReq {
    pub is_liked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewLikeDto {
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub is_liked: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewLike> for ReviewLikeDto {
    fn from(l: ReviewLike) -> Self {
        ReviewLikeDto {
            review_id: l.review_id,
            user_id: l.user_id,
            is_liked: l.is_liked,
            updated_at: l.updated_at,
        }
    }
}
