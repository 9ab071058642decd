//! Polymorphic single-reference targets for favorites and reviews.
//!
//! A favorite or review points at exactly one of {branch, menu item, offer}.
//! The wire and storage representations are flat (a `type` discriminant plus
//! three nullable reference columns); in process the reference is a sum type,
//! so an inconsistent combination is unrepresentable once constructed. The
//! validating constructors below are the only way in, and they run before any
//! persistence attempt.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Discriminant naming which reference field is populated.
///
/// `Overall` is accepted for reviews only and maps to the branch field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Branch,
    MenuItem,
    Offer,
    Overall,
}

impl TargetKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Branch => "branch",
            TargetKind::MenuItem => "menu_item",
            TargetKind::Offer => "offer",
            TargetKind::Overall => "overall",
        }
    }

    /// The reference field this discriminant names.
    fn reference_field(self) -> &'static str {
        match self {
            TargetKind::Branch | TargetKind::Overall => "branch_id",
            TargetKind::MenuItem => "menu_item_id",
            TargetKind::Offer => "offer_id",
        }
    }
}

impl TryFrom<&str> for TargetKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "branch" => Ok(TargetKind::Branch),
            "menu_item" => Ok(TargetKind::MenuItem),
            "offer" => Ok(TargetKind::Offer),
            "overall" => Ok(TargetKind::Overall),
            other => Err(format!("unknown target type '{other}'")),
        }
    }
}

/// Flat reference fields exactly as submitted by a client or stored in a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetFields {
    pub branch_id: Option<Uuid>,
    pub menu_item_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
}

/// Exactly-one-of check: the field named by the discriminant must be set and
/// every other reference field must be null. Violations report the offending
/// field(s). Pure function, no storage access.
fn resolve(kind: TargetKind, fields: TargetFields) -> Result<Uuid, DomainError> {
    let expected = kind.reference_field();

    let all = [
        ("branch_id", fields.branch_id),
        ("menu_item_id", fields.menu_item_id),
        ("offer_id", fields.offer_id),
    ];

    let conflicting: Vec<&str> = all
        .iter()
        .filter(|(name, value)| value.is_some() && *name != expected)
        .map(|(name, _)| *name)
        .collect();

    if !conflicting.is_empty() {
        return Err(DomainError::validation(
            conflicting.join(", "),
            format!("must be null when type is '{}'", kind.as_str()),
        ));
    }

    let populated = all
        .iter()
        .find(|(name, _)| *name == expected)
        .and_then(|(_, value)| *value);

    populated.ok_or_else(|| {
        DomainError::validation(
            expected,
            format!("required when type is '{}'", kind.as_str()),
        )
    })
}

/// Target of a favorite. Favorites have no `overall` case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteTarget {
    Branch(Uuid),
    MenuItem(Uuid),
    Offer(Uuid),
}

impl FavoriteTarget {
    /// Validating constructor from the flat wire/storage representation.
    pub fn from_parts(kind: TargetKind, fields: TargetFields) -> Result<Self, DomainError> {
        let id = resolve(kind, fields)?;
        match kind {
            TargetKind::Branch => Ok(FavoriteTarget::Branch(id)),
            TargetKind::MenuItem => Ok(FavoriteTarget::MenuItem(id)),
            TargetKind::Offer => Ok(FavoriteTarget::Offer(id)),
            TargetKind::Overall => Err(DomainError::validation(
                "type",
                "'overall' is not a valid favorite target",
            )),
        }
    }

    #[must_use]
    pub fn kind(self) -> TargetKind {
        match self {
            FavoriteTarget::Branch(_) => TargetKind::Branch,
            FavoriteTarget::MenuItem(_) => TargetKind::MenuItem,
            FavoriteTarget::Offer(_) => TargetKind::Offer,
        }
    }

    /// Identifier of the referenced row, whichever entity it is.
    #[must_use]
    pub fn target_id(self) -> Uuid {
        match self {
            FavoriteTarget::Branch(id)
            | FavoriteTarget::MenuItem(id)
            | FavoriteTarget::Offer(id) => id,
        }
    }

    /// Flatten back to the storage representation.
    #[must_use]
    pub fn fields(self) -> TargetFields {
        let mut fields = TargetFields::default();
        match self {
            FavoriteTarget::Branch(id) => fields.branch_id = Some(id),
            FavoriteTarget::MenuItem(id) => fields.menu_item_id = Some(id),
            FavoriteTarget::Offer(id) => fields.offer_id = Some(id),
        }
        fields
    }
}

/// Target of a review. `Overall` rates the branch as a whole and carries the
/// branch id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTarget {
    Branch(Uuid),
    MenuItem(Uuid),
    Offer(Uuid),
    Overall(Uuid),
}

impl ReviewTarget {
    /// Validating constructor from the flat wire/storage representation.
    pub fn from_parts(kind: TargetKind, fields: TargetFields) -> Result<Self, DomainError> {
        let id = resolve(kind, fields)?;
        Ok(match kind {
            TargetKind::Branch => ReviewTarget::Branch(id),
            TargetKind::MenuItem => ReviewTarget::MenuItem(id),
            TargetKind::Offer => ReviewTarget::Offer(id),
            TargetKind::Overall => ReviewTarget::Overall(id),
        })
    }

    #[must_use]
    pub fn kind(self) -> TargetKind {
        match self {
            ReviewTarget::Branch(_) => TargetKind::Branch,
            ReviewTarget::MenuItem(_) => TargetKind::MenuItem,
            ReviewTarget::Offer(_) => TargetKind::Offer,
            ReviewTarget::Overall(_) => TargetKind::Overall,
        }
    }

    #[must_use]
    pub fn target_id(self) -> Uuid {
        match self {
            ReviewTarget::Branch(id)
            | ReviewTarget::MenuItem(id)
            | ReviewTarget::Offer(id)
            | ReviewTarget::Overall(id) => id,
        }
    }

    /// Branch the review resolves to directly, if its target is one.
    ///
    /// `Branch` and `Overall` targets resolve here; menu-item and offer
    /// targets need a storage lookup to reach their branch.
    #[must_use]
    pub fn direct_branch_id(self) -> Option<Uuid> {
        match self {
            ReviewTarget::Branch(id) | ReviewTarget::Overall(id) => Some(id),
            ReviewTarget::MenuItem(_) | ReviewTarget::Offer(_) => None,
        }
    }

    /// Flatten back to the storage representation.
    #[must_use]
    pub fn fields(self) -> TargetFields {
        let mut fields = TargetFields::default();
        match self {
            ReviewTarget::Branch(id) | ReviewTarget::Overall(id) => fields.branch_id = Some(id),
            ReviewTarget::MenuItem(id) => fields.menu_item_id = Some(id),
            ReviewTarget::Offer(id) => fields.offer_id = Some(id),
        }
        fields
    }
}
