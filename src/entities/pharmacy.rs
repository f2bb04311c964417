use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Pharmacy entity
///
/// Each pharmacy is linked to one identity user (`user_id`) who administers
/// it, and optionally to a physical location.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "pharmacies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Pharmacy display name, unique case-insensitively
    #[validate(length(
        min = 1,
        max = 100,
        message = "Pharmacy name must be between 1 and 100 characters"
    ))]
    pub name: String,

    /// Login name of the administering account (an email address)
    #[validate(length(
        min = 1,
        max = 50,
        message = "Username must be between 1 and 50 characters"
    ))]
    pub username: String,

    /// Legacy credential column carried from the source schema; never holds
    /// a usable secret for provisioned accounts
    #[validate(length(max = 100, message = "Password cannot exceed 100 characters"))]
    pub password: Option<String>,

    pub latitude: Option<String>,

    pub longitude: Option<String>,

    pub is_active: bool,

    /// Identity user owning this pharmacy record
    pub user_id: Uuid,

    #[validate(length(max = 50, message = "Account number cannot exceed 50 characters"))]
    pub account_number: Option<String>,

    pub location_id: Option<i32>,

    pub created_at: DateTime<Utc>,

    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "crate::auth::user::Entity",
        from = "Column::UserId",
        to = "crate::auth::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::item::Entity")]
    Items,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<crate::auth::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.is_active {
                active_model.is_active = Set(true);
            }
            active_model.created_at = Set(Utc::now());
        } else {
            active_model.updated_at = Set(Some(Utc::now()));
        }

        Ok(active_model)
    }
}
