use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Item entity: a stocked product belonging to one pharmacy
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Item name, unique case-insensitively (excluding self on update)
    #[validate(length(
        min = 1,
        max = 100,
        message = "Item name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    pub price: Decimal,

    pub item_status_id: i32,

    #[validate(length(max = 50, message = "Item code cannot exceed 50 characters"))]
    pub code: Option<String>,

    pub inserted_by: Option<String>,

    pub insert_date: Option<DateTime<Utc>>,

    pub expiry_date: Option<DateTime<Utc>>,

    pub updated_by: Option<String>,

    pub update_date: Option<DateTime<Utc>>,

    pub is_active: bool,

    pub stock: Option<i32>,

    pub pharmacy_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item_status::Entity",
        from = "Column::ItemStatusId",
        to = "super::item_status::Column::Id"
    )]
    ItemStatus,
    #[sea_orm(
        belongs_to = "super::pharmacy::Entity",
        from = "Column::PharmacyId",
        to = "super::pharmacy::Column::Id"
    )]
    Pharmacy,
}

impl Related<super::item_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemStatus.def()
    }
}

impl Related<super::pharmacy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pharmacy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
