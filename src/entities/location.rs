use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Location entity: a street address belonging to one country
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[validate(length(max = 200, message = "Street cannot exceed 200 characters"))]
    pub street: String,

    #[validate(length(max = 100, message = "City cannot exceed 100 characters"))]
    pub city: String,

    #[validate(length(max = 100, message = "State cannot exceed 100 characters"))]
    pub state: Option<String>,

    pub country_id: i32,

    #[validate(length(max = 50, message = "Time zone cannot exceed 50 characters"))]
    pub time_zone: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::CountryId",
        to = "super::country::Column::Id"
    )]
    Country,
    #[sea_orm(has_many = "super::pharmacy::Entity")]
    Pharmacies,
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl Related<super::pharmacy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pharmacies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
