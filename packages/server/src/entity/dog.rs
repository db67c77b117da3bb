use pawtrack_common::Gender;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dog")]
pub struct Model {
    /// 24-character hex identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub name: String,
    pub breed: String,
    pub age: Option<i32>,  // whole years
    pub weight: f64,       // in kilograms
    pub gender: Gender,
    pub owner_name: String,
    #[sea_orm(default_value = false)]
    pub is_vaccinated: bool,

    /// Ordered JSON array of {date, description, veterinarian}.
    #[sea_orm(column_type = "JsonBinary")]
    pub medical_history: serde_json::Value,
    /// Ordered JSON array of {url, isDefault}.
    #[sea_orm(column_type = "JsonBinary")]
    pub photos: serde_json::Value,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
