use pawtrack_common::{FoodType, MealTime};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feeding")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Weak reference to a dog.
    #[sea_orm(indexed)]
    pub dog_id: String,

    pub food_type: FoodType,
    pub amount: f64,
    pub calories: Option<f64>,

    #[sea_orm(indexed)]
    pub date: DateTimeUtc,
    pub meal_time: MealTime,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub brand: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
