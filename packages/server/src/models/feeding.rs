use chrono::{DateTime, Utc};
use pawtrack_common::{FoodType, MealTime, ObjectId};
use serde::{Deserialize, Serialize};

use crate::entity::feeding;
use crate::error::AppError;

use super::bathroom_log::parse_dog_ref;
use super::dog::DogSummary;
use super::shared::{
    double_option, required, trim_optional, validate_max_chars, validate_non_negative,
};

pub const NOTES_MAX_CHARS: usize = 500;
pub const BRAND_MAX_CHARS: usize = 100;

pub const FEEDING_SORT_FIELDS: &[&str] = &[
    "date",
    "amount",
    "calories",
    "foodType",
    "mealTime",
    "createdAt",
    "updatedAt",
];
pub const FEEDING_DEFAULT_SORT: &str = "-date";

#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedingRequest {
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub dog_id: Option<String>,
    pub food_type: Option<FoodType>,
    /// Non-negative quantity.
    #[schema(example = 250.0)]
    pub amount: Option<f64>,
    #[schema(example = 410.0)]
    pub calories: Option<f64>,
    /// Defaults to now.
    pub date: Option<DateTime<Utc>>,
    pub meal_time: Option<MealTime>,
    pub notes: Option<String>,
    #[schema(example = "Acme Kibble")]
    pub brand: Option<String>,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedingRequest {
    pub dog_id: Option<String>,
    pub food_type: Option<FoodType>,
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub calories: Option<Option<f64>>,
    pub date: Option<DateTime<Utc>>,
    pub meal_time: Option<MealTime>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub brand: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedingFields {
    pub dog_id: ObjectId,
    pub food_type: FoodType,
    pub amount: f64,
    pub calories: Option<f64>,
    pub date: DateTime<Utc>,
    pub meal_time: MealTime,
    pub notes: Option<String>,
    pub brand: Option<String>,
}

impl FeedingFields {
    pub fn from_create(req: CreateFeedingRequest, now: DateTime<Utc>) -> Result<Self, AppError> {
        let fields = Self {
            dog_id: parse_dog_ref(&required(req.dog_id, "Dog ID")?)?,
            food_type: required(req.food_type, "Food type")?,
            amount: required(req.amount, "Amount")?,
            calories: req.calories,
            date: req.date.unwrap_or(now),
            meal_time: required(req.meal_time, "Meal time")?,
            notes: trim_optional(req.notes),
            brand: trim_optional(req.brand),
        };
        validate_feeding(&fields)?;
        Ok(fields)
    }

    pub fn apply(&mut self, req: UpdateFeedingRequest) -> Result<(), AppError> {
        if let Some(dog_id) = req.dog_id {
            self.dog_id = parse_dog_ref(&dog_id)?;
        }
        if let Some(food_type) = req.food_type {
            self.food_type = food_type;
        }
        if let Some(amount) = req.amount {
            self.amount = amount;
        }
        if let Some(calories) = req.calories {
            self.calories = calories;
        }
        if let Some(date) = req.date {
            self.date = date;
        }
        if let Some(meal_time) = req.meal_time {
            self.meal_time = meal_time;
        }
        if let Some(notes) = req.notes {
            self.notes = trim_optional(notes);
        }
        if let Some(brand) = req.brand {
            self.brand = trim_optional(brand);
        }
        validate_feeding(self)
    }
}

impl TryFrom<&feeding::Model> for FeedingFields {
    type Error = AppError;

    fn try_from(m: &feeding::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            dog_id: m
                .dog_id
                .parse()
                .map_err(|e| AppError::Store(format!("corrupt dog_id on {}: {e}", m.id)))?,
            food_type: m.food_type,
            amount: m.amount,
            calories: m.calories,
            date: m.date,
            meal_time: m.meal_time,
            notes: m.notes.clone(),
            brand: m.brand.clone(),
        })
    }
}

pub fn validate_feeding(fields: &FeedingFields) -> Result<(), AppError> {
    validate_non_negative(fields.amount, "Amount")?;
    if let Some(calories) = fields.calories {
        validate_non_negative(calories, "Calories")?;
    }
    validate_max_chars(fields.notes.as_deref(), NOTES_MAX_CHARS, "Notes")?;
    validate_max_chars(fields.brand.as_deref(), BRAND_MAX_CHARS, "Brand")?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedingResponse {
    #[serde(rename = "_id")]
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f7")]
    pub id: String,
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub dog_id: String,
    pub food_type: FoodType,
    #[schema(example = 250.0)]
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    pub date: DateTime<Utc>,
    pub meal_time: MealTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present only when `includeDog=true`; `null` if the dog no longer exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<DogSummary>)]
    pub dog: Option<Option<DogSummary>>,
}

impl From<feeding::Model> for FeedingResponse {
    fn from(m: feeding::Model) -> Self {
        Self {
            id: m.id,
            dog_id: m.dog_id,
            food_type: m.food_type,
            amount: m.amount,
            calories: m.calories,
            date: m.date,
            meal_time: m.meal_time,
            notes: m.notes,
            brand: m.brand,
            created_at: m.created_at,
            updated_at: m.updated_at,
            dog: None,
        }
    }
}

impl FeedingResponse {
    pub fn with_dog(mut self, dog: Option<DogSummary>) -> Self {
        self.dog = Some(dog);
        self
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct FeedingListQuery {
    /// Page number (1-indexed).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (1-100, default 10).
    #[param(example = 10)]
    pub limit: Option<u64>,
    /// Sort field, prefixed with `-` for descending. Default `-date`.
    #[param(example = "-amount")]
    pub sort: Option<String>,
    pub dog_id: Option<String>,
    #[param(inline)]
    pub food_type: Option<FoodType>,
    #[param(inline)]
    pub meal_time: Option<MealTime>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub include_dog: Option<bool>,
}
