use chrono::{DateTime, Utc};
use pawtrack_common::Gender;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::entity::dog;
use crate::error::AppError;

use super::shared::{double_option, required, required_text};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 30;
pub const MAX_AGE: i32 = 30;
pub const MAX_WEIGHT: f64 = 200.0;

/// Allowed values of the `sort` parameter on dog listings.
pub const DOG_SORT_FIELDS: &[&str] = &["name", "breed", "age", "weight", "createdAt", "updatedAt"];
pub const DOG_DEFAULT_SORT: &str = "-createdAt";

/// One entry of a dog's medical history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    /// Defaults to the time the entry was recorded.
    #[schema(example = "2024-03-01T10:00:00Z")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[schema(example = "Annual vaccination")]
    pub description: String,
    #[schema(example = "Dr. Smith")]
    pub veterinarian: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(default)]
    #[schema(example = "https://example.com/rex.jpg")]
    pub url: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDogRequest {
    /// 2 to 30 characters after trimming.
    #[schema(example = "Rex")]
    pub name: Option<String>,
    #[schema(example = "Labrador")]
    pub breed: Option<String>,
    /// Whole years, 0 to 30.
    #[schema(value_type = Option<i32>, example = 4)]
    pub age: Option<f64>,
    /// Kilograms, greater than 0 and at most 200.
    #[schema(example = 28.5)]
    pub weight: Option<f64>,
    pub gender: Option<Gender>,
    #[schema(example = "Alice")]
    pub owner_name: Option<String>,
    /// Defaults to `false`.
    pub is_vaccinated: Option<bool>,
    pub medical_history: Option<Vec<MedicalRecord>>,
    pub photos: Option<Vec<Photo>>,
}

/// Partial update. Absent fields are left unchanged; `age: null` clears the age.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDogRequest {
    pub name: Option<String>,
    pub breed: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub age: Option<Option<f64>>,
    pub weight: Option<f64>,
    pub gender: Option<Gender>,
    pub owner_name: Option<String>,
    pub is_vaccinated: Option<bool>,
    pub medical_history: Option<Vec<MedicalRecord>>,
    pub photos: Option<Vec<Photo>>,
}

/// A dog's mutable fields after normalization. Both create and update build
/// one of these and pass it through [`validate_dog`].
#[derive(Clone, Debug, PartialEq)]
pub struct DogFields {
    pub name: String,
    pub breed: String,
    pub age: Option<i32>,
    pub weight: f64,
    pub gender: Gender,
    pub owner_name: String,
    pub is_vaccinated: bool,
    pub medical_history: Vec<MedicalRecord>,
    pub photos: Vec<Photo>,
}

impl DogFields {
    /// Check required fields, apply defaults and validate.
    pub fn from_create(req: CreateDogRequest, now: DateTime<Utc>) -> Result<Self, AppError> {
        let fields = Self {
            name: required(req.name, "Name")?.trim().to_string(),
            breed: required_text(req.breed, "Breed")?,
            age: req.age.map(whole_years).transpose()?,
            weight: required(req.weight, "Weight")?,
            gender: required(req.gender, "Gender")?,
            owner_name: required_text(req.owner_name, "Owner name")?,
            is_vaccinated: req.is_vaccinated.unwrap_or(false),
            medical_history: stamp_medical_history(req.medical_history.unwrap_or_default(), &[], now),
            photos: req.photos.unwrap_or_default(),
        };
        validate_dog(&fields)?;
        Ok(fields)
    }

    /// Merge a patch onto these fields and validate the merged result.
    pub fn apply(&mut self, req: UpdateDogRequest, now: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(name) = req.name {
            self.name = name.trim().to_string();
        }
        if let Some(breed) = req.breed {
            self.breed = breed.trim().to_string();
        }
        if let Some(age) = req.age {
            self.age = age.map(whole_years).transpose()?;
        }
        if let Some(weight) = req.weight {
            self.weight = weight;
        }
        if let Some(gender) = req.gender {
            self.gender = gender;
        }
        if let Some(owner_name) = req.owner_name {
            self.owner_name = owner_name.trim().to_string();
        }
        if let Some(is_vaccinated) = req.is_vaccinated {
            self.is_vaccinated = is_vaccinated;
        }
        if let Some(history) = req.medical_history {
            self.medical_history = stamp_medical_history(history, &self.medical_history, now);
        }
        if let Some(photos) = req.photos {
            self.photos = photos;
        }
        validate_dog(self)
    }
}

impl TryFrom<&dog::Model> for DogFields {
    type Error = AppError;

    fn try_from(m: &dog::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            name: m.name.clone(),
            breed: m.breed.clone(),
            age: m.age,
            weight: m.weight,
            gender: m.gender,
            owner_name: m.owner_name.clone(),
            is_vaccinated: m.is_vaccinated,
            medical_history: stored_list(&m.medical_history, "medical_history", &m.id)?,
            photos: stored_list(&m.photos, "photos", &m.id)?,
        })
    }
}

/// Decode a JSON array column. A value that does not decode is a store
/// failure, never an empty list.
fn stored_list<T: DeserializeOwned>(
    value: &serde_json::Value,
    column: &str,
    id: &str,
) -> Result<Vec<T>, AppError> {
    Vec::<T>::deserialize(value)
        .map_err(|e| AppError::Store(format!("corrupt {column} on dog {id}: {e}")))
}

fn whole_years(age: f64) -> Result<i32, AppError> {
    if !age.is_finite() || age.fract() != 0.0 {
        return Err(AppError::Validation("Age must be a whole number".into()));
    }
    // Saturating cast; out-of-range values are rejected by validate_dog.
    Ok(age as i32)
}

/// Trim descriptions and date undated entries. An undated entry that matches
/// a `stored` one (same description and veterinarian) keeps the stored date,
/// so resending a history does not move its dates.
fn stamp_medical_history(
    mut history: Vec<MedicalRecord>,
    stored: &[MedicalRecord],
    now: DateTime<Utc>,
) -> Vec<MedicalRecord> {
    for entry in &mut history {
        entry.description = entry.description.trim().to_string();
        if entry.date.is_none() {
            let previous = stored
                .iter()
                .find(|s| s.description == entry.description && s.veterinarian == entry.veterinarian)
                .and_then(|s| s.date);
            entry.date = Some(previous.unwrap_or(now));
        }
    }
    history
}

pub fn validate_dog(fields: &DogFields) -> Result<(), AppError> {
    let name_len = fields.name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
        return Err(AppError::Validation(format!(
            "Name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
        )));
    }
    if fields.breed.is_empty() {
        return Err(AppError::Validation("Breed is required".into()));
    }
    if fields.owner_name.is_empty() {
        return Err(AppError::Validation("Owner name is required".into()));
    }
    if let Some(age) = fields.age
        && !(0..=MAX_AGE).contains(&age)
    {
        return Err(AppError::Validation(format!(
            "Age must be between 0 and {MAX_AGE}"
        )));
    }
    if !fields.weight.is_finite() || fields.weight <= 0.0 || fields.weight > MAX_WEIGHT {
        return Err(AppError::Validation(format!(
            "Weight must be greater than 0 and at most {MAX_WEIGHT}"
        )));
    }
    if fields.medical_history.iter().any(|e| e.description.is_empty()) {
        return Err(AppError::Validation(
            "Medical history entries require a description".into(),
        ));
    }
    if fields.photos.iter().any(|p| p.url.trim().is_empty()) {
        return Err(AppError::Validation("Photos require a url".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DogResponse {
    #[serde(rename = "_id")]
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    #[schema(example = "Rex")]
    pub name: String,
    #[schema(example = "Labrador")]
    pub breed: String,
    #[schema(example = 4)]
    pub age: Option<i32>,
    #[schema(example = 28.5)]
    pub weight: f64,
    pub gender: Gender,
    #[schema(example = "Alice")]
    pub owner_name: String,
    pub is_vaccinated: bool,
    pub medical_history: Vec<MedicalRecord>,
    pub photos: Vec<Photo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<dog::Model> for DogResponse {
    type Error = AppError;

    fn try_from(m: dog::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            medical_history: stored_list(&m.medical_history, "medical_history", &m.id)?,
            photos: stored_list(&m.photos, "photos", &m.id)?,
            id: m.id,
            name: m.name,
            breed: m.breed,
            age: m.age,
            weight: m.weight,
            gender: m.gender,
            owner_name: m.owner_name,
            is_vaccinated: m.is_vaccinated,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// Minimal dog projection attached to logs when `includeDog=true`.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct DogSummary {
    #[serde(rename = "_id")]
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    #[schema(example = "Rex")]
    pub name: String,
    #[schema(example = "Labrador")]
    pub breed: String,
}

impl From<dog::Model> for DogSummary {
    fn from(m: dog::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            breed: m.breed,
        }
    }
}

/// Query parameters for listing dogs.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct DogListQuery {
    /// Page number (1-indexed).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (1-100, default 10).
    #[param(example = 10)]
    pub limit: Option<u64>,
    /// Sort field, prefixed with `-` for descending. Default `-createdAt`.
    #[param(example = "-createdAt")]
    pub sort: Option<String>,
    /// Case-insensitive substring match on breed.
    #[param(example = "lab")]
    pub breed: Option<String>,
    /// Case-insensitive substring match on name.
    pub name: Option<String>,
    #[param(inline)]
    pub gender: Option<Gender>,
    pub is_vaccinated: Option<bool>,
    /// Exact owner name.
    pub owner_name: Option<String>,
}
