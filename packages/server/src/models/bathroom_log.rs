use chrono::{DateTime, Utc};
use pawtrack_common::{BathroomType, Consistency, ObjectId, StoolColor};
use serde::{Deserialize, Serialize};

use crate::entity::bathroom_log;
use crate::error::AppError;

use super::dog::DogSummary;
use super::shared::{double_option, required, trim_optional, validate_max_chars};

pub const NOTES_MAX_CHARS: usize = 500;

pub const BATHROOM_LOG_SORT_FIELDS: &[&str] = &["date", "type", "createdAt", "updatedAt"];
pub const BATHROOM_LOG_DEFAULT_SORT: &str = "-date";

/// GeoJSON point. Coordinates are `[longitude, latitude]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point_kind")]
    #[schema(example = "Point")]
    pub kind: String,
    #[schema(example = json!([-73.97, 40.77]))]
    pub coordinates: Vec<f64>,
}

fn point_kind() -> String {
    "Point".to_string()
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: point_kind(),
            coordinates: vec![longitude, latitude],
        }
    }

    /// `(longitude, latitude)` when the point is well formed.
    pub fn lng_lat(&self) -> Option<(f64, f64)> {
        match self.coordinates.as_slice() {
            [lng, lat] => Some((*lng, *lat)),
            _ => None,
        }
    }
}

pub fn validate_location(point: &GeoPoint) -> Result<(), AppError> {
    if point.kind != "Point" {
        return Err(AppError::Validation("Location type must be 'Point'".into()));
    }
    let Some((lng, lat)) = point.lng_lat() else {
        return Err(AppError::Validation(
            "Location coordinates must be [longitude, latitude]".into(),
        ));
    };
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::Validation(
            "Longitude must be between -180 and 180".into(),
        ));
    }
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::Validation(
            "Latitude must be between -90 and 90".into(),
        ));
    }
    Ok(())
}

/// Parse a dog reference supplied in a request body.
pub fn parse_dog_ref(raw: &str) -> Result<ObjectId, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid dog ID '{raw}'")))
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBathroomLogRequest {
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub dog_id: Option<String>,
    #[serde(rename = "type")]
    pub log_type: Option<BathroomType>,
    /// Defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Required when `type` is `poop` or `both`.
    pub consistency: Option<Consistency>,
    /// Required when `type` is `poop` or `both`.
    pub color: Option<StoolColor>,
    /// At most 500 characters.
    pub notes: Option<String>,
    pub location: Option<GeoPoint>,
}

/// Partial update. Nullable fields can be cleared with `null`.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBathroomLogRequest {
    pub dog_id: Option<String>,
    #[serde(rename = "type")]
    pub log_type: Option<BathroomType>,
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Consistency>)]
    pub consistency: Option<Option<Consistency>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<StoolColor>)]
    pub color: Option<Option<StoolColor>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<GeoPoint>)]
    pub location: Option<Option<GeoPoint>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BathroomLogFields {
    pub dog_id: ObjectId,
    pub log_type: BathroomType,
    pub date: DateTime<Utc>,
    pub consistency: Option<Consistency>,
    pub color: Option<StoolColor>,
    pub notes: Option<String>,
    pub location: Option<GeoPoint>,
}

impl BathroomLogFields {
    pub fn from_create(req: CreateBathroomLogRequest, now: DateTime<Utc>) -> Result<Self, AppError> {
        let fields = Self {
            dog_id: parse_dog_ref(&required(req.dog_id, "Dog ID")?)?,
            log_type: required(req.log_type, "Type")?,
            date: req.date.unwrap_or(now),
            consistency: req.consistency,
            color: req.color,
            notes: trim_optional(req.notes),
            location: req.location,
        };
        validate_bathroom_log(&fields)?;
        Ok(fields)
    }

    /// Merge a patch and validate the merged record, so conditional fields
    /// are checked against the final type.
    pub fn apply(&mut self, req: UpdateBathroomLogRequest) -> Result<(), AppError> {
        if let Some(dog_id) = req.dog_id {
            self.dog_id = parse_dog_ref(&dog_id)?;
        }
        if let Some(log_type) = req.log_type {
            self.log_type = log_type;
        }
        if let Some(date) = req.date {
            self.date = date;
        }
        if let Some(consistency) = req.consistency {
            self.consistency = consistency;
        }
        if let Some(color) = req.color {
            self.color = color;
        }
        if let Some(notes) = req.notes {
            self.notes = trim_optional(notes);
        }
        if let Some(location) = req.location {
            self.location = location;
        }
        validate_bathroom_log(self)
    }
}

impl TryFrom<&bathroom_log::Model> for BathroomLogFields {
    type Error = AppError;

    fn try_from(m: &bathroom_log::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            dog_id: m
                .dog_id
                .parse()
                .map_err(|e| AppError::Store(format!("corrupt dog_id on {}: {e}", m.id)))?,
            log_type: m.log_type,
            date: m.date,
            consistency: m.consistency,
            color: m.color,
            notes: m.notes.clone(),
            location: stored_location(m.longitude, m.latitude),
        })
    }
}

fn stored_location(longitude: Option<f64>, latitude: Option<f64>) -> Option<GeoPoint> {
    match (longitude, latitude) {
        (Some(lng), Some(lat)) => Some(GeoPoint::new(lng, lat)),
        _ => None,
    }
}

pub fn validate_bathroom_log(fields: &BathroomLogFields) -> Result<(), AppError> {
    if fields.log_type.involves_poop() {
        if fields.consistency.is_none() {
            return Err(AppError::Validation(format!(
                "Consistency is required when type is '{}'",
                fields.log_type
            )));
        }
        if fields.color.is_none() {
            return Err(AppError::Validation(format!(
                "Color is required when type is '{}'",
                fields.log_type
            )));
        }
    }
    validate_max_chars(fields.notes.as_deref(), NOTES_MAX_CHARS, "Notes")?;
    if let Some(location) = &fields.location {
        validate_location(location)?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BathroomLogResponse {
    #[serde(rename = "_id")]
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub dog_id: String,
    #[serde(rename = "type")]
    pub log_type: BathroomType,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<Consistency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<StoolColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present only when `includeDog=true`; `null` if the dog no longer exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<DogSummary>)]
    pub dog: Option<Option<DogSummary>>,
}

impl From<bathroom_log::Model> for BathroomLogResponse {
    fn from(m: bathroom_log::Model) -> Self {
        Self {
            location: stored_location(m.longitude, m.latitude),
            id: m.id,
            dog_id: m.dog_id,
            log_type: m.log_type,
            date: m.date,
            consistency: m.consistency,
            color: m.color,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
            dog: None,
        }
    }
}

impl BathroomLogResponse {
    pub fn with_dog(mut self, dog: Option<DogSummary>) -> Self {
        self.dog = Some(dog);
        self
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct BathroomLogListQuery {
    /// Page number (1-indexed).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (1-100, default 10).
    #[param(example = 10)]
    pub limit: Option<u64>,
    /// Sort field, prefixed with `-` for descending. Default `-date`.
    #[param(example = "-date")]
    pub sort: Option<String>,
    /// Only logs for this dog.
    pub dog_id: Option<String>,
    #[serde(rename = "type")]
    #[param(inline)]
    pub log_type: Option<BathroomType>,
    /// Inclusive lower bound on `date`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `date`.
    pub end_date: Option<DateTime<Utc>>,
    /// Attach `dog: {_id, name, breed}` to every record.
    pub include_dog: Option<bool>,
}

/// `includeDog` switch for single-record log endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct IncludeDogQuery {
    pub include_dog: Option<bool>,
}

impl IncludeDogQuery {
    pub fn enabled(&self) -> bool {
        self.include_dog.unwrap_or(false)
    }
}

/// Per-day stool consistency tallies, aligned with the stats labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ConsistencySeries {
    pub normal: Vec<u32>,
    pub soft: Vec<u32>,
    pub hard: Vec<u32>,
}

/// Seven-day bathroom histogram, oldest day first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct BathroomStatsResponse {
    #[schema(example = json!(["Wed", "Thu", "Fri", "Sat", "Sun", "Mon", "Tue"]))]
    pub labels: Vec<String>,
    pub pee: Vec<u32>,
    pub poop: Vec<u32>,
    pub consistency: ConsistencySeries,
}
