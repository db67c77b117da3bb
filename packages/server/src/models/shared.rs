use chrono::{DateTime, Utc};
use pawtrack_common::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// SQL `OFFSET` is a signed 64-bit value on every supported backend.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Success envelope for single-record responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = true)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

/// Success envelope without a payload, used by deletions.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Dog deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Success envelope for paginated listings.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[schema(example = true)]
    pub success: bool,
    /// Number of records in this page.
    #[schema(example = 10)]
    pub count: usize,
    /// Number of matching records across all pages.
    #[schema(example = 25)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub pages: u64,
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub current_page: u64,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(page: Page<T>) -> Self {
        Self {
            success: true,
            count: page.items.len(),
            total: page.total,
            pages: page.pages,
            current_page: page.page,
            data: page.items,
        }
    }
}

/// Offset pagination request after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Page is clamped to >= 1 and limit to 1..=100; defaults are page 1, limit 10.
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Rows to skip. Saturates at the largest offset the stores accept, so a
    /// page far past the end yields an empty page instead of an error.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_OFFSET)
    }

    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of a filtered, sorted result set.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            pages: request.page_count(total),
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            total: self.total,
            page: self.page,
            pages: self.pages,
        })
    }
}

/// Parsed `sort` query parameter: a field name, `-` prefix for descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    /// Parse `raw`, falling back to `default` when absent or blank.
    /// The field must be one of `allowed`.
    pub fn parse(raw: Option<&str>, default: &str, allowed: &[&str]) -> Result<Self, AppError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(default);
        let (field, descending) = match raw.strip_prefix('-') {
            Some(field) => (field, true),
            None => (raw.strip_prefix('+').unwrap_or(raw), false),
        };
        if !allowed.contains(&field) {
            return Err(AppError::Validation(format!(
                "sort must be one of: {}",
                allowed.join(", ")
            )));
        }
        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }
}

/// Inclusive date range filter from `startDate` / `endDate`.
pub fn validate_date_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(AppError::Validation(
            "startDate must not be after endDate".into(),
        ));
    }
    Ok(())
}

/// Parse an identifier supplied as a filter. Malformed input never reaches the store.
pub fn parse_filter_id(raw: Option<&str>) -> Result<Option<ObjectId>, AppError> {
    raw.map(|s| s.parse::<ObjectId>().map_err(AppError::from))
        .transpose()
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (clear)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Fail with "`label` is required" when a required field is absent.
pub fn required<T>(value: Option<T>, label: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{label} is required")))
}

/// Trim a required string field and reject it when empty.
pub fn required_text(value: Option<String>, label: &str) -> Result<String, AppError> {
    let value = required(value, label)?.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{label} is required")));
    }
    Ok(value)
}

/// Reject optional text longer than `max` characters.
pub fn validate_max_chars(value: Option<&str>, max: usize, label: &str) -> Result<(), AppError> {
    if let Some(value) = value
        && value.chars().count() > max
    {
        return Err(AppError::Validation(format!(
            "{label} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Reject negative, NaN or infinite quantities.
pub fn validate_non_negative(value: f64, label: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{label} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Treat blank optional text as absent.
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
