use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use pawtrack_common::ObjectId;

use crate::error::AppError;

/// The `{id}` path segment, parsed as a record identifier. Malformed ids are
/// rejected with `INVALID_IDENTIFIER` before any store access.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub ObjectId);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidIdentifier(e.body_text()))?;
        Ok(IdPath(raw.parse()?))
    }
}
