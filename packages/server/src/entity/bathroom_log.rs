use pawtrack_common::{BathroomType, Consistency, StoolColor};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single elimination event. `dog_id` is a weak reference: it is not a
/// foreign key and may point at a dog that no longer exists.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bathroom_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub dog_id: String,

    pub log_type: BathroomType,

    #[sea_orm(indexed)]
    pub date: DateTimeUtc,

    /// Present for poop and both events.
    pub consistency: Option<Consistency>,
    pub color: Option<StoolColor>,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    /// Both set or both unset.
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
