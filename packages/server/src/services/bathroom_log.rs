use chrono::{DateTime, Utc};
use pawtrack_common::ObjectId;
use sea_orm::*;

use crate::entity::bathroom_log;
use crate::error::AppError;
use crate::models::bathroom_log::{
    BATHROOM_LOG_DEFAULT_SORT, BATHROOM_LOG_SORT_FIELDS, BathroomLogFields, BathroomLogListQuery,
    BathroomLogResponse, BathroomStatsResponse, CreateBathroomLogRequest,
    UpdateBathroomLogRequest,
};
use crate::models::shared::{Page, PageRequest, SortSpec, parse_filter_id, validate_date_range};

use super::dog::DogService;
use super::sort_order;
use super::stats::{StatsEvent, compute_stats, window_start};

pub struct BathroomLogService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> BathroomLogService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Filtered, sorted page of logs. `dog_scope` overrides the `dogId` filter.
    pub async fn list(
        &self,
        query: &BathroomLogListQuery,
        dog_scope: Option<ObjectId>,
    ) -> Result<Page<BathroomLogResponse>, AppError> {
        let paging = PageRequest::new(query.page, query.limit);
        let sort = SortSpec::parse(
            query.sort.as_deref(),
            BATHROOM_LOG_DEFAULT_SORT,
            BATHROOM_LOG_SORT_FIELDS,
        )?;
        let dog_id = match dog_scope {
            Some(id) => Some(id),
            None => parse_filter_id(query.dog_id.as_deref())?,
        };
        validate_date_range(query.start_date, query.end_date)?;

        let mut select = bathroom_log::Entity::find();
        if let Some(dog_id) = dog_id {
            select = select.filter(bathroom_log::Column::DogId.eq(dog_id.to_hex()));
        }
        if let Some(log_type) = query.log_type {
            select = select.filter(bathroom_log::Column::LogType.eq(log_type));
        }
        if let Some(start) = query.start_date {
            select = select.filter(bathroom_log::Column::Date.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(bathroom_log::Column::Date.lte(end));
        }

        let total = select.clone().count(self.conn).await?;

        let models = select
            .order_by(sort_column(&sort.field), sort_order(&sort))
            .order_by_asc(bathroom_log::Column::Id)
            .offset(Some(paging.offset()))
            .limit(Some(paging.limit))
            .all(self.conn)
            .await?;

        let items = if query.include_dog.unwrap_or(false) {
            self.with_dogs(models).await?
        } else {
            models.into_iter().map(BathroomLogResponse::from).collect()
        };

        Ok(Page::new(items, total, paging))
    }

    pub async fn get(&self, id: ObjectId) -> Result<bathroom_log::Model, AppError> {
        bathroom_log::Entity::find_by_id(id.to_hex())
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Bathroom log not found".into()))
    }

    pub async fn create(
        &self,
        req: CreateBathroomLogRequest,
    ) -> Result<bathroom_log::Model, AppError> {
        let now = Utc::now();
        let fields = BathroomLogFields::from_create(req, now)?;

        let mut model = active_model(&fields);
        model.id = Set(ObjectId::new().to_hex());
        model.created_at = Set(now);
        model.updated_at = Set(now);

        Ok(model.insert(self.conn).await?)
    }

    pub async fn update(
        &self,
        id: ObjectId,
        req: UpdateBathroomLogRequest,
    ) -> Result<bathroom_log::Model, AppError> {
        let existing = self.get(id).await?;

        let mut fields = BathroomLogFields::try_from(&existing)?;
        fields.apply(req)?;

        let mut model = active_model(&fields);
        model.id = Unchanged(existing.id);
        model.updated_at = Set(Utc::now());

        Ok(model.update(self.conn).await?)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        let result = bathroom_log::Entity::delete_by_id(id.to_hex())
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Bathroom log not found".into()));
        }
        Ok(())
    }

    /// Attach the owning dog's summary, or `null` when it no longer exists.
    pub async fn with_dog(
        &self,
        model: bathroom_log::Model,
    ) -> Result<BathroomLogResponse, AppError> {
        let dog = DogService::new(self.conn).summary(&model.dog_id).await?;
        Ok(BathroomLogResponse::from(model).with_dog(dog))
    }

    async fn with_dogs(
        &self,
        models: Vec<bathroom_log::Model>,
    ) -> Result<Vec<BathroomLogResponse>, AppError> {
        let ids: Vec<String> = models.iter().map(|m| m.dog_id.clone()).collect();
        let dogs = DogService::new(self.conn).summaries(&ids).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let dog = dogs.get(&m.dog_id).cloned();
                BathroomLogResponse::from(m).with_dog(dog)
            })
            .collect())
    }

    /// Histogram of the seven days ending at `now`.
    pub async fn weekly_stats(&self, now: DateTime<Utc>) -> Result<BathroomStatsResponse, AppError> {
        let logs = bathroom_log::Entity::find()
            .filter(bathroom_log::Column::Date.gte(window_start(now)))
            .order_by_asc(bathroom_log::Column::Date)
            .all(self.conn)
            .await?;

        let events = logs.into_iter().map(|log| StatsEvent {
            date: log.date,
            log_type: log.log_type,
            consistency: log.consistency,
        });
        Ok(compute_stats(events, now))
    }
}

fn active_model(fields: &BathroomLogFields) -> bathroom_log::ActiveModel {
    let (longitude, latitude) = match fields.location.as_ref().and_then(|p| p.lng_lat()) {
        Some((lng, lat)) => (Some(lng), Some(lat)),
        None => (None, None),
    };
    bathroom_log::ActiveModel {
        dog_id: Set(fields.dog_id.to_hex()),
        log_type: Set(fields.log_type),
        date: Set(fields.date),
        consistency: Set(fields.consistency),
        color: Set(fields.color),
        notes: Set(fields.notes.clone()),
        longitude: Set(longitude),
        latitude: Set(latitude),
        ..Default::default()
    }
}

fn sort_column(field: &str) -> bathroom_log::Column {
    match field {
        "type" => bathroom_log::Column::LogType,
        "createdAt" => bathroom_log::Column::CreatedAt,
        "updatedAt" => bathroom_log::Column::UpdatedAt,
        _ => bathroom_log::Column::Date,
    }
}
