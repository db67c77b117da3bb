use chrono::Utc;
use pawtrack_common::ObjectId;
use sea_orm::*;

use crate::entity::feeding;
use crate::error::AppError;
use crate::models::feeding::{
    CreateFeedingRequest, FEEDING_DEFAULT_SORT, FEEDING_SORT_FIELDS, FeedingFields,
    FeedingListQuery, FeedingResponse, UpdateFeedingRequest,
};
use crate::models::shared::{Page, PageRequest, SortSpec, parse_filter_id, validate_date_range};

use super::dog::DogService;
use super::sort_order;

pub struct FeedingService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> FeedingService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Filtered, sorted page of feedings. `dog_scope` overrides the `dogId` filter.
    pub async fn list(
        &self,
        query: &FeedingListQuery,
        dog_scope: Option<ObjectId>,
    ) -> Result<Page<FeedingResponse>, AppError> {
        let paging = PageRequest::new(query.page, query.limit);
        let sort = SortSpec::parse(query.sort.as_deref(), FEEDING_DEFAULT_SORT, FEEDING_SORT_FIELDS)?;
        let dog_id = match dog_scope {
            Some(id) => Some(id),
            None => parse_filter_id(query.dog_id.as_deref())?,
        };
        validate_date_range(query.start_date, query.end_date)?;

        let mut select = feeding::Entity::find();
        if let Some(dog_id) = dog_id {
            select = select.filter(feeding::Column::DogId.eq(dog_id.to_hex()));
        }
        if let Some(food_type) = query.food_type {
            select = select.filter(feeding::Column::FoodType.eq(food_type));
        }
        if let Some(meal_time) = query.meal_time {
            select = select.filter(feeding::Column::MealTime.eq(meal_time));
        }
        if let Some(start) = query.start_date {
            select = select.filter(feeding::Column::Date.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(feeding::Column::Date.lte(end));
        }

        let total = select.clone().count(self.conn).await?;

        let models = select
            .order_by(sort_column(&sort.field), sort_order(&sort))
            .order_by_asc(feeding::Column::Id)
            .offset(Some(paging.offset()))
            .limit(Some(paging.limit))
            .all(self.conn)
            .await?;

        let items = if query.include_dog.unwrap_or(false) {
            let ids: Vec<String> = models.iter().map(|m| m.dog_id.clone()).collect();
            let dogs = DogService::new(self.conn).summaries(&ids).await?;
            models
                .into_iter()
                .map(|m| {
                    let dog = dogs.get(&m.dog_id).cloned();
                    FeedingResponse::from(m).with_dog(dog)
                })
                .collect()
        } else {
            models.into_iter().map(FeedingResponse::from).collect()
        };

        Ok(Page::new(items, total, paging))
    }

    pub async fn get(&self, id: ObjectId) -> Result<feeding::Model, AppError> {
        feeding::Entity::find_by_id(id.to_hex())
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Feeding record not found".into()))
    }

    pub async fn create(&self, req: CreateFeedingRequest) -> Result<feeding::Model, AppError> {
        let now = Utc::now();
        let fields = FeedingFields::from_create(req, now)?;

        let mut model = active_model(&fields);
        model.id = Set(ObjectId::new().to_hex());
        model.created_at = Set(now);
        model.updated_at = Set(now);

        Ok(model.insert(self.conn).await?)
    }

    pub async fn update(
        &self,
        id: ObjectId,
        req: UpdateFeedingRequest,
    ) -> Result<feeding::Model, AppError> {
        let existing = self.get(id).await?;

        let mut fields = FeedingFields::try_from(&existing)?;
        fields.apply(req)?;

        let mut model = active_model(&fields);
        model.id = Unchanged(existing.id);
        model.updated_at = Set(Utc::now());

        Ok(model.update(self.conn).await?)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        let result = feeding::Entity::delete_by_id(id.to_hex())
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Feeding record not found".into()));
        }
        Ok(())
    }

    pub async fn with_dog(&self, model: feeding::Model) -> Result<FeedingResponse, AppError> {
        let dog = DogService::new(self.conn).summary(&model.dog_id).await?;
        Ok(FeedingResponse::from(model).with_dog(dog))
    }
}

fn active_model(fields: &FeedingFields) -> feeding::ActiveModel {
    feeding::ActiveModel {
        dog_id: Set(fields.dog_id.to_hex()),
        food_type: Set(fields.food_type),
        amount: Set(fields.amount),
        calories: Set(fields.calories),
        date: Set(fields.date),
        meal_time: Set(fields.meal_time),
        notes: Set(fields.notes.clone()),
        brand: Set(fields.brand.clone()),
        ..Default::default()
    }
}

fn sort_column(field: &str) -> feeding::Column {
    match field {
        "amount" => feeding::Column::Amount,
        "calories" => feeding::Column::Calories,
        "foodType" => feeding::Column::FoodType,
        "mealTime" => feeding::Column::MealTime,
        "createdAt" => feeding::Column::CreatedAt,
        "updatedAt" => feeding::Column::UpdatedAt,
        _ => feeding::Column::Date,
    }
}
