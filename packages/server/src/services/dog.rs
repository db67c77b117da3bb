use std::collections::HashMap;

use chrono::Utc;
use pawtrack_common::ObjectId;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::*;

use crate::entity::dog;
use crate::error::AppError;
use crate::models::dog::{
    CreateDogRequest, DOG_DEFAULT_SORT, DOG_SORT_FIELDS, DogFields, DogListQuery, DogSummary,
    UpdateDogRequest,
};
use crate::models::shared::{Page, PageRequest, SortSpec, escape_like};

use super::sort_order;

/// Query layer for the `dog` table.
pub struct DogService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> DogService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn list(&self, query: &DogListQuery) -> Result<Page<dog::Model>, AppError> {
        let paging = PageRequest::new(query.page, query.limit);
        let sort = SortSpec::parse(query.sort.as_deref(), DOG_DEFAULT_SORT, DOG_SORT_FIELDS)?;

        let mut select = dog::Entity::find();
        if let Some(breed) = &query.breed {
            select = select.filter(contains_ci(dog::Column::Breed, breed));
        }
        if let Some(name) = &query.name {
            select = select.filter(contains_ci(dog::Column::Name, name));
        }
        if let Some(gender) = query.gender {
            select = select.filter(dog::Column::Gender.eq(gender));
        }
        if let Some(is_vaccinated) = query.is_vaccinated {
            select = select.filter(dog::Column::IsVaccinated.eq(is_vaccinated));
        }
        if let Some(owner_name) = &query.owner_name {
            select = select.filter(dog::Column::OwnerName.eq(owner_name.trim()));
        }

        let total = select.clone().count(self.conn).await?;

        let items = select
            .order_by(sort_column(&sort.field), sort_order(&sort))
            .order_by_asc(dog::Column::Id)
            .offset(Some(paging.offset()))
            .limit(Some(paging.limit))
            .all(self.conn)
            .await?;

        Ok(Page::new(items, total, paging))
    }

    pub async fn get(&self, id: ObjectId) -> Result<dog::Model, AppError> {
        dog::Entity::find_by_id(id.to_hex())
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Dog not found".into()))
    }

    pub async fn create(&self, req: CreateDogRequest) -> Result<dog::Model, AppError> {
        let now = Utc::now();
        let fields = DogFields::from_create(req, now)?;

        let mut model = active_model(&fields)?;
        model.id = Set(ObjectId::new().to_hex());
        model.created_at = Set(now);
        model.updated_at = Set(now);

        Ok(model.insert(self.conn).await?)
    }

    /// Merge `req` onto the stored dog. `created_at` is never touched.
    pub async fn update(&self, id: ObjectId, req: UpdateDogRequest) -> Result<dog::Model, AppError> {
        let existing = self.get(id).await?;
        let now = Utc::now();

        let mut fields = DogFields::try_from(&existing)?;
        fields.apply(req, now)?;

        let mut model = active_model(&fields)?;
        model.id = Unchanged(existing.id);
        model.updated_at = Set(now);

        Ok(model.update(self.conn).await?)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        let result = dog::Entity::delete_by_id(id.to_hex())
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Dog not found".into()));
        }
        Ok(())
    }

    /// Resolve `{_id, name, breed}` for many dogs with a single query.
    /// Ids without a matching dog are absent from the map.
    pub async fn summaries(&self, ids: &[String]) -> Result<HashMap<String, DogSummary>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();

        let dogs = dog::Entity::find()
            .filter(dog::Column::Id.is_in(unique))
            .all(self.conn)
            .await?;

        Ok(dogs
            .into_iter()
            .map(|d| (d.id.clone(), DogSummary::from(d)))
            .collect())
    }

    pub async fn summary(&self, id: &str) -> Result<Option<DogSummary>, AppError> {
        Ok(dog::Entity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .map(DogSummary::from))
    }
}

fn active_model(fields: &DogFields) -> Result<dog::ActiveModel, AppError> {
    Ok(dog::ActiveModel {
        name: Set(fields.name.clone()),
        breed: Set(fields.breed.clone()),
        age: Set(fields.age),
        weight: Set(fields.weight),
        gender: Set(fields.gender),
        owner_name: Set(fields.owner_name.clone()),
        is_vaccinated: Set(fields.is_vaccinated),
        medical_history: Set(json_column(&fields.medical_history, "medical_history")?),
        photos: Set(json_column(&fields.photos, "photos")?),
        ..Default::default()
    })
}

fn json_column<T: serde::Serialize>(value: &T, column: &str) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Store(format!("failed to encode {column}: {e}")))
}

fn sort_column(field: &str) -> dog::Column {
    match field {
        "name" => dog::Column::Name,
        "breed" => dog::Column::Breed,
        "age" => dog::Column::Age,
        "weight" => dog::Column::Weight,
        "updatedAt" => dog::Column::UpdatedAt,
        _ => dog::Column::CreatedAt,
    }
}

/// Case-insensitive substring match on a text column.
pub(crate) fn contains_ci(col: impl IntoColumnRef, term: &str) -> SimpleExpr {
    let term = escape_like(term.trim()).to_lowercase();
    Expr::expr(Func::lower(Expr::col(col)))
        .like(LikeExpr::new(format!("%{term}%")).escape('\\'))
}
