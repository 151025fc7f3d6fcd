use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{advertisement, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub alias: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Advertisement,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Advertisement => Entity::has_many(advertisement::Entity).into() }
    }
}

impl Related<advertisement::Entity> for Entity {
    fn to() -> RelationDef { Relation::Advertisement.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, name: &str, alias: &str) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    if alias.trim().is_empty() { return Err(errors::ModelError::Validation("alias required".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(name.to_string()),
        alias: Set(alias.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_alias(db: &DatabaseConnection, alias: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::Alias.eq(alias)).one(db).await?)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

/// Apply only the supplied fields.
pub async fn update(db: &DatabaseConnection, id: i64, name: Option<&str>, alias: Option<&str>) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(errors::ModelError::NotFound("category"))?
        .into();
    if let Some(n) = name { am.name = Set(n.to_string()); }
    if let Some(a) = alias { am.alias = Set(a.to_string()); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(errors::ModelError::NotFound("category"));
    }
    Ok(())
}
