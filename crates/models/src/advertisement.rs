use chrono::Utc;
use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, Func, LikeExpr},
    DatabaseConnection, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::{category, errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "advertisement")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: i64,
    pub currency: String,
    pub category_id: i64,
    pub user_id: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Category,
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column values for a new row. Validation happens in the service layer.
#[derive(Debug, Clone)]
pub struct NewAdvertisement<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub price: i64,
    pub currency: &'a str,
    pub category_id: i64,
    pub user_id: i64,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct AdvertisementChanges<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<i64>,
    pub currency: Option<&'a str>,
    pub category_id: Option<i64>,
}

pub async fn create(db: &DatabaseConnection, new: NewAdvertisement<'_>) -> Result<Model, errors::ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        title: Set(new.title.to_string()),
        description: Set(new.description.to_string()),
        price: Set(new.price),
        currency: Set(new.currency.to_string()),
        category_id: Set(new.category_id),
        user_id: Set(new.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn update(db: &DatabaseConnection, id: i64, changes: AdvertisementChanges<'_>) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(errors::ModelError::NotFound("advertisement"))?
        .into();
    if let Some(t) = changes.title { am.title = Set(t.to_string()); }
    if let Some(d) = changes.description { am.description = Set(d.to_string()); }
    if let Some(p) = changes.price { am.price = Set(p); }
    if let Some(c) = changes.currency { am.currency = Set(c.to_string()); }
    if let Some(c) = changes.category_id { am.category_id = Set(c); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(errors::ModelError::NotFound("advertisement"));
    }
    Ok(())
}

/// Case-insensitive substring match on the title, newest first.
pub async fn search_by_title(db: &DatabaseConnection, title: &str) -> Result<Vec<Model>, errors::ModelError> {
    let pattern = format!("%{}%", escape_like(&title.to_lowercase()));
    let rows = Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col(Column::Title)))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows)
}

/// Escape LIKE wildcards so user input is matched literally.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
