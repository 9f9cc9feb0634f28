use sea_orm::entity::prelude::*;

/// Best-effort audit sink for failed store operations.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// `login.sha256` of the record involved, when the caller knew it.
    pub sha256: Option<String>,

    pub exception_message: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
