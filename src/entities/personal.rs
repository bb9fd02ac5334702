use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 従業員。ログインアカウント (`user`) とは任意の 1:1。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "personal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub personal_id: String,
    pub nombre: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lanzamiento_tarea::Entity")]
    Tareas,
}

impl Related<super::lanzamiento_tarea::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tareas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
