use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// タスクが展開された 1 日。日付で一意。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lanzamiento_dia")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub dia_id: i32,
    pub semana_id: i32,
    #[sea_orm(unique)]
    pub fecha: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lanzamiento_semana::Entity",
        from = "Column::SemanaId",
        to = "super::lanzamiento_semana::Column::SemanaId"
    )]
    Semana,
    #[sea_orm(has_many = "super::lanzamiento_tarea::Entity")]
    Tareas,
}

impl Related<super::lanzamiento_semana::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semana.def()
    }
}

impl Related<super::lanzamiento_tarea::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tareas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
