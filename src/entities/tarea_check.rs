use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// タスク完了の記録。行があれば完了。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tarea_check")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub check_id: i32,
    #[sea_orm(unique)]
    pub tarea_id: i32,
    pub checked_at: DateTime,
    pub user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lanzamiento_tarea::Entity",
        from = "Column::TareaId",
        to = "super::lanzamiento_tarea::Column::TareaId"
    )]
    Tarea,
}

impl Related<super::lanzamiento_tarea::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tarea.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
