use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 週 (月曜日で一意)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lanzamiento_semana")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub semana_id: i32,
    pub nombre: Option<String>,
    #[sea_orm(unique)]
    pub fecha_inicio: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lanzamiento_dia::Entity")]
    Dias,
}

impl Related<super::lanzamiento_dia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dias.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
