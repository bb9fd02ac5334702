use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// (サブエリア, フラクション, レベル) ごとの要素リスト
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "elemento_set")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub elemento_set_id: String,
    pub subarea_id: String,
    pub fraccion_id: String,
    pub nivel_limpieza_id: i32,
    pub nombre: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::elemento_detalle::Entity")]
    Detalles,
}

impl Related<super::elemento_detalle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detalles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
