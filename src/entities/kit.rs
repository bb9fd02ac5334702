use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 道具セット。フラクション単位で定義し、レベルは任意。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kit")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kit_id: String,
    pub fraccion_id: String,
    pub nivel_limpieza_id: Option<i32>,
    pub nombre: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::kit_detalle::Entity")]
    Detalles,
}

impl Related<super::kit_detalle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detalles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
