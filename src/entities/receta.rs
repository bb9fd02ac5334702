use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 薬剤の調合レシピ。中身は receta_detalle。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receta")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub receta_id: String,
    pub nombre: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::receta_detalle::Entity")]
    Detalles,
}

impl Related<super::receta_detalle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detalles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
