use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// イベント用の SOP (設備清掃、こぼれ対応など)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sop_evento")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sop_evento_id: String,
    pub nombre: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub descripcion: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sop_evento_detalle::Entity")]
    Detalles,
}

impl Related<super::sop_evento_detalle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detalles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
