use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kit_detalle")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kit_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub herramienta_id: String,
    pub nota: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::kit::Entity",
        from = "Column::KitId",
        to = "super::kit::Column::KitId",
        on_delete = "Cascade"
    )]
    Kit,
    #[sea_orm(
        belongs_to = "super::herramienta::Entity",
        from = "Column::HerramientaId",
        to = "super::herramienta::Column::HerramientaId"
    )]
    Herramienta,
}

impl Related<super::kit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kit.def()
    }
}

impl Related<super::herramienta::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Herramienta.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
