use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SOP に含まれるフラクション (順番付き)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sop_fraccion")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sop_fraccion_id: String,
    pub sop_id: String,
    pub fraccion_id: String,
    pub orden: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sop::Entity",
        from = "Column::SopId",
        to = "super::sop::Column::SopId",
        on_delete = "Cascade"
    )]
    Sop,
    #[sea_orm(
        belongs_to = "super::fraccion::Entity",
        from = "Column::FraccionId",
        to = "super::fraccion::Column::FraccionId"
    )]
    Fraccion,
    #[sea_orm(has_many = "super::sop_fraccion_detalle::Entity")]
    Detalles,
}

impl Related<super::sop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sop.def()
    }
}

impl Related<super::fraccion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fraccion.def()
    }
}

impl Related<super::sop_fraccion_detalle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detalles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
