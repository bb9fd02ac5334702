use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sub_area")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub subarea_id: String,
    pub area_id: String,
    pub subarea_nombre: String,
    /// m²
    pub superficie_subarea: Option<f64>,
    pub frecuencia: Option<f64>,
    pub orden_subarea: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::area::Entity",
        from = "Column::AreaId",
        to = "super::area::Column::AreaId"
    )]
    Area,
    #[sea_orm(has_many = "super::sop::Entity")]
    Sops,
}

impl Related<super::area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Area.def()
    }
}

impl Related<super::sop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
