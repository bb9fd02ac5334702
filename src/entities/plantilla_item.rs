use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::nivel::Nivel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plantilla_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub item_id: i32,
    pub plantilla_id: i32,
    /// 0 = Lunes ... 5 = Sábado
    pub dia_index: i32,
    pub personal_id: String,
    pub area_id: String,
    pub subarea_id: String,
    pub nivel_limpieza_asignado: Nivel,
    pub sop_id: Option<String>,
    pub es_adicional: bool,
    pub orden: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plantilla_semanal::Entity",
        from = "Column::PlantillaId",
        to = "super::plantilla_semanal::Column::PlantillaId"
    )]
    Plantilla,
}

impl Related<super::plantilla_semanal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plantilla.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
