use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// レベル別の実施内容。
/// 要素セット方式 (`elemento_set_id`) と直接指定方式 (`kit_id` / `receta_id`) は排他で、
/// DB の CHECK 制約でも保証しています。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sop_fraccion_detalle")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sop_fraccion_detalle_id: String,
    pub sop_fraccion_id: String,
    pub nivel_limpieza_id: i32,
    pub kit_id: Option<String>,
    pub receta_id: Option<String>,
    pub elemento_set_id: Option<String>,
    pub consumo_id: Option<String>,
    pub tiempo_unitario_min: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sop_fraccion::Entity",
        from = "Column::SopFraccionId",
        to = "super::sop_fraccion::Column::SopFraccionId",
        on_delete = "Cascade"
    )]
    SopFraccion,
}

impl Related<super::sop_fraccion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SopFraccion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
