use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receta_detalle")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub receta_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub quimico_id: String,
    pub dosis: Option<f64>,
    pub unidad_dosis: Option<String>,
    pub volumen_base: Option<f64>,
    pub unidad_volumen: Option<String>,
    pub nota: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::receta::Entity",
        from = "Column::RecetaId",
        to = "super::receta::Column::RecetaId",
        on_delete = "Cascade"
    )]
    Receta,
    #[sea_orm(
        belongs_to = "super::quimico::Entity",
        from = "Column::QuimicoId",
        to = "super::quimico::Column::QuimicoId"
    )]
    Quimico,
}

impl Related<super::receta::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receta.def()
    }
}

impl Related<super::quimico::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quimico.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
