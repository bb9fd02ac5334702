use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 作業単位 (例: 「床の拭き上げ」)。SOP とは sop_fraccion 経由の多対多。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fraccion")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub fraccion_id: String,
    pub fraccion_nombre: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub nota_tecnica: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sop_fraccion::Entity")]
    SopFracciones,
    #[sea_orm(has_many = "super::metodologia::Entity")]
    Metodologias,
}

impl Related<super::sop_fraccion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SopFracciones.def()
    }
}

impl Related<super::metodologia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Metodologias.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
