use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// (フラクション, レベル) → 手順書 の割り当て
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metodologia")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub fraccion_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub nivel_limpieza_id: i32,
    pub metodologia_base_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fraccion::Entity",
        from = "Column::FraccionId",
        to = "super::fraccion::Column::FraccionId"
    )]
    Fraccion,
    #[sea_orm(
        belongs_to = "super::metodologia_base::Entity",
        from = "Column::MetodologiaBaseId",
        to = "super::metodologia_base::Column::MetodologiaBaseId"
    )]
    MetodologiaBase,
}

impl Related<super::fraccion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fraccion.def()
    }
}

impl Related<super::metodologia_base::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MetodologiaBase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
