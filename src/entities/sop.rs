use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::tipos::TipoSop;

/// サブエリアごとの標準作業手順。regular / consecuente の 2 種類まで。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sop")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sop_id: String,
    pub subarea_id: String,
    pub tipo_sop: TipoSop,
    #[sea_orm(column_type = "Text", nullable)]
    pub observacion_critica_sop: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sub_area::Entity",
        from = "Column::SubareaId",
        to = "super::sub_area::Column::SubareaId"
    )]
    SubArea,
    #[sea_orm(has_many = "super::sop_fraccion::Entity")]
    SopFracciones,
}

impl Related<super::sub_area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubArea.def()
    }
}

impl Related<super::sop_fraccion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SopFracciones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
