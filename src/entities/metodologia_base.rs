use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 手順書の本体。手順は metodologia_base_paso に順番付きで持つ。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metodologia_base")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub metodologia_base_id: String,
    pub nombre: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub descripcion: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::metodologia_base_paso::Entity")]
    Pasos,
}

impl Related<super::metodologia_base_paso::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pasos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
