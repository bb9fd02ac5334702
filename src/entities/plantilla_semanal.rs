use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 名前付きの週テンプレート (月〜土 × 明細)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plantilla_semanal")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub plantilla_id: i32,
    #[sea_orm(unique)]
    pub nombre: String,
    pub creada_en: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plantilla_item::Entity")]
    Items,
}

impl Related<super::plantilla_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
