use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 要素セットの 1 行。要素ごとにレシピ・キット・消費量を持てる。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "elemento_detalle")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub elemento_set_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub elemento_id: String,
    pub receta_id: Option<String>,
    pub kit_id: Option<String>,
    pub consumo_id: Option<String>,
    pub orden: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::elemento_set::Entity",
        from = "Column::ElementoSetId",
        to = "super::elemento_set::Column::ElementoSetId",
        on_delete = "Cascade"
    )]
    ElementoSet,
    #[sea_orm(
        belongs_to = "super::elemento::Entity",
        from = "Column::ElementoId",
        to = "super::elemento::Column::ElementoId"
    )]
    Elemento,
}

impl Related<super::elemento_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ElementoSet.def()
    }
}

impl Related<super::elemento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Elemento.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
