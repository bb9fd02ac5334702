use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 週 (月曜日) ごとに現在有効なテンプレート
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plantilla_semana_aplicada")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub semana_lunes: Date,
    pub plantilla_id: Option<i32>,
    pub aplicada_en: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plantilla_semanal::Entity",
        from = "Column::PlantillaId",
        to = "super::plantilla_semanal::Column::PlantillaId",
        on_delete = "SetNull"
    )]
    Plantilla,
}

impl Related<super::plantilla_semanal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plantilla.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
