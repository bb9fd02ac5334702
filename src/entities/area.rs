use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "area")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub area_id: String,
    pub area_nombre: String,
    pub tipo_area: Option<String>,
    pub cantidad_subareas: Option<i32>,
    /// 画面・レポートでの並び順
    pub orden_area: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sub_area::Entity")]
    SubAreas,
}

impl Related<super::sub_area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubAreas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
