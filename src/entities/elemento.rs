use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// サブエリア内の個別の設備・什器 (机、便器など)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "elemento")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub elemento_id: String,
    pub subarea_id: String,
    pub nombre: String,
    pub cantidad: Option<f64>,
    pub estatus: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub descripcion: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sub_area::Entity",
        from = "Column::SubareaId",
        to = "super::sub_area::Column::SubareaId"
    )]
    SubArea,
}

impl Related<super::sub_area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubArea.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
