use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "herramienta")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub herramienta_id: String,
    pub nombre: String,
    /// レポートの道具欄に出る文言
    #[sea_orm(column_type = "Text", nullable)]
    pub descripcion: Option<String>,
    pub estatus: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
