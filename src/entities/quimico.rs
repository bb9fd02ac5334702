use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quimico")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub quimico_id: String,
    pub nombre: String,
    pub categoria: Option<String>,
    pub presentacion: Option<String>,
    pub unidad_base: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
