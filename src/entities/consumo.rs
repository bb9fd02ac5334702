use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 使用量の目安 (例: `30 ml = 1 disparo por m²`)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consumo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub consumo_id: String,
    pub valor: Option<f64>,
    pub unidad: Option<String>,
    pub regla: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
