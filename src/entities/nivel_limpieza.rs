use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 清掃レベルのマスタ (1〜4 固定、マイグレーションで投入)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nivel_limpieza")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub nivel_limpieza_id: i32,
    #[sea_orm(unique)]
    pub nombre: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
