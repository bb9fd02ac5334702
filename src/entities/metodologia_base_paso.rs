use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metodologia_base_paso")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub metodologia_base_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub orden: i32,
    #[sea_orm(column_type = "Text")]
    pub instruccion: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::metodologia_base::Entity",
        from = "Column::MetodologiaBaseId",
        to = "super::metodologia_base::Column::MetodologiaBaseId",
        on_delete = "Cascade"
    )]
    MetodologiaBase,
}

impl Related<super::metodologia_base::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MetodologiaBase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
