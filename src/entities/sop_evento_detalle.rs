use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sop_evento_detalle")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub detalle_id: String,
    pub sop_evento_id: String,
    pub descripcion: String,
    pub orden: i32,
    /// 分
    pub tiempo_estimado: f64,
    pub kit_id: Option<String>,
    pub receta_id: Option<String>,
    pub consumo_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sop_evento::Entity",
        from = "Column::SopEventoId",
        to = "super::sop_evento::Column::SopEventoId",
        on_delete = "Cascade"
    )]
    SopEvento,
}

impl Related<super::sop_evento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SopEvento.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
