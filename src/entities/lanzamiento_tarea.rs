use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::nivel::Nivel;
use crate::domain::tipos::TipoTarea;

/// ある日・ある人の 1 タスク。
/// SOP タスクはサブエリア + SOP を持ち、固定タスク・イベントは持たない。
/// (日, サブエリア) ごとに非追加 SOP タスクは 1 件まで (部分ユニークインデックス)。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lanzamiento_tarea")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub tarea_id: i32,
    pub dia_id: i32,
    pub personal_id: String,
    pub area_id: Option<String>,
    pub subarea_id: Option<String>,
    pub nivel_limpieza_asignado: Option<Nivel>,
    pub sop_id: Option<String>,
    pub es_adicional: bool,
    pub tipo_tarea: TipoTarea,
    pub orden: i32,
    pub sop_evento_id: Option<String>,
    pub es_arrastrable: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lanzamiento_dia::Entity",
        from = "Column::DiaId",
        to = "super::lanzamiento_dia::Column::DiaId"
    )]
    Dia,
    #[sea_orm(
        belongs_to = "super::personal::Entity",
        from = "Column::PersonalId",
        to = "super::personal::Column::PersonalId"
    )]
    Personal,
    #[sea_orm(
        belongs_to = "super::sub_area::Entity",
        from = "Column::SubareaId",
        to = "super::sub_area::Column::SubareaId"
    )]
    SubArea,
    #[sea_orm(has_one = "super::tarea_check::Entity")]
    Check,
}

impl Related<super::lanzamiento_dia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dia.def()
    }
}

impl Related<super::personal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Personal.def()
    }
}

impl Related<super::sub_area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubArea.def()
    }
}

impl Related<super::tarea_check::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Check.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
