use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// ロール。admin は全機能、operativo は自分の当日タスクのみ。
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "operativo")]
    Operativo,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "admin" => Some(Role::Admin),
            "operativo" => Some(Role::Operativo),
            _ => None,
        }
    }
}

// Djangoの `models.Model` に相当する構造体。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    /// operativo のみ。Personal と 1:1
    #[sea_orm(unique)]
    pub personal_id: Option<String>,
    pub created_at: DateTime,
}

impl Model {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::personal::Entity",
        from = "Column::PersonalId",
        to = "super::personal::Column::PersonalId",
        on_delete = "SetNull"
    )]
    Personal,
}

impl Related<super::personal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Personal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
