use chrono::{NaiveDate, NaiveDateTime};
use rocket::http::Status;
use sea_orm::*;

use crate::entities::{lanzamiento_tarea, prelude::*, tarea_check, user};

/// チェックを付けるのか外すのか (文言が変わる)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckAction {
    Marcar,
    Desmarcar,
}

/// チェック API の拒否理由
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("admin cannot check tasks")]
    AdminNoPuede(CheckAction),
    #[error("task belongs to someone else")]
    NoTePertenece,
    #[error("task is not from today")]
    SoloHoy(CheckAction),
    #[error("task not found")]
    NoEncontrada,
    #[error("task already checked at {checked_at}")]
    YaMarcada { checked_at: String },
    #[error("task was not checked")]
    NoMarcada,
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl CheckError {
    pub fn status(&self) -> Status {
        match self {
            CheckError::AdminNoPuede(_) | CheckError::NoTePertenece | CheckError::SoloHoy(_) => Status::Forbidden,
            CheckError::NoEncontrada | CheckError::NoMarcada => Status::NotFound,
            CheckError::YaMarcada { .. } => Status::BadRequest,
            CheckError::Db(_) => Status::InternalServerError,
        }
    }

    /// JSON の `error` に入れる文言
    pub fn message(&self) -> &'static str {
        match self {
            CheckError::AdminNoPuede(CheckAction::Marcar) => "Admin no puede marcar tareas",
            CheckError::AdminNoPuede(CheckAction::Desmarcar) => "Admin no puede desmarcar tareas",
            CheckError::NoTePertenece => "Esta tarea no te pertenece",
            CheckError::SoloHoy(CheckAction::Marcar) => "Solo puedes marcar tareas de hoy",
            CheckError::SoloHoy(CheckAction::Desmarcar) => "Solo puedes modificar tareas de hoy",
            CheckError::NoEncontrada => "Tarea no encontrada",
            CheckError::YaMarcada { .. } => "Tarea ya marcada",
            CheckError::NoMarcada => "Tarea no estaba marcada",
            CheckError::Db(_) => "Error de base de datos",
        }
    }
}

/// operativo 本人のタスクで、かつ今日のものだけ操作できる
async fn authorize(
    db: &impl ConnectionTrait,
    actor: &user::Model,
    tarea_id: i32,
    hoy: NaiveDate,
    action: CheckAction,
) -> Result<lanzamiento_tarea::Model, CheckError> {
    if actor.is_admin() {
        return Err(CheckError::AdminNoPuede(action));
    }

    let tarea = LanzamientoTarea::find_by_id(tarea_id)
        .one(db)
        .await?
        .ok_or(CheckError::NoEncontrada)?;

    if actor.personal_id.as_deref() != Some(tarea.personal_id.as_str()) {
        return Err(CheckError::NoTePertenece);
    }

    let dia = LanzamientoDia::find_by_id(tarea.dia_id).one(db).await?;
    if dia.map(|d| d.fecha) != Some(hoy) {
        return Err(CheckError::SoloHoy(action));
    }
    Ok(tarea)
}

/// タスクを完了にする。既にチェック済みならその時刻付きでエラー。
pub async fn mark(
    db: &DatabaseConnection,
    actor: &user::Model,
    tarea_id: i32,
    now: NaiveDateTime,
) -> Result<tarea_check::Model, CheckError> {
    authorize(db, actor, tarea_id, now.date(), CheckAction::Marcar).await?;

    if let Some(existing) = TareaCheck::find()
        .filter(tarea_check::Column::TareaId.eq(tarea_id))
        .one(db)
        .await?
    {
        return Err(CheckError::YaMarcada {
            checked_at: existing.checked_at.format("%H:%M").to_string(),
        });
    }

    let check = tarea_check::ActiveModel {
        tarea_id: Set(tarea_id),
        checked_at: Set(now),
        user_id: Set(Some(actor.id)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| match e.sql_err() {
        // 同時に 2 回押された
        Some(SqlErr::UniqueConstraintViolation(_)) => CheckError::YaMarcada {
            checked_at: now.format("%H:%M").to_string(),
        },
        _ => CheckError::Db(e),
    })?;

    tracing::info!(tarea_id, user_id = actor.id, "task checked");
    Ok(check)
}

/// チェックを外す
pub async fn unmark(
    db: &DatabaseConnection,
    actor: &user::Model,
    tarea_id: i32,
    hoy: NaiveDate,
) -> Result<(), CheckError> {
    authorize(db, actor, tarea_id, hoy, CheckAction::Desmarcar).await?;

    let res = TareaCheck::delete_many()
        .filter(tarea_check::Column::TareaId.eq(tarea_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(CheckError::NoMarcada);
    }
    tracing::info!(tarea_id, user_id = actor.id, "task unchecked");
    Ok(())
}
