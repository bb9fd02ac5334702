use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::asignacion::{check_slot, SlotConflict, SlotTask};
use crate::domain::calendar;
use crate::domain::nivel::Nivel;
use crate::domain::progreso::round2;
use crate::domain::tipos::{AssignmentKind, TipoTarea, FIXED_TASKS};
use crate::entities::{
    area, lanzamiento_dia, lanzamiento_semana, lanzamiento_tarea, personal, prelude::*, sop,
    sop_evento, sop_evento_detalle, sop_fraccion, sop_fraccion_detalle, sub_area, tarea_check,
};
use crate::errors::AppError;

/// 日次プランのフォームから来る割り当て要求
#[derive(Debug, Clone)]
pub struct AssignmentRequest {
    pub personal_id: String,
    pub subarea_id: String,
    /// 正規化済みレベル。regular のときは必須
    pub nivel: Option<Nivel>,
    pub kind: AssignmentKind,
    pub es_adicional: bool,
}

/// 週の行を取得 (無ければ作成)。名前は `Semana {ISO週}`。
pub async fn get_or_create_semana(
    db: &impl ConnectionTrait,
    fecha: NaiveDate,
) -> Result<lanzamiento_semana::Model, DbErr> {
    let lunes = calendar::monday_of(fecha);
    if let Some(semana) = LanzamientoSemana::find()
        .filter(lanzamiento_semana::Column::FechaInicio.eq(lunes))
        .one(db)
        .await?
    {
        return Ok(semana);
    }

    lanzamiento_semana::ActiveModel {
        nombre: Set(Some(calendar::nombre_semana(lunes))),
        fecha_inicio: Set(lunes),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn find_dia(db: &impl ConnectionTrait, fecha: NaiveDate) -> Result<Option<lanzamiento_dia::Model>, DbErr> {
    LanzamientoDia::find()
        .filter(lanzamiento_dia::Column::Fecha.eq(fecha))
        .one(db)
        .await
}

/// 日の行を取得 (無ければ週ごと作成)
pub async fn get_or_create_dia(db: &impl ConnectionTrait, fecha: NaiveDate) -> Result<lanzamiento_dia::Model, DbErr> {
    if let Some(dia) = find_dia(db, fecha).await? {
        return Ok(dia);
    }
    let semana = get_or_create_semana(db, fecha).await?;
    lanzamiento_dia::ActiveModel {
        semana_id: Set(semana.semana_id),
        fecha: Set(fecha),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// その日にその人の固定タスク (inicio / receso / limpieza_equipo) が 1 つも無ければ 3 件作る。
/// 作成したら true。
pub async fn ensure_fixed_tasks(db: &impl ConnectionTrait, dia_id: i32, personal_id: &str) -> Result<bool, DbErr> {
    let fixed_tipos = FIXED_TASKS.iter().map(|f| f.tipo);
    let tiene_fijas = LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::DiaId.eq(dia_id))
        .filter(lanzamiento_tarea::Column::PersonalId.eq(personal_id))
        .filter(lanzamiento_tarea::Column::TipoTarea.is_in(fixed_tipos))
        .one(db)
        .await?
        .is_some();

    if tiene_fijas {
        return Ok(false);
    }

    let rows = FIXED_TASKS.iter().map(|f| lanzamiento_tarea::ActiveModel {
        dia_id: Set(dia_id),
        personal_id: Set(personal_id.to_string()),
        area_id: Set(None),
        subarea_id: Set(None),
        nivel_limpieza_asignado: Set(None),
        sop_id: Set(None),
        es_adicional: Set(false),
        tipo_tarea: Set(f.tipo),
        orden: Set(f.orden),
        sop_evento_id: Set(f.sop_evento_id.map(str::to_string)),
        es_arrastrable: Set(f.es_arrastrable),
        ..Default::default()
    });
    LanzamientoTarea::insert_many(rows).exec(db).await?;
    Ok(true)
}

/// 部分ユニークインデックス `uq_tarea_regular` 違反を業務エラーに読み替える
pub(crate) fn map_tarea_insert_err(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(SlotConflict::SubareaOcupada.message_dia()),
        _ => AppError::Database(e),
    }
}

/// (日, サブエリア) にある SOP タスク
async fn slot_tasks(db: &impl ConnectionTrait, dia_id: i32, subarea_id: &str) -> Result<Vec<SlotTask>, DbErr> {
    let tareas = LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::DiaId.eq(dia_id))
        .filter(lanzamiento_tarea::Column::SubareaId.eq(subarea_id))
        .filter(lanzamiento_tarea::Column::TipoTarea.eq(TipoTarea::Sop))
        .all(db)
        .await?;
    Ok(tareas
        .into_iter()
        .map(|t| SlotTask {
            sop_id: t.sop_id,
            es_adicional: t.es_adicional,
        })
        .collect())
}

/// 日次プランへの SOP タスク割り当て。
/// 重複ルールに反する場合は `AppError::Conflict` (画面では warning flash)。
pub async fn assign_task(
    db: &DatabaseConnection,
    fecha: NaiveDate,
    req: AssignmentRequest,
) -> Result<lanzamiento_tarea::Model, AppError> {
    let nivel = match (req.kind, req.nivel) {
        (AssignmentKind::Regular, None) => {
            return Err(AppError::BadRequest("Nivel de limpieza inválido.".into()))
        }
        (_, nivel) => nivel.unwrap_or(Nivel::Basica),
    };
    let (tipo_sop, nivel) = req.kind.resolve(nivel);

    let txn = db.begin().await?;

    if Personal::find_by_id(req.personal_id.clone()).one(&txn).await?.is_none() {
        return Err(AppError::BadRequest("Selecciona un personal válido.".into()));
    }
    let subarea = SubArea::find_by_id(req.subarea_id.clone())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Selecciona una subárea válida.".into()))?;

    let dia = get_or_create_dia(&txn, fecha).await?;
    let existing = slot_tasks(&txn, dia.dia_id, &subarea.subarea_id).await?;
    let sop = Sop::find()
        .filter(sop::Column::SubareaId.eq(subarea.subarea_id.as_str()))
        .filter(sop::Column::TipoSop.eq(tipo_sop))
        .one(&txn)
        .await?;

    if let Err(conflict) = check_slot(
        &existing,
        req.es_adicional,
        tipo_sop,
        sop.as_ref().map(|s| s.sop_id.as_str()),
        nivel,
    ) {
        tracing::info!(%fecha, subarea = %subarea.subarea_id, ?conflict, "assignment rejected");
        return Err(AppError::Conflict(conflict.message_dia()));
    }

    let tarea = lanzamiento_tarea::ActiveModel {
        dia_id: Set(dia.dia_id),
        personal_id: Set(req.personal_id.clone()),
        area_id: Set(Some(subarea.area_id.clone())),
        subarea_id: Set(Some(subarea.subarea_id.clone())),
        nivel_limpieza_asignado: Set(Some(nivel)),
        sop_id: Set(sop.map(|s| s.sop_id)),
        es_adicional: Set(req.es_adicional),
        tipo_tarea: Set(TipoTarea::Sop),
        orden: Set(0),
        sop_evento_id: Set(None),
        es_arrastrable: Set(true),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(map_tarea_insert_err)?;

    ensure_fixed_tasks(&txn, dia.dia_id, &req.personal_id).await?;
    txn.commit().await?;

    tracing::info!(
        tarea_id = tarea.tarea_id,
        %fecha,
        personal = %tarea.personal_id,
        subarea = %subarea.subarea_id,
        "task assigned"
    );
    Ok(tarea)
}

/// イベント SOP のタスクを割り当てる (同じ人・日に固定タスクも用意する)
pub async fn assign_event(
    db: &DatabaseConnection,
    fecha: NaiveDate,
    personal_id: &str,
    sop_evento_id: &str,
) -> Result<lanzamiento_tarea::Model, AppError> {
    let txn = db.begin().await?;

    if Personal::find_by_id(personal_id.to_string()).one(&txn).await?.is_none() {
        return Err(AppError::BadRequest("Selecciona un personal válido.".into()));
    }
    if SopEvento::find_by_id(sop_evento_id.to_string()).one(&txn).await?.is_none() {
        return Err(AppError::BadRequest("No existe ese evento.".into()));
    }

    let dia = get_or_create_dia(&txn, fecha).await?;
    let tarea = lanzamiento_tarea::ActiveModel {
        dia_id: Set(dia.dia_id),
        personal_id: Set(personal_id.to_string()),
        area_id: Set(None),
        subarea_id: Set(None),
        nivel_limpieza_asignado: Set(None),
        sop_id: Set(None),
        es_adicional: Set(true),
        tipo_tarea: Set(TipoTarea::Evento),
        orden: Set(0),
        sop_evento_id: Set(Some(sop_evento_id.to_string())),
        es_arrastrable: Set(true),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    ensure_fixed_tasks(&txn, dia.dia_id, personal_id).await?;
    txn.commit().await?;
    tracing::info!(tarea_id = tarea.tarea_id, %fecha, evento = %sop_evento_id, "event assigned");
    Ok(tarea)
}

/// タスク削除。チェックを先に消す。
pub async fn delete_task(db: &DatabaseConnection, tarea_id: i32) -> Result<lanzamiento_tarea::Model, AppError> {
    let txn = db.begin().await?;
    let tarea = LanzamientoTarea::find_by_id(tarea_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Tarea no encontrada".into()))?;

    TareaCheck::delete_many()
        .filter(tarea_check::Column::TareaId.eq(tarea_id))
        .exec(&txn)
        .await?;
    LanzamientoTarea::delete_by_id(tarea_id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(tarea_id, "task deleted");
    Ok(tarea)
}

/// ドラッグ&ドロップの並べ替え結果を保存。存在しない id は無視する。
pub async fn reorder_tasks(db: &DatabaseConnection, orden: &[(i32, i32)]) -> Result<u64, AppError> {
    let txn = db.begin().await?;
    let mut updated = 0;
    for &(tarea_id, nuevo_orden) in orden {
        let res = LanzamientoTarea::update_many()
            .col_expr(lanzamiento_tarea::Column::Orden, Expr::value(nuevo_orden))
            .filter(lanzamiento_tarea::Column::TareaId.eq(tarea_id))
            .exec(&txn)
            .await?;
        updated += res.rows_affected;
    }
    txn.commit().await?;
    Ok(updated)
}

// ---------------------------------------------------------------------------
// 所要時間
// ---------------------------------------------------------------------------

/// タスク種別ごとの所要時間 (分)。
/// `event_minutes` はイベント明細がある場合だけ Some。
pub fn task_minutes(tipo: TipoTarea, sop_minutes: Option<f64>, event_minutes: Option<f64>) -> f64 {
    match tipo {
        TipoTarea::Inicio => 0.0,
        TipoTarea::Receso => 45.0,
        TipoTarea::LimpiezaEquipo => event_minutes.unwrap_or(60.0),
        TipoTarea::Evento => event_minutes.unwrap_or(0.0),
        TipoTarea::Sop => sop_minutes.unwrap_or(0.0),
    }
}

/// 複数タスクの所要時間計算に必要な明細をまとめて読み込んだもの
#[derive(Debug, Default)]
pub struct TimeTable {
    /// (sop_id, nivel_limpieza_id) → 合計分
    sop: HashMap<(String, i32), f64>,
    /// sop_evento_id → 合計分
    eventos: HashMap<String, f64>,
}

impl TimeTable {
    pub async fn load(db: &impl ConnectionTrait, tareas: &[lanzamiento_tarea::Model]) -> Result<Self, DbErr> {
        let mut table = TimeTable::default();

        let sop_ids: HashSet<String> = tareas.iter().filter_map(|t| t.sop_id.clone()).collect();
        if !sop_ids.is_empty() {
            let sf_to_sop: HashMap<String, String> = SopFraccion::find()
                .filter(sop_fraccion::Column::SopId.is_in(sop_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|sf| (sf.sop_fraccion_id, sf.sop_id))
                .collect();

            if !sf_to_sop.is_empty() {
                let detalles = SopFraccionDetalle::find()
                    .filter(sop_fraccion_detalle::Column::SopFraccionId.is_in(sf_to_sop.keys().cloned()))
                    .all(db)
                    .await?;
                for d in detalles {
                    let (Some(minutos), Some(sop_id)) = (d.tiempo_unitario_min, sf_to_sop.get(&d.sop_fraccion_id)) else {
                        continue;
                    };
                    *table.sop.entry((sop_id.clone(), d.nivel_limpieza_id)).or_default() += minutos;
                }
            }
        }

        let evento_ids: HashSet<String> = tareas.iter().filter_map(|t| t.sop_evento_id.clone()).collect();
        if !evento_ids.is_empty() {
            let detalles = SopEventoDetalle::find()
                .filter(sop_evento_detalle::Column::SopEventoId.is_in(evento_ids))
                .all(db)
                .await?;
            for d in detalles {
                *table.eventos.entry(d.sop_evento_id).or_default() += d.tiempo_estimado;
            }
        }

        Ok(table)
    }

    pub fn minutes(&self, tarea: &lanzamiento_tarea::Model) -> f64 {
        let sop_minutes = match (&tarea.sop_id, tarea.nivel_limpieza_asignado) {
            (Some(sop_id), Some(nivel)) => Some(self.sop.get(&(sop_id.clone(), nivel.id())).copied().unwrap_or(0.0)),
            _ => None,
        };
        let event_minutes = tarea
            .sop_evento_id
            .as_ref()
            .and_then(|id| self.eventos.get(id))
            .copied();
        task_minutes(tarea.tipo_tarea, sop_minutes, event_minutes)
    }
}

// ---------------------------------------------------------------------------
// 画面用の集計
// ---------------------------------------------------------------------------

/// 画面に出すタスク 1 行
#[derive(Debug, Clone, Serialize)]
pub struct TareaVista {
    #[serde(flatten)]
    pub tarea: lanzamiento_tarea::Model,
    pub titulo: String,
    pub area_nombre: Option<String>,
    pub subarea_nombre: Option<String>,
    pub tipo_label: &'static str,
    pub nivel_label: Option<&'static str>,
    pub minutos: f64,
    /// "HH:MM"
    pub checked_at: Option<String>,
    #[serde(skip)]
    sort_key: (i32, i32, i32),
}

/// 各タスクに名前・時間・チェック時刻を付けて並べる。
/// 並び順は (orden, エリア順, サブエリア順)。
pub async fn load_task_views(
    db: &impl ConnectionTrait,
    tareas: Vec<lanzamiento_tarea::Model>,
) -> Result<Vec<TareaVista>, DbErr> {
    let times = TimeTable::load(db, &tareas).await?;

    let area_ids: HashSet<String> = tareas.iter().filter_map(|t| t.area_id.clone()).collect();
    let areas: HashMap<String, area::Model> = if area_ids.is_empty() {
        HashMap::new()
    } else {
        Area::find()
            .filter(area::Column::AreaId.is_in(area_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.area_id.clone(), a))
            .collect()
    };

    let subarea_ids: HashSet<String> = tareas.iter().filter_map(|t| t.subarea_id.clone()).collect();
    let subareas: HashMap<String, sub_area::Model> = if subarea_ids.is_empty() {
        HashMap::new()
    } else {
        SubArea::find()
            .filter(sub_area::Column::SubareaId.is_in(subarea_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.subarea_id.clone(), s))
            .collect()
    };

    let evento_ids: HashSet<String> = tareas.iter().filter_map(|t| t.sop_evento_id.clone()).collect();
    let eventos: HashMap<String, String> = if evento_ids.is_empty() {
        HashMap::new()
    } else {
        SopEvento::find()
            .filter(sop_evento::Column::SopEventoId.is_in(evento_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|e| (e.sop_evento_id, e.nombre))
            .collect()
    };

    let checks = checks_by_tarea(db, tareas.iter().map(|t| t.tarea_id)).await?;

    let mut vistas: Vec<TareaVista> = tareas
        .into_iter()
        .map(|t| {
            let area = t.area_id.as_ref().and_then(|id| areas.get(id));
            let subarea = t.subarea_id.as_ref().and_then(|id| subareas.get(id));
            let evento = t.sop_evento_id.as_ref().and_then(|id| eventos.get(id));
            let titulo = match t.tipo_tarea {
                TipoTarea::Sop => subarea
                    .map(|s| s.subarea_nombre.clone())
                    .or_else(|| t.subarea_id.clone())
                    .unwrap_or_else(|| "SOP".to_string()),
                TipoTarea::Evento => evento.cloned().unwrap_or_else(|| TipoTarea::Evento.label().to_string()),
                fixed => fixed.label().to_string(),
            };
            TareaVista {
                titulo,
                area_nombre: area.map(|a| a.area_nombre.clone()),
                subarea_nombre: subarea.map(|s| s.subarea_nombre.clone()),
                tipo_label: t.tipo_tarea.label(),
                nivel_label: t.nivel_limpieza_asignado.map(|n| n.label()),
                minutos: round2(times.minutes(&t)),
                checked_at: checks.get(&t.tarea_id).cloned(),
                sort_key: (
                    t.orden,
                    area.map_or(0, |a| a.orden_area),
                    subarea.map_or(0, |s| s.orden_subarea),
                ),
                tarea: t,
            }
        })
        .collect();

    vistas.sort_by_key(|v| v.sort_key);
    Ok(vistas)
}

/// tarea_id → チェック時刻 ("HH:MM")
pub async fn checks_by_tarea(
    db: &impl ConnectionTrait,
    tarea_ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    let ids: Vec<i32> = tarea_ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(TareaCheck::find()
        .filter(tarea_check::Column::TareaId.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.tarea_id, c.checked_at.format("%H:%M").to_string()))
        .collect())
}

#[derive(Debug, Serialize)]
pub struct PersonaPlan {
    pub personal_id: String,
    pub nombre: String,
    pub tareas: Vec<TareaVista>,
    pub tiempo_total: f64,
}

/// 日次プラン (管理者の割り当て画面)
#[derive(Debug, Serialize)]
pub struct DayPlan {
    pub fecha: NaiveDate,
    pub dia_nombre: &'static str,
    pub personas: Vec<PersonaPlan>,
    pub total_tareas: usize,
    /// 追加でない SOP タスクで埋まっているサブエリア
    pub asignadas_regular_ids: Vec<String>,
}

pub async fn day_plan(db: &impl ConnectionTrait, fecha: NaiveDate) -> Result<DayPlan, DbErr> {
    let dia = get_or_create_dia(db, fecha).await?;
    let tareas = LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::DiaId.eq(dia.dia_id))
        .all(db)
        .await?;

    let mut asignadas: Vec<String> = tareas
        .iter()
        .filter(|t| !t.es_adicional)
        .filter_map(|t| t.subarea_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    asignadas.sort();

    let total_tareas = tareas.len();
    let vistas = load_task_views(db, tareas).await?;
    let nombres = personal_names(db).await?;

    let mut por_persona: HashMap<String, Vec<TareaVista>> = HashMap::new();
    for v in vistas {
        por_persona.entry(v.tarea.personal_id.clone()).or_default().push(v);
    }

    let mut personas: Vec<PersonaPlan> = por_persona
        .into_iter()
        .map(|(personal_id, tareas)| PersonaPlan {
            nombre: nombres.get(&personal_id).cloned().unwrap_or_else(|| personal_id.clone()),
            tiempo_total: round2(tareas.iter().map(|t| t.minutos).sum()),
            tareas,
            personal_id,
        })
        .collect();
    personas.sort_by(|a, b| a.nombre.cmp(&b.nombre));

    Ok(DayPlan {
        fecha,
        dia_nombre: calendar::nombre_dia(fecha),
        personas,
        total_tareas,
        asignadas_regular_ids: asignadas,
    })
}

async fn personal_names(db: &impl ConnectionTrait) -> Result<HashMap<String, String>, DbErr> {
    Ok(Personal::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.personal_id, p.nombre))
        .collect())
}

/// その日にタスクがある人 (ルート一覧画面)
pub async fn day_route(db: &impl ConnectionTrait, fecha: NaiveDate) -> Result<Vec<personal::Model>, DbErr> {
    let Some(dia) = find_dia(db, fecha).await? else {
        return Ok(Vec::new());
    };
    let ids: HashSet<String> = LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::DiaId.eq(dia.dia_id))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.personal_id)
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Personal::find()
        .filter(personal::Column::PersonalId.is_in(ids))
        .order_by_asc(personal::Column::Nombre)
        .all(db)
        .await
}

/// 管理者ホームの 1 日分
#[derive(Debug, Serialize)]
pub struct DiaResumen {
    pub fecha: NaiveDate,
    pub nombre: &'static str,
    pub total_tareas: usize,
    pub total_personas: usize,
}

/// 月〜土の件数サマリ
pub async fn week_summary(db: &impl ConnectionTrait, lunes: NaiveDate) -> Result<Vec<DiaResumen>, DbErr> {
    let mut resumen = Vec::with_capacity(6);
    for fecha in calendar::working_week(lunes) {
        let tareas = match find_dia(db, fecha).await? {
            Some(dia) => {
                LanzamientoTarea::find()
                    .filter(lanzamiento_tarea::Column::DiaId.eq(dia.dia_id))
                    .all(db)
                    .await?
            }
            None => Vec::new(),
        };
        let personas: HashSet<&str> = tareas.iter().map(|t| t.personal_id.as_str()).collect();
        resumen.push(DiaResumen {
            fecha,
            nombre: calendar::nombre_dia(fecha),
            total_tareas: tareas.len(),
            total_personas: personas.len(),
        });
    }
    Ok(resumen)
}

/// サブエリア選択肢。`ocupada` は日付指定時のみ
#[derive(Debug, Serialize)]
pub struct SubareaOpcion {
    pub id: String,
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocupada: Option<bool>,
}

async fn subareas_of_area(db: &impl ConnectionTrait, area_id: &str) -> Result<Vec<sub_area::Model>, DbErr> {
    SubArea::find()
        .filter(sub_area::Column::AreaId.eq(area_id))
        .order_by_asc(sub_area::Column::OrdenSubarea)
        .order_by_asc(sub_area::Column::SubareaNombre)
        .all(db)
        .await
}

/// エリアのサブエリアと、その日に何かタスクが入っているか
pub async fn subareas_for_day(
    db: &impl ConnectionTrait,
    area_id: &str,
    fecha: NaiveDate,
) -> Result<Vec<SubareaOpcion>, DbErr> {
    let ocupadas: HashSet<String> = match find_dia(db, fecha).await? {
        Some(dia) => LanzamientoTarea::find()
            .filter(lanzamiento_tarea::Column::DiaId.eq(dia.dia_id))
            .all(db)
            .await?
            .into_iter()
            .filter_map(|t| t.subarea_id)
            .collect(),
        None => HashSet::new(),
    };

    Ok(subareas_of_area(db, area_id)
        .await?
        .into_iter()
        .map(|s| SubareaOpcion {
            ocupada: Some(ocupadas.contains(&s.subarea_id)),
            id: s.subarea_id,
            nombre: s.subarea_nombre,
        })
        .collect())
}

pub async fn subareas_simple(db: &impl ConnectionTrait, area_id: &str) -> Result<Vec<SubareaOpcion>, DbErr> {
    Ok(subareas_of_area(db, area_id)
        .await?
        .into_iter()
        .map(|s| SubareaOpcion {
            id: s.subarea_id,
            nombre: s.subarea_nombre,
            ocupada: None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_minutes_by_type() {
        assert_eq!(task_minutes(TipoTarea::Inicio, None, None), 0.0);
        assert_eq!(task_minutes(TipoTarea::Receso, None, Some(10.0)), 45.0);
        assert_eq!(task_minutes(TipoTarea::LimpiezaEquipo, None, None), 60.0);
        assert_eq!(task_minutes(TipoTarea::LimpiezaEquipo, None, Some(25.5)), 25.5);
        assert_eq!(task_minutes(TipoTarea::Evento, None, None), 0.0);
        assert_eq!(task_minutes(TipoTarea::Sop, Some(12.25), None), 12.25);
        assert_eq!(task_minutes(TipoTarea::Sop, None, None), 0.0);
    }
}
