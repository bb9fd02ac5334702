use chrono::{Duration, NaiveDate, NaiveDateTime};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::asignacion::{check_slot, SlotTask};
use crate::domain::calendar::{self, DIAS_SEMANA};
use crate::domain::nivel::Nivel;
use crate::domain::tipos::{AssignmentKind, TipoSop, TipoTarea};
use crate::entities::{
    area, lanzamiento_dia, lanzamiento_tarea, personal, plantilla_item, plantilla_semana_aplicada,
    plantilla_semanal, prelude::*, sop, sub_area, tarea_check,
};
use crate::errors::AppError;
use crate::services::schedule_service::{self, map_tarea_insert_err};
use crate::validation::PlantillaNombreValidation;

pub const MSG_NOMBRE_DUPLICADO: &str = "Ya existe una plantilla con ese nombre.";

/// 週をテンプレートに保存するときの保存先
#[derive(Debug, Clone)]
pub enum CaptureTarget {
    Nueva(String),
    Sobrescribir(i32),
}

/// テンプレート適用の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub creadas: usize,
    pub omitidas: usize,
}

/// テンプレートの日エディタから来る項目追加
#[derive(Debug, Clone)]
pub struct ItemRequest {
    pub dia_index: i32,
    pub personal_id: String,
    pub subarea_id: String,
    pub nivel: Option<Nivel>,
    pub kind: AssignmentKind,
    pub es_adicional: bool,
}

fn validar_nombre(nombre: &str) -> Result<String, AppError> {
    PlantillaNombreValidation::new(nombre)
        .validate_form()
        .map_err(|errors| AppError::BadRequest(errors.join(" ")))?;
    Ok(nombre.trim().to_string())
}

fn validar_dia_index(dia_index: i32) -> Result<(), AppError> {
    if (0..6).contains(&dia_index) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Día inválido (0..5).".into()))
    }
}

pub async fn find(db: &impl ConnectionTrait, plantilla_id: i32) -> Result<plantilla_semanal::Model, AppError> {
    PlantillaSemanal::find_by_id(plantilla_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Plantilla no encontrada".into()))
}

pub async fn list(db: &impl ConnectionTrait) -> Result<Vec<plantilla_semanal::Model>, DbErr> {
    PlantillaSemanal::find()
        .order_by_asc(plantilla_semanal::Column::Nombre)
        .all(db)
        .await
}

async fn ensure_nombre_libre(
    db: &impl ConnectionTrait,
    nombre: &str,
    exclude_id: Option<i32>,
) -> Result<(), AppError> {
    let mut query = PlantillaSemanal::find().filter(plantilla_semanal::Column::Nombre.eq(nombre));
    if let Some(id) = exclude_id {
        query = query.filter(plantilla_semanal::Column::PlantillaId.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(AppError::Conflict(MSG_NOMBRE_DUPLICADO.into()));
    }
    Ok(())
}

async fn insert_plantilla(
    db: &impl ConnectionTrait,
    nombre: &str,
    now: NaiveDateTime,
) -> Result<plantilla_semanal::Model, AppError> {
    let nombre = validar_nombre(nombre)?;
    ensure_nombre_libre(db, &nombre, None).await?;
    Ok(plantilla_semanal::ActiveModel {
        nombre: Set(nombre),
        creada_en: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// 空のテンプレートを作る
pub async fn create(
    db: &DatabaseConnection,
    nombre: &str,
    now: NaiveDateTime,
) -> Result<plantilla_semanal::Model, AppError> {
    let plantilla = insert_plantilla(db, nombre, now).await?;
    tracing::info!(plantilla_id = plantilla.plantilla_id, nombre = %plantilla.nombre, "template created");
    Ok(plantilla)
}

/// 名前変更 (他のテンプレートと重複不可)
pub async fn rename(db: &DatabaseConnection, plantilla_id: i32, nombre: &str) -> Result<plantilla_semanal::Model, AppError> {
    let plantilla = find(db, plantilla_id).await?;
    let nombre = validar_nombre(nombre).map_err(|_| AppError::BadRequest("Nombre inválido.".into()))?;
    ensure_nombre_libre(db, &nombre, Some(plantilla_id)).await?;

    let mut active: plantilla_semanal::ActiveModel = plantilla.into();
    active.nombre = Set(nombre);
    Ok(active.update(db).await?)
}

/// テンプレート削除。項目を先に消す。
pub async fn delete(db: &DatabaseConnection, plantilla_id: i32) -> Result<plantilla_semanal::Model, AppError> {
    let txn = db.begin().await?;
    let plantilla = find(&txn, plantilla_id).await?;
    PlantillaItem::delete_many()
        .filter(plantilla_item::Column::PlantillaId.eq(plantilla_id))
        .exec(&txn)
        .await?;
    PlantillaSemanaAplicada::update_many()
        .col_expr(plantilla_semana_aplicada::Column::PlantillaId, Expr::value(Option::<i32>::None))
        .filter(plantilla_semana_aplicada::Column::PlantillaId.eq(plantilla_id))
        .exec(&txn)
        .await?;
    PlantillaSemanal::delete_by_id(plantilla_id).exec(&txn).await?;
    txn.commit().await?;
    tracing::info!(plantilla_id, nombre = %plantilla.nombre, "template deleted");
    Ok(plantilla)
}

/// 週 (月〜土) の SOP タスクをテンプレート項目として書き出す。
/// 固定タスクとイベントは適用時に作り直されるので保存しない。
pub async fn capture_week(
    db: &DatabaseConnection,
    lunes: NaiveDate,
    target: CaptureTarget,
    now: NaiveDateTime,
) -> Result<plantilla_semanal::Model, AppError> {
    let lunes = calendar::monday_of(lunes);
    let txn = db.begin().await?;

    let plantilla = match target {
        CaptureTarget::Nueva(nombre) => insert_plantilla(&txn, &nombre, now).await?,
        CaptureTarget::Sobrescribir(plantilla_id) => {
            let plantilla = find(&txn, plantilla_id).await?;
            PlantillaItem::delete_many()
                .filter(plantilla_item::Column::PlantillaId.eq(plantilla_id))
                .exec(&txn)
                .await?;
            plantilla
        }
    };

    let mut items = Vec::new();
    for (dia_index, fecha) in calendar::working_week(lunes).into_iter().enumerate() {
        let Some(dia) = schedule_service::find_dia(&txn, fecha).await? else {
            continue;
        };
        let tareas = LanzamientoTarea::find()
            .filter(lanzamiento_tarea::Column::DiaId.eq(dia.dia_id))
            .filter(lanzamiento_tarea::Column::TipoTarea.eq(TipoTarea::Sop))
            .order_by_asc(lanzamiento_tarea::Column::TareaId)
            .all(&txn)
            .await?;

        for t in tareas {
            let (Some(area_id), Some(subarea_id)) = (t.area_id, t.subarea_id) else {
                continue;
            };
            items.push(plantilla_item::ActiveModel {
                plantilla_id: Set(plantilla.plantilla_id),
                dia_index: Set(dia_index as i32),
                personal_id: Set(t.personal_id),
                area_id: Set(area_id),
                subarea_id: Set(subarea_id),
                nivel_limpieza_asignado: Set(t.nivel_limpieza_asignado.unwrap_or(Nivel::Basica)),
                sop_id: Set(t.sop_id),
                es_adicional: Set(t.es_adicional),
                orden: Set(t.orden),
                ..Default::default()
            });
        }
    }

    let total = items.len();
    if !items.is_empty() {
        PlantillaItem::insert_many(items).exec(&txn).await?;
    }
    txn.commit().await?;

    tracing::info!(plantilla_id = plantilla.plantilla_id, %lunes, items = total, "week captured as template");
    Ok(plantilla)
}

/// 週のタスクを全削除 (チェック → タスクの順)。削除件数を返す。
pub async fn clear_week_tasks(db: &impl ConnectionTrait, lunes: NaiveDate) -> Result<u64, DbErr> {
    let fechas = calendar::working_week(calendar::monday_of(lunes));
    let dia_ids: Vec<i32> = LanzamientoDia::find()
        .filter(lanzamiento_dia::Column::Fecha.is_in(fechas))
        .all(db)
        .await?
        .into_iter()
        .map(|d| d.dia_id)
        .collect();
    if dia_ids.is_empty() {
        return Ok(0);
    }

    let tarea_ids: Vec<i32> = LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::DiaId.is_in(dia_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.tarea_id)
        .collect();
    if !tarea_ids.is_empty() {
        TareaCheck::delete_many()
            .filter(tarea_check::Column::TareaId.is_in(tarea_ids))
            .exec(db)
            .await?;
    }

    let res = LanzamientoTarea::delete_many()
        .filter(lanzamiento_tarea::Column::DiaId.is_in(dia_ids))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// 週のアクティブテンプレートを記録 (None で解除)
pub async fn set_active(
    db: &impl ConnectionTrait,
    lunes: NaiveDate,
    plantilla_id: Option<i32>,
    now: NaiveDateTime,
) -> Result<(), DbErr> {
    let existing = PlantillaSemanaAplicada::find_by_id(lunes).one(db).await?;

    match (plantilla_id, existing) {
        (None, Some(_)) => {
            PlantillaSemanaAplicada::delete_by_id(lunes).exec(db).await?;
        }
        (None, None) => {}
        (Some(id), Some(marca)) => {
            let mut active: plantilla_semana_aplicada::ActiveModel = marca.into();
            active.plantilla_id = Set(Some(id));
            active.aplicada_en = Set(now);
            active.update(db).await?;
        }
        (Some(id), None) => {
            plantilla_semana_aplicada::ActiveModel {
                semana_lunes: Set(lunes),
                plantilla_id: Set(Some(id)),
                aplicada_en: Set(now),
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

/// 週に適用中のテンプレート
pub async fn active_for_week(
    db: &impl ConnectionTrait,
    lunes: NaiveDate,
) -> Result<Option<plantilla_semanal::Model>, DbErr> {
    let Some(marca) = PlantillaSemanaAplicada::find_by_id(calendar::monday_of(lunes)).one(db).await? else {
        return Ok(None);
    };
    match marca.plantilla_id {
        Some(id) => PlantillaSemanal::find_by_id(id).one(db).await,
        None => Ok(None),
    }
}

/// テンプレートを週に適用する。対象週のタスクは先に全削除し、
/// 項目から日・タスク・固定タスクを作り直してアクティブテンプレートとして記録する。
pub async fn apply_template(
    db: &DatabaseConnection,
    plantilla_id: i32,
    lunes: NaiveDate,
    now: NaiveDateTime,
) -> Result<ApplyOutcome, AppError> {
    let lunes = calendar::monday_of(lunes);
    let txn = db.begin().await?;

    let plantilla = find(&txn, plantilla_id).await?;
    let borradas = clear_week_tasks(&txn, lunes).await?;

    let items = PlantillaItem::find()
        .filter(plantilla_item::Column::PlantillaId.eq(plantilla_id))
        .order_by_asc(plantilla_item::Column::DiaIndex)
        .order_by_asc(plantilla_item::Column::Orden)
        .order_by_asc(plantilla_item::Column::ItemId)
        .all(&txn)
        .await?;

    // 項目に SOP が無ければサブエリアの regular SOP で補う
    let sin_sop: HashSet<String> = items
        .iter()
        .filter(|it| it.sop_id.is_none())
        .map(|it| it.subarea_id.clone())
        .collect();
    let sops_regulares: HashMap<String, String> = if sin_sop.is_empty() {
        HashMap::new()
    } else {
        Sop::find()
            .filter(sop::Column::SubareaId.is_in(sin_sop))
            .filter(sop::Column::TipoSop.eq(TipoSop::Regular))
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| (s.subarea_id, s.sop_id))
            .collect()
    };

    let con_sop: HashSet<String> = items.iter().filter_map(|it| it.sop_id.clone()).collect();
    let consecuentes: HashSet<String> = if con_sop.is_empty() {
        HashSet::new()
    } else {
        Sop::find()
            .filter(sop::Column::SopId.is_in(con_sop))
            .filter(sop::Column::TipoSop.eq(TipoSop::Consecuente))
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| s.sop_id)
            .collect()
    };

    let mut dias: HashMap<i32, i32> = HashMap::new();
    let mut vistos: HashSet<(i32, String, Option<String>)> = HashSet::new();
    let mut ocupadas: HashSet<(i32, String)> = HashSet::new();
    let mut personas: Vec<(i32, String)> = Vec::new();
    let mut outcome = ApplyOutcome { creadas: 0, omitidas: 0 };

    for it in items {
        if !(0..6).contains(&it.dia_index) {
            outcome.omitidas += 1;
            continue;
        }
        let dia_id = match dias.get(&it.dia_index) {
            Some(id) => *id,
            None => {
                let fecha = lunes + Duration::days(it.dia_index as i64);
                let dia = schedule_service::get_or_create_dia(&txn, fecha).await?;
                dias.insert(it.dia_index, dia.dia_id);
                dia.dia_id
            }
        };

        let sop_id = it.sop_id.clone().or_else(|| sops_regulares.get(&it.subarea_id).cloned());

        // consecuente の adicional は重ねてよい
        let consecuente_adicional = it.es_adicional && sop_id.as_ref().is_some_and(|s| consecuentes.contains(s));
        let key = (dia_id, it.subarea_id.clone(), sop_id.clone());
        if !consecuente_adicional && vistos.contains(&key) {
            outcome.omitidas += 1;
            continue;
        }
        if !it.es_adicional && !ocupadas.insert((dia_id, it.subarea_id.clone())) {
            tracing::warn!(plantilla_id, dia_index = it.dia_index, subarea = %it.subarea_id, "template item skipped: sub-area already has a regular task");
            outcome.omitidas += 1;
            continue;
        }
        vistos.insert(key);

        lanzamiento_tarea::ActiveModel {
            dia_id: Set(dia_id),
            personal_id: Set(it.personal_id.clone()),
            area_id: Set(Some(it.area_id.clone())),
            subarea_id: Set(Some(it.subarea_id.clone())),
            nivel_limpieza_asignado: Set(Some(it.nivel_limpieza_asignado)),
            sop_id: Set(sop_id),
            es_adicional: Set(it.es_adicional),
            tipo_tarea: Set(TipoTarea::Sop),
            orden: Set(it.orden),
            sop_evento_id: Set(None),
            es_arrastrable: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_tarea_insert_err)?;
        outcome.creadas += 1;

        if !personas.contains(&(dia_id, it.personal_id.clone())) {
            personas.push((dia_id, it.personal_id));
        }
    }

    for (dia_id, personal_id) in &personas {
        schedule_service::ensure_fixed_tasks(&txn, *dia_id, personal_id).await?;
    }
    set_active(&txn, lunes, Some(plantilla_id), now).await?;
    txn.commit().await?;

    tracing::info!(
        plantilla_id,
        nombre = %plantilla.nombre,
        %lunes,
        borradas,
        creadas = outcome.creadas,
        omitidas = outcome.omitidas,
        "template applied"
    );
    Ok(outcome)
}

/// 週を空にしてアクティブテンプレートを解除する
pub async fn empty_week(db: &DatabaseConnection, lunes: NaiveDate, now: NaiveDateTime) -> Result<u64, AppError> {
    let lunes = calendar::monday_of(lunes);
    let txn = db.begin().await?;
    let borradas = clear_week_tasks(&txn, lunes).await?;
    set_active(&txn, lunes, None, now).await?;
    txn.commit().await?;
    tracing::info!(%lunes, borradas, "week emptied");
    Ok(borradas)
}

/// テンプレートの 1 日に項目を追加 (日次プランと同じ重複ルール)
pub async fn add_item(
    db: &DatabaseConnection,
    plantilla_id: i32,
    req: ItemRequest,
) -> Result<plantilla_item::Model, AppError> {
    validar_dia_index(req.dia_index)?;
    let (tipo_sop, nivel) = req.kind.resolve(req.nivel.unwrap_or(Nivel::Basica));

    let txn = db.begin().await?;
    find(&txn, plantilla_id).await?;

    if Personal::find_by_id(req.personal_id.clone()).one(&txn).await?.is_none() {
        return Err(AppError::BadRequest("Faltan datos (personal/área/subárea).".into()));
    }
    let subarea = SubArea::find_by_id(req.subarea_id.clone())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Faltan datos (personal/área/subárea).".into()))?;

    let existing: Vec<SlotTask> = PlantillaItem::find()
        .filter(plantilla_item::Column::PlantillaId.eq(plantilla_id))
        .filter(plantilla_item::Column::DiaIndex.eq(req.dia_index))
        .filter(plantilla_item::Column::SubareaId.eq(subarea.subarea_id.as_str()))
        .all(&txn)
        .await?
        .into_iter()
        .map(|it| SlotTask {
            sop_id: it.sop_id,
            es_adicional: it.es_adicional,
        })
        .collect();
    let sop = Sop::find()
        .filter(sop::Column::SubareaId.eq(subarea.subarea_id.as_str()))
        .filter(sop::Column::TipoSop.eq(tipo_sop))
        .one(&txn)
        .await?;

    check_slot(
        &existing,
        req.es_adicional,
        tipo_sop,
        sop.as_ref().map(|s| s.sop_id.as_str()),
        nivel,
    )
    .map_err(|conflict| AppError::Conflict(conflict.message_plantilla()))?;

    let item = plantilla_item::ActiveModel {
        plantilla_id: Set(plantilla_id),
        dia_index: Set(req.dia_index),
        personal_id: Set(req.personal_id),
        area_id: Set(subarea.area_id),
        subarea_id: Set(subarea.subarea_id),
        nivel_limpieza_asignado: Set(nivel),
        sop_id: Set(sop.map(|s| s.sop_id)),
        es_adicional: Set(req.es_adicional),
        orden: Set(0),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    Ok(item)
}

/// 項目削除。リダイレクト先のために削除した項目を返す。
pub async fn delete_item(db: &DatabaseConnection, item_id: i32) -> Result<plantilla_item::Model, AppError> {
    let item = PlantillaItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Actividad no encontrada".into()))?;
    PlantillaItem::delete_by_id(item_id).exec(db).await?;
    Ok(item)
}

pub async fn reorder_items(db: &DatabaseConnection, orden: &[(i32, i32)]) -> Result<u64, AppError> {
    let txn = db.begin().await?;
    let mut updated = 0;
    for &(item_id, nuevo_orden) in orden {
        let res = PlantillaItem::update_many()
            .col_expr(plantilla_item::Column::Orden, Expr::value(nuevo_orden))
            .filter(plantilla_item::Column::ItemId.eq(item_id))
            .exec(&txn)
            .await?;
        updated += res.rows_affected;
    }
    txn.commit().await?;
    Ok(updated)
}

// ---------------------------------------------------------------------------
// 画面
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ItemVista {
    #[serde(flatten)]
    pub item: plantilla_item::Model,
    pub personal_nombre: String,
    pub area_nombre: String,
    pub subarea_nombre: String,
    pub nivel_label: &'static str,
    #[serde(skip)]
    orden_area: i32,
    #[serde(skip)]
    orden_subarea: i32,
}

async fn item_views(db: &impl ConnectionTrait, items: Vec<plantilla_item::Model>) -> Result<Vec<ItemVista>, DbErr> {
    let personas: HashMap<String, String> = Personal::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p: personal::Model| (p.personal_id, p.nombre))
        .collect();
    let areas: HashMap<String, area::Model> = Area::find()
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.area_id.clone(), a))
        .collect();
    let subareas: HashMap<String, sub_area::Model> = SubArea::find()
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.subarea_id.clone(), s))
        .collect();

    Ok(items
        .into_iter()
        .map(|it| {
            let area = areas.get(&it.area_id);
            let subarea = subareas.get(&it.subarea_id);
            ItemVista {
                personal_nombre: personas.get(&it.personal_id).cloned().unwrap_or_else(|| it.personal_id.clone()),
                area_nombre: area.map_or_else(|| it.area_id.clone(), |a| a.area_nombre.clone()),
                subarea_nombre: subarea.map_or_else(|| it.subarea_id.clone(), |s| s.subarea_nombre.clone()),
                nivel_label: it.nivel_limpieza_asignado.label(),
                orden_area: area.map_or(9999, |a| a.orden_area),
                orden_subarea: subarea.map_or(9999, |s| s.orden_subarea),
                item: it,
            }
        })
        .collect())
}

#[derive(Debug, Serialize)]
pub struct DiaPlantilla {
    pub index: usize,
    pub nombre: &'static str,
    pub items: Vec<ItemVista>,
}

#[derive(Debug, Serialize)]
pub struct TemplatePanel {
    pub plantillas: Vec<plantilla_semanal::Model>,
    pub plantilla: Option<plantilla_semanal::Model>,
    pub dias: Vec<DiaPlantilla>,
}

/// テンプレート一覧と、選択中テンプレートの 6 日分
pub async fn panel(db: &impl ConnectionTrait, plantilla_id: Option<i32>) -> Result<TemplatePanel, DbErr> {
    let plantillas = list(db).await?;
    let plantilla = match plantilla_id {
        Some(id) => PlantillaSemanal::find_by_id(id).one(db).await?,
        None => None,
    };

    let mut dias: Vec<DiaPlantilla> = DIAS_SEMANA
        .iter()
        .enumerate()
        .map(|(index, nombre)| DiaPlantilla { index, nombre: *nombre, items: Vec::new() })
        .collect();

    if let Some(p) = &plantilla {
        let items = PlantillaItem::find()
            .filter(plantilla_item::Column::PlantillaId.eq(p.plantilla_id))
            .all(db)
            .await?;
        for v in item_views(db, items).await? {
            if let Some(dia) = usize::try_from(v.item.dia_index).ok().and_then(|i| dias.get_mut(i)) {
                dia.items.push(v);
            }
        }
        for dia in &mut dias {
            dia.items.sort_by(|a, b| {
                (&a.item.personal_id, &a.item.area_id, &a.item.subarea_id).cmp(&(
                    &b.item.personal_id,
                    &b.item.area_id,
                    &b.item.subarea_id,
                ))
            });
        }
    }

    Ok(TemplatePanel { plantillas, plantilla, dias })
}

#[derive(Debug, Serialize)]
pub struct PersonaItems {
    pub personal_id: String,
    pub nombre: String,
    pub items: Vec<ItemVista>,
}

#[derive(Debug, Serialize)]
pub struct DayEditor {
    pub plantilla: plantilla_semanal::Model,
    pub dia_index: i32,
    pub dia_nombre: &'static str,
    pub personas: Vec<PersonaItems>,
    pub asignadas_regular_ids: Vec<String>,
}

/// テンプレートの 1 日分を人ごとにまとめる
pub async fn day_editor(db: &impl ConnectionTrait, plantilla_id: i32, dia_index: i32) -> Result<DayEditor, AppError> {
    let plantilla = find(db, plantilla_id).await?;
    let dia_nombre = usize::try_from(dia_index)
        .ok()
        .and_then(|i| DIAS_SEMANA.get(i).copied())
        .ok_or_else(|| AppError::NotFound("Día inválido".into()))?;

    let items = PlantillaItem::find()
        .filter(plantilla_item::Column::PlantillaId.eq(plantilla_id))
        .filter(plantilla_item::Column::DiaIndex.eq(dia_index))
        .all(db)
        .await?;

    let mut asignadas: Vec<String> = items
        .iter()
        .filter(|it| !it.es_adicional)
        .map(|it| it.subarea_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    asignadas.sort();

    let mut por_persona: HashMap<String, PersonaItems> = HashMap::new();
    for v in item_views(db, items).await? {
        por_persona
            .entry(v.item.personal_id.clone())
            .or_insert_with(|| PersonaItems {
                personal_id: v.item.personal_id.clone(),
                nombre: v.personal_nombre.clone(),
                items: Vec::new(),
            })
            .items
            .push(v);
    }

    let mut personas: Vec<PersonaItems> = por_persona.into_values().collect();
    for p in &mut personas {
        p.items.sort_by_key(|v| (v.item.orden, v.orden_area, v.orden_subarea));
    }
    personas.sort_by(|a, b| a.nombre.cmp(&b.nombre));

    Ok(DayEditor {
        plantilla,
        dia_index,
        dia_nombre,
        personas,
        asignadas_regular_ids: asignadas,
    })
}
