use chrono::NaiveDate;
use sea_orm::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::formato::{fmt_consumo, fmt_herramientas, fmt_quimico_y_receta, na, NO_APLICA};
use crate::domain::progreso::{fmt_num, progress_pct, round2};
use crate::domain::tipos::{TipoSop, TipoTarea};
use crate::entities::{
    area, consumo, elemento, elemento_detalle, fraccion, herramienta, kit_detalle, lanzamiento_tarea,
    metodologia, metodologia_base, metodologia_base_paso, personal, prelude::*, quimico, receta, receta_detalle,
    sop, sop_evento, sop_evento_detalle, sop_fraccion, sop_fraccion_detalle, sub_area, user,
};
use crate::errors::AppError;
use crate::services::schedule_service::{self, TareaVista};

const SIN_DATO: &str = "—";

const HEADERS_DIRECTO: [&str; 4] = ["Químico", "Receta", "Consumo", "Herramienta"];
const HEADERS_ELEMENTOS: [&str; 6] = ["Elemento", "Cantidad", "Químico", "Receta", "Consumo", "Herramienta"];

/// 表のセル。道具欄だけは複数行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Celda {
    Texto(String),
    Lista(Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Tabla {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Celda>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetodologiaVista {
    pub metodologia_base_id: String,
    pub nombre: Option<String>,
    pub descripcion: String,
    pub pasos: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FraccionReporte {
    pub orden: i32,
    pub fraccion_id: Option<String>,
    pub fraccion_nombre: String,
    pub nivel: String,
    pub tiempo_min: Option<f64>,
    pub metodologia: Option<MetodologiaVista>,
    pub tabla: Option<Tabla>,
    pub nota_tecnica: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TareaReporte {
    pub tarea_id: i32,
    pub tipo_tarea: TipoTarea,
    pub area: String,
    pub subarea: String,
    pub nivel: String,
    pub tiempo_total_min: f64,
    pub observacion_critica: Option<String>,
    pub fracciones: Vec<FraccionReporte>,
    pub es_adicional: bool,
    pub sop_id: Option<String>,
    pub checked_at: Option<String>,
    #[serde(skip)]
    sort_key: (i32, i32, i32),
}

/// 1 人 1 日のレポート
#[derive(Debug, Serialize)]
pub struct DayReport {
    pub persona: personal::Model,
    pub fecha: NaiveDate,
    pub tareas: Vec<TareaReporte>,
    pub total_tareas: usize,
    pub completadas: usize,
    pub progreso_pct: i64,
    pub puede_hacer_check: bool,
}

/// レポートを見てよいか。admin は誰でもいつでも、operativo は自分の今日だけ。
/// 戻り値はチェック操作を出すかどうか。
pub fn authorize_report(
    actor: &user::Model,
    personal_id: &str,
    fecha: NaiveDate,
    hoy: NaiveDate,
) -> Result<bool, AppError> {
    if actor.is_admin() {
        return Ok(false);
    }
    if actor.personal_id.as_deref() != Some(personal_id) || fecha != hoy {
        return Err(AppError::Forbidden);
    }
    Ok(true)
}

/// レポートに必要なカタログ (キット・レシピ・消費量・要素セット) をまとめて持つ
#[derive(Default)]
struct Catalogo {
    kits: HashMap<String, Vec<(kit_detalle::Model, Option<herramienta::Model>)>>,
    recetas: HashMap<String, receta::Model>,
    receta_lineas: HashMap<String, Vec<(receta_detalle::Model, Option<quimico::Model>)>>,
    consumos: HashMap<String, consumo::Model>,
    elementos: HashMap<String, Vec<(elemento_detalle::Model, Option<elemento::Model>)>>,
}

impl Catalogo {
    async fn load(
        db: &impl ConnectionTrait,
        mut kit_ids: HashSet<String>,
        mut receta_ids: HashSet<String>,
        mut consumo_ids: HashSet<String>,
        set_ids: HashSet<String>,
    ) -> Result<Self, DbErr> {
        let mut cat = Catalogo::default();

        if !set_ids.is_empty() {
            let lineas = ElementoDetalle::find()
                .filter(elemento_detalle::Column::ElementoSetId.is_in(set_ids))
                .find_also_related(Elemento)
                .all(db)
                .await?;
            for (d, e) in lineas {
                kit_ids.extend(d.kit_id.clone());
                receta_ids.extend(d.receta_id.clone());
                consumo_ids.extend(d.consumo_id.clone());
                cat.elementos.entry(d.elemento_set_id.clone()).or_default().push((d, e));
            }
            for lineas in cat.elementos.values_mut() {
                lineas.sort_by(|(a, _), (b, _)| (a.orden, &a.elemento_id).cmp(&(b.orden, &b.elemento_id)));
            }
        }

        if !kit_ids.is_empty() {
            let lineas = KitDetalle::find()
                .filter(kit_detalle::Column::KitId.is_in(kit_ids))
                .order_by_asc(kit_detalle::Column::HerramientaId)
                .find_also_related(Herramienta)
                .all(db)
                .await?;
            for (d, h) in lineas {
                cat.kits.entry(d.kit_id.clone()).or_default().push((d, h));
            }
        }

        if !receta_ids.is_empty() {
            cat.recetas = Receta::find()
                .filter(receta::Column::RecetaId.is_in(receta_ids.clone()))
                .all(db)
                .await?
                .into_iter()
                .map(|r| (r.receta_id.clone(), r))
                .collect();
            let lineas = RecetaDetalle::find()
                .filter(receta_detalle::Column::RecetaId.is_in(receta_ids))
                .order_by_asc(receta_detalle::Column::QuimicoId)
                .find_also_related(Quimico)
                .all(db)
                .await?;
            for (d, q) in lineas {
                cat.receta_lineas.entry(d.receta_id.clone()).or_default().push((d, q));
            }
        }

        if !consumo_ids.is_empty() {
            cat.consumos = Consumo::find()
                .filter(consumo::Column::ConsumoId.is_in(consumo_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|c| (c.consumo_id.clone(), c))
                .collect();
        }

        Ok(cat)
    }

    /// [Químico, Receta, Consumo, Herramienta]
    fn recursos(&self, kit_id: Option<&String>, receta_id: Option<&String>, consumo_id: Option<&String>) -> Vec<Celda> {
        let receta = receta_id.and_then(|id| self.recetas.get(id));
        let lineas = receta_id
            .and_then(|id| self.receta_lineas.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let (quimicos, receta_str) = fmt_quimico_y_receta(receta, lineas);
        let consumo = consumo_id.and_then(|id| self.consumos.get(id));
        let herramientas = fmt_herramientas(kit_id.and_then(|id| self.kits.get(id)).map(Vec::as_slice).unwrap_or(&[]));

        vec![
            Celda::Texto(quimicos),
            Celda::Texto(receta_str),
            Celda::Texto(fmt_consumo(consumo)),
            Celda::Lista(herramientas),
        ]
    }

    fn tabla_directa(&self, kit_id: Option<&String>, receta_id: Option<&String>, consumo_id: Option<&String>) -> Tabla {
        Tabla {
            headers: HEADERS_DIRECTO.to_vec(),
            rows: vec![self.recursos(kit_id, receta_id, consumo_id)],
        }
    }

    /// 要素セットは要素ごとに 1 行
    fn tabla_elementos(&self, set_id: &str) -> Tabla {
        let rows = self
            .elementos
            .get(set_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|(d, e)| {
                let mut row = vec![
                    Celda::Texto(na(e.as_ref().and_then(|e| e.descripcion.as_deref()))),
                    Celda::Texto(
                        e.as_ref()
                            .and_then(|e| e.cantidad)
                            .map(fmt_num)
                            .unwrap_or_else(|| NO_APLICA.to_string()),
                    ),
                ];
                row.extend(self.recursos(d.kit_id.as_ref(), d.receta_id.as_ref(), d.consumo_id.as_ref()));
                row
            })
            .collect();
        Tabla {
            headers: HEADERS_ELEMENTOS.to_vec(),
            rows,
        }
    }
}

/// (fraccion_id, nivel_id) → 方法論 (手順付き)
async fn load_metodologias(
    db: &impl ConnectionTrait,
    fraccion_ids: HashSet<String>,
    nivel_ids: HashSet<i32>,
) -> Result<HashMap<(String, i32), MetodologiaVista>, DbErr> {
    if fraccion_ids.is_empty() || nivel_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let asignaciones = Metodologia::find()
        .filter(metodologia::Column::FraccionId.is_in(fraccion_ids))
        .filter(metodologia::Column::NivelLimpiezaId.is_in(nivel_ids))
        .all(db)
        .await?;
    let base_ids: HashSet<String> = asignaciones.iter().map(|m| m.metodologia_base_id.clone()).collect();
    if base_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let bases: HashMap<String, metodologia_base::Model> = MetodologiaBase::find()
        .filter(metodologia_base::Column::MetodologiaBaseId.is_in(base_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.metodologia_base_id.clone(), b))
        .collect();
    let mut pasos: HashMap<String, Vec<String>> = HashMap::new();
    for p in MetodologiaBasePaso::find()
        .filter(metodologia_base_paso::Column::MetodologiaBaseId.is_in(base_ids))
        .order_by_asc(metodologia_base_paso::Column::Orden)
        .all(db)
        .await?
    {
        pasos.entry(p.metodologia_base_id).or_default().push(p.instruccion);
    }

    Ok(asignaciones
        .into_iter()
        .filter_map(|m| {
            let base = bases.get(&m.metodologia_base_id)?;
            let vista = MetodologiaVista {
                metodologia_base_id: base.metodologia_base_id.clone(),
                nombre: base.nombre.clone(),
                descripcion: base.descripcion.clone().unwrap_or_default(),
                pasos: pasos.get(&base.metodologia_base_id).cloned().unwrap_or_default(),
            };
            Some(((m.fraccion_id, m.nivel_limpieza_id), vista))
        })
        .collect())
}

/// 1 人 1 日のレポートを組み立てる。
/// SOP タスクは sop_id (無ければサブエリアの regular SOP) から、そのレベルの明細と方法論を引く。
/// 方法論の無いフラクションは出さない。
pub async fn build_day_report(
    db: &impl ConnectionTrait,
    fecha: NaiveDate,
    personal_id: &str,
    puede_hacer_check: bool,
) -> Result<DayReport, AppError> {
    let fecha_str = fecha.format("%Y-%m-%d").to_string();
    let dia = schedule_service::find_dia(db, fecha)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No existe un registro de día para la fecha {}.", fecha_str)))?;

    let persona = Personal::find_by_id(personal_id.to_string()).one(db).await?;
    let tareas = LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::DiaId.eq(dia.dia_id))
        .filter(lanzamiento_tarea::Column::PersonalId.eq(personal_id))
        .order_by_asc(lanzamiento_tarea::Column::Orden)
        .order_by_asc(lanzamiento_tarea::Column::TareaId)
        .all(db)
        .await?;

    if tareas.is_empty() {
        let nombre = persona.map_or_else(|| personal_id.to_string(), |p| p.nombre);
        return Err(AppError::NotFound(format!("No hay tareas para {} el {}.", nombre, fecha_str)));
    }
    let persona = persona.unwrap_or_else(|| personal::Model {
        personal_id: personal_id.to_string(),
        nombre: personal_id.to_string(),
    });

    let checks = schedule_service::checks_by_tarea(db, tareas.iter().map(|t| t.tarea_id)).await?;

    // ---- SOP ----
    let sop_tareas: Vec<&lanzamiento_tarea::Model> =
        tareas.iter().filter(|t| t.tipo_tarea == TipoTarea::Sop).collect();
    let sop_ids: HashSet<String> = sop_tareas.iter().filter_map(|t| t.sop_id.clone()).collect();
    let subareas_sin_sop: HashSet<String> = sop_tareas
        .iter()
        .filter(|t| t.sop_id.is_none())
        .filter_map(|t| t.subarea_id.clone())
        .collect();

    let sops: Vec<sop::Model> = if sop_ids.is_empty() && subareas_sin_sop.is_empty() {
        Vec::new()
    } else {
        Sop::find()
            .filter(
                Condition::any()
                    .add(sop::Column::SopId.is_in(sop_ids))
                    .add(
                        Condition::all()
                            .add(sop::Column::SubareaId.is_in(subareas_sin_sop))
                            .add(sop::Column::TipoSop.eq(TipoSop::Regular)),
                    ),
            )
            .all(db)
            .await?
    };
    let sops_por_id: HashMap<String, sop::Model> = sops.iter().map(|s| (s.sop_id.clone(), s.clone())).collect();
    let sops_regulares: HashMap<String, sop::Model> = sops
        .into_iter()
        .filter(|s| s.tipo_sop == TipoSop::Regular)
        .map(|s| (s.subarea_id.clone(), s))
        .collect();

    let sop_fracciones: Vec<sop_fraccion::Model> = if sops_por_id.is_empty() {
        Vec::new()
    } else {
        SopFraccion::find()
            .filter(sop_fraccion::Column::SopId.is_in(sops_por_id.keys().cloned()))
            .order_by_asc(sop_fraccion::Column::Orden)
            .order_by_asc(sop_fraccion::Column::SopFraccionId)
            .all(db)
            .await?
    };
    let fracciones: HashMap<String, fraccion::Model> = if sop_fracciones.is_empty() {
        HashMap::new()
    } else {
        Fraccion::find()
            .filter(fraccion::Column::FraccionId.is_in(sop_fracciones.iter().map(|sf| sf.fraccion_id.clone())))
            .all(db)
            .await?
            .into_iter()
            .map(|f| (f.fraccion_id.clone(), f))
            .collect()
    };
    let detalles: HashMap<(String, i32), sop_fraccion_detalle::Model> = if sop_fracciones.is_empty() {
        HashMap::new()
    } else {
        SopFraccionDetalle::find()
            .filter(
                sop_fraccion_detalle::Column::SopFraccionId
                    .is_in(sop_fracciones.iter().map(|sf| sf.sop_fraccion_id.clone())),
            )
            .all(db)
            .await?
            .into_iter()
            .map(|d| ((d.sop_fraccion_id.clone(), d.nivel_limpieza_id), d))
            .collect()
    };

    let nivel_ids: HashSet<i32> = sop_tareas
        .iter()
        .filter_map(|t| t.nivel_limpieza_asignado.map(|n| n.id()))
        .collect();
    let metodologias = load_metodologias(
        db,
        sop_fracciones.iter().map(|sf| sf.fraccion_id.clone()).collect(),
        nivel_ids,
    )
    .await?;

    // ---- イベント ----
    let evento_ids: HashSet<String> = tareas.iter().filter_map(|t| t.sop_evento_id.clone()).collect();
    let (eventos, evento_detalles) = if evento_ids.is_empty() {
        (HashMap::new(), HashMap::new())
    } else {
        let eventos: HashMap<String, sop_evento::Model> = SopEvento::find()
            .filter(sop_evento::Column::SopEventoId.is_in(evento_ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|e| (e.sop_evento_id.clone(), e))
            .collect();
        let mut detalles: HashMap<String, Vec<sop_evento_detalle::Model>> = HashMap::new();
        for d in SopEventoDetalle::find()
            .filter(sop_evento_detalle::Column::SopEventoId.is_in(evento_ids))
            .order_by_asc(sop_evento_detalle::Column::Orden)
            .order_by_asc(sop_evento_detalle::Column::DetalleId)
            .all(db)
            .await?
        {
            detalles.entry(d.sop_evento_id.clone()).or_default().push(d);
        }
        (eventos, detalles)
    };

    // ---- カタログ ----
    let mut kit_ids = HashSet::new();
    let mut receta_ids = HashSet::new();
    let mut consumo_ids = HashSet::new();
    let mut set_ids = HashSet::new();
    for d in detalles.values() {
        kit_ids.extend(d.kit_id.clone());
        receta_ids.extend(d.receta_id.clone());
        consumo_ids.extend(d.consumo_id.clone());
        set_ids.extend(d.elemento_set_id.clone());
    }
    for d in evento_detalles.values().flatten() {
        kit_ids.extend(d.kit_id.clone());
        receta_ids.extend(d.receta_id.clone());
        consumo_ids.extend(d.consumo_id.clone());
    }
    let catalogo = Catalogo::load(db, kit_ids, receta_ids, consumo_ids, set_ids).await?;

    let areas: HashMap<String, area::Model> = Area::find()
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.area_id.clone(), a))
        .collect();
    let subareas: HashMap<String, sub_area::Model> = SubArea::find()
        .filter(sub_area::Column::SubareaId.is_in(sop_tareas.iter().filter_map(|t| t.subarea_id.clone())))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.subarea_id.clone(), s))
        .collect();

    // ---- 組み立て ----
    let mut reporte = Vec::new();
    for t in &tareas {
        let checked_at = checks.get(&t.tarea_id).cloned();
        match t.tipo_tarea {
            TipoTarea::Sop => {
                let (Some(area), Some(subarea)) = (
                    t.area_id.as_ref().and_then(|id| areas.get(id)),
                    t.subarea_id.as_ref().and_then(|id| subareas.get(id)),
                ) else {
                    continue;
                };
                let sop = match &t.sop_id {
                    Some(id) => sops_por_id.get(id),
                    None => sops_regulares.get(&subarea.subarea_id),
                };
                let (Some(sop), Some(nivel)) = (sop, t.nivel_limpieza_asignado) else {
                    continue;
                };

                let mut filas = Vec::new();
                let mut total = 0.0;
                for sf in sop_fracciones.iter().filter(|sf| sf.sop_id == sop.sop_id) {
                    let Some(sd) = detalles.get(&(sf.sop_fraccion_id.clone(), nivel.id())) else {
                        continue;
                    };
                    let Some(met) = metodologias.get(&(sf.fraccion_id.clone(), nivel.id())) else {
                        continue;
                    };
                    if let Some(min) = sd.tiempo_unitario_min {
                        total += min;
                    }
                    let tabla = match &sd.elemento_set_id {
                        Some(set_id) => catalogo.tabla_elementos(set_id),
                        None => catalogo.tabla_directa(sd.kit_id.as_ref(), sd.receta_id.as_ref(), sd.consumo_id.as_ref()),
                    };
                    let fr = fracciones.get(&sf.fraccion_id);
                    filas.push(FraccionReporte {
                        orden: sf.orden,
                        fraccion_id: Some(sf.fraccion_id.clone()),
                        fraccion_nombre: fr.map(|f| f.fraccion_nombre.clone()).unwrap_or_default(),
                        nivel: nivel.as_str().to_string(),
                        tiempo_min: sd.tiempo_unitario_min.map(round2),
                        metodologia: Some(met.clone()),
                        tabla: Some(tabla),
                        nota_tecnica: fr.and_then(|f| f.nota_tecnica.clone()),
                    });
                }

                reporte.push(TareaReporte {
                    tarea_id: t.tarea_id,
                    tipo_tarea: t.tipo_tarea,
                    area: area.area_nombre.clone(),
                    subarea: subarea.subarea_nombre.clone(),
                    nivel: nivel.as_str().to_string(),
                    tiempo_total_min: round2(total),
                    observacion_critica: sop.observacion_critica_sop.clone(),
                    fracciones: filas,
                    es_adicional: t.es_adicional,
                    sop_id: Some(sop.sop_id.clone()),
                    checked_at,
                    sort_key: (t.orden, area.orden_area, subarea.orden_subarea),
                });
            }
            tipo => {
                let evento = t.sop_evento_id.as_ref().and_then(|id| eventos.get(id));
                let pasos = t
                    .sop_evento_id
                    .as_ref()
                    .and_then(|id| evento_detalles.get(id))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);

                let fracciones_evento: Vec<FraccionReporte> = pasos
                    .iter()
                    .map(|d| {
                        let con_recursos = d.kit_id.is_some() || d.receta_id.is_some() || d.consumo_id.is_some();
                        FraccionReporte {
                            orden: d.orden,
                            fraccion_id: None,
                            fraccion_nombre: d.descripcion.clone(),
                            nivel: SIN_DATO.to_string(),
                            tiempo_min: Some(round2(d.tiempo_estimado)),
                            metodologia: None,
                            tabla: con_recursos.then(|| {
                                catalogo.tabla_directa(d.kit_id.as_ref(), d.receta_id.as_ref(), d.consumo_id.as_ref())
                            }),
                            nota_tecnica: None,
                        }
                    })
                    .collect();

                let event_minutes = (!pasos.is_empty()).then(|| pasos.iter().map(|d| d.tiempo_estimado).sum());
                let subarea = match (tipo, evento) {
                    (TipoTarea::Evento, Some(e)) => format!("EVENTO: {}", e.nombre),
                    (TipoTarea::Evento, None) => continue,
                    _ => tipo.label().to_uppercase(),
                };

                reporte.push(TareaReporte {
                    tarea_id: t.tarea_id,
                    tipo_tarea: tipo,
                    area: SIN_DATO.to_string(),
                    subarea,
                    nivel: SIN_DATO.to_string(),
                    tiempo_total_min: round2(schedule_service::task_minutes(tipo, None, event_minutes)),
                    observacion_critica: evento.and_then(|e| e.descripcion.clone()),
                    fracciones: fracciones_evento,
                    es_adicional: false,
                    sop_id: None,
                    checked_at,
                    sort_key: (t.orden, 0, 0),
                });
            }
        }
    }

    reporte.sort_by_key(|r| r.sort_key);

    let total_tareas = reporte.len();
    let completadas = reporte.iter().filter(|r| r.checked_at.is_some()).count();

    Ok(DayReport {
        persona,
        fecha,
        tareas: reporte,
        total_tareas,
        completadas,
        progreso_pct: progress_pct(completadas, total_tareas),
        puede_hacer_check,
    })
}

/// operativo の「今日のルート」
#[derive(Debug, Serialize)]
pub struct MyRoute {
    pub hoy: NaiveDate,
    pub tareas: Vec<TareaVista>,
    pub tiempo_total: f64,
    pub total_tareas: usize,
    pub completadas: usize,
    pub progreso_pct: i64,
}

pub async fn my_route(db: &impl ConnectionTrait, personal_id: &str, hoy: NaiveDate) -> Result<MyRoute, DbErr> {
    let tareas = match schedule_service::find_dia(db, hoy).await? {
        Some(dia) => {
            LanzamientoTarea::find()
                .filter(lanzamiento_tarea::Column::DiaId.eq(dia.dia_id))
                .filter(lanzamiento_tarea::Column::PersonalId.eq(personal_id))
                .all(db)
                .await?
        }
        None => Vec::new(),
    };

    let vistas = schedule_service::load_task_views(db, tareas).await?;
    let total_tareas = vistas.len();
    let completadas = vistas.iter().filter(|v| v.checked_at.is_some()).count();

    Ok(MyRoute {
        hoy,
        tiempo_total: round2(vistas.iter().map(|v| v.minutos).sum()),
        total_tareas,
        completadas,
        progreso_pct: progress_pct(completadas, total_tareas),
        tareas: vistas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::Role;

    fn usuario(role: Role, personal_id: Option<&str>) -> user::Model {
        user::Model {
            id: 1,
            username: "u".into(),
            password_hash: String::new(),
            role,
            is_active: true,
            personal_id: personal_id.map(str::to_string),
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_admin_sees_any_report_without_checks() {
        let admin = usuario(Role::Admin, None);
        assert_eq!(authorize_report(&admin, "P-01", d(3), d(10)).unwrap(), false);
    }

    #[test]
    fn test_operativo_only_own_report_today() {
        let op = usuario(Role::Operativo, Some("P-01"));
        assert_eq!(authorize_report(&op, "P-01", d(10), d(10)).unwrap(), true);
        assert!(matches!(authorize_report(&op, "P-02", d(10), d(10)), Err(AppError::Forbidden)));
        assert!(matches!(authorize_report(&op, "P-01", d(9), d(10)), Err(AppError::Forbidden)));
    }
}
