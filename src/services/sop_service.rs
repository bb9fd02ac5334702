use sea_orm::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::ids::{make_es_id, make_sd_id, make_sf_id, make_sop_id};
use crate::domain::nivel::Nivel;
use crate::domain::tipos::TipoSop;
use crate::entities::{
    area, consumo, elemento, elemento_detalle, elemento_set, fraccion, kit, metodologia, metodologia_base,
    metodologia_base_paso, prelude::*, receta, sop, sop_fraccion, sop_fraccion_detalle, sub_area,
};
use crate::errors::AppError;

/// 並び順の既定値 (未指定)
const ORDEN_POR_DEFECTO: i32 = 1000;

// ---------------------------------------------------------------------------
// パネル
// ---------------------------------------------------------------------------

/// SOP パネル: エリア → サブエリア → (種別, レベル) を選んで SOP の有無を見る
#[derive(Debug, Serialize)]
pub struct SopPanel {
    pub areas: Vec<area::Model>,
    pub subareas: Vec<sub_area::Model>,
    pub area_id: Option<String>,
    pub subarea_id: Option<String>,
    pub tipo_sop: TipoSop,
    pub nivel: Nivel,
    pub sop: Option<sop::Model>,
    pub has_fracciones: bool,
    pub has_nivel: bool,
}

/// SOP の (sop_fraccion_id, fraccion_id, orden) のうち、指定レベルの明細を持つもの
async fn fracciones_con_nivel(
    db: &impl ConnectionTrait,
    sop_id: &str,
    nivel: Nivel,
) -> Result<Vec<sop_fraccion::Model>, DbErr> {
    let sfs = SopFraccion::find()
        .filter(sop_fraccion::Column::SopId.eq(sop_id))
        .order_by_asc(sop_fraccion::Column::Orden)
        .order_by_asc(sop_fraccion::Column::SopFraccionId)
        .all(db)
        .await?;
    if sfs.is_empty() {
        return Ok(sfs);
    }
    let con_detalle: HashSet<String> = SopFraccionDetalle::find()
        .filter(sop_fraccion_detalle::Column::SopFraccionId.is_in(sfs.iter().map(|sf| sf.sop_fraccion_id.clone())))
        .filter(sop_fraccion_detalle::Column::NivelLimpiezaId.eq(nivel.id()))
        .all(db)
        .await?
        .into_iter()
        .map(|d| d.sop_fraccion_id)
        .collect();
    Ok(sfs
        .into_iter()
        .filter(|sf| con_detalle.contains(&sf.sop_fraccion_id))
        .collect())
}

pub async fn panel(
    db: &impl ConnectionTrait,
    area_id: Option<&str>,
    subarea_id: Option<&str>,
    tipo_sop: TipoSop,
    nivel: Nivel,
) -> Result<SopPanel, DbErr> {
    let areas = Area::find()
        .order_by_asc(area::Column::OrdenArea)
        .order_by_asc(area::Column::AreaNombre)
        .all(db)
        .await?;

    let subareas = match area_id {
        Some(area_id) => {
            SubArea::find()
                .filter(sub_area::Column::AreaId.eq(area_id))
                .order_by_asc(sub_area::Column::OrdenSubarea)
                .order_by_asc(sub_area::Column::SubareaNombre)
                .all(db)
                .await?
        }
        None => Vec::new(),
    };

    let sop = match subarea_id {
        Some(subarea_id) => find_by_subarea(db, subarea_id, tipo_sop).await?,
        None => None,
    };

    let (has_fracciones, has_nivel) = match &sop {
        Some(s) => {
            let total = SopFraccion::find()
                .filter(sop_fraccion::Column::SopId.eq(s.sop_id.as_str()))
                .count(db)
                .await?;
            let nivel_ok = !fracciones_con_nivel(db, &s.sop_id, nivel).await?.is_empty();
            (total > 0, nivel_ok)
        }
        None => (false, false),
    };

    Ok(SopPanel {
        areas,
        subareas,
        area_id: area_id.map(str::to_string),
        subarea_id: subarea_id.map(str::to_string),
        tipo_sop,
        nivel,
        sop,
        has_fracciones,
        has_nivel,
    })
}

pub async fn find_by_subarea(
    db: &impl ConnectionTrait,
    subarea_id: &str,
    tipo_sop: TipoSop,
) -> Result<Option<sop::Model>, DbErr> {
    Sop::find()
        .filter(sop::Column::SubareaId.eq(subarea_id))
        .filter(sop::Column::TipoSop.eq(tipo_sop))
        .one(db)
        .await
}

/// `/api/verificar_sop` 用。存在すれば SOP ID を返す。
pub async fn sop_exists(
    db: &impl ConnectionTrait,
    subarea_id: &str,
    tipo_sop: TipoSop,
) -> Result<Option<String>, DbErr> {
    Ok(find_by_subarea(db, subarea_id, tipo_sop).await?.map(|s| s.sop_id))
}

#[derive(Debug, Serialize)]
pub struct SubareaSop {
    pub id: String,
    pub nombre: String,
    pub tiene_regular: bool,
    pub tiene_consecuente: bool,
}

/// エリア内のサブエリアと、それぞれの SOP 有無
pub async fn subareas_con_sop(db: &impl ConnectionTrait, area_id: &str) -> Result<Vec<SubareaSop>, DbErr> {
    let subareas = SubArea::find()
        .filter(sub_area::Column::AreaId.eq(area_id))
        .order_by_asc(sub_area::Column::OrdenSubarea)
        .all(db)
        .await?;
    if subareas.is_empty() {
        return Ok(Vec::new());
    }

    let sops: HashSet<(String, TipoSop)> = Sop::find()
        .filter(sop::Column::SubareaId.is_in(subareas.iter().map(|s| s.subarea_id.clone())))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.subarea_id, s.tipo_sop))
        .collect();

    Ok(subareas
        .into_iter()
        .map(|s| SubareaSop {
            tiene_regular: sops.contains(&(s.subarea_id.clone(), TipoSop::Regular)),
            tiene_consecuente: sops.contains(&(s.subarea_id.clone(), TipoSop::Consecuente)),
            id: s.subarea_id,
            nombre: s.subarea_nombre,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// フラクション選択
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct FraccionOpcion {
    #[serde(flatten)]
    pub fraccion: fraccion::Model,
    pub seleccionada: bool,
    pub orden: i32,
}

/// レベルごとのフラクション選択画面
#[derive(Debug, Serialize)]
pub struct FraccionesEditor {
    pub subarea: sub_area::Model,
    pub sop_id: String,
    pub sop: Option<sop::Model>,
    pub tipo_sop: TipoSop,
    pub nivel: Nivel,
    pub fracciones: Vec<FraccionOpcion>,
}

/// 選択可能なフラクションは、そのレベルの方法論があるもの。
/// extraordinario は profundo の方法論も使える。
fn niveles_validos(nivel: Nivel) -> Vec<i32> {
    match nivel {
        Nivel::Extraordinario => vec![Nivel::Profundo.id(), Nivel::Extraordinario.id()],
        n => vec![n.id()],
    }
}

pub async fn fracciones_editor(
    db: &impl ConnectionTrait,
    subarea_id: &str,
    tipo_sop: TipoSop,
    nivel: Nivel,
) -> Result<FraccionesEditor, AppError> {
    let subarea = SubArea::find_by_id(subarea_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Subárea no encontrada".into()))?;

    let sop_id = make_sop_id(subarea_id, tipo_sop);
    let sop = Sop::find_by_id(sop_id.clone()).one(db).await?;

    let con_metodologia: HashSet<String> = Metodologia::find()
        .filter(metodologia::Column::NivelLimpiezaId.is_in(niveles_validos(nivel)))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.fraccion_id)
        .collect();

    let seleccion: HashMap<String, i32> = match &sop {
        Some(s) => fracciones_con_nivel(db, &s.sop_id, nivel)
            .await?
            .into_iter()
            .map(|sf| (sf.fraccion_id, sf.orden))
            .collect(),
        None => HashMap::new(),
    };

    let fracciones = Fraccion::find()
        .order_by_asc(fraccion::Column::FraccionId)
        .all(db)
        .await?
        .into_iter()
        .filter(|f| con_metodologia.contains(&f.fraccion_id))
        .map(|f| FraccionOpcion {
            seleccionada: seleccion.contains_key(&f.fraccion_id),
            orden: seleccion.get(&f.fraccion_id).copied().unwrap_or(ORDEN_POR_DEFECTO),
            fraccion: f,
        })
        .collect();

    Ok(FraccionesEditor {
        subarea,
        sop_id,
        tipo_sop: sop.as_ref().map_or(tipo_sop, |s| s.tipo_sop),
        sop,
        nivel,
        fracciones,
    })
}

/// 選択されたフラクション 1 件
#[derive(Debug, Clone)]
pub struct FraccionSeleccion {
    pub fraccion_id: String,
    pub orden: Option<i32>,
}

/// 要素セットを明細ごと消す
async fn delete_elemento_set(db: &impl ConnectionTrait, elemento_set_id: &str) -> Result<(), DbErr> {
    ElementoDetalle::delete_many()
        .filter(elemento_detalle::Column::ElementoSetId.eq(elemento_set_id))
        .exec(db)
        .await?;
    ElementoSet::delete_by_id(elemento_set_id.to_string()).exec(db).await?;
    Ok(())
}

/// レベルのフラクション構成を保存する。
/// SOP が無ければ作成。外したフラクションはそのレベルの明細 (と要素セット) を消し、
/// どのレベルにも明細が残らない SopFraccion は削除する。
pub async fn save_fracciones(
    db: &DatabaseConnection,
    subarea_id: &str,
    tipo_sop: TipoSop,
    nivel: Nivel,
    seleccion: &[FraccionSeleccion],
) -> Result<sop::Model, AppError> {
    if seleccion.is_empty() {
        return Err(AppError::BadRequest("Selecciona al menos 1 fracción.".into()));
    }

    let txn = db.begin().await?;

    if SubArea::find_by_id(subarea_id.to_string()).one(&txn).await?.is_none() {
        return Err(AppError::NotFound("Subárea no encontrada".into()));
    }

    let fraccion_ids: HashSet<&str> = seleccion.iter().map(|s| s.fraccion_id.as_str()).collect();
    let existentes = Fraccion::find()
        .filter(fraccion::Column::FraccionId.is_in(fraccion_ids.iter().copied()))
        .count(&txn)
        .await?;
    if existentes as usize != fraccion_ids.len() {
        return Err(AppError::BadRequest("Fracción inválida.".into()));
    }

    let sop_id = make_sop_id(subarea_id, tipo_sop);
    let sop = match Sop::find_by_id(sop_id.clone()).one(&txn).await? {
        Some(s) => s,
        None => {
            sop::ActiveModel {
                sop_id: Set(sop_id.clone()),
                subarea_id: Set(subarea_id.to_string()),
                tipo_sop: Set(tipo_sop),
                observacion_critica_sop: Set(None),
            }
            .insert(&txn)
            .await?
        }
    };

    // 外されたフラクション
    let previas = fracciones_con_nivel(&txn, &sop.sop_id, nivel).await?;
    for sf in previas.iter().filter(|sf| !fraccion_ids.contains(sf.fraccion_id.as_str())) {
        SopFraccionDetalle::delete_many()
            .filter(sop_fraccion_detalle::Column::SopFraccionId.eq(sf.sop_fraccion_id.as_str()))
            .filter(sop_fraccion_detalle::Column::NivelLimpiezaId.eq(nivel.id()))
            .exec(&txn)
            .await?;
        delete_elemento_set(&txn, &make_es_id(&sop.sop_id, &sf.fraccion_id, nivel)).await?;

        let restantes = SopFraccionDetalle::find()
            .filter(sop_fraccion_detalle::Column::SopFraccionId.eq(sf.sop_fraccion_id.as_str()))
            .count(&txn)
            .await?;
        if restantes == 0 {
            SopFraccion::delete_by_id(sf.sop_fraccion_id.clone()).exec(&txn).await?;
        }
    }

    for s in seleccion {
        let orden = s.orden.unwrap_or(ORDEN_POR_DEFECTO);
        let existente = SopFraccion::find()
            .filter(sop_fraccion::Column::SopId.eq(sop.sop_id.as_str()))
            .filter(sop_fraccion::Column::FraccionId.eq(s.fraccion_id.as_str()))
            .one(&txn)
            .await?;
        let sf = match existente {
            Some(sf) => {
                let mut active: sop_fraccion::ActiveModel = sf.into();
                active.orden = Set(orden);
                active.update(&txn).await?
            }
            None => {
                sop_fraccion::ActiveModel {
                    sop_fraccion_id: Set(make_sf_id(&sop.sop_id, &s.fraccion_id)),
                    sop_id: Set(sop.sop_id.clone()),
                    fraccion_id: Set(s.fraccion_id.clone()),
                    orden: Set(orden),
                }
                .insert(&txn)
                .await?
            }
        };

        let tiene_detalle = SopFraccionDetalle::find()
            .filter(sop_fraccion_detalle::Column::SopFraccionId.eq(sf.sop_fraccion_id.as_str()))
            .filter(sop_fraccion_detalle::Column::NivelLimpiezaId.eq(nivel.id()))
            .one(&txn)
            .await?
            .is_some();
        if !tiene_detalle {
            sop_fraccion_detalle::ActiveModel {
                sop_fraccion_detalle_id: Set(make_sd_id(&sop.sop_id, &s.fraccion_id, nivel)),
                sop_fraccion_id: Set(sf.sop_fraccion_id.clone()),
                nivel_limpieza_id: Set(nivel.id()),
                kit_id: Set(None),
                receta_id: Set(None),
                elemento_set_id: Set(None),
                consumo_id: Set(None),
                tiempo_unitario_min: Set(None),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    tracing::info!(sop_id = %sop.sop_id, nivel = nivel.as_str(), fracciones = seleccion.len(), "sop fractions saved");
    Ok(sop)
}

// ---------------------------------------------------------------------------
// 明細エディタ
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SfVista {
    pub sop_fraccion_id: String,
    pub fraccion_id: String,
    pub fraccion_nombre: String,
    pub orden: i32,
}

#[derive(Debug, Serialize)]
pub struct MetodologiaBaseVista {
    #[serde(flatten)]
    pub base: metodologia_base::Model,
    pub pasos: Vec<metodologia_base_paso::Model>,
}

/// 要素セット編集用の行 (サブエリアの要素ごと)
#[derive(Debug, Serialize)]
pub struct ElementoFila {
    #[serde(flatten)]
    pub elemento: elemento::Model,
    pub detalle: Option<elemento_detalle::Model>,
}

#[derive(Debug, Serialize)]
pub struct DetailEditor {
    pub sop: sop::Model,
    pub subarea: sub_area::Model,
    pub nivel: Nivel,
    pub fracciones: Vec<SfVista>,
    pub actual: SfVista,
    pub detalle: sop_fraccion_detalle::Model,
    pub modo_elementos: bool,
    pub metodologia: Option<MetodologiaBaseVista>,
    pub kits: Vec<kit::Model>,
    pub recetas: Vec<receta::Model>,
    pub consumos: Vec<consumo::Model>,
    pub elementos: Vec<ElementoFila>,
}

pub async fn find_sop(db: &impl ConnectionTrait, sop_id: &str) -> Result<sop::Model, AppError> {
    Sop::find_by_id(sop_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("SOP no encontrado.".into()))
}

async fn find_detalle(
    db: &impl ConnectionTrait,
    sop_fraccion_id: &str,
    nivel: Nivel,
) -> Result<Option<sop_fraccion_detalle::Model>, DbErr> {
    SopFraccionDetalle::find()
        .filter(sop_fraccion_detalle::Column::SopFraccionId.eq(sop_fraccion_id))
        .filter(sop_fraccion_detalle::Column::NivelLimpiezaId.eq(nivel.id()))
        .one(db)
        .await
}

/// キット候補: そのフラクション用で、レベル指定なしか同じレベル
async fn kits_para(db: &impl ConnectionTrait, fraccion_id: &str, nivel: Nivel) -> Result<Vec<kit::Model>, DbErr> {
    Kit::find()
        .filter(kit::Column::FraccionId.eq(fraccion_id))
        .filter(
            Condition::any()
                .add(kit::Column::NivelLimpiezaId.is_null())
                .add(kit::Column::NivelLimpiezaId.eq(nivel.id())),
        )
        .order_by_asc(kit::Column::Nombre)
        .all(db)
        .await
}

/// 1 つのフラクション・レベルの明細編集画面。
/// `sop_fraccion_id` が無い (または合わない) ときは最初のフラクション。
pub async fn detail_editor(
    db: &impl ConnectionTrait,
    sop_id: &str,
    nivel: Nivel,
    sop_fraccion_id: Option<&str>,
) -> Result<DetailEditor, AppError> {
    let sop = find_sop(db, sop_id).await?;
    let subarea = SubArea::find_by_id(sop.subarea_id.clone())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Subárea no encontrada".into()))?;

    let sfs = fracciones_con_nivel(db, &sop.sop_id, nivel).await?;
    if sfs.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Este SOP no tiene fracciones para el nivel {}.",
            nivel.label()
        )));
    }

    let nombres: HashMap<String, String> = Fraccion::find()
        .filter(fraccion::Column::FraccionId.is_in(sfs.iter().map(|sf| sf.fraccion_id.clone())))
        .all(db)
        .await?
        .into_iter()
        .map(|f| (f.fraccion_id, f.fraccion_nombre))
        .collect();
    let fracciones: Vec<SfVista> = sfs
        .into_iter()
        .map(|sf| SfVista {
            fraccion_nombre: nombres.get(&sf.fraccion_id).cloned().unwrap_or_default(),
            sop_fraccion_id: sf.sop_fraccion_id,
            fraccion_id: sf.fraccion_id,
            orden: sf.orden,
        })
        .collect();

    let actual = sop_fraccion_id
        .and_then(|id| fracciones.iter().find(|f| f.sop_fraccion_id == id))
        .unwrap_or(&fracciones[0])
        .clone();

    let detalle = find_detalle(db, &actual.sop_fraccion_id, nivel)
        .await?
        .ok_or_else(|| AppError::NotFound("Detalle no encontrado".into()))?;

    let metodologia = match Metodologia::find_by_id((actual.fraccion_id.clone(), nivel.id()))
        .one(db)
        .await?
    {
        Some(m) => match MetodologiaBase::find_by_id(m.metodologia_base_id.clone()).one(db).await? {
            Some(base) => {
                let pasos = MetodologiaBasePaso::find()
                    .filter(metodologia_base_paso::Column::MetodologiaBaseId.eq(base.metodologia_base_id.as_str()))
                    .order_by_asc(metodologia_base_paso::Column::Orden)
                    .all(db)
                    .await?;
                Some(MetodologiaBaseVista { base, pasos })
            }
            None => None,
        },
        None => None,
    };

    let lineas: HashMap<String, elemento_detalle::Model> = match &detalle.elemento_set_id {
        Some(set_id) => ElementoDetalle::find()
            .filter(elemento_detalle::Column::ElementoSetId.eq(set_id.as_str()))
            .all(db)
            .await?
            .into_iter()
            .map(|d| (d.elemento_id.clone(), d))
            .collect(),
        None => HashMap::new(),
    };
    let elementos = Elemento::find()
        .filter(elemento::Column::SubareaId.eq(subarea.subarea_id.as_str()))
        .order_by_asc(elemento::Column::ElementoId)
        .all(db)
        .await?
        .into_iter()
        .map(|e| ElementoFila {
            detalle: lineas.get(&e.elemento_id).cloned(),
            elemento: e,
        })
        .collect();

    Ok(DetailEditor {
        kits: kits_para(db, &actual.fraccion_id, nivel).await?,
        recetas: Receta::find().order_by_asc(receta::Column::Nombre).all(db).await?,
        consumos: Consumo::find().order_by_asc(consumo::Column::ConsumoId).all(db).await?,
        modo_elementos: detalle.elemento_set_id.is_some(),
        sop,
        subarea,
        nivel,
        fracciones,
        actual,
        detalle,
        metodologia,
        elementos,
    })
}

/// 要素セットの 1 行
#[derive(Debug, Clone, Default)]
pub struct ElementoLinea {
    pub elemento_id: String,
    pub orden: Option<i32>,
    pub kit_id: Option<String>,
    pub receta_id: Option<String>,
    pub consumo_id: Option<String>,
}

/// 明細の資源指定。直接指定と要素セットは排他
#[derive(Debug, Clone)]
pub enum DetailMode {
    Directo {
        kit_id: Option<String>,
        receta_id: Option<String>,
        consumo_id: Option<String>,
    },
    Elementos {
        lineas: Vec<ElementoLinea>,
    },
}

#[derive(Debug, Clone)]
pub struct DetailInput {
    pub tiempo_unitario_min: Option<f64>,
    pub mode: DetailMode,
}

async fn check_recursos(
    db: &impl ConnectionTrait,
    kit_id: Option<&str>,
    receta_id: Option<&str>,
    consumo_id: Option<&str>,
) -> Result<(), AppError> {
    if let Some(id) = kit_id {
        if Kit::find_by_id(id.to_string()).one(db).await?.is_none() {
            return Err(AppError::BadRequest(format!("El kit {} no existe.", id)));
        }
    }
    if let Some(id) = receta_id {
        if Receta::find_by_id(id.to_string()).one(db).await?.is_none() {
            return Err(AppError::BadRequest(format!("La receta {} no existe.", id)));
        }
    }
    if let Some(id) = consumo_id {
        if Consumo::find_by_id(id.to_string()).one(db).await?.is_none() {
            return Err(AppError::BadRequest(format!("El consumo {} no existe.", id)));
        }
    }
    Ok(())
}

/// 明細を保存する。
/// 直接モードでは要素セットを外し、要素モードでは kit/receta/consumo を空にして
/// `ES-…` の要素セットを (無ければ作って) 行ごと置き換える。
pub async fn save_detail(
    db: &DatabaseConnection,
    sop_id: &str,
    sop_fraccion_id: &str,
    nivel: Nivel,
    input: DetailInput,
) -> Result<sop_fraccion_detalle::Model, AppError> {
    if input.tiempo_unitario_min.is_some_and(|t| !t.is_finite() || t < 0.0) {
        return Err(AppError::BadRequest("Tiempo inválido.".into()));
    }

    let txn = db.begin().await?;

    let sop = find_sop(&txn, sop_id).await?;
    let sf = SopFraccion::find_by_id(sop_fraccion_id.to_string())
        .filter(sop_fraccion::Column::SopId.eq(sop.sop_id.as_str()))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Fracción no encontrada en este SOP.".into()))?;
    let detalle = find_detalle(&txn, &sf.sop_fraccion_id, nivel)
        .await?
        .ok_or_else(|| AppError::NotFound("Detalle no encontrado".into()))?;
    let set_anterior = detalle.elemento_set_id.clone();

    let mut active: sop_fraccion_detalle::ActiveModel = detalle.into();
    active.tiempo_unitario_min = Set(input.tiempo_unitario_min);

    match input.mode {
        DetailMode::Directo {
            kit_id,
            receta_id,
            consumo_id,
        } => {
            check_recursos(&txn, kit_id.as_deref(), receta_id.as_deref(), consumo_id.as_deref()).await?;
            active.elemento_set_id = Set(None);
            active.kit_id = Set(kit_id);
            active.receta_id = Set(receta_id);
            active.consumo_id = Set(consumo_id);
            let guardado = active.update(&txn).await?;
            if let Some(set_id) = set_anterior {
                delete_elemento_set(&txn, &set_id).await?;
            }
            txn.commit().await?;
            Ok(guardado)
        }
        DetailMode::Elementos { lineas } => {
            let subarea = SubArea::find_by_id(sop.subarea_id.clone())
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Subárea no encontrada".into()))?;
            let fraccion = Fraccion::find_by_id(sf.fraccion_id.clone())
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Fracción no encontrada".into()))?;

            let validos: HashSet<String> = Elemento::find()
                .filter(elemento::Column::SubareaId.eq(subarea.subarea_id.as_str()))
                .all(&txn)
                .await?
                .into_iter()
                .map(|e| e.elemento_id)
                .collect();
            let mut vistos: HashSet<&str> = HashSet::new();
            for l in &lineas {
                if !vistos.insert(l.elemento_id.as_str()) {
                    return Err(AppError::BadRequest(format!(
                        "El elemento {} está repetido.",
                        l.elemento_id
                    )));
                }
                if !validos.contains(&l.elemento_id) {
                    return Err(AppError::BadRequest(format!(
                        "El elemento {} no pertenece a esta subárea.",
                        l.elemento_id
                    )));
                }
                check_recursos(&txn, l.kit_id.as_deref(), l.receta_id.as_deref(), l.consumo_id.as_deref()).await?;
            }

            let es_id = make_es_id(&sop.sop_id, &sf.fraccion_id, nivel);
            if ElementoSet::find_by_id(es_id.clone()).one(&txn).await?.is_none() {
                elemento_set::ActiveModel {
                    elemento_set_id: Set(es_id.clone()),
                    subarea_id: Set(subarea.subarea_id.clone()),
                    fraccion_id: Set(fraccion.fraccion_id.clone()),
                    nivel_limpieza_id: Set(nivel.id()),
                    nombre: Set(format!(
                        "{} · {} ({})",
                        subarea.subarea_nombre,
                        fraccion.fraccion_nombre,
                        nivel.as_str()
                    )),
                }
                .insert(&txn)
                .await?;
            }

            active.elemento_set_id = Set(Some(es_id.clone()));
            active.kit_id = Set(None);
            active.receta_id = Set(None);
            active.consumo_id = Set(None);
            let guardado = active.update(&txn).await?;

            ElementoDetalle::delete_many()
                .filter(elemento_detalle::Column::ElementoSetId.eq(es_id.as_str()))
                .exec(&txn)
                .await?;
            if !lineas.is_empty() {
                let rows = lineas.into_iter().map(|l| elemento_detalle::ActiveModel {
                    elemento_set_id: Set(es_id.clone()),
                    elemento_id: Set(l.elemento_id),
                    receta_id: Set(l.receta_id),
                    kit_id: Set(l.kit_id),
                    consumo_id: Set(l.consumo_id),
                    orden: Set(l.orden.unwrap_or(ORDEN_POR_DEFECTO)),
                });
                ElementoDetalle::insert_many(rows).exec(&txn).await?;
            }
            if let Some(set_id) = set_anterior.filter(|s| *s != es_id) {
                delete_elemento_set(&txn, &set_id).await?;
            }

            txn.commit().await?;
            tracing::info!(sop_id = %sop.sop_id, elemento_set = %es_id, "element set saved");
            Ok(guardado)
        }
    }
}

/// SOP の重要注意事項を更新する
pub async fn set_observacion(db: &DatabaseConnection, sop_id: &str, observacion: Option<String>) -> Result<sop::Model, AppError> {
    let sop = find_sop(db, sop_id).await?;
    let mut active: sop::ActiveModel = sop.into();
    active.observacion_critica_sop = Set(observacion.filter(|o| !o.trim().is_empty()));
    Ok(active.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraordinario_accepts_profundo_methodologies() {
        assert_eq!(niveles_validos(Nivel::Extraordinario), vec![3, 4]);
        assert_eq!(niveles_validos(Nivel::Media), vec![2]);
    }
}
