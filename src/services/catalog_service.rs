use sea_orm::*;
use serde::Serialize;

use crate::domain::ids::{next_code, normalize_group, CodePrefix};
use crate::domain::nivel::Nivel;
use crate::entities::{
    consumo, elemento, fraccion, herramienta, kit, kit_detalle, metodologia, metodologia_base, metodologia_base_paso,
    prelude::*, quimico, receta, receta_detalle, sop_evento, sop_evento_detalle,
};
use crate::errors::AppError;

// ---------------------------------------------------------------------------
// 採番
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct NextId {
    pub next_id: String,
    pub grupo: String,
    pub numero: u32,
}

async fn codes_with_head<E, C>(db: &impl ConnectionTrait, col: C, head: &str) -> Result<Vec<String>, DbErr>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    E::find()
        .select_only()
        .column(col)
        .filter(col.starts_with(head))
        .into_tuple::<String>()
        .all(db)
        .await
}

/// `<PREFIX>-<GRUPO>-<nnn>` の次のコード。消費量はグループ固定 (`DS`)。
pub async fn next_id(db: &impl ConnectionTrait, prefix: CodePrefix, grupo: &str) -> Result<NextId, AppError> {
    let grupo = match prefix.fixed_group() {
        Some(fijo) => fijo.to_string(),
        None => normalize_group(grupo).map_err(|e| AppError::BadRequest(e.into()))?,
    };
    let head = format!("{}-{}-", prefix.as_str(), grupo);

    let existing = match prefix {
        CodePrefix::Quimico => codes_with_head::<Quimico, _>(db, quimico::Column::QuimicoId, &head).await?,
        CodePrefix::Receta => codes_with_head::<Receta, _>(db, receta::Column::RecetaId, &head).await?,
        CodePrefix::Herramienta => {
            codes_with_head::<Herramienta, _>(db, herramienta::Column::HerramientaId, &head).await?
        }
        CodePrefix::Kit => codes_with_head::<Kit, _>(db, kit::Column::KitId, &head).await?,
        CodePrefix::Fraccion => codes_with_head::<Fraccion, _>(db, fraccion::Column::FraccionId, &head).await?,
        CodePrefix::Consumo => codes_with_head::<Consumo, _>(db, consumo::Column::ConsumoId, &head).await?,
        CodePrefix::Elemento => codes_with_head::<Elemento, _>(db, elemento::Column::ElementoId, &head).await?,
    };

    let (next_id, numero) = next_code(prefix, &grupo, existing.iter().map(String::as_str));
    Ok(NextId { next_id, grupo, numero })
}

// ---------------------------------------------------------------------------
// キットの道具
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct KitLinea {
    #[serde(flatten)]
    pub detalle: kit_detalle::Model,
    pub herramienta: Option<herramienta::Model>,
}

pub async fn kit_lineas(db: &impl ConnectionTrait, kit_id: &str) -> Result<Vec<KitLinea>, DbErr> {
    Ok(KitDetalle::find()
        .filter(kit_detalle::Column::KitId.eq(kit_id))
        .order_by_asc(kit_detalle::Column::HerramientaId)
        .find_also_related(Herramienta)
        .all(db)
        .await?
        .into_iter()
        .map(|(detalle, herramienta)| KitLinea { detalle, herramienta })
        .collect())
}

/// キットに道具を追加 (既にあればメモだけ更新)
pub async fn add_kit_herramienta(
    db: &DatabaseConnection,
    kit_id: &str,
    herramienta_id: &str,
    nota: Option<String>,
) -> Result<kit_detalle::Model, AppError> {
    if Kit::find_by_id(kit_id.to_string()).one(db).await?.is_none() {
        return Err(AppError::NotFound("Kit no encontrado".into()));
    }
    if Herramienta::find_by_id(herramienta_id.to_string()).one(db).await?.is_none() {
        return Err(AppError::BadRequest(format!("La herramienta {} no existe.", herramienta_id)));
    }

    let nota = nota.filter(|n| !n.trim().is_empty());
    match KitDetalle::find_by_id((kit_id.to_string(), herramienta_id.to_string()))
        .one(db)
        .await?
    {
        Some(existing) => {
            let mut active: kit_detalle::ActiveModel = existing.into();
            active.nota = Set(nota);
            Ok(active.update(db).await?)
        }
        None => Ok(kit_detalle::ActiveModel {
            kit_id: Set(kit_id.to_string()),
            herramienta_id: Set(herramienta_id.to_string()),
            nota: Set(nota),
        }
        .insert(db)
        .await?),
    }
}

pub async fn remove_kit_herramienta(db: &DatabaseConnection, kit_id: &str, herramienta_id: &str) -> Result<(), AppError> {
    let res = KitDetalle::delete_by_id((kit_id.to_string(), herramienta_id.to_string()))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("La herramienta no está en el kit.".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// レシピの薬剤
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct RecetaLineaVista {
    #[serde(flatten)]
    pub detalle: receta_detalle::Model,
    pub quimico: Option<quimico::Model>,
}

/// レシピ行の入力
#[derive(Debug, Clone, Default)]
pub struct RecetaLinea {
    pub quimico_id: String,
    pub dosis: Option<f64>,
    pub unidad_dosis: Option<String>,
    pub volumen_base: Option<f64>,
    pub unidad_volumen: Option<String>,
    pub nota: Option<String>,
}

pub async fn receta_lineas(db: &impl ConnectionTrait, receta_id: &str) -> Result<Vec<RecetaLineaVista>, DbErr> {
    Ok(RecetaDetalle::find()
        .filter(receta_detalle::Column::RecetaId.eq(receta_id))
        .order_by_asc(receta_detalle::Column::QuimicoId)
        .find_also_related(Quimico)
        .all(db)
        .await?
        .into_iter()
        .map(|(detalle, quimico)| RecetaLineaVista { detalle, quimico })
        .collect())
}

fn blank_to_none(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// レシピに薬剤行を追加 (既にあれば上書き)
pub async fn upsert_receta_quimico(
    db: &DatabaseConnection,
    receta_id: &str,
    linea: RecetaLinea,
) -> Result<receta_detalle::Model, AppError> {
    if Receta::find_by_id(receta_id.to_string()).one(db).await?.is_none() {
        return Err(AppError::NotFound("Receta no encontrada".into()));
    }
    if Quimico::find_by_id(linea.quimico_id.clone()).one(db).await?.is_none() {
        return Err(AppError::BadRequest(format!("El químico {} no existe.", linea.quimico_id)));
    }
    if linea.dosis.is_some_and(|d| d < 0.0) || linea.volumen_base.is_some_and(|v| v < 0.0) {
        return Err(AppError::BadRequest("Dosis y volumen no pueden ser negativos.".into()));
    }

    let existing = RecetaDetalle::find_by_id((receta_id.to_string(), linea.quimico_id.clone()))
        .one(db)
        .await?;
    let mut active: receta_detalle::ActiveModel = match existing {
        Some(m) => m.into(),
        None => receta_detalle::ActiveModel {
            receta_id: Set(receta_id.to_string()),
            quimico_id: Set(linea.quimico_id.clone()),
            ..Default::default()
        },
    };
    let is_new = active.dosis.is_not_set();
    active.dosis = Set(linea.dosis);
    active.unidad_dosis = Set(blank_to_none(linea.unidad_dosis));
    active.volumen_base = Set(linea.volumen_base);
    active.unidad_volumen = Set(blank_to_none(linea.unidad_volumen));
    active.nota = Set(blank_to_none(linea.nota));

    Ok(if is_new { active.insert(db).await? } else { active.update(db).await? })
}

pub async fn remove_receta_quimico(db: &DatabaseConnection, receta_id: &str, quimico_id: &str) -> Result<(), AppError> {
    let res = RecetaDetalle::delete_by_id((receta_id.to_string(), quimico_id.to_string()))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("El químico no está en la receta.".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// 方法論 (フラクション × レベル)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MetodologiaNivel {
    pub nivel: Nivel,
    pub nivel_label: &'static str,
    pub base: Option<metodologia_base::Model>,
    pub pasos: Vec<metodologia_base_paso::Model>,
}

pub async fn pasos_de(db: &impl ConnectionTrait, metodologia_base_id: &str) -> Result<Vec<metodologia_base_paso::Model>, DbErr> {
    MetodologiaBasePaso::find()
        .filter(metodologia_base_paso::Column::MetodologiaBaseId.eq(metodologia_base_id))
        .order_by_asc(metodologia_base_paso::Column::Orden)
        .all(db)
        .await
}

/// フラクションの 4 レベル分の方法論
pub async fn metodologias_de(db: &impl ConnectionTrait, fraccion_id: &str) -> Result<Vec<MetodologiaNivel>, DbErr> {
    let links = Metodologia::find()
        .filter(metodologia::Column::FraccionId.eq(fraccion_id))
        .all(db)
        .await?;

    let mut out = Vec::with_capacity(Nivel::ALL.len());
    for nivel in Nivel::ALL {
        let link = links.iter().find(|m| m.nivel_limpieza_id == nivel.id());
        let (base, pasos) = match link {
            Some(l) => (
                MetodologiaBase::find_by_id(l.metodologia_base_id.clone()).one(db).await?,
                pasos_de(db, &l.metodologia_base_id).await?,
            ),
            None => (None, Vec::new()),
        };
        out.push(MetodologiaNivel {
            nivel,
            nivel_label: nivel.label(),
            base,
            pasos,
        });
    }
    Ok(out)
}

/// `FR-XX-NNN` → `MB-XX-NNN-{B|M|P|E}`
pub fn metodologia_base_id_for(fraccion_id: &str, nivel: Nivel) -> Option<String> {
    let partes: Vec<&str> = fraccion_id.split('-').collect();
    match partes.as_slice() {
        [_, codigo, numero] if !codigo.is_empty() && !numero.is_empty() => {
            Some(format!("MB-{}-{}-{}", codigo, numero, nivel.letter()))
        }
        _ => None,
    }
}

/// 手順を書き換えてフラクション・レベルに紐付ける。
/// 方法論ベースが無ければフラクション名から作る。
pub async fn save_metodologia(
    db: &DatabaseConnection,
    fraccion_id: &str,
    nivel: Nivel,
    pasos: &[String],
) -> Result<String, AppError> {
    let pasos: Vec<&str> = pasos.iter().map(|p| p.trim()).collect();
    if pasos.is_empty() {
        return Err(AppError::BadRequest("Debe haber al menos 1 paso".into()));
    }
    if pasos.iter().any(|p| p.is_empty()) {
        return Err(AppError::BadRequest("Todos los pasos deben tener instrucción".into()));
    }
    let base_id = metodologia_base_id_for(fraccion_id, nivel)
        .ok_or_else(|| AppError::BadRequest("Formato de fraccion_id inválido".into()))?;

    let txn = db.begin().await?;

    let fraccion = Fraccion::find_by_id(fraccion_id.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Fracción no encontrada".into()))?;

    if MetodologiaBase::find_by_id(base_id.clone()).one(&txn).await?.is_none() {
        metodologia_base::ActiveModel {
            metodologia_base_id: Set(base_id.clone()),
            nombre: Set(Some(format!("{}-{}", fraccion.fraccion_nombre, nivel.letter()))),
            descripcion: Set(Some(fraccion.fraccion_nombre.clone())),
        }
        .insert(&txn)
        .await?;
    }

    MetodologiaBasePaso::delete_many()
        .filter(metodologia_base_paso::Column::MetodologiaBaseId.eq(base_id.as_str()))
        .exec(&txn)
        .await?;
    let rows = pasos.iter().enumerate().map(|(i, p)| metodologia_base_paso::ActiveModel {
        metodologia_base_id: Set(base_id.clone()),
        orden: Set(i as i32 + 1),
        instruccion: Set(ToString::to_string(p)),
    });
    MetodologiaBasePaso::insert_many(rows).exec(&txn).await?;

    link_metodologia(&txn, fraccion_id, nivel, &base_id).await?;
    txn.commit().await?;

    tracing::info!(fraccion_id, nivel = nivel.as_str(), metodologia_base_id = %base_id, pasos = pasos.len(), "methodology saved");
    Ok(base_id)
}

async fn link_metodologia(
    db: &impl ConnectionTrait,
    fraccion_id: &str,
    nivel: Nivel,
    metodologia_base_id: &str,
) -> Result<metodologia::Model, DbErr> {
    match Metodologia::find_by_id((fraccion_id.to_string(), nivel.id())).one(db).await? {
        Some(existing) => {
            let mut active: metodologia::ActiveModel = existing.into();
            active.metodologia_base_id = Set(metodologia_base_id.to_string());
            active.update(db).await
        }
        None => {
            metodologia::ActiveModel {
                fraccion_id: Set(fraccion_id.to_string()),
                nivel_limpieza_id: Set(nivel.id()),
                metodologia_base_id: Set(metodologia_base_id.to_string()),
            }
            .insert(db)
            .await
        }
    }
}

/// 既存の方法論ベースをフラクション・レベルに割り当てる
pub async fn assign_metodologia(
    db: &DatabaseConnection,
    fraccion_id: &str,
    nivel: Nivel,
    metodologia_base_id: &str,
) -> Result<metodologia::Model, AppError> {
    if Fraccion::find_by_id(fraccion_id.to_string()).one(db).await?.is_none() {
        return Err(AppError::NotFound("Fracción no encontrada".into()));
    }
    if MetodologiaBase::find_by_id(metodologia_base_id.to_string()).one(db).await?.is_none() {
        return Err(AppError::BadRequest(format!("La metodología {} no existe.", metodologia_base_id)));
    }
    Ok(link_metodologia(db, fraccion_id, nivel, metodologia_base_id).await?)
}

pub async fn unassign_metodologia(db: &DatabaseConnection, fraccion_id: &str, nivel: Nivel) -> Result<(), AppError> {
    Metodologia::delete_by_id((fraccion_id.to_string(), nivel.id())).exec(db).await?;
    Ok(())
}

/// 方法論ベースの手順を 1 件追加 (末尾)
pub async fn add_paso(db: &DatabaseConnection, metodologia_base_id: &str, instruccion: &str) -> Result<metodologia_base_paso::Model, AppError> {
    let instruccion = instruccion.trim();
    if instruccion.is_empty() {
        return Err(AppError::BadRequest("La instrucción es obligatoria.".into()));
    }
    if MetodologiaBase::find_by_id(metodologia_base_id.to_string()).one(db).await?.is_none() {
        return Err(AppError::NotFound("Metodología no encontrada".into()));
    }
    let siguiente = pasos_de(db, metodologia_base_id)
        .await?
        .last()
        .map_or(1, |p| p.orden + 1);
    Ok(metodologia_base_paso::ActiveModel {
        metodologia_base_id: Set(metodologia_base_id.to_string()),
        orden: Set(siguiente),
        instruccion: Set(instruccion.to_string()),
    }
    .insert(db)
    .await?)
}

pub async fn delete_paso(db: &DatabaseConnection, metodologia_base_id: &str, orden: i32) -> Result<(), AppError> {
    let res = MetodologiaBasePaso::delete_by_id((metodologia_base_id.to_string(), orden))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Paso no encontrado".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// イベント SOP の明細
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct EventoDetalleInput {
    pub descripcion: String,
    pub orden: Option<i32>,
    pub tiempo_estimado: f64,
    pub kit_id: Option<String>,
    pub receta_id: Option<String>,
    pub consumo_id: Option<String>,
}

pub async fn evento_detalles(db: &impl ConnectionTrait, sop_evento_id: &str) -> Result<Vec<sop_evento_detalle::Model>, DbErr> {
    SopEventoDetalle::find()
        .filter(sop_evento_detalle::Column::SopEventoId.eq(sop_evento_id))
        .order_by_asc(sop_evento_detalle::Column::Orden)
        .order_by_asc(sop_evento_detalle::Column::DetalleId)
        .all(db)
        .await
}

/// 明細 ID は `<sop_evento_id>-D<nn>`
fn next_detalle_id(sop_evento_id: &str, existentes: &[sop_evento_detalle::Model]) -> String {
    let head = format!("{}-D", sop_evento_id);
    let n = existentes
        .iter()
        .filter_map(|d| d.detalle_id.strip_prefix(head.as_str()))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .map_or(1, |n| n + 1);
    format!("{}{:02}", head, n)
}

pub async fn add_evento_detalle(
    db: &DatabaseConnection,
    sop_evento_id: &str,
    input: EventoDetalleInput,
) -> Result<sop_evento_detalle::Model, AppError> {
    let descripcion = input.descripcion.trim().to_string();
    if descripcion.is_empty() {
        return Err(AppError::BadRequest("La descripción es obligatoria.".into()));
    }
    if !input.tiempo_estimado.is_finite() || input.tiempo_estimado < 0.0 {
        return Err(AppError::BadRequest("Tiempo inválido".into()));
    }
    if SopEvento::find_by_id(sop_evento_id.to_string()).one(db).await?.is_none() {
        return Err(AppError::NotFound("SOP de evento no encontrado".into()));
    }

    let existentes = evento_detalles(db, sop_evento_id).await?;
    let orden = input
        .orden
        .unwrap_or_else(|| existentes.iter().map(|d| d.orden).max().map_or(1, |o| o + 1));

    Ok(sop_evento_detalle::ActiveModel {
        detalle_id: Set(next_detalle_id(sop_evento_id, &existentes)),
        sop_evento_id: Set(sop_evento_id.to_string()),
        descripcion: Set(descripcion),
        orden: Set(orden),
        tiempo_estimado: Set(input.tiempo_estimado),
        kit_id: Set(blank_to_none(input.kit_id)),
        receta_id: Set(blank_to_none(input.receta_id)),
        consumo_id: Set(blank_to_none(input.consumo_id)),
    }
    .insert(db)
    .await?)
}

pub async fn delete_evento_detalle(db: &DatabaseConnection, sop_evento_id: &str, detalle_id: &str) -> Result<(), AppError> {
    let res = SopEventoDetalle::delete_many()
        .filter(sop_evento_detalle::Column::SopEventoId.eq(sop_evento_id))
        .filter(sop_evento_detalle::Column::DetalleId.eq(detalle_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Detalle no encontrado".into()));
    }
    Ok(())
}

/// 一覧表示用: イベント SOP と合計時間
#[derive(Debug, Serialize)]
pub struct EventoVista {
    #[serde(flatten)]
    pub evento: sop_evento::Model,
    pub detalles: Vec<sop_evento_detalle::Model>,
    pub minutos: f64,
}

pub async fn evento_vista(db: &impl ConnectionTrait, sop_evento_id: &str) -> Result<EventoVista, AppError> {
    let evento = SopEvento::find_by_id(sop_evento_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("SOP de evento no encontrado".into()))?;
    let detalles = evento_detalles(db, sop_evento_id).await?;
    Ok(EventoVista {
        minutos: detalles.iter().map(|d| d.tiempo_estimado).sum(),
        evento,
        detalles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detalle(id: &str) -> sop_evento_detalle::Model {
        sop_evento_detalle::Model {
            detalle_id: id.into(),
            sop_evento_id: "SP-LI-EQ-001".into(),
            descripcion: "Lavar mopas".into(),
            orden: 1,
            tiempo_estimado: 10.0,
            kit_id: None,
            receta_id: None,
            consumo_id: None,
        }
    }

    #[test]
    fn test_metodologia_base_id() {
        assert_eq!(
            metodologia_base_id_for("FR-BA-001", Nivel::Profundo).as_deref(),
            Some("MB-BA-001-P")
        );
        assert_eq!(metodologia_base_id_for("FR-BA", Nivel::Basica), None);
        assert_eq!(metodologia_base_id_for("FRBA001", Nivel::Basica), None);
    }

    #[test]
    fn test_next_detalle_id() {
        assert_eq!(next_detalle_id("SP-LI-EQ-001", &[]), "SP-LI-EQ-001-D01");
        let existentes = vec![detalle("SP-LI-EQ-001-D01"), detalle("SP-LI-EQ-001-D07"), detalle("otro")];
        assert_eq!(next_detalle_id("SP-LI-EQ-001", &existentes), "SP-LI-EQ-001-D08");
    }
}
