//! レポート表示用の整形ヘルパー。
//! 値が無いときは一律 "No aplica" を出します。

use crate::entities::{consumo, herramienta, kit_detalle, quimico, receta, receta_detalle};

use super::progreso::fmt_num;

pub const NO_APLICA: &str = "No aplica";

/// 空文字・空白のみ・None を "No aplica" にする
pub fn na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NO_APLICA.to_string(),
    }
}

/// `"<valor> <unidad> = <regla>"`。どちらか片方だけでも表示する。
pub fn fmt_consumo(consumo: Option<&consumo::Model>) -> String {
    let Some(c) = consumo else {
        return NO_APLICA.to_string();
    };

    let left = match (c.valor, c.unidad.as_deref().map(str::trim)) {
        (Some(v), Some(u)) if !u.is_empty() => Some(format!("{} {}", fmt_num(v), u)),
        _ => None,
    };

    let regla = c
        .regla
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| {
            if r.starts_with('=') {
                r.to_string()
            } else {
                format!("= {}", r)
            }
        });

    match (left, regla) {
        (Some(l), Some(r)) => format!("{} {}", l, r),
        (None, Some(r)) => r,
        (Some(l), None) => l,
        (None, None) => NO_APLICA.to_string(),
    }
}

/// レシピ行の `"<dosis> <u> + <volumen> <u>"`。行が無ければレシピ名。
pub fn fmt_receta(receta: Option<&receta::Model>, lineas: &[receta_detalle::Model]) -> String {
    let Some(r) = receta else {
        return NO_APLICA.to_string();
    };

    let mut partes = Vec::new();
    for d in lineas {
        if let (Some(dosis), Some(u)) = (d.dosis, d.unidad_dosis.as_deref()) {
            if !u.trim().is_empty() {
                partes.push(format!("{} {}", fmt_num(dosis), u.trim()));
            }
        }
        if let (Some(vol), Some(u)) = (d.volumen_base, d.unidad_volumen.as_deref()) {
            if !u.trim().is_empty() {
                partes.push(format!("{} {}", fmt_num(vol), u.trim()));
            }
        }
    }

    if partes.is_empty() {
        na(Some(&r.nombre))
    } else {
        partes.join(" + ")
    }
}

/// (薬剤名, レシピ) の組。薬剤名は重複を除いて " + " で連結。
pub fn fmt_quimico_y_receta(
    receta: Option<&receta::Model>,
    lineas: &[(receta_detalle::Model, Option<quimico::Model>)],
) -> (String, String) {
    let Some(r) = receta else {
        return (NO_APLICA.to_string(), NO_APLICA.to_string());
    };
    if lineas.is_empty() {
        return (NO_APLICA.to_string(), na(Some(&r.nombre)));
    }

    let mut nombres: Vec<&str> = Vec::new();
    for (_, q) in lineas {
        if let Some(q) = q {
            let nombre = q.nombre.trim();
            if !nombre.is_empty() && !nombres.contains(&nombre) {
                nombres.push(nombre);
            }
        }
    }
    let quimicos = if nombres.is_empty() {
        NO_APLICA.to_string()
    } else {
        nombres.join(" + ")
    };

    let detalles: Vec<receta_detalle::Model> = lineas.iter().map(|(d, _)| d.clone()).collect();
    (quimicos, fmt_receta(Some(r), &detalles))
}

/// キットの道具一覧 (説明文)。空なら `["No aplica"]`。
pub fn fmt_herramientas(lineas: &[(kit_detalle::Model, Option<herramienta::Model>)]) -> Vec<String> {
    let items: Vec<String> = lineas
        .iter()
        .filter_map(|(_, h)| h.as_ref())
        .filter_map(|h| h.descripcion.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        vec![NO_APLICA.to_string()]
    } else {
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consumo(valor: Option<f64>, unidad: Option<&str>, regla: Option<&str>) -> consumo::Model {
        consumo::Model {
            consumo_id: "CM-DS-001".into(),
            valor,
            unidad: unidad.map(Into::into),
            regla: regla.map(Into::into),
        }
    }

    fn linea(quimico_id: &str, dosis: Option<f64>, volumen: Option<f64>) -> receta_detalle::Model {
        receta_detalle::Model {
            receta_id: "RE-DS-001".into(),
            quimico_id: quimico_id.into(),
            dosis,
            unidad_dosis: Some("ml".into()),
            volumen_base: volumen,
            unidad_volumen: Some("L".into()),
            nota: None,
        }
    }

    fn quimico(id: &str, nombre: &str) -> quimico::Model {
        quimico::Model {
            quimico_id: id.into(),
            nombre: nombre.into(),
            categoria: None,
            presentacion: None,
            unidad_base: None,
        }
    }

    #[test]
    fn test_na() {
        assert_eq!(na(None), NO_APLICA);
        assert_eq!(na(Some("   ")), NO_APLICA);
        assert_eq!(na(Some(" Mopa ")), "Mopa");
    }

    #[test]
    fn test_fmt_consumo_variants() {
        assert_eq!(fmt_consumo(None), NO_APLICA);
        assert_eq!(
            fmt_consumo(Some(&consumo(Some(3.0), Some("ml"), Some("1 disparo")))),
            "3 ml = 1 disparo"
        );
        assert_eq!(
            fmt_consumo(Some(&consumo(Some(2.5), Some("ml"), Some("=por m²")))),
            "2.5 ml =por m²"
        );
        assert_eq!(fmt_consumo(Some(&consumo(None, None, Some("a discreción")))), "= a discreción");
        assert_eq!(fmt_consumo(Some(&consumo(Some(1.0), None, None))), NO_APLICA);
    }

    #[test]
    fn test_fmt_receta_and_quimicos() {
        let receta = receta::Model {
            receta_id: "RE-DS-001".into(),
            nombre: "Desinfectante".into(),
        };
        let lineas = vec![
            (linea("QU-DS-001", Some(10.0), Some(1.0)), Some(quimico("QU-DS-001", "Cloro"))),
            (linea("QU-DS-002", Some(5.0), None), Some(quimico("QU-DS-002", "Cloro"))),
        ];
        let (quimicos, texto) = fmt_quimico_y_receta(Some(&receta), &lineas);
        assert_eq!(quimicos, "Cloro");
        assert_eq!(texto, "10 ml + 1 L + 5 ml");

        let (q, t) = fmt_quimico_y_receta(Some(&receta), &[]);
        assert_eq!(q, NO_APLICA);
        assert_eq!(t, "Desinfectante");
        assert_eq!(fmt_receta(None, &[]), NO_APLICA);
    }

    #[test]
    fn test_fmt_herramientas_empty_kit() {
        assert_eq!(fmt_herramientas(&[]), vec![NO_APLICA.to_string()]);

        let kd = kit_detalle::Model {
            kit_id: "KT-LI-001".into(),
            herramienta_id: "HE-MO-001".into(),
            nota: None,
        };
        let h = herramienta::Model {
            herramienta_id: "HE-MO-001".into(),
            nombre: "Mopa".into(),
            descripcion: Some("Mopa húmeda".into()),
            estatus: None,
        };
        assert_eq!(fmt_herramientas(&[(kd, Some(h))]), vec!["Mopa húmeda".to_string()]);
    }
}
