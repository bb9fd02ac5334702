use super::nivel::Nivel;
use super::tipos::TipoSop;

fn strip_prefix<'a>(id: &'a str, prefix: &str) -> &'a str {
    id.strip_prefix(prefix).unwrap_or(id)
}

/// `SP-{subarea}-R` / `SP-{subarea}-C`
pub fn make_sop_id(subarea_id: &str, tipo: TipoSop) -> String {
    format!("SP-{}-{}", subarea_id, tipo.suffix())
}

/// `SF-{sop core}-{fracción core}`
pub fn make_sf_id(sop_id: &str, fraccion_id: &str) -> String {
    format!(
        "SF-{}-{}",
        strip_prefix(sop_id, "SP-"),
        strip_prefix(fraccion_id, "FR-")
    )
}

/// `SD-{sop core}-{fracción core}-{B|M|P|E}`
pub fn make_sd_id(sop_id: &str, fraccion_id: &str, nivel: Nivel) -> String {
    format!(
        "SD-{}-{}-{}",
        strip_prefix(sop_id, "SP-"),
        strip_prefix(fraccion_id, "FR-"),
        nivel.letter()
    )
}

/// `ES-{sop core}-{fracción core}-{B|M|P|E}`
pub fn make_es_id(sop_id: &str, fraccion_id: &str, nivel: Nivel) -> String {
    format!(
        "ES-{}-{}-{}",
        strip_prefix(sop_id, "SP-"),
        strip_prefix(fraccion_id, "FR-"),
        nivel.letter()
    )
}

/// カタログごとの ID 接頭辞
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePrefix {
    Quimico,
    Receta,
    Herramienta,
    Kit,
    Fraccion,
    Consumo,
    Elemento,
}

impl CodePrefix {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "quimicos" => Some(CodePrefix::Quimico),
            "recetas" => Some(CodePrefix::Receta),
            "herramientas" => Some(CodePrefix::Herramienta),
            "kits" => Some(CodePrefix::Kit),
            "fracciones" => Some(CodePrefix::Fraccion),
            "consumos" => Some(CodePrefix::Consumo),
            "elementos" => Some(CodePrefix::Elemento),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CodePrefix::Quimico => "QU",
            CodePrefix::Receta => "RE",
            CodePrefix::Herramienta => "HE",
            CodePrefix::Kit => "KT",
            CodePrefix::Fraccion => "FR",
            CodePrefix::Consumo => "CM",
            CodePrefix::Elemento => "EL",
        }
    }

    /// 消費量は常に `DS` グループ
    pub fn fixed_group(self) -> Option<&'static str> {
        match self {
            CodePrefix::Consumo => Some("DS"),
            _ => None,
        }
    }
}

/// グループコードを検証して大文字化します (2 文字固定)。
pub fn normalize_group(raw: &str) -> Result<String, &'static str> {
    let grupo = raw.trim().to_uppercase();
    if grupo.is_empty() {
        return Err("Grupo requerido");
    }
    if grupo.chars().count() != 2 {
        return Err("Grupo debe tener 2 caracteres");
    }
    Ok(grupo)
}

/// 既存 ID の中で最大の連番 + 1 を採番します。
/// 形式が崩れている ID は無視。戻り値は `(新ID, 連番)`。
pub fn next_code<'a, I>(prefix: CodePrefix, grupo: &str, existing: I) -> (String, u32)
where
    I: IntoIterator<Item = &'a str>,
{
    let head = format!("{}-{}-", prefix.as_str(), grupo);
    let siguiente = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(head.as_str()))
        .filter_map(|num| num.parse::<u32>().ok())
        .max()
        .map_or(1, |n| n + 1);
    (format!("{}{:03}", head, siguiente), siguiente)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sop_composition_ids() {
        let sop = make_sop_id("BA-01", TipoSop::Regular);
        assert_eq!(sop, "SP-BA-01-R");
        assert_eq!(make_sop_id("BA-01", TipoSop::Consecuente), "SP-BA-01-C");
        assert_eq!(make_sf_id(&sop, "FR-LI-001"), "SF-BA-01-R-LI-001");
        assert_eq!(make_sd_id(&sop, "FR-LI-001", Nivel::Media), "SD-BA-01-R-LI-001-M");
        assert_eq!(make_es_id(&sop, "FR-LI-001", Nivel::Extraordinario), "ES-BA-01-R-LI-001-E");
    }

    #[test]
    fn test_next_code_skips_malformed() {
        let existing = ["QU-DS-001", "QU-DS-007", "QU-DS-xx", "QU-AC-020"];
        let (id, n) = next_code(CodePrefix::Quimico, "DS", existing);
        assert_eq!(id, "QU-DS-008");
        assert_eq!(n, 8);

        let (first, _) = next_code(CodePrefix::Kit, "LI", std::iter::empty());
        assert_eq!(first, "KT-LI-001");
    }

    #[test]
    fn test_normalize_group() {
        assert_eq!(normalize_group(" ds "), Ok("DS".to_string()));
        assert!(normalize_group("").is_err());
        assert!(normalize_group("ABC").is_err());
    }
}
