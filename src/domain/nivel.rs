use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 清掃レベル。DB には正規化済みの名前 (`basica` など) で保存します。
/// Django の `TextChoices` に相当。
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Nivel {
    #[sea_orm(string_value = "basica")]
    Basica,
    #[sea_orm(string_value = "media")]
    Media,
    #[sea_orm(string_value = "profundo")]
    Profundo,
    #[sea_orm(string_value = "extraordinario")]
    Extraordinario,
}

impl Nivel {
    pub const ALL: [Nivel; 4] = [
        Nivel::Basica,
        Nivel::Media,
        Nivel::Profundo,
        Nivel::Extraordinario,
    ];

    /// 画面入力・Excel 由来の揺れた表記を正規化します。
    /// `"1"`, `"Básica"`, `" PROFUNDA "` などを受け付け、それ以外は `None`。
    pub fn canon(raw: &str) -> Option<Self> {
        let folded = fold_accents(&raw.trim().to_lowercase());
        match folded.as_str() {
            "1" | "basica" => Some(Nivel::Basica),
            "2" | "media" => Some(Nivel::Media),
            "3" | "profundo" | "profunda" => Some(Nivel::Profundo),
            "4" | "extraordinario" | "extraordinaria" => Some(Nivel::Extraordinario),
            _ => None,
        }
    }

    /// `nivel_limpieza` テーブルの主キー
    pub fn id(self) -> i32 {
        match self {
            Nivel::Basica => 1,
            Nivel::Media => 2,
            Nivel::Profundo => 3,
            Nivel::Extraordinario => 4,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.id() == id)
    }

    /// SD / ES の ID 末尾に付く 1 文字
    pub fn letter(self) -> char {
        match self {
            Nivel::Basica => 'B',
            Nivel::Media => 'M',
            Nivel::Profundo => 'P',
            Nivel::Extraordinario => 'E',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Nivel::Basica => "basica",
            Nivel::Media => "media",
            Nivel::Profundo => "profundo",
            Nivel::Extraordinario => "extraordinario",
        }
    }

    /// 画面表示用のラベル
    pub fn label(self) -> &'static str {
        match self {
            Nivel::Basica => "Básica",
            Nivel::Media => "Media",
            Nivel::Profundo => "Profundo",
            Nivel::Extraordinario => "Extraordinario",
        }
    }
}

/// スペイン語のアクセント記号を落とします (á → a, ñ はそのまま)。
pub fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canon_accepts_numbers_and_names() {
        assert_eq!(Nivel::canon("1"), Some(Nivel::Basica));
        assert_eq!(Nivel::canon("Básica"), Some(Nivel::Basica));
        assert_eq!(Nivel::canon("  MEDIA "), Some(Nivel::Media));
        assert_eq!(Nivel::canon("profunda"), Some(Nivel::Profundo));
        assert_eq!(Nivel::canon("3"), Some(Nivel::Profundo));
        assert_eq!(Nivel::canon("Extraordinaria"), Some(Nivel::Extraordinario));
    }

    #[test]
    fn test_canon_rejects_unknown() {
        assert_eq!(Nivel::canon(""), None);
        assert_eq!(Nivel::canon("5"), None);
        assert_eq!(Nivel::canon("alta"), None);
    }

    #[test]
    fn test_id_roundtrip_and_letters() {
        for n in Nivel::ALL {
            assert_eq!(Nivel::from_id(n.id()), Some(n));
        }
        assert_eq!(Nivel::from_id(0), None);
        let letters: String = Nivel::ALL.iter().map(|n| n.letter()).collect();
        assert_eq!(letters, "BMPE");
    }
}
