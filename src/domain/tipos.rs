use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::nivel::Nivel;

/// 設備清掃タスクに紐づく固定のイベント SOP
pub const SOP_EVENTO_EQUIPO: &str = "SP-LI-EQ-001";

/// SOP の種別
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TipoSop {
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "consecuente")]
    Consecuente,
}

impl TipoSop {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "regular" => Some(TipoSop::Regular),
            "consecuente" => Some(TipoSop::Consecuente),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TipoSop::Regular => "regular",
            TipoSop::Consecuente => "consecuente",
        }
    }

    /// SOP ID の末尾 (`R` / `C`)
    pub fn suffix(self) -> char {
        match self {
            TipoSop::Regular => 'R',
            TipoSop::Consecuente => 'C',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TipoSop::Regular => "Regular",
            TipoSop::Consecuente => "Consecuente",
        }
    }
}

/// タスクの種類
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum TipoTarea {
    #[sea_orm(string_value = "sop")]
    Sop,
    #[sea_orm(string_value = "inicio")]
    Inicio,
    #[sea_orm(string_value = "receso")]
    Receso,
    #[sea_orm(string_value = "limpieza_equipo")]
    LimpiezaEquipo,
    #[sea_orm(string_value = "evento")]
    Evento,
}

impl TipoTarea {
    /// 1 人 1 日に 1 セットだけ自動生成される固定タスクか
    pub fn is_fixed(self) -> bool {
        matches!(self, TipoTarea::Inicio | TipoTarea::Receso | TipoTarea::LimpiezaEquipo)
    }

    pub fn label(self) -> &'static str {
        match self {
            TipoTarea::Sop => "SOP",
            TipoTarea::Inicio => "Inicio de jornada",
            TipoTarea::Receso => "Receso",
            TipoTarea::LimpiezaEquipo => "Limpieza de equipo",
            TipoTarea::Evento => "Evento",
        }
    }
}

/// 固定タスクの雛形
#[derive(Debug, Clone, Copy)]
pub struct FixedTask {
    pub tipo: TipoTarea,
    pub orden: i32,
    pub sop_evento_id: Option<&'static str>,
    pub es_arrastrable: bool,
}

pub const FIXED_TASKS: [FixedTask; 3] = [
    FixedTask {
        tipo: TipoTarea::Inicio,
        orden: -3,
        sop_evento_id: None,
        es_arrastrable: false,
    },
    FixedTask {
        tipo: TipoTarea::Receso,
        orden: 50,
        sop_evento_id: None,
        es_arrastrable: true,
    },
    FixedTask {
        tipo: TipoTarea::LimpiezaEquipo,
        orden: 999,
        sop_evento_id: Some(SOP_EVENTO_EQUIPO),
        es_arrastrable: false,
    },
];

/// 割り当てフォームの「種類」欄を解釈した結果。
/// extraordinario は regular SOP を使いつつレベルを強制、consecuente はレベルを basica に固定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKind {
    Regular,
    Extraordinario,
    Consecuente,
}

impl AssignmentKind {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("extraordinario") => AssignmentKind::Extraordinario,
            Some("consecuente") => AssignmentKind::Consecuente,
            _ => AssignmentKind::Regular,
        }
    }

    /// 参照する SOP 種別と、実際に割り当てるレベルを決めます。
    pub fn resolve(self, requested: Nivel) -> (TipoSop, Nivel) {
        match self {
            AssignmentKind::Regular => (TipoSop::Regular, requested),
            AssignmentKind::Extraordinario => (TipoSop::Regular, Nivel::Extraordinario),
            AssignmentKind::Consecuente => (TipoSop::Consecuente, Nivel::Basica),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_kind_resolution() {
        assert_eq!(
            AssignmentKind::parse(Some("extraordinario")).resolve(Nivel::Media),
            (TipoSop::Regular, Nivel::Extraordinario)
        );
        assert_eq!(
            AssignmentKind::parse(Some("Consecuente")).resolve(Nivel::Profundo),
            (TipoSop::Consecuente, Nivel::Basica)
        );
        assert_eq!(
            AssignmentKind::parse(None).resolve(Nivel::Media),
            (TipoSop::Regular, Nivel::Media)
        );
        assert_eq!(AssignmentKind::parse(Some("otro")), AssignmentKind::Regular);
    }

    #[test]
    fn test_fixed_tasks_layout() {
        let ordenes: Vec<i32> = FIXED_TASKS.iter().map(|t| t.orden).collect();
        assert_eq!(ordenes, vec![-3, 50, 999]);
        assert!(FIXED_TASKS.iter().all(|t| t.tipo.is_fixed()));
        assert!(!TipoTarea::Sop.is_fixed());
        assert_eq!(FIXED_TASKS[2].sop_evento_id, Some(SOP_EVENTO_EQUIPO));
    }
}
