use super::nivel::Nivel;
use super::tipos::TipoSop;

/// 同じ (日, サブエリア) に既にある SOP タスク (またはテンプレート項目)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTask {
    pub sop_id: Option<String>,
    pub es_adicional: bool,
}

/// 割り当てを拒否した理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotConflict {
    /// 追加でないタスクが既にある
    SubareaOcupada,
    /// サブエリアに該当種別の SOP が無い
    SinSop(TipoSop),
    /// 同じ SOP のタスクが既にある
    SopDuplicado { extraordinario: bool },
}

/// 新しいタスクを (日, サブエリア) に置けるか判定します。
///
/// 1. 追加でないタスクは 1 枠に 1 件だけ
/// 2. SOP が存在しなければ不可
/// 3. consecuente 以外は同じ SOP を重ねられない
pub fn check_slot(
    existing: &[SlotTask],
    es_adicional: bool,
    tipo_sop: TipoSop,
    sop_id: Option<&str>,
    nivel: Nivel,
) -> Result<(), SlotConflict> {
    if !es_adicional && existing.iter().any(|t| !t.es_adicional) {
        return Err(SlotConflict::SubareaOcupada);
    }

    let sop_id = sop_id.ok_or(SlotConflict::SinSop(tipo_sop))?;

    if tipo_sop != TipoSop::Consecuente && existing.iter().any(|t| t.sop_id.as_deref() == Some(sop_id)) {
        return Err(SlotConflict::SopDuplicado {
            extraordinario: nivel == Nivel::Extraordinario,
        });
    }
    Ok(())
}

impl SlotConflict {
    /// 日次プラン画面向けの文言
    pub fn message_dia(&self) -> String {
        match self {
            SlotConflict::SubareaOcupada => {
                "Esa subárea ya tiene una tarea REGULAR asignada en este día.".to_string()
            }
            SlotConflict::SinSop(tipo) => format!("No existe SOP {} para esta subárea.", tipo.label()),
            SlotConflict::SopDuplicado { extraordinario: true } => {
                "Ya existe una tarea Regular/Extraordinario para esta subárea.".to_string()
            }
            SlotConflict::SopDuplicado { extraordinario: false } => {
                "Ya existe una tarea Regular para esta subárea en este día.".to_string()
            }
        }
    }

    /// テンプレートの日エディタ向けの文言
    pub fn message_plantilla(&self) -> String {
        match self {
            SlotConflict::SubareaOcupada => {
                "Esa subárea ya tiene una tarea REGULAR en este día de la plantilla.".to_string()
            }
            SlotConflict::SopDuplicado { extraordinario: true } => {
                "Ya existe una tarea Extraordinario para esta subárea en este día.".to_string()
            }
            other => other.message_dia(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular(sop: &str) -> SlotTask {
        SlotTask { sop_id: Some(sop.to_string()), es_adicional: false }
    }

    fn adicional(sop: &str) -> SlotTask {
        SlotTask { sop_id: Some(sop.to_string()), es_adicional: true }
    }

    #[test]
    fn test_empty_slot_accepts_regular() {
        assert_eq!(
            check_slot(&[], false, TipoSop::Regular, Some("SP-BA-01-R"), Nivel::Media),
            Ok(())
        );
    }

    #[test]
    fn test_second_non_additional_is_rejected() {
        let existing = [regular("SP-BA-01-R")];
        let err = check_slot(&existing, false, TipoSop::Consecuente, Some("SP-BA-01-C"), Nivel::Basica)
            .unwrap_err();
        assert_eq!(err, SlotConflict::SubareaOcupada);
        assert!(err.message_dia().contains("ya tiene una tarea REGULAR"));
    }

    #[test]
    fn test_missing_sop() {
        let err = check_slot(&[], true, TipoSop::Consecuente, None, Nivel::Basica).unwrap_err();
        assert_eq!(err.message_dia(), "No existe SOP Consecuente para esta subárea.");
    }

    #[test]
    fn test_additional_same_sop_is_rejected_unless_consecuente() {
        let existing = [regular("SP-BA-01-R"), adicional("SP-BA-01-C")];
        let err = check_slot(&existing, true, TipoSop::Regular, Some("SP-BA-01-R"), Nivel::Extraordinario)
            .unwrap_err();
        assert_eq!(err, SlotConflict::SopDuplicado { extraordinario: true });
        assert_eq!(err.message_dia(), "Ya existe una tarea Regular/Extraordinario para esta subárea.");

        // consecuente adicional puede repetirse
        assert!(check_slot(&existing, true, TipoSop::Consecuente, Some("SP-BA-01-C"), Nivel::Basica).is_ok());
    }

    #[test]
    fn test_template_messages() {
        assert_eq!(
            SlotConflict::SubareaOcupada.message_plantilla(),
            "Esa subárea ya tiene una tarea REGULAR en este día de la plantilla."
        );
        assert_eq!(
            SlotConflict::SopDuplicado { extraordinario: false }.message_plantilla(),
            "Ya existe una tarea Regular para esta subárea en este día."
        );
    }
}
