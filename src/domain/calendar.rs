use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// 画面に出す曜日名 (月〜土の 6 日間)
pub const DIAS_SEMANA: [&str; 6] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado"];

/// 指定日を含む週の月曜日
pub fn monday_of(fecha: NaiveDate) -> NaiveDate {
    fecha - Duration::days(fecha.weekday().num_days_from_monday() as i64)
}

/// 月曜から土曜までの 6 日分
pub fn working_week(lunes: NaiveDate) -> [NaiveDate; 6] {
    std::array::from_fn(|i| lunes + Duration::days(i as i64))
}

/// ISO 週番号
pub fn iso_week(fecha: NaiveDate) -> u32 {
    fecha.iso_week().week()
}

/// `lanzamiento_semana.nombre` に入れる表示名
pub fn nombre_semana(lunes: NaiveDate) -> String {
    format!("Semana {}", iso_week(lunes))
}

/// 曜日名。日曜は週の外なので "Domingo"。
pub fn nombre_dia(fecha: NaiveDate) -> &'static str {
    let idx = fecha.weekday().num_days_from_monday() as usize;
    DIAS_SEMANA.get(idx).copied().unwrap_or("Domingo")
}

/// 現場のタイムゾーンでの現在時刻 (DB には naive で保存する)
pub fn now(offset: FixedOffset) -> NaiveDateTime {
    Utc::now().with_timezone(&offset).naive_local()
}

/// 現場のタイムゾーンでの今日
pub fn today(offset: FixedOffset) -> NaiveDate {
    now(offset).date()
}

/// `YYYY-MM-DD` 形式の日付を解析
pub fn parse_fecha(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_monday_of_each_weekday() {
        // 2024-06-03 は月曜
        for offset in 0..7 {
            let fecha = d(2024, 6, 3) + Duration::days(offset);
            assert_eq!(monday_of(fecha), d(2024, 6, 3));
        }
    }

    #[test]
    fn test_working_week_is_monday_to_saturday() {
        let week = working_week(d(2024, 6, 10));
        assert_eq!(week[0], d(2024, 6, 10));
        assert_eq!(week[5], d(2024, 6, 15));
        assert_eq!(nombre_dia(week[5]), "Sábado");
        assert_eq!(nombre_dia(d(2024, 6, 16)), "Domingo");
    }

    #[test]
    fn test_week_name_uses_iso_week() {
        assert_eq!(nombre_semana(d(2024, 6, 3)), "Semana 23");
        assert_eq!(iso_week(d(2024, 12, 30)), 1);
    }

    #[test]
    fn test_parse_fecha() {
        assert_eq!(parse_fecha("2024-06-03"), Some(d(2024, 6, 3)));
        assert_eq!(parse_fecha("03/06/2024"), None);
    }
}
