/// 進捗率 (%)。`total == 0` のときは 0。
/// 端数は偶数丸め (banker's rounding) で、2.5 → 2 / 3.5 → 4 になります。
pub fn progress_pct(completed: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    (completed as f64 / total as f64 * 100.0).round_ties_even() as i64
}

/// 分単位の時間を小数第 2 位で丸める
pub fn round2(minutes: f64) -> f64 {
    (minutes * 100.0).round() / 100.0
}

/// 数値表示。`3.0` は `"3"`、浮動小数の誤差は 6 桁で切り捨て。
pub fn fmt_num(v: f64) -> String {
    let rounded = (v * 1_000_000.0).round() / 1_000_000.0;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_zero_total() {
        assert_eq!(progress_pct(0, 0), 0);
    }

    #[test]
    fn test_progress_rounding() {
        assert_eq!(progress_pct(1, 3), 33);
        assert_eq!(progress_pct(2, 3), 67);
        assert_eq!(progress_pct(3, 3), 100);
        // 1/8 = 12.5% → 12 (偶数丸め)
        assert_eq!(progress_pct(1, 8), 12);
        // 3/8 = 37.5% → 38
        assert_eq!(progress_pct(3, 8), 38);
    }

    #[test]
    fn test_progress_never_exceeds_total() {
        assert_eq!(progress_pct(5, 4), 100);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(fmt_num(3.0), "3");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(0.1 + 0.2), "0.3");
        assert_eq!(round2(12.3456), 12.35);
    }
}
