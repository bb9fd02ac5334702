use chrono::{FixedOffset, Offset, Utc};
use rocket::figment::Figment;
use std::env;

/// 既定の DB (カレントディレクトリの SQLite ファイル)
const DEFAULT_DATABASE_URL: &str = "sqlite://app.db?mode=rwc";

/// 現場 (メキシコシティ) の UTC オフセット
const DEFAULT_UTC_OFFSET_HOURS: i32 = -6;

/// アプリケーション設定。
/// Djangoの `settings.py` に相当し、環境変数 (.env) から読み込みます。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// 未設定なら Rocket が開発用の鍵を生成する
    pub secret_key: Option<String>,
    pub utc_offset_hours: i32,
    /// HTML → PDF 変換コマンド (wkhtmltopdf)
    pub wkhtmltopdf_cmd: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => normalize_database_url(url.trim()),
            _ => match env::var("DB_PATH") {
                Ok(path) if !path.trim().is_empty() => format!("sqlite://{}?mode=rwc", path.trim()),
                _ => DEFAULT_DATABASE_URL.to_string(),
            },
        };

        let utc_offset_hours = env::var("APP_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|h| (-12..=14).contains(h))
            .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);

        AppConfig {
            database_url,
            secret_key: env::var("SECRET_KEY").ok().filter(|k| !k.trim().is_empty()),
            utc_offset_hours,
            wkhtmltopdf_cmd: env::var("WKHTMLTOPDF_CMD").unwrap_or_else(|_| "wkhtmltopdf".to_string()),
        }
    }

    /// テスト用: インメモリ SQLite
    pub fn for_tests() -> Self {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            secret_key: None,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            wkhtmltopdf_cmd: "wkhtmltopdf".to_string(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// Rocket.toml / ROCKET_* の設定に SECRET_KEY を重ねた figment
    pub fn figment(&self) -> Figment {
        let figment = rocket::Config::figment();
        match &self.secret_key {
            Some(key) => figment.merge(("secret_key", key.clone())),
            None => figment,
        }
    }
}

/// Heroku 形式の `postgres://` を `postgresql://` に揃える
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{}", rest),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_database_url() {
        assert_eq!(
            normalize_database_url("postgres://u:p@host/db"),
            "postgresql://u:p@host/db"
        );
        assert_eq!(
            normalize_database_url("postgresql://u:p@host/db"),
            "postgresql://u:p@host/db"
        );
        assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn test_offset_for_mexico_city() {
        let cfg = AppConfig::for_tests();
        assert_eq!(cfg.offset().local_minus_utc(), -6 * 3600);
    }
}
