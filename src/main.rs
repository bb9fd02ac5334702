#[macro_use]
extern crate rocket;

use sop_rutas::build_rocket;
use sop_rutas::config::AppConfig;
use tracing_subscriber::EnvFilter;

/// アプリケーションのメインエントリーポイント。
/// Djangoの `manage.py runserver` 実行時の動きに相当します。
#[launch]
async fn rocket() -> _ {
    // .env を読み込む (Django の settings の環境変数部分)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .init();

    let config = AppConfig::from_env();
    match build_rocket(config).await {
        Ok(rocket) => rocket,
        Err(e) => {
            tracing::error!(error = ?e, "startup failed");
            std::process::exit(1);
        }
    }
}
