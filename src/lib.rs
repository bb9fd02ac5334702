#[macro_use]
extern crate rocket;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use rocket::fs::{relative, FileServer};
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

pub mod auth_utils;
pub mod config;
pub mod controllers;
pub mod csrf;
pub mod db;
pub mod domain;
pub mod entities;
pub mod errors;
pub mod fairings;
pub mod guards;
pub mod macros;
pub mod pdf;
pub mod services;
pub mod validation;
pub mod views;

use config::AppConfig;
use controllers::*;

/// Rocketインスタンスを構築する関数。
/// テスト時にも利用できるように分離しています (設定は呼び出し側から渡す)。
pub async fn build_rocket(config: AppConfig) -> anyhow::Result<Rocket<Build>> {
    // 1. データベース接続
    let db = db::set_up_db(&config.database_url)
        .await
        .with_context(|| format!("failed to connect to {}", config.database_url))?;

    // 2. マイグレーションの実行 (Django の `migrate`)
    Migrator::up(&db, None).await.context("failed to run migrations")?;
    tracing::info!("database ready");

    // 3. Rocketインスタンスの構築 (Django の `urls.py`)
    let mut app = rocket::custom(config.figment())
        .manage(db)
        .manage(config)
        .attach(Template::fairing())
        .attach(fairings::context::ContextFairing)
        .mount("/", auth::routes())
        .mount("/", home::routes())
        .mount("/", rutas::routes())
        .mount("/", plantillas::routes())
        .mount("/", reportes::routes())
        .mount("/", sop::routes())
        .mount("/admin/users", admin_users::routes())
        .mount("/admin", catalogo_detalle::routes())
        .mount("/api", api::routes())
        .mount("/static", FileServer::from(relative!("static")))
        .register("/", catchers::catchers());

    for (base, routes) in catalogo::mounts() {
        app = app.mount(base, routes);
    }
    Ok(app)
}
