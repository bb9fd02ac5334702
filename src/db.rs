use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// データベース接続をセットアップします。
/// Djangoでは `settings.py` の `DATABASES` 設定に相当します。
pub async fn set_up_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.sqlx_logging(false);

    // インメモリ SQLite は接続ごとに別 DB になるため、プールを 1 本に固定する
    if database_url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    }

    Database::connect(opt).await
}
