use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;

mod common;

async fn marcar(client: &Client, tarea_id: i32) -> (Status, String) {
    let token = common::csrf(client).await;
    let response = client
        .post(format!("/api/tarea/{}/check", tarea_id))
        .header(Header::new("X-CSRF-Token", token))
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_string().await.unwrap_or_default())
}

async fn desmarcar(client: &Client, tarea_id: i32) -> (Status, String) {
    let token = common::csrf(client).await;
    let response = client
        .delete(format!("/api/tarea/{}/check", tarea_id))
        .header(Header::new("X-CSRF-Token", token))
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_string().await.unwrap_or_default())
}

#[rocket::async_test]
async fn test_operativo_checks_own_task_today() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_operativo(db, "ana", common::PERSONAL).await;
    let tarea = common::assign_regular(db, common::today(), common::PERSONAL).await;
    common::login(&client, "ana").await;

    let (status, body) = marcar(&client, tarea.tarea_id).await;
    assert_eq!(status, Status::Ok);
    assert!(body.contains("\"success\":true"));
    assert!(body.contains("checked_at"));

    // 二重チェックは 400 で元の時刻を返す
    let (status, body) = marcar(&client, tarea.tarea_id).await;
    assert_eq!(status, Status::BadRequest);
    assert!(body.contains("Tarea ya marcada"));
    assert!(body.contains("checked_at"));

    let (status, _) = desmarcar(&client, tarea.tarea_id).await;
    assert_eq!(status, Status::Ok);

    let (status, body) = desmarcar(&client, tarea.tarea_id).await;
    assert_eq!(status, Status::NotFound);
    assert!(body.contains("Tarea no estaba marcada"));
}

#[rocket::async_test]
async fn test_check_rejections() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_operativo(db, "ana", common::PERSONAL).await;
    let ajena = common::assign_regular(db, common::today(), common::OTRO_PERSONAL).await;
    let ayer = common::today() - chrono::Duration::days(1);
    let vieja = common::assign_regular(db, ayer, common::PERSONAL).await;
    common::login(&client, "ana").await;

    let (status, body) = marcar(&client, ajena.tarea_id).await;
    assert_eq!(status, Status::Forbidden);
    assert!(body.contains("Esta tarea no te pertenece"));

    let (status, body) = marcar(&client, vieja.tarea_id).await;
    assert_eq!(status, Status::Forbidden);
    assert!(body.contains("Solo puedes marcar tareas de hoy"));

    let (status, _) = marcar(&client, 99_999).await;
    assert_eq!(status, Status::NotFound);
}

#[rocket::async_test]
async fn test_admin_cannot_check() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    let tarea = common::assign_regular(db, common::today(), common::PERSONAL).await;
    common::login(&client, "jefe").await;

    let (status, body) = marcar(&client, tarea.tarea_id).await;
    assert_eq!(status, Status::Forbidden);
    assert!(body.contains("Admin no puede marcar tareas"));
}

#[rocket::async_test]
async fn test_check_requires_csrf_header() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_operativo(db, "ana", common::PERSONAL).await;
    let tarea = common::assign_regular(db, common::today(), common::PERSONAL).await;
    common::login(&client, "ana").await;

    let response = client
        .post(format!("/api/tarea/{}/check", tarea.tarea_id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
}

#[rocket::async_test]
async fn test_report_access_rules() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_operativo(db, "ana", common::PERSONAL).await;
    let hoy = common::today();
    common::assign_regular(db, hoy, common::PERSONAL).await;
    common::assign_regular(db, hoy - chrono::Duration::days(1), common::PERSONAL).await;
    common::login(&client, "ana").await;

    // 自分の今日のレポートは見られる
    let response = client
        .get(format!("/reporte/{}/{}", hoy, common::PERSONAL))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap_or_default();
    assert!(html.contains("Barrido"));

    // 他人のもの・過去の日は 403
    let response = client
        .get(format!("/reporte/{}/{}", hoy, common::OTRO_PERSONAL))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    let response = client
        .get(format!("/reporte/{}/{}", hoy - chrono::Duration::days(1), common::PERSONAL))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
}

#[rocket::async_test]
async fn test_admin_reads_any_report() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    let fecha = chrono::NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");
    common::assign_regular(db, fecha, common::PERSONAL).await;
    common::login(&client, "jefe").await;

    let response = client
        .get(format!("/reporte/{}/{}", fecha, common::PERSONAL))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap_or_default();
    assert!(html.contains("Ana"));
    assert!(html.contains("LIMPIEZA DE EQUIPO"));
}

#[rocket::async_test]
async fn test_report_without_tasks_is_not_found() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    let fecha = chrono::NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");
    common::assign_regular(db, fecha, common::PERSONAL).await;
    common::login(&client, "jefe").await;

    // 日はあるが Beto にはタスクが無い
    let response = client
        .get(format!("/reporte/{}/{}", fecha, common::OTRO_PERSONAL))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
    let body = response.into_string().await.unwrap_or_default();
    assert!(body.contains("No hay tareas para Beto"));
}

#[rocket::async_test]
async fn test_fraction_without_methodology_is_left_out() {
    use sea_orm::{ActiveModelTrait, Set};
    use sop_rutas::domain::ids::{make_sd_id, make_sf_id};
    use sop_rutas::domain::nivel::Nivel;
    use sop_rutas::entities::{fraccion, sop_fraccion, sop_fraccion_detalle};

    let client = common::setup().await;
    let db = common::db(&client);
    let sop_id = common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;

    // 2 つ目のフラクションは時間だけあって手順書が無い
    fraccion::ActiveModel {
        fraccion_id: Set("FR-02".into()),
        fraccion_nombre: Set("Trapeado".into()),
        nota_tecnica: Set(None),
    }
    .insert(db)
    .await
    .expect("insert fraccion");
    let sf_id = make_sf_id(&sop_id, "FR-02");
    sop_fraccion::ActiveModel {
        sop_fraccion_id: Set(sf_id.clone()),
        sop_id: Set(sop_id.clone()),
        fraccion_id: Set("FR-02".into()),
        orden: Set(2),
    }
    .insert(db)
    .await
    .expect("insert sop_fraccion");
    sop_fraccion_detalle::ActiveModel {
        sop_fraccion_detalle_id: Set(make_sd_id(&sop_id, "FR-02", Nivel::Basica)),
        sop_fraccion_id: Set(sf_id),
        nivel_limpieza_id: Set(Nivel::Basica.id()),
        kit_id: Set(None),
        receta_id: Set(None),
        elemento_set_id: Set(None),
        consumo_id: Set(None),
        tiempo_unitario_min: Set(Some(5.0)),
    }
    .insert(db)
    .await
    .expect("insert detalle");

    let fecha = chrono::NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");
    common::assign_regular(db, fecha, common::PERSONAL).await;
    common::login(&client, "jefe").await;

    let response = client
        .get(format!("/reporte/{}/{}", fecha, common::PERSONAL))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap_or_default();
    assert!(html.contains("Barrido"));
    assert!(html.contains("Barrer de adentro hacia afuera"));
    assert!(!html.contains("Trapeado"));
}
