use rocket::http::{ContentType, Header, Status};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use sop_rutas::domain::ids::make_sop_id;
use sop_rutas::domain::nivel::Nivel;
use sop_rutas::domain::tipos::{AssignmentKind, TipoSop, TipoTarea};
use sop_rutas::entities::{lanzamiento_tarea, prelude::*};
use sop_rutas::errors::AppError;
use sop_rutas::services::schedule_service::{self, AssignmentRequest};
use sop_rutas::services::sop_service::{self, FraccionSeleccion};

mod common;

async fn tareas_de(db: &sea_orm::DatabaseConnection, personal_id: &str) -> Vec<lanzamiento_tarea::Model> {
    LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::PersonalId.eq(personal_id))
        .order_by_asc(lanzamiento_tarea::Column::Orden)
        .all(db)
        .await
        .expect("query tasks")
}

#[rocket::async_test]
async fn test_assign_creates_fixed_tasks_once() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;

    let uri = "/plan/2025-03-03/asignar";
    let body = format!("personal_id={}&subarea_id={}&nivel_limpieza_asignado=basica&tipo_sop=regular", common::PERSONAL, common::SUBAREA);
    let (status, location) = common::post_form(&client, uri, &body).await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/plan/2025-03-03"));

    let tareas = tareas_de(db, common::PERSONAL).await;
    let tipos: Vec<TipoTarea> = tareas.iter().map(|t| t.tipo_tarea).collect();
    assert_eq!(
        tipos,
        vec![TipoTarea::Inicio, TipoTarea::Sop, TipoTarea::Receso, TipoTarea::LimpiezaEquipo]
    );
    let equipo = tareas.last().expect("limpieza_equipo");
    assert_eq!(equipo.orden, 999);
    assert_eq!(equipo.sop_evento_id.as_deref(), Some("SP-LI-EQ-001"));

    // イベントを足しても固定タスクは 1 セットのまま
    let body = format!("personal_id={}&sop_evento_id=SP-LI-EQ-001", common::PERSONAL);
    let (status, _) = common::post_form(&client, "/plan/2025-03-03/evento", &body).await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(tareas_de(db, common::PERSONAL).await.len(), 5);
    let fijas = tareas_de(db, common::PERSONAL)
        .await
        .into_iter()
        .filter(|t| t.tipo_tarea.is_fixed())
        .count();
    assert_eq!(fijas, 3);

    let response = client.get("/plan/2025-03-03").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap_or_default();
    assert!(html.contains("Mezcladora"));
}

#[rocket::async_test]
async fn test_assign_form_with_zero_one_flag() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;

    let uri = "/plan/2025-03-03/asignar";
    let body = |personal: &str| {
        format!(
            "personal_id={}&subarea_id={}&nivel_limpieza_asignado=media&es_adicional=0&tipo_sop=regular",
            personal,
            common::SUBAREA
        )
    };
    let (status, location) = common::post_form(&client, uri, &body(common::PERSONAL)).await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/plan/2025-03-03"));
    let tareas = tareas_de(db, common::PERSONAL).await;
    let sop = tareas
        .iter()
        .find(|t| t.tipo_tarea == TipoTarea::Sop)
        .expect("sop task");
    assert_eq!(sop.nivel_limpieza_asignado, Some(Nivel::Media));
    assert!(!sop.es_adicional);

    // 同じ枠への 2 回目は warning で戻され、行は増えない
    let (status, _) = common::post_form(&client, uri, &body(common::OTRO_PERSONAL)).await;
    assert_eq!(status, Status::SeeOther);
    let sops = LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::TipoTarea.eq(TipoTarea::Sop))
        .all(db)
        .await
        .expect("query tasks");
    assert_eq!(sops.len(), 1);

    // tipo_sop=consecuente と es_adicional=1 はそのまま反映される
    sop_service::save_fracciones(
        db,
        common::SUBAREA,
        TipoSop::Consecuente,
        Nivel::Basica,
        &[FraccionSeleccion {
            fraccion_id: common::FRACCION.into(),
            orden: Some(1),
        }],
    )
    .await
    .expect("consecuente sop");
    let body = format!(
        "personal_id={}&subarea_id={}&nivel_limpieza_asignado=media&es_adicional=1&tipo_sop=consecuente",
        common::OTRO_PERSONAL,
        common::SUBAREA
    );
    let (status, _) = common::post_form(&client, uri, &body).await;
    assert_eq!(status, Status::SeeOther);
    let adicional = tareas_de(db, common::OTRO_PERSONAL)
        .await
        .into_iter()
        .find(|t| t.tipo_tarea == TipoTarea::Sop)
        .expect("additional task");
    assert!(adicional.es_adicional);
    assert_eq!(adicional.sop_id, Some(make_sop_id(common::SUBAREA, TipoSop::Consecuente)));
    assert_eq!(adicional.nivel_limpieza_asignado, Some(Nivel::Basica));
}

#[rocket::async_test]
async fn test_second_regular_in_same_slot_is_rejected() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    let fecha = chrono::NaiveDate::from_ymd_opt(2025, 3, 4).expect("valid date");

    common::assign_regular(db, fecha, common::PERSONAL).await;

    let err = schedule_service::assign_task(
        db,
        fecha,
        AssignmentRequest {
            personal_id: common::OTRO_PERSONAL.into(),
            subarea_id: common::SUBAREA.into(),
            nivel: Some(Nivel::Media),
            kind: AssignmentKind::Regular,
            es_adicional: false,
        },
    )
    .await
    .unwrap_err();
    match err {
        AppError::Conflict(msg) => assert!(msg.contains("ya tiene una tarea REGULAR")),
        other => panic!("expected conflict, got {:?}", other),
    }

    // 同じ SOP を追加で重ねるのも不可
    let err = schedule_service::assign_task(
        db,
        fecha,
        AssignmentRequest {
            personal_id: common::OTRO_PERSONAL.into(),
            subarea_id: common::SUBAREA.into(),
            nivel: Some(Nivel::Media),
            kind: AssignmentKind::Regular,
            es_adicional: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(tareas_de(db, common::OTRO_PERSONAL).await.is_empty());
}

#[rocket::async_test]
async fn test_regular_without_level_is_bad_request() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    let fecha = chrono::NaiveDate::from_ymd_opt(2025, 3, 4).expect("valid date");

    let err = schedule_service::assign_task(
        db,
        fecha,
        AssignmentRequest {
            personal_id: common::PERSONAL.into(),
            subarea_id: common::SUBAREA.into(),
            nivel: None,
            kind: AssignmentKind::Regular,
            es_adicional: false,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[rocket::async_test]
async fn test_ajax_delete_returns_json() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;
    let fecha = chrono::NaiveDate::from_ymd_opt(2025, 3, 5).expect("valid date");
    let tarea = common::assign_regular(db, fecha, common::PERSONAL).await;

    let token = common::csrf(&client).await;
    let response = client
        .post(format!("/plan/2025-03-05/borrar/{}", tarea.tarea_id))
        .header(ContentType::Form)
        .header(Header::new("X-Requested-With", "XMLHttpRequest"))
        .body(format!("csrf_token={}", token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().await.unwrap_or_default();
    assert!(body.contains("\"success\":true"));

    // 2 回目は 404
    let response = client
        .post(format!("/plan/2025-03-05/borrar/{}", tarea.tarea_id))
        .header(ContentType::Form)
        .header(Header::new("X-Requested-With", "XMLHttpRequest"))
        .body(format!("csrf_token={}", token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_reorder_tasks_api() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;
    let fecha = chrono::NaiveDate::from_ymd_opt(2025, 3, 6).expect("valid date");
    let tarea = common::assign_regular(db, fecha, common::PERSONAL).await;
    let token = common::csrf(&client).await;

    let response = client
        .post("/api/reordenar-tareas")
        .header(ContentType::JSON)
        .header(Header::new("X-CSRF-Token", token.clone()))
        .body(format!(r#"{{"orden":[{{"id":{},"orden":70}}]}}"#, tarea.tarea_id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let moved = LanzamientoTarea::find_by_id(tarea.tarea_id)
        .one(db)
        .await
        .expect("query")
        .expect("task");
    assert_eq!(moved.orden, 70);

    // 壊れた JSON は 400
    let response = client
        .post("/api/reordenar-tareas")
        .header(ContentType::JSON)
        .header(Header::new("X-CSRF-Token", token))
        .body(r#"{"orden":"nope"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body = response.into_string().await.unwrap_or_default();
    assert!(body.contains("Datos inválidos"));

    // トークン無しは 403
    let response = client
        .post("/api/reordenar-tareas")
        .header(ContentType::JSON)
        .body(r#"{"orden":[]}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
}

#[rocket::async_test]
async fn test_subareas_con_sop_lists_regular() {
    let client = common::setup().await;
    let db = common::db(&client);
    let sop_id = common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;

    let response = client
        .get(format!("/api/subareas_con_sop/{}", common::AREA))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().await.unwrap_or_default();
    assert!(body.contains(common::SUBAREA));

    let response = client
        .get(format!("/api/verificar_sop/{}/regular", common::SUBAREA))
        .dispatch()
        .await;
    let body = response.into_string().await.unwrap_or_default();
    assert!(body.contains("\"existe\":true"));
    assert!(body.contains(&sop_id));

    let response = client
        .get(format!("/api/verificar_sop/{}/otro", common::SUBAREA))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}
