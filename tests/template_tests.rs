use chrono::NaiveDate;
use rocket::http::Status;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use sop_rutas::domain::calendar;
use sop_rutas::domain::ids::make_sop_id;
use sop_rutas::domain::nivel::Nivel;
use sop_rutas::domain::tipos::{AssignmentKind, TipoSop, TipoTarea};
use sop_rutas::entities::{lanzamiento_tarea, plantilla_item, prelude::*, sop, sub_area};
use sop_rutas::errors::AppError;
use sop_rutas::services::schedule_service::{self, AssignmentRequest};
use sop_rutas::services::template_service::{self, CaptureTarget, ItemRequest};

mod common;

fn lunes() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).expect("valid monday")
}

fn ahora() -> chrono::NaiveDateTime {
    lunes().and_hms_opt(8, 0, 0).expect("valid time")
}

/// (曜日, 作業者, エリア, サブエリア, レベル)
type Fila = (i32, String, Option<String>, Option<String>, Option<Nivel>);

/// 週の SOP タスクを曜日順に並べて返す
async fn semana_sop(db: &sea_orm::DatabaseConnection, lunes: NaiveDate) -> Vec<Fila> {
    let mut filas = Vec::new();
    for (i, fecha) in calendar::working_week(lunes).into_iter().enumerate() {
        let Some(dia) = schedule_service::find_dia(db, fecha).await.expect("query dia") else {
            continue;
        };
        let tareas = LanzamientoTarea::find()
            .filter(lanzamiento_tarea::Column::DiaId.eq(dia.dia_id))
            .filter(lanzamiento_tarea::Column::TipoTarea.eq(TipoTarea::Sop))
            .all(db)
            .await
            .expect("query tasks");
        for t in tareas {
            filas.push((i as i32, t.personal_id, t.area_id, t.subarea_id, t.nivel_limpieza_asignado));
        }
    }
    filas.sort_by(|a, b| (a.0, &a.1, &a.3).cmp(&(b.0, &b.1, &b.3)));
    filas
}

/// (曜日, 作業者, エリア, サブエリア, レベル, SOP, adicional)
async fn items_de(
    db: &sea_orm::DatabaseConnection,
    plantilla_id: i32,
) -> Vec<(i32, String, String, String, Nivel, Option<String>, bool)> {
    let mut items: Vec<_> = PlantillaItem::find()
        .filter(plantilla_item::Column::PlantillaId.eq(plantilla_id))
        .all(db)
        .await
        .expect("query items")
        .into_iter()
        .map(|i| (i.dia_index, i.personal_id, i.area_id, i.subarea_id, i.nivel_limpieza_asignado, i.sop_id, i.es_adicional))
        .collect();
    items.sort_by(|a, b| (a.0, &a.1, &a.3).cmp(&(b.0, &b.1, &b.3)));
    items
}

async fn contar_sop(db: &sea_orm::DatabaseConnection) -> u64 {
    LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::TipoTarea.eq(TipoTarea::Sop))
        .count(db)
        .await
        .expect("count tasks")
}

#[rocket::async_test]
async fn test_capture_then_apply_rebuilds_week() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;

    // 月曜と水曜に 1 件ずつ
    common::assign_regular(db, lunes(), common::PERSONAL).await;
    common::assign_regular(db, lunes() + chrono::Duration::days(2), common::OTRO_PERSONAL).await;

    let plantilla = template_service::capture_week(db, lunes(), CaptureTarget::Nueva("Semana base".into()), ahora())
        .await
        .expect("capture");
    let items = PlantillaItem::find().all(db).await.expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(
        items.iter().map(|i| i.dia_index).collect::<Vec<_>>(),
        vec![0, 2]
    );

    let borradas = template_service::empty_week(db, lunes(), ahora()).await.expect("empty week");
    assert_eq!(borradas, 8);
    assert_eq!(contar_sop(db).await, 0);

    // 週のどの日を渡しても月曜起点で適用される
    let outcome = template_service::apply_template(db, plantilla.plantilla_id, lunes() + chrono::Duration::days(4), ahora())
        .await
        .expect("apply");
    assert_eq!(outcome.creadas, 2);
    assert_eq!(outcome.omitidas, 0);
    assert_eq!(contar_sop(db).await, 2);

    let fijas = LanzamientoTarea::find()
        .filter(lanzamiento_tarea::Column::TipoTarea.ne(TipoTarea::Sop))
        .count(db)
        .await
        .expect("count fixed");
    assert_eq!(fijas, 6);

    let activa = template_service::active_for_week(db, lunes()).await.expect("active");
    assert_eq!(activa.map(|p| p.plantilla_id), Some(plantilla.plantilla_id));
}

#[rocket::async_test]
async fn test_duplicate_template_name_is_conflict() {
    let client = common::setup().await;
    let db = common::db(&client);

    template_service::create(db, "Semana A", ahora()).await.expect("create");
    let err = template_service::create(db, "Semana A", ahora()).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = template_service::create(db, "   ", ahora()).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[rocket::async_test]
async fn test_template_items_follow_slot_rules() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    let plantilla = template_service::create(db, "Semana B", ahora()).await.expect("create");

    let item = |personal: &str, es_adicional: bool, dia_index: i32| ItemRequest {
        dia_index,
        personal_id: personal.into(),
        subarea_id: common::SUBAREA.into(),
        nivel: Some(Nivel::Media),
        kind: AssignmentKind::Regular,
        es_adicional,
    };

    template_service::add_item(db, plantilla.plantilla_id, item(common::PERSONAL, false, 1))
        .await
        .expect("first item");
    let err = template_service::add_item(db, plantilla.plantilla_id, item(common::OTRO_PERSONAL, false, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // 別の日なら入る
    template_service::add_item(db, plantilla.plantilla_id, item(common::OTRO_PERSONAL, false, 2))
        .await
        .expect("other day");

    let err = template_service::add_item(db, plantilla.plantilla_id, item(common::PERSONAL, false, 6))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[rocket::async_test]
async fn test_apply_asks_for_confirmation_first() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::assign_regular(db, lunes(), common::PERSONAL).await;
    let plantilla = template_service::capture_week(db, lunes(), CaptureTarget::Nueva("Semana C".into()), ahora())
        .await
        .expect("capture");
    common::login(&client, "jefe").await;

    let token = common::csrf(&client).await;
    let response = client
        .post("/plantillas/aplicar")
        .header(rocket::http::ContentType::Form)
        .body(format!("plantilla_id={}&lunes={}&csrf_token={}", plantilla.plantilla_id, lunes(), token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap_or_default();
    assert!(html.contains("Semana C"));
    assert!(html.contains("confirmar"));

    let body = format!("plantilla_id={}&lunes={}&confirmar=true", plantilla.plantilla_id, lunes());
    let (status, location) = common::post_form(&client, "/plantillas/aplicar", &body).await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location, Some(format!("/admin?fecha={}", lunes())));
    assert_eq!(contar_sop(db).await, 1);
}

#[rocket::async_test]
async fn test_apply_to_another_week_then_capture_back() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    let origen = NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid monday");
    let destino = NaiveDate::from_ymd_opt(2024, 6, 10).expect("valid monday");
    let ahora = origen.and_hms_opt(7, 0, 0).expect("valid time");

    common::assign_regular(db, origen, common::PERSONAL).await;
    schedule_service::assign_task(
        db,
        origen + chrono::Duration::days(3),
        AssignmentRequest {
            personal_id: common::OTRO_PERSONAL.into(),
            subarea_id: common::SUBAREA.into(),
            nivel: Some(Nivel::Media),
            kind: AssignmentKind::Regular,
            es_adicional: false,
        },
    )
    .await
    .expect("assign thursday");

    let t1 = template_service::capture_week(db, origen, CaptureTarget::Nueva("T1".into()), ahora)
        .await
        .expect("capture T1");
    let outcome = template_service::apply_template(db, t1.plantilla_id, destino, ahora)
        .await
        .expect("apply T1");
    assert_eq!(outcome.creadas, 2);

    // 元の週は触られず、次の週に同じ並びができる
    let filas_origen = semana_sop(db, origen).await;
    assert_eq!(filas_origen.len(), 2);
    assert_eq!(semana_sop(db, destino).await, filas_origen);

    let t2 = template_service::capture_week(db, destino, CaptureTarget::Nueva("T2".into()), ahora)
        .await
        .expect("capture T2");
    assert_eq!(items_de(db, t2.plantilla_id).await, items_de(db, t1.plantilla_id).await);
}

#[rocket::async_test]
async fn test_deleting_template_removes_its_items() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::assign_regular(db, lunes(), common::PERSONAL).await;
    common::assign_regular(db, lunes() + chrono::Duration::days(1), common::OTRO_PERSONAL).await;
    let plantilla = template_service::capture_week(db, lunes(), CaptureTarget::Nueva("Semana D".into()), ahora())
        .await
        .expect("capture");
    template_service::apply_template(db, plantilla.plantilla_id, lunes(), ahora())
        .await
        .expect("apply");
    assert_eq!(items_de(db, plantilla.plantilla_id).await.len(), 2);
    common::login(&client, "jefe").await;

    let (status, location) = common::post_form(&client, &format!("/plantillas/{}/borrar", plantilla.plantilla_id), "").await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/plantillas"));

    assert!(PlantillaSemanal::find_by_id(plantilla.plantilla_id).one(db).await.expect("query").is_none());
    assert_eq!(PlantillaItem::find().count(db).await.expect("count items"), 0);
    assert!(template_service::active_for_week(db, lunes()).await.expect("active").is_none());
    // 適用済みのタスクはそのまま
    assert_eq!(contar_sop(db).await, 2);
}

#[rocket::async_test]
async fn test_regular_sop_with_c_in_subarea_code_is_not_stacked() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;

    // コードに `-C` を含むサブエリアの Regular SOP
    let subarea_id = "BA-CO-01";
    sub_area::ActiveModel {
        subarea_id: Set(subarea_id.into()),
        area_id: Set(common::AREA.into()),
        subarea_nombre: Set("Baño comedor".into()),
        superficie_subarea: Set(None),
        frecuencia: Set(None),
        orden_subarea: Set(2),
    }
    .insert(db)
    .await
    .expect("insert subarea");
    let sop_id = make_sop_id(subarea_id, TipoSop::Regular);
    assert!(sop_id.contains("-C"));
    sop::ActiveModel {
        sop_id: Set(sop_id.clone()),
        subarea_id: Set(subarea_id.into()),
        tipo_sop: Set(TipoSop::Regular),
        observacion_critica_sop: Set(None),
    }
    .insert(db)
    .await
    .expect("insert sop");

    let plantilla = template_service::create(db, "Semana E", ahora()).await.expect("create");
    for personal in [common::PERSONAL, common::OTRO_PERSONAL] {
        plantilla_item::ActiveModel {
            plantilla_id: Set(plantilla.plantilla_id),
            dia_index: Set(0),
            personal_id: Set(personal.into()),
            area_id: Set(common::AREA.into()),
            subarea_id: Set(subarea_id.into()),
            nivel_limpieza_asignado: Set(Nivel::Basica),
            sop_id: Set(Some(sop_id.clone())),
            es_adicional: Set(true),
            orden: Set(10),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert item");
    }

    let outcome = template_service::apply_template(db, plantilla.plantilla_id, lunes(), ahora())
        .await
        .expect("apply");
    assert_eq!(outcome.creadas, 1);
    assert_eq!(outcome.omitidas, 1);
}
