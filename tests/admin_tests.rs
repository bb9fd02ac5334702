use rocket::http::Status;
use sea_orm::EntityTrait;

use sop_rutas::entities::prelude::*;
use sop_rutas::entities::user::Role;
use sop_rutas::errors::AppError;
use sop_rutas::services::user_service::{UserInput, UserService};

mod common;

#[rocket::async_test]
async fn test_area_crud() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;

    // 主キーは大文字に揃えて保存される
    let (status, location) = common::post_form(
        &client,
        "/admin/areas/create",
        "area_id=ba-02&area_nombre=Ba%C3%B1os&orden_area=5",
    )
    .await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/admin/areas"));
    let area = Area::find_by_id("BA-02".to_string())
        .one(db)
        .await
        .expect("query")
        .expect("area created");
    assert_eq!(area.area_nombre, "Baños");

    let response = client.get("/admin/areas").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert!(response.into_string().await.unwrap_or_default().contains("BA-02"));

    let (status, _) = common::post_form(
        &client,
        "/admin/areas/edit/BA-02",
        "area_id=BA-02&area_nombre=Sanitarios&orden_area=5",
    )
    .await;
    assert_eq!(status, Status::SeeOther);
    let area = Area::find_by_id("BA-02".to_string()).one(db).await.expect("query").expect("area");
    assert_eq!(area.area_nombre, "Sanitarios");

    common::post_form(&client, "/admin/areas/delete/BA-02", "").await;
    assert!(Area::find_by_id("BA-02".to_string()).one(db).await.expect("query").is_none());
}

#[rocket::async_test]
async fn test_invalid_code_is_rejected() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;

    let (status, location) = common::post_form(
        &client,
        "/admin/areas/create",
        "area_id=BA%2002&area_nombre=Mal&orden_area=1",
    )
    .await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/admin/areas/create"));
    assert!(Area::find().all(db).await.expect("query").is_empty());
}

#[rocket::async_test]
async fn test_referenced_area_cannot_be_deleted() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;

    let (status, location) = common::post_form(&client, &format!("/admin/areas/delete/{}", common::AREA), "").await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/admin/areas"));
    assert!(Area::find_by_id(common::AREA.to_string()).one(db).await.expect("query").is_some());
}

#[rocket::async_test]
async fn test_next_id_api() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;

    let response = client.get("/api/kits/next-id?grupo=li").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().await.unwrap_or_default();
    assert!(body.contains("KT-LI-001"));

    // 消費量はグループ固定
    let response = client.get("/api/consumos/next-id").dispatch().await;
    let body = response.into_string().await.unwrap_or_default();
    assert!(body.contains("CM-DS-001"));

    let response = client.get("/api/kits/next-id?grupo=abc").dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client.get("/api/planetas/next-id?grupo=li").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_user_admin_rules() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    let jefe = common::create_admin(db, "jefe").await;
    common::create_operativo(db, "ana", common::PERSONAL).await;

    // operativo sin personal
    let err = UserService::create(
        db,
        UserInput {
            username: "sin_personal".into(),
            password: Some(common::PASSWORD.into()),
            role: Role::Operativo,
            is_active: true,
            personal_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // 同じ personal に 2 つ目のアカウント
    let err = UserService::create(
        db,
        UserInput {
            username: "ana2".into(),
            password: Some(common::PASSWORD.into()),
            role: Role::Operativo,
            is_active: true,
            personal_id: Some(common::PERSONAL.into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = UserService::delete(db, jefe.id, jefe.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[rocket::async_test]
async fn test_user_admin_screens() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;

    let body = format!(
        "username=beto&password={}&role=operativo&is_active=true&personal_id={}",
        common::PASSWORD,
        common::OTRO_PERSONAL
    );
    let (status, location) = common::post_form(&client, "/admin/users/create", &body).await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/admin/users"));

    let response = client.get("/admin/users").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap_or_default();
    assert!(html.contains("beto"));

    let beto = UserService::find_by_username(db, "beto").await.expect("query").expect("beto");
    assert_eq!(beto.role, Role::Operativo);
    assert_eq!(beto.personal_id.as_deref(), Some(common::OTRO_PERSONAL));
    assert_ne!(beto.password_hash, common::PASSWORD);
}
