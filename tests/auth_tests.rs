use rocket::http::{ContentType, Status};

mod common;

#[rocket::async_test]
async fn test_anonymous_is_sent_to_login() {
    let client = common::setup().await;

    // 未ログインの画面アクセスはログインへ
    let response = client.get("/admin").dispatch().await;
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/login"));

    let response = client.get("/").dispatch().await;
    assert_eq!(response.headers().get_one("Location"), Some("/login"));
}

#[rocket::async_test]
async fn test_anonymous_api_gets_json_401() {
    let client = common::setup().await;

    let response = client.get("/api/subareas_con_sop/AR-01").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
    let body = response.into_string().await.unwrap_or_default();
    assert!(body.contains("\"success\":false"));
}

#[rocket::async_test]
async fn test_login_page_issues_csrf_cookie() {
    let client = common::setup().await;

    let response = client.get("/login").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let token = response
        .cookies()
        .get("csrf_token")
        .map(|c| c.value().to_string())
        .expect("csrf cookie");
    assert!(!token.is_empty());

    // フォームの hidden 欄にも同じ値が入っている
    let body = response.into_string().await.unwrap_or_default();
    assert!(body.contains(&token));
}

#[rocket::async_test]
async fn test_admin_login_redirects_to_admin_home() {
    let client = common::setup().await;
    common::create_admin(common::db(&client), "jefe").await;

    let token = common::csrf(&client).await;
    let response = client
        .post("/login")
        .header(ContentType::Form)
        .body(format!("username=jefe&password={}&csrf_token={}", common::PASSWORD, token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/admin"));
    assert!(response.cookies().get_private("user_id").is_some());

    let response = client.get("/admin").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
}

#[rocket::async_test]
async fn test_operativo_login_redirects_to_own_route() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_operativo(db, "ana", common::PERSONAL).await;

    let token = common::csrf(&client).await;
    let response = client
        .post("/login")
        .header(ContentType::Form)
        .body(format!("username=ana&password={}&csrf_token={}", common::PASSWORD, token))
        .dispatch()
        .await;
    assert_eq!(response.headers().get_one("Location"), Some("/mi_ruta"));

    let response = client.get("/mi_ruta").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    // 管理画面は 403
    let response = client.get("/admin").dispatch().await;
    assert_eq!(response.status(), Status::Forbidden);
    let response = client.get("/admin/areas").dispatch().await;
    assert_eq!(response.status(), Status::Forbidden);
}

#[rocket::async_test]
async fn test_wrong_password_stays_on_login() {
    let client = common::setup().await;
    common::create_admin(common::db(&client), "jefe").await;

    let token = common::csrf(&client).await;
    let response = client
        .post("/login")
        .header(ContentType::Form)
        .body(format!("username=jefe&password=incorrecta&csrf_token={}", token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/login"));
    assert!(response.cookies().get_private("user_id").is_none());
}

#[rocket::async_test]
async fn test_login_without_csrf_is_rejected() {
    let client = common::setup().await;
    common::create_admin(common::db(&client), "jefe").await;
    common::csrf(&client).await;

    let response = client
        .post("/login")
        .header(ContentType::Form)
        .body(format!("username=jefe&password={}&csrf_token=otro", common::PASSWORD))
        .dispatch()
        .await;
    assert_eq!(response.headers().get_one("Location"), Some("/login"));
    assert!(response.cookies().get_private("user_id").is_none());
}

#[rocket::async_test]
async fn test_logout_clears_session() {
    let client = common::setup().await;
    common::create_admin(common::db(&client), "jefe").await;
    common::login(&client, "jefe").await;

    let (status, location) = common::post_form(&client, "/logout", "").await;
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/login"));

    let response = client.get("/admin").dispatch().await;
    assert_eq!(response.headers().get_one("Location"), Some("/login"));
}
