#![allow(dead_code)]

use chrono::NaiveDate;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use sop_rutas::build_rocket;
use sop_rutas::config::AppConfig;
use sop_rutas::domain::calendar;
use sop_rutas::domain::ids::{make_sd_id, make_sf_id, make_sop_id};
use sop_rutas::domain::nivel::Nivel;
use sop_rutas::domain::tipos::{AssignmentKind, TipoSop};
use sop_rutas::entities::user::Role;
use sop_rutas::entities::{
    area, fraccion, lanzamiento_tarea, metodologia, metodologia_base, metodologia_base_paso, personal, sop, sop_fraccion,
    sop_fraccion_detalle, sub_area, user,
};
use sop_rutas::services::schedule_service::{self, AssignmentRequest};
use sop_rutas::services::user_service::{UserInput, UserService};

pub const PASSWORD: &str = "secreto123";
pub const AREA: &str = "AR-01";
pub const SUBAREA: &str = "SA-01";
pub const FRACCION: &str = "FR-01";
pub const PERSONAL: &str = "P-01";
pub const OTRO_PERSONAL: &str = "P-02";

/// テストごとにメモリ上の SQLite で Rocket を組み立てる。
/// マイグレーションも毎回走るので、テスト同士で状態は共有されない。
pub async fn setup() -> Client {
    let rocket = build_rocket(AppConfig::for_tests())
        .await
        .expect("rocket should build against sqlite::memory:");
    Client::tracked(rocket).await.expect("valid rocket instance")
}

pub fn db(client: &Client) -> &DatabaseConnection {
    client
        .rocket()
        .state::<DatabaseConnection>()
        .expect("database is managed")
}

pub fn today() -> NaiveDate {
    calendar::today(AppConfig::for_tests().offset())
}

pub const METODOLOGIA: &str = "MB-FR-01-B";

/// エリア・サブエリア・2 人の作業者・Regular SOP (basica の時間付き) を用意する。
/// FR-01 の basica には手順書も付ける。
pub async fn seed_catalog(db: &DatabaseConnection) -> String {
    area::ActiveModel {
        area_id: Set(AREA.into()),
        area_nombre: Set("Producción".into()),
        tipo_area: Set(None),
        cantidad_subareas: Set(Some(1)),
        orden_area: Set(1),
    }
    .insert(db)
    .await
    .expect("insert area");

    sub_area::ActiveModel {
        subarea_id: Set(SUBAREA.into()),
        area_id: Set(AREA.into()),
        subarea_nombre: Set("Mezcladora".into()),
        superficie_subarea: Set(Some(12.5)),
        frecuencia: Set(None),
        orden_subarea: Set(1),
    }
    .insert(db)
    .await
    .expect("insert subarea");

    for (id, nombre) in [(PERSONAL, "Ana"), (OTRO_PERSONAL, "Beto")] {
        personal::ActiveModel {
            personal_id: Set(id.into()),
            nombre: Set(nombre.into()),
        }
        .insert(db)
        .await
        .expect("insert personal");
    }

    fraccion::ActiveModel {
        fraccion_id: Set(FRACCION.into()),
        fraccion_nombre: Set("Barrido".into()),
        nota_tecnica: Set(None),
    }
    .insert(db)
    .await
    .expect("insert fraccion");

    metodologia_base::ActiveModel {
        metodologia_base_id: Set(METODOLOGIA.into()),
        nombre: Set(Some("Barrido-B".into())),
        descripcion: Set(Some("Barrido".into())),
    }
    .insert(db)
    .await
    .expect("insert metodologia_base");
    metodologia_base_paso::ActiveModel {
        metodologia_base_id: Set(METODOLOGIA.into()),
        orden: Set(1),
        instruccion: Set("Barrer de adentro hacia afuera".into()),
    }
    .insert(db)
    .await
    .expect("insert paso");
    metodologia::ActiveModel {
        fraccion_id: Set(FRACCION.into()),
        nivel_limpieza_id: Set(Nivel::Basica.id()),
        metodologia_base_id: Set(METODOLOGIA.into()),
    }
    .insert(db)
    .await
    .expect("insert metodologia");

    let sop_id = make_sop_id(SUBAREA, TipoSop::Regular);
    sop::ActiveModel {
        sop_id: Set(sop_id.clone()),
        subarea_id: Set(SUBAREA.into()),
        tipo_sop: Set(TipoSop::Regular),
        observacion_critica_sop: Set(None),
    }
    .insert(db)
    .await
    .expect("insert sop");

    let sf_id = make_sf_id(&sop_id, FRACCION);
    sop_fraccion::ActiveModel {
        sop_fraccion_id: Set(sf_id.clone()),
        sop_id: Set(sop_id.clone()),
        fraccion_id: Set(FRACCION.into()),
        orden: Set(1),
    }
    .insert(db)
    .await
    .expect("insert sop_fraccion");

    sop_fraccion_detalle::ActiveModel {
        sop_fraccion_detalle_id: Set(make_sd_id(&sop_id, FRACCION, Nivel::Basica)),
        sop_fraccion_id: Set(sf_id),
        nivel_limpieza_id: Set(Nivel::Basica.id()),
        kit_id: Set(None),
        receta_id: Set(None),
        elemento_set_id: Set(None),
        consumo_id: Set(None),
        tiempo_unitario_min: Set(Some(2.5)),
    }
    .insert(db)
    .await
    .expect("insert detalle");

    sop_id
}

pub async fn create_admin(db: &DatabaseConnection, username: &str) -> user::Model {
    UserService::create(
        db,
        UserInput {
            username: username.into(),
            password: Some(PASSWORD.into()),
            role: Role::Admin,
            is_active: true,
            personal_id: None,
        },
    )
    .await
    .expect("create admin")
}

pub async fn create_operativo(db: &DatabaseConnection, username: &str, personal_id: &str) -> user::Model {
    UserService::create(
        db,
        UserInput {
            username: username.into(),
            password: Some(PASSWORD.into()),
            role: Role::Operativo,
            is_active: true,
            personal_id: Some(personal_id.into()),
        },
    )
    .await
    .expect("create operativo")
}

/// Regular / basica のタスクを 1 件割り当てる
pub async fn assign_regular(db: &DatabaseConnection, fecha: NaiveDate, personal_id: &str) -> lanzamiento_tarea::Model {
    schedule_service::assign_task(
        db,
        fecha,
        AssignmentRequest {
            personal_id: personal_id.into(),
            subarea_id: SUBAREA.into(),
            nivel: Some(Nivel::Basica),
            kind: AssignmentKind::Regular,
            es_adicional: false,
        },
    )
    .await
    .expect("assign task")
}

/// CSRF クッキーを (無ければ GET で発行させて) 読む
pub async fn csrf(client: &Client) -> String {
    if let Some(cookie) = client.cookies().get("csrf_token") {
        return cookie.value().to_string();
    }
    client.get("/login").dispatch().await;
    client
        .cookies()
        .get("csrf_token")
        .map(|c| c.value().to_string())
        .expect("csrf cookie should be issued on GET")
}

pub async fn login(client: &Client, username: &str) {
    let token = csrf(client).await;
    let response = client
        .post("/login")
        .header(ContentType::Form)
        .body(format!("username={}&password={}&csrf_token={}", username, PASSWORD, token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::SeeOther);
}

/// `csrf_token` を付けてフォームを POST する
pub async fn post_form(client: &Client, uri: &str, body: &str) -> (Status, Option<String>) {
    let token = csrf(client).await;
    let body = if body.is_empty() {
        format!("csrf_token={}", token)
    } else {
        format!("{}&csrf_token={}", body, token)
    };
    let response = client
        .post(uri.to_string())
        .header(ContentType::Form)
        .body(body)
        .dispatch()
        .await;
    let location = response.headers().get_one("Location").map(str::to_string);
    (response.status(), location)
}
