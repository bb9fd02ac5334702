use rocket::http::Status;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use sop_rutas::domain::ids::{make_es_id, make_sf_id, make_sop_id};
use sop_rutas::domain::nivel::Nivel;
use sop_rutas::domain::tipos::TipoSop;
use sop_rutas::entities::{elemento, elemento_detalle, prelude::*, sop_fraccion_detalle};
use sop_rutas::errors::AppError;
use sop_rutas::services::sop_service::{self, DetailInput, DetailMode, ElementoLinea, FraccionSeleccion};

mod common;

fn seleccion(ids: &[&str]) -> Vec<FraccionSeleccion> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| FraccionSeleccion {
            fraccion_id: id.to_string(),
            orden: Some(i as i32 + 1),
        })
        .collect()
}

#[rocket::async_test]
async fn test_fracciones_form_creates_consecuente_sop() {
    let client = common::setup().await;
    let db = common::db(&client);
    common::seed_catalog(db).await;
    common::create_admin(db, "jefe").await;
    common::login(&client, "jefe").await;

    let body = format!(
        "tipo_sop=consecuente&nivel=basica&fracciones={f}&orden%5B{f}%5D=3",
        f = common::FRACCION
    );
    let (status, location) = common::post_form(&client, &format!("/sop/fracciones/{}", common::SUBAREA), &body).await;
    assert_eq!(status, Status::SeeOther);

    let sop_id = make_sop_id(common::SUBAREA, TipoSop::Consecuente);
    assert!(location.unwrap_or_default().starts_with(&format!("/sop/detalles/{}", sop_id)));
    let sop = Sop::find_by_id(sop_id.clone()).one(db).await.expect("query").expect("sop created");
    assert_eq!(sop.tipo_sop, TipoSop::Consecuente);

    let sf = SopFraccion::find_by_id(make_sf_id(&sop_id, common::FRACCION))
        .one(db)
        .await
        .expect("query")
        .expect("sop_fraccion");
    assert_eq!(sf.orden, 3);

    let response = client.get("/sop/detalles/".to_string() + &sop_id).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert!(response.into_string().await.unwrap_or_default().contains("Barrido"));
}

#[rocket::async_test]
async fn test_unselected_fraction_is_removed_per_level() {
    let client = common::setup().await;
    let db = common::db(&client);
    let sop_id = common::seed_catalog(db).await;
    let sf_id = make_sf_id(&sop_id, common::FRACCION);

    // media にも同じフラクションを入れる
    sop_service::save_fracciones(db, common::SUBAREA, TipoSop::Regular, Nivel::Media, &seleccion(&[common::FRACCION]))
        .await
        .expect("save media");
    let detalles = SopFraccionDetalle::find()
        .filter(sop_fraccion_detalle::Column::SopFraccionId.eq(sf_id.as_str()))
        .all(db)
        .await
        .expect("query");
    assert_eq!(detalles.len(), 2);

    // 空の選択は拒否
    let err = sop_service::save_fracciones(db, common::SUBAREA, TipoSop::Regular, Nivel::Media, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // media から外しても basica の明細があるので SopFraccion は残る
    Fraccion::insert(sop_rutas::entities::fraccion::ActiveModel {
        fraccion_id: Set("FR-02".into()),
        fraccion_nombre: Set("Trapeado".into()),
        nota_tecnica: Set(None),
    })
    .exec(db)
    .await
    .expect("insert fraccion");
    sop_service::save_fracciones(db, common::SUBAREA, TipoSop::Regular, Nivel::Media, &seleccion(&["FR-02"]))
        .await
        .expect("swap media");
    assert!(SopFraccion::find_by_id(sf_id.clone()).one(db).await.expect("query").is_some());

    // basica からも外せば消える
    sop_service::save_fracciones(db, common::SUBAREA, TipoSop::Regular, Nivel::Basica, &seleccion(&["FR-02"]))
        .await
        .expect("swap basica");
    assert!(SopFraccion::find_by_id(sf_id).one(db).await.expect("query").is_none());
}

#[rocket::async_test]
async fn test_detail_modes_are_exclusive() {
    let client = common::setup().await;
    let db = common::db(&client);
    let sop_id = common::seed_catalog(db).await;
    let sf_id = make_sf_id(&sop_id, common::FRACCION);

    elemento::ActiveModel {
        elemento_id: Set("EL-MZ-001".into()),
        subarea_id: Set(common::SUBAREA.into()),
        nombre: Set("Tolva".into()),
        cantidad: Set(Some(1.0)),
        estatus: Set(None),
        descripcion: Set(None),
    }
    .insert(db)
    .await
    .expect("insert elemento");

    let guardado = sop_service::save_detail(
        db,
        &sop_id,
        &sf_id,
        Nivel::Basica,
        DetailInput {
            tiempo_unitario_min: Some(4.0),
            mode: DetailMode::Elementos {
                lineas: vec![ElementoLinea {
                    elemento_id: "EL-MZ-001".into(),
                    orden: Some(1),
                    ..Default::default()
                }],
            },
        },
    )
    .await
    .expect("save elementos");
    let es_id = make_es_id(&sop_id, common::FRACCION, Nivel::Basica);
    assert_eq!(guardado.elemento_set_id.as_deref(), Some(es_id.as_str()));
    assert_eq!(
        ElementoDetalle::find()
            .filter(elemento_detalle::Column::ElementoSetId.eq(es_id.as_str()))
            .all(db)
            .await
            .expect("query")
            .len(),
        1
    );

    // 直接モードに戻すと要素セットは消える
    let guardado = sop_service::save_detail(
        db,
        &sop_id,
        &sf_id,
        Nivel::Basica,
        DetailInput {
            tiempo_unitario_min: Some(3.0),
            mode: DetailMode::Directo {
                kit_id: None,
                receta_id: None,
                consumo_id: None,
            },
        },
    )
    .await
    .expect("save directo");
    assert!(guardado.elemento_set_id.is_none());
    assert!(ElementoSet::find_by_id(es_id).one(db).await.expect("query").is_none());

    // 存在しないキットは拒否
    let err = sop_service::save_detail(
        db,
        &sop_id,
        &sf_id,
        Nivel::Basica,
        DetailInput {
            tiempo_unitario_min: None,
            mode: DetailMode::Directo {
                kit_id: Some("KT-XX-001".into()),
                receta_id: None,
                consumo_id: None,
            },
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // 同じ要素を 2 行入れるのも拒否
    let linea = || ElementoLinea {
        elemento_id: "EL-MZ-001".into(),
        ..Default::default()
    };
    let err = sop_service::save_detail(
        db,
        &sop_id,
        &sf_id,
        Nivel::Basica,
        DetailInput {
            tiempo_unitario_min: None,
            mode: DetailMode::Elementos {
                lineas: vec![linea(), linea()],
            },
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // 他のサブエリアの要素も拒否
    let err = sop_service::save_detail(
        db,
        &sop_id,
        &sf_id,
        Nivel::Basica,
        DetailInput {
            tiempo_unitario_min: None,
            mode: DetailMode::Elementos {
                lineas: vec![ElementoLinea {
                    elemento_id: "EL-OTRO-001".into(),
                    ..Default::default()
                }],
            },
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[rocket::async_test]
async fn test_observacion_blank_clears() {
    let client = common::setup().await;
    let db = common::db(&client);
    let sop_id = common::seed_catalog(db).await;

    let sop = sop_service::set_observacion(db, &sop_id, Some("Desconectar la mezcladora".into()))
        .await
        .expect("set");
    assert_eq!(sop.observacion_critica_sop.as_deref(), Some("Desconectar la mezcladora"));

    let sop = sop_service::set_observacion(db, &sop_id, Some("   ".into())).await.expect("clear");
    assert!(sop.observacion_critica_sop.is_none());

    let err = sop_service::set_observacion(db, "SP-NADA-R", None).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
