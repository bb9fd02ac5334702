//! カタログ (マスタ) の管理画面。
//! Django の `admin.py` に `admin.site.register(...)` を並べたものに相当します。
//! 各サブモジュールで `impl_admin_resource!` を 1 回ずつ展開します。

use rocket::Route;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::domain::nivel::Nivel;
use crate::entities::{area, fraccion, prelude::*, sub_area};

/// 空文字のテキスト欄を NULL に寄せる
fn limpio(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

async fn area_choices(db: &DatabaseConnection) -> Result<Vec<(String, String)>, DbErr> {
    Ok(Area::find()
        .order_by_asc(area::Column::OrdenArea)
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.area_id, a.area_nombre))
        .collect())
}

async fn subarea_choices(db: &DatabaseConnection) -> Result<Vec<(String, String)>, DbErr> {
    Ok(SubArea::find()
        .order_by_asc(sub_area::Column::AreaId)
        .order_by_asc(sub_area::Column::OrdenSubarea)
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.subarea_id.clone(), format!("{} · {}", s.subarea_id, s.subarea_nombre)))
        .collect())
}

async fn fraccion_choices(db: &DatabaseConnection) -> Result<Vec<(String, String)>, DbErr> {
    Ok(Fraccion::find()
        .order_by_asc(fraccion::Column::FraccionId)
        .all(db)
        .await?
        .into_iter()
        .map(|f| (f.fraccion_id.clone(), format!("{} · {}", f.fraccion_id, f.fraccion_nombre)))
        .collect())
}

fn nivel_choices() -> Vec<(String, String)> {
    Nivel::ALL
        .iter()
        .map(|n| (n.id().to_string(), n.label().to_string()))
        .collect()
}

pub mod areas {
    use super::limpio;
    use crate::entities::{area, prelude::Area};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct AreaForm {
        pub area_id: String,
        pub area_nombre: String,
        pub tipo_area: Option<String>,
        pub cantidad_subareas: Option<i32>,
        #[field(default = 1000)]
        pub orden_area: i32,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<AreaForm> for area::ActiveModel {
        fn from(f: AreaForm) -> Self {
            area::ActiveModel {
                area_id: Set(f.area_id),
                area_nombre: Set(f.area_nombre.trim().to_string()),
                tipo_area: Set(limpio(f.tipo_area)),
                cantidad_subareas: Set(f.cantidad_subareas),
                orden_area: Set(f.orden_area),
            }
        }
    }

    async fn campos(_db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("area_id", "Código"),
            FormField::text("area_nombre", "Nombre"),
            FormField::text("tipo_area", "Tipo").optional(),
            FormField::number("cantidad_subareas", "Cantidad de subáreas").optional(),
            FormField::number("orden_area", "Orden"),
        ])
    }

    crate::impl_admin_resource! {
        entity: Area,
        active_model: area::ActiveModel,
        form: AreaForm,
        pk: area_id,
        view_prefix: Area,
        base_url: "/admin/areas",
        title: "Áreas",
        search_field: area::Column::AreaNombre,
        order_field: "orden_area",
        columns: [("area_id", "Código"), ("area_nombre", "Nombre"), ("tipo_area", "Tipo"), ("orden_area", "Orden")],
        fields: campos
    }
}

pub mod subareas {
    use crate::entities::{prelude::SubArea, sub_area};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct SubAreaForm {
        pub subarea_id: String,
        pub area_id: String,
        pub subarea_nombre: String,
        pub superficie_subarea: Option<f64>,
        pub frecuencia: Option<f64>,
        #[field(default = 1000)]
        pub orden_subarea: i32,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<SubAreaForm> for sub_area::ActiveModel {
        fn from(f: SubAreaForm) -> Self {
            sub_area::ActiveModel {
                subarea_id: Set(f.subarea_id),
                area_id: Set(f.area_id),
                subarea_nombre: Set(f.subarea_nombre.trim().to_string()),
                superficie_subarea: Set(f.superficie_subarea),
                frecuencia: Set(f.frecuencia),
                orden_subarea: Set(f.orden_subarea),
            }
        }
    }

    async fn campos(db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("subarea_id", "Código"),
            FormField::select("area_id", "Área", super::area_choices(db).await?),
            FormField::text("subarea_nombre", "Nombre"),
            FormField::number("superficie_subarea", "Superficie (m²)").optional(),
            FormField::number("frecuencia", "Frecuencia").optional(),
            FormField::number("orden_subarea", "Orden"),
        ])
    }

    crate::impl_admin_resource! {
        entity: SubArea,
        active_model: sub_area::ActiveModel,
        form: SubAreaForm,
        pk: subarea_id,
        view_prefix: SubArea,
        base_url: "/admin/subareas",
        title: "Subáreas",
        search_field: sub_area::Column::SubareaNombre,
        order_field: "subarea_id",
        columns: [("subarea_id", "Código"), ("area_id", "Área"), ("subarea_nombre", "Nombre"), ("orden_subarea", "Orden")],
        fields: campos
    }
}

pub mod personal {
    use crate::entities::{personal, prelude::Personal};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct PersonalForm {
        pub personal_id: String,
        pub nombre: String,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<PersonalForm> for personal::ActiveModel {
        fn from(f: PersonalForm) -> Self {
            personal::ActiveModel {
                personal_id: Set(f.personal_id),
                nombre: Set(f.nombre.trim().to_string()),
            }
        }
    }

    async fn campos(_db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![FormField::text("personal_id", "Código"), FormField::text("nombre", "Nombre")])
    }

    crate::impl_admin_resource! {
        entity: Personal,
        active_model: personal::ActiveModel,
        form: PersonalForm,
        pk: personal_id,
        view_prefix: Personal,
        base_url: "/admin/personal",
        title: "Personal",
        search_field: personal::Column::Nombre,
        order_field: "nombre",
        columns: [("personal_id", "Código"), ("nombre", "Nombre")],
        fields: campos
    }
}

pub mod fracciones {
    use super::limpio;
    use crate::entities::{fraccion, prelude::Fraccion};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct FraccionForm {
        pub fraccion_id: String,
        pub fraccion_nombre: String,
        pub nota_tecnica: Option<String>,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<FraccionForm> for fraccion::ActiveModel {
        fn from(f: FraccionForm) -> Self {
            fraccion::ActiveModel {
                fraccion_id: Set(f.fraccion_id),
                fraccion_nombre: Set(f.fraccion_nombre.trim().to_string()),
                nota_tecnica: Set(limpio(f.nota_tecnica)),
            }
        }
    }

    async fn campos(_db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("fraccion_id", "Código"),
            FormField::text("fraccion_nombre", "Nombre"),
            FormField::textarea("nota_tecnica", "Nota técnica"),
        ])
    }

    crate::impl_admin_resource! {
        entity: Fraccion,
        active_model: fraccion::ActiveModel,
        form: FraccionForm,
        pk: fraccion_id,
        view_prefix: Fraccion,
        base_url: "/admin/fracciones",
        title: "Fracciones",
        search_field: fraccion::Column::FraccionNombre,
        order_field: "fraccion_id",
        columns: [("fraccion_id", "Código"), ("fraccion_nombre", "Nombre")],
        fields: campos
    }
}

pub mod metodologias {
    use super::limpio;
    use crate::entities::{metodologia_base, prelude::MetodologiaBase};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct MetodologiaBaseForm {
        pub metodologia_base_id: String,
        pub nombre: Option<String>,
        pub descripcion: Option<String>,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<MetodologiaBaseForm> for metodologia_base::ActiveModel {
        fn from(f: MetodologiaBaseForm) -> Self {
            metodologia_base::ActiveModel {
                metodologia_base_id: Set(f.metodologia_base_id),
                nombre: Set(limpio(f.nombre)),
                descripcion: Set(limpio(f.descripcion)),
            }
        }
    }

    async fn campos(_db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("metodologia_base_id", "Código"),
            FormField::text("nombre", "Nombre").optional(),
            FormField::textarea("descripcion", "Descripción"),
        ])
    }

    crate::impl_admin_resource! {
        entity: MetodologiaBase,
        active_model: metodologia_base::ActiveModel,
        form: MetodologiaBaseForm,
        pk: metodologia_base_id,
        view_prefix: MetodologiaBase,
        base_url: "/admin/metodologias",
        title: "Metodologías base",
        search_field: metodologia_base::Column::MetodologiaBaseId,
        order_field: "metodologia_base_id",
        columns: [("metodologia_base_id", "Código"), ("nombre", "Nombre")],
        fields: campos
    }
}

pub mod herramientas {
    use super::limpio;
    use crate::entities::{herramienta, prelude::Herramienta};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct HerramientaForm {
        pub herramienta_id: String,
        pub nombre: String,
        pub descripcion: Option<String>,
        pub estatus: Option<String>,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<HerramientaForm> for herramienta::ActiveModel {
        fn from(f: HerramientaForm) -> Self {
            herramienta::ActiveModel {
                herramienta_id: Set(f.herramienta_id),
                nombre: Set(f.nombre.trim().to_string()),
                descripcion: Set(limpio(f.descripcion)),
                estatus: Set(limpio(f.estatus)),
            }
        }
    }

    async fn campos(_db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("herramienta_id", "Código"),
            FormField::text("nombre", "Nombre"),
            FormField::textarea("descripcion", "Descripción (texto del reporte)"),
            FormField::text("estatus", "Estatus").optional(),
        ])
    }

    crate::impl_admin_resource! {
        entity: Herramienta,
        active_model: herramienta::ActiveModel,
        form: HerramientaForm,
        pk: herramienta_id,
        view_prefix: Herramienta,
        base_url: "/admin/herramientas",
        title: "Herramientas",
        search_field: herramienta::Column::Nombre,
        order_field: "herramienta_id",
        columns: [("herramienta_id", "Código"), ("nombre", "Nombre"), ("estatus", "Estatus")],
        fields: campos
    }
}

pub mod kits {
    use crate::entities::{kit, prelude::Kit};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct KitForm {
        pub kit_id: String,
        pub fraccion_id: String,
        pub nivel_limpieza_id: Option<i32>,
        pub nombre: String,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<KitForm> for kit::ActiveModel {
        fn from(f: KitForm) -> Self {
            kit::ActiveModel {
                kit_id: Set(f.kit_id),
                fraccion_id: Set(f.fraccion_id),
                nivel_limpieza_id: Set(f.nivel_limpieza_id),
                nombre: Set(f.nombre.trim().to_string()),
            }
        }
    }

    async fn campos(db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("kit_id", "Código"),
            FormField::select("fraccion_id", "Fracción", super::fraccion_choices(db).await?),
            FormField::select("nivel_limpieza_id", "Nivel", super::nivel_choices()).optional(),
            FormField::text("nombre", "Nombre"),
        ])
    }

    crate::impl_admin_resource! {
        entity: Kit,
        active_model: kit::ActiveModel,
        form: KitForm,
        pk: kit_id,
        view_prefix: Kit,
        base_url: "/admin/kits",
        title: "Kits",
        search_field: kit::Column::Nombre,
        order_field: "kit_id",
        columns: [("kit_id", "Código"), ("fraccion_id", "Fracción"), ("nombre", "Nombre")],
        fields: campos
    }
}

pub mod quimicos {
    use super::limpio;
    use crate::entities::{prelude::Quimico, quimico};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct QuimicoForm {
        pub quimico_id: String,
        pub nombre: String,
        pub categoria: Option<String>,
        pub presentacion: Option<String>,
        pub unidad_base: Option<String>,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<QuimicoForm> for quimico::ActiveModel {
        fn from(f: QuimicoForm) -> Self {
            quimico::ActiveModel {
                quimico_id: Set(f.quimico_id),
                nombre: Set(f.nombre.trim().to_string()),
                categoria: Set(limpio(f.categoria)),
                presentacion: Set(limpio(f.presentacion)),
                unidad_base: Set(limpio(f.unidad_base)),
            }
        }
    }

    async fn campos(_db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("quimico_id", "Código"),
            FormField::text("nombre", "Nombre"),
            FormField::text("categoria", "Categoría").optional(),
            FormField::text("presentacion", "Presentación").optional(),
            FormField::text("unidad_base", "Unidad base").optional(),
        ])
    }

    crate::impl_admin_resource! {
        entity: Quimico,
        active_model: quimico::ActiveModel,
        form: QuimicoForm,
        pk: quimico_id,
        view_prefix: Quimico,
        base_url: "/admin/quimicos",
        title: "Químicos",
        search_field: quimico::Column::Nombre,
        order_field: "quimico_id",
        columns: [("quimico_id", "Código"), ("nombre", "Nombre"), ("categoria", "Categoría")],
        fields: campos
    }
}

pub mod recetas {
    use crate::entities::{prelude::Receta, receta};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct RecetaForm {
        pub receta_id: String,
        pub nombre: String,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<RecetaForm> for receta::ActiveModel {
        fn from(f: RecetaForm) -> Self {
            receta::ActiveModel {
                receta_id: Set(f.receta_id),
                nombre: Set(f.nombre.trim().to_string()),
            }
        }
    }

    async fn campos(_db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![FormField::text("receta_id", "Código"), FormField::text("nombre", "Nombre")])
    }

    crate::impl_admin_resource! {
        entity: Receta,
        active_model: receta::ActiveModel,
        form: RecetaForm,
        pk: receta_id,
        view_prefix: Receta,
        base_url: "/admin/recetas",
        title: "Recetas",
        search_field: receta::Column::Nombre,
        order_field: "receta_id",
        columns: [("receta_id", "Código"), ("nombre", "Nombre")],
        fields: campos
    }
}

pub mod consumos {
    use super::limpio;
    use crate::entities::{consumo, prelude::Consumo};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct ConsumoForm {
        pub consumo_id: String,
        pub valor: Option<f64>,
        pub unidad: Option<String>,
        pub regla: Option<String>,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<ConsumoForm> for consumo::ActiveModel {
        fn from(f: ConsumoForm) -> Self {
            consumo::ActiveModel {
                consumo_id: Set(f.consumo_id),
                valor: Set(f.valor),
                unidad: Set(limpio(f.unidad)),
                regla: Set(limpio(f.regla)),
            }
        }
    }

    async fn campos(_db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("consumo_id", "Código"),
            FormField::number("valor", "Valor").optional(),
            FormField::text("unidad", "Unidad").optional(),
            FormField::text("regla", "Regla").optional(),
        ])
    }

    crate::impl_admin_resource! {
        entity: Consumo,
        active_model: consumo::ActiveModel,
        form: ConsumoForm,
        pk: consumo_id,
        view_prefix: Consumo,
        base_url: "/admin/consumos",
        title: "Consumos",
        search_field: consumo::Column::ConsumoId,
        order_field: "consumo_id",
        columns: [("consumo_id", "Código"), ("valor", "Valor"), ("unidad", "Unidad"), ("regla", "Regla")],
        fields: campos
    }
}

pub mod elementos {
    use super::limpio;
    use crate::entities::{elemento, prelude::Elemento};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct ElementoForm {
        pub elemento_id: String,
        pub subarea_id: String,
        pub nombre: String,
        pub cantidad: Option<f64>,
        pub estatus: Option<String>,
        pub descripcion: Option<String>,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<ElementoForm> for elemento::ActiveModel {
        fn from(f: ElementoForm) -> Self {
            elemento::ActiveModel {
                elemento_id: Set(f.elemento_id),
                subarea_id: Set(f.subarea_id),
                nombre: Set(f.nombre.trim().to_string()),
                cantidad: Set(f.cantidad),
                estatus: Set(limpio(f.estatus)),
                descripcion: Set(limpio(f.descripcion)),
            }
        }
    }

    async fn campos(db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("elemento_id", "Código"),
            FormField::select("subarea_id", "Subárea", super::subarea_choices(db).await?),
            FormField::text("nombre", "Nombre"),
            FormField::number("cantidad", "Cantidad").optional(),
            FormField::text("estatus", "Estatus").optional(),
            FormField::textarea("descripcion", "Descripción"),
        ])
    }

    crate::impl_admin_resource! {
        entity: Elemento,
        active_model: elemento::ActiveModel,
        form: ElementoForm,
        pk: elemento_id,
        view_prefix: Elemento,
        base_url: "/admin/elementos",
        title: "Elementos",
        search_field: elemento::Column::Nombre,
        order_field: "elemento_id",
        columns: [("elemento_id", "Código"), ("subarea_id", "Subárea"), ("nombre", "Nombre"), ("cantidad", "Cantidad")],
        fields: campos
    }
}

pub mod eventos {
    use super::limpio;
    use crate::entities::{prelude::SopEvento, sop_evento};
    use crate::views::edit::FormField;
    use serde::{Deserialize, Serialize};

    #[derive(FromForm, Serialize, Deserialize)]
    pub struct SopEventoForm {
        pub sop_evento_id: String,
        pub nombre: String,
        pub descripcion: Option<String>,
        #[field(default = "")]
        #[serde(default)]
        pub csrf_token: String,
    }

    impl From<SopEventoForm> for sop_evento::ActiveModel {
        fn from(f: SopEventoForm) -> Self {
            sop_evento::ActiveModel {
                sop_evento_id: Set(f.sop_evento_id),
                nombre: Set(f.nombre.trim().to_string()),
                descripcion: Set(limpio(f.descripcion)),
            }
        }
    }

    async fn campos(_db: &DatabaseConnection) -> Result<Vec<FormField>, DbErr> {
        Ok(vec![
            FormField::text("sop_evento_id", "Código"),
            FormField::text("nombre", "Nombre"),
            FormField::textarea("descripcion", "Descripción"),
        ])
    }

    crate::impl_admin_resource! {
        entity: SopEvento,
        active_model: sop_evento::ActiveModel,
        form: SopEventoForm,
        pk: sop_evento_id,
        view_prefix: SopEvento,
        base_url: "/admin/eventos",
        title: "SOP de eventos",
        search_field: sop_evento::Column::Nombre,
        order_field: "sop_evento_id",
        columns: [("sop_evento_id", "Código"), ("nombre", "Nombre")],
        fields: campos
    }
}

/// `(マウント先, ルート)` の一覧
pub fn mounts() -> Vec<(&'static str, Vec<Route>)> {
    vec![
        ("/admin/areas", areas::routes()),
        ("/admin/subareas", subareas::routes()),
        ("/admin/personal", personal::routes()),
        ("/admin/fracciones", fracciones::routes()),
        ("/admin/metodologias", metodologias::routes()),
        ("/admin/herramientas", herramientas::routes()),
        ("/admin/kits", kits::routes()),
        ("/admin/quimicos", quimicos::routes()),
        ("/admin/recetas", recetas::routes()),
        ("/admin/consumos", consumos::routes()),
        ("/admin/elementos", elementos::routes()),
        ("/admin/eventos", eventos::routes()),
    ]
}
