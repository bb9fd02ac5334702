pub mod prelude;

pub mod area;
pub mod consumo;
pub mod elemento;
pub mod elemento_detalle;
pub mod elemento_set;
pub mod fraccion;
pub mod herramienta;
pub mod kit;
pub mod kit_detalle;
pub mod lanzamiento_dia;
pub mod lanzamiento_semana;
pub mod lanzamiento_tarea;
pub mod metodologia;
pub mod metodologia_base;
pub mod metodologia_base_paso;
pub mod nivel_limpieza;
pub mod personal;
pub mod plantilla_item;
pub mod plantilla_semana_aplicada;
pub mod plantilla_semanal;
pub mod quimico;
pub mod receta;
pub mod receta_detalle;
pub mod sop;
pub mod sop_evento;
pub mod sop_evento_detalle;
pub mod sop_fraccion;
pub mod sop_fraccion_detalle;
pub mod sub_area;
pub mod tarea_check;
pub mod user;
