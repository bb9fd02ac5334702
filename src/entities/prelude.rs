pub use super::area::Entity as Area;
pub use super::consumo::Entity as Consumo;
pub use super::elemento::Entity as Elemento;
pub use super::elemento_detalle::Entity as ElementoDetalle;
pub use super::elemento_set::Entity as ElementoSet;
pub use super::fraccion::Entity as Fraccion;
pub use super::herramienta::Entity as Herramienta;
pub use super::kit::Entity as Kit;
pub use super::kit_detalle::Entity as KitDetalle;
pub use super::lanzamiento_dia::Entity as LanzamientoDia;
pub use super::lanzamiento_semana::Entity as LanzamientoSemana;
pub use super::lanzamiento_tarea::Entity as LanzamientoTarea;
pub use super::metodologia::Entity as Metodologia;
pub use super::metodologia_base::Entity as MetodologiaBase;
pub use super::metodologia_base_paso::Entity as MetodologiaBasePaso;
pub use super::nivel_limpieza::Entity as NivelLimpieza;
pub use super::personal::Entity as Personal;
pub use super::plantilla_item::Entity as PlantillaItem;
pub use super::plantilla_semana_aplicada::Entity as PlantillaSemanaAplicada;
pub use super::plantilla_semanal::Entity as PlantillaSemanal;
pub use super::quimico::Entity as Quimico;
pub use super::receta::Entity as Receta;
pub use super::receta_detalle::Entity as RecetaDetalle;
pub use super::sop::Entity as Sop;
pub use super::sop_evento::Entity as SopEvento;
pub use super::sop_evento_detalle::Entity as SopEventoDetalle;
pub use super::sop_fraccion::Entity as SopFraccion;
pub use super::sop_fraccion_detalle::Entity as SopFraccionDetalle;
pub use super::sub_area::Entity as SubArea;
pub use super::tarea_check::Entity as TareaCheck;
pub use super::user::Entity as User;
