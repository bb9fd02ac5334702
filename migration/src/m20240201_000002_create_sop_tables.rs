use sea_orm_migration::prelude::*;

use super::m20240201_000001_create_catalog_tables::{
    Consumo, ElementoSet, Fraccion, Kit, NivelLimpieza, Receta, SubArea,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 設備清掃 (limpieza_equipo) で使う固定イベント SOP
const SOP_EVENTO_EQUIPO: &str = "SP-LI-EQ-001";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sop::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sop::SopId).string().not_null().primary_key())
                    .col(ColumnDef::new(Sop::SubareaId).string().not_null())
                    .col(ColumnDef::new(Sop::TipoSop).string_len(20).not_null().default("regular"))
                    .col(ColumnDef::new(Sop::ObservacionCriticaSop).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop-subarea")
                            .from(Sop::Table, Sop::SubareaId)
                            .to(SubArea::Table, SubArea::SubareaId),
                    )
                    .to_owned(),
            )
            .await?;

        // サブエリアごとに regular / consecuente は 1 件ずつ
        manager
            .create_index(
                Index::create()
                    .name("uq-sop-subarea-tipo")
                    .table(Sop::Table)
                    .col(Sop::SubareaId)
                    .col(Sop::TipoSop)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SopFraccion::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SopFraccion::SopFraccionId).string().not_null().primary_key())
                    .col(ColumnDef::new(SopFraccion::SopId).string().not_null())
                    .col(ColumnDef::new(SopFraccion::FraccionId).string().not_null())
                    .col(ColumnDef::new(SopFraccion::Orden).integer().not_null().default(1000))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_fraccion-sop")
                            .from(SopFraccion::Table, SopFraccion::SopId)
                            .to(Sop::Table, Sop::SopId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_fraccion-fraccion")
                            .from(SopFraccion::Table, SopFraccion::FraccionId)
                            .to(Fraccion::Table, Fraccion::FraccionId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-sop_fraccion-sop-fraccion")
                    .table(SopFraccion::Table)
                    .col(SopFraccion::SopId)
                    .col(SopFraccion::FraccionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SopFraccionDetalle::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SopFraccionDetalle::SopFraccionDetalleId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SopFraccionDetalle::SopFraccionId).string().not_null())
                    .col(ColumnDef::new(SopFraccionDetalle::NivelLimpiezaId).integer().not_null())
                    .col(ColumnDef::new(SopFraccionDetalle::KitId).string().null())
                    .col(ColumnDef::new(SopFraccionDetalle::RecetaId).string().null())
                    .col(ColumnDef::new(SopFraccionDetalle::ElementoSetId).string().null())
                    .col(ColumnDef::new(SopFraccionDetalle::ConsumoId).string().null())
                    .col(ColumnDef::new(SopFraccionDetalle::TiempoUnitarioMin).double().null())
                    // 要素セット方式と直接指定方式は排他
                    .check(Expr::cust(
                        "(elemento_set_id IS NULL) OR (kit_id IS NULL AND receta_id IS NULL)",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_fraccion_detalle-sf")
                            .from(SopFraccionDetalle::Table, SopFraccionDetalle::SopFraccionId)
                            .to(SopFraccion::Table, SopFraccion::SopFraccionId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_fraccion_detalle-nivel")
                            .from(SopFraccionDetalle::Table, SopFraccionDetalle::NivelLimpiezaId)
                            .to(NivelLimpieza::Table, NivelLimpieza::NivelLimpiezaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_fraccion_detalle-kit")
                            .from(SopFraccionDetalle::Table, SopFraccionDetalle::KitId)
                            .to(Kit::Table, Kit::KitId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_fraccion_detalle-receta")
                            .from(SopFraccionDetalle::Table, SopFraccionDetalle::RecetaId)
                            .to(Receta::Table, Receta::RecetaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_fraccion_detalle-elemento_set")
                            .from(SopFraccionDetalle::Table, SopFraccionDetalle::ElementoSetId)
                            .to(ElementoSet::Table, ElementoSet::ElementoSetId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_fraccion_detalle-consumo")
                            .from(SopFraccionDetalle::Table, SopFraccionDetalle::ConsumoId)
                            .to(Consumo::Table, Consumo::ConsumoId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-sop_fraccion_detalle-sf-nivel")
                    .table(SopFraccionDetalle::Table)
                    .col(SopFraccionDetalle::SopFraccionId)
                    .col(SopFraccionDetalle::NivelLimpiezaId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ---------- イベント SOP ----------
        manager
            .create_table(
                Table::create()
                    .table(SopEvento::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SopEvento::SopEventoId).string().not_null().primary_key())
                    .col(ColumnDef::new(SopEvento::Nombre).string().not_null())
                    .col(ColumnDef::new(SopEvento::Descripcion).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SopEventoDetalle::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SopEventoDetalle::DetalleId).string().not_null().primary_key())
                    .col(ColumnDef::new(SopEventoDetalle::SopEventoId).string().not_null())
                    .col(ColumnDef::new(SopEventoDetalle::Descripcion).string().not_null())
                    .col(ColumnDef::new(SopEventoDetalle::Orden).integer().not_null().default(1000))
                    .col(ColumnDef::new(SopEventoDetalle::TiempoEstimado).double().not_null().default(0.0))
                    .col(ColumnDef::new(SopEventoDetalle::KitId).string().null())
                    .col(ColumnDef::new(SopEventoDetalle::RecetaId).string().null())
                    .col(ColumnDef::new(SopEventoDetalle::ConsumoId).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_evento_detalle-evento")
                            .from(SopEventoDetalle::Table, SopEventoDetalle::SopEventoId)
                            .to(SopEvento::Table, SopEvento::SopEventoId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_evento_detalle-kit")
                            .from(SopEventoDetalle::Table, SopEventoDetalle::KitId)
                            .to(Kit::Table, Kit::KitId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_evento_detalle-receta")
                            .from(SopEventoDetalle::Table, SopEventoDetalle::RecetaId)
                            .to(Receta::Table, Receta::RecetaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sop_evento_detalle-consumo")
                            .from(SopEventoDetalle::Table, SopEventoDetalle::ConsumoId)
                            .to(Consumo::Table, Consumo::ConsumoId),
                    )
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(SopEvento::Table)
            .columns([SopEvento::SopEventoId, SopEvento::Nombre])
            .values_panic([SOP_EVENTO_EQUIPO.into(), "Limpieza de equipo".into()])
            .to_owned();
        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SopEventoDetalle::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SopEvento::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SopFraccionDetalle::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SopFraccion::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sop::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Sop {
    Table,
    SopId,
    SubareaId,
    TipoSop,
    ObservacionCriticaSop,
}

#[derive(DeriveIden)]
enum SopFraccion {
    Table,
    SopFraccionId,
    SopId,
    FraccionId,
    Orden,
}

#[derive(DeriveIden)]
enum SopFraccionDetalle {
    Table,
    SopFraccionDetalleId,
    SopFraccionId,
    NivelLimpiezaId,
    KitId,
    RecetaId,
    ElementoSetId,
    ConsumoId,
    TiempoUnitarioMin,
}

#[derive(DeriveIden)]
pub enum SopEvento {
    Table,
    SopEventoId,
    Nombre,
    Descripcion,
}

#[derive(DeriveIden)]
enum SopEventoDetalle {
    Table,
    DetalleId,
    SopEventoId,
    Descripcion,
    Orden,
    TiempoEstimado,
    KitId,
    RecetaId,
    ConsumoId,
}
