use sea_orm_migration::prelude::*;

use super::m20220101_000001_create_user_table::{Personal, User};
use super::m20240201_000001_create_catalog_tables::{Area, SubArea};
use super::m20240201_000002_create_sop_tables::{Sop, SopEvento};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 同じ日・同じサブエリアに通常 (非追加) の SOP タスクは 1 件まで。
/// 部分インデックスは SeaQuery で表現できないので SQL を直接流す。
const UQ_TAREA_REGULAR: &str = "CREATE UNIQUE INDEX IF NOT EXISTS uq_tarea_regular \
     ON lanzamiento_tarea (dia_id, subarea_id) \
     WHERE NOT es_adicional AND tipo_tarea = 'sop'";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LanzamientoSemana::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LanzamientoSemana::SemanaId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LanzamientoSemana::Nombre).string().null())
                    .col(ColumnDef::new(LanzamientoSemana::FechaInicio).date().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LanzamientoDia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LanzamientoDia::DiaId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LanzamientoDia::SemanaId).integer().not_null())
                    .col(ColumnDef::new(LanzamientoDia::Fecha).date().not_null().unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lanzamiento_dia-semana")
                            .from(LanzamientoDia::Table, LanzamientoDia::SemanaId)
                            .to(LanzamientoSemana::Table, LanzamientoSemana::SemanaId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LanzamientoTarea::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LanzamientoTarea::TareaId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LanzamientoTarea::DiaId).integer().not_null())
                    .col(ColumnDef::new(LanzamientoTarea::PersonalId).string().not_null())
                    .col(ColumnDef::new(LanzamientoTarea::AreaId).string().null())
                    .col(ColumnDef::new(LanzamientoTarea::SubareaId).string().null())
                    .col(ColumnDef::new(LanzamientoTarea::NivelLimpiezaAsignado).string_len(20).null())
                    .col(ColumnDef::new(LanzamientoTarea::SopId).string().null())
                    .col(ColumnDef::new(LanzamientoTarea::EsAdicional).boolean().not_null().default(false))
                    .col(ColumnDef::new(LanzamientoTarea::TipoTarea).string_len(20).not_null().default("sop"))
                    .col(ColumnDef::new(LanzamientoTarea::Orden).integer().not_null().default(0))
                    .col(ColumnDef::new(LanzamientoTarea::SopEventoId).string().null())
                    .col(ColumnDef::new(LanzamientoTarea::EsArrastrable).boolean().not_null().default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lanzamiento_tarea-dia")
                            .from(LanzamientoTarea::Table, LanzamientoTarea::DiaId)
                            .to(LanzamientoDia::Table, LanzamientoDia::DiaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lanzamiento_tarea-personal")
                            .from(LanzamientoTarea::Table, LanzamientoTarea::PersonalId)
                            .to(Personal::Table, Personal::PersonalId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lanzamiento_tarea-area")
                            .from(LanzamientoTarea::Table, LanzamientoTarea::AreaId)
                            .to(Area::Table, Area::AreaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lanzamiento_tarea-subarea")
                            .from(LanzamientoTarea::Table, LanzamientoTarea::SubareaId)
                            .to(SubArea::Table, SubArea::SubareaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lanzamiento_tarea-sop")
                            .from(LanzamientoTarea::Table, LanzamientoTarea::SopId)
                            .to(Sop::Table, Sop::SopId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lanzamiento_tarea-sop_evento")
                            .from(LanzamientoTarea::Table, LanzamientoTarea::SopEventoId)
                            .to(SopEvento::Table, SopEvento::SopEventoId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-lanzamiento_tarea-dia-personal")
                    .table(LanzamientoTarea::Table)
                    .col(LanzamientoTarea::DiaId)
                    .col(LanzamientoTarea::PersonalId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(UQ_TAREA_REGULAR)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TareaCheck::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TareaCheck::CheckId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TareaCheck::TareaId).integer().not_null().unique_key())
                    .col(ColumnDef::new(TareaCheck::CheckedAt).date_time().not_null())
                    .col(ColumnDef::new(TareaCheck::UserId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tarea_check-tarea")
                            .from(TareaCheck::Table, TareaCheck::TareaId)
                            .to(LanzamientoTarea::Table, LanzamientoTarea::TareaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tarea_check-user")
                            .from(TareaCheck::Table, TareaCheck::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ---------- 週テンプレート ----------
        manager
            .create_table(
                Table::create()
                    .table(PlantillaSemanal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlantillaSemanal::PlantillaId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlantillaSemanal::Nombre).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(PlantillaSemanal::CreadaEn)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlantillaItem::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlantillaItem::ItemId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlantillaItem::PlantillaId).integer().not_null())
                    .col(ColumnDef::new(PlantillaItem::DiaIndex).integer().not_null())
                    .col(ColumnDef::new(PlantillaItem::PersonalId).string().not_null())
                    .col(ColumnDef::new(PlantillaItem::AreaId).string().not_null())
                    .col(ColumnDef::new(PlantillaItem::SubareaId).string().not_null())
                    .col(ColumnDef::new(PlantillaItem::NivelLimpiezaAsignado).string_len(20).not_null())
                    .col(ColumnDef::new(PlantillaItem::SopId).string().null())
                    .col(ColumnDef::new(PlantillaItem::EsAdicional).boolean().not_null().default(false))
                    .col(ColumnDef::new(PlantillaItem::Orden).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plantilla_item-plantilla")
                            .from(PlantillaItem::Table, PlantillaItem::PlantillaId)
                            .to(PlantillaSemanal::Table, PlantillaSemanal::PlantillaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plantilla_item-personal")
                            .from(PlantillaItem::Table, PlantillaItem::PersonalId)
                            .to(Personal::Table, Personal::PersonalId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plantilla_item-area")
                            .from(PlantillaItem::Table, PlantillaItem::AreaId)
                            .to(Area::Table, Area::AreaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plantilla_item-subarea")
                            .from(PlantillaItem::Table, PlantillaItem::SubareaId)
                            .to(SubArea::Table, SubArea::SubareaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plantilla_item-sop")
                            .from(PlantillaItem::Table, PlantillaItem::SopId)
                            .to(Sop::Table, Sop::SopId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlantillaSemanaAplicada::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlantillaSemanaAplicada::SemanaLunes)
                            .date()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlantillaSemanaAplicada::PlantillaId).integer().null())
                    .col(
                        ColumnDef::new(PlantillaSemanaAplicada::AplicadaEn)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plantilla_semana_aplicada-plantilla")
                            .from(PlantillaSemanaAplicada::Table, PlantillaSemanaAplicada::PlantillaId)
                            .to(PlantillaSemanal::Table, PlantillaSemanal::PlantillaId)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlantillaSemanaAplicada::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlantillaItem::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlantillaSemanal::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TareaCheck::Table).to_owned())
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS uq_tarea_regular")
            .await?;
        manager
            .drop_table(Table::drop().table(LanzamientoTarea::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LanzamientoDia::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LanzamientoSemana::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LanzamientoSemana {
    Table,
    SemanaId,
    Nombre,
    FechaInicio,
}

#[derive(DeriveIden)]
enum LanzamientoDia {
    Table,
    DiaId,
    SemanaId,
    Fecha,
}

#[derive(DeriveIden)]
enum LanzamientoTarea {
    Table,
    TareaId,
    DiaId,
    PersonalId,
    AreaId,
    SubareaId,
    NivelLimpiezaAsignado,
    SopId,
    EsAdicional,
    TipoTarea,
    Orden,
    SopEventoId,
    EsArrastrable,
}

#[derive(DeriveIden)]
enum TareaCheck {
    Table,
    CheckId,
    TareaId,
    CheckedAt,
    UserId,
}

#[derive(DeriveIden)]
enum PlantillaSemanal {
    Table,
    PlantillaId,
    Nombre,
    CreadaEn,
}

#[derive(DeriveIden)]
enum PlantillaItem {
    Table,
    ItemId,
    PlantillaId,
    DiaIndex,
    PersonalId,
    AreaId,
    SubareaId,
    NivelLimpiezaAsignado,
    SopId,
    EsAdicional,
    Orden,
}

#[derive(DeriveIden)]
enum PlantillaSemanaAplicada {
    Table,
    SemanaLunes,
    PlantillaId,
    AplicadaEn,
}
