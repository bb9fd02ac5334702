use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 主キーが文字列コード (例: `FR-BA-001`) のカラム定義
fn code_pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).string().not_null().primary_key().to_owned()
}

fn fk<T, C, R, D>(name: &str, from: T, from_col: C, to: R, to_col: D) -> ForeignKeyCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden,
    R: IntoIden + 'static,
    D: IntoIden,
{
    ForeignKey::create()
        .name(name)
        .from(from, from_col)
        .to(to, to_col)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ---------- エリア / サブエリア ----------
        manager
            .create_table(
                Table::create()
                    .table(Area::Table)
                    .if_not_exists()
                    .col(&mut code_pk(Area::AreaId))
                    .col(ColumnDef::new(Area::AreaNombre).string().not_null())
                    .col(ColumnDef::new(Area::TipoArea).string().null())
                    .col(ColumnDef::new(Area::CantidadSubareas).integer().null())
                    .col(ColumnDef::new(Area::OrdenArea).integer().not_null().default(1000))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubArea::Table)
                    .if_not_exists()
                    .col(&mut code_pk(SubArea::SubareaId))
                    .col(ColumnDef::new(SubArea::AreaId).string().not_null())
                    .col(ColumnDef::new(SubArea::SubareaNombre).string().not_null())
                    .col(ColumnDef::new(SubArea::SuperficieSubarea).double().null())
                    .col(ColumnDef::new(SubArea::Frecuencia).double().null())
                    .col(ColumnDef::new(SubArea::OrdenSubarea).integer().not_null().default(1000))
                    .foreign_key(&mut fk("fk-sub_area-area_id", SubArea::Table, SubArea::AreaId, Area::Table, Area::AreaId))
                    .to_owned(),
            )
            .await?;

        // ---------- 清掃レベル (固定 4 件) ----------
        manager
            .create_table(
                Table::create()
                    .table(NivelLimpieza::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NivelLimpieza::NivelLimpiezaId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NivelLimpieza::Nombre).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(NivelLimpieza::Table)
            .columns([NivelLimpieza::NivelLimpiezaId, NivelLimpieza::Nombre])
            .values_panic([1.into(), "basica".into()])
            .values_panic([2.into(), "media".into()])
            .values_panic([3.into(), "profundo".into()])
            .values_panic([4.into(), "extraordinario".into()])
            .to_owned();
        manager.exec_stmt(seed).await?;

        // ---------- フラクション / メソドロジー ----------
        manager
            .create_table(
                Table::create()
                    .table(Fraccion::Table)
                    .if_not_exists()
                    .col(&mut code_pk(Fraccion::FraccionId))
                    .col(ColumnDef::new(Fraccion::FraccionNombre).string().not_null())
                    .col(ColumnDef::new(Fraccion::NotaTecnica).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MetodologiaBase::Table)
                    .if_not_exists()
                    .col(&mut code_pk(MetodologiaBase::MetodologiaBaseId))
                    .col(ColumnDef::new(MetodologiaBase::Nombre).string().null())
                    .col(ColumnDef::new(MetodologiaBase::Descripcion).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MetodologiaBasePaso::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MetodologiaBasePaso::MetodologiaBaseId).string().not_null())
                    .col(ColumnDef::new(MetodologiaBasePaso::Orden).integer().not_null())
                    .col(ColumnDef::new(MetodologiaBasePaso::Instruccion).text().not_null())
                    .primary_key(
                        Index::create()
                            .col(MetodologiaBasePaso::MetodologiaBaseId)
                            .col(MetodologiaBasePaso::Orden),
                    )
                    .foreign_key(
                        fk(
                            "fk-metodologia_base_paso-base",
                            MetodologiaBasePaso::Table,
                            MetodologiaBasePaso::MetodologiaBaseId,
                            MetodologiaBase::Table,
                            MetodologiaBase::MetodologiaBaseId,
                        )
                        .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Metodologia::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Metodologia::FraccionId).string().not_null())
                    .col(ColumnDef::new(Metodologia::NivelLimpiezaId).integer().not_null())
                    .col(ColumnDef::new(Metodologia::MetodologiaBaseId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(Metodologia::FraccionId)
                            .col(Metodologia::NivelLimpiezaId),
                    )
                    .foreign_key(&mut fk("fk-metodologia-fraccion", Metodologia::Table, Metodologia::FraccionId, Fraccion::Table, Fraccion::FraccionId))
                    .foreign_key(&mut fk("fk-metodologia-nivel", Metodologia::Table, Metodologia::NivelLimpiezaId, NivelLimpieza::Table, NivelLimpieza::NivelLimpiezaId))
                    .foreign_key(&mut fk("fk-metodologia-base", Metodologia::Table, Metodologia::MetodologiaBaseId, MetodologiaBase::Table, MetodologiaBase::MetodologiaBaseId))
                    .to_owned(),
            )
            .await?;

        // ---------- 道具 / キット ----------
        manager
            .create_table(
                Table::create()
                    .table(Herramienta::Table)
                    .if_not_exists()
                    .col(&mut code_pk(Herramienta::HerramientaId))
                    .col(ColumnDef::new(Herramienta::Nombre).string().not_null())
                    .col(ColumnDef::new(Herramienta::Descripcion).text().null())
                    .col(ColumnDef::new(Herramienta::Estatus).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Kit::Table)
                    .if_not_exists()
                    .col(&mut code_pk(Kit::KitId))
                    .col(ColumnDef::new(Kit::FraccionId).string().not_null())
                    .col(ColumnDef::new(Kit::NivelLimpiezaId).integer().null())
                    .col(ColumnDef::new(Kit::Nombre).string().not_null())
                    .foreign_key(&mut fk("fk-kit-fraccion", Kit::Table, Kit::FraccionId, Fraccion::Table, Fraccion::FraccionId))
                    .foreign_key(&mut fk("fk-kit-nivel", Kit::Table, Kit::NivelLimpiezaId, NivelLimpieza::Table, NivelLimpieza::NivelLimpiezaId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(KitDetalle::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(KitDetalle::KitId).string().not_null())
                    .col(ColumnDef::new(KitDetalle::HerramientaId).string().not_null())
                    .col(ColumnDef::new(KitDetalle::Nota).string().null())
                    .primary_key(Index::create().col(KitDetalle::KitId).col(KitDetalle::HerramientaId))
                    .foreign_key(
                        fk("fk-kit_detalle-kit", KitDetalle::Table, KitDetalle::KitId, Kit::Table, Kit::KitId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(&mut fk("fk-kit_detalle-herramienta", KitDetalle::Table, KitDetalle::HerramientaId, Herramienta::Table, Herramienta::HerramientaId))
                    .to_owned(),
            )
            .await?;

        // ---------- 薬剤 / レシピ / 消費量 ----------
        manager
            .create_table(
                Table::create()
                    .table(Quimico::Table)
                    .if_not_exists()
                    .col(&mut code_pk(Quimico::QuimicoId))
                    .col(ColumnDef::new(Quimico::Nombre).string().not_null())
                    .col(ColumnDef::new(Quimico::Categoria).string().null())
                    .col(ColumnDef::new(Quimico::Presentacion).string().null())
                    .col(ColumnDef::new(Quimico::UnidadBase).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Receta::Table)
                    .if_not_exists()
                    .col(&mut code_pk(Receta::RecetaId))
                    .col(ColumnDef::new(Receta::Nombre).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecetaDetalle::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RecetaDetalle::RecetaId).string().not_null())
                    .col(ColumnDef::new(RecetaDetalle::QuimicoId).string().not_null())
                    .col(ColumnDef::new(RecetaDetalle::Dosis).double().null())
                    .col(ColumnDef::new(RecetaDetalle::UnidadDosis).string().null())
                    .col(ColumnDef::new(RecetaDetalle::VolumenBase).double().null())
                    .col(ColumnDef::new(RecetaDetalle::UnidadVolumen).string().null())
                    .col(ColumnDef::new(RecetaDetalle::Nota).string().null())
                    .primary_key(Index::create().col(RecetaDetalle::RecetaId).col(RecetaDetalle::QuimicoId))
                    .foreign_key(
                        fk("fk-receta_detalle-receta", RecetaDetalle::Table, RecetaDetalle::RecetaId, Receta::Table, Receta::RecetaId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(&mut fk("fk-receta_detalle-quimico", RecetaDetalle::Table, RecetaDetalle::QuimicoId, Quimico::Table, Quimico::QuimicoId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Consumo::Table)
                    .if_not_exists()
                    .col(&mut code_pk(Consumo::ConsumoId))
                    .col(ColumnDef::new(Consumo::Valor).double().null())
                    .col(ColumnDef::new(Consumo::Unidad).string().null())
                    .col(ColumnDef::new(Consumo::Regla).string().null())
                    .to_owned(),
            )
            .await?;

        // ---------- 要素 / 要素セット ----------
        manager
            .create_table(
                Table::create()
                    .table(Elemento::Table)
                    .if_not_exists()
                    .col(&mut code_pk(Elemento::ElementoId))
                    .col(ColumnDef::new(Elemento::SubareaId).string().not_null())
                    .col(ColumnDef::new(Elemento::Nombre).string().not_null())
                    .col(ColumnDef::new(Elemento::Cantidad).double().null())
                    .col(ColumnDef::new(Elemento::Estatus).string().null())
                    .col(ColumnDef::new(Elemento::Descripcion).text().null())
                    .foreign_key(&mut fk("fk-elemento-subarea", Elemento::Table, Elemento::SubareaId, SubArea::Table, SubArea::SubareaId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ElementoSet::Table)
                    .if_not_exists()
                    .col(&mut code_pk(ElementoSet::ElementoSetId))
                    .col(ColumnDef::new(ElementoSet::SubareaId).string().not_null())
                    .col(ColumnDef::new(ElementoSet::FraccionId).string().not_null())
                    .col(ColumnDef::new(ElementoSet::NivelLimpiezaId).integer().not_null())
                    .col(ColumnDef::new(ElementoSet::Nombre).string().not_null())
                    .foreign_key(&mut fk("fk-elemento_set-subarea", ElementoSet::Table, ElementoSet::SubareaId, SubArea::Table, SubArea::SubareaId))
                    .foreign_key(&mut fk("fk-elemento_set-fraccion", ElementoSet::Table, ElementoSet::FraccionId, Fraccion::Table, Fraccion::FraccionId))
                    .foreign_key(&mut fk("fk-elemento_set-nivel", ElementoSet::Table, ElementoSet::NivelLimpiezaId, NivelLimpieza::Table, NivelLimpieza::NivelLimpiezaId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ElementoDetalle::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ElementoDetalle::ElementoSetId).string().not_null())
                    .col(ColumnDef::new(ElementoDetalle::ElementoId).string().not_null())
                    .col(ColumnDef::new(ElementoDetalle::RecetaId).string().null())
                    .col(ColumnDef::new(ElementoDetalle::KitId).string().null())
                    .col(ColumnDef::new(ElementoDetalle::ConsumoId).string().null())
                    .col(ColumnDef::new(ElementoDetalle::Orden).integer().not_null().default(1000))
                    .primary_key(Index::create().col(ElementoDetalle::ElementoSetId).col(ElementoDetalle::ElementoId))
                    .foreign_key(
                        fk("fk-elemento_detalle-set", ElementoDetalle::Table, ElementoDetalle::ElementoSetId, ElementoSet::Table, ElementoSet::ElementoSetId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(&mut fk("fk-elemento_detalle-elemento", ElementoDetalle::Table, ElementoDetalle::ElementoId, Elemento::Table, Elemento::ElementoId))
                    .foreign_key(&mut fk("fk-elemento_detalle-receta", ElementoDetalle::Table, ElementoDetalle::RecetaId, Receta::Table, Receta::RecetaId))
                    .foreign_key(&mut fk("fk-elemento_detalle-kit", ElementoDetalle::Table, ElementoDetalle::KitId, Kit::Table, Kit::KitId))
                    .foreign_key(&mut fk("fk-elemento_detalle-consumo", ElementoDetalle::Table, ElementoDetalle::ConsumoId, Consumo::Table, Consumo::ConsumoId))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 依存される側を後に削除する
        let tables: [DynIden; 17] = [
            ElementoDetalle::Table.into_iden(),
            ElementoSet::Table.into_iden(),
            Elemento::Table.into_iden(),
            Consumo::Table.into_iden(),
            RecetaDetalle::Table.into_iden(),
            Receta::Table.into_iden(),
            Quimico::Table.into_iden(),
            KitDetalle::Table.into_iden(),
            Kit::Table.into_iden(),
            Herramienta::Table.into_iden(),
            Metodologia::Table.into_iden(),
            MetodologiaBasePaso::Table.into_iden(),
            MetodologiaBase::Table.into_iden(),
            Fraccion::Table.into_iden(),
            NivelLimpieza::Table.into_iden(),
            SubArea::Table.into_iden(),
            Area::Table.into_iden(),
        ];
        for table in tables {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Area {
    Table,
    AreaId,
    AreaNombre,
    TipoArea,
    CantidadSubareas,
    OrdenArea,
}

#[derive(DeriveIden)]
pub enum SubArea {
    Table,
    SubareaId,
    AreaId,
    SubareaNombre,
    SuperficieSubarea,
    Frecuencia,
    OrdenSubarea,
}

#[derive(DeriveIden)]
pub enum NivelLimpieza {
    Table,
    NivelLimpiezaId,
    Nombre,
}

#[derive(DeriveIden)]
pub enum Fraccion {
    Table,
    FraccionId,
    FraccionNombre,
    NotaTecnica,
}

#[derive(DeriveIden)]
enum MetodologiaBase {
    Table,
    MetodologiaBaseId,
    Nombre,
    Descripcion,
}

#[derive(DeriveIden)]
enum MetodologiaBasePaso {
    Table,
    MetodologiaBaseId,
    Orden,
    Instruccion,
}

#[derive(DeriveIden)]
enum Metodologia {
    Table,
    FraccionId,
    NivelLimpiezaId,
    MetodologiaBaseId,
}

#[derive(DeriveIden)]
enum Herramienta {
    Table,
    HerramientaId,
    Nombre,
    Descripcion,
    Estatus,
}

#[derive(DeriveIden)]
pub enum Kit {
    Table,
    KitId,
    FraccionId,
    NivelLimpiezaId,
    Nombre,
}

#[derive(DeriveIden)]
enum KitDetalle {
    Table,
    KitId,
    HerramientaId,
    Nota,
}

#[derive(DeriveIden)]
enum Quimico {
    Table,
    QuimicoId,
    Nombre,
    Categoria,
    Presentacion,
    UnidadBase,
}

#[derive(DeriveIden)]
pub enum Receta {
    Table,
    RecetaId,
    Nombre,
}

#[derive(DeriveIden)]
enum RecetaDetalle {
    Table,
    RecetaId,
    QuimicoId,
    Dosis,
    UnidadDosis,
    VolumenBase,
    UnidadVolumen,
    Nota,
}

#[derive(DeriveIden)]
pub enum Consumo {
    Table,
    ConsumoId,
    Valor,
    Unidad,
    Regla,
}

#[derive(DeriveIden)]
enum Elemento {
    Table,
    ElementoId,
    SubareaId,
    Nombre,
    Cantidad,
    Estatus,
    Descripcion,
}

#[derive(DeriveIden)]
pub enum ElementoSet {
    Table,
    ElementoSetId,
    SubareaId,
    FraccionId,
    NivelLimpiezaId,
    Nombre,
}

#[derive(DeriveIden)]
enum ElementoDetalle {
    Table,
    ElementoSetId,
    ElementoId,
    RecetaId,
    KitId,
    ConsumoId,
    Orden,
}
