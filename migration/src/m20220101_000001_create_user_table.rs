use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    // 従業員 (personal) とログインアカウント (user) を作成
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Personal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Personal::PersonalId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Personal::Nombre).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Username).string_len(80).not_null().unique_key())
                    .col(ColumnDef::new(User::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(User::Role).string_len(20).not_null().default("operativo"))
                    .col(ColumnDef::new(User::IsActive).boolean().not_null().default(true))
                    // 1 Personal につき 1 アカウントまで
                    .col(ColumnDef::new(User::PersonalId).string().null().unique_key())
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user-personal_id")
                            .from(User::Table, User::PersonalId)
                            .to(Personal::Table, Personal::PersonalId)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Personal::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Personal {
    Table,
    PersonalId,
    Nombre,
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    IsActive,
    PersonalId,
    CreatedAt,
}
