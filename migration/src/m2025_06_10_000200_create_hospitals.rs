//! Migration to create the hospitals table.
//!
//! Hospitals are the tenant boundary: patients, assets and suppliers all hang
//! off a hospital id, and staff profiles reference their assigned hospital.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hospitals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hospitals::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hospitals::UserId).uuid().not_null())
                    .col(ColumnDef::new(Hospitals::Name).text().not_null())
                    .col(ColumnDef::new(Hospitals::Location).text().not_null())
                    .col(
                        ColumnDef::new(Hospitals::RegistrationNo)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Hospitals::Incharge).text().null())
                    .col(
                        ColumnDef::new(Hospitals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Hospitals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hospitals_user_id")
                            .from(Hospitals::Table, Hospitals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Registration numbers are issued per facility and must not repeat.
        manager
            .create_index(
                Index::create()
                    .name("idx_hospitals_registration_no")
                    .table(Hospitals::Table)
                    .col(Hospitals::RegistrationNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_hospitals_registration_no")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Hospitals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Hospitals {
    Table,
    Id,
    UserId,
    Name,
    Location,
    RegistrationNo,
    Incharge,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
