//! Migration to create the patients table.
//!
//! Patients are tenant-scoped: every row carries the hospital that owns it,
//! and all reads and writes filter on that column.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Patients::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Patients::HospitalId).uuid().not_null())
                    .col(ColumnDef::new(Patients::ServedBy).uuid().not_null())
                    .col(ColumnDef::new(Patients::FullName).text().not_null())
                    .col(ColumnDef::new(Patients::Email).text().null())
                    .col(ColumnDef::new(Patients::Tel1).text().not_null())
                    .col(ColumnDef::new(Patients::Tel2).text().null())
                    .col(ColumnDef::new(Patients::IdentityNo).text().not_null())
                    .col(ColumnDef::new(Patients::Dob).date().not_null())
                    .col(ColumnDef::new(Patients::Sex).text().not_null())
                    .col(ColumnDef::new(Patients::Location).text().not_null())
                    .col(ColumnDef::new(Patients::MedicalHistory).text().null())
                    .col(ColumnDef::new(Patients::Notes).text().null())
                    .col(ColumnDef::new(Patients::ReferredBy).text().null())
                    .col(
                        ColumnDef::new(Patients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patients_hospital_id")
                            .from(Patients::Table, Patients::HospitalId)
                            .to(Hospitals::Table, Hospitals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patients_served_by")
                            .from(Patients::Table, Patients::ServedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on hospital_id for tenant isolation queries
        manager
            .create_index(
                Index::create()
                    .name("idx_patients_hospital_id")
                    .table(Patients::Table)
                    .col(Patients::HospitalId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_patients_hospital_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Patients {
    Table,
    Id,
    HospitalId,
    ServedBy,
    FullName,
    Email,
    Tel1,
    Tel2,
    IdentityNo,
    Dob,
    Sex,
    Location,
    MedicalHistory,
    Notes,
    ReferredBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Hospitals {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
