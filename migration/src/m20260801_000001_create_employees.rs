use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees { Table, Id, Name, Age, Gender, Salary, Active, CreatedAt, UpdatedAt }

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Employees::Table)
                .if_not_exists()
                .col(ColumnDef::new(Employees::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Employees::Name).string_len(256).not_null())
                .col(ColumnDef::new(Employees::Age).integer().not_null())
                .col(ColumnDef::new(Employees::Gender).string_len(16).not_null())
                .col(ColumnDef::new(Employees::Salary).double().not_null())
                .col(ColumnDef::new(Employees::Active).boolean().not_null().default(true))
                .col(ColumnDef::new(Employees::CreatedAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Employees::UpdatedAt).timestamp_with_time_zone().not_null())
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_employees_active").table(Employees::Table).col(Employees::Active).to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Employees::Table).to_owned()).await?;
        Ok(())
    }
}
