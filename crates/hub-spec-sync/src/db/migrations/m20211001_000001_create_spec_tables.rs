//! Initial migration creating the `spec` schema and one table per synced kind.

use sea_orm_migration::{prelude::*, schema::*};

use crate::db::SPEC_SCHEMA;
use crate::sync::SyncedKind;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("CREATE SCHEMA IF NOT EXISTS {}", SPEC_SCHEMA))
            .await?;

        for kind in SyncedKind::all() {
            manager
                .create_table(
                    Table::create()
                        .table((Alias::new(SPEC_SCHEMA), Alias::new(kind.table())))
                        .if_not_exists()
                        .col(text(SpecRow::Id).primary_key())
                        .col(json_binary(SpecRow::Payload))
                        .col(boolean(SpecRow::Deleted).default(false))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for kind in SyncedKind::all().iter().rev() {
            manager
                .drop_table(
                    Table::drop()
                        .table((Alias::new(SPEC_SCHEMA), Alias::new(kind.table())))
                        .if_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}

/// Columns shared by every spec table.
#[derive(DeriveIden)]
enum SpecRow {
    Id,
    Payload,
    Deleted,
}
