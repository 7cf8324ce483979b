use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stones::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stones::Name).string().not_null())
                    .col(ColumnDef::new(Stones::Virtues).text().not_null())
                    // Nullable so legacy rows without a category still load (grouped as "unknown")
                    .col(ColumnDef::new(Stones::ChakraId).string().null())
                    .col(ColumnDef::new(Stones::Image).text().null())
                    .col(ColumnDef::new(Stones::Description).text().null())
                    .col(ColumnDef::new(Stones::Purification).text().null())
                    .col(ColumnDef::new(Stones::Recharge).text().null())
                    .col(
                        ColumnDef::new(Stones::JewelryTypes)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Stones::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Stones::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stones_chakra_id")
                    .table(Stones::Table)
                    .col(Stones::ChakraId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stones::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Stones {
    Table,
    Id,
    Name,
    Virtues,
    ChakraId,
    Image,
    Description,
    Purification,
    Recharge,
    JewelryTypes,
    CreatedAt,
    UpdatedAt,
}
