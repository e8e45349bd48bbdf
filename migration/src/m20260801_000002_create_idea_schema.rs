use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ideas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ideas::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Ideas::OwnerId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::Title)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::Problem)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::Solution)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::TargetMarket)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::Category)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::Industry)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::Stage)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::Visibility)
                            .string()
                            .not_null()
                            .default("private"),
                    )
                    .col(
                        ColumnDef::new(Ideas::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Ideas::FundingNeeded)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Ideas::Regions)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::Tags)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::AiScore)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::AiFeedback)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ideas::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ideas_owner_id")
                            .from(Ideas::Table, Ideas::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ideas_owner")
                    .table(Ideas::Table)
                    .col(Ideas::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ideas_visibility")
                    .table(Ideas::Table)
                    .col(Ideas::Visibility)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ideas_status")
                    .table(Ideas::Table)
                    .col(Ideas::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ideas::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Ideas {
    Table,
    Id,
    OwnerId,
    Title,
    Problem,
    Solution,
    TargetMarket,
    Category,
    Industry,
    Stage,
    Visibility,
    Status,
    FundingNeeded,
    Regions,
    Tags,
    AiScore,
    AiFeedback,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
