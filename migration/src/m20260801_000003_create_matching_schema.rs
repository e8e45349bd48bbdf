use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvestorPreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestorPreferences::InvestorId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvestorPreferences::Industries)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestorPreferences::Stages)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestorPreferences::FundingMin)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestorPreferences::FundingMax)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestorPreferences::Regions)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestorPreferences::RiskTolerance)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestorPreferences::Timeline)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestorPreferences::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investor_preferences_investor_id")
                            .from(
                                InvestorPreferences::Table,
                                InvestorPreferences::InvestorId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MatchHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MatchHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MatchHistory::InvestorId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchHistory::Preferences)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchHistory::PoolSize)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchHistory::EligibleCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchHistory::ResultCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchHistory::TopScore)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MatchHistory::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_history_investor_id")
                            .from(MatchHistory::Table, MatchHistory::InvestorId)
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
                    .name("idx_match_history_investor")
                    .table(MatchHistory::Table)
                    .col(MatchHistory::InvestorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConnectionRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConnectionRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConnectionRequests::InvestorId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectionRequests::IdeaId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectionRequests::Message)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectionRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ConnectionRequests::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectionRequests::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connection_requests_investor_id")
                            .from(
                                ConnectionRequests::Table,
                                ConnectionRequests::InvestorId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connection_requests_idea_id")
                            .from(ConnectionRequests::Table, ConnectionRequests::IdeaId)
                            .to(Ideas::Table, Ideas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_connection_requests_idea")
                    .table(ConnectionRequests::Table)
                    .col(ConnectionRequests::IdeaId)
                    .to_owned(),
            )
            .await?;

        // One request per investor per idea.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_connection_requests_pair")
                    .table(ConnectionRequests::Table)
                    .col(ConnectionRequests::InvestorId)
                    .col(ConnectionRequests::IdeaId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConnectionRequests::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(MatchHistory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InvestorPreferences::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InvestorPreferences {
    Table,
    InvestorId,
    Industries,
    Stages,
    FundingMin,
    FundingMax,
    Regions,
    RiskTolerance,
    Timeline,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MatchHistory {
    Table,
    Id,
    InvestorId,
    Preferences,
    PoolSize,
    EligibleCount,
    ResultCount,
    TopScore,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ConnectionRequests {
    Table,
    Id,
    InvestorId,
    IdeaId,
    Message,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Ideas {
    Table,
    Id,
}
