use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ideas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub owner_id: String,

    pub title: String,
    pub problem: String,
    pub solution: String,
    pub target_market: Option<String>,

    pub category: String,
    pub industry: String,
    pub stage: String,

    // Listing/matching eligibility hinges on these two
    #[sea_orm(indexed)]
    pub visibility: String,
    #[sea_orm(indexed)]
    pub status: String,

    // Requested funding in whole currency units; 0 = unspecified
    pub funding_needed: i64,

    // JSON arrays of strings
    pub regions: String,
    pub tags: String,

    // Optional AI-derived assessment
    pub ai_score: Option<f64>,
    pub ai_feedback: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
