use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "investor_preferences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub investor_id: String,

    // JSON arrays of strings
    pub industries: String,
    pub stages: String,
    pub regions: String,

    pub funding_min: i64,
    pub funding_max: i64,

    pub risk_tolerance: String,
    pub timeline: String,

    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InvestorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Investor,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
