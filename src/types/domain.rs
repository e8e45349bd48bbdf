use poem_openapi::Enum;
use serde::{Deserialize, Serialize};

/// Platform role, carried in token claims and on the user row.
///
/// Admin is never assignable through public registration.
#[derive(Enum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Innovator,
    Investor,
    Hub,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Innovator => "innovator",
            Role::Investor => "investor",
            Role::Hub => "hub",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "innovator" => Some(Role::Innovator),
            "investor" => Some(Role::Investor),
            "hub" => Some(Role::Hub),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account lifecycle. Accounts are never hard-deleted; they move between
/// these states via registration and admin actions.
#[derive(Enum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Approved,
    Suspended,
    Rejected,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Approved => "approved",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AccountStatus::Pending),
            "approved" => Some(AccountStatus::Approved),
            "suspended" => Some(AccountStatus::Suspended),
            "rejected" => Some(AccountStatus::Rejected),
            _ => None,
        }
    }
}

/// Maturity ladder for ideas, ordered from earliest to latest.
#[derive(Enum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IdeaStage {
    Concept,
    Prototype,
    Mvp,
    Seed,
    Growth,
    Scale,
}

impl IdeaStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStage::Concept => "concept",
            IdeaStage::Prototype => "prototype",
            IdeaStage::Mvp => "mvp",
            IdeaStage::Seed => "seed",
            IdeaStage::Growth => "growth",
            IdeaStage::Scale => "scale",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "concept" => Some(IdeaStage::Concept),
            "prototype" => Some(IdeaStage::Prototype),
            "mvp" => Some(IdeaStage::Mvp),
            "seed" => Some(IdeaStage::Seed),
            "growth" => Some(IdeaStage::Growth),
            "scale" => Some(IdeaStage::Scale),
            _ => None,
        }
    }

    /// Position on the ladder, used for adjacency scoring.
    pub fn ordinal(&self) -> i32 {
        match self {
            IdeaStage::Concept => 0,
            IdeaStage::Prototype => 1,
            IdeaStage::Mvp => 2,
            IdeaStage::Seed => 3,
            IdeaStage::Growth => 4,
            IdeaStage::Scale => 5,
        }
    }
}

impl std::fmt::Display for IdeaStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who can see an idea. Both `public` and `public_ideas` count as
/// discoverable.
#[derive(Enum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IdeaVisibility {
    Private,
    Public,
    PublicIdeas,
    Archived,
}

impl IdeaVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaVisibility::Private => "private",
            IdeaVisibility::Public => "public",
            IdeaVisibility::PublicIdeas => "public_ideas",
            IdeaVisibility::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "private" => Some(IdeaVisibility::Private),
            "public" => Some(IdeaVisibility::Public),
            "public_ideas" => Some(IdeaVisibility::PublicIdeas),
            "archived" => Some(IdeaVisibility::Archived),
            _ => None,
        }
    }

    /// True for the full set of publicly listable visibilities.
    pub fn is_discoverable(&self) -> bool {
        matches!(self, IdeaVisibility::Public | IdeaVisibility::PublicIdeas)
    }
}

/// Editorial status of an idea record. Archived records drop out of
/// listings and matching regardless of visibility.
#[derive(Enum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    Draft,
    Active,
    Archived,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Draft => "draft",
            IdeaStatus::Active => "active",
            IdeaStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(IdeaStatus::Draft),
            "active" => Some(IdeaStatus::Active),
            "archived" => Some(IdeaStatus::Archived),
            _ => None,
        }
    }
}

/// Investor appetite for risk.
#[derive(Enum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(RiskTolerance::Low),
            "medium" => Some(RiskTolerance::Medium),
            "high" => Some(RiskTolerance::High),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> i32 {
        match self {
            RiskTolerance::Low => 0,
            RiskTolerance::Medium => 1,
            RiskTolerance::High => 2,
        }
    }
}

/// Investment horizon an investor is working toward.
#[derive(Enum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestmentTimeline {
    #[oai(rename = "3_months")]
    #[serde(rename = "3_months")]
    ThreeMonths,
    #[oai(rename = "6_months")]
    #[serde(rename = "6_months")]
    SixMonths,
    #[oai(rename = "1_year")]
    #[serde(rename = "1_year")]
    OneYear,
    #[oai(rename = "2_years_plus")]
    #[serde(rename = "2_years_plus")]
    TwoYearsPlus,
}

impl InvestmentTimeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentTimeline::ThreeMonths => "3_months",
            InvestmentTimeline::SixMonths => "6_months",
            InvestmentTimeline::OneYear => "1_year",
            InvestmentTimeline::TwoYearsPlus => "2_years_plus",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "3_months" => Some(InvestmentTimeline::ThreeMonths),
            "6_months" => Some(InvestmentTimeline::SixMonths),
            "1_year" => Some(InvestmentTimeline::OneYear),
            "2_years_plus" => Some(InvestmentTimeline::TwoYearsPlus),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> i32 {
        match self {
            InvestmentTimeline::ThreeMonths => 0,
            InvestmentTimeline::SixMonths => 1,
            InvestmentTimeline::OneYear => 2,
            InvestmentTimeline::TwoYearsPlus => 3,
        }
    }
}

/// Lifecycle of an investor-to-founder connection request.
#[derive(Enum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Declined,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Declined => "declined",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ConnectionStatus::Pending),
            "accepted" => Some(ConnectionStatus::Accepted),
            "declined" => Some(ConnectionStatus::Declined),
            _ => None,
        }
    }
}
