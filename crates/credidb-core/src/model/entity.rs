use serde::{Deserialize, Serialize};
use std::fmt;

///
/// EntityTag
///
/// The closed set of record categories a tenant owns. Catalog scopes and
/// record keys are both addressed by entity tag.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTag {
    Applicant,
    Location,
    EconomicActivity,
    FinancialSummary,
    Reference,
    CreditRequest,
    CreditType,
}

impl EntityTag {
    /// Stable wire/storage name for this entity kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applicant => "applicant",
            Self::Location => "location",
            Self::EconomicActivity => "economic_activity",
            Self::FinancialSummary => "financial_summary",
            Self::Reference => "reference",
            Self::CreditRequest => "credit_request",
            Self::CreditType => "credit_type",
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
