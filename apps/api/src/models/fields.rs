use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eleven fixed fields of a scoping document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    CustomerName,
    Industry,
    CompanyBackground,
    KeyBusinessServices,
    CurrentChallenges,
    DecisionCriteria,
    TechStack,
    DesiredOutcomes,
    ScopeOfArchitecture,
    Timeline,
    KeyContacts,
}

impl FieldKey {
    /// Canonical order, matching the review form and the extraction prompt.
    pub const ALL: [FieldKey; 11] = [
        FieldKey::CustomerName,
        FieldKey::Industry,
        FieldKey::CompanyBackground,
        FieldKey::KeyBusinessServices,
        FieldKey::CurrentChallenges,
        FieldKey::DecisionCriteria,
        FieldKey::TechStack,
        FieldKey::DesiredOutcomes,
        FieldKey::ScopeOfArchitecture,
        FieldKey::Timeline,
        FieldKey::KeyContacts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::CustomerName => "customer_name",
            FieldKey::Industry => "industry",
            FieldKey::CompanyBackground => "company_background",
            FieldKey::KeyBusinessServices => "key_business_services",
            FieldKey::CurrentChallenges => "current_challenges",
            FieldKey::DecisionCriteria => "decision_criteria",
            FieldKey::TechStack => "tech_stack",
            FieldKey::DesiredOutcomes => "desired_outcomes",
            FieldKey::ScopeOfArchitecture => "scope_of_architecture",
            FieldKey::Timeline => "timeline",
            FieldKey::KeyContacts => "key_contacts",
        }
    }

    /// Human-readable label shown next to the field in the review form.
    pub fn label(self) -> &'static str {
        match self {
            FieldKey::CustomerName => "Customer Name",
            FieldKey::Industry => "Industry",
            FieldKey::CompanyBackground => "Company Background",
            FieldKey::KeyBusinessServices => "Key Business Services",
            FieldKey::CurrentChallenges => "Current Challenges",
            FieldKey::DecisionCriteria => "Decision Criteria",
            FieldKey::TechStack => "Tech Stack",
            FieldKey::DesiredOutcomes => "Desired Outcomes",
            FieldKey::ScopeOfArchitecture => "Scope of Architecture",
            FieldKey::Timeline => "Timeline",
            FieldKey::KeyContacts => "Key Contacts",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldKey(pub String);

impl fmt::Display for UnknownFieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownFieldKey {}

impl FromStr for FieldKey {
    type Err = UnknownFieldKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownFieldKey(s.to_string()))
    }
}

/// The content of one scoping document: all eleven fields, always present,
/// empty until extracted or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSet {
    pub customer_name: String,
    pub industry: String,
    pub company_background: String,
    pub key_business_services: String,
    pub current_challenges: String,
    pub decision_criteria: String,
    pub tech_stack: String,
    pub desired_outcomes: String,
    pub scope_of_architecture: String,
    pub timeline: String,
    pub key_contacts: String,
}

impl FieldSet {
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::CustomerName => &self.customer_name,
            FieldKey::Industry => &self.industry,
            FieldKey::CompanyBackground => &self.company_background,
            FieldKey::KeyBusinessServices => &self.key_business_services,
            FieldKey::CurrentChallenges => &self.current_challenges,
            FieldKey::DecisionCriteria => &self.decision_criteria,
            FieldKey::TechStack => &self.tech_stack,
            FieldKey::DesiredOutcomes => &self.desired_outcomes,
            FieldKey::ScopeOfArchitecture => &self.scope_of_architecture,
            FieldKey::Timeline => &self.timeline,
            FieldKey::KeyContacts => &self.key_contacts,
        }
    }

    fn slot_mut(&mut self, key: FieldKey) -> &mut String {
        match key {
            FieldKey::CustomerName => &mut self.customer_name,
            FieldKey::Industry => &mut self.industry,
            FieldKey::CompanyBackground => &mut self.company_background,
            FieldKey::KeyBusinessServices => &mut self.key_business_services,
            FieldKey::CurrentChallenges => &mut self.current_challenges,
            FieldKey::DecisionCriteria => &mut self.decision_criteria,
            FieldKey::TechStack => &mut self.tech_stack,
            FieldKey::DesiredOutcomes => &mut self.desired_outcomes,
            FieldKey::ScopeOfArchitecture => &mut self.scope_of_architecture,
            FieldKey::Timeline => &mut self.timeline,
            FieldKey::KeyContacts => &mut self.key_contacts,
        }
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        *self.slot_mut(key) = value.into();
    }

    /// Overwrites only the given keys; every other field keeps its value.
    pub fn apply<I, S>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (FieldKey, S)>,
        S: Into<String>,
    {
        for (key, value) in updates {
            self.set(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        FieldKey::ALL.iter().all(|k| self.get(*k).is_empty())
    }
}
