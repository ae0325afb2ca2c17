//! The fixed eight-section scoping template.
//!
//! `industry`, `customer_name` and `tech_stack` are collected on the form but
//! have no slot in the template and never reach the rendered document.

use serde::{Deserialize, Serialize};

use crate::models::fields::{FieldKey, FieldSet};

/// Separator between a heading and its body, and between sections.
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Section titles in template order, each paired with the field it shows.
pub const TEMPLATE_SECTIONS: [(&str, FieldKey); 8] = [
    ("Executive Summary", FieldKey::DesiredOutcomes),
    ("Company Background", FieldKey::CompanyBackground),
    ("Key Business Services", FieldKey::KeyBusinessServices),
    ("Current Situation / Challenges", FieldKey::CurrentChallenges),
    ("Decision Criteria", FieldKey::DecisionCriteria),
    ("Scope of Architecture", FieldKey::ScopeOfArchitecture),
    ("Timeline", FieldKey::Timeline),
    ("POV Team", FieldKey::KeyContacts),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub number: u8,
    pub title: String,
    pub source_field: FieldKey,
    pub body: String,
}

impl Section {
    pub fn heading(&self) -> String {
        format!("{}. {}", self.number, self.title)
    }

    pub fn text(&self) -> String {
        format!("{}{}{}", self.heading(), SECTION_SEPARATOR, self.body)
    }
}

/// A rendered scoping document. Both export projections derive from `text()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn text(&self) -> String {
        self.sections
            .iter()
            .map(Section::text)
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }
}

/// Interpolates the field set into the template. No escaping, no limits.
pub fn render(fields: &FieldSet) -> Document {
    let sections = TEMPLATE_SECTIONS
        .iter()
        .zip(1u8..)
        .map(|((title, key), number)| Section {
            number,
            title: (*title).to_string(),
            source_field: *key,
            body: fields.get(*key).to_string(),
        })
        .collect();

    Document { sections }
}
