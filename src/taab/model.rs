//! # Data Model
//!
//! One [`Entry`] type carries the union of every field the three historical
//! form layouts used. Which of those fields a given file or form cares about
//! is decided by the active [`SchemaVariant`]; which of them must be filled in
//! is decided by the entry's [`Category`] through a single lookup table
//! ([`Category::requirements`]), resolved against the variant.
//!
//! ## Defaults
//!
//! Every textual field defaults to the empty string, never null. The
//! timestamp defaults to the current time and the category to
//! [`Category::General`]. This holds for entries built in code, loaded from
//! the persistence slot, and imported from JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of card classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Category {
    #[default]
    #[serde(rename = "General")]
    General,
    #[serde(rename = "General Branded")]
    GeneralBranded,
    #[serde(rename = "Student")]
    Student,
    #[serde(rename = "Student ID")]
    StudentId,
}

/// A category-conditional requirement, resolved to a concrete [`Field`] by the
/// active schema variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The branded company or institution, depending on the variant.
    Affiliation,
    StudentId,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::General,
        Category::GeneralBranded,
        Category::Student,
        Category::StudentId,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::GeneralBranded => "General Branded",
            Category::Student => "Student",
            Category::StudentId => "Student ID",
        }
    }

    /// Fields that must be non-empty, beyond the card id, for this category.
    pub fn requirements(self) -> &'static [Requirement] {
        match self {
            Category::General => &[],
            Category::GeneralBranded => &[Requirement::Affiliation],
            Category::Student => &[Requirement::Affiliation],
            Category::StudentId => &[Requirement::Affiliation, Requirement::StudentId],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the display labels case-insensitively, plus dashed/underscored
    /// forms (`general-branded`, `student_id`) for command-line use. An empty
    /// string is the default category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "" | "general" => Ok(Category::General),
            "general branded" => Ok(Category::GeneralBranded),
            "student" => Ok(Category::Student),
            "student id" => Ok(Category::StudentId),
            _ => Err(format!("Unknown category: {}", s.trim())),
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Every named attribute of an entry, in the order the richest layout uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CardId,
    Category,
    Company,
    Institution,
    StudentId,
    Name,
    Phone,
    Address,
    Timestamp,
    Image,
}

impl Field {
    /// Column header / form label.
    pub fn label(self) -> &'static str {
        match self {
            Field::CardId => "Card ID",
            Field::Category => "Category",
            Field::Company => "Company",
            Field::Institution => "Branded Institution",
            Field::StudentId => "Student ID",
            Field::Name => "Name",
            Field::Phone => "Phone",
            Field::Address => "Address",
            Field::Timestamp => "Timestamp",
            Field::Image => "Image",
        }
    }

    /// Key used in JSON documents and the persistence slot.
    pub fn key(self) -> &'static str {
        match self {
            Field::CardId => "cardId",
            Field::Category => "category",
            Field::Company => "brandedCompany",
            Field::Institution => "brandedInstitution",
            Field::StudentId => "studentId",
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::Timestamp => "timestamp",
            Field::Image => "image",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three column layouts the tool has shipped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Six columns: card, category, company, name, phone, address.
    Generic,
    /// Generic plus a timestamp column.
    Branded,
    /// Institution and student fields, timestamp and an attached image.
    #[default]
    Institution,
}

const GENERIC_COLUMNS: &[Field] = &[
    Field::CardId,
    Field::Category,
    Field::Company,
    Field::Name,
    Field::Phone,
    Field::Address,
];

const BRANDED_COLUMNS: &[Field] = &[
    Field::CardId,
    Field::Category,
    Field::Company,
    Field::Name,
    Field::Phone,
    Field::Address,
    Field::Timestamp,
];

const INSTITUTION_COLUMNS: &[Field] = &[
    Field::CardId,
    Field::Category,
    Field::Institution,
    Field::StudentId,
    Field::Name,
    Field::Phone,
    Field::Address,
    Field::Timestamp,
    Field::Image,
];

impl SchemaVariant {
    pub const ALL: [SchemaVariant; 3] = [
        SchemaVariant::Generic,
        SchemaVariant::Branded,
        SchemaVariant::Institution,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchemaVariant::Generic => "generic",
            SchemaVariant::Branded => "branded",
            SchemaVariant::Institution => "institution",
        }
    }

    /// CSV column order for this layout.
    pub fn columns(self) -> &'static [Field] {
        match self {
            SchemaVariant::Generic => GENERIC_COLUMNS,
            SchemaVariant::Branded => BRANDED_COLUMNS,
            SchemaVariant::Institution => INSTITUTION_COLUMNS,
        }
    }

    /// The field that satisfies [`Requirement::Affiliation`].
    pub fn affiliation(self) -> Field {
        match self {
            SchemaVariant::Generic | SchemaVariant::Branded => Field::Company,
            SchemaVariant::Institution => Field::Institution,
        }
    }

    /// Categories offered by this layout's form.
    pub fn categories(self) -> &'static [Category] {
        match self {
            SchemaVariant::Generic | SchemaVariant::Branded => {
                &[Category::General, Category::GeneralBranded]
            }
            SchemaVariant::Institution => &Category::ALL,
        }
    }

    pub fn resolve(self, requirement: Requirement) -> Field {
        match requirement {
            Requirement::Affiliation => self.affiliation(),
            Requirement::StudentId => Field::StudentId,
        }
    }

    pub fn required_fields(self, category: Category) -> Vec<Field> {
        category
            .requirements()
            .iter()
            .map(|r| self.resolve(*r))
            .collect()
    }

    /// Form fields shown for `category`, in column order.
    pub fn visible_fields(self, category: Category) -> Vec<Field> {
        let required = self.required_fields(category);
        self.columns()
            .iter()
            .copied()
            .filter(|field| match field {
                Field::Company | Field::Institution | Field::StudentId => required.contains(field),
                Field::Timestamp => false,
                _ => true,
            })
            .collect()
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generic" => Ok(SchemaVariant::Generic),
            "branded" | "company" => Ok(SchemaVariant::Branded),
            "institution" | "student" => Ok(SchemaVariant::Institution),
            other => Err(format!(
                "Unknown schema '{}' (expected generic, branded or institution)",
                other
            )),
        }
    }
}

/// One logged card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, deserialize_with = "string_or_null")]
    pub card_id: String,
    #[serde(default)]
    pub category: Category,
    #[serde(
        default,
        rename = "brandedCompany",
        alias = "company",
        deserialize_with = "string_or_null"
    )]
    pub company: String,
    #[serde(
        default,
        rename = "brandedInstitution",
        alias = "institution",
        deserialize_with = "string_or_null"
    )]
    pub institution: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub student_id: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub phone: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub address: String,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub image: String,
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn timestamp_or_now<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Parses an RFC 3339 timestamp; blank input means "now".
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Utc::now());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}

/// Lossless textual form of a timestamp.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl Entry {
    pub fn new(card_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            category: Category::General,
            company: String::new(),
            institution: String::new(),
            student_id: String::new(),
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            timestamp: Utc::now(),
            image: String::new(),
        }
    }

    /// Textual value of a field as it appears in a CSV cell.
    pub fn text(&self, field: Field) -> String {
        match field {
            Field::CardId => self.card_id.clone(),
            Field::Category => self.category.label().to_string(),
            Field::Company => self.company.clone(),
            Field::Institution => self.institution.clone(),
            Field::StudentId => self.student_id.clone(),
            Field::Name => self.name.clone(),
            Field::Phone => self.phone.clone(),
            Field::Address => self.address.clone(),
            Field::Timestamp => format_timestamp(&self.timestamp),
            Field::Image => self.image.clone(),
        }
    }

    /// Sets a field from its textual form. Fails only for category and
    /// timestamp values that do not parse.
    pub fn set_text(&mut self, field: Field, value: &str) -> Result<(), String> {
        match field {
            Field::CardId => self.card_id = value.to_string(),
            Field::Category => self.category = value.parse()?,
            Field::Company => self.company = value.to_string(),
            Field::Institution => self.institution = value.to_string(),
            Field::StudentId => self.student_id = value.to_string(),
            Field::Name => self.name = value.to_string(),
            Field::Phone => self.phone = value.to_string(),
            Field::Address => self.address = value.to_string(),
            Field::Timestamp => self.timestamp = parse_timestamp(value)?,
            Field::Image => self.image = value.to_string(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_labels_and_cli_forms() {
        assert_eq!("General Branded".parse::<Category>(), Ok(Category::GeneralBranded));
        assert_eq!("student-id".parse::<Category>(), Ok(Category::StudentId));
        assert_eq!("STUDENT".parse::<Category>(), Ok(Category::Student));
        assert_eq!("".parse::<Category>(), Ok(Category::General));
        assert!("Staff".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_as_label() {
        let json = serde_json::to_string(&Category::StudentId).unwrap();
        assert_eq!(json, "\"Student ID\"");
    }

    #[test]
    fn requirements_resolve_against_variant() {
        assert_eq!(
            SchemaVariant::Generic.required_fields(Category::GeneralBranded),
            vec![Field::Company]
        );
        assert_eq!(
            SchemaVariant::Institution.required_fields(Category::StudentId),
            vec![Field::Institution, Field::StudentId]
        );
        assert!(SchemaVariant::Institution
            .required_fields(Category::General)
            .is_empty());
    }

    #[test]
    fn company_only_visible_for_branded_category() {
        let general = SchemaVariant::Generic.visible_fields(Category::General);
        assert!(!general.contains(&Field::Company));

        let branded = SchemaVariant::Generic.visible_fields(Category::GeneralBranded);
        assert!(branded.contains(&Field::Company));
    }

    #[test]
    fn institution_variant_shows_image_but_not_timestamp() {
        let fields = SchemaVariant::Institution.visible_fields(Category::StudentId);
        assert!(fields.contains(&Field::Image));
        assert!(fields.contains(&Field::StudentId));
        assert!(!fields.contains(&Field::Timestamp));
    }

    #[test]
    fn deserialize_defaults_missing_fields() {
        let before = Utc::now();
        let entry: Entry = serde_json::from_str(r#"{"cardId":"B2","category":"Student"}"#).unwrap();
        assert_eq!(entry.card_id, "B2");
        assert_eq!(entry.category, Category::Student);
        assert_eq!(entry.name, "");
        assert_eq!(entry.image, "");
        assert!(entry.timestamp >= before);
    }

    #[test]
    fn deserialize_accepts_legacy_company_key_and_nulls() {
        let entry: Entry =
            serde_json::from_str(r#"{"cardId":"C3","company":"Acme","phone":null}"#).unwrap();
        assert_eq!(entry.company, "Acme");
        assert_eq!(entry.phone, "");
        assert_eq!(entry.category, Category::General);
    }

    #[test]
    fn timestamp_text_round_trips() {
        let mut entry = Entry::new("A1");
        let text = entry.text(Field::Timestamp);
        let original = entry.timestamp;
        entry.set_text(Field::Timestamp, &text).unwrap();
        assert_eq!(entry.timestamp, original);
    }

    #[test]
    fn set_text_rejects_bad_timestamp() {
        let mut entry = Entry::new("A1");
        assert!(entry.set_text(Field::Timestamp, "yesterday").is_err());
    }
}
