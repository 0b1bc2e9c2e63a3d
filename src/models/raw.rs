//! Wire shapes of the vacancy API responses.
//!
//! Only the fields the collector reads are modelled; everything else in the
//! payload is ignored. Missing text fields decode as empty strings.

use serde::{Deserialize, Deserializer, Serialize};

/// One page of the vacancy listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingPage {
    /// Declared number of pages (read from page 0)
    #[serde(default)]
    pub pages: Option<u32>,

    /// Vacancy stubs; absent means there are no more results
    #[serde(default)]
    pub items: Option<Vec<ListingItem>>,
}

/// A vacancy stub inside a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Object with a display name (`employer`, `experience`, `key_skills[]`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: String,
}

/// Salary block of a vacancy detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSalary {
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    pub currency: String,
    /// Figures are stated before tax
    #[serde(default)]
    pub gross: Option<bool>,
}

/// Full vacancy detail as returned by the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetail {
    /// Overwritten with the id the detail was requested under
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub employer: Option<Named>,
    #[serde(default)]
    pub salary: Option<RawSalary>,
    #[serde(default)]
    pub experience: Option<Named>,
    #[serde(default)]
    pub schedule: Option<Named>,
    #[serde(default)]
    pub key_skills: Vec<Named>,
    #[serde(default)]
    pub description: String,
}

/// Node of the area (region/city) tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub areas: Vec<Area>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_page_without_items() {
        let page: ListingPage = serde_json::from_str(r#"{"pages": 3}"#).unwrap();
        assert_eq!(page.pages, Some(3));
        assert!(page.items.is_none());
    }

    #[test]
    fn test_listing_item_numeric_id() {
        let page: ListingPage =
            serde_json::from_str(r#"{"items": [{"id": "101"}, {"id": 102}]}"#).unwrap();
        let ids: Vec<_> = page.items.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["101", "102"]);
    }

    #[test]
    fn test_detail_with_null_salary_and_missing_fields() {
        let detail: RawDetail = serde_json::from_str(
            r#"{"id": "7", "name": "Rust developer", "salary": null, "employer": {"name": "Acme"}}"#,
        )
        .unwrap();
        assert!(detail.salary.is_none());
        assert_eq!(detail.employer.unwrap().name, "Acme");
        assert!(detail.key_skills.is_empty());
        assert_eq!(detail.description, "");
    }

    #[test]
    fn test_detail_rejects_mistyped_salary() {
        let result: Result<RawDetail, _> = serde_json::from_str(
            r#"{"salary": {"from": "lots", "to": null, "currency": "RUR", "gross": false}}"#,
        );
        assert!(result.is_err());
    }
}
