// src/pipeline/normalize.rs

//! Raw vacancy detail to [`VacancyRecord`] conversion.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::models::{ExchangeRateTable, Named, RawDetail, RawSalary, VacancyRecord};

/// Share of a gross salary left after income tax.
pub const GROSS_FACTOR: f64 = 0.87;

static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<.*?>").ok());

/// Flatten `raw` into a record, converting salary bounds to the base currency.
///
/// Fails with [`crate::error::AppError::MissingRate`] if the salary currency
/// is not in `rates`.
pub fn normalize(raw: &RawDetail, rates: &ExchangeRateTable) -> Result<VacancyRecord> {
    let (salary_from, salary_to) = match &raw.salary {
        Some(salary) => convert_salary(salary, rates)?,
        None => (None, None),
    };

    Ok(VacancyRecord {
        id: raw.id.clone().unwrap_or_default(),
        employer: name_of(raw.employer.as_ref()),
        name: raw.name.clone(),
        has_salary: raw.salary.is_some(),
        salary_from,
        salary_to,
        experience: name_of(raw.experience.as_ref()),
        schedule: name_of(raw.schedule.as_ref()),
        key_skills: raw.key_skills.iter().map(|s| s.name.clone()).collect(),
        description: strip_tags(&raw.description),
    })
}

/// Convert both bounds independently; an absent bound stays absent.
fn convert_salary(
    salary: &RawSalary,
    rates: &ExchangeRateTable,
) -> Result<(Option<u64>, Option<u64>)> {
    if salary.from.is_none() && salary.to.is_none() {
        return Ok((None, None));
    }

    let rate = rates.rate(&salary.currency)?;
    let factor = if salary.gross.unwrap_or(false) {
        GROSS_FACTOR
    } else {
        1.0
    };
    let convert = |amount: f64| (amount * factor / rate).round() as u64;

    Ok((salary.from.map(convert), salary.to.map(convert)))
}

/// Remove every `<...>` tag. Entities are left as they are.
pub fn strip_tags(html: &str) -> String {
    match TAG.as_ref() {
        Some(tag) => tag.replace_all(html, "").into_owned(),
        None => html.to_string(),
    }
}

fn name_of(named: Option<&Named>) -> String {
    named.map(|n| n.name.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn rates() -> ExchangeRateTable {
        ExchangeRateTable::new([("RUR", 1.0), ("USD", 0.012641), ("EUR", 0.01083)]).unwrap()
    }

    fn detail(salary: Option<RawSalary>) -> RawDetail {
        RawDetail {
            id: Some("93151146".into()),
            name: "Rust developer".into(),
            employer: Some(Named {
                name: "Acme".into(),
            }),
            salary,
            experience: Some(Named {
                name: "От 1 года до 3 лет".into(),
            }),
            schedule: Some(Named {
                name: "Удаленная работа".into(),
            }),
            key_skills: vec![
                Named { name: "Rust".into() },
                Named { name: "SQL".into() },
                Named { name: "Rust".into() },
            ],
            description: "<p>Hello <b>World</b></p>".into(),
        }
    }

    #[test]
    fn test_gross_usd_conversion() {
        let salary = RawSalary {
            from: None,
            to: Some(100_000.0),
            currency: "USD".into(),
            gross: Some(true),
        };
        let record = normalize(&detail(Some(salary)), &rates()).unwrap();

        assert!(record.has_salary);
        assert_eq!(record.salary_from, None);
        // 100000 * 0.87 / 0.012641 = 6882366.90...
        assert_eq!(record.salary_to, Some(6_882_367));
    }

    #[test]
    fn test_net_conversion_rounds() {
        let salary = RawSalary {
            from: Some(1000.0),
            to: None,
            currency: "EUR".into(),
            gross: Some(false),
        };
        let record = normalize(&detail(Some(salary)), &rates()).unwrap();
        // 1000 / 0.01083 = 92336.10...
        assert_eq!(record.salary_from, Some(92_336));
        assert_eq!(record.salary_to, None);
    }

    #[test]
    fn test_base_currency_gross() {
        let salary = RawSalary {
            from: Some(200_000.0),
            to: Some(250_000.0),
            currency: "RUR".into(),
            gross: Some(true),
        };
        let record = normalize(&detail(Some(salary)), &rates()).unwrap();
        assert_eq!(record.salary_from, Some(174_000));
        assert_eq!(record.salary_to, Some(217_500));
    }

    #[test]
    fn test_without_salary() {
        let record = normalize(&detail(None), &rates()).unwrap();
        assert!(!record.has_salary);
        assert_eq!(record.salary_from, None);
        assert_eq!(record.salary_to, None);
    }

    #[test]
    fn test_missing_rate_is_fatal() {
        let salary = RawSalary {
            from: Some(500_000.0),
            to: None,
            currency: "KZT".into(),
            gross: None,
        };
        let err = normalize(&detail(Some(salary)), &rates()).unwrap_err();
        assert!(matches!(err, AppError::MissingRate { currency } if currency == "KZT"));
    }

    #[test]
    fn test_flattens_nested_fields() {
        let record = normalize(&detail(None), &rates()).unwrap();
        assert_eq!(record.id, "93151146");
        assert_eq!(record.employer, "Acme");
        assert_eq!(record.experience, "От 1 года до 3 лет");
        assert_eq!(record.schedule, "Удаленная работа");
        assert_eq!(record.key_skills, vec!["Rust", "SQL", "Rust"]);
        assert_eq!(record.description, "Hello World");
    }

    #[test]
    fn test_missing_nested_objects_are_empty() {
        let raw = RawDetail::default();
        let record = normalize(&raw, &rates()).unwrap();
        assert_eq!(record.employer, "");
        assert_eq!(record.experience, "");
        assert!(record.key_skills.is_empty());
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>World</b></p>"), "Hello World");
        assert_eq!(
            strip_tags(r#"<a href="x">link</a> &amp; more"#),
            "link &amp; more"
        );
        assert_eq!(strip_tags("no tags"), "no tags");
    }
}
