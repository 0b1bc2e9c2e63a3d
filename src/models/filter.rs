//! Post-fetch vacancy filter.

use serde::{Deserialize, Serialize};

use super::VacancyRecord;

/// Conditions a vacancy must meet to be returned. Unset conditions (and
/// empty strings) always pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Case-insensitive substring of the vacancy name
    pub name: Option<String>,

    /// Lower bound for `salary_from`; vacancies without one are excluded
    pub salary_from: Option<u64>,

    /// Upper bound for `salary_to`; vacancies without one are excluded
    pub salary_to: Option<u64>,

    /// Case-insensitive substring of the experience label
    pub experience: Option<String>,

    /// Skills that must all be listed on the vacancy (case-insensitive)
    pub key_skills: Vec<String>,
}

impl FilterSpec {
    /// True when no condition is set.
    pub fn is_empty(&self) -> bool {
        non_empty(&self.name).is_none()
            && self.salary_from.is_none()
            && self.salary_to.is_none()
            && non_empty(&self.experience).is_none()
            && self.key_skills.is_empty()
    }

    /// Check a single vacancy against every set condition.
    pub fn matches(&self, record: &VacancyRecord) -> bool {
        if let Some(name) = non_empty(&self.name) {
            if !contains_ignore_case(&record.name, name) {
                return false;
            }
        }

        if let Some(bound) = self.salary_from {
            if record.salary_from.is_none_or(|from| from < bound) {
                return false;
            }
        }

        if let Some(bound) = self.salary_to {
            if record.salary_to.is_none_or(|to| to > bound) {
                return false;
            }
        }

        if let Some(experience) = non_empty(&self.experience) {
            if !contains_ignore_case(&record.experience, experience) {
                return false;
            }
        }

        if !self.key_skills.is_empty() {
            let skills: Vec<String> = record.key_skills.iter().map(|s| s.to_lowercase()).collect();
            let all_present = self
                .key_skills
                .iter()
                .all(|required| skills.contains(&required.to_lowercase()));
            if !all_present {
                return false;
            }
        }

        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vacancy::tests::record;

    fn skilled(skills: &[&str]) -> VacancyRecord {
        let mut rec = record("1", "Senior Python Developer");
        rec.key_skills = skills.iter().map(|s| s.to_string()).collect();
        rec
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let filter = FilterSpec {
            name: Some(String::new()),
            ..FilterSpec::default()
        };
        assert!(filter.is_empty());
        assert!(filter.matches(&record("1", "anything")));
    }

    #[test]
    fn test_key_skills_subset() {
        let rec = skilled(&["Python", "SQL"]);

        let python = FilterSpec {
            key_skills: vec!["python".into()],
            ..FilterSpec::default()
        };
        assert!(python.matches(&rec));

        let python_go = FilterSpec {
            key_skills: vec!["python".into(), "go".into()],
            ..FilterSpec::default()
        };
        assert!(!python_go.matches(&rec));
    }

    #[test]
    fn test_name_and_experience_ignore_case() {
        let filter = FilterSpec {
            name: Some("python".into()),
            experience: Some("НЕТ ОПЫТА".into()),
            ..FilterSpec::default()
        };
        assert!(filter.matches(&skilled(&[])));

        let filter = FilterSpec {
            name: Some("rust".into()),
            ..FilterSpec::default()
        };
        assert!(!filter.matches(&skilled(&[])));
    }

    #[test]
    fn test_salary_bounds_exclude_missing_values() {
        let mut rec = record("1", "Dev");
        rec.has_salary = true;
        rec.salary_from = Some(100_000);

        let from = FilterSpec {
            salary_from: Some(100_000),
            ..FilterSpec::default()
        };
        assert!(from.matches(&rec));

        let higher = FilterSpec {
            salary_from: Some(100_001),
            ..FilterSpec::default()
        };
        assert!(!higher.matches(&rec));

        let to = FilterSpec {
            salary_to: Some(500_000),
            ..FilterSpec::default()
        };
        assert!(!to.matches(&rec), "missing salary_to must not pass an upper bound");

        rec.salary_to = Some(200_000);
        assert!(to.matches(&rec));
        rec.salary_to = Some(600_000);
        assert!(!to.matches(&rec));
    }
}
