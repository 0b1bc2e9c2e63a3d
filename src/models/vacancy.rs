//! Normalized vacancy records and their columnar collection form.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A flattened vacancy with salaries in the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyRecord {
    pub id: String,
    pub employer: String,
    pub name: String,
    pub has_salary: bool,
    pub salary_from: Option<u64>,
    pub salary_to: Option<u64>,
    pub experience: String,
    pub schedule: String,
    pub key_skills: Vec<String>,
    /// Description with HTML tags removed
    pub description: String,
}

/// Vacancies stored column by column.
///
/// Index `i` of every column describes the same vacancy, and rows keep the
/// order in which ids were enumerated. The only way to build one is from
/// records, so columns always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnarResult {
    ids: Vec<String>,
    employer: Vec<String>,
    name: Vec<String>,
    has_salary: Vec<bool>,
    salary_from: Vec<Option<u64>>,
    salary_to: Vec<Option<u64>>,
    experience: Vec<String>,
    schedule: Vec<String>,
    key_skills: Vec<Vec<String>>,
    description: Vec<String>,
}

impl ColumnarResult {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = VacancyRecord>,
    {
        let mut result = Self::default();
        for record in records {
            result.push(record);
        }
        result
    }

    fn push(&mut self, record: VacancyRecord) {
        self.ids.push(record.id);
        self.employer.push(record.employer);
        self.name.push(record.name);
        self.has_salary.push(record.has_salary);
        self.salary_from.push(record.salary_from);
        self.salary_to.push(record.salary_to);
        self.experience.push(record.experience);
        self.schedule.push(record.schedule);
        self.key_skills.push(record.key_skills);
        self.description.push(record.description);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn names(&self) -> &[String] {
        &self.name
    }

    pub fn salary_from(&self) -> &[Option<u64>] {
        &self.salary_from
    }

    pub fn salary_to(&self) -> &[Option<u64>] {
        &self.salary_to
    }

    /// Reassemble row `index`, if it exists.
    pub fn record(&self, index: usize) -> Option<VacancyRecord> {
        if index >= self.len() {
            return None;
        }
        Some(VacancyRecord {
            id: self.ids[index].clone(),
            employer: self.employer[index].clone(),
            name: self.name[index].clone(),
            has_salary: self.has_salary[index],
            salary_from: self.salary_from[index],
            salary_to: self.salary_to[index],
            experience: self.experience[index].clone(),
            schedule: self.schedule[index].clone(),
            key_skills: self.key_skills[index].clone(),
            description: self.description[index].clone(),
        })
    }

    /// Row view of the whole result.
    pub fn records(&self) -> impl Iterator<Item = VacancyRecord> + '_ {
        (0..self.len()).filter_map(|i| self.record(i))
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        self.ids.truncate(n);
        self.employer.truncate(n);
        self.name.truncate(n);
        self.has_salary.truncate(n);
        self.salary_from.truncate(n);
        self.salary_to.truncate(n);
        self.experience.truncate(n);
        self.schedule.truncate(n);
        self.key_skills.truncate(n);
        self.description.truncate(n);
    }

    /// Check that every column has the same length.
    ///
    /// Only values read back from disk can violate this.
    pub fn validate(&self) -> Result<()> {
        let n = self.ids.len();
        let lengths = [
            self.employer.len(),
            self.name.len(),
            self.has_salary.len(),
            self.salary_from.len(),
            self.salary_to.len(),
            self.experience.len(),
            self.schedule.len(),
            self.key_skills.len(),
            self.description.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(AppError::validation(format!(
                "ragged columns: ids has {n} rows, others have {lengths:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(id: &str, name: &str) -> VacancyRecord {
        VacancyRecord {
            id: id.to_string(),
            employer: "Acme".to_string(),
            name: name.to_string(),
            has_salary: false,
            salary_from: None,
            salary_to: None,
            experience: "Нет опыта".to_string(),
            schedule: "Полный день".to_string(),
            key_skills: Vec::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_from_records_keeps_rows_aligned() {
        let mut second = record("2", "Go developer");
        second.has_salary = true;
        second.salary_to = Some(300_000);
        let result = ColumnarResult::from_records(vec![record("1", "Rust developer"), second]);

        assert_eq!(result.len(), 2);
        assert_eq!(result.ids(), ["1", "2"]);
        assert_eq!(result.salary_from(), [None::<u64>, None]);
        assert_eq!(result.salary_to(), [None, Some(300_000u64)]);
        assert_eq!(result.record(1).unwrap().name, "Go developer");
        assert!(result.record(2).is_none());
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_serialization_keeps_null_bounds() {
        let mut rec = record("1", "Rust developer");
        rec.has_salary = true;
        rec.salary_from = Some(100_000);
        let result = ColumnarResult::from_records(vec![rec]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["salary_from"], serde_json::json!([100000]));
        assert_eq!(json["salary_to"], serde_json::json!([null]));

        let back: ColumnarResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_validate_rejects_ragged_columns() {
        let mut json = serde_json::to_value(ColumnarResult::from_records(vec![record("1", "a")]))
            .unwrap();
        json["name"] = serde_json::json!([]);
        let ragged: ColumnarResult = serde_json::from_value(json).unwrap();
        assert!(ragged.validate().is_err());
    }
}
