use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single family member as supplied by the data layer.
///
/// Field names on the wire follow the REST API's member documents
/// (`_id`, `fatherId`, `motherId`, ...). Only `id` and the two parent links
/// matter for generation resolution; the remaining fields feed the
/// statistics and health overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Identifier, unique within a working set.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    /// Identifier of the father, or `None` if unknown.
    #[serde(default, alias = "fid")]
    pub father_id: Option<String>,
    /// Identifier of the mother, or `None` if unknown.
    #[serde(default, alias = "mid")]
    pub mother_id: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Birth date as entered, `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    /// Condition keys checked in the member's medical history.
    #[serde(default)]
    pub medical_conditions: Vec<String>,
}

impl Member {
    /// Create a member with the given identifier and no other data.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            surname: None,
            father_id: None,
            mother_id: None,
            gender: None,
            status: None,
            birth_date: None,
            blood_type: None,
            medical_conditions: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: &str, surname: Option<&str>) -> Self {
        self.name = name.to_string();
        self.surname = surname.map(str::to_string);
        self
    }

    pub fn with_father(mut self, father: &str) -> Self {
        self.father_id = Some(father.to_string());
        self
    }

    pub fn with_mother(mut self, mother: &str) -> Self {
        self.mother_id = Some(mother.to_string());
        self
    }

    pub fn with_birth_date(mut self, date: &str) -> Self {
        self.birth_date = Some(date.to_string());
        self
    }

    pub fn with_blood_type(mut self, blood_type: &str) -> Self {
        self.blood_type = Some(blood_type.to_string());
        self
    }

    pub fn with_conditions(mut self, conditions: &[&str]) -> Self {
        self.medical_conditions = conditions.iter().map(|c| c.to_string()).collect();
        self
    }

    /// `"name surname"`, trimmed when the surname is missing.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname.as_deref().unwrap_or(""))
            .trim()
            .to_string()
    }

    /// Parsed birth date, or `None` if absent or unparseable.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date.as_deref().and_then(parse_date)
    }

    pub fn has_condition(&self, condition: &str) -> bool {
        self.medical_conditions.iter().any(|c| c == condition)
    }

    /// Replace placeholder parent identifiers with `None`.
    pub(crate) fn normalize_parents(&mut self) {
        self.father_id = self.father_id.as_deref().and_then(parse_parent);
        self.mother_id = self.mother_id.as_deref().and_then(parse_parent);
    }
}

/// Parse a parent string, returning `None` for unknown parents.
///
/// Unknown parents are coded as `"0"`, `""`, `"NA"`, or `"na"`.
pub fn parse_parent(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("na") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parent_variants() {
        assert_eq!(parse_parent("0"), None);
        assert_eq!(parse_parent(""), None);
        assert_eq!(parse_parent("  "), None);
        assert_eq!(parse_parent("NA"), None);
        assert_eq!(parse_parent("na"), None);
        assert_eq!(parse_parent("Na"), None);
        assert_eq!(parse_parent("p1"), Some("p1".to_string()));
        assert_eq!(parse_parent(" 65f1c0a2 "), Some("65f1c0a2".to_string()));
    }

    #[test]
    fn test_full_name() {
        let m = Member::new("a").with_name("Ada", Some("Lovelace"));
        assert_eq!(m.full_name(), "Ada Lovelace");

        let m = Member::new("b").with_name("Homer", None);
        assert_eq!(m.full_name(), "Homer");
    }

    #[test]
    fn test_birth_date_formats() {
        let m = Member::new("a").with_birth_date("1950-03-14");
        assert_eq!(m.birth_date(), NaiveDate::from_ymd_opt(1950, 3, 14));

        let m = Member::new("b").with_birth_date("1982-07-01T00:00:00.000Z");
        assert_eq!(m.birth_date(), NaiveDate::from_ymd_opt(1982, 7, 1));

        let m = Member::new("c").with_birth_date("sometime in spring");
        assert_eq!(m.birth_date(), None);
    }

    #[test]
    fn test_deserialize_api_record() {
        let json = r#"{
            "_id": "m1",
            "name": "Grace",
            "surname": "Hopper",
            "fatherId": "m0",
            "motherId": null,
            "bloodType": "O+",
            "medicalConditions": ["diabetes"],
            "partnerId": ["m9"]
        }"#;
        let m: Member = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, "m1");
        assert_eq!(m.father_id.as_deref(), Some("m0"));
        assert_eq!(m.mother_id, None);
        assert_eq!(m.blood_type.as_deref(), Some("O+"));
        assert!(m.has_condition("diabetes"));
        assert!(!m.has_condition("asthma"));
    }

    #[test]
    fn test_normalize_parents() {
        let mut m = Member::new("c").with_father("").with_mother("NA");
        m.normalize_parents();
        assert_eq!(m.father_id, None);
        assert_eq!(m.mother_id, None);
    }
}
