//! Socio-economic indicator profiles submitted for prediction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A set of named socio-economic indicators for one prediction request.
///
/// Ten indicators are defined; a fitted artifact schema selects the subset
/// and order it was trained on, so models fitted on 3, 6, 9, or 10 of these
/// fields can all be served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorProfile {
    /// Unique request identifier
    #[serde(alias = "ID")]
    pub request_id: String,

    /// Annual parental household income
    #[serde(alias = "PARENTAL_INCOME")]
    pub parental_income: f64,

    /// Completed years of parental education
    #[serde(alias = "PARENTAL_EDUCATION_YEARS", default = "default_parental_education")]
    pub parental_education_years: f64,

    /// Completed years of education
    #[serde(alias = "EDUCATION_YEARS")]
    pub education_years: f64,

    /// Gender (0 = female, 1 = male)
    #[serde(alias = "GENDER")]
    pub gender: i32,

    /// Urban residence (0 = rural, 1 = urban)
    #[serde(alias = "URBAN_RESIDENCE")]
    pub urban_residence: i32,

    /// Minority status (0 = no, 1 = yes)
    #[serde(alias = "MINORITY_STATUS")]
    pub minority_status: i32,

    /// Age in years
    #[serde(alias = "AGE")]
    pub age: i32,

    /// Number of people in the household
    #[serde(alias = "HOUSEHOLD_SIZE", default = "default_household_size")]
    pub household_size: i32,

    /// Median income of the region, indexed to the national median (1.0)
    #[serde(alias = "REGION_INCOME_INDEX", default = "default_region_income_index")]
    pub region_income_index: f64,

    /// Public schooling (0 = private, 1 = public)
    #[serde(alias = "PUBLIC_SCHOOL", default = "default_public_school")]
    pub public_school: i32,

    /// Submission timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn default_parental_education() -> f64 {
    12.0
}

fn default_household_size() -> i32 {
    4
}

fn default_region_income_index() -> f64 {
    1.0
}

fn default_public_school() -> i32 {
    1
}

impl IndicatorProfile {
    /// Create a profile with required fields and neutral defaults elsewhere
    pub fn new(request_id: String, parental_income: f64, age: i32) -> Self {
        Self {
            request_id,
            parental_income,
            parental_education_years: 12.0,
            education_years: 12.0,
            gender: 1,
            urban_residence: 1,
            minority_status: 0,
            age,
            household_size: 4,
            region_income_index: 1.0,
            public_school: 1,
            timestamp: Utc::now(),
        }
    }

    /// Look up an indicator value by its schema name.
    ///
    /// Returns None for names no fitted schema can refer to.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        match name {
            "parental_income" => Some(self.parental_income),
            "parental_education_years" => Some(self.parental_education_years),
            "education_years" => Some(self.education_years),
            "gender" => Some(f64::from(self.gender)),
            "urban_residence" => Some(f64::from(self.urban_residence)),
            "minority_status" => Some(f64::from(self.minority_status)),
            "age" => Some(f64::from(self.age)),
            "household_size" => Some(f64::from(self.household_size)),
            "region_income_index" => Some(self.region_income_index),
            "public_school" => Some(f64::from(self.public_school)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = IndicatorProfile::new("req_123".to_string(), 30000.0, 30);

        let json = serde_json::to_string(&profile).unwrap();
        let deserialized: IndicatorProfile = serde_json::from_str(&json).unwrap();

        assert_eq!(profile.request_id, deserialized.request_id);
        assert_eq!(profile.parental_income, deserialized.parental_income);
        assert_eq!(profile.age, deserialized.age);
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let json = r#"{
            "request_id": "req_1",
            "parental_income": 30000.0,
            "education_years": 12.0,
            "gender": 1,
            "urban_residence": 1,
            "minority_status": 0,
            "age": 30
        }"#;

        let profile: IndicatorProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.household_size, 4);
        assert_eq!(profile.region_income_index, 1.0);
        assert_eq!(profile.public_school, 1);
    }

    #[test]
    fn value_of_resolves_every_schema_name() {
        let profile = IndicatorProfile::new("req_1".to_string(), 30000.0, 30);

        for name in [
            "parental_income",
            "parental_education_years",
            "education_years",
            "gender",
            "urban_residence",
            "minority_status",
            "age",
            "household_size",
            "region_income_index",
            "public_school",
        ] {
            assert!(profile.value_of(name).is_some(), "missing {name}");
        }

        assert_eq!(profile.value_of("parental_income"), Some(30000.0));
        assert_eq!(profile.value_of("no_such_indicator"), None);
    }
}
