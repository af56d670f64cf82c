use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Kind of borrower. Business clients are always held to the business
/// amount threshold, whatever profession they declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    #[default]
    Individual,
    Business,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Individual => "individual",
            ClientType::Business => "business",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(ClientType::Individual),
            "business" => Ok(ClientType::Business),
            other => Err(Error::UnknownVariant {
                kind: "client type",
                value: other.to_string(),
            }),
        }
    }
}

/// Declared professional category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Profession {
    Student,
    /// Employee with under 2 years of experience
    JuniorEmployee,
    /// Employee with 2 to 5 years of experience
    ExperiencedEmployee,
    /// Employee with over 5 years of experience
    SeniorEmployee,
    Entrepreneur,
    Retired,
    Business,
}

impl Profession {
    pub const ALL: [Profession; 7] = [
        Profession::Student,
        Profession::JuniorEmployee,
        Profession::ExperiencedEmployee,
        Profession::SeniorEmployee,
        Profession::Entrepreneur,
        Profession::Retired,
        Profession::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profession::Student => "student",
            Profession::JuniorEmployee => "junior_employee",
            Profession::ExperiencedEmployee => "experienced_employee",
            Profession::SeniorEmployee => "senior_employee",
            Profession::Entrepreneur => "entrepreneur",
            Profession::Retired => "retired",
            Profession::Business => "business",
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profession {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Profession::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == key)
            .ok_or(Error::UnknownVariant {
                kind: "profession",
                value: key,
            })
    }
}

fn default_age() -> u32 {
    30
}

/// Everything the engine needs to know about one applicant and the loan
/// they request. Built once per scoring run and never mutated.
///
/// Example YAML:
/// ```yaml
/// surname: Diallo
/// first_name: Awa
/// profession: experienced_employee
/// monthly_income: 450000
/// monthly_charges: 80000
/// existing_debt: 30000
/// job_tenure_years: 4
/// requested_amount: 5000000
/// tenor_months: 36
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicantProfile {
    /// Display only
    pub surname: String,
    /// Display only
    #[serde(default)]
    pub first_name: String,
    /// National identity card number, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default)]
    pub client_type: ClientType,
    pub profession: Profession,
    pub monthly_income: f64,
    pub monthly_charges: f64,
    /// Existing monthly debt repayments
    #[serde(default)]
    pub existing_debt: f64,
    /// Fractional years allowed
    pub job_tenure_years: f64,
    /// Payment incidents over the trailing 12 months
    #[serde(default)]
    pub payment_incidents_12m: u32,
    pub requested_amount: f64,
    pub tenor_months: u32,
    /// Age in years, 30 when unknown
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default)]
    pub down_payment: f64,
}

impl ApplicantProfile {
    /// "First Surname", or just the surname when no first name is known.
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        if first.is_empty() {
            self.surname.trim().to_string()
        } else {
            format!("{} {}", first, self.surname.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profession_parse_roundtrip() {
        for profession in Profession::ALL {
            let parsed: Profession = profession.as_str().parse().unwrap();
            assert_eq!(parsed, profession);
        }
    }

    #[test]
    fn test_profession_parse_is_case_insensitive() {
        let parsed: Profession = " Senior_Employee ".parse().unwrap();
        assert_eq!(parsed, Profession::SeniorEmployee);
    }

    #[test]
    fn test_profession_parse_unknown() {
        let err = "astronaut".parse::<Profession>().unwrap_err();
        assert_eq!(err.to_string(), "unknown profession 'astronaut'");
    }

    #[test]
    fn test_client_type_parse() {
        assert_eq!("business".parse::<ClientType>().unwrap(), ClientType::Business);
        assert!("company".parse::<ClientType>().is_err());
    }

    #[test]
    fn test_minimal_profile_uses_defaults() {
        let yaml = r#"
surname: Diallo
profession: student
monthly_income: 150000
monthly_charges: 20000
job_tenure_years: 0.5
requested_amount: 300000
tenor_months: 12
"#;
        let profile: ApplicantProfile = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(profile.client_type, ClientType::Individual);
        assert_eq!(profile.age, 30);
        assert_eq!(profile.existing_debt, 0.0);
        assert_eq!(profile.payment_incidents_12m, 0);
        assert_eq!(profile.down_payment, 0.0);
        assert!(profile.national_id.is_none());
    }

    #[test]
    fn test_unknown_profile_field_rejected() {
        let yaml = r#"
surname: Diallo
profession: student
monthly_income: 150000
monthly_charges: 20000
job_tenure_years: 0.5
requested_amount: 300000
tenor_months: 12
credit_score: 700
"#;
        let result: Result<ApplicantProfile, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_display_name() {
        let yaml = r#"
surname: Diallo
first_name: Awa
profession: retired
monthly_income: 1
monthly_charges: 0
job_tenure_years: 0
requested_amount: 1
tenor_months: 1
"#;
        let mut profile: ApplicantProfile = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(profile.display_name(), "Awa Diallo");
        profile.first_name.clear();
        assert_eq!(profile.display_name(), "Diallo");
    }
}
