use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical specialty a code belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Specialty {
    Cardiovascular,
    Respiratory,
    Endocrine,
    Gastrointestinal,
    MentalHealth,
    Musculoskeletal,
    Neurological,
    Renal,
    Genitourinary,
    Other(String),
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specialty::Cardiovascular => write!(f, "Cardiovascular"),
            Specialty::Respiratory => write!(f, "Respiratory"),
            Specialty::Endocrine => write!(f, "Endocrine"),
            Specialty::Gastrointestinal => write!(f, "Gastrointestinal"),
            Specialty::MentalHealth => write!(f, "Mental Health"),
            Specialty::Musculoskeletal => write!(f, "Musculoskeletal"),
            Specialty::Neurological => write!(f, "Neurological"),
            Specialty::Renal => write!(f, "Renal"),
            Specialty::Genitourinary => write!(f, "Genitourinary"),
            Specialty::Other(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for Specialty {
    fn from(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_uppercase();
        match key.as_str() {
            "CARDIOVASCULAR" => Specialty::Cardiovascular,
            "RESPIRATORY" => Specialty::Respiratory,
            "ENDOCRINE" => Specialty::Endocrine,
            "GASTROINTESTINAL" => Specialty::Gastrointestinal,
            "MENTALHEALTH" => Specialty::MentalHealth,
            "MUSCULOSKELETAL" => Specialty::Musculoskeletal,
            "NEUROLOGICAL" => Specialty::Neurological,
            "RENAL" => Specialty::Renal,
            "GENITOURINARY" => Specialty::Genitourinary,
            _ => Specialty::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for Specialty {
    fn from(s: String) -> Self {
        Specialty::from(s.as_str())
    }
}

impl From<Specialty> for String {
    fn from(specialty: Specialty) -> Self {
        specialty.to_string()
    }
}

/// One reference diagnosis code. Only a [`Catalog`](super::Catalog) builds
/// these, after validation, and hands out shared references afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeEntry {
    code: String,
    description: String,
    specialty: Specialty,
    keywords: Vec<String>,
}

impl CodeEntry {
    pub(crate) fn new(
        code: String,
        description: String,
        specialty: Specialty,
        keywords: Vec<String>,
    ) -> Self {
        CodeEntry {
            code,
            description,
            specialty,
            keywords,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn specialty(&self) -> &Specialty {
        &self.specialty
    }

    /// Distinct keywords in their original spelling and declaration order
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Unvalidated row of an external catalog table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRecord {
    pub code: String,
    pub description: String,
    #[serde(alias = "category")]
    pub specialty: Specialty,
    pub keywords: Vec<String>,
}

impl CodeRecord {
    pub fn new(code: &str, description: &str, specialty: Specialty, keywords: &[&str]) -> Self {
        CodeRecord {
            code: code.to_string(),
            description: description.to_string(),
            specialty,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialty_round_trip_names() {
        assert_eq!(Specialty::from("Mental Health"), Specialty::MentalHealth);
        assert_eq!(Specialty::from("mental_health"), Specialty::MentalHealth);
        assert_eq!(Specialty::MentalHealth.to_string(), "Mental Health");
        assert_eq!(
            Specialty::from(" Dermatology "),
            Specialty::Other("Dermatology".to_string())
        );
    }

    #[test]
    fn test_record_accepts_category_alias() {
        let record: CodeRecord = serde_json::from_str(
            r#"{"code":"R51","description":"Headache","category":"Neurological","keywords":["headache"]}"#,
        )
        .unwrap();
        assert_eq!(record.specialty, Specialty::Neurological);
    }
}
