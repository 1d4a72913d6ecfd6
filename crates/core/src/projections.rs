use serde::{Deserialize, Serialize};

use crate::catalog::StateRecord;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CapitalView {
    pub state: String,
    pub capital: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NicknameView {
    pub state: String,
    pub nickname: String,
}

/// Population rendered with thousands separators
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PopulationView {
    pub state: String,
    pub population: String,
}

/// Admission date exactly as stored in the dataset
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AdmissionView {
    pub state: String,
    pub admitted: String,
}

pub fn capital(record: &StateRecord) -> CapitalView {
    CapitalView {
        state: record.name.clone(),
        capital: record.capital_city.clone(),
    }
}

pub fn nickname(record: &StateRecord) -> NicknameView {
    NicknameView {
        state: record.name.clone(),
        nickname: record.nickname.clone(),
    }
}

pub fn population(record: &StateRecord) -> PopulationView {
    PopulationView {
        state: record.name.clone(),
        population: format_thousands(record.population),
    }
}

pub fn admission(record: &StateRecord) -> AdmissionView {
    AdmissionView {
        state: record.name.clone(),
        admitted: record.admission_date.clone(),
    }
}

/// Format an integer the way en-US locales do: "39512223" -> "39,512,223"
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(582658), "582,658");
        assert_eq!(format_thousands(38332521), "38,332,521");
        assert_eq!(format_thousands(1_000_000_000), "1,000,000,000");
    }

    #[test]
    fn test_projections_for_california() {
        let record = Catalog::builtin().lookup("ca").unwrap();

        assert_eq!(capital(record).capital, "Sacramento");
        assert_eq!(nickname(record).nickname, "Golden State");
        assert_eq!(population(record).population, "38,332,521");
        assert_eq!(admission(record).admitted, "1850-09-09");
        assert_eq!(capital(record).state, "California");
    }

    #[test]
    fn test_admission_json_shape() {
        let record = Catalog::builtin().lookup("HI").unwrap();
        let json = serde_json::to_value(admission(record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"state": "Hawaii", "admitted": "1959-08-21"})
        );
    }
}
