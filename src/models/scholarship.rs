// src/models/scholarship.rs
use serde::{Deserialize, Serialize};

/// Montante de uma bolsa, estruturado no momento da ingestão.
/// `display` fica apenas para apresentação; os filtros usam `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amount {
    pub display: String,
    pub currency: Option<&'static str>,
    /// Inteiro formado por todos os dígitos de `display`.
    /// `None` quando não há dígitos ou o número não cabe num u64.
    pub value: Option<u64>,
}

impl Amount {
    pub fn parse(raw: &str) -> Self {
        let currency = raw.chars().find_map(currency_code);

        let mut value: Option<u64> = None;
        let mut overflow = false;
        for digit in raw.chars().filter_map(|c| c.to_digit(10)) {
            value = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)));
            if value.is_none() {
                overflow = true;
                break;
            }
        }
        if overflow {
            tracing::warn!("Montante fora do intervalo suportado: '{}'", raw);
        }

        Self {
            display: raw.to_string(),
            currency,
            value,
        }
    }
}

fn currency_code(symbol: char) -> Option<&'static str> {
    match symbol {
        '₹' => Some("INR"),
        '$' => Some("USD"),
        '€' => Some("EUR"),
        '£' => Some("GBP"),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "undergraduate")]
    Undergraduate,
    #[serde(rename = "postgraduate")]
    Postgraduate,
    #[serde(rename = "phd")]
    Phd,
    #[serde(rename = "high school")]
    HighSchool,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Undergraduate => "undergraduate",
            EducationLevel::Postgraduate => "postgraduate",
            EducationLevel::Phd => "phd",
            EducationLevel::HighSchool => "high school",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeRequirement {
    /// Aceita qualquer filtro de rendimento.
    Any,
    Low,
    Middle,
    High,
}

impl IncomeRequirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeRequirement::Any => "any",
            IncomeRequirement::Low => "low",
            IncomeRequirement::Middle => "middle",
            IncomeRequirement::High => "high",
        }
    }
}

/// Uma bolsa do catálogo (dados fixos, nunca alterados em runtime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipRecord {
    pub id: u32,
    pub name: String,
    pub provider: String,
    pub amount: Amount,
    pub deadline: String,
    pub eligibility: String,
    pub category: String,
    pub education_level: Option<EducationLevel>,
    pub income_required: Option<IncomeRequirement>,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_strips_symbol_and_separators() {
        let amount = Amount::parse("₹50,000");
        assert_eq!(amount.value, Some(50_000));
        assert_eq!(amount.currency, Some("INR"));
        assert_eq!(amount.display, "₹50,000");

        let dollars = Amount::parse("$2,500");
        assert_eq!(dollars.value, Some(2_500));
        assert_eq!(dollars.currency, Some("USD"));
    }

    #[test]
    fn amount_without_digits_has_no_value() {
        let amount = Amount::parse("Varies");
        assert_eq!(amount.value, None);
        assert_eq!(amount.currency, None);
    }

    #[test]
    fn amount_overflow_has_no_value() {
        let amount = Amount::parse("₹99999999999999999999999");
        assert_eq!(amount.value, None);
        assert_eq!(amount.display, "₹99999999999999999999999");
        assert_eq!(amount.currency, Some("INR"));
    }

    #[test]
    fn education_level_serializes_with_reference_names() {
        let json = serde_json::to_string(&EducationLevel::HighSchool).unwrap();
        assert_eq!(json, "\"high school\"");
        assert_eq!(EducationLevel::Phd.as_str(), "phd");
    }
}
