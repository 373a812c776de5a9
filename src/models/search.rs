// src/models/search.rs
use serde::Deserialize;

/// Limite por omissão do filtro de montante (cobre todo o catálogo de referência).
pub const DEFAULT_MAX_AMOUNT: i64 = 100_000;

/// Critérios de pesquisa. Strings vazias contam como "sem restrição".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub text: Option<String>,
    pub community: Option<String>,
    pub education_level: Option<String>,
    pub income_required: Option<String>,
    /// 0 significa sem limite; um valor negativo exclui todas as bolsas.
    pub max_amount: i64,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            text: None,
            community: None,
            education_level: None,
            income_required: None,
            max_amount: DEFAULT_MAX_AMOUNT,
        }
    }
}

impl SearchCriteria {
    pub fn text(&self) -> Option<&str> {
        active(&self.text)
    }

    pub fn community(&self) -> Option<&str> {
        active(&self.community)
    }

    pub fn education_level(&self) -> Option<&str> {
        active(&self.education_level)
    }

    pub fn income_required(&self) -> Option<&str> {
        active(&self.income_required)
    }

    /// Escreve os critérios como query string (`q`, `community`, `education`,
    /// `income`, `maxAmount`), omitindo valores vazios e o limite por omissão.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(text) = self.text() {
            pairs.push(("q", text.to_string()));
        }
        if let Some(community) = self.community() {
            pairs.push(("community", community.to_string()));
        }
        if let Some(level) = self.education_level() {
            pairs.push(("education", level.to_string()));
        }
        if let Some(income) = self.income_required() {
            pairs.push(("income", income.to_string()));
        }
        if self.max_amount != DEFAULT_MAX_AMOUNT {
            pairs.push(("maxAmount", self.max_amount.to_string()));
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parâmetros de URL tal como chegam do formulário de pesquisa.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub community: Option<String>,
    pub education: Option<String>,
    pub income: Option<String>,
    #[serde(rename = "maxAmount")]
    pub max_amount: Option<String>,
}

impl From<SearchParams> for SearchCriteria {
    fn from(params: SearchParams) -> Self {
        // Sem dígitos iniciais conta como 0 (sem limite); ausente usa o limite por omissão
        let max_amount = match params.max_amount.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_MAX_AMOUNT,
            Some(raw) => leading_integer(raw).unwrap_or_else(|| {
                tracing::debug!("maxAmount inválido '{}', sem limite aplicado", raw);
                0
            }),
        };

        Self {
            text: params.q,
            community: params.community,
            education_level: params.education,
            income_required: params.income,
            max_amount,
        }
    }
}

/// Inteiro no início do texto (sinal opcional seguido de dígitos); o resto é ignorado.
/// Valores fora do intervalo saturam.
fn leading_integer(raw: &str) -> Option<i64> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let mut value: Option<i64> = None;
    for digit in digits.chars().map_while(|c| c.to_digit(10)) {
        let digit = i64::from(digit);
        let acc = value.unwrap_or(0).saturating_mul(10);
        value = Some(if negative {
            acc.saturating_sub(digit)
        } else {
            acc.saturating_add(digit)
        });
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_are_inactive() {
        let criteria = SearchCriteria {
            text: Some(String::new()),
            community: Some("sc".to_string()),
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.text(), None);
        assert_eq!(criteria.community(), Some("sc"));
    }

    #[test]
    fn params_map_to_criteria() {
        let params = SearchParams {
            q: Some("stem".to_string()),
            education: Some("phd".to_string()),
            income: Some("low".to_string()),
            max_amount: Some("50000".to_string()),
            ..SearchParams::default()
        };
        let criteria = SearchCriteria::from(params);
        assert_eq!(criteria.text(), Some("stem"));
        assert_eq!(criteria.education_level(), Some("phd"));
        assert_eq!(criteria.income_required(), Some("low"));
        assert_eq!(criteria.max_amount, 50_000);
    }

    #[test]
    fn missing_max_amount_uses_default_and_garbage_is_unbounded() {
        let criteria = SearchCriteria::from(SearchParams::default());
        assert_eq!(criteria.max_amount, DEFAULT_MAX_AMOUNT);

        let criteria = SearchCriteria::from(SearchParams {
            max_amount: Some("lots".to_string()),
            ..SearchParams::default()
        });
        assert_eq!(criteria.max_amount, 0);
    }

    fn max_amount_of(raw: &str) -> i64 {
        SearchCriteria::from(SearchParams {
            max_amount: Some(raw.to_string()),
            ..SearchParams::default()
        })
        .max_amount
    }

    #[test]
    fn max_amount_reads_leading_digits_only() {
        assert_eq!(max_amount_of("50000abc"), 50_000);
        assert_eq!(max_amount_of(" 40000 "), 40_000);
        assert_eq!(max_amount_of("+7"), 7);
        assert_eq!(max_amount_of("abc50000"), 0);
        assert_eq!(max_amount_of("-"), 0);
        assert_eq!(max_amount_of("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn negative_max_amount_is_kept() {
        assert_eq!(max_amount_of("-1"), -1);
        assert_eq!(max_amount_of("-0"), 0);
    }

    #[test]
    fn query_string_skips_defaults_and_encodes_values() {
        assert_eq!(SearchCriteria::default().to_query_string(), "");

        let criteria = SearchCriteria {
            text: Some("women in stem".to_string()),
            education_level: Some("high school".to_string()),
            max_amount: 40_000,
            ..SearchCriteria::default()
        };
        assert_eq!(
            criteria.to_query_string(),
            "q=women%20in%20stem&education=high%20school&maxAmount=40000"
        );
    }
}
