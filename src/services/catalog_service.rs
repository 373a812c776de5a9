// src/services/catalog_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        scholarship::{Amount, EducationLevel, IncomeRequirement, ScholarshipRecord},
        search::SearchCriteria,
    },
};
use std::{collections::HashSet, sync::Arc, time::Duration};

/// Quantas bolsas "semelhantes" a página de detalhe mostra.
pub const SIMILAR_LIMIT: usize = 2;

/// Catálogo fixo de bolsas. Os IDs são únicos.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ScholarshipRecord>,
}

impl Catalog {
    /// Constrói o catálogo, rejeitando IDs repetidos.
    pub fn from_records(records: Vec<ScholarshipRecord>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id) {
                tracing::error!("ID {} repetido no catálogo", record.id);
                return Err(AppError::DuplicateScholarshipId(record.id));
            }
        }
        Ok(Self { records })
    }

    /// As 10 bolsas de referência.
    pub fn seeded() -> AppResult<Self> {
        Self::from_records(seed_records())
    }

    pub fn records(&self) -> &[ScholarshipRecord] {
        &self.records
    }

    pub fn query(&self, criteria: &SearchCriteria) -> Vec<ScholarshipRecord> {
        query(criteria, &self.records)
    }

    pub fn find(&self, id: u32) -> Option<&ScholarshipRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Outras bolsas, pela ordem do catálogo, excluindo `id`.
    pub fn similar(&self, id: u32, limit: usize) -> Vec<ScholarshipRecord> {
        self.records
            .iter()
            .filter(|r| r.id != id)
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Filtra o catálogo. Função pura: mesma entrada, mesma saída, ordem preservada.
pub fn query(criteria: &SearchCriteria, catalog: &[ScholarshipRecord]) -> Vec<ScholarshipRecord> {
    // Normaliza uma vez só
    let text = criteria.text().map(str::to_lowercase);
    let community = criteria.community().map(str::to_lowercase);

    catalog
        .iter()
        .filter(|record| {
            let eligibility = record.eligibility.to_lowercase();

            let matches_text = text.as_deref().map_or(true, |q| {
                record.name.to_lowercase().contains(q)
                    || record.provider.to_lowercase().contains(q)
                    || eligibility.contains(q)
            });

            let matches_community = community
                .as_deref()
                .map_or(true, |c| eligibility.contains(c));

            let matches_education = criteria.education_level().map_or(true, |level| {
                record.education_level.map(|l| l.as_str()) == Some(level)
            });

            let matches_income = criteria.income_required().map_or(true, |income| {
                record
                    .income_required
                    .is_some_and(|r| r == IncomeRequirement::Any || r.as_str() == income)
            });

            matches_text
                && matches_community
                && matches_education
                && matches_income
                && within_max_amount(&record.amount, criteria.max_amount)
        })
        .cloned()
        .collect()
}

/// Montantes sem valor numérico ficam de fora sempre que há um limite ativo.
/// Um limite negativo não deixa passar nenhuma bolsa.
fn within_max_amount(amount: &Amount, max_amount: i64) -> bool {
    if max_amount == 0 {
        return true;
    }
    u64::try_from(max_amount).is_ok_and(|bound| amount.value.is_some_and(|v| v <= bound))
}

/// Pesquisa como o ecrã a faz: espera a latência simulada e filtra fora da task.
pub async fn search(
    catalog: Arc<Catalog>,
    criteria: SearchCriteria,
    latency: Duration,
) -> AppResult<Vec<ScholarshipRecord>> {
    tracing::debug!("Pesquisa de bolsas: {:?}", criteria);
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    let results = tokio::task::spawn_blocking(move || catalog.query(&criteria))
        .await
        .map_err(|e| {
            tracing::error!("Erro na task spawn_blocking (search): {:?}", e);
            AppError::TransientFetchFailure
        })?;

    tracing::debug!("{} bolsas encontradas.", results.len());
    Ok(results)
}

/// Detalhe de uma bolsa mais as semelhantes.
pub async fn scholarship_detail(
    catalog: &Catalog,
    id: u32,
    latency: Duration,
) -> AppResult<(ScholarshipRecord, Vec<ScholarshipRecord>)> {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    let record = catalog.find(id).cloned().ok_or_else(|| {
        tracing::debug!("Bolsa {} não encontrada.", id);
        AppError::NotFound(format!("Scholarship {id}"))
    })?;
    let similar = catalog.similar(id, SIMILAR_LIMIT);
    Ok((record, similar))
}

// --- Dados de referência ---

#[allow(clippy::too_many_arguments)]
fn record(
    id: u32,
    name: &str,
    provider: &str,
    amount: &str,
    deadline: &str,
    eligibility: &str,
    category: &str,
    education_level: EducationLevel,
    income_required: IncomeRequirement,
    description: Option<&str>,
) -> ScholarshipRecord {
    ScholarshipRecord {
        id,
        name: name.to_string(),
        provider: provider.to_string(),
        amount: Amount::parse(amount),
        deadline: deadline.to_string(),
        eligibility: eligibility.to_string(),
        category: category.to_string(),
        education_level: Some(education_level),
        income_required: Some(income_required),
        description: description.map(str::to_string),
        link: Some("#".to_string()),
    }
}

fn seed_records() -> Vec<ScholarshipRecord> {
    use EducationLevel::*;
    use IncomeRequirement::*;

    vec![
        record(
            1,
            "National Merit Scholarship",
            "National Merit Scholarship Corporation",
            "₹50,000",
            "October 15, 2025",
            "High academic achievement, PSAT/NMSQT test scores",
            "Merit-based",
            Undergraduate,
            Any,
            Some("The National Merit Scholarship Program is an academic competition for recognition and scholarships that began in 1955. High school students enter the National Merit Program by taking the Preliminary SAT/National Merit Scholarship Qualifying Test (PSAT/NMSQT), which serves as an initial screen of approximately 1.5 million entrants each year, and by meeting published program entry and participation requirements."),
        ),
        record(
            2,
            "Future Engineers Scholarship",
            "Engineering Foundation",
            "₹75,000",
            "December 1, 2025",
            "Engineering majors, minimum 3.5 GPA",
            "Field-specific",
            Undergraduate,
            Middle,
            Some("The Future Engineers Scholarship is designed to support outstanding students pursuing degrees in engineering fields. Recipients are selected based on academic achievement, leadership potential, and commitment to making a positive impact in the engineering profession. This scholarship aims to address the growing need for qualified engineers in various industries."),
        ),
        record(
            3,
            "First Generation Student Grant",
            "Education Access Foundation",
            "₹45,000",
            "January 15, 2026",
            "First-generation college students, demonstrated financial need",
            "Need-based",
            Undergraduate,
            Low,
            None,
        ),
        record(
            4,
            "Women in STEM Scholarship",
            "STEM Education Alliance",
            "₹100,000",
            "November 30, 2025",
            "Female students pursuing degrees in Science, Technology, Engineering, or Mathematics",
            "Diversity",
            Postgraduate,
            Any,
            None,
        ),
        record(
            5,
            "Community Service Award",
            "Community Foundation",
            "₹35,000",
            "February 28, 2026",
            "Students with significant community service experience, minimum 3.0 GPA",
            "Service-based",
            HighSchool,
            Any,
            None,
        ),
        record(
            6,
            "Rural Students Scholarship",
            "Rural Education Fund",
            "₹60,000",
            "March 15, 2026",
            "Students from rural communities with financial need",
            "Need-based",
            Undergraduate,
            Low,
            None,
        ),
        record(
            7,
            "Creative Arts Fellowship",
            "Arts Foundation",
            "₹40,000",
            "December 15, 2025",
            "Students pursuing visual arts, performing arts, creative writing, or related fields",
            "Field-specific",
            Postgraduate,
            Middle,
            None,
        ),
        record(
            8,
            "Future Entrepreneurs Grant",
            "Business Innovation Center",
            "₹55,000",
            "January 30, 2026",
            "Business majors with entrepreneurial projects or plans",
            "Field-specific",
            Undergraduate,
            Middle,
            None,
        ),
        record(
            9,
            "Doctoral Research Fellowship",
            "National Research Council",
            "₹90,000",
            "April 30, 2026",
            "PhD candidates in any discipline with an approved research proposal",
            "Research",
            Phd,
            Any,
            None,
        ),
        record(
            10,
            "Minority Communities Scholarship",
            "Social Equity Trust",
            "₹30,000",
            "May 31, 2026",
            "SC, ST, OBC and minority community students with family income below the state threshold",
            "Need-based",
            HighSchool,
            Low,
            None,
        ),
    ]
}
