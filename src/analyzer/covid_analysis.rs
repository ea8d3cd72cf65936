use crate::analyzer::indicators::{CaseIndicators, PeakDay, PerMillionExtremes, Ranked};
use crate::analyzer::latest::latest_per_location;
use crate::model::{AnalyzeError, Field};
use crate::storage::SqliteStorage;
use serde::Serialize;
use tracing::{debug, info};

/// Trait defining the interface for the report analyzer.
pub trait Analyzer {
    fn analyze(&self, storage: &SqliteStorage) -> Result<AnalysisResult, AnalyzeError>;
}

/// Runs the six report queries one after another. Each is independent of the others.
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }

    /// Latest numeric value of `field` for every non-excluded location.
    fn latest_values(&self, storage: &SqliteStorage, field: Field) -> Result<Vec<Ranked>, AnalyzeError> {
        let latest = latest_per_location(storage.observations(&[field])?);
        CaseIndicators::ranked(&latest, field)
    }

    pub fn record_count(&self, storage: &SqliteStorage) -> Result<u64, AnalyzeError> {
        Ok(storage.count_records()?)
    }

    pub fn cumulative_cases(&self, storage: &SqliteStorage) -> Result<Option<f64>, AnalyzeError> {
        let latest = self.latest_values(storage, Field::TotalCases)?;
        Ok(CaseIndicators::total(&latest))
    }

    /// A NULL location counts as one more distinct location; NULL continents are not counted.
    pub fn cardinality(&self, storage: &SqliteStorage) -> Result<Cardinality, AnalyzeError> {
        let null_location = usize::from(storage.has_null(Field::Location)?);
        Ok(Cardinality {
            locations: storage.distinct_values(Field::Location)?.len() + null_location,
            continents: storage.distinct_values(Field::Continent)?.len(),
        })
    }

    pub fn per_million(&self, storage: &SqliteStorage) -> Result<PerMillionExtremes, AnalyzeError> {
        let latest = self.latest_values(storage, Field::TotalCasesPerMillion)?;
        Ok(CaseIndicators::per_million_extremes(latest))
    }

    pub fn peak_new_cases(&self, storage: &SqliteStorage) -> Result<Option<PeakDay>, AnalyzeError> {
        CaseIndicators::peak_day(&storage.observations(&[Field::NewCases])?)
    }

    pub fn smoking(&self, storage: &SqliteStorage) -> Result<SmokingStats, AnalyzeError> {
        let highest_male = CaseIndicators::highest(&self.latest_values(storage, Field::MaleSmokers)?);
        let highest_female = CaseIndicators::highest(&self.latest_values(storage, Field::FemaleSmokers)?);

        let complete = latest_per_location(storage.observations(&[
            Field::Population,
            Field::MaleSmokers,
            Field::FemaleSmokers,
        ])?);
        let most_smokers = CaseIndicators::highest(&CaseIndicators::smoker_estimates(&complete)?);
        if let Some(entry) = &most_smokers {
            debug!(
                "Estimated smokers leader: {}",
                serde_json::to_string(entry).unwrap_or_default()
            );
        }

        Ok(SmokingStats {
            highest_male,
            highest_female,
            most_smokers,
        })
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze(&self, storage: &SqliteStorage) -> Result<AnalysisResult, AnalyzeError> {
        info!("Counting records...");
        let record_count = self.record_count(storage)?;
        info!("Summing latest cumulative cases...");
        let cumulative_cases = self.cumulative_cases(storage)?;
        info!("Counting locations and continents...");
        let cardinality = self.cardinality(storage)?;
        info!("Ranking cases per million...");
        let per_million = self.per_million(storage)?;
        info!("Searching peak day...");
        let peak_new_cases = self.peak_new_cases(storage)?;
        info!("Computing smoking stats...");
        let smoking = self.smoking(storage)?;

        Ok(AnalysisResult {
            record_count,
            cumulative_cases,
            cardinality,
            per_million,
            peak_new_cases,
            smoking,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cardinality {
    pub locations: usize,
    pub continents: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmokingStats {
    /// Highest latest male smoker percentage.
    pub highest_male: Option<Ranked>,
    /// Highest latest female smoker percentage.
    pub highest_female: Option<Ranked>,
    /// Highest estimated absolute number of smokers.
    pub most_smokers: Option<Ranked>,
}

/// Structure representing the whole report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub record_count: u64,
    /// `None` when no location has a cumulative total.
    pub cumulative_cases: Option<f64>,
    pub cardinality: Cardinality,
    pub per_million: PerMillionExtremes,
    pub peak_new_cases: Option<PeakDay>,
    pub smoking: SmokingStats,
}
