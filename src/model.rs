// Core structs: Record, Observation, Field, stage errors
use serde::Deserialize;
use thiserror::Error;

/// Aggregate regions that are not countries. Kept out of every per-country statistic.
pub const EXCLUDED_LOCATIONS: [&str; 13] = [
    "World",
    "Africa",
    "Asia",
    "Europe",
    "European Union",
    "High-income countries",
    "International",
    "Low-income countries",
    "Lower-middle-income countries",
    "North America",
    "Oceania",
    "South America",
    "Upper-middle-income countries",
];

/// One row of the dataset, projected to the kept columns.
/// Every value stays text until the analyzer converts it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Record {
    pub location: Option<String>,
    pub continent: Option<String>,
    pub date: Option<String>,
    pub new_cases: Option<String>,
    pub total_cases: Option<String>,
    pub total_cases_per_million: Option<String>,
    pub female_smokers: Option<String>,
    pub male_smokers: Option<String>,
    pub population: Option<String>,
}

impl Record {
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Location => self.location.as_deref(),
            Field::Continent => self.continent.as_deref(),
            Field::Date => self.date.as_deref(),
            Field::NewCases => self.new_cases.as_deref(),
            Field::TotalCases => self.total_cases.as_deref(),
            Field::TotalCasesPerMillion => self.total_cases_per_million.as_deref(),
            Field::FemaleSmokers => self.female_smokers.as_deref(),
            Field::MaleSmokers => self.male_smokers.as_deref(),
            Field::Population => self.population.as_deref(),
        }
    }

    pub fn values_mut(&mut self) -> [&mut Option<String>; 9] {
        [
            &mut self.location,
            &mut self.continent,
            &mut self.date,
            &mut self.new_cases,
            &mut self.total_cases,
            &mut self.total_cases_per_million,
            &mut self.female_smokers,
            &mut self.male_smokers,
            &mut self.population,
        ]
    }
}

/// A stored row reduced to its location, date and the requested values,
/// all of which were non-blank in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub location: String,
    pub date: Option<String>,
    pub values: Vec<(Field, String)>,
}

impl Observation {
    pub fn value(&self, field: Field) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }
}

/// Kept columns. Doubles as the whitelist of identifiers allowed into SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Location,
    Continent,
    Date,
    NewCases,
    TotalCases,
    TotalCasesPerMillion,
    FemaleSmokers,
    MaleSmokers,
    Population,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Location,
        Field::Continent,
        Field::Date,
        Field::NewCases,
        Field::TotalCases,
        Field::TotalCasesPerMillion,
        Field::FemaleSmokers,
        Field::MaleSmokers,
        Field::Population,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Field::Location => "location",
            Field::Continent => "continent",
            Field::Date => "date",
            Field::NewCases => "new_cases",
            Field::TotalCases => "total_cases",
            Field::TotalCasesPerMillion => "total_cases_per_million",
            Field::FemaleSmokers => "female_smokers",
            Field::MaleSmokers => "male_smokers",
            Field::Population => "population",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    InvalidResponse { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("cannot convert {field} = {value:?} for {location} to a number")]
    InvalidNumber {
        field: &'static str,
        location: String,
        value: String,
    },
    #[error("{field} was not selected for {location}")]
    MissingField {
        field: &'static str,
        location: String,
    },
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error: any of these aborts the run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParserError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}
