use crate::model::{AnalyzeError, Field, Observation};
use crate::utils::observed_number;
use serde::Serialize;

/// A location paired with one numeric value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub location: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakDay {
    pub location: String,
    pub date: String,
    pub new_cases: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerMillionExtremes {
    pub highest: Option<Ranked>,
    pub lowest_non_zero: Option<Ranked>,
    pub lowest_including_zero: Option<Ranked>,
    pub zero_locations: Vec<String>,
}

pub struct CaseIndicators;

impl CaseIndicators {
    /// Converts `field` of each observation to a number. Non-finite values are left out.
    pub fn ranked(observations: &[Observation], field: Field) -> Result<Vec<Ranked>, AnalyzeError> {
        let mut ranked = Vec::with_capacity(observations.len());
        for o in observations {
            if let Some(value) = observed_number(o, field)? {
                ranked.push(Ranked {
                    location: o.location.clone(),
                    value,
                });
            }
        }
        Ok(ranked)
    }

    /// Sum of the given values, `None` when there is nothing to add up.
    pub fn total(values: &[Ranked]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().map(|r| r.value).sum())
    }

    /// First entry holding the maximum value.
    pub fn highest(values: &[Ranked]) -> Option<Ranked> {
        values
            .iter()
            .fold(None::<&Ranked>, |best, r| match best {
                Some(b) if r.value.total_cmp(&b.value).is_le() => Some(b),
                _ => Some(r),
            })
            .cloned()
    }

    /// Stable descending sort, then extremes are read off either end.
    pub fn per_million_extremes(mut values: Vec<Ranked>) -> PerMillionExtremes {
        values.sort_by(|a, b| b.value.total_cmp(&a.value));

        PerMillionExtremes {
            highest: values.first().cloned(),
            lowest_non_zero: values.iter().rev().find(|r| r.value > 0.0).cloned(),
            lowest_including_zero: values.last().cloned(),
            zero_locations: values
                .iter()
                .filter(|r| r.value == 0.0)
                .map(|r| r.location.clone())
                .collect(),
        }
    }

    /// The single row with the largest daily `new_cases`. Earlier rows win ties.
    pub fn peak_day(observations: &[Observation]) -> Result<Option<PeakDay>, AnalyzeError> {
        let mut peak: Option<PeakDay> = None;
        for o in observations {
            let Some(new_cases) = observed_number(o, Field::NewCases)? else {
                continue;
            };
            if peak.as_ref().is_none_or(|p| new_cases.total_cmp(&p.new_cases).is_gt()) {
                peak = Some(PeakDay {
                    location: o.location.clone(),
                    date: o.date.clone().unwrap_or_default(),
                    new_cases,
                });
            }
        }
        Ok(peak)
    }

    /// Smokers in a population assuming an even split between men and women.
    pub fn estimated_smokers(population: f64, male_pct: f64, female_pct: f64) -> f64 {
        let half = population / 2.0;
        half * (male_pct / 100.0) + half * (female_pct / 100.0)
    }

    /// Expects observations carrying population and both smoker percentages.
    pub fn smoker_estimates(observations: &[Observation]) -> Result<Vec<Ranked>, AnalyzeError> {
        let mut estimates = Vec::with_capacity(observations.len());
        for o in observations {
            let population = observed_number(o, Field::Population)?;
            let male = observed_number(o, Field::MaleSmokers)?;
            let female = observed_number(o, Field::FemaleSmokers)?;
            if let (Some(population), Some(male), Some(female)) = (population, male, female) {
                estimates.push(Ranked {
                    location: o.location.clone(),
                    value: Self::estimated_smokers(population, male, female),
                });
            }
        }
        Ok(estimates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(location: &str, value: f64) -> Ranked {
        Ranked { location: location.into(), value }
    }

    fn obs(location: &str, date: &str, values: &[(Field, &str)]) -> Observation {
        Observation {
            location: location.into(),
            date: Some(date.into()),
            values: values.iter().map(|(f, v)| (*f, v.to_string())).collect(),
        }
    }

    fn cases(location: &str, date: &str, new_cases: &str) -> Observation {
        obs(location, date, &[(Field::NewCases, new_cases)])
    }

    #[test]
    fn total_of_nothing_is_none() {
        assert_eq!(CaseIndicators::total(&[]), None);
        assert_eq!(CaseIndicators::total(&[ranked("A", 1.5), ranked("B", 2.0)]), Some(3.5));
    }

    #[test]
    fn per_million_extremes_cover_zero_and_non_zero() {
        let extremes = CaseIndicators::per_million_extremes(vec![
            ranked("A", 0.0),
            ranked("B", 5.5),
            ranked("C", 3.2),
        ]);
        assert_eq!(extremes.highest, Some(ranked("B", 5.5)));
        assert_eq!(extremes.lowest_non_zero, Some(ranked("C", 3.2)));
        assert_eq!(extremes.lowest_including_zero, Some(ranked("A", 0.0)));
        assert_eq!(extremes.zero_locations, vec!["A".to_string()]);
    }

    #[test]
    fn all_zero_has_no_non_zero_minimum() {
        let extremes = CaseIndicators::per_million_extremes(vec![ranked("A", 0.0), ranked("B", 0.0)]);
        assert_eq!(extremes.lowest_non_zero, None);
        assert_eq!(extremes.zero_locations, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn empty_extremes_are_all_absent() {
        assert_eq!(CaseIndicators::per_million_extremes(Vec::new()), PerMillionExtremes::default());
    }

    #[test]
    fn highest_keeps_the_first_of_equal_values() {
        let best = CaseIndicators::highest(&[ranked("A", 2.0), ranked("B", 9.0), ranked("C", 9.0)]);
        assert_eq!(best, Some(ranked("B", 9.0)));
        assert_eq!(CaseIndicators::highest(&[]), None);
    }

    #[test]
    fn peak_day_finds_the_largest_row() {
        let peak = CaseIndicators::peak_day(&[
            cases("X", "2021-01-01", "100"),
            cases("Y", "2021-01-02", "500"),
        ])
        .unwrap()
        .unwrap();
        assert_eq!(peak.location, "Y");
        assert_eq!(peak.date, "2021-01-02");
        assert_eq!(peak.new_cases, 500.0);
    }

    #[test]
    fn peak_day_propagates_bad_numbers() {
        let err = CaseIndicators::peak_day(&[cases("X", "2021-01-01", "lots")]).unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidNumber { field: "new_cases", .. }));
    }

    #[test]
    fn nan_never_wins_the_peak() {
        let peak = CaseIndicators::peak_day(&[
            cases("X", "2021-01-01", "500"),
            cases("Y", "2021-01-02", "NaN"),
            cases("Z", "2021-01-03", "inf"),
        ])
        .unwrap()
        .unwrap();
        assert_eq!(peak.location, "X");
        assert_eq!(peak.new_cases, 500.0);
    }

    #[test]
    fn nan_is_left_out_of_per_million_ranking() {
        let values = CaseIndicators::ranked(
            &[
                obs("X", "2021-01-01", &[(Field::TotalCasesPerMillion, "5")]),
                obs("Y", "2021-01-01", &[(Field::TotalCasesPerMillion, "NaN")]),
            ],
            Field::TotalCasesPerMillion,
        )
        .unwrap();
        let extremes = CaseIndicators::per_million_extremes(values);
        assert_eq!(extremes.highest, Some(ranked("X", 5.0)));
        assert_eq!(extremes.lowest_including_zero, Some(ranked("X", 5.0)));
    }

    #[test]
    fn mismatched_selection_is_an_error_not_a_panic() {
        let err = CaseIndicators::smoker_estimates(&[cases("X", "2021-01-01", "5")]).unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingField { .. }));
    }

    #[test]
    fn estimated_smokers_assumes_even_split() {
        assert_eq!(CaseIndicators::estimated_smokers(1_000_000.0, 50.0, 20.0), 350_000.0);
    }

    #[test]
    fn smoker_estimates_read_three_values() {
        let row = obs(
            "Z",
            "2021-01-01",
            &[(Field::Population, "1000000"), (Field::MaleSmokers, "50"), (Field::FemaleSmokers, "20")],
        );
        let estimates = CaseIndicators::smoker_estimates(&[row]).unwrap();
        assert_eq!(estimates, vec![ranked("Z", 350_000.0)]);
    }
}
