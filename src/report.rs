// Text report: rendered once, then written to stdout and the report file line for line.
use crate::analyzer::AnalysisResult;
use crate::analyzer::indicators::Ranked;
use crate::utils::{format_decimal, format_rounded};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const NOT_AVAILABLE: &str = "N/A";

pub fn render(result: &AnalysisResult) -> Vec<String> {
    let mut lines = Vec::new();

    section(&mut lines, "1. Total records in collection:");
    lines.push(result.record_count.to_string());

    section(&mut lines, "2. Total cumulative COVID-19 cases (latest available per country):");
    lines.push(
        result
            .cumulative_cases
            .map(format_rounded)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );

    section(&mut lines, "3. Countries and continents in dataset:");
    lines.push(format!("Countries: {}", result.cardinality.locations));
    lines.push(format!("Continents: {}", result.cardinality.continents));

    section(
        &mut lines,
        "4. Country with highest and lowest total COVID-19 cases per million (latest data only):",
    );
    let pm = &result.per_million;
    lines.push(format!("Highest: {}", rounded_entry(pm.highest.as_ref())));
    lines.push(format!("Lowest (non-zero): {}", rounded_entry(pm.lowest_non_zero.as_ref())));
    lines.push(format!(
        "Lowest (including zero): {}",
        rounded_entry(pm.lowest_including_zero.as_ref())
    ));
    section(&mut lines, "Countries with total_cases_per_million = 0:");
    for location in &pm.zero_locations {
        lines.push(format!("- {}", location));
    }

    section(&mut lines, "5. Day with highest number of new cases:");
    lines.push(match &result.peak_new_cases {
        Some(peak) => format!(
            "{} on {} with {} cases",
            peak.location,
            peak.date,
            format_rounded(peak.new_cases)
        ),
        None => NOT_AVAILABLE.to_string(),
    });

    section(&mut lines, "6. Smoking stats (latest available):");
    let smoking = &result.smoking;
    lines.push(format!(
        "Highest % of male smokers: {}",
        percent_entry(smoking.highest_male.as_ref())
    ));
    lines.push(format!(
        "Highest % of female smokers: {}",
        percent_entry(smoking.highest_female.as_ref())
    ));
    lines.push(format!(
        "Estimated country with highest number of smokers (assuming 50/50 gender split): {}",
        match &smoking.most_smokers {
            Some(r) => format!("{} – {} smokers", r.location, format_rounded(r.value)),
            None => NOT_AVAILABLE.to_string(),
        }
    ));

    lines
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
}

fn rounded_entry(entry: Option<&Ranked>) -> String {
    match entry {
        Some(r) => format!("{} ({})", r.location, format_rounded(r.value)),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn percent_entry(entry: Option<&Ranked>) -> String {
    match entry {
        Some(r) => format!("{} – {}%", r.location, format_decimal(r.value)),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn write_lines<W: Write>(lines: &[String], out: &mut W) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

/// Prints the report and overwrites `path` with the same lines.
pub fn publish(lines: &[String], path: &Path) -> io::Result<()> {
    write_lines(lines, &mut io::stdout().lock())?;
    let mut file = BufWriter::new(File::create(path)?);
    write_lines(lines, &mut file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::covid_analysis::{Cardinality, SmokingStats};
    use crate::analyzer::indicators::{PeakDay, PerMillionExtremes};

    fn ranked(location: &str, value: f64) -> Option<Ranked> {
        Some(Ranked { location: location.into(), value })
    }

    fn sample() -> AnalysisResult {
        AnalysisResult {
            record_count: 7,
            cumulative_cases: Some(350.7),
            cardinality: Cardinality { locations: 4, continents: 2 },
            per_million: PerMillionExtremes {
                highest: ranked("B", 5.5),
                lowest_non_zero: ranked("C", 3.2),
                lowest_including_zero: ranked("A", 0.0),
                zero_locations: vec!["A".into()],
            },
            peak_new_cases: Some(PeakDay {
                location: "Y".into(),
                date: "2021-01-02".into(),
                new_cases: 500.0,
            }),
            smoking: SmokingStats {
                highest_male: ranked("Q", 76.1),
                highest_female: ranked("Z", 20.0),
                most_smokers: ranked("Z", 350_000.0),
            },
        }
    }

    #[test]
    fn renders_every_section() {
        let lines = render(&sample());
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "1. Total records in collection:");
        assert_eq!(lines[2], "7");
        assert!(lines.contains(&"351".to_string()));
        assert!(lines.contains(&"Countries: 4".to_string()));
        assert!(lines.contains(&"Highest: B (6)".to_string()));
        assert!(lines.contains(&"Lowest (non-zero): C (3)".to_string()));
        assert!(lines.contains(&"Lowest (including zero): A (0)".to_string()));
        assert!(lines.contains(&"- A".to_string()));
        assert!(lines.contains(&"Y on 2021-01-02 with 500 cases".to_string()));
        assert!(lines.contains(&"Highest % of male smokers: Q – 76.1%".to_string()));
        assert!(lines.contains(&"Highest % of female smokers: Z – 20.0%".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Estimated country with highest number of smokers (assuming 50/50 gender split): Z – 350000 smokers"
        );
    }

    #[test]
    fn missing_values_render_as_not_available() {
        let mut result = sample();
        result.cumulative_cases = None;
        result.per_million = PerMillionExtremes::default();
        result.peak_new_cases = None;
        let lines = render(&result);
        assert_eq!(lines[5], "N/A");
        assert!(lines.contains(&"Lowest (non-zero): N/A".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("- ")));
        assert_eq!(lines.iter().filter(|l| l.as_str() == "N/A").count(), 2);
    }

    #[test]
    fn publish_overwrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        std::fs::write(&path, "stale content that is longer than the report\n".repeat(50)).unwrap();

        let lines = vec!["".to_string(), "1. Total records in collection:".to_string(), "0".to_string()];
        publish(&lines, &path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "\n1. Total records in collection:\n0\n"
        );
    }
}
