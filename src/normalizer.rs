use crate::model::Record;

pub fn normalize_all(records: &mut [Record]) {
    for record in records.iter_mut() {
        normalize_record(record);
    }
}

/// Blank values become `None`. Anything else is kept verbatim, surrounding whitespace included.
fn normalize_record(record: &mut Record) {
    for value in record.values_mut() {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            *value = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_cleared() {
        let mut records = vec![Record {
            location: Some("Peru".into()),
            continent: Some("   ".into()),
            total_cases: Some("".into()),
            population: Some(" 33000000".into()),
            ..Default::default()
        }];
        normalize_all(&mut records);
        let r = &records[0];
        assert_eq!(r.location.as_deref(), Some("Peru"));
        assert_eq!(r.continent, None);
        assert_eq!(r.total_cases, None);
        assert_eq!(r.population.as_deref(), Some(" 33000000"));
    }

    #[test]
    fn all_blank_record_becomes_all_none() {
        let blank = || Some(String::new());
        let mut records = vec![Record {
            location: blank(),
            continent: blank(),
            date: blank(),
            new_cases: blank(),
            total_cases: blank(),
            total_cases_per_million: blank(),
            female_smokers: blank(),
            male_smokers: blank(),
            population: blank(),
        }];
        normalize_all(&mut records);
        assert_eq!(records[0], Record::default());
    }
}
