use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::student::Student;

/// Fields a substring filter can look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Fio,
    Faculty,
    StudyStart,
}

impl FilterField {
    fn text_of(&self, student: &Student) -> String {
        match self {
            FilterField::Fio => student.fio(),
            FilterField::Faculty => student.faculty.clone(),
            FilterField::StudyStart => student.study_start.to_string(),
        }
    }
}

/// Table columns, keyed by the same names the headers carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Fio,
    Birthday,
    StudyStart,
    Faculty,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Fio,
        SortColumn::Birthday,
        SortColumn::StudyStart,
        SortColumn::Faculty,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SortColumn::Fio => "fio",
            SortColumn::Birthday => "birthday",
            SortColumn::StudyStart => "studyStart",
            SortColumn::Faculty => "faculty",
        }
    }

    fn compare(&self, a: &Student, b: &Student) -> Ordering {
        match self {
            SortColumn::Fio => a.fio().cmp(&b.fio()),
            SortColumn::Birthday => a.birthday.cmp(&b.birthday),
            SortColumn::StudyStart => a.study_start.cmp(&b.study_start),
            SortColumn::Faculty => a.faculty.cmp(&b.faculty),
        }
    }
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortColumn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("unknown column `{}`", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub ascending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            column: SortColumn::Fio,
            ascending: true,
        }
    }
}

pub fn filter(records: &[Student], field: FilterField, substring: &str) -> Vec<Student> {
    let needle = substring.trim().to_lowercase();
    records
        .iter()
        .filter(|student| field.text_of(student).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn filter_by_study_end(records: &[Student], end_year: i32) -> Vec<Student> {
    records
        .iter()
        .filter(|student| student.study_end() == end_year)
        .cloned()
        .collect()
}

/// Stable: records with equal keys keep their relative order.
pub fn sort(records: &[Student], order: SortOrder) -> Vec<Student> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = order.column.compare(a, b);
        if order.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    sorted
}

/// Raw contents of the filter form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInputs {
    pub fio: String,
    pub faculty: String,
    pub study_start: String,
    pub study_end: String,
    pub search: String,
}

impl FilterInputs {
    pub fn all_empty(&self) -> bool {
        [
            &self.fio,
            &self.faculty,
            &self.study_start,
            &self.study_end,
            &self.search,
        ]
        .iter()
        .all(|value| value.trim().is_empty())
    }

    /// The server-side part: only `search`, and only when set.
    pub fn server_filters(&self) -> Vec<(String, String)> {
        let search = self.search.trim();
        if search.is_empty() {
            Vec::new()
        } else {
            vec![("search".to_string(), search.to_string())]
        }
    }

    // Year inputs count only once a whole year is typed.
    fn year(raw: &str) -> Option<&str> {
        let raw = raw.trim();
        (raw.chars().count() == 4).then_some(raw)
    }
}

/// Result of running the client filters over a fresh listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered {
    pub records: Vec<Student>,
    pub sort: SortOrder,
    pub manual_sort: bool,
}

/// Applies the client filters in their fixed order. Each active filter,
/// unless the user picked a sort column, moves the sort onto its own field.
/// Emptying every input drops the user's pick and falls back to fio.
pub fn apply_filters(
    records: Vec<Student>,
    inputs: &FilterInputs,
    sort: SortOrder,
    manual_sort: bool,
) -> Filtered {
    let manual_sort = manual_sort && !inputs.all_empty();
    let mut sort = if manual_sort { sort } else { SortOrder::default() };
    let mut records = records;
    let mut follow = |column: SortColumn| {
        if !manual_sort {
            sort = SortOrder {
                column,
                ascending: true,
            };
        }
    };

    if !inputs.fio.trim().is_empty() {
        records = filter(&records, FilterField::Fio, &inputs.fio);
        follow(SortColumn::Fio);
    }
    if !inputs.faculty.trim().is_empty() {
        records = filter(&records, FilterField::Faculty, &inputs.faculty);
        follow(SortColumn::Faculty);
    }
    if let Some(start) = FilterInputs::year(&inputs.study_start) {
        records = filter(&records, FilterField::StudyStart, start);
        follow(SortColumn::StudyStart);
    }
    if let Some(end) = FilterInputs::year(&inputs.study_end) {
        // A non-numeric end year matches nothing.
        records = match end.parse() {
            Ok(end) => filter_by_study_end(&records, end),
            Err(_) => Vec::new(),
        };
        follow(SortColumn::StudyStart);
    }

    Filtered {
        records,
        sort,
        manual_sort,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::student;

    fn sample() -> Vec<Student> {
        vec![
            student("1", "Петров", "Физический", 2019),
            student("2", "Иванов", "Химический", 2021),
            student("3", "Сидоров", "Физический", 2021),
            student("4", "Иванова", "Исторический", 2023),
        ]
    }

    fn ids(records: &[Student]) -> Vec<&str> {
        records.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn filter_is_case_insensitive_and_trims() {
        let found = filter(&sample(), FilterField::Fio, "  иВАНОВ ");
        assert_eq!(ids(&found), ["2", "4"]);
        let found = filter(&sample(), FilterField::StudyStart, "202");
        assert_eq!(ids(&found), ["2", "3", "4"]);
    }

    #[test]
    fn filter_is_idempotent() {
        for needle in ["ов", "физ", "2021", "а", "нет такого"] {
            let once = filter(&sample(), FilterField::Fio, needle);
            let twice = filter(&once, FilterField::Fio, needle);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn study_end_is_exact() {
        assert_eq!(ids(&filter_by_study_end(&sample(), 2025)), ["2", "3"]);
        assert!(filter_by_study_end(&sample(), 202).is_empty());
    }

    #[test]
    fn double_toggle_restores_order() {
        let records = sample();
        for column in [SortColumn::Fio, SortColumn::Faculty, SortColumn::StudyStart] {
            let asc = SortOrder { column, ascending: true };
            let desc = SortOrder { column, ascending: false };
            let first = sort(&records, asc);
            let toggled = sort(&sort(&first, desc), asc);
            assert_eq!(ids(&first), ids(&toggled), "{}", column);
        }
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let sorted = sort(
            &sample(),
            SortOrder {
                column: SortColumn::Faculty,
                ascending: true,
            },
        );
        assert_eq!(ids(&sorted), ["4", "1", "3", "2"]);
        let sorted = sort(
            &sample(),
            SortOrder {
                column: SortColumn::StudyStart,
                ascending: false,
            },
        );
        assert_eq!(ids(&sorted), ["4", "2", "3", "1"]);
    }

    #[test]
    fn filters_move_sort_unless_manual() {
        let inputs = FilterInputs {
            faculty: "физ".to_string(),
            ..Default::default()
        };
        let picked = SortOrder {
            column: SortColumn::Birthday,
            ascending: false,
        };

        let auto = apply_filters(sample(), &inputs, picked, false);
        assert_eq!(ids(&auto.records), ["1", "3"]);
        assert_eq!(auto.sort.column, SortColumn::Faculty);

        let manual = apply_filters(sample(), &inputs, picked, true);
        assert_eq!(manual.sort, picked);
        assert!(manual.manual_sort);
    }

    #[test]
    fn partial_years_are_ignored() {
        let mut inputs = FilterInputs {
            study_start: "20".to_string(),
            ..Default::default()
        };
        let out = apply_filters(sample(), &inputs, SortOrder::default(), false);
        assert_eq!(out.records.len(), 4);
        assert_eq!(out.sort, SortOrder::default());

        inputs.study_end = "2025".to_string();
        let out = apply_filters(sample(), &inputs, SortOrder::default(), false);
        assert_eq!(ids(&out.records), ["2", "3"]);
        assert_eq!(out.sort.column, SortColumn::StudyStart);
    }

    #[test]
    fn empty_inputs_clear_manual_sort() {
        let inputs = FilterInputs {
            fio: "  ".to_string(),
            ..Default::default()
        };
        let picked = SortOrder {
            column: SortColumn::Faculty,
            ascending: false,
        };
        let out = apply_filters(sample(), &inputs, picked, true);
        assert!(!out.manual_sort);
        assert_eq!(out.sort, SortOrder::default());

        let again = apply_filters(sample(), &inputs, out.sort, out.manual_sort);
        assert_eq!(again, out);
    }

    #[test]
    fn only_search_goes_to_server() {
        let inputs = FilterInputs {
            fio: "Иванов".to_string(),
            search: " физ ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            inputs.server_filters(),
            vec![("search".to_string(), "физ".to_string())]
        );
        assert!(FilterInputs::default().server_filters().is_empty());
    }

    #[test]
    fn parses_header_keys() {
        assert_eq!("studyStart".parse::<SortColumn>().unwrap(), SortColumn::StudyStart);
        assert_eq!("FIO".parse::<SortColumn>().unwrap(), SortColumn::Fio);
        assert!("age".parse::<SortColumn>().is_err());
    }
}
