use chrono::{Datelike, NaiveDate};

use crate::models::{StudentId, StudentPayload};

/// Month (1-based) the academic year starts in.
const ACADEMIC_YEAR_START: u32 = 9;
const STUDY_YEARS: i32 = 4;

/// A persisted student together with the values the table shows for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub surname: String,
    pub lastname: String,
    pub study_start: i32,
    pub birthday: NaiveDate,
    pub faculty: String,
}

impl From<StudentPayload> for Student {
    fn from(payload: StudentPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            surname: payload.surname,
            lastname: payload.lastname,
            study_start: payload.study_start,
            birthday: payload.birthday,
            faculty: payload.faculty,
        }
    }
}

impl Student {
    pub fn fio(&self) -> String {
        format!("{} {} {}", self.surname, self.name, self.lastname)
    }

    pub fn study_end(&self) -> i32 {
        self.study_start.saturating_add(STUDY_YEARS)
    }

    pub fn birthday_string(&self) -> String {
        self.birthday.format("%d.%m.%Y").to_string()
    }

    /// Full years lived as of `today`.
    pub fn age(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.birthday.year();
        if (today.month(), today.day()) < (self.birthday.month(), self.birthday.day()) {
            age -= 1;
        }
        age
    }

    pub fn age_label(&self, today: NaiveDate) -> String {
        age_label(self.age(today))
    }

    pub fn study_status(&self, today: NaiveDate) -> StudyStatus {
        let start = self.study_start;
        let end = self.study_end();
        let year = today.year();
        let started_year = today.month() >= ACADEMIC_YEAR_START;

        if year < start || (year == start && !started_year) {
            StudyStatus::NotStarted
        } else if year > end || (year == end && started_year) {
            StudyStatus::Finished
        } else {
            let course = year - start + i32::from(started_year);
            StudyStatus::Course(course as u32)
        }
    }

    pub fn study_period(&self, today: NaiveDate) -> String {
        format!(
            "{} - {} ({})",
            self.study_start,
            self.study_end(),
            self.study_status(today).label()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyStatus {
    NotStarted,
    Course(u32),
    Finished,
}

impl StudyStatus {
    pub fn label(&self) -> String {
        match self {
            StudyStatus::NotStarted => "еще не начал учебу".to_string(),
            StudyStatus::Course(n) => format!("{} курс", n),
            StudyStatus::Finished => "закончил".to_string(),
        }
    }
}

/// `1 год`, `2 года`, `5 лет`, `11 лет`, `21 год`...
pub fn age_label(age: i32) -> String {
    let last_digit = age.rem_euclid(10);
    let last_two = age.rem_euclid(100);

    let word = if (11..=19).contains(&last_two) {
        "лет"
    } else if last_digit == 1 {
        "год"
    } else if (2..=4).contains(&last_digit) {
        "года"
    } else {
        "лет"
    };
    format!("{} {}", age, word)
}
