pub mod app;
pub mod command;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod err;
pub mod gateway;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod student;
pub mod terminal;
pub mod validation;

pub use crate::err::Error;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::models::{StudentId, StudentPayload};
    use crate::student::Student;

    pub fn payload(id: &str, surname: &str, faculty: &str, study_start: i32) -> StudentPayload {
        StudentPayload {
            id: StudentId::new(id),
            name: "Иван".to_string(),
            surname: surname.to_string(),
            lastname: "Петрович".to_string(),
            study_start,
            birthday: NaiveDate::from_ymd_opt(2000, 5, 15).unwrap(),
            faculty: faculty.to_string(),
        }
    }

    pub fn student(id: &str, surname: &str, faculty: &str, study_start: i32) -> Student {
        payload(id, surname, faculty, study_start).into()
    }
}
