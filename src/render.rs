use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;

use crate::controller::{FormField, FormMode, UiState};
use crate::models::StudentId;
use crate::pipeline::{sort, SortColumn};
use crate::validation::FieldStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub column: SortColumn,
    pub label: &'static str,
    /// `Some(ascending)` on the active column.
    pub sort: Option<bool>,
}

/// One table row. Actions name `id`; they are resolved against the state at
/// dispatch time, never against this snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: StudentId,
    pub fio: String,
    pub birthday: String,
    pub study: String,
    pub faculty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<Header>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: FormField,
    pub value: String,
    pub status: FieldStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub submit_label: &'static str,
    pub can_cancel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub form: FormView,
    pub table: Table,
}

fn header_label(column: SortColumn) -> &'static str {
    match column {
        SortColumn::Fio => "ФИО",
        SortColumn::Birthday => "Дата рождения и возраст",
        SortColumn::StudyStart => "Годы обучения",
        SortColumn::Faculty => "Факультет",
    }
}

pub fn table(state: &UiState, today: NaiveDate) -> Table {
    let headers = SortColumn::ALL
        .into_iter()
        .map(|column| Header {
            column,
            label: header_label(column),
            sort: (column == state.sort.column).then_some(state.sort.ascending),
        })
        .collect();

    let rows = sort(&state.students, state.sort)
        .into_iter()
        .map(|student| Row {
            fio: student.fio(),
            birthday: format!("{} ({})", student.birthday_string(), student.age_label(today)),
            study: student.study_period(today),
            faculty: student.faculty.clone(),
            id: student.id,
        })
        .collect();

    Table { headers, rows }
}

pub fn form(state: &UiState) -> FormView {
    let editing = matches!(state.mode, FormMode::Edit(_));
    FormView {
        fields: FormField::ALL
            .into_iter()
            .map(|field| FieldView {
                field,
                value: state.form.value(field).to_string(),
                status: state.form.status(field).clone(),
            })
            .collect(),
        submit_label: if editing {
            "Сохранить изменения"
        } else {
            "Добавить студента"
        },
        can_cancel: editing,
    }
}

pub fn screen(state: &UiState, today: NaiveDate) -> Screen {
    Screen {
        form: form(state),
        table: table(state, today),
    }
}

fn pad(f: &mut Formatter<'_>, text: &str, width: usize) -> fmt::Result {
    let len = text.chars().count();
    write!(f, "{}{}", text, " ".repeat(width.saturating_sub(len)))
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let titles: Vec<String> = std::iter::once("id".to_string())
            .chain(self.headers.iter().map(|header| match header.sort {
                Some(true) => format!("{} ▲", header.label),
                Some(false) => format!("{} ▼", header.label),
                None => header.label.to_string(),
            }))
            .collect();
        let cells: Vec<[&str; 5]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.id.as_str(),
                    row.fio.as_str(),
                    row.birthday.as_str(),
                    row.study.as_str(),
                    row.faculty.as_str(),
                ]
            })
            .collect();

        let mut widths: Vec<usize> = titles.iter().map(|t| t.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        for (title, width) in titles.iter().zip(&widths) {
            pad(f, title, *width)?;
            f.write_str(" | ")?;
        }
        writeln!(f)?;
        for row in &cells {
            for (cell, width) in row.iter().zip(&widths) {
                pad(f, cell, *width)?;
                f.write_str(" | ")?;
            }
            writeln!(f)?;
        }
        if cells.is_empty() {
            writeln!(f, "(нет студентов)")?;
        }
        Ok(())
    }
}

impl Display for FormView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            write!(f, "{:>20}: {}", field.field.label(), field.value)?;
            match &field.status {
                FieldStatus::Untouched => writeln!(f)?,
                FieldStatus::Valid => writeln!(f, "  ✓")?,
                FieldStatus::Invalid(reason) => writeln!(f, "  ✗ {}", reason)?,
            }
        }
        write!(f, "[{}]", self.submit_label)?;
        if self.can_cancel {
            write!(f, " [Отменить]")?;
        }
        writeln!(f)
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.form)?;
        writeln!(f)?;
        write!(f, "{}", self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::student;
    use crate::pipeline::SortOrder;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn state() -> UiState {
        UiState {
            students: vec![
                student("1", "Петров", "Физический", 2019),
                student("2", "Иванов", "Химический", 2021),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn rows_follow_sort_and_show_derived_cells() {
        let table = table(&state(), today());
        assert_eq!(table.rows[0].id, StudentId::new("2"));
        assert_eq!(table.rows[0].fio, "Иванов Иван Петрович");
        assert_eq!(table.rows[0].birthday, "15.05.2000 (24 года)");
        assert_eq!(table.rows[0].study, "2021 - 2025 (3 курс)");
        assert_eq!(table.rows[1].study, "2019 - 2023 (закончил)");
    }

    #[test]
    fn active_header_is_marked() {
        let mut state = state();
        state.sort = SortOrder {
            column: SortColumn::Faculty,
            ascending: false,
        };
        let table = table(&state, today());
        let marked: Vec<_> = table.headers.iter().filter(|h| h.sort.is_some()).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].column, SortColumn::Faculty);
        assert_eq!(marked[0].sort, Some(false));
        assert_eq!(table.rows[0].faculty, "Химический");
        assert!(table.to_string().contains("Факультет ▼"));
    }

    #[test]
    fn form_labels_follow_mode() {
        let mut state = state();
        let add = form(&state);
        assert_eq!(add.submit_label, "Добавить студента");
        assert!(!add.can_cancel);

        state.mode = FormMode::Edit(StudentId::new("1"));
        let edit = form(&state);
        assert_eq!(edit.submit_label, "Сохранить изменения");
        assert!(edit.can_cancel);
    }

    #[test]
    fn empty_table_says_so() {
        let text = table(&UiState::default(), today()).to_string();
        assert!(text.contains("(нет студентов)"));
    }
}
