//! UI state and the reducer that drives it.
//!
//! [`UiState::update`] is the only place state changes. It never touches the
//! network or the screen; it returns [`Effect`]s for the runner in
//! [`crate::app`] to carry out. Results come back as further [`Action`]s.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::err::Error;
use crate::gateway::GatewayResult;
use crate::models::{iso_date, NewStudent, StudentId, StudentPayload};
use crate::pipeline::{apply_filters, FilterInputs, SortColumn, SortOrder};
use crate::student::Student;
use crate::validation::{capitalize, validate, FieldKind, FieldStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Surname,
    Name,
    Lastname,
    Birthday,
    StudyStart,
    Faculty,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Surname,
        FormField::Name,
        FormField::Lastname,
        FormField::Birthday,
        FormField::StudyStart,
        FormField::Faculty,
    ];

    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::Birthday => FieldKind::Date,
            FormField::StudyStart => FieldKind::Year,
            _ => FieldKind::NameLike,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            FormField::Surname => "surname",
            FormField::Name => "name",
            FormField::Lastname => "lastname",
            FormField::Birthday => "birthday",
            FormField::StudyStart => "studyStart",
            FormField::Faculty => "faculty",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Surname => "Фамилия",
            FormField::Name => "Имя",
            FormField::Lastname => "Отчество",
            FormField::Birthday => "Дата рождения",
            FormField::StudyStart => "Год начала обучения",
            FormField::Faculty => "Факультет",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("start") {
            return Ok(FormField::StudyStart);
        }
        FormField::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("unknown field `{}`", s))
    }
}

/// The add/edit form: one raw value and one status per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    values: [String; 6],
    statuses: [FieldStatus; 6],
}

impl Form {
    pub fn value(&self, field: FormField) -> &str {
        &self.values[field.index()]
    }

    pub fn status(&self, field: FormField) -> &FieldStatus {
        &self.statuses[field.index()]
    }

    pub fn set(&mut self, field: FormField, value: String) {
        self.values[field.index()] = value;
    }

    pub fn validate(&mut self, field: FormField, today: NaiveDate) -> bool {
        let result = validate(self.value(field), field.kind(), today);
        self.statuses[field.index()] = FieldStatus::of(&result);
        result.is_ok()
    }

    /// Validates every field, so each shows its own status.
    pub fn validate_all(&mut self, today: NaiveDate) -> bool {
        FormField::ALL
            .into_iter()
            .fold(true, |valid, field| self.validate(field, today) && valid)
    }

    pub fn clear_status(&mut self, field: FormField) {
        self.statuses[field.index()] = FieldStatus::Untouched;
    }

    pub fn reset(&mut self) {
        *self = Form::default();
    }

    pub fn populate(&mut self, student: &Student) {
        self.set(FormField::Surname, student.surname.clone());
        self.set(FormField::Name, student.name.clone());
        self.set(FormField::Lastname, student.lastname.clone());
        self.set(
            FormField::Birthday,
            student.birthday.format(iso_date::FORMAT).to_string(),
        );
        self.set(FormField::StudyStart, student.study_start.to_string());
        self.set(FormField::Faculty, student.faculty.clone());
    }

    /// Request body for the current values. `None` unless the dates parse,
    /// which `validate_all` has already checked.
    pub fn new_student(&self) -> Option<NewStudent> {
        let text = |field| capitalize(self.value(field).trim());
        Some(NewStudent {
            name: text(FormField::Name),
            surname: text(FormField::Surname),
            lastname: text(FormField::Lastname),
            study_start: self.value(FormField::StudyStart).trim().parse().ok()?,
            birthday: iso_date::parse(self.value(FormField::Birthday)).ok()?,
            faculty: text(FormField::Faculty),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Add,
    Edit(StudentId),
}

impl FormMode {
    pub fn editing(&self) -> Option<&StudentId> {
        match self {
            FormMode::Add => None,
            FormMode::Edit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterInput {
    Fio,
    Faculty,
    StudyStart,
    StudyEnd,
    Search,
}

impl FromStr for FilterInput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "fio" => FilterInput::Fio,
            "faculty" => FilterInput::Faculty,
            "start" | "studyStart" => FilterInput::StudyStart,
            "end" | "studyEnd" => FilterInput::StudyEnd,
            "search" => FilterInput::Search,
            other => anyhow::bail!("unknown filter `{}`", other),
        })
    }
}

/// What the last listing request produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListingOutcome {
    #[default]
    Pending,
    Loaded(usize),
    Failed(Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success<S: Into<String>>(text: S) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn failure<S: Into<String>>(text: S) -> Self {
        Self {
            kind: NoticeKind::Failure,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    FieldInput(FormField, String),
    FieldBlur(FormField),
    FieldFocus(FormField),
    Submit,
    Cancel,
    Edit(StudentId),
    Delete(StudentId),
    SortBy(SortColumn),
    FilterChanged(FilterInput, String),
    Redraw,
    RequestFetch,
    Fetched {
        generation: u64,
        result: GatewayResult<Vec<StudentPayload>>,
    },
    Created(GatewayResult<StudentPayload>),
    Updated(StudentId, GatewayResult<StudentPayload>),
    Deleted(StudentId, GatewayResult<()>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScheduleFetch,
    Fetch {
        generation: u64,
        filters: Vec<(String, String)>,
    },
    Create(NewStudent),
    Update(StudentId, NewStudent),
    Delete(StudentId),
    Render,
    Notify(Notice),
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub students: Vec<Student>,
    pub sort: SortOrder,
    pub manual_sort: bool,
    pub mode: FormMode,
    pub form: Form,
    pub filters: FilterInputs,
    pub fetch_generation: u64,
    pub listing: ListingOutcome,
}

impl UiState {
    pub fn update(&mut self, action: Action, today: NaiveDate) -> Vec<Effect> {
        match action {
            Action::FieldInput(field, value) => {
                let blank = value.trim().is_empty();
                self.form.set(field, value);
                if blank {
                    self.form.clear_status(field);
                } else {
                    self.form.validate(field, today);
                }
                vec![Effect::Render]
            }
            Action::FieldBlur(field) => {
                self.form.validate(field, today);
                vec![Effect::Render]
            }
            Action::FieldFocus(field) => {
                if self.form.value(field).trim().is_empty() {
                    self.form.clear_status(field);
                }
                vec![Effect::Render]
            }
            Action::Submit => self.submit(today),
            Action::Cancel => {
                if self.mode == FormMode::Add {
                    log::debug!("cancel ignored outside of edit mode");
                    return Vec::new();
                }
                self.reset_to_add();
                vec![Effect::Render]
            }
            Action::Edit(id) => {
                let student = match self.students.iter().find(|s| s.id == id) {
                    Some(student) => student.clone(),
                    None => {
                        log::warn!("no student with id {} to edit", id);
                        return Vec::new();
                    }
                };
                self.form.populate(&student);
                self.form.validate_all(today);
                self.mode = FormMode::Edit(id);
                vec![Effect::Render]
            }
            Action::Delete(id) => vec![Effect::Delete(id)],
            Action::SortBy(column) => {
                if self.sort.column == column {
                    self.sort.ascending = !self.sort.ascending;
                } else {
                    self.sort = SortOrder {
                        column,
                        ascending: true,
                    };
                }
                self.manual_sort = true;
                vec![Effect::Render]
            }
            Action::FilterChanged(input, value) => {
                let slot = match input {
                    FilterInput::Fio => &mut self.filters.fio,
                    FilterInput::Faculty => &mut self.filters.faculty,
                    FilterInput::StudyStart => &mut self.filters.study_start,
                    FilterInput::StudyEnd => &mut self.filters.study_end,
                    FilterInput::Search => &mut self.filters.search,
                };
                *slot = value;
                vec![Effect::ScheduleFetch]
            }
            Action::Redraw => vec![Effect::Render],
            Action::RequestFetch => {
                self.fetch_generation += 1;
                vec![Effect::Fetch {
                    generation: self.fetch_generation,
                    filters: self.filters.server_filters(),
                }]
            }
            Action::Fetched { generation, result } => self.fetched(generation, result),
            Action::Created(result) => self.created(result),
            Action::Updated(id, result) => self.updated(id, result),
            Action::Deleted(id, result) => self.deleted(id, result),
        }
    }

    fn reset_to_add(&mut self) {
        self.form.reset();
        self.mode = FormMode::Add;
    }

    fn submit(&mut self, today: NaiveDate) -> Vec<Effect> {
        if !self.form.validate_all(today) {
            return vec![Effect::Render];
        }
        let student = match self.form.new_student() {
            Some(student) => student,
            None => return vec![Effect::Render],
        };
        let request = match &self.mode {
            FormMode::Add => Effect::Create(student),
            FormMode::Edit(id) => Effect::Update(id.clone(), student),
        };
        vec![Effect::Render, request]
    }

    fn fetched(
        &mut self,
        generation: u64,
        result: GatewayResult<Vec<StudentPayload>>,
    ) -> Vec<Effect> {
        if generation != self.fetch_generation {
            log::debug!(
                "dropping listing #{}, #{} is newer",
                generation,
                self.fetch_generation
            );
            return Vec::new();
        }

        let records = match result {
            Ok(payloads) => {
                self.listing = ListingOutcome::Loaded(payloads.len());
                payloads.into_iter().map(Student::from).collect()
            }
            Err(err) => {
                log::error!("failed to load students: {}", err);
                self.listing = ListingOutcome::Failed(err);
                Vec::new()
            }
        };

        let filtered = apply_filters(records, &self.filters, self.sort, self.manual_sort);
        self.students = filtered.records;
        self.sort = filtered.sort;
        self.manual_sort = filtered.manual_sort;
        vec![Effect::Render]
    }

    fn created(&mut self, result: GatewayResult<StudentPayload>) -> Vec<Effect> {
        match result {
            Ok(payload) => {
                self.students.push(payload.into());
                self.form.reset();
                vec![Effect::Render, Effect::Notify(Notice::success("Студент добавлен!"))]
            }
            Err(err) => {
                log::error!("failed to add student: {}", err);
                let text = if err.is_unreadable() {
                    "Ошибка сети при добавлении студента!"
                } else {
                    err.server_message()
                        .unwrap_or("Ошибка при добавлении студента!")
                };
                vec![Effect::Notify(Notice::failure(text))]
            }
        }
    }

    fn updated(&mut self, id: StudentId, result: GatewayResult<StudentPayload>) -> Vec<Effect> {
        match result {
            Ok(payload) => {
                if let Some(slot) = self.students.iter_mut().find(|s| s.id == id) {
                    *slot = payload.into();
                }
                self.reset_to_add();
                vec![
                    Effect::Render,
                    Effect::Notify(Notice::success("Студент успешно обновлен!")),
                ]
            }
            Err(err) => {
                log::error!("failed to update student {}: {}", id, err);
                vec![Effect::Notify(Notice::failure(
                    "Ошибка при обновлении студента!",
                ))]
            }
        }
    }

    fn deleted(&mut self, id: StudentId, result: GatewayResult<()>) -> Vec<Effect> {
        match result {
            Ok(()) => {
                self.students.retain(|s| s.id != id);
                if self.mode.editing() == Some(&id) {
                    self.reset_to_add();
                }
                vec![
                    Effect::Render,
                    Effect::Notify(Notice::success("Студент успешно удален!")),
                ]
            }
            Err(err) => {
                log::error!("failed to delete student {}: {}", id, err);
                vec![Effect::Notify(Notice::failure(
                    "Произошла ошибка при удалении студента!",
                ))]
            }
        }
    }
}
