use std::fmt::{self, Display, Formatter};

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::iso_date;

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 20;
pub const MIN_STUDY_START: i32 = 2000;

lazy_static! {
    // Cyrillic words, hyphens only between letters.
    static ref CYRILLIC_NAME: Regex =
        Regex::new(r"^[А-Яа-яЁё]+(-[А-Яа-яЁё]+)*$").expect("invalid name pattern");
}

fn min_birthday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1980, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    NameLike,
    Date,
    Year,
}

/// Why a field's value was rejected. `Display` is the text shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalid {
    Required,
    NotCyrillic,
    TooShort,
    TooLong,
    MalformedDate,
    BirthdayOutOfRange { min: NaiveDate, max: NaiveDate },
    StudyStartOutOfRange { min: i32, max: i32 },
}

impl Display for Invalid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Invalid::Required => f.write_str("Это поле обязательно для заполнения"),
            Invalid::NotCyrillic => f.write_str("Введите только русские буквы!"),
            Invalid::TooShort => write!(f, "Поле должно содержать минимум {} символа!", MIN_NAME_LEN),
            Invalid::TooLong => write!(f, "Поле должно содержать максимум {} символов!", MAX_NAME_LEN),
            Invalid::MalformedDate => f.write_str("Введите корректную дату!"),
            Invalid::BirthdayOutOfRange { min, max } => write!(
                f,
                "Дата рождения должна быть в диапазоне от {} до {}!",
                min.format("%d.%m.%Y"),
                max.format("%d.%m.%Y")
            ),
            Invalid::StudyStartOutOfRange { min, max } => write!(
                f,
                "Год начала обучения должен находиться в диапазоне от {} до {}!",
                min, max
            ),
        }
    }
}

impl std::error::Error for Invalid {}

pub fn validate(raw: &str, kind: FieldKind, today: NaiveDate) -> Result<(), Invalid> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(Invalid::Required);
    }

    match kind {
        FieldKind::NameLike => {
            if !CYRILLIC_NAME.is_match(value) {
                return Err(Invalid::NotCyrillic);
            }
            let len = value.chars().count();
            if len < MIN_NAME_LEN {
                return Err(Invalid::TooShort);
            }
            if len > MAX_NAME_LEN {
                return Err(Invalid::TooLong);
            }
        }
        FieldKind::Date => {
            let date = iso_date::parse(value).map_err(|_| Invalid::MalformedDate)?;
            let min = min_birthday();
            if date < min || date > today {
                return Err(Invalid::BirthdayOutOfRange { min, max: today });
            }
        }
        FieldKind::Year => {
            let range = Invalid::StudyStartOutOfRange {
                min: MIN_STUDY_START,
                max: today.year(),
            };
            let year: i32 = value.parse().map_err(|_| range.clone())?;
            if year < MIN_STUDY_START || year > today.year() {
                return Err(range);
            }
        }
    }
    Ok(())
}

/// Observable state of one form field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldStatus {
    #[default]
    Untouched,
    Valid,
    Invalid(String),
}

impl FieldStatus {
    pub fn of(result: &Result<(), Invalid>) -> Self {
        match result {
            Ok(()) => FieldStatus::Valid,
            Err(invalid) => FieldStatus::Invalid(invalid.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, FieldStatus::Valid)
    }
}

/// `иВАНОВ` -> `Иванов`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
