use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier the students API assigns on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudentId(String);

impl StudentId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StudentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
}

impl<'de> Deserialize<'de> for StudentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::Text(text) => StudentId(text),
            StringOrNumber::Int(int) => StudentId(int.to_string()),
        })
    }
}

/// A stored student as the API echoes it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub id: StudentId,
    pub name: String,
    pub surname: String,
    pub lastname: String,
    #[serde(deserialize_with = "year")]
    pub study_start: i32,
    #[serde(with = "iso_date")]
    pub birthday: NaiveDate,
    pub faculty: String,
}

/// Body of create and update requests. Has no id: it is not persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub surname: String,
    pub lastname: String,
    #[serde(deserialize_with = "year")]
    pub study_start: i32,
    #[serde(with = "iso_date")]
    pub birthday: NaiveDate,
    pub faculty: String,
}

fn year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Int(int) => i32::try_from(int).map_err(serde::de::Error::custom),
        StringOrNumber::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Birthdays travel as `2000-05-15T00:00:00.000Z`; plain `2000-05-15` is
/// accepted as well. Only the date part is meaningful.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}T00:00:00.000Z", date.format(FORMAT)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
        let date = raw.trim().split('T').next().unwrap_or_default();
        NaiveDate::parse_from_str(date, FORMAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_accepts_loose_types() {
        let payload: StudentPayload = serde_json::from_value(json!({
            "id": 17,
            "name": "Иван",
            "surname": "Иванов",
            "lastname": "Иванович",
            "studyStart": "2021",
            "birthday": "2000-05-15T00:00:00.000Z",
            "faculty": "Физический",
            "createdAt": "2024-01-01T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(payload.id, StudentId::new("17"));
        assert_eq!(payload.study_start, 2021);
        assert_eq!(payload.birthday, NaiveDate::from_ymd_opt(2000, 5, 15).unwrap());
    }

    #[test]
    fn new_student_wire_shape() {
        let student = NewStudent {
            name: "Иван".to_string(),
            surname: "Иванов".to_string(),
            lastname: "Иванович".to_string(),
            study_start: 2021,
            birthday: NaiveDate::from_ymd_opt(2000, 5, 15).unwrap(),
            faculty: "Физический".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&student).unwrap(),
            json!({
                "name": "Иван",
                "surname": "Иванов",
                "lastname": "Иванович",
                "studyStart": 2021,
                "birthday": "2000-05-15T00:00:00.000Z",
                "faculty": "Физический"
            })
        );
    }

    #[test]
    fn rejects_garbage_birthday() {
        assert!(iso_date::parse("15.05.2000").is_err());
        assert!(iso_date::parse("").is_err());
    }
}
