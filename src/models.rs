use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer};

/// Reference to another API record, normalized from either a bare id or a
/// populated object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRef")]
pub struct Ref {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRef {
    Id(String),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default)]
        nome: Option<String>,
    },
}

impl From<RawRef> for Ref {
    fn from(raw: RawRef) -> Self {
        match raw {
            RawRef::Id(id) => Ref { id, name: None },
            RawRef::Populated { id, nome } => Ref { id, name: nome },
        }
    }
}

impl Ref {
    pub fn new(id: impl Into<String>) -> Self {
        Ref {
            id: id.into(),
            name: None,
        }
    }

    #[cfg(test)]
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Ref {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ScheduleStatus {
    #[default]
    #[serde(rename = "active", alias = "ativo", alias = "ativa")]
    Active,
    #[serde(other)]
    Inactive,
}

/// A recurring weekly class slot (an "aula").
#[derive(Debug, Clone, Deserialize)]
pub struct WeeklySchedule {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// 1 = Monday .. 7 = Sunday.
    #[serde(rename = "diaSemana")]
    pub day_of_week: u32,
    #[serde(rename = "horarioInicio")]
    pub start_time: String,
    #[serde(rename = "horarioFim")]
    pub end_time: String,
    #[serde(rename = "semestre", default, deserialize_with = "non_empty")]
    pub semester: Option<String>,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(rename = "turmaId")]
    pub class_group: Ref,
    #[serde(rename = "materiaId")]
    pub subject: Ref,
    #[serde(rename = "professorId", default)]
    pub teacher: Option<Ref>,
}

impl WeeklySchedule {
    pub fn is_active(&self) -> bool {
        self.status == ScheduleStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ActivityType {
    #[serde(rename = "exam", alias = "prova")]
    Exam,
    #[serde(rename = "assignment", alias = "trabalho", other)]
    Assignment,
}

/// A one-off exam or assignment (an "atividade").
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "data", deserialize_with = "api_date")]
    pub date: NaiveDate,
    #[serde(rename = "horarioInicio", default, deserialize_with = "non_empty")]
    pub start_time: Option<String>,
    #[serde(rename = "horarioFim", default, deserialize_with = "non_empty")]
    pub end_time: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: ActivityType,
    #[serde(rename = "materiaId")]
    pub subject: Ref,
    #[serde(rename = "turmaId")]
    pub class_group: Ref,
    #[serde(rename = "semestre", default, deserialize_with = "non_empty")]
    pub semester: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Class,
    Exam,
    Assignment,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Class => "class",
            EventKind::Exam => "exam",
            EventKind::Assignment => "assignment",
        }
    }
}

impl From<ActivityType> for EventKind {
    fn from(kind: ActivityType) -> Self {
        match kind {
            ActivityType::Exam => EventKind::Exam,
            ActivityType::Assignment => EventKind::Assignment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    pub time_label: Option<String>,
    pub kind: EventKind,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl CalendarEvent {
    pub fn start_minutes(&self) -> Option<u32> {
        self.start_time.as_deref().and_then(minutes_since_midnight)
    }

    pub fn end_minutes(&self) -> Option<u32> {
        self.end_time.as_deref().and_then(minutes_since_midnight)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTimelineEntry {
    pub event: CalendarEvent,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

/// `HH:MM` to minutes since midnight. `None` when the value does not parse.
pub fn minutes_since_midnight(value: &str) -> Option<u32> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .ok()
        .map(|time| time.hour() * 60 + time.minute())
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

// The API sends either a plain date or a full ISO timestamp.
fn api_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_accepts_bare_id_and_populated_object() {
        let bare: Ref = serde_json::from_str(r#""t1""#).unwrap();
        assert_eq!(bare, Ref::new("t1"));

        let populated: Ref = serde_json::from_str(r#"{"_id": "t1", "nome": "9A"}"#).unwrap();
        assert_eq!(populated, Ref::named("t1", "9A"));
        assert_eq!(populated.label(), "9A");
    }

    #[test]
    fn schedule_deserializes_api_shape() {
        let json = r#"{
            "_id": "a1",
            "diaSemana": 1,
            "horarioInicio": "08:00",
            "horarioFim": "09:00",
            "semestre": "1",
            "status": "ativo",
            "turmaId": {"_id": "t1", "nome": "9A"},
            "materiaId": "m1",
            "professorId": {"_id": "p1", "nome": "Ana"}
        }"#;
        let schedule: WeeklySchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.day_of_week, 1);
        assert_eq!(schedule.semester.as_deref(), Some("1"));
        assert!(schedule.is_active());
        assert_eq!(schedule.class_group.label(), "9A");
        assert_eq!(schedule.subject.label(), "m1");
        assert_eq!(schedule.teacher.map(|t| t.id), Some("p1".to_string()));
    }

    #[test]
    fn blank_semester_and_unknown_status() {
        let json = r#"{
            "diaSemana": 2,
            "horarioInicio": "10:00",
            "horarioFim": "11:00",
            "semestre": "",
            "status": "inativo",
            "turmaId": "t1",
            "materiaId": "m1"
        }"#;
        let schedule: WeeklySchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.semester, None);
        assert!(!schedule.is_active());
    }

    #[test]
    fn activity_accepts_timestamp_dates_and_portuguese_types() {
        let json = r#"{
            "_id": "x1",
            "nome": "Prova 1",
            "data": "2025-03-10T00:00:00.000Z",
            "horarioInicio": "08:00",
            "tipo": "prova",
            "materiaId": "m1",
            "turmaId": "t1"
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(activity.kind, ActivityType::Exam);
        assert_eq!(activity.end_time, None);
    }

    #[test]
    fn parses_minutes() {
        assert_eq!(minutes_since_midnight("08:30"), Some(510));
        assert_eq!(minutes_since_midnight(" 23:59 "), Some(1439));
        assert_eq!(minutes_since_midnight("8h"), None);
        assert_eq!(minutes_since_midnight(""), None);
    }
}
