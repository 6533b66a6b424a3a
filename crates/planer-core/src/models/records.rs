//! Structured views of the final plan and of each daily schedule.
//!
//! Both records are optional interpretations of free-form model output. Every
//! field may be absent or carry an unexpected type; such a field reads as
//! empty. A reply that is not a JSON object has no record.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::generation::extract_json_payload;

/// Structured interpretation of the synthesized final plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub overview: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub final_goal: Option<String>,
    #[serde(deserialize_with = "lenient::texts")]
    pub success_criteria: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub risk_notes: Option<String>,
    #[serde(deserialize_with = "lenient::items")]
    pub milestones: Vec<Milestone>,
}

/// One bi-weekly milestone of a [`PlanRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Milestone {
    #[serde(deserialize_with = "lenient::text")]
    pub week_range: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub goal: Option<String>,
    #[serde(deserialize_with = "lenient::texts")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient::texts")]
    pub projects: Vec<String>,
    #[serde(deserialize_with = "lenient::texts")]
    pub resources: Vec<String>,
}

/// Structured interpretation of one period's daily plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DailyScheduleRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub week_range: Option<String>,
    #[serde(deserialize_with = "lenient::hours")]
    pub total_hours: Option<f64>,
    #[serde(deserialize_with = "lenient::items")]
    pub daily_schedule: Vec<DaySchedule>,
    #[serde(deserialize_with = "lenient::text")]
    pub week_summary: Option<String>,
}

/// A single day inside a [`DailyScheduleRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DaySchedule {
    #[serde(deserialize_with = "lenient::text")]
    pub day: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient::hours")]
    pub total_hours: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub rest_time: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub learning_tips: Option<String>,
    #[serde(deserialize_with = "lenient::items")]
    pub tasks: Vec<Task>,
}

/// A task scheduled on a [`DaySchedule`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Task {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::hours")]
    pub duration_hours: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::texts")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub expected_outcome: Option<String>,
}

/// A record together with the JSON value it was read from.
///
/// The value is what gets persisted, so fields the record does not model
/// survive into the `.json` artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: Value,
    pub record: T,
}

/// Parse model output into a record of type `T`.
///
/// A surrounding Markdown code fence is tolerated. Anything other than a JSON
/// object is rejected; any JSON object yields a record.
pub fn parse_record<T>(text: &str) -> Result<Parsed<T>, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    let value: Value = serde_json::from_str(extract_json_payload(text))?;
    if !value.is_object() {
        return Err(serde::de::Error::custom("expected a JSON object"));
    }
    let record = T::deserialize(&value).unwrap_or_default();
    Ok(Parsed { value, record })
}

impl PlanRecord {
    pub fn parse(text: &str) -> Result<Parsed<Self>, serde_json::Error> {
        parse_record(text)
    }
}

impl DailyScheduleRecord {
    pub fn parse(text: &str) -> Result<Parsed<Self>, serde_json::Error> {
        parse_record(text)
    }
}

/// Field readers that never fail: a null or mistyped value reads as absent.
mod lenient {
    use serde::{de::DeserializeOwned, Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(scalar_text(Value::deserialize(d)?))
    }

    /// A list of strings; a lone scalar becomes a one-item list.
    pub fn texts<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
            other => scalar_text(other).into_iter().collect(),
        })
    }

    /// A number of hours; numeric strings such as `"2.5"` are accepted.
    pub fn hours<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// A list of nested records; entries that are not objects are dropped.
    pub fn items<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
