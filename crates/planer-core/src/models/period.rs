//! Bi-weekly periods and the ordered map of daily plans keyed by them.

use serde::{Deserialize, Serialize};

/// Number of bi-weekly periods the daily-plan stage expands.
///
/// The horizon is fixed at twelve weeks regardless of the duration the final
/// plan states.
pub const PERIOD_COUNT: u32 = 6;

/// A two-week range such as "Week 3-4".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Period {
    /// First week of the range (1-based)
    pub start: u32,

    /// Last week of the range
    pub end: u32,
}

impl Period {
    /// Period for the 0-based `index` of the fixed cadence.
    pub fn from_index(index: u32) -> Self {
        let start = index * 2 + 1;
        Self {
            start,
            end: start + 1,
        }
    }

    /// The full fixed cadence, in generation order.
    pub fn schedule() -> impl Iterator<Item = Period> {
        (0..PERIOD_COUNT).map(Period::from_index)
    }

    /// Human-readable label used as template input and map key.
    pub fn label(&self) -> String {
        format!("Week {}-{}", self.start, self.end)
    }

    /// Label lower-cased with spaces removed, e.g. `week1-2`.
    pub fn file_stem(&self) -> String {
        self.label().to_lowercase().replace(' ', "")
    }
}

/// Raw daily-plan text for one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPlan {
    pub period: Period,
    pub text: String,
}

/// Insertion-ordered daily plans with unique period keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyPlans(pub Vec<DailyPlan>);

impl DailyPlans {
    /// Store `text` for `period`. Re-inserting a period overwrites its text in
    /// place and keeps its original position.
    pub fn insert(&mut self, period: Period, text: String) {
        match self.0.iter_mut().find(|plan| plan.period == period) {
            Some(existing) => existing.text = text,
            None => self.0.push(DailyPlan { period, text }),
        }
    }

    /// Look up the text stored under a label such as "Week 1-2".
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|plan| plan.period.label() == label)
            .map(|plan| plan.text.as_str())
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|plan| plan.period.label()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyPlan> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a DailyPlans {
    type Item = &'a DailyPlan;
    type IntoIter = std::slice::Iter<'a, DailyPlan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
