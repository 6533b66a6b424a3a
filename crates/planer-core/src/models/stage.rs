//! Pipeline stage enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of the pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Construct the generation client and template store
    InitClients,

    /// Draft the first plan from background and goal
    GenerateInitialPlan,

    /// Three independent critique passes over the initial plan
    CritiquePlan,

    /// Qualitative comparison of the three revisions
    ComparePlans,

    /// Synthesize the final bi-weekly plan
    GenerateFinalPlan,

    /// Expand each bi-weekly period into a daily schedule
    GenerateDailyPlans,

    /// Re-write every raw artifact
    SavePlans,
}

impl Stage {
    /// Every stage in the order the pipeline runs them.
    pub const ALL: [Stage; 7] = [
        Stage::InitClients,
        Stage::GenerateInitialPlan,
        Stage::CritiquePlan,
        Stage::ComparePlans,
        Stage::GenerateFinalPlan,
        Stage::GenerateDailyPlans,
        Stage::SavePlans,
    ];

    /// Stable snake_case name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::InitClients => "init_clients",
            Stage::GenerateInitialPlan => "generate_initial_plan",
            Stage::CritiquePlan => "critique_plan",
            Stage::ComparePlans => "compare_plans",
            Stage::GenerateFinalPlan => "generate_final_plan",
            Stage::GenerateDailyPlans => "generate_daily_plans",
            Stage::SavePlans => "save_plans",
        }
    }

    /// The stage that runs after this one, if any.
    pub fn next(&self) -> Option<Stage> {
        let index = Stage::ALL.iter().position(|stage| stage == self)?;
        Stage::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .find(|stage| stage.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid stage: {s}"))
    }
}
