#[cfg(test)]
mod model_tests {
    use std::path::Path;

    use crate::models::{
        DailyPlans, DailyScheduleRecord, Period, PlanRecord, RunState, Stage, PERIOD_COUNT,
    };

    #[test]
    fn test_period_schedule_labels() {
        let labels: Vec<String> = Period::schedule().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Week 1-2",
                "Week 3-4",
                "Week 5-6",
                "Week 7-8",
                "Week 9-10",
                "Week 11-12"
            ]
        );
        assert_eq!(Period::schedule().count() as u32, PERIOD_COUNT);
    }

    #[test]
    fn test_period_file_stem() {
        assert_eq!(Period::from_index(0).file_stem(), "week1-2");
        assert_eq!(Period::from_index(5).file_stem(), "week11-12");
    }

    #[test]
    fn test_daily_plans_keep_insertion_order_and_unique_keys() {
        let mut plans = DailyPlans::default();
        plans.insert(Period::from_index(1), "second".to_string());
        plans.insert(Period::from_index(0), "first".to_string());
        plans.insert(Period::from_index(1), "second, rewritten".to_string());

        assert_eq!(plans.len(), 2);
        assert_eq!(plans.labels(), vec!["Week 3-4", "Week 1-2"]);
        assert_eq!(plans.get("Week 3-4"), Some("second, rewritten"));
        assert_eq!(plans.get("Week 5-6"), None);
    }

    #[test]
    fn test_run_state_initial_fields() {
        let state = RunState::new("Backend engineer", "Learn ML infra", "out");

        assert_eq!(state.user_background(), "Backend engineer");
        assert_eq!(state.user_goal(), "Learn ML infra");
        assert!(state
            .composite_request()
            .starts_with("Backend engineer\nLearn ML infra\n"));
        assert!(state.composite_request().contains("SMART"));
        assert_eq!(state.output_directory(), Path::new("out"));
        assert!(state.initial_plan.is_empty());
        assert!(state.revised_plans.is_empty());
        assert!(state.daily_plans.is_empty());
        assert!(state.completed.is_empty());
    }

    #[test]
    fn test_stage_order_and_names() {
        assert_eq!(Stage::ALL.first(), Some(&Stage::InitClients));
        assert_eq!(Stage::ALL.last(), Some(&Stage::SavePlans));
        assert_eq!(Stage::ComparePlans.next(), Some(Stage::GenerateFinalPlan));
        assert_eq!(Stage::SavePlans.next(), None);
        assert_eq!("critique_plan".parse::<Stage>(), Ok(Stage::CritiquePlan));
        assert!("retry_everything".parse::<Stage>().is_err());
    }

    #[test]
    fn test_plan_record_tolerates_missing_fields() {
        let parsed = PlanRecord::parse(r#"{"title": "ML Infra"}"#).unwrap();
        assert_eq!(parsed.record.title.as_deref(), Some("ML Infra"));
        assert!(parsed.record.milestones.is_empty());
        assert!(parsed.record.overview.is_none());
    }

    #[test]
    fn test_plan_record_keeps_unknown_fields_in_value() {
        let parsed = PlanRecord::parse(r#"{"title": "T", "budget": 120}"#).unwrap();
        assert_eq!(parsed.value["budget"], 120);
    }

    #[test]
    fn test_plan_record_accepts_fenced_json() {
        let text = "```json\n{\"title\": \"Fenced\"}\n```";
        let parsed = PlanRecord::parse(text).unwrap();
        assert_eq!(parsed.record.title.as_deref(), Some("Fenced"));
    }

    #[test]
    fn test_plan_record_rejects_prose_and_non_objects() {
        assert!(PlanRecord::parse("Here is your plan: study hard.").is_err());
        assert!(PlanRecord::parse("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_daily_record_accepts_integer_and_float_hours() {
        let text = r#"{
            "week_range": "Week 1-2",
            "total_hours": 20,
            "daily_schedule": [
                {"day": "Day 1", "total_hours": 2.5, "tasks": [
                    {"title": "Read", "duration_hours": 1, "skills": ["numpy"]}
                ]}
            ]
        }"#;
        let record = DailyScheduleRecord::parse(text).unwrap().record;
        assert_eq!(record.total_hours, Some(20.0));
        assert_eq!(record.daily_schedule[0].total_hours, Some(2.5));
        assert_eq!(record.daily_schedule[0].tasks[0].skills, vec!["numpy"]);
    }

    #[test]
    fn test_plan_record_reads_mistyped_fields_as_empty() {
        let text = r#"{
            "title": "T",
            "duration": 12,
            "success_criteria": null,
            "risk_notes": {"level": "high"},
            "milestones": [
                "Week 1-2: containers",
                {"week_range": "Week 3-4", "skills": "Kubernetes", "projects": [1, null, "Deploy"]}
            ]
        }"#;
        let parsed = PlanRecord::parse(text).unwrap();
        let record = parsed.record;

        assert_eq!(record.title.as_deref(), Some("T"));
        assert_eq!(record.duration.as_deref(), Some("12"));
        assert!(record.success_criteria.is_empty());
        assert!(record.risk_notes.is_none());
        assert_eq!(record.milestones.len(), 1);
        assert_eq!(record.milestones[0].skills, vec!["Kubernetes"]);
        assert_eq!(record.milestones[0].projects, vec!["1", "Deploy"]);
        assert_eq!(parsed.value["duration"], 12);
    }

    #[test]
    fn test_daily_record_reads_mistyped_fields_as_empty() {
        let text = r#"{
            "week_range": "Week 1-2",
            "total_hours": "about 20",
            "daily_schedule": [
                {"day": 1, "total_hours": "2.5", "tasks": {"title": "not a list"}}
            ],
            "week_summary": null
        }"#;
        let record = DailyScheduleRecord::parse(text).unwrap().record;

        assert_eq!(record.week_range.as_deref(), Some("Week 1-2"));
        assert_eq!(record.total_hours, None);
        assert_eq!(record.daily_schedule[0].day.as_deref(), Some("1"));
        assert_eq!(record.daily_schedule[0].total_hours, Some(2.5));
        assert!(record.daily_schedule[0].tasks.is_empty());
        assert!(record.week_summary.is_none());
    }
}
