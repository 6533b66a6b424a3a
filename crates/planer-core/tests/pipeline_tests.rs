mod common;

use common::{create_test_environment, create_test_pipeline, RecordingJournal, ScriptedGenerator};
use planer_core::{
    error::{GenerationError, PlanerError},
    execute, OutputLayout, Period, RunState, Stage,
};
use serde_json::Value;

const FINAL_PLAN: &str = r#"{
  "title": "From Backend Python to ML Infrastructure",
  "overview": "Twelve weeks of platform engineering for ML workloads.",
  "duration": "12 weeks",
  "final_goal": "Operate a production model-serving stack",
  "success_criteria": ["Serve a model with p99 under 100ms"],
  "risk_notes": "GPU access is limited",
  "milestones": [
    {"week_range": "Week 1-2", "goal": "Containers", "skills": ["Docker"], "projects": ["Containerize a service"]},
    {"week_range": "Week 3-4", "goal": "Kubernetes"}
  ],
  "budget_notes": "kept even though no renderer reads it"
}"#;

fn daily_reply(label: &str) -> String {
    format!(
        r#"{{"week_range": "{label}", "total_hours": 18, "daily_schedule": [{{"day": "Day 1", "total_hours": 2, "tasks": [{{"title": "Read", "duration_hours": 2}}]}}]}}"#
    )
}

/// Replies for a full run: initial, three critiques, comparison, final plan
/// and six daily plans.
fn full_script(final_plan: &str) -> ScriptedGenerator {
    let mut replies = vec![
        "initial draft".to_string(),
        "revision A".to_string(),
        "revision B".to_string(),
        "revision C".to_string(),
        "B is strongest; merge A's projects".to_string(),
        final_plan.to_string(),
    ];
    replies.extend(Period::schedule().map(|period| daily_reply(&period.label())));
    ScriptedGenerator::new(replies)
}

#[tokio::test]
async fn test_ml_infra_scenario() {
    let (_temp_dir, output_dir) = create_test_environment();
    let generator = full_script(FINAL_PLAN);
    let journal = RecordingJournal::default();
    let pipeline = create_test_pipeline(generator.clone(), journal.clone());

    let report = execute(
        &pipeline,
        "Backend engineer, 3 yrs Python",
        "Become ML infra engineer in 12 weeks",
        &output_dir,
    )
    .await
    .expect("Workflow failed");

    let state = &report.state;
    assert_eq!(state.completed, Stage::ALL.to_vec());
    assert!(!state.initial_plan.is_empty());
    assert!(!state.comparison_report.is_empty());
    assert_eq!(state.revised_plans, vec!["revision A", "revision B", "revision C"]);

    // Raw final plan is byte-identical to the reply.
    let layout = OutputLayout::new(&output_dir);
    assert_eq!(std::fs::read_to_string(layout.overall_plan()).unwrap(), FINAL_PLAN);

    // The JSON artifact keeps every field of the reply.
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(layout.overall_plan_json()).unwrap())
            .unwrap();
    let original: Value = serde_json::from_str(FINAL_PLAN).unwrap();
    assert_eq!(written, original);

    let markdown = std::fs::read_to_string(layout.overall_plan_markdown()).unwrap();
    assert!(markdown.starts_with("# From Backend Python to ML Infrastructure"));
    assert!(markdown.contains("### Week 3-4"));

    assert_eq!(
        state.daily_plans.labels(),
        vec!["Week 1-2", "Week 3-4", "Week 5-6", "Week 7-8", "Week 9-10", "Week 11-12"]
    );
    for period in Period::schedule() {
        let raw = std::fs::read_to_string(layout.daily_plan(&period)).unwrap();
        assert_eq!(raw, daily_reply(&period.label()));
        let rendered = std::fs::read_to_string(layout.daily_plan_markdown(&period)).unwrap();
        assert!(rendered.starts_with(&format!("# {} Daily Study Plan", period.label())));
    }

    // One journal entry per generation call.
    assert_eq!(journal.entries.lock().unwrap().len(), 12);
    assert_eq!(generator.calls().len(), 12);
}

#[tokio::test]
async fn test_instructions_carry_stage_inputs() {
    let (_temp_dir, output_dir) = create_test_environment();
    let generator = full_script(FINAL_PLAN);
    let pipeline = create_test_pipeline(generator.clone(), RecordingJournal::default());

    execute(&pipeline, "Backend Python", "ML infra", &output_dir)
        .await
        .expect("Workflow failed");

    let calls = generator.calls();
    assert!(calls[0].contains("Backend Python"));
    assert!(calls[0].contains("ML infra"));

    // Critique passes all see the composite request and the initial draft.
    for call in &calls[1..4] {
        assert!(call.contains("Backend Python\nML infra\n"));
        assert!(call.contains("SMART"));
        assert!(call.contains("initial draft"));
    }

    assert!(calls[4].contains("revision A"));
    assert!(calls[4].contains("revision C"));
    assert!(calls[5].contains("B is strongest"));
    assert!(calls[5].contains(r#""week_range": "Week 1-2""#));

    for (call, period) in calls[6..].iter().zip(Period::schedule()) {
        assert!(call.contains(&period.label()));
        assert!(call.contains("From Backend Python to ML Infrastructure"));
    }
}

#[tokio::test]
async fn test_prose_final_plan_still_feeds_daily_stage() {
    let (_temp_dir, output_dir) = create_test_environment();
    let prose = "Weeks 1-2: containers. Weeks 3-4: Kubernetes.";
    let generator = full_script(prose);
    let pipeline = create_test_pipeline(generator.clone(), RecordingJournal::default());

    let report = execute(&pipeline, "bg", "goal", &output_dir)
        .await
        .expect("Prose final plan must not fail the run");

    let layout = OutputLayout::new(&output_dir);
    assert_eq!(std::fs::read_to_string(layout.overall_plan()).unwrap(), prose);
    assert!(!layout.overall_plan_json().exists());
    assert!(!layout.overall_plan_markdown().exists());
    assert_eq!(report.state.daily_plans.len(), 6);
    assert!(generator.calls()[6..].iter().all(|call| call.contains(prose)));
}

#[tokio::test]
async fn test_invalid_daily_reply_skips_only_that_period() {
    let (_temp_dir, output_dir) = create_test_environment();
    let mut replies = vec![
        "draft".to_string(),
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
        "compare".to_string(),
        FINAL_PLAN.to_string(),
    ];
    for period in Period::schedule() {
        if period.start == 5 {
            replies.push("Day 1: rest".to_string());
        } else {
            replies.push(format!("```json\n{}\n```", daily_reply(&period.label())));
        }
    }
    let pipeline =
        create_test_pipeline(ScriptedGenerator::new(replies), RecordingJournal::default());

    execute(&pipeline, "bg", "goal", &output_dir)
        .await
        .expect("Workflow failed");

    let layout = OutputLayout::new(&output_dir);
    for period in Period::schedule() {
        assert!(layout.daily_plan(&period).exists());
        let structured = period.start != 5;
        assert_eq!(layout.daily_plan_json(&period).exists(), structured);
        assert_eq!(layout.daily_plan_markdown(&period).exists(), structured);
    }
}

#[tokio::test]
async fn test_transport_failure_aborts_before_any_write() {
    let (_temp_dir, output_dir) = create_test_environment();
    let generator = ScriptedGenerator::default().then_fail("connection refused");
    let journal = RecordingJournal::default();
    let pipeline = create_test_pipeline(generator.clone(), journal.clone());
    let mut state = RunState::new("bg", "goal", &output_dir);

    let err = pipeline.run(&mut state).await.unwrap_err();

    assert!(matches!(
        err,
        PlanerError::Generation(GenerationError::Backend(ref reason)) if reason == "connection refused"
    ));
    assert!(state.initial_plan.is_empty());
    assert!(state.revised_plans.is_empty());
    assert!(!output_dir.exists());
    assert_eq!(generator.calls().len(), 1);
    assert_eq!(journal.entries.lock().unwrap()[0].1, None);
}

#[tokio::test]
async fn test_failure_mid_daily_keeps_earlier_periods() {
    let (_temp_dir, output_dir) = create_test_environment();
    let mut replies = vec![
        "draft".to_string(),
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
        "compare".to_string(),
        FINAL_PLAN.to_string(),
    ];
    replies.push(daily_reply("Week 1-2"));
    replies.push(daily_reply("Week 3-4"));
    let generator = ScriptedGenerator::new(replies).then_fail("timeout");
    let pipeline = create_test_pipeline(generator, RecordingJournal::default());
    let mut state = RunState::new("bg", "goal", &output_dir);

    pipeline.run(&mut state).await.unwrap_err();

    let layout = OutputLayout::new(&output_dir);
    assert_eq!(state.daily_plans.labels(), vec!["Week 1-2", "Week 3-4"]);
    assert!(layout.overall_plan().exists());
    assert!(layout.daily_plan(&Period::from_index(1)).exists());
    assert!(!layout.daily_plan(&Period::from_index(2)).exists());
    assert!(!state.has_completed(Stage::GenerateDailyPlans));
}

#[tokio::test]
async fn test_mistyped_fields_still_produce_structured_artifacts() {
    let (_temp_dir, output_dir) = create_test_environment();
    let final_plan = r#"{"title": "T", "duration": 12, "success_criteria": null}"#;
    let mut replies = vec![
        "draft".to_string(),
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
        "compare".to_string(),
        final_plan.to_string(),
    ];
    replies.extend(Period::schedule().map(|period| {
        format!(
            r#"{{"week_range": "{}", "total_hours": "about 20"}}"#,
            period.label()
        )
    }));
    let pipeline =
        create_test_pipeline(ScriptedGenerator::new(replies), RecordingJournal::default());

    execute(&pipeline, "bg", "goal", &output_dir)
        .await
        .expect("Workflow failed");

    let layout = OutputLayout::new(&output_dir);
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(layout.overall_plan_json()).unwrap())
            .unwrap();
    assert_eq!(written, serde_json::from_str::<Value>(final_plan).unwrap());
    let markdown = std::fs::read_to_string(layout.overall_plan_markdown()).unwrap();
    assert!(markdown.starts_with("# T"));

    let first = Period::from_index(0);
    let daily: Value =
        serde_json::from_str(&std::fs::read_to_string(layout.daily_plan_json(&first)).unwrap())
            .unwrap();
    assert_eq!(daily["total_hours"], "about 20");
    assert!(layout.daily_plan_markdown(&first).exists());
}
