mod common;

use std::collections::HashMap;

use common::prompt_dir;
use planer_core::{error::TemplateError, pipeline::REQUIRED_TEMPLATES, TemplateStore};

#[test]
fn test_shipped_templates_cover_every_stage() {
    let store = TemplateStore::load(prompt_dir()).expect("Failed to load templates");
    for name in REQUIRED_TEMPLATES {
        assert!(store.contains(name), "missing template {name}");
    }
}

#[test]
fn test_shipped_templates_resolve_with_stage_variables() {
    let store = TemplateStore::load(prompt_dir()).expect("Failed to load templates");
    let vars = HashMap::from([
        ("user_background", "BACKGROUND"),
        ("user_goal", "GOAL"),
        ("original_question", "QUESTION"),
        ("model_answer", "ANSWER"),
        ("answerA", "A"),
        ("answerB", "B"),
        ("answerC", "C"),
        ("planA", "PLAN_A"),
        ("planB", "PLAN_B"),
        ("planC", "PLAN_C"),
        ("comparison_result", "COMPARISON"),
        ("biweekly_plan", "BIWEEKLY"),
        ("week_range", "Week 7-8"),
    ]);

    for name in REQUIRED_TEMPLATES {
        let text = store
            .render(name, &vars)
            .unwrap_or_else(|e| panic!("{name} failed to resolve: {e}"));
        assert!(!text.contains("{{"), "{name} left an escaped brace behind");
    }

    let daily = store.render("daily_plan", &vars).unwrap();
    assert!(daily.contains(r#""week_range": "Week 7-8""#));
    assert!(daily.contains("BIWEEKLY"));
}

#[test]
fn test_missing_variable_names_the_placeholder() {
    let store = TemplateStore::load(prompt_dir()).expect("Failed to load templates");
    let vars = HashMap::from([("user_background", "BACKGROUND")]);

    let err = store.render("initial_plan", &vars).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::MissingVariable { ref variable, .. } if variable == "user_goal"
    ));
}
