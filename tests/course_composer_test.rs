mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::*;
use rehab_course_composer::config::demo_catalog;
use rehab_course_composer::config::seeding::{KNEE as DEMO_KNEE, LOWER_BACK, SHOULDER as DEMO_SHOULDER};
use rehab_course_composer::models::{
    Condition, CourseRequest, DifficultyTier, RehabPhase, Section,
};
use rehab_course_composer::services::CourseComposerService;

fn demo_composer() -> CourseComposerService {
    CourseComposerService::new(Arc::new(demo_catalog()))
}

#[tokio::test]
async fn test_severe_pain_keeps_only_principle_exercises() {
    println!("🧪 Testing severe back pain course...");

    let request = CourseRequest::new(vec![selection(LOWER_BACK, "허리", 5)], 5)
        .with_equipment(["없음"])
        .with_duration(60);

    let course = demo_composer().compose(request).await.unwrap();

    assert!(!course.exercises.is_empty());
    assert_eq!(course.difficulty.target_level, DifficultyTier::Principle);
    assert_eq!(course.difficulty.allowed_range.max, 4);
    for exercise in &course.exercises {
        assert_eq!(exercise.tier, DifficultyTier::Principle, "{} is not principle", exercise.name);
        assert!(exercise.difficulty_score.unwrap_or(5) <= 4);
        assert!(exercise.required_equipment.iter().all(|e| e == "없음"));
    }
    assert!(course.total_duration_minutes <= 60);

    println!("✅ Severe pain test passed!");
}

#[tokio::test]
async fn test_shared_template_is_merged_across_body_parts() {
    println!("🧪 Testing merge of a template shared by two body parts...");

    let request = request(
        vec![selection(BACK, "허리", 2), selection(KNEE, "무릎", 2)],
        2,
        &[],
    );

    let course = composer(shared_template_catalog()).compose(request).await.unwrap();

    let bridges: Vec<_> = course
        .exercises
        .iter()
        .filter(|e| e.exercise_template_id == tid(1))
        .collect();
    assert_eq!(bridges.len(), 1);
    assert_eq!(bridges[0].body_part_ids.len(), 2);
    assert!(bridges[0].body_part_ids.contains(&BACK));
    assert!(bridges[0].body_part_ids.contains(&KNEE));
    assert_eq!(bridges[0].section, Section::Main);

    assert_eq!(course.stats.by_body_part.get("허리"), Some(&2));
    assert_eq!(course.stats.by_body_part.get("무릎"), Some(&3));

    println!("✅ Shared template merge test passed!");
}

#[tokio::test]
async fn test_equipment_filter_excludes_missing_equipment() {
    println!("🧪 Testing equipment filtering...");

    let request = request(vec![selection(SHOULDER, "어깨", 2)], 2, &["덤벨"]);

    let course = composer(equipment_catalog()).compose(request).await.unwrap();
    let ids: HashSet<_> = course.exercises.iter().map(|e| e.exercise_template_id).collect();

    assert!(!ids.contains(&tid(10)), "barbell exercise must be excluded");
    assert!(ids.contains(&tid(11)));
    assert!(ids.contains(&tid(12)), "bodyweight exercise is always available");
    assert!(!ids.contains(&tid(13)), "every listed item is required");

    println!("✅ Equipment filtering test passed!");
}

#[tokio::test]
async fn test_bodyweight_option_keeps_exercise_without_listed_equipment() {
    println!("🧪 Testing exercise that can be done with or without a mat...");

    let request = request(vec![selection(SHOULDER, "어깨", 2)], 2, &["덤벨"]);

    let course = composer(equipment_catalog()).compose(request).await.unwrap();
    let push_up = course
        .exercises
        .iter()
        .find(|e| e.exercise_template_id == tid(14))
        .expect("bodyweight alternative is kept without a mat");
    assert_eq!(push_up.required_equipment, vec!["없음".to_string(), "매트".to_string()]);

    println!("✅ Bodyweight option test passed!");
}

#[tokio::test]
async fn test_empty_main_section_leaves_time_unused() {
    println!("🧪 Testing course with no main candidates...");

    let request = request(vec![selection(SHOULDER, "어깨", 2)], 2, &[]);

    let course = composer(warmup_only_catalog()).compose(request).await.unwrap();

    assert_eq!(course.sections.main.budget_minutes, 40);
    assert_eq!(course.sections.main.allotted_minutes, 0);
    assert_eq!(course.stats.main, 0);
    assert_eq!(course.sections.warmup.allotted_minutes, 9);
    assert!(course.total_duration_minutes < 60);
    assert!(course
        .warnings
        .iter()
        .any(|w| w == "No main exercises available; its 40 minutes were left unused"));

    println!("✅ Empty main section test passed!");
}

#[tokio::test]
async fn test_composition_is_deterministic() {
    println!("🧪 Testing deterministic composition...");

    let request = CourseRequest::new(
        vec![
            selection(LOWER_BACK, "허리", 3),
            selection(DEMO_KNEE, "무릎", 2),
            selection(DEMO_SHOULDER, "어깨", 4),
        ],
        3,
    )
    .with_equipment(["매트", "밴드", "덤벨"])
    .with_experience("intermediate")
    .with_duration(90);

    let composer = demo_composer();
    let first = composer.compose(request.clone()).await.unwrap();
    let second = composer.compose(request).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    println!("✅ Determinism test passed!");
}

#[tokio::test]
async fn test_sections_are_ordered_and_numbered() {
    let request = CourseRequest::new(
        vec![selection(LOWER_BACK, "허리", 2), selection(DEMO_KNEE, "무릎", 2)],
        2,
    )
    .with_equipment(["매트"])
    .with_duration(90);

    let course = demo_composer().compose(request).await.unwrap();

    let sections: Vec<Section> = course.exercises.iter().map(|e| e.section).collect();
    let mut sorted = sections.clone();
    sorted.sort();
    assert_eq!(sections, sorted);

    for section in Section::ALL {
        let orders: Vec<u32> = course.section(section).map(|e| e.order_in_section).collect();
        let expected: Vec<u32> = (1..=orders.len() as u32).collect();
        assert_eq!(orders, expected);

        let minutes: u32 = course
            .section(section)
            .map(|e| e.duration_minutes.unwrap_or(0))
            .sum();
        let time = course.sections.get(section);
        assert_eq!(minutes, time.allotted_minutes);
        assert!(time.allotted_minutes <= time.budget_minutes);
    }

    assert!(course.section(Section::Cooldown).all(|e| e.cooldown_tagged));
}

#[tokio::test]
async fn test_acute_condition_excludes_impact_exercise() {
    println!("🧪 Testing condition-specific contraindication...");

    let request = CourseRequest::new(vec![selection(DEMO_KNEE, "무릎", 2)], 2)
        .with_experience("advanced")
        .with_duration(60)
        .with_condition(Condition::Acute);

    let course = demo_composer().compose(request).await.unwrap();

    assert!(course.exercises.iter().all(|e| e.exercise_template_id != demo_tid(207)));
    let substitution = course
        .substitutions
        .iter()
        .find(|s| s.excluded_template_id == demo_tid(207))
        .expect("excluded exercise is reported");
    assert_eq!(substitution.body_part_id, DEMO_KNEE);
    assert!(substitution.reason.contains("acute"));

    println!("✅ Acute condition test passed!");
}

#[tokio::test]
async fn test_other_condition_downgrades_hard_rule_to_caution() {
    let request = CourseRequest::new(vec![selection(DEMO_KNEE, "무릎", 2)], 2)
        .with_experience("advanced")
        .with_duration(60)
        .with_condition(Condition::Chronic);

    let course = demo_composer().compose(request).await.unwrap();

    assert!(course.substitutions.iter().all(|s| s.excluded_template_id != demo_tid(207)));
    assert!(course
        .warnings
        .iter()
        .any(|w| w.starts_with("Caution: 점프 스쿼트")));
}

#[tokio::test]
async fn test_unknown_condition_keeps_hard_rule() {
    let request = CourseRequest::new(vec![selection(DEMO_KNEE, "무릎", 2)], 2)
        .with_experience("advanced")
        .with_duration(60);

    let course = demo_composer().compose(request).await.unwrap();

    assert!(course.substitutions.iter().any(|s| s.excluded_template_id == demo_tid(207)));
}

#[tokio::test]
async fn test_pain_gated_contraindication_offers_alternatives() {
    println!("🧪 Testing substitutions for an excluded exercise...");

    let request = CourseRequest::new(vec![selection(DEMO_SHOULDER, "어깨", 4)], 4)
        .with_equipment(["덤벨"])
        .with_duration(60);

    let course = demo_composer().compose(request).await.unwrap();

    let substitution = course
        .substitutions
        .iter()
        .find(|s| s.excluded_template_id == demo_tid(209))
        .expect("shoulder press is excluded at pain 4");
    assert_eq!(substitution.excluded_template_name, "덤벨 숄더 프레스");
    assert!(course.exercises.iter().all(|e| e.exercise_template_id != demo_tid(209)));
    assert!(course
        .warnings
        .iter()
        .any(|w| w.starts_with("덤벨 숄더 프레스 was excluded")));

    println!("✅ Substitution test passed!");
}

#[tokio::test]
async fn test_rehab_phase_rescales_volume() {
    let request = CourseRequest::new(vec![selection(LOWER_BACK, "허리", 2)], 2)
        .with_equipment(["없음"])
        .with_duration(60)
        .with_rehab_phase(RehabPhase::Initial, None);

    let course = demo_composer().compose(request).await.unwrap();

    let volume = course.volume.as_ref().expect("volume adjustment is reported");
    assert_eq!(volume.recommended_intensity, 2);
    assert!(volume.adjustment_reason.contains("initial phase"));

    let pelvic_tilt = course
        .exercises
        .iter()
        .find(|e| e.exercise_template_id == demo_tid(101))
        .expect("gentle warm-up is selected");
    assert_eq!(pelvic_tilt.reps, Some(7));
    assert_eq!(pelvic_tilt.sets, Some(2));
}

#[tokio::test]
async fn test_body_part_without_candidates_is_reported() {
    let request = CourseRequest::new(
        vec![selection(LOWER_BACK, "허리", 2), selection(uuid::Uuid::from_u128(0x9999), "발목", 2)],
        2,
    )
    .with_duration(60);

    let course = demo_composer().compose(request).await.unwrap();

    assert!(!course.exercises.is_empty());
    assert!(course
        .warnings
        .iter()
        .any(|w| w == "No suitable exercises found for 발목"));
    assert!(!course.stats.by_body_part.contains_key("발목"));
}
