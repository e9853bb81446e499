use proptest::prelude::*;
use proptest::sample::{select, subsequence};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use rehab_course_composer::catalog::InMemoryCatalog;
use rehab_course_composer::composer::is_bodyweight;
use rehab_course_composer::models::{
    BodyPartExerciseMapping, BodyPartSelection, Contraindication, CourseRequest, CourseResponse,
    DifficultyTier, ExerciseTemplate, Section, Severity,
};
use rehab_course_composer::services::CourseComposerService;

const EQUIPMENT: [&str; 5] = ["없음", "매트", "덤벨", "바벨", "밴드"];
const BODY_PARTS: [&str; 3] = ["허리", "무릎", "어깨"];

#[derive(Debug, Clone)]
struct TemplateShape {
    intensity: Option<u8>,
    difficulty: Option<u8>,
    duration: Option<u32>,
    equipment: Vec<&'static str>,
    cooldown: bool,
    mapped_to: Vec<bool>,
    priority: i32,
    hard_from_pain: Option<u8>,
}

fn template_shape() -> impl Strategy<Value = TemplateShape> {
    (
        proptest::option::of(1u8..=5),
        proptest::option::of(1u8..=10),
        proptest::option::of(0u32..=12),
        subsequence(EQUIPMENT.to_vec(), 0..=2),
        any::<bool>(),
        proptest::collection::vec(any::<bool>(), BODY_PARTS.len()),
        0i32..10,
        proptest::option::of(1u8..=5),
    )
        .prop_map(
            |(intensity, difficulty, duration, equipment, cooldown, mapped_to, priority, hard_from_pain)| TemplateShape {
                intensity,
                difficulty,
                duration,
                equipment,
                cooldown,
                mapped_to,
                priority,
                hard_from_pain,
            },
        )
}

fn body_part_id(index: usize) -> Uuid {
    Uuid::from_u128(0xA000 + index as u128)
}

fn build_catalog(shapes: &[TemplateShape]) -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    for (index, name) in BODY_PARTS.iter().enumerate() {
        catalog = catalog.with_body_part(body_part_id(index), *name);
    }

    for (n, shape) in shapes.iter().enumerate() {
        let id = Uuid::from_u128(0xF000 + n as u128);
        let mut template = ExerciseTemplate::new(id, format!("exercise-{}", n)).equipment(shape.equipment.clone());
        template.intensity_level = shape.intensity;
        template.difficulty_score = shape.difficulty;
        template.duration_minutes = shape.duration;
        if shape.cooldown {
            template = template.cooldown();
        }
        catalog = catalog.with_template(template);

        for (index, mapped) in shape.mapped_to.iter().enumerate() {
            if *mapped {
                catalog = catalog.with_mapping(BodyPartExerciseMapping::new(body_part_id(index), id, shape.priority));
            }
        }
        if let Some(pain) = shape.hard_from_pain {
            catalog = catalog.with_contraindication(
                Contraindication::new(body_part_id(0), id, Severity::Hard).from_pain_level(pain),
            );
        }
    }

    catalog
}

fn compose(catalog: InMemoryCatalog, request: CourseRequest) -> CourseResponse {
    let composer = CourseComposerService::new(Arc::new(catalog));
    tokio_test::block_on(composer.compose(request)).expect("valid request composes")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn composed_course_respects_invariants(
        shapes in proptest::collection::vec(template_shape(), 0..14),
        pains in proptest::collection::vec(1u8..=5, 1..=BODY_PARTS.len()),
        pain_level in 1u8..=5,
        equipment in subsequence(EQUIPMENT.to_vec(), 0..=3),
        experience in select(vec![None, Some("beginner"), Some("intermediate"), Some("advanced"), Some("weekly_1_2")]),
        duration in select(vec![60u32, 90, 120]),
    ) {
        let selections: Vec<BodyPartSelection> = pains
            .iter()
            .enumerate()
            .map(|(index, pain)| BodyPartSelection::new(body_part_id(index), BODY_PARTS[index], *pain))
            .collect();
        let mut request = CourseRequest::new(selections, pain_level)
            .with_equipment(equipment.iter().copied())
            .with_duration(duration);
        request.experience_level = experience.map(str::to_string);

        let catalog = build_catalog(&shapes);
        let course = compose(catalog.clone(), request.clone());

        // equipment
        for exercise in &course.exercises {
            let required = &exercise.required_equipment;
            if required.iter().any(|item| is_bodyweight(item)) {
                continue;
            }
            for item in required {
                prop_assert!(equipment.iter().any(|e| *e == item.as_str()), "{} needs {}", exercise.name, item);
            }
        }

        // difficulty range and pain ceiling
        let ceiling = pains.iter().copied().fold(pain_level, u8::max);
        for exercise in &course.exercises {
            let score = exercise.difficulty_score.unwrap_or(5);
            prop_assert!(course.difficulty.allowed_range.contains(score));
            if ceiling == 5 {
                prop_assert_eq!(exercise.tier, DifficultyTier::Principle);
            }
        }

        // one entry per template
        let unique: HashSet<Uuid> = course.exercises.iter().map(|e| e.exercise_template_id).collect();
        prop_assert_eq!(unique.len(), course.exercises.len());

        // time budgets
        let mut total = 0;
        for section in Section::ALL {
            let minutes: u32 = course.section(section).map(|e| e.duration_minutes.unwrap_or(0)).sum();
            let time = course.sections.get(section);
            prop_assert_eq!(minutes, time.allotted_minutes);
            prop_assert!(time.allotted_minutes <= time.budget_minutes);
            total += minutes;
        }
        prop_assert_eq!(total, course.total_duration_minutes);
        prop_assert!(course.total_duration_minutes <= duration);

        // determinism
        let again = compose(catalog, request);
        prop_assert_eq!(
            serde_json::to_string(&course).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }
}
