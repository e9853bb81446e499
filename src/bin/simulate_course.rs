use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;

use rehab_course_composer::config::demo_catalog;
use rehab_course_composer::models::{
    BodyPartSelection, Condition, CourseRequest, CourseResponse, RehabPhase, Section,
};
use rehab_course_composer::services::CourseComposerService;

#[derive(Parser)]
#[command(name = "simulate-course")]
#[command(about = "Compose a rehabilitation course against the demo catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Body part and its pain level, e.g. 허리:4 (repeatable)
    #[arg(short, long = "body-part", value_name = "NAME:PAIN", value_parser = parse_body_part, required = true)]
    body_parts: Vec<(String, u8)>,

    /// Overall pain level (defaults to the highest body-part pain)
    #[arg(short, long)]
    pain: Option<u8>,

    /// Available equipment, comma separated
    #[arg(short, long, value_delimiter = ',')]
    equipment: Vec<String>,

    /// Experience level (beginner, intermediate, advanced or a form answer)
    #[arg(short = 'x', long)]
    experience: Option<String>,

    /// Session length in minutes: 60, 90 or 120
    #[arg(short, long)]
    duration: Option<u32>,

    /// Injury condition: acute, chronic or post_surgical
    #[arg(long)]
    condition: Option<Condition>,

    /// Rehab phase: initial, recovery or strengthening
    #[arg(long)]
    phase: Option<RehabPhase>,

    /// Fitness level 1-5, used with --phase
    #[arg(long)]
    fitness: Option<u8>,

    /// Print the raw JSON response
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_body_part(value: &str) -> Result<(String, u8), String> {
    let (name, pain) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:PAIN, got '{}'", value))?;
    let pain = pain
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("invalid pain level in '{}'", value))?;
    Ok((name.trim().to_string(), pain))
}

fn build_request(cli: &Cli) -> Result<CourseRequest> {
    let catalog = demo_catalog();

    let mut selections = Vec::new();
    for (index, (name, pain)) in cli.body_parts.iter().enumerate() {
        let body_part = catalog.body_part_by_name(name).ok_or_else(|| {
            let known: Vec<_> = catalog.body_parts().map(|bp| bp.name.as_str()).collect();
            anyhow!("Unknown body part '{}'; the demo catalog knows {}", name, known.join(", "))
        })?;
        selections.push(
            BodyPartSelection::new(body_part.id, body_part.name.clone(), *pain)
                .with_selection_order(index as u32 + 1),
        );
    }

    let pain = cli
        .pain
        .unwrap_or_else(|| selections.iter().map(|s| s.pain_level).max().unwrap_or(1));

    let mut request = CourseRequest::new(selections, pain).with_equipment(cli.equipment.iter().cloned());
    request.experience_level = cli.experience.clone();
    request.total_duration_minutes = cli.duration;
    request.condition = cli.condition;
    if let Some(phase) = cli.phase {
        request = request.with_rehab_phase(phase, cli.fitness);
    }

    Ok(request)
}

fn print_course(course: &CourseResponse) {
    println!(
        "🏋️  {} exercises, {} minutes ({} tier, difficulty {}-{})",
        course.exercises.len(),
        course.total_duration_minutes,
        course.difficulty.target_level,
        course.difficulty.allowed_range.min,
        course.difficulty.allowed_range.max
    );

    for section in Section::ALL {
        let time = course.sections.get(section);
        println!();
        println!("== {} ({}/{} min) ==", section, time.allotted_minutes, time.budget_minutes);
        for exercise in course.section(section) {
            println!(
                "  {}. {} [{}] {} min{}",
                exercise.order_in_section,
                exercise.name,
                exercise.tier.label(),
                exercise.duration_minutes.unwrap_or(0),
                match (exercise.sets, exercise.reps) {
                    (Some(sets), Some(reps)) => format!(", {}x{}", sets, reps),
                    _ => String::new(),
                }
            );
            for caution in &exercise.cautions {
                println!("     ⚠️  {}", caution);
            }
        }
    }

    if !course.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &course.warnings {
            println!("  - {}", warning);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    rehab_course_composer::init_tracing(if cli.verbose { "debug" } else { "warn" });

    let request = build_request(&cli)?;
    let composer = CourseComposerService::new(Arc::new(demo_catalog()));

    let course = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { composer.compose(request).await })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&course)?);
    } else {
        print_course(&course);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_part() {
        assert_eq!(parse_body_part("허리:4"), Ok(("허리".to_string(), 4)));
        assert!(parse_body_part("허리").is_err());
        assert!(parse_body_part("허리:high").is_err());
    }

    #[test]
    fn test_build_request_defaults_pain_to_highest() {
        let cli = Cli::parse_from(["simulate-course", "-b", "허리:2", "-b", "무릎:4", "-e", "매트,덤벨"]);
        let request = build_request(&cli).unwrap();
        assert_eq!(request.pain_level, 4);
        assert_eq!(request.body_parts.len(), 2);
        assert_eq!(request.equipment_available, vec!["매트".to_string(), "덤벨".to_string()]);
    }

    #[test]
    fn test_unknown_body_part() {
        let cli = Cli::parse_from(["simulate-course", "-b", "꼬리:2"]);
        assert!(build_request(&cli).is_err());
    }
}
