use std::collections::HashSet;
use validator::Validate;

use super::{CourseRequest, SaveCourseRequest, ALLOWED_SESSION_MINUTES};

/// Validate a course request before any catalog access.
///
/// Returns the human readable reason of the first failed rule.
pub fn validate_course_request(request: &CourseRequest) -> Result<(), String> {
    request.validate().map_err(|errors| describe(&errors))?;

    let mut seen = HashSet::new();
    for selection in &request.body_parts {
        if !seen.insert(selection.body_part_id) {
            return Err(format!(
                "Body part {} was selected more than once",
                selection.body_part_name
            ));
        }
    }

    for name in &request.equipment_available {
        validate_equipment_name(name)?;
    }

    if let Some(minutes) = request.total_duration_minutes {
        validate_session_minutes(minutes)?;
    }

    Ok(())
}

/// Validate a course handed to the persistence hook
pub fn validate_save_request(request: &SaveCourseRequest) -> Result<(), String> {
    validate_session_minutes(request.total_duration_minutes)?;

    if request.exercises.is_empty() {
        return Err("A saved course needs at least one exercise".to_string());
    }

    if !(1..=5).contains(&request.pain_level) {
        return Err("Pain level must be between 1 and 5".to_string());
    }

    Ok(())
}

pub fn validate_session_minutes(minutes: u32) -> Result<(), String> {
    if !ALLOWED_SESSION_MINUTES.contains(&minutes) {
        return Err(format!(
            "Total duration must be 60, 90 or 120 minutes (got {})",
            minutes
        ));
    }
    Ok(())
}

pub fn validate_equipment_name(name: &str) -> Result<(), String> {
    let length = name.trim().chars().count();
    if length == 0 {
        return Err("Equipment names cannot be empty".to_string());
    }
    if length > 50 {
        return Err("Equipment names cannot be longer than 50 characters".to_string());
    }
    Ok(())
}

/// Flatten validator output into one sentence, first message per field
fn describe(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    collect_messages(errors, &mut messages);
    messages.sort();
    messages.dedup();
    if messages.is_empty() {
        "Invalid course request".to_string()
    } else {
        messages.join("; ")
    }
}

fn collect_messages(errors: &validator::ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(error) = field_errors.first() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    out.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}
