use futures::future::try_join_all;
use tracing::debug;
use uuid::Uuid;

use super::candidate_pool::Candidate;
use crate::catalog::{CatalogError, CatalogReader};
use crate::models::{Condition, Contraindication, Severity, Substitution};

const DEFAULT_EXCLUSION_REASON: &str = "Not recommended in the current condition";
const DEFAULT_CAUTION_REASON: &str = "Perform with care";

/// Highest difficulty score a substitute may have at this pain level
pub fn conservative_difficulty(pain_level: u8) -> u8 {
    3u8.saturating_sub(pain_level / 2).max(1)
}

/// Decision for one candidate given its matching contraindications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Caution(Vec<String>),
    Exclude(String),
}

fn reason_or(rule: &Contraindication, fallback: &str) -> String {
    rule.reason
        .as_deref()
        .filter(|reason| !reason.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Whether a hard rule keeps its force for a user with `condition`.
///
/// Only a known rule condition that differs from a known user condition
/// downgrades the rule.
fn hard_rule_applies(rule: &Contraindication, condition: Option<Condition>) -> bool {
    match (rule.condition, condition) {
        (Some(required), Some(actual)) => required == actual,
        _ => true,
    }
}

/// Evaluate the contraindications matching one (template, body part) pair
pub fn evaluate(rules: &[Contraindication], condition: Option<Condition>) -> Verdict {
    if let Some(rule) = rules
        .iter()
        .find(|rule| rule.severity == Severity::Hard && hard_rule_applies(rule, condition))
    {
        return Verdict::Exclude(reason_or(rule, DEFAULT_EXCLUSION_REASON));
    }

    let mut cautions: Vec<String> = Vec::new();
    for rule in rules {
        let reason = reason_or(rule, DEFAULT_CAUTION_REASON);
        if !cautions.contains(&reason) {
            cautions.push(reason);
        }
    }

    if cautions.is_empty() {
        Verdict::Allow
    } else {
        Verdict::Caution(cautions)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContraindicationOutcome {
    pub kept: Vec<Candidate>,
    pub substitutions: Vec<Substitution>,
    pub warnings: Vec<String>,
}

/// Pain-range gate plus contraindication screening.
///
/// Drops candidates whose mapping does not admit the body part's pain level,
/// removes hard matches and records a substitution for each, and keeps soft
/// matches with their reasons attached as cautions. Substitutes are looked up
/// only when the body part has no conservative candidate left.
pub async fn apply_contraindications(
    catalog: &dyn CatalogReader,
    candidates: Vec<Candidate>,
    condition: Option<Condition>,
) -> Result<ContraindicationOutcome, CatalogError> {
    let gated: Vec<Candidate> = candidates
        .into_iter()
        .filter(|candidate| {
            candidate
                .mapping
                .pain_level_range
                .map_or(true, |range| range.admits(candidate.pain_level))
        })
        .collect();

    let lookups = gated.iter().map(|candidate| {
        catalog.fetch_contraindications(candidate.template_id(), candidate.body_part_id(), candidate.pain_level)
    });
    let rule_sets = try_join_all(lookups).await?;

    let mut outcome = ContraindicationOutcome::default();
    let mut excluded: Vec<(Candidate, String)> = Vec::new();

    for (mut candidate, rules) in gated.into_iter().zip(rule_sets) {
        match evaluate(&rules, condition) {
            Verdict::Allow => outcome.kept.push(candidate),
            Verdict::Caution(reasons) => {
                for reason in &reasons {
                    outcome.warnings.push(format!(
                        "Caution: {} ({}): {}",
                        candidate.template.name, candidate.body_part.name, reason
                    ));
                }
                candidate.cautions = reasons;
                outcome.kept.push(candidate);
            }
            Verdict::Exclude(reason) => excluded.push((candidate, reason)),
        }
    }

    let alternative_lookups = excluded.iter().map(|(candidate, _)| {
        let ceiling = conservative_difficulty(candidate.pain_level);
        let covered = has_conservative_candidate(&outcome.kept, candidate.body_part_id(), ceiling);
        async move {
            if covered {
                Ok(Vec::new())
            } else {
                catalog
                    .fetch_alternatives(candidate.template_id(), candidate.body_part_id(), ceiling)
                    .await
            }
        }
    });
    let alternatives = try_join_all(alternative_lookups).await?;

    for ((candidate, reason), alternative_template_ids) in excluded.into_iter().zip(alternatives) {
        outcome.warnings.push(format!(
            "{} was excluded for {}: {}",
            candidate.template.name, candidate.body_part.name, reason
        ));
        outcome.substitutions.push(Substitution {
            excluded_template_id: candidate.template_id(),
            excluded_template_name: candidate.template.name,
            body_part_id: candidate.body_part.id,
            reason,
            alternative_template_ids,
        });
    }

    debug!(
        "Contraindication screening kept {} candidates, excluded {}",
        outcome.kept.len(),
        outcome.substitutions.len()
    );

    Ok(outcome)
}

fn has_conservative_candidate(kept: &[Candidate], body_part_id: Uuid, ceiling: u8) -> bool {
    kept.iter().any(|candidate| {
        candidate.body_part_id() == body_part_id
            && candidate
                .template
                .difficulty_score
                .is_some_and(|score| score <= ceiling)
    })
}
