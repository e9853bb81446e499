use std::collections::HashSet;

use super::candidate_pool::Candidate;

/// Equipment names that mean "no equipment required"
pub const BODYWEIGHT_ALIASES: [&str; 4] = ["none", "없음", "맨몸", "bodyweight"];

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn is_bodyweight(name: &str) -> bool {
    let normalized = normalize(name);
    BODYWEIGHT_ALIASES.iter().any(|alias| *alias == normalized)
}

/// Equipment the user has at hand, compared case-insensitively
#[derive(Debug, Clone, Default)]
pub struct AvailableEquipment {
    names: HashSet<String>,
}

impl AvailableEquipment {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| normalize(name.as_ref()))
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.contains(&normalize(name))
    }

    /// A bodyweight entry makes the whole list optional; otherwise every
    /// entry must be available
    pub fn satisfies(&self, required: &[String]) -> bool {
        if required.iter().any(|name| is_bodyweight(name)) {
            return true;
        }
        required.iter().all(|name| self.has(name))
    }
}

/// Drop candidates needing equipment the user does not have. Silent.
pub fn filter_by_equipment(candidates: Vec<Candidate>, available: &AvailableEquipment) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|candidate| available.satisfies(&candidate.template.required_equipment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bodyweight_always_passes() {
        let nothing = AvailableEquipment::default();
        assert!(nothing.satisfies(&names(&["none"])));
        assert!(nothing.satisfies(&names(&["없음"])));
        assert!(nothing.satisfies(&names(&["맨몸"])));
        assert!(nothing.satisfies(&[]));
    }

    #[test]
    fn test_bodyweight_entry_makes_other_entries_optional() {
        let dumbbell = AvailableEquipment::new(["덤벨"]);
        assert!(dumbbell.satisfies(&names(&["none", "mat"])));
        assert!(dumbbell.satisfies(&names(&["없음", "매트"])));
        assert!(AvailableEquipment::default().satisfies(&names(&["매트", "맨몸"])));

        assert!(!dumbbell.satisfies(&names(&["매트"])));
    }

    #[test]
    fn test_missing_equipment_excluded() {
        let dumbbell = AvailableEquipment::new(["덤벨"]);
        assert!(!dumbbell.satisfies(&names(&["바벨"])));
        assert!(dumbbell.satisfies(&names(&["덤벨"])));
        assert!(!dumbbell.satisfies(&names(&["덤벨", "벤치"])));
    }
}
