//! Deterministic people and project names for demo data.

use crate::rng::SeededRng;

const FIRST_NAMES: &[&str] = &[
    "Avery", "Blake", "Camila", "Dev", "Elena", "Farah", "Gabriel", "Hana", "Ibrahim",
    "Jonas", "Keiko", "Liam", "Maya", "Nikhil", "Olivia", "Pablo", "Quinn", "Rosa",
    "Sven", "Tariq", "Uma", "Victor", "Wen", "Ximena", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abara", "Berg", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia", "Haddad",
    "Ito", "Jensen", "Kowalski", "Lindqvist", "Moreau", "Nakamura", "Okafor", "Patel",
    "Quintero", "Rossi", "Silva", "Tanaka", "Usman", "Varga", "Weber", "Yilmaz",
];

const PROJECT_ADJECTIVES: &[&str] = &[
    "Apollo", "Beacon", "Cobalt", "Delta", "Ember", "Falcon", "Granite", "Horizon",
    "Juniper", "Keystone", "Lumen", "Meridian", "Nimbus", "Orion", "Pioneer", "Quartz",
];

const PROJECT_NOUNS: &[&str] = &[
    "Migration", "Platform", "Portal", "Rollout", "Rebuild", "Integration", "Audit",
    "Upgrade", "Launch", "Pipeline",
];

pub struct NameGenerator;

impl NameGenerator {
    pub fn full_name(rng: &mut SeededRng) -> String {
        let first = Self::draw(rng, FIRST_NAMES);
        let last = Self::draw(rng, LAST_NAMES);
        format!("{first} {last}")
    }

    /// `first.last` lowercased, suffixed with `n` so emails stay unique.
    pub fn email(full_name: &str, n: usize) -> String {
        let local = full_name.to_lowercase().replace(' ', ".");
        format!("{local}.{n}@example.com")
    }

    pub fn project_name(rng: &mut SeededRng) -> String {
        let adjective = Self::draw(rng, PROJECT_ADJECTIVES);
        let noun = Self::draw(rng, PROJECT_NOUNS);
        format!("{adjective} {noun}")
    }

    fn draw(rng: &mut SeededRng, list: &[&'static str]) -> &'static str {
        rng.pick(list).copied().unwrap_or("Unnamed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{DataSlot, RngBank};

    #[test]
    fn same_seed_same_names() {
        let mut a = RngBank::new(12345).for_slot(DataSlot::Users);
        let mut b = RngBank::new(12345).for_slot(DataSlot::Users);
        for _ in 0..10 {
            assert_eq!(NameGenerator::full_name(&mut a), NameGenerator::full_name(&mut b));
        }
    }

    #[test]
    fn full_names_have_two_parts() {
        let mut rng = RngBank::new(1).for_slot(DataSlot::Users);
        for _ in 0..100 {
            let name = NameGenerator::full_name(&mut rng);
            assert_eq!(name.split_whitespace().count(), 2, "{name}");
        }
    }

    #[test]
    fn email_is_lowercase_and_numbered() {
        assert_eq!(NameGenerator::email("Maya Patel", 3), "maya.patel.3@example.com");
    }
}
