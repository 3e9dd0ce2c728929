//! Participant pools for tests.
//!
//! Ids follow the `P001`, `P002`, ... convention so tests can refer to
//! participants by position.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use teamforge_core::{Participant, Role};

/// Preference groups drawn from by [`seeded_pool`].
pub const GROUPS: [&str; 5] = ["FIFA", "CS:GO", "DOTA 2", "Valorant", "Basketball"];

/// Builds a participant with a derived name and contact.
///
/// # Panics
///
/// Panics if any field is out of range.
pub fn participant(id: &str, group: &str, skill: u8, role: Role, score: u8) -> Participant {
    Participant::new(
        id,
        format!("Player {id}"),
        format!("{}@uni.edu", id.to_lowercase()),
        group,
        skill,
        role,
        score,
    )
    .unwrap_or_else(|e| panic!("invalid fixture participant {id}: {e}"))
}

/// `n` random participants, reproducible for a given `seed`.
///
/// Skill levels span 1..=10 and trait scores 50..=100, so every trait type
/// shows up in pools of moderate size.
pub fn seeded_pool(n: usize, seed: u64) -> Vec<Participant> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (1..=n)
        .map(|i| {
            let group = GROUPS.choose(&mut rng).copied().unwrap_or(GROUPS[0]);
            let role = Role::ALL.choose(&mut rng).copied().unwrap_or(Role::Strategist);
            let skill = rng.random_range(1..=10);
            let score = rng.random_range(50..=100);
            participant(&format!("P{i:03}"), group, skill, role, score)
        })
        .collect()
}

/// `n` identical Balanced Attackers from one group.
pub fn homogeneous_pool(n: usize) -> Vec<Participant> {
    (1..=n)
        .map(|i| participant(&format!("P{i:03}"), "FIFA", 5, Role::Attacker, 80))
        .collect()
}
