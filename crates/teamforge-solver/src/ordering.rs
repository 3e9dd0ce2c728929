//! Ordering stage applied to the participant pool before placement.
//!
//! The order seeds every phase's iteration, so it materially affects which
//! team each participant lands in.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;
use teamforge_config::OrderingStrategy;
use teamforge_core::Participant;

/// Returns the participants in the working order for `strategy`.
///
/// - `Deterministic`: stable sort by trait type (Leader first), then skill
///   descending. The RNG is not consulted.
/// - `Shuffled`: random shuffle followed by a stable skill-descending sort,
///   so equal-skill participants appear in random relative order.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use teamforge_config::OrderingStrategy;
/// use teamforge_core::{Participant, Role};
/// use teamforge_solver::ordering::order_participants;
///
/// let pool = vec![
///     Participant::new("P001", "A", "a@x", "FIFA", 3, Role::Attacker, 60).unwrap(),
///     Participant::new("P002", "B", "b@x", "FIFA", 9, Role::Defender, 95).unwrap(),
/// ];
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let ordered = order_participants(&pool, OrderingStrategy::Deterministic, &mut rng);
/// assert_eq!(ordered[0].id(), "P002");
/// ```
pub fn order_participants<R: Rng + ?Sized>(
    participants: &[Participant],
    strategy: OrderingStrategy,
    rng: &mut R,
) -> Vec<Participant> {
    let mut ordered = participants.to_vec();
    match strategy {
        OrderingStrategy::Deterministic => {
            ordered.sort_by_key(|p| (p.trait_type(), Reverse(p.skill_level())));
        }
        OrderingStrategy::Shuffled => {
            ordered.shuffle(rng);
            ordered.sort_by_key(|p| Reverse(p.skill_level()));
        }
    }
    ordered
}
