//! Input validation helpers shared by the allocator and its callers.

use crate::domain::MIN_TRAIT_SCORE;
use crate::error::{Result, TeamForgeError};

/// Smallest supported team capacity.
pub const MIN_CAPACITY: usize = 3;

/// Largest supported team capacity.
pub const MAX_CAPACITY: usize = 10;

/// Number of answers in a trait survey.
pub const SURVEY_QUESTIONS: usize = 5;

/// Checks the allocation preconditions for a pool of `participants`.
///
/// # Errors
///
/// - `EmptyPool` if there are no participants
/// - `InvalidCapacity` if `capacity` is outside 3..=10
/// - `InsufficientParticipants` if fewer than two full teams can be formed
pub fn validate_capacity(capacity: usize, participants: usize) -> Result<()> {
    if participants == 0 {
        return Err(TeamForgeError::EmptyPool);
    }
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
        return Err(TeamForgeError::InvalidCapacity { capacity });
    }
    if participants / capacity < 2 {
        return Err(TeamForgeError::InsufficientParticipants {
            participants,
            capacity,
        });
    }
    Ok(())
}

/// Checks a contact string has a `local@domain` shape.
pub fn is_valid_contact(contact: &str) -> bool {
    let contact = contact.trim();
    match contact.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && local
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "+_.-".contains(c))
        }
        None => false,
    }
}

/// Checks a participant id is `P` followed by at least three digits.
pub fn is_valid_participant_id(id: &str) -> bool {
    match id.strip_prefix('P') {
        Some(digits) => digits.len() >= 3 && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Trims input and strips characters unsafe for tabular export.
pub fn sanitize(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect()
}

/// Computes a trait score from five survey answers in 1..=5.
///
/// The score is the answer total scaled by four, floored at the minimum
/// trait score.
///
/// # Examples
///
/// ```
/// use teamforge_core::validation::survey_score;
///
/// assert_eq!(survey_score(&[5, 5, 5, 5, 5]).unwrap(), 100);
/// assert_eq!(survey_score(&[4, 4, 4, 5, 5]).unwrap(), 88);
/// assert_eq!(survey_score(&[1, 1, 1, 1, 1]).unwrap(), 50);
/// ```
pub fn survey_score(responses: &[u8]) -> Result<u8> {
    if responses.len() != SURVEY_QUESTIONS {
        return Err(TeamForgeError::InvalidParticipant(format!(
            "survey must have exactly {SURVEY_QUESTIONS} responses, got {}",
            responses.len()
        )));
    }
    if let Some((idx, answer)) = responses
        .iter()
        .enumerate()
        .find(|(_, a)| !(1..=5).contains(*a))
    {
        return Err(TeamForgeError::InvalidParticipant(format!(
            "response {} must be between 1 and 5, got {answer}",
            idx + 1
        )));
    }
    let total: u8 = responses.iter().sum();
    Ok((total * 4).max(MIN_TRAIT_SCORE))
}
