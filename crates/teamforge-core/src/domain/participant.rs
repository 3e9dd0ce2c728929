//! Participant entity.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::{Role, TraitType};
use crate::error::{Result, TeamForgeError};

/// Lowest accepted skill level.
pub const MIN_SKILL_LEVEL: u8 = 1;

/// Highest accepted skill level.
pub const MAX_SKILL_LEVEL: u8 = 10;

/// An individually profiled entity to be placed into exactly one team.
///
/// Identity is the `id` alone: two participants with the same id compare
/// equal and hash identically regardless of their other attributes.
/// The trait type is always derived from the trait score; the only way to
/// change the score is [`Participant::set_trait_score`], which re-derives it.
///
/// # Examples
///
/// ```
/// use teamforge_core::{Participant, Role, TraitType};
///
/// let mut p = Participant::new("P001", "Ada", "ada@uni.edu", "Chess", 7, Role::Strategist, 85)
///     .unwrap();
/// assert_eq!(p.trait_type(), TraitType::Balanced);
///
/// p.set_trait_score(95).unwrap();
/// assert_eq!(p.trait_type(), TraitType::Leader);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Participant {
    id: String,
    name: String,
    contact: String,
    preference_group: String,
    skill_level: u8,
    role: Role,
    trait_score: u8,
    trait_type: TraitType,
}

impl Participant {
    /// Creates a validated participant.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParticipant` if the id is blank, the skill level is
    /// outside 1..=10, or the trait score is outside 50..=100.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        contact: impl Into<String>,
        preference_group: impl Into<String>,
        skill_level: u8,
        role: Role,
        trait_score: u8,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TeamForgeError::InvalidParticipant(
                "id cannot be empty".to_string(),
            ));
        }
        check_skill_level(skill_level)?;
        let trait_type = TraitType::classify(trait_score)?;

        Ok(Self {
            id,
            name: name.into(),
            contact: contact.into(),
            preference_group: preference_group.into(),
            skill_level,
            role,
            trait_score,
            trait_type,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn preference_group(&self) -> &str {
        &self.preference_group
    }

    pub fn skill_level(&self) -> u8 {
        self.skill_level
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn trait_score(&self) -> u8 {
        self.trait_score
    }

    pub fn trait_type(&self) -> TraitType {
        self.trait_type
    }

    /// Returns true for TypeA participants, who are never swapped by the
    /// post-allocation passes.
    pub fn is_leader(&self) -> bool {
        self.trait_type == TraitType::Leader
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_contact(&mut self, contact: impl Into<String>) {
        self.contact = contact.into();
    }

    pub fn set_preference_group(&mut self, group: impl Into<String>) {
        self.preference_group = group.into();
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Updates the skill level, rejecting values outside 1..=10.
    pub fn set_skill_level(&mut self, skill_level: u8) -> Result<()> {
        check_skill_level(skill_level)?;
        self.skill_level = skill_level;
        Ok(())
    }

    /// Updates the trait score and re-derives the trait type.
    ///
    /// On error the participant is left unchanged.
    pub fn set_trait_score(&mut self, trait_score: u8) -> Result<()> {
        self.trait_type = TraitType::classify(trait_score)?;
        self.trait_score = trait_score;
        Ok(())
    }
}

fn check_skill_level(skill_level: u8) -> Result<()> {
    if (MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&skill_level) {
        Ok(())
    } else {
        Err(TeamForgeError::InvalidParticipant(format!(
            "skill level {skill_level} must be between {MIN_SKILL_LEVEL} and {MAX_SKILL_LEVEL}"
        )))
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Participant[id={}, name={}, group={}, skill={}, role={}, trait={}({})]",
            self.id,
            self.name,
            self.preference_group,
            self.skill_level,
            self.role,
            self.trait_type,
            self.trait_score
        )
    }
}
