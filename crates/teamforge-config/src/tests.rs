//! Tests for allocator configuration.

use super::*;

#[test]
fn test_defaults() {
    let config = AllocatorConfig::default();
    assert_eq!(config.ordering, OrderingStrategy::Deterministic);
    assert_eq!(config.worker_count, 3);
    assert_eq!(config.time_limit(), Duration::from_secs(30));
    assert_eq!(config.termination.shutdown_grace(), Duration::from_secs(5));
    assert_eq!(config.scoring.group_cap, 2);
    assert_eq!(config.scoring.group_penalty, 50);
    assert_eq!(config.repair.min_role_diversity, 3);
    assert!(config.balancing.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        ordering = "shuffled"
        random_seed = 42
        worker_count = 4
        randomize_leader_offset = true

        [termination]
        seconds_spent_limit = 10

        [scoring]
        group_cap = 3
        group_penalty = 40
        role_bonus = 25

        [balancing]
        threshold = 1.0

        [repair]
        enabled = false
    "#;

    let config = AllocatorConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.ordering, OrderingStrategy::Shuffled);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.worker_count, 4);
    assert!(config.randomize_leader_offset);
    assert_eq!(config.termination.seconds_spent_limit, 10);
    // Unspecified nested keys keep their defaults.
    assert_eq!(config.termination.shutdown_grace_millis, 5_000);
    assert_eq!(config.scoring.group_cap, 3);
    assert_eq!(config.scoring.leader_bonus, 40);
    assert!((config.balancing.threshold - 1.0).abs() < f64::EPSILON);
    assert!(!config.repair.enabled);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        ordering: deterministic
        random_seed: 42
        termination:
          seconds_spent_limit: 15
        scoring:
          jitter: 3
    "#;

    let config = AllocatorConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.ordering, OrderingStrategy::Deterministic);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.time_limit(), Duration::from_secs(15));
    assert_eq!(config.scoring.effective_jitter(), 3);
}

#[test]
fn test_empty_document_is_default() {
    let config = AllocatorConfig::from_toml_str("").unwrap();
    assert_eq!(config.worker_count, DEFAULT_WORKER_COUNT);
    assert_eq!(config.ordering, OrderingStrategy::Deterministic);
}

#[test]
fn test_invalid_values_rejected() {
    assert!(matches!(
        AllocatorConfig::from_toml_str("worker_count = 0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        AllocatorConfig::from_toml_str("[termination]\nseconds_spent_limit = 0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        AllocatorConfig::from_toml_str("[scoring]\ngroup_cap = 0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        AllocatorConfig::from_toml_str("ordering = \"alphabetical\""),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_missing_file() {
    let result = AllocatorConfig::load("/nonexistent/teamforge.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_jitter_clamped() {
    let scoring = ScoringConfig {
        jitter: 50,
        ..ScoringConfig::default()
    };
    assert_eq!(scoring.effective_jitter(), MAX_JITTER);
}

#[test]
fn test_builder() {
    let config = AllocatorConfig::new()
        .with_random_seed(123)
        .with_termination_seconds(60)
        .with_ordering(OrderingStrategy::Shuffled)
        .with_worker_count(2)
        .with_randomized_leader_offset(true);

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Duration::from_secs(60));
    assert_eq!(config.ordering, OrderingStrategy::Shuffled);
    assert_eq!(config.worker_count, 2);
    assert!(config.randomize_leader_offset);
}

#[test]
fn test_skill_weight_and_diversity_rejected() {
    assert!(matches!(
        AllocatorConfig::from_toml_str("[scoring]\nskill_weight = -1.0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        AllocatorConfig::from_toml_str("[scoring]\nskill_weight = nan"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        AllocatorConfig::from_toml_str("[repair]\nmin_role_diversity = 0"),
        Err(ConfigError::Invalid(_))
    ));

    let config = AllocatorConfig::new().with_scoring(ScoringConfig {
        skill_weight: f64::INFINITY,
        ..ScoringConfig::default()
    });
    assert!(config.validate().is_err());

    let config = AllocatorConfig::new().with_scoring(ScoringConfig {
        skill_weight: 0.0,
        ..ScoringConfig::default()
    });
    assert!(config.validate().is_ok());
}
