//! Tests for solver configuration.

use super::*;

#[test]
fn test_defaults() {
    let config = SolverConfig::default();

    assert_eq!(config.environment_mode, EnvironmentMode::NonReproducible);
    assert_eq!(config.random_seed, None);
    assert_eq!(config.time_limit(), Duration::from_secs(200));
    assert_eq!(config.construction.passes, 5);
    assert_eq!(
        config.phase_time_limit(SearchPhase::Feasibility),
        Duration::from_secs(60)
    );
    assert_eq!(
        config.phase_time_limit(SearchPhase::Improvement),
        Duration::from_secs(30)
    );
    assert_eq!(
        config.sample_interval(SearchPhase::Feasibility),
        Duration::from_secs(5)
    );
    assert_eq!(
        config.sample_interval(SearchPhase::Improvement),
        Duration::from_secs(10)
    );
    assert_eq!(
        config.feasibility.acceptor,
        AcceptorConfig::TabuSearch(TabuSearchConfig { tabu_length: 300 })
    );
    assert_eq!(config.weights, PenaltyWeights::UD2);
    assert!(config.incremental_scoring);
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "full_assert"
        random_seed = 42
        incremental_scoring = false

        [termination]
        seconds_spent_limit = 30

        [construction]
        passes = 2

        [feasibility]
        seconds_spent_limit = 20
        [feasibility.acceptor]
        type = "simulated_annealing"
        starting_temperature = 8.0
        cooling_steps = 20

        [improvement]
        enabled = false

        [weights]
        min_working_days = 3
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.random_seed, Some(42));
    assert!(!config.incremental_scoring);
    assert_eq!(config.time_limit(), Duration::from_secs(30));
    assert_eq!(config.construction.passes, 2);
    assert_eq!(
        config.phase_time_limit(SearchPhase::Feasibility),
        Duration::from_secs(20)
    );
    assert_eq!(
        config.feasibility.acceptor,
        AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
            starting_temperature: 8.0,
            minimum_temperature: 1.3,
            cooling_steps: 20,
            reheat_after: 10,
        })
    );
    assert!(!config.improvement.enabled);
    assert_eq!(
        config.phase_time_limit(SearchPhase::Improvement),
        Duration::from_secs(30)
    );
    assert_eq!(config.weights.min_working_days, 3);
    assert_eq!(config.weights.isolated_lectures, 2);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: reproducible
        random_seed: 42
        termination:
          minutes_spent_limit: 2
        improvement:
          acceptor:
            type: tabu_search
            tabu_length: 50
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.time_limit(), Duration::from_secs(120));
    assert_eq!(
        config.improvement.acceptor,
        AcceptorConfig::TabuSearch(TabuSearchConfig { tabu_length: 50 })
    );
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_random_seed(123)
        .with_termination_millis(500)
        .with_construction_passes(1)
        .with_phase_enabled(SearchPhase::Improvement, false)
        .with_improvement_acceptor(AcceptorConfig::SimulatedAnnealing(
            SimulatedAnnealingConfig::default(),
        ));

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Duration::from_millis(500));
    assert_eq!(config.construction.passes, 1);
    assert!(!config.improvement.enabled);
    assert_eq!(config.improvement.acceptor.short_name(), "SA");
    config.validate().unwrap();
}

#[test]
fn test_invalid_values_rejected() {
    let bad_temperatures = r#"
        [feasibility.acceptor]
        type = "simulated_annealing"
        starting_temperature = 1.0
        minimum_temperature = 2.0
    "#;
    assert!(matches!(
        SolverConfig::from_toml_str(bad_temperatures),
        Err(ConfigError::Invalid(_))
    ));

    let zero_tabu = r#"
        [improvement.acceptor]
        type = "tabu_search"
        tabu_length = 0
    "#;
    assert!(matches!(
        SolverConfig::from_toml_str(zero_tabu),
        Err(ConfigError::Invalid(_))
    ));

    let zero_passes = SolverConfig::new().with_construction_passes(0);
    assert!(zero_passes.validate().is_err());
}

#[test]
fn test_unknown_acceptor_type_is_parse_error() {
    let toml = r#"
        [feasibility.acceptor]
        type = "great_deluge"
    "#;
    assert!(matches!(
        SolverConfig::from_toml_str(toml),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_load_picks_format_from_extension() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("solver.toml");
    std::fs::write(&toml_path, "random_seed = 1\n").unwrap();
    assert_eq!(SolverConfig::load(&toml_path).unwrap().random_seed, Some(1));

    let yaml_path = dir.path().join("solver.yaml");
    std::fs::write(&yaml_path, "random_seed: 2\n").unwrap();
    assert_eq!(SolverConfig::load(&yaml_path).unwrap().random_seed, Some(2));

    assert!(matches!(
        SolverConfig::load(dir.path().join("missing.toml")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_seed_follows_environment_mode() {
    assert_eq!(SolverConfig::default().seed(), None);
    assert_eq!(SolverConfig::new().with_random_seed(9).seed(), Some(9));
    assert_eq!(
        SolverConfig::new()
            .with_environment_mode(EnvironmentMode::Reproducible)
            .seed(),
        Some(0)
    );
}

#[test]
fn test_huge_time_limit_saturates() {
    let config = SolverConfig::new().with_termination_seconds(u64::MAX / 100);
    assert_eq!(config.time_limit(), Duration::from_secs(u64::MAX / 100));

    let termination = TerminationConfig {
        seconds_spent_limit: Some(u64::MAX),
        minutes_spent_limit: Some(u64::MAX),
        millis_spent_limit: Some(u64::MAX),
    };
    assert_eq!(termination.time_limit(), Some(Duration::MAX));

    let parts = TerminationConfig {
        seconds_spent_limit: Some(1),
        minutes_spent_limit: Some(2),
        millis_spent_limit: Some(500),
    };
    assert_eq!(parts.time_limit(), Some(Duration::from_millis(121_500)));
}
