//! Loading game configurations from JSON files.

use delve::{config, DelveError, DelveResult, GameState, GenerationConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_full_config_file() -> DelveResult<()> {
    let file = write_config(
        r#"{
            "seed": 99,
            "rows": 7,
            "columns": 9,
            "wrapping": true,
            "interconnectivity": 5,
            "treasure_percent": 50,
            "monsters": 4,
            "thieves": 2,
            "pits": 2,
            "min_path_length": 4,
            "rules": {
                "starting_arrows": 5,
                "pit_fall_chance": 0.75,
                "monster_kill_chance": 0.25,
                "thief_cooldown_ms": 2000
            }
        }"#,
    );

    let config = GenerationConfig::from_json_file(file.path())?;
    assert_eq!(config.seed, 99);
    assert_eq!((config.rows, config.columns), (7, 9));
    assert!(config.wrapping);
    assert_eq!(config.monsters, 4);
    assert_eq!(config.rules.starting_arrows, 5);
    assert_eq!(config.rules.thief_cooldown_ms, 2000);

    let game = GameState::new(config)?;
    assert_eq!(game.player().arrows(), 5);
    assert_eq!(game.dungeon().len(), 63);
    Ok(())
}

#[test]
fn test_missing_fields_take_defaults() -> DelveResult<()> {
    let file = write_config(r#"{ "seed": 5, "rules": { "starting_arrows": 1 } }"#);
    let config = GenerationConfig::from_json_file(file.path())?;

    assert_eq!(config.seed, 5);
    assert_eq!(config.rows, config::DEFAULT_ROWS);
    assert_eq!(config.columns, config::DEFAULT_COLUMNS);
    assert_eq!(config.min_path_length, config::MIN_PATH_LENGTH);
    assert_eq!(config.rules.starting_arrows, 1);
    assert_eq!(
        config.rules.monster_kill_chance,
        config::DEFAULT_MONSTER_KILL_CHANCE
    );
    Ok(())
}

#[test]
fn test_config_round_trips_through_json() -> DelveResult<()> {
    let original = GenerationConfig::new(1234);
    let file = write_config(&serde_json::to_string_pretty(&original)?);
    assert_eq!(GenerationConfig::from_json_file(file.path())?, original);
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() {
    let file = write_config(r#"{ "rows": 3 }"#);
    assert!(matches!(
        GenerationConfig::from_json_file(file.path()),
        Err(DelveError::InvalidConfig(_))
    ));

    let file = write_config(r#"{ "rules": { "monster_kill_chance": 1.5 } }"#);
    assert!(matches!(
        GenerationConfig::from_json_file(file.path()),
        Err(DelveError::InvalidConfig(_))
    ));

    let file = write_config(r#"{ "monsters": 0 }"#);
    assert!(matches!(
        GenerationConfig::from_json_file(file.path()),
        Err(DelveError::InvalidConfig(_))
    ));
}

#[test]
fn test_malformed_and_missing_files() {
    let file = write_config("{ rows: ");
    let result = GenerationConfig::from_json_file(file.path());
    assert!(matches!(result, Err(DelveError::Serde(_))));

    let file = write_config(r#"{ "rows": -6 }"#);
    let result = GenerationConfig::from_json_file(file.path());
    assert!(matches!(result, Err(DelveError::Serde(_))));

    let dir = tempfile::tempdir().unwrap();
    let result = GenerationConfig::from_json_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(DelveError::Io(_))));
}

#[test]
fn test_oversized_grids_are_rejected() {
    let file = write_config(r#"{ "rows": 18446744073709551615 }"#);
    assert!(matches!(
        GenerationConfig::from_json_file(file.path()),
        Err(DelveError::InvalidConfig(_))
    ));

    let huge = r#"{ "rows": 1000000, "columns": 1000000, "wrapping": true }"#;
    assert!(matches!(
        GenerationConfig::from_json_str(huge),
        Err(DelveError::InvalidConfig(_))
    ));

    let mut config = GenerationConfig::new(1);
    config.columns = config::MAX_GRID_DIMENSION + 1;
    assert!(matches!(
        GameState::new(config),
        Err(DelveError::InvalidConfig(_))
    ));
}
