use super::*;

#[test]
fn test_normalize_canonical_tokens() {
    assert_eq!(Direction::normalize("up").unwrap(), Direction::Up);
    assert_eq!(Direction::normalize("down").unwrap(), Direction::Down);
}

#[test]
fn test_normalize_is_case_insensitive() {
    for value in ["UP", "Up", "uP"] {
        assert_eq!(Direction::normalize(value).unwrap(), Direction::Up);
    }
    for value in ["DOWN", "Down", "dOwN"] {
        assert_eq!(Direction::normalize(value).unwrap(), Direction::Down);
    }
}

#[test]
fn test_normalize_rejects_unknown_values() {
    for value in ["", "sideways", " up", "up ", "upward", "d0wn"] {
        let err = Direction::normalize(value).unwrap_err();
        match err {
            CoreError::InvalidDirection { value: v } => assert_eq!(v, value),
            other => panic!("expected InvalidDirection, got {other:?}"),
        }
    }
}

#[test]
fn test_display_is_lowercase() {
    assert_eq!(Direction::Up.to_string(), "up");
    assert_eq!(Direction::Down.to_string(), "down");
}

#[test]
fn test_from_str_and_try_from_share_rules() {
    assert_eq!("DOWN".parse::<Direction>().unwrap(), Direction::Down);
    assert_eq!(Direction::try_from("Up").unwrap(), Direction::Up);
    assert!("left".parse::<Direction>().is_err());
    assert!(Direction::try_from("left".to_string()).is_err());
}

#[test]
fn test_all_is_up_then_down() {
    assert_eq!(Direction::ALL, [Direction::Up, Direction::Down]);
}

#[test]
fn test_serde_uses_normalizer() {
    let d: Direction = serde_yaml::from_str("UP").unwrap();
    assert_eq!(d, Direction::Up);
    assert!(serde_yaml::from_str::<Direction>("sideways").is_err());

    let yaml = serde_yaml::to_string(&Direction::Down).unwrap();
    assert_eq!(yaml.trim(), "down");
}
