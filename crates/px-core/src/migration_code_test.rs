use super::*;

#[test]
fn test_resolve_plain_type_name() {
    let code = resolve_migration_code("PropelMigration_4821").unwrap();
    assert_eq!(code, "4821");
}

#[test]
fn test_resolve_with_namespace_prefix() {
    let code = resolve_migration_code(r"App\Migrations\PropelMigration_1500000000").unwrap();
    assert_eq!(code.as_str(), "1500000000");

    let code = resolve_migration_code("migrations::PropelMigration_7").unwrap();
    assert_eq!(code.as_str(), "7");
}

#[test]
fn test_resolve_keeps_leading_zeros() {
    let code = resolve_migration_code("PropelMigration_0042").unwrap();
    assert_eq!(code.as_str(), "0042");
}

#[test]
fn test_resolve_rejects_non_matching_names() {
    for name in [
        "Propel_4821_Migration",
        "PropelMigration_",
        "PropelMigration_12a",
        "PropelMigration_12_extra",
        "propelmigration_12",
        "PropelMigration-12",
        "",
        "Migration",
    ] {
        assert!(
            resolve_migration_code(name).is_none(),
            "'{name}' should not resolve"
        );
    }
}

#[test]
fn test_try_new_requires_digits() {
    assert!(MigrationCode::try_new("123").is_some());
    assert!(MigrationCode::try_new("").is_none());
    assert!(MigrationCode::try_new("12 3").is_none());
    assert!(MigrationCode::try_new("-1").is_none());
}

#[test]
fn test_codes_order_numerically() {
    let mut codes: Vec<MigrationCode> = ["100", "9", "0010", "25"]
        .into_iter()
        .map(|c| MigrationCode::try_new(c).unwrap())
        .collect();
    codes.sort();
    let ordered: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
    assert_eq!(ordered, vec!["9", "0010", "25", "100"]);
}

#[test]
fn test_codes_longer_than_u64_still_order() {
    let big = MigrationCode::try_new("123456789012345678901234567890").unwrap();
    let small = MigrationCode::try_new("99999999999999999999").unwrap();
    assert!(small < big);
}

#[test]
fn test_display() {
    let code = MigrationCode::try_new("4821").unwrap();
    assert_eq!(format!("# {}", code), "# 4821");
}

#[test]
fn test_same_number_ignores_leading_zeros() {
    let plain = MigrationCode::try_new("4821").unwrap();
    let padded = MigrationCode::try_new("004821").unwrap();
    assert!(plain.same_number(&padded));
    assert_ne!(plain, padded);
    assert!(!plain.same_number(&MigrationCode::try_new("48210").unwrap()));
    assert!(MigrationCode::try_new("0")
        .unwrap()
        .same_number(&MigrationCode::try_new("000").unwrap()));
}
