//! Loading record options from TOML files

use std::io::Write;
use tally_supply::{BurnMode, SupplyOptions, TallyError};
use tally_testkit::SupplyFixture;

fn write_options(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn load_options_and_create_record() {
    let file = write_options(
        r#"
cap = 3
burn_mode = "centralized"
retirement_authority = false
"#,
    );
    let options = SupplyOptions::load_from_file(file.path()).unwrap();
    assert_eq!(options.cap(), Some(3));
    assert_eq!(options.burn_mode(), BurnMode::Centralized);

    struct Badge;
    let fixture = SupplyFixture::new();
    let badges = fixture.create::<Badge>(options);
    assert!(badges.retirement.is_none());
    assert_eq!(badges.record.remaining(), Some(3));
}

#[test]
fn invalid_files_are_rejected() {
    let file = write_options("burn_mode = \"decentralized\"\nretirement_authority = true\n");
    let err = SupplyOptions::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, TallyError::WrongBurnMode { .. }));

    let file = write_options("cap = \"many\"\n");
    let err = SupplyOptions::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, TallyError::Serialization { .. }));
}

#[test]
fn options_round_trip_through_toml() {
    let options = SupplyOptions::capped(12).with_burn_mode(BurnMode::Decentralized);
    let encoded = toml::to_string(&options).unwrap();
    assert_eq!(SupplyOptions::from_toml_str(&encoded).unwrap(), options);
}
