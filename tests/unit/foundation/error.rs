use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RaceError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(RaceError::render("x").to_string().contains("render error:"));
    assert!(RaceError::encode("x").to_string().contains("encode error:"));
    assert!(
        RaceError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RaceError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
