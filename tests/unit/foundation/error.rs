use super::*;

#[test]
fn display_prefixes_are_stable() {
    let err = CollageError::config("border", "must be an integer, got \"abc\"");
    let msg = err.to_string();
    assert!(msg.contains("configuration error:"));
    assert!(msg.contains("border"));
    assert!(msg.contains("abc"));
    assert!(
        CollageError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn bitmap_errors_name_the_file() {
    let err = CollageError::from(BitmapLoadError::NotFound {
        path: PathBuf::from("photos/missing.png"),
    });
    assert!(err.to_string().contains("missing.png"));
    assert!(matches!(
        err,
        CollageError::BitmapLoad(BitmapLoadError::NotFound { .. })
    ));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CollageError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
