use std::path::PathBuf;

pub fn get_test_fixture_path(fixture_name: Option<&str>) -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("ir");
    match fixture_name {
        Some(fixture_name) => root.join(fixture_name),
        None => root,
    }
}
