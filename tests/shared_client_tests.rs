use std::env;
use std::io::Write;
use std::sync::Arc;

use inference_adapter::core::ClientCell;
use inference_adapter::errors::AdapterError;
use tempfile::NamedTempFile;

fn env_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// A single test owns OPENAI_API_KEY for this binary so the steps cannot race.
#[test]
fn test_client_cell_initialization_sequence() {
    // SAFETY: no other test in this binary touches OPENAI_API_KEY.
    unsafe { env::remove_var("OPENAI_API_KEY") };

    let missing_dir = tempfile::tempdir().unwrap();
    let cell = ClientCell::new(missing_dir.path().join(".env"));
    let err = cell.get_or_init().unwrap_err();
    assert!(matches!(err, AdapterError::EnvFileNotFound(_)));
    assert!(!cell.is_initialized());

    let keyless = env_file("SHARED_CLIENT_TESTS_OTHER=1\n");
    let keyless_cell = ClientCell::new(keyless.path());
    let err = keyless_cell.get_or_init().unwrap_err();
    assert!(matches!(err, AdapterError::MissingApiKey));
    assert!(err.is_config_error());
    assert!(!keyless_cell.is_initialized());

    let empty_key = env_file("OPENAI_API_KEY=\n");
    let err = ClientCell::new(empty_key.path()).get_or_init().unwrap_err();
    assert!(matches!(err, AdapterError::MissingApiKey));
    // SAFETY: see above.
    unsafe { env::remove_var("OPENAI_API_KEY") };

    let keyed = env_file("OPENAI_API_KEY=sk-test-key\n");
    let cell = ClientCell::new(keyed.path());
    let first = cell.get_or_init().unwrap();
    let second = cell.get_or_init().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cell.is_initialized());
    assert_eq!(cell.env_path(), keyed.path());

    // The key is now in the environment; a cell that failed earlier can recover.
    assert!(keyless_cell.get_or_init().is_ok());
    assert!(keyless_cell.is_initialized());
}
