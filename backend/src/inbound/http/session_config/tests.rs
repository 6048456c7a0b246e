//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug)]
struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("health-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write key file");
        Self { path }
    }

    fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[fixture]
fn key_file() -> TempKeyFile {
    TempKeyFile::new(SESSION_KEY_MIN_LEN)
}

fn release_vars(key_file: &TempKeyFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_file.path_string()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn settings_error(vars: HashMap<&'static str, String>, mode: BuildMode) -> SessionConfigError {
    match session_settings_from_env(&mock_env(vars), mode) {
        Ok(_) => panic!("expected configuration to be rejected"),
        Err(error) => error,
    }
}

#[rstest]
fn release_accepts_complete_configuration(key_file: TempKeyFile) {
    let settings = session_settings_from_env(&mock_env(release_vars(&key_file)), BuildMode::Release)
        .expect("valid configuration");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.ttl_hours, DEFAULT_TTL_HOURS);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_each_toggle(key_file: TempKeyFile, #[case] missing: &'static str) {
    let mut vars = release_vars(&key_file);
    vars.remove(missing);

    let err = settings_error(vars, BuildMode::Release);

    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(TTL_HOURS_ENV, "0")]
#[case(TTL_HOURS_ENV, "soon")]
fn release_rejects_malformed_toggles(
    key_file: TempKeyFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let mut vars = release_vars(&key_file);
    vars.insert(name, value.to_owned());

    let err = settings_error(vars, BuildMode::Release);

    assert!(matches!(err, SessionConfigError::InvalidEnv { name: got, .. } if got == name));
}

#[rstest]
fn release_rejects_insecure_same_site_none(key_file: TempKeyFile) {
    let mut vars = release_vars(&key_file);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    let err = settings_error(vars, BuildMode::Release);

    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_ephemeral_keys(key_file: TempKeyFile) {
    let mut vars = release_vars(&key_file);
    vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());

    let err = settings_error(vars, BuildMode::Release);

    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = TempKeyFile::new(SESSION_KEY_MIN_LEN - 1);

    let err = settings_error(release_vars(&short), BuildMode::Release);

    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_rejects_missing_key_file() {
    let vars = HashMap::from([
        (KEY_FILE_ENV, "/nonexistent/health-session-key".to_owned()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Lax".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);

    let err = settings_error(vars, BuildMode::Release);

    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let vars = HashMap::from([
        (KEY_FILE_ENV, "/nonexistent/health-session-key".to_owned()),
        (COOKIE_SECURE_ENV, "perhaps".to_owned()),
    ]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.ttl_hours, DEFAULT_TTL_HOURS);
}

#[rstest]
fn debug_tolerates_insecure_same_site_none() {
    let vars = HashMap::from([
        (KEY_FILE_ENV, "/nonexistent/health-session-key".to_owned()),
        (COOKIE_SECURE_ENV, "0".to_owned()),
        (SAMESITE_ENV, "none".to_owned()),
    ]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug settings");

    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
fn ttl_override_is_honoured(key_file: TempKeyFile) {
    let mut vars = release_vars(&key_file);
    vars.insert(TTL_HOURS_ENV, "12".to_owned());

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Release).expect("valid settings");

    assert_eq!(settings.ttl_hours, 12);
}

#[rstest]
#[case("1", Some(true))]
#[case("Yes", Some(true))]
#[case("n", Some(false))]
#[case("FALSE", Some(false))]
#[case("2", None)]
fn booleans_parse_leniently(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
