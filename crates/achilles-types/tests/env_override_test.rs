//! Environment overrides for achilles settings.
//!
//! Lives in its own test binary so the process environment it sets is not
//! shared with the config unit tests.

use achilles_types::{CounterProfile, Settings};

#[test]
fn test_env_vars_override_defaults() {
    std::env::set_var("ACHILLES_COUNTER_PROFILE", "thrift");
    std::env::set_var("ACHILLES_DB_PATH", "/tmp/achilles-env-counters");

    let settings = Settings::load(None).unwrap();

    assert_eq!(settings.counter_profile, CounterProfile::Thrift);
    assert_eq!(settings.db_path, "/tmp/achilles-env-counters");
    assert_eq!(
        settings.counter_registry().schema().table_name,
        "achillesCounterCF"
    );
}
