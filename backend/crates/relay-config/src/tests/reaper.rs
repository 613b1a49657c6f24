use crate::Config;
use crate::tests::{EnvGuard, set_required_auth, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err};
use serial_test::serial;

// =========================================================================
// Validation Tests - Reaper
// =========================================================================

#[test]
#[serial]
fn given_prune_interval_env_when_load_then_applied() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _interval = EnvGuard::set("WS_PRUNE_INTERVAL_SECS", "15");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.reaper.interval_secs, eq(15));
}

#[test]
#[serial]
fn given_zero_prune_interval_when_validate_then_error() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _auth = set_required_auth();
    let _interval = EnvGuard::set("WS_PRUNE_INTERVAL_SECS", "0");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.validate(), err(anything()));
}
