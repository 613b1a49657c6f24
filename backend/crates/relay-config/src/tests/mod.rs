mod reaper;

use std::env;

use tempfile::TempDir;

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Create a temp config directory and point WS_CONFIG_DIR at it.
/// Also clears the auth variables so the host environment cannot leak in.
pub(crate) fn setup_config_dir() -> (TempDir, Vec<EnvGuard>) {
    let temp = TempDir::new().unwrap();
    let guards = vec![
        EnvGuard::set("WS_CONFIG_DIR", temp.path().to_str().unwrap()),
        EnvGuard::remove("WS_ADMIN_TOKEN"),
        EnvGuard::remove("ADMIN_TOKEN"),
        EnvGuard::remove("WS_ALLOWED_ORIGINS"),
    ];
    (temp, guards)
}

/// Minimal valid auth environment
pub(crate) fn set_required_auth() -> Vec<EnvGuard> {
    vec![
        EnvGuard::set("WS_ADMIN_TOKEN", "test-admin-token"),
        EnvGuard::set("WS_ALLOWED_ORIGINS", "https://app.example.com"),
    ]
}
