use std::env;

/// Sets environment variables for the lifetime of the guard and restores the previous
/// values when dropped, even if the test panics.
///
/// Tests using it must be marked `#[serial]` since the process environment is shared.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn set(vars: &[(&str, &str)]) -> Self {
        let saved = vars
            .iter()
            .map(|(key, value)| {
                let old = env::var(key).ok();
                env::set_var(key, value);
                (key.to_string(), old)
            })
            .collect();
        Self { saved }
    }

    pub fn unset(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| {
                let old = env::var(key).ok();
                env::remove_var(key);
                (key.to_string(), old)
            })
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in self.saved.drain(..).rev() {
            match old {
                Some(value) => env::set_var(&key, value),
                None => env::remove_var(&key),
            }
        }
    }
}
