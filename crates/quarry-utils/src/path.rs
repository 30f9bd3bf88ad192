use std::{env, iter::Peekable, path::PathBuf, str::Chars};

use crate::error::{PathError, PathResult};

/// Resolves a user supplied path string into an absolute path.
///
/// `$VAR` and `${VAR}` are expanded from the environment, a leading `~` becomes the home
/// directory and relative paths are anchored at the current working directory.
///
/// # Errors
///
/// * [`PathError::Empty`] if the path is empty
/// * [`PathError::UnclosedVariable`] for a `${` without a closing brace
/// * [`PathError::MissingEnvVar`] if a referenced variable is not set
/// * [`PathError::CurrentDir`] if the current directory cannot be determined
///
/// # Example
///
/// ```
/// use quarry_utils::path::resolve_path;
///
/// let cache = resolve_path("/var/cache/quarry").unwrap();
/// assert!(cache.is_absolute());
/// ```
pub fn resolve_path(path: &str) -> PathResult<PathBuf> {
    let path = path.trim();
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let path_buf = PathBuf::from(expand_variables(path)?);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }

    env::current_dir()
        .map(|cwd| cwd.join(path_buf))
        .map_err(|source| PathError::CurrentDir { source })
}

/// Returns `$HOME`, falling back to the system temporary directory when unset.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir)
}

/// Returns `$XDG_CONFIG_HOME`, defaulting to `$HOME/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"))
}

/// Returns `$XDG_CACHE_HOME`, defaulting to `$HOME/.cache`.
pub fn xdg_cache_home() -> PathBuf {
    env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".cache"))
}

fn expand_variables(path: &str) -> PathResult<String> {
    let mut result = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                let name = consume_braced(&mut chars)?;
                result.push_str(&lookup(&name, path)?);
            }
            '$' => {
                let name = consume_name(&mut chars);
                if name.is_empty() {
                    result.push('$');
                } else {
                    result.push_str(&lookup(&name, path)?);
                }
            }
            '~' if result.is_empty() => result.push_str(&home_dir().to_string_lossy()),
            _ => result.push(c),
        }
    }

    Ok(result)
}

fn consume_braced(chars: &mut Peekable<Chars>) -> PathResult<String> {
    let mut name = String::new();
    for c in chars.by_ref() {
        if c == '}' {
            return Ok(name);
        }
        name.push(c);
    }
    Err(PathError::UnclosedVariable {
        input: format!("${{{name}"),
    })
}

fn consume_name(chars: &mut Peekable<Chars>) -> String {
    let mut name = String::new();
    while let Some(c) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
        name.push(c);
    }
    name
}

fn lookup(name: &str, original: &str) -> PathResult<String> {
    match name {
        "HOME" => Ok(home_dir().to_string_lossy().into_owned()),
        "XDG_CONFIG_HOME" => Ok(xdg_config_home().to_string_lossy().into_owned()),
        "XDG_CACHE_HOME" => Ok(xdg_cache_home().to_string_lossy().into_owned()),
        _ => {
            env::var(name).map_err(|_| {
                PathError::MissingEnvVar {
                    var: name.into(),
                    input: original.into(),
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_expand_variables() {
        env::set_var("QUARRY_TEST_DIR", "/srv/quarry");
        assert_eq!(
            expand_variables("$QUARRY_TEST_DIR/cache").unwrap(),
            "/srv/quarry/cache"
        );
        assert_eq!(
            expand_variables("${QUARRY_TEST_DIR}/db.sqlite").unwrap(),
            "/srv/quarry/db.sqlite"
        );
        assert_eq!(expand_variables("cost/$").unwrap(), "cost/$");
        env::remove_var("QUARRY_TEST_DIR");
    }

    #[test]
    #[serial]
    fn test_expand_variables_errors() {
        env::remove_var("QUARRY_TEST_MISSING");
        assert!(matches!(
            expand_variables("${QUARRY_TEST_MISSING"),
            Err(PathError::UnclosedVariable { .. })
        ));
        assert!(matches!(
            expand_variables("$QUARRY_TEST_MISSING/x"),
            Err(PathError::MissingEnvVar { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_resolve_path() {
        env::set_var("HOME", "/tmp/quarry-home");

        assert!(matches!(resolve_path("  "), Err(PathError::Empty)));
        assert_eq!(
            resolve_path("/absolute/cache").unwrap(),
            PathBuf::from("/absolute/cache")
        );
        assert_eq!(
            resolve_path("~/cache").unwrap(),
            PathBuf::from("/tmp/quarry-home/cache")
        );
        assert_eq!(
            resolve_path("relative/cache").unwrap(),
            env::current_dir().unwrap().join("relative/cache")
        );
        assert_eq!(
            resolve_path("a/~/b").unwrap(),
            env::current_dir().unwrap().join("a/~/b")
        );
    }

    #[test]
    #[serial]
    fn test_xdg_directories() {
        env::set_var("HOME", "/tmp/quarry-home");
        env::remove_var("XDG_CONFIG_HOME");
        env::remove_var("XDG_CACHE_HOME");

        assert_eq!(xdg_config_home(), PathBuf::from("/tmp/quarry-home/.config"));
        assert_eq!(xdg_cache_home(), PathBuf::from("/tmp/quarry-home/.cache"));

        env::set_var("XDG_CACHE_HOME", "/tmp/xdg-cache");
        assert_eq!(xdg_cache_home(), PathBuf::from("/tmp/xdg-cache"));
        env::remove_var("XDG_CACHE_HOME");
    }
}
