//! Typed readers for the session environment variables.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError, TTL_HOURS_ENV};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "a positive number of hours";

/// Fall back in debug builds, fail in release builds.
fn lenient<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "falling back to default session setting");
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Read a boolean toggle that release builds must set explicitly.
pub(super) fn flag<E: Env>(
    env: &E,
    name: &'static str,
    mode: BuildMode,
    fallback: bool,
) -> Result<bool, SessionConfigError> {
    match env.string(name) {
        None => lenient(mode, fallback, SessionConfigError::MissingEnv { name }),
        Some(value) => match parse_bool(&value) {
            Some(parsed) => Ok(parsed),
            None => lenient(
                mode,
                fallback,
                SessionConfigError::InvalidEnv {
                    name,
                    value,
                    expected: BOOL_EXPECTED,
                },
            ),
        },
    }
}

/// Read the `SameSite` policy. `None` requires a secure cookie.
pub(super) fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let fallback = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return lenient(mode, fallback, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => lenient(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => lenient(
            mode,
            fallback,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

/// Read the session lifetime in hours. Absent means the default in every mode.
pub(super) fn ttl_hours<E: Env>(
    env: &E,
    mode: BuildMode,
    default_hours: i64,
) -> Result<i64, SessionConfigError> {
    let Some(value) = env.string(TTL_HOURS_ENV) else {
        return Ok(default_hours);
    };
    match value.trim().parse::<i64>() {
        Ok(hours) if hours > 0 => Ok(hours),
        _ => lenient(
            mode,
            default_hours,
            SessionConfigError::InvalidEnv {
                name: TTL_HOURS_ENV,
                value,
                expected: TTL_EXPECTED,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(true))]
    #[case("Yes", Some(true))]
    #[case(" n ", Some(false))]
    #[case("false", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn parses_boolean_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }
}
