//! Listing sources that degrade to empty instead of failing the run.

use tracing::warn;

use crate::error::Result;

/// Outcome of loading one optional source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub items: Vec<T>,
    /// Set when the source failed or returned nothing.
    pub warning: Option<String>,
}

/// Turns a fetch result into items plus an optional warning.
///
/// Fatal errors (authentication, configuration) are passed through; any other
/// failure becomes an empty result with a warning naming `source`.
pub fn degrade<T>(source: &str, result: Result<Vec<T>>) -> Result<Sourced<T>> {
    match result {
        Err(error) if error.is_fatal() => Err(error),
        other => Ok(degrade_any(source, other)),
    }
}

fn degrade_any<T>(source: &str, result: Result<Vec<T>>) -> Sourced<T> {
    match result {
        Ok(items) if items.is_empty() => {
            warn!(source, "source returned no data");
            Sourced {
                items,
                warning: Some(format!("no {source} data available")),
            }
        }
        Ok(items) => Sourced {
            items,
            warning: None,
        },
        Err(error) => {
            warn!(source, %error, "source unavailable, continuing without it");
            Sourced {
                items: Vec::new(),
                warning: Some(format!("failed to load {source}: {error}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_status_error_degrades() {
        let result: Result<Vec<u8>> = Err(ApiError::Status {
            resource: "lists".to_string(),
            status: 500,
            body: String::new(),
        });
        let sourced = degrade("lists", result).expect("degraded");
        assert!(sourced.items.is_empty());
        assert!(sourced.warning.expect("warning").contains("lists"));
    }

    #[test]
    fn test_auth_error_is_fatal() {
        let result: Result<Vec<u8>> = Err(ApiError::Auth("denied".to_string()));
        assert!(degrade("employees", result).is_err());
    }

    #[test]
    fn test_empty_and_full() {
        let empty = degrade::<u8>("organizations", Ok(vec![])).expect("ok");
        assert!(empty.warning.is_some());
        let full = degrade("organizations", Ok(vec![1, 2])).expect("ok");
        assert!(full.warning.is_none());
        assert_eq!(full.items, vec![1, 2]);
    }

    #[test]
    fn test_degrade_any_swallows_fatal() {
        let result: Result<Vec<u8>> = Err(ApiError::Auth("denied".to_string()));
        let sourced = degrade_any("lists", result);
        assert!(sourced.warning.is_some());
    }
}
