//! Caller identity resolution for local entry points.

use crate::types::CallerId;

/// Environment variables consulted, in order.
pub const IDENTITY_VARS: [&str; 2] = ["USER_ID", "USER"];

/// Resolve the current caller from the process environment.
pub fn current_caller() -> CallerId {
    resolve_caller(|key| std::env::var(key).ok())
}

/// Resolve a caller through `lookup`, falling back to `"unknown"`.
pub fn resolve_caller<F>(lookup: F) -> CallerId
where
    F: Fn(&str) -> Option<String>,
{
    IDENTITY_VARS
        .iter()
        .filter_map(|key| lookup(key))
        .map(|value| CallerId::or_unknown(&value))
        .find(|caller| !caller.is_unknown())
        .unwrap_or_else(CallerId::unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_user_id_wins() {
        let caller = resolve_caller(lookup_from(&[("USER_ID", "u42"), ("USER", "alice")]));
        assert_eq!(caller.as_str(), "u42");
    }

    #[test]
    fn test_falls_back_to_user() {
        let caller = resolve_caller(lookup_from(&[("USER_ID", "  "), ("USER", "alice")]));
        assert_eq!(caller.as_str(), "alice");
    }

    #[test]
    fn test_unknown_when_unset() {
        assert!(resolve_caller(lookup_from(&[])).is_unknown());
    }
}
