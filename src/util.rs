//! Shared utility functions used across the codebase.

/// Truthy spellings: `1`, `true`, `yes`, `y`, `on`.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// `true` for empty and whitespace-only strings.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Login name of the current user, if the environment has one.
pub fn current_user() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !is_blank(name))
}
