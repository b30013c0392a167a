use regex::Regex;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

/// Expand `${VAR_NAME}` references using `lookup`.
///
/// Unset variables are left as written.
pub fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    env_var_pattern()
        .replace_all(value, |cap: &regex::Captures| {
            lookup(&cap[1]).unwrap_or_else(|| cap[0].to_string())
        })
        .into_owned()
}

/// Point a base URL at its `/chat/completions` route.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
