use crate::models::Portal;
use std::collections::HashSet;

const ENV_VAR_PATTERN: &str = r"\$\{([^}]+)\}";

/// Expand ${VAR_NAME} references through `lookup`; unknown ones are left as-is
pub fn expand_vars_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = value.to_string();
    let re = match regex::Regex::new(ENV_VAR_PATTERN) {
        Ok(re) => re,
        Err(_) => return result,
    };

    for cap in re.captures_iter(value) {
        let var_name = &cap[1];
        let replacement = lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name));
        result = result.replace(&cap[0], &replacement);
    }

    result
}

/// True when a `${VAR_NAME}` reference survived expansion
pub fn has_unexpanded_var(value: &str) -> bool {
    regex::Regex::new(ENV_VAR_PATTERN)
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// Portal ids must be non-empty, contain no whitespace or dots, and be unique
pub fn validate_portals(portals: &[Portal]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for portal in portals {
        let id = portal.id.as_str();
        if id.is_empty() {
            return Err("Portal id must not be empty".to_string());
        }
        if id.contains('.') || id.chars().any(char::is_whitespace) {
            return Err(format!(
                "Portal id '{}' must not contain dots or whitespace",
                id
            ));
        }
        if !seen.insert(id) {
            return Err(format!("Duplicate portal id '{}'", id));
        }
        if portal.start_prompt.trim().is_empty() {
            return Err(format!("Portal '{}' has an empty start_prompt", id));
        }
    }
    Ok(())
}
