//! Superuser lookup from environment variables.
//!
//! `SUPERUSER_IDS` holds a comma separated list of Discord user IDs that are
//! exempt from tenant isolation, in addition to those listed in config.toml.

use std::collections::HashSet;

/// Gets the set of Discord user IDs configured as superusers in the environment.
#[must_use]
pub fn get_superuser_ids() -> HashSet<String> {
    std::env::var("SUPERUSER_IDS")
        .map(|raw| parse_id_list(&raw))
        .unwrap_or_default()
}

fn parse_id_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list_skips_blanks() {
        let ids = parse_id_list(" 12, ,34,");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("12"));
        assert!(ids.contains("34"));
    }
}
