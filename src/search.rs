/// Where an empty search submission lands: the current view, untouched.
pub const CURRENT_VIEW_PATH: &str = "/current";

/// Trims a submitted query, rejecting blank input.
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Address of the page showing results for `query`.
pub fn search_location(query: &str) -> String {
    format!("/?movie={}", urlencoding::encode(query))
}

/// Redirect target for a submitted search form.
pub fn submit_target(raw: &str) -> String {
    match normalize_query(raw) {
        Some(q) => search_location(&q),
        None => CURRENT_VIEW_PATH.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_queries_are_rejected() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   \t\n"), None);
        assert_eq!(submit_target("  "), "/current");
    }

    #[test]
    fn query_is_trimmed_and_encoded() {
        assert_eq!(normalize_query("  Iron Man "), Some("Iron Man".to_string()));
        assert_eq!(submit_target("  Iron Man "), "/?movie=Iron%20Man");
        assert_eq!(
            search_location("Amélie & co?"),
            "/?movie=Am%C3%A9lie%20%26%20co%3F"
        );
    }
}
