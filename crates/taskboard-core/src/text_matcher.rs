use crate::task::Task;

/// Case-insensitive substring matcher for task text fields.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Determine whether the title or description contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title) || self.matches_field(&task.description)
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;

    #[test]
    fn matcher_skips_blank_queries() {
        assert!(TextMatcher::new("").is_none());
        assert!(TextMatcher::new("   ").is_none());
        assert!(TextMatcher::new("\n").is_none());
    }

    #[test]
    fn matcher_searches_title_and_description() {
        let mut task = Task::new(TaskId(1), "Fix Login Bug", "To Do");
        task.description = "Session cookie expires early".into();

        let matcher = TextMatcher::new("login")
            .unwrap_or_else(|| panic!("matcher must exist for queries with content"));
        assert!(matcher.matches(&task));

        let matcher = TextMatcher::new("COOKIE")
            .unwrap_or_else(|| panic!("matcher must exist for queries with content"));
        assert!(matcher.matches(&task));

        let missing = TextMatcher::new("to do")
            .unwrap_or_else(|| panic!("matcher must exist for queries with content"));
        assert!(!missing.matches(&task));
    }
}
