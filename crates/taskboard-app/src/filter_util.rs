use std::str::FromStr;

use taskboard_core::id::{AssigneeId, TagId};
use taskboard_core::{DueRange, FilterUpdate, Priority};
use thiserror::Error;
use time::Date;

/// Error type returned while constructing filters from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    #[error("invalid priority: {token}")]
    InvalidPriority { token: String },
    #[error("invalid {field} id: {token}")]
    InvalidId { field: &'static str, token: String },
    #[error("invalid {field} date: {source}")]
    InvalidDate {
        field: &'static str,
        #[source]
        source: time::error::Parse,
    },
    #[error("due date range starts after it ends ({from} > {to})")]
    InvertedRange { from: Date, to: Date },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into a [`FilterUpdate`].
///
/// Only categories that received at least one value end up in the update, so the
/// result merges into existing criteria without clearing unrelated ones.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    search: Option<String>,
    priorities: Vec<Priority>,
    statuses: Vec<String>,
    assignees: Vec<AssigneeId>,
    tags: Vec<TagId>,
    due: Option<DueRange>,
}

impl FilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the optional search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_search(mut self, text: Option<String>) -> Self {
        self.search = text.and_then(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        self
    }

    /// Extend the priority set (logical OR).
    ///
    /// # Errors
    /// Returns an error if any token is not a known priority.
    pub fn with_priorities(mut self, tokens: &[String]) -> FilterBuildResult<Self> {
        for token in tokens {
            let priority = token
                .parse::<Priority>()
                .map_err(|_| FilterBuildError::InvalidPriority {
                    token: token.clone(),
                })?;
            self.priorities.push(priority);
        }
        Ok(self)
    }

    /// Extend the section set (logical OR).
    #[must_use]
    pub fn with_statuses(mut self, statuses: &[String]) -> Self {
        self.statuses.extend(
            statuses
                .iter()
                .map(|status| status.trim())
                .filter(|status| !status.is_empty())
                .map(str::to_owned),
        );
        self
    }

    /// Extend the assignee set (logical OR).
    ///
    /// # Errors
    /// Returns an error if any token is not a numeric id.
    pub fn with_assignees(mut self, tokens: &[String]) -> FilterBuildResult<Self> {
        self.assignees.extend(parse_ids::<AssigneeId>("assignee", tokens)?);
        Ok(self)
    }

    /// Extend the tag set (logical OR).
    ///
    /// # Errors
    /// Returns an error if any token is not a numeric id.
    pub fn with_tags(mut self, tokens: &[String]) -> FilterBuildResult<Self> {
        self.tags.extend(parse_ids::<TagId>("tag", tokens)?);
        Ok(self)
    }

    /// Configure the due-date window using `YYYY-MM-DD` strings.
    ///
    /// # Errors
    /// Returns an error if either date fails to parse or the window is inverted.
    pub fn with_due_range(
        mut self,
        from: Option<String>,
        to: Option<String>,
    ) -> FilterBuildResult<Self> {
        let from = parse_optional_date("due_from", from)?;
        let to = parse_optional_date("due_to", to)?;
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(FilterBuildError::InvertedRange { from, to });
        }
        if from.is_some() || to.is_some() {
            self.due = Some(DueRange { from, to });
        }
        Ok(self)
    }

    /// Build the final [`FilterUpdate`].
    #[must_use]
    pub fn build(self) -> FilterUpdate {
        FilterUpdate {
            search: self.search,
            priorities: non_empty(self.priorities),
            statuses: non_empty(self.statuses),
            assignees: non_empty(self.assignees),
            tags: non_empty(self.tags),
            due: self.due,
        }
    }
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

fn parse_ids<T: FromStr>(field: &'static str, tokens: &[String]) -> FilterBuildResult<Vec<T>> {
    tokens
        .iter()
        .map(|token| {
            token.parse().map_err(|_| FilterBuildError::InvalidId {
                field,
                token: token.clone(),
            })
        })
        .collect()
}

/// Parse a `YYYY-MM-DD` date string.
///
/// # Errors
/// Returns an error if the string is not a calendar date in that form.
pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    taskboard_core::parse_iso_date(s)
}

fn parse_optional_date(
    field: &'static str,
    value: Option<String>,
) -> FilterBuildResult<Option<Date>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = parse_date(trimmed).map_err(|source| FilterBuildError::InvalidDate { field, source })?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Display;
    use time::macros::date;

    fn ok<T, E: Display>(result: Result<T, E>, context: &str) -> T {
        result.unwrap_or_else(|err| panic!("{context}: {err}"))
    }

    #[test]
    fn test_parse_date() {
        let parsed = ok(parse_date(" 2025-02-14 "), "parse date");
        assert_eq!(parsed, date!(2025 - 02 - 14));
        assert!(parse_date("14/02/2025").is_err());
    }

    #[test]
    fn test_invalid_priority_is_reported() {
        let Err(err) = FilterBuilder::new().with_priorities(&["urgent".into()]) else {
            panic!("unknown priority should error");
        };
        assert!(matches!(err, FilterBuildError::InvalidPriority { token } if token == "urgent"));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let result = FilterBuilder::new()
            .with_due_range(Some("2025-03-01".into()), Some("2025-02-01".into()));
        assert!(matches!(result, Err(FilterBuildError::InvertedRange { .. })));
    }

    #[test]
    fn test_empty_builder_produces_empty_update() {
        let update = FilterBuilder::new()
            .with_search(Some("   ".into()))
            .with_statuses(&[" ".into()])
            .build();
        assert!(update.is_empty());
    }

    #[test]
    fn test_filter_builder_full_workflow() {
        let update = ok(
            ok(
                ok(
                    ok(
                        FilterBuilder::new()
                            .with_search(Some(" Login ".into()))
                            .with_priorities(&["high".into(), "Low".into()]),
                        "priorities",
                    )
                    .with_statuses(&["In Progress".into()])
                    .with_assignees(&["2".into()]),
                    "assignees",
                )
                .with_tags(&["1".into(), "3".into()]),
                "tags",
            )
            .with_due_range(Some("2025-02-01".into()), None),
            "due range",
        )
        .build();

        assert_eq!(update.search.as_deref(), Some("Login"));
        assert_eq!(update.priorities, Some(vec![Priority::High, Priority::Low]));
        assert_eq!(update.statuses, Some(vec!["In Progress".to_owned()]));
        assert_eq!(update.assignees, Some(vec![AssigneeId(2)]));
        assert_eq!(update.tags, Some(vec![TagId(1), TagId(3)]));
        let due = update.due.unwrap_or_else(|| panic!("expected due range"));
        assert_eq!(due.from, Some(date!(2025 - 02 - 01)));
        assert!(due.to.is_none());
    }

    #[test]
    fn test_invalid_ids_are_reported() {
        let result = FilterBuilder::new().with_tags(&["design".into()]);
        assert!(matches!(
            result,
            Err(FilterBuildError::InvalidId { field: "tag", .. })
        ));
    }

    #[test]
    fn test_debug_output_shows_pending_criteria() {
        let builder = FilterBuilder::new().with_search(Some(" Login ".into()));
        let rendered = format!("{builder:?}");
        assert!(rendered.starts_with("FilterBuilder"));
        assert!(rendered.contains(r#"search: Some("Login")"#));
    }
}
