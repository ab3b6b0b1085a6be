//! Field validation for posts and comments.
//!
//! Validation is pure and collects every violated rule. Lengths count
//! Unicode scalar values of the raw input; surrounding whitespace is not
//! trimmed, but a blank value additionally fails the `required` rule.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::post::Post;

pub const TITLE_MIN_LENGTH: usize = 5;
pub const TITLE_MAX_LENGTH: usize = 255;
pub const POST_CONTENT_MIN_LENGTH: usize = 10;
pub const COMMENT_MIN_LENGTH: usize = 3;
pub const COMMENT_MAX_LENGTH: usize = 1000;

/// The rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    TooShort,
    TooLong,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::TooShort => "too_short",
            Rule::TooLong => "too_long",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: Rule,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Every rule an input violated, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", summarize(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }

    /// Whether `field` failed `rule`.
    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.0.iter().any(|e| e.field == field && e.rule == rule)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

/// Raw post fields as submitted by an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl PostInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            published: None,
        }
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }
}

/// Partial update of a post; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl PostChanges {
    /// The full input that results from applying these changes to `post`.
    pub fn merge_onto(self, post: &Post) -> PostInput {
        PostInput {
            title: Some(self.title.unwrap_or_else(|| post.title.clone())),
            content: Some(self.content.unwrap_or_else(|| post.content.clone())),
            published: Some(self.published.unwrap_or(post.published)),
        }
    }
}

/// Post fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPost {
    pub title: String,
    pub content: String,
    pub published: bool,
}

/// Raw comment fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommentInput {
    pub content: Option<String>,
    pub approved: Option<bool>,
}

impl CommentInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            approved: None,
        }
    }
}

/// Comment fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedComment {
    pub content: String,
    pub approved: bool,
}

#[derive(Default)]
struct Collector(Vec<ValidationError>);

impl Collector {
    fn push(&mut self, field: &'static str, rule: Rule, message: String) {
        self.0.push(ValidationError {
            field,
            rule,
            message,
        });
    }

    fn check_length(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        min: usize,
        max: Option<usize>,
    ) {
        let value = value.unwrap_or_default();
        if value.trim().is_empty() {
            self.push(field, Rule::Required, "can't be blank".to_string());
        }

        let length = value.chars().count();
        if length < min {
            self.push(
                field,
                Rule::TooShort,
                format!("is too short (minimum is {min} characters)"),
            );
        }
        if let Some(max) = max.filter(|max| length > *max) {
            self.push(
                field,
                Rule::TooLong,
                format!("is too long (maximum is {max} characters)"),
            );
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

/// Validate post fields, reporting every violation.
pub fn validate_post(input: PostInput) -> Result<ValidatedPost, ValidationErrors> {
    let mut collector = Collector::default();
    collector.check_length(
        "title",
        input.title.as_deref(),
        TITLE_MIN_LENGTH,
        Some(TITLE_MAX_LENGTH),
    );
    collector.check_length(
        "content",
        input.content.as_deref(),
        POST_CONTENT_MIN_LENGTH,
        None,
    );

    collector.finish(|| ValidatedPost {
        title: input.title.unwrap_or_default(),
        content: input.content.unwrap_or_default(),
        published: input.published.unwrap_or(false),
    })
}

/// Validate comment fields, reporting every violation.
pub fn validate_comment(input: CommentInput) -> Result<ValidatedComment, ValidationErrors> {
    let mut collector = Collector::default();
    collector.check_length(
        "content",
        input.content.as_deref(),
        COMMENT_MIN_LENGTH,
        Some(COMMENT_MAX_LENGTH),
    );

    collector.finish(|| ValidatedComment {
        content: input.content.unwrap_or_default(),
        approved: input.approved.unwrap_or(false),
    })
}
