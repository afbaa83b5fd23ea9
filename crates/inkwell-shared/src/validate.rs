//! Form input validation.
//!
//! Each form has a validation function returning either the trimmed,
//! validated values or the list of per-field errors to render back into the
//! form.

use serde::{Deserialize, Serialize};

use crate::dto::{CommentForm, PostForm};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_AUTHOR_LEN: usize = 100;

/// A validation failure on a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            message: "This field is required".to_string(),
        }
    }

    fn too_long(field: &str, max: usize) -> Self {
        Self {
            field: field.to_string(),
            message: format!("Must be at most {max} characters"),
        }
    }
}

/// Validated post fields, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPost {
    pub title: String,
    pub content: String,
}

/// Validated comment fields, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedComment {
    pub author: String,
    pub content: String,
}

/// Validate a post form: title required (<= 200 chars), content required.
pub fn validate_post_input(form: &PostForm) -> Result<ValidatedPost, Vec<FieldError>> {
    let title = form.title.trim();
    let content = form.content.trim();
    let mut errors = Vec::new();

    if title.is_empty() {
        errors.push(FieldError::required("title"));
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.push(FieldError::too_long("title", MAX_TITLE_LEN));
    }
    if content.is_empty() {
        errors.push(FieldError::required("content"));
    }

    if errors.is_empty() {
        Ok(ValidatedPost {
            title: title.to_string(),
            content: content.to_string(),
        })
    } else {
        Err(errors)
    }
}

/// Validate a comment form: author required (<= 100 chars), content required.
pub fn validate_comment_input(form: &CommentForm) -> Result<ValidatedComment, Vec<FieldError>> {
    let author = form.author.trim();
    let content = form.content.trim();
    let mut errors = Vec::new();

    if author.is_empty() {
        errors.push(FieldError::required("author"));
    } else if author.chars().count() > MAX_AUTHOR_LEN {
        errors.push(FieldError::too_long("author", MAX_AUTHOR_LEN));
    }
    if content.is_empty() {
        errors.push(FieldError::required("content"));
    }

    if errors.is_empty() {
        Ok(ValidatedComment {
            author: author.to_string(),
            content: content.to_string(),
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_post_is_trimmed() {
        let form = PostForm {
            title: "  Hello  ".to_string(),
            content: "\nBody text\n".to_string(),
        };

        let valid = validate_post_input(&form).unwrap();
        assert_eq!(valid.title, "Hello");
        assert_eq!(valid.content, "Body text");
    }

    #[test]
    fn whitespace_only_title_is_missing() {
        let form = PostForm {
            title: "   ".to_string(),
            content: "Body".to_string(),
        };

        let errors = validate_post_input(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn empty_post_form_reports_both_fields() {
        let errors = validate_post_input(&PostForm::default()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "content"]);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let form = PostForm {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            content: "Body".to_string(),
        };

        let errors = validate_post_input(&form).unwrap_err();
        assert_eq!(errors[0].field, "title");
        assert!(errors[0].message.contains("200"));
    }

    #[test]
    fn comment_requires_author_and_content() {
        let errors = validate_comment_input(&CommentForm::default()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["author", "content"]);
    }

    #[test]
    fn valid_comment_passes() {
        let form = CommentForm {
            author: "ada".to_string(),
            content: "Great read".to_string(),
        };

        let valid = validate_comment_input(&form).unwrap();
        assert_eq!(valid.author, "ada");
        assert_eq!(valid.content, "Great read");
    }
}
