//! One-shot banner messages carried on the redirect target's query string.

use axum::response::Redirect;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Danger,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub flash: Option<String>,
    pub kind: Option<String>,
}

impl FlashQuery {
    pub fn into_flash(self) -> Option<Flash> {
        let message = self.flash.filter(|m| !m.trim().is_empty())?;
        let kind = match self.kind.as_deref() {
            Some("success") => FlashKind::Success,
            _ => FlashKind::Danger,
        };
        Some(Flash {
            kind: kind.as_str(),
            message,
        })
    }
}

/// `to` with the message appended as `flash`/`kind` query parameters.
pub fn flash_url(to: &str, kind: FlashKind, message: &str) -> String {
    let sep = if to.contains('?') { '&' } else { '?' };
    format!(
        "{}{}flash={}&kind={}",
        to,
        sep,
        urlencoding::encode(message),
        kind.as_str()
    )
}

/// 303 See Other to `to`, carrying a banner.
pub fn redirect_with(to: &str, kind: FlashKind, message: &str) -> Redirect {
    Redirect::to(&flash_url(to, kind, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_message() {
        assert_eq!(
            flash_url("/students", FlashKind::Success, "Student added & saved"),
            "/students?flash=Student%20added%20%26%20saved&kind=success"
        );
    }

    #[test]
    fn appends_to_existing_query() {
        assert!(flash_url("/x?a=1", FlashKind::Danger, "m").starts_with("/x?a=1&flash=m"));
    }

    #[test]
    fn unknown_kind_is_danger() {
        let q = FlashQuery {
            flash: Some("oops".into()),
            kind: Some("weird".into()),
        };
        assert_eq!(q.into_flash().unwrap().kind, "danger");
    }

    #[test]
    fn blank_message_is_no_flash() {
        let q = FlashQuery {
            flash: Some(" ".into()),
            kind: None,
        };
        assert!(q.into_flash().is_none());
    }
}
