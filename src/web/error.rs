//! Failures at the request boundary become a redirect with a banner.

use super::flash::{redirect_with, FlashKind};
use crate::error::AppError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// An [`AppError`] plus the page to send the user back to.
#[derive(Debug)]
pub struct PageError {
    pub error: AppError,
    pub back_to: String,
}

impl PageError {
    pub fn new(error: AppError, back_to: impl Into<String>) -> Self {
        Self {
            error,
            back_to: back_to.into(),
        }
    }
}

pub trait OrRedirect<T> {
    fn or_redirect(self, back_to: &str) -> Result<T, PageError>;
}

impl<T> OrRedirect<T> for Result<T, AppError> {
    fn or_redirect(self, back_to: &str) -> Result<T, PageError> {
        self.map_err(|e| PageError::new(e, back_to))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let target = match &self.error {
            AppError::Config(_) | AppError::Internal(_) => {
                log::error!("{} [{}]", self.error, self.error.code());
                // no safe page to fall back on
                return (StatusCode::INTERNAL_SERVER_ERROR, self.error.to_string()).into_response();
            }
            AppError::StorageUnavailable(_) => {
                log::error!("{} [{}]", self.error, self.error.code());
                "/"
            }
            AppError::Db(_) => {
                log::error!("{} [{}]", self.error, self.error.code());
                self.back_to.as_str()
            }
            AppError::Validation(_) | AppError::NotFound(_) | AppError::Conflict(_) => {
                log::warn!("{} -> {}", self.error, self.back_to);
                self.back_to.as_str()
            }
        };
        redirect_with(target, FlashKind::Danger, &self.error.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    fn location(resp: &Response) -> String {
        resp.headers()[LOCATION].to_str().unwrap().to_string()
    }

    #[test]
    fn not_found_redirects_back() {
        let resp = PageError::new(AppError::NotFound("student 9".into()), "/students").into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert!(location(&resp).starts_with("/students?flash=Not%20found"));
        assert!(location(&resp).ends_with("kind=danger"));
    }

    #[test]
    fn storage_unavailable_goes_home() {
        let resp =
            PageError::new(AppError::StorageUnavailable("disk".into()), "/students").into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert!(location(&resp).starts_with("/?flash="));
    }

    #[test]
    fn internal_is_500() {
        let resp = PageError::new(AppError::Internal("render".into()), "/").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
