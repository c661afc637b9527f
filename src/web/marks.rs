//! Editing and deleting a single mark.

use super::error::{OrRedirect, PageError};
use super::flash::{redirect_with, FlashKind, FlashQuery};
use super::forms::MarkForm;
use super::pages::{render, MarkEditPage};
use super::{with_pool, AppState};
use crate::app::{mark_delete, mark_get, mark_update, subject_list};
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;

const STUDENTS: &str = "/students";

/// GET /marks/edit/{mark_id}
async fn edit_mark_form(
    State(state): State<AppState>,
    Path(mark_id): Path<i64>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let (mark, subjects) = with_pool(&state, move |pool| {
        Ok((mark_get(pool, mark_id)?, subject_list(pool)?))
    })
    .await
    .or_redirect(STUDENTS)?;
    render(&MarkEditPage {
        flash: q.into_flash(),
        mark,
        subjects,
    })
}

/// POST /marks/edit/{mark_id}
async fn edit_mark(
    State(state): State<AppState>,
    Path(mark_id): Path<i64>,
    Form(form): Form<MarkForm>,
) -> Result<Redirect, PageError> {
    let req = form
        .into_update_req(mark_id)
        .or_redirect(&format!("/marks/edit/{}", mark_id))?;
    let mark = with_pool(&state, move |pool| mark_update(pool, req))
        .await
        .or_redirect(STUDENTS)?;
    Ok(redirect_with(
        &format!("/students/{}/marks", mark.student_id),
        FlashKind::Success,
        "Mark updated successfully!",
    ))
}

/// POST /marks/delete/{mark_id}
async fn delete_mark(
    State(state): State<AppState>,
    Path(mark_id): Path<i64>,
) -> Result<Redirect, PageError> {
    let student_id = with_pool(&state, move |pool| mark_delete(pool, mark_id))
        .await
        .or_redirect(STUDENTS)?;
    Ok(redirect_with(
        &format!("/students/{}/marks", student_id),
        FlashKind::Success,
        "Mark deleted successfully!",
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/marks/edit/{mark_id}", get(edit_mark_form).post(edit_mark))
        .route("/marks/delete/{mark_id}", post(delete_mark))
}
