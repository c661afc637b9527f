//! Subject catalog pages.

use super::error::{OrRedirect, PageError};
use super::flash::{redirect_with, FlashKind, FlashQuery};
use super::forms::SubjectForm;
use super::pages::{render, SubjectFormPage, SubjectListPage};
use super::{with_pool, AppState};
use crate::app::{subject_create, subject_delete, subject_get, subject_list, subject_update};
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;

const SUBJECTS: &str = "/subjects";

/// GET /subjects
async fn list_subjects(
    State(state): State<AppState>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let subjects = with_pool(&state, subject_list).await.or_redirect("/")?;
    render(&SubjectListPage {
        flash: q.into_flash(),
        subjects,
    })
}

/// GET /subjects/add
async fn add_subject_form(Query(q): Query<FlashQuery>) -> Result<Html<String>, PageError> {
    render(&SubjectFormPage {
        flash: q.into_flash(),
        title: "Add Subject",
        action: "/subjects/add".to_string(),
        values: SubjectForm::default(),
    })
}

/// POST /subjects/add
async fn add_subject(
    State(state): State<AppState>,
    Form(form): Form<SubjectForm>,
) -> Result<Redirect, PageError> {
    let req = form.into_create_req().or_redirect(SUBJECTS)?;
    with_pool(&state, move |pool| subject_create(pool, req))
        .await
        .or_redirect(SUBJECTS)?;
    Ok(redirect_with(SUBJECTS, FlashKind::Success, "Subject added successfully!"))
}

/// GET /subjects/edit/{id}
async fn edit_subject_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<FlashQuery>,
) -> Result<Html<String>, PageError> {
    let subject = with_pool(&state, move |pool| subject_get(pool, id))
        .await
        .or_redirect(SUBJECTS)?;
    render(&SubjectFormPage {
        flash: q.into_flash(),
        title: "Edit Subject",
        action: format!("/subjects/edit/{}", id),
        values: SubjectForm::from(&subject),
    })
}

/// POST /subjects/edit/{id}
async fn edit_subject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<SubjectForm>,
) -> Result<Redirect, PageError> {
    let req = form.into_update_req(id).or_redirect(SUBJECTS)?;
    with_pool(&state, move |pool| subject_update(pool, req))
        .await
        .or_redirect(SUBJECTS)?;
    Ok(redirect_with(SUBJECTS, FlashKind::Success, "Subject updated successfully!"))
}

/// POST /subjects/delete/{id}
async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, PageError> {
    with_pool(&state, move |pool| subject_delete(pool, id))
        .await
        .or_redirect(SUBJECTS)?;
    Ok(redirect_with(SUBJECTS, FlashKind::Success, "Subject deleted successfully!"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(list_subjects))
        .route("/subjects/add", get(add_subject_form).post(add_subject))
        .route("/subjects/edit/{id}", get(edit_subject_form).post(edit_subject))
        .route("/subjects/delete/{id}", post(delete_subject))
}
