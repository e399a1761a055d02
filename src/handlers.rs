use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use log::{info, warn};

use crate::adapter::ComposerClient;
use crate::error::{upstream_status, AppError};
use crate::page::{Outcome, Page};
use crate::types::{HealthResponse, MessageRequest, MessageResponse};

pub struct AppState {
    pub composer: ComposerClient,
    pub page: Page,
}

impl AppState {
    pub fn new(composer: ComposerClient) -> anyhow::Result<Self> {
        Ok(Self {
            composer,
            page: Page::new()?,
        })
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    Ok(Html(
        state.page.render(&MessageRequest::default(), Outcome::Empty)?,
    ))
}

pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    form: Result<Form<MessageRequest>, FormRejection>,
) -> Result<Response, AppError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Rejected form submission: {}", rejection);
            let reason = rejection.body_text();
            let html = state
                .page
                .render(&MessageRequest::default(), Outcome::Failed(&reason))?;
            return Ok((rejection.status(), Html(html)).into_response());
        }
    };

    info!("Form submitted, forwarding to {}", state.composer.endpoint());

    match state.composer.send_message(&form).await {
        Ok(msg) => {
            let html = state.page.render(&form, Outcome::Message(&msg))?;
            Ok(Html(html).into_response())
        }
        Err(err) => {
            warn!("Form submission failed ({}): {}", err.kind(), err);
            let reason = err.to_string();
            let html = state.page.render(&form, Outcome::Failed(&reason))?;
            Ok((upstream_status(&err), Html(html)).into_response())
        }
    }
}

pub async fn process(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("API request, forwarding to {}", state.composer.endpoint());
    let msg = state.composer.send_message(&req).await?;
    Ok(Json(MessageResponse { msg }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        upstream: state.composer.endpoint().to_string(),
    })
}
