// HTTP request handlers
use crate::domain::dashboard::SegmentFilter;
use crate::domain::error::ValidationError;
use crate::domain::offer::OfferRequest;
use crate::domain::session::Command;
use crate::domain::upload::UploadedFile;
use crate::domain::user::{SignInForm, SignUpForm, StoredUser};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::view::{AuthView, DashboardView};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

type ViewResult = Result<Json<DashboardView>, ApiError>;

#[derive(Deserialize)]
pub struct FilterRequest {
    pub filter: SegmentFilter,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignUpForm>,
) -> Result<Json<AuthView>, ApiError> {
    // an authenticated session must not overwrite the stored account
    state.dashboard_service.check_authenticate()?;
    let user = state.auth_service.sign_up(form).await?;
    authenticated(&state, user).await
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignInForm>,
) -> Result<Json<AuthView>, ApiError> {
    let user = state.auth_service.sign_in(form).await?;
    authenticated(&state, user).await
}

async fn authenticated(state: &AppState, user: StoredUser) -> Result<Json<AuthView>, ApiError> {
    let session = state.dashboard_service.dispatch(Command::Authenticate).await?;
    Ok(Json(AuthView {
        user: user.into(),
        dashboard: DashboardView::from(&session),
    }))
}

/// Logout doubles as reset: the dataset is discarded with the session.
pub async fn reset(State(state): State<Arc<AppState>>) -> ViewResult {
    dispatch(&state, Command::Reset).await
}

/// Accept the first file part of a multipart body and analyze it
pub async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> ViewResult {
    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        let file = UploadedFile::new(file_name, content_type, &bytes);
        return dispatch(&state, Command::SubmitUpload(file)).await;
    }

    Err(ValidationError::MissingFile.into())
}

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(DashboardView::from(&state.dashboard_service.snapshot()))
}

/// Stream a fresh view every time the session changes
pub async fn dashboard_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.dashboard_service.subscribe();

    let stream = async_stream::stream! {
        loop {
            let view = DashboardView::from(&*rx.borrow_and_update());
            match Event::default().event("dashboard").json_data(&view) {
                Ok(event) => yield Ok(event),
                Err(e) => tracing::error!("Failed to encode dashboard event: {}", e),
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn set_filter(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FilterRequest>,
) -> ViewResult {
    dispatch(&state, Command::SetFilter(request.filter)).await
}

pub async fn toggle_selection(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> ViewResult {
    dispatch(&state, Command::ToggleSelect(customer_id)).await
}

pub async fn select_all(State(state): State<Arc<AppState>>) -> ViewResult {
    dispatch(&state, Command::SelectAll).await
}

pub async fn open_bulk_offer(State(state): State<Arc<AppState>>) -> ViewResult {
    dispatch(&state, Command::OpenBulkOffer).await
}

pub async fn open_single_offer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> ViewResult {
    dispatch(&state, Command::OpenSingleOffer(customer_id)).await
}

pub async fn close_offer(State(state): State<Arc<AppState>>) -> ViewResult {
    dispatch(&state, Command::CloseOffer).await
}

pub async fn send_offer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OfferRequest>,
) -> ViewResult {
    dispatch(&state, Command::SendOffer(request)).await
}

async fn dispatch(state: &AppState, command: Command) -> ViewResult {
    let session = state.dashboard_service.dispatch(command).await?;
    Ok(Json(DashboardView::from(&session)))
}
