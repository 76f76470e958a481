use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use models::contact_message::CreateContactMessage;
use service::contact::ContactReceipt;

use crate::errors::ApiError;
use crate::state::AppState;

/// `email_sent: false` still means the message was stored.
#[utoipa::path(post, path = "/api/contact", tag = "site", request_body = CreateContactMessage,
    responses((status = 201, body = ContactReceipt), (status = 400, body = crate::errors::JsonApiError)))]
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<CreateContactMessage>,
) -> Result<(StatusCode, Json<ContactReceipt>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.contact.submit(input).await?)))
}
