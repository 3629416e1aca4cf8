//! Message Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{ConversationQuery, SendMessageRequest};
use crate::application::dto::response::{
    ConversationResponse, MessageResponse, UnreadCountResponse,
};
use crate::application::services::{
    MessageError, MessageService, MessageServiceImpl, SendMessageDto,
};
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{
    PgListingRepository, PgMessageRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Build the message service over the Postgres repositories.
fn message_service(
    state: &AppState,
) -> MessageServiceImpl<PgMessageRepository, PgUserRepository, PgListingRepository> {
    MessageServiceImpl::new(
        Arc::new(PgMessageRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgListingRepository::new(state.db.clone())),
    )
}

fn map_error(err: MessageError) -> AppError {
    match err {
        MessageError::NotFound => AppError::NotFound("Message not found".into()),
        MessageError::UserNotFound(id) => AppError::NotFound(format!("User {} not found", id)),
        MessageError::ListingNotFound(id) => {
            AppError::NotFound(format!("Listing {} not found", id))
        }
        MessageError::ContentTooLong => {
            AppError::BadRequest("Message content exceeds 2000 characters".into())
        }
        MessageError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Send a message
///
/// Persists first, then pushes a copy to the receiver's live channel.
/// Live delivery is best effort; the stored row is the source of truth.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    request.validate().map_err(validation_error)?;

    let service = message_service(&state);
    let dto = service
        .send_message(
            auth_user.user_id,
            SendMessageDto {
                receiver_id: request.receiver_id,
                listing_id: request.listing_id,
                content: request.content,
            },
        )
        .await
        .map_err(map_error)?;

    metrics::MESSAGES_SENT_TOTAL.inc();

    let response = MessageResponse::from(dto);
    state.live.notify(response.receiver_id, &response);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get the full history between two users for a listing, oldest first
pub async fn get_conversation(
    State(state): State<AppState>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let service = message_service(&state);
    let messages = service
        .get_conversation(query.listing_id, query.sender_id, query.receiver_id)
        .await
        .map_err(map_error)?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Get every message the authenticated user sent or received, newest first
pub async fn get_inbox(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let service = message_service(&state);
    let messages = service
        .get_inbox(auth_user.user_id)
        .await
        .map_err(map_error)?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Count unread messages addressed to the authenticated user
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let service = message_service(&state);
    let unread = service
        .unread_count(auth_user.user_id)
        .await
        .map_err(map_error)?;

    Ok(Json(UnreadCountResponse { unread }))
}

/// Mark a message as read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = message_service(&state);
    service.mark_read(message_id).await.map_err(map_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get one conversation summary per (counterpart, listing) pair
pub async fn get_conversations(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<ConversationResponse>>, AppError> {
    let service = message_service(&state);
    let summaries = service
        .get_conversations(auth_user.user_id)
        .await
        .map_err(map_error)?;

    Ok(Json(
        summaries.into_iter().map(ConversationResponse::from).collect(),
    ))
}
