use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::db::Database;
use crate::extract::{DocumentFormat, Extractor};
use crate::gen::Generator;
use crate::models::{Flashcard, GenerateResponse, ListQuery, ReviewRequest, TextRequest};
use crate::review::apply_review;

#[derive(Clone)]
struct AppState {
    db: Database,
    extractor: Extractor,
    generator: Generator,
}

pub async fn run_server(config: AppConfig, db: Database, generator: Generator) -> Result<()> {
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let state = AppState {
        db,
        extractor: Extractor::new(&config.strip_patterns),
        generator,
    };

    let app = Router::new()
        .route("/api/text", post(generate_from_text))
        .route("/api/upload", post(generate_from_upload))
        .route("/api/cards", get(list_cards))
        .route("/api/review", post(review_card))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn generate_from_text(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if request.text.trim().is_empty() {
        tracing::warn!("empty text submission");
        return Ok(Json(GenerateResponse { flashcards: vec![] }));
    }

    let flashcards = generate_and_store(&state, request.text).await?;
    Ok(Json(GenerateResponse { flashcards }))
}

async fn generate_from_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, ApiError> {
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.to_string()))?
    {
        let Some(filename) = field.file_name().map(|name| name.to_string()) else {
            continue;
        };

        let format = DocumentFormat::from_filename(&filename)
            .map_err(|err| ApiError::bad_request(err.to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::bad_request(err.to_string()))?;

        tracing::info!(%filename, ?format, size = bytes.len(), "upload received");

        let extracted = state
            .extractor
            .extract_text(&bytes, format)
            .await
            .map_err(|err| ApiError::bad_request(format!("extraction failed: {err}")))?;
        text = Some(extracted);
        break;
    }

    let Some(text) = text else {
        return Err(ApiError::bad_request("no file field in upload".to_string()));
    };

    if text.trim().is_empty() {
        return Ok(Json(GenerateResponse { flashcards: vec![] }));
    }

    let flashcards = generate_and_store(&state, text).await?;
    Ok(Json(GenerateResponse { flashcards }))
}

async fn list_cards(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    let cards = state.db.list_cards(query.category.as_deref()).await?;
    Ok(Json(cards))
}

async fn review_card(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<Flashcard>, ApiError> {
    let card = state.db.get_card(&request.card_id).await?;
    let Some(mut card) = card else {
        return Err(ApiError::not_found(format!(
            "card not found: {}",
            request.card_id
        )));
    };

    apply_review(&mut card, request.quality);
    state
        .db
        .update_review(&card.id, card.interval, card.ease)
        .await?;

    Ok(Json(card))
}

/// Runs one generation pass off the async runtime and persists the batch
/// atomically. An empty card set is a valid outcome, not an error.
async fn generate_and_store(state: &AppState, text: String) -> Result<Vec<Flashcard>, ApiError> {
    let generator = state.generator.clone();
    let cards = tokio::task::spawn_blocking(move || generator.generate(&text))
        .await
        .map_err(|_| ApiError::from(anyhow::anyhow!("generation task panicked")))?;

    if cards.is_empty() {
        tracing::info!("nothing salient found; returning empty card set");
        return Ok(vec![]);
    }

    let stored = state.db.save_cards(&cards).await?;
    tracing::info!(cards = stored.len(), "saved generated batch");
    Ok(stored)
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }

    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: value.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;

    async fn test_state() -> AppState {
        AppState {
            db: Database::connect("sqlite::memory:").await.unwrap(),
            extractor: Extractor::new(&[]),
            generator: Generator::new(GenerationConfig::default(), None),
        }
    }

    #[tokio::test]
    async fn reviewing_unknown_card_returns_not_found() {
        let state = test_state().await;
        let err = review_card(
            State(state),
            Json(ReviewRequest {
                card_id: "no-such-card".to_string(),
                quality: 5,
            }),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.message.contains("no-such-card"));
    }

    #[tokio::test]
    async fn reviewing_known_card_persists_the_update() {
        let state = test_state().await;
        let stored = state
            .db
            .save_cards(&[Flashcard::new(
                "What is A?".to_string(),
                "An answer.".to_string(),
                "General".to_string(),
            )])
            .await
            .unwrap();

        let Json(card) = review_card(
            State(state.clone()),
            Json(ReviewRequest {
                card_id: stored[0].id.clone(),
                quality: 5,
            }),
        )
        .await
        .unwrap();

        assert_eq!(card.interval, 6.0);
        let fetched = state.db.get_card(&stored[0].id).await.unwrap().unwrap();
        assert_eq!(fetched.interval, 6.0);
    }
}
