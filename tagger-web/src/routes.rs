//! Rotas HTTP do etiquetador

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tagger_core::{Chunk, EntityMap, TaggedToken, Tagger, TaggerError};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Estado compartilhado da aplicação
pub struct AppState {
    pub tagger: Tagger,
}

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Serialize)]
struct TagResponse {
    tokens: Vec<TaggedToken>,
}

#[derive(Serialize)]
struct EntitiesResponse {
    entities: EntityMap,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    tagged_tokens: Vec<TaggedToken>,
    chunks: Vec<Chunk>,
    entities: EntityMap,
    total_tokens: usize,
    processing_ms: u64,
}

/// Erro da API: status HTTP + `{"error": mensagem}`
pub enum ApiError {
    Tagger(TaggerError),
    /// A tarefa bloqueante entrou em pânico ou foi cancelada
    Internal(String),
}

impl From<TaggerError> for ApiError {
    fn from(err: TaggerError) -> Self {
        ApiError::Tagger(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Tagger(err) => {
                let status = match &err {
                    TaggerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    TaggerError::LengthMismatch { .. } | TaggerError::MalformedTag { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    TaggerError::Collaborator { .. } => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        if status.is_server_error() {
            error!(status = %status, error = %message, "falha ao etiquetar");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/tag", post(tag_handler))
        .route("/entities", post(entities_handler))
        .route("/analyze", post(analyze_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// O etiquetador é síncrono (e o preditor pode ser caro): roda fora do runtime
async fn run_blocking<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Tagger) -> tagger_core::Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || f(&state.tagger)).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(join_err) => Err(ApiError::Internal(format!(
            "tarefa de etiquetagem abortada: {join_err}"
        ))),
    }
}

/// Visão plana: um par (token, label) por token
async fn tag_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    let tokens = run_blocking(state, move |tagger| tagger.tag(&req.text)).await?;
    Ok(Json(TagResponse { tokens }))
}

/// Entidades agrupadas por tipo
async fn entities_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<EntitiesResponse>, ApiError> {
    let entities = run_blocking(state, move |tagger| tagger.get_entities(&req.text)).await?;
    Ok(Json(EntitiesResponse { entities }))
}

/// Análise completa com uma única predição
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let start = Instant::now();
    let chars = req.text.len();
    let analysis = run_blocking(state, move |tagger| tagger.analyze(&req.text)).await?;
    let processing_ms = start.elapsed().as_millis() as u64;
    info!(chars, tokens = analysis.tagged_tokens.len(), processing_ms, "texto analisado");

    Ok(Json(AnalyzeResponse {
        total_tokens: analysis.tagged_tokens.len(),
        tagged_tokens: analysis.tagged_tokens,
        chunks: analysis.chunks,
        entities: analysis.entities,
        processing_ms,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tagger_core::{Lexicon, LexiconPredictor, TokenizerMode};
    use tower::ServiceExt;

    fn app() -> Router {
        let mut lexicon = Lexicon::new();
        lexicon.insert("PERSON", "Obama").unwrap();
        lexicon.insert("LOCATION", "White House").unwrap();
        let tagger = Tagger::new(TokenizerMode::Standard, LexiconPredictor::new(&lexicon));
        router(Arc::new(AppState { tagger }))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const SENTENCE: &str = "President Obama is speaking at the White House.";

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tag_endpoint() {
        let (status, body) = post_json(app(), "/tag", serde_json::json!({ "text": SENTENCE })).await;
        assert_eq!(status, StatusCode::OK);
        let tokens = body["tokens"].as_array().unwrap();
        assert_eq!(tokens.len(), 9);
        assert_eq!(tokens[1], serde_json::json!({ "token": "Obama", "label": "PERSON" }));
        assert_eq!(tokens[8]["label"], "O");
    }

    #[tokio::test]
    async fn test_entities_endpoint() {
        let (status, body) = post_json(app(), "/entities", serde_json::json!({ "text": SENTENCE })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["entities"],
            serde_json::json!({ "PERSON": ["Obama"], "LOCATION": ["White House"] })
        );
    }

    #[tokio::test]
    async fn test_analyze_endpoint() {
        let (status, body) = post_json(app(), "/analyze", serde_json::json!({ "text": SENTENCE })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_tokens"], 9);
        assert_eq!(body["chunks"][1], serde_json::json!({ "entity_type": "LOCATION", "start": 6, "end": 8 }));
        assert_eq!(body["entities"]["PERSON"], serde_json::json!(["Obama"]));
    }

    #[tokio::test]
    async fn test_empty_text_gives_empty_result() {
        let (status, body) = post_json(app(), "/entities", serde_json::json!({ "text": "   " })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entities"], serde_json::json!({}));

        let (status, body) = post_json(app(), "/tag", serde_json::json!({ "text": "" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokens"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_rejecting_tagger_returns_bad_request() {
        let tagger = Tagger::new(TokenizerMode::Standard, LexiconPredictor::new(&Lexicon::new()))
            .reject_empty(true);
        let app = router(Arc::new(AppState { tagger }));
        let (status, body) = post_json(app, "/entities", serde_json::json!({ "text": "   " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("sentença sem nenhum token"));
    }

    #[tokio::test]
    async fn test_malformed_prediction_is_unprocessable() {
        let tagger = Tagger::with_predictor(|tokens: &[String]| vec!["PERSON".to_string(); tokens.len()]);
        let app = router(Arc::new(AppState { tagger }));
        let (status, body) = post_json(app, "/entities", serde_json::json!({ "text": "Bob" })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("PERSON"));
    }
}
