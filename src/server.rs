// CRUNCHBOX Tool API — JSON boundary for the styling pipeline
// Copyright (c) 2026 Lushy | CRUNCHBOX

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::catalog::{CatalogMetadata, CategoryRules, CategorySummary};
use crate::error::StylerError;
use crate::styler::assembler::{PromptSkeleton, Variant};
use crate::styler::parser::ComponentSet;
use crate::styler::transformer::{StyleParams, TransformedComponents};
use crate::styler::weights::SemanticWeights;
use crate::styler::{CategorySuggestion, ParsedPrompt, StyleEngine};

pub type AppState = Arc<StyleEngine>;

#[derive(Deserialize)]
pub struct ParseRequest {
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct TransformRequest {
    pub components: ComponentSet,
    pub category: String,
    #[serde(default)]
    pub style_params: Option<StyleParams>,
}

#[derive(Deserialize)]
pub struct AssembleRequest {
    pub transformed: TransformedComponents,
    pub category: String,
    pub semantic_weights: SemanticWeights,
}

#[derive(Deserialize)]
pub struct RefineRequest {
    pub skeleton: PromptSkeleton,
    pub component: String,
    pub value: String,
}

#[derive(Deserialize)]
pub struct VariantsRequest {
    pub components: ComponentSet,
    pub category: String,
    #[serde(default = "default_variant_count")]
    pub count: u32,
}

fn default_variant_count() -> u32 {
    3
}

impl IntoResponse for StylerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            StylerError::UnknownCategory { available, .. }
            | StylerError::UnknownComponent { available, .. } => (
                StatusCode::NOT_FOUND,
                json!({ "error": self.to_string(), "available": available }),
            ),
            StylerError::InvalidCount(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            StylerError::MissingRuleData(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub fn create_router(engine: AppState) -> Router {
    Router::new()
        .route("/api/catalog", get(get_catalog))
        .route("/api/categories", get(get_categories))
        .route("/api/categories/:name", get(get_category_rules))
        .route("/api/parse", post(parse_prompt))
        .route("/api/suggest", post(suggest_category))
        .route("/api/transform", post(apply_transformations))
        .route("/api/assemble", post(build_skeleton))
        .route("/api/refine", post(refine_component))
        .route("/api/variants", post(generate_variants))
        .with_state(engine)
        .layer(CorsLayer::permissive())
}

pub async fn start_server(port: u16, engine: AppState) {
    let app = create_router(engine);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let display_addr = if addr.ip().is_unspecified() {
        format!("127.0.0.1:{}", port)
    } else {
        addr.to_string()
    };
    info!("🥣 CRUNCHBOX Style Server running on http://{}", display_addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn get_catalog(State(engine): State<AppState>) -> Json<CatalogMetadata> {
    Json(engine.catalog().metadata())
}

async fn get_categories(
    State(engine): State<AppState>,
) -> Json<BTreeMap<String, CategorySummary>> {
    Json(engine.catalog().summaries())
}

async fn get_category_rules(
    State(engine): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CategoryRules>, StylerError> {
    let rules = engine.rules(&name)?;
    Ok(Json(rules.clone()))
}

#[axum::debug_handler]
async fn parse_prompt(
    State(engine): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Json<ParsedPrompt> {
    info!("[SERVER] Parsing prompt ({} chars)", req.prompt.chars().count());
    Json(engine.parse(&req.prompt))
}

async fn suggest_category(
    State(engine): State<AppState>,
    Json(components): Json<ComponentSet>,
) -> Json<CategorySuggestion> {
    Json(engine.suggest_category(&components))
}

async fn apply_transformations(
    State(engine): State<AppState>,
    Json(req): Json<TransformRequest>,
) -> Result<Json<TransformedComponents>, StylerError> {
    let transformed = engine.transform(&req.components, &req.category, req.style_params)?;
    Ok(Json(transformed))
}

async fn build_skeleton(
    State(engine): State<AppState>,
    Json(req): Json<AssembleRequest>,
) -> Result<Json<PromptSkeleton>, StylerError> {
    let skeleton = engine.assemble(&req.transformed, &req.category, &req.semantic_weights)?;
    Ok(Json(skeleton))
}

async fn refine_component(
    State(_engine): State<AppState>,
    Json(req): Json<RefineRequest>,
) -> Result<Json<PromptSkeleton>, StylerError> {
    let mut skeleton = req.skeleton;
    skeleton.refine(&req.component, &req.value)?;
    Ok(Json(skeleton))
}

async fn generate_variants(
    State(engine): State<AppState>,
    Json(req): Json<VariantsRequest>,
) -> Result<Json<Vec<Variant>>, StylerError> {
    let variants = engine.generate_variants(&req.components, &req.category, req.count)?;
    Ok(Json(variants))
}
