//! Bible lookup endpoints.
//!
//! Thin wire layer over [`LookupService`]: handlers parse path/query input,
//! enforce the per-request deadline, consult the passage cache and map
//! results into wire DTOs. No lookup logic lives here.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use lectio::domain::constants::BIBLE_TAG;
use lectio::domain::features::Feature;
use lectio::domain::modules::Category;
use lectio::domain::passage::{PassageResult, TrimReason, TrimmedOption};
use lectio::domain::reference::{ChapterKey, Direction, Rounding};
use lectio::features::options::registry;
use lectio::kernel::server::{ApiError, ApiState, ErrorBody};
use lectio_passage::{KeyInfo, OrdinalRequest, PassageError, PassageRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub(crate) fn bible_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(versions_handler))
        .routes(routes!(text_handler))
        .routes(routes!(verses_handler))
        .routes(routes!(features_handler))
        .routes(routes!(features_all_handler))
        .routes(routes!(books_handler))
        .routes(routes!(chapter_expand_handler))
        .routes(routes!(chapter_sibling_handler))
        .routes(routes!(key_handler))
        .routes(routes!(plain_handler))
}

// --- DTOs ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct VersionDto {
    initials: String,
    name: String,
    language: String,
    category: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ChapterDto {
    osis_id: String,
    display_name: String,
}

impl From<ChapterKey> for ChapterDto {
    fn from(key: ChapterKey) -> Self {
        Self { osis_id: key.osis_id, display_name: key.display_name }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct RemovedFeatureDto {
    feature: String,
    reason: &'static str,
}

impl From<&TrimmedOption> for RemovedFeatureDto {
    fn from(removed: &TrimmedOption) -> Self {
        let reason = match removed.reason {
            TrimReason::IncompatibleWithMode => "INCOMPATIBLE_WITH_MODE",
            TrimReason::NotSupportedByModule => "NOT_SUPPORTED_BY_MODULE",
            TrimReason::ConflictsWithOtherFeature => "CONFLICTS_WITH_OTHER_FEATURE",
        };
        Self { feature: removed.feature.to_string(), reason }
    }
}

/// Wire form of a rendered passage.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct PassageDto {
    /// Display-ready HTML fragment.
    html: String,
    osis_id: String,
    versification: String,
    start_ordinal: u32,
    end_ordinal: u32,
    applied_features: Vec<String>,
    selected_features: Vec<String>,
    removed_features: Vec<RemovedFeatureDto>,
    available_features: Vec<String>,
    previous_chapter: Option<ChapterDto>,
    next_chapter: Option<ChapterDto>,
}

fn feature_tokens(features: &[Feature]) -> Vec<String> {
    features.iter().map(ToString::to_string).collect()
}

impl From<&PassageResult> for PassageDto {
    fn from(result: &PassageResult) -> Self {
        Self {
            html: result.html.clone(),
            osis_id: result.osis_id.clone(),
            versification: result.versification.to_string(),
            start_ordinal: result.start_ordinal,
            end_ordinal: result.end_ordinal,
            applied_features: feature_tokens(&result.applied_features),
            selected_features: feature_tokens(&result.selected_features),
            removed_features: result.removed_features.iter().map(Into::into).collect(),
            available_features: feature_tokens(&result.available_features),
            previous_chapter: result.previous_chapter.clone().map(Into::into),
            next_chapter: result.next_chapter.clone().map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct FeatureDto {
    feature: String,
    display_name: &'static str,
    default_enabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct BookDto {
    osis: String,
    display_name: String,
    chapter_count: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct KeyDto {
    osis_id: String,
    versification: String,
    start_ordinal: u32,
    end_ordinal: u32,
}

impl From<KeyInfo> for KeyDto {
    fn from(info: KeyInfo) -> Self {
        Self {
            osis_id: info.osis_id,
            versification: info.versification.to_string(),
            start_ordinal: info.start_ordinal,
            end_ordinal: info.end_ordinal,
        }
    }
}

// --- Query parameters ---

#[derive(Debug, Deserialize, IntoParams)]
struct VersionsParams {
    /// Include commentaries alongside Bibles.
    #[serde(default)]
    all: bool,
    /// ISO language filter, e.g. `en`.
    language: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
struct TextParams {
    /// Comma-separated feature tokens; absent means module defaults.
    options: Option<String>,
    /// Comma-separated extra version initials.
    interlinear: Option<String>,
    /// Multi-version layout hint.
    display: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
struct VersesParams {
    /// `true` rounds up to the chapter end, `false` down to its start.
    round: Option<String>,
    options: Option<String>,
    interlinear: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
struct FeaturesParams {
    version: Option<String>,
    interlinear: Option<String>,
    display: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
struct BooksParams {
    /// Case-insensitive book-name prefix; empty lists every book.
    prefix: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
struct KeyParams {
    /// Version whose versification the reference is written in.
    source: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
struct PlainParams {
    #[serde(default)]
    first_verse_only: bool,
}

// --- Deadline enforcement ---

/// Runs a synchronous lookup on the blocking pool under the configured
/// deadline. An elapsed deadline surfaces as `TimedOut`, a cancelled task as
/// `Cancelled`.
async fn with_deadline<T, F>(deadline_ms: u64, task: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PassageError> + Send + 'static,
{
    let deadline = Duration::from_millis(deadline_ms);
    match tokio::time::timeout(deadline, tokio::task::spawn_blocking(task)).await {
        Ok(Ok(outcome)) => outcome.map_err(ApiError::from),
        Ok(Err(join)) if join.is_cancelled() => Err(ApiError::from(PassageError::Cancelled)),
        Ok(Err(_)) => Err(ApiError::from(PassageError::ModuleReadFailed {
            message: "lookup task panicked".into(),
        })),
        Err(_) => Err(ApiError::from(PassageError::TimedOut)),
    }
}

fn parse_ordinal(raw: &str, field: &str) -> Result<u32, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::from(PassageError::invalid(format!("{field} must be a number"))))
}

fn cache_headers(ttl_seconds: u64) -> [(header::HeaderName, String); 1] {
    [(header::CACHE_CONTROL, format!("public, max-age={ttl_seconds}"))]
}

// --- Handlers ---

#[utoipa::path(
    get,
    path = "/bible/versions",
    params(VersionsParams),
    responses((status = OK, description = "Installed modules", body = [VersionDto])),
    tag = BIBLE_TAG,
)]
async fn versions_handler(
    State(state): State<ApiState>,
    Query(params): Query<VersionsParams>,
) -> Json<Vec<VersionDto>> {
    let categories: &[Category] = if params.all { &[] } else { &[Category::Bible] };
    let modules = state.lookup.versions(categories, params.language.as_deref());
    Json(
        modules
            .into_iter()
            .map(|m| VersionDto {
                initials: m.id.to_string(),
                name: m.name,
                language: m.language,
                category: m.category.to_string(),
            })
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/bible/text/{version}/{reference}",
    params(
        ("version" = String, Path, description = "Module initials, e.g. KJV"),
        ("reference" = String, Path, description = "Human reference, e.g. John 3:16"),
        TextParams,
    ),
    responses(
        (status = OK, description = "Rendered passage", body = PassageDto),
        (status = NOT_FOUND, description = "Unknown module or reference", body = ErrorBody),
    ),
    tag = BIBLE_TAG,
)]
async fn text_handler(
    State(state): State<ApiState>,
    Path((version, reference)): Path<(String, String)>,
    Query(params): Query<TextParams>,
) -> Result<impl IntoResponse, ApiError> {
    let cache_key = format!(
        "text:{version}:{reference}:{}:{}:{}",
        params.options.as_deref().unwrap_or_default(),
        params.interlinear.as_deref().unwrap_or_default(),
        params.display.as_deref().unwrap_or_default(),
    );

    let result = match state.passage_cache.get(&cache_key) {
        Some(hit) => hit,
        None => {
            let lookup = state.lookup.clone();
            let request = PassageRequest {
                version,
                reference,
                options: params.options,
                extra_versions: params.interlinear,
                display_mode: params.display,
            };
            let fresh = with_deadline(state.config.lookup.deadline_ms, move || {
                lookup.lookup(&request)
            })
            .await?;
            let fresh = Arc::new(fresh);
            state.passage_cache.insert(cache_key, fresh.clone());
            fresh
        }
    };

    Ok((
        cache_headers(state.config.lookup.cache_ttl_seconds),
        Json(PassageDto::from(&*result)),
    ))
}

#[utoipa::path(
    get,
    path = "/bible/verses/{version}/{start}/{end}",
    params(
        ("version" = String, Path, description = "Module initials"),
        ("start" = String, Path, description = "First verse ordinal"),
        ("end" = String, Path, description = "Last verse ordinal"),
        VersesParams,
    ),
    responses(
        (status = OK, description = "Rendered passage", body = PassageDto),
        (status = BAD_REQUEST, description = "Malformed ordinal", body = ErrorBody),
    ),
    tag = BIBLE_TAG,
)]
async fn verses_handler(
    State(state): State<ApiState>,
    Path((version, start, end)): Path<(String, String, String)>,
    Query(params): Query<VersesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let start_ordinal = parse_ordinal(&start, "start ordinal")?;
    let end_ordinal = parse_ordinal(&end, "end ordinal")?;

    let cache_key = format!(
        "verses:{version}:{start_ordinal}:{end_ordinal}:{}:{}:{}",
        params.round.as_deref().unwrap_or_default(),
        params.options.as_deref().unwrap_or_default(),
        params.interlinear.as_deref().unwrap_or_default(),
    );

    let result = match state.passage_cache.get(&cache_key) {
        Some(hit) => hit,
        None => {
            let lookup = state.lookup.clone();
            let request = OrdinalRequest {
                version,
                start_ordinal,
                end_ordinal,
                rounding: Rounding::from_wire(params.round.as_deref()),
                options: params.options,
                extra_versions: params.interlinear,
            };
            let fresh = with_deadline(state.config.lookup.deadline_ms, move || {
                lookup.lookup_by_ordinals(&request)
            })
            .await?;
            let fresh = Arc::new(fresh);
            state.passage_cache.insert(cache_key, fresh.clone());
            fresh
        }
    };

    Ok((
        cache_headers(state.config.lookup.cache_ttl_seconds),
        Json(PassageDto::from(&*result)),
    ))
}

#[utoipa::path(
    get,
    path = "/bible/features",
    params(FeaturesParams),
    responses(
        (status = OK, description = "Toggleable features for the module combination", body = [String]),
        (status = BAD_REQUEST, description = "Missing version", body = ErrorBody),
    ),
    tag = BIBLE_TAG,
)]
async fn features_handler(
    State(state): State<ApiState>,
    Query(params): Query<FeaturesParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let version = params
        .version
        .ok_or_else(|| ApiError::from(PassageError::invalid("version query parameter is required")))?;
    let features = state.lookup.available_features(
        &version,
        params.interlinear.as_deref(),
        params.display.as_deref(),
    )?;
    Ok(Json(feature_tokens(&features)))
}

#[utoipa::path(
    get,
    path = "/bible/features/all",
    responses((status = OK, description = "Full feature registry", body = [FeatureDto])),
    tag = BIBLE_TAG,
)]
async fn features_all_handler() -> Json<Vec<FeatureDto>> {
    Json(
        registry::all()
            .into_iter()
            .map(|feature| {
                let enriched = registry::explain(feature);
                FeatureDto {
                    feature: enriched.feature.to_string(),
                    display_name: enriched.display_name,
                    default_enabled: enriched.default_enabled,
                }
            })
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/bible/books/{version}",
    params(("version" = String, Path, description = "Module initials"), BooksParams),
    responses((status = OK, description = "Matching books", body = [BookDto])),
    tag = BIBLE_TAG,
)]
async fn books_handler(
    State(state): State<ApiState>,
    Path(version): Path<String>,
    Query(params): Query<BooksParams>,
) -> Result<Json<Vec<BookDto>>, ApiError> {
    let books = state.lookup.book_names(&version, params.prefix.as_deref().unwrap_or_default())?;
    Ok(Json(
        books
            .into_iter()
            .map(|b| BookDto {
                osis: b.osis,
                display_name: b.display_name,
                chapter_count: b.chapter_count,
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/bible/chapter/expand/{version}/{reference}",
    params(
        ("version" = String, Path, description = "Module initials"),
        ("reference" = String, Path, description = "Sub-chapter reference"),
    ),
    responses((status = OK, description = "Enclosing chapter", body = ChapterDto)),
    tag = BIBLE_TAG,
)]
async fn chapter_expand_handler(
    State(state): State<ApiState>,
    Path((version, reference)): Path<(String, String)>,
) -> Result<Json<ChapterDto>, ApiError> {
    let chapter = state.lookup.expand_to_chapter(&version, &reference)?;
    Ok(Json(chapter.into()))
}

#[utoipa::path(
    get,
    path = "/bible/chapter/{direction}/{version}/{reference}",
    params(
        ("direction" = String, Path, description = "`previous` or `next`"),
        ("version" = String, Path, description = "Module initials"),
        ("reference" = String, Path, description = "Anchor reference"),
    ),
    responses(
        (status = OK, description = "Sibling chapter, null at corpus boundaries", body = Option<ChapterDto>),
        (status = BAD_REQUEST, description = "Unknown direction", body = ErrorBody),
    ),
    tag = BIBLE_TAG,
)]
async fn chapter_sibling_handler(
    State(state): State<ApiState>,
    Path((direction, version, reference)): Path<(String, String, String)>,
) -> Result<Json<Option<ChapterDto>>, ApiError> {
    let direction = match direction.to_ascii_lowercase().as_str() {
        "previous" => Direction::Previous,
        "next" => Direction::Next,
        _ => {
            return Err(ApiError::from(PassageError::invalid(
                "direction must be 'previous' or 'next'",
            )));
        }
    };
    let chapter = state.lookup.sibling_chapter(&version, &reference, direction)?;
    Ok(Json(chapter.map(Into::into)))
}

#[utoipa::path(
    get,
    path = "/bible/key/{version}/{reference}",
    params(
        ("version" = String, Path, description = "Target module initials"),
        ("reference" = String, Path, description = "Reference to resolve"),
        KeyParams,
    ),
    responses((status = OK, description = "Resolved key info", body = KeyDto)),
    tag = BIBLE_TAG,
)]
async fn key_handler(
    State(state): State<ApiState>,
    Path((version, reference)): Path<(String, String)>,
    Query(params): Query<KeyParams>,
) -> Result<Json<KeyDto>, ApiError> {
    let info = state.lookup.key_info(&version, &reference, params.source.as_deref())?;
    Ok(Json(info.into()))
}

#[utoipa::path(
    get,
    path = "/bible/plain/{version}/{reference}",
    params(
        ("version" = String, Path, description = "Module initials"),
        ("reference" = String, Path, description = "Reference to extract"),
        PlainParams,
    ),
    responses((status = OK, description = "Unmarked-up passage text", body = String)),
    tag = BIBLE_TAG,
)]
async fn plain_handler(
    State(state): State<ApiState>,
    Path((version, reference)): Path<(String, String)>,
    Query(params): Query<PlainParams>,
) -> Result<impl IntoResponse, ApiError> {
    let lookup = state.lookup.clone();
    let text = with_deadline(state.config.lookup.deadline_ms, move || {
        lookup.plain_text(&version, &reference, params.first_verse_only)
    })
    .await?;
    Ok((cache_headers(state.config.lookup.cache_ttl_seconds), text))
}
