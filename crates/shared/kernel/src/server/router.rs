//! System-level routes every deployment carries.

use super::health;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Builds the router for the system surface (currently just `/health`).
/// Feature routers are merged next to this one by the application.
pub fn system_router<S>() -> OpenApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    OpenApiRouter::new().routes(routes!(health::health_handler))
}
