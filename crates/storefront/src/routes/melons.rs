//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;
use ubermelon_core::MelonId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{Melon, PageContext, ShopSession};
use crate::state::AppState;

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "melons/index.html")]
pub struct MelonsIndexTemplate {
    pub page: PageContext,
    pub melons: Vec<Melon>,
}

/// Melon detail template.
#[derive(Template, WebTemplate)]
#[template(path = "melons/show.html")]
pub struct MelonShowTemplate {
    pub page: PageContext,
    pub melon: Melon,
}

/// Resolve a path segment to a catalog melon.
///
/// Malformed ids cannot be in the catalog, so they are reported as not found
/// too.
pub(crate) fn find_melon<'a>(state: &'a AppState, raw_id: &str) -> Result<&'a Melon> {
    MelonId::parse(raw_id)
        .ok()
        .and_then(|id| state.catalog().get_by_id(&id))
        .ok_or_else(|| AppError::NotFound(format!("a melon called \"{raw_id}\"")))
}

/// Display every melon in the catalog.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: ShopSession) -> Result<impl IntoResponse> {
    Ok(MelonsIndexTemplate {
        page: session.page().await?,
        melons: state.catalog().get_all().to_vec(),
    })
}

/// Display one melon.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let melon = find_melon(&state, &id)?.clone();

    Ok(MelonShowTemplate {
        page: session.page().await?,
        melon,
    })
}
