//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::{PageContext, ShopSession};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
}

/// Display the landing page.
#[instrument(skip(session))]
pub async fn home(session: ShopSession) -> Result<impl IntoResponse> {
    Ok(HomeTemplate {
        page: session.page().await?,
    })
}
