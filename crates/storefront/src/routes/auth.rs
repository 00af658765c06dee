//! Authentication route handlers.
//!
//! Customers log in with email and password against the customer directory.
//! The logged-in identity lives in the session next to the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::{CurrentCustomer, Flash, PageContext, ShopSession};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Shown for every failed login, whatever the cause.
pub const LOGIN_FAILED_NOTICE: &str = "Incorrect email or password.";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login page.
#[instrument(skip(session))]
pub async fn login_page(session: ShopSession) -> Result<impl IntoResponse> {
    Ok(LoginTemplate {
        page: session.page().await?,
    })
}

/// Handle login form submission.
///
/// A body without both fields is a client error, not a failed login.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: ShopSession,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let auth = AuthService::new(state.customers());

    match auth.login(&form.email, &form.password) {
        Ok(customer) => {
            session
                .set_current_customer(&CurrentCustomer::from(customer))
                .await?;
            session
                .push_flash(Flash::success(format!(
                    "Welcome back, {}!",
                    customer.first_name
                )))
                .await?;

            tracing::info!(customer = %customer.full_name(), "Customer logged in");
            add_breadcrumb("auth", "Customer logged in", &[]);

            Ok(Redirect::to("/melons"))
        }
        Err(e) => {
            tracing::info!(error = %e, "Login failed");
            session.push_flash(Flash::error(LOGIN_FAILED_NOTICE)).await?;
            Ok(Redirect::to("/login"))
        }
    }
}

/// Handle logout. The cart survives.
#[instrument(skip(session))]
pub async fn logout(session: ShopSession) -> Result<Redirect> {
    session.clear_current_customer().await?;
    session
        .push_flash(Flash::info("You have been logged out."))
        .await?;
    Ok(Redirect::to("/melons"))
}
