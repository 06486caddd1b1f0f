//! Authentication route handlers.
//!
//! Login and signup proxy straight to the backend's customer/owner
//! endpoints; the bearer token it issues is kept in the session alongside
//! the profile fields the pages display. Validation failures and backend
//! rejections come back as flash messages on the same form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use nextgen_core::{Email, Role};

use crate::api::ApiError;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::flash::{Flash, push_flash};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::PageContext;
use crate::state::AppState;

/// Shortest password signup accepts.
const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Forms
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub role: Role,
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
}

// =============================================================================
// Helpers
// =============================================================================

/// User-facing message for a failed auth call.
fn auth_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Wrong email or password.".to_string(),
        ApiError::Backend { message, .. } | ApiError::NotFound(message) => message.clone(),
        ApiError::Http(_) | ApiError::Parse(_) => {
            "The food court service is unavailable right now".to_string()
        }
    }
}

/// Landing page after login, by role.
const fn post_login_path(role: Role) -> &'static str {
    match role {
        Role::Customer => "/",
        Role::Owner => "/dashboard/owner",
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
#[instrument(skip(session))]
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        ctx: PageContext::build(&session).await,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => {
            push_flash(&session, Flash::error(e.to_string())).await;
            return Ok(Redirect::to("/auth/login").into_response());
        }
    };
    if form.password.is_empty() {
        push_flash(&session, Flash::error("Password is required")).await;
        return Ok(Redirect::to("/auth/login").into_response());
    }

    let response = match state
        .backend()
        .login(form.role, email.as_str(), &form.password)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::info!(role = ?form.role, "Login rejected: {e}");
            push_flash(&session, Flash::error(auth_error_message(&e))).await;
            return Ok(Redirect::to("/auth/login").into_response());
        }
    };

    // Older backend builds omit the embedded profile; fetch it with the
    // fresh token when missing
    let profile = match response.profile() {
        Some(profile) => profile.clone(),
        None => state.backend().user_details(form.role, &response.token).await?,
    };

    let user = CurrentUser {
        id: profile.id,
        name: profile.name,
        email: profile.email,
        role: form.role,
        token: response.token,
    };
    // A pre-login session id must not survive into the authenticated session
    session.cycle_id().await?;
    set_current_user(&session, &user).await?;
    set_sentry_user(user.id, Some(&user.email));

    push_flash(&session, Flash::success(format!("Welcome back, {}!", user.name))).await;
    Ok(Redirect::to(post_login_path(form.role)).into_response())
}

/// Display the register page.
#[instrument(skip(session))]
pub async fn register_page(session: Session) -> impl IntoResponse {
    RegisterTemplate {
        ctx: PageContext::build(&session).await,
    }
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let name = form.name.trim();

    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => {
            push_flash(&session, Flash::error(e.to_string())).await;
            return Ok(Redirect::to("/auth/register").into_response());
        }
    };
    let validation_error = if name.is_empty() {
        Some("Name is required")
    } else if form.password.len() < MIN_PASSWORD_LENGTH {
        Some("Password must be at least 6 characters")
    } else if form.password != form.password_confirm {
        Some("Passwords do not match")
    } else {
        None
    };
    if let Some(message) = validation_error {
        push_flash(&session, Flash::error(message)).await;
        return Ok(Redirect::to("/auth/register").into_response());
    }

    match state
        .backend()
        .signup(form.role, name, email.as_str(), &form.password)
        .await
    {
        Ok(profile) => {
            tracing::info!(account_id = profile.id, role = ?form.role, "Account created");
            push_flash(
                &session,
                Flash::success("Account created. Please sign in."),
            )
            .await;
            Ok(Redirect::to("/auth/login").into_response())
        }
        Err(e) => {
            tracing::info!(role = ?form.role, "Signup rejected: {e}");
            push_flash(&session, Flash::error(auth_error_message(&e))).await;
            Ok(Redirect::to("/auth/register").into_response())
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    push_flash(&session, Flash::info("Signed out")).await;
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            auth_error_message(&ApiError::Unauthorized),
            "Wrong email or password."
        );
        assert_eq!(
            auth_error_message(&ApiError::Backend {
                status: axum::http::StatusCode::BAD_REQUEST,
                message: "Email already exists.".to_string(),
            }),
            "Email already exists."
        );
    }

    #[test]
    fn test_post_login_landing() {
        assert_eq!(post_login_path(Role::Customer), "/");
        assert_eq!(post_login_path(Role::Owner), "/dashboard/owner");
    }
}
