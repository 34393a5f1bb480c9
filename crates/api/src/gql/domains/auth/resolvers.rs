use async_graphql::{Context, ErrorExtensions, Object, Result};

use infra::club_interaction::validate_registration;
use infra::repos::{users, CreateUserData};

use crate::auth::cookie::build_refresh_cookie;
use crate::auth::password::PasswordService;
use crate::auth::permissions::require_user;
use crate::auth::refresh::create_refresh_token;
use crate::gql::error::{CodedResultExt, GqlError};
use crate::gql::types::User;
use crate::state::AppState;

use super::types::{AuthPayload, LoginInput, RegisterInput};

// ── Queries ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    /// The signed-in user (drives the header's "logged in as" line).
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let user_id = require_user(ctx).coded()?;
        let state = ctx.data::<AppState>()?;

        let user = users::get_by_id(&state.db, user_id)
            .await
            .coded()?
            .ok_or_else(|| GqlError::not_found("User"))
            .coded()?;

        Ok(user.into())
    }
}

// ── Mutations ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Create an account. Validation runs before any store access.
    async fn register_user(&self, ctx: &Context<'_>, input: RegisterInput) -> Result<User> {
        let email = input.email.trim().to_string();
        validate_registration(&email, &input.password, &input.repeat_password).coded()?;

        let state = ctx.data::<AppState>()?;

        if users::find_by_email(&state.db, &email)
            .await
            .coded()?
            .is_some()
        {
            return Err(
                GqlError::InvalidInput("User with this email already exists".to_string()).extend(),
            );
        }

        let password_hash = PasswordService::hash_password_blocking(input.password)
            .await
            .coded()?;

        let row = users::create(
            &state.db,
            CreateUserData {
                email,
                password_hash,
            },
        )
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration of the same email.
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return GqlError::InvalidInput(
                        "User with this email already exists".to_string(),
                    );
                }
            }
            GqlError::Sqlx(e)
        })
        .coded()?;

        tracing::info!(user_id = %row.id, "User registered");

        Ok(row.into())
    }

    /// Sign in with email and password. Returns an access token and sets the
    /// refresh cookie.
    async fn login_user(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AuthPayload> {
        let state = ctx.data::<AppState>()?;
        let invalid = || GqlError::Unauthenticated("Invalid credentials".to_string()).extend();

        let user_row = users::find_by_email(&state.db, input.email.trim())
            .await
            .coded()?;

        // Unknown emails pay for a bcrypt round too, so timing does not reveal
        // which addresses are registered.
        let stored_hash = user_row.as_ref().map(|row| row.password_hash.clone());
        let password_ok = PasswordService::check_credentials_blocking(input.password, stored_hash)
            .await
            .coded()?;

        let user_row = match user_row {
            Some(row) if password_ok => row,
            _ => return Err(invalid()),
        };

        let token = state
            .jwt_service()
            .create_token(user_row.id, user_row.email.clone())
            .coded()?;

        let auth_config = state.auth_config();
        let raw_refresh = create_refresh_token(
            &state.db,
            user_row.id,
            auth_config.refresh_token_expiration_days,
        )
        .await
        .coded()?;

        ctx.insert_http_header(
            "Set-Cookie",
            build_refresh_cookie(
                &raw_refresh,
                auth_config.refresh_max_age_secs(),
                &auth_config.cookie_domain,
                auth_config.cookie_secure,
            ),
        );

        Ok(AuthPayload {
            token,
            user: user_row.into(),
        })
    }
}
