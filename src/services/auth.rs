use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{DateTime, Utc};

use crate::{
    auth::{hash_password, token::remaining_lifetime, verify_password, TokenIssuer},
    config::{AuthConfig, CookieConfig},
    error::AppError,
    models::user::{
        AuthResponse, Claims, LoginPayload, RegisterPayload, SessionStatus, StatusMessage, User,
    },
    store::UserStore,
};

/// Register, login, session verification and logout.
#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    tokens: TokenIssuer,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: UserStore, config: AuthConfig) -> Self {
        let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl);
        Self {
            users,
            tokens,
            config,
        }
    }

    #[cfg(test)]
    pub(crate) fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie.name
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthResponse, AppError> {
        let role = payload.validate()?;
        let password_hash = hash_password(&payload.password)?;
        let user = self
            .users
            .create(&payload.email, &password_hash, role)
            .await?;
        tracing::info!(user_id = user.id, role = %user.role, "user registered");

        let (access_token, _) = self.issue_for(&user, Utc::now())?;
        Ok(AuthResponse { access_token })
    }

    /// On success the session cookie is added to the returned jar.
    pub async fn login(
        &self,
        jar: CookieJar,
        payload: LoginPayload,
    ) -> Result<(CookieJar, StatusMessage), AppError> {
        payload.validate()?;

        let user = self
            .users
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::LoginFail)?;

        if !verify_password(&payload.password, &user.password_hash) {
            tracing::info!(user_id = user.id, "login rejected: password mismatch");
            return Err(AppError::LoginFail);
        }

        let (token, _) = self.issue_for(&user, Utc::now())?;
        tracing::info!(user_id = user.id, "login succeeded");
        Ok((
            jar.add(session_cookie(&self.config.cookie, token)),
            StatusMessage::new(true, "Login successful"),
        ))
    }

    pub fn verify_session(&self, jar: CookieJar) -> (CookieJar, SessionStatus) {
        self.verify_session_at(jar, Utc::now())
    }

    /// Never fails: any problem with the cookie reads as "not authenticated".
    /// Tokens close to expiry are reissued into the jar.
    pub fn verify_session_at(
        &self,
        jar: CookieJar,
        now: DateTime<Utc>,
    ) -> (CookieJar, SessionStatus) {
        let Some(token) = jar.get(self.cookie_name()).map(|c| c.value().to_string()) else {
            return (jar, SessionStatus::anonymous());
        };

        let claims = match self.tokens.verify(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("session rejected: {}", e);
                return (jar, SessionStatus::anonymous());
            }
        };

        let status = SessionStatus::authenticated(claims.email.clone());
        if remaining_lifetime(&claims, now) >= self.config.refresh_threshold {
            return (jar, status);
        }

        match self.tokens.issue(&claims.sub, &claims.email, claims.role, now) {
            Ok((fresh, _)) => {
                tracing::debug!(sub = %claims.sub, "session token refreshed");
                (jar.add(session_cookie(&self.config.cookie, fresh)), status)
            }
            Err(e) => {
                tracing::warn!("session refresh failed: {}", e);
                (jar, status)
            }
        }
    }

    pub fn logout(&self, jar: CookieJar) -> (CookieJar, StatusMessage) {
        let had_session = jar.get(self.cookie_name()).is_some();
        let jar = jar.remove(Cookie::build((self.config.cookie.name.clone(), "")).path("/"));

        let message = if had_session {
            StatusMessage::new(true, "Session successfully closed.")
        } else {
            StatusMessage::new(false, "No active session found.")
        };
        (jar, message)
    }

    /// Verifies a bearer or cookie token for a protected route.
    pub fn authenticate(&self, token: &str) -> Result<Claims, AppError> {
        self.tokens.verify(token).map_err(|e| {
            tracing::debug!("token rejected: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string())
        })
    }

    /// Loads the user behind a token subject; privileged operations call this
    /// instead of trusting the role claim.
    pub async fn resolve_principal(&self, claims: &Claims) -> Result<User, AppError> {
        let unknown = || AppError::Unauthorized("User no longer exists".to_string());
        let id: i64 = claims.sub.parse().map_err(|_| unknown())?;
        self.users.find_by_id(id).await?.ok_or_else(unknown)
    }

    fn issue_for(&self, user: &User, now: DateTime<Utc>) -> Result<(String, Claims), AppError> {
        Ok(self
            .tokens
            .issue(&user.id.to_string(), &user.email, user.role, now)?)
    }
}

fn session_cookie(config: &CookieConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .max_age(time::Duration::seconds(config.max_age.num_seconds()))
        .build()
}
