use crate::config::SecretManager;
use crate::errors::internal::AdminGateError;
use crate::errors::InternalError;
use crate::services::crypto;
use crate::services::token_service::TokenService;
use crate::types::internal::{AdminClaims, IssuedToken};

/// Shared-password gate guarding admin mode and stone writes
pub struct AdminGate {
    admin_password: Option<String>,
    tokens: Option<TokenService>,
    require_token: bool,
}

impl AdminGate {
    /// Build the gate from loaded secrets
    ///
    /// Tokens are signed with ADMIN_TOKEN_SECRET when set, otherwise with a
    /// key derived from the admin password. With neither configured the gate
    /// refuses every login and every token.
    pub fn new(secrets: &SecretManager, require_token: bool) -> Result<Self, InternalError> {
        Self::from_parts(
            secrets.admin_password().map(str::to_string),
            secrets.token_secret().map(str::to_string),
            require_token,
        )
    }

    pub fn from_parts(
        admin_password: Option<String>,
        token_secret: Option<String>,
        require_token: bool,
    ) -> Result<Self, InternalError> {
        let signing_key = match (&token_secret, &admin_password) {
            (Some(secret), _) => Some(secret.clone()),
            (None, Some(password)) => Some(crypto::derive_signing_key(password)?),
            (None, None) => None,
        };

        Ok(Self {
            admin_password,
            tokens: signing_key.map(TokenService::new),
            require_token,
        })
    }

    /// Check a submitted password and issue an admin token on match
    pub fn login(&self, password: Option<&str>) -> Result<IssuedToken, InternalError> {
        let submitted = password
            .filter(|p| !p.is_empty())
            .ok_or(AdminGateError::MissingPassword)?;

        let (Some(expected), Some(tokens)) = (self.admin_password.as_deref(), self.tokens.as_ref()) else {
            return Err(AdminGateError::SecretNotConfigured.into());
        };

        if !crypto::secrets_match(expected, submitted)? {
            return Err(AdminGateError::IncorrectPassword.into());
        }

        let issued = tokens.issue()?;
        tracing::info!(jti = %issued.jti, "Admin login succeeded");

        Ok(issued)
    }

    /// Authorize a write request from its bearer token
    ///
    /// When token enforcement is off every request passes; a valid token, if
    /// presented, is still decoded so its claims reach the request context.
    pub fn authorize(&self, bearer: Option<&str>) -> Result<Option<AdminClaims>, InternalError> {
        if !self.require_token {
            let claims = match (bearer, self.tokens.as_ref()) {
                (Some(token), Some(tokens)) => tokens.validate(token).ok(),
                _ => None,
            };
            return Ok(claims);
        }

        let tokens = self.tokens.as_ref().ok_or(AdminGateError::SecretNotConfigured)?;
        let token = bearer.ok_or(AdminGateError::MissingToken)?;

        tokens.validate(token).map(Some)
    }

    /// Exchange a still-valid admin token for a fresh one
    ///
    /// Each renewal restarts the token's lifetime, so an admin who keeps
    /// working is never cut off at a fixed time after login.
    pub fn refresh(&self, bearer: Option<&str>) -> Result<IssuedToken, InternalError> {
        let tokens = self.tokens.as_ref().ok_or(AdminGateError::SecretNotConfigured)?;
        let token = bearer.ok_or(AdminGateError::MissingToken)?;

        let claims = tokens.validate(token)?;
        let issued = tokens.issue()?;
        tracing::debug!(previous = %claims.jti, jti = %issued.jti, "Admin token renewed");

        Ok(issued)
    }

    pub fn requires_token(&self) -> bool {
        self.require_token
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .field("tokens", &self.tokens)
            .field("require_token", &self.require_token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(require_token: bool) -> AdminGate {
        AdminGate::from_parts(Some("open-sesame".to_string()), None, require_token).unwrap()
    }

    #[test]
    fn test_login_with_correct_password_issues_token() {
        let gate = gate(true);

        let issued = gate.login(Some("open-sesame")).unwrap();

        assert_eq!(issued.expires_in, 1800);
        let claims = gate.authorize(Some(&issued.token)).unwrap().unwrap();
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn test_login_with_wrong_password_fails() {
        let result = gate(true).login(Some("wrong"));

        assert!(matches!(result, Err(InternalError::AdminGate(AdminGateError::IncorrectPassword))));
    }

    #[test]
    fn test_login_without_password_is_bad_request() {
        let gate = gate(true);

        assert!(matches!(gate.login(None), Err(InternalError::AdminGate(AdminGateError::MissingPassword))));
        assert!(matches!(gate.login(Some("")), Err(InternalError::AdminGate(AdminGateError::MissingPassword))));
    }

    #[test]
    fn test_login_without_configured_secret_fails_closed() {
        let gate = AdminGate::from_parts(None, None, true).unwrap();

        let result = gate.login(Some("anything"));

        assert!(matches!(result, Err(InternalError::AdminGate(AdminGateError::SecretNotConfigured))));
    }

    #[test]
    fn test_missing_password_checked_before_configuration() {
        let gate = AdminGate::from_parts(None, None, true).unwrap();

        assert!(matches!(gate.login(None), Err(InternalError::AdminGate(AdminGateError::MissingPassword))));
    }

    #[test]
    fn test_authorize_requires_token_when_enforced() {
        let result = gate(true).authorize(None);

        assert!(matches!(result, Err(InternalError::AdminGate(AdminGateError::MissingToken))));
    }

    #[test]
    fn test_authorize_rejects_forged_token() {
        let forged = AdminGate::from_parts(Some("other-password".to_string()), None, true)
            .unwrap()
            .login(Some("other-password"))
            .unwrap();

        let result = gate(true).authorize(Some(&forged.token));

        assert!(matches!(result, Err(InternalError::AdminGate(AdminGateError::InvalidToken(_)))));
    }

    #[test]
    fn test_authorize_passes_everything_when_not_enforced() {
        let gate = gate(false);

        assert!(gate.authorize(None).unwrap().is_none());
        assert!(gate.authorize(Some("garbage")).unwrap().is_none());
    }

    #[test]
    fn test_dedicated_token_secret_is_used_for_signing() {
        let secret = "dedicated-token-secret-with-32-chars!".to_string();
        let gate = AdminGate::from_parts(Some("open-sesame".to_string()), Some(secret.clone()), true).unwrap();
        let issued = gate.login(Some("open-sesame")).unwrap();

        let claims = TokenService::new(secret).validate(&issued.token).unwrap();

        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn test_refresh_extends_a_token_close_to_expiry() {
        let secret = "dedicated-token-secret-with-32-chars!".to_string();
        let gate = AdminGate::from_parts(Some("open-sesame".to_string()), Some(secret.clone()), true).unwrap();
        let now = chrono::Utc::now().timestamp();
        let aging = TokenService::new(secret.clone()).issue_at(now - 25 * 60).unwrap();

        let renewed = gate.refresh(Some(&aging.token)).unwrap();

        let claims = TokenService::new(secret).validate(&renewed.token).unwrap();
        assert!(claims.exp >= now + 29 * 60);
        assert_ne!(renewed.jti, aging.jti);
    }

    #[test]
    fn test_refresh_rejects_expired_and_missing_tokens() {
        let secret = "dedicated-token-secret-with-32-chars!".to_string();
        let gate = AdminGate::from_parts(Some("open-sesame".to_string()), Some(secret.clone()), true).unwrap();
        let expired = TokenService::new(secret)
            .issue_at(chrono::Utc::now().timestamp() - 45 * 60)
            .unwrap();

        assert!(matches!(
            gate.refresh(Some(&expired.token)),
            Err(InternalError::AdminGate(AdminGateError::ExpiredToken))
        ));
        assert!(matches!(
            gate.refresh(None),
            Err(InternalError::AdminGate(AdminGateError::MissingToken))
        ));
    }

    #[test]
    fn test_authorize_without_any_secret_is_unavailable() {
        let gate = AdminGate::from_parts(None, None, true).unwrap();

        let err = gate.authorize(Some("token")).unwrap_err();

        assert!(err.is_unavailable());
    }
}
