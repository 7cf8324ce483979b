use std::net::IpAddr;

use uuid::Uuid;

use crate::types::internal::auth::AdminClaims;

/// Request context that flows from the API layer into logging
///
/// Built once at the top of every endpoint. Carries the request id used to
/// correlate log lines, the client address, and the admin claims when the
/// request presented a valid admin token.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request
    pub request_id: Uuid,

    /// Whether a valid admin token was presented
    pub authenticated: bool,

    /// Admin token claims if authenticated
    pub claims: Option<AdminClaims>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: Uuid::new_v4(),
            authenticated: false,
            claims: None,
        }
    }

    pub fn with_ip_address(mut self, ip_address: Option<IpAddr>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn with_claims(mut self, claims: AdminClaims) -> Self {
        self.authenticated = true;
        self.claims = Some(claims);
        self
    }

    /// Token id of the admin session, if any
    pub fn token_id(&self) -> Option<&str> {
        self.claims.as_ref().map(|claims| claims.jti.as_str())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
