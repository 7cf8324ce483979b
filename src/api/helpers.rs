use std::net::IpAddr;

use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};

use crate::errors::InternalError;
use crate::services::AdminGate;
use crate::types::internal::RequestContext;

/// Client address, preferring proxy headers over the socket address
pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
    // Check X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().parse().ok();
        }
    }

    // Check X-Real-IP header (nginx)
    if let Some(real_ip) = req.header("X-Real-IP") {
        return real_ip.trim().parse().ok();
    }

    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}

/// Token from an `Authorization: Bearer ...` header, if present
pub fn extract_bearer_token(req: &Request) -> Option<String> {
    Bearer::from_request(req)
        .ok()
        .map(|bearer| bearer.token)
        .filter(|token| !token.is_empty())
}

/// Unauthenticated context for a request
pub fn create_request_context(req: &Request) -> RequestContext {
    RequestContext::new().with_ip_address(extract_ip_address(req))
}

/// Context for a write request, checked against the admin gate
pub fn authorize_admin(req: &Request, admin_gate: &AdminGate) -> Result<RequestContext, InternalError> {
    let ctx = create_request_context(req);
    let token = extract_bearer_token(req);

    match admin_gate.authorize(token.as_deref()) {
        Ok(Some(claims)) => Ok(ctx.with_claims(claims)),
        Ok(None) => Ok(ctx),
        Err(err) => {
            tracing::warn!(
                request_id = %ctx.request_id,
                ip = ?ctx.ip_address,
                "Rejected stone write: {}",
                err
            );
            Err(err)
        }
    }
}
