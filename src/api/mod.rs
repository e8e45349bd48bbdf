// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod connections;
pub mod health;
pub mod ideas;
pub mod matching;

use std::net::IpAddr;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use connections::ConnectionsApi;
pub use health::HealthApi;
pub use ideas::IdeasApi;
pub use matching::MatchingApi;
use poem::Request;
use poem_openapi::{auth::Bearer, SecurityScheme};

/// Bearer token authentication scheme
///
/// Accepts tokens from either dialect; verification itself happens in the
/// token guard, not here.
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(Bearer);

pub trait Api {
    fn extract_ip_address(&self, req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr()
            .as_socket_addr()
            .map(|addr| addr.ip())
    }
}
