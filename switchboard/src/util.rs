//! Small convenience constructors for routing requests.

use swengine::{RouteRequest, RoutingMode};

/// Maps a user-facing mode value to a [`RoutingMode`].
///
/// `"auto"` (any case) and blank values select automatic routing; anything
/// else is taken as a provider name.
pub fn parse_routing_mode(value: &str) -> RoutingMode {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
        RoutingMode::Auto
    } else {
        RoutingMode::Manual(trimmed.to_string())
    }
}

pub fn auto_request(message: impl Into<String>) -> RouteRequest {
    RouteRequest::auto(message)
}

pub fn manual_request(provider: impl Into<String>, message: impl Into<String>) -> RouteRequest {
    RouteRequest::manual(provider, message)
}

pub fn request(mode: &str, message: impl Into<String>) -> RouteRequest {
    RouteRequest::new(message, parse_routing_mode(mode))
}
