/// Creates a [`RouteRequest`](crate::RouteRequest) from a routing shorthand.
///
/// ```rust
/// use switchboard::{RoutingMode, sb_request};
///
/// let request = sb_request!(auto => "add 5 and 3");
/// assert_eq!(request.mode, RoutingMode::Auto);
///
/// let request = sb_request!(manual "github" => "search repositories for tokio");
/// assert_eq!(request.mode.provider(), Some("github"));
///
/// let request = sb_request!(auto => "sqrt 144", id = "req-7");
/// assert_eq!(request.request_id.as_str(), "req-7");
/// ```
#[macro_export]
macro_rules! sb_request {
    (auto => $message:expr, id = $id:expr $(,)?) => {
        $crate::RouteRequest::auto($message).with_request_id($id)
    };
    (auto => $message:expr $(,)?) => {
        $crate::RouteRequest::auto($message)
    };
    (manual $provider:expr => $message:expr, id = $id:expr $(,)?) => {
        $crate::RouteRequest::manual($provider, $message).with_request_id($id)
    };
    (manual $provider:expr => $message:expr $(,)?) => {
        $crate::RouteRequest::manual($provider, $message)
    };
}

/// Creates a [`SwitchboardConfig`](crate::SwitchboardConfig) from provider configs.
///
/// ```rust
/// use switchboard::{ProviderConfig, sb_config};
///
/// let config = sb_config![
///     ProviderConfig::http("github", "http://localhost:8080/mcp"),
///     ProviderConfig::stdio("calculator", "python3", ["calc.py"]),
/// ];
/// assert_eq!(config.providers.len(), 2);
/// ```
#[macro_export]
macro_rules! sb_config {
    () => {
        $crate::SwitchboardConfig::default()
    };
    ($($provider:expr),+ $(,)?) => {
        $crate::SwitchboardConfig::new(vec![$($provider),+])
    };
}
