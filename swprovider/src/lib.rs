//! Provider connections, transports, and the operation/result data model.
//!
//! ```rust
//! use swprovider::{ContentPart, ProviderConfig, TransportKind};
//!
//! let config = ProviderConfig::http("atlassian", "http://localhost:9000/mcp");
//! assert_eq!(config.transport.kind(), TransportKind::Http);
//! assert_eq!(ContentPart::text("ok").as_text(), Some("ok"));
//! ```

mod config;
mod connection;
mod error;
mod model;
pub mod transport;

pub use config::{ProviderConfig, TransportDescriptor, TransportKind};
pub use connection::{DefaultConnector, ProviderConnection, ProviderConnector};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{ContentPart, InputSchema, OperationDescriptor, ParamType, SchemaProperty};
pub use transport::{McpTransport, ProviderTransport, RpcChannel};

pub type ProviderFuture<'a, T> = swcommon::BoxFuture<'a, T>;

pub mod prelude {
    pub use crate::{
        ContentPart, DefaultConnector, InputSchema, OperationDescriptor, ParamType,
        ProviderConfig, ProviderConnection, ProviderConnector, ProviderError, ProviderErrorKind,
        ProviderFuture, ProviderTransport, TransportDescriptor, TransportKind,
    };
}
