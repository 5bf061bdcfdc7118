//! Per-provider operation catalog.
//!
//! The catalog is an immutable snapshot of what every connected provider
//! advertised. Providers keep their configuration order, and operations keep the
//! order the provider listed them in, so enumeration is deterministic.

use futures_util::future::join_all;
use swcommon::{Registry, Topic};
use swprovider::{OperationDescriptor, ProviderConnection, ProviderError};

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEntry {
    pub provider: String,
    pub topics: Vec<Topic>,
    pub operations: Vec<OperationDescriptor>,
}

/// An operation paired with the topic hints of the provider that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub operation: &'a OperationDescriptor,
    pub topics: &'a [Topic],
}

/// Outcome of listing one connected provider while building a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingReport {
    pub provider: String,
    pub outcome: Result<usize, ProviderError>,
}

#[derive(Debug, Clone)]
pub struct CatalogBuild {
    pub catalog: OperationCatalog,
    pub listings: Vec<ListingReport>,
}

#[derive(Debug, Clone, Default)]
pub struct OperationCatalog {
    providers: Registry<String, ProviderEntry>,
}

impl OperationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists every live connection concurrently.
    ///
    /// A provider that is not connected, or whose listing fails, contributes an
    /// empty operation list. Only listing attempts are reported.
    pub async fn build_from(connections: &[ProviderConnection]) -> CatalogBuild {
        let listings = join_all(connections.iter().map(|connection| async move {
            if !connection.is_connected() {
                return (connection, None);
            }
            (connection, Some(connection.list_operations().await))
        }))
        .await;

        let mut catalog = Self::new();
        let mut reports = Vec::new();

        for (connection, listing) in listings {
            let operations = match listing {
                None => Vec::new(),
                Some(Ok(operations)) => {
                    reports.push(ListingReport {
                        provider: connection.name().to_string(),
                        outcome: Ok(operations.len()),
                    });
                    operations
                }
                Some(Err(error)) => {
                    reports.push(ListingReport {
                        provider: connection.name().to_string(),
                        outcome: Err(error),
                    });
                    Vec::new()
                }
            };

            catalog.insert(connection.name(), connection.topics().to_vec(), operations);
        }

        CatalogBuild {
            catalog,
            listings: reports,
        }
    }

    /// Replaces the provider's entry wholesale, keeping its position.
    pub fn insert(
        &mut self,
        provider: impl Into<String>,
        topics: Vec<Topic>,
        operations: Vec<OperationDescriptor>,
    ) {
        let provider = provider.into();
        self.providers.insert(
            provider.clone(),
            ProviderEntry {
                provider,
                topics,
                operations,
            },
        );
    }

    pub fn contains_provider(&self, provider: &str) -> bool {
        self.providers.contains_key(provider)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProviderEntry> {
        self.providers.values()
    }

    pub fn all_operations(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.providers
            .values()
            .flat_map(|entry| entry.operations.iter())
    }

    /// Empty for unknown providers.
    pub fn operations_for(&self, provider: &str) -> &[OperationDescriptor] {
        self.providers
            .get(provider)
            .map(|entry| entry.operations.as_slice())
            .unwrap_or_default()
    }

    pub fn operation_count(&self) -> usize {
        self.providers
            .values()
            .map(|entry| entry.operations.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.operation_count() == 0
    }

    pub fn find(&self, provider: &str, operation: &str) -> Option<&OperationDescriptor> {
        self.operations_for(provider)
            .iter()
            .find(|candidate| candidate.name == operation)
    }

    pub fn candidates(&self) -> Vec<Candidate<'_>> {
        self.providers
            .values()
            .flat_map(entry_candidates)
            .collect()
    }

    pub fn candidates_for(&self, provider: &str) -> Vec<Candidate<'_>> {
        self.providers
            .get(provider)
            .map(|entry| entry_candidates(entry).collect())
            .unwrap_or_default()
    }
}

fn entry_candidates(entry: &ProviderEntry) -> impl Iterator<Item = Candidate<'_>> {
    entry.operations.iter().map(|operation| Candidate {
        operation,
        topics: &entry.topics,
    })
}
