//! Reverse DNS lookup (PTR records).

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;

use crate::error_handling::QueryError;

/// Resolves an address to the names that point back at it.
#[async_trait]
pub trait ReverseLookup: Send + Sync {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, QueryError>;
}

/// `ReverseLookup` backed by the hickory resolver.
pub struct HickoryReverseLookup {
    resolver: Arc<TokioAsyncResolver>,
}

impl HickoryReverseLookup {
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ReverseLookup for HickoryReverseLookup {
    /// Returns every PTR name for `ip`, in answer order.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Resolve` when the lookup fails, including the
    /// common "no records found" case; callers treat that as an empty PTR.
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, QueryError> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(response) => Ok(response.iter().map(|name| name.to_string()).collect()),
            Err(e) => Err(QueryError::Resolve {
                target: ip.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
