/// A read-only resource address understood by the gateway. Addresses are
/// hierarchical `/`-separated paths with typed positional parameters.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ResourceAddress {
    Status,
    RandomJoke,
    JokeById(u64),
    Search { query: String, count: usize },
}

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
#[error("Unrecognized resource address: {0}")]
pub struct AddressError(String);

impl ResourceAddress {
    /// Routing table over the address segments. Each template maps to one
    /// variant; anything else is rejected.
    ///
    /// # Errors
    /// Returns [`AddressError`] for addresses that match no template,
    /// including non-numeric id or count parameters.
    pub fn parse(address: &str) -> Result<Self, AddressError> {
        let reject = || AddressError(address.to_string());

        let segments = address.trim_matches('/').split('/').collect::<Vec<_>>();
        match segments.as_slice() {
            ["status"] => Ok(Self::Status),
            ["joke"] => Ok(Self::RandomJoke),
            ["joke", id] => id.parse().map(Self::JokeById).map_err(|_| reject()),
            ["jokes", "search", query] if !query.is_empty() => {
                Ok(Self::Search { query: (*query).to_string(), count: 1 })
            }
            ["jokes", "search", query, count] if !query.is_empty() => count
                .parse()
                .map(|count| Self::Search { query: (*query).to_string(), count })
                .map_err(|_| reject()),
            _ => Err(reject()),
        }
    }
}
