/// Errors from a single catalog adapter.
///
/// These never reach HTTP callers: [`crate::search`] logs them and
/// degrades to an empty result.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream catalog returned a non-2xx status code.
    #[error("{catalog} returned HTTP {status}")]
    HttpStatus {
        catalog: &'static str,
        status: u16,
    },

    /// The catalog requires a credential that is not configured.
    #[error("{0} API key is not configured")]
    MissingCredential(&'static str),
}
