//! URL construction for the token endpoint.

use logtail_core::TokenParams;
use url::Url;

/// Append `params` to the endpoint as query parameters.
///
/// Existing query parameters on the endpoint are kept.
pub fn build_token_url(endpoint: &Url, params: &TokenParams) -> Url {
    let mut url = endpoint.clone();
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter());
    }
    url
}
