//! Configuration for the frontend application

/// Read API prefix.
/// - Same-origin deployments (the backend serves the bundle): "/api"
/// - Split deployments: set `AFFILIATE_API_BASE` when building
pub const API_BASE: &str = match option_env!("AFFILIATE_API_BASE") {
    Some(url) => url,
    None => "/api",
};

/// Whether this build may substitute sample data for failed fetches.
pub const DEMO_MODE: bool = cfg!(feature = "demo");

/// Helper function to construct API endpoint URLs
pub fn api_url(path: &str) -> String {
    let base = API_BASE.trim_end_matches('/');
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_with_one_slash() {
        let expected = format!("{}/posts", API_BASE.trim_end_matches('/'));
        assert_eq!(api_url("/posts"), expected);
        assert_eq!(api_url("posts"), expected);
    }
}
