//! Integration tests for Mercado.
//!
//! # Running Tests
//!
//! These tests drive a live stack:
//!
//! ```bash
//! # Start PostgreSQL and the storefront
//! docker compose up -d postgres
//! cargo run -p mercado-storefront
//!
//! # Run the live tests
//! cargo test -p mercado-integration-tests -- --ignored
//! ```
//!
//! Tests that need the running server are `#[ignore]`d so the default test
//! run stays self-contained. The realtime channel's persist-and-rebroadcast
//! behavior is covered at the hub level inside the storefront crate; the
//! tests here exercise the HTTP surface end to end.

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Create an HTTP client that keeps session cookies between requests and
/// surfaces redirects instead of following them.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        if std::env::var("STOREFRONT_BASE_URL").is_err() {
            assert_eq!(storefront_base_url(), "http://localhost:8080");
        }
    }
}
