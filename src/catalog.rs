//! Card catalog integration.
//!
//! This module provides the [`CardCatalog`] capability the reply composer
//! consults for exact-name card images and random flavour text, and
//! [`ScryfallClient`], its implementation against the Scryfall API.
//!
//! The catalog is an enrichment: the trait methods never fail. Errors are
//! logged and surface as "no image" or as the fallback flavour line.

use crate::error::{BelcherError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Returned by [`CardCatalog::random_flavour_text`] when the catalog is unreachable.
pub const FALLBACK_FLAVOUR: &str =
    "Sometimes, rarely, Scryfall is not there and the world is out of flavour.";

/// Best-effort card lookups.
#[allow(async_fn_in_trait)]
pub trait CardCatalog {
    /// Image URL of the card named exactly `name`, if there is one.
    async fn lookup_by_exact_name(&self, name: &str) -> Option<String>;

    /// A random flavour line, or [`FALLBACK_FLAVOUR`].
    async fn random_flavour_text(&self) -> String;
}

#[derive(Deserialize, Debug)]
struct ImageUris {
    normal: String,
}

#[derive(Deserialize, Debug)]
struct CardFace {
    #[serde(default)]
    image_uris: Option<ImageUris>,
}

/// The parts of a Scryfall card object the bot cares about.
#[derive(Deserialize, Debug)]
struct ScryfallCard {
    #[serde(default)]
    content_warning: bool,
    #[serde(default)]
    image_uris: Option<ImageUris>,
    #[serde(default)]
    card_faces: Vec<CardFace>,
}

impl ScryfallCard {
    /// Normal-size image, falling back to the front face of multi-faced cards.
    fn normal_image(self) -> Option<String> {
        if let Some(uris) = self.image_uris {
            return Some(uris.normal);
        }
        self.card_faces
            .into_iter()
            .find_map(|face| face.image_uris)
            .map(|uris| uris.normal)
    }
}

#[derive(Deserialize, Debug)]
struct FlavourCard {
    flavor_text: String,
}

/// HTTP client for the Scryfall API.
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScryfallClient {
    /// Build a client with a bounded request timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://api.scryfall.com`
    /// * `user_agent` - Sent with every request, as the API usage policy requires
    /// * `timeout` - Upper bound on a whole request
    ///
    /// # Errors
    ///
    /// Returns an error if the user agent is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| BelcherError::Config(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BelcherError::Catalog(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the image of the card named exactly `name`.
    ///
    /// # Returns
    ///
    /// Returns `Some(url)` for a match, `None` if no card has that name or the
    /// card carries a content warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a card.
    pub async fn fetch_image(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}/cards/named", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("exact", name)])
            .send()
            .await
            .map_err(|e| BelcherError::Catalog(format!("Request failed: {}", e)))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(BelcherError::Catalog(format!(
                "API returned error: {}",
                resp.status()
            )));
        }

        let card = resp
            .json::<ScryfallCard>()
            .await
            .map_err(|e| BelcherError::Catalog(format!("Invalid response: {}", e)))?;

        if card.content_warning {
            return Ok(None);
        }
        match card.normal_image() {
            Some(image) => Ok(Some(image)),
            None => Err(BelcherError::Catalog(format!(
                "Card '{}' has no image",
                name
            ))),
        }
    }

    /// Fetch the flavour text of a random card that has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no flavour text.
    pub async fn fetch_random_flavour(&self) -> Result<String> {
        let url = format!("{}/cards/random", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("q", "has:flavor")])
            .send()
            .await
            .map_err(|e| BelcherError::Catalog(format!("Request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(BelcherError::Catalog(format!(
                "API returned error: {}",
                resp.status()
            )));
        }

        let card = resp
            .json::<FlavourCard>()
            .await
            .map_err(|e| BelcherError::Catalog(format!("Invalid response: {}", e)))?;
        Ok(card.flavor_text)
    }
}

impl CardCatalog for ScryfallClient {
    async fn lookup_by_exact_name(&self, name: &str) -> Option<String> {
        match self.fetch_image(name).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(card = %name, error = %e, "Ignoring Scryfall for this card");
                None
            }
        }
    }

    async fn random_flavour_text(&self) -> String {
        match self.fetch_random_flavour().await {
            Ok(flavour) => flavour,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring Scryfall, using fallback flavour");
                FALLBACK_FLAVOUR.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> ScryfallClient {
        ScryfallClient::new(&server.url(), "MTGCardBelcher/test", Duration::from_secs(5))
            .expect("client builds")
    }

    #[tokio::test]
    async fn test_lookup_exact_match() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cards/named")
            .match_query(Matcher::UrlEncoded("exact".into(), "Storm Crow".into()))
            .match_header("user-agent", "MTGCardBelcher/test")
            .with_status(200)
            .with_body(r#"{"name":"Storm Crow","image_uris":{"normal":"https://cards.example/storm-crow.jpg"}}"#)
            .create_async()
            .await;

        let image = client(&server).lookup_by_exact_name("Storm Crow").await;
        assert_eq!(image.as_deref(), Some("https://cards.example/storm-crow.jpg"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cards/named")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"object":"error","code":"not_found"}"#)
            .create_async()
            .await;

        assert_eq!(client(&server).lookup_by_exact_name("Not A Card").await, None);
    }

    #[tokio::test]
    async fn test_lookup_content_warning_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cards/named")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"content_warning":true,"image_uris":{"normal":"https://cards.example/x.jpg"}}"#)
            .create_async()
            .await;

        assert_eq!(client(&server).lookup_by_exact_name("Invoke Prejudice").await, None);
    }

    #[tokio::test]
    async fn test_lookup_multi_faced_card() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cards/named")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"card_faces":[{"image_uris":{"normal":"https://cards.example/front.jpg"}},{"image_uris":{"normal":"https://cards.example/back.jpg"}}]}"#)
            .create_async()
            .await;

        let image = client(&server).lookup_by_exact_name("Delver of Secrets").await;
        assert_eq!(image.as_deref(), Some("https://cards.example/front.jpg"));
    }

    #[tokio::test]
    async fn test_lookup_server_error_degrades_to_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cards/named")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let catalog = client(&server);
        assert!(catalog.fetch_image("Negate").await.is_err());
        assert_eq!(catalog.lookup_by_exact_name("Negate").await, None);
    }

    #[tokio::test]
    async fn test_lookup_bad_payload_degrades_to_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cards/named")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("definitely not json")
            .create_async()
            .await;

        assert_eq!(client(&server).lookup_by_exact_name("Negate").await, None);
    }

    #[tokio::test]
    async fn test_random_flavour() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cards/random")
            .match_query(Matcher::UrlEncoded("q".into(), "has:flavor".into()))
            .with_status(200)
            .with_body(r#"{"name":"Storm Crow","flavor_text":"Descending, winter unending."}"#)
            .create_async()
            .await;

        assert_eq!(
            client(&server).random_flavour_text().await,
            "Descending, winter unending."
        );
    }

    #[tokio::test]
    async fn test_random_flavour_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cards/random")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"name":"Plains"}"#)
            .create_async()
            .await;

        assert_eq!(client(&server).random_flavour_text().await, FALLBACK_FLAVOUR);
    }

    #[test]
    fn test_invalid_user_agent() {
        let result = ScryfallClient::new("https://api.scryfall.com", "bad\nagent", Duration::from_secs(1));
        assert!(matches!(result, Err(BelcherError::Config(_))));
    }
}
