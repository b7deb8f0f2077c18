//! HTTP catalog client

use crate::envelope::{decode, decode_data, ErrorBody};
use async_trait::async_trait;
use folio_core::api::ApiResult;
use folio_core::{
    Ack, ApiError, BookQuery, BookRecord, BorrowReceipt, BorrowRecord, BorrowRequest, CatalogApi,
    CategorySummary, ConfigError, FolioConfig, HomeFeed, Profile, ProfileDetails, ProfileUpdate,
    Purchase, Registration, SessionContext, UserProfile, UserStats,
};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// [`CatalogApi`] over the backend's REST endpoints
///
/// Session cookies set by the backend on login are kept in a cookie jar and sent on every
/// following request. A 401 from any endpoint clears the injected [`SessionContext`].
pub struct HttpCatalog {
    base_url: Url,
    http: reqwest::Client,
    jar: Arc<Jar>,
    session: SessionContext,
}

impl HttpCatalog {
    /// Build a client for `config.api_url`
    pub fn new(config: &FolioConfig, session: SessionContext) -> folio_core::Result<Self> {
        let base = config.api_url.trim_end_matches('/');
        let base_url = Url::parse(base).map_err(|_| ConfigError::InvalidValue {
            key: "FOLIO_API_URL",
            value: config.api_url.clone(),
        })?;

        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url,
            http,
            jar,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// CSRF token the backend handed out, if any
    fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let cookies = header.to_str().ok()?;
        cookies.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == CSRF_COOKIE).then(|| value.to_string())
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        let mut builder = self.http.request(method.clone(), url);
        if method != Method::GET {
            if let Some(token) = self.csrf_token() {
                builder = builder.header(CSRF_HEADER, token);
            }
        }
        builder
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Vec<u8>> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.describe())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        tracing::warn!("Request failed with {}: {}", status, message);
        Err(match status {
            StatusCode::UNAUTHORIZED => {
                self.session.invalidate();
                ApiError::Unauthorized
            }
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&BookQuery>,
    ) -> ApiResult<T> {
        let mut builder = self.request(Method::GET, path);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        decode_data(&self.send(builder).await?)
    }

    async fn get_body<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        decode(&self.send(self.request(Method::GET, path)).await?)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Vec<u8>> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Vec<u8>> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn list_books(&self, query: &BookQuery) -> ApiResult<Vec<BookRecord>> {
        self.get_data("/books/", Some(query)).await
    }

    async fn get_book(&self, id: i64) -> ApiResult<BookRecord> {
        self.get_data(&format!("/books/{}/", id), None).await
    }

    async fn list_categories(&self) -> ApiResult<Vec<CategorySummary>> {
        self.get_data("/categories/", None).await
    }

    async fn category_books(&self, id: i64, query: &BookQuery) -> ApiResult<Vec<BookRecord>> {
        self.get_data(&format!("/categories/{}/books/", id), Some(query))
            .await
    }

    async fn home_feed(&self) -> ApiResult<HomeFeed> {
        self.get_data("/", None).await
    }

    async fn login(&self, username: &str, password: &str) -> ApiResult<UserProfile> {
        let body = self
            .post("/accounts/login/", &Credentials { username, password })
            .await?;
        decode_data(&body)
    }

    async fn register(&self, registration: &Registration) -> ApiResult<Ack> {
        let body = self.post("/accounts/register/", registration).await?;
        decode(&body)
    }

    async fn logout(&self) -> ApiResult<Ack> {
        let body = self.post("/accounts/logout/", &serde_json::json!({})).await?;
        decode(&body)
    }

    async fn me(&self) -> ApiResult<UserProfile> {
        self.get_data("/accounts/me/", None).await
    }

    async fn profile(&self) -> ApiResult<ProfileDetails> {
        self.get_body("/accounts/profile/").await
    }

    async fn user_stats(&self) -> ApiResult<UserStats> {
        self.get_body("/stats/").await
    }

    async fn my_active_borrows(&self) -> ApiResult<Vec<BorrowRecord>> {
        self.get_data("/borrows/my-active/", None).await
    }

    async fn borrow(&self, request: &BorrowRequest) -> ApiResult<BorrowReceipt> {
        decode(&self.post("/borrows/create/", request).await?)
    }

    async fn return_borrow(&self, borrow_id: i64) -> ApiResult<BorrowReceipt> {
        let path = format!("/borrows/{}/return/", borrow_id);
        decode(&self.post(&path, &serde_json::json!({})).await?)
    }

    async fn purchase(&self, book_id: i64) -> ApiResult<Purchase> {
        let path = format!("/books/{}/purchase/", book_id);
        decode(&self.post(&path, &serde_json::json!({})).await?)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile> {
        decode_data(&self.put("/accounts/profile/update/", update).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = FolioConfig {
            api_url: "not a url".into(),
            ..Default::default()
        };
        let err = HttpCatalog::new(&config, SessionContext::new()).err().unwrap();
        assert!(matches!(err, folio_core::FolioError::Config(_)));
    }

    #[test]
    fn test_url_joining() {
        let config = FolioConfig {
            api_url: "http://localhost:8000/".into(),
            ..Default::default()
        };
        let client = HttpCatalog::new(&config, SessionContext::new()).unwrap();
        assert_eq!(client.url("/books/"), "http://localhost:8000/books/");
        assert_eq!(client.url("/"), "http://localhost:8000/");
    }
}
