//! HTTP client for the photofolio API

use auth::models::{AuthSession, LoginCredentials, PublicUser};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    error::{ClientError, ClientResult},
    session::SessionStore,
};

#[derive(Debug, Deserialize)]
struct Message {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedCategory {
    category_id: i64,
}

/// Photo fields shown by the shell
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSummary {
    pub id: i64,
    pub title: String,
    pub category_name: Option<String>,
    pub file_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// API client that authenticates with the token held in its session store
pub struct AdminClient<S> {
    http: Client,
    base_url: String,
    store: S,
}

impl<S: SessionStore> AdminClient<S> {
    pub fn new(base_url: impl Into<String>, store: S) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let session = self.store.get()?.ok_or(ClientError::NotLoggedIn)?;
        Ok(request.bearer_auth(session.token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!("API responded with {}", status);

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<Message>()
            .await
            .map(|m| m.message)
            .unwrap_or_else(|_| status.to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Log in and remember the session
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<PublicUser> {
        let credentials = LoginCredentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let session: AuthSession = self
            .send(self.http.post(self.url("/auth/login")).json(&credentials))
            .await?;

        self.store.set(&session)?;
        Ok(session.user)
    }

    /// Log out; the local session is cleared even if the server call fails
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self
            .send::<Message>(self.http.post(self.url("/auth/logout")))
            .await;
        if let Err(e) = &result {
            warn!("Logout request failed: {}", e);
        }

        self.store.clear()?;
        result.map(|_| ())
    }

    pub async fn whoami(&self) -> ClientResult<PublicUser> {
        let request = self.authorized(self.http.get(self.url("/auth/me")))?;
        self.send(request).await
    }

    pub async fn list_users(&self) -> ClientResult<Vec<PublicUser>> {
        let request = self.authorized(self.http.get(self.url("/users")))?;
        self.send(request).await
    }

    pub async fn delete_user(&self, id: i64) -> ClientResult<String> {
        let request = self.authorized(self.http.delete(self.url(&format!("/users/{}", id))))?;
        Ok(self.send::<Message>(request).await?.message)
    }

    pub async fn list_photos(&self, category_id: Option<i64>) -> ClientResult<Vec<PhotoSummary>> {
        let mut request = self.http.get(self.url("/photos"));
        if let Some(category_id) = category_id {
            request = request.query(&[("category_id", category_id)]);
        }
        self.send(request).await
    }

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.send(self.http.get(self.url("/categories"))).await
    }

    /// Create a category and return its id
    pub async fn create_category(&self, name: &str, description: Option<&str>) -> ClientResult<i64> {
        let request = self.authorized(
            self.http
                .post(self.url("/categories"))
                .json(&json!({ "name": name, "description": description })),
        )?;
        Ok(self.send::<CreatedCategory>(request).await?.category_id)
    }

    pub async fn delete_category(&self, id: i64) -> ClientResult<String> {
        let request =
            self.authorized(self.http.delete(self.url(&format!("/categories/{}", id))))?;
        Ok(self.send::<Message>(request).await?.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_extra::{
        TypedHeader,
        headers::{Authorization, authorization::Bearer},
    };
    use serde_json::Value;

    const TOKEN: &str = "header.payload.signature";

    fn admin() -> Value {
        json!({
            "id": 1,
            "username": "admin",
            "email": "admin@example.com",
            "role": "admin",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
        })
    }

    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["password"] == "secret" {
            (StatusCode::OK, Json(json!({ "user": admin(), "token": TOKEN })))
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid username or password" })),
            )
        }
    }

    async fn me(bearer: Option<TypedHeader<Authorization<Bearer>>>) -> (StatusCode, Json<Value>) {
        match bearer {
            Some(TypedHeader(Authorization(b))) if b.token() == TOKEN => {
                (StatusCode::OK, Json(admin()))
            }
            _ => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized" })),
            ),
        }
    }

    async fn serve(logout_status: StatusCode) -> String {
        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route(
                "/api/auth/logout",
                post(move || async move {
                    (
                        logout_status,
                        Json(json!({ "message": "Logged out successfully" })),
                    )
                }),
            )
            .route("/api/auth/me", get(me))
            .route(
                "/api/categories",
                post(|| async {
                    (
                        StatusCode::CREATED,
                        Json(json!({ "message": "Category created successfully", "categoryId": 7 })),
                    )
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", address)
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let client = AdminClient::new(serve(StatusCode::OK).await, MemorySessionStore::default());

        let user = client.login("admin", "secret").await.unwrap();
        assert_eq!(user.id, 1);

        let me = client.whoami().await.unwrap();
        assert_eq!(me.username, "admin");
    }

    #[tokio::test]
    async fn test_failed_login_keeps_store_empty() {
        let client = AdminClient::new(serve(StatusCode::OK).await, MemorySessionStore::default());

        let err = client.login("admin", "wrong").await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid username or password");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(client.whoami().await, Err(ClientError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_when_server_fails() {
        let client = AdminClient::new(
            serve(StatusCode::INTERNAL_SERVER_ERROR).await,
            MemorySessionStore::default(),
        );
        client.login("admin", "secret").await.unwrap();

        assert!(client.logout().await.is_err());
        assert!(matches!(client.whoami().await, Err(ClientError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_create_category_returns_id() {
        let client = AdminClient::new(serve(StatusCode::OK).await, MemorySessionStore::default());
        assert!(matches!(
            client.create_category("Portraits", None).await,
            Err(ClientError::NotLoggedIn)
        ));

        client.login("admin", "secret").await.unwrap();
        assert_eq!(client.create_category("Portraits", None).await.unwrap(), 7);
    }
}
