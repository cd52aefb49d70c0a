use super::{
    AuthBackend, BackendError, BackendResult, Bucket, DataBackend, Query, StorageBackend, Table,
    UploadOptions,
};
use crate::config::EnvConfig;
use crate::models::{Session, User};
use crate::storage::{TOKEN_KEY, USER_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Clone, Debug)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize, Clone, Debug)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize, Clone, Debug)]
struct SignUpMetadata<'a> {
    full_name: &'a str,
}

#[derive(Deserialize, Clone, Debug)]
struct TokenResponse {
    access_token: String,
    user: User,
}

/// REST client for a Supabase project: GoTrue auth, PostgREST tables and
/// Storage, all over plain `reqwest` calls.
#[derive(Clone, Debug)]
pub(crate) struct SupabaseClient {
    pub(crate) base_url: String,
    pub(crate) anon_key: String,
    pub(crate) token: Option<String>,
}

impl SupabaseClient {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        let mut client = Self::new(&EnvConfig::from_window());
        client.token = leptos::web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());
        client
    }

    pub fn save_to_storage(&self) {
        if let Some(storage) =
            leptos::web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        {
            if let Some(token) = &self.token {
                let _ = storage.set_item(TOKEN_KEY, token);
            }
        }
    }

    pub fn clear_storage() {
        if let Some(storage) =
            leptos::web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn logout(&mut self) {
        self.token = None;
        Self::clear_storage();
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.anon_key.is_empty()
    }

    /// Bearer value: the session token when signed in, the anon key otherwise.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token.as_deref().unwrap_or(&self.anon_key))
    }

    pub(crate) fn rest_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.as_ref())
    }

    pub(crate) fn object_url(&self, bucket: Bucket, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket.as_ref(),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        reqwest::Client::new()
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", self.bearer())
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> BackendResult<reqwest::Response> {
        if !self.is_configured() {
            return Err(BackendError::NotConfigured);
        }

        let res = req
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = res.status();
        if status.is_success() {
            Ok(res)
        } else if status.as_u16() == 401 {
            Err(BackendError::Unauthorized)
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(BackendError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> BackendResult<T> {
        self.send(req).await?.json().await.map_err(BackendError::parse)
    }
}

impl AuthBackend for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let res: TokenResponse = self
            .send_json(
                self.request(reqwest::Method::POST, url)
                    .json(&PasswordGrant { email, password }),
            )
            .await?;

        Ok(Session {
            access_token: res.access_token,
            user: res.user,
        })
    }

    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> BackendResult<User> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let data: Value = self
            .send_json(self.request(reqwest::Method::POST, url).json(&SignUpRequest {
                email,
                password,
                data: SignUpMetadata { full_name },
            }))
            .await?;

        // With auto-confirm the response is a full session, otherwise the bare user.
        let user = data.get("user").cloned().unwrap_or(data);
        serde_json::from_value(user).map_err(BackendError::parse)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        if self.token.is_none() {
            return Ok(());
        }
        let url = format!("{}/auth/v1/logout", self.base_url);
        self.send(self.request(reqwest::Method::POST, url)).await?;
        Ok(())
    }

    async fn current_user(&self) -> BackendResult<Option<User>> {
        if self.token.is_none() {
            return Ok(None);
        }
        let url = format!("{}/auth/v1/user", self.base_url);
        self.send_json(self.request(reqwest::Method::GET, url))
            .await
            .map(Some)
    }
}

impl DataBackend for SupabaseClient {
    async fn select(&self, table: Table, query: &Query) -> BackendResult<Vec<Value>> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(query.to_params());

        self.send_json(
            self.request(reqwest::Method::GET, self.rest_url(table))
                .query(&params),
        )
        .await
    }

    async fn insert(&self, table: Table, row: Value) -> BackendResult<Vec<Value>> {
        self.send_json(
            self.request(reqwest::Method::POST, self.rest_url(table))
                .header("Prefer", "return=representation")
                .json(&row),
        )
        .await
    }

    async fn update(&self, table: Table, query: &Query, patch: Value) -> BackendResult<()> {
        self.send(
            self.request(reqwest::Method::PATCH, self.rest_url(table))
                .header("Prefer", "return=minimal")
                .query(&query.to_params())
                .json(&patch),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, table: Table, query: &Query) -> BackendResult<()> {
        self.send(
            self.request(reqwest::Method::DELETE, self.rest_url(table))
                .query(&query.to_params()),
        )
        .await?;
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> BackendResult<Value> {
        let url = format!("{}/rest/v1/rpc/{function}", self.base_url);
        let res = self
            .send(self.request(reqwest::Method::POST, url).json(&args))
            .await?;

        // Void functions answer 204 with an empty body.
        let text = res.text().await.map_err(BackendError::parse)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(BackendError::parse)
    }
}

impl StorageBackend for SupabaseClient {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> BackendResult<()> {
        let mut req = self
            .request(reqwest::Method::POST, self.object_url(bucket, path))
            .header("cache-control", format!("max-age={}", options.cache_control))
            .header("x-upsert", options.upsert.to_string());
        if let Some(ct) = &options.content_type {
            req = req.header("content-type", ct);
        }

        self.send(req.body(bytes)).await?;
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket.as_ref(),
            path.trim_start_matches('/')
        )
    }

    async fn download(&self, bucket: Bucket, path: &str) -> BackendResult<Vec<u8>> {
        let res = self
            .send(self.request(reqwest::Method::GET, self.object_url(bucket, path)))
            .await?;
        let bytes = res.bytes().await.map_err(BackendError::parse)?;
        Ok(bytes.to_vec())
    }

    async fn remove(&self, bucket: Bucket, paths: &[String]) -> BackendResult<()> {
        let url = format!("{}/storage/v1/object/{}", self.base_url, bucket.as_ref());
        self.send(
            self.request(reqwest::Method::DELETE, url)
                .json(&serde_json::json!({ "prefixes": paths })),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SupabaseClient {
        SupabaseClient::new(&EnvConfig::new("https://demo.supabase.co", "anon-key"))
    }

    #[test]
    fn test_bearer_uses_anon_key_until_signed_in() {
        let mut c = client();
        assert_eq!(c.bearer(), "Bearer anon-key");
        c.set_token("jwt".to_string());
        assert_eq!(c.bearer(), "Bearer jwt");
    }

    #[test]
    fn test_urls() {
        let c = client();
        assert_eq!(
            c.rest_url(Table::Notes),
            "https://demo.supabase.co/rest/v1/notes"
        );
        assert_eq!(
            c.object_url(Bucket::Trash, "/n1/u1/a.pdf"),
            "https://demo.supabase.co/storage/v1/object/trash/n1/u1/a.pdf"
        );
        assert_eq!(
            c.public_url(Bucket::Notes, "u1/a.pdf"),
            "https://demo.supabase.co/storage/v1/object/public/notes/u1/a.pdf"
        );
    }

    #[test]
    fn test_unconfigured_client() {
        let c = SupabaseClient::new(&EnvConfig::default());
        assert!(!c.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_without_network() {
        let c = SupabaseClient::new(&EnvConfig::default());
        let err = c.select(Table::Notes, &Query::new()).await.unwrap_err();
        assert_eq!(err, BackendError::NotConfigured);
    }

    #[tokio::test]
    async fn test_current_user_without_token_is_none() {
        let c = client();
        assert_eq!(c.current_user().await, Ok(None));
    }

    #[test]
    fn test_token_response_contract_deserialize() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": {"id": "u1", "email": "ada@example.com", "created_at": "2024-01-01T00:00:00Z"}
        }"#;
        let parsed: TokenResponse = serde_json::from_str(json).expect("token response");
        assert_eq!(parsed.access_token, "jwt");
        assert_eq!(parsed.user.email.as_deref(), Some("ada@example.com"));
    }
}
