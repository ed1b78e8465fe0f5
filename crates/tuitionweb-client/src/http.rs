//! HTTP implementation of `TuitionSource`

use crate::error::FetchError;
use crate::types::*;
use crate::TuitionSource;
use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{header, Body, Client, Method, Request, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Client for the live payments API
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client<HttpConnector>,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout,
        }
    }

    fn uri(&self, path: &str) -> Result<Uri, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        url.parse::<Uri>().map_err(|_| FetchError::InvalidUrl { url })
    }

    /// Issue one request and return the body of a 2xx response
    async fn send(&self, method: Method, path: &str, json: Option<Vec<u8>>) -> Result<Vec<u8>, FetchError> {
        let mut builder = Request::builder().method(method.clone()).uri(self.uri(path)?);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match json {
            Some(bytes) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(bytes)),
            None => builder.body(Body::empty()),
        }
        .map_err(|e| FetchError::Transport { message: e.to_string() })?;

        log::debug!(target: "tuitionweb::client", "{} {}", method, path);

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| FetchError::Timeout { path: path.to_string() })?
            .map_err(|e| FetchError::Transport { message: e.to_string() })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|e| FetchError::Transport { message: e.to_string() })?;
        Ok(bytes.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(&self, method: Method, path: &str, json: Option<Vec<u8>>) -> Result<T, FetchError> {
        let bytes = self.send(method, path, json).await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.fetch(Method::GET, path, None).await
    }

    fn encode<B: Serialize>(path: &str, body: &B) -> Result<Vec<u8>, FetchError> {
        serde_json::to_vec(body).map_err(|e| FetchError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TuitionSource for HttpSource {
    async fn current_user(&self) -> Result<UserRecord, FetchError> {
        self.get("/users/self").await
    }

    async fn users(&self) -> Result<Vec<UserRecord>, FetchError> {
        self.get("/users/all").await
    }

    async fn students(&self) -> Result<Vec<UserRecord>, FetchError> {
        self.get("/users/students").await
    }

    async fn semesters(&self) -> Result<Vec<SemesterRecord>, FetchError> {
        self.get("/infra/semesters").await
    }

    async fn groups(&self) -> Result<Vec<GroupRecord>, FetchError> {
        self.get("/infra/groups").await
    }

    async fn operations(&self) -> Result<Vec<OperationRecord>, FetchError> {
        self.get("/operations/show_list").await
    }

    async fn create_transaction(&self, payment: &NewTransaction) -> Result<TransactionRecord, FetchError> {
        let path = "/operations/new_transaction";
        let body = Self::encode(path, payment)?;
        self.fetch(Method::POST, path, Some(body)).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, FetchError> {
        let path = "/users/new";
        let body = Self::encode(path, user)?;
        self.fetch(Method::POST, path, Some(body)).await
    }

    async fn edit_user(&self, user_id: &str, edit: &UserEdit) -> Result<UserRecord, FetchError> {
        let path = format!("/users/edit/{}", urlencoding::encode(user_id));
        let body = Self::encode(&path, edit)?;
        self.fetch(Method::PUT, &path, Some(body)).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), FetchError> {
        let path = format!("/users/delete/{}", urlencoding::encode(user_id));
        self.send(Method::DELETE, &path, None).await.map(|_| ())
    }

    async fn create_group(&self, name: &str) -> Result<GroupRecord, FetchError> {
        let path = format!("/infra/new_group?group_name={}", urlencoding::encode(name));
        self.fetch(Method::POST, &path, None).await
    }

    async fn rename_group(&self, group_id: &str, name: &str) -> Result<GroupRecord, FetchError> {
        let path = format!(
            "/infra/edit_group/{}?new_group_name={}",
            urlencoding::encode(group_id),
            urlencoding::encode(name)
        );
        self.fetch(Method::PUT, &path, None).await
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), FetchError> {
        let path = format!("/infra/delete_group/{}", urlencoding::encode(group_id));
        self.send(Method::DELETE, &path, None).await.map(|_| ())
    }

    async fn create_semester(&self, name: &str) -> Result<SemesterRecord, FetchError> {
        let path = format!("/infra/new_semester?semester_name={}", urlencoding::encode(name));
        self.fetch(Method::POST, &path, None).await
    }

    async fn rename_semester(&self, semester_id: &str, name: &str) -> Result<SemesterRecord, FetchError> {
        let path = format!(
            "/infra/edit_semester/{}?new_semester_name={}",
            urlencoding::encode(semester_id),
            urlencoding::encode(name)
        );
        self.fetch(Method::PUT, &path, None).await
    }

    async fn delete_semester(&self, semester_id: &str) -> Result<(), FetchError> {
        let path = format!("/infra/delete_semester/{}", urlencoding::encode(semester_id));
        self.send(Method::DELETE, &path, None).await.map(|_| ())
    }

    async fn add_to_group(&self, group_id: &str, user_id: &str) -> Result<GroupRecord, FetchError> {
        let path = format!(
            "/operations/add_to_group?group_id={}&user_id={}",
            urlencoding::encode(group_id),
            urlencoding::encode(user_id)
        );
        self.fetch(Method::PUT, &path, None).await
    }

    async fn remove_from_group(&self, user_id: &str) -> Result<(), FetchError> {
        let path = format!("/operations/remove_from_group?user_id={}", urlencoding::encode(user_id));
        self.send(Method::DELETE, &path, None).await.map(|_| ())
    }
}
