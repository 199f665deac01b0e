use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::TodoId,
    protocol::{
        CreateTodoRequest, ReorderRequest, ReorderResponse, TodoItem, UpdateTodoRequest,
    },
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The operations the widget needs from the todo service.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list_todos(&self) -> Result<Vec<TodoItem>, ClientError>;
    async fn create_todo(&self, request: &CreateTodoRequest) -> Result<TodoItem, ClientError>;
    async fn update_todo(
        &self,
        id: TodoId,
        request: &UpdateTodoRequest,
    ) -> Result<TodoItem, ClientError>;
    async fn reorder_todos(&self, ordered_ids: &[TodoId]) -> Result<ReorderResponse, ClientError>;
    async fn delete_todo(&self, id: TodoId) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpTodoClient {
    http: Client,
    base_url: Url,
}

impl HttpTodoClient {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = parse_base_url(server_url)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })
    }
}

#[async_trait]
impl TodoApi for HttpTodoClient {
    async fn list_todos(&self) -> Result<Vec<TodoItem>, ClientError> {
        let response = self.http.get(self.endpoint("todos")?).send().await?;
        decode(response).await
    }

    async fn create_todo(&self, request: &CreateTodoRequest) -> Result<TodoItem, ClientError> {
        let response = self
            .http
            .post(self.endpoint("todos")?)
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_todo(
        &self,
        id: TodoId,
        request: &UpdateTodoRequest,
    ) -> Result<TodoItem, ClientError> {
        let response = self
            .http
            .put(self.endpoint(&format!("todos/{id}"))?)
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn reorder_todos(&self, ordered_ids: &[TodoId]) -> Result<ReorderResponse, ClientError> {
        debug!(count = ordered_ids.len(), "submitting reorder");
        let response = self
            .http
            .put(self.endpoint("todos/reorder")?)
            .json(&ReorderRequest {
                ordered_ids: ordered_ids.to_vec(),
            })
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_todo(&self, id: TodoId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("todos/{id}"))?)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }
}

/// Base urls are treated as directories so `http://host/api` keeps its `/api`.
fn parse_base_url(server_url: &str) -> Result<Url, ClientError> {
    let trimmed = server_url.trim();
    let mut base_url = Url::parse(trimmed).map_err(|source| ClientError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if base_url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: trimmed.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    Ok(base_url)
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "todo server rejected request");
    Err(ClientError::from_response(status.as_u16(), &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check_status(response).await?.json().await?)
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
