//! Client for the remote students API.
//!
//! `GET /api/students`, `POST /api/students`, `PATCH /api/students/{id}` and
//! `DELETE /api/students/{id}`, all JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::err::Error;
use crate::models::{NewStudent, StudentId, StudentPayload};

pub type GatewayResult<T> = Result<T, Error>;

/// The four remote operations the controller needs.
///
/// None of them panic; every failure comes back as an [`Error`]. An empty
/// `Ok` listing means the server really has no matching students.
#[async_trait]
pub trait StudentGateway: Send + Sync {
    async fn list(&self, filters: &[(String, String)]) -> GatewayResult<Vec<StudentPayload>>;
    async fn create(&self, student: &NewStudent) -> GatewayResult<StudentPayload>;
    async fn update(&self, id: &StudentId, student: &NewStudent) -> GatewayResult<StudentPayload>;
    async fn delete(&self, id: &StudentId) -> GatewayResult<()>;
}

pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(base: Url, timeout: Option<Duration>) -> GatewayResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, base))
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    fn students(&self) -> GatewayResult<Url> {
        Ok(self.base.join("/api/students")?)
    }

    fn student(&self, id: &StudentId) -> GatewayResult<Url> {
        let mut url = self.students()?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                message: format!("{} cannot be a base", self.base),
            })?
            .push(id.as_str());
        Ok(url)
    }
}

/// Reads the body, then either decodes it or turns it into a rejection that
/// keeps the server's message.
async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(Error::rejected(status.as_u16(), &text));
    }
    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl StudentGateway for HttpGateway {
    async fn list(&self, filters: &[(String, String)]) -> GatewayResult<Vec<StudentPayload>> {
        let mut url = self.students()?;
        if !filters.is_empty() {
            url.query_pairs_mut().extend_pairs(filters);
        }
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn create(&self, student: &NewStudent) -> GatewayResult<StudentPayload> {
        let url = self.students()?;
        log::debug!("POST {} {:?}", url, student);
        let response = self.client.post(url).json(student).send().await?;
        decode(response).await
    }

    async fn update(&self, id: &StudentId, student: &NewStudent) -> GatewayResult<StudentPayload> {
        let url = self.student(id)?;
        log::debug!("PATCH {} {:?}", url, student);
        let response = self.client.patch(url).json(student).send().await?;
        decode(response).await
    }

    async fn delete(&self, id: &StudentId) -> GatewayResult<()> {
        let url = self.student(id)?;
        log::debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::rejected(status.as_u16(), &text));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpGateway {
        HttpGateway::with_client(Client::new(), base.parse().unwrap())
    }

    #[test]
    fn builds_resource_urls() {
        let gw = gateway("https://example.org/");
        assert_eq!(gw.students().unwrap().as_str(), "https://example.org/api/students");
        assert_eq!(
            gw.student(&StudentId::new("42")).unwrap().as_str(),
            "https://example.org/api/students/42"
        );
    }

    #[test]
    fn escapes_ids() {
        let gw = gateway("http://127.0.0.1:3000");
        assert_eq!(
            gw.student(&StudentId::new("a/b")).unwrap().as_str(),
            "http://127.0.0.1:3000/api/students/a%2Fb"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let gw = gateway(&format!("http://127.0.0.1:{}", port));
        let err = gw.list(&[]).await.unwrap_err();
        assert!(err.is_network(), "{:?}", err);
    }
}
