// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The metadata service client.

use crate::Result;
use crate::dynamic::Dynamic;
use crate::errors::Error;
use crate::meta_data::MetaData;
use crate::request::{Body, Request};
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use url::Url;

/// The root of the metadata service, reachable only from inside the instance.
pub const METADATA_ROOT: &str = "http://169.254.169.254/";

/// A client for the instance metadata service.
///
/// The client holds the base URL of the service and the HTTP transport used
/// to reach it. It is cheap to clone, and safe to share between tasks.
/// Creating a client performs no I/O.
///
/// The client does not impose any timeout. Configure the timeouts in the
/// transport (see [ClientBuilder::with_http_client]), or per request (see
/// [Request::with_timeout]).
///
/// # Example
/// ```no_run
/// # use cloud_instance_metadata::client::Client;
/// # tokio_test::block_on(async {
/// let client = Client::new();
/// let hostname = client.meta_data().public_host_name().await?;
/// let identity = client.dynamic().instance_identity().await?;
/// println!("{hostname} runs in {}", identity.region);
/// # Ok::<(), cloud_instance_metadata::errors::Error>(())
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    inner: reqwest::Client,
}

impl Client {
    /// Creates a client for the default metadata service root, using a
    /// default HTTP transport.
    pub fn new() -> Self {
        Self {
            base_url: Url::parse(METADATA_ROOT)
                .expect("the default metadata root is a valid URL"),
            inner: reqwest::Client::new(),
        }
    }

    /// Returns a builder to configure the base URL or the HTTP transport.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The URL used to resolve relative request paths.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Accessors for static instance metadata.
    pub fn meta_data(&self) -> MetaData<'_> {
        MetaData::new(self)
    }

    /// Accessors for dynamic instance documents.
    pub fn dynamic(&self) -> Dynamic<'_> {
        Dynamic::new(self)
    }

    /// Creates a request for `path`, resolved relative to the base URL.
    ///
    /// A path starting with `/` replaces the path of the base URL, other
    /// paths are resolved relative to it, following the usual rules for
    /// relative URLs.
    ///
    /// Every request carries `Content-Type: text/json; charset=UTF-8` and
    /// `Accept: text/json`, even requests without a body.
    pub fn new_request<B>(&self, method: Method, path: &str, body: B) -> Result<Request>
    where
        B: Into<Body>,
    {
        let url = self.base_url.join(path).map_err(Error::url_parse)?;
        Ok(Request::new(method, url, body.into()))
    }

    /// Sends `request` and returns the response body as text.
    ///
    /// The text is returned verbatim: it is not trimmed, and it is not
    /// interpreted as JSON.
    pub async fn execute_text(&self, request: Request) -> Result<String> {
        let response = self.send(request).await?;
        read_text(response).await
    }

    /// Sends `request` and parses the response body as JSON.
    pub async fn execute_json<T>(&self, request: Request) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.send(request).await?;
        read_json(response).await
    }

    /// Sends `request` and copies the response body into `destination`.
    ///
    /// Returns the number of bytes written. Nothing is written if the
    /// service responds with an error. If writing fails the rest of the
    /// response is still read, and discarded.
    pub async fn execute_to_writer<W>(&self, request: Request, destination: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let response = self.send(request).await?;
        copy_body(response, destination).await
    }

    /// Sends the request, returning the response only if it was successful.
    async fn send(&self, request: Request) -> Result<reqwest::Response> {
        dump_request(&request);
        let response = request
            .into_builder(&self.inner)
            .send()
            .await
            .map_err(Error::transport)?;
        check_response_status(response).await
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Configures a [Client].
///
/// # Example
/// ```
/// # use cloud_instance_metadata::client::Client;
/// # use std::time::Duration;
/// let transport = reqwest::Client::builder()
///     .timeout(Duration::from_secs(2))
///     .build()?;
/// let client = Client::builder()
///     .with_base_url("http://localhost:8080/")
///     .with_http_client(transport)
///     .build()?;
/// assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Sets the base URL.
    ///
    /// If not set, the client uses `http://169.254.169.254/`.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the HTTP transport.
    ///
    /// If not set, the client uses `reqwest::Client::new()`, which has no
    /// timeouts.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Creates the client.
    ///
    /// Fails only if the base URL is not a valid URL.
    pub fn build(self) -> Result<Client> {
        let base_url = self.base_url.as_deref().unwrap_or(METADATA_ROOT);
        let base_url = Url::parse(base_url).map_err(Error::url_parse)?;
        Ok(Client {
            base_url,
            inner: self.http_client.unwrap_or_default(),
        })
    }
}

/// Maps unsuccessful responses to errors.
///
/// The body of unsuccessful responses is fully read, and kept in the error.
/// The status alone determines the error kind: if the body cannot be read
/// the payload is left empty.
async fn check_response_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let headers = response.headers().clone();
    let payload = match response.bytes().await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(status = status.as_u16(), error = %e, "cannot read error payload");
            Bytes::new()
        }
    };
    dump_response(status, &headers, &String::from_utf8_lossy(&payload));
    match status {
        StatusCode::NOT_FOUND => Err(Error::not_found(payload)),
        _ => Err(Error::status(status.as_u16(), payload)),
    }
}

/// Reads the full body of a successful response.
async fn read_body(response: reqwest::Response) -> Result<Bytes> {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(Error::transport)?;
    dump_response(status, &headers, &String::from_utf8_lossy(&body));
    Ok(body)
}

/// Reads the full body, then converts it to a string without any trimming.
async fn read_text(response: reqwest::Response) -> Result<String> {
    let body = read_body(response).await?;
    String::from_utf8(body.to_vec()).map_err(Error::decode)
}

/// Reads the full body, then parses it as JSON.
async fn read_json<T>(response: reqwest::Response) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let body = read_body(response).await?;
    serde_json::from_slice::<T>(&body).map_err(Error::decode)
}

/// Streams the body into `destination`.
///
/// After a write error the rest of the body is read and discarded. The write
/// error takes precedence over any later error reading the body.
async fn copy_body<W>(mut response: reqwest::Response, destination: &mut W) -> Result<u64>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let status = response.status();
    let headers = response.headers().clone();
    let mut written = 0_u64;
    let mut write_error = None;
    loop {
        let chunk = match response.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => return Err(write_error.map_or_else(|| Error::transport(e), Error::io)),
        };
        if write_error.is_some() {
            continue;
        }
        match destination.write_all(&chunk).await {
            Ok(()) => written += chunk.len() as u64,
            Err(e) => write_error = Some(e),
        }
    }
    dump_response(status, &headers, &format!("<{written} bytes copied>"));
    if let Some(e) = write_error {
        return Err(Error::io(e));
    }
    destination.flush().await.map_err(Error::io)?;
    Ok(written)
}

fn dump_request(request: &Request) {
    let body = request
        .body()
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default();
    tracing::debug!(
        method = %request.method(),
        url = %request.url(),
        headers = ?request.headers(),
        body = %body,
        "metadata service request"
    );
}

fn dump_response(status: StatusCode, headers: &HeaderMap, body: &str) {
    tracing::debug!(
        status = status.as_u16(),
        headers = ?headers,
        body = %body,
        "metadata service response"
    );
}
