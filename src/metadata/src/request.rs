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

//! Requests sent to the metadata service.

use crate::Result;
use crate::errors::Error;
use bytes::Bytes;
use http::Method;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use url::Url;

pub(crate) const CONTENT_TYPE_VALUE: &str = "text/json; charset=UTF-8";
pub(crate) const ACCEPT_VALUE: &str = "text/json";

/// The body of a request to the metadata service.
///
/// The metadata service only needs bodiless `GET` requests, but the client
/// can send raw bytes or a JSON object for completeness.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// Bytes sent without any transformation.
    Raw(Bytes),
    /// A JSON object. The keys are serialized in sorted order.
    Json(serde_json::Map<String, serde_json::Value>),
}

impl Body {
    /// Creates a JSON body from any value that serializes to a JSON object.
    ///
    /// # Example
    /// ```
    /// # use cloud_instance_metadata::request::Body;
    /// let body = Body::json(&serde_json::json!({"key": "value"}))?;
    /// assert!(matches!(body, Body::Json(_)));
    ///
    /// let err = Body::json(&42).unwrap_err();
    /// assert!(err.is_unsupported_body(), "{err:?}");
    /// # Ok::<(), cloud_instance_metadata::errors::Error>(())
    /// ```
    pub fn json<T>(value: &T) -> Result<Self>
    where
        T: serde::Serialize + ?Sized,
    {
        let type_name = std::any::type_name::<T>();
        match serde_json::to_value(value) {
            Ok(serde_json::Value::Object(map)) => Ok(Body::Json(map)),
            Ok(_) => Err(Error::unsupported_body(type_name)),
            Err(e) => Err(Error::unsupported_body_with_source(type_name, e)),
        }
    }

    fn into_bytes(self) -> Option<Bytes> {
        match self {
            Body::Empty => None,
            Body::Raw(b) => Some(b),
            Body::Json(map) => {
                // Maps with `String` keys always serialize.
                let mut buf = serde_json::to_vec(&map).unwrap_or_default();
                buf.push(b'\n');
                Some(Bytes::from(buf))
            }
        }
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Raw(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Raw(Bytes::from(value))
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Raw(Bytes::from(value))
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        Body::Raw(Bytes::from_static(value.as_bytes()))
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Body {
    fn from(value: serde_json::Map<String, serde_json::Value>) -> Self {
        Body::Json(value)
    }
}

/// A request ready to be sent to the metadata service.
///
/// Create requests with [Client::new_request](crate::client::Client::new_request)
/// and send them with one of the `Client::execute_*` functions.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl Request {
    pub(crate) fn new(method: Method, url: Url, body: Body) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        Self {
            method,
            url,
            headers,
            body: body.into_bytes(),
            timeout: None,
        }
    }

    /// Sets a timeout for this request.
    ///
    /// The timeout covers the whole exchange, from connecting until the
    /// response body is fully read. Without it, the request is only bounded
    /// by the timeouts configured in the transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The fully resolved URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The encoded request body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The per-request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn into_builder(self, inner: &reqwest::Client) -> reqwest::RequestBuilder {
        let builder = inner
            .request(self.method, self.url)
            .headers(self.headers);
        let builder = self.body.into_iter().fold(builder, |b, body| b.body(body));
        self.timeout.into_iter().fold(builder, |b, t| b.timeout(t))
    }
}
