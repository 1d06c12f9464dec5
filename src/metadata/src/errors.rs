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

//! Errors returned by the metadata client.

use bytes::Bytes;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for all metadata client operations.
///
/// Applications can branch on the kind of failure using the `is_*()`
/// predicates. In particular, [is_not_found](Error::is_not_found) separates
/// "this instance has no such metadata" (for example, an instance without a
/// public IP address) from every other failure.
///
/// The `Display` text of the not found and status errors is fixed. Use
/// [http_status_code](Error::http_status_code) and
/// [http_payload](Error::http_payload) to inspect the failed response.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// The base URL or the request path is not a valid URL.
    pub fn is_url_parse(&self) -> bool {
        matches!(self.0, ErrorKind::UrlParse(_))
    }

    /// The request body cannot be sent to the metadata service.
    pub fn is_unsupported_body(&self) -> bool {
        matches!(self.0, ErrorKind::UnsupportedBody { .. })
    }

    /// The request could not be sent, or the response could not be received.
    pub fn is_transport(&self) -> bool {
        matches!(self.0, ErrorKind::Transport(_))
    }

    /// The request did not complete before the configured timeout.
    pub fn is_timeout(&self) -> bool {
        match &self.0 {
            ErrorKind::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// The metadata service responded with `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        matches!(self.0, ErrorKind::NotFound { .. })
    }

    /// The metadata service responded with an unsuccessful status other than
    /// `404 Not Found`.
    pub fn is_status(&self) -> bool {
        matches!(self.0, ErrorKind::Status { .. })
    }

    /// The response body could not be decoded into the requested type.
    pub fn is_decode(&self) -> bool {
        matches!(self.0, ErrorKind::Decode(_))
    }

    /// Writing the response body to the destination failed.
    pub fn is_io(&self) -> bool {
        matches!(self.0, ErrorKind::Io(_))
    }

    /// The HTTP status code of an unsuccessful response, if any.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.0 {
            ErrorKind::NotFound { .. } => Some(http::StatusCode::NOT_FOUND.as_u16()),
            ErrorKind::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The body of an unsuccessful response, if any.
    pub fn http_payload(&self) -> Option<&Bytes> {
        match &self.0 {
            ErrorKind::NotFound { payload } | ErrorKind::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// The name of the rejected body type, for unsupported body errors.
    pub fn unsupported_type(&self) -> Option<&str> {
        match &self.0 {
            ErrorKind::UnsupportedBody { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    pub(crate) fn url_parse(source: url::ParseError) -> Error {
        Error(ErrorKind::UrlParse(source))
    }

    pub(crate) fn unsupported_body(type_name: &'static str) -> Error {
        Error(ErrorKind::UnsupportedBody {
            type_name,
            source: None,
        })
    }

    pub(crate) fn unsupported_body_with_source<T>(type_name: &'static str, source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::UnsupportedBody {
            type_name,
            source: Some(source.into()),
        })
    }

    pub(crate) fn transport(source: reqwest::Error) -> Error {
        Error(ErrorKind::Transport(source))
    }

    pub(crate) fn not_found(payload: Bytes) -> Error {
        Error(ErrorKind::NotFound { payload })
    }

    pub(crate) fn status(code: u16, payload: Bytes) -> Error {
        Error(ErrorKind::Status { code, payload })
    }

    pub(crate) fn decode<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Decode(source.into()))
    }

    pub(crate) fn io(source: std::io::Error) -> Error {
        Error(ErrorKind::Io(source))
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("cannot parse URL: {0}")]
    UrlParse(#[source] url::ParseError),
    #[error("not supported type: {type_name}")]
    UnsupportedBody {
        type_name: &'static str,
        #[source]
        source: Option<BoxError>,
    },
    #[error("cannot send request to the metadata service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Not found")]
    NotFound { payload: Bytes },
    #[error("Unknown error.")]
    Status { code: u16, payload: Bytes },
    #[error("cannot decode the metadata service response: {0}")]
    Decode(#[source] BoxError),
    #[error("cannot write the metadata service response: {0}")]
    Io(#[source] std::io::Error),
}
