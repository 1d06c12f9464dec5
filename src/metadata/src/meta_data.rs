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

//! Static instance metadata.

use crate::Result;
use crate::client::Client;
use crate::request::Body;
use http::Method;
use std::net::IpAddr;

pub(crate) const PUBLIC_HOSTNAME_PATH: &str = "/latest/meta-data/public-hostname";
pub(crate) const PUBLIC_IPV4_PATH: &str = "/latest/meta-data/public-ipv4";

/// Accessors for the `meta-data` category of the metadata service.
///
/// Obtain an instance with [Client::meta_data].
#[derive(Clone, Copy, Debug)]
pub struct MetaData<'a> {
    client: &'a Client,
}

impl<'a> MetaData<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches the public DNS name of the instance.
    ///
    /// Instances without a public DNS name return a
    /// [not found](crate::errors::Error::is_not_found) error.
    pub async fn public_host_name(&self) -> Result<String> {
        let request = self
            .client
            .new_request(Method::GET, PUBLIC_HOSTNAME_PATH, Body::Empty)?;
        self.client.execute_text(request).await
    }

    /// Fetches the public IPv4 address of the instance.
    ///
    /// Returns `Ok(None)` if the service returns something that is not an IP
    /// address literal. The text is parsed as is, surrounding whitespace
    /// makes it invalid.
    ///
    /// Instances without a public IP address return a
    /// [not found](crate::errors::Error::is_not_found) error.
    pub async fn public_ip(&self) -> Result<Option<IpAddr>> {
        let request = self
            .client
            .new_request(Method::GET, PUBLIC_IPV4_PATH, Body::Empty)?;
        let text = self.client.execute_text(request).await?;
        let ip = text.parse::<IpAddr>().ok();
        if ip.is_none() {
            tracing::debug!(text = %text, "public-ipv4 is not an IP address");
        }
        Ok(ip)
    }
}
