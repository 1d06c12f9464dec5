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

//! Dynamic instance documents.
//!
//! See [Instance identity documents] for a description of the fields.
//!
//! [Instance identity documents]: https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/instance-identity-documents.html

use crate::Result;
use crate::client::Client;
use crate::request::Body;
use http::Method;
use serde::{Deserialize, Deserializer};

pub(crate) const INSTANCE_IDENTITY_PATH: &str = "/latest/dynamic/instance-identity/document";

/// Accessors for the `dynamic` category of the metadata service.
///
/// Obtain an instance with [Client::dynamic].
#[derive(Clone, Copy, Debug)]
pub struct Dynamic<'a> {
    client: &'a Client,
}

impl<'a> Dynamic<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches the instance identity document.
    pub async fn instance_identity(&self) -> Result<InstanceIdentity> {
        let request = self
            .client
            .new_request(Method::GET, INSTANCE_IDENTITY_PATH, Body::Empty)?;
        self.client.execute_json(request).await
    }
}

/// The instance identity document.
///
/// Each field holds whatever the metadata service returned. Fields missing
/// from the document, or set to `null`, are empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceIdentity {
    /// The account that owns the instance.
    #[serde(deserialize_with = "null_as_empty")]
    pub account_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub architecture: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub availability_zone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub billing_products: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub devpay_product_codes: String,
    /// The image used to launch the instance.
    #[serde(deserialize_with = "null_as_empty")]
    pub image_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub instance_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub instance_type: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub kernel_id: String,
    /// When the instance was launched, as reported by the service.
    #[serde(deserialize_with = "null_as_empty")]
    pub pending_time: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub private_ip: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ramdisk_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub region: String,
    /// The version of the document format.
    #[serde(deserialize_with = "null_as_empty")]
    pub version: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
