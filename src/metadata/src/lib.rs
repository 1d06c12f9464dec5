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

//! Client for the cloud instance metadata service.
//!
//! Cloud instances can query a local [metadata service] to learn about
//! themselves: their public host name and IP address, or the signed
//! [instance identity document] with the account, region, and image of the
//! instance. The service is only reachable from inside the instance, at the
//! link-local address `169.254.169.254`.
//!
//! This crate contains a small client for that service. It does not retry
//! failed requests, and it does not cache any values.
//!
//! ```no_run
//! # use cloud_instance_metadata::client::Client;
//! # tokio_test::block_on(async {
//! let client = Client::new();
//! match client.meta_data().public_ip().await {
//!     Ok(Some(ip)) => println!("public IP address: {ip}"),
//!     Ok(None) => println!("the service returned an invalid IP address"),
//!     Err(e) if e.is_not_found() => println!("the instance has no public IP address"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), cloud_instance_metadata::errors::Error>(())
//! # });
//! ```
//!
//! The client emits the requests and responses as `DEBUG` level [tracing]
//! events. Install a subscriber to see them.
//!
//! [metadata service]: https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/ec2-instance-metadata.html
//! [instance identity document]: https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/instance-identity-documents.html
//! [tracing]: https://docs.rs/tracing

pub mod client;
pub mod dynamic;
pub mod errors;
pub mod meta_data;
pub mod request;

/// A `Result` alias where the `Err` case is
/// `cloud_instance_metadata::errors::Error`.
pub type Result<T> = std::result::Result<T, crate::errors::Error>;
