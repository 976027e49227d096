/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

#![allow(unused)]

///! backend adapters. Each adapter translates a logical [`Operation`] into exactly one [`HttpRequest`],
///! sends it through the shared [`Transport`] and turns the response into [`Aircraft`] records.
///! What an adapter can do is expressed through [`Backend::supports`] and [`Backend::native_filters`],
///! the client never looks at the concrete adapter type

use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime,Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::aircraft::Aircraft;
use crate::envelope::BackendKind;
use crate::filters::{FilterKey,QueryFilters};
use crate::query::{Operation,OperationKind};
use crate::transport::{HttpRequest,HttpResponse,Transport};
use crate::errors::{OdinAdsbLolError,Result,validation_error};

pub mod native;
pub use native::NativeBackend;

pub mod public;
pub use public::{PublicBackend,RoutePlane};

/// the parsed payload of a single backend response
#[derive(Debug,Clone,Default)]
pub struct RawRecords {
    pub aircraft: Vec<Aircraft>,
    pub server_time: Option<DateTime<Utc>>,
    pub processing_time: Option<Duration>,
}

impl RawRecords {
    pub fn new (aircraft: Vec<Aircraft>)->Self { RawRecords { aircraft, ..Default::default() } }
}

#[async_trait]
pub trait Backend: Send + Sync {
    fn kind (&self)->BackendKind;

    /// can this backend serve `op` with a single request of its own
    fn supports (&self, op: OperationKind)->bool;

    /// the filter predicates this backend can pass on to the server for `op`
    fn native_filters (&self, op: OperationKind)->&'static [FilterKey];

    /// issue exactly one request for `op`. Callers only pass filters that are restricted to
    /// [`native_filters`](Self::native_filters) and operations for which [`supports`](Self::supports) is true
    async fn execute (&self, op: &Operation, filters: &QueryFilters)->Result<RawRecords>;
}

/// send `request` and map non-success status codes onto our error taxonomy
pub(crate) async fn send_checked (transport: &dyn Transport, request: &HttpRequest)->Result<HttpResponse> {
    let response = transport.send( request).await?;
    check_status( response)
}

pub(crate) fn check_status (response: HttpResponse)->Result<HttpResponse> {
    if response.is_success() {
        return Ok(response)
    }

    match response.status {
        401 | 403 => Err( OdinAdsbLolError::AuthenticationError( format!("status {}: {}", response.status, response.body))),
        429 => Err( OdinAdsbLolError::RateLimitError{ retry_after: response.retry_after }),
        422 => Err( validation_error!("request rejected by server: {}", response.body)),
        status => Err( OdinAdsbLolError::ApiError{ status, body: response.body })
    }
}

pub(crate) fn parse_json<T: DeserializeOwned> (body: &str)->Result<T> {
    serde_json::from_str(body).map_err( |e| validation_error!("invalid response payload: {}", e))
}

/// one missing or malformed hex fails the whole response
pub(crate) fn parse_aircraft_list (records: Vec<Value>)->Result<Vec<Aircraft>> {
    records.into_iter().map( Aircraft::from_json_value).collect()
}

/// server epochs come in seconds (native) or milliseconds (public)
pub(crate) fn epoch_to_datetime (epoch: f64)->Option<DateTime<Utc>> {
    if !epoch.is_finite() || epoch <= 0.0 { return None }

    let millis = if epoch > 1e11 { epoch } else { epoch * 1000.0 };
    DateTime::<Utc>::from_timestamp_millis( millis.round() as i64)
}

pub(crate) fn millis_to_duration (ms: f64)->Option<Duration> {
    if ms.is_finite() && ms >= 0.0 { Some( Duration::from_micros( (ms * 1000.0).round() as u64)) } else { None }
}
