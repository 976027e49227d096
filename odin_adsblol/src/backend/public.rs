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

use std::{sync::Arc,time::Duration};
use async_trait::async_trait;
use serde::{Deserialize,Serialize};
use serde_json::{json,Value};
use url::Url;

use crate::backend::{self,Backend,RawRecords};
use crate::envelope::BackendKind;
use crate::filters::{FilterKey,QueryFilters};
use crate::query::{Operation,OperationKind};
use crate::transport::{HttpRequest,Transport};
use crate::geo::GeoPos;
use crate::errors::{OdinAdsbLolError,Result,config_error,validation_error};
use crate::debug;

pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://api.adsb.lol";

// the category endpoints already are the predicate of their own filter key
const SQUAWK_ENDPOINT_FILTERS: &[FilterKey] = &[FilterKey::Squawk];
const MILITARY_ENDPOINT_FILTERS: &[FilterKey] = &[FilterKey::Military];
const PIA_ENDPOINT_FILTERS: &[FilterKey] = &[FilterKey::Pia];
const LADD_ENDPOINT_FILTERS: &[FilterKey] = &[FilterKey::Ladd];

/// aircraft entry of a route lookup request
#[derive(Serialize,Debug,Clone,PartialEq)]
pub struct RoutePlane {
    pub callsign: String,
    pub lat: f64,
    pub lng: f64,
}

impl RoutePlane {
    pub fn new (callsign: &str, lat: f64, lon: f64)->Result<Self> {
        let callsign = callsign.trim();
        if callsign.is_empty() {
            return Err( validation_error!("route lookup needs a callsign"))
        }
        let pos = GeoPos::new( lat, lon)?;
        Ok( RoutePlane { callsign: callsign.to_ascii_uppercase(), lat: pos.lat(), lng: pos.lon() })
    }
}

/// adapter for the public v2 REST API. It only has path-addressed lookups, there is no
/// spatial query and no bulk listing. The category endpoints take no filter predicates other than their own
pub struct PublicBackend {
    transport: Arc<dyn Transport>,
    base_url: Url,
    credential: Option<String>,
    timeout: Duration,
}

impl PublicBackend {
    pub fn new (transport: Arc<dyn Transport>, base_url: &str, credential: Option<String>, timeout: Duration)->Result<Self> {
        let base_url = Url::parse( base_url).map_err( |e| config_error!("invalid public base url '{}': {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err( config_error!("public base url '{}' cannot have path segments", base_url))
        }
        Ok( PublicBackend { transport, base_url, credential, timeout } )
    }

    pub fn has_credential (&self)->bool { self.credential.is_some() }

    /// the endpoint URL for `op`, or None if there is no endpoint for it
    pub fn endpoint_url (&self, op: &Operation)->Option<String> {
        let hex;
        let segments: Vec<&str> = match op {
            Operation::ByHex(h) => { hex = h.to_ascii_lowercase(); vec!["v2", "hex", hex.as_str()] }
            Operation::ByCallsign(cs) => vec!["v2", "callsign", cs.as_str()],
            Operation::ByRegistration(reg) => vec!["v2", "reg", reg.as_str()],
            Operation::ByType(t) => vec!["v2", "type", t.as_str()],
            Operation::BySquawk(sq) => vec!["v2", "sqk", sq.as_str()],
            Operation::Military => vec!["v2", "mil"],
            Operation::Pia => vec!["v2", "pia"],
            Operation::Ladd => vec!["v2", "ladd"],
            _ => return None
        };

        self.url_for( &segments)
    }

    fn url_for (&self, segments: &[&str])->Option<String> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().ok()?;
            path.pop_if_empty();
            path.extend( segments);
        }
        Some( url.to_string())
    }

    fn v0_url (&self, segments: &[&str])->Result<String> {
        self.url_for( segments).ok_or_else( || config_error!("public base url '{}' cannot have path segments", self.base_url))
    }

    fn authorized (&self, request: HttpRequest)->HttpRequest {
        match &self.credential {
            Some(key) => request.with_header( "Authorization", format!("Bearer {}", key)),
            None => request
        }
    }

    /// v0 endpoints have no common schema, their JSON is handed through as is
    async fn request_v0 (&self, request: HttpRequest)->Result<Value> {
        let request = self.authorized( request);
        debug!("public {} request {}", request.method, request.full_url());

        let response = backend::send_checked( self.transport.as_ref(), &request).await?;
        backend::parse_json( &response.body)
    }

    //--- the v0 utility endpoints. These only exist on the public API

    /// airport information for a 4 character ICAO location indicator
    pub async fn airport (&self, icao: &str)->Result<Value> {
        let icao = icao.trim().to_ascii_uppercase();
        if icao.len() != 4 || !icao.chars().all( |c| c.is_ascii_alphanumeric()) {
            return Err( validation_error!("invalid ICAO airport code '{}'", icao))
        }
        let url = self.v0_url( &["v0", "airport", icao.as_str()])?;
        self.request_v0( HttpRequest::get( url, self.timeout)).await
    }

    /// origin/destination routes for the given aircraft
    pub async fn routes (&self, planes: &[RoutePlane])->Result<Value> {
        if planes.is_empty() {
            return Err( validation_error!("route lookup needs at least one aircraft"))
        }
        let body = serde_json::to_string( &json!({ "planes": planes }))
            .map_err( |e| validation_error!("cannot serialize route request: {}", e))?;
        let url = self.v0_url( &["v0", "routes"])?;
        self.request_v0( HttpRequest::post_json( url, body, self.timeout)).await
    }

    /// information about the configured API key
    pub async fn me (&self)->Result<Value> {
        let url = self.v0_url( &["v0", "me"])?;
        self.request_v0( HttpRequest::get( url, self.timeout)).await
    }
}

/// the category endpoints can't express the negated form of their own predicate
fn check_endpoint_filters (op: &Operation, filters: &QueryFilters)->Result<()> {
    let consistent = match op {
        Operation::BySquawk(sq) => filters.squawk().map_or( true, |f| f == sq.as_str()),
        Operation::Military => filters.military() != Some(false),
        Operation::Pia => filters.pia() != Some(false),
        Operation::Ladd => filters.ladd() != Some(false),
        _ => true
    };
    if consistent { Ok(()) } else { Err( validation_error!("filters contradict the {} operation", op.kind())) }
}

/// v2 API response. `now` and `ctime` are epoch milliseconds, `ptime` is milliseconds
#[derive(Deserialize,Debug)]
struct PublicResponse {
    #[serde(default)] ac: Option<Vec<Value>>,
    #[serde(default)] msg: Option<String>,
    #[serde(default)] now: Option<f64>,
    #[serde(default)] total: Option<u64>,
    #[serde(default)] ctime: Option<f64>,
    #[serde(default)] ptime: Option<f64>,
}

#[async_trait]
impl Backend for PublicBackend {
    fn kind (&self)->BackendKind { BackendKind::Public }

    fn supports (&self, op: OperationKind)->bool {
        matches!( op,
            OperationKind::ByHex | OperationKind::ByCallsign | OperationKind::ByRegistration | OperationKind::ByType |
            OperationKind::BySquawk | OperationKind::Military | OperationKind::Pia | OperationKind::Ladd
        )
    }

    fn native_filters (&self, op: OperationKind)->&'static [FilterKey] {
        match op {
            OperationKind::BySquawk => SQUAWK_ENDPOINT_FILTERS,
            OperationKind::Military => MILITARY_ENDPOINT_FILTERS,
            OperationKind::Pia => PIA_ENDPOINT_FILTERS,
            OperationKind::Ladd => LADD_ENDPOINT_FILTERS,
            _ => &[]
        }
    }

    async fn execute (&self, op: &Operation, filters: &QueryFilters)->Result<RawRecords> {
        let Some(url) = self.endpoint_url(op) else {
            return Err( OdinAdsbLolError::UnsupportedOperationError{ operation: op.kind().to_string(), backend: self.kind().to_string() })
        };
        check_endpoint_filters( op, filters)?;

        let request = self.authorized( HttpRequest::get( url, self.timeout));
        debug!("public request {}", request.full_url());

        let response = backend::send_checked( self.transport.as_ref(), &request).await?;
        let payload: PublicResponse = backend::parse_json( &response.body)?;
        if let Some(msg) = &payload.msg {
            if msg != "No error" { debug!("public API message: {}", msg) }
        }

        Ok( RawRecords {
            aircraft: backend::parse_aircraft_list( payload.ac.unwrap_or_default())?,
            server_time: payload.now.and_then( backend::epoch_to_datetime),
            processing_time: payload.ptime.and_then( backend::millis_to_duration),
        })
    }
}
