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
use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::backend::{self,Backend,RawRecords};
use crate::envelope::BackendKind;
use crate::filters::{FilterKey,QueryFilters};
use crate::query::{Operation,OperationKind};
use crate::transport::{HttpRequest,Transport};
use crate::errors::Result;
use crate::debug;

pub const DEFAULT_NATIVE_BASE_URL: &str = "https://re-api.adsb.lol/";

const ALL_FILTERS: &[FilterKey] = &FilterKey::ALL;

// filter sets for category lookups, which already use one of the filter parameters themselves
const SQUAWK_LOOKUP_FILTERS: &[FilterKey] = &[
    FilterKey::CallsignExact, FilterKey::CallsignPrefix, FilterKey::TypeCode, FilterKey::AboveAltBaro, FilterKey::BelowAltBaro,
    FilterKey::Military, FilterKey::Pia, FilterKey::Ladd, FilterKey::Interesting
];
const MILITARY_LOOKUP_FILTERS: &[FilterKey] = &[
    FilterKey::CallsignExact, FilterKey::CallsignPrefix, FilterKey::TypeCode, FilterKey::Squawk, FilterKey::AboveAltBaro, FilterKey::BelowAltBaro,
    FilterKey::Pia, FilterKey::Ladd, FilterKey::Interesting
];
const PIA_LOOKUP_FILTERS: &[FilterKey] = &[
    FilterKey::CallsignExact, FilterKey::CallsignPrefix, FilterKey::TypeCode, FilterKey::Squawk, FilterKey::AboveAltBaro, FilterKey::BelowAltBaro,
    FilterKey::Military, FilterKey::Ladd, FilterKey::Interesting
];
const LADD_LOOKUP_FILTERS: &[FilterKey] = &[
    FilterKey::CallsignExact, FilterKey::CallsignPrefix, FilterKey::TypeCode, FilterKey::Squawk, FilterKey::AboveAltBaro, FilterKey::BelowAltBaro,
    FilterKey::Military, FilterKey::Pia, FilterKey::Interesting
];

/// adapter for the feeder-restricted readsb query API ("re-api"). Every logical operation maps onto
/// one query string, geographic queries included
pub struct NativeBackend {
    transport: Arc<dyn Transport>,
    base_url: String,
    timeout: Duration,
}

impl NativeBackend {
    pub fn new (transport: Arc<dyn Transport>, base_url: impl Into<String>, timeout: Duration)->Self {
        NativeBackend { transport, base_url: base_url.into(), timeout }
    }

    pub fn base_url (&self)->&str { self.base_url.as_str() }

    /// the query string for `op`. Coordinates are joined with literal commas, which the server requires
    pub fn query_string (op: &Operation, filters: &QueryFilters)->String {
        let mut query = match op {
            Operation::ByHex(hex) => format!("find_hex={}", encode( &hex.to_ascii_lowercase())),
            Operation::ByCallsign(cs) => format!("find_callsign={}", encode(cs)),
            Operation::ByRegistration(reg) => format!("find_reg={}", encode(reg)),
            Operation::ByType(t) => format!("find_type={}", encode(t)),
            Operation::BySquawk(sq) => format!("all&filter_squawk={}", encode(sq)),
            Operation::Military => "all&filter_mil=true".to_string(),
            Operation::Pia => "all&filter_pia=true".to_string(),
            Operation::Ladd => "all&filter_ladd=true".to_string(),
            Operation::Circle(c) => format!("circle={},{},{}", c.center().lat(), c.center().lon(), c.radius_nm()),
            Operation::Closest(c) => format!("closest={},{},{}", c.center().lat(), c.center().lon(), c.radius_nm()),
            Operation::Box(b) => format!("box={},{},{},{}", b.lat_min(), b.lat_max(), b.lon_min(), b.lon_max()),
            Operation::All => "all".to_string(),
            Operation::AllWithPosition => "all_with_pos".to_string(),
        };

        for (key,value) in filters.predicates() {
            query.push('&');
            query.push_str( filter_param(key));
            query.push('=');
            query.push_str( &encode(&value));
        }

        query
    }
}

fn encode (s: &str)->String {
    form_urlencoded::byte_serialize( s.as_bytes()).collect()
}

fn filter_param (key: FilterKey)->&'static str {
    match key {
        FilterKey::CallsignExact => "filter_callsign",
        FilterKey::CallsignPrefix => "filter_callsign_prefix",
        FilterKey::TypeCode => "filter_type",
        FilterKey::Squawk => "filter_squawk",
        FilterKey::AboveAltBaro => "filter_above_alt_baro",
        FilterKey::BelowAltBaro => "filter_below_alt_baro",
        FilterKey::Military => "filter_mil",
        FilterKey::Pia => "filter_pia",
        FilterKey::Ladd => "filter_ladd",
        FilterKey::Interesting => "filter_interesting",
    }
}

/// re-api response. `now` is epoch seconds, `ptime` server processing time in milliseconds
#[derive(Deserialize,Debug)]
struct NativeResponse {
    #[serde(default)] now: Option<f64>,
    #[serde(default, rename="resultCount")] result_count: Option<u64>,
    #[serde(default)] ptime: Option<f64>,
    #[serde(default)] aircraft: Option<Vec<Value>>,
}

#[async_trait]
impl Backend for NativeBackend {
    fn kind (&self)->BackendKind { BackendKind::Native }

    fn supports (&self, op: OperationKind)->bool { true }

    fn native_filters (&self, op: OperationKind)->&'static [FilterKey] {
        match op {
            OperationKind::ByHex | OperationKind::ByCallsign | OperationKind::ByRegistration | OperationKind::ByType => &[],
            OperationKind::BySquawk => SQUAWK_LOOKUP_FILTERS,
            OperationKind::Military => MILITARY_LOOKUP_FILTERS,
            OperationKind::Pia => PIA_LOOKUP_FILTERS,
            OperationKind::Ladd => LADD_LOOKUP_FILTERS,
            _ => ALL_FILTERS
        }
    }

    async fn execute (&self, op: &Operation, filters: &QueryFilters)->Result<RawRecords> {
        let request = HttpRequest::get( self.base_url.as_str(), self.timeout)
            .with_query( NativeBackend::query_string( op, filters));
        debug!("native request {}", request.full_url());

        let response = backend::send_checked( self.transport.as_ref(), &request).await?;
        let payload: NativeResponse = backend::parse_json( &response.body)?;

        let aircraft = backend::parse_aircraft_list( payload.aircraft.unwrap_or_default())?;
        if let Some(n) = payload.result_count {
            if n as usize != aircraft.len() {
                debug!("native resultCount {} differs from {} received records", n, aircraft.len());
            }
        }

        Ok( RawRecords {
            aircraft,
            server_time: payload.now.and_then( backend::epoch_to_datetime),
            processing_time: payload.ptime.and_then( backend::millis_to_duration),
        })
    }
}
