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

use std::{collections::HashSet, sync::{Arc,Mutex,atomic::{AtomicUsize,Ordering}}};
use async_trait::async_trait;
use serde_json::json;
use odin_adsblol::{
    geo, AdsbLolClient, AdsbLolConfig, Aircraft, Backend, BackendKind, BackendSelection, Dispatch, FilterKey, GeoPos,
    HttpRequest, HttpResponse, OdinAdsbLolError, Operation, OperationKind, QueryFilters, RawRecords, Transport, TransportError,
    select_backend
};

//--- test fixtures

struct MockTransport {
    body: String,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    fn new (body: serde_json::Value)->Arc<Self> {
        Arc::new( MockTransport { body: body.to_string(), requests: Mutex::new(Vec::new()) })
    }

    fn n_requests (&self)->usize { self.requests.lock().unwrap().len() }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send (&self, request: &HttpRequest)->Result<HttpResponse,TransportError> {
        self.requests.lock().unwrap().push( request.clone());
        Ok( HttpResponse::new( 200, self.body.clone()))
    }
}

/// a backend without native geo queries that does have a bulk listing, which is the case the
/// client emulates circle/closest/box queries for
struct BulkOnlyBackend {
    listing: Vec<Aircraft>,
    calls: AtomicUsize,
    last_filters: Mutex<Option<QueryFilters>>,
}

impl BulkOnlyBackend {
    fn new (listing: Vec<Aircraft>)->Arc<Self> {
        Arc::new( BulkOnlyBackend { listing, calls: AtomicUsize::new(0), last_filters: Mutex::new(None) })
    }
}

#[async_trait]
impl Backend for BulkOnlyBackend {
    fn kind (&self)->BackendKind { BackendKind::Public }

    fn supports (&self, op: OperationKind)->bool {
        matches!( op, OperationKind::AllWithPosition | OperationKind::ByHex)
    }

    fn native_filters (&self, op: OperationKind)->&'static [FilterKey] { &[] }

    async fn execute (&self, op: &Operation, filters: &QueryFilters)->odin_adsblol::Result<RawRecords> {
        self.calls.fetch_add( 1, Ordering::SeqCst);
        *self.last_filters.lock().unwrap() = Some(filters.clone());
        match op {
            Operation::AllWithPosition => Ok( RawRecords::new( self.listing.clone())),
            Operation::ByHex(hex) => Ok( RawRecords::new( self.listing.iter().filter( |ac| ac.hex() == hex).cloned().collect())),
            _ => panic!("unexpected operation {}", op)
        }
    }
}

fn ac (hex: &str, flight: &str, lat: f64, lon: f64, alt: i64)->Aircraft {
    Aircraft::from_json_value( json!({ "hex": hex, "flight": flight, "lat": lat, "lon": lon, "alt_baro": alt })).unwrap()
}

/// aircraft along the meridian north of (37,-122), plus one without position
fn listing ()->Vec<Aircraft> {
    vec![
        ac( "a00003", "UAL3", 37.8, -122.0, 30000),   // 48nm
        ac( "a00001", "UAL1", 37.1, -122.0, 5000),    // 6nm
        ac( "a00004", "DAL4", 39.0, -122.0, 35000),   // 120nm
        ac( "a00002", "DAL2", 37.4, -122.0, 12000),   // 24nm
        Aircraft::from_json_value( json!({ "hex": "a00005", "flight": "UAL5" })).unwrap(),
    ]
}

fn hexes (env: &odin_adsblol::ResultEnvelope)->Vec<String> {
    env.iter().map( |ac| ac.hex().to_string()).collect()
}

fn public_config ()->AdsbLolConfig {
    AdsbLolConfig::default().with_backend( BackendSelection::Public).with_credential("key")
}

// run with "cargo test --test test_client -- --nocapture"

#[test]
fn test_backend_selection () {
    let config = AdsbLolConfig::default();
    assert_eq!( select_backend( &config), BackendKind::Native);

    let config = AdsbLolConfig::default().with_credential("key");
    assert_eq!( select_backend( &config), BackendKind::Native);

    let config = AdsbLolConfig::default().with_credential("key").with_native_access(false);
    assert_eq!( select_backend( &config), BackendKind::Public);

    let config = AdsbLolConfig::default().with_native_access(false);
    assert_eq!( select_backend( &config), BackendKind::Native);

    let config = AdsbLolConfig::default().with_backend( BackendSelection::Public);
    assert_eq!( select_backend( &config), BackendKind::Public);

    let config = AdsbLolConfig::default().with_backend( BackendSelection::Native).with_credential("key").with_native_access(false);
    assert_eq!( select_backend( &config), BackendKind::Native);
}

#[test]
fn test_invalid_config () {
    let transport = MockTransport::new( json!({}));
    let res = AdsbLolClient::with_transport( &AdsbLolConfig::default().with_timeout_secs(0.0), transport.clone());
    assert!( matches!( res, Err(OdinAdsbLolError::ConfigError(_))));

    let res = AdsbLolClient::with_transport( &AdsbLolConfig::default().with_native_base_url("not a url"), transport);
    assert!( matches!( res, Err(OdinAdsbLolError::ConfigError(_))));
}

#[test]
fn test_dispatch () {
    let transport = MockTransport::new( json!({}));
    let native = AdsbLolClient::with_transport( &AdsbLolConfig::default(), transport.clone()).unwrap();
    let public = AdsbLolClient::with_transport( &public_config(), transport).unwrap();
    let emulating = AdsbLolClient::with_backend( BulkOnlyBackend::new( Vec::new()));

    assert_eq!( native.dispatch( OperationKind::Circle), Dispatch::Native);
    assert_eq!( public.dispatch( OperationKind::Circle), Dispatch::Unsupported);
    assert_eq!( public.dispatch( OperationKind::All), Dispatch::Unsupported);
    assert_eq!( public.dispatch( OperationKind::Military), Dispatch::Native);
    assert_eq!( emulating.dispatch( OperationKind::Circle), Dispatch::Emulated);
    assert_eq!( emulating.dispatch( OperationKind::Box), Dispatch::Emulated);
    assert_eq!( emulating.dispatch( OperationKind::All), Dispatch::Unsupported); // no emulation for non-geographic ops
}

#[tokio::test]
async fn test_public_circle_unsupported () {
    let transport = MockTransport::new( json!({ "ac": [] }));
    let client = AdsbLolClient::with_transport( &public_config(), transport.clone()).unwrap();
    assert_eq!( client.backend_kind(), BackendKind::Public);

    let res = client.in_circle( 37.0, -122.0, 25.0, &QueryFilters::none()).await;
    assert!( matches!( res, Err(OdinAdsbLolError::UnsupportedOperationError{..})));

    let res = client.all( &QueryFilters::none()).await;
    assert!( matches!( res, Err(OdinAdsbLolError::UnsupportedOperationError{..})));

    assert_eq!( transport.n_requests(), 0);
}

#[tokio::test]
async fn test_native_circle () {
    let transport = MockTransport::new( json!({
        "now": 1700000000, "resultCount": 1, "ptime": 1.5,
        "aircraft": [ { "hex": "a00001", "lat": 37.1, "lon": -122.0 } ]
    }));
    let client = AdsbLolClient::with_transport( &AdsbLolConfig::default(), transport.clone()).unwrap();

    let env = client.in_circle( 37.0, -122.0, 25.0, &QueryFilters::none()).await.unwrap();
    println!("\n--- test_native_circle: {env}");

    assert!( !env.simulated());
    assert_eq!( env.backend(), BackendKind::Native);
    assert_eq!( env.result_count(), 1);
    assert!( env.processing_time().is_some());
    assert!( env.warnings().is_empty());
    assert_eq!( transport.n_requests(), 1);
}

#[tokio::test]
async fn test_invalid_parameters () {
    let transport = MockTransport::new( json!({ "aircraft": [] }));
    let client = AdsbLolClient::with_transport( &AdsbLolConfig::default(), transport.clone()).unwrap();

    assert!( matches!( client.in_circle( 95.0, 0.0, 10.0, &QueryFilters::none()).await, Err(OdinAdsbLolError::ValidationError(_))));
    assert!( matches!( client.closest( 0.0, 0.0, 0.0, &QueryFilters::none()).await, Err(OdinAdsbLolError::ValidationError(_))));
    assert!( matches!( client.in_box( 38.0, 37.0, -123.0, -122.0, &QueryFilters::none()).await, Err(OdinAdsbLolError::ValidationError(_))));
    assert!( matches!( client.by_hex( "xyz").await, Err(OdinAdsbLolError::ValidationError(_))));
    assert!( matches!( client.by_callsign( "  ").await, Err(OdinAdsbLolError::ValidationError(_))));
    assert!( matches!( client.by_squawk( "9999").await, Err(OdinAdsbLolError::ValidationError(_))));
    assert_eq!( transport.n_requests(), 0);
}

#[tokio::test]
async fn test_dropped_filters_warn () {
    let transport = MockTransport::new( json!({ "ac": [ { "hex": "ae0001", "dbFlags": 1 } ], "now": 1700000000000u64 }));
    let client = AdsbLolClient::with_transport( &public_config(), transport.clone()).unwrap();

    let filters = QueryFilters::builder().callsign_prefix("RCH").above_alt_baro(1000).build().unwrap();
    let env = client.query( &Operation::Military, &filters).await.unwrap();

    assert_eq!( env.result_count(), 1);
    assert_eq!( env.warnings().len(), 2);
    assert!( env.warnings()[0].contains("callsign_prefix"));
    assert!( !env.simulated());

    // identifier lookups on the native backend don't take filters either
    let transport = MockTransport::new( json!({ "aircraft": [] }));
    let client = AdsbLolClient::with_transport( &AdsbLolConfig::default(), transport.clone()).unwrap();
    let env = client.query( &Operation::by_hex("a00001").unwrap(), &filters).await.unwrap();
    assert_eq!( env.warnings().len(), 2);

    let env = client.query( &Operation::All, &filters).await.unwrap();
    assert!( env.warnings().is_empty());
}

#[tokio::test]
async fn test_endpoint_predicate_not_dropped () {
    let transport = MockTransport::new( json!({ "ac": [ { "hex": "ae0001", "dbFlags": 1 } ] }));
    let client = AdsbLolClient::with_transport( &public_config(), transport.clone()).unwrap();

    // the military endpoint already is the military predicate
    let filters = QueryFilters::builder().military(true).build().unwrap();
    let env = client.query( &Operation::Military, &filters).await.unwrap();
    assert!( env.warnings().is_empty());

    let filters = QueryFilters::builder().military(true).callsign_prefix("RCH").build().unwrap();
    let env = client.query( &Operation::Military, &filters).await.unwrap();
    assert_eq!( env.warnings().len(), 1);
    assert!( env.warnings()[0].contains("callsign_prefix"));
}

#[tokio::test]
async fn test_public_utility_endpoints () {
    let transport = MockTransport::new( json!({ "icao": "KSFO" }));
    let client = AdsbLolClient::with_transport( &public_config(), transport.clone()).unwrap();
    let v = client.airport( "KSFO").await.unwrap();
    assert_eq!( v["icao"], "KSFO");
    assert_eq!( transport.n_requests(), 1);

    // there are no such endpoints on the native API
    let transport = MockTransport::new( json!({}));
    let client = AdsbLolClient::with_transport( &AdsbLolConfig::default(), transport.clone()).unwrap();
    assert!( matches!( client.airport( "KSFO").await, Err(OdinAdsbLolError::UnsupportedOperationError{..})));
    assert!( matches!( client.me().await, Err(OdinAdsbLolError::UnsupportedOperationError{..})));
    assert_eq!( transport.n_requests(), 0);
}

#[tokio::test]
async fn test_emulated_circle () {
    let backend = BulkOnlyBackend::new( listing());
    let client = AdsbLolClient::with_backend( backend.clone());

    let env = client.in_circle( 37.0, -122.0, 50.0, &QueryFilters::none()).await.unwrap();
    println!("\n--- test_emulated_circle: {env}");

    assert!( env.simulated());
    assert_eq!( hexes(&env), vec!["A00001", "A00002", "A00003"]); // ascending distance
    assert_eq!( env.result_count(), env.aircraft().len());
    assert!( env.warnings().is_empty());
    assert_eq!( backend.calls.load( Ordering::SeqCst), 1); // never a second request
    assert_eq!( backend.last_filters.lock().unwrap().clone(), Some(QueryFilters::none()));

    // filters are applied locally, nothing is dropped
    let filters = QueryFilters::builder().callsign_prefix("UAL").above_alt_baro(10000).build().unwrap();
    let env = client.in_circle( 37.0, -122.0, 50.0, &filters).await.unwrap();
    assert_eq!( hexes(&env), vec!["A00003"]);
    assert!( env.warnings().is_empty());
}

#[tokio::test]
async fn test_emulated_matches_direct_filtering () {
    let listing = listing();
    let client = AdsbLolClient::with_backend( BulkOnlyBackend::new( listing.clone()));
    let center = GeoPos::new( 37.0, -122.0).unwrap();

    for radius in [1.0, 10.0, 24.0, 30.0, 100.0, 500.0] {
        let env = client.in_circle( 37.0, -122.0, radius, &QueryFilters::none()).await.unwrap();
        let got: HashSet<String> = hexes(&env).into_iter().collect();
        let expected: HashSet<String> = listing.iter()
            .filter( |ac| ac.position().map( |p| geo::distance_nm( &center, &p) <= radius).unwrap_or(false))
            .map( |ac| ac.hex().to_string())
            .collect();
        assert_eq!( got, expected, "radius {}", radius);
    }
}

#[tokio::test]
async fn test_emulated_closest () {
    let client = AdsbLolClient::with_backend( BulkOnlyBackend::new( Vec::new()));
    let env = client.closest( 37.0, -122.0, 50.0, &QueryFilters::none()).await.unwrap();
    assert!( env.is_empty());
    assert_eq!( env.result_count(), 0);
    assert!( env.simulated());

    // two candidates at the same distance east and west of the center
    let east = ac( "b00001", "EAST", 0.0, 1.0, 10000);
    let west = ac( "b00002", "WEST", 0.0, -1.0, 10000);
    let client = AdsbLolClient::with_backend( BulkOnlyBackend::new( vec![east.clone(), west.clone()]));
    let env = client.closest( 0.0, 0.0, 100.0, &QueryFilters::none()).await.unwrap();
    assert_eq!( hexes(&env), vec!["B00001"]);

    let client = AdsbLolClient::with_backend( BulkOnlyBackend::new( vec![west, east]));
    let env = client.closest( 0.0, 0.0, 100.0, &QueryFilters::none()).await.unwrap();
    assert_eq!( hexes(&env), vec!["B00002"]);

    // filters are applied before the nearest one is picked
    let client = AdsbLolClient::with_backend( BulkOnlyBackend::new( listing()));
    let filters = QueryFilters::builder().callsign_prefix("DAL").build().unwrap();
    let env = client.closest( 37.0, -122.0, 200.0, &filters).await.unwrap();
    assert_eq!( hexes(&env), vec!["A00002"]);
}

#[tokio::test]
async fn test_emulated_box () {
    let listing = vec![
        ac( "c00001", "IN1", 37.5, -122.5, 1000),
        ac( "c00002", "OUT", 38.0001, -122.5, 1000),
        ac( "c00003", "EDGE", 38.0, -122.0, 1000),
    ];
    let client = AdsbLolClient::with_backend( BulkOnlyBackend::new( listing));

    let env = client.in_box( 37.0, 38.0, -123.0, -122.0, &QueryFilters::none()).await.unwrap();
    assert!( env.simulated());
    assert_eq!( hexes(&env), vec!["C00001", "C00003"]); // input order
}

#[tokio::test]
async fn test_non_geo_not_simulated () {
    let client = AdsbLolClient::with_backend( BulkOnlyBackend::new( listing()));
    let env = client.by_hex( "a00002").await.unwrap();
    assert!( !env.simulated());
    assert_eq!( hexes(&env), vec!["A00002"]);
}

#[tokio::test]
async fn test_result_count_invariant () {
    let native_transport = MockTransport::new( json!({
        "now": 1700000000, "resultCount": 3, "ptime": 0.2,
        "aircraft": [ { "hex": "a00001" }, { "hex": "a00002", "lat": 37.0, "lon": -122.0 }, { "hex": "a00003" } ]
    }));
    let native = AdsbLolClient::with_transport( &AdsbLolConfig::default(), native_transport).unwrap();

    let public_transport = MockTransport::new( json!({ "ac": [ { "hex": "a00001" }, { "hex": "a00002" } ], "now": 1700000000000u64 }));
    let public = AdsbLolClient::with_transport( &public_config(), public_transport).unwrap();

    let emulating = AdsbLolClient::with_backend( BulkOnlyBackend::new( listing()));

    let ops = vec![
        Operation::by_hex("a00001").unwrap(), Operation::by_callsign("UAL1").unwrap(), Operation::by_registration("N1").unwrap(),
        Operation::by_type("B738").unwrap(), Operation::by_squawk("7700").unwrap(), Operation::Military, Operation::Pia, Operation::Ladd,
        Operation::in_circle( 37.0, -122.0, 50.0).unwrap(), Operation::closest( 37.0, -122.0, 50.0).unwrap(),
        Operation::in_box( 36.0, 38.0, -123.0, -121.0).unwrap(), Operation::All, Operation::AllWithPosition
    ];

    for client in [&native, &public, &emulating] {
        for op in &ops {
            match client.query( op, &QueryFilters::none()).await {
                Ok(env) => {
                    assert_eq!( env.result_count(), env.aircraft().len(), "{} on {}", op, client.backend_kind());
                    assert!( !env.simulated() || op.is_geographic());
                }
                Err(OdinAdsbLolError::UnsupportedOperationError{..}) => {}
                Err(e) => panic!("{} failed on {}: {}", op, client.backend_kind(), e)
            }
        }
    }
}

#[tokio::test]
async fn test_concurrent_queries () {
    let client = AdsbLolClient::with_backend( BulkOnlyBackend::new( listing()));
    let c2 = client.clone();
    let no_filters = QueryFilters::none();

    let (r1, r2) = tokio::join!(
        client.in_circle( 37.0, -122.0, 50.0, &no_filters),
        c2.in_box( 37.0, 38.0, -123.0, -121.0, &no_filters)
    );
    assert_eq!( r1.unwrap().result_count(), 3);
    assert_eq!( r2.unwrap().result_count(), 3);
}

#[tokio::test]
async fn test_envelope_json () {
    let client = AdsbLolClient::with_backend( BulkOnlyBackend::new( listing()));
    let env = client.in_circle( 37.0, -122.0, 10.0, &QueryFilters::none()).await.unwrap();
    let v = serde_json::to_value( &env).unwrap();

    assert_eq!( v["result_count"], 1);
    assert_eq!( v["backend"], "public");
    assert_eq!( v["simulated"], true);
    assert_eq!( v["aircraft"][0]["hex"], "A00001");
}
