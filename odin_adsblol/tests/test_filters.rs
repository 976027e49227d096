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

use serde_json::json;
use odin_adsblol::{Aircraft, FilterKey, OdinAdsbLolError, QueryFilters};

fn aircraft (v: serde_json::Value)->Aircraft { Aircraft::from_json_value(v).unwrap() }

// run with "cargo test --test test_filters -- --nocapture"

#[test]
fn test_callsign_mutual_exclusion () {
    let res = QueryFilters::builder().callsign_exact("UAL123").callsign_prefix("UAL").build();
    assert!( matches!( res, Err(OdinAdsbLolError::ValidationError(_))));
}

#[test]
fn test_altitude_bound_order () {
    let res = QueryFilters::builder().above_alt_baro(30000).below_alt_baro(10000).build();
    assert!( matches!( res, Err(OdinAdsbLolError::ValidationError(_))));

    let f = QueryFilters::builder().above_alt_baro(10000).below_alt_baro(10000).build().unwrap();
    assert_eq!( f.above_alt_baro(), Some(10000));
}

#[test]
fn test_invalid_values () {
    assert!( QueryFilters::builder().squawk("7800").build().is_err()); // not octal
    assert!( QueryFilters::builder().squawk("770").build().is_err());
    assert!( QueryFilters::builder().callsign_prefix("  ").build().is_err());
}

#[test]
fn test_predicates () {
    let f = QueryFilters::builder()
        .callsign_prefix("ual")
        .type_code("b738")
        .above_alt_baro(5000)
        .military(false)
        .build().unwrap();
    println!("\n--- test_predicates: {f}");

    let preds = f.predicates();
    assert_eq!( preds, vec![
        (FilterKey::CallsignPrefix, "UAL".to_string()),
        (FilterKey::TypeCode, "B738".to_string()),
        (FilterKey::AboveAltBaro, "5000".to_string()),
        (FilterKey::Military, "false".to_string()),
    ]);
    assert!( QueryFilters::none().predicates().is_empty());
    assert!( QueryFilters::none().is_empty());
}

#[test]
fn test_restricted_to () {
    let f = QueryFilters::builder().callsign_exact("DAL1").squawk("7700").pia(true).build().unwrap();
    let (kept, dropped) = f.restricted_to( &[FilterKey::Squawk]);

    assert_eq!( kept.keys(), vec![FilterKey::Squawk]);
    assert_eq!( dropped, vec![FilterKey::CallsignExact, FilterKey::Pia]);

    let (kept, dropped) = f.restricted_to( &FilterKey::ALL);
    assert_eq!( kept, f);
    assert!( dropped.is_empty());
}

#[test]
fn test_matches () {
    let ual = aircraft( json!({ "hex": "a00001", "flight": "UAL123", "t": "B738", "alt_baro": 35000, "squawk": "1200", "dbFlags": 0 }));
    let mil = aircraft( json!({ "hex": "ae0001", "flight": "RCH401", "t": "C17", "alt_baro": "ground", "dbFlags": 1 }));
    let noalt = aircraft( json!({ "hex": "a00002", "flight": "UAL9" }));

    let f = QueryFilters::builder().callsign_prefix("UAL").build().unwrap();
    assert!( f.matches(&ual));
    assert!( !f.matches(&mil));
    assert!( f.matches(&noalt));

    let f = QueryFilters::builder().callsign_exact("ual123").build().unwrap();
    assert!( f.matches(&ual));

    let f = QueryFilters::builder().below_alt_baro(1000).build().unwrap();
    assert!( !f.matches(&ual));
    assert!( f.matches(&mil)); // ground counts as 0ft
    assert!( !f.matches(&noalt));

    let f = QueryFilters::builder().military(true).build().unwrap();
    assert!( !f.matches(&ual));
    assert!( f.matches(&mil));

    let f = QueryFilters::builder().military(false).type_code("b738").squawk("1200").build().unwrap();
    assert!( f.matches(&ual));
    assert!( !f.matches(&mil));

    assert!( QueryFilters::none().matches(&noalt));
}
