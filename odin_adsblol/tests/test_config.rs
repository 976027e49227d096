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

use std::time::Duration;
use odin_adsblol::{config::{self, parse_config, AdsbLolConfig, BackendSelection, DEFAULT_TIMEOUT_SECS}, load_config, OdinAdsbLolError};

// run with "cargo test --test test_config -- --nocapture"

#[test]
fn test_defaults () {
    let config = AdsbLolConfig::default();
    assert_eq!( config.backend, BackendSelection::Auto);
    assert_eq!( config.timeout_secs, 30.0);
    assert_eq!( config.timeout().unwrap(), Duration::from_secs(30));
    assert_eq!( config.native_url(), "https://re-api.adsb.lol/");
    assert_eq!( config.public_url(), "https://api.adsb.lol");
    assert!( config.native_access);
    assert!( config.validate().is_ok());
}

#[test]
fn test_parse_ron () {
    let src = r#"AdsbLolConfig(
        backend: Public,
        credential: Some("my-key"),
        public_base_url: Some("http://localhost:8080"),
        timeout_secs: 2.5,
    )"#;
    let config = parse_config( src).unwrap();
    println!("\n--- test_parse_ron: {config:?}");

    assert_eq!( config.backend, BackendSelection::Public);
    assert_eq!( config.credential.as_deref(), Some("my-key"));
    assert_eq!( config.public_url(), "http://localhost:8080");
    assert_eq!( config.native_url(), "https://re-api.adsb.lol/"); // not set, default
    assert_eq!( config.timeout().unwrap(), Duration::from_millis(2500));
    assert!( config.native_access);
}

#[test]
fn test_parse_errors () {
    assert!( matches!( parse_config( "AdsbLolConfig( backend: Sideways )"), Err(OdinAdsbLolError::ConfigError(_))));
    assert!( matches!( parse_config( "AdsbLolConfig( timeout_secs: -1.0 )"), Err(OdinAdsbLolError::ConfigError(_))));
    assert!( matches!( parse_config( r#"AdsbLolConfig( native_base_url: Some("ftp://example.com") )"#), Err(OdinAdsbLolError::ConfigError(_))));
}

#[test]
fn test_load_config_file () {
    let config = load_config( concat!( env!("CARGO_MANIFEST_DIR"), "/configs/adsblol.ron")).unwrap();
    assert_eq!( config.backend, BackendSelection::Auto);
    assert_eq!( config.timeout_secs, DEFAULT_TIMEOUT_SECS);

    let res = load_config( "no/such/config.ron");
    assert!( matches!( res, Err(OdinAdsbLolError::IOError(_))));
}

#[test]
fn test_backend_selection_from_str () {
    assert_eq!( "auto".parse::<BackendSelection>().unwrap(), BackendSelection::Auto);
    assert_eq!( "Native".parse::<BackendSelection>().unwrap(), BackendSelection::Native);
    assert_eq!( "re-api".parse::<BackendSelection>().unwrap(), BackendSelection::Native);
    assert_eq!( "public".parse::<BackendSelection>().unwrap(), BackendSelection::Public);
    assert!( "sideways".parse::<BackendSelection>().is_err());
}

#[test]
fn test_builder_overrides () {
    let config = AdsbLolConfig::default()
        .with_backend( BackendSelection::Native)
        .with_native_base_url( "http://127.0.0.1:9000/")
        .with_timeout_secs( 1.0);
    assert_eq!( config.native_url(), "http://127.0.0.1:9000/");
    assert!( config.validate().is_ok());

    let config = AdsbLolConfig::default().with_timeout_secs( f64::INFINITY);
    assert!( matches!( config.validate(), Err(OdinAdsbLolError::ConfigError(_))));
}
