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

use std::fmt;
use serde::{Serialize,Deserialize};

use crate::aircraft;
use crate::geo::{GeoCircle,GeoBox};
use crate::errors::{Result,validation_error};

/// the parameter-free tag of an [`Operation`], which is what backend capabilities are expressed in
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(rename_all="snake_case")]
pub enum OperationKind {
    ByHex,
    ByCallsign,
    ByRegistration,
    ByType,
    BySquawk,
    Military,
    Pia,
    Ladd,
    Circle,
    Closest,
    Box,
    All,
    AllWithPosition,
}

impl OperationKind {
    pub fn is_geographic (&self)->bool {
        matches!( self, OperationKind::Circle | OperationKind::Closest | OperationKind::Box)
    }

    pub fn is_identifier_lookup (&self)->bool {
        matches!( self, OperationKind::ByHex | OperationKind::ByCallsign | OperationKind::ByRegistration | OperationKind::ByType)
    }

    pub fn name (&self)->&'static str {
        match self {
            OperationKind::ByHex => "by_hex",
            OperationKind::ByCallsign => "by_callsign",
            OperationKind::ByRegistration => "by_registration",
            OperationKind::ByType => "by_type",
            OperationKind::BySquawk => "by_squawk",
            OperationKind::Military => "military",
            OperationKind::Pia => "pia",
            OperationKind::Ladd => "ladd",
            OperationKind::Circle => "in_circle",
            OperationKind::Closest => "closest",
            OperationKind::Box => "in_box",
            OperationKind::All => "all",
            OperationKind::AllWithPosition => "all_with_position",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// a logical query with validated parameters. Use the constructor functions, which normalize
/// identifiers (hex and callsigns upper case, whitespace trimmed) and reject invalid input
#[derive(Debug,Clone,PartialEq,Serialize)]
pub enum Operation {
    ByHex(String),
    ByCallsign(String),
    ByRegistration(String),
    ByType(String),
    BySquawk(String),
    Military,
    Pia,
    Ladd,
    Circle(GeoCircle),
    Closest(GeoCircle),
    Box(GeoBox),
    All,
    AllWithPosition,
}

impl Operation {
    pub fn by_hex (hex: &str)->Result<Self> { Ok( Operation::ByHex( aircraft::canonical_hex(hex)?)) }
    pub fn by_callsign (callsign: &str)->Result<Self> { Ok( Operation::ByCallsign( identifier("callsign", callsign)?.to_ascii_uppercase())) }
    pub fn by_registration (reg: &str)->Result<Self> { Ok( Operation::ByRegistration( identifier("registration", reg)?.to_ascii_uppercase())) }
    pub fn by_type (type_code: &str)->Result<Self> { Ok( Operation::ByType( identifier("type", type_code)?.to_ascii_uppercase())) }

    pub fn by_squawk (squawk: &str)->Result<Self> {
        let sq = squawk.trim();
        if aircraft::is_valid_squawk(sq) {
            Ok( Operation::BySquawk( sq.to_string()))
        } else {
            Err( validation_error!("squawk '{}' is not a 4 digit octal code", sq))
        }
    }

    pub fn in_circle (lat: f64, lon: f64, radius_nm: f64)->Result<Self> { Ok( Operation::Circle( GeoCircle::new( lat, lon, radius_nm)?)) }
    pub fn closest (lat: f64, lon: f64, radius_nm: f64)->Result<Self> { Ok( Operation::Closest( GeoCircle::new( lat, lon, radius_nm)?)) }
    pub fn in_box (lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64)->Result<Self> {
        Ok( Operation::Box( GeoBox::new( lat_min, lat_max, lon_min, lon_max)?))
    }

    pub fn kind (&self)->OperationKind {
        match self {
            Operation::ByHex(_) => OperationKind::ByHex,
            Operation::ByCallsign(_) => OperationKind::ByCallsign,
            Operation::ByRegistration(_) => OperationKind::ByRegistration,
            Operation::ByType(_) => OperationKind::ByType,
            Operation::BySquawk(_) => OperationKind::BySquawk,
            Operation::Military => OperationKind::Military,
            Operation::Pia => OperationKind::Pia,
            Operation::Ladd => OperationKind::Ladd,
            Operation::Circle(_) => OperationKind::Circle,
            Operation::Closest(_) => OperationKind::Closest,
            Operation::Box(_) => OperationKind::Box,
            Operation::All => OperationKind::All,
            Operation::AllWithPosition => OperationKind::AllWithPosition,
        }
    }

    pub fn is_geographic (&self)->bool { self.kind().is_geographic() }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ByHex(s) | Operation::ByCallsign(s) | Operation::ByRegistration(s)
            | Operation::ByType(s) | Operation::BySquawk(s) => write!(f, "{}({})", self.kind(), s),
            Operation::Circle(c) | Operation::Closest(c) => write!(f, "{}({}, {}nm)", self.kind(), c.center(), c.radius_nm()),
            Operation::Box(b) => write!(f, "{}", b),
            _ => write!(f, "{}", self.kind())
        }
    }
}

fn identifier (what: &str, s: &str)->Result<String> {
    let s = s.trim();
    if s.is_empty() {
        Err( validation_error!("empty {}", what))
    } else {
        Ok( s.to_string())
    }
}
