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
use serde::{Serialize,Serializer,Deserialize,Deserializer};
use serde_json::Value;
use regex::Regex;
use lazy_static::lazy_static;

use crate::geo::{self,GeoPos,Located};
use crate::errors::{OdinAdsbLolError,Result,validation_error};

lazy_static! {
    // readsb prefixes non-ICAO (TIS-B / anonymous) addresses with '~'
    static ref HEX_RE: Regex = Regex::new( r"^~?[0-9a-fA-F]{6}$").unwrap();
    static ref SQUAWK_RE: Regex = Regex::new( r"^[0-7]{4}$").unwrap();
}

/// the raw value both backends use for aircraft on the ground
pub const GROUND_MARKER: &str = "ground";

/// aircraft database flag bits (readsb `dbFlags`)
pub const DB_FLAG_MILITARY: u32 = 1;
pub const DB_FLAG_INTERESTING: u32 = 2;
pub const DB_FLAG_PIA: u32 = 4;
pub const DB_FLAG_LADD: u32 = 8;

pub fn is_valid_hex (s: &str)->bool { HEX_RE.is_match(s) }
pub fn is_valid_squawk (s: &str)->bool { SQUAWK_RE.is_match(s) }

/// canonical form of an ICAO 24bit address (upper case, optional '~' prefix kept)
pub fn canonical_hex (s: &str)->Result<String> {
    let s = s.trim();
    if is_valid_hex(s) {
        Ok( s.to_ascii_uppercase() )
    } else {
        Err( validation_error!("not a valid ICAO 24bit hex address: '{}'", s))
    }
}

/* #region Altitude ***********************************************************************************/

/// barometric or geometric altitude. Aircraft on the ground are reported with a marker, not
/// with a (negative) number
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Altitude {
    Feet(i64),
    Ground
}

impl Altitude {
    /// altitude to compare against numeric bounds. Ground counts as 0ft
    pub fn feet (&self)->i64 {
        match self {
            Altitude::Feet(ft) => *ft,
            Altitude::Ground => 0
        }
    }

    pub fn is_ground (&self)->bool { matches!( self, Altitude::Ground) }

    /// the ground marker only counts if it is exactly the marker string. Other non-numeric values
    /// are treated as absent
    fn from_raw (v: &Value)->Option<Altitude> {
        match v {
            Value::String(s) if s == GROUND_MARKER => Some(Altitude::Ground),
            Value::String(s) => coerce_int_str(s).map(Altitude::Feet),
            Value::Number(_) => coerce_int(v).map(Altitude::Feet),
            _ => None
        }
    }
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Altitude::Feet(ft) => write!(f, "{}", ft),
            Altitude::Ground => write!(f, "{}", GROUND_MARKER)
        }
    }
}

impl Serialize for Altitude {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        match self {
            Altitude::Feet(ft) => serializer.serialize_i64(*ft),
            Altitude::Ground => serializer.serialize_str(GROUND_MARKER)
        }
    }
}

fn coerce_int (v: &Value)->Option<i64> {
    if let Some(i) = v.as_i64() {
        Some(i)
    } else {
        v.as_f64().filter( |x| x.is_finite()).map( |x| x.round() as i64)
    }
}

fn coerce_int_str (s: &str)->Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else( || s.parse::<f64>().ok().filter( |x| x.is_finite()).map( |x| x.round() as i64))
}

fn de_lenient_int<'de,D> (deserializer: D)->std::result::Result<Option<i64>,D::Error> where D: Deserializer<'de> {
    let v: Option<Value> = Option::deserialize(deserializer)?;
    Ok( v.as_ref().and_then( |v| match v {
        Value::String(s) => coerce_int_str(s),
        _ => coerce_int(v)
    }))
}

/* #endregion Altitude */

/* #region raw record *********************************************************************************/

/// the per-aircraft object as both backends send it. Field names follow the readsb json format
/// which both the native and the public API are based on. Everything but `hex` is optional
#[derive(Deserialize,Debug,Default)]
pub(crate) struct RawAircraft {
    #[serde(default)] hex: Option<String>,
    #[serde(default)] flight: Option<String>,
    #[serde(default, rename="r", alias="registration")] registration: Option<String>,
    #[serde(default, rename="t")] type_code: Option<String>,
    #[serde(default, rename="type")] source: Option<String>, // message source such as "adsb_icao" or "mlat"
    #[serde(default, rename="desc")] description: Option<String>,
    #[serde(default, rename="dbFlags")] db_flags: Option<u32>,

    #[serde(default)] lat: Option<f64>,
    #[serde(default)] lon: Option<f64>,
    #[serde(default)] alt_baro: Option<Value>,
    #[serde(default)] alt_geom: Option<Value>,

    #[serde(default)] gs: Option<f64>,
    #[serde(default)] ias: Option<f64>,
    #[serde(default)] tas: Option<f64>,
    #[serde(default)] mach: Option<f64>,
    #[serde(default)] track: Option<f64>,
    #[serde(default)] true_heading: Option<f64>,
    #[serde(default)] mag_heading: Option<f64>,
    #[serde(default, deserialize_with="de_lenient_int")] baro_rate: Option<i64>,
    #[serde(default, deserialize_with="de_lenient_int")] geom_rate: Option<i64>,

    #[serde(default)] nav_heading: Option<f64>,
    #[serde(default, deserialize_with="de_lenient_int")] nav_altitude_mcp: Option<i64>,

    #[serde(default)] squawk: Option<String>,
    #[serde(default)] emergency: Option<String>,
    #[serde(default)] category: Option<String>,

    #[serde(default)] seen: Option<f64>,
    #[serde(default)] seen_pos: Option<f64>,
    #[serde(default)] rssi: Option<f64>,
    #[serde(default)] messages: Option<u64>,
}

/* #endregion raw record */

/* #region Aircraft ***********************************************************************************/

/// normalized aircraft telemetry. Records are created from backend responses and never change
/// afterwards - a later query for the same aircraft yields a new record
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct Aircraft {
    hex: String,
    #[serde(skip_serializing_if="Option::is_none")] flight: Option<String>,
    #[serde(skip_serializing_if="Option::is_none")] registration: Option<String>,
    #[serde(rename="type", skip_serializing_if="Option::is_none")] type_code: Option<String>,
    #[serde(skip_serializing_if="Option::is_none")] description: Option<String>,
    #[serde(skip_serializing_if="Option::is_none")] source: Option<String>,
    #[serde(skip_serializing_if="Option::is_none")] db_flags: Option<u32>,

    #[serde(skip_serializing_if="Option::is_none")] lat: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] lon: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] alt_baro: Option<Altitude>,
    #[serde(skip_serializing_if="Option::is_none")] alt_geom: Option<Altitude>,

    #[serde(skip_serializing_if="Option::is_none")] ground_speed: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] track: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] true_heading: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] mag_heading: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] baro_rate: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none")] geom_rate: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none")] ias: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] tas: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] mach: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] nav_heading: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] nav_altitude_mcp: Option<i64>,

    #[serde(skip_serializing_if="Option::is_none")] squawk: Option<String>,
    #[serde(skip_serializing_if="Option::is_none")] emergency: Option<String>,
    #[serde(skip_serializing_if="Option::is_none")] category: Option<String>,

    #[serde(skip_serializing_if="Option::is_none")] seen: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] seen_pos: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] rssi: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")] messages: Option<u64>,
}

impl Aircraft {

    /// parse a single aircraft object in readsb json format
    pub fn from_json (json: &str)->Result<Aircraft> {
        let raw: RawAircraft = serde_json::from_str(json).map_err( |e| validation_error!("invalid aircraft record: {}", e))?;
        Aircraft::try_from(raw)
    }

    pub fn from_json_value (value: Value)->Result<Aircraft> {
        let raw: RawAircraft = serde_json::from_value(value).map_err( |e| validation_error!("invalid aircraft record: {}", e))?;
        Aircraft::try_from(raw)
    }

    //--- identity
    pub fn hex (&self)->&str { self.hex.as_str() }
    pub fn flight (&self)->Option<&str> { self.flight.as_deref() }
    pub fn callsign (&self)->Option<&str> { self.flight.as_deref() }
    pub fn registration (&self)->Option<&str> { self.registration.as_deref() }
    pub fn type_code (&self)->Option<&str> { self.type_code.as_deref() }
    pub fn description (&self)->Option<&str> { self.description.as_deref() }
    pub fn source (&self)->Option<&str> { self.source.as_deref() }
    pub fn db_flags (&self)->Option<u32> { self.db_flags }

    pub fn is_non_icao (&self)->bool { self.hex.starts_with('~') }

    //--- position
    pub fn lat (&self)->Option<f64> { self.lat }
    pub fn lon (&self)->Option<f64> { self.lon }
    pub fn has_position (&self)->bool { self.lat.is_some() && self.lon.is_some() }
    pub fn position (&self)->Option<GeoPos> {
        match (self.lat, self.lon) {
            (Some(lat),Some(lon)) => Some( GeoPos::from_valid_degrees(lat,lon)),
            _ => None
        }
    }
    pub fn position_age (&self)->Option<f64> { self.seen_pos }

    pub fn alt_baro (&self)->Option<Altitude> { self.alt_baro }
    pub fn alt_geom (&self)->Option<Altitude> { self.alt_geom }
    pub fn is_on_ground (&self)->bool { self.alt_baro.map( |a| a.is_ground()).unwrap_or(false) }

    /// distance in nautical miles to `pos`, if we have a position
    pub fn distance_to (&self, pos: &GeoPos)->Option<f64> { self.position().map( |p| geo::distance_nm( &p, pos)) }

    /// initial bearing in degrees from this aircraft to `pos`, if we have a position
    pub fn bearing_to (&self, pos: &GeoPos)->Option<f64> { self.position().map( |p| geo::bearing_deg( &p, pos)) }

    //--- kinematics
    pub fn ground_speed (&self)->Option<f64> { self.ground_speed }
    pub fn track (&self)->Option<f64> { self.track }
    pub fn true_heading (&self)->Option<f64> { self.true_heading }
    pub fn mag_heading (&self)->Option<f64> { self.mag_heading }
    pub fn baro_rate (&self)->Option<i64> { self.baro_rate }
    pub fn geom_rate (&self)->Option<i64> { self.geom_rate }
    pub fn vertical_rate (&self)->Option<i64> { self.baro_rate.or( self.geom_rate) }
    pub fn ias (&self)->Option<f64> { self.ias }
    pub fn tas (&self)->Option<f64> { self.tas }
    pub fn mach (&self)->Option<f64> { self.mach }
    pub fn nav_heading (&self)->Option<f64> { self.nav_heading }
    pub fn nav_altitude_mcp (&self)->Option<i64> { self.nav_altitude_mcp }

    //--- status
    pub fn squawk (&self)->Option<&str> { self.squawk.as_deref() }
    pub fn emergency (&self)->Option<&str> { self.emergency.as_deref() }
    pub fn has_emergency (&self)->bool { self.emergency.as_deref().map( |e| e != "none").unwrap_or(false) }
    pub fn category (&self)->Option<&str> { self.category.as_deref() }
    pub fn seen (&self)->Option<f64> { self.seen }
    pub fn seen_pos (&self)->Option<f64> { self.seen_pos }
    pub fn rssi (&self)->Option<f64> { self.rssi }
    pub fn messages (&self)->Option<u64> { self.messages }

    pub fn is_military (&self)->bool { self.has_db_flag( DB_FLAG_MILITARY) }
    pub fn is_interesting (&self)->bool { self.has_db_flag( DB_FLAG_INTERESTING) }
    pub fn is_pia (&self)->bool { self.has_db_flag( DB_FLAG_PIA) }
    pub fn is_ladd (&self)->bool { self.has_db_flag( DB_FLAG_LADD) }

    fn has_db_flag (&self, flag: u32)->bool { self.db_flags.map( |f| f & flag != 0).unwrap_or(false) }
}

impl TryFrom<RawAircraft> for Aircraft {
    type Error = OdinAdsbLolError;

    fn try_from (raw: RawAircraft)->Result<Aircraft> {
        let hex = match &raw.hex {
            Some(hex) => canonical_hex( hex)?,
            None => return Err( validation_error!("aircraft record without required 'hex' field"))
        };

        // positions are only accepted as complete and valid lat/lon pairs
        let (lat,lon) = match (raw.lat, raw.lon) {
            (Some(lat),Some(lon)) if geo::is_valid_latitude(lat) && geo::is_valid_longitude(lon) => (Some(lat),Some(lon)),
            _ => (None,None)
        };

        Ok( Aircraft {
            hex,
            flight: non_empty( raw.flight),
            registration: non_empty( raw.registration),
            type_code: non_empty( raw.type_code),
            description: non_empty( raw.description),
            source: non_empty( raw.source),
            db_flags: raw.db_flags,
            lat,
            lon,
            alt_baro: raw.alt_baro.as_ref().and_then( Altitude::from_raw),
            alt_geom: raw.alt_geom.as_ref().and_then( Altitude::from_raw),
            ground_speed: raw.gs,
            track: raw.track,
            true_heading: raw.true_heading,
            mag_heading: raw.mag_heading,
            baro_rate: raw.baro_rate,
            geom_rate: raw.geom_rate,
            ias: raw.ias,
            tas: raw.tas,
            mach: raw.mach,
            nav_heading: raw.nav_heading,
            nav_altitude_mcp: raw.nav_altitude_mcp,
            squawk: non_empty( raw.squawk).filter( |s| is_valid_squawk(s)),
            emergency: non_empty( raw.emergency),
            category: non_empty( raw.category),
            seen: raw.seen,
            seen_pos: raw.seen_pos,
            rssi: raw.rssi,
            messages: raw.messages,
        })
    }
}

fn non_empty (s: Option<String>)->Option<String> {
    s.map( |s| s.trim().to_string()).filter( |s| !s.is_empty())
}

impl Located for Aircraft {
    fn location (&self)->Option<GeoPos> { self.position() }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Aircraft( hex: {}", self.hex)?;
        if let Some(cs) = &self.flight { write!( f, ", cs: \"{cs}\"")?; }
        if let Some(p) = self.position() { write!( f, ", pos: {}", p)?; }
        if let Some(alt) = self.alt_baro { write!( f, ", alt: {}", alt)?; }
        if let Some(gs) = self.ground_speed { write!( f, ", gs: {:.1}", gs)?; }
        if let Some(trk) = self.track { write!( f, ", trk: {:.0}", trk)?; }
        if let Some(sq) = &self.squawk { write!( f, ", sqk: {}", sq)?; }
        write!(f, ")")
    }
}

/* #endregion Aircraft */
