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

#![allow(unused,uncommon_codepoints,non_snake_case)]

/// great-circle distance engine used both to validate geographic query parameters and to
/// emulate circle/closest/box queries on backends that only provide bulk listings.
/// All distances are nautical miles on a sphere with the mean earth radius, which is what
/// the aggregation servers use for their own range queries.

use std::fmt;
use serde::{Serialize,Deserialize};

use crate::errors::{Result,validation_error};

/// mean earth radius in nautical miles
pub const MEAN_EARTH_RADIUS_NM: f64 = 3440.065;

/// distances closer than this are considered equal (tie-break and boundary checks)
pub const DISTANCE_TOLERANCE_NM: f64 = 1e-6;

/* #region GeoPos *************************************************************************************/

/// a validated geodetic position in decimal degrees
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoPos {
    lat: f64,
    lon: f64
}

impl GeoPos {
    pub fn new (lat: f64, lon: f64)->Result<Self> {
        check_latitude(lat)?;
        check_longitude(lon)?;
        Ok( GeoPos{lat,lon} )
    }

    /// for positions that come out of already validated records
    pub(crate) fn from_valid_degrees (lat: f64, lon: f64)->Self { GeoPos{lat,lon} }

    #[inline] pub fn lat (&self)->f64 { self.lat }
    #[inline] pub fn lon (&self)->f64 { self.lon }

    pub fn distance_to (&self, other: &GeoPos)->f64 { distance_nm( self, other) }
    pub fn bearing_to (&self, other: &GeoPos)->f64 { bearing_deg( self, other) }
}

impl fmt::Display for GeoPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.5},{:.5}]", self.lat, self.lon)
    }
}

pub fn is_valid_latitude (lat: f64)->bool { lat.is_finite() && (-90.0..=90.0).contains(&lat) }
pub fn is_valid_longitude (lon: f64)->bool { lon.is_finite() && (-180.0..=180.0).contains(&lon) }

fn check_latitude (lat: f64)->Result<()> {
    if is_valid_latitude(lat) { Ok(()) } else { Err( validation_error!("latitude {} outside [-90,90]", lat)) }
}

fn check_longitude (lon: f64)->Result<()> {
    if is_valid_longitude(lon) { Ok(()) } else { Err( validation_error!("longitude {} outside [-180,180]", lon)) }
}

/* #endregion GeoPos */

/* #region distance and bearing ***********************************************************************/

/// haversine great-circle distance in nautical miles
pub fn distance_nm (from: &GeoPos, to: &GeoPos)->f64 {
    let φ1 = from.lat.to_radians();
    let φ2 = to.lat.to_radians();
    let Δφ = (to.lat - from.lat).to_radians();
    let Δλ = (to.lon - from.lon).to_radians();

    let a = (Δφ / 2.0).sin().powi(2) + φ1.cos() * φ2.cos() * (Δλ / 2.0).sin().powi(2);
    let a = a.clamp( 0.0, 1.0); // rounding can push antipodal points slightly above 1
    let c = 2.0 * a.sqrt().atan2( (1.0 - a).sqrt());

    MEAN_EARTH_RADIUS_NM * c
}

/// initial bearing from `from` to `to` in degrees [0,360)
pub fn bearing_deg (from: &GeoPos, to: &GeoPos)->f64 {
    let φ1 = from.lat.to_radians();
    let φ2 = to.lat.to_radians();
    let Δλ = (to.lon - from.lon).to_radians();

    let x = Δλ.sin() * φ2.cos();
    let y = φ1.cos() * φ2.sin() - φ1.sin() * φ2.cos() * Δλ.cos();

    let deg = x.atan2(y).to_degrees().rem_euclid(360.0);
    if deg >= 360.0 { 0.0 } else { deg } // rem_euclid can round up to exactly 360 for tiny negatives
}

/* #endregion distance and bearing */

/* #region query shapes *******************************************************************************/

/// center point and radius of a circle or closest query
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoCircle {
    center: GeoPos,
    radius_nm: f64,
}

impl GeoCircle {
    pub fn new (lat: f64, lon: f64, radius_nm: f64)->Result<Self> {
        let center = GeoPos::new( lat, lon)?;
        if !radius_nm.is_finite() || radius_nm <= 0.0 {
            return Err( validation_error!("radius must be a positive number of nautical miles, got {}", radius_nm))
        }
        Ok( GeoCircle{ center, radius_nm } )
    }

    pub fn center (&self)->&GeoPos { &self.center }
    pub fn radius_nm (&self)->f64 { self.radius_nm }

    /// boundary inclusive
    pub fn contains (&self, pos: &GeoPos)->bool {
        distance_nm( &self.center, pos) - self.radius_nm <= DISTANCE_TOLERANCE_NM
    }
}

impl fmt::Display for GeoCircle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circle({}, {}nm)", self.center, self.radius_nm)
    }
}

/// latitude/longitude aligned bounding box.
/// Boxes that cross the ±180° meridian are rejected - we only handle the non-wrapping case
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoBox {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl GeoBox {
    pub fn new (lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64)->Result<Self> {
        check_latitude(lat_min)?;
        check_latitude(lat_max)?;
        check_longitude(lon_min)?;
        check_longitude(lon_max)?;

        if lat_min > lat_max {
            return Err( validation_error!("lat_min {} is greater than lat_max {}", lat_min, lat_max))
        }
        if lon_min > lon_max {
            return Err( validation_error!("lon_min {} is greater than lon_max {} (boxes crossing the antimeridian are not supported)", lon_min, lon_max))
        }

        Ok( GeoBox{ lat_min, lat_max, lon_min, lon_max } )
    }

    pub fn lat_min (&self)->f64 { self.lat_min }
    pub fn lat_max (&self)->f64 { self.lat_max }
    pub fn lon_min (&self)->f64 { self.lon_min }
    pub fn lon_max (&self)->f64 { self.lon_max }

    pub fn center (&self)->GeoPos {
        GeoPos::from_valid_degrees( (self.lat_min + self.lat_max) / 2.0, (self.lon_min + self.lon_max) / 2.0)
    }

    /// inclusive on all four edges
    pub fn contains (&self, pos: &GeoPos)->bool {
        pos.lat >= self.lat_min && pos.lat <= self.lat_max && pos.lon >= self.lon_min && pos.lon <= self.lon_max
    }
}

impl fmt::Display for GeoBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box(lat:[{},{}], lon:[{},{}])", self.lat_min, self.lat_max, self.lon_min, self.lon_max)
    }
}

/* #endregion query shapes */

/* #region candidate filtering ************************************************************************/

/// something that might have a position. Candidates without position never match a geographic query
pub trait Located {
    fn location (&self)->Option<GeoPos>;
}

/// all candidates within `circle`, ordered by ascending distance. Candidates with equal distance
/// keep their input order (the sort is stable)
pub fn within_radius<T: Located> (candidates: impl IntoIterator<Item=T>, circle: &GeoCircle)->Vec<T> {
    let mut hits: Vec<(f64,T)> = candidates.into_iter()
        .filter_map( |c| {
            let d = distance_nm( &circle.center, &c.location()?);
            if d - circle.radius_nm <= DISTANCE_TOLERANCE_NM { Some((d,c)) } else { None }
        })
        .collect();

    hits.sort_by( |a,b| a.0.total_cmp( &b.0));
    hits.into_iter().map( |(_,c)| c).collect()
}

/// the single nearest candidate within `circle`. If two candidates are equidistant (within
/// [`DISTANCE_TOLERANCE_NM`]) the one that comes first in the input wins
pub fn closest<T: Located> (candidates: impl IntoIterator<Item=T>, circle: &GeoCircle)->Option<T> {
    let mut best: Option<(f64,T)> = None;

    for c in candidates {
        if let Some(pos) = c.location() {
            let d = distance_nm( &circle.center, &pos);
            if d - circle.radius_nm > DISTANCE_TOLERANCE_NM { continue }

            let is_nearer = match &best {
                Some((d_best,_)) => d < *d_best - DISTANCE_TOLERANCE_NM, // ties keep the earlier one
                None => true
            };
            if is_nearer { best = Some((d,c)) }
        }
    }

    best.map( |(_,c)| c)
}

/// all candidates inside `bbox`, in input order
pub fn within_box<T: Located> (candidates: impl IntoIterator<Item=T>, bbox: &GeoBox)->Vec<T> {
    candidates.into_iter()
        .filter( |c| c.location().map( |pos| bbox.contains(&pos)).unwrap_or(false))
        .collect()
}

impl<T: Located> Located for &T {
    fn location (&self)->Option<GeoPos> { (*self).location() }
}

impl Located for GeoPos {
    fn location (&self)->Option<GeoPos> { Some(*self) }
}

/* #endregion candidate filtering */
