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

use crate::aircraft::{self,Aircraft};
use crate::errors::{Result,validation_error};

/// the backend-agnostic predicate keys. Adapters report which of these they can express
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(rename_all="snake_case")]
pub enum FilterKey {
    CallsignExact,
    CallsignPrefix,
    TypeCode,
    Squawk,
    AboveAltBaro,
    BelowAltBaro,
    Military,
    Pia,
    Ladd,
    Interesting,
}

impl FilterKey {
    pub const ALL: [FilterKey;10] = [
        FilterKey::CallsignExact, FilterKey::CallsignPrefix, FilterKey::TypeCode, FilterKey::Squawk,
        FilterKey::AboveAltBaro, FilterKey::BelowAltBaro,
        FilterKey::Military, FilterKey::Pia, FilterKey::Ladd, FilterKey::Interesting
    ];

    pub fn name (&self)->&'static str {
        match self {
            FilterKey::CallsignExact => "callsign_exact",
            FilterKey::CallsignPrefix => "callsign_prefix",
            FilterKey::TypeCode => "type_code",
            FilterKey::Squawk => "squawk",
            FilterKey::AboveAltBaro => "above_alt_baro",
            FilterKey::BelowAltBaro => "below_alt_baro",
            FilterKey::Military => "military",
            FilterKey::Pia => "pia",
            FilterKey::Ladd => "ladd",
            FilterKey::Interesting => "interesting",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// immutable set of optional predicates. Only obtainable through [`QueryFiltersBuilder::build`], which
/// checks that callsign exact/prefix are not both set and that altitude bounds are ordered.
///
/// Boolean category flags are tri-state: `None` does not constrain, `Some(true)` requires the
/// database flag to be set and `Some(false)` requires it to be clear
#[derive(Debug,Clone,Default,PartialEq,Serialize)]
pub struct QueryFilters {
    callsign_exact: Option<String>,
    callsign_prefix: Option<String>,
    type_code: Option<String>,
    squawk: Option<String>,
    above_alt_baro: Option<i64>,
    below_alt_baro: Option<i64>,
    military: Option<bool>,
    pia: Option<bool>,
    ladd: Option<bool>,
    interesting: Option<bool>,
}

impl QueryFilters {
    pub fn none ()->Self { QueryFilters::default() }

    pub fn builder ()->QueryFiltersBuilder { QueryFiltersBuilder::default() }

    pub fn callsign_exact (&self)->Option<&str> { self.callsign_exact.as_deref() }
    pub fn callsign_prefix (&self)->Option<&str> { self.callsign_prefix.as_deref() }
    pub fn type_code (&self)->Option<&str> { self.type_code.as_deref() }
    pub fn squawk (&self)->Option<&str> { self.squawk.as_deref() }
    pub fn above_alt_baro (&self)->Option<i64> { self.above_alt_baro }
    pub fn below_alt_baro (&self)->Option<i64> { self.below_alt_baro }
    pub fn military (&self)->Option<bool> { self.military }
    pub fn pia (&self)->Option<bool> { self.pia }
    pub fn ladd (&self)->Option<bool> { self.ladd }
    pub fn interesting (&self)->Option<bool> { self.interesting }

    pub fn is_empty (&self)->bool { self.keys().is_empty() }

    /// the keys of all set predicates, in [`FilterKey::ALL`] order
    pub fn keys (&self)->Vec<FilterKey> {
        self.predicates().into_iter().map( |(k,_)| k).collect()
    }

    /// render as backend-agnostic key/value pairs. Adapters translate the keys they understand
    pub fn predicates (&self)->Vec<(FilterKey,String)> {
        let mut preds = Vec::new();

        if let Some(v) = &self.callsign_exact { preds.push( (FilterKey::CallsignExact, v.clone())) }
        if let Some(v) = &self.callsign_prefix { preds.push( (FilterKey::CallsignPrefix, v.clone())) }
        if let Some(v) = &self.type_code { preds.push( (FilterKey::TypeCode, v.clone())) }
        if let Some(v) = &self.squawk { preds.push( (FilterKey::Squawk, v.clone())) }
        if let Some(v) = self.above_alt_baro { preds.push( (FilterKey::AboveAltBaro, v.to_string())) }
        if let Some(v) = self.below_alt_baro { preds.push( (FilterKey::BelowAltBaro, v.to_string())) }
        if let Some(v) = self.military { preds.push( (FilterKey::Military, v.to_string())) }
        if let Some(v) = self.pia { preds.push( (FilterKey::Pia, v.to_string())) }
        if let Some(v) = self.ladd { preds.push( (FilterKey::Ladd, v.to_string())) }
        if let Some(v) = self.interesting { preds.push( (FilterKey::Interesting, v.to_string())) }

        preds
    }

    /// split into the part an adapter can express (first) and the keys it has to drop (second)
    pub fn restricted_to (&self, supported: &[FilterKey])->(QueryFilters,Vec<FilterKey>) {
        let mut kept = self.clone();
        let mut dropped = Vec::new();

        for key in self.keys() {
            if !supported.contains(&key) {
                kept.clear(key);
                dropped.push(key);
            }
        }

        (kept, dropped)
    }

    fn clear (&mut self, key: FilterKey) {
        match key {
            FilterKey::CallsignExact => self.callsign_exact = None,
            FilterKey::CallsignPrefix => self.callsign_prefix = None,
            FilterKey::TypeCode => self.type_code = None,
            FilterKey::Squawk => self.squawk = None,
            FilterKey::AboveAltBaro => self.above_alt_baro = None,
            FilterKey::BelowAltBaro => self.below_alt_baro = None,
            FilterKey::Military => self.military = None,
            FilterKey::Pia => self.pia = None,
            FilterKey::Ladd => self.ladd = None,
            FilterKey::Interesting => self.interesting = None,
        }
    }

    /// local evaluation of all set predicates. Used when a geographic query is emulated, in which
    /// case no predicate is dropped. Aircraft without barometric altitude never pass an altitude bound
    pub fn matches (&self, ac: &Aircraft)->bool {
        if let Some(cs) = &self.callsign_exact {
            if !ac.callsign().map( |c| c.eq_ignore_ascii_case(cs)).unwrap_or(false) { return false }
        }
        if let Some(prefix) = &self.callsign_prefix {
            if !ac.callsign().map( |c| c.to_ascii_uppercase().starts_with( prefix.as_str())).unwrap_or(false) { return false }
        }
        if let Some(t) = &self.type_code {
            if !ac.type_code().map( |c| c.eq_ignore_ascii_case(t)).unwrap_or(false) { return false }
        }
        if let Some(sq) = &self.squawk {
            if ac.squawk() != Some(sq.as_str()) { return false }
        }

        if self.above_alt_baro.is_some() || self.below_alt_baro.is_some() {
            let Some(alt) = ac.alt_baro().map( |a| a.feet()) else { return false };
            if let Some(lower) = self.above_alt_baro { if alt < lower { return false } }
            if let Some(upper) = self.below_alt_baro { if alt > upper { return false } }
        }

        flag_matches( self.military, ac.is_military())
            && flag_matches( self.pia, ac.is_pia())
            && flag_matches( self.ladd, ac.is_ladd())
            && flag_matches( self.interesting, ac.is_interesting())
    }
}

fn flag_matches (wanted: Option<bool>, actual: bool)->bool {
    wanted.map( |w| w == actual).unwrap_or(true)
}

impl fmt::Display for QueryFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preds: Vec<String> = self.predicates().iter().map( |(k,v)| format!("{k}={v}")).collect();
        write!(f, "[{}]", preds.join(","))
    }
}

/* #region builder ************************************************************************************/

/// collects predicates without checking them. All validation happens in [`build`](Self::build)
#[derive(Debug,Clone,Default)]
pub struct QueryFiltersBuilder {
    callsign_exact: Option<String>,
    callsign_prefix: Option<String>,
    type_code: Option<String>,
    squawk: Option<String>,
    above_alt_baro: Option<i64>,
    below_alt_baro: Option<i64>,
    military: Option<bool>,
    pia: Option<bool>,
    ladd: Option<bool>,
    interesting: Option<bool>,
}

impl QueryFiltersBuilder {
    pub fn callsign_exact (mut self, cs: impl Into<String>)->Self { self.callsign_exact = Some(cs.into()); self }
    pub fn callsign_prefix (mut self, prefix: impl Into<String>)->Self { self.callsign_prefix = Some(prefix.into()); self }
    pub fn type_code (mut self, type_code: impl Into<String>)->Self { self.type_code = Some(type_code.into()); self }
    pub fn squawk (mut self, squawk: impl Into<String>)->Self { self.squawk = Some(squawk.into()); self }
    pub fn above_alt_baro (mut self, feet: i64)->Self { self.above_alt_baro = Some(feet); self }
    pub fn below_alt_baro (mut self, feet: i64)->Self { self.below_alt_baro = Some(feet); self }
    pub fn military (mut self, is_set: bool)->Self { self.military = Some(is_set); self }
    pub fn pia (mut self, is_set: bool)->Self { self.pia = Some(is_set); self }
    pub fn ladd (mut self, is_set: bool)->Self { self.ladd = Some(is_set); self }
    pub fn interesting (mut self, is_set: bool)->Self { self.interesting = Some(is_set); self }

    pub fn build (self)->Result<QueryFilters> {
        if self.callsign_exact.is_some() && self.callsign_prefix.is_some() {
            return Err( validation_error!("callsign_exact and callsign_prefix are mutually exclusive"))
        }
        if let (Some(lower),Some(upper)) = (self.above_alt_baro, self.below_alt_baro) {
            if lower > upper {
                return Err( validation_error!("altitude lower bound {} exceeds upper bound {}", lower, upper))
            }
        }

        let callsign_exact = normalized_text( "callsign_exact", self.callsign_exact)?;
        let callsign_prefix = normalized_text( "callsign_prefix", self.callsign_prefix)?;
        let type_code = normalized_text( "type_code", self.type_code)?;

        let squawk = match self.squawk {
            Some(sq) => {
                let sq = sq.trim().to_string();
                if !aircraft::is_valid_squawk(&sq) {
                    return Err( validation_error!("squawk '{}' is not a 4 digit octal code", sq))
                }
                Some(sq)
            }
            None => None
        };

        Ok( QueryFilters {
            callsign_exact,
            callsign_prefix,
            type_code,
            squawk,
            above_alt_baro: self.above_alt_baro,
            below_alt_baro: self.below_alt_baro,
            military: self.military,
            pia: self.pia,
            ladd: self.ladd,
            interesting: self.interesting,
        })
    }
}

// callsigns and type designators are stored upper case, trimmed and non-empty
fn normalized_text (what: &str, s: Option<String>)->Result<Option<String>> {
    match s {
        Some(s) => {
            let s = s.trim().to_ascii_uppercase();
            if s.is_empty() { Err( validation_error!("empty {} filter", what)) } else { Ok(Some(s)) }
        }
        None => Ok(None)
    }
}

/* #endregion builder */
