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

use std::{fmt,time::Duration};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};

use crate::aircraft::Aircraft;

/// tag of the adapter that served a query
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(rename_all="lowercase")]
pub enum BackendKind {
    Native,
    Public
}

impl BackendKind {
    pub fn name (&self)->&'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Public => "public"
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// query result. The aircraft sequence is in backend response order, or in ascending distance
/// order if it was produced by local distance filtering of a circle query.
/// `result_count` is always the length of `aircraft` - there is no way to set it independently
#[derive(Debug,Clone,Serialize)]
pub struct ResultEnvelope {
    aircraft: Vec<Aircraft>,
    result_count: usize,
    timestamp: DateTime<Utc>,
    backend: BackendKind,
    simulated: bool,

    #[serde(skip_serializing_if="Option::is_none", with="opt_millis")]
    processing_time: Option<Duration>,

    #[serde(skip_serializing_if="Option::is_none")]
    server_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if="Vec::is_empty")]
    warnings: Vec<String>,
}

impl ResultEnvelope {
    pub fn new (aircraft: Vec<Aircraft>, timestamp: DateTime<Utc>, backend: BackendKind, simulated: bool)->Self {
        let result_count = aircraft.len();
        ResultEnvelope { aircraft, result_count, timestamp, backend, simulated, processing_time: None, server_time: None, warnings: Vec::new() }
    }

    pub fn with_processing_time (mut self, processing_time: Option<Duration>)->Self {
        self.processing_time = processing_time;
        self
    }

    pub fn with_server_time (mut self, server_time: Option<DateTime<Utc>>)->Self {
        self.server_time = server_time;
        self
    }

    pub fn with_warnings (mut self, warnings: Vec<String>)->Self {
        self.warnings = warnings;
        self
    }

    pub fn aircraft (&self)->&[Aircraft] { &self.aircraft }
    pub fn into_aircraft (self)->Vec<Aircraft> { self.aircraft }
    pub fn result_count (&self)->usize { self.result_count }
    pub fn timestamp (&self)->DateTime<Utc> { self.timestamp }
    pub fn backend (&self)->BackendKind { self.backend }
    pub fn simulated (&self)->bool { self.simulated }
    pub fn processing_time (&self)->Option<Duration> { self.processing_time }
    pub fn server_time (&self)->Option<DateTime<Utc>> { self.server_time }

    /// caller-visible notes about filter predicates the serving backend could not express
    pub fn warnings (&self)->&[String] { &self.warnings }

    pub fn len (&self)->usize { self.aircraft.len() }
    pub fn is_empty (&self)->bool { self.aircraft.is_empty() }
    pub fn iter (&self)->impl Iterator<Item=&Aircraft> { self.aircraft.iter() }
    pub fn first (&self)->Option<&Aircraft> { self.aircraft.first() }
}

impl<'a> IntoIterator for &'a ResultEnvelope {
    type Item = &'a Aircraft;
    type IntoIter = std::slice::Iter<'a,Aircraft>;

    fn into_iter (self)->Self::IntoIter { self.aircraft.iter() }
}

impl fmt::Display for ResultEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} aircraft from {} backend at {}", self.result_count, self.backend, self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"))?;
        if self.simulated { write!( f, " (simulated)")?; }
        if let Some(pt) = self.processing_time { write!( f, ", processing time {}ms", pt.as_millis())?; }
        Ok(())
    }
}

mod opt_millis {
    use std::time::Duration;
    use serde::Serializer;

    pub fn serialize<S> (dur: &Option<Duration>, serializer: S)->Result<S::Ok,S::Error> where S: Serializer {
        match dur {
            Some(d) => serializer.serialize_f64( d.as_secs_f64() * 1000.0),
            None => serializer.serialize_none()
        }
    }
}
