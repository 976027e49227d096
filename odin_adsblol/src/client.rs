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

use std::sync::Arc;
use chrono::Utc;
use serde_json::Value;

use crate::aircraft::Aircraft;
use crate::backend::{Backend,NativeBackend,PublicBackend,RawRecords,RoutePlane};
use crate::config::{AdsbLolConfig,BackendSelection};
use crate::envelope::{BackendKind,ResultEnvelope};
use crate::filters::QueryFilters;
use crate::geo;
use crate::query::{Operation,OperationKind};
use crate::transport::{ReqwestTransport,Transport};
use crate::errors::{OdinAdsbLolError,Result};
use crate::{debug,info,warn};

/// how a query gets served by the active backend. Determined per operation before anything is sent
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Dispatch {
    /// the backend has its own request for it
    Native,
    /// geographic query answered from one bulk "all with position" request plus local filtering
    Emulated,
    Unsupported
}

/// resolve the configured selection. `Auto` only picks the public backend if there is a credential
/// for it and no native access
pub fn select_backend (config: &AdsbLolConfig)->BackendKind {
    match config.backend {
        BackendSelection::Native => BackendKind::Native,
        BackendSelection::Public => BackendKind::Public,
        BackendSelection::Auto => {
            if config.credential.is_some() && !config.native_access { BackendKind::Public } else { BackendKind::Native }
        }
    }
}

/// the uniform query interface. The backend is chosen once at construction. Clones share the
/// backend and its transport, which are never mutated, so a client can serve concurrent queries
#[derive(Clone)]
pub struct AdsbLolClient {
    backend: Arc<dyn Backend>,
    public: Option<Arc<PublicBackend>>, // set if the active backend is the public API, for its v0 endpoints
}

impl AdsbLolClient {

    /// client with the default reqwest based transport
    pub fn new (config: &AdsbLolConfig)->Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new()?;
        AdsbLolClient::with_transport( config, Arc::new(transport))
    }

    pub fn with_transport (config: &AdsbLolConfig, transport: Arc<dyn Transport>)->Result<Self> {
        let timeout = config.timeout()?;
        config.validate()?;

        let kind = select_backend( config);
        info!("using {} backend (selection: {})", kind, config.backend);

        match kind {
            BackendKind::Native => {
                let backend = Arc::new( NativeBackend::new( transport, config.native_url(), timeout));
                Ok( AdsbLolClient{ backend, public: None } )
            }
            BackendKind::Public => {
                let public = Arc::new( PublicBackend::new( transport, config.public_url(), config.credential.clone(), timeout)?);
                Ok( AdsbLolClient{ backend: public.clone(), public: Some(public) } )
            }
        }
    }

    /// client for a caller provided adapter
    pub fn with_backend (backend: Arc<dyn Backend>)->Self {
        info!("using {} backend", backend.kind());
        AdsbLolClient{ backend, public: None }
    }

    pub fn backend_kind (&self)->BackendKind { self.backend.kind() }

    pub fn dispatch (&self, op: OperationKind)->Dispatch {
        if self.backend.supports(op) {
            Dispatch::Native
        } else if op.is_geographic() && self.backend.supports( OperationKind::AllWithPosition) {
            Dispatch::Emulated
        } else {
            Dispatch::Unsupported
        }
    }

    pub async fn query (&self, op: &Operation, filters: &QueryFilters)->Result<ResultEnvelope> {
        match self.dispatch( op.kind()) {
            Dispatch::Native => self.query_native( op, filters).await,
            Dispatch::Emulated => self.query_emulated( op, filters).await,
            Dispatch::Unsupported => Err( OdinAdsbLolError::UnsupportedOperationError {
                operation: op.kind().to_string(),
                backend: self.backend.kind().to_string()
            })
        }
    }

    async fn query_native (&self, op: &Operation, filters: &QueryFilters)->Result<ResultEnvelope> {
        let timestamp = Utc::now();
        let kind = self.backend.kind();

        let (native_filters, dropped) = filters.restricted_to( self.backend.native_filters( op.kind()));
        let warnings: Vec<String> = dropped.iter().map( |key| {
            let msg = format!("filter '{}' is not supported by the {} backend for {} and was ignored", key, kind, op.kind());
            warn!("{}", msg);
            msg
        }).collect();

        let raw = self.backend.execute( op, &native_filters).await?;

        Ok( ResultEnvelope::new( raw.aircraft, timestamp, kind, false)
            .with_server_time( raw.server_time)
            .with_processing_time( raw.processing_time)
            .with_warnings( warnings))
    }

    /// one bulk request, then all filters and the geographic selection are applied locally.
    /// Filters go first, so `closest` yields the nearest aircraft that matches them (as the native server does)
    async fn query_emulated (&self, op: &Operation, filters: &QueryFilters)->Result<ResultEnvelope> {
        let timestamp = Utc::now();
        let raw = self.backend.execute( &Operation::AllWithPosition, &QueryFilters::none()).await?;
        let n_candidates = raw.aircraft.len();

        let candidates = raw.aircraft.into_iter().filter( |ac| filters.matches(ac));
        let aircraft: Vec<Aircraft> = match op {
            Operation::Circle(circle) => geo::within_radius( candidates, circle),
            Operation::Closest(circle) => geo::closest( candidates, circle).into_iter().collect(),
            Operation::Box(bbox) => geo::within_box( candidates, bbox),
            _ => return Err( OdinAdsbLolError::UnsupportedOperationError {
                operation: op.kind().to_string(),
                backend: self.backend.kind().to_string()
            })
        };
        debug!("simulated {}: {} of {} candidates", op, aircraft.len(), n_candidates);

        // there is no server side processing time for what we did locally
        Ok( ResultEnvelope::new( aircraft, timestamp, self.backend.kind(), true)
            .with_server_time( raw.server_time))
    }

    //--- the logical operations

    pub async fn by_hex (&self, hex: &str)->Result<ResultEnvelope> {
        self.query( &Operation::by_hex(hex)?, &QueryFilters::none()).await
    }

    pub async fn by_callsign (&self, callsign: &str)->Result<ResultEnvelope> {
        self.query( &Operation::by_callsign(callsign)?, &QueryFilters::none()).await
    }

    pub async fn by_registration (&self, registration: &str)->Result<ResultEnvelope> {
        self.query( &Operation::by_registration(registration)?, &QueryFilters::none()).await
    }

    pub async fn by_type (&self, type_code: &str)->Result<ResultEnvelope> {
        self.query( &Operation::by_type(type_code)?, &QueryFilters::none()).await
    }

    pub async fn by_squawk (&self, squawk: &str)->Result<ResultEnvelope> {
        self.query( &Operation::by_squawk(squawk)?, &QueryFilters::none()).await
    }

    pub async fn military (&self)->Result<ResultEnvelope> {
        self.query( &Operation::Military, &QueryFilters::none()).await
    }

    pub async fn pia (&self)->Result<ResultEnvelope> {
        self.query( &Operation::Pia, &QueryFilters::none()).await
    }

    pub async fn ladd (&self)->Result<ResultEnvelope> {
        self.query( &Operation::Ladd, &QueryFilters::none()).await
    }

    pub async fn in_circle (&self, lat: f64, lon: f64, radius_nm: f64, filters: &QueryFilters)->Result<ResultEnvelope> {
        self.query( &Operation::in_circle( lat, lon, radius_nm)?, filters).await
    }

    pub async fn closest (&self, lat: f64, lon: f64, radius_nm: f64, filters: &QueryFilters)->Result<ResultEnvelope> {
        self.query( &Operation::closest( lat, lon, radius_nm)?, filters).await
    }

    pub async fn in_box (&self, lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64, filters: &QueryFilters)->Result<ResultEnvelope> {
        self.query( &Operation::in_box( lat_min, lat_max, lon_min, lon_max)?, filters).await
    }

    pub async fn all (&self, filters: &QueryFilters)->Result<ResultEnvelope> {
        self.query( &Operation::All, filters).await
    }

    pub async fn all_with_position (&self, filters: &QueryFilters)->Result<ResultEnvelope> {
        self.query( &Operation::AllWithPosition, filters).await
    }

    //--- public API utility endpoints

    fn public_backend (&self, operation: &str)->Result<&PublicBackend> {
        self.public.as_deref().ok_or_else( || OdinAdsbLolError::UnsupportedOperationError {
            operation: operation.to_string(),
            backend: self.backend.kind().to_string()
        })
    }

    pub async fn airport (&self, icao: &str)->Result<Value> {
        self.public_backend("airport")?.airport( icao).await
    }

    pub async fn routes (&self, planes: &[RoutePlane])->Result<Value> {
        self.public_backend("routes")?.routes( planes).await
    }

    pub async fn me (&self)->Result<Value> {
        self.public_backend("me")?.me().await
    }
}
