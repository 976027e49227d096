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

//! uniform access to the live aircraft data of the adsb.lol aggregation network. There are two
//! incompatible backends: the feeder-restricted native query API (re-api) and the public REST API.
//! [`AdsbLolClient`] selects one of them at construction and answers all logical queries with the
//! same [`ResultEnvelope`]. Geographic queries the active backend cannot express are emulated
//! locally from a bulk listing, or rejected with an `UnsupportedOperationError` if there is none.

/* #region logging macros *****************************************************************************/
// all crate logging goes through these so that we can replace or remove it in one place

#[macro_export]
macro_rules! debug {
    ( $( $id:ident = $e:expr ),* ) => { tracing::debug!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::debug!( $( $e ),* ) }
}

#[macro_export]
macro_rules! info {
    ( $( $id:ident = $e:expr ),* ) => { tracing::info!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::info!( $( $e ),* ) }
}

#[macro_export]
macro_rules! warn {
    ( $( $id:ident = $e:expr ),* ) => { tracing::warn!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::warn!( $( $e ),* ) }
}

#[macro_export]
macro_rules! error {
    ( $( $id:ident = $e:expr ),* ) => { tracing::error!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::error!( $( $e ),* ) }
}

/* #endregion logging macros */

pub mod errors;
pub use errors::{OdinAdsbLolError,Result};

pub mod geo;
pub use geo::{GeoPos,GeoCircle,GeoBox,Located};

pub mod aircraft;
pub use aircraft::{Aircraft,Altitude};

pub mod filters;
pub use filters::{FilterKey,QueryFilters,QueryFiltersBuilder};

pub mod query;
pub use query::{Operation,OperationKind};

pub mod envelope;
pub use envelope::{BackendKind,ResultEnvelope};

pub mod transport;
pub use transport::{Transport,ReqwestTransport,HttpMethod,HttpRequest,HttpResponse,TransportError};

pub mod backend;
pub use backend::{Backend,RawRecords,NativeBackend,PublicBackend,RoutePlane};

pub mod config;
pub use config::{AdsbLolConfig,BackendSelection,load_config};

pub mod client;
pub use client::{AdsbLolClient,Dispatch,select_backend};
