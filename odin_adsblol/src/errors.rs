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

use std::time::Duration;
use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T,OdinAdsbLolError>;

#[derive(Error,Debug)]
pub enum OdinAdsbLolError {

    /// malformed input parameters or an unparsable response payload - never retried
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("operation '{operation}' is not supported by the {backend} backend")]
    UnsupportedOperationError { operation: String, backend: String },

    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("request timed out after {0:?}")]
    TimeoutError(Duration),

    #[error("authentication failed: {0}")]
    AuthenticationError(String),

    #[error("rate limit exceeded (retry after {retry_after:?}s)")]
    RateLimitError { retry_after: Option<u64> },

    #[error("transport error {0}")]
    TransportError(String),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),
}

impl OdinAdsbLolError {
    /// errors for which a caller-side retry could succeed. We never retry ourselves
    pub fn is_transient (&self)->bool {
        match self {
            OdinAdsbLolError::TimeoutError(_) | OdinAdsbLolError::RateLimitError{..} | OdinAdsbLolError::TransportError(_) => true,
            OdinAdsbLolError::ApiError{status,..} => *status >= 500,
            _ => false
        }
    }
}

impl From<TransportError> for OdinAdsbLolError {
    fn from (e: TransportError)->Self {
        match e {
            TransportError::Timeout(dur) => OdinAdsbLolError::TimeoutError(dur),
            TransportError::Connection(msg) => OdinAdsbLolError::TransportError(msg),
        }
    }
}

impl From<ron::error::SpannedError> for OdinAdsbLolError {
    fn from (e: ron::error::SpannedError)->Self {
        OdinAdsbLolError::ConfigError( e.to_string())
    }
}

macro_rules! validation_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinAdsbLolError::ValidationError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use validation_error;

macro_rules! config_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinAdsbLolError::ConfigError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use config_error;
