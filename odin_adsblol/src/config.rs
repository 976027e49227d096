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

use std::{fs,path::Path,str::FromStr,fmt,time::Duration};
use serde::{Serialize,Deserialize};
use url::Url;

use crate::backend::native::DEFAULT_NATIVE_BASE_URL;
use crate::backend::public::DEFAULT_PUBLIC_BASE_URL;
use crate::errors::{Result,config_error};

/// env var that supplies the public API credential if the config does not have one
pub const API_KEY_ENV: &str = "ADSBLOL_API_KEY";

pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
pub enum BackendSelection {
    #[default] Auto,
    Native,
    Public
}

impl FromStr for BackendSelection {
    type Err = String;

    fn from_str (s: &str)->std::result::Result<Self,Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendSelection::Auto),
            "native" | "reapi" | "re-api" => Ok(BackendSelection::Native),
            "public" | "openapi" => Ok(BackendSelection::Public),
            other => Err( format!("unknown backend '{}' (expected auto, native or public)", other))
        }
    }
}

impl fmt::Display for BackendSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendSelection::Auto => write!(f, "auto"),
            BackendSelection::Native => write!(f, "native"),
            BackendSelection::Public => write!(f, "public"),
        }
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct AdsbLolConfig {
    pub backend: BackendSelection, // which adapter to use, resolved once at client construction
    pub credential: Option<String>, // public API key (sent as bearer token)
    pub native_base_url: Option<String>, // overrides DEFAULT_NATIVE_BASE_URL
    pub public_base_url: Option<String>, // overrides DEFAULT_PUBLIC_BASE_URL
    pub timeout_secs: f64, // per request
    pub native_access: bool, // do we have (feeder) access to the native API
}

impl Default for AdsbLolConfig {
    fn default ()->Self {
        AdsbLolConfig {
            backend: BackendSelection::Auto,
            credential: None,
            native_base_url: None,
            public_base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            native_access: true,
        }
    }
}

impl AdsbLolConfig {
    pub fn with_backend (mut self, backend: BackendSelection)->Self { self.backend = backend; self }
    pub fn with_credential (mut self, credential: impl Into<String>)->Self { self.credential = Some(credential.into()); self }
    pub fn with_native_base_url (mut self, url: impl Into<String>)->Self { self.native_base_url = Some(url.into()); self }
    pub fn with_public_base_url (mut self, url: impl Into<String>)->Self { self.public_base_url = Some(url.into()); self }
    pub fn with_timeout_secs (mut self, secs: f64)->Self { self.timeout_secs = secs; self }
    pub fn with_native_access (mut self, native_access: bool)->Self { self.native_access = native_access; self }

    /// fill in the credential from [`API_KEY_ENV`] if we don't have one yet
    pub fn with_env_credential (mut self)->Self {
        if self.credential.is_none() {
            self.credential = std::env::var( API_KEY_ENV).ok().filter( |s| !s.trim().is_empty());
        }
        self
    }

    pub fn native_url (&self)->&str { self.native_base_url.as_deref().unwrap_or( DEFAULT_NATIVE_BASE_URL) }
    pub fn public_url (&self)->&str { self.public_base_url.as_deref().unwrap_or( DEFAULT_PUBLIC_BASE_URL) }

    pub fn timeout (&self)->Result<Duration> {
        if self.timeout_secs.is_finite() && self.timeout_secs > 0.0 {
            Ok( Duration::from_secs_f64( self.timeout_secs))
        } else {
            Err( config_error!("timeout must be a positive number of seconds, got {}", self.timeout_secs))
        }
    }

    pub fn validate (&self)->Result<()> {
        self.timeout()?;
        check_url( self.native_url())?;
        check_url( self.public_url())?;
        if let Some(cred) = &self.credential {
            if cred.trim().is_empty() { return Err( config_error!("empty credential")) }
        }
        Ok(())
    }
}

fn check_url (s: &str)->Result<()> {
    let url = Url::parse(s).map_err( |e| config_error!("invalid base url '{}': {}", s, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err( config_error!("unsupported url scheme '{}' in '{}'", scheme, s))
    }
}

/// parse a RON config string. Missing fields get their default values
pub fn parse_config (ron_src: &str)->Result<AdsbLolConfig> {
    let config: AdsbLolConfig = ron::from_str( ron_src)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config<P: AsRef<Path>> (path: P)->Result<AdsbLolConfig> {
    let src = fs::read_to_string( path.as_ref())?;
    parse_config( &src)
}
