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

///! the HTTP collaborator. Backend adapters build [`HttpRequest`] values and hand them to a [`Transport`],
///! which is the only place that touches the network. Tests substitute their own implementation

use std::{fmt,time::Duration};
use async_trait::async_trait;
use reqwest::{Client,header::{RETRY_AFTER,HeaderMap,HeaderName,HeaderValue}};
use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = concat!( "odin_adsblol/", env!("CARGO_PKG_VERSION"));

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum HttpMethod {
    Get,
    Post
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug,Clone,PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,

    /// pre-encoded query string without the leading '?'. It is appended verbatim since the native
    /// API expects unescaped commas in coordinate lists
    pub query: Option<String>,

    pub headers: Vec<(String,String)>,
    pub timeout: Duration,

    /// serialized JSON payload of a POST
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get (url: impl Into<String>, timeout: Duration)->Self {
        HttpRequest { method: HttpMethod::Get, url: url.into(), query: None, headers: Vec::new(), timeout, body: None }
    }

    pub fn post_json (url: impl Into<String>, body: impl Into<String>, timeout: Duration)->Self {
        HttpRequest { method: HttpMethod::Post, url: url.into(), query: None, headers: Vec::new(), timeout, body: Some(body.into()) }
            .with_header( "Content-Type", "application/json")
    }

    pub fn with_query (mut self, query: impl Into<String>)->Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_header (mut self, name: impl Into<String>, value: impl Into<String>)->Self {
        self.headers.push( (name.into(), value.into()));
        self
    }

    pub fn header (&self, name: &str)->Option<&str> {
        self.headers.iter().find( |(k,_)| k.eq_ignore_ascii_case(name)).map( |(_,v)| v.as_str())
    }

    pub fn full_url (&self)->String {
        match &self.query {
            Some(q) if !q.is_empty() => format!("{}?{}", self.url, q),
            _ => self.url.clone()
        }
    }
}

#[derive(Debug,Clone,PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// value of a 'Retry-After' header given in seconds (the only form the servers use)
    pub retry_after: Option<u64>,
}

impl HttpResponse {
    pub fn new (status: u16, body: impl Into<String>)->Self {
        HttpResponse { status, body: body.into(), retry_after: None }
    }

    pub fn is_success (&self)->bool { (200..300).contains(&self.status) }
}

#[derive(Error,Debug,Clone,PartialEq)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connection(String),
}

/// the single network suspension point of a query. Implementations have to be shareable between
/// concurrent queries of the same client
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send (&self, request: &HttpRequest)->std::result::Result<HttpResponse,TransportError>;
}

/// [`Transport`] based on a pooled `reqwest::Client`
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new ()->std::result::Result<Self,TransportError> {
        let client = Client::builder()
            .user_agent( DEFAULT_USER_AGENT)
            .build()
            .map_err( |e| TransportError::Connection( e.to_string()))?;
        Ok( ReqwestTransport{ client } )
    }

    pub fn with_client (client: Client)->Self { ReqwestTransport{ client } }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send (&self, request: &HttpRequest)->std::result::Result<HttpResponse,TransportError> {
        let url = request.full_url();

        let mut headers = HeaderMap::new();
        for (k,v) in &request.headers {
            let name = HeaderName::from_bytes( k.as_bytes()).map_err( |e| TransportError::Connection( e.to_string()))?;
            let value = HeaderValue::from_str( v).map_err( |e| TransportError::Connection( e.to_string()))?;
            headers.append( name, value);
        }

        let req = match request.method {
            HttpMethod::Get => self.client.get( url.as_str()),
            HttpMethod::Post => self.client.post( url.as_str()).body( request.body.clone().unwrap_or_default()),
        };

        let response = req.headers(headers).timeout( request.timeout).send().await.map_err( |e| map_reqwest_error( e, request.timeout))?;

        let status = response.status().as_u16();
        let retry_after = response.headers().get( RETRY_AFTER)
            .and_then( |v| v.to_str().ok())
            .and_then( |s| s.trim().parse::<u64>().ok());
        let body = response.text().await.map_err( |e| map_reqwest_error( e, request.timeout))?;

        Ok( HttpResponse{ status, body, retry_after } )
    }
}

fn map_reqwest_error (e: reqwest::Error, timeout: Duration)->TransportError {
    if e.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Connection( e.to_string())
    }
}
