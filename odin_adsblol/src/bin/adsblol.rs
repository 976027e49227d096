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

use std::path::PathBuf;
use tokio;
use anyhow::Result;
use clap::{Parser,Subcommand,Args as ClapArgs};
use tracing_subscriber::EnvFilter;
use odin_adsblol::{
    load_config, AdsbLolClient, AdsbLolConfig, BackendSelection, Operation, QueryFilters, ResultEnvelope, Aircraft, RoutePlane
};

#[derive(Parser, Debug)]
#[command(version, about = "query live aircraft data from adsb.lol")]
pub struct Args {
    /// backend to use: auto, native or public
    #[arg(short,long)]
    pub backend: Option<BackendSelection>,

    /// RON config file
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// request timeout in seconds
    #[arg(short,long)]
    pub timeout: Option<f64>,

    /// print the result envelope as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// aircraft with given ICAO 24bit address
    Hex { hex: String },
    /// aircraft with given callsign
    Callsign { callsign: String },
    /// aircraft with given registration
    Reg { registration: String },
    /// aircraft of given ICAO type designator
    Type { type_code: String },
    /// aircraft squawking given code
    Squawk { squawk: String },
    /// military aircraft
    Mil,
    /// aircraft in the PIA program
    Pia,
    /// aircraft in the LADD program
    Ladd,
    /// aircraft within radius (nm) around a point
    Circle {
        #[arg(allow_negative_numbers=true)] lat: f64,
        #[arg(allow_negative_numbers=true)] lon: f64,
        radius: f64,
        #[command(flatten)] filters: FilterArgs
    },
    /// closest aircraft within radius (nm) around a point
    Closest {
        #[arg(allow_negative_numbers=true)] lat: f64,
        #[arg(allow_negative_numbers=true)] lon: f64,
        radius: f64,
        #[command(flatten)] filters: FilterArgs
    },
    /// aircraft within a lat/lon bounding box
    Box {
        #[arg(allow_negative_numbers=true)] lat_min: f64,
        #[arg(allow_negative_numbers=true)] lat_max: f64,
        #[arg(allow_negative_numbers=true)] lon_min: f64,
        #[arg(allow_negative_numbers=true)] lon_max: f64,
        #[command(flatten)] filters: FilterArgs
    },
    /// all tracked aircraft
    All {
        #[command(flatten)] filters: FilterArgs
    },
    /// all tracked aircraft with a position
    AllWithPos {
        #[command(flatten)] filters: FilterArgs
    },
    /// airport information for an ICAO code (public backend only)
    Airport { icao: String },
    /// routes for aircraft given as CALLSIGN,LAT,LON (public backend only)
    Routes {
        #[arg(required=true, allow_hyphen_values=true, value_parser=parse_route_plane)] planes: Vec<RoutePlane>
    },
    /// information about the configured API key (public backend only)
    Me,
}

fn parse_route_plane (s: &str)->std::result::Result<RoutePlane,String> {
    let parts: Vec<&str> = s.split(',').map( |p| p.trim()).collect();
    if let [callsign, lat, lon] = parts.as_slice() {
        let lat: f64 = lat.parse().map_err( |e| format!("invalid latitude '{}': {}", lat, e))?;
        let lon: f64 = lon.parse().map_err( |e| format!("invalid longitude '{}': {}", lon, e))?;
        RoutePlane::new( callsign, lat, lon).map_err( |e| e.to_string())
    } else {
        Err( format!("expected CALLSIGN,LAT,LON but got '{}'", s))
    }
}

#[derive(ClapArgs, Debug, Default)]
pub struct FilterArgs {
    #[arg(long)] pub callsign_exact: Option<String>,
    #[arg(long)] pub callsign_prefix: Option<String>,
    #[arg(long = "type-code")] pub type_code: Option<String>,
    #[arg(long)] pub squawk: Option<String>,
    /// lower barometric altitude bound in feet
    #[arg(long)] pub above_alt: Option<i64>,
    /// upper barometric altitude bound in feet
    #[arg(long)] pub below_alt: Option<i64>,
    #[arg(long)] pub mil: bool,
    #[arg(long)] pub pia: bool,
    #[arg(long)] pub ladd: bool,
    #[arg(long)] pub interesting: bool,
}

impl FilterArgs {
    fn to_filters (&self)->odin_adsblol::Result<QueryFilters> {
        let mut b = QueryFilters::builder();
        if let Some(cs) = &self.callsign_exact { b = b.callsign_exact( cs) }
        if let Some(cs) = &self.callsign_prefix { b = b.callsign_prefix( cs) }
        if let Some(t) = &self.type_code { b = b.type_code( t) }
        if let Some(sq) = &self.squawk { b = b.squawk( sq) }
        if let Some(alt) = self.above_alt { b = b.above_alt_baro( alt) }
        if let Some(alt) = self.below_alt { b = b.below_alt_baro( alt) }
        if self.mil { b = b.military( true) }
        if self.pia { b = b.pia( true) }
        if self.ladd { b = b.ladd( true) }
        if self.interesting { b = b.interesting( true) }
        b.build()
    }
}

/// the logical query for `cmd`, or None if it is one of the public API utility commands
fn operation (cmd: &Cmd)->odin_adsblol::Result<Option<(Operation,QueryFilters)>> {
    let none = QueryFilters::none();
    Ok( Some( match cmd {
        Cmd::Hex{hex} => (Operation::by_hex( hex)?, none),
        Cmd::Callsign{callsign} => (Operation::by_callsign( callsign)?, none),
        Cmd::Reg{registration} => (Operation::by_registration( registration)?, none),
        Cmd::Type{type_code} => (Operation::by_type( type_code)?, none),
        Cmd::Squawk{squawk} => (Operation::by_squawk( squawk)?, none),
        Cmd::Mil => (Operation::Military, none),
        Cmd::Pia => (Operation::Pia, none),
        Cmd::Ladd => (Operation::Ladd, none),
        Cmd::Circle{lat,lon,radius,filters} => (Operation::in_circle( *lat, *lon, *radius)?, filters.to_filters()?),
        Cmd::Closest{lat,lon,radius,filters} => (Operation::closest( *lat, *lon, *radius)?, filters.to_filters()?),
        Cmd::Box{lat_min,lat_max,lon_min,lon_max,filters} => (Operation::in_box( *lat_min, *lat_max, *lon_min, *lon_max)?, filters.to_filters()?),
        Cmd::All{filters} => (Operation::All, filters.to_filters()?),
        Cmd::AllWithPos{filters} => (Operation::AllWithPosition, filters.to_filters()?),
        Cmd::Airport{..} | Cmd::Routes{..} | Cmd::Me => return Ok(None)
    }))
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())
        .with_writer( std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config( path)?,
        None => AdsbLolConfig::default()
    };
    if let Some(backend) = args.backend { config.backend = backend }
    if let Some(timeout) = args.timeout { config.timeout_secs = timeout }
    let config = config.with_env_credential();

    let client = AdsbLolClient::new( &config)?;
    let Some((op, filters)) = operation( &args.cmd)? else {
        // these have no common schema, we always print their JSON
        let value = match &args.cmd {
            Cmd::Airport{icao} => client.airport( icao).await?,
            Cmd::Routes{planes} => client.routes( planes).await?,
            _ => client.me().await?
        };
        println!("{}", serde_json::to_string_pretty( &value)?);
        return Ok(())
    };
    let result = client.query( &op, &filters).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty( &result)?);
    } else {
        print_table( &result);
    }

    Ok(())
}

fn print_table (result: &ResultEnvelope) {
    println!("{:<7} {:<8} {:<8} {:<5} {:>9} {:>10} {:>6} {:>5} {:>4} {:<4}",
             "hex", "flight", "reg", "type", "lat", "lon", "alt", "gs", "trk", "sqk");
    for ac in result {
        println!("{:<7} {:<8} {:<8} {:<5} {:>9} {:>10} {:>6} {:>5} {:>4} {:<4}",
            ac.hex(),
            ac.flight().unwrap_or("-"),
            ac.registration().unwrap_or("-"),
            ac.type_code().unwrap_or("-"),
            opt_fmt( ac.lat(), |v| format!("{:.4}", v)),
            opt_fmt( ac.lon(), |v| format!("{:.4}", v)),
            opt_fmt( ac.alt_baro(), |v| v.to_string()),
            opt_fmt( ac.ground_speed(), |v| format!("{:.0}", v)),
            opt_fmt( ac.track(), |v| format!("{:.0}", v)),
            ac.squawk().unwrap_or("-"));
    }
    println!("{}", result);
    for w in result.warnings() {
        println!("warning: {}", w);
    }
}

fn opt_fmt<T,F> (v: Option<T>, f: F)->String where F: Fn(T)->String {
    v.map( f).unwrap_or_else( || "-".to_string())
}
