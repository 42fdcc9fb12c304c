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

/// geometry support for study areas and lon/lat pixel grids.
/// We try to use the [geo](https://docs.rs/geo/latest/geo/index.html) crate wherever possible and only add
/// thin new types with (degree) value semantics and serde support on top of it.

use std::fmt;
use serde::{Serialize,Deserialize};
use geo::{BoundingRect, Contains, Coord, Intersects, LineString, MultiPolygon, Point, Polygon, Rect};
use geo::algorithm::geodesic_area::GeodesicArea;

pub type GeoCoord = Coord<f64>;

/* #region GeoRect ***********************************************************************************************/

/// a lon/lat rectangle in degrees, serialized as west,south,east,north
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(from = "Wsen", into = "Wsen")]
pub struct GeoRect(Rect);

impl GeoRect {
    pub fn from_wsen (west: f64, south: f64, east: f64, north: f64)->Self {
        GeoRect( Rect::new( Coord{x: west, y: south}, Coord{x: east, y: north}))
    }

    #[inline] pub fn west(&self)->f64 { self.0.min().x }
    #[inline] pub fn east(&self)->f64 { self.0.max().x }
    #[inline] pub fn south(&self)->f64 { self.0.min().y }
    #[inline] pub fn north(&self)->f64 { self.0.max().y }

    pub fn center (&self)->GeoCoord { self.0.center() }

    pub fn contains_lon_lat (&self, lon: f64, lat: f64)->bool {
        lon >= self.west() && lon <= self.east() && lat >= self.south() && lat <= self.north()
    }

    /// note this includes touching edges
    pub fn intersects (&self, other: &GeoRect)->bool {
        self.0.intersects( &other.0)
    }

    /// geodesic area of the rectangle in m²
    pub fn area_m2 (&self)->f64 {
        cell_area_m2( self.west(), self.south(), self.east(), self.north())
    }

    pub fn to_polygon (&self)->Polygon { self.0.to_polygon() }
}

impl fmt::Display for GeoRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.west(), self.south(), self.east(), self.north())
    }
}

#[derive(Serialize,Deserialize)]
struct Wsen { west: f64, south: f64, east: f64, north: f64 }

impl From<Wsen> for GeoRect {
    fn from (r: Wsen)->Self { GeoRect::from_wsen( r.west, r.south, r.east, r.north) }
}

impl From<GeoRect> for Wsen {
    fn from (r: GeoRect)->Self { Wsen { west: r.west(), south: r.south(), east: r.east(), north: r.north() } }
}

/* #endregion GeoRect */

/* #region area geometries ***************************************************************************************/

/// ground area in m² of a lon/lat cell on the WGS84 ellipsoid
pub fn cell_area_m2 (west: f64, south: f64, east: f64, north: f64)->f64 {
    let rect = Rect::new( Coord{x: west, y: south}, Coord{x: east, y: north});
    rect.to_polygon().geodesic_area_unsigned()
}

pub fn bounding_geo_rect (mp: &MultiPolygon)->Option<GeoRect> {
    mp.bounding_rect().map( GeoRect)
}

pub fn contains_lon_lat (mp: &MultiPolygon, lon: f64, lat: f64)->bool {
    mp.contains( &Point::new( lon, lat))
}

/// geodesic area of all polygons in m²
pub fn multi_polygon_area_m2 (mp: &MultiPolygon)->f64 {
    mp.geodesic_area_unsigned()
}

/// all exterior and interior ring segments of a multi polygon (used to draw outlines)
pub fn ring_segments (mp: &MultiPolygon)->Vec<(GeoCoord,GeoCoord)> {
    let mut segs = Vec::new();
    for poly in mp.iter() {
        add_ring_segments( poly.exterior(), &mut segs);
        for ring in poly.interiors() {
            add_ring_segments( ring, &mut segs);
        }
    }
    segs
}

fn add_ring_segments (ring: &LineString, segs: &mut Vec<(GeoCoord,GeoCoord)>) {
    for line in ring.lines() {
        segs.push( (line.start, line.end) );
    }
}

/* #endregion area geometries */
