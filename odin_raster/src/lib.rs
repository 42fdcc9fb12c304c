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

//! a small lazily evaluated image algebra for lon/lat rasters.
//!
//! Images and image collections are described by expression values ([ImageExpr], [CollectionExpr]) that do
//! not compute anything by themselves. Evaluation is the job of a [GeoBackend], which gets asked for region
//! reductions or materialized images. [MemBackend] is a backend that evaluates expressions over rasters
//! held in memory (e.g. loaded from a local catalog of GeoJSON and GeoTIFF files).

use std::{collections::BTreeMap, fmt, sync::Arc, ops::Deref};
use chrono::{DateTime,Utc};
use ndarray::Array2;
use serde::{Serialize,Deserialize,Serializer};
use geo::MultiPolygon;

use odin_common::geo::{GeoRect, bounding_geo_rect};

mod errors;
pub use errors::*;

pub mod expr;
pub use expr::{Filter, CollectionExpr, ImageExpr, Reducer, ReduceRegionParams};

pub mod ops;

mod backend;
pub use backend::{GeoBackend, reduce_band};

mod mem_backend;
pub use mem_backend::{MemBackend, MemCatalog};

pub mod catalog;

/// the band name of pixel area images
pub const AREA_BAND: &str = "area";

/* #region assets and study areas ********************************************************************************/

/// identifier of a stored vector or raster asset (e.g. "COPERNICUS/S1_GRD")
#[derive(Debug,Clone,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new (id: impl ToString)->Self { AssetId(id.to_string()) }
    pub fn as_str (&self)->&str { self.0.as_str() }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for AssetId {
    fn from (s: &str)->Self { AssetId(s.to_string()) }
}

impl From<String> for AssetId {
    fn from (s: String)->Self { AssetId(s) }
}

impl From<&AssetId> for AssetId {
    fn from (id: &AssetId)->Self { id.clone() }
}

/// the boundary of the area we analyze. This is immutable once loaded and used both for spatial filtering
/// and as the scope of region reductions
#[derive(Debug,Clone)]
pub struct StudyArea {
    pub id: AssetId,
    pub geometry: MultiPolygon<f64>,
    pub bounds: GeoRect,
}

impl StudyArea {
    pub fn new (id: AssetId, geometry: MultiPolygon<f64>)->Result<Self> {
        let bounds = bounding_geo_rect( &geometry)
            .ok_or_else( || OdinRasterError::InvalidGeometry( format!("no polygons in {id}")))?;
        Ok( StudyArea { id, geometry, bounds } )
    }

    pub fn contains_lon_lat (&self, lon: f64, lat: f64)->bool {
        self.bounds.contains_lon_lat( lon, lat) && odin_common::geo::contains_lon_lat( &self.geometry, lon, lat)
    }

    pub fn geojson (&self)->geojson::Geometry {
        geojson::Geometry::new( geojson::Value::from( &self.geometry))
    }
}

/// shared reference to a [StudyArea] as it appears in expressions. This only serializes the asset id
#[derive(Debug,Clone)]
pub struct AreaRef(pub Arc<StudyArea>);

impl Deref for AreaRef {
    type Target = StudyArea;
    fn deref (&self)->&StudyArea { &self.0 }
}

impl From<&Arc<StudyArea>> for AreaRef {
    fn from (area: &Arc<StudyArea>)->Self { AreaRef(area.clone()) }
}

impl Serialize for AreaRef {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        serializer.serialize_str( self.0.id.as_str())
    }
}

/* #endregion assets and study areas */

/* #region grids, bands and images *******************************************************************************/

/// a north-up raster grid in geographic (lon/lat degree) coordinates
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Grid {
    /// longitude of the left edge
    pub west: f64,
    /// latitude of the top edge
    pub north: f64,
    /// cell width in degrees
    pub cell_w: f64,
    /// cell height in degrees (positive)
    pub cell_h: f64,
    pub cols: usize,
    pub rows: usize,
}

impl Grid {
    pub fn new (west: f64, north: f64, cell_w: f64, cell_h: f64, cols: usize, rows: usize)->Result<Self> {
        let grid = Grid { west, north, cell_w, cell_h, cols, rows };
        grid.check()?;
        Ok(grid)
    }

    pub fn check (&self)->Result<()> {
        if !(self.cell_w > 0.0 && self.cell_h > 0.0) {
            Err( invalid_grid( format!("non-positive cell size {}x{}", self.cell_w, self.cell_h)))
        } else if self.cols == 0 || self.rows == 0 {
            Err( invalid_grid( "empty grid"))
        } else if !(self.west.is_finite() && self.north.is_finite()) {
            Err( invalid_grid( "non-finite origin"))
        } else {
            Ok(())
        }
    }

    #[inline] pub fn shape (&self)->(usize,usize) { (self.rows, self.cols) }
    #[inline] pub fn len (&self)->usize { self.rows * self.cols }

    pub fn south (&self)->f64 { self.north - self.rows as f64 * self.cell_h }
    pub fn east (&self)->f64 { self.west + self.cols as f64 * self.cell_w }

    pub fn bounds (&self)->GeoRect {
        GeoRect::from_wsen( self.west, self.south(), self.east(), self.north)
    }

    /// lon/lat of the pixel center
    #[inline]
    pub fn pixel_center (&self, col: usize, row: usize)->(f64,f64) {
        ( self.west + (col as f64 + 0.5) * self.cell_w, self.north - (row as f64 + 0.5) * self.cell_h )
    }

    pub fn pixel_bounds (&self, col: usize, row: usize)->GeoRect {
        let w = self.west + col as f64 * self.cell_w;
        let n = self.north - row as f64 * self.cell_h;
        GeoRect::from_wsen( w, n - self.cell_h, w + self.cell_w, n)
    }

    /// (col,row) of the pixel containing the given point, None if outside of the grid
    pub fn index_of (&self, lon: f64, lat: f64)->Option<(usize,usize)> {
        let c = ((lon - self.west) / self.cell_w).floor();
        let r = ((self.north - lat) / self.cell_h).floor();
        if c >= 0.0 && r >= 0.0 && (c as usize) < self.cols && (r as usize) < self.rows {
            Some( (c as usize, r as usize) )
        } else {
            None
        }
    }
}

/// a single raster band. `mask[(r,c)] == true` means the pixel value is defined
#[derive(Debug,Clone,PartialEq)]
pub struct Band {
    pub data: Array2<f64>,
    pub mask: Array2<bool>,
}

impl Band {
    /// create from raw values - NaN values and values matching `nodata` are undefined
    pub fn from_values (data: Array2<f64>, nodata: Option<f64>)->Self {
        let mask = data.mapv( |v| !v.is_nan() && Some(v) != nodata);
        Band { data, mask }
    }

    pub fn filled (rows: usize, cols: usize, v: f64)->Self {
        Band { data: Array2::from_elem( (rows,cols), v), mask: Array2::from_elem( (rows,cols), true) }
    }

    /// a band without any defined pixels
    pub fn undefined (rows: usize, cols: usize)->Self {
        Band { data: Array2::from_elem( (rows,cols), f64::NAN), mask: Array2::from_elem( (rows,cols), false) }
    }

    #[inline] pub fn shape (&self)->(usize,usize) { self.data.dim() }

    #[inline]
    pub fn get (&self, row: usize, col: usize)->Option<f64> {
        if self.mask[(row,col)] { Some(self.data[(row,col)]) } else { None }
    }

    pub fn defined_count (&self)->usize {
        self.mask.iter().filter( |m| **m).count()
    }
}

/// a materialized multi-band raster on a [Grid]. An image without bands is empty (e.g. the composite of an
/// empty collection) - selecting a band from it yields an undefined band
#[derive(Debug,Clone,PartialEq)]
pub struct Image {
    pub grid: Grid,
    pub bands: Vec<(String,Band)>,
}

impl Image {
    pub fn empty (grid: Grid)->Self { Image { grid, bands: Vec::new() } }

    pub fn with_band (grid: Grid, name: impl ToString, band: Band)->Result<Self> {
        Image::empty(grid).add_band( name, band)
    }

    pub fn add_band (mut self, name: impl ToString, band: Band)->Result<Self> {
        if band.shape() != self.grid.shape() {
            return Err( invalid_grid( format!("band shape {:?} does not match grid {:?}", band.shape(), self.grid.shape())))
        }
        let name = name.to_string();
        self.bands.retain( |(n,_)| *n != name);
        self.bands.push( (name, band));
        Ok(self)
    }

    pub fn is_empty (&self)->bool { self.bands.is_empty() }

    pub fn band (&self, name: &str)->Option<&Band> {
        self.bands.iter().find( |(n,_)| n == name).map( |(_,b)| b)
    }

    pub fn first_band (&self)->Option<(&str,&Band)> {
        self.bands.first().map( |(n,b)| (n.as_str(), b))
    }

    pub fn band_names (&self)->Vec<&str> {
        self.bands.iter().map( |(n,_)| n.as_str()).collect()
    }

    /// number of defined pixels in the given band (0 if there is no such band)
    pub fn defined_count (&self, name: &str)->usize {
        self.band(name).map( |b| b.defined_count()).unwrap_or(0)
    }
}

/* #endregion grids, bands and images */

/* #region scenes ************************************************************************************************/

/// scene metadata value used by property filters
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Num(f64),
    Str(String),
    List(Vec<String>),
}

impl From<&str> for PropertyValue {
    fn from (s: &str)->Self { PropertyValue::Str(s.to_string()) }
}

impl From<String> for PropertyValue {
    fn from (s: String)->Self { PropertyValue::Str(s) }
}

impl From<f64> for PropertyValue {
    fn from (v: f64)->Self { PropertyValue::Num(v) }
}

/// acquisition metadata of a collection image
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct SceneProperties {
    pub id: String,
    pub time: DateTime<Utc>,
    pub footprint: GeoRect,
    #[serde(default)]
    pub properties: BTreeMap<String,PropertyValue>,
}

impl SceneProperties {
    pub fn get (&self, property: &str)->Option<&PropertyValue> { self.properties.get(property) }
}

/// an image of a collection together with its metadata
#[derive(Debug,Clone)]
pub struct Scene {
    pub props: SceneProperties,
    pub image: Image,
}

/* #endregion scenes */
