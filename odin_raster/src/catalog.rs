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

//! loading a [MemCatalog] from a local directory. The directory has to contain a `catalog.json` file like:
//! ```text
//! {
//!   "grid": { "west": 29.9, "north": -2.2, "cell_w": 0.0001, "cell_h": 0.0001, "cols": 2000, "rows": 2000 },
//!   "feature_collections": [ { "id": "projects/ee-dynamereki/assets/akanyaru_study_area_cell", "path": "study_area.geojson" } ],
//!   "images": [ { "id": "ESA/WorldCover/v100/2020", "bands": [ { "name": "Map", "path": "worldcover.tif", "nodata": 0 } ] } ],
//!   "collections": [ { "id": "COPERNICUS/S1_GRD", "scenes": [
//!       { "id": "S1A_IW_GRDH_20240105", "time": "2024-01-05T16:20:00Z",
//!         "footprint": { "west": 29.0, "south": -3.0, "east": 31.0, "north": -1.0 },
//!         "properties": { "instrumentMode": "IW", "orbitProperties_pass": "ASCENDING", "transmitterReceiverPolarisation": ["VV","VH"] },
//!         "bands": [ { "name": "VV", "path": "s1_20240105_vv.tif" } ] } ] } ]
//! }
//! ```
//! Band rasters are single band TIFF files. Georeferencing comes from the (optional) `grid` of the image or
//! scene entry, which defaults to the catalog grid. Relative paths are resolved against the catalog directory

use std::{fs::File, io::{BufReader,BufWriter}, path::{Path,PathBuf}};
use ndarray::Array2;
use serde::{Serialize,Deserialize};
use geo::{Geometry, MultiPolygon};
use geo_types::GeometryCollection;
use geojson::GeoJson;
use tiff::{decoder::{Decoder, DecodingResult}, encoder::{colortype, TiffEncoder}};
use tracing::{debug,info};

use odin_common::fs::filepath_contents_as_string;
use crate::{
    AssetId, Band, Grid, Image, MemCatalog, SceneProperties,
    errors::{Result, OdinRasterError, op_failed, invalid_grid}
};

pub const CATALOG_FILE: &str = "catalog.json";

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct CatalogFile {
    pub grid: Grid,
    #[serde(default)]
    pub feature_collections: Vec<FeatureCollectionEntry>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    #[serde(default)]
    pub collections: Vec<CollectionEntry>,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct FeatureCollectionEntry {
    pub id: AssetId,
    pub path: PathBuf,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct BandEntry {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub nodata: Option<f64>,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct ImageEntry {
    pub id: AssetId,
    #[serde(default)]
    pub grid: Option<Grid>,
    pub bands: Vec<BandEntry>,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct SceneEntry {
    #[serde(flatten)]
    pub props: SceneProperties,
    #[serde(default)]
    pub grid: Option<Grid>,
    pub bands: Vec<BandEntry>,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct CollectionEntry {
    pub id: AssetId,
    #[serde(default)]
    pub scenes: Vec<SceneEntry>,
}

/// load all assets of a catalog directory
pub fn load_catalog (dir: impl AsRef<Path>)->Result<MemCatalog> {
    let dir = dir.as_ref();
    let cf: CatalogFile = serde_json::from_str( &filepath_contents_as_string( &dir.join(CATALOG_FILE))?)?;
    cf.grid.check()?;

    let mut catalog = MemCatalog::new( cf.grid);

    for fc in &cf.feature_collections {
        let geometry = read_geojson_polygons( &dir.join( &fc.path))?;
        debug!("loaded feature collection {} with {} polygons", fc.id, geometry.0.len());
        catalog.add_feature_collection( fc.id.clone(), geometry)?;
    }

    for img in &cf.images {
        let image = read_image( dir, img.grid.as_ref().unwrap_or( &cf.grid), &img.bands)?;
        debug!("loaded image {} with bands {:?}", img.id, image.band_names());
        catalog.add_image( img.id.clone(), image);
    }

    for coll in &cf.collections {
        catalog.add_collection( coll.id.clone());
        for scene in &coll.scenes {
            let image = read_image( dir, scene.grid.as_ref().unwrap_or( &cf.grid), &scene.bands)?;
            catalog.add_scene( coll.id.clone(), scene.props.clone(), image);
        }
        debug!("loaded collection {} with {} scenes", coll.id, coll.scenes.len());
    }

    info!("loaded catalog {:?}", dir);
    Ok(catalog)
}

fn read_image (dir: &Path, grid: &Grid, bands: &Vec<BandEntry>)->Result<Image> {
    grid.check()?;
    let mut image = Image::empty( *grid);
    for bs in bands {
        let band = read_band_tiff( &dir.join( &bs.path), grid, bs.nodata)?;
        image = image.add_band( &bs.name, band)?;
    }
    Ok(image)
}

/// collect all (multi)polygons of a GeoJSON file (geometry, feature or feature collection)
pub fn read_geojson_polygons (path: &Path)->Result<MultiPolygon<f64>> {
    let geojson: GeoJson = filepath_contents_as_string( &path)?.parse()?;
    let collection: GeometryCollection<f64> = geojson::quick_collection( &geojson)?;

    let mut polygons = Vec::new();
    for geom in collection {
        match geom {
            Geometry::Polygon(p) => polygons.push(p),
            Geometry::MultiPolygon(mp) => polygons.extend( mp.0),
            _ => {} // we only use areal geometries
        }
    }

    if polygons.is_empty() {
        Err( OdinRasterError::InvalidGeometry( format!("no polygons in {:?}", path)))
    } else {
        Ok( MultiPolygon::new( polygons))
    }
}

/// read a single band TIFF that has to match the grid dimensions
pub fn read_band_tiff (path: &Path, grid: &Grid, nodata: Option<f64>)->Result<Band> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new( BufReader::new(file))?;

    let (w,h) = decoder.dimensions()?;
    if w as usize != grid.cols || h as usize != grid.rows {
        return Err( invalid_grid( format!("{:?} is {}x{}, expected {}x{}", path, w, h, grid.cols, grid.rows)))
    }

    let values: Vec<f64> = match decoder.read_image()? {
        DecodingResult::U8(v) => v.into_iter().map( f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map( f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map( f64::from).collect(),
        DecodingResult::I8(v) => v.into_iter().map( f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map( f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map( f64::from).collect(),
        DecodingResult::F32(v) => v.into_iter().map( f64::from).collect(),
        DecodingResult::F64(v) => v,
        _ => return Err( op_failed( format!("unsupported sample format in {:?}", path)))
    };

    if values.len() != grid.len() {
        return Err( op_failed( format!("{:?} is not a single band raster", path)))
    }

    let data = Array2::from_shape_vec( grid.shape(), values).map_err( |e| op_failed(e))?;
    Ok( Band::from_values( data, nodata) )
}

/// write a band as single band float32 TIFF. Undefined pixels are stored as NaN
pub fn write_band_tiff (path: &Path, band: &Band)->Result<()> {
    odin_common::fs::ensure_parent_dir( path)?;
    let (rows,cols) = band.shape();
    let values: Vec<f32> = ndarray::Zip::from( &band.data).and( &band.mask)
        .map_collect( |v,m| if *m { *v as f32 } else { f32::NAN })
        .iter().copied().collect();

    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new( BufWriter::new(file))?;
    encoder.write_image::<colortype::Gray32Float>( cols as u32, rows as u32, &values)?;
    Ok(())
}
