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

use std::{fs, path::Path};
use ndarray::array;

use odin_raster::{*, catalog::{self, CATALOG_FILE}};

// run with "cargo test --test test_catalog -- --nocapture"

const STUDY_AREA: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "name": "cell" },
      "geometry": { "type": "Polygon", "coordinates": [[ [30.0,-2.0], [30.002,-2.0], [30.002,-2.002], [30.0,-2.002], [30.0,-2.0] ]] } }
  ]
}"#;

const CATALOG: &str = r#"{
  "grid": { "west": 30.0, "north": -2.0, "cell_w": 0.001, "cell_h": 0.001, "cols": 2, "rows": 2 },
  "feature_collections": [ { "id": "aoi", "path": "aoi.geojson" } ],
  "images": [ { "id": "ESA/WorldCover/v100/2020", "bands": [ { "name": "Map", "path": "wc.tif", "nodata": 0 } ] } ],
  "collections": [ { "id": "COPERNICUS/S1_GRD", "scenes": [
    { "id": "s1_a", "time": "2024-01-05T16:20:00Z",
      "footprint": { "west": 29.0, "south": -3.0, "east": 31.0, "north": -1.0 },
      "properties": { "instrumentMode": "IW", "orbitProperties_pass": "ASCENDING", "transmitterReceiverPolarisation": ["VV","VH"] },
      "bands": [ { "name": "VV", "path": "s1_a_vv.tif" } ] }
  ]}]
}"#;

fn write_catalog (dir: &Path) {
    let grid = Grid::new( 30.0, -2.0, 0.001, 0.001, 2, 2).unwrap();

    catalog::write_band_tiff( &dir.join("wc.tif"), &Band::from_values( array![[ 40.0, 10.0 ], [ 0.0, 40.0 ]], None)).unwrap();
    catalog::write_band_tiff( &dir.join("s1_a_vv.tif"), &Band::from_values( array![[ -20.5, -3.0 ], [ f64::NAN, -14.0 ]], None)).unwrap();
    fs::write( dir.join("aoi.geojson"), STUDY_AREA).unwrap();
    fs::write( dir.join(CATALOG_FILE), CATALOG).unwrap();
}

#[test]
fn test_load_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    write_catalog( tmp.path());

    let cat = catalog::load_catalog( tmp.path()).unwrap();
    println!("catalog grid: {:?}", cat.grid());

    let area = cat.study_area( &AssetId::new("aoi")).unwrap();
    println!("study area bounds: {}", area.bounds);
    assert!( area.contains_lon_lat( 30.001, -2.001));

    let wc = cat.eval_image( &ImageExpr::load("ESA/WorldCover/v100/2020")).unwrap();
    let map = wc.band("Map").unwrap();
    assert_eq!( map.get(0,0), Some(40.0));
    assert_eq!( map.get(1,0), None); // nodata

    let s1 = CollectionExpr::load("COPERNICUS/S1_GRD").filter_eq( "orbitProperties_pass", "ASCENDING");
    assert_eq!( cat.eval_collection_props( &s1).unwrap().len(), 1);

    let vv = cat.eval_image( &s1.median().select("VV")).unwrap();
    let b = vv.band("VV").unwrap();
    assert_eq!( b.get(0,0), Some(-20.5)); // exact in f32
    assert_eq!( b.get(1,0), None);
    assert_eq!( b.defined_count(), 3);
}

#[test]
fn test_missing_band_file() {
    let tmp = tempfile::tempdir().unwrap();
    write_catalog( tmp.path());
    fs::remove_file( tmp.path().join("wc.tif")).unwrap();

    let res = catalog::load_catalog( tmp.path());
    assert!( res.is_err());
    println!("expected error: {:?}", res.err());
}

#[test]
fn test_wrong_band_dimensions() {
    let tmp = tempfile::tempdir().unwrap();
    write_catalog( tmp.path());
    catalog::write_band_tiff( &tmp.path().join("wc.tif"), &Band::filled( 3, 3, 40.0)).unwrap();

    match catalog::load_catalog( tmp.path()) {
        Err(OdinRasterError::InvalidGrid(msg)) => println!("expected error: {msg}"),
        other => panic!("expected InvalidGrid, got {:?}", other.err())
    }
}
