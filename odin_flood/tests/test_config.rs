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

use std::fs;
use odin_common::{datetime::DateWindow, fs::store_config_path};
use odin_flood::*;

// run with "cargo test --test test_config -- --nocapture"

#[test]
fn test_defaults() {
    let c = FloodConfig::default();
    assert!( c.validate().is_ok());

    assert_eq!( c.study_area.as_str(), "projects/ee-dynamereki/assets/akanyaru_study_area_cell");
    assert_eq!( c.sar_collection.as_str(), "COPERNICUS/S1_GRD");
    assert_eq!( c.orbit_pass.as_ref(), "ASCENDING");
    assert_eq!( c.pre_flood.to_string(), "2024-01-01..2024-01-19");
    assert_eq!( c.during_flood.to_string(), "2024-06-20..2024-07-10");
    assert_eq!( c.flood_threshold_db, -13.0);
    assert_eq!( c.cropland_class, 40);
    assert_eq!( c.scale_m, 10.0);
    assert_eq!( c.max_pixels, 10_000_000_000);
    assert_eq!( c.usd_per_ha, 1000.0);
    assert_eq!( c.view.zoom, 9);
    assert_eq!( c.view.basemap, Basemap::Satellite);
    assert_eq!( c.view.outline_color, "red"); // the boundary style that gets drawn
}

#[test]
fn test_invalid() {
    let mut c = FloodConfig::default();
    c.scale_m = -10.0;
    assert!( matches!( c.validate(), Err(OdinFloodError::ConfigError(_))));

    let mut c = FloodConfig::default();
    c.max_pixels = 0;
    assert!( c.validate().is_err());

    let mut c = FloodConfig::default();
    c.flood_threshold_db = f64::NAN;
    assert!( c.validate().is_err());

    let mut c = FloodConfig::default();
    c.usd_per_ha = -1.0;
    assert!( c.validate().is_err());

    let mut c = FloodConfig::default();
    c.view.sar_stretch = Stretch { min: 0.0, max: -25.0 };
    assert!( c.validate().is_err());

    let mut c = FloodConfig::default();
    c.view.flood_color = "bleu".to_string();
    match c.validate() {
        Err(e) => println!("expected error: {e}"),
        Ok(_) => panic!("invalid color accepted")
    }

    let mut c = FloodConfig::default();
    c.land_cover_band = " ".to_string();
    assert!( c.validate().is_err());
}

#[test]
fn test_load_ron() {
    let tmp = tempfile::tempdir().unwrap();

    let path = tmp.path().join("flood.ron");
    let mut c = FloodConfig::default();
    c.flood_threshold_db = -15.5;
    c.during_flood = DateWindow::from_iso( "2024-05-01", "2024-05-15").unwrap();
    store_config_path( &c, &path).unwrap();
    println!("{}", fs::read_to_string( &path).unwrap());

    let c = FloodConfig::load( &path).unwrap();
    assert_eq!( c.flood_threshold_db, -15.5);
    assert_eq!( c.during_flood.to_string(), "2024-05-01..2024-05-15");

    // missing fields fall back to defaults
    let path = tmp.path().join("partial.ron");
    fs::write( &path, r#"(
        usd_per_ha: 2500.0,
        pre_flood: (start: "2024-02-01", end: "2024-02-10"),
        view: (zoom: 11),
    )"#).unwrap();
    let c = FloodConfig::load( &path).unwrap();
    assert_eq!( c.usd_per_ha, 2500.0);
    assert_eq!( c.pre_flood.to_string(), "2024-02-01..2024-02-10");
    assert_eq!( c.view.zoom, 11);
    assert_eq!( c.view.flood_color, "blue");
    assert_eq!( c.flood_threshold_db, -13.0);

    // empty windows are rejected when parsing
    let path = tmp.path().join("bad.ron");
    fs::write( &path, r#"( during_flood: (start: "2024-07-10", end: "2024-06-20") )"#).unwrap();
    assert!( FloodConfig::load( &path).is_err());
}
