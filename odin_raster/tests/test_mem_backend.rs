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

use std::{collections::BTreeMap, sync::Arc};
use chrono::{TimeZone, Utc};
use ndarray::{array, Array2};
use geo::{polygon, MultiPolygon};

use odin_common::{datetime::DateWindow, geo::GeoRect};
use odin_raster::*;

// run with "cargo test --test test_mem_backend -- --nocapture"

const AOI: &str = "aoi";
const S1: &str = "S1";

fn grid ()->Grid {
    Grid::new( 30.0, -2.0, 0.001, 0.001, 2, 2).unwrap()
}

fn scene (id: &str, day: u32, mode: &str, pass: &str, vv: Array2<f64>)->(SceneProperties,Image) {
    let mut properties = BTreeMap::new();
    properties.insert( "instrumentMode".to_string(), PropertyValue::from(mode));
    properties.insert( "orbitProperties_pass".to_string(), PropertyValue::from(pass));
    properties.insert( "transmitterReceiverPolarisation".to_string(), PropertyValue::List( vec!["VV".into(), "VH".into()]));

    let props = SceneProperties {
        id: id.to_string(),
        time: Utc.with_ymd_and_hms( 2024, 1, day, 16, 0, 0).unwrap(),
        footprint: GeoRect::from_wsen( 29.0, -3.0, 31.0, -1.0),
        properties
    };
    let image = Image::with_band( grid(), "VV", Band::from_values( vv, None)).unwrap();
    (props, image)
}

fn backend ()->MemBackend {
    let mut catalog = MemCatalog::new( grid());

    let poly = polygon![ (x: 30.0, y: -2.0), (x: 30.002, y: -2.0), (x: 30.002, y: -2.002), (x: 30.0, y: -2.002), (x: 30.0, y: -2.0) ];
    catalog.add_feature_collection( AOI, MultiPolygon::new( vec![poly])).unwrap();

    for (p,img) in [
        scene( "a", 2, "IW", "ASCENDING", array![[ -20.0, -5.0 ], [ -20.0, -5.0 ]]),
        scene( "b", 3, "IW", "ASCENDING", array![[ -18.0, -6.0 ], [ -5.0, -5.0 ]]),
        scene( "c", 4, "IW", "DESCENDING", array![[ -30.0, -30.0 ], [ -30.0, -30.0 ]]),
        scene( "d", 20, "EW", "ASCENDING", array![[ -30.0, -30.0 ], [ -30.0, -30.0 ]]),
    ] {
        catalog.add_scene( S1, p, img);
    }

    MemBackend::new( catalog)
}

fn s1_collection (area: &Arc<StudyArea>, window: DateWindow)->CollectionExpr {
    CollectionExpr::load( S1)
        .filter_bounds( area)
        .filter_eq( "instrumentMode", "IW")
        .filter_eq( "orbitProperties_pass", "ASCENDING")
        .filter_list_contains( "transmitterReceiverPolarisation", "VV")
        .filter_date( window)
}

#[tokio::test]
async fn test_collection_filters() {
    let backend = backend();
    let area = Arc::new( backend.load_study_area( &AssetId::new(AOI)).await.unwrap());

    let n = backend.collection_size( &s1_collection( &area, DateWindow::from_iso( "2024-01-01", "2024-01-10").unwrap())).await.unwrap();
    println!("scenes in first window: {n}");
    assert_eq!( n, 2); // "c" is descending, "d" is EW and outside

    // end date is exclusive
    let n = backend.collection_size( &s1_collection( &area, DateWindow::from_iso( "2024-01-01", "2024-01-02").unwrap())).await.unwrap();
    assert_eq!( n, 0);
}

#[tokio::test]
async fn test_median_threshold_reduce() {
    let backend = backend();
    let area = Arc::new( backend.load_study_area( &AssetId::new(AOI)).await.unwrap());
    let window = DateWindow::from_iso( "2024-01-01", "2024-01-10").unwrap();

    let composite = s1_collection( &area, window).select_clip( "VV", Some(&area)).median();
    let flood = composite.select("VV").lt( -13.0).self_mask();
    let img = backend.compute_image( &flood).await.unwrap();
    println!("flood pixels: {}", img.defined_count("VV"));
    // medians: [-19, -5.5], [-12.5, -5]
    assert_eq!( img.defined_count("VV"), 1);

    let area_img = ImageExpr::pixel_area().update_mask( flood);
    let params = ReduceRegionParams::sum( &area, 10.0, 10_000_000_000);
    let flooded = reduce_band( &backend, &area_img, &params, AREA_BAND).await.unwrap();
    let total = reduce_band( &backend, &ImageExpr::pixel_area().clip( &area), &params, AREA_BAND).await.unwrap();
    println!("flooded: {flooded} m² of {total} m²");

    assert!( flooded > 0.0);
    assert!( (total / flooded - 4.0).abs() < 0.01);
}

#[tokio::test]
async fn test_empty_window() {
    let backend = backend();
    let area = Arc::new( backend.load_study_area( &AssetId::new(AOI)).await.unwrap());
    let window = DateWindow::from_iso( "2023-06-01", "2023-06-10").unwrap();

    let coll = s1_collection( &area, window).select_clip( "VV", Some(&area));
    assert_eq!( backend.collection_size( &coll).await.unwrap(), 0);

    let area_img = ImageExpr::pixel_area().update_mask( coll.median().select("VV").lt( -13.0).self_mask());
    let params = ReduceRegionParams::sum( &area, 10.0, 10_000_000_000);
    let flooded = reduce_band( &backend, &area_img, &params, AREA_BAND).await.unwrap();
    assert_eq!( flooded, 0.0);
}

#[tokio::test]
async fn test_errors() {
    let backend = backend();

    match backend.load_study_area( &AssetId::new("nowhere")).await {
        Err(OdinRasterError::AssetNotFound(id)) => println!("expected error for asset {id}"),
        other => panic!("expected AssetNotFound, got {other:?}")
    }

    let res = backend.collection_size( &CollectionExpr::load("COPERNICUS/S2")).await;
    assert!( matches!( res, Err(OdinRasterError::AssetNotFound(_))));

    let area = Arc::new( backend.load_study_area( &AssetId::new(AOI)).await.unwrap());
    let params = ReduceRegionParams::sum( &area, 10.0, 10);
    let res = backend.reduce_region( &ImageExpr::pixel_area(), &params).await;
    assert!( matches!( res, Err(OdinRasterError::TooManyPixels(_,10))));
}
