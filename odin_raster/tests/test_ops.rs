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

use std::sync::Arc;
use ndarray::{array, Array2};
use geo::{polygon, MultiPolygon};

use odin_raster::{*, ops};

// run with "cargo test --test test_ops -- --nocapture"

fn grid ()->Grid {
    Grid::new( 30.0, -2.0, 0.001, 0.001, 3, 2).unwrap()
}

fn image (data: Array2<f64>)->Image {
    Image::with_band( grid(), "VV", Band::from_values( data, None)).unwrap()
}

fn defined (img: &Image, band: &str)->Vec<bool> {
    img.band(band).unwrap().mask.iter().copied().collect()
}

fn study_area ()->Arc<StudyArea> {
    // covers the two left columns of our grid
    let poly = polygon![ (x: 30.0, y: -2.0), (x: 30.002, y: -2.0), (x: 30.002, y: -2.002), (x: 30.0, y: -2.002), (x: 30.0, y: -2.0) ];
    Arc::new( StudyArea::new( AssetId::new("aoi"), MultiPolygon::new( vec![poly])).unwrap())
}

#[test]
fn test_threshold_is_strict() {
    let img = image( array![[ -13.0, -13.000001, -20.0 ], [ -12.9, f64::NAN, 0.0 ]]);
    let mask = ops::self_mask( &ops::lt( &img, -13.0));

    let d = defined( &mask, "VV");
    println!("flood mask: {:?}", d);
    assert_eq!( d, vec![ false, true, true, false, false, false ]);
}

#[test]
fn test_threshold_changes_mask() {
    let img = image( array![[ -14.0, -12.0, -20.0 ], [ -11.0, -16.0, 0.0 ]]);

    let m13 = ops::self_mask( &ops::lt( &img, -13.0));
    let m15 = ops::self_mask( &ops::lt( &img, -15.0));

    assert_eq!( m13.defined_count("VV"), 3);
    assert_eq!( m15.defined_count("VV"), 2);
}

#[test]
fn test_update_mask_is_and() {
    let flood = ops::self_mask( &ops::lt( &image( array![[ -20.0, -20.0, 0.0 ], [ 0.0, -20.0, f64::NAN ]]), -13.0));
    let crop = ops::self_mask( &ops::equals( &image( array![[ 40.0, 10.0, 40.0 ], [ 40.0, 40.0, 40.0 ]]), 40.0));

    let a = ops::update_mask( &flood, &crop).unwrap();
    let b = ops::update_mask( &crop, &flood).unwrap();

    println!("flood&crop: {:?}", defined( &a, "VV"));
    println!("crop&flood: {:?}", defined( &b, "VV"));
    assert_eq!( defined( &a, "VV"), defined( &b, "VV"));
    assert_eq!( defined( &a, "VV"), vec![ true, false, false, false, true, false ]);
}

#[test]
fn test_update_mask_with_empty_mask() {
    let img = image( array![[ 1.0, 2.0, 3.0 ], [ 4.0, 5.0, 6.0 ]]);
    let res = ops::update_mask( &img, &Image::empty( grid())).unwrap();
    assert_eq!( res.defined_count("VV"), 0);
}

#[test]
fn test_median() {
    let a = image( array![[ 1.0, 5.0, f64::NAN ], [ 1.0, f64::NAN, f64::NAN ]]);
    let b = image( array![[ 3.0, 1.0, 7.0 ], [ 2.0, f64::NAN, f64::NAN ]]);
    let c = image( array![[ 2.0, 3.0, f64::NAN ], [ 4.0, 9.0, f64::NAN ]]);

    let m = ops::median( &grid(), &[&a, &b, &c]).unwrap();
    let vv = m.band("VV").unwrap();
    println!("median: {:?}", vv.data);

    assert_eq!( vv.get(0,0), Some(2.0));
    assert_eq!( vv.get(0,1), Some(3.0));
    assert_eq!( vv.get(0,2), Some(7.0));
    assert_eq!( vv.get(1,0), Some(2.0));
    assert_eq!( vv.get(1,1), Some(9.0));
    assert_eq!( vv.get(1,2), None);

    let m2 = ops::median( &grid(), &[&a, &b]).unwrap(); // even count: mean of middle values
    assert_eq!( m2.band("VV").unwrap().get(0,0), Some(2.0));
}

#[test]
fn test_empty_median() {
    let m = ops::median( &grid(), &[]).unwrap();
    assert!( m.is_empty());

    // downstream of an empty composite everything is undefined, but nothing fails
    let vv = ops::select( &m, "VV").unwrap();
    let mask = ops::self_mask( &ops::lt( &vv, -13.0));
    assert_eq!( mask.defined_count("VV"), 0);

    // selecting a missing band from a non-empty image is an error
    assert!( ops::select( &image( Array2::zeros((2,3))), "VH").is_err());
}

#[test]
fn test_clip() {
    let img = image( array![[ 1.0, 2.0, 3.0 ], [ 4.0, 5.0, 6.0 ]]);
    let clipped = ops::clip( &img, &study_area());
    assert_eq!( defined( &clipped, "VV"), vec![ true, true, false, true, true, false ]);
}

#[test]
fn test_pixel_area_and_reduce() {
    let area = ops::pixel_area( &grid());
    let a = area.band( AREA_BAND).unwrap();
    println!("pixel areas: {:?}", a.data);

    // ~111m x 111m at 2deg south
    let a00 = a.get(0,0).unwrap();
    assert!( a00 > 12_000.0 && a00 < 12_500.0);

    let params = ReduceRegionParams::sum( &study_area(), 10.0, 1_000_000_000);
    let sums = ops::reduce_region( &area, &params).unwrap();
    let total = sums[AREA_BAND];
    println!("area of study area: {total} m²");

    let expected: f64 = [ (0,0), (0,1), (1,0), (1,1) ].iter().map( |(r,c)| a.get(*r,*c).unwrap()).sum();
    assert!( (total - expected).abs() < 1e-6);
}

#[test]
fn test_pixel_ceiling() {
    let area = ops::pixel_area( &grid());

    // the study area covers ~ 222m x 222m, which requires ~ 493 10m pixels
    let params = ReduceRegionParams::sum( &study_area(), 10.0, 100);
    match ops::reduce_region( &area, &params) {
        Err(OdinRasterError::TooManyPixels(n,max)) => {
            println!("expected failure: {n} > {max}");
            assert_eq!( max, 100);
            assert!( n > 100);
        }
        other => panic!("expected TooManyPixels, got {other:?}")
    }

    let params = ReduceRegionParams::sum( &study_area(), 100.0, 100);
    assert!( ops::reduce_region( &area, &params).is_ok());
}

#[test]
fn test_resample() {
    let fine = Grid::new( 30.0, -2.0, 0.0005, 0.0005, 6, 4).unwrap();
    let data = Array2::from_shape_fn( (4,6), |(r,c)| (r/2 * 3 + c/2) as f64);
    let img = Image::with_band( fine, "Map", Band::from_values( data, None)).unwrap();

    let coarse = ops::resample_nearest( &img, &grid());
    let m = coarse.band("Map").unwrap();
    assert_eq!( m.data, array![[ 0.0, 1.0, 2.0 ], [ 3.0, 4.0, 5.0 ]]);
}

#[test]
fn test_reduction_grid() {
    let bounds = study_area().bounds;

    let g = ops::reduction_grid( &bounds, 100.0).unwrap();
    println!("100m reduction grid: {g:?}");
    assert_eq!( (g.west, g.north), (bounds.west(), bounds.north()));
    assert_eq!( g.shape(), (3,3)); // ~222m per side
    assert!( g.east() >= bounds.east() && g.south() <= bounds.south());
    let a = ops::pixel_area( &g).band( AREA_BAND).unwrap().get(0,0).unwrap();
    assert!( (a / 10_000.0 - 1.0).abs() < 0.02, "{a}");

    // coarser than the area still gives one cell
    assert_eq!( ops::reduction_grid( &bounds, 1000.0).unwrap().shape(), (1,1));

    assert!( matches!( ops::reduction_grid( &bounds, 0.0), Err(OdinRasterError::OpFailed(_))));
    assert!( matches!( ops::reduction_grid( &bounds, f64::NAN), Err(OdinRasterError::OpFailed(_))));
}
