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

//! pixel level implementation of the image algebra operations on materialized [Image]s.
//! All images passed into binary operations have to be on the same [Grid]

use std::collections::BTreeMap;
use ndarray::{Array2, Zip};

use odin_common::geo::{GeoRect, cell_area_m2};
use crate::{
    Band, Grid, Image, StudyArea, ReduceRegionParams, Reducer, AREA_BAND,
    errors::{Result, OdinRasterError, invalid_grid}
};

fn check_same_grid (a: &Grid, b: &Grid)->Result<()> {
    if a == b { Ok(()) } else { Err( invalid_grid( format!("grid mismatch {:?} / {:?}", a, b))) }
}

fn map_bands<F> (img: &Image, f: F)->Image where F: Fn(&Band)->Band {
    Image { grid: img.grid, bands: img.bands.iter().map( |(n,b)| (n.clone(), f(b))).collect() }
}

/// keep only the given band. Selecting from an empty image yields an undefined band
pub fn select (img: &Image, band: &str)->Result<Image> {
    if img.is_empty() {
        let (rows,cols) = img.grid.shape();
        Image::with_band( img.grid, band, Band::undefined( rows, cols))
    } else {
        let b = img.band(band).ok_or_else( || OdinRasterError::BandNotFound( band.to_string()))?;
        Image::with_band( img.grid, band, b.clone())
    }
}

/// true for all grid pixels with centers inside of the area
pub fn area_mask (grid: &Grid, area: &StudyArea)->Array2<bool> {
    Array2::from_shape_fn( grid.shape(), |(r,c)| {
        let (lon,lat) = grid.pixel_center( c, r);
        area.contains_lon_lat( lon, lat)
    })
}

pub fn clip (img: &Image, area: &StudyArea)->Image {
    let inside = area_mask( &img.grid, area);
    map_bands( img, |b| Band { data: b.data.clone(), mask: &b.mask & &inside })
}

fn compare<F> (img: &Image, pred: F)->Image where F: Fn(f64)->bool {
    map_bands( img, |b| {
        let data = Zip::from(&b.data).and(&b.mask).map_collect( |v,m| if *m && pred(*v) { 1.0 } else { 0.0 });
        Band { data, mask: b.mask.clone() }
    })
}

/// 1 where defined values are strictly less than the threshold, 0 otherwise
pub fn lt (img: &Image, threshold: f64)->Image {
    compare( img, |v| v < threshold)
}

pub fn equals (img: &Image, value: f64)->Image {
    compare( img, |v| v == value)
}

pub fn self_mask (img: &Image)->Image {
    map_bands( img, |b| {
        let mask = Zip::from(&b.data).and(&b.mask).map_collect( |v,m| *m && *v != 0.0);
        Band { data: b.data.clone(), mask }
    })
}

/// pixel-wise AND of the source masks with the first band of `mask` (defined and non-zero)
pub fn update_mask (img: &Image, mask: &Image)->Result<Image> {
    check_same_grid( &img.grid, &mask.grid)?;

    match mask.first_band() {
        Some((_,mb)) => {
            let keep = Zip::from(&mb.data).and(&mb.mask).map_collect( |v,m| *m && *v != 0.0);
            Ok( map_bands( img, |b| Band { data: b.data.clone(), mask: &b.mask & &keep }) )
        }
        None => {
            let (rows,cols) = img.grid.shape();
            Ok( map_bands( img, |b| Band { data: b.data.clone(), mask: Array2::from_elem( (rows,cols), false) }) )
        }
    }
}

fn median_of (vs: &mut Vec<f64>)->f64 {
    vs.sort_by( |a,b| a.total_cmp(b));
    let n = vs.len();
    if n % 2 == 1 { vs[n/2] } else { (vs[n/2 - 1] + vs[n/2]) / 2.0 }
}

/// per pixel median of the defined values of all images. Bands are taken from the first image.
/// An empty input yields an empty image
pub fn median (grid: &Grid, images: &[&Image])->Result<Image> {
    let mut result = Image::empty( *grid);
    let Some(first) = images.first() else { return Ok(result) };

    for img in images {
        check_same_grid( grid, &img.grid)?;
    }

    let (rows,cols) = grid.shape();
    for name in first.band_names() {
        let bands: Vec<&Band> = images.iter().filter_map( |img| img.band(name)).collect();
        let mut data = Array2::from_elem( (rows,cols), f64::NAN);
        let mut mask = Array2::from_elem( (rows,cols), false);
        let mut vs: Vec<f64> = Vec::with_capacity( bands.len());

        for r in 0..rows {
            for c in 0..cols {
                vs.clear();
                for b in &bands {
                    if let Some(v) = b.get(r,c) { vs.push(v) }
                }
                if !vs.is_empty() {
                    data[(r,c)] = median_of( &mut vs);
                    mask[(r,c)] = true;
                }
            }
        }
        result = result.add_band( name, Band { data, mask })?;
    }

    Ok(result)
}

/// ground area in m² of each grid pixel. Since the grid is lon/lat the area only depends on the row
pub fn pixel_area (grid: &Grid)->Image {
    let (rows,cols) = grid.shape();
    let row_areas: Vec<f64> = (0..rows).map( |r| {
        let b = grid.pixel_bounds( 0, r);
        cell_area_m2( b.west(), b.south(), b.east(), b.north())
    }).collect();

    let data = Array2::from_shape_fn( (rows,cols), |(r,_)| row_areas[r]);
    let mask = Array2::from_elem( (rows,cols), true);
    Image { grid: *grid, bands: vec![ (AREA_BAND.to_string(), Band { data, mask }) ] }
}

/// nearest neighbor resampling of `img` onto `target`. Target pixels outside of the source grid are undefined
pub fn resample_nearest (img: &Image, target: &Grid)->Image {
    if img.grid == *target { return img.clone() }

    let src = img.grid;
    let idx: Array2<Option<(usize,usize)>> = Array2::from_shape_fn( target.shape(), |(r,c)| {
        let (lon,lat) = target.pixel_center( c, r);
        src.index_of( lon, lat)
    });

    let bands = img.bands.iter().map( |(n,b)| {
        let data = idx.mapv( |i| i.map( |(c,r)| b.data[(r,c)]).unwrap_or(f64::NAN));
        let mask = idx.mapv( |i| i.map( |(c,r)| b.mask[(r,c)]).unwrap_or(false));
        (n.clone(), Band { data, mask })
    }).collect();

    Image { grid: *target, bands }
}

/// meters per degree of latitude (and of longitude at the equator)
pub const M_PER_DEG: f64 = 111_319.49;

/// the grid a reduction at `scale_m` is evaluated on. Cells are `scale_m` wide and high at the center
/// latitude of `bounds`, the grid starts at the north west corner of `bounds` and covers all of it
pub fn reduction_grid (bounds: &GeoRect, scale_m: f64)->Result<Grid> {
    if !(scale_m.is_finite() && scale_m > 0.0) {
        return Err( OdinRasterError::OpFailed( format!("invalid reduction scale {}", scale_m)))
    }

    let cos_lat = bounds.center().y.to_radians().cos().max(1e-6);
    let cell_h = scale_m / M_PER_DEG;
    let cell_w = scale_m / (M_PER_DEG * cos_lat);
    let cols = ((bounds.east() - bounds.west()) / cell_w).ceil().max(1.0) as usize;
    let rows = ((bounds.north() - bounds.south()) / cell_h).ceil().max(1.0) as usize;

    Grid::new( bounds.west(), bounds.north(), cell_w, cell_h, cols, rows)
}

/// check the pixel ceiling of a reduction: both the number of `scale_m` pixels needed to cover the area bounds
/// and the number of grid pixels we visit have to be within `max_pixels`. Returns the number of visited pixels
pub fn check_pixel_budget (grid: &Grid, params: &ReduceRegionParams)->Result<u64> {
    if !(params.scale_m > 0.0) {
        return Err( OdinRasterError::OpFailed( format!("invalid reduction scale {}", params.scale_m)))
    }

    let bounds = &params.area.bounds;
    let estimated = (bounds.area_m2() / (params.scale_m * params.scale_m)).ceil() as u64;
    if estimated > params.max_pixels {
        return Err( OdinRasterError::TooManyPixels( estimated, params.max_pixels))
    }

    let visited = (0..grid.rows).map( |r| {
        (0..grid.cols).filter( |c| {
            let (lon,lat) = grid.pixel_center( *c, r);
            bounds.contains_lon_lat( lon, lat)
        }).count() as u64
    }).sum::<u64>();
    if visited > params.max_pixels {
        return Err( OdinRasterError::TooManyPixels( visited, params.max_pixels))
    }

    Ok(visited)
}

/// reduce all bands of `img` over the area of `params`. Only defined pixels with centers inside of the
/// area contribute
pub fn reduce_region (img: &Image, params: &ReduceRegionParams)->Result<BTreeMap<String,f64>> {
    check_pixel_budget( &img.grid, params)?;
    let inside = area_mask( &img.grid, &params.area);

    let mut result = BTreeMap::new();
    for (name,b) in &img.bands {
        let v = match params.reducer {
            Reducer::Sum => {
                Zip::from(&b.data).and(&b.mask).and(&inside)
                    .fold( 0.0, |acc,v,m,i| if *m && *i { acc + *v } else { acc })
            }
        };
        result.insert( name.clone(), v);
    }

    Ok(result)
}
