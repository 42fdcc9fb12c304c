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

//! expression values of the image algebra. Nothing in here computes pixels - expressions are just
//! (serializable) descriptions that get evaluated by a [crate::GeoBackend]

use std::sync::Arc;
use serde::Serialize;
use geo::Intersects;

use odin_common::datetime::DateWindow;
use crate::{AreaRef, AssetId, PropertyValue, SceneProperties, StudyArea};

/// scene selection predicates
#[derive(Debug,Clone,Serialize)]
pub enum Filter {
    /// scene footprint intersects the area
    Bounds(AreaRef),
    /// scene property equals value
    Eq { property: String, value: PropertyValue },
    /// list valued scene property contains value
    ListContains { property: String, value: String },
    /// acquisition time within [start,end)
    Date(DateWindow),
    And(Vec<Filter>),
}

impl Filter {
    pub fn matches (&self, scene: &SceneProperties)->bool {
        match self {
            Filter::Bounds(area) => {
                area.bounds.intersects( &scene.footprint) &&
                area.geometry.intersects( &scene.footprint.to_polygon())
            }
            Filter::Eq{property,value} => scene.get(property) == Some(value),
            Filter::ListContains{property,value} => {
                match scene.get(property) {
                    Some(PropertyValue::List(list)) => list.iter().any( |v| v == value),
                    _ => false
                }
            }
            Filter::Date(window) => window.contains( &scene.time),
            Filter::And(filters) => filters.iter().all( |f| f.matches(scene))
        }
    }
}

/// description of an image collection
#[derive(Debug,Clone,Serialize)]
pub enum CollectionExpr {
    Load(AssetId),
    Filter { source: Box<CollectionExpr>, filter: Filter },
    /// per image: keep only `band` and (optionally) clip to `area`
    SelectClip { source: Box<CollectionExpr>, band: String, area: Option<AreaRef> },
}

impl CollectionExpr {
    pub fn load (id: impl Into<AssetId>)->Self { CollectionExpr::Load( id.into()) }

    pub fn filter (self, filter: Filter)->Self {
        CollectionExpr::Filter { source: Box::new(self), filter }
    }

    pub fn filter_bounds (self, area: &Arc<StudyArea>)->Self {
        self.filter( Filter::Bounds( area.into()))
    }

    pub fn filter_eq (self, property: impl ToString, value: impl Into<PropertyValue>)->Self {
        self.filter( Filter::Eq { property: property.to_string(), value: value.into() })
    }

    pub fn filter_list_contains (self, property: impl ToString, value: impl ToString)->Self {
        self.filter( Filter::ListContains { property: property.to_string(), value: value.to_string() })
    }

    pub fn filter_date (self, window: DateWindow)->Self {
        self.filter( Filter::Date(window))
    }

    pub fn select_clip (self, band: impl ToString, area: Option<&Arc<StudyArea>>)->Self {
        CollectionExpr::SelectClip { source: Box::new(self), band: band.to_string(), area: area.map( AreaRef::from) }
    }

    /// per pixel median over all images of the collection
    pub fn median (self)->ImageExpr {
        ImageExpr::Median( Box::new(self))
    }
}

/// description of a (single) image
#[derive(Debug,Clone,Serialize)]
pub enum ImageExpr {
    Load(AssetId),
    Median(Box<CollectionExpr>),
    Select { source: Box<ImageExpr>, band: String },
    Clip { source: Box<ImageExpr>, area: AreaRef },
    /// 1 where value < threshold, 0 otherwise
    Lt { source: Box<ImageExpr>, threshold: f64 },
    /// 1 where the pixel equals `value`, 0 otherwise
    EqConst { source: Box<ImageExpr>, value: f64 },
    /// undefine all zero pixels
    SelfMask(Box<ImageExpr>),
    /// keep source pixels only where mask is defined and non-zero
    UpdateMask { source: Box<ImageExpr>, mask: Box<ImageExpr> },
    /// ground area per pixel in m²
    PixelArea,
}

impl ImageExpr {
    pub fn load (id: impl Into<AssetId>)->Self { ImageExpr::Load( id.into()) }

    pub fn pixel_area ()->Self { ImageExpr::PixelArea }

    pub fn select (self, band: impl ToString)->Self {
        ImageExpr::Select { source: Box::new(self), band: band.to_string() }
    }

    pub fn clip (self, area: &Arc<StudyArea>)->Self {
        ImageExpr::Clip { source: Box::new(self), area: area.into() }
    }

    pub fn lt (self, threshold: f64)->Self {
        ImageExpr::Lt { source: Box::new(self), threshold }
    }

    pub fn equals (self, value: f64)->Self {
        ImageExpr::EqConst { source: Box::new(self), value }
    }

    pub fn self_mask (self)->Self {
        ImageExpr::SelfMask( Box::new(self))
    }

    pub fn update_mask (self, mask: ImageExpr)->Self {
        ImageExpr::UpdateMask { source: Box::new(self), mask: Box::new(mask) }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
pub enum Reducer {
    Sum,
}

/// parameters of a region reduction. The reduction is always scoped to the given study area
#[derive(Debug,Clone,Serialize)]
pub struct ReduceRegionParams {
    pub reducer: Reducer,
    pub area: AreaRef,
    /// nominal ground sampling distance in meters
    pub scale_m: f64,
    /// fail if the reduction would require more pixels
    pub max_pixels: u64,
}

impl ReduceRegionParams {
    pub fn sum (area: &Arc<StudyArea>, scale_m: f64, max_pixels: u64)->Self {
        ReduceRegionParams { reducer: Reducer::Sum, area: area.into(), scale_m, max_pixels }
    }
}
