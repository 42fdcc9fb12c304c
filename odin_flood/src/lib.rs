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

//! flooded cropland analysis: median Sentinel-1 VV composites of a pre-flood and a during-flood date window,
//! a backscatter threshold flood mask, its intersection with the ESA WorldCover cropland class and the
//! resulting areas and ecosystem service value loss.
//!
//! All image processing is expressed as [odin_raster] algebra and evaluated by a [odin_raster::GeoBackend].
//! Presentation is a [MapView] value handed to a [ViewRenderer].

mod errors;
pub use errors::*;

pub mod config;
pub use config::{FloodConfig, ViewConfig, OrbitPass, Basemap, Stretch};

pub mod pipeline;
pub use pipeline::{FloodAnalysis, AnalysisResult, run_analysis};

pub mod valuation;
pub use valuation::{AreaTotals, LossEstimate, m2_to_hectares, loss_usd};

pub mod view;
pub use view::{MapView, MapLayer, Legend, LegendRow, build_legend};

pub mod render;
pub use render::{Color, ViewRenderer, JsonViewWriter, PngRenderer};
