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

//! the analysis plan. Stage functions only build image algebra expressions, the [GeoBackend] gets
//! involved in [run_analysis] when we count scenes and reduce areas

use std::sync::Arc;
use serde::Serialize;
use tracing::{debug,info,warn};

use odin_common::{datetime::DateWindow, geo::multi_polygon_area_m2};
use odin_raster::{
    AreaRef, CollectionExpr, GeoBackend, ImageExpr, ReduceRegionParams, StudyArea, AREA_BAND, reduce_band
};
use crate::{
    config::FloodConfig,
    valuation::{AreaTotals, LossEstimate},
    errors::Result
};

// Sentinel-1 GRD scene properties we filter on
pub const INSTRUMENT_MODE: &str = "instrumentMode";
pub const ORBIT_PASS: &str = "orbitProperties_pass";
pub const POLARISATION: &str = "transmitterReceiverPolarisation";

/* #region stages ************************************************************************************************/

/// SAR scenes that intersect the study area and match instrument mode, orbit pass and polarisation
pub fn sar_collection (config: &FloodConfig, area: &Arc<StudyArea>)->CollectionExpr {
    CollectionExpr::load( &config.sar_collection)
        .filter_bounds( area)
        .filter_eq( INSTRUMENT_MODE, config.instrument_mode.as_str())
        .filter_eq( ORBIT_PASS, config.orbit_pass.as_ref())
        .filter_list_contains( POLARISATION, &config.polarisation)
}

/// the scenes of a date window, reduced to `band` and clipped to the study area
pub fn window_scenes (sar: &CollectionExpr, window: DateWindow, band: &str, area: &Arc<StudyArea>)->CollectionExpr {
    sar.clone().filter_date( window).select_clip( band, Some(area))
}

/// per pixel median of a window. If the window has no scenes this is an empty image
pub fn median_composite (scenes: &CollectionExpr, band: &str)->ImageExpr {
    scenes.clone().median().select( band)
}

/// self-masked `composite < threshold_db`
pub fn flood_mask (composite: &ImageExpr, threshold_db: f64)->ImageExpr {
    composite.clone().lt( threshold_db).self_mask()
}

/// self-masked land cover class
pub fn cropland_mask (config: &FloodConfig, area: &Arc<StudyArea>)->ImageExpr {
    ImageExpr::load( &config.land_cover)
        .select( &config.land_cover_band)
        .clip( area)
        .equals( config.cropland_class as f64)
        .self_mask()
}

/// pixels that are both flooded and cropland
pub fn flooded_cropland (flood: &ImageExpr, cropland: &ImageExpr, area: &Arc<StudyArea>)->ImageExpr {
    flood.clone().update_mask( cropland.clone()).clip( area)
}

/// pixel area (m²) restricted to the defined pixels of `mask`
pub fn area_image (mask: &ImageExpr)->ImageExpr {
    ImageExpr::pixel_area().update_mask( mask.clone())
}

/* #endregion stages */

/// the complete (not yet evaluated) analysis
#[derive(Debug,Clone,Serialize)]
pub struct FloodAnalysis {
    pub study_area: AreaRef,

    pub pre_flood_window: DateWindow,
    pub during_flood_window: DateWindow,
    pub pre_flood_scenes: CollectionExpr,
    pub during_flood_scenes: CollectionExpr,

    pub pre_flood: ImageExpr,
    pub during_flood: ImageExpr,
    pub flood_mask: ImageExpr,
    pub cropland: ImageExpr,
    pub flooded_cropland: ImageExpr,

    pub total_area_image: ImageExpr,
    pub flooded_area_image: ImageExpr,
    pub reduce_params: ReduceRegionParams,
}

impl FloodAnalysis {
    pub fn build (config: &FloodConfig, area: &Arc<StudyArea>)->Self {
        let band = config.sar_band.as_str();
        let sar = sar_collection( config, area);

        let pre_flood_scenes = window_scenes( &sar, config.pre_flood, band, area);
        let during_flood_scenes = window_scenes( &sar, config.during_flood, band, area);
        let pre_flood = median_composite( &pre_flood_scenes, band);
        let during_flood = median_composite( &during_flood_scenes, band);

        let flood_mask = flood_mask( &during_flood, config.flood_threshold_db);
        let cropland = cropland_mask( config, area);
        let flooded_cropland = flooded_cropland( &flood_mask, &cropland, area);

        let total_area_image = area_image( &cropland);
        let flooded_area_image = area_image( &flooded_cropland);
        let reduce_params = ReduceRegionParams::sum( area, config.scale_m, config.max_pixels);

        FloodAnalysis {
            study_area: area.into(),
            pre_flood_window: config.pre_flood,
            during_flood_window: config.during_flood,
            pre_flood_scenes, during_flood_scenes,
            pre_flood, during_flood, flood_mask, cropland, flooded_cropland,
            total_area_image, flooded_area_image, reduce_params
        }
    }

    /// number of scenes in the (pre_flood,during_flood) windows
    pub async fn count_scenes (&self, backend: &dyn GeoBackend)->Result<(usize,usize)> {
        let counts = futures::try_join!(
            backend.collection_size( &self.pre_flood_scenes),
            backend.collection_size( &self.during_flood_scenes)
        )?;
        Ok(counts)
    }

    /// run both area reductions concurrently
    pub async fn reduce_areas (&self, backend: &dyn GeoBackend)->Result<AreaTotals> {
        let (cropland_m2, flooded_cropland_m2) = futures::try_join!(
            reduce_band( backend, &self.total_area_image, &self.reduce_params, AREA_BAND),
            reduce_band( backend, &self.flooded_area_image, &self.reduce_params, AREA_BAND)
        )?;
        Ok( AreaTotals { cropland_m2, flooded_cropland_m2 } )
    }
}

#[derive(Debug,Clone,Serialize)]
pub struct AnalysisResult {
    pub plan: FloodAnalysis,
    pub pre_flood_scenes: usize,
    pub during_flood_scenes: usize,
    pub areas: AreaTotals,
    pub estimate: LossEstimate,
}

/// load the study area, build the plan and evaluate it. Windows without scenes are not an error, they
/// just produce empty composites and hence no flooded area
pub async fn run_analysis (backend: &dyn GeoBackend, config: &FloodConfig)->Result<AnalysisResult> {
    config.validate()?;

    let area = Arc::new( backend.load_study_area( &config.study_area).await?);
    info!("loaded study area {} with bounds {} ({:.2} km²)", area.id, area.bounds, multi_polygon_area_m2( &area.geometry) / 1e6);

    let plan = FloodAnalysis::build( config, &area);

    let (pre_flood_scenes, during_flood_scenes) = plan.count_scenes( backend).await?;
    debug!("{} pre-flood scenes in {} days, {} during-flood scenes in {} days",
           pre_flood_scenes, config.pre_flood.num_days(), during_flood_scenes, config.during_flood.num_days());
    if pre_flood_scenes == 0 {
        warn!("no SAR scenes in pre-flood window {}, composite is empty", config.pre_flood);
    }
    if during_flood_scenes == 0 {
        warn!("no SAR scenes in during-flood window {}, flood mask is empty", config.during_flood);
    }

    let areas = plan.reduce_areas( backend).await?;
    info!("cropland: {} m², flooded cropland: {} m²", areas.cropland_m2, areas.flooded_cropland_m2);

    let estimate = LossEstimate::new( &areas, config.usd_per_ha);
    Ok( AnalysisResult { plan, pre_flood_scenes, during_flood_scenes, areas, estimate } )
}
