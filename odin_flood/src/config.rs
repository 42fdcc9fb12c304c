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

use std::path::Path;
use serde::{Serialize,Deserialize};
use strum::{AsRefStr, Display, EnumString};

use odin_common::{datetime::DateWindow, fs::load_config_path};
use odin_raster::AssetId;
use crate::{render::Color, errors::{Result, config_error}};

/// Sentinel-1 orbit direction as stored in the `orbitProperties_pass` scene property
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,AsRefStr,Display,EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrbitPass {
    Ascending,
    Descending,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,AsRefStr,Display,EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Basemap {
    Roadmap,
    Satellite,
    Hybrid,
    Terrain,
}

/// linear value range mapped onto the full display range
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Stretch {
    pub min: f64,
    pub max: f64,
}

/// parameters of the flood analysis. Units: dates are ISO `YYYY-MM-DD` with exclusive end dates,
/// the flood threshold is in dB, the reduction scale in meters and the valuation in USD per hectare
#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct FloodConfig {
    /// vector asset holding the study area boundary
    pub study_area: AssetId,

    pub sar_collection: AssetId,
    pub instrument_mode: String,
    pub orbit_pass: OrbitPass,
    /// required entry of the scene polarisation list
    pub polarisation: String,
    pub sar_band: String,

    pub pre_flood: DateWindow,
    pub during_flood: DateWindow,

    /// pixels with a during-flood median backscatter strictly below this value (dB) are flooded
    pub flood_threshold_db: f64,

    pub land_cover: AssetId,
    pub land_cover_band: String,
    pub cropland_class: u32,

    /// nominal scale of area reductions (m)
    pub scale_m: f64,
    /// reductions that need more pixels fail
    pub max_pixels: u64,

    /// ecosystem service value (USD/ha)
    pub usd_per_ha: f64,

    pub view: ViewConfig,
}

impl Default for FloodConfig {
    fn default() -> Self {
        FloodConfig {
            study_area: AssetId::new("projects/ee-dynamereki/assets/akanyaru_study_area_cell"),
            sar_collection: AssetId::new("COPERNICUS/S1_GRD"),
            instrument_mode: "IW".to_string(),
            orbit_pass: OrbitPass::Ascending,
            polarisation: "VV".to_string(),
            sar_band: "VV".to_string(),

            pre_flood: DEFAULT_PRE_FLOOD,
            during_flood: DEFAULT_DURING_FLOOD,

            flood_threshold_db: -13.0,

            land_cover: AssetId::new("ESA/WorldCover/v100/2020"),
            land_cover_band: "Map".to_string(),
            cropland_class: 40,

            scale_m: 10.0,
            max_pixels: 10_000_000_000,

            usd_per_ha: 1000.0,

            view: ViewConfig::default(),
        }
    }
}

// checked at compile time
const DEFAULT_PRE_FLOOD: DateWindow = match DateWindow::from_ymd( (2024,1,1), (2024,1,19)) {
    Some(w) => w,
    None => panic!("invalid pre-flood window")
};
const DEFAULT_DURING_FLOOD: DateWindow = match DateWindow::from_ymd( (2024,6,20), (2024,7,10)) {
    Some(w) => w,
    None => panic!("invalid during-flood window")
};

impl FloodConfig {
    /// load and validate a RON config file
    pub fn load (path: impl AsRef<Path>)->Result<Self> {
        let config: FloodConfig = load_config_path( path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate (&self)->Result<()> {
        for (name,id) in [("study_area", &self.study_area), ("sar_collection", &self.sar_collection), ("land_cover", &self.land_cover)] {
            if id.as_str().trim().is_empty() { return Err( config_error( format!("empty asset id for {name}"))) }
        }
        for (name,s) in [("instrument_mode", &self.instrument_mode), ("polarisation", &self.polarisation),
                         ("sar_band", &self.sar_band), ("land_cover_band", &self.land_cover_band)] {
            if s.trim().is_empty() { return Err( config_error( format!("empty {name}"))) }
        }

        if !self.flood_threshold_db.is_finite() {
            return Err( config_error( format!("flood threshold is not finite: {}", self.flood_threshold_db)))
        }
        if !(self.scale_m.is_finite() && self.scale_m > 0.0) {
            return Err( config_error( format!("reduction scale has to be positive: {} m", self.scale_m)))
        }
        if self.max_pixels == 0 {
            return Err( config_error( "max_pixels has to be positive"))
        }
        if !(self.usd_per_ha.is_finite() && self.usd_per_ha >= 0.0) {
            return Err( config_error( format!("invalid valuation: {} USD/ha", self.usd_per_ha)))
        }

        self.view.validate()
    }
}

/// presentation parameters. Colors are CSS color names or `RRGGBB[AA]` hex strings
#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub basemap: Basemap,
    pub zoom: u8,
    /// display range of the SAR composites (dB)
    pub sar_stretch: Stretch,

    pub outline_color: String,
    pub outline_width: u32,

    pub flood_color: String,
    pub cropland_color: String,
    pub flooded_cropland_color: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            basemap: Basemap::Satellite,
            zoom: 9,
            sar_stretch: Stretch { min: -25.0, max: 0.0 },

            outline_color: "red".to_string(),
            outline_width: 2,

            flood_color: "blue".to_string(),
            cropland_color: "yellow".to_string(),
            flooded_cropland_color: "red".to_string(),
        }
    }
}

impl ViewConfig {
    pub fn validate (&self)->Result<()> {
        let s = &self.sar_stretch;
        if !(s.min.is_finite() && s.max.is_finite() && s.min < s.max) {
            return Err( config_error( format!("invalid SAR stretch [{},{}]", s.min, s.max)))
        }
        if self.zoom > 24 {
            return Err( config_error( format!("zoom level out of range: {}", self.zoom)))
        }

        for c in [&self.outline_color, &self.flood_color, &self.cropland_color, &self.flooded_cropland_color] {
            Color::parse(c)?;
        }
        Ok(())
    }
}
