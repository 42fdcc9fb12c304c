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

//! the map view model. A [MapView] is a plain value that describes what to show (basemap, camera, ordered
//! layers and legend). It is built once from the analysis plan and then handed to a [crate::render::ViewRenderer]

use serde::Serialize;
use odin_common::geo::GeoRect;
use odin_raster::{AreaRef, ImageExpr};
use crate::{
    config::{Basemap, Stretch, ViewConfig},
    pipeline::FloodAnalysis
};

pub const STUDY_AREA_LAYER: &str = "Study Area Boundary";
pub const PRE_FLOOD_LAYER: &str = "Pre-Flood VV (Sentinel-1)";
pub const DURING_FLOOD_LAYER: &str = "During-Flood VV (Sentinel-1)";
pub const FLOOD_LAYER: &str = "Flooded Areas";
pub const CROPLAND_LAYER: &str = "Cropland (2020)";
pub const FLOODED_CROPLAND_LAYER: &str = "Flooded Cropland";

pub const LEGEND_TITLE: &str = "Legend";

#[derive(Debug,Clone,Serialize)]
pub struct MapView {
    pub basemap: Basemap,
    pub camera: Camera,
    /// in drawing order (first is bottom)
    pub layers: Vec<MapLayer>,
    pub legend: Legend,
}

/// centered on the study area
#[derive(Debug,Clone,Serialize)]
pub struct Camera {
    pub lon: f64,
    pub lat: f64,
    pub bounds: GeoRect,
    pub zoom: u8,
}

#[derive(Debug,Clone,Serialize)]
pub struct MapLayer {
    pub name: String,
    pub source: LayerSource,
    pub style: LayerStyle,
    pub visible: bool,
}

#[derive(Debug,Clone,Serialize)]
pub enum LayerSource {
    /// boundary of the study area, with its geometry for renderers that draw vectors
    Outline { area: AreaRef, geometry: geojson::Geometry },
    Image(ImageExpr),
}

#[derive(Debug,Clone,Serialize)]
pub enum LayerStyle {
    Outline { color: String, fill_color: String, width: u32 },
    /// grayscale between min and max
    Stretch(Stretch),
    /// defined pixels in (a ramp of) the given colors
    Palette(Vec<String>),
}

/* #region legend ************************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
pub enum PanelPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// CSS like style attributes of the legend panel
#[derive(Debug,Clone,Serialize)]
pub struct PanelStyle {
    pub position: PanelPosition,
    pub margin: String,
    pub background_color: String,
    pub border: String,
    pub padding: String,
    pub font_size: String,
    pub font_weight: String,
}

impl Default for PanelStyle {
    fn default() -> Self {
        PanelStyle {
            position: PanelPosition::TopRight,
            margin: "10px".to_string(),
            background_color: "00000000".to_string(), // transparent, no box
            border: "none".to_string(),
            padding: "0px".to_string(),
            font_size: "14px".to_string(),
            font_weight: "bold".to_string(),
        }
    }
}

#[derive(Debug,Clone,Serialize)]
pub struct LabelStyle {
    pub margin: String,
    pub color: String,
    #[serde(skip_serializing_if = "odin_common::is_none")]
    pub font_weight: Option<String>,
}

#[derive(Debug,Clone,Serialize)]
pub struct SwatchStyle {
    pub padding: String,
    pub margin: String,
    pub width: String,
    pub height: String,
}

impl Default for SwatchStyle {
    fn default() -> Self {
        SwatchStyle {
            padding: "8px".to_string(),
            margin: "0 8px 0 0".to_string(),
            width: "30px".to_string(),
            height: "15px".to_string(),
        }
    }
}

/// a color swatch followed by a label, laid out horizontally
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct LegendRow {
    pub color: String,
    pub label: String,
}

#[derive(Debug,Clone,Serialize)]
pub struct Legend {
    pub title: String,
    pub title_style: LabelStyle,
    pub style: PanelStyle,
    pub swatch: SwatchStyle,
    pub row_margin: String,
    pub label_color: String,
    pub rows: Vec<LegendRow>,
    /// position of the panel among the widgets of the map root container (0: inserted as first element)
    pub root_index: usize,
}

/// the color key. This does not depend on analysis results - there are always the same three rows
pub fn build_legend (config: &ViewConfig)->Legend {
    let row = |color: &String, label: &str| LegendRow { color: color.clone(), label: label.to_string() };

    Legend {
        title: LEGEND_TITLE.to_string(),
        title_style: LabelStyle { margin: "0 0 8px 0".to_string(), color: "black".to_string(), font_weight: Some("bold".to_string()) },
        style: PanelStyle::default(),
        swatch: SwatchStyle::default(),
        row_margin: "2px 0".to_string(),
        label_color: "black".to_string(),
        rows: vec![
            row( &config.cropland_color, "Cropland"),
            row( &config.flood_color, "Flooded Zone"),
            row( &config.flooded_cropland_color, "Flooded Cropland"),
        ],
        root_index: 0,
    }
}

/* #endregion legend */

impl MapView {
    pub fn build (plan: &FloodAnalysis, config: &ViewConfig)->Self {
        let area = &plan.study_area;
        let center = area.bounds.center();
        let camera = Camera { lon: center.x, lat: center.y, bounds: area.bounds, zoom: config.zoom };

        let image_layer = |name: &str, expr: &ImageExpr, style: LayerStyle| MapLayer {
            name: name.to_string(),
            source: LayerSource::Image( expr.clone()),
            style,
            visible: true
        };
        let palette = |color: &String| LayerStyle::Palette( vec![color.clone()]);

        let layers = vec![
            MapLayer {
                name: STUDY_AREA_LAYER.to_string(),
                source: LayerSource::Outline { area: area.clone(), geometry: area.geojson() },
                style: LayerStyle::Outline { color: config.outline_color.clone(), fill_color: "00000000".to_string(), width: config.outline_width },
                visible: true
            },
            image_layer( PRE_FLOOD_LAYER, &plan.pre_flood, LayerStyle::Stretch( config.sar_stretch)),
            image_layer( DURING_FLOOD_LAYER, &plan.during_flood, LayerStyle::Stretch( config.sar_stretch)),
            image_layer( FLOOD_LAYER, &plan.flood_mask, palette( &config.flood_color)),
            image_layer( CROPLAND_LAYER, &plan.cropland, palette( &config.cropland_color)),
            image_layer( FLOODED_CROPLAND_LAYER, &plan.flooded_cropland, palette( &config.flooded_cropland_color)),
        ];

        MapView { basemap: config.basemap, camera, layers, legend: build_legend( config) }
    }

    pub fn layer_names (&self)->Vec<&str> {
        self.layers.iter().map( |l| l.name.as_str()).collect()
    }

    pub fn layer (&self, name: &str)->Option<&MapLayer> {
        self.layers.iter().find( |l| l.name == name)
    }
}
