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

use std::{path::{Path,PathBuf}, str::FromStr};
use async_trait::async_trait;
use futures::future::try_join_all;
use image::{Rgba, RgbaImage, imageops};
use tracing::{debug,info};

use odin_common::{MinMaxAvg, fs::{ensure_parent_dir, set_filepath_contents}, geo::ring_segments};
use odin_raster::{GeoBackend, Grid, Image, ImageExpr, StudyArea, ops::area_mask};
use crate::{
    config::Stretch,
    view::{Legend, LayerSource, LayerStyle, MapLayer, MapView, PanelPosition},
    errors::{Result, OdinFloodError, render_error}
};

/* #region colors ************************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb (r: u8, g: u8, b: u8)->Self { Color { r, g, b, a: 255 } }

    /// CSS color name or `RRGGBB` / `RRGGBBAA` hex string (with optional leading '#')
    pub fn parse (s: &str)->Result<Self> {
        let s = s.trim();
        let c = match s.to_ascii_lowercase().as_str() {
            "black" => Color::rgb( 0, 0, 0),
            "white" => Color::rgb( 255, 255, 255),
            "red" => Color::rgb( 255, 0, 0),
            "lime" => Color::rgb( 0, 255, 0),
            "green" => Color::rgb( 0, 128, 0),
            "blue" => Color::rgb( 0, 0, 255),
            "yellow" => Color::rgb( 255, 255, 0),
            "cyan" => Color::rgb( 0, 255, 255),
            "magenta" => Color::rgb( 255, 0, 255),
            "orange" => Color::rgb( 255, 165, 0),
            "gray" | "grey" => Color::rgb( 128, 128, 128),
            "transparent" => Color::TRANSPARENT,
            _ => return Self::parse_hex( s)
        };
        Ok(c)
    }

    fn parse_hex (s: &str)->Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all( |b| b.is_ascii_hexdigit()) {
            return Err( OdinFloodError::InvalidColor( s.to_string()))
        }

        let byte = |i: usize| u8::from_str_radix( &hex[i..i+2], 16).map_err( |_| OdinFloodError::InvalidColor( s.to_string()));
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok( Color { r: byte(0)?, g: byte(2)?, b: byte(4)?, a } )
    }

    pub fn lerp (&self, other: &Color, t: f64)->Color {
        let t = t.clamp( 0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color { r: mix(self.r, other.r), g: mix(self.g, other.g), b: mix(self.b, other.b), a: mix(self.a, other.a) }
    }

    #[inline]
    pub fn rgba (&self)->Rgba<u8> { Rgba([self.r, self.g, self.b, self.a]) }
}

impl FromStr for Color {
    type Err = OdinFloodError;
    fn from_str (s: &str)->Result<Self> { Color::parse(s) }
}

/// map `v` in [0,1] onto a (linear) color ramp
fn ramp_color (colors: &[Color], v: f64)->Color {
    match colors.len() {
        0 => Color::TRANSPARENT,
        1 => colors[0],
        n => {
            let x = v.clamp( 0.0, 1.0) * (n - 1) as f64;
            let i = (x.floor() as usize).min( n - 2);
            colors[i].lerp( &colors[i+1], x - i as f64)
        }
    }
}

/* #endregion colors */

/// the boundary where view models leave our process
#[async_trait]
pub trait ViewRenderer: Send + Sync {
    async fn render (&self, view: &MapView, backend: &dyn GeoBackend)->Result<()>;
}

/// store the view model itself as JSON, for clients that do their own rendering
pub struct JsonViewWriter {
    path: PathBuf,
}

impl JsonViewWriter {
    pub fn new (path: impl AsRef<Path>)->Self { JsonViewWriter { path: path.as_ref().to_path_buf() } }
}

#[async_trait]
impl ViewRenderer for JsonViewWriter {
    async fn render (&self, view: &MapView, _backend: &dyn GeoBackend)->Result<()> {
        let json = serde_json::to_string_pretty( view)?;
        set_filepath_contents( &self.path, json.as_bytes())?;
        info!("view model written to {:?}", self.path);
        Ok(())
    }
}

/// render the layers of a view into a RGBA PNG on the pixel grid of the backend. Layers are composited in
/// order, undefined pixels are transparent. There is no basemap imagery. Legend swatches are drawn last
/// (see [draw_legend])
pub struct PngRenderer {
    path: PathBuf,
}

impl PngRenderer {
    pub fn new (path: impl AsRef<Path>)->Self { PngRenderer { path: path.as_ref().to_path_buf() } }

    pub async fn render_image (&self, view: &MapView, backend: &dyn GeoBackend)->Result<RgbaImage> {
        let visible: Vec<&MapLayer> = view.layers.iter().filter( |l| l.visible).collect();

        let exprs: Vec<&ImageExpr> = visible.iter().filter_map( |l| match &l.source {
            LayerSource::Image(expr) => Some(expr),
            _ => None
        }).collect();
        let mut images = try_join_all( exprs.into_iter().map( |e| backend.compute_image(e))).await?.into_iter();

        let mut canvas: Option<(Grid,RgbaImage)> = None;
        let mut pending_outlines: Vec<&MapLayer> = Vec::new(); // outlines that come before the first image layer

        for layer in visible {
            match &layer.source {
                LayerSource::Image(_) => {
                    let img = images.next().ok_or_else( || render_error( format!("no image for layer {}", layer.name)))?;
                    let (grid, cvs) = canvas.get_or_insert_with( || (img.grid, RgbaImage::new( img.grid.cols as u32, img.grid.rows as u32)));
                    for l in pending_outlines.drain(..) {
                        imageops::overlay( cvs, &outline_layer( grid, l)?, 0, 0);
                    }
                    imageops::overlay( cvs, &image_layer( &layer.name, &img, &layer.style)?, 0, 0);
                }
                LayerSource::Outline{..} => {
                    match &mut canvas {
                        Some((grid,cvs)) => imageops::overlay( cvs, &outline_layer( grid, layer)?, 0, 0),
                        None => pending_outlines.push( layer)
                    }
                }
            }
        }

        let (_,mut cvs) = canvas.ok_or_else( || render_error( "view has no image layers"))?;
        draw_legend( &mut cvs, &view.legend)?;
        Ok(cvs)
    }
}

#[async_trait]
impl ViewRenderer for PngRenderer {
    async fn render (&self, view: &MapView, backend: &dyn GeoBackend)->Result<()> {
        let img = self.render_image( view, backend).await?;
        ensure_parent_dir( &self.path)?;
        img.save( &self.path)?;
        info!("map rendered to {:?} ({}x{})", self.path, img.width(), img.height());
        Ok(())
    }
}

fn image_layer (name: &str, img: &Image, style: &LayerStyle)->Result<RgbaImage> {
    let (rows,cols) = img.grid.shape();
    let mut out = RgbaImage::new( cols as u32, rows as u32);

    // the composite of an empty window has no bands and renders as fully transparent
    let Some((_,band)) = img.first_band() else {
        debug!("layer {name} is empty");
        return Ok(out)
    };

    let colorize: Box<dyn Fn(f64)->Color> = match style {
        LayerStyle::Stretch(Stretch{min,max}) => {
            let (min,max) = (*min,*max);
            Box::new( move |v| {
                let g = (((v - min) / (max - min)).clamp( 0.0, 1.0) * 255.0).round() as u8;
                Color::rgb( g, g, g)
            })
        }
        LayerStyle::Palette(names) => {
            let colors = names.iter().map( |c| Color::parse(c)).collect::<Result<Vec<Color>>>()?;
            if colors.is_empty() { return Err( render_error( format!("empty palette for layer {name}"))) }
            Box::new( move |v| ramp_color( &colors, v))
        }
        LayerStyle::Outline{..} => return Err( render_error( format!("outline style for image layer {name}")))
    };

    let mut stats = MinMaxAvg::new();
    for ((r,c), defined) in band.mask.indexed_iter() {
        if *defined {
            let v = band.data[(r,c)];
            stats.add( v);
            out.put_pixel( c as u32, r as u32, colorize(v).rgba());
        }
    }

    if stats.is_empty() {
        debug!("layer {name} has no defined pixels");
    } else {
        debug!("layer {name}: {} pixels, min={}, max={}, avg={}", stats.n, stats.min, stats.max, stats.avg);
    }
    Ok(out)
}

fn outline_layer (grid: &Grid, layer: &MapLayer)->Result<RgbaImage> {
    let (LayerSource::Outline{area,..}, LayerStyle::Outline{color,fill_color,width}) = (&layer.source, &layer.style) else {
        return Err( render_error( format!("not an outline layer: {}", layer.name)))
    };
    let color = Color::parse( color)?.rgba();
    let fill = Color::parse( fill_color)?;

    let mut out = RgbaImage::new( grid.cols as u32, grid.rows as u32);

    if fill.a > 0 {
        let fill = fill.rgba();
        for ((r,c), inside) in area_mask( grid, area).indexed_iter() {
            if *inside { out.put_pixel( c as u32, r as u32, fill) }
        }
    }

    // stamp discs along the ring segments (in fractional pixel coordinates)
    let radius = (*width).max(1) as f64 / 2.0;
    let to_px = |lon: f64, lat: f64| ((lon - grid.west) / grid.cell_w, (grid.north - lat) / grid.cell_h);

    for (a,b) in ring_segments( &area.geometry) {
        let (x0,y0) = to_px( a.x, a.y);
        let (x1,y1) = to_px( b.x, b.y);
        let steps = ((x1 - x0).hypot( y1 - y0) * 2.0).ceil().max(1.0) as usize;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            stamp( &mut out, x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, radius, color);
        }
    }

    Ok(out)
}

fn stamp (img: &mut RgbaImage, x: f64, y: f64, radius: f64, color: Rgba<u8>) {
    let (w,h) = (img.width() as i64, img.height() as i64);
    let (cx,cy) = (x.floor() as i64, y.floor() as i64);
    let r = radius.ceil() as i64;

    for py in (cy - r)..=(cy + r) {
        for px in (cx - r)..=(cx + r) {
            if px < 0 || py < 0 || px >= w || py >= h { continue }
            let dx = px as f64 + 0.5 - x;
            let dy = py as f64 + 0.5 - y;
            if (px == cx && py == cy) || dx*dx + dy*dy <= radius*radius {
                img.put_pixel( px as u32, py as u32, color);
            }
        }
    }
}

/* #region legend ************************************************************************************************/

/// parse a CSS pixel length ("8px" or "0")
fn css_px (s: &str)->Result<u32> {
    let s = s.trim();
    let n = s.strip_suffix("px").unwrap_or(s);
    if n != s || n == "0" {
        n.trim().parse::<u32>().map_err( |_| render_error( format!("invalid css length {s:?}")))
    } else {
        Err( render_error( format!("invalid css length {s:?}")))
    }
}

/// parse a CSS margin/padding shorthand into [top,right,bottom,left]
fn css_box (s: &str)->Result<[u32;4]> {
    let v = s.split_whitespace().map( css_px).collect::<Result<Vec<u32>>>()?;
    match v.as_slice() {
        [a] => Ok([*a,*a,*a,*a]),
        [tb,rl] => Ok([*tb,*rl,*tb,*rl]),
        [t,rl,b] => Ok([*t,*rl,*b,*rl]),
        [t,r,b,l] => Ok([*t,*r,*b,*l]),
        _ => Err( render_error( format!("invalid css box {s:?}")))
    }
}

fn fill_rect (img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for py in y..(y + h).min( img.height()) {
        for px in x..(x + w).min( img.width()) {
            img.put_pixel( px, py, color);
        }
    }
}

/// draw the color swatches of the legend panel into the given corner of `img`. Swatches are stacked
/// in row order and aligned to the panel corner. We have no font so neither the title nor the row labels
/// are drawn. Returns false if the image is too small to hold the panel
pub fn draw_legend (img: &mut RgbaImage, legend: &Legend)->Result<bool> {
    let [mt,mr,mb,ml] = css_box( &legend.style.margin)?;
    let [pt,pr,pb,pl] = css_box( &legend.style.padding)?;
    let [st,sr,sb,sl] = css_box( &legend.swatch.padding)?;
    let [rt,_,rb,_] = css_box( &legend.row_margin)?;

    // swatch backgrounds include their padding
    let sw = css_px( &legend.swatch.width)? + sl + sr;
    let sh = css_px( &legend.swatch.height)? + st + sb;
    let step = rt + sh + rb;

    let panel_w = pl + sw + pr;
    let panel_h = pt + step * legend.rows.len() as u32 + pb;
    if img.width() < ml + panel_w + mr || img.height() < mt + panel_h + mb {
        debug!("{}x{} image too small for legend", img.width(), img.height());
        return Ok(false)
    }

    let x0 = match legend.style.position {
        PanelPosition::TopLeft | PanelPosition::BottomLeft => ml,
        PanelPosition::TopRight | PanelPosition::BottomRight => img.width() - mr - panel_w,
    };
    let y0 = match legend.style.position {
        PanelPosition::TopLeft | PanelPosition::TopRight => mt,
        PanelPosition::BottomLeft | PanelPosition::BottomRight => img.height() - mb - panel_h,
    };

    let bg = Color::parse( &legend.style.background_color)?;
    if bg.a > 0 {
        fill_rect( img, x0, y0, panel_w, panel_h, bg.rgba());
    }

    for (i,row) in legend.rows.iter().enumerate() {
        let color = Color::parse( &row.color)?;
        let y = y0 + pt + i as u32 * step + rt;
        fill_rect( img, x0 + pl, y, sw, sh, color.rgba());
    }

    Ok(true)
}

/* #endregion legend */
