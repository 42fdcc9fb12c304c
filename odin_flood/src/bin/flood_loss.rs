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

use std::path::PathBuf;
use tokio;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use odin_common::fs::{set_filepath_contents, store_config_path};
use odin_raster::MemBackend;
use odin_flood::{run_analysis, FloodConfig, JsonViewWriter, MapView, PngRenderer, ViewRenderer};

#[derive(Parser, Debug)]
#[command(version, about = "flood_loss - estimate flooded cropland area and ecosystem service value loss")]
pub struct Args {
    /// RON config file (defaults are used if not set)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// directory with the catalog.json of the raster/vector assets to use
    #[arg(long)]
    pub catalog: PathBuf,

    /// write the map view model as JSON
    #[arg(long)]
    pub view: Option<PathBuf>,

    /// render the map layers into a PNG
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// write the (unevaluated) analysis plan as JSON
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// store the effective config as RON (e.g. to create a template from the defaults)
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FloodConfig::load( path)?,
        None => FloodConfig::default()
    };
    if let Some(path) = &args.save_config {
        store_config_path( &config, path)?;
    }

    let backend = MemBackend::open_catalog( &args.catalog)?;

    let result = run_analysis( &backend, &config).await?;
    println!("{}", result.estimate);

    if let Some(path) = &args.plan {
        set_filepath_contents( path, serde_json::to_string_pretty( &result.plan)?.as_bytes())?;
    }

    let view = MapView::build( &result.plan, &config.view);
    if let Some(path) = &args.view {
        JsonViewWriter::new( path).render( &view, &backend).await?;
    }
    if let Some(path) = &args.png {
        PngRenderer::new( path).render( &view, &backend).await?;
    }

    Ok(())
}
