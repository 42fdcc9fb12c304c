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

use std::{borrow::Cow, collections::{BTreeMap,HashMap}, path::Path, sync::Arc};
use async_trait::async_trait;
use geo::MultiPolygon;
use tracing::debug;

use crate::{
    ops, AssetId, CollectionExpr, GeoBackend, Grid, Image, ImageExpr, ReduceRegionParams, Scene, SceneProperties, StudyArea,
    errors::{Result, OdinRasterError, asset_not_found}
};

/// the assets a [MemBackend] evaluates expressions on. All rasters are kept on the same working grid -
/// images stored on other grids get resampled when they are added
#[derive(Debug,Clone)]
pub struct MemCatalog {
    grid: Grid,
    areas: HashMap<AssetId,StudyArea>,
    images: HashMap<AssetId,Image>,
    collections: HashMap<AssetId,Vec<Scene>>,
}

impl MemCatalog {
    pub fn new (grid: Grid)->Self {
        MemCatalog { grid, areas: HashMap::new(), images: HashMap::new(), collections: HashMap::new() }
    }

    pub fn grid (&self)->&Grid { &self.grid }

    pub fn add_feature_collection (&mut self, id: impl Into<AssetId>, geometry: MultiPolygon<f64>)->Result<()> {
        let id = id.into();
        let area = StudyArea::new( id.clone(), geometry)?;
        self.areas.insert( id, area);
        Ok(())
    }

    pub fn add_image (&mut self, id: impl Into<AssetId>, image: Image) {
        let image = ops::resample_nearest( &image, &self.grid);
        self.images.insert( id.into(), image);
    }

    /// add an image to a collection (creating the collection if it does not exist yet)
    pub fn add_scene (&mut self, collection: impl Into<AssetId>, props: SceneProperties, image: Image) {
        let image = ops::resample_nearest( &image, &self.grid);
        self.collections.entry( collection.into()).or_default().push( Scene { props, image });
    }

    /// add an empty collection
    pub fn add_collection (&mut self, collection: impl Into<AssetId>) {
        self.collections.entry( collection.into()).or_default();
    }

    pub fn study_area (&self, id: &AssetId)->Result<&StudyArea> {
        self.areas.get(id).ok_or_else( || asset_not_found(id))
    }

    fn scenes (&self, id: &AssetId)->Result<&Vec<Scene>> {
        self.collections.get(id).ok_or_else( || asset_not_found(id))
    }

    fn image (&self, id: &AssetId)->Result<&Image> {
        self.images.get(id).ok_or_else( || asset_not_found(id))
    }

    /* #region evaluation ****************************************************************/

    /// the metadata of all scenes selected by a collection expression (without computing any pixels)
    pub fn eval_collection_props<'a> (&'a self, coll: &CollectionExpr)->Result<Vec<&'a SceneProperties>> {
        match coll {
            CollectionExpr::Load(id) => Ok( self.scenes(id)?.iter().map( |s| &s.props).collect() ),
            CollectionExpr::Filter{source,filter} => {
                let mut props = self.eval_collection_props( source)?;
                props.retain( |p| filter.matches(p));
                Ok(props)
            }
            CollectionExpr::SelectClip{source,..} => self.eval_collection_props( source)
        }
    }

    /// the scenes selected by a collection expression. Selected bands are resampled onto `grid`
    pub fn eval_collection<'a> (&'a self, coll: &CollectionExpr, grid: &Grid)->Result<Vec<(&'a SceneProperties,Cow<'a,Image>)>> {
        match coll {
            CollectionExpr::Load(id) => {
                Ok( self.scenes(id)?.iter().map( |s| (&s.props, Cow::Borrowed(&s.image))).collect() )
            }
            CollectionExpr::Filter{source,filter} => {
                let mut scenes = self.eval_collection( source, grid)?;
                scenes.retain( |(p,_)| filter.matches(p));
                Ok(scenes)
            }
            CollectionExpr::SelectClip{source,band,area} => {
                let scenes = self.eval_collection( source, grid)?;
                let mut result = Vec::with_capacity( scenes.len());
                for (props,img) in scenes {
                    let mut img = ops::resample_nearest( &ops::select( &img, band)?, grid);
                    if let Some(area) = area {
                        img = ops::clip( &img, area);
                    }
                    result.push( (props, Cow::Owned(img)) );
                }
                Ok(result)
            }
        }
    }

    /// evaluate on the working grid
    pub fn eval_image (&self, expr: &ImageExpr)->Result<Image> {
        self.eval_image_on( expr, &self.grid)
    }

    /// evaluate an image expression on the given grid. Stored rasters are nearest neighbor resampled
    pub fn eval_image_on (&self, expr: &ImageExpr, grid: &Grid)->Result<Image> {
        match expr {
            ImageExpr::Load(id) => Ok( ops::resample_nearest( self.image(id)?, grid) ),
            ImageExpr::Median(coll) => {
                let scenes = self.eval_collection( coll, grid)?;
                debug!("median of {} images", scenes.len());
                let images: Vec<Cow<Image>> = scenes.iter().map( |(_,img)| {
                    if img.grid == *grid { Cow::Borrowed(img.as_ref()) } else { Cow::Owned( ops::resample_nearest( img, grid)) }
                }).collect();
                let images: Vec<&Image> = images.iter().map( |img| img.as_ref()).collect();
                ops::median( grid, &images)
            }
            ImageExpr::Select{source,band} => ops::select( &self.eval_image_on(source, grid)?, band),
            ImageExpr::Clip{source,area} => Ok( ops::clip( &self.eval_image_on(source, grid)?, area) ),
            ImageExpr::Lt{source,threshold} => Ok( ops::lt( &self.eval_image_on(source, grid)?, *threshold) ),
            ImageExpr::EqConst{source,value} => Ok( ops::equals( &self.eval_image_on(source, grid)?, *value) ),
            ImageExpr::SelfMask(source) => Ok( ops::self_mask( &self.eval_image_on(source, grid)?) ),
            ImageExpr::UpdateMask{source,mask} => {
                ops::update_mask( &self.eval_image_on(source, grid)?, &self.eval_image_on(mask, grid)?)
            }
            ImageExpr::PixelArea => Ok( ops::pixel_area( grid) )
        }
    }

    /// reductions are evaluated on a grid with `params.scale_m` cells that covers the area bounds
    pub fn eval_reduce_region (&self, expr: &ImageExpr, params: &ReduceRegionParams)->Result<BTreeMap<String,f64>> {
        let grid = ops::reduction_grid( &params.area.bounds, params.scale_m)?;
        // check the ceiling before we compute anything
        ops::check_pixel_budget( &grid, params)?;
        debug!("reducing on {}x{} grid at {}m", grid.cols, grid.rows, params.scale_m);

        let img = self.eval_image_on( expr, &grid)?;
        ops::reduce_region( &img, params)
    }

    /* #endregion evaluation */
}

/// a [GeoBackend] that evaluates expressions over an in-memory [MemCatalog].
/// Evaluation of pixel data runs on the blocking thread pool of the tokio runtime
#[derive(Debug,Clone)]
pub struct MemBackend {
    catalog: Arc<MemCatalog>,
}

impl MemBackend {
    pub fn new (catalog: MemCatalog)->Self {
        MemBackend { catalog: Arc::new(catalog) }
    }

    /// create a backend from a catalog directory (see [crate::catalog])
    pub fn open_catalog (dir: impl AsRef<Path>)->Result<Self> {
        Ok( MemBackend::new( crate::catalog::load_catalog( dir)?) )
    }
}

#[async_trait]
impl GeoBackend for MemBackend {

    async fn load_study_area (&self, asset: &AssetId)->Result<StudyArea> {
        Ok( self.catalog.study_area( asset)?.clone() )
    }

    async fn collection_size (&self, collection: &CollectionExpr)->Result<usize> {
        Ok( self.catalog.eval_collection_props( collection)?.len() )
    }

    async fn reduce_region (&self, image: &ImageExpr, params: &ReduceRegionParams)->Result<BTreeMap<String,f64>> {
        let catalog = self.catalog.clone();
        let image = image.clone();
        let params = params.clone();
        tokio::task::spawn_blocking( move || catalog.eval_reduce_region( &image, &params)).await?
    }

    async fn compute_image (&self, image: &ImageExpr)->Result<Image> {
        let catalog = self.catalog.clone();
        let image = image.clone();
        tokio::task::spawn_blocking( move || catalog.eval_image( &image)).await?
    }
}
