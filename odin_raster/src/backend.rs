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

use std::collections::BTreeMap;
use async_trait::async_trait;

use crate::{AssetId, CollectionExpr, ImageExpr, Image, ReduceRegionParams, StudyArea, errors::{Result, OdinRasterError}};

/// the narrow interface to whatever evaluates our image algebra. Expressions are built locally and
/// only executed when one of the evaluating methods is called
#[async_trait]
pub trait GeoBackend: Send + Sync {

    /// load a stored vector asset as study area
    async fn load_study_area (&self, asset: &AssetId)->Result<StudyArea>;

    /// number of images in a (filtered) collection
    async fn collection_size (&self, collection: &CollectionExpr)->Result<usize>;

    /// evaluate a region reduction. The result maps band names to reduced values
    async fn reduce_region (&self, image: &ImageExpr, params: &ReduceRegionParams)->Result<BTreeMap<String,f64>>;

    /// materialize an image (e.g. for rendering)
    async fn compute_image (&self, image: &ImageExpr)->Result<Image>;
}

/// reduce a region and return the value of a single band
pub async fn reduce_band (backend: &dyn GeoBackend, image: &ImageExpr, params: &ReduceRegionParams, band: &str)->Result<f64> {
    let values = backend.reduce_region( image, params).await?;
    values.get(band).copied().ok_or_else( || OdinRasterError::BandNotFound( band.to_string()))
}
