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

use odin_common::{define_error, OdinCommonError};

pub type Result<T> = std::result::Result<T, OdinRasterError>;

define_error!{ pub OdinRasterError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    JsonError(#[from] serde_json::Error) : "JSON error: {0}",
    GeoJsonError(#[from] geojson::Error) : "GeoJSON error: {0}",
    TiffError(#[from] tiff::TiffError) : "TIFF error: {0}",
    CommonError(#[from] OdinCommonError) : "{0}",
    JoinError(#[from] tokio::task::JoinError) : "evaluation task failed: {0}",
    AssetNotFound(String) : "asset not found: {0}",
    BandNotFound(String) : "band not found: {0}",
    TooManyPixels(u64,u64) : "region reduction needs {0} pixels, exceeds maximum of {1}",
    InvalidGeometry(String) : "invalid geometry: {0}",
    InvalidGrid(String) : "invalid grid: {0}",
    OpFailed(String) : "operation failed: {0}"
}

pub fn op_failed<S: ToString> (msg: S)->OdinRasterError {
    OdinRasterError::OpFailed(msg.to_string())
}

pub fn asset_not_found<S: ToString> (id: S)->OdinRasterError {
    OdinRasterError::AssetNotFound(id.to_string())
}

pub fn invalid_grid<S: ToString> (msg: S)->OdinRasterError {
    OdinRasterError::InvalidGrid(msg.to_string())
}
