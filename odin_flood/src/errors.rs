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
use odin_raster::OdinRasterError;

pub type Result<T> = std::result::Result<T, OdinFloodError>;

define_error!{ pub OdinFloodError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    ImageError(#[from] image::ImageError) : "image error: {0}",
    SerdeError(#[from] serde_json::Error) : "serialization/deserialization error: {0}",
    RasterError(#[from] OdinRasterError) : "{0}",
    CommonError(#[from] OdinCommonError) : "{0}",
    ConfigError(String) : "invalid configuration: {0}",
    InvalidColor(String) : "invalid color: {0}",
    RenderError(String) : "rendering failed: {0}",
}

pub fn config_error<S: ToString> (msg: S)->OdinFloodError {
    OdinFloodError::ConfigError(msg.to_string())
}

pub fn render_error<S: ToString> (msg: S)->OdinFloodError {
    OdinFloodError::RenderError(msg.to_string())
}
