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

use std::fmt;
use serde::{Serialize,Deserialize};
use odin_common::M2_PER_HECTARE;

#[inline]
pub fn m2_to_hectares (m2: f64)->f64 { m2 / M2_PER_HECTARE }

/// ecosystem service value lost on the given flooded area
#[inline]
pub fn loss_usd (flooded_ha: f64, usd_per_ha: f64)->f64 { flooded_ha * usd_per_ha }

/// results of the two area reductions (m²)
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct AreaTotals {
    pub cropland_m2: f64,
    pub flooded_cropland_m2: f64,
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct LossEstimate {
    pub total_ha: f64,
    pub flooded_ha: f64,
    pub remaining_ha: f64,
    pub usd_per_ha: f64,
    pub loss_usd: f64,
}

impl LossEstimate {
    pub fn new (areas: &AreaTotals, usd_per_ha: f64)->Self {
        let total_ha = m2_to_hectares( areas.cropland_m2);
        let flooded_ha = m2_to_hectares( areas.flooded_cropland_m2);

        LossEstimate {
            total_ha,
            flooded_ha,
            remaining_ha: total_ha - flooded_ha,
            usd_per_ha,
            loss_usd: loss_usd( flooded_ha, usd_per_ha)
        }
    }
}

impl fmt::Display for LossEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Cropland Area (ha): {}", self.total_ha)?;
        writeln!(f, "Flooded Cropland Area (ha): {}", self.flooded_ha)?;
        writeln!(f, "Remaining Cropland (ha): {}", self.remaining_ha)?;
        write!(f, "Ecosystem Service Value Lost (USD): {}", self.loss_usd)
    }
}
