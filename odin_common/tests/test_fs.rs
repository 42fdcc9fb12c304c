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

use serde::{Serialize,Deserialize};
use odin_common::fs::*;

#[derive(Debug,PartialEq,Serialize,Deserialize)]
struct TestConfig {
    name: String,
    threshold: f64,
}

#[test]
fn test_config_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sub").join("test.ron");

    let cfg = TestConfig { name: "test".into(), threshold: -13.0 };
    store_config_path( &cfg, &path).unwrap();
    println!("stored:\n{}", filepath_contents_as_string( &path).unwrap());

    let cfg1: TestConfig = load_config_path( &path).unwrap();
    assert_eq!( cfg, cfg1);
}

#[test]
fn test_missing_config() {
    let res: odin_common::Result<TestConfig> = load_config_path( "does/not/exist.ron");
    assert!( res.is_err());
}
