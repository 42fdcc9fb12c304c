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

use std::fs::{self,File};
use std::io::{self,Read,Write,ErrorKind};
use std::path::{Path,PathBuf};
use serde::{Serialize,Deserialize};

use crate::io_error;
use crate::errors::Result;

/// check if dir pathname exists and is writable, try to create dir otherwise
pub fn ensure_writable_dir (path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        let md = fs::metadata(&path)?;
        if md.permissions().readonly() {
            Err(io_error!(ErrorKind::PermissionDenied, "output_dir {:?} not writable", &path))
        } else {
            Ok(())
        }

    } else {
        fs::create_dir_all(path)
    }
}

/// make sure the parent dir of a (to be created) file exists
pub fn ensure_parent_dir (path: impl AsRef<Path>) -> io::Result<()> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ensure_writable_dir(dir),
        _ => Ok(())
    }
}

pub fn filepath_contents_as_string <P: AsRef<Path>> (path: &P) -> io::Result<String> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents = String::with_capacity(len as usize);
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn filepath_contents <P: AsRef<Path>> (path: &P) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let md = file.metadata()?;
    let len = md.len();
    if len > 0 {
        let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
        file.read_to_end(&mut contents)?;
        Ok(contents)

    } else { Err(io_error!(ErrorKind::Other, "file empty: {:?}", path.as_ref())) }
}

pub fn set_filepath_contents <P: AsRef<Path>> (path: &P, new_contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let mut file = File::create(path)?;
    file.write_all(new_contents)
}

/// load a RON config from the given path
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> Deserialize<'a>, P: AsRef<Path> {
    let data = filepath_contents(&path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// store a config value as pretty printed RON (e.g. to create a template from defaults)
pub fn store_config_path<C,P> (config: &C, path: P) -> Result<()> where C: Serialize, P: AsRef<Path> {
    let s = ron::ser::to_string_pretty( config, ron::ser::PrettyConfig::default())
        .map_err(|e| crate::errors::invalid_argument(e))?;
    Ok( set_filepath_contents( &path.as_ref(), s.as_bytes())? )
}
