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

use std::fmt;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Serialize,Deserialize};

use crate::errors::{Result, invalid_argument};

/// parse an ISO calendar date such as "2024-06-20"
pub fn parse_date (s: &str)->Result<NaiveDate> {
    Ok( NaiveDate::parse_from_str( s.trim(), "%Y-%m-%d")? )
}

/// start of the given day in UTC
pub fn utc_midnight (date: &NaiveDate)->DateTime<Utc> {
    Utc.from_utc_datetime( &date.and_time( NaiveTime::MIN))
}

/// a half-open date interval [start,end) with day resolution.
/// Serialized as a pair of ISO date strings
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(try_from = "IsoDateWindow", into = "IsoDateWindow")]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate
}

impl DateWindow {
    pub fn new (start: NaiveDate, end: NaiveDate)->Result<Self> {
        if end > start {
            Ok( DateWindow{start,end} )
        } else {
            Err( invalid_argument( format!("empty date window {start}..{end}")) )
        }
    }

    pub fn from_iso (start: &str, end: &str)->Result<Self> {
        Self::new( parse_date(start)?, parse_date(end)?)
    }

    /// const constructor from (year,month,day) tuples. None if a date is invalid or the window is empty
    pub const fn from_ymd (start: (i32,u32,u32), end: (i32,u32,u32))->Option<Self> {
        let (Some(s), Some(e)) = (NaiveDate::from_ymd_opt( start.0, start.1, start.2), NaiveDate::from_ymd_opt( end.0, end.1, end.2)) else {
            return None
        };
        let later = end.0 > start.0 || (end.0 == start.0 && (end.1 > start.1 || (end.1 == start.1 && end.2 > start.2)));
        if later { Some( DateWindow{ start: s, end: e }) } else { None }
    }

    pub fn start (&self)->NaiveDate { self.start }
    pub fn end (&self)->NaiveDate { self.end }

    pub fn start_utc (&self)->DateTime<Utc> { utc_midnight(&self.start) }
    pub fn end_utc (&self)->DateTime<Utc> { utc_midnight(&self.end) }

    /// the end date is exclusive
    pub fn contains (&self, t: &DateTime<Utc>)->bool {
        *t >= self.start_utc() && *t < self.end_utc()
    }

    pub fn num_days (&self)->i64 { (self.end - self.start).num_days() }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

#[derive(Serialize,Deserialize)]
struct IsoDateWindow {
    start: String,
    end: String
}

impl TryFrom<IsoDateWindow> for DateWindow {
    type Error = crate::OdinCommonError;
    fn try_from (iso: IsoDateWindow)->Result<Self> {
        DateWindow::from_iso( &iso.start, &iso.end)
    }
}

impl From<DateWindow> for IsoDateWindow {
    fn from (w: DateWindow)->Self {
        IsoDateWindow {
            start: w.start.format("%Y-%m-%d").to_string(),
            end: w.end.format("%Y-%m-%d").to_string()
        }
    }
}
