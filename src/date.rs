// Copyright 2014-2015 Galen Clark Haynes
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Rust XML-RPC library

//! Text codec for the `dateTime.iso8601` scalar.
//!
//! XML-RPC dates use the compact form `YYYYMMDDTHH:MM:SS`, without a
//! timezone designator. Encoding and decoding work on the calendar
//! fields as given; no timezone conversion is performed.

use time::macros::datetime;
use time::{Date, Month, PrimitiveDateTime, Time};

/// Zero timestamp used for empty or undecodable `dateTime.iso8601`
/// elements.
pub const EPOCH: PrimitiveDateTime = datetime!(1970-01-01 0:00);

/// Encodes a timestamp into `YYYYMMDDTHH:MM:SS`, zero padded.
pub fn encode(datetime: &PrimitiveDateTime) -> String {
    format!(
        "{:04}{:02}{:02}T{:02}:{:02}:{:02}",
        datetime.year(),
        u8::from(datetime.month()),
        datetime.day(),
        datetime.hour(),
        datetime.minute(),
        datetime.second()
    )
}

/// Decodes `YYYYMMDDTHH:MM:SS` back into a timestamp.
///
/// Fields are read from fixed offsets: four digits of year, two of
/// month, two of day, then hour, minute and second after a
/// one-character separator. Input of any other width, or with
/// out-of-range components, yields `None`.
pub fn decode(text: &str) -> Option<PrimitiveDateTime> {
    let year: i32 = text.get(0..4)?.parse().ok()?;
    let month = Month::try_from(text.get(4..6)?.parse::<u8>().ok()?).ok()?;
    let day: u8 = text.get(6..8)?.parse().ok()?;
    let hour: u8 = text.get(9..11)?.parse().ok()?;
    let minute: u8 = text.get(12..14)?.parse().ok()?;
    let second: u8 = text.get(15..17)?.parse().ok()?;

    let date = Date::from_calendar_date(year, month, day).ok()?;
    let time = Time::from_hms(hour, minute, second).ok()?;
    Some(PrimitiveDateTime::new(date, time))
}
