// Copyright 2014-2015 Galen Clark Haynes
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Rust XML-RPC library

#![forbid(non_camel_case_types)]

//! XML-RPC client-side codec: serialization of native values into
//! `methodCall` documents and deserialization of `methodResponse`
//! documents, fault responses included.
//!
//! # What is XML-RPC?
//!
//! A remote procedure call protocol that encodes a method name and its
//! parameters/results as XML, carried over HTTP.
//!
//! Basic documentation found on Wikipedia
//! http://en.wikipedia.org/wiki/XML-RPC
//!
//! Full specification of the XML-RPC protocol is found here:
//! http://xmlrpc.scripting.com/spec.html
//!
//! Additional errata and hints can be found here:
//! http://effbot.org/zone/xmlrpc-errata.htm
//!
//! # Example
//!
//! ```no_run
//! use xmlrpc::{Client, Request, Transport};
//!
//! fn call<T: Transport>(transport: T) -> xmlrpc::Result<()> {
//!     let client = Client::new("https://rpc.example.org/", transport);
//!     let request = Request::new("domain.info").argument("example.org");
//!     let info = client.call(&request)?;
//!     println!("{:?}", info.find("date_created"));
//!     Ok(())
//! }
//! ```
//!
//! The HTTP transport itself is not part of this crate; callers plug in
//! any synchronous HTTP client through the [`Transport`] trait.

pub mod client;
pub mod date;
pub mod encoding;
pub mod error;
pub mod protocol;

pub use client::{Client, Transport};
pub use encoding::{Array, Struct, ToValue, Value, WireTag};
pub use error::{Error, Result};
pub use protocol::{Fault, Request, Response};
