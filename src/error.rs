// Copyright 2014-2015 Galen Clark Haynes
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Rust XML-RPC library

//! Error types for XML-RPC calls.

use crate::protocol::Fault;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while performing an XML-RPC call.
///
/// A `<fault>` returned by the server is not an `Error` by itself: it is
/// a regular [`crate::Response`] outcome. Only the convenience
/// [`crate::Client::call`] path converts it into [`Error::Fault`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport collaborator could not deliver the request or
    /// obtain a response body.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body is not well-formed XML.
    #[error("invalid response XML: {0}")]
    Xml(#[from] xml::reader::Error),

    /// The response parsed as XML but lacks the expected document shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The server answered with a `<fault>` response.
    #[error("server fault {}: {}", .0.code, .0.message)]
    Fault(Fault),
}
