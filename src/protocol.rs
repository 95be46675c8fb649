// Copyright 2014-2015 Galen Clark Haynes
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Rust XML-RPC library

//! The outer `methodCall`/`methodResponse` document shapes around the
//! encoding core.

use std::fmt;

use crate::encoding::{self, ToValue, Value};
use crate::error::Error;

/// A method call: the method name and its ordered parameter values.
/// Immutable once built; parameters are added by chaining
/// [`Request::argument`].
#[derive(Debug)]
pub struct Request {
    method: String,
    params: Vec<Value>,
}

impl Request {
    pub fn new(method: &str) -> Request {
        Request {
            method: method.to_string(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter, consuming and returning the request so
    /// calls can be chained.
    pub fn argument<T: ToValue + ?Sized>(mut self, value: &T) -> Request {
        self.params.push(value.to_value());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Renders the complete `methodCall` document. Zero parameters
    /// yield an empty params block.
    pub fn to_xml(&self) -> String {
        let mut body = format!(
            "<?xml version=\"1.0\"?>\n\
             <methodCall><methodName>{}</methodName><params>\n",
            self.method
        );
        for param in &self.params {
            body.push_str("<param><value>");
            body.push_str(&encoding::encode(param));
            body.push_str("</value></param>\n");
        }
        body.push_str("</params></methodCall>");
        body
    }
}

/// An application-level error returned by the remote peer in place of a
/// return value.
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    pub code: i32,
    pub message: String,
}

impl Fault {
    /// Extracts code and message from a parsed fault struct. Missing or
    /// mistyped members default to `0` and the empty string; a fault
    /// that is not a struct at all is reported as unreadable.
    fn from_value(value: &Value) -> Fault {
        match value {
            Value::Struct(_) => Fault {
                code: value.find("faultCode").and_then(Value::as_int).unwrap_or(0),
                message: value
                    .find("faultString")
                    .and_then(Value::as_string)
                    .unwrap_or("")
                    .to_string(),
            },
            _ => Fault {
                code: 0,
                message: "unreadable fault response".to_string(),
            },
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fault {}: {}", self.code, self.message)
    }
}

/// The outcome of a call: the method's return value, or the fault the
/// server answered with. The two are mutually exclusive.
#[derive(Debug, PartialEq)]
pub enum Response {
    Success(Value),
    Fault(Fault),
}

impl Response {
    /// Disassembles a `methodResponse` document.
    ///
    /// The protocol allows a single `<param>`; if a peer sends several,
    /// only the first is surfaced. A document with no value at all is
    /// reported as malformed.
    pub fn parse(body: &str) -> Result<Response, Error> {
        let raw = encoding::parse_response(body)?;
        let first = raw
            .params
            .into_iter()
            .next()
            .ok_or_else(|| Error::Malformed("response carries no value".to_string()))?;
        if raw.fault {
            Ok(Response::Fault(Fault::from_value(&first)))
        } else {
            Ok(Response::Success(first))
        }
    }

    /// Returns the result value, or None for a fault response.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Response::Success(value) => Some(value),
            Response::Fault(_) => None,
        }
    }

    /// Returns the fault, or None for a successful response.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Response::Success(_) => None,
            Response::Fault(fault) => Some(fault),
        }
    }
}
