// Copyright 2014-2015 Galen Clark Haynes
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Rust XML-RPC library

//! The call path gluing request, transport and response together.
//!
//! The HTTP layer is an external collaborator: anything that can POST a
//! `text/xml` body and hand back the response body implements
//! [`Transport`]. The codec performs no retries and imposes no timeout;
//! both belong to the transport.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::protocol::{Request, Response};
use crate::Value;

/// A synchronous collaborator delivering one request body and returning
/// the raw response body.
pub trait Transport {
    /// Failures here are transport failures (network, timeout), kept
    /// distinct from protocol faults.
    fn send(
        &self,
        url: &str,
        body: &str,
    ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// An XML-RPC endpoint bound to a transport.
pub struct Client<T> {
    url: String,
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(url: &str, transport: T) -> Client<T> {
        Client {
            url: url.to_string(),
            transport,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs one call: marshal, send, unmarshal. A `<fault>` answer
    /// is a regular [`Response::Fault`] outcome, not an `Err`.
    pub fn remote_call(&self, request: &Request) -> Result<Response> {
        let body = request.to_xml();

        debug!("Send XML-RPC request to: {}", self.url);
        trace!("XML-RPC body: {}", body);

        let response_body = self
            .transport
            .send(&self.url, &body)
            .map_err(Error::Transport)?;

        trace!("Response body: {}", response_body);

        Response::parse(&response_body)
    }

    /// Like [`Client::remote_call`], but surfaces a fault response as
    /// [`Error::Fault`] so the caller gets the return value directly.
    pub fn call(&self, request: &Request) -> Result<Value> {
        match self.remote_call(request)? {
            Response::Success(value) => Ok(value),
            Response::Fault(fault) => Err(Error::Fault(fault)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Client, Transport};
    use crate::error::Error;
    use crate::protocol::Request;

    struct CannedTransport {
        body: &'static str,
    }

    impl Transport for CannedTransport {
        fn send(
            &self,
            _url: &str,
            _body: &str,
        ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.body.to_string())
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn send(
            &self,
            _url: &str,
            _body: &str,
        ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>> {
            Err("connection refused".into())
        }
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_call_returns_value() {
        init_logging();
        let transport = CannedTransport {
            body: "<?xml version=\"1.0\"?><methodResponse><params>\
                   <param><value><int>17</int></value></param>\
                   </params></methodResponse>",
        };
        let client = Client::new("https://rpc.example.org/", transport);
        assert_eq!("https://rpc.example.org/", client.url());

        let value = client.call(&Request::new("domain.count")).unwrap();
        assert_eq!(Some(17), value.as_int());
    }

    #[test]
    fn test_call_maps_fault_to_error() {
        init_logging();
        let transport = CannedTransport {
            body: "<?xml version=\"1.0\"?><methodResponse><fault><value><struct>\
                   <member><name>faultCode</name><value><int>510</int></value></member>\
                   <member><name>faultString</name><value><string>unknown method</string></value></member>\
                   </struct></value></fault></methodResponse>",
        };
        let client = Client::new("https://rpc.example.org/", transport);

        match client.call(&Request::new("no.such.method")) {
            Err(Error::Fault(fault)) => {
                assert_eq!(510, fault.code);
                assert_eq!("unknown method", fault.message);
            }
            other => panic!("expected fault error, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_failure_is_surfaced() {
        init_logging();
        let client = Client::new("https://rpc.example.org/", FailingTransport);
        match client.remote_call(&Request::new("domain.count")) {
            Err(Error::Transport(err)) => {
                assert_eq!("connection refused", err.to_string());
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
