// Copyright 2014-2015 Galen Clark Haynes
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Rust XML-RPC library

//! The marshal/unmarshal core: the [`Value`] data model, wire type
//! classification, the [`Encoder`] that renders values as XML-RPC
//! markup, and the streaming [`Builder`] that reconstructs values from
//! a `methodResponse` document.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;
use std::mem;
use std::ops::Index;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use time::PrimitiveDateTime;
use xml::escape::escape_str_pcdata;
use xml::reader::{EventReader, ParserConfig, XmlEvent};

use crate::date;

/// Represents an XML-RPC data value.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Int(i32),
    Double(f64),
    Boolean(bool),
    String(String),
    DateTime(PrimitiveDateTime),
    Base64(Vec<u8>),
    Array(self::Array),
    Struct(self::Struct),
}

pub type Array = Vec<Value>;
pub type Struct = BTreeMap<String, Value>;

/// The wire type tag of an XML-RPC value, one per [`Value`] variant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WireTag {
    Int,
    Double,
    Boolean,
    String,
    DateTime,
    Base64,
    Array,
    Struct,
}

impl WireTag {
    /// The element name carrying this type on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            WireTag::Int => "int",
            WireTag::Double => "double",
            WireTag::Boolean => "boolean",
            WireTag::String => "string",
            WireTag::DateTime => "dateTime.iso8601",
            WireTag::Base64 => "base64",
            WireTag::Array => "array",
            WireTag::Struct => "struct",
        }
    }

    /// Maps an element name back to its tag. `i4` is the protocol's
    /// alternate spelling of `int`.
    pub fn from_name(name: &str) -> Option<WireTag> {
        match name {
            "int" | "i4" => Some(WireTag::Int),
            "double" => Some(WireTag::Double),
            "boolean" => Some(WireTag::Boolean),
            "string" => Some(WireTag::String),
            "dateTime.iso8601" => Some(WireTag::DateTime),
            "base64" => Some(WireTag::Base64),
            "array" => Some(WireTag::Array),
            "struct" => Some(WireTag::Struct),
            _ => None,
        }
    }

    /// The zero value of this type: empty string/array/struct, `0`,
    /// `0.0`, `false`, empty bytes, the Unix epoch for dates. Used for
    /// elements with no text child.
    pub fn zero(&self) -> Value {
        match self {
            WireTag::Int => Value::Int(0),
            WireTag::Double => Value::Double(0.0),
            WireTag::Boolean => Value::Boolean(false),
            WireTag::String => Value::String(String::new()),
            WireTag::DateTime => Value::DateTime(date::EPOCH),
            WireTag::Base64 => Value::Base64(Vec::new()),
            WireTag::Array => Value::Array(Array::new()),
            WireTag::Struct => Value::Struct(Struct::new()),
        }
    }
}

impl fmt::Display for WireTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns the wire type tag of this value.
    ///
    /// Classification is total: the tag is fixed when the value is
    /// constructed, so every value maps to exactly one tag.
    pub fn tag(&self) -> WireTag {
        match self {
            Value::Int(_) => WireTag::Int,
            Value::Double(_) => WireTag::Double,
            Value::Boolean(_) => WireTag::Boolean,
            Value::String(_) => WireTag::String,
            Value::DateTime(_) => WireTag::DateTime,
            Value::Base64(_) => WireTag::Base64,
            Value::Array(_) => WireTag::Array,
            Value::Struct(_) => WireTag::Struct,
        }
    }

    /// If the value is a Struct, returns the value associated with the
    /// provided member name. Otherwise, returns None.
    pub fn find<'a>(&'a self, key: &str) -> Option<&'a Value> {
        match self {
            Value::Struct(members) => members.get(key),
            _ => None,
        }
    }

    /// Attempts to get a nested value for each member name in `keys`.
    /// If any name is found not to exist, find_path will return None.
    /// Otherwise, it will return the value associated with the final name.
    pub fn find_path<'a>(&'a self, keys: &[&str]) -> Option<&'a Value> {
        let mut target = self;
        for key in keys.iter() {
            match target.find(key) {
                Some(t) => target = t,
                None => return None,
            }
        }
        Some(target)
    }

    /// If the value is a Struct, performs a depth-first search until a
    /// value associated with the provided member name is found. If no
    /// value is found or the value is not a Struct, returns None.
    pub fn search<'a>(&'a self, key: &str) -> Option<&'a Value> {
        match self {
            Value::Struct(members) => match members.get(key) {
                Some(value) => Some(value),
                None => {
                    for (_, v) in members.iter() {
                        if let Some(found) = v.search(key) {
                            return Some(found);
                        }
                    }
                    None
                }
            },
            _ => None,
        }
    }

    /// Returns true if the value is a Struct. Returns false otherwise.
    pub fn is_struct(&self) -> bool {
        self.as_struct().is_some()
    }

    /// If the value is a Struct, returns the associated map.
    /// Returns None otherwise.
    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Returns true if the value is an Array. Returns false otherwise.
    pub fn is_array(&self) -> bool {
        self.as_array().is_some()
    }

    /// If the value is an Array, returns the associated vector.
    /// Returns None otherwise.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns true if the value is a String. Returns false otherwise.
    pub fn is_string(&self) -> bool {
        self.as_string().is_some()
    }

    /// If the value is a String, returns the associated str.
    /// Returns None otherwise.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if the value is an Int or a Double.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Double(_))
    }

    /// If the value is an Int, returns it. Returns None otherwise.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a number, returns or casts it to an f64.
    /// Returns None otherwise.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns true if the value is a Boolean. Returns false otherwise.
    pub fn is_boolean(&self) -> bool {
        self.as_boolean().is_some()
    }

    /// If the value is a Boolean, returns the associated bool.
    /// Returns None otherwise.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a DateTime, returns the associated timestamp.
    /// Returns None otherwise.
    pub fn as_datetime(&self) -> Option<PrimitiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// If the value is Base64 binary data, returns the raw bytes.
    /// Returns None otherwise.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Base64(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl<'a> Index<&'a str> for Value {
    type Output = Value;

    fn index(&self, idx: &'a str) -> &Value {
        self.find(idx).unwrap()
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, idx: usize) -> &Value {
        match self {
            Value::Array(elements) => elements.index(idx),
            _ => panic!("can only index a value with usize if it is an array"),
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value as its XML-RPC markup fragment.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Encoder::new(f).emit_value(self)
    }
}

/// A trait for converting native values to XML-RPC values.
pub trait ToValue {
    /// Converts `self` into a [`Value`].
    fn to_value(&self) -> Value;
}

macro_rules! to_value_impl_int {
    ($($t:ty),+) => (
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                // XML-RPC only supports a 4-byte signed integer;
                // out-of-range values saturate.
                Value::Int((*self).try_into().unwrap_or_else(|_| {
                    if *self > 0 as $t { i32::MAX } else { i32::MIN }
                }))
            }
        })+
    )
}

to_value_impl_int! { isize, i8, i16, i32, i64 }
to_value_impl_int! { usize, u8, u16, u32, u64 }

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        (*self as f64).to_value()
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Double(*self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for PrimitiveDateTime {
    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }
}

impl<A: ToValue> ToValue for [A] {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(|elt| elt.to_value()).collect())
    }
}

impl<A: ToValue> ToValue for Vec<A> {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(|elt| elt.to_value()).collect())
    }
}

impl<A: ToValue> ToValue for BTreeMap<String, A> {
    fn to_value(&self) -> Value {
        let mut members = Struct::new();
        for (key, value) in self.iter() {
            members.insert(key.clone(), value.to_value());
        }
        Value::Struct(members)
    }
}

impl<A: ToValue> ToValue for HashMap<String, A> {
    fn to_value(&self) -> Value {
        let mut members = Struct::new();
        for (key, value) in self.iter() {
            members.insert(key.clone(), value.to_value());
        }
        Value::Struct(members)
    }
}

/// Shortcut function to render a value as an XML-RPC markup fragment.
///
/// Scalars render as `<TAG>text</TAG>`; the enclosing `<value>` wrapper
/// is emitted by the surrounding array, struct member or parameter.
pub fn encode(value: &Value) -> String {
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = Encoder::new(&mut s).emit_value(value);
    s
}

/// A structure for rendering XML-RPC markup to a writer.
pub struct Encoder<'a> {
    writer: &'a mut (dyn fmt::Write + 'a),
}

impl<'a> Encoder<'a> {
    /// Creates a new XML-RPC encoder whose output will be written to the
    /// writer specified.
    pub fn new(writer: &'a mut (dyn fmt::Write + 'a)) -> Encoder<'a> {
        Encoder { writer }
    }

    /// Recursively renders a value; depth equals the nesting depth of
    /// the value tree.
    pub fn emit_value(&mut self, value: &Value) -> fmt::Result {
        match value {
            Value::Int(v) => write!(self.writer, "<int>{}</int>", v),
            Value::Double(v) => write!(self.writer, "<double>{}</double>", v),
            Value::Boolean(v) => write!(self.writer, "<boolean>{}</boolean>", *v as u8),
            Value::String(v) => {
                write!(self.writer, "<string>{}</string>", escape_str_pcdata(v))
            }
            Value::DateTime(v) => write!(
                self.writer,
                "<dateTime.iso8601>{}</dateTime.iso8601>",
                date::encode(v)
            ),
            Value::Base64(v) => {
                write!(self.writer, "<base64>{}</base64>", STANDARD.encode(v))
            }
            Value::Array(elements) => self.emit_array(elements),
            Value::Struct(members) => self.emit_struct(members),
        }
    }

    fn emit_array(&mut self, elements: &[Value]) -> fmt::Result {
        write!(self.writer, "<array><data>")?;
        for element in elements {
            write!(self.writer, "<value>")?;
            self.emit_value(element)?;
            write!(self.writer, "</value>")?;
        }
        write!(self.writer, "</data></array>")
    }

    fn emit_struct(&mut self, members: &Struct) -> fmt::Result {
        write!(self.writer, "<struct>")?;
        for (name, value) in members {
            write!(
                self.writer,
                "<member><name>{}</name><value>",
                escape_str_pcdata(name)
            )?;
            self.emit_value(value)?;
            write!(self.writer, "</value></member>")?;
        }
        write!(self.writer, "</struct>")
    }
}

/// Raw outcome of scanning a `methodResponse` document: the top-level
/// values in document order, and whether a `<fault>` element was seen.
#[derive(Debug)]
pub struct RawResponse {
    pub params: Vec<Value>,
    pub fault: bool,
}

/// Shortcut function to scan a `methodResponse` document.
pub fn parse_response(body: &str) -> Result<RawResponse, xml::reader::Error> {
    Builder::new(body.as_bytes()).build()
}

/// One container under construction. Frames own their children; a
/// pending member name, once read from `<name>`, waits here until the
/// member's value completes.
enum Frame {
    Array(Array),
    Struct(Struct, Option<String>),
}

/// A streaming builder reconstructing values from a `methodResponse`
/// event stream in a single pass.
///
/// Values accumulate into the most recently opened open container; when
/// a container closes, its frame is popped and attached to the parent
/// frame (or surfaced as a top-level parameter). All state lives in the
/// builder itself, so independent parses never share anything.
pub struct Builder<R: Read> {
    reader: EventReader<R>,
    stack: Vec<Frame>,
    params: Vec<Value>,
    scalar: Option<WireTag>,
    text: String,
    in_name: bool,
    fault: bool,
}

impl<R: Read> Builder<R> {
    /// Create a builder reading XML from `source`.
    pub fn new(source: R) -> Builder<R> {
        let config = ParserConfig::new().cdata_to_characters(true);
        Builder {
            reader: EventReader::new_with_config(source, config),
            stack: Vec::new(),
            params: Vec::new(),
            scalar: None,
            text: String::new(),
            in_name: false,
            fault: false,
        }
    }

    /// Consumes the event stream and produces the document's top-level
    /// values.
    ///
    /// The builder is tolerant of structurally odd but well-formed
    /// input: text under an untyped element is skipped, undecodable
    /// scalar text degrades to the tag's zero value, and a member value
    /// with no preceding `<name>` is dropped.
    pub fn build(mut self) -> Result<RawResponse, xml::reader::Error> {
        loop {
            match self.reader.next()? {
                XmlEvent::StartElement { name, .. } => self.open_element(&name.local_name),
                XmlEvent::EndElement { name } => self.close_element(&name.local_name),
                XmlEvent::Characters(s) | XmlEvent::Whitespace(s) => self.characters(s),
                XmlEvent::EndDocument => break,
                _ => {}
            }
        }
        Ok(RawResponse {
            params: self.params,
            fault: self.fault,
        })
    }

    fn open_element(&mut self, tag: &str) {
        match tag {
            "fault" => self.fault = true,
            "name" => {
                self.in_name = true;
                // A fresh <name> starts a fresh member name, even when
                // the previous member never produced a value.
                if let Some(Frame::Struct(_, pending)) = self.stack.last_mut() {
                    *pending = None;
                }
            }
            "array" => self.stack.push(Frame::Array(Array::new())),
            "struct" => self.stack.push(Frame::Struct(Struct::new(), None)),
            _ => {
                // Scalar tags open a value awaiting its text child.
                // The remaining document structure (methodResponse,
                // params, param, value, data, member) carries no state.
                if let Some(wire_tag) = WireTag::from_name(tag) {
                    self.scalar = Some(wire_tag);
                    self.text.clear();
                }
            }
        }
    }

    fn characters(&mut self, s: String) {
        if self.in_name {
            // Names accumulate like scalar text; the reader may split
            // one text run into several events.
            if let Some(Frame::Struct(_, pending)) = self.stack.last_mut() {
                pending.get_or_insert_with(String::new).push_str(&s);
            }
        } else if self.scalar.is_some() {
            self.text.push_str(&s);
        }
        // Text anywhere else (between structural elements, or under an
        // untyped element) is discarded.
    }

    fn close_element(&mut self, tag: &str) {
        match tag {
            "name" => self.in_name = false,
            "array" | "struct" => {
                if let Some(frame) = self.stack.pop() {
                    let value = match frame {
                        Frame::Array(elements) => Value::Array(elements),
                        Frame::Struct(members, _) => Value::Struct(members),
                    };
                    self.attach(value);
                }
            }
            _ => {
                if let Some(wire_tag) = self.scalar.take() {
                    if WireTag::from_name(tag) == Some(wire_tag) {
                        let text = mem::take(&mut self.text);
                        self.attach(scalar_value(wire_tag, &text));
                    } else {
                        // Not the scalar's closing tag; leave it open.
                        self.scalar = Some(wire_tag);
                    }
                }
            }
        }
    }

    /// Routes a completed value into the innermost open container, or
    /// surfaces it as a top-level parameter when no container is open.
    fn attach(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(Frame::Array(elements)) => elements.push(value),
            Some(Frame::Struct(members, pending)) => {
                // A member value with no recorded name has nowhere to
                // go; it is dropped rather than invented.
                if let Some(name) = pending.take() {
                    members.insert(name, value);
                }
            }
            None => self.params.push(value),
        }
    }
}

/// Converts scalar element text by wire tag. Undecodable text degrades
/// to the tag's zero value instead of failing the parse.
///
/// String text is kept verbatim, whitespace included. Every other tag
/// trims first, so document indentation around the data does not
/// corrupt it.
fn scalar_value(tag: WireTag, text: &str) -> Value {
    let trimmed = text.trim();
    match tag {
        WireTag::Int => trimmed
            .parse()
            .map(Value::Int)
            .unwrap_or_else(|_| tag.zero()),
        WireTag::Double => trimmed
            .parse()
            .map(Value::Double)
            .unwrap_or_else(|_| tag.zero()),
        WireTag::Boolean => Value::Boolean(trimmed == "1"),
        WireTag::String => Value::String(text.to_string()),
        WireTag::DateTime => date::decode(trimmed)
            .map(Value::DateTime)
            .unwrap_or_else(|| tag.zero()),
        WireTag::Base64 => STANDARD
            .decode(trimmed)
            .map(Value::Base64)
            .unwrap_or_else(|_| tag.zero()),
        WireTag::Array | WireTag::Struct => tag.zero(),
    }
}
