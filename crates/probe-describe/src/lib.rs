//! Multi-format descriptors for routes, event listeners and callables.
//!
//! A [`Subject`] is turned into plain records by the descriptors
//! ([`route::extract`], [`listener::extract`], [`callable::normalize`]) and
//! handed to one [`Renderer`] per output format. Every renderer receives the
//! same records, so text, JSON, XML and Markdown output carry the same
//! content in the same order.
//!
//! # Architecture
//!
//! - [`dispatch::describe`]: matches the subject kind, extracts records and
//!   calls the renderer
//! - [`DescriptorHelper`]: registry of renderers keyed by [`Format`]
//! - [`Sink`]: write destination, optionally with an [`OutputStyle`]
//! - [`describe_parameters`]: container parameters, which are values rather
//!   than subjects
//!
//! # Example
//!
//! ```
//! use probe_describe::{BufferSink, DescribeOptions, DescriptorHelper, Format, Subject};
//! use probe_model::Route;
//!
//! let route = Route::builder("/hello/{name}")
//!     .default("name", "World")
//!     .build()
//!     .unwrap();
//!
//! let mut out = BufferSink::new();
//! DescriptorHelper::new()
//!     .describe(&mut out, &Subject::from(&route), &DescribeOptions::new(Format::Json))
//!     .unwrap();
//! assert!(out.as_str().contains("\"path\": \"/hello/{name}\""));
//! ```

pub mod callable;
pub mod dispatch;
mod error;
mod helper;
mod json;
pub mod listener;
mod markdown;
mod options;
mod parameter;
pub mod route;
mod sink;
mod subject;
mod table;
mod text;
pub mod util;
pub mod value;
mod xml;

pub use callable::{CallableKind, CallableRecord};
pub use dispatch::{Renderer, describe};
pub use error::DescribeError;
pub use helper::DescriptorHelper;
pub use json::JsonRenderer;
pub use listener::{ListenerEntry, ListenerGroups};
pub use markdown::MarkdownRenderer;
pub use options::{DescribeOptions, Format, JsonEncoding};
pub use parameter::{describe_parameter, describe_parameters};
pub use route::RouteRecord;
pub use sink::{
    BufferSink, IoSink, OutputStyle, Sink, StyledSink, WriteMode, section_block, title_block,
};
pub use subject::Subject;
pub use table::{Table, TableStyle};
pub use text::{TextRenderer, format_callable};
pub use value::{format_closure, format_value};
pub use xml::XmlRenderer;
