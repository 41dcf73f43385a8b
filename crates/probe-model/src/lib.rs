//! Read-only application model inspected by probe.
//!
//! This crate holds the subjects a debugging session can look at:
//!
//! - [`Route`] and [`RouteCollection`]: routing rules, compiled by
//!   [`RouteCompiler`] into `regex` patterns
//! - [`ListenerRegistry`]: the inspection contract for event listeners, with
//!   [`EventDispatcher`] as the in-memory implementation
//! - [`RawCallable`]: callables in the loose shapes they are registered with
//! - [`Value`]: dynamic values held by route defaults, options and parameters
//!
//! Nothing here renders output. Describing subjects is the job of the
//! `probe-describe` crate.
//!
//! # Example
//!
//! ```
//! use probe_model::{Route, RouteCollection};
//!
//! let route = Route::builder("/hello/{name}")
//!     .default("name", "Joseph")
//!     .requirement("name", "[a-z]+")
//!     .build()
//!     .unwrap();
//!
//! let mut routes = RouteCollection::new();
//! routes.add("hello", route);
//! assert_eq!(routes.get("hello").unwrap().path(), "/hello/{name}");
//! ```

mod callable;
mod compiler;
mod event;
mod route;
mod value;

pub use callable::{CallableOwner, RawCallable};
pub use compiler::{CompiledRoute, RouteCompiler};
pub use event::{EventDispatcher, ListenerId, ListenerRegistry};
pub use route::{Route, RouteBuilder, RouteCollection, RouteError};
pub use value::{ClosureRef, ObjectRef, SourceLocation, Value};
