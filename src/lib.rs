//! SchemCore - schematic object model and file format library
//!
//! This library provides the core object model of a schematic editor:
//! shared object handles for nets and pins, pages that own them, exact
//! integer transforms, change notification, and the line-oriented file
//! format used to load and save pages.
//!
//! # Quick Start
//!
//! ```
//! use schemcore::{Net, Page};
//!
//! let page = Page::new();
//! let net = Net::new(1, 0, 0, 100, 0);
//! page.add(&net);
//!
//! net.translate(50, 50);
//! assert_eq!(net.coords(), (50, 50, 150, 50));
//!
//! let saved = page.to_string();
//! let reloaded = Page::from_string(&saved).unwrap();
//! assert_eq!(reloaded.to_string(), saved);
//! ```
//!
//! # Features
//!
//! - **Shared objects**: Cheaply clonable handles with stable identity
//! - **Exact transforms**: Translate, mirror, and quarter-turn rotate with
//!   no floating-point drift
//! - **Change notification**: Per-object events, relayed through the
//!   owning page
//! - **Round-trip serialization**: Saving a freshly loaded page reproduces
//!   the input byte for byte
//! - **Configuration**: Group/key settings with built-in defaults for the
//!   drawing widths that feed object bounds

pub mod config;
pub mod error;
pub mod geometry;
pub mod object;
pub mod page;
pub mod parser;

// Re-export main types
pub use config::{Config, ConfigError, Value};
pub use error::SchemCoreError;
pub use geometry::{rotate_point_90, Bounds};
pub use object::net::Net;
pub use object::pin::{Pin, PinKind};
pub use object::{Object, ObjectEvent, ObjectKind, Subscription};
pub use page::{Page, PageEvent};
pub use parser::{FORMAT_REVISION, RELEASE_VERSION};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Config, Net, Object, ObjectEvent, ObjectKind, Page, PageEvent, Pin, PinKind,
        SchemCoreError,
    };
}
