//! The shared object contract: identity, page membership, configuration,
//! exact transforms and the mutation notification protocol.
//!
//! An [`Object`] is a cheaply clonable shared handle over one schematic
//! element. Concrete geometry lives in the variant modules ([`net`],
//! [`pin`]); everything the variants have in common (the transform
//! operations, bounds, serialization entry points and the pre-change/change
//! event pair) is dispatched from here.

pub mod net;
pub mod pin;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use uuid::Uuid;

use crate::config::Config;
use crate::error::SchemCoreError;
use crate::geometry::Bounds;
use crate::page::{Page, PageInner};
use crate::parser;

use net::{Net, NetData};
use pin::{Pin, PinData};

/// The concrete kind of an [`Object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Net,
    Pin,
}

/// A notification emitted by an object around a mutation.
///
/// For every mutating operation the order is fixed: `PreChanged`, then the
/// mutation itself, then the operation-specific event, then `Changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectEvent {
    PreChanged,
    Changed,
    Mirrored { x: i32, y: i32 },
    Rotated { x: i32, y: i32, angle: i32 },
    Translated { dx: i32, dy: i32 },
}

/// Token identifying one registered handler; pass it back to
/// [`Object::disconnect`] (or [`Page::disconnect`]) to remove the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

impl Subscription {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Subscription(raw)
    }
}

/// Variant geometry behind the shared handle.
#[derive(Clone)]
pub(crate) enum Shape {
    Net(NetData),
    Pin(PinData),
}

impl Shape {
    fn kind(&self) -> ObjectKind {
        match self {
            Shape::Net(_) => ObjectKind::Net,
            Shape::Pin(_) => ObjectKind::Pin,
        }
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        match self {
            Shape::Net(data) => data.translate(dx, dy),
            Shape::Pin(data) => data.translate(dx, dy),
        }
    }

    fn mirror(&mut self, x: i32, y: i32) {
        match self {
            Shape::Net(data) => data.mirror(x, y),
            Shape::Pin(data) => data.mirror(x, y),
        }
    }

    fn rotate(&mut self, x: i32, y: i32, angle: i32) {
        match self {
            Shape::Net(data) => data.rotate(x, y, angle),
            Shape::Pin(data) => data.rotate(x, y, angle),
        }
    }

    fn bounds(&self, cfg: &Config) -> Bounds {
        match self {
            Shape::Net(data) => data.bounds(cfg),
            Shape::Pin(data) => data.bounds(cfg),
        }
    }

    fn to_record(&self) -> String {
        match self {
            Shape::Net(data) => data.to_record(),
            Shape::Pin(data) => data.to_record(),
        }
    }
}

type Handler = Box<dyn Fn(&Object, &ObjectEvent)>;

struct ObjectInner {
    id: Uuid,
    page: RefCell<Option<Weak<PageInner>>>,
    config: RefCell<Arc<Config>>,
    shape: RefCell<Shape>,
    handlers: RefCell<Vec<(Subscription, Handler)>>,
    next_token: Cell<u64>,
}

/// A single schematic element behind a shared handle.
///
/// Objects are constructed detached via the variant constructors
/// ([`Net::new`], [`Pin::new`]) and owned by at most one [`Page`]. All
/// mutating operations take `&self`; state lives behind interior
/// mutability, so the handle is single-threaded. Equality compares handle
/// identity, not geometry.
#[derive(Clone)]
pub struct Object {
    inner: Rc<ObjectInner>,
}

impl Object {
    pub(crate) fn from_shape(shape: Shape) -> Object {
        Object {
            inner: Rc::new(ObjectInner {
                id: Uuid::new_v4(),
                page: RefCell::new(None),
                config: RefCell::new(Arc::clone(Config::default_config())),
                shape: RefCell::new(shape),
                handlers: RefCell::new(Vec::new()),
                next_token: Cell::new(0),
            }),
        }
    }

    /// Stable identity for the object's lifetime; unrelated to page order.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.inner.shape.borrow().kind()
    }

    /// The page this object belongs to, or `None` while detached.
    pub fn page(&self) -> Option<Page> {
        self.inner
            .page
            .borrow()
            .as_ref()?
            .upgrade()
            .map(Page::from_inner)
    }

    pub(crate) fn set_page(&self, page: Option<&Rc<PageInner>>) {
        *self.inner.page.borrow_mut() = page.map(Rc::downgrade);
    }

    /// The config consulted for width-derived bounds.
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.inner.config.borrow())
    }

    pub fn set_config(&self, cfg: Arc<Config>) {
        *self.inner.config.borrow_mut() = cfg;
    }

    /// Typed view of this object if it is a net.
    pub fn as_net(&self) -> Option<Net> {
        matches!(&*self.inner.shape.borrow(), Shape::Net(_))
            .then(|| Net::from_object(self.clone()))
    }

    /// Typed view of this object if it is a pin.
    pub fn as_pin(&self) -> Option<Pin> {
        matches!(&*self.inner.shape.borrow(), Shape::Pin(_))
            .then(|| Pin::from_object(self.clone()))
    }

    /// Registers a handler for every event this object emits, in
    /// registration order.
    ///
    /// Dispatch is synchronous; a handler must not connect, disconnect or
    /// mutate the emitting object while it runs.
    pub fn connect(&self, handler: impl Fn(&Object, &ObjectEvent) + 'static) -> Subscription {
        let token = Subscription(self.inner.next_token.get());
        self.inner.next_token.set(token.0 + 1);
        self.inner
            .handlers
            .borrow_mut()
            .push((token, Box::new(handler)));
        token
    }

    pub fn disconnect(&self, token: Subscription) {
        self.inner.handlers.borrow_mut().retain(|(t, _)| *t != token);
    }

    pub(crate) fn emit(&self, event: &ObjectEvent) {
        let handlers = self.inner.handlers.borrow();
        for (_, handler) in handlers.iter() {
            handler(self, event);
        }
    }

    pub(crate) fn with_shape<R>(&self, f: impl FnOnce(&Shape) -> R) -> R {
        f(&self.inner.shape.borrow())
    }

    pub(crate) fn with_shape_mut<R>(&self, f: impl FnOnce(&mut Shape) -> R) -> R {
        f(&mut self.inner.shape.borrow_mut())
    }

    /// Copies the object: a new detached instance with identical geometry
    /// and color, sharing this object's config. Page membership is not
    /// copied.
    pub fn copy(&self) -> Object {
        let shape = self.inner.shape.borrow().clone();
        let copy = Object::from_shape(shape);
        copy.set_config(self.config());
        copy
    }

    /// Axis-aligned bounds of the geometry, expanded on every side by half
    /// the variant's configured drawing width.
    pub fn bounds(&self) -> Bounds {
        let cfg = self.config();
        self.inner.shape.borrow().bounds(&cfg)
    }

    /// Mirrors the object horizontally about the vertical line through
    /// `(x, y)`.
    pub fn mirror(&self, x: i32, y: i32) {
        self.emit(&ObjectEvent::PreChanged);
        self.inner.shape.borrow_mut().mirror(x, y);
        self.emit(&ObjectEvent::Mirrored { x, y });
        self.emit(&ObjectEvent::Changed);
    }

    /// Rotates the object about `(x, y)` by `angle` degrees.
    ///
    /// A zero angle is a no-op and emits no events. Any other angle must be
    /// a multiple of 90; negative multiples are accepted (`-90` rotates
    /// like `270`). The emitted [`ObjectEvent::Rotated`] carries the
    /// caller's angle as passed.
    ///
    /// # Panics
    ///
    /// Panics if `angle` is not a multiple of 90; angles are never rounded.
    pub fn rotate(&self, x: i32, y: i32, angle: i32) {
        if angle == 0 {
            return;
        }
        assert!(
            angle % 90 == 0,
            "rotation angle {angle} is not a multiple of 90"
        );
        self.emit(&ObjectEvent::PreChanged);
        self.inner
            .shape
            .borrow_mut()
            .rotate(x, y, angle.rem_euclid(360));
        self.emit(&ObjectEvent::Rotated { x, y, angle });
        self.emit(&ObjectEvent::Changed);
    }

    /// Translates the object by `(dx, dy)`.
    pub fn translate(&self, dx: i32, dy: i32) {
        self.emit(&ObjectEvent::PreChanged);
        self.inner.shape.borrow_mut().translate(dx, dy);
        self.emit(&ObjectEvent::Translated { dx, dy });
        self.emit(&ObjectEvent::Changed);
    }

    /// Parses one record from `buf` starting at `offset`.
    ///
    /// On success returns the object and the offset just past the record's
    /// terminating newline. On failure nothing is consumed and the error
    /// carries the offset of the failing record.
    pub fn from_string(buf: &str, offset: usize) -> Result<(Object, usize), SchemCoreError> {
        parser::parse_object(buf, offset)
    }
}

impl fmt::Display for Object {
    /// The canonical single-line record for this object, without the
    /// terminating newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.shape.borrow().to_record())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("kind", &self.kind())
            .field("id", &self.inner.id)
            .field("record", &self.to_string())
            .finish()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Object {}
