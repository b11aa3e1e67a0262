//! Pages: ordered collections of objects with change aggregation and the
//! file-level (de)serialization surface.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::SchemCoreError;
use crate::object::{Object, ObjectEvent, Subscription};
use crate::parser;

/// A notification emitted by a page about its membership or members.
///
/// `PreObjectChanged`/`ObjectChanged` relay the bracketing pair of any
/// member's mutation, so one page subscription observes every edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    ObjectAdded(Object),
    ObjectRemoved(Object),
    PreObjectChanged(Object),
    ObjectChanged(Object),
}

struct Member {
    object: Object,
    relay: Subscription,
}

type Handler = Box<dyn Fn(&Page, &PageEvent)>;

pub(crate) struct PageInner {
    members: RefCell<Vec<Member>>,
    filename: RefCell<Option<PathBuf>>,
    handlers: RefCell<Vec<(Subscription, Handler)>>,
    next_token: Cell<u64>,
}

/// An ordered, owning collection of [`Object`]s.
///
/// An object belongs to at most one page at a time; [`Page::add`] takes
/// ownership and [`Page::remove`] releases it. Membership order is
/// insertion order and is the serialization order.
#[derive(Clone, Default)]
pub struct Page {
    inner: Rc<PageInner>,
}

impl Default for PageInner {
    fn default() -> Self {
        PageInner {
            members: RefCell::new(Vec::new()),
            filename: RefCell::new(None),
            handlers: RefCell::new(Vec::new()),
            next_token: Cell::new(0),
        }
    }
}

impl Page {
    /// Creates an empty page with no associated file.
    pub fn new() -> Page {
        Page::default()
    }

    pub(crate) fn from_inner(inner: Rc<PageInner>) -> Page {
        Page { inner }
    }

    /// The file this page was last loaded from, if any.
    pub fn filename(&self) -> Option<PathBuf> {
        self.inner.filename.borrow().clone()
    }

    /// Registers a handler for every event this page emits, in registration
    /// order.
    ///
    /// Dispatch is synchronous; a handler must not mutate the page or its
    /// members while it runs.
    pub fn connect(&self, handler: impl Fn(&Page, &PageEvent) + 'static) -> Subscription {
        let token = Subscription::from_raw(self.inner.next_token.get());
        self.inner.next_token.set(self.inner.next_token.get() + 1);
        self.inner
            .handlers
            .borrow_mut()
            .push((token, Box::new(handler)));
        token
    }

    pub fn disconnect(&self, token: Subscription) {
        self.inner.handlers.borrow_mut().retain(|(t, _)| *t != token);
    }

    fn emit(&self, event: &PageEvent) {
        let handlers = self.inner.handlers.borrow();
        for (_, handler) in handlers.iter() {
            handler(self, event);
        }
    }

    /// Appends `object` to the page and takes ownership of it.
    ///
    /// The page relays the object's pre-change/change bracket as
    /// [`PageEvent::PreObjectChanged`]/[`PageEvent::ObjectChanged`] and
    /// emits [`PageEvent::ObjectAdded`] once the object is a member.
    ///
    /// # Panics
    ///
    /// Panics if `object` already belongs to a page, this one included.
    pub fn add(&self, object: &Object) {
        assert!(
            object.page().is_none(),
            "object already belongs to a page"
        );
        object.set_page(Some(&self.inner));

        let weak = Rc::downgrade(&self.inner);
        let relay = object.connect(move |obj, event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let page = Page::from_inner(inner);
            match event {
                ObjectEvent::PreChanged => {
                    page.emit(&PageEvent::PreObjectChanged(obj.clone()));
                }
                ObjectEvent::Changed => {
                    page.emit(&PageEvent::ObjectChanged(obj.clone()));
                }
                _ => {}
            }
        });

        self.inner.members.borrow_mut().push(Member {
            object: object.clone(),
            relay,
        });
        self.emit(&PageEvent::ObjectAdded(object.clone()));
    }

    /// Removes `object` from the page and releases ownership.
    ///
    /// After removal the object is detached and its mutations no longer
    /// reach this page's handlers.
    ///
    /// # Panics
    ///
    /// Panics if `object` is not a member of this page.
    pub fn remove(&self, object: &Object) {
        let member = {
            let mut members = self.inner.members.borrow_mut();
            let index = members
                .iter()
                .position(|m| m.object == *object)
                .expect("object is not a member of this page");
            members.remove(index)
        };
        member.object.disconnect(member.relay);
        member.object.set_page(None);
        self.emit(&PageEvent::ObjectRemoved(member.object));
    }

    /// Detaches every member at once, emitting no events.
    pub fn remove_all(&self) {
        for member in mem::take(&mut *self.inner.members.borrow_mut()) {
            member.object.disconnect(member.relay);
            member.object.set_page(None);
        }
    }

    /// A snapshot of the members in insertion order.
    pub fn objects(&self) -> Vec<Object> {
        self.inner
            .members
            .borrow()
            .iter()
            .map(|m| m.object.clone())
            .collect()
    }

    /// Parses a complete page buffer: the header line followed by one
    /// record per line.
    pub fn from_string(buf: &str) -> Result<Page, SchemCoreError> {
        let page = Page::new();
        let mut offset = parser::parse_header(buf)?;
        while offset < buf.len() {
            let (object, next) = Object::from_string(buf, offset)?;
            page.add(&object);
            offset = next;
        }
        Ok(page)
    }

    /// Loads a page from `path` and remembers the filename.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Page, SchemCoreError> {
        let path = path.as_ref();
        let buf = std::fs::read_to_string(path).map_err(|source| SchemCoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let page = Page::from_string(&buf).map_err(|source| SchemCoreError::Load {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        *page.inner.filename.borrow_mut() = Some(path.to_path_buf());
        tracing::debug!(
            "loaded {} objects from {:?}",
            page.objects().len(),
            path
        );
        Ok(page)
    }

    /// Writes the page to `path`; does not update the remembered filename.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), SchemCoreError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_string()).map_err(|source| SchemCoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for Page {
    /// The full on-disk form: header line, then one newline-terminated
    /// record per member in insertion order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&parser::format_header())?;
        for member in self.inner.members.borrow().iter() {
            writeln!(f, "{}", member.object)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("filename", &self.filename())
            .field("objects", &self.objects().len())
            .finish()
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Page) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Page {}

impl Drop for PageInner {
    /// Last handle gone: detach every member so they never hold a dangling
    /// back-reference. Like [`Page::remove_all`], no events fire.
    fn drop(&mut self) {
        for member in mem::take(&mut *self.members.borrow_mut()) {
            member.object.disconnect(member.relay);
            member.object.set_page(None);
        }
    }
}
