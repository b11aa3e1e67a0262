//! Net segments: two-endpoint electrical wires.

use std::fmt;
use std::ops::Deref;

use crate::config::Config;
use crate::error::SchemCoreError;
use crate::geometry::{rotate_point_90, Bounds};
use crate::parser;

use super::{Object, ObjectEvent, Shape};

#[derive(Debug, Clone, Copy)]
pub(crate) struct NetData {
    pub(crate) x1: i32,
    pub(crate) y1: i32,
    pub(crate) x2: i32,
    pub(crate) y2: i32,
    pub(crate) color: i32,
}

impl NetData {
    pub(crate) fn translate(&mut self, dx: i32, dy: i32) {
        self.x1 += dx;
        self.y1 += dy;
        self.x2 += dx;
        self.y2 += dy;
    }

    pub(crate) fn mirror(&mut self, x: i32, y: i32) {
        self.translate(-x, -y);
        self.x1 = -self.x1;
        self.x2 = -self.x2;
        self.translate(x, y);
    }

    pub(crate) fn rotate(&mut self, x: i32, y: i32, angle: i32) {
        self.translate(-x, -y);
        (self.x1, self.y1) = rotate_point_90(self.x1, self.y1, angle);
        (self.x2, self.y2) = rotate_point_90(self.x2, self.y2, angle);
        self.translate(x, y);
    }

    pub(crate) fn bounds(&self, cfg: &Config) -> Bounds {
        let half = cfg.get_int("graphical", "net-width") / 2;
        Bounds {
            left: self.x1.min(self.x2) - half,
            top: self.y1.min(self.y2) - half,
            right: self.x1.max(self.x2) + half,
            bottom: self.y1.max(self.y2) + half,
        }
    }

    pub(crate) fn to_record(&self) -> String {
        format!(
            "N {} {} {} {} {}",
            self.x1, self.y1, self.x2, self.y2, self.color
        )
    }
}

/// Parses an `N x1 y1 x2 y2 color` record starting at `offset`.
pub(crate) fn from_record(buf: &str, offset: usize) -> Result<(Object, usize), SchemCoreError> {
    let (line, next) = parser::record_line(buf, offset);
    let fields = parser::record_fields(line, "N", 6, "net object", offset)?;
    let data = NetData {
        x1: parser::record_int(fields[1], "net object", offset)?,
        y1: parser::record_int(fields[2], "net object", offset)?,
        x2: parser::record_int(fields[3], "net object", offset)?,
        y2: parser::record_int(fields[4], "net object", offset)?,
        color: parser::record_int(fields[5], "net object", offset)?,
    };
    Ok((Object::from_shape(Shape::Net(data)), next))
}

/// A typed handle over a net [`Object`].
///
/// Derefs to [`Object`], so the shared operations (transforms, events,
/// bounds) are available directly.
#[derive(Clone, PartialEq, Eq)]
pub struct Net {
    obj: Object,
}

impl Net {
    /// Creates a detached net segment from `(x1, y1)` to `(x2, y2)`.
    pub fn new(color: i32, x1: i32, y1: i32, x2: i32, y2: i32) -> Net {
        Net {
            obj: Object::from_shape(Shape::Net(NetData {
                x1,
                y1,
                x2,
                y2,
                color,
            })),
        }
    }

    pub(crate) fn from_object(obj: Object) -> Net {
        Net { obj }
    }

    /// The endpoints as `(x1, y1, x2, y2)`.
    pub fn coords(&self) -> (i32, i32, i32, i32) {
        self.obj.with_shape(|shape| match shape {
            Shape::Net(data) => (data.x1, data.y1, data.x2, data.y2),
            _ => unreachable!("net handle over non-net shape"),
        })
    }

    pub fn set_coords(&self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.obj.emit(&ObjectEvent::PreChanged);
        self.obj.with_shape_mut(|shape| match shape {
            Shape::Net(data) => {
                data.x1 = x1;
                data.y1 = y1;
                data.x2 = x2;
                data.y2 = y2;
            }
            _ => unreachable!("net handle over non-net shape"),
        });
        self.obj.emit(&ObjectEvent::Changed);
    }

    pub fn color(&self) -> i32 {
        self.obj.with_shape(|shape| match shape {
            Shape::Net(data) => data.color,
            _ => unreachable!("net handle over non-net shape"),
        })
    }

    pub fn set_color(&self, color: i32) {
        self.obj.emit(&ObjectEvent::PreChanged);
        self.obj.with_shape_mut(|shape| match shape {
            Shape::Net(data) => data.color = color,
            _ => unreachable!("net handle over non-net shape"),
        });
        self.obj.emit(&ObjectEvent::Changed);
    }
}

impl Deref for Net {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.obj
    }
}

impl AsRef<Object> for Net {
    fn as_ref(&self) -> &Object {
        &self.obj
    }
}

impl From<Net> for Object {
    fn from(net: Net) -> Object {
        net.obj
    }
}

impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.obj, f)
    }
}

impl fmt::Debug for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.obj, f)
    }
}
