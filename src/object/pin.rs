//! Component pins: connection stubs with an active end.

use std::fmt;
use std::ops::Deref;

use crate::config::Config;
use crate::error::SchemCoreError;
use crate::geometry::{rotate_point_90, Bounds};
use crate::parser;

use super::{Object, ObjectEvent, Shape};

/// Whether a pin connects to an ordinary net or a bus.
///
/// The kind selects the configured drawing width used for bounds and is
/// written into the wire record (`0` for net, `1` for bus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinKind {
    Net,
    Bus,
}

impl PinKind {
    fn to_wire(self) -> i32 {
        match self {
            PinKind::Net => 0,
            PinKind::Bus => 1,
        }
    }

    /// Zero is a net pin; any other value reads as a bus pin.
    fn from_wire(raw: i32) -> PinKind {
        if raw == 0 {
            PinKind::Net
        } else {
            PinKind::Bus
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PinData {
    pub(crate) x1: i32,
    pub(crate) y1: i32,
    pub(crate) x2: i32,
    pub(crate) y2: i32,
    pub(crate) color: i32,
    pub(crate) kind: PinKind,
    pub(crate) whichend: i32,
}

impl PinData {
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
        let key = match self.kind {
            PinKind::Net => "pin-width-net",
            PinKind::Bus => "pin-width-bus",
        };
        let half = cfg.get_int("graphical", key) / 2;
        Bounds {
            left: self.x1.min(self.x2) - half,
            top: self.y1.min(self.y2) - half,
            right: self.x1.max(self.x2) + half,
            bottom: self.y1.max(self.y2) + half,
        }
    }

    pub(crate) fn to_record(&self) -> String {
        format!(
            "P {} {} {} {} {} {} {}",
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.color,
            self.kind.to_wire(),
            self.whichend
        )
    }
}

/// Parses a `P x1 y1 x2 y2 color kind whichend` record starting at `offset`.
pub(crate) fn from_record(buf: &str, offset: usize) -> Result<(Object, usize), SchemCoreError> {
    let (line, next) = parser::record_line(buf, offset);
    let fields = parser::record_fields(line, "P", 8, "pin object", offset)?;
    let data = PinData {
        x1: parser::record_int(fields[1], "pin object", offset)?,
        y1: parser::record_int(fields[2], "pin object", offset)?,
        x2: parser::record_int(fields[3], "pin object", offset)?,
        y2: parser::record_int(fields[4], "pin object", offset)?,
        color: parser::record_int(fields[5], "pin object", offset)?,
        kind: PinKind::from_wire(parser::record_int(fields[6], "pin object", offset)?),
        whichend: parser::record_int(fields[7], "pin object", offset)?,
    };
    Ok((Object::from_shape(Shape::Pin(data)), next))
}

/// A typed handle over a pin [`Object`].
#[derive(Clone, PartialEq, Eq)]
pub struct Pin {
    obj: Object,
}

impl Pin {
    /// Creates a detached pin from `(x1, y1)` to `(x2, y2)`.
    ///
    /// `whichend` selects the connectable endpoint: `0` for the first,
    /// anything else for the second.
    pub fn new(kind: PinKind, whichend: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: i32) -> Pin {
        Pin {
            obj: Object::from_shape(Shape::Pin(PinData {
                x1,
                y1,
                x2,
                y2,
                color,
                kind,
                whichend,
            })),
        }
    }

    pub(crate) fn from_object(obj: Object) -> Pin {
        Pin { obj }
    }

    fn data(&self) -> PinData {
        self.obj.with_shape(|shape| match shape {
            Shape::Pin(data) => *data,
            _ => unreachable!("pin handle over non-pin shape"),
        })
    }

    /// The endpoints as `(x1, y1, x2, y2)`.
    pub fn coords(&self) -> (i32, i32, i32, i32) {
        let data = self.data();
        (data.x1, data.y1, data.x2, data.y2)
    }

    pub fn set_coords(&self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.obj.emit(&ObjectEvent::PreChanged);
        self.obj.with_shape_mut(|shape| match shape {
            Shape::Pin(data) => {
                data.x1 = x1;
                data.y1 = y1;
                data.x2 = x2;
                data.y2 = y2;
            }
            _ => unreachable!("pin handle over non-pin shape"),
        });
        self.obj.emit(&ObjectEvent::Changed);
    }

    pub fn color(&self) -> i32 {
        self.data().color
    }

    pub fn set_color(&self, color: i32) {
        self.obj.emit(&ObjectEvent::PreChanged);
        self.obj.with_shape_mut(|shape| match shape {
            Shape::Pin(data) => data.color = color,
            _ => unreachable!("pin handle over non-pin shape"),
        });
        self.obj.emit(&ObjectEvent::Changed);
    }

    pub fn kind(&self) -> PinKind {
        self.data().kind
    }

    pub fn whichend(&self) -> i32 {
        self.data().whichend
    }

    /// The connectable endpoint selected by `whichend`.
    pub fn position(&self) -> (i32, i32) {
        let data = self.data();
        if data.whichend == 0 {
            (data.x1, data.y1)
        } else {
            (data.x2, data.y2)
        }
    }
}

impl Deref for Pin {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.obj
    }
}

impl AsRef<Object> for Pin {
    fn as_ref(&self) -> &Object {
        &self.obj
    }
}

impl From<Pin> for Object {
    fn from(pin: Pin) -> Object {
        pin.obj
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.obj, f)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.obj, f)
    }
}
