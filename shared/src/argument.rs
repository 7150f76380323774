use std::fmt;

use crate::timetag::Timetag;

/// One typed OSC argument.
///
/// The OSC 1.0 argument set is closed; modelling it as an enum makes an
/// unsupported in-memory argument unrepresentable, so encoding is
/// infallible and only wire-level corruption can produce a type error.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Nil,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Blob(Vec<u8>),
    Timetag(Timetag),
}

impl Argument {
    /// The OSC type tag character describing this argument. `T`, `F`
    /// and `N` carry no payload bytes on the wire.
    pub fn type_tag(&self) -> char {
        match self {
            Argument::Nil => 'N',
            Argument::Bool(true) => 'T',
            Argument::Bool(false) => 'F',
            Argument::Int32(_) => 'i',
            Argument::Int64(_) => 'h',
            Argument::Float32(_) => 'f',
            Argument::Float64(_) => 'd',
            Argument::String(_) => 's',
            Argument::Blob(_) => 'b',
            Argument::Timetag(_) => 't',
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Nil => write!(f, "Nil"),
            Argument::Bool(v) => write!(f, "{v}"),
            Argument::Int32(v) => write!(f, "{v}"),
            Argument::Int64(v) => write!(f, "{v}"),
            Argument::Float32(v) => write!(f, "{v}"),
            Argument::Float64(v) => write!(f, "{v}"),
            Argument::String(v) => write!(f, "{v}"),
            Argument::Blob(_) => write!(f, "blob"),
            Argument::Timetag(v) => write!(f, "{}", v.raw()),
        }
    }
}

impl From<bool> for Argument {
    fn from(v: bool) -> Self {
        Argument::Bool(v)
    }
}

impl From<i32> for Argument {
    fn from(v: i32) -> Self {
        Argument::Int32(v)
    }
}

impl From<i64> for Argument {
    fn from(v: i64) -> Self {
        Argument::Int64(v)
    }
}

impl From<f32> for Argument {
    fn from(v: f32) -> Self {
        Argument::Float32(v)
    }
}

impl From<f64> for Argument {
    fn from(v: f64) -> Self {
        Argument::Float64(v)
    }
}

impl From<&str> for Argument {
    fn from(v: &str) -> Self {
        Argument::String(v.to_string())
    }
}

impl From<String> for Argument {
    fn from(v: String) -> Self {
        Argument::String(v)
    }
}

impl From<Vec<u8>> for Argument {
    fn from(v: Vec<u8>) -> Self {
        Argument::Blob(v)
    }
}

impl From<Timetag> for Argument {
    fn from(v: Timetag) -> Self {
        Argument::Timetag(v)
    }
}
