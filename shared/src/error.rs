use thiserror::Error;

/// Errors that can occur while decoding OSC wire data.
///
/// Every variant is fatal to the packet being decoded and is never
/// retried internally; the bytes come straight off the network, so a
/// caller's only sensible move is to drop the datagram and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended before a complete element could be read
    #[error("input truncated while reading {element}")]
    TruncatedInput { element: &'static str },

    /// A length field points past the end of the received data
    /// (SECURITY: rejected before any allocation takes place)
    #[error("malformed length: {declared} bytes declared, {remaining} remaining in input")]
    MalformedLength { declared: usize, remaining: usize },

    /// The type tag string did not start with ','
    #[error("type tag string does not start with ','")]
    InvalidTypeTagString,

    /// A type tag character outside the supported set was received
    #[error("unsupported type tag '{tag}'")]
    UnsupportedTypeTag { tag: char },

    /// A bundle did not start with the fixed '#bundle' string
    #[error("invalid bundle start tag: {found:?}")]
    InvalidBundleTag { found: String },

    /// A bundle element started with a byte that marks neither a
    /// message nor a bundle
    #[error("bundle element starts with {leading:#04x}, expected '/' or '#'")]
    UnsupportedPacket { leading: u8 },

    /// Bundle nesting exceeded the decoder's depth guard
    #[error("bundle nested deeper than {depth} levels")]
    BundleTooDeep { depth: usize },
}
