//! Style encoding.
//!
//! Styles cross the abstract-node boundary as a sparse tagged `f32` buffer
//! ([`StyleBuffer`]). Inside the engine they are a structured [`NodeStyle`].
//!
//! ```text
//! [StyleAttr] --encode--> StyleBuffer --decode--> NodeStyle --adapter--> taffy::Style
//! ```

mod attr;
mod encoder;
mod node_style;

pub use attr::{StyleAttr, StyleTag};
pub use encoder::{Decoder, StyleBuffer, decode, dump};
pub use node_style::{EdgeValues, GapValues, NodeStyle};

/// Version of the wire format produced by [`StyleBuffer`].
pub const STYLE_FORMAT_VERSION: u32 = 1;
