//! Style buffer encoder and lazy decoder.
//!
//! Wire format: a flat `f32` sequence of records. Each record is an integral
//! tag code followed by `tag.arity()` values. Records equal to their tag's
//! default are never written.

use std::fmt::Write as _;

use tracing::warn;

use crate::error::ConfigurationError;
use crate::style::attr::{StyleAttr, StyleTag};

/// Sparse, tagged style buffer handed across the abstract-node boundary.
#[derive(Debug, Clone, Default)]
pub struct StyleBuffer {
    data: Vec<f32>,
}

impl StyleBuffer {
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Encode a sequence of attributes, skipping defaults.
    pub fn from_attrs(attrs: impl IntoIterator<Item = StyleAttr>) -> Self {
        let mut buffer = Self::new();
        for attr in attrs {
            buffer.append(attr);
        }
        buffer
    }

    /// Wrap a buffer produced by another encoder. Validated lazily on decode.
    pub fn from_raw(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Append one record unless the value equals its tag's default.
    ///
    /// A record the decoder would reject (a non-finite length, a
    /// non-positive scale factor) is dropped with a warning.
    pub fn append(&mut self, attr: StyleAttr) -> &mut Self {
        if let Err(err) = self.try_append(attr) {
            warn!(error = %err, "style attribute not encoded");
        }
        self
    }

    /// Append one record, failing on values the decoder would reject.
    /// The buffer is unchanged on error.
    pub fn try_append(&mut self, attr: StyleAttr) -> Result<&mut Self, ConfigurationError> {
        if attr.is_default() {
            return Ok(self);
        }
        let Some((tag, values)) = attr.wire() else {
            return Ok(self);
        };
        let arity = tag.arity();
        StyleAttr::read(tag, &values[..arity])?;
        self.reserve_for(1 + arity);
        self.data.push(tag.code() as f32);
        self.data.extend_from_slice(&values[..arity]);
        Ok(self)
    }

    /// Builder form of [`append`](Self::append).
    pub fn with(mut self, attr: StyleAttr) -> Self {
        self.append(attr);
        self
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn decode(&self) -> Decoder<'_> {
        decode(&self.data)
    }

    /// Double the capacity; if the increment still does not fit, grow to
    /// exactly what is needed.
    fn reserve_for(&mut self, additional: usize) {
        let needed = self.data.len() + additional;
        let capacity = self.data.capacity();
        if needed <= capacity {
            return;
        }
        let target = (capacity * 2).max(needed);
        self.data.reserve_exact(target - self.data.len());
    }
}

impl PartialEq for StyleBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for StyleBuffer {}

/// Lazily decode a raw style buffer.
pub fn decode(buffer: &[f32]) -> Decoder<'_> {
    Decoder {
        data: buffer,
        pos: 0,
        failed: false,
    }
}

/// Iterator over the records of a style buffer. Stops after the first error.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [f32],
    pos: usize,
    failed: bool,
}

impl Decoder<'_> {
    fn read_record(&mut self) -> Result<StyleAttr, ConfigurationError> {
        let raw = self.data[self.pos];
        let tag = tag_from_wire(raw).ok_or(ConfigurationError::UnknownTag(raw))?;
        let arity = tag.arity();
        let values = &self.data[self.pos + 1..];
        if values.len() < arity {
            return Err(ConfigurationError::Truncated {
                tag,
                expected: arity,
                found: values.len(),
            });
        }
        let attr = StyleAttr::read(tag, &values[..arity])?;
        self.pos += 1 + arity;
        Ok(attr)
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<StyleAttr, ConfigurationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let record = self.read_record();
        if record.is_err() {
            self.failed = true;
        }
        Some(record)
    }
}

fn tag_from_wire(raw: f32) -> Option<StyleTag> {
    if !raw.is_finite() || raw < 0.0 || raw > u16::MAX as f32 || raw.fract() != 0.0 {
        return None;
    }
    StyleTag::from_code(raw as u16)
}

/// Render every record of a buffer, one per line.
pub fn dump(buffer: &[f32]) -> Result<String, ConfigurationError> {
    let mut out = String::new();
    for attr in decode(buffer) {
        let _ = writeln!(out, "{}", attr?);
    }
    Ok(out)
}
