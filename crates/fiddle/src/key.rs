//! Stable widget keys derived from caller-supplied labels.
//!
//! A label may carry extra text that is hashed but not displayed: everything
//! from the first `##` onwards is hidden from [`display_text`]. If the label
//! contains `###`, only the text after it is hashed, so the visible part can
//! change from frame to frame without changing the widget's identity.

use std::fmt;

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Opaque, equality-comparable widget identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Key(u64);

impl Key {
    /// The null key. Widgets with a null key are never cached and never
    /// collide with each other.
    pub const NULL: Self = Self(0);

    /// Derive a key from a label.
    pub fn from_label(label: &str) -> Self {
        Self::from_label_seeded(label, Self::NULL)
    }

    /// Derive a key from a label, continuing the hash from `seed`. Builders
    /// seed with the parent's key so that equal labels under different parents
    /// stay distinct.
    pub fn from_label_seeded(label: &str, seed: Self) -> Self {
        let source = hash_source(label);
        if source.is_empty() {
            return Self::NULL;
        }
        let mut h = if seed.is_null() { FNV_OFFSET } else { seed.0 };
        for b in source.bytes() {
            h ^= u64::from(b);
            h = h.wrapping_mul(FNV_PRIME);
        }
        // Zero is reserved for the null key.
        Self(if h == 0 { 1 } else { h })
    }

    /// Is this the null key?
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// The part of a label that is shown to the user.
pub fn display_text(label: &str) -> &str {
    match label.find("##") {
        Some(i) => &label[..i],
        None => label,
    }
}

/// The part of a label that contributes to its key.
fn hash_source(label: &str) -> &str {
    match label.find("###") {
        Some(i) => &label[i + 3..],
        None => label,
    }
}
