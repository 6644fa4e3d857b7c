//! Key types for mesh entities.
//!
//! Vertices and elements are addressed by stable integer keys. A key is
//! assigned when the entity enters the mesh (by the caller or automatically)
//! and never changes, whatever the storage order.

use std::fmt::{self, Debug};

/// A vertex key.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexKey(u32);

/// An element key.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ElementKey(u32);

/// Common behaviour of entity keys, used by [`Container`](super::Container).
pub trait Key: Copy + Ord + std::hash::Hash + Debug + Send + Sync + 'static {
    /// Build a key from its raw value.
    fn from_raw(raw: u32) -> Self;

    /// The raw value.
    fn to_raw(self) -> u32;
}

macro_rules! impl_key_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a key from a raw value.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw key value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// The raw value widened to `usize`.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Key for $name {
            #[inline]
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            fn to_raw(self) -> u32 {
                self.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                Self(v)
            }
        }
    };
}

impl_key_type!(VertexKey, "V");
impl_key_type!(ElementKey, "E");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_key() {
        let v = VertexKey::new(42);
        assert_eq!(v.raw(), 42);
        assert_eq!(v.index(), 42);
        assert_eq!(VertexKey::from(42), v);
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        let mut keys = vec![ElementKey::new(3), ElementKey::new(1), ElementKey::new(2)];
        keys.sort();
        assert_eq!(keys, vec![ElementKey::new(1), ElementKey::new(2), ElementKey::new(3)]);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", VertexKey::new(42)), "V(42)");
        assert_eq!(format!("{:?}", ElementKey::new(0)), "E(0)");
        assert_eq!(format!("{}", ElementKey::new(9)), "9");
    }
}
