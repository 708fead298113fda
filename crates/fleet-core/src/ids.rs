//! Typed identifiers.
//!
//! Intersections and edges are dense indices into the road network's arrays.
//! Cars and passengers are opaque labels chosen by the harness; nothing
//! indexes by them.  The inner integer is `pub` so loaders can build ids
//! straight from CSV fields.

use std::fmt;

/// Generate a `u32` id wrapper.  `$tag` prefixes the `Display` form.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident, $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Placeholder for "no id"; never a valid index.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "{}"), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Intersection index, dense in `0..node_count`.
    pub struct NodeId, "node ";
}

typed_id! {
    /// Directed road index in CSR order.
    pub struct EdgeId, "edge ";
}

typed_id! {
    pub struct CarId, "car ";
}

typed_id! {
    pub struct PassengerId, "passenger ";
}
