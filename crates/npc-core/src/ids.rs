//! Typed identifiers.
//!
//! Every id is a `Copy + Ord + Hash` newtype over an unsigned integer.  The
//! integer's `MAX` is reserved as the `INVALID` sentinel, which is also the
//! `Default`, so an id that was never assigned shows up as invalid rather
//! than as a plausible zero.

use std::fmt;

/// Declare an id newtype.  `tag` is the short prefix used by `Display`
/// (`agent#3`, `state#0`, ...).
macro_rules! id_type {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) as $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }

            /// Position in the owning `Vec`.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($tag, "#{}"), self.0)
                } else {
                    f.write_str(concat!($tag, "#invalid"))
                }
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

id_type! {
    /// Identity of one simulated character.
    pub struct AgentId(u32) as "agent";
}

id_type! {
    /// A behavior state, by its position in the agent's state list.
    pub struct StateId(u16) as "state";
}

id_type! {
    /// Token issued for every movement request.
    ///
    /// A completion is only acted on if its token matches the request the
    /// receiving state is still waiting for.
    pub struct MoveRequestId(u32) as "move";
}

id_type! {
    /// A walkable node in a navigation graph.
    pub struct NodeId(u32) as "node";
}

id_type! {
    /// A directed link in a navigation graph.
    pub struct EdgeId(u32) as "edge";
}

impl MoveRequestId {
    /// The token that follows `self`, skipping the `INVALID` sentinel.
    #[inline]
    pub fn next(self) -> MoveRequestId {
        let n = self.0.wrapping_add(1);
        if n == u32::MAX { MoveRequestId(0) } else { MoveRequestId(n) }
    }
}
