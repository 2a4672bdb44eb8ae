//! Per-node flag bits.

bitflags::bitflags! {
    /// Flags carried by every node in [`crate::node::NodeData`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        const NONE          = 0;
        /// The node was wrapped in parentheses in the source.
        const PARENTHESIZED = 1 << 0;
    }
}

impl NodeFlags {
    #[inline]
    pub fn is_parenthesized(self) -> bool {
        self.contains(NodeFlags::PARENTHESIZED)
    }
}
