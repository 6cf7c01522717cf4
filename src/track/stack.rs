//! Arena-based position stacks.
//!
//! Each track cell and each token is a `StackNode` in a flat `Vec`, linked
//! vertically by `NodeId` indices (`above` / `below`). A stack is the chain
//! reachable through those links; its foot is a cell node and everything
//! resting on it is token nodes.
//!
//! Links are always kept mutually inverse: `a.above == Some(b)` exactly when
//! `b.below == Some(a)`.
//!
//! ```text
//!   k   <- topmost
//!   r
//!   [3] <- cell node (foot / bottommost)
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::TokenId;

/// Index into a `StackArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Immutable identity of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// A track cell with its coordinate.
    Cell(i32),
    /// A token.
    Token(TokenId),
}

impl Label {
    /// The coordinate, if this is a cell.
    #[must_use]
    pub const fn cell(self) -> Option<i32> {
        match self {
            Label::Cell(position) => Some(position),
            Label::Token(_) => None,
        }
    }

    /// The token, if this is a token.
    #[must_use]
    pub const fn token(self) -> Option<TokenId> {
        match self {
            Label::Token(token) => Some(token),
            Label::Cell(_) => None,
        }
    }
}

/// One node of a position stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackNode {
    pub label: Label,

    /// Node resting directly on this one.
    pub above: Option<NodeId>,

    /// Node this one rests on.
    pub below: Option<NodeId>,
}

impl StackNode {
    fn new(label: Label) -> Self {
        Self {
            label,
            above: None,
            below: None,
        }
    }
}

/// Flat storage for every stack node of a board.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StackArena {
    nodes: Vec<StackNode>,
}

impl StackArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Allocate an unlinked node, returning its ID.
    pub fn alloc(&mut self, label: Label) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(StackNode::new(label));
        id
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &StackNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut StackNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Label of a node.
    #[inline]
    #[must_use]
    pub fn label(&self, id: NodeId) -> Label {
        self.get(id).label
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Highest node of the chain `id` belongs to. O(height above `id`).
    #[must_use]
    pub fn topmost(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(next) = self.get(current).above {
            current = next;
        }
        current
    }

    /// Foot of the chain `id` belongs to. O(depth below `id`).
    #[must_use]
    pub fn bottommost(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(next) = self.get(current).below {
            current = next;
        }
        current
    }

    /// Labels from `id` upward, `id` first.
    #[must_use]
    pub fn to_sequence(&self, id: NodeId) -> SmallVec<[Label; 8]> {
        self.upward(id).collect()
    }

    /// Lazy walk from `id` up to the topmost node.
    #[must_use]
    pub fn upward(&self, id: NodeId) -> Upward<'_> {
        Upward {
            arena: self,
            next: Some(id),
        }
    }

    /// Lazy walk from `id` down to the foot.
    #[must_use]
    pub fn downward(&self, id: NodeId) -> Downward<'_> {
        Downward {
            arena: self,
            next: Some(id),
        }
    }

    /// Cut `id` (and everything above it) loose from the node below.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(below) = self.get_mut(id).below.take() {
            self.get_mut(below).above = None;
        }
    }

    /// Put the chain starting at `id` on top of the stack containing `foot`.
    ///
    /// `id` must already be detached.
    pub fn attach_on_top(&mut self, id: NodeId, foot: NodeId) {
        debug_assert!(self.get(id).below.is_none(), "attaching a linked node");
        let top = self.topmost(foot);
        self.link(top, id);
    }

    /// Insert the chain starting at `id` directly on `foot`, underneath
    /// whatever already rests there.
    ///
    /// `id` must already be detached.
    pub fn insert_on_foot(&mut self, id: NodeId, foot: NodeId) {
        debug_assert!(self.get(id).below.is_none(), "inserting a linked node");
        let previous = self.get(foot).above;
        self.link(foot, id);
        if let Some(previous) = previous {
            let top = self.topmost(id);
            self.link(top, previous);
        }
    }

    /// Rebuild the chain containing `id` inside `dest`, from its foot upward.
    ///
    /// Returns the new foot. The copy shares nothing with `self`.
    pub fn copy_chain_into(&self, id: NodeId, dest: &mut StackArena) -> NodeId {
        let foot = self.bottommost(id);
        let new_foot = dest.alloc(self.label(foot));

        let mut below = new_foot;
        for label in self.upward(foot).skip(1) {
            let node = dest.alloc(label);
            dest.link(below, node);
            below = node;
        }
        new_foot
    }

    /// Check every link is mirrored by its inverse.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.nodes.iter().enumerate().all(|(i, node)| {
            let id = NodeId::new(i as u32);
            let above_ok = node.above.map_or(true, |a| self.get(a).below == Some(id));
            let below_ok = node.below.map_or(true, |b| self.get(b).above == Some(id));
            above_ok && below_ok
        })
    }

    fn link(&mut self, below: NodeId, above: NodeId) {
        self.get_mut(below).above = Some(above);
        self.get_mut(above).below = Some(below);
    }
}

/// Iterator over labels walking up a chain.
pub struct Upward<'a> {
    arena: &'a StackArena,
    next: Option<NodeId>,
}

impl Iterator for Upward<'_> {
    type Item = Label;

    fn next(&mut self) -> Option<Label> {
        let node = self.arena.get(self.next?);
        self.next = node.above;
        Some(node.label)
    }
}

/// Iterator over labels walking down a chain.
pub struct Downward<'a> {
    arena: &'a StackArena,
    next: Option<NodeId>,
}

impl Iterator for Downward<'_> {
    type Item = Label;

    fn next(&mut self) -> Option<Label> {
        let node = self.arena.get(self.next?);
        self.next = node.below;
        Some(node.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(name: char) -> Label {
        Label::Token(TokenId(name))
    }

    /// Cell 0 with `a` and `b` stacked on it, plus a loose `c`.
    fn small_arena() -> (StackArena, NodeId, NodeId, NodeId, NodeId) {
        let mut arena = StackArena::new();
        let cell = arena.alloc(Label::Cell(0));
        let a = arena.alloc(token('a'));
        let b = arena.alloc(token('b'));
        let c = arena.alloc(token('c'));
        arena.attach_on_top(a, cell);
        arena.attach_on_top(b, cell);
        (arena, cell, a, b, c)
    }

    #[test]
    fn test_topmost_bottommost() {
        let (arena, cell, a, b, c) = small_arena();

        assert_eq!(arena.topmost(cell), b);
        assert_eq!(arena.topmost(a), b);
        assert_eq!(arena.bottommost(b), cell);
        assert_eq!(arena.bottommost(cell), cell);
        assert_eq!(arena.topmost(c), c);
        assert_eq!(arena.bottommost(c), c);
    }

    #[test]
    fn test_to_sequence() {
        let (arena, cell, a, _, _) = small_arena();

        assert_eq!(
            arena.to_sequence(cell).as_slice(),
            &[Label::Cell(0), token('a'), token('b')]
        );
        assert_eq!(arena.to_sequence(a).as_slice(), &[token('a'), token('b')]);
    }

    #[test]
    fn test_downward() {
        let (arena, _, _, b, _) = small_arena();

        let labels: Vec<_> = arena.downward(b).collect();
        assert_eq!(labels, vec![token('b'), token('a'), Label::Cell(0)]);

        // Restartable
        assert_eq!(arena.downward(b).count(), 3);
    }

    #[test]
    fn test_detach_carries_above() {
        let (mut arena, cell, a, b, _) = small_arena();

        arena.detach(a);

        assert_eq!(arena.get(cell).above, None);
        assert_eq!(arena.get(a).below, None);
        assert_eq!(arena.topmost(a), b);
        assert!(arena.is_consistent());
    }

    #[test]
    fn test_insert_on_foot() {
        let (mut arena, cell, a, b, c) = small_arena();

        arena.insert_on_foot(c, cell);

        assert_eq!(
            arena.to_sequence(cell).as_slice(),
            &[Label::Cell(0), token('c'), token('a'), token('b')]
        );
        assert_eq!(arena.get(a).below, Some(c));
        assert_eq!(arena.topmost(c), b);
        assert!(arena.is_consistent());
    }

    #[test]
    fn test_insert_on_empty_foot() {
        let mut arena = StackArena::new();
        let cell = arena.alloc(Label::Cell(5));
        let a = arena.alloc(token('a'));

        arena.insert_on_foot(a, cell);

        assert_eq!(arena.to_sequence(cell).as_slice(), &[Label::Cell(5), token('a')]);
    }

    #[test]
    fn test_copy_chain_into() {
        let (arena, _, a, _, _) = small_arena();
        let mut dest = StackArena::new();

        let foot = arena.copy_chain_into(a, &mut dest);

        assert_eq!(dest.len(), 3);
        assert_eq!(dest.to_sequence(foot), arena.to_sequence(arena.bottommost(a)));
        assert!(dest.is_consistent());
    }

    #[test]
    fn test_copy_is_independent() {
        let (arena, cell, _, _, _) = small_arena();
        let mut dest = StackArena::new();
        let foot = arena.copy_chain_into(cell, &mut dest);

        let top = dest.topmost(foot);
        dest.detach(top);

        assert_eq!(dest.to_sequence(foot).len(), 2);
        assert_eq!(arena.to_sequence(cell).len(), 3);
    }

    #[test]
    fn test_label_accessors() {
        assert_eq!(Label::Cell(3).cell(), Some(3));
        assert_eq!(Label::Cell(3).token(), None);
        assert_eq!(token('r').token(), Some(TokenId('r')));
        assert_eq!(token('r').cell(), None);
    }
}
