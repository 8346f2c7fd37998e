use crate::Pointer;

/// An iterator over the nodes of a [`Pointer`] chain, from the root to the
/// pointer itself.
///
/// ```
/// # use schemaptr::{schema::{Container, Property, ValueKind}, Pointer};
/// # use std::sync::Arc;
/// let schema = Arc::new(Container::new().with(Property::scalar("tags", ValueKind::String).array()));
/// let ptr = Pointer::parse(&schema, "/tags/1").unwrap();
/// let chain: Vec<_> = ptr.components().map(|node| node.to_string()).collect();
/// assert_eq!(chain, ["", "/tags", "/tags/1"]);
/// ```
#[derive(Debug)]
pub struct Components<'p> {
    nodes: std::vec::IntoIter<&'p Pointer>,
}

impl<'p> Components<'p> {
    pub(crate) fn new(leaf: &'p Pointer) -> Self {
        let mut nodes = Vec::with_capacity(leaf.depth() + 1);
        let mut cursor = Some(leaf);
        while let Some(node) = cursor {
            nodes.push(node);
            cursor = node.parent();
        }
        nodes.reverse();
        Self {
            nodes: nodes.into_iter(),
        }
    }
}

impl<'p> Iterator for Components<'p> {
    type Item = &'p Pointer;

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl DoubleEndedIterator for Components<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.nodes.next_back()
    }
}

impl ExactSizeIterator for Components<'_> {}
