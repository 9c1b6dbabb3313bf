use crate::hooks::Hooks;

use super::store::{Tag, TagStore};

const WORD_BITS: usize = u64::BITS as usize;

/// The subset of a message's tags one recipient is allowed to see.
///
/// A bitset over the [`TagStore`] insertion order. Two selections are equal
/// when they were built against a store of the same size and pick the same
/// indices, which makes them usable as a serialization cache key for the
/// message they came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct TagSelection {
    len: usize,
    bits: Vec<u64>,
}

impl TagSelection {
    /// A selection over `store` with nothing selected.
    pub fn none(store: &TagStore) -> Self {
        Self::with_len(store.len())
    }

    /// A selection over `store` with every tag selected.
    pub fn all(store: &TagStore) -> Self {
        let mut sel = Self::with_len(store.len());
        for i in 0..store.len() {
            sel.insert(i);
        }
        sel
    }

    fn with_len(len: usize) -> Self {
        TagSelection {
            len,
            bits: vec![0; (len + WORD_BITS - 1) / WORD_BITS],
        }
    }

    /// Ask each tag's owning provider whether `recipient` may see it.
    ///
    /// Tags whose owner is not registered in `hooks` are never selected.
    pub fn build<R: ?Sized>(store: &TagStore, recipient: &R, hooks: &Hooks<R>) -> Self {
        let mut sel = Self::with_len(store.len());
        for (i, tag) in store.iter().enumerate() {
            let visible = hooks
                .tag_provider(tag.owner())
                .is_some_and(|p| p.should_send_tag(recipient, tag));
            if visible {
                sel.insert(i);
            }
        }
        sel
    }

    /// Select the tag at `index`. Out-of-range indices are ignored.
    pub fn insert(&mut self, index: usize) {
        if index < self.len {
            self.bits[index / WORD_BITS] |= 1 << (index % WORD_BITS);
        }
    }

    /// Whether the tag at `index` is selected.
    pub fn contains(&self, index: usize) -> bool {
        index < self.len && self.bits[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Size of the store this selection was built against.
    pub fn store_len(&self) -> usize {
        self.len
    }

    /// Number of selected tags.
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.contains(i))
    }

    /// Selected tags of `store`, in wire order.
    pub fn tags<'a>(&'a self, store: &'a TagStore) -> impl Iterator<Item = &'a Tag> + 'a {
        self.indices().filter_map(move |i| store.get_index(i))
    }
}
