//! Fixed-size channel store
//!
//! A store holds one slot per configured channel. A slot is either empty or
//! holds exactly `sizes[index]` bytes; writes of any other length are rejected
//! and never touch the previous content.

use std::sync::Arc;

use bytes::Bytes;

/// Channel buffers for one owner (a client or the session)
#[derive(Debug, Clone)]
pub struct ChannelStore {
    /// Required payload length per channel index
    sizes: Arc<[usize]>,
    /// Latest accepted payload per channel index
    slots: Vec<Option<Bytes>>,
}

impl ChannelStore {
    /// Create an empty store shaped by a channel size table
    pub fn new(sizes: Arc<[usize]>) -> Self {
        let slots = vec![None; sizes.len()];
        Self { sizes, slots }
    }

    /// Number of channels in the store
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether the store has no channels at all
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Required payload length of a channel, if the index exists
    pub fn channel_size(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    /// Replace a channel's content
    ///
    /// Returns `false` without modifying anything if `index` is out of range
    /// or `payload` is not exactly the configured size for that channel.
    pub fn set_channel(&mut self, index: usize, payload: Bytes) -> bool {
        match self.sizes.get(index) {
            Some(&size) if payload.len() == size => {
                self.slots[index] = Some(payload);
                true
            }
            _ => false,
        }
    }

    /// Current content of a channel
    ///
    /// `None` if the channel was never set or the index is out of range.
    pub fn get_channel(&self, index: usize) -> Option<&Bytes> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Iterate set channels in increasing index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Bytes)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|data| (index, data)))
    }

    /// Number of channels currently holding data
    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
