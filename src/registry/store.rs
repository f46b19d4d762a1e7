//! Client registry implementation
//!
//! A fixed arena of client slots. Allocation always takes the lowest free
//! index and release clears the slot for immediate reuse, so id assignment is
//! deterministic for a given connect/disconnect sequence.

use std::sync::Arc;

use super::channels::ChannelStore;
use super::entry::{Client, ClientId};
use super::error::RegistryError;
use crate::protocol::constants::MAX_CLIENTS;

/// Bounded set of connected clients, indexed by slot
pub struct ClientRegistry<H> {
    /// One entry per slot; `None` means the index is free
    slots: Vec<Option<Client<H>>>,

    /// Channel size table shared by every client store
    client_channels: Arc<[usize]>,
}

impl<H> ClientRegistry<H> {
    /// Create a registry with the full `MAX_CLIENTS` capacity
    pub fn new(client_channels: Arc<[usize]>) -> Self {
        Self::with_capacity(MAX_CLIENTS, client_channels)
    }

    /// Create a registry with a reduced capacity
    ///
    /// Capacity is capped at `MAX_CLIENTS`.
    pub fn with_capacity(capacity: usize, client_channels: Arc<[usize]>) -> Self {
        let capacity = capacity.min(MAX_CLIENTS);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Self {
            slots,
            client_channels,
        }
    }

    /// Maximum number of simultaneous clients
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Place a new client in the lowest free slot
    pub fn allocate(&mut self, connection_id: u64, handle: H) -> Result<ClientId, RegistryError> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(RegistryError::CapacityExceeded {
                capacity: self.capacity(),
            })?;

        // capacity <= MAX_CLIENTS, so every slot index is a valid id
        let id = ClientId::new(index as u8).ok_or(RegistryError::CapacityExceeded {
            capacity: self.capacity(),
        })?;

        let channels = ChannelStore::new(Arc::clone(&self.client_channels));
        self.slots[index] = Some(Client::new(id, connection_id, handle, channels));

        tracing::trace!(client = %id, connection_id = connection_id, "Slot allocated");

        Ok(id)
    }

    /// Free a slot, returning the client that held it
    ///
    /// Releasing an empty slot is a no-op.
    pub fn release(&mut self, id: ClientId) -> Option<Client<H>> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    /// Get a client by id
    pub fn get(&self, id: ClientId) -> Option<&Client<H>> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Get a mutable client by id
    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client<H>> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Get a client only if the slot is still held by the given connection
    pub fn get_connection_mut(
        &mut self,
        id: ClientId,
        connection_id: u64,
    ) -> Option<&mut Client<H>> {
        self.get_mut(id)
            .filter(|client| client.connection_id == connection_id)
    }

    /// Whether a slot is occupied
    pub fn contains(&self, id: ClientId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate every mapped client in increasing slot order
    pub fn iter(&self) -> impl Iterator<Item = &Client<H>> {
        self.slots.iter().flatten()
    }

    /// Iterate joined clients in increasing slot order
    pub fn joined(&self) -> impl Iterator<Item = &Client<H>> {
        self.iter().filter(|client| client.joined)
    }

    /// Iterate every mapped client except `id`, in increasing slot order
    pub fn others(&self, id: ClientId) -> impl Iterator<Item = &Client<H>> {
        self.iter().filter(move |client| client.id != id)
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether every slot is occupied
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Whether no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ClientRegistry<()> {
        ClientRegistry::new(Arc::from(&[2usize, 4][..]))
    }

    #[test]
    fn test_allocate_lowest_free() {
        let mut registry = registry();

        let a = registry.allocate(1, ()).unwrap();
        let b = registry.allocate(2, ()).unwrap();
        let c = registry.allocate(3, ()).unwrap();

        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));

        registry.release(b);
        let d = registry.allocate(4, ()).unwrap();
        assert_eq!(d.index(), 1);
        assert_eq!(registry.get(d).unwrap().connection_id, 4);
    }

    #[test]
    fn test_capacity_exhaustion() {
        let mut registry = registry();

        for expected in 0..MAX_CLIENTS {
            let id = registry.allocate(expected as u64, ()).unwrap();
            assert_eq!(id.index(), expected);
        }
        assert_eq!(registry.len(), MAX_CLIENTS);
        assert!(registry.is_full());

        let result = registry.allocate(999, ());
        assert_eq!(
            result,
            Err(RegistryError::CapacityExceeded {
                capacity: MAX_CLIENTS
            })
        );
        assert_eq!(registry.len(), MAX_CLIENTS);
        assert!(registry.iter().all(|client| client.connection_id != 999));
    }

    #[test]
    fn test_with_capacity_capped() {
        let registry: ClientRegistry<()> =
            ClientRegistry::with_capacity(1000, Arc::from(Vec::<usize>::new()));
        assert_eq!(registry.capacity(), MAX_CLIENTS);

        let mut small: ClientRegistry<()> =
            ClientRegistry::with_capacity(2, Arc::from(Vec::<usize>::new()));
        small.allocate(1, ()).unwrap();
        small.allocate(2, ()).unwrap();
        assert!(small.allocate(3, ()).is_err());
    }

    #[test]
    fn test_release_idempotent() {
        let mut registry = registry();
        let id = registry.allocate(1, ()).unwrap();

        assert!(registry.release(id).is_some());
        assert!(registry.release(id).is_none());
        assert!(!registry.contains(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_client_store_shape() {
        let mut registry = registry();
        let id = registry.allocate(1, ()).unwrap();

        let client = registry.get(id).unwrap();
        assert!(!client.joined);
        assert_eq!(client.channels.len(), 2);
        assert_eq!(client.channels.channel_size(1), Some(4));
    }

    #[test]
    fn test_iteration_order_and_filters() {
        let mut registry = registry();
        let ids: Vec<ClientId> = (0..4).map(|n| registry.allocate(n, ()).unwrap()).collect();

        registry.get_mut(ids[1]).unwrap().joined = true;
        registry.get_mut(ids[3]).unwrap().joined = true;

        let joined: Vec<usize> = registry.joined().map(|c| c.id.index()).collect();
        assert_eq!(joined, vec![1, 3]);

        let others: Vec<usize> = registry.others(ids[2]).map(|c| c.id.index()).collect();
        assert_eq!(others, vec![0, 1, 3]);
    }

    #[test]
    fn test_get_connection_rejects_stale_connection() {
        let mut registry = registry();
        let id = registry.allocate(10, ()).unwrap();
        registry.release(id);
        let reused = registry.allocate(11, ()).unwrap();

        assert_eq!(id, reused);
        assert!(registry.get_connection_mut(id, 10).is_none());
        assert!(registry.get_connection_mut(id, 11).is_some());
    }
}
