//! Channel update relay
//!
//! A valid update is stored in its owner's channel store and the original
//! frame is forwarded, byte for byte, to every other mapped connection.
//! Every failure is a silent drop: the sender gets no response either way.

use super::handle::ConnectionHandle;
use super::state::Session;
use crate::protocol::{ChannelUpdate, OutboundFrame};
use crate::registry::ClientId;

impl<H: ConnectionHandle> Session<H> {
    /// Apply a channel update from `sender` and relay it
    pub(super) fn relay_update(&mut self, sender: ClientId, update: ChannelUpdate) {
        // A client may only write its own channels or the session's
        if update.owner >= 0 && update.owner != sender.as_owner() {
            self.stats.updates_dropped += 1;
            self.stats.spoofed_updates += 1;
            tracing::debug!(
                client = %sender,
                owner = update.owner,
                channel = update.channel,
                "Dropped update for another client's channel"
            );
            return;
        }

        let store = if update.is_session_owned() {
            Some(&mut self.channels)
        } else {
            self.clients
                .get_mut(sender)
                .map(|client| &mut client.channels)
        };

        let Some(store) = store else {
            self.stats.updates_dropped += 1;
            return;
        };

        let applied = usize::try_from(update.channel)
            .map(|index| store.set_channel(index, update.payload()))
            .unwrap_or(false);

        if !applied {
            self.stats.updates_dropped += 1;
            tracing::debug!(
                client = %sender,
                owner = update.owner,
                channel = update.channel,
                len = update.payload().len(),
                "Dropped update: bad channel or size"
            );
            return;
        }

        self.stats.updates_applied += 1;

        let relayed = self.broadcast_except(sender, &OutboundFrame::Binary(update.raw().clone()));
        self.stats.rebroadcasts += relayed;

        tracing::trace!(
            client = %sender,
            owner = update.owner,
            channel = update.channel,
            recipients = relayed,
            "Update relayed"
        );
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::super::testing::*;
    use crate::protocol::{InboundFrame, OutboundFrame};

    #[test]
    fn test_session_update_stored_and_relayed() {
        let mut session = session();
        let (a, mut rx_a) = connect_joined(&mut session, 1);
        let (_b, mut rx_b) = connect_joined(&mut session, 2);
        let (_c, mut rx_c) = connect(&mut session, 3);
        drain(&mut rx_a);

        session.handle_frame(a, 1, update(-1, 0, &[1, 2, 3, 4]));

        assert_eq!(
            &session.session_channels().get_channel(0).unwrap()[..],
            &[1, 2, 3, 4]
        );
        // Relayed to everyone mapped, joined or not, but never the sender
        assert_eq!(drain(&mut rx_b), vec![binary(-1, 0, &[1, 2, 3, 4])]);
        assert_eq!(drain(&mut rx_c), vec![binary(-1, 0, &[1, 2, 3, 4])]);
        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(session.stats().rebroadcasts, 2);
    }

    #[test]
    fn test_own_channel_update() {
        let mut session = session();
        let (_a, mut rx_a) = connect_joined(&mut session, 1);
        let (b, mut rx_b) = connect_joined(&mut session, 2);
        drain(&mut rx_a);

        session.handle_frame(b, 2, update(1, 1, &[9, 9]));

        let stored = session.clients().get(b).unwrap().channels.get_channel(1).unwrap();
        assert_eq!(&stored[..], &[9, 9]);
        assert_eq!(drain(&mut rx_a), vec![binary(1, 1, &[9, 9])]);
        assert!(drain(&mut rx_b).is_empty());
    }

    #[test]
    fn test_relay_is_verbatim() {
        let mut session = session();
        let (a, _rx_a) = connect_joined(&mut session, 1);
        let (_b, mut rx_b) = connect_joined(&mut session, 2);

        // Owner -7 addresses the session store just like -1 and is relayed as sent
        let raw = Bytes::from_static(&[0xF9, 0x01, 0x42]);
        session.handle_frame(a, 1, InboundFrame::from_binary(raw.clone()).unwrap());

        assert_eq!(drain(&mut rx_b), vec![OutboundFrame::Binary(raw)]);
        assert_eq!(&session.session_channels().get_channel(1).unwrap()[..], &[0x42]);
    }

    #[test]
    fn test_spoofed_owner_dropped() {
        let mut session = session();
        let (a, _rx_a) = connect_joined(&mut session, 1);
        let (b, mut rx_b) = connect_joined(&mut session, 2);

        session.handle_frame(a, 1, update(b.as_owner(), 0, &[1, 2, 3]));

        assert!(session.clients().get(b).unwrap().channels.get_channel(0).is_none());
        assert!(session.clients().get(a).unwrap().channels.get_channel(0).is_none());
        assert!(drain(&mut rx_b).is_empty());
        assert_eq!(session.stats().spoofed_updates, 1);
    }

    #[test]
    fn test_owner_outside_slot_range_dropped() {
        let mut session = session();
        let (a, _rx_a) = connect_joined(&mut session, 1);
        let (_b, mut rx_b) = connect_joined(&mut session, 2);

        session.handle_frame(a, 1, update(127, 0, &[1, 2, 3]));

        assert!(drain(&mut rx_b).is_empty());
        assert_eq!(session.stats().updates_applied, 0);
    }

    #[test]
    fn test_wrong_size_dropped_silently() {
        let mut session = session();
        let (a, mut rx_a) = connect_joined(&mut session, 1);
        let (_b, mut rx_b) = connect_joined(&mut session, 2);
        drain(&mut rx_a);

        session.handle_frame(a, 1, update(-1, 0, &[1, 2, 3, 4]));
        drain(&mut rx_b);

        session.handle_frame(a, 1, update(-1, 0, &[7, 7, 7]));
        session.handle_frame(a, 1, update(-1, 0, &[7, 7, 7, 7, 7]));

        assert_eq!(
            &session.session_channels().get_channel(0).unwrap()[..],
            &[1, 2, 3, 4]
        );
        assert!(drain(&mut rx_b).is_empty());
        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(session.stats().updates_dropped, 2);
    }

    #[test]
    fn test_bad_channel_number_dropped() {
        let mut session = session();
        let (a, _rx_a) = connect_joined(&mut session, 1);
        let (_b, mut rx_b) = connect_joined(&mut session, 2);

        session.handle_frame(a, 1, update(-1, 2, &[1]));
        session.handle_frame(a, 1, update(-1, -1, &[1]));
        session.handle_frame(a, 1, update(a.as_owner(), 5, &[1, 2, 3]));

        assert!(drain(&mut rx_b).is_empty());
        assert_eq!(session.stats().updates_dropped, 3);
    }

    #[test]
    fn test_unjoined_sender_may_update() {
        let mut session = session();
        let (_a, mut rx_a) = connect_joined(&mut session, 1);
        let (b, _rx_b) = connect(&mut session, 2);

        session.handle_frame(b, 2, update(b.as_owner(), 0, &[4, 5, 6]));

        assert_eq!(drain(&mut rx_a), vec![binary(1, 0, &[4, 5, 6])]);
    }
}
