//! Hub-to-client text notices

use std::fmt;

use super::constants::{ERROR_CAPACITY, TAG_ASSIGNED, TAG_ERROR, TAG_LEAVE, TAG_PRESENT};
use super::frame::OutboundFrame;
use crate::registry::ClientId;

/// A control notice sent by the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// "You are client `id`" (`I<id>`)
    Assigned(ClientId),
    /// "Client `id` is present" (`N<id>`)
    Present(ClientId),
    /// "Client `id` left" (`L<id>`)
    Left(ClientId),
    /// No free slot; the connection is closed after this (`E1`)
    CapacityExceeded,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Assigned(id) => write!(f, "{}{}", TAG_ASSIGNED, id),
            Notice::Present(id) => write!(f, "{}{}", TAG_PRESENT, id),
            Notice::Left(id) => write!(f, "{}{}", TAG_LEAVE, id),
            Notice::CapacityExceeded => write!(f, "{}{}", TAG_ERROR, ERROR_CAPACITY),
        }
    }
}

impl From<Notice> for OutboundFrame {
    fn from(notice: Notice) -> Self {
        OutboundFrame::Text(notice.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        let id = ClientId::new(5).unwrap();

        assert_eq!(Notice::Assigned(id).to_string(), "I5");
        assert_eq!(Notice::Present(id).to_string(), "N5");
        assert_eq!(Notice::Left(id).to_string(), "L5");
        assert_eq!(Notice::CapacityExceeded.to_string(), "E1");
    }

    #[test]
    fn test_notice_into_outbound() {
        let frame: OutboundFrame = Notice::Left(ClientId::new(126).unwrap()).into();
        assert_eq!(frame, OutboundFrame::Text("L126".into()));
    }
}
