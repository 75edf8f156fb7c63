//! Control-stream frames whose payload is a single varint.

use bytes::{BufMut, Bytes};

use super::{FrameType, expect_consumed, put_varint, take_varint, varint_len};
use crate::{
    error::MalformedError,
    varint::{MAX_VALUE, VarIntError},
};

macro_rules! single_varint_frame {
    ($(#[$meta:meta])* $name:ident, $field:ident, $frame_type:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            $field: u64,
        }

        impl $name {
            /// Build the frame.
            ///
            /// # Errors
            ///
            /// Returns [`VarIntError::ValueTooLarge`] if the value exceeds
            /// the varint range.
            pub const fn new($field: u64) -> Result<Self, VarIntError> {
                if $field > MAX_VALUE {
                    return Err(VarIntError::ValueTooLarge { value: $field });
                }
                Ok(Self { $field })
            }

            /// Carried identifier.
            #[must_use]
            pub const fn $field(&self) -> u64 { self.$field }

            pub(super) fn payload_len(&self) -> usize { varint_len(self.$field) }

            pub(super) fn encode<B: BufMut>(&self, dst: &mut B) { put_varint(self.$field, dst); }

            pub(super) fn decode(mut payload: Bytes) -> Result<Self, MalformedError> {
                let $field = take_varint($frame_type, &mut payload)?;
                expect_consumed($frame_type, &payload)?;
                Ok(Self { $field })
            }
        }
    };
}

single_varint_frame!(
    /// Asks the peer to abandon a server push.
    CancelPushFrame,
    push_id,
    FrameType::CancelPush
);

single_varint_frame!(
    /// Announces shutdown; requests or pushes above the identifier will not
    /// be processed.
    GoAwayFrame,
    id,
    FrameType::GoAway
);

single_varint_frame!(
    /// Raises the highest push identifier the server may use.
    MaxPushIdFrame,
    push_id,
    FrameType::MaxPushId
);
