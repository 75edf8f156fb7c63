//! `SETTINGS` frame: a list of identifier/value pairs.

use std::collections::HashSet;

use bytes::{BufMut, Bytes};

use super::{FrameType, put_varint, take_varint, varint_len};
use crate::{
    error::MalformedError,
    varint::{MAX_VALUE, VarIntError},
};

/// A single setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Setting {
    /// Setting identifier.
    pub id: u64,
    /// Setting value.
    pub value: u64,
}

/// Connection parameters sent once at the start of the control stream.
///
/// Identifiers are unique within a frame and the identifiers HTTP/2 used
/// (`0x00`, `0x02`–`0x05`) are rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsFrame {
    settings: Vec<Setting>,
}

impl SettingsFrame {
    /// Maximum dynamic table capacity of the header decoder.
    pub const QPACK_MAX_TABLE_CAPACITY: u64 = 0x01;
    /// Largest field section the sender will accept.
    pub const MAX_FIELD_SECTION_SIZE: u64 = 0x06;
    /// Number of streams that may be blocked on header decoding.
    pub const QPACK_BLOCKED_STREAMS: u64 = 0x07;

    /// Build a settings frame.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedError::InvalidPayload`] for duplicate or reserved
    /// identifiers and [`MalformedError::VarInt`] for values outside the
    /// varint range.
    ///
    /// # Examples
    ///
    /// ```
    /// use h3frame::frame::{Setting, SettingsFrame};
    ///
    /// let frame = SettingsFrame::new(vec![Setting {
    ///     id: SettingsFrame::MAX_FIELD_SECTION_SIZE,
    ///     value: 16_384,
    /// }])
    /// .expect("valid settings");
    /// assert_eq!(frame.get(SettingsFrame::MAX_FIELD_SECTION_SIZE), Some(16_384));
    /// ```
    pub fn new(settings: Vec<Setting>) -> Result<Self, MalformedError> {
        let mut seen = HashSet::with_capacity(settings.len());
        for setting in &settings {
            for value in [setting.id, setting.value] {
                if value > MAX_VALUE {
                    return Err(VarIntError::ValueTooLarge { value }.into());
                }
            }
            validate_id(setting.id, &mut seen)?;
        }
        Ok(Self { settings })
    }

    /// All settings in wire order.
    #[must_use]
    pub fn settings(&self) -> &[Setting] { &self.settings }

    /// Value of the setting with identifier `id`.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<u64> {
        self.settings
            .iter()
            .find(|setting| setting.id == id)
            .map(|setting| setting.value)
    }

    pub(super) fn payload_len(&self) -> usize {
        self.settings
            .iter()
            .map(|setting| varint_len(setting.id) + varint_len(setting.value))
            .sum()
    }

    pub(super) fn encode<B: BufMut>(&self, dst: &mut B) {
        for setting in &self.settings {
            put_varint(setting.id, dst);
            put_varint(setting.value, dst);
        }
    }

    pub(super) fn decode(mut payload: Bytes) -> Result<Self, MalformedError> {
        let mut settings: Vec<Setting> = Vec::new();
        let mut seen = HashSet::new();
        while !payload.is_empty() {
            let id = take_varint(FrameType::Settings, &mut payload)?;
            let value = take_varint(FrameType::Settings, &mut payload)?;
            validate_id(id, &mut seen)?;
            settings.push(Setting { id, value });
        }
        Ok(Self { settings })
    }
}

fn validate_id(id: u64, seen: &mut HashSet<u64>) -> Result<(), MalformedError> {
    if matches!(id, 0x00 | 0x02..=0x05) {
        return Err(MalformedError::InvalidPayload {
            frame_type: FrameType::Settings,
            reason: "reserved setting identifier",
        });
    }
    if !seen.insert(id) {
        return Err(MalformedError::InvalidPayload {
            frame_type: FrameType::Settings,
            reason: "duplicate setting identifier",
        });
    }
    Ok(())
}
