//! Messages of the LED matrix protocol.
//!
//! The handshake is a single request/response exchange: the client announces
//! its protocol version, the grid dimensions and an application name, and
//! the display controller answers with a status byte and the maximum frame
//! rate it is willing to accept. After an accepted handshake the wire only
//! carries raw frames (width x height brightness bytes, no header), which
//! are produced by [`encode_frame`](crate::frame::encode_frame).

use super::{Error, MessageComponent};
use crate::constants::{
    APP_NAME,
    COLOR_MODE_GRAYSCALE,
    GRID_HEIGHT,
    GRID_WIDTH,
    PROTOCOL_VERSION,
};
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

pub const HANDSHAKE_ACCEPTED: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeRequest {
    pub version: u8,
    pub width: u8,
    pub height: u8,
    pub color_mode: u8,
    pub app_name: String,
}

impl Default for HandshakeRequest {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            color_mode: COLOR_MODE_GRAYSCALE,
            app_name: APP_NAME.to_owned(),
        }
    }
}

impl MessageComponent for HandshakeRequest {
    fn read(cursor: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        let version = cursor.read_u8()?;
        let width = cursor.read_u8()?;
        let height = cursor.read_u8()?;
        let color_mode = cursor.read_u8()?;
        let name_length = cursor.read_u8()?;
        let mut name = vec![0u8; usize::from(name_length)];
        cursor.read_exact(&mut name)?;
        Ok(Self {
            version,
            width,
            height,
            color_mode,
            app_name: String::from_utf8(name)?,
        })
    }

    fn write(&self, cursor: &mut Cursor<Vec<u8>>) -> Result<(), Error> {
        let name_length = u8::try_from(self.app_name.len()).map_err(|_| Error::ValueTooLarge {
            name: "app_name length",
            value: self.app_name.len(),
        })?;
        cursor.write_u8(self.version)?;
        cursor.write_u8(self.width)?;
        cursor.write_u8(self.height)?;
        cursor.write_u8(self.color_mode)?;
        cursor.write_u8(name_length)?;
        cursor.write_all(self.app_name.as_bytes()).map_err(Into::into)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeResponse {
    pub status: u8,
    pub max_fps: u8,
}

impl HandshakeResponse {
    pub fn accepted(&self) -> bool {
        self.status == HANDSHAKE_ACCEPTED
    }
}

impl MessageComponent for HandshakeResponse {
    fn read(cursor: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        let mut bytes = [0u8; 2];
        cursor
            .read_exact(&mut bytes)
            .map_err(|_| Error::MalformedResponse("shorter than two bytes"))?;
        let [status, max_fps] = bytes;
        // A max FPS of zero would make the frame interval a division by zero.
        if max_fps == 0 {
            return Err(Error::MalformedResponse("max FPS of zero"));
        }
        Ok(Self { status, max_fps })
    }

    fn write(&self, cursor: &mut Cursor<Vec<u8>>) -> Result<(), Error> {
        cursor.write_u8(self.status)?;
        cursor.write_u8(self.max_fps).map_err(Into::into)
    }
}
