//! In-process stand-in for the radio link: a [`Transport`] wired directly
//! to an emulated display controller. Completions still travel through the
//! event channel, so callers see the same asynchronous shape as with a real
//! link.

use crate::io::{DeviceId, DeviceInfo, SendError, Transport, TransportEvent};
use common::messages::{ledm::HandshakeRequest, MessageComponent};
use crossbeam_channel::Sender;
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MachineState {
    AwaitingHandshake,
    Streaming { width: u8, height: u8 },
}

/// Emulated Connection Machine: answers the handshake with a configurable
/// status and frame rate, then counts the frames it receives.
#[derive(Debug)]
pub struct EmulatedMachine {
    id: DeviceId,
    name: String,
    handshake_status: u8,
    max_fps: u8,
    state: MachineState,
    pending_response: Option<Vec<u8>>,
    handshake_request: Option<HandshakeRequest>,
    frames_received: usize,
    last_frame: Option<Vec<u8>>,
}

impl EmulatedMachine {
    pub fn new(name: &str, handshake_status: u8, max_fps: u8) -> Self {
        Self {
            id: format!("00:00:{:02x}", name.len()),
            name: name.to_owned(),
            handshake_status,
            max_fps,
            state: MachineState::AwaitingHandshake,
            pending_response: None,
            handshake_request: None,
            frames_received: 0,
            last_frame: None,
        }
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    pub fn frames_received(&self) -> usize {
        self.frames_received
    }

    pub fn last_frame(&self) -> Option<&[u8]> {
        self.last_frame.as_deref()
    }

    pub fn handshake_request(&self) -> Option<&HandshakeRequest> {
        self.handshake_request.as_ref()
    }

    fn receive(&mut self, data: &[u8]) {
        match self.state {
            MachineState::AwaitingHandshake => {
                let Ok(request) = HandshakeRequest::read(&mut Cursor::new(data)) else {
                    return;
                };
                self.pending_response = Some(vec![self.handshake_status, self.max_fps]);
                self.state = MachineState::Streaming {
                    width: request.width,
                    height: request.height,
                };
                self.handshake_request = Some(request);
            }
            MachineState::Streaming { width, height } => {
                if data.len() == usize::from(width) * usize::from(height) {
                    self.frames_received += 1;
                    self.last_frame = Some(data.to_vec());
                }
            }
        }
    }

    fn take_response(&mut self) -> Option<Vec<u8>> {
        self.pending_response.take()
    }
}

pub struct LoopbackTransport {
    sender: Sender<TransportEvent>,
    machine: EmulatedMachine,
    connected: bool,
}

impl LoopbackTransport {
    pub fn new(sender: Sender<TransportEvent>, machine: EmulatedMachine) -> Self {
        Self {
            sender,
            machine,
            connected: false,
        }
    }

    pub fn machine(&self) -> &EmulatedMachine {
        &self.machine
    }

    fn complete(&self, event: TransportEvent) -> Result<(), SendError> {
        self.sender.send(event).map_err(|_| SendError)
    }
}

impl Transport for LoopbackTransport {
    fn list(&mut self) -> Result<(), SendError> {
        let devices = vec![self.machine.device_info()];
        self.complete(TransportEvent::Devices(devices))
    }

    fn connect(&mut self, id: &DeviceId) -> Result<(), SendError> {
        if *id == self.machine.device_info().id {
            self.connected = true;
            self.complete(TransportEvent::Connected)
        } else {
            self.complete(TransportEvent::ConnectFailed)
        }
    }

    fn write(&mut self, data: Vec<u8>) -> Result<(), SendError> {
        if !self.connected {
            return self.complete(TransportEvent::WriteFailed);
        }
        self.machine.receive(&data);
        self.complete(TransportEvent::WriteOk)
    }

    fn read(&mut self) -> Result<(), SendError> {
        if !self.connected {
            return self.complete(TransportEvent::ReadFailed);
        }
        match self.machine.take_response() {
            Some(bytes) => self.complete(TransportEvent::Read(bytes)),
            None => self.complete(TransportEvent::ReadFailed),
        }
    }
}
