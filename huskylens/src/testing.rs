//! In-memory device double for driver tests

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::BytesMut;
use huskylens_core::{V1Command, V1Frame, V2Command, V2Frame};
use huskylens_transport::{Error, Result, Transport};

#[derive(Default)]
struct Script {
    responses: VecDeque<Vec<u8>>,
    readable: VecDeque<u8>,
    writes: Vec<Vec<u8>>,
    flushes: usize,
    read_fault: Option<usize>,
}

/// Transport that answers each write with the next scripted response
///
/// Clones share state, so a test keeps one handle while the driver owns the
/// other.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn boxed(&self) -> Box<dyn Transport> {
        Box::new(self.clone())
    }

    /// Queue bytes released by the next unanswered write
    pub(crate) fn respond(&self, bytes: impl Into<Vec<u8>>) -> &Self {
        self.script.lock().unwrap().responses.push_back(bytes.into());
        self
    }

    /// Make bytes readable right away
    pub(crate) fn preload(&self, bytes: impl Into<Vec<u8>>) {
        self.script.lock().unwrap().readable.extend(bytes.into());
    }

    /// Fail one read once `reads` more reads have succeeded
    pub(crate) fn fail_read_after(&self, reads: usize) {
        self.script.lock().unwrap().read_fault = Some(reads);
    }

    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.script.lock().unwrap().writes.clone()
    }

    pub(crate) fn flushes(&self) -> usize {
        self.script.lock().unwrap().flushes
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut script = self.script.lock().unwrap();
        script.writes.push(data.to_vec());
        if let Some(response) = script.responses.pop_front() {
            script.readable.extend(response);
        }
        Ok(())
    }

    async fn read(&mut self, size: usize) -> Result<BytesMut> {
        let mut script = self.script.lock().unwrap();
        match script.read_fault {
            Some(0) => {
                script.read_fault = None;
                return Err(Error::Io(io::Error::other("bus nack")));
            }
            Some(reads) => script.read_fault = Some(reads - 1),
            None => {}
        }

        let take = size.min(script.readable.len());
        let bytes: Vec<u8> = script.readable.drain(..take).collect();
        Ok(BytesMut::from(&bytes[..]))
    }

    async fn flush(&mut self) -> Result<()> {
        let mut script = self.script.lock().unwrap();
        script.readable.clear();
        script.flushes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

pub(crate) fn v1_frame(command: V1Command, payload: &[u8]) -> Vec<u8> {
    V1Frame::with_payload(command, payload.to_vec())
        .encode()
        .unwrap()
        .to_vec()
}

pub(crate) fn v2_frame(command: V2Command, algorithm: u8, content: &[u8]) -> Vec<u8> {
    V2Frame::with_content(command, algorithm, content.to_vec())
        .encode()
        .unwrap()
        .to_vec()
}

/// Five little-endian `i16` fields, the V1 block/arrow payload
pub(crate) fn v1_result(fields: [i16; 5]) -> Vec<u8> {
    fields.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// V2 result content: id, confidence, then four `i16` fields and a tail
pub(crate) fn v2_result(id: i8, confidence: u8, fields: [i16; 4], tail: &[u8]) -> Vec<u8> {
    let mut content = vec![id as u8, confidence];
    content.extend(fields.iter().flat_map(|v| v.to_le_bytes()));
    content.extend_from_slice(tail);
    content
}

/// V2 info content announcing `count` results
pub(crate) fn v2_info(count: i16) -> Vec<u8> {
    let mut content = vec![0, 0];
    content.extend(count.to_le_bytes());
    content.extend([0; 6]);
    content
}
