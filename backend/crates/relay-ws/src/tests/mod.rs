
use crate::{ConnectionHandle, ConnectionLimits, ConnectionRegistry, InstitutionId};

use axum::extract::ws::Message;
use tokio::sync::mpsc;

pub(crate) fn institution(id: u64) -> InstitutionId {
    InstitutionId::new(id).expect("test institution ids are non-zero")
}

/// Handle whose outbound queue is drained by the returned receiver
pub(crate) fn live_handle(id: u64, buffer: usize) -> (ConnectionHandle, mpsc::Receiver<Message>) {
    let (tx, rx) = mpsc::channel(buffer);
    (ConnectionHandle::new(institution(id), "127.0.0.1:50000", tx), rx)
}

/// Handle whose receiving side has already gone away
pub(crate) fn dead_handle(id: u64) -> ConnectionHandle {
    let (handle, rx) = live_handle(id, 1);
    drop(rx);
    handle
}

pub(crate) fn registry() -> ConnectionRegistry {
    ConnectionRegistry::new(ConnectionLimits::default())
}
