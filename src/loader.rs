//! Asynchronous image loads that can be superseded.
//!
//! The host supplies a future producing the raw file bytes (a file picker,
//! a drop event, a fetch). Starting a second load for the same target aborts
//! the first, and a result is only applied while its ticket is still the
//! current one for that target.

use crate::error::{EditorError, EditorResult};
use crate::image::PixelBuffer;
use futures::FutureExt as _;
use futures::future::{AbortHandle, Abortable, Aborted, BoxFuture};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Where a loaded image ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadTarget {
    /// Drawn onto the current layer, fitted and centred
    PlaceImage,
    /// Replaces the document, resizing the canvas to the image
    OpenDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub target: LoadTarget,
    generation: u64,
}

/// The outcome of a `PendingLoad`, to be handed back to the editor
#[derive(Debug)]
pub struct LoadedImage {
    pub ticket: LoadTicket,
    pub result: EditorResult<PixelBuffer>,
}

/// Decodes the bytes once the source future completes
pub struct PendingLoad {
    ticket: LoadTicket,
    source: Abortable<BoxFuture<'static, std::io::Result<Vec<u8>>>>,
}

impl PendingLoad {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }
}

impl Future for PendingLoad {
    type Output = LoadedImage;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let result = match Pin::new(&mut this.source).poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Ok(Ok(bytes))) => PixelBuffer::decode(&bytes),
            Poll::Ready(Ok(Err(err))) => Err(EditorError::Io(err)),
            Poll::Ready(Err(Aborted)) => Err(EditorError::LoadCancelled),
        };
        Poll::Ready(LoadedImage {
            ticket: this.ticket,
            result,
        })
    }
}

/// At most one in-flight load per target
#[derive(Debug, Default)]
pub struct ImageLoads {
    pending: HashMap<LoadTarget, (u64, AbortHandle)>,
    next_generation: u64,
}

impl ImageLoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load for `target`, aborting any earlier one for the same target
    pub fn begin<F>(&mut self, target: LoadTarget, source: F) -> PendingLoad
    where
        F: Future<Output = std::io::Result<Vec<u8>>> + Send + 'static,
    {
        self.cancel(target);

        let generation = self.next_generation;
        self.next_generation += 1;
        let (handle, registration) = AbortHandle::new_pair();
        self.pending.insert(target, (generation, handle));
        log::debug!("Started image load {generation} for {target:?}");

        PendingLoad {
            ticket: LoadTicket { target, generation },
            source: Abortable::new(source.boxed(), registration),
        }
    }

    /// Aborts the in-flight load for `target`, if any
    pub fn cancel(&mut self, target: LoadTarget) {
        if let Some((generation, handle)) = self.pending.remove(&target) {
            log::debug!("Cancelled image load {generation} for {target:?}");
            handle.abort();
        }
    }

    pub fn is_pending(&self, target: LoadTarget) -> bool {
        self.pending.contains_key(&target)
    }

    /// Claims a finished load. Returns `false` for a superseded ticket.
    pub fn finish(&mut self, ticket: LoadTicket) -> bool {
        match self.pending.get(&ticket.target) {
            Some((generation, _)) if *generation == ticket.generation => {
                self.pending.remove(&ticket.target);
                true
            }
            _ => false,
        }
    }
}
