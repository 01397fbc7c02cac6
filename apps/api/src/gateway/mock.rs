//! Counting in-memory backend for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::composer::GenerationRequest;
use crate::gateway::{GenerationBackend, GenerationError};

/// Replies with a canned result and records every call.
pub struct MockBackend {
    reply: Result<String, GenerationError>,
    calls: AtomicUsize,
    last: Mutex<Option<(GenerationRequest, String)>>,
}

impl MockBackend {
    pub fn new(reply: Result<String, GenerationError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(Ok(text.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<(GenerationRequest, String)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn submit(
        &self,
        request: &GenerationRequest,
        credential: &str,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((request.clone(), credential.to_string()));
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "mock"
    }
}
