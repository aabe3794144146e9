//! In-process transport used by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use crate::api::{ApiError, ApiResponse, RequestDescriptor, Transport};

/// A canned outcome for the next request.
pub(crate) enum Reply {
    Ok(u16, &'static str),
    Fail(u16, &'static str),
    Timeout,
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    sent: Mutex<Vec<(Url, RequestDescriptor)>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub(crate) fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub(crate) fn sent(&self, index: usize) -> (Url, RequestDescriptor) {
        self.sent.lock().unwrap()[index].clone()
    }

    pub(crate) fn last_sent(&self) -> (Url, RequestDescriptor) {
        self.sent
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, url: Url, request: RequestDescriptor) -> Result<ApiResponse, ApiError> {
        let timeout = request.timeout;
        self.sent.lock().unwrap().push((url, request));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Fail(599, "no reply queued"));

        match reply {
            Reply::Ok(code, body) => Ok(ApiResponse::new(
                StatusCode::from_u16(code).unwrap(),
                HeaderMap::new(),
                body.as_bytes().to_vec(),
            )),
            Reply::Fail(code, body) => Err(ApiError::from_status(
                StatusCode::from_u16(code).unwrap(),
                body,
            )),
            Reply::Timeout => Err(ApiError::Timeout(timeout.unwrap_or_default())),
        }
    }
}
