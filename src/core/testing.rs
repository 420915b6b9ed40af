//! 記憶體內的傳輸替身，不需主機即可測試 gateway 與 dispatcher

use crate::domain::ports::{Credentials, ProcedureConnection, ProcedureTransport};
use crate::utils::error::TransportError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    connects: AtomicUsize,
    closes: AtomicUsize,
    probes: AtomicUsize,
    probe_fails: AtomicBool,
    calls: Mutex<Vec<(String, String)>>,
    reply: Mutex<Option<std::result::Result<Option<String>, String>>>,
}

#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub(crate) fn replying(output: &str) -> Self {
        let transport = Self::default();
        transport.set_reply(Ok(Some(output.to_string())));
        transport
    }

    pub(crate) fn failing(message: &str) -> Self {
        let transport = Self::default();
        transport.set_reply(Err(message.to_string()));
        transport
    }

    pub(crate) fn set_reply(&self, reply: std::result::Result<Option<String>, String>) {
        *self.state.reply.lock().unwrap() = Some(reply);
    }

    pub(crate) fn fail_probe(&self) {
        self.state.probe_fails.store(true, Ordering::SeqCst);
    }

    pub(crate) fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn probes(&self) -> usize {
        self.state.probes.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.state.calls.lock().unwrap().clone()
    }
}

pub(crate) struct MockConnection {
    state: Arc<MockState>,
}

#[async_trait]
impl ProcedureTransport for MockTransport {
    type Connection = MockConnection;

    fn supports_driver(&self, driver: &str) -> bool {
        driver == crate::config::toml_config::DEFAULT_DRIVER
    }

    async fn connect(
        &self,
        _credentials: &Credentials,
    ) -> std::result::Result<MockConnection, TransportError> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        Ok(MockConnection {
            state: Arc::clone(&self.state),
        })
    }
}

#[async_trait]
impl ProcedureConnection for MockConnection {
    async fn call(
        &mut self,
        procedure: &str,
        input: &str,
    ) -> std::result::Result<Option<String>, TransportError> {
        self.state
            .calls
            .lock()
            .unwrap()
            .push((procedure.to_string(), input.to_string()));

        match self.state.reply.lock().unwrap().clone() {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(TransportError::Protocol(message)),
            None => Ok(None),
        }
    }

    async fn probe(&mut self) -> std::result::Result<Option<i64>, TransportError> {
        self.state.probes.fetch_add(1, Ordering::SeqCst);
        if self.state.probe_fails.load(Ordering::SeqCst) {
            return Err(TransportError::Connect("host unreachable".to_string()));
        }
        Ok(Some(1))
    }

    async fn close(self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}
