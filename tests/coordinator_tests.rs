// Scenario tests for the recording session coordinator, exercised through
// trait fakes so every failure mode in the state machine is reachable.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use tabscribe::bridge::messages::{CommandReply, StartRequest};
use tabscribe::capture::{
    CaptureDescriptor, CaptureHost, CaptureLink, CaptureManager, OffscreenStartCommand,
};
use tabscribe::coordinator::{SessionCoordinator, StreamTokenResolver, TabInfo, TabResolver};
use tabscribe::state::{MemoryStateStore, StateStore};
use tabscribe::Platform;

#[derive(Default)]
struct FakeHost {
    exists: AtomicBool,
    create_calls: AtomicUsize,
    destroy_calls: AtomicUsize,
}

#[async_trait]
impl CaptureHost for FakeHost {
    async fn create(&self, _descriptor: CaptureDescriptor) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.exists.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.exists.load(Ordering::SeqCst)
    }

    async fn destroy(&self) -> Result<()> {
        self.destroy_calls.fetch_add(1, Ordering::SeqCst);
        self.exists.store(false, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeTabs {
    tab: Mutex<Option<TabInfo>>,
}

#[async_trait]
impl TabResolver for FakeTabs {
    async fn active_tab(&self) -> Result<Option<TabInfo>> {
        Ok(self.tab.lock().unwrap().clone())
    }
}

struct FakeTokens {
    fail_with: Mutex<Option<String>>,
}

#[async_trait]
impl StreamTokenResolver for FakeTokens {
    async fn resolve(&self, tab: &TabInfo) -> Result<String> {
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            bail!(message);
        }
        Ok(format!("stream-{}", tab.id))
    }
}

struct FakeLink {
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    start_response: Mutex<Result<CommandReply, String>>,
    stop_response: Mutex<Result<CommandReply, String>>,
    last_start: Mutex<Option<OffscreenStartCommand>>,
}

impl Default for FakeLink {
    fn default() -> Self {
        Self {
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            start_response: Mutex::new(Ok(CommandReply::ok())),
            stop_response: Mutex::new(Ok(CommandReply::ok())),
            last_start: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CaptureLink for FakeLink {
    async fn start(&self, command: OffscreenStartCommand) -> Result<CommandReply> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_start.lock().unwrap() = Some(command);
        match self.start_response.lock().unwrap().clone() {
            Ok(reply) => Ok(reply),
            Err(message) => bail!(message),
        }
    }

    async fn stop(&self) -> Result<CommandReply> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        match self.stop_response.lock().unwrap().clone() {
            Ok(reply) => Ok(reply),
            Err(message) => bail!(message),
        }
    }
}

struct Fixture {
    state: Arc<MemoryStateStore>,
    host: Arc<FakeHost>,
    tabs: Arc<FakeTabs>,
    tokens: Arc<FakeTokens>,
    link: Arc<FakeLink>,
    coordinator: SessionCoordinator,
}

fn meet_tab() -> TabInfo {
    TabInfo {
        id: "tab-1".to_string(),
        url: "https://meet.google.com/abc-defg-hij".to_string(),
    }
}

fn start_request() -> StartRequest {
    StartRequest {
        credential: "t".to_string(),
        server_address: "nats://stt.example:4222".to_string(),
        title: "m".to_string(),
    }
}

fn fixture() -> Fixture {
    let state = Arc::new(MemoryStateStore::new());
    let host = Arc::new(FakeHost::default());
    let tabs = Arc::new(FakeTabs {
        tab: Mutex::new(Some(meet_tab())),
    });
    let tokens = Arc::new(FakeTokens {
        fail_with: Mutex::new(None),
    });
    let link = Arc::new(FakeLink::default());

    let coordinator = SessionCoordinator::new(
        state.clone(),
        CaptureManager::new(host.clone()),
        CaptureDescriptor {
            subject: "test.offscreen".to_string(),
            justification: "test capture".to_string(),
        },
        tabs.clone(),
        tokens.clone(),
        link.clone(),
    );

    Fixture {
        state,
        host,
        tabs,
        tokens,
        link,
        coordinator,
    }
}

#[tokio::test]
async fn test_start_success_sets_flag_and_forwards_request() {
    let f = fixture();

    let reply = f.coordinator.start(start_request()).await;

    assert!(reply.success);
    assert_eq!(reply.error, None);
    assert!(f.state.is_recording().await.unwrap());
    assert_eq!(f.host.create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.link.start_calls.load(Ordering::SeqCst), 1);

    let command = f.link.last_start.lock().unwrap().clone().unwrap();
    assert_eq!(command.stream_token, "stream-tab-1");
    assert_eq!(command.credential, "t");
    assert_eq!(command.meeting_url, "https://meet.google.com/abc-defg-hij");
    assert_eq!(command.platform, Platform::GoogleMeet);
    assert_eq!(command.server_address, "nats://stt.example:4222");
    assert_eq!(command.title, "m");
}

#[tokio::test]
async fn test_start_while_recording_fails_fast() {
    let f = fixture();
    f.state.set_recording(true).await.unwrap();

    let reply = f.coordinator.start(start_request()).await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("Already recording"));
    // Fast-fail guard: no capture-context operations performed.
    assert_eq!(f.host.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.link.start_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_start_without_active_tab() {
    let f = fixture();
    *f.tabs.tab.lock().unwrap() = None;

    let reply = f.coordinator.start(start_request()).await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("No active tab found"));
    assert!(!f.state.is_recording().await.unwrap());
    assert_eq!(f.link.start_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stream_token_failure_passes_message_through() {
    let f = fixture();
    *f.tokens.fail_with.lock().unwrap() = Some("tab capture not permitted".to_string());

    let reply = f.coordinator.start(start_request()).await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("tab capture not permitted"));
    assert!(!f.state.is_recording().await.unwrap());
    assert_eq!(f.link.start_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_capture_ack_failure_keeps_flag_false() {
    let f = fixture();
    *f.link.start_response.lock().unwrap() = Ok(CommandReply::failure("mic denied"));

    let reply = f.coordinator.start(start_request()).await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("mic denied"));
    assert!(!f.state.is_recording().await.unwrap());
}

#[tokio::test]
async fn test_capture_ack_failure_without_message_uses_generic_error() {
    let f = fixture();
    *f.link.start_response.lock().unwrap() = Ok(CommandReply {
        success: false,
        error: None,
    });

    let reply = f.coordinator.start(start_request()).await;

    assert!(!reply.success);
    assert_eq!(
        reply.error.as_deref(),
        Some("Failed to start offscreen recording")
    );
    assert!(!f.state.is_recording().await.unwrap());
}

#[tokio::test]
async fn test_unreachable_capture_context_fails_start() {
    let f = fixture();
    *f.link.start_response.lock().unwrap() = Err("capture context unreachable".to_string());

    let reply = f.coordinator.start(start_request()).await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("capture context unreachable"));
    assert!(!f.state.is_recording().await.unwrap());
}

#[tokio::test]
async fn test_stop_clears_flag_and_destroys_context() {
    let f = fixture();
    assert!(f.coordinator.start(start_request()).await.success);

    let reply = f.coordinator.stop().await;

    assert!(reply.success);
    assert!(!f.state.is_recording().await.unwrap());
    assert_eq!(f.link.stop_calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.host.destroy_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stop_with_no_context_succeeds() {
    let f = fixture();

    let reply = f.coordinator.stop().await;

    assert!(reply.success);
    assert!(!f.state.is_recording().await.unwrap());
    // No context existed, so nothing was destroyed.
    assert_eq!(f.host.destroy_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stop_tolerates_unreachable_context() {
    let f = fixture();
    assert!(f.coordinator.start(start_request()).await.success);
    *f.link.stop_response.lock().unwrap() = Err("offscreen not listening".to_string());

    let reply = f.coordinator.stop().await;

    // The send failure is absorbed; the caller still gets a clean stop.
    assert!(reply.success);
    assert_eq!(reply.error, None);
    assert!(!f.state.is_recording().await.unwrap());
    assert_eq!(f.host.destroy_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stop_reports_the_capture_contexts_own_result() {
    let f = fixture();
    assert!(f.coordinator.start(start_request()).await.success);
    *f.link.stop_response.lock().unwrap() = Ok(CommandReply::failure("flush failed"));

    let reply = f.coordinator.stop().await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("flush failed"));
    // The flag is cleared regardless of what the context reported.
    assert!(!f.state.is_recording().await.unwrap());
}

#[tokio::test]
async fn test_stop_heals_flag_set_without_context() {
    let f = fixture();
    f.state.set_recording(true).await.unwrap();

    let reply = f.coordinator.stop().await;

    assert!(reply.success);
    assert!(!f.state.is_recording().await.unwrap());
}

#[tokio::test]
async fn test_flag_follows_start_stop_lifecycle() {
    let f = fixture();

    assert!(f.coordinator.start(start_request()).await.success);
    assert!(f.state.is_recording().await.unwrap());

    // A second start is rejected while the first session is live.
    let second = f.coordinator.start(start_request()).await;
    assert!(!second.success);
    assert_eq!(second.error.as_deref(), Some("Already recording"));

    assert!(f.coordinator.stop().await.success);
    assert!(!f.state.is_recording().await.unwrap());

    // And a fresh start succeeds again afterwards.
    assert!(f.coordinator.start(start_request()).await.success);
    assert!(f.state.is_recording().await.unwrap());
}
