// ── Controller facade ──
//
// Owns the transport, the sync task, and the store for one field
// controller. Background tasks start on first use and stop for good on
// `disconnect()`.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fieldlink_api::{ConnectionState, Envelope, ReconnectConfig, Transport, TransportConfig};

use crate::command::{Command, CommandSender};
use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::model::DerivedMatchState;
use crate::store::MatchStore;
use crate::stream::MatchStream;
use crate::sync::Synchronizer;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Dropping the last clone
/// tears everything down, same as [`disconnect()`](Self::disconnect)
/// without waiting for the tasks to finish.
#[derive(Clone)]
pub struct FieldController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    store: Arc<MatchStore>,
    connection_state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
    running: Mutex<Option<Running>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

/// Handles that exist once the background tasks are up.
struct Running {
    transport: Arc<Transport>,
    commands: CommandSender,
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl FieldController {
    /// Create a controller client. Nothing is spawned or dialled yet.
    pub fn new(config: ControllerConfig) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(ControllerInner {
                config,
                store: Arc::new(MatchStore::new()),
                connection_state,
                cancel: CancellationToken::new(),
                running: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<MatchStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Start dialling. Returns immediately; watch
    /// [`connection_state()`](Self::connection_state) for progress.
    /// Calling it again while connecting or connected does nothing.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect(&self) -> Result<(), CoreError> {
        let running = self.ensure_started()?;
        running.transport.connect();
        Ok(())
    }

    /// Stop reconnecting, close the socket, and wait for the background
    /// tasks to exit. Commands still queued are discarded. Terminal: the
    /// client cannot be reconnected afterwards.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        let handles: Vec<JoinHandle<()>> = match self.inner.task_handles.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "background task ended abnormally");
            }
        }

        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("controller client torn down");
    }

    /// Build a client, connect, run `f`, wait for sent commands to reach
    /// the socket, then tear down. For one-shot CLI invocations.
    pub async fn oneshot<F, Fut, T>(config: ControllerConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(FieldController) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let timeout = config.timeout;
        let controller = FieldController::new(config);
        controller.connect()?;

        let result = f(controller.clone()).await;
        let drained = match &result {
            Ok(_) => controller.drain(timeout).await,
            Err(_) => Ok(()),
        };
        controller.disconnect().await;

        let value = result?;
        drained?;
        Ok(value)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Send one command. Queued if the link is down.
    pub fn execute(&self, command: Command) -> Result<(), CoreError> {
        self.commands()?.send(command)
    }

    /// A cloneable sender for handing to other tasks.
    pub fn commands(&self) -> Result<CommandSender, CoreError> {
        Ok(self.ensure_started()?.commands)
    }

    /// Wait until every command handed over so far has been written to a
    /// live socket.
    pub async fn drain(&self, timeout: Duration) -> Result<(), CoreError> {
        let transport = match self.lock_running()?.as_ref() {
            Some(running) => Arc::clone(&running.transport),
            None => return Ok(()),
        };
        tokio::time::timeout(timeout, transport.drained())
            .await
            .map_err(|_| timeout_error(timeout))
    }

    // ── State observation ────────────────────────────────────────────

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    pub fn snapshot(&self) -> DerivedMatchState {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> MatchStream<DerivedMatchState> {
        self.inner.store.subscribe()
    }

    /// Wait for the first status message, then return the derived state.
    pub async fn wait_for_status(&self, timeout: Duration) -> Result<DerivedMatchState, CoreError> {
        let mut remote = self.inner.store.subscribe_remote();
        let first_status = async {
            if remote.current().is_some() {
                return true;
            }
            while let Some(snapshot) = remote.changed().await {
                if snapshot.is_some() {
                    return true;
                }
            }
            false
        };

        match tokio::time::timeout(timeout, first_status).await {
            Ok(true) => Ok(self.snapshot()),
            Ok(false) => Err(CoreError::Shutdown),
            Err(_) => Err(timeout_error(timeout)),
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn lock_running(&self) -> Result<std::sync::MutexGuard<'_, Option<Running>>, CoreError> {
        self.inner
            .running
            .lock()
            .map_err(|_| CoreError::Internal("controller state lock poisoned".into()))
    }

    /// Spawn the transport and sync task on first use.
    fn ensure_started(&self) -> Result<RunningRef, CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::Shutdown);
        }

        let mut running = self.lock_running()?;
        if let Some(r) = running.as_ref() {
            return Ok(RunningRef::from(r));
        }

        let config = &self.inner.config;
        let url = config.ws_url()?;
        info!(%url, "starting field controller client");

        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let transport_config = TransportConfig {
            url,
            reconnect: ReconnectConfig {
                delay: config.reconnect_delay,
            },
            connect_timeout: config.connect_timeout,
        };
        let (transport, transport_task) =
            Transport::spawn(transport_config, inbound_tx, self.inner.cancel.child_token());
        let transport = Arc::new(transport);

        let sync_task = tokio::spawn(sync_task(
            Arc::clone(&self.inner.store),
            self.inner.connection_state.clone(),
            inbound_rx,
            transport.connection_state(),
            self.inner.cancel.clone(),
        ));

        match self.inner.task_handles.lock() {
            Ok(mut handles) => handles.extend([transport_task, sync_task]),
            Err(poisoned) => poisoned.into_inner().extend([transport_task, sync_task]),
        }

        let r = Running {
            commands: CommandSender::new(Arc::clone(&transport)),
            transport,
        };
        let out = RunningRef::from(&r);
        *running = Some(r);
        Ok(out)
    }
}

/// Owned clones of the running handles, so no lock is held by callers.
struct RunningRef {
    transport: Arc<Transport>,
    commands: CommandSender,
}

impl From<&Running> for RunningRef {
    fn from(r: &Running) -> Self {
        Self {
            transport: Arc::clone(&r.transport),
            commands: r.commands.clone(),
        }
    }
}

fn timeout_error(timeout: Duration) -> CoreError {
    CoreError::Timeout {
        timeout_secs: u64::try_from(timeout.as_millis().div_ceil(1000)).unwrap_or(u64::MAX),
    }
}

// ── Background sync task ─────────────────────────────────────────────

/// Folds inbound envelopes and link-state changes into the store. Runs
/// until cancelled or the transport goes away.
async fn sync_task(
    store: Arc<MatchStore>,
    connection_out: watch::Sender<ConnectionState>,
    mut inbound_rx: mpsc::UnboundedReceiver<Envelope>,
    mut link_rx: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
) {
    let mut sync = Synchronizer::new();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = link_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *link_rx.borrow_and_update();
                match state {
                    ConnectionState::Connected => info!("connected to field controller"),
                    ConnectionState::Disconnected => info!("field controller link down"),
                    ConnectionState::Connecting => debug!("dialling field controller"),
                }
                sync.set_connection_state(state);
                store.publish_state(&sync);
                connection_out.send_replace(state);
            }
            envelope = inbound_rx.recv() => {
                let Some(envelope) = envelope else { break };
                let applied = sync.apply(envelope);
                store.publish(&sync, applied);
            }
        }
    }

    sync.set_connection_state(ConnectionState::Disconnected);
    store.publish_state(&sync);
    connection_out.send_replace(ConnectionState::Disconnected);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use pretty_assertions::assert_eq;
    use tokio::net::{TcpListener, TcpStream};
    use tokio_tungstenite::WebSocketStream;
    use tokio_tungstenite::tungstenite::Message;

    use super::*;
    use crate::model::{HubStatus, Period};

    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    async fn listen() -> (TcpListener, ControllerConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ControllerConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            reconnect_delay: Duration::from_millis(200),
            timeout: TEST_TIMEOUT,
            ..ControllerConfig::default()
        };
        (listener, config)
    }

    async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
        let (tcp, _) = tokio::time::timeout(TEST_TIMEOUT, listener.accept())
            .await
            .expect("client never dialled")
            .unwrap();
        tokio_tungstenite::accept_async(tcp).await.unwrap()
    }

    async fn next_text(ws: &mut WebSocketStream<TcpStream>) -> serde_json::Value {
        loop {
            let frame = tokio::time::timeout(TEST_TIMEOUT, ws.next())
                .await
                .expect("no frame from client");
            match frame {
                Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
                Some(Ok(_)) => {}
                other => panic!("unexpected frame: {other:?}"),
            }
        }
    }

    const SHIFT4_STATUS: &str = r#"{"type":"status","ts":1.0,"estop_ok":true,"ball_count":88,
        "match":{"running":true,"paused":false,"period":"shift4","match_time_left":40,
        "time_left_in_period":1,"hub_active":true,"warn_deactivate":true,"led_mode":"pulse",
        "auto_winner":"blue","hub_side":"blue","force_mode":null,"field_safe":null}}"#;

    #[tokio::test]
    async fn status_flows_into_the_store() {
        let (listener, config) = listen().await;
        let controller = FieldController::new(config);
        controller.connect().unwrap();

        let mut ws = accept(&listener).await;
        ws.send(Message::text(SHIFT4_STATUS)).await.unwrap();

        let state = controller.wait_for_status(TEST_TIMEOUT).await.unwrap();
        assert_eq!(state.period, Period::Shift4);
        assert_eq!(state.time_remaining, 40);
        assert_eq!(state.blue_hub_status, HubStatus::Warning);
        assert_eq!(state.red_hub_status, HubStatus::Inactive);
        assert_eq!(state.global_ball_count, 88);

        controller.disconnect().await;
    }

    #[tokio::test]
    async fn scores_reach_subscribers() {
        let (listener, config) = listen().await;
        let controller = FieldController::new(config);
        let mut log = controller.store().subscribe_scoring_log();
        controller.connect().unwrap();

        let mut ws = accept(&listener).await;
        ws.send(Message::text(r#"{"type":"score","count":5,"exit":1,"ts":1.0}"#))
            .await
            .unwrap();
        ws.send(Message::text(r#"{"type":"score","count":12,"exit":3,"ts":2.0}"#))
            .await
            .unwrap();

        let events = tokio::time::timeout(TEST_TIMEOUT, async {
            loop {
                let events = log.changed().await.unwrap();
                if events.len() == 2 {
                    return events;
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(events[0].count_at_event, 12);
        assert_eq!(events[1].count_at_event, 5);
        assert_eq!(controller.snapshot().global_ball_count, 12);

        controller.disconnect().await;
    }

    #[tokio::test]
    async fn commands_issued_before_connect_arrive_in_order() {
        let (listener, config) = listen().await;
        let controller = FieldController::new(config);

        controller.execute(Command::StartMatch).unwrap();
        controller.execute(Command::SetMotor { percent: 0.5 }).unwrap();

        let mut ws = accept(&listener).await;
        assert_eq!(next_text(&mut ws).await["type"], "match_start");
        let motor = next_text(&mut ws).await;
        assert_eq!(motor["type"], "motor");
        assert_eq!(motor["percent"], 0.5);

        controller.drain(TEST_TIMEOUT).await.unwrap();
        controller.disconnect().await;
    }

    #[tokio::test]
    async fn connection_state_is_mirrored() {
        let (listener, config) = listen().await;
        let controller = FieldController::new(config);
        let mut state = controller.connection_state();
        controller.connect().unwrap();
        let _ws = accept(&listener).await;

        tokio::time::timeout(TEST_TIMEOUT, state.wait_for(|s| *s == ConnectionState::Connected))
            .await
            .unwrap()
            .unwrap();
        let derived = controller.subscribe();
        assert_eq!(
            derived.latest().connection_state,
            ConnectionState::Connected
        );

        controller.disconnect().await;
        assert_eq!(*controller.connection_state().borrow(), ConnectionState::Disconnected);
        assert_eq!(
            controller.snapshot().connection_state,
            ConnectionState::Disconnected
        );
    }

    #[tokio::test]
    async fn disconnect_is_terminal() {
        let (_listener, config) = listen().await;
        let controller = FieldController::new(config);
        controller.connect().unwrap();
        controller.disconnect().await;

        assert!(matches!(controller.connect(), Err(CoreError::Shutdown)));
        assert!(matches!(
            controller.execute(Command::Ping),
            Err(CoreError::Shutdown)
        ));
    }

    #[tokio::test]
    async fn wait_for_status_times_out() {
        let (listener, config) = listen().await;
        let controller = FieldController::new(config);
        controller.connect().unwrap();
        let _ws = accept(&listener).await;

        let err = controller
            .wait_for_status(Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 1 }));
        controller.disconnect().await;
    }

    #[tokio::test]
    async fn oneshot_flushes_before_teardown() {
        let (listener, config) = listen().await;
        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            next_text(&mut ws).await
        });

        FieldController::oneshot(config, |c| async move { c.execute(Command::ResetCount) })
            .await
            .unwrap();

        let frame = server.await.unwrap();
        assert_eq!(frame["type"], "reset_count");
    }
}
