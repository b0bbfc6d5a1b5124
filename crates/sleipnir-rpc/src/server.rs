//! The RPC server: listener, worker pool, graceful shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::net::UnixListener;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use sleipnir_core::Universe;

use crate::actions::Dispatcher;
use crate::error::{Result, RpcError};
use crate::request::Request;
use crate::response::Response;

/// Maximum size of the worker pool.
pub const MAX_WORKERS: usize = 16;

/// How long a worker waits on a quiet connection before rechecking the
/// shutdown flag.
const RECEIVE_TIMEOUT: Duration = Duration::from_millis(1000);

/// How long a response write may take before the connection is dropped.
const SEND_TIMEOUT: Duration = Duration::from_millis(250);

const READ_CHUNK: usize = 8192;

trait Connection: AsyncRead + AsyncWrite + Send + Unpin {}
impl<T: AsyncRead + AsyncWrite + Send + Unpin> Connection for T {}

type BoxedConnection = Box<dyn Connection>;

enum Endpoint {
    Tcp(String),
    Ipc(PathBuf),
}

fn parse_endpoint(endpoint: &str) -> Result<Endpoint> {
    if let Some(address) = endpoint.strip_prefix("tcp://") {
        Ok(Endpoint::Tcp(address.to_owned()))
    } else if let Some(path) = endpoint.strip_prefix("ipc://") {
        Ok(Endpoint::Ipc(PathBuf::from(path)))
    } else {
        Err(RpcError::BadEndpoint(endpoint.to_owned()))
    }
}

enum Listener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Ipc(UnixListener),
}

impl Listener {
    async fn bind(endpoint: Endpoint) -> Result<Self> {
        match endpoint {
            Endpoint::Tcp(address) => Ok(Self::Tcp(TcpListener::bind(&address).await?)),
            #[cfg(unix)]
            Endpoint::Ipc(path) => {
                // A previous run may have left its socket file behind.
                let _ = std::fs::remove_file(&path);
                Ok(Self::Ipc(UnixListener::bind(&path)?))
            }
            #[cfg(not(unix))]
            Endpoint::Ipc(path) => Err(RpcError::BadEndpoint(path.display().to_string())),
        }
    }

    async fn accept(&self) -> std::io::Result<BoxedConnection> {
        match self {
            Self::Tcp(listener) => {
                let (stream, _) = listener.accept().await?;
                let _ = stream.set_nodelay(true);
                Ok(Box::new(stream))
            }
            #[cfg(unix)]
            Self::Ipc(listener) => {
                let (stream, _) = listener.accept().await?;
                Ok(Box::new(stream))
            }
        }
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        match self {
            Self::Tcp(listener) => listener.local_addr().ok(),
            #[cfg(unix)]
            Self::Ipc(_) => None,
        }
    }
}

struct Running {
    shutdown: watch::Sender<bool>,
    local_addr: Option<SocketAddr>,
    handles: Vec<JoinHandle<()>>,
}

/// Serves the wire protocol over one bound endpoint.
///
/// Accepted connections are fed through a channel to a fixed pool of
/// workers; each worker serves one connection at a time, request by
/// request. Handlers run synchronously from decode to encode, so a worker
/// blocks only on socket reads and lock acquisition.
pub struct Server {
    universe: Arc<Universe>,
    dispatcher: Arc<Dispatcher>,
    state: Mutex<Option<Running>>,
}

impl Server {
    /// Create a server over a universe and a populated dispatch table.
    pub fn new(universe: Arc<Universe>, dispatcher: Dispatcher) -> Self {
        Self {
            universe,
            dispatcher: Arc::new(dispatcher),
            state: Mutex::new(None),
        }
    }

    /// Bind `endpoint` and start `workers` worker tasks.
    ///
    /// Supported endpoints are `tcp://host:port` and `ipc:///path/socket`.
    /// Calling `listen` while already running is a no-op.
    pub async fn listen(&self, endpoint: &str, workers: usize) -> Result<()> {
        if workers == 0 || workers > MAX_WORKERS {
            return Err(RpcError::CapacityExceeded);
        }

        let mut state = self.state.lock().await;
        if state.is_some() {
            return Ok(());
        }

        let listener = Listener::bind(parse_endpoint(endpoint)?).await?;
        let local_addr = listener.local_addr();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (conn_tx, conn_rx) = mpsc::channel::<BoxedConnection>(MAX_WORKERS);
        let conn_rx = Arc::new(Mutex::new(conn_rx));

        let mut handles = Vec::with_capacity(workers + 1);
        for worker in 0..workers {
            handles.push(tokio::spawn(worker_loop(
                worker,
                Arc::clone(&self.universe),
                Arc::clone(&self.dispatcher),
                Arc::clone(&conn_rx),
                shutdown_rx.clone(),
            )));
        }
        handles.push(tokio::spawn(accept_loop(
            listener,
            conn_tx,
            shutdown_rx.clone(),
        )));

        info!(endpoint, workers, "listening");
        *state = Some(Running {
            shutdown: shutdown_tx,
            local_addr,
            handles,
        });
        Ok(())
    }

    /// Stop accepting, drain the workers, and join every task.
    ///
    /// Calling `stop` while not running is a no-op.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if let Some(running) = state.take() {
            let _ = running.shutdown.send(true);
            for handle in running.handles {
                let _ = handle.await;
            }
            info!("stopped");
        }
    }

    /// The bound TCP address, when listening on a `tcp://` endpoint.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.state.lock().await.as_ref().and_then(|r| r.local_addr)
    }
}

async fn accept_loop(
    listener: Listener,
    conn_tx: mpsc::Sender<BoxedConnection>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok(conn) => {
                    if conn_tx.send(conn).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }
    }
}

async fn worker_loop(
    worker: usize,
    universe: Arc<Universe>,
    dispatcher: Arc<Dispatcher>,
    conn_rx: Arc<Mutex<mpsc::Receiver<BoxedConnection>>>,
    mut shutdown: watch::Receiver<bool>,
) {
    debug!(worker, "worker started");
    loop {
        let conn = {
            let mut rx = conn_rx.lock().await;
            tokio::select! {
                _ = shutdown.changed() => break,
                conn = rx.recv() => match conn {
                    Some(conn) => conn,
                    None => break,
                }
            }
        };
        serve_connection(conn, &universe, &dispatcher, &mut shutdown).await;
        if *shutdown.borrow() {
            break;
        }
    }
    debug!(worker, "worker exited");
}

async fn serve_connection(
    mut conn: BoxedConnection,
    universe: &Universe,
    dispatcher: &Dispatcher,
    shutdown: &mut watch::Receiver<bool>,
) {
    let mut buffer: Vec<u8> = Vec::new();
    loop {
        // Serve every complete frame already buffered.
        if let Some(pos) = buffer.iter().position(|&b| b == 0) {
            let frame: Vec<u8> = buffer.drain(..=pos).collect();
            let response = handle_payload(universe, dispatcher, &frame[..frame.len() - 1]);
            if send_response(&mut conn, response).await.is_err() {
                return;
            }
            continue;
        }

        if *shutdown.borrow() {
            return;
        }

        let mut chunk = [0_u8; READ_CHUNK];
        let read = tokio::select! {
            _ = shutdown.changed() => return,
            read = timeout(RECEIVE_TIMEOUT, conn.read(&mut chunk)) => read,
        };
        match read {
            // Receive timeout: go around and recheck the shutdown flag.
            Err(_) => continue,
            Ok(Ok(0)) => {
                if !buffer.is_empty() {
                    let message = RpcError::MissingNullTerminator.to_string();
                    let _ = send_response(&mut conn, Response::error(&message)).await;
                }
                return;
            }
            Ok(Ok(n)) => buffer.extend_from_slice(&chunk[..n]),
            Ok(Err(e)) => {
                debug!(error = %e, "read failed");
                return;
            }
        }
    }
}

fn handle_payload(universe: &Universe, dispatcher: &Dispatcher, payload: &[u8]) -> Response {
    match Request::parse(payload).and_then(|request| dispatcher.dispatch(universe, &request)) {
        Ok(response) => response,
        Err(err) => Response::error(&err.to_string()),
    }
}

async fn send_response(conn: &mut BoxedConnection, response: Response) -> std::io::Result<()> {
    let frame = response.into_frame();
    match timeout(SEND_TIMEOUT, conn.write_all(&frame)).await {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "send timed out",
        )),
    }
}
