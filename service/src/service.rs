//! Single-writer command loop around the registry.
//!
//! One task owns the [`RequestRegistry`]; everyone else holds a cloneable
//! [`RegistryHandle`] and sends commands down an mpsc channel. Commands are
//! applied strictly in arrival order, which is what gives the protocol its
//! atomic, totally-ordered mutations: two racing duplicate challenge
//! recordings serialize here, so exactly one succeeds and the other fails
//! with `AlreadyRecorded`. Reads go through the same channel and therefore
//! always observe fully-committed state; event subscription and replay use
//! the shared log directly and never touch the writer.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use verinum_events::EventLog;
use verinum_registry::{RegistryError, RequestRegistry, RequestStatus, ResponseOutcome};
use verinum_types::{AccountId, CommitmentHash, PhoneNumber, RequestId};

use crate::ServiceError;

/// Default command-channel depth before senders experience backpressure.
const DEFAULT_COMMAND_CAPACITY: usize = 256;

enum Command {
    SubmitRequest {
        caller: AccountId,
        phone_number: PhoneNumber,
        reply: oneshot::Sender<RequestId>,
    },
    RecordChallenge {
        caller: AccountId,
        request_id: RequestId,
        commitment: CommitmentHash,
        reply: oneshot::Sender<Result<(), RegistryError>>,
    },
    SubmitResponse {
        caller: AccountId,
        request_id: RequestId,
        verifier: AccountId,
        secret_code: u32,
        reply: oneshot::Sender<Result<ResponseOutcome, RegistryError>>,
    },
    IsOwner {
        account: AccountId,
        phone_number: PhoneNumber,
        reply: oneshot::Sender<bool>,
    },
    RequestStatus {
        request_id: RequestId,
        reply: oneshot::Sender<Option<RequestStatus>>,
    },
}

/// The running registry service: the writer task plus its handle.
pub struct RegistryService {
    handle: RegistryHandle,
    shutdown: oneshot::Sender<()>,
    worker: JoinHandle<()>,
}

impl RegistryService {
    /// Spawn the writer task that owns `registry`.
    pub fn start(registry: RequestRegistry) -> Self {
        Self::start_with_capacity(registry, DEFAULT_COMMAND_CAPACITY)
    }

    pub fn start_with_capacity(registry: RequestRegistry, command_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(command_capacity);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let events = Arc::clone(registry.events());
        let worker = tokio::spawn(run(registry, rx, shutdown_rx));
        info!("registry service started");
        Self {
            handle: RegistryHandle { tx, events },
            shutdown,
            worker,
        }
    }

    pub fn handle(&self) -> RegistryHandle {
        self.handle.clone()
    }

    /// Stop the writer and wait for it to exit. Commands sent after this
    /// fail with [`ServiceError::NotRunning`].
    pub async fn stop(self) {
        let Self {
            handle,
            shutdown,
            worker,
        } = self;
        drop(handle);
        let _ = shutdown.send(());
        let _ = worker.await;
        info!("registry service stopped");
    }
}

async fn run(
    mut registry: RequestRegistry,
    mut rx: mpsc::Receiver<Command>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        let command = tokio::select! {
            _ = &mut shutdown => break,
            command = rx.recv() => match command {
                Some(command) => command,
                None => break,
            },
        };
        match command {
            Command::SubmitRequest {
                caller,
                phone_number,
                reply,
            } => {
                let id = registry.submit_request(&caller, phone_number);
                let _ = reply.send(id);
            }
            Command::RecordChallenge {
                caller,
                request_id,
                commitment,
                reply,
            } => {
                let _ = reply.send(registry.record_challenge(&caller, request_id, commitment));
            }
            Command::SubmitResponse {
                caller,
                request_id,
                verifier,
                secret_code,
                reply,
            } => {
                let _ = reply.send(registry.submit_response(
                    &caller,
                    request_id,
                    &verifier,
                    secret_code,
                ));
            }
            Command::IsOwner {
                account,
                phone_number,
                reply,
            } => {
                let _ = reply.send(registry.is_owner(&account, &phone_number));
            }
            Command::RequestStatus { request_id, reply } => {
                let _ = reply.send(registry.request_status(request_id));
            }
        }
    }
    debug!("registry writer exiting");
}

/// Cloneable client handle to the registry service.
#[derive(Clone)]
pub struct RegistryHandle {
    tx: mpsc::Sender<Command>,
    events: Arc<EventLog>,
}

impl RegistryHandle {
    /// Submit a verification request on behalf of `caller`.
    pub async fn submit_request(
        &self,
        caller: AccountId,
        phone_number: PhoneNumber,
    ) -> Result<RequestId, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::SubmitRequest {
                caller,
                phone_number,
                reply,
            })
            .await
            .map_err(|_| ServiceError::NotRunning)?;
        response.await.map_err(|_| ServiceError::NotRunning)
    }

    /// Record a challenge commitment on behalf of the verifier `caller`.
    pub async fn record_challenge(
        &self,
        caller: AccountId,
        request_id: RequestId,
        commitment: CommitmentHash,
    ) -> Result<(), ServiceError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::RecordChallenge {
                caller,
                request_id,
                commitment,
                reply,
            })
            .await
            .map_err(|_| ServiceError::NotRunning)?;
        response
            .await
            .map_err(|_| ServiceError::NotRunning)?
            .map_err(ServiceError::from)
    }

    /// Submit a challenge response on behalf of the requester `caller`.
    pub async fn submit_response(
        &self,
        caller: AccountId,
        request_id: RequestId,
        verifier: AccountId,
        secret_code: u32,
    ) -> Result<ResponseOutcome, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::SubmitResponse {
                caller,
                request_id,
                verifier,
                secret_code,
                reply,
            })
            .await
            .map_err(|_| ServiceError::NotRunning)?;
        response
            .await
            .map_err(|_| ServiceError::NotRunning)?
            .map_err(ServiceError::from)
    }

    /// Whether `account` currently owns `phone_number`.
    pub async fn is_owner(
        &self,
        account: AccountId,
        phone_number: PhoneNumber,
    ) -> Result<bool, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::IsOwner {
                account,
                phone_number,
                reply,
            })
            .await
            .map_err(|_| ServiceError::NotRunning)?;
        response.await.map_err(|_| ServiceError::NotRunning)
    }

    /// The status of a request, if it exists.
    pub async fn request_status(
        &self,
        request_id: RequestId,
    ) -> Result<Option<RequestStatus>, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::RequestStatus { request_id, reply })
            .await
            .map_err(|_| ServiceError::NotRunning)?;
        response.await.map_err(|_| ServiceError::NotRunning)
    }

    /// The shared event log: subscribe and replay without touching the writer.
    pub fn events(&self) -> &Arc<EventLog> {
        &self.events
    }
}
