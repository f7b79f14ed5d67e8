use thiserror::Error;
use verinum_types::RequestId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Bad construction parameters. Fatal and construction-time only.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Unknown request id. Caller mistake, recoverable by the caller.
    #[error("verification request {0} not found")]
    RequestNotFound(RequestId),

    /// The named verifier has no recorded challenge on this request.
    #[error("verifier {verifier} has no challenge on request {request_id}")]
    NoSuchChallenge { request_id: RequestId, verifier: String },

    /// Caller is not the designated panel member or requester.
    /// Security-relevant; never retried automatically.
    #[error("{caller} is not authorized to {action} request {request_id}")]
    Unauthorized {
        request_id: RequestId,
        caller: String,
        action: &'static str,
    },

    /// The verifier already has a commitment on this request.
    #[error("verifier {verifier} already recorded a challenge on request {request_id}")]
    AlreadyRecorded { request_id: RequestId, verifier: String },

    /// The request (or the targeted challenge slot) has already resolved.
    #[error("request {0} is already resolved")]
    AlreadyResolved(RequestId),
}
