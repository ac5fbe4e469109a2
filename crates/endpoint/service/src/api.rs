use claim_assembler::ClaimError;
use claim_assembler_client::Client;
use poem::{web::Data, IntoResponse as _, Response};
use poem_openapi::{payload::Json, ApiResponse, Object, OpenApi};

pub struct Api;

impl Api {
    pub const NOT_FOUND: &str = "Deposit not found";
    pub const NOT_READY: &str = "Deposit not ready for claim";
    pub const ALREADY_CLAIMED: &str = "Deposit already claimed";
    pub const INTERNAL_ERROR: &str = "Internal Server Error";
    pub const BAD_REQUEST: &str = "Bad Request";
}

#[derive(Object, Debug)]
pub struct ClaimRequest {
    /// Metadata marker of the deposit to be claimed.
    pub data: String,

    /// Address of the caller.
    #[oai(default)]
    pub sender: Option<String>,
}

#[derive(Object, Debug)]
pub struct ClaimResponse {
    /// The ABI encoded claim arguments, as `0x` prefixed hex.
    pub data: String,
}

#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// A generic description of the failure.
    pub error: String,
}

#[derive(ApiResponse)]
pub enum ClaimResult {
    /// The deposit claim payload.
    #[oai(status = 200)]
    Ok(Json<ClaimResponse>),

    /// No deposit carries the requested marker.
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// The deposit is not ready for claim, or was already claimed.
    #[oai(status = 503)]
    Unavailable(Json<ErrorResponse>),

    /// The claim could not be assembled.
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl ClaimResult {
    fn error(error: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            error: error.into(),
        })
    }
}

impl From<ClaimError> for ClaimResult {
    fn from(e: ClaimError) -> Self {
        match e {
            ClaimError::NotFound => Self::NotFound(Self::error(Api::NOT_FOUND)),
            ClaimError::NotReady => Self::Unavailable(Self::error(Api::NOT_READY)),
            ClaimError::AlreadyClaimed => Self::Unavailable(Self::error(Api::ALREADY_CLAIMED)),
            ClaimError::Upstream(_)
            | ClaimError::MalformedProof(_)
            | ClaimError::MalformedDeposit(_) => {
                Self::InternalError(Self::error(Api::INTERNAL_ERROR))
            }
        }
    }
}

/// Renders any error raised outside of the claim handler, such as a rejected request body.
///
/// Only the canonical reason of the status reaches the caller.
pub async fn error_response(e: poem::Error) -> Response {
    let status = e.status();

    tracing::debug!("request failed with `{status}`: {e}");

    let error = if status.is_server_error() {
        Api::INTERNAL_ERROR
    } else {
        status.canonical_reason().unwrap_or(Api::BAD_REQUEST)
    };

    Json(ErrorResponse {
        error: error.into(),
    })
    .with_status(status)
    .into_response()
}

#[OpenApi]
impl Api {
    /// Assembles the claim payload of the deposit carrying the provided metadata.
    #[oai(path = "/", method = "post")]
    pub async fn claim(&self, client: Data<&Client>, request: Json<ClaimRequest>) -> ClaimResult {
        let ClaimRequest { data, sender } = request.0;

        tracing::debug!(
            "received claim request from `{}` for `{data}`...",
            sender.as_deref().unwrap_or_default()
        );

        match client.claim(&data).await {
            Ok(payload) => {
                tracing::info!("assembled claim for `{data}`");

                ClaimResult::Ok(Json(ClaimResponse {
                    data: const_hex::encode_prefixed(payload),
                }))
            }

            Err(e) if e.is_deposit_state() => {
                tracing::info!("claim for `{data}` rejected: {e}");

                e.into()
            }

            Err(e) => {
                tracing::error!("failed to assemble claim for `{data}`: {e}");

                e.into()
            }
        }
    }
}
