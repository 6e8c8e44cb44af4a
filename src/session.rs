//! Session lifecycle: login on demand, cache the result, drop it on failure.

use crate::error::CarwingsError;
use crate::protocol::{self, LOGICAL_OK};
use crate::transport::Transport;
use crate::types::{Credentials, LoginResponse};

/// Static app identifier the portal requires on every login.
const INITIAL_APP_STRINGS: &str = "geORNtsZe5I4lRGjG9GZiA";
const LOGIN_ACTION: &str = "UserLoginRequest.php";

/// Token/vehicle pair returned by a successful login. Values are stored raw;
/// the form codec percent-encodes them exactly once when a request is built.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub vin: String,
}

/// Owns the single in-memory session for the process.
///
/// Two states: Unauthenticated (no cached session) and Authenticated. A
/// protected operation calls [`ensure_authenticated`](Self::ensure_authenticated)
/// first; when no session is cached this logs in, and on success the new
/// session unconditionally replaces any prior one. Login is never retried
/// here, and concurrent callers are not de-duplicated (the facade is
/// `&mut self`, one operation at a time).
pub struct SessionManager {
    credentials: Credentials,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            session: None,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Currently cached session, if any.
    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Drop the cached session so the next operation re-authenticates.
    pub fn invalidate(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("cached session dropped");
        }
    }

    /// Return the cached session, logging in first if none is cached.
    pub async fn ensure_authenticated<T: Transport>(
        &mut self,
        transport: &T,
    ) -> Result<Session, CarwingsError> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }

        tracing::debug!(user = %self.credentials.user_id, "no cached session, logging in");
        let body = protocol::encode_form(&[
            ("UserId", self.credentials.user_id.as_str()),
            ("initial_app_strings", INITIAL_APP_STRINGS),
            ("RegionCode", self.credentials.region.as_str()),
            ("Password", self.credentials.password.as_str()),
        ]);

        let raw = transport.post(LOGIN_ACTION, &body).await?;
        let login: LoginResponse =
            protocol::decode(&raw)?.ok_or(CarwingsError::EmptyResponse)?;
        if login.status != LOGICAL_OK {
            return Err(CarwingsError::Status(login.status));
        }

        let vehicle = login.first_vehicle().ok_or(CarwingsError::MissingVehicle)?;
        let session = Session {
            token: vehicle.custom_sessionid.clone(),
            vin: vehicle.vin.clone(),
        };
        tracing::info!(vin = %session.vin, "session established");
        self.session = Some(session.clone());
        Ok(session)
    }
}
