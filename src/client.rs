//! Vehicle command facade: the five-operation public surface.

use serde::de::DeserializeOwned;

use crate::error::CarwingsError;
use crate::protocol::{self, LOGICAL_OK};
use crate::session::SessionManager;
use crate::transport::{HttpTransport, Transport};
use crate::types::{BatteryStatusResponse, CommandResponse, Credentials, Envelope};

const BATTERY_STATUS_ACTION: &str = "BatteryStatusRecordsRequest.php";
const AC_REMOTE_ACTION: &str = "ACRemoteRequest.php";
const AC_REMOTE_OFF_ACTION: &str = "ACRemoteOffRequest.php";
const BATTERY_CHECK_ACTION: &str = "BatteryStatusCheckRequest.php";

/// Client for the vehicle telematics portal.
///
/// Every operation ensures a session first (logging in when none is cached),
/// issues exactly one request against it, and returns either the decoded
/// record or the first failure in the chain. A failed protected call drops
/// the cached session so the next call re-authenticates.
///
/// # Example
///
/// ```no_run
/// use carwings_rs::{CarwingsClient, Credentials, RegionCode};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let credentials = Credentials {
///         user_id: "me@example.com".into(),
///         password: "secret".into(),
///         region: RegionCode::Europe,
///     };
///     let mut client = CarwingsClient::new(credentials);
///     let battery = client.get_battery_status().await?;
///     if let Some(records) = battery.records {
///         println!("charge: {:?}%", records.charge_percent());
///     }
///     Ok(())
/// }
/// ```
pub struct CarwingsClient<T: Transport = HttpTransport> {
    transport: T,
    session: SessionManager,
}

impl CarwingsClient<HttpTransport> {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(HttpTransport::new(), credentials)
    }
}

impl<T: Transport> CarwingsClient<T> {
    pub fn with_transport(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            session: SessionManager::new(credentials),
        }
    }

    /// Latest battery, charge and range records held by the portal.
    pub async fn get_battery_status(&mut self) -> Result<BatteryStatusResponse, CarwingsError> {
        self.protected(BATTERY_STATUS_ACTION, false).await
    }

    /// Turn the climate control on to heat the car.
    pub async fn send_preheat_command(&mut self) -> Result<CommandResponse, CarwingsError> {
        // Same portal endpoint as cooling: the provider exposes a single
        // climate-on toggle for both intents.
        self.protected(AC_REMOTE_ACTION, true).await
    }

    /// Turn the climate control on to cool the car.
    pub async fn send_cooling_command(&mut self) -> Result<CommandResponse, CarwingsError> {
        self.protected(AC_REMOTE_ACTION, true).await
    }

    /// Turn the climate control off.
    pub async fn send_climate_control_off_command(
        &mut self,
    ) -> Result<CommandResponse, CarwingsError> {
        self.protected(AC_REMOTE_OFF_ACTION, true).await
    }

    /// Ask the portal to fetch fresh data from the car.
    pub async fn send_update_command(&mut self) -> Result<CommandResponse, CarwingsError> {
        self.protected(BATTERY_CHECK_ACTION, true).await
    }

    /// Shared template for the protected operations: ensure a session, build
    /// the form, issue the request, and drop the session on any failure.
    async fn protected<R: DeserializeOwned>(
        &mut self,
        action: &str,
        with_user_id: bool,
    ) -> Result<R, CarwingsError> {
        let session = self.session.ensure_authenticated(&self.transport).await?;
        let credentials = self.session.credentials();

        let mut fields: Vec<(&str, &str)> = Vec::with_capacity(4);
        if with_user_id {
            fields.push(("UserId", credentials.user_id.as_str()));
        }
        fields.push(("custom_sessionid", session.token.as_str()));
        fields.push(("RegionCode", credentials.region.as_str()));
        fields.push(("VIN", session.vin.as_str()));
        let body = protocol::encode_form(&fields);

        let result = self.issue(action, &body).await;
        if result.is_err() {
            // The portal gives no expiry signal, so treat any failure as a
            // stale session and re-authenticate on the next call.
            self.session.invalidate();
        }
        result
    }

    async fn issue<R: DeserializeOwned>(
        &self,
        action: &str,
        body: &str,
    ) -> Result<R, CarwingsError> {
        let raw = self.transport.post(action, body).await?;
        match protocol::decode::<Envelope>(&raw)? {
            None => Err(CarwingsError::EmptyResponse),
            Some(envelope) if envelope.status != LOGICAL_OK => {
                tracing::warn!(action, status = envelope.status, "portal reported failure");
                Err(CarwingsError::Status(envelope.status))
            }
            Some(_) => protocol::decode(&raw)?.ok_or(CarwingsError::EmptyResponse),
        }
    }
}
