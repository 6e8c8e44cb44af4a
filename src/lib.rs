pub mod client;
pub mod encryption;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod types;

pub use client::CarwingsClient;
pub use error::CarwingsError;
pub use session::{Session, SessionManager};
pub use transport::{HttpTransport, Transport};
pub use types::{
    BatteryStatusRecords, BatteryStatusResponse, CommandResponse, Credentials, RegionCode,
};
