use serde::Deserialize;
use std::fmt;

/// Meters-to-miles factor used by the original CARWINGS integrations.
const RANGE_MILES_FACTOR: f64 = 0.000568182;

/// Market the account is registered in. The portal routes requests by this
/// code and rejects mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionCode {
    /// Europe (NE)
    Europe,
    /// North America (NNA)
    NorthAmerica,
    /// Canada (NCI)
    Canada,
}

impl RegionCode {
    /// Parse from the wire form ("NE", "NNA", "NCI", case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "NE" => Some(Self::Europe),
            "NNA" => Some(Self::NorthAmerica),
            "NCI" => Some(Self::Canada),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Europe => "NE",
            Self::NorthAmerica => "NNA",
            Self::Canada => "NCI",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account credentials, loaded once at startup and immutable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
    pub region: RegionCode,
}

/// Minimal envelope every portal response carries. Only `status == 200` is a
/// logical success, independent of the HTTP transport status.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: i64,
}

/// Response to `UserLoginRequest.php`.
///
/// The portal is inconsistent about the vehicle list: sometimes it is nested
/// under a `VehicleInfoList` wrapper, sometimes it sits at the top level.
/// Both shapes must decode to the same session data.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub status: i64,
    #[serde(rename = "VehicleInfoList")]
    pub vehicle_info_list: Option<VehicleInfoList>,
    #[serde(rename = "vehicleInfo")]
    pub vehicle_info: Option<Vec<VehicleInfo>>,
}

impl LoginResponse {
    /// First vehicle on the account, preferring the wrapped list when present.
    pub fn first_vehicle(&self) -> Option<&VehicleInfo> {
        self.vehicle_info_list
            .as_ref()
            .and_then(|list| list.vehicle_info.first())
            .or_else(|| self.vehicle_info.as_ref().and_then(|list| list.first()))
    }
}

#[derive(Debug, Deserialize)]
pub struct VehicleInfoList {
    #[serde(rename = "vehicleInfo")]
    pub vehicle_info: Vec<VehicleInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleInfo {
    pub custom_sessionid: String,
    pub vin: String,
}

/// The portal serializes most numbers as strings ("12", "142368.0") but not
/// always, so numeric fields accept either form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Response to `BatteryStatusRecordsRequest.php`.
#[derive(Debug, Deserialize)]
pub struct BatteryStatusResponse {
    pub status: i64,
    #[serde(rename = "BatteryStatusRecords")]
    pub records: Option<BatteryStatusRecords>,
}

#[derive(Debug, Deserialize)]
pub struct BatteryStatusRecords {
    #[serde(rename = "BatteryStatus")]
    pub battery_status: BatteryStatus,
    #[serde(rename = "PluginState")]
    pub plugin_state: Option<String>,
    #[serde(rename = "CruisingRangeAcOn")]
    pub cruising_range_ac_on: Option<NumericField>,
}

#[derive(Debug, Deserialize)]
pub struct BatteryStatus {
    #[serde(rename = "BatteryRemainingAmount")]
    pub battery_remaining_amount: Option<NumericField>,
    #[serde(rename = "BatteryCapacity")]
    pub battery_capacity: Option<NumericField>,
    #[serde(rename = "BatteryChargingStatus")]
    pub battery_charging_status: Option<String>,
}

impl BatteryStatusRecords {
    /// State of charge as a whole percentage, when both readings are present.
    pub fn charge_percent(&self) -> Option<u32> {
        let remaining = self
            .battery_status
            .battery_remaining_amount
            .as_ref()?
            .as_f64()?;
        let capacity = self.battery_status.battery_capacity.as_ref()?.as_f64()?;
        if capacity <= 0.0 {
            return None;
        }
        Some((remaining / capacity * 100.0).floor() as u32)
    }

    /// Estimated range in miles with climate control on.
    pub fn cruising_range_miles(&self) -> Option<u32> {
        let range = self.cruising_range_ac_on.as_ref()?.as_f64()?;
        Some((range * RANGE_MILES_FACTOR).floor() as u32)
    }

    pub fn is_plugged_in(&self) -> bool {
        self.plugin_state.as_deref() == Some("CONNECTED")
    }

    pub fn is_charging(&self) -> bool {
        match self.battery_status.battery_charging_status.as_deref() {
            Some(status) => status != "NOT_CHARGING",
            None => false,
        }
    }
}

/// Response to the remote commands (climate control, data refresh).
#[derive(Debug, Deserialize)]
pub struct CommandResponse {
    pub status: i64,
    #[serde(rename = "resultKey")]
    pub result_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_code_round_trips_wire_form() {
        for code in ["NE", "NNA", "NCI"] {
            assert_eq!(RegionCode::parse(code).unwrap().as_str(), code);
        }
        assert_eq!(RegionCode::parse("ne"), Some(RegionCode::Europe));
        assert_eq!(RegionCode::parse("EU"), None);
    }

    #[test]
    fn numeric_field_accepts_both_wire_forms() {
        let n: NumericField = serde_json::from_str("12").unwrap();
        assert_eq!(n.as_f64(), Some(12.0));
        let s: NumericField = serde_json::from_str("\"142368.0\"").unwrap();
        assert_eq!(s.as_f64(), Some(142368.0));
        let bad: NumericField = serde_json::from_str("\"n/a\"").unwrap();
        assert_eq!(bad.as_f64(), None);
    }

    #[test]
    fn battery_helpers_interpret_provider_strings() {
        let body = r#"{
            "status": 200,
            "BatteryStatusRecords": {
                "BatteryStatus": {
                    "BatteryRemainingAmount": "9",
                    "BatteryCapacity": "12",
                    "BatteryChargingStatus": "NORMAL_CHARGING"
                },
                "PluginState": "CONNECTED",
                "CruisingRangeAcOn": "142368.0"
            }
        }"#;
        let response: BatteryStatusResponse = serde_json::from_str(body).unwrap();
        let records = response.records.unwrap();
        assert_eq!(records.charge_percent(), Some(75));
        assert_eq!(records.cruising_range_miles(), Some(80));
        assert!(records.is_plugged_in());
        assert!(records.is_charging());
    }

    #[test]
    fn battery_helpers_tolerate_missing_fields() {
        let body = r#"{"status":200,"BatteryStatusRecords":{"BatteryStatus":{}}}"#;
        let response: BatteryStatusResponse = serde_json::from_str(body).unwrap();
        let records = response.records.unwrap();
        assert_eq!(records.charge_percent(), None);
        assert_eq!(records.cruising_range_miles(), None);
        assert!(!records.is_plugged_in());
        assert!(!records.is_charging());
    }

    #[test]
    fn login_response_prefers_wrapped_vehicle_list() {
        let body = r#"{
            "status": 200,
            "VehicleInfoList": {"vehicleInfo": [{"custom_sessionid": "wrapped", "vin": "VIN1"}]},
            "vehicleInfo": [{"custom_sessionid": "flat", "vin": "VIN2"}]
        }"#;
        let response: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.first_vehicle().unwrap().custom_sessionid,
            "wrapped"
        );
    }
}
