use serde::{Deserialize, Serialize};

/// Hardware attributes of a device: the feature vector sent to the
/// price classifier. Field names on the wire are fixed (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSpec {
    /// Battery capacity (mAh).
    pub battery_power: i32,
    /// Bluetooth present.
    pub blue: bool,
    /// CPU clock speed (GHz).
    pub clock_speed: f64,
    pub dual_sim: bool,
    /// Front camera (megapixels).
    pub fc: i32,
    pub four_g: bool,
    /// Internal memory (GB).
    pub int_memory: i32,
    /// Mobile depth (cm).
    pub m_dep: f64,
    /// Weight (grams).
    pub mobile_wt: i32,
    pub n_cores: i32,
    /// Primary camera (megapixels).
    pub pc: i32,
    pub px_height: i32,
    pub px_width: i32,
    /// RAM (MB).
    pub ram: i32,
    /// Screen height (cm).
    pub sc_h: i32,
    /// Screen width (cm).
    pub sc_w: i32,
    /// Longest talk time on one charge (hours).
    pub talk_time: i32,
    pub three_g: bool,
    pub touch_screen: bool,
    pub wifi: bool,
}

impl DeviceSpec {
    /// Check that every measurement is a plausible, non-negative quantity.
    pub fn validate(&self) -> Result<(), String> {
        let counts = [
            ("batteryPower", self.battery_power),
            ("fc", self.fc),
            ("intMemory", self.int_memory),
            ("mobileWt", self.mobile_wt),
            ("nCores", self.n_cores),
            ("pc", self.pc),
            ("pxHeight", self.px_height),
            ("pxWidth", self.px_width),
            ("ram", self.ram),
            ("scH", self.sc_h),
            ("scW", self.sc_w),
            ("talkTime", self.talk_time),
        ];
        for (name, value) in counts {
            if value < 0 {
                return Err(format!("{name} must be non-negative, got {value}"));
            }
        }

        for (name, value) in [("clockSpeed", self.clock_speed), ("mDep", self.m_dep)] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }
}

/// A stored device. `id` is assigned by the store on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,

    #[serde(flatten)]
    pub spec: DeviceSpec,

    /// Price bracket from the classifier. Only ever set by prediction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_price_range: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}
