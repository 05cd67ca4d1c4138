//! Device domain model.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::DomainError;
use shared::validation::{parse_bool_flag, require_param};

/// A registered device and what it is currently doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub show_name: String,
    #[serde(deserialize_with = "deserialize_using")]
    pub using: bool,
    pub app_name: String,
}

/// Accepts native booleans as well as the `"true"`/`"false"` strings found in
/// documents written by older deployments.
fn deserialize_using<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => parse_bool_flag("using", &text)
            .map_err(|_| de::Error::custom(format!("invalid value for using: {:?}", text))),
    }
}

/// Raw arguments of an add-device request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceDraft {
    pub show_name: Option<String>,
    pub using: Option<String>,
    pub app_name: Option<String>,
}

/// A validated device that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub show_name: String,
    pub using: bool,
    pub app_name: String,
}

impl DeviceDraft {
    /// Checks `show_name`, `using` and `app_name`, in that order.
    pub fn validate(&self) -> Result<NewDevice, DomainError> {
        let show_name = require_param("show_name", self.show_name.as_deref())?;
        let using = parse_bool_flag("using", self.using.as_deref().unwrap_or_default())?;
        let app_name = require_param("app_name", self.app_name.as_deref())?;

        Ok(NewDevice {
            show_name: show_name.to_string(),
            using,
            app_name: app_name.to_string(),
        })
    }
}

impl NewDevice {
    pub fn into_device(self, id: String) -> Device {
        Device {
            id,
            show_name: self.show_name,
            using: self.using,
            app_name: self.app_name,
        }
    }
}

/// Raw arguments of a set-device request, all optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceUpdate {
    pub show_name: Option<String>,
    pub using: Option<String>,
    pub app_name: Option<String>,
}

/// A validated partial update. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevicePatch {
    pub show_name: Option<String>,
    pub using: Option<bool>,
    pub app_name: Option<String>,
}

impl DeviceUpdate {
    /// Validates every present field before any of them can be applied.
    pub fn validate(&self) -> Result<DevicePatch, DomainError> {
        let using = match self.using.as_deref() {
            Some(raw) => Some(parse_bool_flag("using", raw)?),
            None => None,
        };

        Ok(DevicePatch {
            show_name: self.show_name.clone(),
            using,
            app_name: self.app_name.clone(),
        })
    }
}

impl DevicePatch {
    pub fn apply(self, device: &mut Device) {
        if let Some(show_name) = self.show_name {
            device.show_name = show_name;
        }
        if let Some(using) = self.using {
            device.using = using;
        }
        if let Some(app_name) = self.app_name {
            device.app_name = app_name;
        }
    }
}

/// Response payload for device mutations.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceResponse {
    pub success: bool,
    pub message: String,
    pub device: Device,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl DeviceResponse {
    pub fn added(device: Device) -> Self {
        Self {
            success: true,
            message: "Device added successfully".to_string(),
            device_id: Some(device.id.clone()),
            device,
        }
    }

    pub fn updated(device: Device) -> Self {
        Self {
            success: true,
            message: "Device status updated successfully".to_string(),
            device,
            device_id: None,
        }
    }

    pub fn removed(device: Device) -> Self {
        Self {
            success: true,
            message: "Device removed successfully".to_string(),
            device,
            device_id: None,
        }
    }
}

/// Response payload for the device listing.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceListResponse {
    pub success: bool,
    pub devices: Vec<Device>,
}

impl From<Vec<Device>> for DeviceListResponse {
    fn from(devices: Vec<Device>) -> Self {
        Self {
            success: true,
            devices,
        }
    }
}
