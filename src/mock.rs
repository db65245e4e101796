//! Mock implementations for testing
//!
//! Provides mock GPU device and manager for unit testing without real
//! hardware. Every mutation call is appended to an ordered call log so
//! tests can assert on call sequencing across devices.

use crate::domain::{ClockDomain, ClockOffset, GpuInfo, PowerConstraints, PowerLimit};
use crate::error::NvmlError;
use crate::nvml::{GpuDevice, GpuManager};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock GPU device for testing
#[derive(Debug)]
pub struct MockDevice {
    index: u32,
    name: String,
    uuid: String,
    power_limit: Mutex<PowerLimit>,
    power_constraints: PowerConstraints,
    power_supported: bool,
    clock_offsets: Mutex<HashMap<ClockDomain, ClockOffset>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockDevice {
    /// Create a new mock device with default values
    pub fn new(index: u32) -> Self {
        Self {
            index,
            name: format!("Mock GPU {}", index),
            uuid: format!("GPU-MOCK-{:04}", index),
            power_limit: Mutex::new(PowerLimit::from_watts(300)),
            power_constraints: PowerConstraints::new(
                PowerLimit::from_watts(100),
                PowerLimit::from_watts(400),
                PowerLimit::from_watts(300),
            ),
            power_supported: true,
            clock_offsets: Mutex::new(HashMap::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Builder: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set power constraints
    pub fn with_power_constraints(mut self, constraints: PowerConstraints) -> Self {
        self.power_constraints = constraints;
        self
    }

    /// Builder: enable or disable power management support
    pub fn with_power_management(mut self, supported: bool) -> Self {
        self.power_supported = supported;
        self
    }

    /// Snapshot of the ordered call log
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn share_log(&mut self, log: Arc<Mutex<Vec<String>>>) {
        self.calls = log;
    }
}

impl GpuDevice for MockDevice {
    fn info(&self) -> Result<GpuInfo, NvmlError> {
        Ok(GpuInfo::new(self.index, self.name.clone(), self.uuid.clone()))
    }

    fn name(&self) -> Result<String, NvmlError> {
        Ok(self.name.clone())
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn power_limit(&self) -> Result<PowerLimit, NvmlError> {
        Ok(*self.power_limit.lock().unwrap())
    }

    fn power_constraints(&self) -> Result<PowerConstraints, NvmlError> {
        self.record(format!("power_constraints:gpu{}", self.index));
        if !self.power_supported {
            return Err(NvmlError::NotSupported(
                "Power management not supported".to_string(),
            ));
        }
        Ok(self.power_constraints)
    }

    fn set_power_limit(&mut self, limit: PowerLimit) -> Result<(), NvmlError> {
        self.record(format!(
            "set_power_limit:gpu{}:{}mW",
            self.index,
            limit.as_milliwatts()
        ));
        if !self.power_constraints.contains(&limit) {
            return Err(NvmlError::InvalidArgument(format!(
                "Power limit {} out of range",
                limit
            )));
        }
        *self.power_limit.lock().unwrap() = limit;
        Ok(())
    }

    fn clock_offset(&self, domain: ClockDomain) -> Result<ClockOffset, NvmlError> {
        Ok(self
            .clock_offsets
            .lock()
            .unwrap()
            .get(&domain)
            .copied()
            .unwrap_or_default())
    }

    fn set_clock_offset(
        &mut self,
        domain: ClockDomain,
        offset: ClockOffset,
    ) -> Result<(), NvmlError> {
        self.record(format!(
            "set_clock_offset:gpu{}:{}:{}kHz",
            self.index,
            domain,
            offset.as_khz()
        ));
        self.clock_offsets.lock().unwrap().insert(domain, offset);
        Ok(())
    }
}

/// Mock GPU manager for testing
pub struct MockManager {
    devices: Vec<MockDevice>,
    calls: Arc<Mutex<Vec<String>>>,
    driver_version: String,
    nvml_version: String,
}

impl MockManager {
    /// Create a new mock manager with the specified number of devices
    pub fn new(device_count: u32) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let devices = (0..device_count)
            .map(|i| {
                let mut d = MockDevice::new(i);
                d.share_log(Arc::clone(&calls));
                d
            })
            .collect();

        Self {
            devices,
            calls,
            driver_version: "535.154.05".to_string(),
            nvml_version: "12.535.154.05".to_string(),
        }
    }

    /// Create a mock manager with custom devices
    ///
    /// The devices are rewired onto the manager's shared call log.
    pub fn with_devices(devices: Vec<MockDevice>) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let devices = devices
            .into_iter()
            .map(|mut d| {
                d.share_log(Arc::clone(&calls));
                d
            })
            .collect();

        Self {
            devices,
            calls,
            driver_version: "535.154.05".to_string(),
            nvml_version: "12.535.154.05".to_string(),
        }
    }

    /// Snapshot of the ordered call log across all handed-out devices
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl GpuManager for MockManager {
    type Device = MockDevice;

    fn device_count(&self) -> Result<u32, NvmlError> {
        Ok(self.devices.len() as u32)
    }

    fn device_by_index(&self, index: u32) -> Result<Self::Device, NvmlError> {
        self.devices
            .get(index as usize)
            .map(|d| MockDevice {
                index: d.index,
                name: d.name.clone(),
                uuid: d.uuid.clone(),
                power_limit: Mutex::new(*d.power_limit.lock().unwrap()),
                power_constraints: d.power_constraints,
                power_supported: d.power_supported,
                clock_offsets: Mutex::new(d.clock_offsets.lock().unwrap().clone()),
                calls: Arc::clone(&self.calls),
            })
            .ok_or(NvmlError::DeviceNotFound(index))
    }

    fn driver_version(&self) -> Result<String, NvmlError> {
        Ok(self.driver_version.clone())
    }

    fn nvml_version(&self) -> Result<String, NvmlError> {
        Ok(self.nvml_version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_device_creation() {
        let device = MockDevice::new(0);
        assert_eq!(device.index(), 0);
        assert_eq!(device.power_limit().unwrap().as_watts(), 300);
    }

    #[test]
    fn test_mock_device_power_limit() {
        let mut device = MockDevice::new(0);

        let new_limit = PowerLimit::from_watts(350);
        device.set_power_limit(new_limit).unwrap();
        assert_eq!(device.power_limit().unwrap().as_watts(), 350);
    }

    #[test]
    fn test_mock_device_power_limit_out_of_range() {
        let mut device = MockDevice::new(0);

        let invalid = PowerLimit::from_watts(500);
        assert!(device.set_power_limit(invalid).is_err());
    }

    #[test]
    fn test_mock_device_clock_offsets_independent() {
        let mut device = MockDevice::new(0);

        device
            .set_clock_offset(ClockDomain::Graphics, ClockOffset::from_khz(100_000))
            .unwrap();
        assert_eq!(
            device.clock_offset(ClockDomain::Graphics).unwrap().as_khz(),
            100_000
        );
        assert_eq!(device.clock_offset(ClockDomain::Memory).unwrap().as_khz(), 0);
    }

    #[test]
    fn test_mock_device_records_calls_in_order() {
        let mut device = MockDevice::new(0);

        device.set_power_limit(PowerLimit::from_watts(200)).unwrap();
        device
            .set_clock_offset(ClockDomain::Graphics, ClockOffset::from_khz(1000))
            .unwrap();

        let calls = device.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("set_power_limit:gpu0"));
        assert!(calls[1].starts_with("set_clock_offset:gpu0:graphics"));
    }

    #[test]
    fn test_mock_manager_device_count() {
        let manager = MockManager::new(2);
        assert_eq!(manager.device_count().unwrap(), 2);
    }

    #[test]
    fn test_mock_manager_device_by_index() {
        let manager = MockManager::new(2);
        let device = manager.device_by_index(0).unwrap();
        assert_eq!(device.index(), 0);

        let device = manager.device_by_index(1).unwrap();
        assert_eq!(device.index(), 1);

        assert!(manager.device_by_index(5).is_err());
    }

    #[test]
    fn test_mock_manager_shared_call_log() {
        let manager = MockManager::new(2);

        let mut d0 = manager.device_by_index(0).unwrap();
        let mut d1 = manager.device_by_index(1).unwrap();
        d0.set_power_limit(PowerLimit::from_watts(200)).unwrap();
        d1.set_power_limit(PowerLimit::from_watts(250)).unwrap();

        let calls = manager.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("gpu0"));
        assert!(calls[1].contains("gpu1"));
    }
}
