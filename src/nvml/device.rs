//! NVML device implementation
//!
//! Real implementation of GpuDevice trait using nvml-wrapper.

use crate::domain::{ClockDomain, ClockOffset, GpuInfo, PowerConstraints, PowerLimit};
use crate::error::NvmlError;
use crate::nvml::traits::GpuDevice;

use nvml_wrapper::Device;

/// NVML device wrapper implementing GpuDevice trait
pub struct NvmlDevice<'a> {
    device: Device<'a>,
    index: u32,
}

impl<'a> NvmlDevice<'a> {
    /// Create a new NVML device wrapper
    pub fn new(device: Device<'a>, index: u32) -> Self {
        Self { device, index }
    }

    /// Convert NVML error to our error type
    fn convert_error(err: nvml_wrapper::error::NvmlError) -> NvmlError {
        use nvml_wrapper::error::NvmlError as NE;
        match err {
            NE::NotSupported => {
                NvmlError::NotSupported("Operation not supported by this GPU".to_string())
            }
            NE::NoPermission => {
                NvmlError::InsufficientPermissions("Insufficient permissions".to_string())
            }
            NE::NotFound => NvmlError::DeviceNotFound(0),
            NE::GpuLost => NvmlError::GpuLost,
            NE::InvalidArg => NvmlError::InvalidArgument("Invalid argument".to_string()),
            _ => NvmlError::Unknown(err.to_string()),
        }
    }
}

impl GpuDevice for NvmlDevice<'_> {
    fn info(&self) -> Result<GpuInfo, NvmlError> {
        let name = self.name()?;
        let uuid = self.device.uuid().map_err(Self::convert_error)?;

        let mut info = GpuInfo::new(self.index, name, uuid);

        // Try to get optional info
        if let Ok(pci) = self.device.pci_info() {
            info = info.with_pci_bus_id(pci.bus_id);
        }

        Ok(info)
    }

    fn name(&self) -> Result<String, NvmlError> {
        self.device.name().map_err(Self::convert_error)
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn power_limit(&self) -> Result<PowerLimit, NvmlError> {
        let limit_mw = self
            .device
            .power_management_limit()
            .map_err(Self::convert_error)?;
        Ok(PowerLimit::from_milliwatts(limit_mw))
    }

    fn power_constraints(&self) -> Result<PowerConstraints, NvmlError> {
        let constraints = self
            .device
            .power_management_limit_constraints()
            .map_err(Self::convert_error)?;

        let default = self
            .device
            .power_management_limit_default()
            .map_err(Self::convert_error)?;

        Ok(PowerConstraints::new(
            PowerLimit::from_milliwatts(constraints.min_limit),
            PowerLimit::from_milliwatts(constraints.max_limit),
            PowerLimit::from_milliwatts(default),
        ))
    }

    fn set_power_limit(&mut self, limit: PowerLimit) -> Result<(), NvmlError> {
        self.device
            .set_power_management_limit(limit.as_milliwatts())
            .map_err(Self::convert_error)
    }

    fn clock_offset(&self, domain: ClockDomain) -> Result<ClockOffset, NvmlError> {
        // SAFETY: handle() is safe to call within the lifetime of the Device
        let handle = unsafe { self.device.handle() };
        let mhz = get_clk_vf_offset_raw(handle, domain)?;
        Ok(ClockOffset::from_khz(mhz * 1000))
    }

    fn set_clock_offset(
        &mut self,
        domain: ClockDomain,
        offset: ClockOffset,
    ) -> Result<(), NvmlError> {
        // SAFETY: handle() is safe to call within the lifetime of the Device
        let handle = unsafe { self.device.handle() };
        set_clk_vf_offset_raw(handle, domain, offset.as_mhz())
    }
}

/// Get the VF clock offset for a domain using raw FFI
///
/// The VF offset entry points are not exposed by nvml-wrapper's high-level
/// API, so the symbol is loaded directly from the driver library.
fn get_clk_vf_offset_raw(
    handle: nvml_wrapper_sys::bindings::nvmlDevice_t,
    domain: ClockDomain,
) -> Result<i32, NvmlError> {
    use libloading::{Library, Symbol};
    use nvml_wrapper_sys::bindings::nvmlReturn_enum_NVML_SUCCESS;
    use std::os::raw::{c_int, c_uint};

    type GetVfOffsetFn =
        unsafe extern "C" fn(nvml_wrapper_sys::bindings::nvmlDevice_t, *mut c_int) -> c_uint;

    let lib = unsafe { Library::new("libnvidia-ml.so.1") }
        .or_else(|_| unsafe { Library::new("libnvidia-ml.so") })
        .map_err(|_e| NvmlError::LibraryNotFound)?;

    let symbol: &[u8] = match domain {
        ClockDomain::Graphics => b"nvmlDeviceGetGpcClkVfOffset\0",
        ClockDomain::Memory => b"nvmlDeviceGetMemClkVfOffset\0",
    };

    let func: Symbol<GetVfOffsetFn> = unsafe { lib.get(symbol) }
        .map_err(|e| NvmlError::NotSupported(format!("Function not available: {}", e)))?;

    let mut offset: c_int = 0;
    let result = unsafe { func(handle, &mut offset) };

    if result == nvmlReturn_enum_NVML_SUCCESS {
        Ok(offset)
    } else if result == 3 {
        // NVML_ERROR_NOT_SUPPORTED
        Err(NvmlError::NotSupported(format!(
            "{} clock offset not supported on this GPU",
            domain
        )))
    } else {
        Err(NvmlError::Unknown(format!("NVML error code: {}", result)))
    }
}

/// Set the VF clock offset for a domain using raw FFI
///
/// Offset is in whole MHz, negative values underclock.
fn set_clk_vf_offset_raw(
    handle: nvml_wrapper_sys::bindings::nvmlDevice_t,
    domain: ClockDomain,
    offset_mhz: i32,
) -> Result<(), NvmlError> {
    use libloading::{Library, Symbol};
    use nvml_wrapper_sys::bindings::nvmlReturn_enum_NVML_SUCCESS;
    use std::os::raw::{c_int, c_uint};

    type SetVfOffsetFn =
        unsafe extern "C" fn(nvml_wrapper_sys::bindings::nvmlDevice_t, c_int) -> c_uint;

    let lib = unsafe { Library::new("libnvidia-ml.so.1") }
        .or_else(|_| unsafe { Library::new("libnvidia-ml.so") })
        .map_err(|_e| NvmlError::LibraryNotFound)?;

    let symbol: &[u8] = match domain {
        ClockDomain::Graphics => b"nvmlDeviceSetGpcClkVfOffset\0",
        ClockDomain::Memory => b"nvmlDeviceSetMemClkVfOffset\0",
    };

    let func: Symbol<SetVfOffsetFn> = unsafe { lib.get(symbol) }
        .map_err(|e| NvmlError::NotSupported(format!("Function not available: {}", e)))?;

    let result = unsafe { func(handle, offset_mhz as c_int) };

    match result {
        x if x == nvmlReturn_enum_NVML_SUCCESS => Ok(()),
        3 => Err(NvmlError::NotSupported(format!(
            "{} clock offset not supported on this GPU",
            domain
        ))),
        4 => Err(NvmlError::InsufficientPermissions(
            "Root privileges required to set clock offsets".to_string(),
        )),
        code => Err(NvmlError::Unknown(format!("NVML error code: {}", code))),
    }
}
