//! Tune command implementation
//!
//! The driver loop: discovers GPUs and applies the tuning plan to each one
//! in a fixed order, reporting every step.

use crate::cli::args::{Cli, OutputFormat};
use crate::cli::output::{print_output, Message, TuneStep};
use crate::domain::{ClockDomain, ClockOffset, PowerCapPercent};
use crate::error::{AppError, Result};
use crate::nvml::{GpuDevice, GpuManager, NvmlManager};
use crate::services::{PowerCapOutcome, TunePlan, TuningService};

/// Execute the tune command against real NVML
pub fn run_tune(cli: &Cli) -> Result<()> {
    let manager = NvmlManager::new()?;

    let plan = TunePlan::new(
        PowerCapPercent::new(cli.power_percent)?,
        ClockOffset::from_khz(cli.graphics_offset_khz),
        ClockOffset::from_khz(cli.memory_offset_khz),
    );
    let service = TuningService::new(plan, cli.dry_run);

    tune_all(&manager, &service, cli.gpu, cli.format)
}

/// Apply the service's plan to the selected GPUs
///
/// Applies to all discovered GPUs unless a single index was requested.
/// Per-GPU failures are reported and do not stop the loop; only an empty
/// discovery result is an error.
pub fn tune_all<M: GpuManager>(
    manager: &M,
    service: &TuningService,
    gpu_index: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let mut devices = match gpu_index {
        Some(idx) => vec![manager.device_by_index(idx)?],
        None => manager.all_devices()?,
    };

    if devices.is_empty() {
        return Err(AppError::NoGpusFound);
    }

    log::debug!("Tuning {} GPU(s)", devices.len());

    for device in &mut devices {
        tune_device(service, device, format)?;
    }

    Ok(())
}

/// Apply all three operations to one device, in the fixed order
/// power cap, graphics offset, memory offset.
fn tune_device<D: GpuDevice>(
    service: &TuningService,
    device: &mut D,
    format: OutputFormat,
) -> Result<()> {
    let index = device.index();
    let name = device
        .name()
        .unwrap_or_else(|_| format!("GPU {}", index));

    progress(
        format!(
            "Setting power cap = {:.2} % on [{}] {}",
            service.plan().power_cap.as_percent(),
            index,
            name
        ),
        format,
    )?;
    let step = power_cap_step(service, device, index, &name);
    print_output(&step, format)?;

    for domain in [ClockDomain::Graphics, ClockDomain::Memory] {
        progress(
            format!(
                "Setting {} clock offset = {} kHz on [{}] {}",
                domain,
                service.plan().offset_for(domain).as_khz(),
                index,
                name
            ),
            format,
        )?;
        let step = clock_offset_step(service, device, domain, index, &name);
        print_output(&step, format)?;
    }

    Ok(())
}

fn progress(message: String, format: OutputFormat) -> Result<()> {
    print_output(
        &Message {
            message,
            success: true,
        },
        format,
    )?;
    Ok(())
}

fn power_cap_step<D: GpuDevice>(
    service: &TuningService,
    device: &mut D,
    index: u32,
    name: &str,
) -> TuneStep {
    let (outcome, success) = match service.apply_power_cap(device) {
        Ok(PowerCapOutcome::Applied(limit)) => (format!("applied {}", limit), true),
        Ok(PowerCapOutcome::SkippedUnsupported) => {
            ("skipped: power policies are not supported".to_string(), false)
        }
        Ok(PowerCapOutcome::SkippedOutOfRange {
            requested,
            constraints,
        }) => (
            format!(
                "skipped: requested {} outside supported range {}",
                requested, constraints
            ),
            false,
        ),
        Err(e) => (format!("failed: {}", e), false),
    };

    TuneStep {
        gpu_index: index,
        gpu_name: name.to_string(),
        operation: "power cap".to_string(),
        outcome,
        success,
    }
}

fn clock_offset_step<D: GpuDevice>(
    service: &TuningService,
    device: &mut D,
    domain: ClockDomain,
    index: u32,
    name: &str,
) -> TuneStep {
    let (outcome, success) = match service.apply_clock_offset(device, domain) {
        Ok(offset) => (format!("applied {}", offset), true),
        Err(e) => (format!("failed: {}", e), false),
    };

    TuneStep {
        gpu_index: index,
        gpu_name: name.to_string(),
        operation: format!("{} offset", domain),
        outcome,
        success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDevice, MockManager};

    fn service(percent: f64) -> TuningService {
        let plan = TunePlan::new(
            PowerCapPercent::new(percent).unwrap(),
            ClockOffset::from_khz(100_000),
            ClockOffset::from_khz(100_000),
        );
        TuningService::new(plan, false)
    }

    fn mutation_calls(manager: &MockManager) -> Vec<String> {
        manager
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("set_"))
            .collect()
    }

    #[test]
    fn test_zero_gpus_means_no_mutations() {
        let manager = MockManager::new(0);

        let result = tune_all(&manager, &service(60.0), None, OutputFormat::Table);
        assert!(matches!(result, Err(AppError::NoGpusFound)));
        assert!(manager.calls().is_empty());
    }

    #[test]
    fn test_each_gpu_gets_three_operations_in_order() {
        let manager = MockManager::new(2);

        tune_all(&manager, &service(60.0), None, OutputFormat::Table).unwrap();

        let calls = mutation_calls(&manager);
        assert_eq!(calls.len(), 6);
        for (gpu, chunk) in calls.chunks(3).enumerate() {
            assert!(chunk[0].starts_with(&format!("set_power_limit:gpu{}", gpu)));
            assert!(chunk[1].starts_with(&format!("set_clock_offset:gpu{}:graphics", gpu)));
            assert!(chunk[2].starts_with(&format!("set_clock_offset:gpu{}:memory", gpu)));
        }
    }

    #[test]
    fn test_out_of_range_power_skips_cap_but_not_clocks() {
        let manager = MockManager::new(1);

        // 20% of the mock's 300W default is 60W, below its 100W floor
        tune_all(&manager, &service(20.0), None, OutputFormat::Table).unwrap();

        let calls = mutation_calls(&manager);
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("set_clock_offset:gpu0:graphics"));
        assert!(calls[1].starts_with("set_clock_offset:gpu0:memory"));
    }

    #[test]
    fn test_unsupported_power_policy_skips_cap_but_not_clocks() {
        let manager =
            MockManager::with_devices(vec![MockDevice::new(0).with_power_management(false)]);

        tune_all(&manager, &service(60.0), None, OutputFormat::Table).unwrap();

        let calls = mutation_calls(&manager);
        assert!(calls.iter().all(|c| !c.starts_with("set_power_limit")));
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_single_gpu_selection_only_touches_that_gpu() {
        let manager = MockManager::new(3);

        tune_all(&manager, &service(60.0), Some(1), OutputFormat::Table).unwrap();

        let calls = mutation_calls(&manager);
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.contains("gpu1")));
    }

    #[test]
    fn test_selecting_missing_gpu_is_an_error() {
        let manager = MockManager::new(1);

        let result = tune_all(&manager, &service(60.0), Some(7), OutputFormat::Table);
        assert!(result.is_err());
        assert!(manager.calls().is_empty());
    }

    #[test]
    fn test_dry_run_reports_without_mutating() {
        let plan = TunePlan::new(
            PowerCapPercent::new(60.0).unwrap(),
            ClockOffset::from_khz(100_000),
            ClockOffset::from_khz(100_000),
        );
        let service = TuningService::new(plan, true);
        let manager = MockManager::new(2);

        tune_all(&manager, &service, None, OutputFormat::Table).unwrap();

        assert!(mutation_calls(&manager).is_empty());
    }
}
