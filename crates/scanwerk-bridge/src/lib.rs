// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk Bridge — Imaging device subsystem abstractions.
//
// Defines the traits the acquisition orchestrator talks to, a stub for hosts
// without any driver, and the virtual scanner used on desktop and in CI.

pub mod stub;
pub mod traits;
pub mod virtual_device;

pub use traits::{DeviceSource, DeviceSubsystem, FirstSourceChooser, SourceChooser};
pub use virtual_device::{VirtualDeviceConfig, VirtualSubsystem};

/// Build the device subsystem for this host.
///
/// The virtual scanner is the only backend compiled in; `chooser` is what it
/// shows when the session asks the user to pick a source.
pub fn device_subsystem(chooser: Box<dyn SourceChooser>) -> Box<dyn DeviceSubsystem> {
    Box::new(VirtualSubsystem::new(VirtualDeviceConfig::default(), chooser))
}
