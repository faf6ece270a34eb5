pub mod capture;
pub mod device;

pub use capture::{CaptureError, CaptureStream, BLOCK_SAMPLES};
pub use device::{
    default_sample_rate, list_input_devices, select_input_device, DeviceError, DeviceSelector,
    InputDeviceInfo,
};
