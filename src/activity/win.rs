use std::time::Duration;

use anyhow::{anyhow, Result};
use windows::Win32::{
    System::SystemInformation::GetTickCount64,
    UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO},
};

use super::IdleDetector;

pub fn get_idle_time() -> Result<Duration> {
    let mut last: LASTINPUTINFO = LASTINPUTINFO {
        cbSize: size_of::<LASTINPUTINFO>() as u32,
        dwTime: 0,
    };
    let is_success = unsafe { GetLastInputInfo(&mut last) };
    if !is_success.as_bool() {
        return Err(anyhow!("Failed to retrieve user idle time"));
    }

    // dwTime is a 32 bit tick count, it wraps around every ~49 days while the 64 bit one doesn't.
    let tick_count = unsafe { GetTickCount64() } as u32;
    Ok(Duration::from_millis(
        tick_count.wrapping_sub(last.dwTime) as u64,
    ))
}

pub struct WindowsIdleDetector {}

impl WindowsIdleDetector {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for WindowsIdleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleDetector for WindowsIdleDetector {
    fn idle_time(&mut self) -> Result<Duration> {
        get_idle_time()
    }
}
