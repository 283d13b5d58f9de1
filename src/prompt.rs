use std::mem;

use nix::libc;

use crate::constants::PROMPT_SUFFIX;

const SECONDS_PER_DAY: libc::time_t = 24 * 60 * 60;

/// The prompt shown before each read, e.g. `14:05:09# `.
pub fn prompt() -> String {
    let (hour, minute, second) = local_clock();
    format!("{}{PROMPT_SUFFIX}", format_clock(hour, minute, second))
}

pub fn format_clock(hour: u32, minute: u32, second: u32) -> String {
    format!("{hour:02}:{minute:02}:{second:02}")
}

fn local_clock() -> (u32, u32, u32) {
    // SAFETY: `time` accepts a null pointer; `localtime_r` writes only into `tm`.
    let now = unsafe { libc::time(std::ptr::null_mut()) };
    let mut tm: libc::tm = unsafe { mem::zeroed() };
    if unsafe { libc::localtime_r(&now, &mut tm) }.is_null() {
        log::debug!("localtime_r failed, showing UTC");
        let of_day = now.rem_euclid(SECONDS_PER_DAY);
        return (
            (of_day / 3600) as u32,
            (of_day % 3600 / 60) as u32,
            (of_day % 60) as u32,
        );
    }
    (tm.tm_hour as u32, tm.tm_min as u32, tm.tm_sec as u32)
}
