//! Script logging. Messages land in the host's `log` output under the
//! `script` target.

use crate::interop::internal_calls as ic;

pub struct Log;

impl Log {
    pub fn trace(message: impl AsRef<str>) {
        ic::log_trace(message.as_ref());
    }

    pub fn info(message: impl AsRef<str>) {
        ic::log_info(message.as_ref());
    }

    pub fn warn(message: impl AsRef<str>) {
        ic::log_warn(message.as_ref());
    }

    pub fn error(message: impl AsRef<str>) {
        ic::log_error(message.as_ref());
    }

    pub fn critical(message: impl AsRef<str>) {
        ic::log_critical(message.as_ref());
    }
}
