// Thu Oct 15 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Protection {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl Protection {
    pub const NONE: Protection = Protection { read: false, write: false, execute: false };
    pub const READ: Protection = Protection { read: true, write: false, execute: false };
    pub const READ_EXECUTE: Protection = Protection { read: true, write: false, execute: true };
    pub const READ_WRITE: Protection = Protection { read: true, write: true, execute: false };

    pub fn can_execute(self) -> bool {
        self.execute
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.read { 'r' } else { '-' },
            if self.write { 'w' } else { '-' },
            if self.execute { 'x' } else { '-' },
        )
    }
}
