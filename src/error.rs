use std::fmt;

/// An observed output diverged from the value computed from the stimulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub check: String,
    pub stimulus: u8,
    pub actual: u8,
    pub expected: u8,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed for ui_in={:08b}: got {:#04x}, expected {:#04x}",
            self.check, self.stimulus, self.actual, self.expected
        )
    }
}

impl std::error::Error for Mismatch {}
