use std::fmt;

use crate::types::{CheckResult, CheckStatus};

/// Final output of a check invocation: one status line and an exit code.
pub struct CheckReport {
    pub check_name: String,
    pub result: CheckResult,
}

impl CheckReport {
    pub fn new(check_name: impl Into<String>, result: CheckResult) -> Self {
        Self {
            check_name: check_name.into(),
            result,
        }
    }

    pub fn status(&self) -> CheckStatus {
        self.result.status
    }

    pub fn exit_code(&self) -> i32 {
        self.result.status.exit_code()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result.message.is_empty() {
            write!(f, "{} {}", self.check_name, self.result.status.label())
        } else {
            write!(f, "{} {}: {}", self.check_name, self.result.status.label(), self.result.message)
        }
    }
}
