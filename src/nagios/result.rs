// src/nagios/result.rs
use super::Status;
use std::fmt;
use std::process::ExitCode;

/// The single outcome of one plugin invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub status: Status,
    pub message: String,
}

impl CheckResult {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Status::Ok, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Status::Warning, message)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(Status::Critical, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Status::Unknown, message)
    }

    pub fn exit_code(&self) -> ExitCode {
        // ServiceState codes are always 0..=3.
        ExitCode::from(u8::try_from(self.status.exit_code()).unwrap_or(3))
    }

    /// Print the status line on stdout and hand back the matching exit code.
    pub fn emit(&self) -> ExitCode {
        println!("{}", self);
        self.exit_code()
    }
}

// The monitoring daemon only reads the first line of output.
impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message: String = self
            .message
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        write!(f, "{} - {}", self.status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let result = CheckResult::critical("Environment e1: Agent is down");
        assert_eq!(result.to_string(), "CRITICAL - Environment e1: Agent is down");
    }

    #[test]
    fn test_multiline_message_is_flattened() {
        let result = CheckResult::unknown("first\nsecond\r\nthird");
        let line = result.to_string();
        assert!(!line.contains('\n'));
        assert!(!line.contains('\r'));
        assert!(line.starts_with("UNKNOWN - first second"));
    }

    #[test]
    fn test_exit_codes_follow_plugin_protocol() {
        assert_eq!(Status::Ok.exit_code(), 0);
        assert_eq!(Status::Warning.exit_code(), 1);
        assert_eq!(Status::Critical.exit_code(), 2);
        assert_eq!(Status::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_status_names_are_upper_case() {
        assert_eq!(CheckResult::ok("fine").to_string(), "OK - fine");
        assert_eq!(CheckResult::warning("meh").to_string(), "WARNING - meh");
        assert_eq!(CheckResult::unknown("?").to_string(), "UNKNOWN - ?");
    }

    #[test]
    fn test_constructors_set_status() {
        assert_eq!(CheckResult::ok("x").status, Status::Ok);
        assert_eq!(CheckResult::warning("x").status, Status::Warning);
        assert_eq!(CheckResult::critical("x").status, Status::Critical);
        assert_eq!(CheckResult::unknown("x").status, Status::Unknown);
    }
}
