use std::process::ExitCode;

/// Process exit status of a tolk command.
///
/// - `Success` (0): nothing left to do, or only text that already has a key
/// - `Failure` (1): unresolved hard-coded text, a failed write, or a lookup miss
/// - `Error` (2): the command could not run (invalid config, `init` over an existing file)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl ExitStatus {
    /// Status for a command that ran to completion.
    pub fn completed(error_count: usize, missed: bool) -> Self {
        if error_count > 0 || missed {
            Self::Failure
        } else {
            Self::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
