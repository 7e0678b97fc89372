//! Multi-step programming jobs
//!
//! A [`Job`] is an ordered list of [`Step`]s run against one
//! [`Programmer`]. The first failing step aborts the job and its error is
//! returned unchanged.

use tracing::info;

use crate::config::ProgrammerConfig;
use crate::error::{ProgrammerError, Result};
use crate::programmer::{Programmer, ERASED};
use crate::transport::Transport;

/// One operation of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Pulse the reset line
    Reset,
    /// Fill `length` bytes from address 0
    Fill { byte: u8, length: usize },
    /// Require `length` bytes from address 0 to equal `byte`
    CheckFilled { byte: u8, length: usize },
    /// Write `data` from address 0
    Write { data: Vec<u8> },
    /// Read `length` bytes from address 0 into the job output
    Read { length: usize },
    /// Compare memory from address 0 with `data`
    Verify { data: Vec<u8>, label: String },
    /// Compare memory from address 0 with the job output so far
    VerifyReadBack,
}

impl Step {
    fn describe(&self) -> &'static str {
        match self {
            Step::Reset => "resetting programmer",
            Step::Fill { .. } => "filling EEPROM",
            Step::CheckFilled { .. } => "checking EEPROM is filled",
            Step::Write { .. } => "writing EEPROM",
            Step::Read { .. } => "reading EEPROM",
            Step::Verify { .. } | Step::VerifyReadBack => "verifying EEPROM",
        }
    }
}

/// What to do with the chip in a standard job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRequest {
    /// Erase the whole chip first
    pub clear: bool,
    /// Check the whole chip is erased before transferring
    pub check_empty: bool,
    /// Data to program, with a label for mismatch reports
    pub write: Option<(Vec<u8>, String)>,
    /// Read the whole chip
    pub read: bool,
    /// Verify the transferred data afterwards
    pub verify: bool,
}

/// Ordered list of steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
    steps: Vec<Step>,
}

impl Job {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Standard sequence for a chip of `device_size` bytes
    ///
    /// Reset, optionally erase and check, then either program or read the
    /// chip, then optionally verify. A write takes precedence over a read.
    pub fn standard(request: &JobRequest, device_size: usize) -> Self {
        let mut job = Job::new().step(Step::Reset);
        if request.clear {
            job = job.step(Step::Fill {
                byte: ERASED,
                length: device_size,
            });
        }
        if request.check_empty {
            job = job.step(Step::CheckFilled {
                byte: ERASED,
                length: device_size,
            });
        }
        match &request.write {
            Some((data, label)) => {
                job = job.step(Step::Write { data: data.clone() });
                if request.verify {
                    job = job.step(Step::Verify {
                        data: data.clone(),
                        label: label.clone(),
                    });
                }
            }
            None if request.read => {
                job = job.step(Step::Read {
                    length: device_size,
                });
                if request.verify {
                    job = job.step(Step::VerifyReadBack);
                }
            }
            None => {}
        }
        job
    }

    /// Standard sequence sized by `config.device_size`
    ///
    /// Fails if the request touches the whole chip and no size is
    /// configured.
    pub fn from_config(request: &JobRequest, config: &ProgrammerConfig) -> Result<Self> {
        let whole_chip =
            request.clear || request.check_empty || (request.write.is_none() && request.read);
        let device_size = match config.device_size {
            Some(size) => size as usize,
            None if whole_chip => {
                return Err(ProgrammerError::InvalidConfig(
                    "device_size is required to clear, check or read the whole chip".into(),
                ))
            }
            None => 0,
        };
        Ok(Self::standard(request, device_size))
    }

    /// Run every step in order
    ///
    /// Returns the data collected by [`Step::Read`] steps.
    pub fn run<T: Transport>(&self, programmer: &mut Programmer<T>) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            info!(step = index + 1, total = self.steps.len(), "{}", step.describe());
            match step {
                Step::Reset => programmer.reset()?,
                Step::Fill { byte, length } => programmer.fill(*byte, *length)?,
                Step::CheckFilled { byte, length } => programmer.check_filled(*byte, *length)?,
                Step::Write { data } => programmer.write(data, 0)?,
                Step::Read { length } => output = programmer.read(0, *length)?,
                Step::Verify { data, label } => programmer.verify_labeled(data, 0, label)?,
                Step::VerifyReadBack => programmer.verify_labeled(&output, 0, "read data")?,
            }
        }
        info!("done");
        Ok(output)
    }
}
