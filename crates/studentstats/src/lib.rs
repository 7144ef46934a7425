//! `studentstats` - Statistics engine for a student directory
//!
//! This library stores student directory records and aggregates them into the
//! cohort coverage, course, blood type, hometown, star sign and personality
//! distributions plus the free-text word clouds shown on a department
//! statistics dashboard.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod course;
pub mod error;
pub mod logging;
pub mod star_sign;
pub mod stats;
pub mod storage;
pub mod student;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use star_sign::StarSign;
pub use stats::StatisticsReport;
pub use storage::{Storage, StorageStats};
pub use student::StudentRecord;
