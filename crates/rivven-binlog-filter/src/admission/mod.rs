//! Event admission: the decider and its configuration

mod config;
mod decider;

pub use config::{AdmissionConfig, AdmissionConfigBuilder};
pub use decider::{
    AdmissionDecider, AdmissionDeciderBuilder, BuiltinSkipFn, SkipReason, SystemSchemaFn,
};
