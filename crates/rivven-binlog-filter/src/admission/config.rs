//! Admission configuration
//!
//! One document per replication task describing its scope, the online
//! schema change tool in use on the source, and the event filter rules.
//!
//! ```rust
//! use rivven_binlog_filter::admission::AdmissionConfig;
//!
//! let config: AdmissionConfig = serde_json::from_str(r#"{
//!     "block_allow_list": { "include_schemas": ["shop_*"] },
//!     "online_ddl": { "tool": "gh-ost" },
//!     "filter_rules": [
//!         { "schema_pattern": "shop_*", "events": ["truncate table"], "action": "ignore" }
//!     ]
//! }"#).unwrap();
//! assert!(config.validate().is_ok());
//! ```

use crate::common::{
    AdmissionError, BinlogEventRule, BlockAllowList, BlockAllowListConfig, OnlineDdlClassifier,
    OnlineDdlConfig, OnlineDdlTool, Result,
};
use serde::{Deserialize, Serialize};

/// Admission configuration for a replication task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Replication scope
    #[serde(default)]
    pub block_allow_list: BlockAllowListConfig,

    /// Online schema change tool; `None` treats every table as real
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_ddl: Option<OnlineDdlConfig>,

    /// Binlog event filter rules; empty disables rule filtering
    #[serde(default)]
    pub filter_rules: Vec<BinlogEventRule>,
}

impl AdmissionConfig {
    /// Create a new builder.
    pub fn builder() -> AdmissionConfigBuilder {
        AdmissionConfigBuilder::default()
    }

    /// Validate patterns and rules without building the decider.
    pub fn validate(&self) -> Result<()> {
        BlockAllowList::new(self.block_allow_list.clone())?;

        if let Some(online_ddl) = &self.online_ddl {
            OnlineDdlClassifier::new(online_ddl)?;
        }

        for (idx, rule) in self.filter_rules.iter().enumerate() {
            rule.validate()
                .map_err(|e| AdmissionError::config(format!("filter rule #{}: {}", idx, e)))?;
        }

        Ok(())
    }
}

/// Builder for AdmissionConfig.
#[derive(Debug, Default)]
pub struct AdmissionConfigBuilder {
    config: AdmissionConfig,
}

impl AdmissionConfigBuilder {
    /// Schemas to replicate.
    pub fn include_schemas(mut self, patterns: Vec<String>) -> Self {
        self.config.block_allow_list.include_schemas = patterns;
        self
    }

    /// Schemas never replicated.
    pub fn exclude_schemas(mut self, patterns: Vec<String>) -> Self {
        self.config.block_allow_list.exclude_schemas = patterns;
        self
    }

    /// Tables to replicate.
    pub fn include_tables(mut self, patterns: Vec<String>) -> Self {
        self.config.block_allow_list.include_tables = patterns;
        self
    }

    /// Tables never replicated.
    pub fn exclude_tables(mut self, patterns: Vec<String>) -> Self {
        self.config.block_allow_list.exclude_tables = patterns;
        self
    }

    /// Online schema change tool with default naming rules.
    pub fn online_ddl(mut self, tool: OnlineDdlTool) -> Self {
        self.config.online_ddl = Some(OnlineDdlConfig::new(tool));
        self
    }

    /// Online schema change configuration.
    pub fn online_ddl_config(mut self, config: OnlineDdlConfig) -> Self {
        self.config.online_ddl = Some(config);
        self
    }

    /// Append a filter rule.
    pub fn filter_rule(mut self, rule: BinlogEventRule) -> Self {
        self.config.filter_rules.push(rule);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AdmissionConfig {
        self.config
    }
}
