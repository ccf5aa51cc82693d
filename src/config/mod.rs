//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::property_mapping::PropertyMappingEntry;

/// Media type vocabulary used for content negotiation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTypesConfig {
    /// Vendor subtype prefix (e.g., "vnd.example.author")
    pub vendor_prefix: String,

    /// Token selecting the full representation
    #[serde(default = "default_full")]
    pub full: String,

    /// Token selecting the friendly representation
    #[serde(default = "default_friendly")]
    pub friendly: String,
}

fn default_full() -> String {
    "full".to_string()
}

fn default_friendly() -> String {
    "friendly".to_string()
}

impl Default for MediaTypesConfig {
    fn default() -> Self {
        Self {
            vendor_prefix: "vnd.example.author".to_string(),
            full: default_full(),
            friendly: default_friendly(),
        }
    }
}

/// Property mapping declared for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMappingConfig {
    /// Resource name (e.g., "authors")
    pub resource: String,

    /// External field entries
    pub entries: Vec<PropertyMappingEntry>,
}

/// Complete configuration for a shaper service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaperConfig {
    /// Address the server listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Prefix of every generated href
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub media_types: MediaTypesConfig,

    /// Mapping tables, one per resource
    #[serde(default = "default_property_mappings")]
    pub property_mappings: Vec<ResourceMappingConfig>,
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_property_mappings() -> Vec<ResourceMappingConfig> {
    vec![
        ResourceMappingConfig {
            resource: "authors".to_string(),
            entries: vec![
                PropertyMappingEntry::new("Id", ["id"]),
                PropertyMappingEntry::new("MainCategory", ["main_category"]),
                PropertyMappingEntry::new("Age", ["date_of_birth"]).reversed(),
                PropertyMappingEntry::new("Name", ["first_name", "last_name"]),
            ],
        },
        ResourceMappingConfig {
            resource: "courses".to_string(),
            entries: vec![
                PropertyMappingEntry::new("Id", ["id"]),
                PropertyMappingEntry::new("Title", ["title"]),
            ],
        },
    ]
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl ShaperConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Find the mapping section for a resource
    pub fn property_mapping(&self, resource: &str) -> Option<&ResourceMappingConfig> {
        self.property_mappings
            .iter()
            .find(|m| m.resource.eq_ignore_ascii_case(resource))
    }

    /// Create the default configuration
    pub fn default_config() -> Self {
        Self {
            bind_address: default_bind_address(),
            base_url: default_base_url(),
            media_types: MediaTypesConfig::default(),
            property_mappings: default_property_mappings(),
        }
    }
}
