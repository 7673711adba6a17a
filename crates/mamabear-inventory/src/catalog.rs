//! Fact catalog
//!
//! The catalog is an ordered list of `(name, source)` pairs built explicitly at
//! startup. Its order is the step order reported to listeners.

use chrono::Local;
use mamabear_api::FactValue;
use mamabear_exec::CommandCache;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;
use crate::parse;

/// Profiler category holding model, CPU, memory and firmware facts
pub const HARDWARE_CATEGORY: &str = "SPHardwareDataType";
/// Profiler category holding volume facts
pub const STORAGE_CATEGORY: &str = "SPStorageDataType";

/// Format of the `collected_at` fact
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Locations of the introspection utilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// Category-scoped hardware/software inventory utility
    pub system_profiler: String,
    /// Version reporting utility
    pub sw_vers: String,
    /// Directory listing utility
    pub ls: String,
    /// Directory holding one entry per user home
    pub users_root: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            system_profiler: "/usr/sbin/system_profiler".to_string(),
            sw_vers: "/usr/bin/sw_vers".to_string(),
            ls: "/bin/ls".to_string(),
            users_root: "/Users".to_string(),
        }
    }
}

/// How a single fact is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactSource {
    /// Value of the first line in a profiler category whose label contains `key`
    Profile { category: String, key: String },
    /// Joined `sw_vers` values
    SoftwareVersion,
    /// Home directory entries minus guest and shared
    Users,
    /// Local time of collection
    CurrentTime,
    /// Not collected; always the empty string and never runs a command
    Placeholder,
}

impl FactSource {
    /// Shorthand for [`FactSource::Profile`]
    pub fn profile(category: impl Into<String>, key: impl Into<String>) -> Self {
        FactSource::Profile {
            category: category.into(),
            key: key.into(),
        }
    }

    /// Produce the fact value, reading commands through `cache`
    ///
    /// # Errors
    /// Returns an error if the command gave no output or the expected label is
    /// missing. Callers store an empty value in that case.
    pub async fn produce(
        &self,
        cache: &CommandCache,
        tools: &ToolPaths,
    ) -> Result<FactValue, InventoryError> {
        match self {
            FactSource::Profile { category, key } => {
                let lines = cache.execute(&tools.system_profiler, &[category]).await;
                if lines.is_empty() {
                    return Err(InventoryError::NoOutput {
                        command: format!("{} {category}", tools.system_profiler),
                    });
                }
                parse::labeled_value(&lines, key)
                    .map(FactValue::Text)
                    .ok_or_else(|| InventoryError::LabelNotFound {
                        category: category.clone(),
                        key: key.clone(),
                    })
            }
            FactSource::SoftwareVersion => {
                let lines = cache.execute::<&str>(&tools.sw_vers, &[]).await;
                if lines.is_empty() {
                    return Err(InventoryError::NoOutput {
                        command: tools.sw_vers.clone(),
                    });
                }
                Ok(FactValue::Text(parse::software_version(&lines)))
            }
            // An empty listing is a valid (if odd) answer, not an error
            FactSource::Users => {
                let listing = cache.execute(&tools.ls, &[&tools.users_root]).await;
                Ok(FactValue::List(parse::users(&listing)))
            }
            FactSource::CurrentTime => Ok(FactValue::Text(
                Local::now().format(TIMESTAMP_FORMAT).to_string(),
            )),
            FactSource::Placeholder => Ok(FactValue::empty()),
        }
    }
}

/// A named catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub source: FactSource,
}

/// Ordered set of facts collected per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactCatalog {
    entries: Vec<CatalogEntry>,
}

impl FactCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fact; a later entry with an existing name replaces the earlier source in place
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, source: FactSource) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.source = source,
            None => self.entries.push(CatalogEntry { name, source }),
        }
        self
    }

    /// The standard macOS host catalog
    #[must_use]
    pub fn macos() -> Self {
        let hw = |key: &str| FactSource::profile(HARDWARE_CATEGORY, key);

        Self::new()
            .with("software_version", FactSource::SoftwareVersion)
            .with("model_id", hw("Model Identifier"))
            .with("serial_number", hw("Serial Number (system)"))
            .with("processor_name", hw("Processor Name"))
            .with("processor_speed", hw("Processor Speed"))
            .with("processor_cores", hw("Total Number of Cores"))
            .with("memory", hw("Memory"))
            .with("hardware_uuid", hw("Hardware UUID"))
            .with("boot_rom_version", hw("Boot ROM Version"))
            .with("smc_version", hw("SMC Version (system)"))
            .with("users", FactSource::Users)
            .with(
                "storage_capacity",
                FactSource::profile(STORAGE_CATEGORY, "Capacity"),
            )
            .with("osx_installation_date", FactSource::Placeholder)
            .with("osx_fulldiskencryption", FactSource::Placeholder)
            .with("osx_screensaver", FactSource::Placeholder)
            .with("osx_firmwarepassword", FactSource::Placeholder)
            .with("collected_at", FactSource::CurrentTime)
    }

    /// Entries in step order
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Fact names in step order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
