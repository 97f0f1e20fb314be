//! macOS Keychain backend.
//!
//! Stores each secret as a generic password under the `secretctl` service,
//! keyed by its label. Other platforms get a backend that reports every
//! operation as unsupported so callers can skip those entries.

use super::Backend;
use crate::error::StorageResult;

/// Keychain storage backend.
pub struct Keychain {
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    service: String,
}

/// Display name of the item stored under `label`.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn item_label(service: &str, label: &str) -> String {
    format!("{}: {}", service, label)
}

impl Keychain {
    /// Backend for the `secretctl` service in the login keychain.
    pub fn new() -> Self {
        Self {
            service: crate::core::constants::KEYCHAIN_SERVICE.to_string(),
        }
    }
}

impl Default for Keychain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use security_framework::access_control::{ProtectionMode, SecAccessControl};
    use security_framework::passwords::{get_generic_password, set_generic_password_options};
    use security_framework::passwords_options::PasswordOptions;
    use tracing::{debug, error, info};

    use super::Keychain;
    use crate::error::{StorageError, StorageResult};

    /// errSecItemNotFound
    const ERR_SEC_ITEM_NOT_FOUND: i32 = -25300;

    /// errSecUserCanceled
    const ERR_SEC_USER_CANCELED: i32 = -128;

    fn keychain_error(label: &str, e: security_framework::base::Error) -> StorageError {
        match e.code() {
            ERR_SEC_ITEM_NOT_FOUND => StorageError::NotFound(format!("keychain:{}", label)),
            ERR_SEC_USER_CANCELED => StorageError::Keychain("access denied by user".to_string()),
            _ => StorageError::Keychain(e.to_string()),
        }
    }

    fn require_label(label: &str) -> StorageResult<()> {
        if label.is_empty() {
            return Err(StorageError::LabelRequired);
        }
        Ok(())
    }

    impl Keychain {
        pub(super) fn read_item(&self, label: &str) -> StorageResult<Vec<u8>> {
            require_label(label)?;
            debug!(label = %label, service = %self.service, "reading secret from keychain");
            get_generic_password(&self.service, label).map_err(|e| {
                error!(label = %label, error_code = e.code(), "keychain read failed");
                keychain_error(label, e)
            })
        }

        pub(super) fn write_item(&self, label: &str, data: &[u8]) -> StorageResult<()> {
            require_label(label)?;
            match get_generic_password(&self.service, label) {
                Ok(_) => info!(label = %label, "updating keychain item"),
                Err(e) if e.code() == ERR_SEC_ITEM_NOT_FOUND => {
                    info!(label = %label, "creating keychain item")
                }
                Err(e) => return Err(keychain_error(label, e)),
            }

            let access = SecAccessControl::create_with_protection(
                Some(ProtectionMode::AccessibleWhenUnlockedThisDeviceOnly),
                0,
            )
            .map_err(|e| keychain_error(label, e))?;

            let mut options = PasswordOptions::new_generic_password(&self.service, label);
            options.set_label(&super::item_label(&self.service, label));
            options.set_access_control(access);

            // Adds the item, or updates it in place when one already matches.
            set_generic_password_options(data, options).map_err(|e| {
                error!(label = %label, error_code = e.code(), "keychain write failed");
                keychain_error(label, e)
            })
        }
    }
}

#[cfg(not(target_os = "macos"))]
mod platform {
    use super::Keychain;
    use crate::error::{StorageError, StorageResult};

    impl Keychain {
        pub(super) fn read_item(&self, _label: &str) -> StorageResult<Vec<u8>> {
            Err(StorageError::Unsupported)
        }

        pub(super) fn write_item(&self, _label: &str, _data: &[u8]) -> StorageResult<()> {
            Err(StorageError::Unsupported)
        }
    }
}

impl Backend for Keychain {
    fn name(&self) -> &'static str {
        "keychain"
    }

    fn is_supported(&self) -> bool {
        cfg!(target_os = "macos")
    }

    fn read(&self, label: &str) -> StorageResult<Vec<u8>> {
        self.read_item(label)
    }

    fn write(&self, label: &str, data: &[u8]) -> StorageResult<()> {
        self.write_item(label, data)
    }
}
