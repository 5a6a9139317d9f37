//! Blob SAS permission flags.

use std::fmt;

use azure_storage::shared_access_signature::service_sas::BlobSasPermissions;

/// Permissions granted by a blob service SAS.
///
/// Rendered in the canonical `racwd` order expected by the storage service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SasPermissions {
    pub read: bool,
    pub add: bool,
    pub create: bool,
    pub write: bool,
    pub delete: bool,
}

impl SasPermissions {
    /// Read-only access.
    pub const fn read() -> Self {
        Self {
            read: true,
            add: false,
            create: false,
            write: false,
            delete: false,
        }
    }

    /// Whether the permission set grants nothing but reads.
    pub const fn is_read_only(&self) -> bool {
        self.read && !self.add && !self.create && !self.write && !self.delete
    }

    /// Whether no permission is granted at all.
    pub const fn is_empty(&self) -> bool {
        !(self.read || self.add || self.create || self.write || self.delete)
    }
}

impl fmt::Display for SasPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.read, 'r'),
            (self.add, 'a'),
            (self.create, 'c'),
            (self.write, 'w'),
            (self.delete, 'd'),
        ];
        for (enabled, flag) in flags {
            if enabled {
                write!(f, "{flag}")?;
            }
        }
        Ok(())
    }
}

impl From<SasPermissions> for BlobSasPermissions {
    fn from(permissions: SasPermissions) -> Self {
        Self {
            read: permissions.read,
            add: permissions.add,
            create: permissions.create,
            write: permissions.write,
            delete: permissions.delete,
            ..Self::default()
        }
    }
}
