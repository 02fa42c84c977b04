//! Movement domain model.
//!
//! A movement is a named exercise (squat, bench press, ...) owned by exactly
//! one tenant and filed under exactly one category. Fields are private so an
//! assigned identifier cannot change after creation.

use std::fmt;

// ---------------------------------------------------------------------------
// MovementId
// ---------------------------------------------------------------------------

/// Opaque movement identifier assigned by storage on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovementId(String);

impl MovementId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MovementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MovementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MovementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for MovementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Required movement attributes, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementField {
    TenantId,
    Name,
    CategoryId,
}

impl MovementField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TenantId => "tenantId",
            Self::Name => "name",
            Self::CategoryId => "categoryId",
        }
    }
}

impl fmt::Display for MovementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected movement input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: MovementField },
}

fn require(field: MovementField, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NewMovement
// ---------------------------------------------------------------------------

/// A validated movement that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    tenant_id: String,
    name: String,
    category_id: String,
}

impl NewMovement {
    /// Validates the three required attributes.
    ///
    /// Values are kept as given; whitespace-only values are treated as empty.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` for the first empty attribute,
    /// checked in the order tenant, name, category.
    pub fn new(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let tenant_id = tenant_id.into();
        let name = name.into();
        let category_id = category_id.into();

        require(MovementField::TenantId, &tenant_id)?;
        require(MovementField::Name, &name)?;
        require(MovementField::CategoryId, &category_id)?;

        Ok(Self {
            tenant_id,
            name,
            category_id,
        })
    }

    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// Binds the storage-assigned identifier, producing a persisted movement.
    #[must_use]
    pub fn with_id(self, id: MovementId) -> Movement {
        Movement {
            id,
            tenant_id: self.tenant_id,
            name: self.name,
            category_id: self.category_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// A persisted movement such as a panda pull, squat, or bench press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    id: MovementId,
    tenant_id: String,
    name: String,
    category_id: String,
}

impl Movement {
    #[must_use]
    pub fn id(&self) -> &MovementId {
        &self.id
    }

    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// Whether this movement is filed under `category`.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category_id == category
    }
}
