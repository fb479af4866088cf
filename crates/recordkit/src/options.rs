use recordkit_core::Attributes;

/// Options for lookups by primary key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Additional filter merged into the lookup. The primary key always
    /// wins over a colliding entry.
    pub filter: Attributes,
}

/// Options for `save`, `update`, `create` and `destroy`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Raise the first failure as a typed error instead of returning
    /// `Ok(false)` with the error bag populated.
    pub throw: bool,
}

/// Options for `validate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Stop at the first failing rule and raise it.
    pub throw: bool,
}

impl FindOptions {
    pub fn filter(filter: Attributes) -> FindOptions {
        FindOptions { filter }
    }
}

impl SaveOptions {
    pub fn throw() -> SaveOptions {
        SaveOptions { throw: true }
    }
}

impl ValidateOptions {
    pub fn throw() -> ValidateOptions {
        ValidateOptions { throw: true }
    }
}

impl From<SaveOptions> for ValidateOptions {
    fn from(options: SaveOptions) -> Self {
        ValidateOptions {
            throw: options.throw,
        }
    }
}
