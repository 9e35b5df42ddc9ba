//! The validation error accumulator.

bitflags::bitflags! {
    /// Kinds of validation errors, composable bitwise.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ValidationFlags: u64 {
        /// An invalid size of a list, array or set.
        const INVALID_COUNT = 0x01;
        /// An object which is not allowed to be empty/null, is empty/null.
        const NULL_NOT_ALLOWED = 0x02;
        /// A required object is missing.
        const MISSING_OBJECT = 0x04;
        /// An object is invalid or used in an invalid way.
        const INVALID_OBJECT = 0x08;
        /// The setup of an object or system is invalid.
        const INVALID_SETUP = 0x10;
        /// A value or index is out of bounds or not allowed.
        const INVALID_VALUE = 0x20;
    }
}

/// One recorded validation error, with the call site that reported it.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub flags: ValidationFlags,
    pub message: String,
    pub file: &'static str,
    pub line: u32,
}

/// Accumulates validation errors while an entity is checked before it is
/// locked and written to disk.
///
/// Validation itself never fails: checks report into the validator and
/// carry on, and the caller inspects [`Validator::error_count`] for
/// pass/fail. Recording of per-error descriptions is off by default and
/// can be enabled with [`Validator::set_record_descriptions`]; the error
/// count and the flag union are always tracked.
#[derive(Debug, Default)]
pub struct Validator {
    error_count: u64,
    errors: ValidationFlags,
    record_descriptions: bool,
    descriptions: Vec<ValidationIssue>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an error of the given kind.
    pub fn report_error(&mut self, flags: ValidationFlags) {
        self.error_count += 1;
        self.errors |= flags;
    }

    /// Report an error with a lazily built description.
    ///
    /// Prefer the [`validation_error!`](crate::validation_error) macro,
    /// which fills in the call site.
    pub fn report_error_description(
        &mut self,
        flags: ValidationFlags,
        message: impl FnOnce() -> String,
        file: &'static str,
        line: u32,
    ) {
        self.report_error(flags);
        if self.record_descriptions {
            self.descriptions.push(ValidationIssue {
                flags,
                message: message(),
                file,
                line,
            });
        }
    }

    pub fn set_record_descriptions(&mut self, record: bool) {
        self.record_descriptions = record;
    }

    pub fn record_descriptions(&self) -> bool {
        self.record_descriptions
    }

    pub fn clear(&mut self) {
        self.error_count = 0;
        self.errors = ValidationFlags::empty();
        self.descriptions.clear();
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn errors(&self) -> ValidationFlags {
        self.errors
    }

    pub fn descriptions(&self) -> &[ValidationIssue] {
        &self.descriptions
    }
}

/// Report a validation error with a formatted description and the current
/// file/line attached.
///
/// ```
/// # use cask_types::{Validator, ValidationFlags, validation_error};
/// # let mut validator = Validator::new();
/// # let index = 3;
/// validation_error!(
///     validator,
///     ValidationFlags::INVALID_VALUE,
///     "index {index} is out of bounds"
/// );
/// ```
#[macro_export]
macro_rules! validation_error {
    ($validator:expr, $flags:expr, $($arg:tt)*) => {
        $validator.report_error_description($flags, || format!($($arg)*), file!(), line!())
    };
}
