//! Per-field presence marker for partial updates.
//!
//! A JSON body deserializes each field into one of three states: the key is
//! absent (`Keep`), the key is `null` (`Clear`), or the key carries a value
//! (`Set`). Falsy values such as `""` or `0` are therefore applied and then
//! validated rather than silently dropped.

use super::validation::ValidationError;
use serde::{Deserialize, Deserializer};

/// Update instruction for one field.
///
/// Struct fields of this type must carry `#[serde(default)]` so that a
/// missing key maps to [`Patch::Keep`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field omitted: keep the stored value.
    Keep,
    /// Field explicitly `null`: clear the stored value.
    Clear,
    /// Field present: overwrite the stored value.
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Returns the new value when this patch sets one.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Keep | Self::Clear => None,
        }
    }

    /// Applies this patch to a nullable field.
    pub fn apply_to_optional(self, target: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Clear => *target = None,
            Self::Set(value) => *target = Some(value),
        }
    }

    /// Applies this patch to a non-nullable field.
    ///
    /// # Errors
    /// - Returns `MissingField` when the patch clears the field.
    pub fn apply_to_required(
        self,
        field: &'static str,
        target: &mut T,
    ) -> Result<(), ValidationError> {
        match self {
            Self::Keep => Ok(()),
            Self::Clear => Err(ValidationError::MissingField(field)),
            Self::Set(value) => {
                *target = value;
                Ok(())
            }
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

#[cfg(test)]
mod tests {
    use super::Patch;
    use crate::model::validation::ValidationError;

    #[test]
    fn keep_leaves_optional_untouched() {
        let mut value = Some("kept".to_string());
        Patch::Keep.apply_to_optional(&mut value);
        assert_eq!(value.as_deref(), Some("kept"));
    }

    #[test]
    fn clear_resets_optional_and_rejects_required() {
        let mut optional = Some(3);
        Patch::Clear.apply_to_optional(&mut optional);
        assert_eq!(optional, None);

        let mut required = 3;
        let err = Patch::<i32>::Clear
            .apply_to_required("rent", &mut required)
            .expect_err("clearing a required field must fail");
        assert_eq!(err, ValidationError::MissingField("rent"));
        assert_eq!(required, 3);
    }

    #[test]
    fn set_applies_falsy_values() {
        let mut text = "old".to_string();
        Patch::Set(String::new())
            .apply_to_required("name", &mut text)
            .expect("set should apply");
        assert!(text.is_empty());
    }
}
