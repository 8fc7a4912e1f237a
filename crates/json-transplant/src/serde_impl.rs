//! Plugging transplant containers into ordinary serde (de)serialization.
//!
//! [`impl_transplant_serde!`](crate::impl_transplant_serde) implements
//! `Serialize`/`Deserialize` for a container by routing through a converter,
//! so containers can sit inside other serde types, including other
//! containers.

use std::any::type_name;
use std::sync::OnceLock;

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::converter::TransplantConverter;
use crate::descriptor::DescriptorFactory;
use crate::shape::Transplant;

/// Process-wide converter with default options.
pub fn default_converter() -> &'static TransplantConverter {
    static CONVERTER: OnceLock<TransplantConverter> = OnceLock::new();
    CONVERTER.get_or_init(TransplantConverter::new)
}

pub fn serialize_with<T, F, S>(
    converter: &TransplantConverter<F>,
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    T: Transplant,
    F: DescriptorFactory,
    S: Serializer,
{
    converter
        .serialize(Some(value))
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

pub fn deserialize_with<'de, T, F, D>(
    converter: &TransplantConverter<F>,
    deserializer: D,
) -> Result<T, D::Error>
where
    T: Transplant,
    F: DescriptorFactory,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    converter
        .deserialize::<T>(value)
        .map_err(D::Error::custom)?
        .ok_or_else(|| D::Error::custom(format!("expected {}, found null", type_name::<T>())))
}

/// `#[serde(with = "json_transplant::serde_impl")]` helper for a container
/// field whose type has no `Serialize` impl of its own.
pub fn serialize<T: Transplant, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serialize_with(default_converter(), value, serializer)
}

/// Counterpart of [`serialize`]. JSON null is an error here; the field's
/// container must be present.
pub fn deserialize<'de, T: Transplant, D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
    deserialize_with(default_converter(), deserializer)
}

/// Implements `serde::Serialize` and `serde::Deserialize` for a container.
///
/// The one-argument form uses [`default_converter`]; the two-argument form
/// takes an expression evaluating to `&TransplantConverter<_>`.
///
/// A container whose root is null serializes as `null`; wrap the field that
/// holds it in `Option` to read that back.
#[macro_export]
macro_rules! impl_transplant_serde {
    ($ty:ty) => {
        $crate::impl_transplant_serde!($ty, $crate::serde_impl::default_converter());
    };
    ($ty:ty, $converter:expr) => {
        impl $crate::__private::serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::serde_impl::serialize_with($converter, self, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::serde_impl::deserialize_with($converter, deserializer)
            }
        }
    };
}
