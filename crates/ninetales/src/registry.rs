//! Registry of framework adapters.

use crate::adapters as native;
use crate::traits::{Adapter, Framework};
use std::sync::{OnceLock, PoisonError, RwLock};

/// Global registry of adapters. Later entries win lookups.
static ADAPTERS: RwLock<Vec<&'static dyn Adapter>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom adapter.
///
/// It takes precedence over the built-in adapter for the same framework and
/// over anything registered before it.
pub fn register_adapter(adapter: &'static dyn Adapter) {
    init_builtin();
    tracing::debug!(framework = %adapter.framework(), "registering adapter");
    ADAPTERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(adapter);
}

/// Initialize built-in adapters (called automatically on first use).
fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        let builtin: [&'static dyn Adapter; 7] = [
            &native::ATTRS_ADAPTER,
            &native::DATACLASSES_ADAPTER,
            &native::MSGSPEC_ADAPTER,
            &native::NAMEDTUPLE_ADAPTER,
            &native::PYDANTIC_V1_ADAPTER,
            &native::PYDANTIC_V2_ADAPTER,
            &native::TYPEDDICT_ADAPTER,
        ];
        ADAPTERS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(builtin);
    });
}

/// Get the adapter for a framework.
pub fn get_adapter(framework: Framework) -> &'static dyn Adapter {
    init_builtin();
    ADAPTERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .rev()
        .find(|a| a.framework() == framework)
        .copied()
        .unwrap_or_else(|| builtin_adapter(framework))
}

/// Get an adapter by framework name (e.g., "attrs", "pydantic-v2").
pub fn adapter_for_name(name: &str) -> Option<&'static dyn Adapter> {
    Framework::ALL
        .into_iter()
        .find(|f| f.name() == name)
        .map(get_adapter)
}

/// The active adapter for every framework, in [`Framework::ALL`] order.
pub fn adapters() -> Vec<&'static dyn Adapter> {
    Framework::ALL.into_iter().map(get_adapter).collect()
}

fn builtin_adapter(framework: Framework) -> &'static dyn Adapter {
    match framework {
        Framework::Attrs => &native::ATTRS_ADAPTER,
        Framework::Dataclasses => &native::DATACLASSES_ADAPTER,
        Framework::Msgspec => &native::MSGSPEC_ADAPTER,
        Framework::NamedTuple => &native::NAMEDTUPLE_ADAPTER,
        Framework::PydanticV1 => &native::PYDANTIC_V1_ADAPTER,
        Framework::PydanticV2 => &native::PYDANTIC_V2_ADAPTER,
        Framework::TypedDict => &native::TYPEDDICT_ADAPTER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_framework_has_an_adapter() {
        for framework in Framework::ALL {
            assert_eq!(get_adapter(framework).framework(), framework);
        }
        assert_eq!(adapters().len(), Framework::ALL.len());
    }

    #[test]
    fn test_lookup_by_name() {
        let adapter = adapter_for_name("pydantic-v1").unwrap();
        assert_eq!(adapter.framework(), Framework::PydanticV1);
        assert!(adapter_for_name("marshmallow").is_none());
    }
}
