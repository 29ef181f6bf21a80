//! `Factory` — the backend-typed root of the API (§4.11). Application code
//! obtains one `Factory<A>` for a chosen backend, enumerates `Adapter`s
//! from it, and creates `Surface`s through it.

use gpu_hal::{Api, Instance as _};
use gpu_types::{BackendType, PowerPreference, ValidationMode};

use crate::adapter::Adapter;
use crate::error::GpuError;
use crate::handle::Handle;
use crate::surface::Surface;

pub(crate) struct InstanceShared<A: Api> {
    pub(crate) raw: A::Instance,
}

#[derive(Debug, Clone, Copy)]
pub struct FactoryDescriptor {
    pub preferred_backend: BackendType,
    pub validation_mode: ValidationMode,
}

impl Default for FactoryDescriptor {
    fn default() -> Self {
        FactoryDescriptor {
            preferred_backend: BackendType::Undefined,
            validation_mode: ValidationMode::Disabled,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestAdapterOptions {
    pub power_preference: PowerPreference,
}

/// One native graphics API, opened and ready to enumerate adapters from.
pub struct Factory<A: Api> {
    instance: Handle<InstanceShared<A>>,
}

impl<A: Api> Clone for Factory<A> {
    fn clone(&self) -> Self {
        Factory { instance: self.instance.clone() }
    }
}

impl<A: Api> Factory<A> {
    /// # Safety
    /// The caller must ensure no other native graphics context is using
    /// the same validation/debug layer resources incompatibly; otherwise
    /// this mirrors ordinary backend instance creation.
    pub unsafe fn new(desc: &FactoryDescriptor) -> Result<Self, GpuError> {
        let flags = gpu_hal::InstanceFlags::from_validation_mode(desc.validation_mode);
        let instance = A::Instance::init(&gpu_hal::InstanceDescriptor { flags })?;
        Ok(Factory { instance: Handle::new(InstanceShared { raw: instance }) })
    }

    /// All adapters this factory's backend can see (§4.11 `requestAdapter`
    /// without a preference does the unfiltered enumeration this wraps).
    pub unsafe fn enumerate_adapters(&self) -> Vec<Adapter<A>> {
        self.instance
            .raw
            .enumerate_adapters()
            .into_iter()
            .map(|exposed| Adapter::new(exposed))
            .collect()
    }

    /// §4.11: discrete-first when `HighPerformance`, integrated-first when
    /// `LowPower`; with only one adapter exposed (the common case: `null`,
    /// or a single real GPU) that adapter is returned regardless of
    /// preference, resolving what would otherwise be an empty-list Open
    /// Question.
    pub unsafe fn request_adapter(&self, options: &RequestAdapterOptions) -> Option<Adapter<A>> {
        let mut adapters = self.enumerate_adapters();
        if adapters.is_empty() {
            return None;
        }
        if adapters.len() == 1 {
            return Some(adapters.remove(0));
        }
        let rank = |adapter: &Adapter<A>| -> u32 {
            use gpu_types::AdapterType::*;
            let discrete_first = matches!(adapter.info().adapter_type, Discrete);
            let integrated_first = matches!(adapter.info().adapter_type, Integrated | Discrete);
            match options.power_preference {
                PowerPreference::HighPerformance => u32::from(!discrete_first),
                PowerPreference::LowPower => u32::from(!integrated_first),
                PowerPreference::None | PowerPreference::_Force32 => 0,
            }
        };
        adapters.sort_by_key(rank);
        Some(adapters.remove(0))
    }

    /// # Safety
    /// `handle` must reference a live native window for the lifetime of
    /// the returned `Surface`.
    pub unsafe fn create_surface(
        &self,
        handle: &dyn raw_window_handle::HasRawWindowHandle,
    ) -> Result<Surface<A>, GpuError> {
        let raw = self.instance.raw.create_surface(handle)?;
        Ok(Surface::new(self.instance.clone(), raw))
    }
}
