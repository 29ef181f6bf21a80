//! `Adapter` — a discoverable physical or virtual GPU (§3 "Adapter").

use gpu_hal::{Adapter as _, Api, ExposedAdapter};
use gpu_types::{AdapterInfo, Features, GpuFeature, Limits};

use crate::device::Device;
use crate::error::GpuError;

pub struct Adapter<A: Api> {
    pub(crate) raw: A::Adapter,
    info: AdapterInfo,
    features: Features,
    limits: Limits,
}

impl<A: Api> Adapter<A> {
    pub(crate) fn new(exposed: ExposedAdapter<A>) -> Self {
        Adapter {
            raw: exposed.adapter,
            info: exposed.info,
            features: exposed.features,
            limits: exposed.capabilities.limits,
        }
    }

    pub fn info(&self) -> &AdapterInfo {
        &self.info
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Closed feature-support predicate (§3 "a feature-support predicate
    /// over the closed set `GPUFeature`").
    pub fn has_feature(&self, feature: GpuFeature) -> bool {
        self.features.supports(feature)
    }

    pub fn features(&self) -> Features {
        self.features
    }

    /// §4.11 `requestAdapter` → `requestDevice`. `features` must be a
    /// subset of what this adapter exposes; requesting anything else is a
    /// precondition violation (§7 `InvalidOperation`), not something the
    /// backend should silently downgrade.
    ///
    /// # Safety
    /// The adapter must still be alive (its owning `Factory` not yet
    /// dropped) and not already consumed by a previous `request_device`
    /// call on real (non-`null`) backends that only support a single open
    /// device per adapter.
    pub unsafe fn request_device(
        &self,
        features: Features,
        limits: &Limits,
    ) -> Result<Device<A>, GpuError> {
        if !self.features.contains(features) {
            return Err(GpuError::InvalidOperation(
                "requested features exceed what this adapter exposes".into(),
            ));
        }
        let open = self.raw.open(features, limits)?;
        Ok(Device::new(open, self.info.backend, features, *limits))
    }

    /// As [`Self::request_device`], but with an explicit
    /// `maxFramesInFlight` (§4.11) instead of
    /// [`gpu_types::MAX_INFLIGHT_FRAMES`] — how the seed scenarios pin
    /// frame pacing to a specific small number (S1's 2, S4's 3) instead of
    /// depending on the default.
    ///
    /// # Safety
    /// Same preconditions as [`Self::request_device`].
    pub unsafe fn request_device_with_max_frames_in_flight(
        &self,
        features: Features,
        limits: &Limits,
        max_frames_in_flight: u32,
    ) -> Result<Device<A>, GpuError> {
        if !self.features.contains(features) {
            return Err(GpuError::InvalidOperation(
                "requested features exceed what this adapter exposes".into(),
            ));
        }
        let open = self.raw.open(features, limits)?;
        Ok(Device::with_max_frames_in_flight(open, self.info.backend, features, *limits, max_frames_in_flight))
    }
}
