//! `Surface` — a native swapchain bound to a platform window (§4.10).

use parking_lot::Mutex;

use gpu_hal::{Adapter as _, Api, Instance as _, Queue as _, Surface as _};
use gpu_types::{AcquireSurfaceResult, Extent3d, PixelFormat, PresentMode, TextureDimension, TextureUsages};

use crate::device::Device;
use crate::error::GpuError;
use crate::factory::InstanceShared;
use crate::handle::{Handle, Label};
use crate::resources::{Texture, TextureShared};

/// §4.10's reduced public surface: `{format, width, height, presentMode}`.
/// `device` is threaded through `configure`, not stored here.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceConfiguration {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub present_mode: PresentMode,
}

pub(crate) struct SurfaceShared<A: Api> {
    raw: Mutex<Option<A::Surface>>,
    instance: Handle<InstanceShared<A>>,
    device: Mutex<Option<Device<A>>>,
    config: Mutex<Option<SurfaceConfiguration>>,
    backbuffer: Mutex<Option<Texture<A>>>,
    label: Label,
}

impl<A: Api> Drop for SurfaceShared<A> {
    fn drop(&mut self) {
        if let Some(mut raw) = self.raw.lock().take() {
            if let Some(device) = self.device.lock().take() {
                unsafe { raw.unconfigure(device.raw()) };
            }
            unsafe { self.instance.raw.destroy_surface(raw) };
        }
    }
}

pub struct Surface<A: Api>(pub(crate) Handle<SurfaceShared<A>>);

impl<A: Api> Clone for Surface<A> {
    fn clone(&self) -> Self {
        Surface(self.0.clone())
    }
}

impl<A: Api> Surface<A> {
    pub(crate) fn new(instance: Handle<InstanceShared<A>>, raw: A::Surface) -> Self {
        Surface(Handle::new(SurfaceShared {
            raw: Mutex::new(Some(raw)),
            instance,
            device: Mutex::new(None),
            config: Mutex::new(None),
            backbuffer: Mutex::new(None),
            label: Label::new(None),
        }))
    }

    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub fn label(&self) -> String {
        self.0.label.get()
    }

    pub fn configuration(&self) -> Option<SurfaceConfiguration> {
        *self.0.config.lock()
    }

    fn build_backbuffer_texture(raw: A::Texture, device: &Device<A>, config: &SurfaceConfiguration) -> Texture<A> {
        Texture(Handle::new(TextureShared {
            raw: Some(raw),
            device: device.0.clone(),
            dimension: TextureDimension::D2,
            format: config.format,
            usage: TextureUsages::RENDER_TARGET | TextureUsages::COPY_DST,
            size: Extent3d { width: config.width, height: config.height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            array_layer_count: 1,
            sample_count: 1,
            label: Label::new(None),
        }))
    }

    /// §4.10: idempotent reconfiguration. Waits the device idle, releases
    /// the cached backbuffer, reconfigures the native swapchain (the
    /// backend itself implements the old-swapchain chain: destroy-after-
    /// create), then primes `current_back_buffer_texture` with a fresh
    /// acquire so invariant 7 holds the instant this returns.
    pub fn configure(&self, device: &Device<A>, config: &SurfaceConfiguration) -> Result<(), GpuError> {
        device.wait_idle()?;
        *self.0.backbuffer.lock() = None;

        let hal_config = gpu_hal::SurfaceConfiguration {
            format: config.format,
            width: config.width,
            height: config.height,
            present_mode: config.present_mode,
            usage: TextureUsages::RENDER_TARGET | TextureUsages::COPY_DST,
        };
        {
            let mut raw = self.0.raw.lock();
            let raw = raw.as_mut().expect("configure on a destroyed surface");
            unsafe { raw.configure(device.raw(), &hal_config)? };
        }

        *self.0.device.lock() = Some(device.clone());
        *self.0.config.lock() = Some(*config);

        let (result, texture) = self.acquire_from_native(Some(1000), device, config);
        if matches!(result, AcquireSurfaceResult::SuccessOptimal | AcquireSurfaceResult::SuccessSuboptimal) {
            *self.0.backbuffer.lock() = texture;
        }
        Ok(())
    }

    /// Cached from the most recent successful acquire (primed by
    /// `configure`, refreshed by `acquire_texture`); `None` before the
    /// first successful configure.
    pub fn current_back_buffer_texture(&self) -> Option<Texture<A>> {
        self.0.backbuffer.lock().clone()
    }

    fn acquire_from_native(
        &self,
        timeout_ms: Option<u32>,
        device: &Device<A>,
        config: &SurfaceConfiguration,
    ) -> (AcquireSurfaceResult, Option<Texture<A>>) {
        let mut raw = self.0.raw.lock();
        let raw = raw.as_mut().expect("acquire on a destroyed surface");
        let (result, raw_texture) = unsafe { raw.acquire_texture(timeout_ms) };
        let texture = raw_texture.map(|t| Self::build_backbuffer_texture(t, device, config));
        (result, texture)
    }

    /// §4.6 `acquireSurfaceTexture` / §4.10's acquire loop: on
    /// `Outdated`/`Suboptimal`, reconfigures in place and retries once. On
    /// `Lost`, reports without retrying.
    pub(crate) fn acquire_texture(&self, timeout_ms: Option<u32>) -> (AcquireSurfaceResult, Option<Texture<A>>) {
        let config = match self.configuration() {
            Some(c) => c,
            None => return (AcquireSurfaceResult::Other, None),
        };
        let device = match self.0.device.lock().clone() {
            Some(d) => d,
            None => return (AcquireSurfaceResult::Other, None),
        };

        let (result, texture) = self.acquire_from_native(timeout_ms, &device, &config);
        match result {
            AcquireSurfaceResult::Lost => {
                device.mark_poisoned();
                (AcquireSurfaceResult::Lost, None)
            }
            AcquireSurfaceResult::Outdated => {
                if self.configure(&device, &config).is_err() {
                    return (AcquireSurfaceResult::Lost, None);
                }
                let (retry_result, retry_texture) = self.acquire_from_native(timeout_ms, &device, &config);
                if matches!(retry_result, AcquireSurfaceResult::SuccessOptimal | AcquireSurfaceResult::SuccessSuboptimal) {
                    *self.0.backbuffer.lock() = retry_texture.clone();
                }
                (retry_result, retry_texture)
            }
            AcquireSurfaceResult::SuccessOptimal | AcquireSurfaceResult::SuccessSuboptimal => {
                *self.0.backbuffer.lock() = texture.clone();
                (result, texture)
            }
            other => (other, None),
        }
    }

    /// Called from `Queue::submit` for every surface a finished command
    /// buffer acquired from. `Outdated`/`Suboptimal` reconfigures in place
    /// rather than failing the submit (§4.10); any other failure poisons
    /// the device (§4.10: "failure propagates `DeviceLost`").
    pub(crate) fn present(&self, device: &Device<A>, raw_queue: &A::Queue) -> Result<(), GpuError> {
        let result = {
            let mut raw = self.0.raw.lock();
            let raw = raw.as_mut().expect("present on a destroyed surface");
            unsafe { raw_queue.present(raw) }
        };
        match result {
            Ok(()) => Ok(()),
            Err(gpu_hal::SurfaceError::Outdated) => {
                if let Some(config) = self.configuration() {
                    self.configure(device, &config)?;
                }
                Ok(())
            }
            Err(gpu_hal::SurfaceError::Lost) => {
                device.mark_poisoned();
                Err(GpuError::DeviceLost)
            }
            Err(e) => {
                device.mark_poisoned();
                Err(e.into())
            }
        }
    }
}
