//! Graphics context acquisition

use super::error::RendererError;

/// Instance, surface and adapter for one drawing surface
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub surface: wgpu::Surface<'static>,
    pub adapter: wgpu::Adapter,
}

impl GpuContext {
    /// Create a surface for `target` and find an adapter that can present to it
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        backends: wgpu::Backends,
    ) -> Result<Self, RendererError> {
        log::info!("Requesting graphics context (backends: {:?})", backends);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance.create_surface(target)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("Using adapter: {:?} ({:?})", info.name, info.backend);

        Ok(Self {
            instance,
            surface,
            adapter,
        })
    }
}
