//! Rendering context acquisition

use crate::error::GpuError;

/// A named backend / power / fallback combination to try when acquiring a context.
#[derive(Debug, Clone, Copy)]
pub struct AdapterAlias {
    pub name: &'static str,
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub force_fallback_adapter: bool,
}

/// Aliases in the order they are tried.
pub fn adapter_aliases() -> [AdapterAlias; 3] {
    [
        AdapterAlias {
            name: "primary-high-performance",
            backends: wgpu::Backends::PRIMARY,
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
        },
        AdapterAlias {
            name: "any-backend",
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
        },
        AdapterAlias {
            name: "software-fallback",
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: true,
        },
    ]
}

/// Device, queue and configured surface for one window.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub adapter_info: wgpu::AdapterInfo,
    pub alias: &'static str,
}

impl GpuContext {
    /// Try each adapter alias in turn; the first that yields an adapter and a
    /// device wins.
    pub async fn acquire<W>(target: W, width: u32, height: u32) -> Result<Self, GpuError>
    where
        W: Into<wgpu::SurfaceTarget<'static>> + Clone,
    {
        for alias in adapter_aliases() {
            match Self::try_alias(&alias, target.clone(), width, height).await {
                Ok(context) => {
                    log::info!(
                        "✓ Using GPU: {} ({:?}) via {}",
                        context.adapter_info.name,
                        context.adapter_info.backend,
                        alias.name
                    );
                    return Ok(context);
                }
                Err(e) => log::debug!("Adapter alias {} unavailable: {}", alias.name, e),
            }
        }

        Err(GpuError::NoAdapter)
    }

    async fn try_alias<W>(
        alias: &AdapterAlias,
        target: W,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError>
    where
        W: Into<wgpu::SurfaceTarget<'static>>,
    {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: alias.backends,
            ..Default::default()
        });

        let surface = instance.create_surface(target)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: alias.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: alias.force_fallback_adapter,
            })
            .await
            .map_err(|e| {
                log::debug!("request_adapter failed for {}: {}", alias.name, e);
                GpuError::NoAdapter
            })?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format =
            pick_surface_format(&surface_caps.formats).ok_or(GpuError::NoAdapter)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            adapter_info: adapter.get_info(),
            alias: alias.name,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

/// Prefer a non-sRGB format: colors are written to the surface as given, with
/// no gamma encoding and alpha blending in the same space.
pub fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_end_with_software_fallback() {
        let aliases = adapter_aliases();
        assert_eq!(aliases[0].name, "primary-high-performance");
        assert!(!aliases[0].force_fallback_adapter);
        assert!(aliases[2].force_fallback_adapter);
        assert!(aliases.iter().all(|a| !a.backends.is_empty()));
    }

    #[test]
    fn test_surface_format_avoids_srgb() {
        use wgpu::TextureFormat;

        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(pick_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));

        let only_srgb = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            pick_surface_format(&only_srgb),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(pick_surface_format(&[]), None);
    }
}
