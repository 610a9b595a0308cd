// SVG2Icon - core/container.rs
//
// Multi-resolution icon containers (ICO, ICNS) assembled in memory from
// already-encoded PNG layers.

use crate::util::constants;
use icns::{IconFamily, IconType};
use std::io::{self, Cursor};

/// One PNG-encoded layer destined for a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLayer {
    /// Nominal pixel size the layer was rendered at.
    pub size: u32,

    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

/// Container file formats the packager can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// Windows icon (also used for favicons).
    Ico,
    /// macOS icon family.
    Icns,
}

impl ContainerFormat {
    /// Short lowercase tag, as used in manifest `type` fields.
    pub fn tag(&self) -> &'static str {
        match self {
            ContainerFormat::Ico => "ico",
            ContainerFormat::Icns => "icns",
        }
    }
}

/// A container to produce: format, output file name, and the layer sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerJob {
    pub format: ContainerFormat,
    pub file_name: &'static str,
    pub sizes: &'static [u32],
}

/// `icon.ico` for desktop targets.
pub const ICO_JOB: ContainerJob = ContainerJob {
    format: ContainerFormat::Ico,
    file_name: constants::ICO_FILE_NAME,
    sizes: constants::ICO_SIZES,
};

/// `icon.icns` for desktop targets.
pub const ICNS_JOB: ContainerJob = ContainerJob {
    format: ContainerFormat::Icns,
    file_name: constants::ICNS_FILE_NAME,
    sizes: constants::ICNS_SIZES,
};

/// `favicon.ico` for the web target.
pub const FAVICON_JOB: ContainerJob = ContainerJob {
    format: ContainerFormat::Ico,
    file_name: constants::FAVICON_FILE_NAME,
    sizes: constants::FAVICON_SIZES,
};

/// Largest edge an ICO directory entry can describe.
const ICO_MAX_EDGE: u32 = 256;

/// Encode `layers` into a single ICO file.
///
/// Layers above 256 px are skipped; an input with no usable layers is an
/// `InvalidInput` error.
pub fn encode_ico(layers: &[IconLayer]) -> io::Result<Vec<u8>> {
    let mut dir = ico::IconDir::new(ico::ResourceType::Icon);

    for layer in layers {
        if layer.size > ICO_MAX_EDGE {
            tracing::debug!(size = layer.size, "Skipping ICO layer above 256px");
            continue;
        }
        let image = ico::IconImage::read_png(Cursor::new(&layer.png))?;
        if image.width() > ICO_MAX_EDGE || image.height() > ICO_MAX_EDGE {
            continue;
        }
        dir.add_entry(ico::IconDirEntry::encode(&image)?);
    }

    if dir.entries().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no layers fit in an ICO container",
        ));
    }

    let mut out = Vec::new();
    dir.write(&mut out)?;
    Ok(out)
}

/// ICNS element types a layer of the given size fills.
fn icns_types_for(size: u32) -> &'static [IconType] {
    match size {
        16 => &[IconType::RGBA32_16x16],
        32 => &[IconType::RGBA32_32x32, IconType::RGBA32_16x16_2x],
        64 => &[IconType::RGBA32_32x32_2x],
        128 => &[IconType::RGBA32_128x128],
        256 => &[IconType::RGBA32_256x256, IconType::RGBA32_128x128_2x],
        512 => &[IconType::RGBA32_512x512, IconType::RGBA32_256x256_2x],
        1024 => &[IconType::RGBA32_512x512_2x],
        _ => &[],
    }
}

/// Encode `layers` into a single ICNS icon family.
///
/// Sizes without an ICNS slot are skipped. Non-square layers fail with the
/// error reported by the `icns` crate.
pub fn encode_icns(layers: &[IconLayer]) -> io::Result<Vec<u8>> {
    let mut family = IconFamily::new();

    for layer in layers {
        let types = icns_types_for(layer.size);
        if types.is_empty() {
            tracing::debug!(size = layer.size, "No ICNS slot for layer size");
            continue;
        }
        let image = icns::Image::read_png(Cursor::new(&layer.png))?;
        for icon_type in types {
            family.add_icon_with_type(&image, *icon_type)?;
        }
    }

    if family.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no layers fit in an ICNS container",
        ));
    }

    let mut out = Vec::new();
    family.write(&mut out)?;
    Ok(out)
}

/// Encode `layers` in the given container format.
pub fn encode(format: ContainerFormat, layers: &[IconLayer]) -> io::Result<Vec<u8>> {
    match format {
        ContainerFormat::Ico => encode_ico(layers),
        ContainerFormat::Icns => encode_icns(layers),
    }
}
