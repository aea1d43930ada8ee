use std::fs::File;
use std::io::Write;

use anyhow::{anyhow, Context, Result};
use clap::{App, Arg};
use log::{debug, info, warn};

use kmsgrab::capture::{self, ActivePlane};
use kmsgrab::device::{Device, DeviceConfig};
use kmsgrab::pixel;

/// Encodes the first memory plane of an active plane as PNG, using the
/// framebuffer's declared geometry. Only packed-RGB formats with a known
/// depth get here; the caller filters the rest out.
fn save_png(prefix: &str, plane: &ActivePlane, data: &[u8]) -> Result<()> {
    let fb = &plane.framebuffer;
    let bits_per_pixel = fb
        .format
        .bits_per_pixel()
        .ok_or_else(|| anyhow!("format {} is not a packed RGB format", fb.format))?;

    let pixel_count = fb.width as usize * fb.height as usize;
    let samples = pixel::to_rgb24(data, pixel_count, bits_per_pixel)?;
    let rgb: Vec<u8> = samples.iter().flat_map(|px| [px.r, px.g, px.b]).collect();

    let image = image::RgbImage::from_raw(fb.width, fb.height, rgb)
        .ok_or_else(|| anyhow!("converted data does not cover {}x{}", fb.width, fb.height))?;

    let path = format!("{}-{}.png", prefix, plane.index);
    image
        .save(&path)
        .with_context(|| format!("cannot write {}", path))?;
    info!("wrote {}", path);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("kmsgrab")
        .about("Dumps the currently scanned-out framebuffers of a KMS/DRM device to disk")
        .arg(
            Arg::with_name("output_prefix")
                .required(true)
                .help("Prefix of the per-plane output files"),
        )
        .arg(
            Arg::with_name("png")
                .long("png")
                .help("Additionally encode packed-RGB planes as PNG"),
        )
        .get_matches();

    let prefix = matches
        .value_of("output_prefix")
        .expect("Output prefix not specified");
    let encode_png = matches.is_present("png");

    let device =
        Device::find_card(&DeviceConfig::new()).context("could not open a KMS/DRM device")?;

    capture::negotiate_client_caps(&device).context("could not negotiate client capabilities")?;

    let planes =
        capture::active_planes(&device).context("could not enumerate the active planes")?;
    if planes.is_empty() {
        warn!("no plane is currently scanning out, nothing to capture");
    }

    for plane in &planes {
        let raw_path = format!("{}-{}.raw", prefix, plane.index);
        let mut raw_file =
            File::create(&raw_path).with_context(|| format!("cannot create {}", raw_path))?;

        let convertible = plane.framebuffer.format.bits_per_pixel().is_some();
        if encode_png && !convertible {
            debug!(
                "plane {} has format {}, raw output only",
                plane.plane_id, plane.framebuffer.format
            );
        }

        // Keep a copy of the first memory plane around if it is going to be
        // encoded once the mapping is gone.
        let mut png_data: Option<Vec<u8>> = None;
        capture::read_plane(&device, &plane.framebuffer, |mapped| {
            raw_file.write_all(mapped.data)?;
            if encode_png && convertible && mapped.index == 0 {
                png_data = Some(mapped.data.to_vec());
            }
            Ok(())
        })
        .with_context(|| format!("cannot capture plane {}", plane.plane_id))?;
        info!("wrote {}", raw_path);

        if let Some(data) = png_data {
            save_png(prefix, plane, &data)
                .with_context(|| format!("cannot encode plane {} as PNG", plane.plane_id))?;
        }
    }

    Ok(())
}
