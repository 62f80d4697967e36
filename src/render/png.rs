use crate::Result;
use camino::Utf8Path;
use ohno::{IntoAppError, bail};
use std::fs::File;
use std::io::Read;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Signature (8) + IHDR chunk length (4) + chunk type (4) + width (4) + height (4)
const PROBE_LEN: usize = 24;

/// Read a PNG file's pixel dimensions from its IHDR chunk.
///
/// IHDR is required to be the first chunk, so the probe only touches the
/// first 24 bytes of the file.
pub fn probe_dimensions(path: &Utf8Path) -> Result<(u32, u32)> {
    let mut header = [0u8; PROBE_LEN];
    File::open(path)
        .into_app_err_with(|| format!("unable to open map image: {path}"))?
        .read_exact(&mut header)
        .into_app_err_with(|| format!("reading PNG header from {path}"))?;

    if header[0..8] != PNG_SIGNATURE {
        bail!("{path} is not a PNG file (bad signature)");
    }
    if &header[12..16] != b"IHDR" {
        bail!("{path}: first PNG chunk is not IHDR");
    }

    let width = u32::from_be_bytes(header[16..20].try_into()?);
    let height = u32::from_be_bytes(header[20..24].try_into()?);
    Ok((width, height))
}
