//! Minimal MP4 duration probe.
//!
//! Walks the top-level box list for `moov`, then `mvhd` inside it, and
//! computes duration as mvhd duration / timescale. Enough for the upload
//! path; anything unparseable yields None rather than an error.

/// Scan a box list for `name` and return its payload.
fn find_box<'a>(mut data: &'a [u8], name: &[u8; 4]) -> Option<&'a [u8]> {
    while data.len() >= 8 {
        let size32 = u32::from_be_bytes(data[0..4].try_into().ok()?) as u64;
        let box_type = &data[4..8];

        let (header_len, box_size) = match size32 {
            // 64-bit largesize follows the type
            1 => {
                if data.len() < 16 {
                    return None;
                }
                (16usize, u64::from_be_bytes(data[8..16].try_into().ok()?))
            }
            // box extends to end of data
            0 => (8usize, data.len() as u64),
            _ => (8usize, size32),
        };

        if box_size < header_len as u64 || box_size > data.len() as u64 {
            return None;
        }

        if box_type == name {
            return Some(&data[header_len..box_size as usize]);
        }
        data = &data[box_size as usize..];
    }
    None
}

/// Duration in seconds, or None when the payload is not a parseable MP4.
pub fn mp4_duration(data: &[u8]) -> Option<f64> {
    let moov = find_box(data, b"moov")?;
    let mvhd = find_box(moov, b"mvhd")?;

    let version = *mvhd.first()?;
    let (timescale, duration) = match version {
        0 if mvhd.len() >= 20 => (
            u64::from(u32::from_be_bytes(mvhd[12..16].try_into().ok()?)),
            u64::from(u32::from_be_bytes(mvhd[16..20].try_into().ok()?)),
        ),
        1 if mvhd.len() >= 32 => (
            u64::from(u32::from_be_bytes(mvhd[20..24].try_into().ok()?)),
            u64::from_be_bytes(mvhd[24..32].try_into().ok()?),
        ),
        _ => return None,
    };

    if timescale == 0 {
        return None;
    }
    Some(duration as f64 / timescale as f64)
}
