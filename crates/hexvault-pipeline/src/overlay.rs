//! Overlay - patch byte ranges of a base source with secondary sources

use hexvault_core::security::{checked_end, u64_to_i64, u64_to_usize};
use hexvault_core::{ByteWindow, Error, Result, SharedSource, Source};

/// A secondary source covering `[offset, offset + length)` of the base
#[derive(Clone)]
pub struct OverlayRegion {
    source: SharedSource,
    window: ByteWindow,
}

impl OverlayRegion {
    /// The base range this region replaces
    pub fn window(&self) -> ByteWindow {
        self.window
    }
}

/// Builder for [`OverlaySource`]
///
/// Regions may be added in any order; all validation happens in
/// [`OverlaySourceBuilder::build`].
#[derive(Default)]
pub struct OverlaySourceBuilder {
    base: Option<SharedSource>,
    regions: Vec<(SharedSource, i64, u64)>,
}

impl OverlaySourceBuilder {
    /// Set the base source
    pub fn base(mut self, base: SharedSource) -> Self {
        self.base = Some(base);
        self
    }

    /// Replace `length` base bytes at `offset` with the start of `source`
    pub fn overlay(mut self, source: SharedSource, offset: i64, length: u64) -> Self {
        self.regions.push((source, offset, length));
        self
    }

    /// Validate the layout and build the overlay
    ///
    /// # Errors
    ///
    /// - [`Error::MissingSource`] if no base was set
    /// - [`Error::InvalidOverlayRegion`] if a region is empty, starts before
    ///   zero, extends past the base, is longer than its secondary source,
    ///   or overlaps another region
    pub fn build(self) -> Result<OverlaySource> {
        let base = self
            .base
            .ok_or_else(|| Error::missing_source("overlay built without a base source"))?;
        let base_length = base.length();

        let mut regions = Vec::with_capacity(self.regions.len());
        for (source, offset, length) in self.regions {
            let region = validate_region(source, offset, length, base_length).map_err(|e| {
                tracing::warn!("Rejected overlay region: {}", e);
                e
            })?;
            regions.push(region);
        }

        regions.sort_by_key(|r| r.window.offset);
        for pair in regions.windows(2) {
            if pair[0].window.overlaps(&pair[1].window) {
                let err = Error::invalid_overlay_region(format!(
                    "regions {} and {} overlap",
                    pair[0].window, pair[1].window
                ));
                tracing::warn!("Rejected overlay region: {}", err);
                return Err(err);
            }
        }

        tracing::debug!(
            "Overlay with {} region(s) over {} byte base",
            regions.len(),
            base_length
        );
        Ok(OverlaySource { base, regions })
    }
}

fn validate_region(
    source: SharedSource,
    offset: i64,
    length: u64,
    base_length: u64,
) -> Result<OverlayRegion> {
    if offset < 0 {
        return Err(Error::invalid_overlay_region(format!(
            "region offset {} is negative",
            offset
        )));
    }
    if length == 0 {
        return Err(Error::invalid_overlay_region(format!(
            "region at 0x{:X} is empty",
            offset
        )));
    }

    let window = ByteWindow::new(offset as u64, length);
    let end = checked_end(window.offset, length, "overlay region")
        .map_err(|e| Error::invalid_overlay_region(e.to_string()))?;
    if end > base_length {
        return Err(Error::invalid_overlay_region(format!(
            "region {} extends past base length {}",
            window, base_length
        )));
    }
    if source.length() < length {
        return Err(Error::invalid_overlay_region(format!(
            "region {} needs {} bytes but its source holds {}",
            window,
            length,
            source.length()
        )));
    }

    Ok(OverlayRegion { source, window })
}

/// A [`Source`] that reads a base with some ranges patched over
///
/// Bytes inside a region come from that region's secondary source (byte 0 of
/// the secondary lines up with the region start); all other bytes come from
/// the base. Regions never overlap.
///
/// # Example
///
/// ```rust
/// use hexvault_core::{SharedSource, Source};
/// use hexvault_pipeline::{MemorySource, OverlaySource};
/// use std::rc::Rc;
///
/// let base: SharedSource = Rc::new(MemorySource::new(vec![0u8; 8]));
/// let patch: SharedSource = Rc::new(MemorySource::new(vec![0xFF; 2]));
///
/// let overlay = OverlaySource::builder()
///     .base(base)
///     .overlay(patch, 3, 2)
///     .build()
///     .unwrap();
/// assert_eq!(overlay.pull(2, 4).unwrap(), vec![0, 0xFF, 0xFF, 0]);
/// ```
pub struct OverlaySource {
    base: SharedSource,
    regions: Vec<OverlayRegion>,
}

impl OverlaySource {
    pub fn builder() -> OverlaySourceBuilder {
        OverlaySourceBuilder::default()
    }

    /// Regions ordered by offset
    pub fn regions(&self) -> &[OverlayRegion] {
        &self.regions
    }
}

/// Append up to `length` bytes of `source` at `offset`; false on a short pull
fn append(out: &mut Vec<u8>, source: &SharedSource, offset: u64, length: u64) -> Result<bool> {
    let data = source.pull(u64_to_i64(offset, "overlay")?, u64_to_usize(length, "overlay")?)?;
    let complete = data.len() as u64 == length;
    out.extend_from_slice(&data);
    Ok(complete)
}

impl Source for OverlaySource {
    fn length(&self) -> u64 {
        self.base.length()
    }

    fn pull(&self, offset: i64, requested: usize) -> Result<Vec<u8>> {
        let request = match ByteWindow::clip(self.length(), offset, requested) {
            Some(request) => request,
            None => return Ok(Vec::new()),
        };

        let mut out = Vec::with_capacity(request.length as usize);
        let mut cursor = request.offset;

        for region in &self.regions {
            let hit = match region.window.intersect(&request) {
                Some(hit) => hit,
                None => continue,
            };

            if hit.offset > cursor && !append(&mut out, &self.base, cursor, hit.offset - cursor)? {
                return Ok(out);
            }
            let local = hit.offset - region.window.offset;
            if !append(&mut out, &region.source, local, hit.length)? {
                return Ok(out);
            }
            cursor = hit.end();
        }

        if cursor < request.end() {
            append(&mut out, &self.base, cursor, request.end() - cursor)?;
        }
        Ok(out)
    }
}
