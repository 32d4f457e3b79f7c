use std::collections::hash_map::{Entry, HashMap};
use std::rc::Rc;

use crate::bitmap::Bitmap;
use crate::error::Result;
use crate::resize::Algorithm;

/// The input a cache's contents were derived from.
#[derive(Clone, Debug, Eq, PartialEq)]
struct CacheInput {
    bytes: Vec<u8>,
    algorithm: Algorithm,
    colors: u32,
}

/// Memoizes the bitmaps and PNG files derived from one input image, so that
/// several icon entries (or several containers) of the same size share a
/// single resample and a single PNG encode.
///
/// Entries are keyed by their pixel dimensions.  Whenever a different input
/// (or a different algorithm or color count) is presented, everything is
/// dropped.  Cached values are handed out behind `Rc` and never mutated.
#[derive(Debug, Default)]
pub struct ImageCache {
    input: Option<CacheInput>,
    source: Option<Rc<Bitmap>>,
    resampled: HashMap<(u32, u32), Rc<Bitmap>>,
    encoded: HashMap<(u32, u32), Rc<[u8]>>,
}

impl ImageCache {
    /// Creates a new, empty cache.
    pub fn new() -> ImageCache {
        ImageCache::default()
    }

    /// Records `input` as the current input.  If it differs byte-for-byte
    /// from the previous input, or was produced with other settings, the
    /// cache is cleared first.  Returns true if the cache was cleared.
    pub fn use_input(&mut self,
                     input: &[u8],
                     algorithm: Algorithm,
                     colors: u32)
                     -> bool {
        if let Some(ref current) = self.input {
            if current.bytes == input && current.algorithm == algorithm &&
               current.colors == colors {
                return false;
            }
        }
        self.clear();
        self.input = Some(CacheInput {
            bytes: input.to_vec(),
            algorithm: algorithm,
            colors: colors,
        });
        true
    }

    /// Empties the cache and forgets the current input.
    pub fn clear(&mut self) {
        self.input = None;
        self.source = None;
        self.resampled.clear();
        self.encoded.clear();
    }

    /// Returns the decoded source image, computing it on a miss.
    pub fn source<F>(&mut self, compute: F) -> Result<Rc<Bitmap>>
        where F: FnOnce() -> Result<Bitmap>
    {
        if let Some(ref source) = self.source {
            return Ok(Rc::clone(source));
        }
        let source = Rc::new(compute()?);
        self.source = Some(Rc::clone(&source));
        Ok(source)
    }

    /// Returns the resampled bitmap of the given size, computing it on a
    /// miss.
    pub fn resampled<F>(&mut self,
                        width: u32,
                        height: u32,
                        compute: F)
                        -> Result<Rc<Bitmap>>
        where F: FnOnce() -> Result<Bitmap>
    {
        match self.resampled.entry((width, height)) {
            Entry::Occupied(entry) => Ok(Rc::clone(entry.get())),
            Entry::Vacant(entry) => {
                Ok(Rc::clone(entry.insert(Rc::new(compute()?))))
            }
        }
    }

    /// Returns the PNG file for the given size, computing it on a miss.
    pub fn encoded<F>(&mut self,
                      width: u32,
                      height: u32,
                      compute: F)
                      -> Result<Rc<[u8]>>
        where F: FnOnce() -> Result<Vec<u8>>
    {
        match self.encoded.entry((width, height)) {
            Entry::Occupied(entry) => Ok(Rc::clone(entry.get())),
            Entry::Vacant(entry) => {
                Ok(Rc::clone(entry.insert(Rc::from(compute()?))))
            }
        }
    }

    /// Returns true if nothing at all is cached.
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.source.is_none() &&
        self.resampled.is_empty() && self.encoded.is_empty()
    }

    /// Returns the number of cached resampled bitmaps.
    pub fn resampled_len(&self) -> usize {
        self.resampled.len()
    }

    /// Returns the number of cached PNG files.
    pub fn encoded_len(&self) -> usize {
        self.encoded.len()
    }
}
