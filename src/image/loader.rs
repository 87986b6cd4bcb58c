//! Slide image loading and caching.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use image::DynamicImage;

/// Decoded images kept around so re-materializing a slide after a resize
/// does not hit the disk again.
const CACHE_CAPACITY: usize = 50;

/// Loads slide images relative to the deck file, with a small LRU cache.
#[derive(Debug, Default)]
pub struct SlideImageLoader {
    base_dir: PathBuf,
    entries: HashMap<PathBuf, DynamicImage>,
    order: VecDeque<PathBuf>,
}

impl SlideImageLoader {
    /// Create a loader resolving relative paths against `base_dir`.
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// The directory relative image paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load a slide image, using the cache if possible. Returns `None`
    /// when the file is missing or undecodable; the slide then renders as
    /// a caption-only card.
    pub fn load(&mut self, image_path: &str) -> Option<DynamicImage> {
        let full_path = self.resolve_path(image_path);

        if let Some(img) = self.entries.get(&full_path) {
            return Some(img.clone());
        }

        let img = image::open(&full_path)
            .inspect_err(|err| {
                crate::perf::log_event(
                    "image.load.error",
                    format!("path={} err={err}", full_path.display()),
                );
            })
            .ok()?;
        self.insert(full_path, img.clone());
        Some(img)
    }

    /// Drop all cached images (deck reload with new content).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, path: PathBuf, image: DynamicImage) {
        if self.entries.insert(path.clone(), image).is_none() {
            self.order.push_back(path);
        }
        while self.entries.len() > CACHE_CAPACITY {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    fn resolve_path(&self, image_path: &str) -> PathBuf {
        let path = Path::new(image_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_loader_is_empty() {
        let loader = SlideImageLoader::new(PathBuf::from("/deck"));
        assert!(loader.is_empty());
        assert_eq!(loader.len(), 0);
    }

    #[test]
    fn test_resolve_path_absolute() {
        let loader = SlideImageLoader::new(PathBuf::from("/deck"));
        let resolved = loader.resolve_path("/absolute/slide.png");
        assert_eq!(resolved, PathBuf::from("/absolute/slide.png"));
    }

    #[test]
    fn test_resolve_path_relative_to_deck_dir() {
        let loader = SlideImageLoader::new(PathBuf::from("/deck"));
        let resolved = loader.resolve_path("img/slide.png");
        assert_eq!(resolved, PathBuf::from("/deck/img/slide.png"));
    }

    #[test]
    fn test_missing_image_returns_none() {
        let mut loader = SlideImageLoader::new(PathBuf::from("/nonexistent"));
        assert!(loader.load("missing.png").is_none());
        assert!(loader.is_empty());
    }

    #[test]
    fn test_cache_evicts_oldest_entry() {
        let mut loader = SlideImageLoader::new(PathBuf::from("/deck"));
        for i in 0..=CACHE_CAPACITY {
            let img = DynamicImage::new_rgba8(1, 1);
            loader.insert(PathBuf::from(format!("/deck/{i}.png")), img);
        }
        assert_eq!(loader.len(), CACHE_CAPACITY);
        assert!(!loader.entries.contains_key(Path::new("/deck/0.png")));
    }
}
