//! Variant set loading and validation
//!
//! A folder of images becomes a set of V variants judged across L levels.
//! The variant is the base filename (trailing digits and extension
//! stripped); the k-th occurrence of a base name in the listing is that
//! variant's image for level k, which accepts both level-major and
//! variant-major listings. Every variant must appear the same number of
//! times or the whole load fails.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::consts::BACKDROP_DIM;
use crate::reduced_aspect;

/// Why a folder cannot start a session
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("folder contains no files")]
    EmptyFolder,
    #[error("variant counts are inconsistent: {name:?} appears {count} times, expected {expected}")]
    InconsistentVariants {
        name: String,
        count: usize,
        expected: usize,
    },
    #[error("file {path:?} is not a readable image")]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read folder")]
    Io(#[from] io::Error),
}

/// One of the competing options, shown once per level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Display name (base filename)
    pub name: String,
    /// Stable index across the whole session
    pub index: usize,
}

/// File names of one level, in variant order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFiles {
    pub level: usize,
    pub files: Vec<String>,
}

/// A validated grouping: V variants x L levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet {
    pub variants: Vec<Variant>,
    pub levels: Vec<LevelFiles>,
}

impl VariantSet {
    /// Group a listing into variants and levels.
    ///
    /// Pure: no sorting, no I/O. The caller's listing order defines both
    /// the variant order (first appearance) and the level order (occurrence
    /// rank within a variant).
    pub fn from_listing<I>(names: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut variants: Vec<Variant> = Vec::new();
        let mut index_of: HashMap<String, usize> = HashMap::new();
        let mut occurrences: Vec<Vec<String>> = Vec::new();

        for name in names {
            let base = base_name(&name).to_string();
            let index = *index_of.entry(base.clone()).or_insert_with(|| {
                variants.push(Variant {
                    name: base,
                    index: variants.len(),
                });
                occurrences.push(Vec::new());
                variants.len() - 1
            });
            occurrences[index].push(name);
        }
        if variants.is_empty() {
            return Err(LoadError::EmptyFolder);
        }

        let expected = occurrences[0].len();
        for (variant, occ) in variants.iter().zip(&occurrences) {
            if occ.len() != expected {
                return Err(LoadError::InconsistentVariants {
                    name: variant.name.clone(),
                    count: occ.len(),
                    expected,
                });
            }
        }

        let levels = (0..expected)
            .map(|level| LevelFiles {
                level,
                files: occurrences.iter().map(|occ| occ[level].clone()).collect(),
            })
            .collect();
        Ok(Self { variants, levels })
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Variant display names in index order
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.iter().map(|v| v.name.clone()).collect()
    }
}

/// A variant set loaded from disk, with the probe data slot geometry needs
#[derive(Debug, Clone)]
pub struct LoadedSet {
    pub set: VariantSet,
    pub folder: PathBuf,
    /// Pixel size of the first image; every image is displayed stretched
    /// to its aspect
    pub base_size: (u32, u32),
    /// `base_size` reduced by gcd
    pub aspect: (u32, u32),
}

/// Mean color of a level's lead image and its dimmed variant, used to tint
/// the canvas behind the slot column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backdrop {
    pub bright: [u8; 3],
    pub dim: [u8; 3],
}

/// List `folder`, check that every file decodes as an image, and group the
/// listing into a variant set.
pub fn load_folder(folder: &Path) -> Result<LoadedSet, LoadError> {
    let names = list_folder(folder)?;
    if names.is_empty() {
        return Err(LoadError::EmptyFolder);
    }

    let mut base_size = (0, 0);
    for (i, name) in names.iter().enumerate() {
        let path = folder.join(name);
        let dims = image::image_dimensions(&path)
            .map_err(|source| LoadError::InvalidImage { path, source })?;
        if i == 0 {
            base_size = dims;
        }
    }

    let set = VariantSet::from_listing(names)?;
    info!(
        "loaded {} variants x {} levels from {:?}",
        set.variant_count(),
        set.level_count(),
        folder
    );
    Ok(LoadedSet {
        set,
        folder: folder.to_path_buf(),
        base_size,
        aspect: reduced_aspect(base_size.0, base_size.1),
    })
}

/// Sample the mean color of an image and derive the dimmed backdrop tint
pub fn backdrop_colors(path: &Path) -> Result<Backdrop, LoadError> {
    let img = image::open(path)
        .map_err(|source| LoadError::InvalidImage {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    let mut sum = [0u64; 3];
    for pixel in img.pixels() {
        for (acc, channel) in sum.iter_mut().zip(pixel.0) {
            *acc += u64::from(channel);
        }
    }
    let count = u64::from(img.width()) * u64::from(img.height());
    let bright = sum.map(|acc| (acc / count.max(1)) as u8);
    let dim = bright.map(|channel| (f32::from(channel) * BACKDROP_DIM) as u8);
    debug!("backdrop for {:?}: bright {:?} dim {:?}", path, bright, dim);
    Ok(Backdrop { bright, dim })
}

/// Strip the extension and any trailing digits before it:
/// `Sunny12.png` -> `Sunny`
pub fn base_name(filename: &str) -> &str {
    stem(filename).trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Filenames of `folder`, sorted by stem with shorter stems first so
/// numbered levels order naturally (`Sunny2` before `Sunny10`)
fn list_folder(folder: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort_by(|a, b| {
        let (a, b) = (stem(a), stem(b));
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    });
    Ok(names)
}

fn stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_name_strips_digits_and_extension() {
        assert_eq!(base_name("Sunny12.png"), "Sunny");
        assert_eq!(base_name("Night0.jpeg"), "Night");
        assert_eq!(base_name("Rain.png"), "Rain");
        assert_eq!(base_name("archive.v2.png"), "archive.v");
        assert_eq!(base_name("Sunny3"), "Sunny");
    }

    #[test]
    fn test_grouping_variant_major_listing() {
        let set = VariantSet::from_listing(listing(&[
            "Sunny0.png", "Sunny1.png", "Night0.png", "Night1.png", "Rain0.png", "Rain1.png",
        ]))
        .unwrap();
        assert_eq!(set.variant_count(), 3);
        assert_eq!(set.level_count(), 2);
        assert_eq!(set.variant_names(), vec!["Sunny", "Night", "Rain"]);
        assert_eq!(
            set.levels[0].files,
            vec!["Sunny0.png", "Night0.png", "Rain0.png"]
        );
        assert_eq!(
            set.levels[1].files,
            vec!["Sunny1.png", "Night1.png", "Rain1.png"]
        );
    }

    #[test]
    fn test_grouping_level_major_listing() {
        let set = VariantSet::from_listing(listing(&[
            "Sunny0.png", "Night0.png", "Rain0.png", "Sunny1.png", "Night1.png", "Rain1.png",
        ]))
        .unwrap();
        assert_eq!(set.variant_count(), 3);
        assert_eq!(set.level_count(), 2);
        assert_eq!(
            set.levels[1].files,
            vec!["Sunny1.png", "Night1.png", "Rain1.png"]
        );
    }

    #[test]
    fn test_inconsistent_counts_fail_whole_load() {
        let err = VariantSet::from_listing(listing(&[
            "Sunny0.png", "Sunny1.png", "Night0.png",
        ]))
        .unwrap_err();
        match err {
            LoadError::InconsistentVariants {
                name,
                count,
                expected,
            } => {
                assert_eq!(name, "Night");
                assert_eq!(count, 1);
                assert_eq!(expected, 2);
            }
            other => panic!("expected InconsistentVariants, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_listing_fails() {
        assert!(matches!(
            VariantSet::from_listing(Vec::new()),
            Err(LoadError::EmptyFolder)
        ));
    }

    #[test]
    fn test_load_folder_probes_and_groups() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Sunny0.png", "Sunny1.png", "Night0.png", "Night1.png"] {
            let img = image::RgbImage::from_pixel(16, 9, image::Rgb([10, 20, 30]));
            img.save(dir.path().join(name)).unwrap();
        }

        let loaded = load_folder(dir.path()).unwrap();
        assert_eq!(loaded.set.variant_count(), 2);
        assert_eq!(loaded.set.level_count(), 2);
        assert_eq!(loaded.base_size, (16, 9));
        assert_eq!(loaded.aspect, (16, 9));
        // Alphabetical stems: Night before Sunny
        assert_eq!(loaded.set.variant_names(), vec!["Night", "Sunny"]);
    }

    #[test]
    fn test_load_folder_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]));
        img.save(dir.path().join("Sunny0.png")).unwrap();
        std::fs::write(dir.path().join("Sunny1.png"), b"not an image").unwrap();

        assert!(matches!(
            load_folder(dir.path()),
            Err(LoadError::InvalidImage { .. })
        ));
    }

    #[test]
    fn test_listing_sort_orders_numbered_stems() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Sunny10.png", "Sunny2.png", "Sunny1.png"] {
            let img = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]));
            img.save(dir.path().join(name)).unwrap();
        }

        let loaded = load_folder(dir.path()).unwrap();
        assert_eq!(loaded.set.level_count(), 3);
        assert_eq!(loaded.set.levels[0].files, vec!["Sunny1.png"]);
        assert_eq!(loaded.set.levels[2].files, vec!["Sunny10.png"]);
    }

    #[test]
    fn test_backdrop_colors_mean_and_dim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lead.png");
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([100, 200, 40]));
        img.save(&path).unwrap();

        let backdrop = backdrop_colors(&path).unwrap();
        assert_eq!(backdrop.bright, [100, 200, 40]);
        assert_eq!(backdrop.dim, [75, 150, 30]);
    }
}
