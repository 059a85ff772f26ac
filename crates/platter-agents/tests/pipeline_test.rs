// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use platter_agents::{ItemState, PipelineAgent, PipelineConfig, PipelineReport, SourceKind};
use platter_core::{
    ArtifactStore, AssetIdentifier, CatalogRegistry, Manifest, PipelineError, PixelSize,
    ScaleVariant,
};
use platter_lanes::{
    BitmapTypeface, FileSystemStore, FontChain, ImageDecodeLane, PlaceholderRenderer,
    VariantResolver,
};
use platter_telemetry::MetricsRegistry;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

// --- Test Setup: a small catalog and generated photographs ---

/// Three built-in entries shrunk so every pass stays fast.
fn small_catalog() -> Result<Arc<CatalogRegistry>> {
    let builtin = CatalogRegistry::builtin();
    let pick = |id: &str, size: PixelSize| -> Result<_> {
        let mut entry = builtin
            .get(&id.into())
            .cloned()
            .with_context(|| format!("{id} is built in"))?;
        entry.size = size;
        Ok(entry)
    };
    let entries = vec![
        pick("greek_salad", PixelSize::new(30, 20))?,
        pick("tuna_steak", PixelSize::new(30, 20))?,
        pick("protein_rich", PixelSize::new(36, 36))?,
    ];
    Ok(Arc::new(CatalogRegistry::new(entries)?))
}

fn config(output: &Path) -> PipelineConfig {
    PipelineConfig::new(output).with_fonts(FontChain::bitmap_only())
}

fn agent(catalog: Arc<CatalogRegistry>, config: PipelineConfig) -> Result<PipelineAgent> {
    PipelineAgent::new(catalog, config, Arc::new(MetricsRegistry::new()))
}

fn write_jpeg(path: &Path, width: u32, height: u32) -> Result<()> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 90])
    });
    img.save_with_format(path, ImageFormat::Jpeg)?;
    Ok(())
}

fn read_manifest(root: &Path, group: &str, id: &str) -> Result<Manifest> {
    let path = root
        .join(group)
        .join(format!("{id}.imageset"))
        .join("Contents.json");
    let json = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    Ok(serde_json::from_str(&json)?)
}

fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path.strip_prefix(root).unwrap_or(&path).to_path_buf());
            }
        }
    }
    files.sort();
    files
}

fn states(report: &PipelineReport) -> Vec<(String, ItemState)> {
    report
        .outcomes
        .iter()
        .map(|o| (o.label(), o.state))
        .collect()
}

/// Stores through the filesystem but refuses any path containing `needle`.
struct FailingStore {
    inner: FileSystemStore,
    needle: &'static str,
}

impl ArtifactStore for FailingStore {
    fn write(&self, relative_path: &Path, bytes: &[u8]) -> io::Result<()> {
        if relative_path.to_string_lossy().contains(self.needle) {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.inner.write(relative_path, bytes)
    }
}
// ---

#[test]
fn test_greek_salad_photo_gets_full_variant_set() -> Result<()> {
    // --- ARRANGE ---
    let input = tempdir()?;
    let output = tempdir()?;
    let photo = input.path().join("Greek_Salad.JPG");
    write_jpeg(&photo, 120, 90)?;
    let catalog = small_catalog()?;

    // --- ACT ---
    let report = agent(catalog.clone(), config(output.path()))?.run(&[photo]);

    // --- ASSERT ---
    let outcome = report
        .written_for(&"greek_salad".into())
        .context("greek_salad should be written")?;
    assert_eq!(outcome.source, Some(SourceKind::Photograph));

    let manifest = read_manifest(output.path(), "FeaturedMeals", "greek_salad")?;
    assert_eq!(
        manifest.scales(),
        vec![ScaleVariant::X1, ScaleVariant::X2, ScaleVariant::X3]
    );
    let entry = catalog
        .get(&"greek_salad".into())
        .context("greek_salad is in the catalog")?;
    for image in &manifest.images {
        let file = output
            .path()
            .join("FeaturedMeals/greek_salad.imageset")
            .join(&image.filename);
        let decoded = image::open(&file)?;
        let expected = entry.size.scaled(image.scale);
        assert_eq!((decoded.width(), decoded.height()), (expected.width, expected.height));
    }
    assert!(report.is_success());
    Ok(())
}

#[test]
fn test_banana_split_is_unmatched_with_guidance() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;
    let photo = input.path().join("banana_split.jpg");
    write_jpeg(&photo, 10, 10)?;

    let config = config(output.path()).with_synthesize_missing(false);
    let report = agent(Arc::new(CatalogRegistry::builtin()), config)?.run(&[photo.clone()]);

    assert_eq!(report.unmatched(), 1);
    assert_eq!(report.unmatched_files(), [photo.as_path()]);
    assert!(report.guidance.iter().any(|id| id.as_str() == "greek_salad"));
    match &report.outcomes[0].error {
        Some(PipelineError::NoMatch { normalized, .. }) => assert_eq!(normalized, "banana_split"),
        other => panic!("expected NoMatch, got {other:?}"),
    }

    assert_eq!(report.written(), 0);
    assert_eq!(report.unresolved(), 33);
    assert!(files_under(output.path()).is_empty());
    Ok(())
}

#[test]
fn test_protein_rich_without_source_gets_single_placeholder() -> Result<()> {
    let output = tempdir()?;
    let report = agent(small_catalog()?, config(output.path()))?.run(&[]);

    let outcome = report
        .written_for(&"protein_rich".into())
        .context("protein_rich should be synthesized")?;
    assert_eq!(outcome.source, Some(SourceKind::Placeholder));

    let manifest = read_manifest(output.path(), "Categories", "protein_rich")?;
    assert_eq!(manifest.scales(), vec![ScaleVariant::X1]);
    assert_eq!(manifest.images[0].filename, "protein_rich.png");

    let art = image::open(output.path().join("Categories/protein_rich.imageset/protein_rich.png"))?;
    assert_eq!((art.width(), art.height()), (36, 36));
    assert_eq!(report.placeholders(), 3);
    Ok(())
}

#[test]
fn test_undecodable_source_falls_back_to_placeholder() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;
    let broken = input.path().join("tuna_steak.jpg");
    fs::write(&broken, b"not really a jpeg")?;

    let report = agent(small_catalog()?, config(output.path()))?.run(&[broken]);

    let outcome = report
        .written_for(&"tuna_steak".into())
        .context("tuna_steak should still be written")?;
    assert!(matches!(outcome.source, Some(SourceKind::Fallback { .. })));
    assert_eq!(outcome.input.as_deref().and_then(Path::file_name), Some(OsStr::new("tuna_steak.jpg")));
    Ok(())
}

#[test]
fn test_undecodable_source_without_synthesis_is_unresolved() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;
    let broken = input.path().join("tuna_steak.jpg");
    fs::write(&broken, b"garbage")?;

    let config = config(output.path()).with_synthesize_missing(false);
    let report = agent(small_catalog()?, config)?.run(&[broken]);

    let tuna: AssetIdentifier = "tuna_steak".into();
    assert!(report.unresolved_identifiers().contains(&&tuna));
    assert!(matches!(
        report.outcomes[0].error,
        Some(PipelineError::SourceRead { .. })
    ));
    assert!(files_under(output.path()).is_empty());
    Ok(())
}

#[test]
fn test_second_file_for_an_identifier_is_a_duplicate() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;
    let first = input.path().join("Greek Salad.jpg");
    let second = input.path().join("greek_salad.jpg");
    write_jpeg(&first, 40, 40)?;
    write_jpeg(&second, 40, 40)?;

    let report = agent(small_catalog()?, config(output.path()))?.run(&[second.clone(), first.clone()]);

    let (failed, error) = report.failures().next().context("one item should fail")?;
    assert_eq!(failed.input.as_deref(), Some(second.as_path()));
    match error {
        PipelineError::DuplicateSource { chosen, .. } => assert_eq!(chosen, &first),
        other => panic!("expected DuplicateSource, got {other}"),
    }
    assert!(report.written_for(&"greek_salad".into()).is_some());
    assert!(!report.is_success());
    Ok(())
}

#[test]
fn test_decodable_duplicate_wins_over_unreadable_first_file() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;
    let broken = input.path().join("Greek Salad.jpg");
    let photo = input.path().join("greek_salad.jpg");
    fs::write(&broken, b"truncated upload")?;
    write_jpeg(&photo, 40, 40)?;

    let report = agent(small_catalog()?, config(output.path()))?.run(&[photo.clone(), broken.clone()]);

    let written = report
        .written_for(&"greek_salad".into())
        .context("greek_salad should be written")?;
    assert_eq!(written.input.as_deref(), Some(photo.as_path()));
    assert_eq!(written.source, Some(SourceKind::Photograph));

    let (failed, error) = report.failures().next().context("the unreadable file should fail")?;
    assert_eq!(failed.input.as_deref(), Some(broken.as_path()));
    match error {
        PipelineError::DuplicateSource { chosen, .. } => assert_eq!(chosen, &photo),
        other => panic!("expected DuplicateSource, got {other}"),
    }
    Ok(())
}

#[test]
fn test_category_photo_is_captioned() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;
    let photo = input.path().join("Protein Rich.jpg");
    write_jpeg(&photo, 72, 72)?;
    let catalog = small_catalog()?;

    let report = agent(catalog.clone(), config(output.path()))?.run(&[photo.clone()]);
    let outcome = report
        .written_for(&"protein_rich".into())
        .context("protein_rich should be written")?;
    assert_eq!(outcome.source, Some(SourceKind::Photograph));

    let entry = catalog.get(&"protein_rich".into()).context("protein_rich is in the catalog")?;
    assert!(entry.caption);
    let source = ImageDecodeLane.load_path(&photo)?;
    let resolver = VariantResolver::default();
    let renderer = PlaceholderRenderer::with_typeface(Box::new(BitmapTypeface));
    let plain = resolver.derive(entry, &source)?;
    let captioned = renderer.caption(entry, &resolver.fit(entry, &source)?)?;
    let expected = resolver.derive(entry, &captioned)?;

    let written = fs::read(
        output
            .path()
            .join("Categories/protein_rich.imageset/protein_rich.png"),
    )?;
    assert_eq!(written, expected[0].bytes);
    assert_ne!(written, plain[0].bytes);
    Ok(())
}

#[test]
fn test_rerun_is_byte_identical() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;
    let photo = input.path().join("greek_salad.jpg");
    write_jpeg(&photo, 64, 48)?;
    let agent = agent(small_catalog()?, config(output.path()))?;

    agent.run(&[photo.clone()]);
    let first: Vec<_> = files_under(output.path())
        .into_iter()
        .map(|p| fs::read(output.path().join(&p)).map(|bytes| (p, bytes)))
        .collect::<io::Result<_>>()?;

    agent.run(&[photo]);
    let second: Vec<_> = files_under(output.path())
        .into_iter()
        .map(|p| fs::read(output.path().join(&p)).map(|bytes| (p, bytes)))
        .collect::<io::Result<_>>()?;

    assert!(!first.is_empty());
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_submission_order_does_not_matter() -> Result<()> {
    let input = tempdir()?;
    let out_a = tempdir()?;
    let out_b = tempdir()?;
    let mut photos = Vec::new();
    for name in ["tuna_steak.jpg", "Greek_Salad.JPG", "banana_split.jpg"] {
        let path = input.path().join(name);
        write_jpeg(&path, 50, 30)?;
        photos.push(path);
    }
    let mut reversed = photos.clone();
    reversed.reverse();

    let report_a = agent(small_catalog()?, config(out_a.path()))?.run(&photos);
    let report_b = agent(small_catalog()?, config(out_b.path()))?.run(&reversed);

    assert_eq!(states(&report_a), states(&report_b));
    assert_eq!(files_under(out_a.path()), files_under(out_b.path()));
    for file in files_under(out_a.path()) {
        assert_eq!(fs::read(out_a.path().join(&file))?, fs::read(out_b.path().join(&file))?);
    }
    Ok(())
}

#[test]
fn test_write_failure_leaves_no_manifest() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;
    let photo = input.path().join("greek_salad.jpg");
    write_jpeg(&photo, 64, 48)?;

    let store = FailingStore {
        inner: FileSystemStore::new(output.path()),
        needle: "greek_salad@2x",
    };
    let report = agent(small_catalog()?, config(output.path()))?
        .with_store(store)
        .run(&[photo]);

    let (failed, error) = report.failures().next().context("greek_salad should fail")?;
    assert_eq!(failed.identifier, Some("greek_salad".into()));
    assert!(matches!(error, PipelineError::Write { .. }));
    assert!(!output
        .path()
        .join("FeaturedMeals/greek_salad.imageset/Contents.json")
        .exists());

    // The rest of the batch is unaffected.
    assert!(report.written_for(&"tuna_steak".into()).is_some());
    assert!(report.written_for(&"protein_rich".into()).is_some());
    assert_eq!(report.failed(), 1);
    Ok(())
}

#[test]
fn test_counters_follow_the_report() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;
    let photo = input.path().join("banana_split.jpg");
    write_jpeg(&photo, 8, 8)?;

    let registry = Arc::new(MetricsRegistry::new());
    let agent = PipelineAgent::new(small_catalog()?, config(output.path()), registry.clone())?;
    let report = agent.run(&[photo]);

    let counter = |name: &str| {
        registry
            .snapshot()
            .into_iter()
            .find(|m| m.id.to_string() == format!("pipeline:{name}"))
            .and_then(|m| m.value.as_counter())
    };
    assert_eq!(counter("written"), Some(report.written() as u64));
    assert_eq!(counter("unmatched"), Some(1));
    assert_eq!(counter("placeholders"), Some(3));
    assert_eq!(counter("failed"), Some(0));
    Ok(())
}
