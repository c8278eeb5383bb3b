use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use image_optimizer_lib::core::{EncodedImage, OptimizerConfig, RawFile};
use image_optimizer_lib::{
    AppState, BatchExecutor, Encoder, JpegReencoder, OptimizerError, OptimizerResult, add_images,
    clear_images, download_all, download_image, optimize_images, remove_image,
};

fn textured(width: u32, height: u32, seed: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let n = (x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503) ^ seed) % 61;
        Rgb([
            ((x * 180) / width) as u8 + n as u8,
            ((y * 200) / height) as u8,
            (n * 4) as u8,
        ])
    }))
}

fn png(name: &str, width: u32, height: u32, seed: u32) -> RawFile {
    let mut bytes = Vec::new();
    textured(width, height, seed)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    RawFile::new(name, "image/png", bytes)
}

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("image-optimizer-it-{tag}-{}", uuid::Uuid::new_v4()))
}

fn state() -> AppState {
    AppState::new(OptimizerConfig::default())
}

#[tokio::test]
async fn add_optimize_then_remove_middle_entry() {
    let state = state();
    let files = vec![
        png("medium.png", 160, 120, 1),
        png("large.png", 240, 180, 2),
        RawFile::new("readme.txt", "text/plain", b"hello".to_vec()),
        png("small.png", 80, 60, 3),
    ];
    let sizes: Vec<u64> = [&files[0], &files[1], &files[3]].iter().map(|f| f.size()).collect();

    let ids = state.add_files(files).await;
    assert_eq!(ids.len(), 3);

    let before = state.summaries().await;
    assert_eq!(before.iter().map(|s| s.original_size).collect::<Vec<_>>(), sizes);
    assert!(before.iter().all(|s| s.optimized_size.is_none()));

    let report = optimize_images(&state, Some(30)).await.unwrap();
    assert_eq!(report.succeeded(), 3);

    let optimized = state.summaries().await;
    assert!(optimized.iter().all(|s| s.optimized_size.unwrap_or(0) > 0 && s.optimized.is_some()));

    let removed = optimized[1].clone();
    assert!(remove_image(&state, ids[1]).await);

    let after = state.summaries().await;
    assert_eq!(after.len(), 2);
    assert_eq!(after[0].original_size, sizes[0]);
    assert_eq!(after[1].original_size, sizes[2]);

    let registry = state.registry().lock().await;
    assert!(registry.resolve(&removed.preview).is_none());
    assert!(registry.resolve(removed.optimized.as_ref().unwrap()).is_none());
    assert_eq!(registry.live_handles(), 4);
}

#[tokio::test]
async fn optimizing_twice_keeps_one_optimized_handle_per_entry() {
    let state = state();
    let ids = state.add_files(vec![png("photo.png", 120, 90, 4)]).await;

    optimize_images(&state, Some(80)).await.unwrap();
    let first = state.summaries().await[0].optimized.clone().unwrap();

    optimize_images(&state, Some(20)).await.unwrap();
    let registry = state.registry().lock().await;
    let entry = registry.get(ids[0]).unwrap();

    assert_ne!(entry.optimized().unwrap().handle(), &first);
    assert!(registry.resolve(&first).is_none());
    assert_eq!(registry.live_handles(), 2);
}

#[tokio::test]
async fn lower_quality_gives_smaller_output() {
    let state = state();
    state.add_files(vec![png("photo.png", 200, 150, 5)]).await;

    let low = optimize_images(&state, Some(10)).await.unwrap();
    let high = optimize_images(&state, Some(90)).await.unwrap();
    assert!(low.results[0].optimized_size <= high.results[0].optimized_size);
}

#[tokio::test]
async fn corrupt_image_fails_alone_and_keeps_last_good_state() {
    let state = state();
    let ids = state
        .add_files(vec![
            png("good.png", 64, 64, 6),
            RawFile::new("broken.jpg", "image/jpeg", vec![0xFF, 0xD8, 0x00, 0x01]),
        ])
        .await;

    let report = optimize_images(&state, None).await.unwrap();
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert!(report.results[1].error.as_deref().unwrap().starts_with("Decode error"));

    let summaries = state.summaries().await;
    assert!(summaries[0].optimized.is_some());
    assert!(summaries[1].optimized.is_none());
    assert!(summaries[1].last_error.is_some());
    assert_eq!(summaries[1].id, ids[1]);
}

#[tokio::test]
async fn invalid_quality_fails_the_call() {
    let state = state();
    state.add_files(vec![png("a.png", 8, 8, 7)]).await;

    let err = optimize_images(&state, Some(0)).await.unwrap_err();
    assert!(matches!(err, OptimizerError::Validation(_)));
}

#[tokio::test]
async fn entry_removed_while_encoding_is_not_updated() {
    let executor = BatchExecutor::new(Arc::new(JpegReencoder::new()));
    let state = AppState::with_executor(OptimizerConfig::default(), executor.clone());
    let ids = state
        .add_files(vec![png("keep.png", 32, 32, 8), png("drop.png", 32, 32, 9)])
        .await;

    let job = state.registry().lock().await.begin_optimize(50).unwrap();
    let outcomes = executor.execute(job).await;
    assert!(remove_image(&state, ids[1]).await);

    let mut registry = state.registry().lock().await;
    let report = registry.commit(outcomes);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.discarded, 1);
    assert_eq!(registry.live_handles(), 2);
}

/// Output length equals the quality; high qualities take noticeably longer.
struct QualitySizedEncoder;

impl Encoder for QualitySizedEncoder {
    fn encode(&self, _source: &RawFile, quality: u8) -> OptimizerResult<EncodedImage> {
        if quality >= 50 {
            std::thread::sleep(Duration::from_millis(300));
        }
        Ok(EncodedImage::new(vec![0u8; quality as usize], "image/jpeg", 8, 8))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_runs_keep_the_result_of_the_run_started_last() {
    let executor = BatchExecutor::new(Arc::new(QualitySizedEncoder));
    let state = AppState::with_executor(OptimizerConfig::default(), executor);
    state.add_files(vec![png("photo.png", 8, 8, 13)]).await;

    let slow = {
        let state = state.clone();
        tokio::spawn(async move { optimize_images(&state, Some(90)).await })
    };
    // Let the slow run take its snapshot first.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fast = optimize_images(&state, Some(10)).await.unwrap();
    assert_eq!(fast.results[0].optimized_size, 10);

    let late = slow.await.unwrap().unwrap();
    assert!(late.results.is_empty());
    assert_eq!(late.superseded, 1);

    let summaries = state.summaries().await;
    assert_eq!(summaries[0].optimized_size, Some(10));
    assert_eq!(state.registry().lock().await.live_handles(), 2);
}

#[tokio::test]
async fn downloads_are_prefixed_jpegs_with_original_dimensions() {
    let dir = scratch_dir("download");
    let state = state();

    let source = scratch_dir("source");
    tokio::fs::create_dir_all(&source).await.unwrap();
    let path = source.join("holiday.png");
    let file = png("holiday.png", 96, 54, 10);
    tokio::fs::write(&path, file.bytes()).await.unwrap();
    let notes = source.join("notes.txt");
    tokio::fs::write(&notes, b"not an image").await.unwrap();
    let missing = source.join("missing.png");

    let intake = add_images(&state, &[path, notes, missing.clone()]).await;
    assert_eq!(intake.added.len(), 1);
    assert_eq!(intake.unreadable.len(), 1);
    assert_eq!(intake.unreadable[0].0, missing);

    assert!(download_all(&state, &dir).await.unwrap().is_empty());
    optimize_images(&state, Some(60)).await.unwrap();

    let written = download_all(&state, &dir).await.unwrap();
    assert_eq!(written, vec![dir.join("optimized-holiday.png")]);

    let bytes = tokio::fs::read(&written[0]).await.unwrap();
    let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (96, 54));

    let single = download_image(&state, intake.added[0], &dir).await.unwrap();
    assert_eq!(single, Some(dir.join("optimized-holiday.png")));

    let _ = tokio::fs::remove_dir_all(&dir).await;
    let _ = tokio::fs::remove_dir_all(&source).await;
}

#[tokio::test]
async fn bulk_download_keeps_every_file_with_a_shared_name() {
    let dir = scratch_dir("same-name");
    let state = state();
    state
        .add_files(vec![png("x.png", 8, 8, 14), png("x.png", 12, 10, 15)])
        .await;
    optimize_images(&state, None).await.unwrap();

    let written = download_all(&state, &dir).await.unwrap();
    assert_eq!(
        written,
        vec![dir.join("optimized-x.png"), dir.join("optimized-x (1).png")]
    );

    let mut on_disk = 0;
    let mut listing = tokio::fs::read_dir(&dir).await.unwrap();
    while listing.next_entry().await.unwrap().is_some() {
        on_disk += 1;
    }
    assert_eq!(on_disk, 2);

    let second = image::load_from_memory(&tokio::fs::read(&written[1]).await.unwrap()).unwrap();
    assert_eq!((second.width(), second.height()), (12, 10));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn clear_releases_every_handle() {
    let state = state();
    assert_eq!(clear_images(&state).await, 0);

    state
        .add_files(vec![png("a.png", 16, 16, 11), png("b.png", 16, 16, 12)])
        .await;
    optimize_images(&state, None).await.unwrap();

    assert_eq!(clear_images(&state).await, 2);
    let registry = state.registry().lock().await;
    assert!(registry.is_empty());
    assert_eq!(registry.live_handles(), 0);
    assert_eq!(
        registry.handle_store().created_count(),
        registry.handle_store().released_count()
    );
}
