//! End-to-end tests of the `batch-resize` binary.
//!
//! Each test builds a small source tree in a temp dir, runs the compiled
//! binary against it and inspects stdout, the exit status and the files
//! written.

use image::{ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn batch_resize(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_batch-resize"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// JPEG with an APP1 EXIF segment holding `Make = "Cam"`.
fn jpeg_with_make(width: u32, height: u32) -> Vec<u8> {
    let mut tiff = b"II".to_vec();
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x010Fu16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&4u32.to_le_bytes());
    tiff.extend_from_slice(b"Cam\0");
    tiff.extend_from_slice(&0u32.to_le_bytes());

    let jpeg = jpeg_bytes(width, height);
    let mut bytes = jpeg[..2].to_vec();
    bytes.extend_from_slice(&[0xFF, 0xE1]);
    bytes.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    bytes.extend_from_slice(b"Exif\0\0");
    bytes.extend_from_slice(&tiff);
    bytes.extend_from_slice(&jpeg[2..]);
    bytes
}

fn stdout_lines(out: &Output) -> Vec<PathBuf> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(PathBuf::from)
        .collect()
}

fn dimensions(path: &Path) -> (u32, u32) {
    let img = image::open(path).unwrap();
    (img.width(), img.height())
}

fn source_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("photo.JPG"), jpeg_bytes(600, 400)).unwrap();
    std::fs::write(tmp.path().join("notes.txt"), b"not an image").unwrap();
    tmp
}

#[test]
fn converts_to_png_in_default_destination() {
    let tmp = source_tree();
    let src = tmp.path().to_str().unwrap();

    let out = batch_resize(&[src, "-res", "100x50", "-type", "png"]);
    assert!(out.status.success());

    let expected = tmp.path().join("100x50/photo.png");
    assert_eq!(dimensions(&expected), (100, 50));
    assert_eq!(stdout_lines(&out), vec![std::path::absolute(&expected).unwrap()]);
    assert!(!tmp.path().join("100x50/notes.png").exists());

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[path] no <destination>, creating"));
    assert!(!stderr.contains("notes.txt"));
}

#[test]
fn tiff_source_converts_with_sidecar() {
    let tmp = TempDir::new().unwrap();
    let scan = RgbImage::from_fn(60, 40, |x, y| image::Rgb([x as u8, y as u8, 200]));
    image::DynamicImage::ImageRgb8(scan)
        .save_with_format(tmp.path().join("scan.TIF"), image::ImageFormat::Tiff)
        .unwrap();

    let out = batch_resize(&[tmp.path().to_str().unwrap(), "-res", "30x10"]);
    assert!(out.status.success());

    let output = tmp.path().join("30x10/scan.jpeg");
    assert_eq!(dimensions(&output), (30, 10));
    assert_eq!(stdout_lines(&out), vec![std::path::absolute(&output).unwrap()]);

    // A TIFF's own IFD0 is its EXIF block.
    let sidecar = tmp.path().join("30x10/scan.jpeg.json");
    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(sidecar).unwrap()).unwrap();
    assert_eq!(json["ImageWidth"], 60);
}

#[test]
fn explicit_output_and_double_dash_flags() {
    let tmp = source_tree();
    let dest = tmp.path().join("resized");

    let out = batch_resize(&[
        tmp.path().to_str().unwrap(),
        "--res=64x64",
        "--type=tiff-lzw",
        "--output",
        dest.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    assert_eq!(dimensions(&dest.join("photo.tif")), (64, 64));
}

#[test]
fn unknown_type_falls_back_to_jpeg() {
    let tmp = source_tree();
    let out = batch_resize(&[tmp.path().to_str().unwrap(), "-res", "30x20", "-type", "webp"]);
    assert!(out.status.success());
    assert_eq!(dimensions(&tmp.path().join("30x20/photo.jpeg")), (30, 20));
}

#[test]
fn malformed_resolution_exits_1_without_writing() {
    let tmp = source_tree();
    let out = batch_resize(&[tmp.path().to_str().unwrap(), "-res", "100xabc"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(!tmp.path().join("100xabc").exists());
    assert!(String::from_utf8_lossy(&out.stderr).contains("[config]"));
}

#[test]
fn missing_source_exits_1() {
    let out = batch_resize(&["/nonexistent/batch-resize/photos"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("does not exist"));
}

#[test]
fn no_source_exits_1() {
    let out = batch_resize(&[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no <source> specified"));
    assert!(stderr.contains("Usage: batch-resize"));
}

#[test]
fn verbose_logs_each_conversion_stage() {
    let tmp = source_tree();
    let src = tmp.path().to_str().unwrap();

    let out = batch_resize(&[src, "-v", "-res", "20x20", "-type", "png"]);
    assert_eq!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[convert] decoded"));
    assert!(stderr.contains("[convert] resized"));
    assert!(stderr.contains("to 20x20"));
    assert!(stderr.contains("[convert] encoded"));
    assert!(stderr.contains("as PNG"));
}

#[test]
fn rerun_is_idempotent() {
    let tmp = source_tree();
    let src = tmp.path().to_str().unwrap();

    let first = batch_resize(&[src, "-res", "40x40", "-type", "png"]);
    let output = tmp.path().join("40x40/photo.png");
    let bytes = std::fs::read(&output).unwrap();

    let second = batch_resize(&[src, "-res", "40x40", "-type", "png"]);
    assert_eq!(stdout_lines(&first), stdout_lines(&second));
    assert_eq!(std::fs::read(&output).unwrap(), bytes);
    assert!(!tmp.path().join("40x40/photo.png.json").exists());
}

#[test]
fn exif_sidecar_is_written() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("camera.jpg"), jpeg_with_make(80, 60)).unwrap();

    let out = batch_resize(&[tmp.path().to_str().unwrap(), "-res", "40x30"]);
    assert!(out.status.success());

    let sidecar = tmp.path().join("40x30/camera.jpeg.json");
    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(sidecar).unwrap()).unwrap();
    assert_eq!(json["Make"], "Cam");
}

#[test]
fn corrupt_file_is_reported_and_walk_continues() {
    let tmp = source_tree();
    std::fs::write(tmp.path().join("broken.jpg"), b"\xFF\xD8 truncated").unwrap();
    let src = tmp.path().to_str().unwrap();

    let out = batch_resize(&[src, "-res", "20x20", "-summary"]);
    assert!(out.status.success());
    assert_eq!(stdout_lines(&out).len(), 1);
    assert!(!tmp.path().join("20x20/broken.jpeg").exists());

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[convert]"));
    assert!(stderr.contains("broken.jpg"));
    assert!(stderr.contains("[summary] converted 1, failed 1"));

    let strict = batch_resize(&[src, "-res", "20x20", "-strict"]);
    assert_eq!(strict.status.code(), Some(2));
}

#[test]
fn parallel_run_matches_sequential_output() {
    let tmp = TempDir::new().unwrap();
    for i in 0..6 {
        std::fs::write(
            tmp.path().join(format!("img{i}.jpg")),
            jpeg_bytes(50 + i * 10, 40),
        )
        .unwrap();
    }
    let src = tmp.path().to_str().unwrap();

    let dest = TempDir::new().unwrap();
    let seq_dest = dest.path().join("seq");
    let par_dest = dest.path().join("par");
    let seq = batch_resize(&[src, "-res", "25x25", "-output", seq_dest.to_str().unwrap()]);
    let par = batch_resize(&[
        src,
        "-res",
        "25x25",
        "-jobs",
        "0",
        "-output",
        par_dest.to_str().unwrap(),
    ]);
    assert!(seq.status.success() && par.status.success());

    // Parallel runs print in completion order.
    let names = |out: &Output| -> Vec<String> {
        let mut names: Vec<String> = stdout_lines(out)
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    };
    assert_eq!(names(&seq), names(&par));
    for i in 0..6 {
        let name = format!("img{i}.jpeg");
        assert_eq!(
            std::fs::read(seq_dest.join(&name)).unwrap(),
            std::fs::read(par_dest.join(&name)).unwrap()
        );
    }
}

#[test]
fn help_exits_0() {
    let out = batch_resize(&["-help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("-res"));
}
