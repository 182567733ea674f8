mod common;

use common::synthetic_image::{checkerboard, single_spot, to_pgm_text, uniform};
use common::MemoryRaster;
use halo_sobel::comm::World;
use halo_sobel::edges::{IdentityKernel, EDGE};
use halo_sobel::exchange::ExchangeCoordinator;
use halo_sobel::image::io::FileRaster;
use halo_sobel::image::ImageF32;
use halo_sobel::partition::RowPartition;
use halo_sobel::{EdgePipeline, PipelineConfig, SobelError};
use std::fs;
use std::path::{Path, PathBuf};

fn config(width: usize, height: usize, workers: usize) -> PipelineConfig {
    PipelineConfig {
        input: PathBuf::from("in.pgm"),
        output: PathBuf::from("out.pgm"),
        width,
        height,
        workers,
        units: None,
        threshold: 100.0,
    }
}

fn run_in_memory(input: ImageF32, workers: usize) -> ImageF32 {
    let cfg = config(input.w, input.h, workers);
    let raster = MemoryRaster::new(input);
    let pipeline = EdgePipeline::new(cfg, raster);
    let report = pipeline.run().expect("pipeline run");
    assert_eq!(report.workers, workers);
    let out = pipeline.raster().last_output().expect("output written");
    assert_eq!(
        report.edge_pixels,
        out.data.iter().filter(|&&v| v == EDGE).count()
    );
    out
}

#[test]
fn all_zero_image_produces_no_edges() {
    let out = run_in_memory(uniform(4, 4, 0.0), 2);
    assert_eq!((out.w, out.h), (4, 4));
    assert!(out.data.iter().all(|&v| v == 0.0));
}

#[test]
fn single_bright_pixel_with_one_block_lights_its_ring() {
    let out = run_in_memory(single_spot(4, 4, 1, 1, 255.0), 1);
    for row in 0..4 {
        for col in 0..4 {
            let in_support = row <= 2 && col <= 2 && (row, col) != (1, 1);
            let expected = if in_support { EDGE } else { 0.0 };
            assert_eq!(out.get(row, col), Some(expected), "({row},{col})");
        }
    }
}

#[test]
fn single_bright_pixel_with_one_row_blocks_loses_cross_block_support() {
    // Each unit owns one row and sees zeros above and below it, so only the
    // horizontal neighbours of the spot, inside its own block, respond.
    let out = run_in_memory(single_spot(4, 4, 1, 1, 255.0), 4);
    let expected = [
        [0.0, 0.0, 0.0, 0.0],
        [EDGE, 0.0, EDGE, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
    ];
    for (row, cols) in expected.iter().enumerate() {
        for (col, &v) in cols.iter().enumerate() {
            assert_eq!(out.get(row, col), Some(v), "({row},{col})");
        }
    }
}

#[test]
fn interior_rows_match_single_block_result() {
    // Away from block boundaries every worker count agrees with P = 1.
    let image = checkerboard(16, 12, 4);
    let reference = run_in_memory(image.clone(), 1);
    for workers in [2, 3] {
        let out = run_in_memory(image.clone(), workers);
        let block_rows = 12 / workers;
        for row in 0..12 {
            let local = row % block_rows;
            if local == 0 || local == block_rows - 1 {
                continue;
            }
            assert_eq!(
                &out.data[row * 16..(row + 1) * 16],
                &reference.data[row * 16..(row + 1) * 16],
                "row {row} with {workers} workers"
            );
        }
    }
}

#[test]
fn scatter_then_gather_with_identity_kernel_is_lossless() {
    let image = checkerboard(10, 8, 3);
    let part = RowPartition::new(8, 10, 4).unwrap();
    let coordinator = ExchangeCoordinator::new(part, &IdentityKernel);
    let results = World::new(4)
        .unwrap()
        .run(|comm| coordinator.exchange(comm, comm.is_root().then_some(&image)));
    let mut results = results.into_iter();
    assert_eq!(results.next().unwrap().unwrap(), Some(image));
    assert!(results.all(|r| matches!(r, Ok(None))));
}

#[test]
fn unit_count_mismatch_fails_without_writing() {
    let mut cfg = config(4, 4, 2);
    cfg.units = Some(3);
    let pipeline = EdgePipeline::new(cfg, MemoryRaster::new(uniform(4, 4, 10.0)));
    let err = pipeline.run().unwrap_err();
    assert!(matches!(err, SobelError::Configuration(_)), "{err}");
    assert!(pipeline.raster().written.lock().is_empty());
}

#[test]
fn indivisible_height_is_rejected_up_front() {
    let pipeline = EdgePipeline::new(config(4, 6, 4), MemoryRaster::new(uniform(4, 6, 0.0)));
    assert!(matches!(
        pipeline.run(),
        Err(SobelError::Configuration(_))
    ));
}

#[test]
fn input_size_mismatch_aborts_every_unit() {
    let pipeline = EdgePipeline::new(config(4, 4, 2), MemoryRaster::new(uniform(4, 2, 0.0)));
    assert!(matches!(pipeline.run(), Err(SobelError::SizeMismatch { .. })));
    assert!(pipeline.raster().written.lock().is_empty());
}

fn file_config(dir: &Path, input: &ImageF32, workers: usize, output: &str) -> PipelineConfig {
    let input_path = dir.join("input.pgm");
    fs::write(&input_path, to_pgm_text(input)).unwrap();
    PipelineConfig {
        input: input_path,
        output: dir.join(output),
        ..config(input.w, input.h, workers)
    }
}

#[test]
fn repeated_file_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let image = checkerboard(20, 12, 5);

    let first = file_config(dir.path(), &image, 3, "first.pgm");
    let second = file_config(dir.path(), &image, 3, "second.pgm");
    EdgePipeline::new(first.clone(), FileRaster).run().unwrap();
    EdgePipeline::new(second.clone(), FileRaster).run().unwrap();

    let a = fs::read(&first.output).unwrap();
    let b = fs::read(&second.output).unwrap();
    assert_eq!(a, b);

    let text = String::from_utf8(a).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("P2"));
    assert!(lines.next().unwrap().starts_with('#'));
    assert_eq!(lines.next(), Some("20 12"));
    assert_eq!(lines.next(), Some("255"));
    let values: Vec<u32> = lines
        .flat_map(str::split_whitespace)
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(values.len(), 240);
    assert!(values.iter().all(|&v| v == 0 || v == 255));
}

#[test]
fn missing_input_file_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = PipelineConfig {
        input: dir.path().join("absent.pgm"),
        output: dir.path().join("out.pgm"),
        ..config(4, 4, 2)
    };
    let err = EdgePipeline::new(cfg.clone(), FileRaster).run().unwrap_err();
    assert!(matches!(err, SobelError::Io { .. }), "{err}");
    assert!(!cfg.output.exists());
}
