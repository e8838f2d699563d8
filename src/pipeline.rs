//! 실행 파이프라인
//!
//! 이미지 열기/축소/크롭, 기준 아티팩트 저장, 모드별 코어 실행, 복원 이미지와
//! 손실 곡선 저장까지의 접착 코드. 수치 코어는 전부 `core`에 있다.
//! I/O 실패는 복구하지 않고 그대로 전파한다 — 이미 써진 아티팩트는 남는다.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, ImageBuffer, Luma, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::config::{
    EvolutionConfig, TrainConfig, BLOCK_SIZE, KRON_ALIGN, NET_WIDTH, SCALE,
};
use crate::core::{
    train, Autoencoder, BlockSampler, EvolutionaryOptimizer, GrayTarget, NormalizedImage,
    TrainRecord,
};

/// 파이프라인 입력 경로와 시드
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub image_path: PathBuf,
    pub output_dir: PathBuf,
    pub seed: u64,
}

impl PipelineOptions {
    pub fn new(image_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, seed: u64) -> Self {
        Self {
            image_path: image_path.into(),
            output_dir: output_dir.into(),
            seed,
        }
    }

    fn stem(&self) -> Result<String> {
        let stem = self
            .image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("파일 이름을 읽을 수 없음: {:?}", self.image_path))?;
        Ok(stem.to_string())
    }

    fn out(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// 입력을 열어 축소하고 `align` 배수로 크롭한 뒤 [0,1] RGB 버퍼로 만든다.
fn load_cropped(path: &Path, align: usize) -> Result<(DynamicImage, NormalizedImage)> {
    let input = image::open(path).with_context(|| format!("이미지 열기 실패: {path:?}"))?;
    let (mut width, mut height) = (input.width() as usize, input.height() as usize);
    width /= SCALE;
    height /= SCALE;
    let input = input.resize_exact(width as u32, height as u32, FilterType::Nearest);

    width -= width % align;
    height -= height % align;
    if width == 0 || height == 0 {
        bail!("이미지가 {align} 정렬 크롭 후 비어 있음");
    }
    let cropped = input.crop_imm(0, 0, width as u32, height as u32);

    let rgba = cropped.to_rgba16();
    let mut rgb = Vec::with_capacity(3 * width * height);
    for p in rgba.pixels() {
        rgb.push(p[0] as f64 / 0xFFFF as f64);
        rgb.push(p[1] as f64 / 0xFFFF as f64);
        rgb.push(p[2] as f64 / 0xFFFF as f64);
    }
    Ok((cropped, NormalizedImage::new(width, height, rgb)))
}

/// 크롭된 기준 PNG와 품질 45 JPEG 레퍼런스를 남긴다.
fn write_baselines(opts: &PipelineOptions, cropped: &DynamicImage) -> Result<()> {
    let stem = opts.stem()?;
    let png_path = opts.out(&format!("{stem}.png"));
    cropped
        .save(&png_path)
        .with_context(|| format!("기준 PNG 저장 실패: {png_path:?}"))?;

    let jpg_path = opts.out(&format!("{stem}.jpg"));
    let file = File::create(&jpg_path)
        .with_context(|| format!("JPEG 생성 실패: {jpg_path:?}"))?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), 45);
    encoder
        .encode_image(&cropped.to_rgb8())
        .with_context(|| format!("JPEG 인코딩 실패: {jpg_path:?}"))?;
    Ok(())
}

/// 반복-손실 산점도를 PNG로 그린다.
pub fn plot_loss_curve(path: &Path, records: &[TrainRecord]) -> Result<()> {
    let max_loss = records.iter().map(|r| r.loss).fold(f64::EPSILON, f64::max);
    let max_iter = records.len().max(1) as f64;

    let root = BitMapBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{e}"))?;
    let mut chart = ChartBuilder::on(&root)
        .caption("epochs vs cost", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..max_iter, 0.0..max_loss * 1.05)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    chart
        .configure_mesh()
        .x_desc("epochs")
        .y_desc("cost")
        .draw()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    chart
        .draw_series(
            records
                .iter()
                .map(|r| Circle::new((r.iteration as f64, r.loss), 1, BLUE.filled())),
        )
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    root.present().map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}

/// [0,1] 평탄 그레이 버퍼를 8비트 PNG로 저장한다. 양자화 전에 잘라낸다.
pub fn write_gray_png(path: &Path, side: usize, pixels: &[f32]) -> Result<()> {
    assert!(pixels.len() >= side * side);
    let mut img = GrayImage::new(side as u32, side as u32);
    for y in 0..side {
        for x in 0..side {
            let v = pixels[y * side + x].clamp(0.0, 1.0);
            img.put_pixel(x as u32, y as u32, Luma([(v * 255.0 + 0.5) as u8]));
        }
    }
    img.save(path).with_context(|| format!("PNG 저장 실패: {path:?}"))
}

/// 복원된 블록 배치를 16비트 RGB PNG로 재조립한다.
fn write_decoded_blocks(
    path: &Path,
    width: usize,
    height: usize,
    decoded: &[f64],
) -> Result<()> {
    let cols = width * height / (BLOCK_SIZE * BLOCK_SIZE);
    assert_eq!(decoded.len(), NET_WIDTH * cols);

    let mut img: ImageBuffer<Rgb<u16>, Vec<u16>> =
        ImageBuffer::new(width as u32, height as u32);
    let mut col = 0;
    for j in (0..height).step_by(BLOCK_SIZE) {
        for i in (0..width).step_by(BLOCK_SIZE) {
            for y in 0..BLOCK_SIZE {
                for x in 0..BLOCK_SIZE {
                    let k = 3 * (y * BLOCK_SIZE + x);
                    let ch = |off: usize| {
                        let v = decoded[(k + off) * cols + col].clamp(0.0, 1.0);
                        (v * 0xFFFF as f64 + 0.5) as u16
                    };
                    img.put_pixel(
                        (i + x) as u32,
                        (j + y) as u32,
                        Rgb([ch(0), ch(1), ch(2)]),
                    );
                }
            }
            col += 1;
        }
    }
    img.save(path).with_context(|| format!("복원 PNG 저장 실패: {path:?}"))
}

/// 오토인코더 경로: 학습 2048회, 손실 곡선, tanh 복원 패스, 코드 크기 출력.
pub fn neural_compress(opts: &PipelineOptions) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let (cropped, normalized) = load_cropped(&opts.image_path, BLOCK_SIZE)?;
    write_baselines(opts, &cropped)?;

    let sampler = BlockSampler::new(&normalized);
    log::info!(
        "신경 압축 시작: {}×{}, 블록 {}개",
        normalized.width,
        normalized.height,
        sampler.block_count()
    );

    let mut ae = Autoencoder::new(sampler.block_count(), &mut rng);
    sampler.fill_random(ae.set.get_mut("image"), &mut rng);
    sampler.fill_full(ae.set.get_mut("full"));

    let config = TrainConfig::default();
    let records = train(&mut ae, &sampler, &config, &mut rng);

    plot_loss_curve(&opts.out("epochs.png"), &records)?;

    let decoded = ae.decode();
    let stem = opts.stem()?;
    write_decoded_blocks(
        &opts.out(&format!("{stem}_coded.png")),
        normalized.width,
        normalized.height,
        &decoded,
    )?;

    println!("{}", ae.coded_size_bits());
    Ok(())
}

/// 진화 경로: 1024×1024 그레이 목표에 대해 256세대 탐색, 최상 게놈 복원 저장.
pub fn kronecker_compress(opts: &PipelineOptions) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let (cropped, normalized) = load_cropped(&opts.image_path, KRON_ALIGN)?;
    write_baselines(opts, &cropped)?;

    // 게놈 인자 수는 크롭된 폭에서 유도되고, 적합도 창은 1024×1024로 고정된다.
    let config = EvolutionConfig::for_width(normalized.width);
    let gray = normalized.gray();
    let window = KRON_ALIGN;
    let full_width = normalized.width;
    let mut target_pixels = Vec::with_capacity(window * window);
    for y in 0..window {
        target_pixels.extend_from_slice(&gray[y * full_width..y * full_width + window]);
    }
    let target = GrayTarget::new(window, target_pixels);

    log::info!(
        "크로네커 진화 시작: 복원 {}×{}, 목표 창 {window}×{window}, 게놈 길이 {}",
        config.side,
        config.side,
        config.genome_len()
    );

    let pb = ProgressBar::new(config.generations as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} 세대")
            .expect("고정 진행률 템플릿"),
    );

    let mut optimizer = EvolutionaryOptimizer::new(target, config, &mut rng);
    let best = optimizer.run(&mut rng, |report| {
        let line: Vec<String> = report
            .top
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{i} {f:.6}"))
            .collect();
        pb.println(format!("세대 {}: {}", report.generation, line.join(", ")));
        pb.inc(1);
    });
    pb.finish();

    write_gray_png(&opts.out("image_coded.png"), best.side(), &best.decode())?;

    let json_path = opts.out("best_genome.json");
    let file = File::create(&json_path)
        .with_context(|| format!("게놈 저장 실패: {json_path:?}"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &best)?;
    Ok(())
}
