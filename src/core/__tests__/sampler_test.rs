use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::config::{BLOCK_SIZE, NET_WIDTH};
use crate::core::sampler::{BlockSampler, NormalizedImage};
use crate::core::tensor::TensorSet;

/// 좌표를 채널 값에 새긴 테스트 이미지
fn gradient_image(width: usize, height: usize) -> NormalizedImage {
    let mut rgb = Vec::with_capacity(3 * width * height);
    for y in 0..height {
        for x in 0..width {
            rgb.push(x as f64 / width as f64);
            rgb.push(y as f64 / height as f64);
            rgb.push(0.5);
        }
    }
    NormalizedImage::new(width, height, rgb)
}

#[test]
fn full_텐서_원소_개수_테스트() {
    let image = gradient_image(32, 16);
    let sampler = BlockSampler::new(&image);
    let block_count = sampler.block_count();
    assert_eq!(block_count, 32 * 16 / (BLOCK_SIZE * BLOCK_SIZE));

    let mut set = TensorSet::new();
    set.add_buffer("full", NET_WIDTH, block_count);
    sampler.fill_full(set.get_mut("full"));

    let full = set.get("full");
    assert_eq!(full.len(), 3 * block_count * BLOCK_SIZE * BLOCK_SIZE);
    // 모든 값이 채워졌고 [0,1] 범위다
    for v in full.x.iter() {
        assert!((0.0..=1.0).contains(&v.re), "범위 밖 채널 값: {}", v.re);
        assert_eq!(v.im, 0.0);
    }
}

#[test]
fn full_텐서_래스터_순서_테스트() {
    let image = gradient_image(16, 16);
    let sampler = BlockSampler::new(&image);
    let mut set = TensorSet::new();
    set.add_buffer("full", NET_WIDTH, sampler.block_count());
    sampler.fill_full(set.get_mut("full"));

    // 열 1은 오른쪽 위 블록: 첫 픽셀 r = 8/16
    let full = set.get("full");
    assert_eq!(full.at(0, 1).re, 8.0 / 16.0);
    // 열 2는 왼쪽 아래 블록: 첫 픽셀 g = 8/16
    assert_eq!(full.at(1, 2).re, 8.0 / 16.0);
}

#[test]
fn 무작위_샘플링_경계_테스트() {
    let image = gradient_image(64, 32);
    let sampler = BlockSampler::new(&image);
    let mut set = TensorSet::new();
    set.add_buffer("image", NET_WIDTH, sampler.block_count() / 8);
    assert_eq!(set.get("image").cols, 4);

    // 여러 시드에서 반복해도 경계 밖 접근 없이 [0,1] 값만 나온다
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        sampler.fill_random(set.get_mut("image"), &mut rng);
        for v in set.get("image").x.iter() {
            assert!((0.0..=1.0).contains(&v.re));
        }
    }
}

#[test]
#[should_panic(expected = "블록 정렬")]
fn 비정렬_이미지_거부_테스트() {
    let image = gradient_image(12, 16);
    BlockSampler::new(&image);
}
