use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::autoencoder::{train, Autoencoder};
use crate::core::config::{TrainConfig, HIDDENS, NET_WIDTH};
use crate::core::sampler::{BlockSampler, NormalizedImage};

fn trained_records(iterations: usize, seed: u64) -> Vec<f64> {
    let image = NormalizedImage::constant(32, 16, 0.5);
    let sampler = BlockSampler::new(&image);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ae = Autoencoder::new(sampler.block_count(), &mut rng);
    sampler.fill_random(ae.set.get_mut("image"), &mut rng);
    sampler.fill_full(ae.set.get_mut("full"));

    let config = TrainConfig {
        iterations,
        ..TrainConfig::default()
    };
    train(&mut ae, &sampler, &config, &mut rng)
        .iter()
        .map(|r| r.loss)
        .collect()
}

#[test]
fn 저장소_구성_테스트() {
    let mut rng = StdRng::seed_from_u64(7);
    let ae = Autoencoder::new(64, &mut rng);

    let l1 = ae.set.get("layer1");
    assert_eq!((l1.rows, l1.cols), (HIDDENS, NET_WIDTH));
    assert!(l1.trainable);
    let full = ae.set.get("full");
    assert_eq!((full.rows, full.cols), (NET_WIDTH, 64));
    assert!(!full.trainable);
    // 편향은 0으로 시작한다
    for b in ae.set.get("bias1").x.iter().chain(ae.set.get("bias2").x.iter()) {
        assert_eq!(b.re, 0.0);
        assert_eq!(b.im, 0.0);
    }
    // "image" 텐서는 블록 수의 1/8 열
    assert_eq!(ae.set.get("image").cols, 8);
}

#[test]
fn 손실_음수_아님_테스트() {
    let losses = trained_records(4, 7);
    for loss in losses {
        assert!(loss >= 0.0, "손실이 음수: {loss}");
        assert!(loss.is_finite());
    }
}

#[test]
fn 상수_이미지_손실_추세_테스트() {
    // 고정 시드의 상수 이미지에서 50회 반복 동안 손실 추세는 비증가한다.
    // 반복 단위의 엄격한 단조성은 요구하지 않고 앞/뒤 구간 평균을 비교한다.
    let losses = trained_records(50, 7);
    let head: f64 = losses[..10].iter().sum::<f64>() / 10.0;
    let tail: f64 = losses[40..].iter().sum::<f64>() / 10.0;
    assert!(
        tail <= head * 1.01,
        "손실 추세가 감소하지 않음: 앞 {head}, 뒤 {tail}"
    );
}

#[test]
fn 복원_버퍼_크기_테스트() {
    let image = NormalizedImage::constant(16, 16, 0.25);
    let sampler = BlockSampler::new(&image);
    let mut rng = StdRng::seed_from_u64(3);
    let mut ae = Autoencoder::new(sampler.block_count(), &mut rng);
    sampler.fill_full(ae.set.get_mut("full"));

    let decoded = ae.decode();
    assert_eq!(decoded.len(), NET_WIDTH * sampler.block_count());
    // 절댓값 출력층이라 복원 값은 음수가 아니다
    for v in decoded {
        assert!(v >= 0.0);
    }
}

#[test]
fn 코드_크기_추정_테스트() {
    let mut rng = StdRng::seed_from_u64(7);
    let ae = Autoencoder::new(64, &mut rng);
    assert_eq!(
        ae.coded_size_bits(),
        (HIDDENS * NET_WIDTH + NET_WIDTH + 64 * HIDDENS) * 16
    );
}
