//! 두 압축 경로의 소형 종단간 테스트

use rand::rngs::StdRng;
use rand::SeedableRng;

use knc_image::core::config::{EvolutionConfig, TrainConfig};
use knc_image::core::evolution::l1_fitness;
use knc_image::core::{train, Autoencoder, BlockSampler, NormalizedImage};
use knc_image::{EvolutionaryOptimizer, Genome, GrayTarget};

#[test]
/// 16×16 상수 회색(128) 목표와 그 상수를 표현하는 게놈은 적합도가 0으로
/// 수렴한 상태다.
fn test_constant_gray_kronecker_convergence() {
    let side = 16usize;
    let value = 128.0f32 / 255.0;
    let factors = 4;
    let c = value.powf(1.0 / factors as f32);
    let genome = Genome {
        genes: vec![c; 4 * factors],
        fitness: 0.0,
    };
    let target = GrayTarget::constant(side, value);

    let fitness = l1_fitness(&genome, &target);
    let per_pixel = fitness / (side * side) as f32;

    println!("\n--- Test: Constant Gray Kronecker Convergence ---");
    println!("  - Target: {side}×{side} constant gray {value:.4}");
    println!("  - Fitness: {fitness} ({per_pixel} per pixel)");
    assert!(
        per_pixel < 1e-4,
        "per-pixel fitness should be ~0, but was {per_pixel}"
    );
    println!("  [PASSED] Constant genome reconstructs the constant target.");
}

#[test]
/// 진화 탐색이 상수 목표에서 초기 세대보다 나은 해를 찾는다.
fn test_evolution_improves_on_constant_target() {
    let config = EvolutionConfig {
        generations: 20,
        ..EvolutionConfig::for_side(16)
    };
    let target = GrayTarget::constant(16, 0.5);

    let mut rng = StdRng::seed_from_u64(7);
    let mut opt = EvolutionaryOptimizer::new(target, config, &mut rng);
    let mut bests = Vec::new();
    let best = opt.run(&mut rng, |report| bests.push(report.best()));

    println!("\n--- Test: Evolution Improves On Constant Target ---");
    println!("  - Generation 0 best: {}", bests[0]);
    println!("  - Final best: {}", bests[bests.len() - 1]);
    assert!(
        bests[bests.len() - 1] <= bests[0],
        "best fitness should not regress"
    );
    assert_eq!(best.side(), 16);
    println!("  [PASSED] Evolution did not regress over 20 generations.");
}

#[test]
/// 소형 이미지에서 학습 루프가 유한한 손실 궤적을 남긴다.
fn test_trainer_smoke_small_image() {
    let image = NormalizedImage::constant(16, 16, 0.25);
    let sampler = BlockSampler::new(&image);
    let mut rng = StdRng::seed_from_u64(7);
    let mut ae = Autoencoder::new(sampler.block_count(), &mut rng);
    sampler.fill_random(ae.set.get_mut("image"), &mut rng);
    sampler.fill_full(ae.set.get_mut("full"));

    let config = TrainConfig {
        iterations: 8,
        ..TrainConfig::default()
    };
    let records = train(&mut ae, &sampler, &config, &mut rng);

    assert_eq!(records.len(), 8);
    for r in &records {
        assert!(r.loss.is_finite() && r.loss >= 0.0);
    }

    let decoded = ae.decode();
    assert_eq!(decoded.len(), 3 * 16 * 16);
}
