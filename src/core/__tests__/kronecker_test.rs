use approx::assert_relative_eq;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::kronecker::{chain, kron};

#[test]
fn 단위행렬_크로네커_곱_테스트() {
    // I₂ ⊗ B는 B를 대각에 두 번 놓은 블록 대각 행렬이다
    let a = [1.0, 0.0, 0.0, 1.0];
    let b = [5.0, 6.0, 7.0, 8.0];
    let out = kron(&a, &b);
    #[rustfmt::skip]
    let expected = [
        5.0, 6.0, 0.0, 0.0,
        7.0, 8.0, 0.0, 0.0,
        0.0, 0.0, 5.0, 6.0,
        0.0, 0.0, 7.0, 8.0,
    ];
    assert_eq!(out, expected);
}

#[test]
fn nalgebra_교차_검증_테스트() {
    let mut rng = StdRng::seed_from_u64(21);
    let a: Vec<f32> = (0..4).map(|_| rng.gen_range(-2.0..2.0)).collect();
    let b: Vec<f32> = (0..16).map(|_| rng.gen_range(-2.0..2.0)).collect();

    let out = kron(&a, &b);

    let ma = DMatrix::from_row_slice(2, 2, &a);
    let mb = DMatrix::from_row_slice(4, 4, &b);
    let reference = ma.kronecker(&mb);
    for i in 0..8 {
        for j in 0..8 {
            assert_relative_eq!(out[i * 8 + j], reference[(i, j)], epsilon = 1e-6);
        }
    }
}

#[test]
fn 사슬_크기_테스트() {
    let mut rng = StdRng::seed_from_u64(5);
    for factors in 1..=5usize {
        let genome: Vec<f32> = (0..4 * factors).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let out = chain(&genome);
        let side = 1usize << factors;
        assert_eq!(out.len(), side * side, "인자 {factors}개");
    }
}

#[test]
fn 사슬_접기_순서_테스트() {
    // chain은 f0⊗f1 다음 f2⊗(f0⊗f1) 순서로 접는다
    let f0 = [1.0, 2.0, 3.0, 4.0];
    let f1 = [0.5, 0.0, 0.0, 0.5];
    let f2 = [2.0, 0.0, 0.0, 2.0];
    let genome: Vec<f32> = [f0, f1, f2].concat();

    let manual = kron(&f2, &kron(&f0, &f1));
    assert_eq!(chain(&genome), manual);
}

#[test]
fn 상수_인자_상수_이미지_테스트() {
    // 모든 인자가 상수 c이면 펼친 이미지는 상수 c^k다
    let c = 0.5f32.powf(0.25);
    let genome = vec![c; 16];
    let out = chain(&genome);
    for v in out {
        assert_relative_eq!(v, 0.5, epsilon = 1e-5);
    }
}
