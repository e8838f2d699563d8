//! 이름 붙은 복소 텐서와 파라미터 저장소
//!
//! 학습 중 존재하는 여섯 텐서(가중치 2, 편향 2, 배치 2)를 한 저장소가 소유한다.
//! 값 버퍼와 같은 모양의 그래디언트 버퍼를 항상 쌍으로 유지한다.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::Rng;

/// `(rows, cols)` 모양의 복소 텐서. 행 우선(row-major) 평탄 배열로 저장한다.
#[derive(Debug, Clone)]
pub struct NamedTensor {
    pub name: &'static str,
    pub rows: usize,
    pub cols: usize,
    /// 값 버퍼
    pub x: Vec<Complex64>,
    /// 그래디언트 누적 버퍼
    pub d: Vec<Complex64>,
    /// 갱신 대상 여부. 배치 텐서는 재샘플만 되고 갱신되지 않는다.
    pub trainable: bool,
}

impl NamedTensor {
    fn zeros(name: &'static str, rows: usize, cols: usize, trainable: bool) -> Self {
        let zero = Complex64 { re: 0.0, im: 0.0 };
        Self {
            name,
            rows,
            cols,
            x: vec![zero; rows * cols],
            d: vec![zero; rows * cols],
            trainable,
        }
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn at(&self, i: usize, j: usize) -> Complex64 {
        self.x[i * self.cols + j]
    }

    pub fn zero_grad(&mut self) {
        for d in self.d.iter_mut() {
            *d = Complex64 { re: 0.0, im: 0.0 };
        }
    }

    /// 실부·허부를 (-1, 1) 균등분포에서 뽑아 `1/sqrt(cols)`로 줄인다 (fan-in 스케일).
    pub fn random_init(&mut self, rng: &mut StdRng) {
        let scale = 1.0 / (self.cols as f64).sqrt();
        for x in self.x.iter_mut() {
            *x = Complex64 {
                re: rng.gen_range(-1.0..1.0) * scale,
                im: rng.gen_range(-1.0..1.0) * scale,
            };
        }
    }
}

/// 파라미터 저장소. 텐서는 추가된 순서를 유지하며 이름으로 조회한다.
#[derive(Debug, Clone, Default)]
pub struct TensorSet {
    pub tensors: Vec<NamedTensor>,
}

impl TensorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 학습 대상 텐서 추가 (가중치/편향)
    pub fn add_param(&mut self, name: &'static str, rows: usize, cols: usize) {
        self.tensors.push(NamedTensor::zeros(name, rows, cols, true));
    }

    /// 비학습 배치 텐서 추가
    pub fn add_buffer(&mut self, name: &'static str, rows: usize, cols: usize) {
        self.tensors.push(NamedTensor::zeros(name, rows, cols, false));
    }

    pub fn index_of(&self, name: &str) -> usize {
        self.tensors
            .iter()
            .position(|t| t.name == name)
            .unwrap_or_else(|| panic!("등록되지 않은 텐서: {name}"))
    }

    pub fn get(&self, name: &str) -> &NamedTensor {
        &self.tensors[self.index_of(name)]
    }

    pub fn get_mut(&mut self, name: &str) -> &mut NamedTensor {
        let idx = self.index_of(name);
        &mut self.tensors[idx]
    }

    pub fn zero_grad(&mut self) {
        for t in self.tensors.iter_mut() {
            t.zero_grad();
        }
    }

    /// 학습 대상 그래디언트 전체를 이어붙인 벡터의 유클리드 노름.
    /// 복소 성분 하나가 기여하는 양은 그 절댓값이다.
    pub fn grad_norm(&self) -> f64 {
        let mut sum = 0.0;
        for t in self.tensors.iter().filter(|t| t.trainable) {
            for d in t.d.iter() {
                sum += d.norm() * d.norm();
            }
        }
        sum.sqrt()
    }

    /// 전역 클리핑 배율. 노름이 1 이하이면 그대로 둔다(영 노름 포함).
    pub fn clip_scaling(&self) -> f64 {
        let norm = self.grad_norm();
        if norm > 1.0 {
            1.0 / norm
        } else {
            1.0
        }
    }

    /// 학습 대상 텐서에 `x -= eta · d · scaling`을 적용한다.
    pub fn apply_gradient_step(&mut self, eta: Complex64, scaling: f64) {
        for t in self.tensors.iter_mut().filter(|t| t.trainable) {
            for (x, d) in t.x.iter_mut().zip(t.d.iter()) {
                *x -= eta * d * scaling;
            }
        }
    }
}
