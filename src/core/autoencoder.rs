//! 복소수 오토인코더와 경사 학습기
//!
//! 순전파는 두 아핀+비선형 층이다:
//! `encoded = sigmoid(layer1·full + bias1)`,
//! `decoded = |layer2·encoded + bias2|`.
//! 손실은 `(decoded − full)`의 원소별 절댓값 제곱 평균. 최종 복원 패스만
//! 첫 층의 `sigmoid`를 `tanh`로 바꾼다 — 학습 목표와 복원 패스의 의도된
//! 불일치이므로 통일하지 말 것.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::core::config::{TrainConfig, HIDDENS, NET_WIDTH};
use crate::core::graph::Graph;
use crate::core::sampler::BlockSampler;
use crate::core::tensor::TensorSet;

/// 여섯 텐서를 소유한 오토인코더
pub struct Autoencoder {
    pub set: TensorSet,
    /// "full" 텐서의 열 수 = 블록 개수
    pub block_count: usize,
}

impl Autoencoder {
    /// 저장소를 구성하고 가중치를 초기화한다. 편향은 0으로 남는다.
    pub fn new(block_count: usize, rng: &mut StdRng) -> Self {
        let mut set = TensorSet::new();
        set.add_param("layer1", HIDDENS, NET_WIDTH);
        set.add_param("bias1", HIDDENS, 1);
        set.add_param("layer2", NET_WIDTH, HIDDENS);
        set.add_param("bias2", NET_WIDTH, 1);
        set.add_buffer("image", NET_WIDTH, block_count / 8);
        set.add_buffer("full", NET_WIDTH, block_count);

        set.get_mut("layer1").random_init(rng);
        set.get_mut("layer2").random_init(rng);

        Self { set, block_count }
    }

    /// 학습 그래프: sigmoid 은닉층 + 이차 손실 평균 (뿌리는 스칼라 손실)
    fn training_graph(&self) -> Graph {
        let mut g = Graph::new();
        let layer1 = g.param(&self.set, "layer1");
        let bias1 = g.param(&self.set, "bias1");
        let layer2 = g.param(&self.set, "layer2");
        let bias2 = g.param(&self.set, "bias2");
        let full = g.param(&self.set, "full");

        let h = g.matmul(layer1, full);
        let h = g.add_col(h, bias1);
        let encoded = g.sigmoid(h);
        let o = g.matmul(layer2, encoded);
        let o = g.add_col(o, bias2);
        let decoded = g.abs(o);
        let q = g.quadratic(full, decoded);
        g.avg(q);
        g
    }

    /// 복원 그래프: 은닉층만 tanh로 바꾼 순수 추론 패스 (손실 없음)
    fn decode_graph(&self) -> Graph {
        let mut g = Graph::new();
        let layer1 = g.param(&self.set, "layer1");
        let bias1 = g.param(&self.set, "bias1");
        let layer2 = g.param(&self.set, "layer2");
        let bias2 = g.param(&self.set, "bias2");
        let full = g.param(&self.set, "full");

        let h = g.matmul(layer1, full);
        let h = g.add_col(h, bias1);
        let encoded = g.tanh(h);
        let o = g.matmul(layer2, encoded);
        let o = g.add_col(o, bias2);
        g.abs(o);
        g
    }

    /// 학습된 파라미터로 전체 블록을 복원한 실수 버퍼.
    /// 배치 `(NET_WIDTH × block_count)` 모양을 행 우선으로 평탄화한 값이며
    /// 잘라내기(clamp)는 하지 않는다.
    pub fn decode(&self) -> Vec<f64> {
        let mut g = self.decode_graph();
        g.forward(&self.set);
        g.output().iter().map(|v| v.re).collect()
    }

    /// 압축 표현의 추정 크기(비트): 복소 성분당 16비트 기준.
    pub fn coded_size_bits(&self) -> usize {
        (HIDDENS * NET_WIDTH + NET_WIDTH + self.block_count * HIDDENS) * 16
    }
}

/// 반복 한 번의 기록
#[derive(Debug, Clone)]
pub struct TrainRecord {
    pub iteration: usize,
    /// 손실 스칼라의 절댓값
    pub loss: f64,
    pub elapsed: Duration,
}

/// 고정 반복 예산의 학습 루프.
///
/// 매 반복: "image" 텐서 재샘플 → 그래디언트 0 → 순전파/역전파 → 전역 노름
/// 클리핑 → 복소 고정 스텝 갱신. "image" 재샘플은 손실 계산과 구조적으로
/// 끊겨 있지만 원본 동작과의 일치를 위해 유지한다. 진척은 반복마다 stdout에
/// 찍는다.
pub fn train(
    ae: &mut Autoencoder,
    sampler: &BlockSampler,
    config: &TrainConfig,
    rng: &mut StdRng,
) -> Vec<TrainRecord> {
    let mut graph = ae.training_graph();
    let mut records = Vec::with_capacity(config.iterations);

    for iteration in 0..config.iterations {
        let start = Instant::now();

        sampler.fill_random(ae.set.get_mut("image"), rng);
        ae.set.zero_grad();

        let total = graph.forward(&ae.set);
        graph.backward(&mut ae.set);

        let scaling = ae.set.clip_scaling();
        ae.set.apply_gradient_step(config.eta, scaling);

        let loss = total.norm();
        let elapsed = start.elapsed();
        println!("{} {} {:?}", iteration, loss, elapsed);
        records.push(TrainRecord {
            iteration,
            loss,
            elapsed,
        });
    }

    records
}
