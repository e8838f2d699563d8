//! 크로네커 게놈의 진화 최적화기
//!
//! 개체군 128, 생존 32, 부모는 상위 10에서 추첨, 세대 예산 256.
//! 적합도 평가는 rayon 워커 풀에서 게놈별로 독립 수행하고, 선택/증식은
//! 평가가 전부 끝난 뒤(배리어) 순차로 진행한다. 무작위 추첨은 전부 배리어
//! 바깥의 단일 시드 RNG에서 나오므로 추첨 열은 시드에 대해 결정적이다.

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::EvolutionConfig;
use crate::core::kronecker::chain;

/// 후보 해: 평탄화된 2×2 인자 열과 L1 적합도 (낮을수록 좋음)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    pub genes: Vec<f32>,
    /// 평가 전에는 0
    pub fitness: f32,
}

impl Genome {
    /// 표준정규분포에서 뽑은 무작위 게놈
    pub fn random(len: usize, rng: &mut StdRng) -> Self {
        let genes = (0..len).map(|_| rng.sample(StandardNormal)).collect();
        Self { genes, fitness: 0.0 }
    }

    /// 크로네커 사슬을 펼친 한 변 `2^(len/4)`의 평탄 버퍼
    pub fn decode(&self) -> Vec<f32> {
        chain(&self.genes)
    }

    /// 복원 이미지의 한 변
    pub fn side(&self) -> usize {
        1 << (self.genes.len() / 4)
    }
}

/// 그레이스케일 적합도 목표
#[derive(Debug, Clone)]
pub struct GrayTarget {
    pub side: usize,
    /// 길이 `side²`, [0,1] 정규화 밝기
    pub pixels: Vec<f32>,
}

impl GrayTarget {
    pub fn new(side: usize, pixels: Vec<f32>) -> Self {
        assert!(side.is_power_of_two(), "목표 한 변은 2의 거듭제곱: {side}");
        assert_eq!(pixels.len(), side * side, "목표 버퍼 길이 불일치");
        Self { side, pixels }
    }

    /// 상수 밝기 목표 (테스트용)
    pub fn constant(side: usize, value: f32) -> Self {
        Self::new(side, vec![value; side * side])
    }
}

/// 복원과 목표의 픽셀별 절대 오차 합.
/// 복원의 한 변이 목표보다 커도 좌상단 창만 읽는다.
pub fn l1_fitness(genome: &Genome, target: &GrayTarget) -> f32 {
    let decoded = genome.decode();
    let stride = genome.side();
    assert!(stride >= target.side, "게놈 한 변이 목표보다 작음");
    let mut sum = 0.0f32;
    for y in 0..target.side {
        for x in 0..target.side {
            let diff = decoded[y * stride + x] - target.pixels[y * target.side + x];
            sum += diff.abs();
        }
    }
    sum
}

/// 한 세대의 선택 단계 요약
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub generation: usize,
    /// 상위 10개의 픽셀당 평균 적합도 (오름차순)
    pub top: Vec<f32>,
}

impl GenerationReport {
    pub fn best(&self) -> f32 {
        self.top[0]
    }
}

/// 개체군과 세대 카운터를 소유한 최적화기
pub struct EvolutionaryOptimizer {
    config: EvolutionConfig,
    target: GrayTarget,
    population: Vec<Genome>,
    generation: usize,
}

impl EvolutionaryOptimizer {
    pub fn new(target: GrayTarget, config: EvolutionConfig, rng: &mut StdRng) -> Self {
        // 복원 한 변은 목표 창보다 작을 수 없다. 더 크면 좌상단 창만 평가된다.
        assert!(
            config.side >= target.side,
            "복원 한 변 {}이 목표 창 {}보다 작음",
            config.side,
            target.side
        );
        let len = config.genome_len();
        let population = (0..config.population)
            .map(|_| Genome::random(len, rng))
            .collect();
        Self {
            config,
            target,
            population,
            generation: 0,
        }
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// 모든 게놈의 적합도를 병렬로 채운다. 각 워커는 자기 게놈의 적합도
    /// 슬롯에만 쓰며, 반환 시점이 곧 동기화 배리어다. 평가 중에는 개체군을
    /// 늘리거나 재정렬하지 않는다.
    pub(crate) fn evaluate(&mut self) {
        let target = &self.target;
        self.population
            .par_iter_mut()
            .for_each(|g| g.fitness = l1_fitness(g, target));
    }

    /// 오름차순 정렬 후 상위 10개 요약. 적합도는 유한 합이라 NaN이 없다.
    pub(crate) fn select(&mut self) -> GenerationReport {
        self.population
            .sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        let area = (self.target.side * self.target.side) as f32;
        let top = self
            .population
            .iter()
            .take(self.config.parents)
            .map(|g| g.fitness / area)
            .collect();
        GenerationReport {
            generation: self.generation,
            top,
        }
    }

    /// 잘린 생존자 32를 128로 되채운다. 생존자 `i`마다: 상위 10에서 부모
    /// `x, y`를 뽑아 깊은 복사 후 독립적으로 뽑은 위치의 유전자 하나를
    /// 맞교환한 교차 자식 둘, 그리고 `i` 자신의 복사본에서 유전자 하나를
    /// 표준정규 섭동한 변이 자식 하나를 덧붙인다. 32 + 32·3 = 128.
    /// 선택: 개체군을 생존자 수로 자른다.
    pub(crate) fn truncate(&mut self) {
        self.population.truncate(self.config.survivors);
    }

    pub(crate) fn reproduce(&mut self, rng: &mut StdRng) {
        debug_assert_eq!(self.population.len(), self.config.survivors);
        for i in 0..self.config.survivors {
            let x = rng.gen_range(0..self.config.parents);
            let y = rng.gen_range(0..self.config.parents);
            let mut child_x = self.population[x].clone();
            let mut child_y = self.population[y].clone();
            child_x.fitness = 0.0;
            child_y.fitness = 0.0;

            let a = rng.gen_range(0..child_y.genes.len());
            let b = rng.gen_range(0..child_x.genes.len());
            std::mem::swap(&mut child_y.genes[a], &mut child_x.genes[b]);
            self.population.push(child_x);
            self.population.push(child_y);

            let mut mutant = self.population[i].clone();
            mutant.fitness = 0.0;
            let k = rng.gen_range(0..mutant.genes.len());
            let delta: f32 = rng.sample(StandardNormal);
            mutant.genes[k] += delta;
            self.population.push(mutant);
        }
        self.generation += 1;
    }

    /// 세대 예산까지 돌리고 최종 최상위 게놈을 돌려준다.
    /// 세대마다 선택 직후 요약을 콜백으로 넘기되, 종료 세대는 보고 없이
    /// 결과만 돌려준다.
    pub fn run(
        &mut self,
        rng: &mut StdRng,
        mut on_generation: impl FnMut(&GenerationReport),
    ) -> Genome {
        loop {
            self.evaluate();
            let report = self.select();
            if self.generation >= self.config.generations {
                return self.population[0].clone();
            }
            on_generation(&report);
            self.truncate();
            self.reproduce(rng);
        }
    }
}
