//! KNC (Kronecker-Neural Compression) 실험 라이브러리
//!
//! 두 가지 실험적 정지 영상 압축 전략을 비교한다:
//! 복소수 오토인코더의 경사 하강 학습과, 2×2 인자 행렬의 반복 크로네커 곱에
//! 대한 진화 탐색.

pub mod core;
pub mod pipeline;

// 핵심 타입들 재수출
pub use core::{
    // 파라미터 저장소
    NamedTensor, TensorSet,
    // 계산 그래프
    Graph, NodeId,
    // 블록 샘플러
    BlockSampler, NormalizedImage,
    // 오토인코더 학습
    Autoencoder, TrainConfig, TrainRecord,
    // 크로네커 진화
    EvolutionConfig, EvolutionaryOptimizer, GenerationReport, Genome, GrayTarget,
};
