//! # KNC 핵심 모듈
//!
//! 압축 실험의 수치 코어: 복소 텐서 저장소, 자동미분 그래프, 블록 샘플러,
//! 경사 학습기, 크로네커 인수분해 모델, 진화 최적화기.

pub mod autoencoder;
pub mod config;
pub mod evolution;
pub mod graph;
pub mod kronecker;
pub mod sampler;
pub mod tensor;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use autoencoder::{train, Autoencoder, TrainRecord};
pub use config::{EvolutionConfig, TrainConfig};
pub use evolution::{EvolutionaryOptimizer, GenerationReport, Genome, GrayTarget};
pub use graph::{Graph, NodeId};
pub use kronecker::{chain, kron};
pub use sampler::{BlockSampler, NormalizedImage};
pub use tensor::{NamedTensor, TensorSet};
