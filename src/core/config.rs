//! 실험 상수와 실행 설정
//!
//! 두 루프 모두 수렴 검사 없이 고정 예산으로 종료한다. 예산을 바꾸면 기록된
//! 손실/적합도 궤적의 재현성이 깨지므로 기본값은 그대로 둔다.

use num_complex::Complex64;

/// 픽셀 블록 한 변의 길이
pub const BLOCK_SIZE: usize = 8;
/// 블록 하나의 입력 폭 (RGB 3채널 × 8×8)
pub const NET_WIDTH: usize = 3 * BLOCK_SIZE * BLOCK_SIZE;
/// 은닉 노드 수
pub const HIDDENS: usize = 5;
/// 입력 이미지 축소 비율
pub const SCALE: usize = 1;
/// 크로네커 모드의 크롭 정렬 단위
pub const KRON_ALIGN: usize = 1024;

/// 경사 학습 설정
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// 복소 고정 스텝 크기
    pub eta: Complex64,
    /// 반복 예산
    pub iterations: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            eta: Complex64 { re: 1e-4, im: 1e-4 },
            iterations: 2048,
        }
    }
}

/// 진화 탐색 설정
#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    /// 복원(게놈) 한 변 (2의 거듭제곱). 적합도 창 크기는 목표 쪽이 정한다.
    pub side: usize,
    /// 세대 시작 시 개체 수
    pub population: usize,
    /// 선택 단계 후 생존 개체 수
    pub survivors: usize,
    /// 교차 부모를 뽑는 상위 구간 크기
    pub parents: usize,
    /// 세대 예산
    pub generations: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            side: KRON_ALIGN,
            population: 128,
            survivors: 32,
            parents: 10,
            generations: 256,
        }
    }
}

impl EvolutionConfig {
    /// 복원 한 변만 바꾼 설정 (테스트용 소형 목표 포함)
    pub fn for_side(side: usize) -> Self {
        assert!(side.is_power_of_two(), "한 변은 2의 거듭제곱이어야 함: {side}");
        Self {
            side,
            ..Self::default()
        }
    }

    /// 크롭된 이미지 폭에서 복원 한 변을 유도한 설정.
    /// 게놈 인자 수는 폭의 정수 log2이므로 복원 한 변은 폭 이하의 가장 큰
    /// 2의 거듭제곱이다.
    pub fn for_width(width: usize) -> Self {
        assert!(width > 0, "폭은 0보다 커야 함");
        Self::for_side(1usize << width.ilog2())
    }

    /// 게놈이 담는 2×2 인자 개수 = log2(side)
    pub fn factor_count(&self) -> usize {
        self.side.trailing_zeros() as usize
    }

    /// 게놈 길이 = 4·log2(side)
    pub fn genome_len(&self) -> usize {
        4 * self.factor_count()
    }
}
