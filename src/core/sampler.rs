//! 블록 샘플러
//!
//! 크롭이 끝난 RGB 버퍼에서 8×8 블록을 뽑아 배치 텐서를 채운다. 블록 하나는
//! 픽셀 행 우선, 픽셀당 r,g,b 순서의 192개 값으로 평탄화되어 텐서의 한 열을
//! 차지한다.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::Rng;

use crate::core::config::{BLOCK_SIZE, NET_WIDTH};
use crate::core::tensor::NamedTensor;

/// [0,1]로 정규화된 RGB 평면 버퍼
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub width: usize,
    pub height: usize,
    /// 길이 `3·width·height`, 픽셀 단위 r,g,b
    pub rgb: Vec<f64>,
}

impl NormalizedImage {
    pub fn new(width: usize, height: usize, rgb: Vec<f64>) -> Self {
        assert_eq!(rgb.len(), 3 * width * height, "RGB 버퍼 길이 불일치");
        Self { width, height, rgb }
    }

    /// 상수 이미지 (테스트용)
    pub fn constant(width: usize, height: usize, value: f64) -> Self {
        Self::new(width, height, vec![value; 3 * width * height])
    }

    fn pixel(&self, x: usize, y: usize) -> (f64, f64, f64) {
        let o = 3 * (y * self.width + x);
        (self.rgb[o], self.rgb[o + 1], self.rgb[o + 2])
    }

    /// 채널 평균 그레이스케일 (진화 경로의 적합도 목표)
    pub fn gray(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let (r, g, b) = self.pixel(x, y);
                out.push(((r + g + b) / 3.0) as f32);
            }
        }
        out
    }
}

/// 블록 정렬된 이미지에서 배치 텐서를 채우는 샘플러
pub struct BlockSampler<'a> {
    image: &'a NormalizedImage,
}

impl<'a> BlockSampler<'a> {
    /// 양 변이 블록 크기의 배수인 이미지만 받는다 (크롭 단계가 보장).
    pub fn new(image: &'a NormalizedImage) -> Self {
        assert_eq!(image.width % BLOCK_SIZE, 0, "폭이 블록 정렬이 아님");
        assert_eq!(image.height % BLOCK_SIZE, 0, "높이가 블록 정렬이 아님");
        Self { image }
    }

    pub fn block_count(&self) -> usize {
        self.image.width * self.image.height / (BLOCK_SIZE * BLOCK_SIZE)
    }

    /// 좌상단 (i, j) 블록을 텐서의 `col` 열에 쓴다.
    fn write_block(&self, tensor: &mut NamedTensor, col: usize, i: usize, j: usize) {
        let cols = tensor.cols;
        let mut k = 0;
        for y in 0..BLOCK_SIZE {
            for x in 0..BLOCK_SIZE {
                let (r, g, b) = self.image.pixel(i + x, j + y);
                tensor.x[k * cols + col] = Complex64 { re: r, im: 0.0 };
                tensor.x[(k + 1) * cols + col] = Complex64 { re: g, im: 0.0 };
                tensor.x[(k + 2) * cols + col] = Complex64 { re: b, im: 0.0 };
                k += 3;
            }
        }
    }

    /// 래스터 순서로 모든 블록을 채운다 ("full" 텐서).
    pub fn fill_full(&self, tensor: &mut NamedTensor) {
        assert_eq!(tensor.rows, NET_WIDTH);
        assert_eq!(tensor.cols, self.block_count());
        let mut col = 0;
        for j in (0..self.image.height).step_by(BLOCK_SIZE) {
            for i in (0..self.image.width).step_by(BLOCK_SIZE) {
                self.write_block(tensor, col, i, j);
                col += 1;
            }
        }
    }

    /// 블록 정렬된 무작위 오프셋에서 열 수만큼 블록을 다시 뽑는다 ("image" 텐서).
    pub fn fill_random(&self, tensor: &mut NamedTensor, rng: &mut StdRng) {
        assert_eq!(tensor.rows, NET_WIDTH);
        let blocks_x = self.image.width / BLOCK_SIZE;
        let blocks_y = self.image.height / BLOCK_SIZE;
        for col in 0..tensor.cols {
            let i = rng.gen_range(0..blocks_x) * BLOCK_SIZE;
            let j = rng.gen_range(0..blocks_y) * BLOCK_SIZE;
            self.write_block(tensor, col, i, j);
        }
    }
}
