//! 크로네커 인수분해 모델
//!
//! 게놈은 2×2 인자 행렬 log2(N)개를 평탄화한 `4·log2(N)`개의 실수다.
//! `factor[0] ⊗ factor[1]`에서 시작해 `factor[k] ⊗ 누적`을 반복하면 N×N
//! 그레이스케일 근사가 나온다. 결과는 [0,1]로 잘라내지 않는다 — 8비트
//! 양자화 전에 호출자가 잘라낸다.

/// 평탄화된 정방 행렬의 표준 크로네커 곱 `a ⊗ b`.
/// 행 우선 기준 출력의 `(x·sb + y, i·sb + j)` 원소가 `a[x,i]·b[y,j]`다.
pub fn kron(a: &[f32], b: &[f32]) -> Vec<f32> {
    let sa = (a.len() as f64).sqrt() as usize;
    let sb = (b.len() as f64).sqrt() as usize;
    debug_assert_eq!(sa * sa, a.len(), "정방 행렬이 아님");
    debug_assert_eq!(sb * sb, b.len(), "정방 행렬이 아님");

    let mut out = Vec::with_capacity(a.len() * b.len());
    for x in 0..sa {
        for y in 0..sb {
            for i in 0..sa {
                for j in 0..sb {
                    out.push(a[x * sa + i] * b[y * sb + j]);
                }
            }
        }
    }
    out
}

/// 게놈을 2×2 인자 열로 해석해 크로네커 곱 사슬을 접는다.
/// 길이 `4·k` 게놈은 한 변 `2^k`의 평탄 행렬을 낸다.
pub fn chain(genome: &[f32]) -> Vec<f32> {
    assert!(!genome.is_empty() && genome.len() % 4 == 0, "게놈 길이는 4의 배수");
    if genome.len() == 4 {
        return genome.to_vec();
    }
    let mut value = kron(&genome[0..4], &genome[4..8]);
    let mut k = 8;
    while k < genome.len() {
        value = kron(&genome[k..k + 4], &value);
        k += 4;
    }
    value
}
