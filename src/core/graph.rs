//! 복소수 자동미분 그래프
//!
//! 연산 노드를 생성 순서대로 아레나에 쌓고, 순전파는 그 순서대로, 역전파는
//! 역순으로 진행한다. 각 노드는 복소 값 버퍼와 수반(adjoint) 버퍼를 가진다.
//! 파라미터 노드의 수반은 역전파가 끝날 때 저장소의 그래디언트 버퍼로
//! 누적된다.
//!
//! 수반 규칙은 홀로모픽 연산에는 통상의 연쇄 법칙을, `abs`와 이차 손실에는
//! Wirtinger 공역 그래디언트를 쓴다. 절댓값 노드의 영점에서는 수반을 0으로
//! 둔다.

use num_complex::Complex64;

use crate::core::tensor::TensorSet;

pub type NodeId = usize;

const ZERO: Complex64 = Complex64 { re: 0.0, im: 0.0 };
const ONE: Complex64 = Complex64 { re: 1.0, im: 0.0 };

#[derive(Debug, Clone, Copy)]
enum Op {
    /// 저장소 텐서 참조 (TensorSet 인덱스)
    Param(usize),
    /// 행렬곱 `(r×k)·(k×c)`
    MatMul(NodeId, NodeId),
    /// 열 브로드캐스트 덧셈: `(r×c) + (r×1)`
    AddCol(NodeId, NodeId),
    Sigmoid(NodeId),
    Tanh(NodeId),
    /// 원소별 복소 절댓값 (실수 값 노드가 된다)
    Abs(NodeId),
    /// 원소별 `|a − b|²`
    Quadratic(NodeId, NodeId),
    /// 전체 평균 (스칼라 노드)
    Avg(NodeId),
}

#[derive(Debug, Clone)]
struct Node {
    op: Op,
    rows: usize,
    cols: usize,
    x: Vec<Complex64>,
    d: Vec<Complex64>,
}

/// 자동미분 아레나. 한 번 구성한 그래프를 매 반복 재평가한다.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, op: Op, rows: usize, cols: usize) -> NodeId {
        self.nodes.push(Node {
            op,
            rows,
            cols,
            x: vec![ZERO; rows * cols],
            d: vec![ZERO; rows * cols],
        });
        self.nodes.len() - 1
    }

    /// 저장소 텐서를 그래프에 끌어온다. 모양은 구성 시점에 고정된다.
    pub fn param(&mut self, set: &TensorSet, name: &str) -> NodeId {
        let idx = set.index_of(name);
        let t = &set.tensors[idx];
        self.push(Op::Param(idx), t.rows, t.cols)
    }

    pub fn matmul(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let (ar, ac) = self.shape(a);
        let (br, bc) = self.shape(b);
        assert_eq!(ac, br, "행렬곱 모양 불일치: {ar}×{ac} · {br}×{bc}");
        self.push(Op::MatMul(a, b), ar, bc)
    }

    pub fn add_col(&mut self, a: NodeId, bias: NodeId) -> NodeId {
        let (ar, ac) = self.shape(a);
        let (br, bc) = self.shape(bias);
        assert_eq!((br, bc), (ar, 1), "편향 모양 불일치: {br}×{bc}, 기대 {ar}×1");
        self.push(Op::AddCol(a, bias), ar, ac)
    }

    pub fn sigmoid(&mut self, a: NodeId) -> NodeId {
        let (r, c) = self.shape(a);
        self.push(Op::Sigmoid(a), r, c)
    }

    pub fn tanh(&mut self, a: NodeId) -> NodeId {
        let (r, c) = self.shape(a);
        self.push(Op::Tanh(a), r, c)
    }

    pub fn abs(&mut self, a: NodeId) -> NodeId {
        let (r, c) = self.shape(a);
        self.push(Op::Abs(a), r, c)
    }

    pub fn quadratic(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let sa = self.shape(a);
        let sb = self.shape(b);
        assert_eq!(sa, sb, "이차 손실 모양 불일치");
        self.push(Op::Quadratic(a, b), sa.0, sa.1)
    }

    pub fn avg(&mut self, a: NodeId) -> NodeId {
        self.push(Op::Avg(a), 1, 1)
    }

    fn shape(&self, id: NodeId) -> (usize, usize) {
        (self.nodes[id].rows, self.nodes[id].cols)
    }

    /// 노드의 현재 값 버퍼
    pub fn value(&self, id: NodeId) -> &[Complex64] {
        &self.nodes[id].x
    }

    /// 마지막(뿌리) 노드의 값 버퍼
    pub fn output(&self) -> &[Complex64] {
        &self.nodes.last().expect("빈 그래프").x
    }

    /// 생성 순서대로 전체 순전파를 수행하고 마지막 노드의 첫 원소를 돌려준다.
    pub fn forward(&mut self, set: &TensorSet) -> Complex64 {
        for idx in 0..self.nodes.len() {
            self.eval(idx, set);
        }
        self.nodes
            .last()
            .map(|n| n.x[0])
            .unwrap_or(ZERO)
    }

    fn eval(&mut self, idx: NodeId, set: &TensorSet) {
        // 입력 노드는 항상 idx보다 앞서므로 분할 차용으로 값을 읽는다
        let (done, rest) = self.nodes.split_at_mut(idx);
        let node = &mut rest[0];
        let rows = node.rows;
        let cols = node.cols;
        match node.op {
            Op::Param(t) => {
                node.x.copy_from_slice(&set.tensors[t].x);
            }
            Op::MatMul(a, b) => {
                let inner = done[a].cols;
                for i in 0..rows {
                    for j in 0..cols {
                        let mut acc = ZERO;
                        for l in 0..inner {
                            acc += done[a].x[i * inner + l] * done[b].x[l * cols + j];
                        }
                        node.x[i * cols + j] = acc;
                    }
                }
            }
            Op::AddCol(a, bias) => {
                for i in 0..rows {
                    for j in 0..cols {
                        node.x[i * cols + j] = done[a].x[i * cols + j] + done[bias].x[i];
                    }
                }
            }
            Op::Sigmoid(a) => {
                for (out, z) in node.x.iter_mut().zip(done[a].x.iter()) {
                    *out = ONE / (ONE + (-z).exp());
                }
            }
            Op::Tanh(a) => {
                for (out, z) in node.x.iter_mut().zip(done[a].x.iter()) {
                    *out = z.tanh();
                }
            }
            Op::Abs(a) => {
                for (out, z) in node.x.iter_mut().zip(done[a].x.iter()) {
                    *out = Complex64 { re: z.norm(), im: 0.0 };
                }
            }
            Op::Quadratic(a, b) => {
                for k in 0..rows * cols {
                    let diff = done[a].x[k] - done[b].x[k];
                    node.x[k] = Complex64 { re: diff.norm_sqr(), im: 0.0 };
                }
            }
            Op::Avg(a) => {
                let mut acc = ZERO;
                for v in done[a].x.iter() {
                    acc += *v;
                }
                node.x[0] = acc / done[a].x.len() as f64;
            }
        }
    }

    /// 마지막 노드를 뿌리로 역전파하고 파라미터 수반을 저장소 그래디언트에
    /// 누적한다. `forward` 직후에 호출해야 한다.
    pub fn backward(&mut self, set: &mut TensorSet) {
        for node in self.nodes.iter_mut() {
            for d in node.d.iter_mut() {
                *d = ZERO;
            }
        }
        if let Some(root) = self.nodes.last_mut() {
            root.d[0] = ONE;
        }
        for idx in (0..self.nodes.len()).rev() {
            self.propagate(idx, set);
        }
    }

    fn propagate(&mut self, idx: NodeId, set: &mut TensorSet) {
        let (done, rest) = self.nodes.split_at_mut(idx);
        let node = &rest[0];
        let rows = node.rows;
        let cols = node.cols;
        match node.op {
            Op::Param(t) => {
                for (dst, d) in set.tensors[t].d.iter_mut().zip(node.d.iter()) {
                    *dst += *d;
                }
            }
            Op::MatMul(a, b) => {
                let inner = done[a].cols;
                for i in 0..rows {
                    for j in 0..cols {
                        let g = node.d[i * cols + j];
                        for l in 0..inner {
                            let av = done[a].x[i * inner + l];
                            let bv = done[b].x[l * cols + j];
                            done[a].d[i * inner + l] += g * bv;
                            done[b].d[l * cols + j] += av * g;
                        }
                    }
                }
            }
            Op::AddCol(a, bias) => {
                for i in 0..rows {
                    for j in 0..cols {
                        let g = node.d[i * cols + j];
                        done[a].d[i * cols + j] += g;
                        done[bias].d[i] += g;
                    }
                }
            }
            Op::Sigmoid(a) => {
                for k in 0..rows * cols {
                    let s = node.x[k];
                    done[a].d[k] += node.d[k] * s * (ONE - s);
                }
            }
            Op::Tanh(a) => {
                for k in 0..rows * cols {
                    let t = node.x[k];
                    done[a].d[k] += node.d[k] * (ONE - t * t);
                }
            }
            Op::Abs(a) => {
                for k in 0..rows * cols {
                    let z = done[a].x[k];
                    let m = z.norm();
                    if m > 0.0 {
                        done[a].d[k] += node.d[k] * (z / m);
                    }
                }
            }
            Op::Quadratic(a, b) => {
                for k in 0..rows * cols {
                    let diff = done[a].x[k] - done[b].x[k];
                    done[a].d[k] += node.d[k] * diff;
                    done[b].d[k] -= node.d[k] * diff;
                }
            }
            Op::Avg(a) => {
                let g = node.d[0] / done[a].x.len() as f64;
                for d in done[a].d.iter_mut() {
                    *d += g;
                }
            }
        }
    }
}
