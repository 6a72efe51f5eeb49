//! Text embeddings for the similarity collection
//!
//! The default backend is a harmonic token projection: every word token is
//! read as an integer built from its code points, reduced modulo a list of
//! primes, and each residue is placed on the unit circle. Token vectors are
//! mean-pooled and L2-normalized. It needs no model file and is fully
//! deterministic, so shared words between a query and a document dominate
//! the similarity.

use std::f64::consts::PI;

/// Embedding dimension (two components per prime modulus)
pub const EMBEDDING_DIM: usize = 384;

/// Only the last code points of long tokens survive the base-2^16 fold
const MAX_TOKEN_CHARS: usize = 64;

/// Turns text into fixed-size vectors
pub trait Embedder {
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Deterministic, training-free embedder
#[derive(Debug, Clone)]
pub struct HarmonicEmbedder {
    moduli: Vec<u64>,
}

impl HarmonicEmbedder {
    pub fn new() -> Self {
        Self::with_dimension(EMBEDDING_DIM)
    }

    /// `dimension` is rounded down to an even number
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            moduli: first_primes(dimension / 2),
        }
    }

    fn project_token(&self, token: &str, acc: &mut [f64]) {
        let n = token
            .chars()
            .take(MAX_TOKEN_CHARS)
            .fold(0u64, |n, c| n.wrapping_mul(1 << 16).wrapping_add(c as u64));

        for (i, &m) in self.moduli.iter().enumerate() {
            let theta = 2.0 * PI * (n % m) as f64 / m as f64;
            acc[2 * i] += theta.sin();
            acc[2 * i + 1] += theta.cos();
        }
    }
}

impl Default for HarmonicEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HarmonicEmbedder {
    fn dimension(&self) -> usize {
        self.moduli.len() * 2
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut acc = vec![0.0f64; self.dimension()];
        let tokens = tokenize(text);

        for token in &tokens {
            self.project_token(token, &mut acc);
        }
        if !tokens.is_empty() {
            let count = tokens.len() as f64;
            acc.iter_mut().for_each(|v| *v /= count);
        }

        let norm = acc.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            acc.iter().map(|v| (v / norm) as f32).collect()
        } else {
            acc.iter().map(|v| *v as f32).collect()
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation()
}

/// Lowercase word tokens split on whitespace and ASCII punctuation
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(is_separator)
        .filter_map(|word| (!word.is_empty()).then(|| word.to_lowercase()))
        .collect()
}

/// Cosine similarity, 0.0 for mismatched lengths or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (dot, aa, bb) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, aa, bb), (x, y)| {
            (dot + x * y, aa + x * x, bb + y * y)
        });
    let denom = (aa * bb).sqrt();

    if denom > 0.0 {
        dot / denom
    } else {
        0.0
    }
}

fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2u64;
    while primes.len() < count {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}
