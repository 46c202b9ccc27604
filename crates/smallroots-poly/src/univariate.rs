//! Integer roots of univariate integer polynomials.
//!
//! Roots are found p-adically: take the squarefree part, pick a small
//! prime that keeps it squarefree, find all roots modulo that prime by
//! exhaustion, and Hensel-lift each one past twice the Cauchy bound.
//! Lifted candidates are verified exactly, so the answer is exact.

use num_traits::{One, Zero};
use smallroots_integers::{Integer, Rational};

/// All distinct integer roots of `a_0 + a_1 x + ... + a_d x^d`, ascending.
///
/// `coeffs` lists the coefficients from degree 0 up. The zero polynomial
/// has every integer as a root and yields an empty list.
#[must_use]
pub fn integer_roots(coeffs: &[Integer]) -> Vec<Integer> {
    let mut f = trim(coeffs.to_vec());
    if f.is_empty() {
        return Vec::new();
    }
    let mut roots = Vec::new();
    let shift = f.iter().take_while(|c| c.is_zero()).count();
    if shift > 0 {
        roots.push(Integer::zero());
        f.drain(..shift);
    }
    if f.len() >= 2 {
        let g = squarefree_part(&f);
        roots.extend(lifted_roots(&g));
    }
    roots.sort();
    roots.dedup();
    roots
}

/// Horner evaluation.
#[must_use]
pub fn evaluate(coeffs: &[Integer], x: &Integer) -> Integer {
    coeffs
        .iter()
        .rev()
        .fold(Integer::zero(), |acc, c| acc * x + c.clone())
}

fn trim<T: Zero>(mut f: Vec<T>) -> Vec<T> {
    while f.last().is_some_and(Zero::is_zero) {
        f.pop();
    }
    f
}

fn derivative(f: &[Integer]) -> Vec<Integer> {
    f.iter()
        .enumerate()
        .skip(1)
        .map(|(i, c)| c * &Integer::from(i))
        .collect()
}

/// `f / gcd(f, f')`, primitive, over ℤ.
fn squarefree_part(f: &[Integer]) -> Vec<Integer> {
    let fq: Vec<Rational> = f.iter().map(Rational::from).collect();
    let dq: Vec<Rational> = derivative(f).iter().map(Rational::from).collect();
    let g = gcd_q(fq.clone(), dq);
    if g.len() <= 1 {
        return primitive(f.to_vec());
    }
    let (q, _) = divrem_q(&fq, &g);
    let (ints, _) = clear_q(&q);
    primitive(ints)
}

fn primitive(f: Vec<Integer>) -> Vec<Integer> {
    let content = f.iter().fold(Integer::zero(), |g, c| g.gcd(c));
    if content.is_zero() || content.is_one() {
        return f;
    }
    f.into_iter()
        .map(|c| c.div_exact(&content).unwrap_or_else(Integer::zero))
        .collect()
}

fn clear_q(f: &[Rational]) -> (Vec<Integer>, Integer) {
    let d = f.iter().fold(Integer::one(), |l, c| l.lcm(&c.denominator()));
    let ints = f
        .iter()
        .map(|c| {
            (c.numerator() * &d)
                .div_exact(&c.denominator())
                .unwrap_or_else(Integer::zero)
        })
        .collect();
    (ints, d)
}

fn divrem_q(a: &[Rational], b: &[Rational]) -> (Vec<Rational>, Vec<Rational>) {
    let mut r = a.to_vec();
    let Some(lead_inv) = b.last().and_then(Rational::inv) else {
        return (Vec::new(), r);
    };
    if r.len() < b.len() {
        return (Vec::new(), r);
    }
    let mut q = vec![Rational::zero(); r.len() - b.len() + 1];
    for k in (0..q.len()).rev() {
        let c = &r[k + b.len() - 1] * &lead_inv;
        if c.is_zero() {
            continue;
        }
        for (j, bj) in b.iter().enumerate() {
            r[k + j] = &r[k + j] - &(&c * bj);
        }
        q[k] = c;
    }
    (q, trim(r))
}

fn gcd_q(mut a: Vec<Rational>, mut b: Vec<Rational>) -> Vec<Rational> {
    a = trim(a);
    b = trim(b);
    while !b.is_empty() {
        let (_, r) = divrem_q(&a, &b);
        a = b;
        b = r;
    }
    a
}

fn small_primes() -> impl Iterator<Item = u64> {
    (3u64..).step_by(2).filter(|&n| {
        let mut d = 3;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 2;
        }
        true
    })
}

fn reduce_u64(f: &[Integer], p: u64) -> Vec<u64> {
    let m = Integer::from(p);
    f.iter()
        .map(|c| c.modulo(&m).to_i64().and_then(|v| u64::try_from(v).ok()).unwrap_or(0))
        .collect()
}

fn mulmod(a: u64, b: u64, p: u64) -> u64 {
    // p < 2^32 in practice, the widening keeps this exact regardless
    u64::try_from(u128::from(a) * u128::from(b) % u128::from(p)).unwrap_or(0)
}

fn powmod(mut a: u64, mut e: u64, p: u64) -> u64 {
    let mut acc = 1 % p;
    while e > 0 {
        if e & 1 == 1 {
            acc = mulmod(acc, a, p);
        }
        a = mulmod(a, a, p);
        e >>= 1;
    }
    acc
}

fn eval_mod(f: &[u64], x: u64, p: u64) -> u64 {
    f.iter().rev().fold(0, |acc, &c| (mulmod(acc, x, p) + c) % p)
}

fn divrem_mod(a: &[u64], b: &[u64], p: u64) -> Vec<u64> {
    let mut r = trim(a.to_vec());
    let b = trim(b.to_vec());
    let Some(&lead) = b.last() else {
        return r;
    };
    let inv = powmod(lead, p - 2, p);
    while r.len() >= b.len() {
        let shift = r.len() - b.len();
        let Some(&top) = r.last() else { break };
        let c = mulmod(top, inv, p);
        for (j, &bj) in b.iter().enumerate() {
            r[shift + j] = (r[shift + j] + p - mulmod(c, bj, p)) % p;
        }
        r = trim(r);
    }
    r
}

fn is_squarefree_mod(f: &[u64], p: u64) -> bool {
    let d: Vec<u64> = f
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| mulmod(c, i as u64 % p, p))
        .collect();
    let (mut a, mut b) = (trim(f.to_vec()), trim(d));
    if b.is_empty() {
        return false;
    }
    while !b.is_empty() {
        let r = divrem_mod(&a, &b, p);
        a = b;
        b = r;
    }
    a.len() == 1
}

/// Roots of a squarefree primitive polynomial with non-zero constant term.
fn lifted_roots(f: &[Integer]) -> Vec<Integer> {
    let Some(lead) = f.last() else {
        return Vec::new();
    };
    let mut chosen = None;
    for p in small_primes() {
        let fp = reduce_u64(f, p);
        if fp.last().copied().unwrap_or(0) == 0 {
            continue;
        }
        if is_squarefree_mod(&fp, p) {
            chosen = Some((p, fp));
            break;
        }
    }
    let Some((p, fp)) = chosen else {
        return Vec::new();
    };

    // roots lie within the Cauchy bound 1 + max|a_i / a_d|
    let height = f.iter().map(Integer::abs).max().unwrap_or_else(Integer::zero);
    let bound = (height.div_floor(&lead.abs()) + Integer::one()) * Integer::new(2);
    let df = derivative(f);

    let mut roots = Vec::new();
    for r0 in (0..p).filter(|&r| eval_mod(&fp, r, p) == 0) {
        let mut modulus = Integer::from(p);
        let mut r = Integer::from(r0);
        while modulus <= bound {
            modulus = &modulus * &modulus;
            let d = evaluate(&df, &r);
            let Some(inv) = d.mod_inverse(&modulus) else {
                break;
            };
            r = (&r - &(evaluate(f, &r) * &inv)).modulo(&modulus);
        }
        let candidate = r.sym_rem(&modulus);
        if evaluate(f, &candidate).is_zero() {
            roots.push(candidate);
        }
    }
    roots
}
