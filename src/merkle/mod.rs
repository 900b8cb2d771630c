//! Ordered Merkle tree with MiMC compression, `L2a` of the SNARK
//! construction.
//!
//! Ported from `original_source/PMS/zkSNARKs/S3CrossMiMC/orderedMerkleTree.go`.
//! Leaves are kept sorted; absence of a value `x` is witnessed by the unique
//! adjacent pair `(leaves[k], leaves[k+1])` straddling it, rather than by an
//! explicit exclusion proof over the whole tree — the circuit only re-walks
//! `leaves[k]`'s inclusion path and trusts the caller-supplied `leaves[k+1]`
//! as the true successor (see `spec.md` §4.9; this asymmetry is the source's
//! actual design, not one of the two documented bugs, so it is carried over
//! unchanged).

pub mod error;

use crate::curve::Scalar;
use crate::mimc;
use error::MerkleError;

/// Default tree depth carried over from `original_source`'s `TreeDepth`
/// constant, overridable as a policy parameter (`spec.md` §9 open question
/// 4's reasoning extends to tree depth as well).
pub const DEFAULT_TREE_DEPTH: usize = 30;

/// The sentinel value hashed at the tree's leaf level whenever a position
/// has no real leaf. It is *not* a valid canonical field element — it is the
/// field modulus' own big-endian byte encoding, reduced mod `r` (to `0`) only
/// at the point MiMC actually absorbs it. Kept as a raw byte constant here so
/// the "not a field element" property of the source is visible at the type
/// level before any hashing happens.
pub fn sentinel_leaf_bytes() -> Vec<u8> {
    // BN254 Fr modulus, big-endian, 32 bytes.
    const R_HEX: &str = "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001";
    hex_to_bytes(R_HEX)
}

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("valid hex constant"))
        .collect()
}

fn default_levels(depth: usize) -> Vec<Scalar> {
    let mut levels = Vec::with_capacity(depth);
    let mut prev = mimc::scalar_from_bytes_mod_order(&sentinel_leaf_bytes());
    levels.push(prev);
    for _ in 1..depth {
        prev = mimc::compress(prev, prev);
        levels.push(prev);
    }
    levels
}

/// A built ordered Merkle tree: `nodes[level][index]`, `level=0` is the leaf
/// row (already sorted ascending by the caller).
pub struct MerkleTree {
    depth: usize,
    defaults: Vec<Scalar>,
    nodes: Vec<Vec<Scalar>>,
}

impl MerkleTree {
    /// Build a tree over `leaves` (already sorted ascending, including the
    /// `0` and `r` sentinels bracketing the real values) at depth `depth`.
    pub fn build(leaves: Vec<Scalar>, depth: usize) -> Self {
        let defaults = default_levels(depth);
        let mut nodes = Vec::with_capacity(depth + 1);
        nodes.push(leaves);

        for level in 0..depth {
            let current = &nodes[level];
            let next_size = current.len().div_ceil(2);
            let mut next = Vec::with_capacity(next_size);
            for i in 0..next_size {
                let left = current
                    .get(2 * i)
                    .copied()
                    .unwrap_or(defaults[level]);
                let right = current.get(2 * i + 1).copied().unwrap_or(defaults[level]);
                next.push(mimc::compress(left, right));
            }
            nodes.push(next);
        }

        Self {
            depth,
            defaults,
            nodes,
        }
    }

    pub fn root(&self) -> Scalar {
        self.nodes[self.depth]
            .first()
            .copied()
            .unwrap_or(self.defaults[self.depth - 1])
    }

    fn sibling_path(&self, leaf_index: usize) -> Vec<Scalar> {
        let mut proof = Vec::with_capacity(self.depth);
        let mut index = leaf_index;
        for level in 0..self.depth {
            let sibling_index = index ^ 1;
            let sibling = self.nodes[level]
                .get(sibling_index)
                .copied()
                .unwrap_or(self.defaults[level]);
            proof.push(sibling);
            index /= 2;
        }
        proof
    }

    /// Produce a non-membership witness for `x`: the adjacent pair
    /// straddling it plus the inclusion path of the lower neighbor.
    pub fn non_membership_proof(&self, x: Scalar) -> Result<NonMembershipProof, MerkleError> {
        let leaves = &self.nodes[0];
        for k in 0..leaves.len().saturating_sub(1) {
            if leaves[k] == x {
                return Err(MerkleError::ValueIsMember);
            }
            if leaves[k] < x && x < leaves[k + 1] {
                return Ok(NonMembershipProof {
                    root: self.root(),
                    siblings: self.sibling_path(k),
                    index: k,
                    leaf1: leaves[k],
                    leaf2: leaves[k + 1],
                });
            }
        }
        Err(MerkleError::MissingSentinel)
    }
}

/// A non-membership witness: `leaf1 < x < leaf2`, with `leaf1`'s inclusion
/// path up to `root`.
#[derive(Clone, Debug)]
pub struct NonMembershipProof {
    pub root: Scalar,
    pub siblings: Vec<Scalar>,
    pub index: usize,
    pub leaf1: Scalar,
    pub leaf2: Scalar,
}

/// Re-walk `leaf1` up `siblings` and check the result equals `root`.
pub fn verify_inclusion(proof: &NonMembershipProof) -> Result<(), MerkleError> {
    let mut index = proof.index;
    let mut hash = proof.leaf1;
    for sibling in &proof.siblings {
        hash = if index % 2 == 0 {
            mimc::compress(hash, *sibling)
        } else {
            mimc::compress(*sibling, hash)
        };
        index /= 2;
    }
    if hash != proof.root {
        return Err(MerkleError::VerificationFailed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_leaves_with_sentinels(values: &[u64]) -> Vec<Scalar> {
        let mut leaves: Vec<Scalar> = values.iter().map(|&v| Scalar::from(v)).collect();
        leaves.push(Scalar::from(0u64));
        let r_bytes = sentinel_leaf_bytes();
        leaves.push(mimc::scalar_from_bytes_mod_order(&r_bytes));
        leaves.sort();
        leaves.dedup();
        leaves
    }

    #[test]
    fn non_membership_witness_verifies() {
        let leaves = sorted_leaves_with_sentinels(&[10, 20, 30, 40]);
        let tree = MerkleTree::build(leaves, 8);
        let proof = tree.non_membership_proof(Scalar::from(25u64)).unwrap();
        assert_eq!(proof.leaf1, Scalar::from(20u64));
        assert_eq!(proof.leaf2, Scalar::from(30u64));
        assert!(verify_inclusion(&proof).is_ok());
    }

    #[test]
    fn membership_is_rejected() {
        let leaves = sorted_leaves_with_sentinels(&[10, 20, 30, 40]);
        let tree = MerkleTree::build(leaves, 8);
        assert!(matches!(
            tree.non_membership_proof(Scalar::from(20u64)),
            Err(MerkleError::ValueIsMember)
        ));
    }

    #[test]
    fn tampered_sibling_breaks_verification() {
        let leaves = sorted_leaves_with_sentinels(&[10, 20, 30, 40]);
        let tree = MerkleTree::build(leaves, 8);
        let mut proof = tree.non_membership_proof(Scalar::from(25u64)).unwrap();
        proof.siblings[0] += Scalar::from(1u64);
        assert!(verify_inclusion(&proof).is_err());
    }
}
