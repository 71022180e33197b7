//! Module invariants, checked by tests and operator tooling.

use symbiotic_types::keys;

use crate::{store::StateStore, Keeper};

impl<S: StateStore> Keeper<S> {
    /// Checks that every power-index entry matches the canonical key
    /// recomputed from the stored validator. Returns a report of every
    /// violation found; an empty report means the invariant holds.
    pub fn non_negative_power_invariant(&self) -> Result<Vec<String>, String> {
        let mut broken = Vec::new();

        let entries = self
            .validators_power_store_iterator()
            .map_err(|e| format!("power store iteration failed: {e}"))?;

        for (stored_key, op_addr) in entries {
            let validator = self
                .get_validator(&op_addr)
                .map_err(|_| format!("validator record not found for address: {op_addr}"))?;

            let canonical = keys::validator_power_index_key(&validator, self.power_reduction());
            if stored_key != canonical {
                broken.push(format!(
                    "power store invariance: validator {} power {} key mismatch",
                    op_addr,
                    validator.potential_consensus_power(self.power_reduction()),
                ));
            }
        }

        Ok(broken)
    }
}
