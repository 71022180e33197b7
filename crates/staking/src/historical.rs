//! Rolling window of historical header records.

use symbiotic_types::{error::StakingError, historical::HistoricalRecord, keys};

use crate::{
    store::{decode_value, encode_value, StateStore},
    Keeper,
};

impl<S: StateStore> Keeper<S> {
    pub fn get_historical_info(
        &self,
        height: u64,
    ) -> Result<Option<HistoricalRecord>, StakingError> {
        match self.store().get(&keys::historical_info_key(height))? {
            Some(bytes) => Ok(Some(decode_value(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Records the current header and prunes records older than the
    /// `historical_entries` window. With a zero window nothing is
    /// stored and any leftovers are cleared.
    pub fn track_historical_info(
        &self,
        height: u64,
        record: HistoricalRecord,
    ) -> Result<(), StakingError> {
        let entries = self.params()?.historical_entries as u64;

        // prune heights at or below `height - entries`; nothing to
        // prune while the chain is younger than the window
        let prune_upto = height.checked_sub(entries);
        for (key, _) in self.store().prefix_iter(&[keys::HISTORICAL_INFO])? {
            let stored_height = u64::from_be_bytes(
                key[1..9]
                    .try_into()
                    .map_err(|_| StakingError::Store("malformed historical key".to_owned()))?,
            );
            if entries == 0 || prune_upto.is_some_and(|upto| stored_height <= upto) {
                self.store().delete(&key)?;
            } else {
                break;
            }
        }

        if entries == 0 {
            return Ok(());
        }

        self.store().set(&keys::historical_info_key(height), &encode_value(&record)?)?;
        Ok(())
    }
}
