// THEORY:
// The `PairedRanker` orders a small list of neighbor candidates. A nearest-neighbor
// search produces two parallel lists: a key per candidate (usually a distance) and
// a payload (a label, or the index of the sample it came from). Sorting the keys
// alone would lose track of which payload belongs to which key, so every move of a
// key moves its payload with it.
//
// The sort is a stable insertion sort over short candidate lists (top-k). Equal
// distances keep their input order, and a classifier's votes depend on that
// tie-breaking, so any replacement algorithm must break ties the same way.

pub mod paired_ranker {
    use crate::error::{HinaError, Result};

    /// Sorts `keys` ascending in place, permuting `payload` identically. Stable.
    pub fn sort_paired<K: PartialOrd, P>(keys: &mut [K], payload: &mut [P]) -> Result<()> {
        if keys.len() != payload.len() {
            return Err(HinaError::LengthMismatch {
                keys: keys.len(),
                payload: payload.len(),
            });
        }

        for i in 1..keys.len() {
            // Shift the new element left past every strictly larger key in the
            // sorted prefix `[0, i)`; stopping on equal keys keeps the sort stable.
            let mut j = i;
            while j > 0 && keys[j - 1] > keys[j] {
                keys.swap(j - 1, j);
                payload.swap(j - 1, j);
                j -= 1;
            }
        }

        Ok(())
    }

    /// Ranks the candidates and returns the payloads of the `k` smallest keys.
    pub fn nearest_k<K: PartialOrd, P: Clone>(
        keys: &mut [K],
        payload: &mut [P],
        k: usize,
    ) -> Result<Vec<P>> {
        sort_paired(keys, payload)?;
        Ok(payload.iter().take(k).cloned().collect())
    }
}
