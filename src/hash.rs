use std::num::NonZeroUsize;

const DJB2_SEED: u32 = 5381;

// djb2: acc = acc * 33 + c over every byte, wrapping at 32 bits.
pub fn djb2(key: &[u8]) -> u32 {
    key.iter().fold(DJB2_SEED, |acc, &c| {
        (acc << 5).wrapping_add(acc).wrapping_add(c as u32)
    })
}

// Maps `key` onto a bucket in `[0, buckets)`.
pub fn bucket_index(key: &[u8], buckets: NonZeroUsize) -> usize {
    let acc = djb2(key);
    let index = acc as usize % buckets.get();
    tracing::trace!(hash = acc, bucket = index, "hashed key");
    index
}
