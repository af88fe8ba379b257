/// Recommended maximum prime count per modulus size, from
/// "Multi-Prime RSA" (Hinek, CACR 2006-16).
const MAX_PRIMES_FOR_BITS: &[(i64, i64)] = &[(1024, 3), (2048, 3), (4096, 4), (8192, 5)];

/// Looks up the recommended maximum number of primes for a key size. Sizes
/// not in the table have no recommendation.
pub fn recommended_max_primes(bits: i64) -> Option<i64> {
    MAX_PRIMES_FOR_BITS
        .iter()
        .find(|(size, _)| *size == bits)
        .map(|(_, max)| *max)
}
