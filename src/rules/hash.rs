use crate::ir::Literal;

/// Names for the numeric hash identifiers of Go's `crypto.Hash`, indexed by
/// value. Index 0 is not a valid hash.
const HASH_NAMES: &[&str] = &[
    "",
    "MD4",
    "MD5",
    "SHA-1",
    "SHA-224",
    "SHA-256",
    "SHA-384",
    "SHA-512",
    "MD5+SHA1",
    "RIPEMD-160",
    "SHA3-224",
    "SHA3-256",
    "SHA3-384",
    "SHA3-512",
    "SHA-512/224",
    "SHA-512/256",
    "BLAKE2s-256",
    "BLAKE2b-256",
    "BLAKE2b-384",
    "BLAKE2b-512",
];

/// Go constant names as a front end may spell them, mapped to the same names.
const CONSTANT_ALIASES: &[(&str, &str)] = &[
    ("MD4", "MD4"),
    ("MD5", "MD5"),
    ("SHA1", "SHA-1"),
    ("SHA224", "SHA-224"),
    ("SHA256", "SHA-256"),
    ("SHA384", "SHA-384"),
    ("SHA512", "SHA-512"),
    ("MD5SHA1", "MD5+SHA1"),
    ("RIPEMD160", "RIPEMD-160"),
    ("SHA3_224", "SHA3-224"),
    ("SHA3_256", "SHA3-256"),
    ("SHA3_384", "SHA3-384"),
    ("SHA3_512", "SHA3-512"),
    ("SHA512_224", "SHA-512/224"),
    ("SHA512_256", "SHA-512/256"),
    ("BLAKE2s_256", "BLAKE2s-256"),
    ("BLAKE2b_256", "BLAKE2b-256"),
    ("BLAKE2b_384", "BLAKE2b-384"),
    ("BLAKE2b_512", "BLAKE2b-512"),
];

/// Maps a constant hash identifier to its canonical name. Returns `None` when
/// the literal cannot name a hash at all (nil, byte sequences).
pub fn hash_name(literal: &Literal) -> Option<String> {
    match literal {
        Literal::Int(value) => Some(
            usize::try_from(*value)
                .ok()
                .and_then(|index| HASH_NAMES.get(index))
                .filter(|name| !name.is_empty())
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("Hash({value})")),
        ),
        Literal::Str(identifier) => Some(canonical_identifier(identifier)),
        Literal::Bytes(_) | Literal::Nil => None,
    }
}

/// Canonical name for a hash constant spelled as `crypto.SHA256`, `SHA256`
/// or `SHA-256`.
pub fn canonical_identifier(identifier: &str) -> String {
    let bare = identifier.strip_prefix("crypto.").unwrap_or(identifier);
    CONSTANT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == bare)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| bare.to_string())
}
