//! Declarative rule table for the `crypto/rsa` API.
//!
//! Each target operation maps to an ordered list of argument checks and an
//! optional diagnostic attached to every call regardless of its arguments.
//! The table is static data; the engine only interprets it.

mod checks;
mod hash;
mod primes;

pub use checks::{
    Check, CheckContext, BLINDING_MESSAGE, OAEP_HASH_MESSAGE, SIGNING_HASH_MESSAGE,
    WEAK_ENTROPY_MESSAGE,
};
pub use hash::{canonical_identifier, hash_name};
pub use primes::recommended_max_primes;

use std::fmt;

/// The operations the analyzer knows how to judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetOperation {
    GenerateKey,
    GenerateMultiPrimeKey,
    EncryptPkcs1v15,
    SignPkcs1v15,
    DecryptOaep,
    DecryptPkcs1v15SessionKey,
}

impl TargetOperation {
    pub const ALL: [TargetOperation; 6] = [
        TargetOperation::GenerateKey,
        TargetOperation::GenerateMultiPrimeKey,
        TargetOperation::EncryptPkcs1v15,
        TargetOperation::SignPkcs1v15,
        TargetOperation::DecryptOaep,
        TargetOperation::DecryptPkcs1v15SessionKey,
    ];

    /// Exact match on the fully qualified callee symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "crypto/rsa.GenerateKey" => Some(Self::GenerateKey),
            "crypto/rsa.GenerateMultiPrimeKey" => Some(Self::GenerateMultiPrimeKey),
            "crypto/rsa.EncryptPKCS1v15" => Some(Self::EncryptPkcs1v15),
            "crypto/rsa.SignPKCS1v15" => Some(Self::SignPkcs1v15),
            "crypto/rsa.DecryptOAEP" => Some(Self::DecryptOaep),
            "crypto/rsa.DecryptPKCS1v15SessionKey" => Some(Self::DecryptPkcs1v15SessionKey),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::GenerateKey => "crypto/rsa.GenerateKey",
            Self::GenerateMultiPrimeKey => "crypto/rsa.GenerateMultiPrimeKey",
            Self::EncryptPkcs1v15 => "crypto/rsa.EncryptPKCS1v15",
            Self::SignPkcs1v15 => "crypto/rsa.SignPKCS1v15",
            Self::DecryptOaep => "crypto/rsa.DecryptOAEP",
            Self::DecryptPkcs1v15SessionKey => "crypto/rsa.DecryptPKCS1v15SessionKey",
        }
    }

    pub fn rule(&self) -> &'static RuleEntry {
        match self {
            Self::GenerateKey => &GENERATE_KEY,
            Self::GenerateMultiPrimeKey => &GENERATE_MULTI_PRIME_KEY,
            Self::EncryptPkcs1v15 => &ENCRYPT_PKCS1V15,
            Self::SignPkcs1v15 => &SIGN_PKCS1V15,
            Self::DecryptOaep => &DECRYPT_OAEP,
            Self::DecryptPkcs1v15SessionKey => &DECRYPT_PKCS1V15_SESSION_KEY,
        }
    }
}

impl fmt::Display for TargetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Diagnostic attached to every matched call of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unconditional {
    pub code: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEntry {
    pub operation: TargetOperation,
    pub checks: &'static [Check],
    pub unconditional: Option<Unconditional>,
}

impl RuleEntry {
    pub fn symbol(&self) -> &'static str {
        self.operation.symbol()
    }

    /// Number of arguments a call must carry for every check to run.
    pub fn arity(&self) -> usize {
        self.checks
            .iter()
            .flat_map(Check::arguments)
            .max()
            .map_or(0, |index| index + 1)
    }
}

static GENERATE_KEY: RuleEntry = RuleEntry {
    operation: TargetOperation::GenerateKey,
    checks: &[
        Check::SecureEntropy { arg: 0 },
        Check::MinimumBits { arg: 1 },
        Check::BitAlignment { arg: 1 },
    ],
    unconditional: None,
};

static GENERATE_MULTI_PRIME_KEY: RuleEntry = RuleEntry {
    operation: TargetOperation::GenerateMultiPrimeKey,
    checks: &[
        Check::SecureEntropy { arg: 0 },
        Check::MinimumBits { arg: 2 },
        Check::BitAlignment { arg: 2 },
        Check::PrimeCount { primes: 1, bits: 2 },
    ],
    unconditional: Some(Unconditional {
        code: "deprecated-multi-prime",
        message: "use single-prime key generation (rsa.GenerateKey) instead of rsa.GenerateMultiPrimeKey",
    }),
};

static ENCRYPT_PKCS1V15: RuleEntry = RuleEntry {
    operation: TargetOperation::EncryptPkcs1v15,
    checks: &[Check::SecureEntropy { arg: 0 }],
    unconditional: Some(Unconditional {
        code: "deprecated-pkcs1v15-encrypt",
        message: "use rsa.EncryptOAEP instead of rsa.EncryptPKCS1v15",
    }),
};

static SIGN_PKCS1V15: RuleEntry = RuleEntry {
    operation: TargetOperation::SignPkcs1v15,
    checks: &[
        Check::SecureEntropy { arg: 0 },
        Check::Blinding { arg: 0 },
        Check::HashIdentifier { arg: 2 },
    ],
    unconditional: Some(Unconditional {
        code: "deprecated-pkcs1v15-sign",
        message: "use rsa.SignPSS instead of rsa.SignPKCS1v15",
    }),
};

static DECRYPT_OAEP: RuleEntry = RuleEntry {
    operation: TargetOperation::DecryptOaep,
    checks: &[
        Check::HashConstructor { arg: 0 },
        Check::SecureEntropy { arg: 1 },
        Check::Blinding { arg: 1 },
    ],
    unconditional: None,
};

static DECRYPT_PKCS1V15_SESSION_KEY: RuleEntry = RuleEntry {
    operation: TargetOperation::DecryptPkcs1v15SessionKey,
    checks: &[Check::Blinding { arg: 0 }, Check::SessionKeySize { arg: 3 }],
    unconditional: None,
};

pub fn lookup(symbol: &str) -> Option<&'static RuleEntry> {
    TargetOperation::from_symbol(symbol).map(|operation| operation.rule())
}

/// All rule entries in table order.
pub fn rules() -> impl Iterator<Item = &'static RuleEntry> {
    TargetOperation::ALL
        .into_iter()
        .map(|operation| operation.rule())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip_for_every_operation() {
        for operation in TargetOperation::ALL {
            assert_eq!(TargetOperation::from_symbol(operation.symbol()), Some(operation));
            assert_eq!(operation.rule().operation, operation);
        }
    }

    #[test]
    fn test_lookup_requires_exact_symbol() {
        assert!(lookup("crypto/rsa.GenerateKey").is_some());
        assert!(lookup("rsa.GenerateKey").is_none());
        assert!(lookup("crypto/rsa.generatekey").is_none());
        assert!(lookup("crypto/rsa.SignPSS").is_none());
        assert!(lookup("crypto/rsa.EncryptOAEP").is_none());
    }

    #[test]
    fn test_arity() {
        assert_eq!(TargetOperation::GenerateKey.rule().arity(), 2);
        assert_eq!(TargetOperation::GenerateMultiPrimeKey.rule().arity(), 3);
        assert_eq!(TargetOperation::EncryptPkcs1v15.rule().arity(), 1);
        assert_eq!(TargetOperation::SignPkcs1v15.rule().arity(), 3);
        assert_eq!(TargetOperation::DecryptOaep.rule().arity(), 2);
        assert_eq!(TargetOperation::DecryptPkcs1v15SessionKey.rule().arity(), 4);
    }

    #[test]
    fn test_unconditional_entries() {
        let with_unconditional: Vec<_> = rules()
            .filter(|rule| rule.unconditional.is_some())
            .map(RuleEntry::symbol)
            .collect();
        assert_eq!(
            with_unconditional,
            vec![
                "crypto/rsa.GenerateMultiPrimeKey",
                "crypto/rsa.EncryptPKCS1v15",
                "crypto/rsa.SignPKCS1v15",
            ]
        );
    }

    #[test]
    fn test_rules_in_table_order() {
        assert_eq!(rules().count(), 6);
        assert_eq!(
            rules().next().map(RuleEntry::symbol),
            Some("crypto/rsa.GenerateKey")
        );
    }
}
