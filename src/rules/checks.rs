use tracing::trace;

use super::hash::hash_name;
use super::primes::recommended_max_primes;
use crate::config::AnalyzerConfig;
use crate::engine::{Resolved, Resolver};
use crate::error::IrError;
use crate::ir::{CallInst, Literal};
use crate::output::Diagnostic;

pub const WEAK_ENTROPY_MESSAGE: &str =
    "use the crypto/rand.Reader instead for a cryptographically secure random number generator";
pub const BLINDING_MESSAGE: &str =
    "do not use nil for entropy source to perform blinding to avoid timing side-channel attacks";
pub const SIGNING_HASH_MESSAGE: &str = "use SHA 256/512 for hash when signing";
pub const OAEP_HASH_MESSAGE: &str = "use SHA 256/512 for hash when decrypting or encrypting";

/// Everything a check may consult besides the call itself.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub resolver: &'a Resolver,
    pub config: &'a AnalyzerConfig,
}

/// One argument-level policy. Indices are argument positions of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Entropy must come from a recognized secure source.
    SecureEntropy { arg: usize },
    /// A nil entropy source disables blinding.
    Blinding { arg: usize },
    MinimumBits { arg: usize },
    BitAlignment { arg: usize },
    PrimeCount { primes: usize, bits: usize },
    /// Constant `crypto.Hash`-style identifier.
    HashIdentifier { arg: usize },
    /// Hash constructor call such as `sha256.New()`.
    HashConstructor { arg: usize },
    SessionKeySize { arg: usize },
}

impl Check {
    pub fn code(&self) -> &'static str {
        match self {
            Check::SecureEntropy { .. } => "weak-entropy",
            Check::Blinding { .. } => "missing-blinding",
            Check::MinimumBits { .. } => "weak-bit-size",
            Check::BitAlignment { .. } => "bit-alignment",
            Check::PrimeCount { .. } => "prime-count",
            Check::HashIdentifier { .. } => "weak-signing-hash",
            Check::HashConstructor { .. } => "weak-oaep-hash",
            Check::SessionKeySize { .. } => "weak-session-key",
        }
    }

    /// Argument positions the check reads.
    pub fn arguments(&self) -> Vec<usize> {
        match *self {
            Check::PrimeCount { primes, bits } => vec![primes, bits],
            Check::SecureEntropy { arg }
            | Check::Blinding { arg }
            | Check::MinimumBits { arg }
            | Check::BitAlignment { arg }
            | Check::HashIdentifier { arg }
            | Check::HashConstructor { arg }
            | Check::SessionKeySize { arg } => vec![arg],
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            Check::SecureEntropy { arg } => format!("arg{arg} is a secure entropy source"),
            Check::Blinding { arg } => format!("arg{arg} is not nil"),
            Check::MinimumBits { arg } => format!("arg{arg} meets the minimum bit size"),
            Check::BitAlignment { arg } => format!("arg{arg} is byte aligned"),
            Check::PrimeCount { primes, bits } => {
                format!("arg{primes} primes within the recommended maximum for arg{bits} bits")
            }
            Check::HashIdentifier { arg } => format!("arg{arg} names an accepted hash"),
            Check::HashConstructor { arg } => format!("arg{arg} constructs an accepted hash"),
            Check::SessionKeySize { arg } => format!("arg{arg} meets the minimum session key size"),
        }
    }

    /// Runs the check against one call. `Ok(None)` means the check passed or
    /// the relevant value could not be resolved.
    pub fn evaluate(
        &self,
        call: &CallInst,
        ctx: &CheckContext<'_>,
    ) -> Result<Option<Diagnostic>, IrError> {
        let message = match *self {
            Check::SecureEntropy { arg } => {
                let value = resolve_arg(call, arg, ctx)?;
                (!value.is_secure_source()).then(|| WEAK_ENTROPY_MESSAGE.to_string())
            }
            Check::Blinding { arg } => {
                let value = resolve_arg(call, arg, ctx)?;
                value.is_nil().then(|| BLINDING_MESSAGE.to_string())
            }
            Check::MinimumBits { arg } => {
                let value = resolve_arg(call, arg, ctx)?;
                let minimum = ctx.config.minimum_bits;
                value
                    .as_int()
                    .filter(|bits| *bits < minimum)
                    .map(|_| format!("always use {minimum} bits or greater"))
            }
            Check::BitAlignment { arg } => {
                let value = resolve_arg(call, arg, ctx)?;
                let alignment = ctx.config.bit_alignment;
                value
                    .as_int()
                    .filter(|bits| bits.checked_rem(alignment).is_some_and(|rem| rem != 0))
                    .map(|_| format!("use a bit size that is a multiple of {alignment}"))
            }
            Check::PrimeCount { primes, bits } => {
                let primes = resolve_arg(call, primes, ctx)?;
                let bits = resolve_arg(call, bits, ctx)?;
                match (primes.as_int(), bits.as_int()) {
                    (Some(primes), Some(bits)) => recommended_max_primes(bits)
                        .filter(|max| primes > *max)
                        .map(|max| {
                            format!(
                                "the recommended maximum number of primes for {bits} bits is {max}"
                            )
                        }),
                    _ => None,
                }
            }
            Check::HashIdentifier { arg } => {
                let value = resolve_arg(call, arg, ctx)?;
                value
                    .as_literal()
                    .and_then(hash_name)
                    .filter(|name| !ctx.config.accepts_hash_identifier(name))
                    .map(|_| SIGNING_HASH_MESSAGE.to_string())
            }
            Check::HashConstructor { arg } => {
                let value = resolve_arg(call, arg, ctx)?;
                value
                    .callee()
                    .filter(|callee| !ctx.config.accepted_hash_constructors.contains(*callee))
                    .map(|_| OAEP_HASH_MESSAGE.to_string())
            }
            Check::SessionKeySize { arg } => {
                let value = resolve_arg(call, arg, ctx)?;
                let minimum = ctx.config.minimum_session_key_bytes;
                // Keys built at run time (buffers, builders) are not checked.
                let too_short = match value.as_literal() {
                    Some(Literal::Nil) => true,
                    Some(literal) => literal.byte_len().is_some_and(|len| len < minimum),
                    None => false,
                };
                too_short.then(|| format!("use a session key size of {minimum} bytes or greater"))
            }
        };

        Ok(message.map(|message| {
            Diagnostic::new(call.position.clone(), self.code(), &call.callee, message)
        }))
    }
}

fn resolve_arg(call: &CallInst, index: usize, ctx: &CheckContext<'_>) -> Result<Resolved, IrError> {
    let value = call
        .arg(index)
        .ok_or_else(|| IrError::missing_argument(&call.callee, index, call.position.clone()))?;
    let resolved = ctx.resolver.resolve(value);
    trace!(callee = %call.callee, index, resolved = %resolved.describe(), "check argument");
    Ok(resolved)
}
