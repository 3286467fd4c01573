use alloy_primitives::{U256, uint};
use serde::Serialize;

/// Order of the BN254 scalar field, the native field of Noir circuits.
pub const BN254_SCALAR_MODULUS: U256 =
    uint!(0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001_U256);

/// Values for the circuit's `main`, taken positionally from the command line.
///
/// Absent tokens stay `None`; rejecting them is left to the executor, which
/// knows the circuit's ABI.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_hash: Option<String>,
}

impl ProofInputs {
    pub const FIELDS: [&'static str; 2] = ["guess_hash", "answer_hash"];

    /// Builds inputs from a full argument vector, program name included.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_positional(args.into_iter().skip(1))
    }

    /// Token 0 is `guess_hash`, token 1 is `answer_hash`. Anything after that
    /// is ignored.
    pub fn from_positional<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        Self {
            guess_hash: tokens.next(),
            answer_hash: tokens.next(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "guess_hash" => self.guess_hash.as_deref(),
            "answer_hash" => self.answer_hash.as_deref(),
            _ => None,
        }
    }

    /// Renders the inputs in the `Prover.toml` format `nargo execute` reads.
    pub fn to_prover_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

/// Parses a decimal or `0x`-prefixed hex literal as a BN254 scalar. Other
/// radix prefixes, digit separators and an uppercase `0X` are rejected, as
/// nargo rejects them.
pub fn parse_field_element(value: &str) -> Option<U256> {
    let (digits, radix) = match value.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let parsed = U256::from_str_radix(digits, u64::from(radix)).ok()?;
    (parsed < BN254_SCALAR_MODULUS).then_some(parsed)
}
