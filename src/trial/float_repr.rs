//! JSON-safe float sequences for trial side channels.
//!
//! JSON has no literal for NaN or infinities and serde_json writes them as
//! `null`, which cannot be read back as `f64`. Side channels routinely
//! carry such values (an infeasible individual scored `-inf`), so they are
//! written as the strings `"NaN"`, `"inf"` and `"-inf"`. Finite values stay
//! plain JSON numbers.

use super::types::TimeDivision;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy)]
struct Lossless(f64);

impl Serialize for Lossless {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let x = self.0;
        if x.is_finite() {
            serializer.serialize_f64(x)
        } else if x.is_nan() {
            serializer.serialize_str("NaN")
        } else if x > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }
}

impl<'de> Deserialize<'de> for Lossless {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LosslessVisitor;

        impl Visitor<'_> for LosslessVisitor {
            type Value = Lossless;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, \"NaN\", \"inf\" or \"-inf\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Lossless, E> {
                Ok(Lossless(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Lossless, E> {
                Ok(Lossless(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Lossless, E> {
                Ok(Lossless(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Lossless, E> {
                match v {
                    "NaN" => Ok(Lossless(f64::NAN)),
                    "inf" => Ok(Lossless(f64::INFINITY)),
                    "-inf" => Ok(Lossless(f64::NEG_INFINITY)),
                    other => Err(E::invalid_value(Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(LosslessVisitor)
    }
}

/// `Vec<f64>`.
pub(crate) mod trace {
    use super::*;

    pub fn serialize<S: Serializer>(xs: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(xs.iter().map(|&x| Lossless(x)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let xs = Vec::<Lossless>::deserialize(deserializer)?;
        Ok(xs.into_iter().map(|x| x.0).collect())
    }
}

/// `Vec<Vec<f64>>`, one inner sequence per generation.
pub(crate) mod population {
    use super::*;

    pub fn serialize<S: Serializer>(gens: &[Vec<f64>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            gens.iter()
                .map(|g| g.iter().map(|&x| Lossless(x)).collect::<Vec<_>>()),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<f64>>, D::Error> {
        let gens = Vec::<Vec<Lossless>>::deserialize(deserializer)?;
        Ok(gens
            .into_iter()
            .map(|g| g.into_iter().map(|x| x.0).collect())
            .collect())
    }
}

/// Per-trial `Option<TimeDivision>` sequence.
pub(crate) mod divisions {
    use super::*;

    pub fn serialize<S: Serializer>(
        divisions: &[Option<TimeDivision>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(divisions.iter().map(|d| {
            d.as_ref().map(|d| {
                d.iter()
                    .map(|(k, &v)| (k.as_str(), Lossless(v)))
                    .collect::<BTreeMap<_, _>>()
            })
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Option<TimeDivision>>, D::Error> {
        let divisions = Vec::<Option<BTreeMap<String, Lossless>>>::deserialize(deserializer)?;
        Ok(divisions
            .into_iter()
            .map(|d| d.map(|d| d.into_iter().map(|(k, v)| (k, v.0)).collect()))
            .collect())
    }
}
